use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Safe,
    Suspicious,
    Dangerous,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Safe => "Safe",
            RiskTier::Suspicious => "Suspicious",
            RiskTier::Dangerous => "Dangerous",
        }
    }

    pub fn as_emoji(&self) -> &'static str {
        match self {
            RiskTier::Safe => "🟢",
            RiskTier::Suspicious => "🟡",
            RiskTier::Dangerous => "🔴",
        }
    }

    /// Verdict line as displayed, e.g. `🟡 Suspicious`.
    pub fn verdict(&self) -> String {
        format!("{} {}", self.as_emoji(), self.label())
    }

    /// Fill color of the gauge arc in the web palette. Kept for views that
    /// render with CSS colors; the terminal view uses [`RiskTier::ansi_color`].
    pub fn gauge_color(&self) -> &'static str {
        match self {
            RiskTier::Safe => "rgba(0,200,0,0.95)",
            RiskTier::Suspicious => "rgba(255,165,0,0.95)",
            RiskTier::Dangerous => "rgba(255,0,0,0.95)",
        }
    }

    /// Verdict text color in the web palette.
    pub fn text_color(&self) -> &'static str {
        match self {
            RiskTier::Safe => "#00ff80",
            RiskTier::Suspicious => "#ffaa00",
            RiskTier::Dangerous => "#ff4444",
        }
    }

    /// Closest ANSI escape for terminals.
    pub fn ansi_color(&self) -> &'static str {
        match self {
            RiskTier::Safe => "\x1b[1m\x1b[32m",
            RiskTier::Suspicious => "\x1b[1m\x1b[33m",
            RiskTier::Dangerous => "\x1b[1m\x1b[31m",
        }
    }

    fn severity(&self) -> u8 {
        match self {
            RiskTier::Safe => 0,
            RiskTier::Suspicious => 1,
            RiskTier::Dangerous => 2,
        }
    }
}

impl PartialOrd for RiskTier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskTier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.severity().cmp(&other.severity())
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
