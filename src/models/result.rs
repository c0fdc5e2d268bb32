use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of a completed scan as reported by the scanning service.
///
/// Counts are optional: a count the service did not send (or sent as `null`)
/// is simply not rendered. Any JSON number is accepted as a count; fractions
/// are truncated and negatives read as 0. A missing or `null`
/// `danger_percentage` is read as 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub malicious: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub suspicious: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub harmless: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub undetected: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub timeout: Option<u64>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub danger_percentage: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(number.map(|n| match n.as_u64() {
        Some(count) => count,
        None => n.as_f64().map_or(0, |value| value.max(0.0) as u64),
    }))
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// The six per-category counters, in the order their pills are revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatCategory {
    Total,
    Malicious,
    Suspicious,
    Harmless,
    Undetected,
    Timeout,
}

impl StatCategory {
    pub const ALL: [StatCategory; 6] = [
        StatCategory::Total,
        StatCategory::Malicious,
        StatCategory::Suspicious,
        StatCategory::Harmless,
        StatCategory::Undetected,
        StatCategory::Timeout,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatCategory::Total => "Total",
            StatCategory::Malicious => "Malicious",
            StatCategory::Suspicious => "Suspicious",
            StatCategory::Harmless => "Harmless",
            StatCategory::Undetected => "Undetected",
            StatCategory::Timeout => "Timeout",
        }
    }

    /// Position in the reveal order; drives the pill stagger.
    pub fn index(&self) -> usize {
        match self {
            StatCategory::Total => 0,
            StatCategory::Malicious => 1,
            StatCategory::Suspicious => 2,
            StatCategory::Harmless => 3,
            StatCategory::Undetected => 4,
            StatCategory::Timeout => 5,
        }
    }
}

impl ScanResult {
    pub fn new(danger_percentage: f64) -> Self {
        Self {
            danger_percentage,
            ..Self::default()
        }
    }

    pub fn with_counts(
        mut self,
        total: u64,
        malicious: u64,
        suspicious: u64,
        harmless: u64,
        undetected: u64,
        timeout: u64,
    ) -> Self {
        self.total = Some(total);
        self.malicious = Some(malicious);
        self.suspicious = Some(suspicious);
        self.harmless = Some(harmless);
        self.undetected = Some(undetected);
        self.timeout = Some(timeout);
        self
    }

    pub fn with_count(mut self, category: StatCategory, value: u64) -> Self {
        *self.count_slot(category) = Some(value);
        self
    }

    pub fn count(&self, category: StatCategory) -> Option<u64> {
        match category {
            StatCategory::Total => self.total,
            StatCategory::Malicious => self.malicious,
            StatCategory::Suspicious => self.suspicious,
            StatCategory::Harmless => self.harmless,
            StatCategory::Undetected => self.undetected,
            StatCategory::Timeout => self.timeout,
        }
    }

    fn count_slot(&mut self, category: StatCategory) -> &mut Option<u64> {
        match category {
            StatCategory::Total => &mut self.total,
            StatCategory::Malicious => &mut self.malicious,
            StatCategory::Suspicious => &mut self.suspicious,
            StatCategory::Harmless => &mut self.harmless,
            StatCategory::Undetected => &mut self.undetected,
            StatCategory::Timeout => &mut self.timeout,
        }
    }

    /// Returns the result with `danger_percentage` forced into `[0, 100]`.
    /// A NaN from the wire is treated like a missing value.
    pub fn clamped(mut self) -> Self {
        self.danger_percentage = if self.danger_percentage.is_nan() {
            0.0
        } else {
            self.danger_percentage.clamp(0.0, 100.0)
        };
        self
    }

    /// Pill text for one category, or `None` when the count was not reported.
    pub fn pill_text(&self, category: StatCategory) -> Option<String> {
        self.count(category)
            .map(|value| format!("{}: {}", category.label(), value))
    }

    pub fn subject(&self) -> Option<&str> {
        self.url.as_deref().or(self.filename.as_deref())
    }
}

/// Error body returned by the service on non-success responses.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
