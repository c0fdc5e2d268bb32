use crate::error::ScanError;
use crate::models::{RiskTier, ScanResult, StatCategory};
use crate::presentation::{classify, Region, ScanView};
use std::collections::HashMap;
use std::io::{self, Write};

const GAUGE_WIDTH: usize = 30;
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[1m\x1b[31m";
const DIM: &str = "\x1b[2m";

/// Paints the reveal sequence onto a terminal.
///
/// The gauge is a single line redrawn in place with `\r`; every other region
/// prints one line when it is shown. Write failures are ignored, a closed
/// stdout must not abort a running scan.
pub struct TerminalView<W: Write = io::Stdout> {
    out: W,
    use_colors: bool,
    texts: HashMap<Region, String>,
    verdict: Option<RiskTier>,
    gauge_open: bool,
    nudges: usize,
}

impl TerminalView<io::Stdout> {
    pub fn stdout(use_colors: bool) -> Self {
        Self::new(io::stdout(), use_colors)
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, use_colors: bool) -> Self {
        Self {
            out,
            use_colors,
            texts: HashMap::new(),
            verdict: None,
            gauge_open: false,
            nudges: 0,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn nudges(&self) -> usize {
        self.nudges
    }

    /// Prints the details that are not part of the timed reveal. Called once
    /// the sequence has settled.
    pub fn summarize(&mut self, result: &ScanResult) {
        let tier = classify(result.danger_percentage);
        let mut lines = vec![format!(
            "{} {:.1}% of engines flagged this as a threat",
            self.paint(tier.ansi_color(), tier.verdict()),
            result.danger_percentage
        )];

        if let Some(subject) = result.subject() {
            lines.push(format!("Subject: {}", subject));
        }
        if let Some(ref status) = result.status {
            lines.push(format!("Status: {}", status));
        }
        if let Some(ref analysis_id) = result.analysis_id {
            lines.push(format!("Analysis ID: {}", analysis_id));
        }

        let block = lines
            .iter()
            .map(|line| self.paint(DIM, line))
            .collect::<Vec<_>>()
            .join("\n");
        self.line(&format!("\n{}", block));
    }

    pub fn message(&mut self, text: &str) {
        self.line(text);
    }

    fn paint(&self, color: &str, text: impl AsRef<str>) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text.as_ref(), RESET)
        } else {
            text.as_ref().to_string()
        }
    }

    fn line(&mut self, text: &str) {
        self.close_gauge();
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }

    fn close_gauge(&mut self) {
        if self.gauge_open {
            let _ = writeln!(self.out);
            self.gauge_open = false;
        }
    }

    fn gauge_line(&self, value: f64, tier: RiskTier) -> String {
        let filled = ((value / 100.0) * GAUGE_WIDTH as f64).round() as usize;
        let filled = filled.min(GAUGE_WIDTH);
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(GAUGE_WIDTH - filled));
        format!("[{}] {:>5.1}%", self.paint(tier.ansi_color(), bar), value)
    }
}

impl<W: Write> ScanView for TerminalView<W> {
    fn show(&mut self, region: Region) {
        match region {
            Region::Loading => {
                let text = self.paint(DIM, "⏳ Scanning...");
                self.line(&text);
            }
            Region::Results => {
                let text = self.paint(BOLD, "═══ Scan result ═══");
                self.line(&text);
            }
            Region::Verdict => {
                if let Some(tier) = self.verdict {
                    let text = format!("Verdict: {}", self.paint(tier.ansi_color(), tier.verdict()));
                    self.line(&text);
                }
            }
            Region::Pill(category) => {
                if let Some(text) = self.texts.get(&region).cloned() {
                    let text = if self.use_colors && category == StatCategory::Malicious {
                        self.paint(RED, text)
                    } else {
                        text
                    };
                    self.line(&format!("  • {}", text));
                }
            }
            Region::Gauge | Region::UrlInput | Region::FileInput => {}
        }
    }

    fn hide(&mut self, region: Region) {
        match region {
            Region::Results => {
                self.close_gauge();
                self.texts.clear();
                self.verdict = None;
            }
            Region::Pill(_) => {
                self.texts.remove(&region);
            }
            _ => {}
        }
    }

    fn set_text(&mut self, region: Region, text: &str) {
        self.texts.insert(region, text.to_string());
    }

    fn draw_gauge(&mut self, value: f64, tier: RiskTier) {
        let line = self.gauge_line(value, tier);
        let _ = write!(self.out, "\r{}", line);
        let _ = self.out.flush();
        self.gauge_open = true;
    }

    fn set_verdict(&mut self, tier: RiskTier) {
        self.verdict = Some(tier);
    }

    fn nudge(&mut self, _region: Region) {
        self.nudges += 1;
        if self.use_colors {
            let _ = write!(self.out, "\x07");
        }
    }

    fn report_error(&mut self, error: &ScanError) {
        let text = self.paint(RED, format!("❌ {}", error.user_message()));
        self.line(&text);
    }
}
