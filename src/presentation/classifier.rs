use crate::models::RiskTier;

/// Lowest percentage classified as [`RiskTier::Suspicious`].
pub const SUSPICIOUS_THRESHOLD: f64 = 30.0;
/// Lowest percentage classified as [`RiskTier::Dangerous`].
pub const DANGEROUS_THRESHOLD: f64 = 70.0;

/// Maps a clamped danger percentage to its tier.
///
/// The verdict text and every gauge frame go through this function, so both
/// always agree for the same value. Input outside `[0, 100]` is the caller's
/// problem; the result for it is whatever the thresholds say.
pub fn classify(pct: f64) -> RiskTier {
    if pct < SUSPICIOUS_THRESHOLD {
        RiskTier::Safe
    } else if pct < DANGEROUS_THRESHOLD {
        RiskTier::Suspicious
    } else {
        RiskTier::Dangerous
    }
}
