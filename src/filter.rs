use crate::error::AnalyzerError;
use crate::log_entry::extract_frequency;

/// Shown in place of a filtered log when every line was excluded.
pub const NO_LOGS_IN_RANGE: &str = "No logs found in the specified frequency range.";

/// Inclusive frequency range in GHz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyRange {
    pub min: f64,
    pub max: f64,
}

impl FrequencyRange {
    pub fn new(min: f64, max: f64) -> Result<Self, AnalyzerError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(AnalyzerError::InvalidRange(format!(
                "bounds must be finite numbers, got [{}, {}]",
                min, max
            )));
        }
        if min > max {
            return Err(AnalyzerError::InvalidRange(format!(
                "minimum {} is above maximum {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, frequency: f64) -> bool {
        self.min <= frequency && frequency <= self.max
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    Kept(String),
    NoLogsInRange,
}

/// Keeps lines whose frequency lies in `range` plus every line without a
/// recognizable frequency. Blank lines are dropped.
pub fn filter_by_frequency(text: &str, range: FrequencyRange) -> FilterOutcome {
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| match extract_frequency(line) {
            Some(frequency) => range.contains(frequency),
            None => true,
        })
        .collect();

    if kept.is_empty() {
        FilterOutcome::NoLogsInRange
    } else {
        FilterOutcome::Kept(kept.join("\n"))
    }
}
