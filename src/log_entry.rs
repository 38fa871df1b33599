use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Substring that marks a line as carrying signal measurements.
pub const DATA_LINE_MARKER: &str = "Signal Strength";

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<ts>\d{4}-\d{2}-\d{2} \d{2}:\d{2} UTC)\s*\|\s*(?P<lat>\d+(?:\.\d+)?[NS]),\s*(?P<lon>\d+(?:\.\d+)?[EW])\s*\|\s*Frequency:\s*(?P<freq>\d+(?:\.\d+)?)\s*GHz\s*\|\s*Signal Strength:\s*(?P<sig>\d+)%\s*\|\s*Message:\s*(?P<msg>.*)$",
    )
    .unwrap()
});

static TIMESTAMP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2} UTC").unwrap());

static FREQUENCY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Frequency:\s*(\d+(?:\.\d+)?)\s*GHz").unwrap());

static SIGNAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Signal Strength:\s*(\d+)%").unwrap());

/// Signal strength percentage; anything above 100 is rejected.
fn parse_signal_strength(digits: &str) -> Option<u8> {
    digits.parse::<u8>().ok().filter(|s| *s <= 100)
}

/// A single parsed satellite radio log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// `YYYY-MM-DD HH:MM UTC`
    pub timestamp: String,
    /// Decimal degrees with hemisphere suffix, e.g. `40.7N`
    pub latitude: String,
    /// Decimal degrees with hemisphere suffix, e.g. `74.0W`
    pub longitude: String,
    pub frequency_ghz: f64,
    /// 0-100
    pub signal_strength_percent: u8,
    pub message: String,
}

/// Outcome of parsing one line. Lines that do not follow the
/// `|`-delimited layout are kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Entry(LogEntry),
    Unparsed(String),
}

pub fn parse_line(line: &str) -> ParsedLine {
    let trimmed = line.trim();
    let Some(caps) = LINE_PATTERN.captures(trimmed) else {
        return ParsedLine::Unparsed(line.to_string());
    };

    let frequency_ghz = caps["freq"].parse::<f64>();
    let signal = parse_signal_strength(&caps["sig"]);

    match (frequency_ghz, signal) {
        (Ok(frequency_ghz), Some(signal_strength_percent)) => ParsedLine::Entry(LogEntry {
            timestamp: caps["ts"].to_string(),
            latitude: caps["lat"].to_string(),
            longitude: caps["lon"].to_string(),
            frequency_ghz,
            signal_strength_percent,
            message: caps["msg"].trim().to_string(),
        }),
        _ => ParsedLine::Unparsed(line.to_string()),
    }
}

/// Parses every non-blank line of a log.
pub fn parse_log(text: &str) -> Vec<ParsedLine> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

/// Frequency from a `Frequency: <number> GHz` field anywhere in the line.
pub fn extract_frequency(line: &str) -> Option<f64> {
    FREQUENCY_PATTERN
        .captures(line)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

/// Chart data: parallel arrays, one point per data line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSeries {
    /// `HH:MM` labels
    pub labels: Vec<String>,
    pub signal_strengths: Vec<u8>,
    pub frequencies: Vec<f64>,
}

/// Builds the signal-strength chart for a log.
///
/// Returns `None` when there are no data points or when the number of
/// timestamps differs from the number of frequency/signal pairs; the axes
/// are never paired up partially.
pub fn extract_signal_series(text: &str) -> Option<SignalSeries> {
    let mut labels = Vec::new();
    let mut signal_strengths = Vec::new();
    let mut frequencies = Vec::new();

    for line in text.lines() {
        if let Some(m) = TIMESTAMP_PATTERN.find(line) {
            // "YYYY-MM-DD HH:MM UTC" -> "HH:MM"
            let stamp = m.as_str().trim_end_matches(" UTC");
            labels.push(stamp[stamp.len() - 5..].to_string());
        }

        if !line.contains(DATA_LINE_MARKER) {
            continue;
        }

        let frequency = extract_frequency(line);
        let signal = SIGNAL_PATTERN
            .captures(line)
            .and_then(|caps| parse_signal_strength(&caps[1]));

        if let (Some(frequency), Some(signal)) = (frequency, signal) {
            frequencies.push(frequency);
            signal_strengths.push(signal);
        }
    }

    if signal_strengths.is_empty() || signal_strengths.len() != labels.len() {
        return None;
    }

    Some(SignalSeries {
        labels,
        signal_strengths,
        frequencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "2025-04-12 10:01 UTC | 40.7N, 74.0W | Frequency: 14.5 GHz | Signal Strength: 85% | Message: OK.";

    #[test]
    fn parses_well_formed_line() {
        let ParsedLine::Entry(entry) = parse_line(LINE) else {
            panic!("expected entry");
        };
        assert_eq!(entry.timestamp, "2025-04-12 10:01 UTC");
        assert_eq!(entry.latitude, "40.7N");
        assert_eq!(entry.longitude, "74.0W");
        assert_eq!(entry.frequency_ghz, 14.5);
        assert_eq!(entry.signal_strength_percent, 85);
        assert_eq!(entry.message, "OK.");
    }

    #[test]
    fn malformed_line_is_kept_unparsed() {
        let line = "operator note: antenna realigned";
        assert_eq!(parse_line(line), ParsedLine::Unparsed(line.to_string()));

        let out_of_range = "2025-04-12 10:01 UTC | 40.7N, 74.0W | Frequency: 14.5 GHz | Signal Strength: 185% | Message: OK.";
        assert!(matches!(parse_line(out_of_range), ParsedLine::Unparsed(_)));
    }

    #[test]
    fn parse_log_skips_blank_lines() {
        let text = format!("\n{}\n   \nfree text\n", LINE);
        let parsed = parse_log(&text);
        assert_eq!(parsed.len(), 2);
        assert!(matches!(parsed[0], ParsedLine::Entry(_)));
        assert!(matches!(parsed[1], ParsedLine::Unparsed(_)));
    }

    #[test]
    fn series_uses_hour_minute_labels() {
        let text = format!(
            "{}\n2025-04-12 10:02 UTC | 40.8N, 74.1W | Frequency: 14.7 GHz | Signal Strength: 60% | Message: Noise.",
            LINE
        );
        let series = extract_signal_series(&text).expect("chart");
        assert_eq!(series.labels, vec!["10:01", "10:02"]);
        assert_eq!(series.signal_strengths, vec![85, 60]);
        assert_eq!(series.frequencies, vec![14.5, 14.7]);
    }

    #[test]
    fn no_data_lines_means_no_chart() {
        let text = "2025-04-12 10:01 UTC | Frequency: 14.5 GHz | Message: Carrier lost";
        assert_eq!(extract_signal_series(text), None);
        assert_eq!(extract_signal_series(""), None);
    }

    #[test]
    fn mismatched_counts_skip_chart() {
        // Timestamp without a data line.
        let text = format!("{}\n2025-04-12 10:05 UTC | Message: operator shift change", LINE);
        assert_eq!(extract_signal_series(&text), None);

        // Data line without a timestamp.
        let text = format!("{}\nFrequency: 14.2 GHz | Signal Strength: 50%", LINE);
        assert_eq!(extract_signal_series(&text), None);
    }

    #[test]
    fn frequency_and_signal_counts_always_match() {
        // Signal Strength present but no frequency: contributes neither value.
        let text = format!("{}\n2025-04-12 10:02 UTC | Signal Strength: 50%", LINE);
        assert_eq!(extract_signal_series(&text), None);

        let text = format!("{}\nSignal Strength: 50%", LINE);
        let series = extract_signal_series(&text).expect("chart");
        assert_eq!(series.frequencies.len(), series.signal_strengths.len());
        assert_eq!(series.frequencies.len(), 1);
    }

    #[test]
    fn out_of_range_signal_is_not_charted() {
        let over_100 = "2025-04-12 10:01 UTC | 40.7N, 74.0W | Frequency: 14.5 GHz | Signal Strength: 185% | Message: OK.";
        assert!(matches!(parse_line(over_100), ParsedLine::Unparsed(_)));
        assert_eq!(extract_signal_series(over_100), None);

        // Same outcome whether or not the value fits in a byte.
        let over_255 = over_100.replace("185%", "300%");
        assert_eq!(extract_signal_series(&over_255), None);

        let text = format!("{}\n{}", LINE, over_100);
        assert_eq!(extract_signal_series(&text), None);

        let boundary = LINE.replace("85%", "100%");
        let series = extract_signal_series(&boundary).expect("chart");
        assert_eq!(series.signal_strengths, vec![100]);
    }
}
