use crate::error::AnalyzerError;
use crate::filter::{filter_by_frequency, FilterOutcome, FrequencyRange};
use crate::format::{comparison_bullets, partition_analysis, AnalysisSections};
use crate::llm_client::TextGenerator;
use crate::log_entry::{extract_signal_series, parse_log, LogEntry, ParsedLine, SignalSeries};
use crate::prompts::Prompt;
use crate::session::Session;
use log::{error, info, warn};

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub raw: String,
    pub sections: AnalysisSections,
    pub chart: Option<SignalSeries>,
    pub entries: Vec<LogEntry>,
    pub unparsed_lines: usize,
}

#[derive(Debug, Clone)]
pub struct AlertResult {
    pub raw: String,
}

#[derive(Debug, Clone)]
pub struct ComparisonResult {
    pub raw: String,
    pub bullets: Vec<String>,
}

/// Checks the input and applies the optional frequency filter.
fn prepare_log(text: &str, range: Option<FrequencyRange>) -> Result<String, AnalyzerError> {
    if text.trim().is_empty() {
        return Err(AnalyzerError::EmptyInput);
    }

    match range {
        None => Ok(text.to_string()),
        Some(range) => match filter_by_frequency(text, range) {
            FilterOutcome::Kept(filtered) => Ok(filtered),
            FilterOutcome::NoLogsInRange => {
                info!(
                    "No log lines within {}-{} GHz, skipping service call",
                    range.min, range.max
                );
                Err(AnalyzerError::NoLogsInRange)
            }
        },
    }
}

async fn call(generator: &dyn TextGenerator, prompt: &Prompt) -> Result<String, AnalyzerError> {
    generator.generate(prompt).await.inspect_err(|e| {
        error!("{:?} request failed: {}", prompt.kind, e);
    })
}

/// Analyzes a log. The (possibly filtered) text is added to the session
/// history before the service is called, whether or not the call succeeds.
pub async fn analyze(
    session: &mut Session,
    generator: &dyn TextGenerator,
    text: &str,
    range: Option<FrequencyRange>,
) -> Result<AnalysisReport, AnalyzerError> {
    let log_text = prepare_log(text, range)?;

    session.record_submission(log_text.clone());
    info!(
        "Analyzing log ({} lines, {} submissions in session)",
        log_text.lines().count(),
        session.submission_count()
    );

    let raw = call(generator, &Prompt::analyze(&log_text)).await?;
    session.set_latest_analysis(raw.clone());

    let mut entries = Vec::new();
    let mut unparsed_lines = 0;
    for line in parse_log(&log_text) {
        match line {
            ParsedLine::Entry(entry) => entries.push(entry),
            ParsedLine::Unparsed(_) => unparsed_lines += 1,
        }
    }

    let chart = extract_signal_series(&log_text);
    if chart.is_none() {
        warn!("Signal chart skipped: timestamps and measurements do not line up");
    }

    let sections = partition_analysis(&raw);
    if sections.is_empty() {
        warn!("Analysis response was empty");
    }

    Ok(AnalysisReport {
        sections,
        raw,
        chart,
        entries,
        unparsed_lines,
    })
}

pub async fn alert(
    generator: &dyn TextGenerator,
    text: &str,
    range: Option<FrequencyRange>,
) -> Result<AlertResult, AnalyzerError> {
    let log_text = prepare_log(text, range)?;
    info!("Generating alert ({} lines)", log_text.lines().count());

    let raw = call(generator, &Prompt::alert(&log_text)).await?;
    Ok(AlertResult { raw })
}

/// Compares the two most recent submissions of the session.
pub async fn compare(
    session: &Session,
    generator: &dyn TextGenerator,
) -> Result<ComparisonResult, AnalyzerError> {
    let Some((previous, latest)) = session.last_two() else {
        return Err(AnalyzerError::InsufficientHistory);
    };
    info!(
        "Comparing submissions from {} and {}",
        previous.submitted_at.format("%H:%M:%S"),
        latest.submitted_at.format("%H:%M:%S")
    );

    let raw = call(generator, &Prompt::compare(&previous.text, &latest.text)).await?;
    Ok(ComparisonResult {
        bullets: comparison_bullets(&raw),
        raw,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::filter::NO_LOGS_IN_RANGE;
    use crate::prompts::PromptKind;
    use crate::samples::SAMPLE_LOG;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and answers with a fixed reply, or fails if none.
    pub(crate) struct FakeGenerator {
        reply: Option<String>,
        pub(crate) prompts: Mutex<Vec<Prompt>>,
    }

    impl FakeGenerator {
        pub(crate) fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &Prompt) -> Result<String, AnalyzerError> {
            self.prompts.lock().unwrap().push(prompt.clone());
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(AnalyzerError::Service {
                    status: 500,
                    body: "upstream unavailable".to_string(),
                }),
            }
        }
    }

    const LINE: &str = "2025-04-12 10:01 UTC | 40.7N, 74.0W | Frequency: 14.5 GHz | Signal Strength: 85% | Message: OK.";

    fn range(min: f64, max: f64) -> Option<FrequencyRange> {
        Some(FrequencyRange::new(min, max).unwrap())
    }

    #[tokio::test]
    async fn blank_input_never_calls_service() {
        let generator = FakeGenerator::replying("unused");
        let mut session = Session::new();

        for text in ["", "   ", "\n\t\n"] {
            let result = analyze(&mut session, &generator, text, None).await;
            assert!(matches!(result, Err(AnalyzerError::EmptyInput)));
            assert!(matches!(
                alert(&generator, text, None).await,
                Err(AnalyzerError::EmptyInput)
            ));
        }
        assert_eq!(generator.calls(), 0);
        assert_eq!(session.submission_count(), 0);
    }

    #[tokio::test]
    async fn analyze_partitions_and_charts() {
        let generator = FakeGenerator::replying(
            "Issues:\n- Noise at 14.7 GHz\nHigh-priority messages:\n- Low battery\nKey details:\n- 3 entries",
        );
        let mut session = Session::new();

        let report = analyze(&mut session, &generator, SAMPLE_LOG, None).await.unwrap();
        assert_eq!(report.sections.issues, vec!["Noise at 14.7 GHz"]);
        assert_eq!(report.sections.high_priority, vec!["Low battery"]);
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.unparsed_lines, 0);
        assert_eq!(report.chart.unwrap().labels.len(), 3);
        assert_eq!(session.latest_analysis(), Some(report.raw.as_str()));

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].kind, PromptKind::Analyze);
        assert!(prompts[0].content.ends_with(SAMPLE_LOG));
    }

    #[tokio::test]
    async fn filtered_analyze_sends_only_lines_in_range() {
        let generator = FakeGenerator::replying("Key details:\n- 14.6 GHz");
        let mut session = Session::new();

        analyze(&mut session, &generator, SAMPLE_LOG, range(14.55, 14.65))
            .await
            .unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].content.contains("Frequency: 14.6 GHz"));
        assert!(!prompts[0].content.contains("Frequency: 14.5 GHz"));
        assert_eq!(session.submission_count(), 1);
    }

    #[tokio::test]
    async fn empty_filter_result_skips_service() {
        let generator = FakeGenerator::replying("unused");
        let mut session = Session::new();

        assert!(matches!(
            analyze(&mut session, &generator, LINE, range(14.0, 15.0)).await,
            Ok(_)
        ));
        let err = analyze(&mut session, &generator, LINE, range(14.6, 15.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::NoLogsInRange));
        assert_eq!(err.to_string(), NO_LOGS_IN_RANGE);
        assert!(matches!(
            alert(&generator, LINE, range(14.6, 15.0)).await,
            Err(AnalyzerError::NoLogsInRange)
        ));

        assert_eq!(generator.calls(), 1);
        assert_eq!(session.submission_count(), 1);
    }

    #[tokio::test]
    async fn failed_call_still_records_submission() {
        let generator = FakeGenerator::failing();
        let mut session = Session::new();

        let err = analyze(&mut session, &generator, LINE, None).await.unwrap_err();
        assert!(err.display_message().starts_with("Error:"));
        assert_eq!(session.submission_count(), 1);
        assert_eq!(session.latest_analysis(), None);
    }

    #[tokio::test]
    async fn compare_sends_both_submissions() {
        let generator = FakeGenerator::replying("- Signal improved\n- Interference cleared");
        let mut session = Session::new();
        let second_log = "2025-04-12 11:01 UTC | 40.7N, 74.0W | Frequency: 14.5 GHz | Signal Strength: 95% | Message: OK.";

        analyze(&mut session, &generator, LINE, None).await.unwrap();
        analyze(&mut session, &generator, second_log, None).await.unwrap();
        let result = compare(&session, &generator).await.unwrap();
        assert_eq!(result.bullets, vec!["Signal improved", "Interference cleared"]);

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        let compare_prompt = &prompts[2];
        assert_eq!(compare_prompt.kind, PromptKind::Compare);
        let first = compare_prompt.content.find(LINE).unwrap();
        let second = compare_prompt.content.find(second_log).unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn compare_needs_two_submissions() {
        let generator = FakeGenerator::replying("ok");
        let mut session = Session::new();

        assert!(matches!(
            compare(&session, &generator).await,
            Err(AnalyzerError::InsufficientHistory)
        ));
        analyze(&mut session, &generator, LINE, None).await.unwrap();
        assert!(matches!(
            compare(&session, &generator).await,
            Err(AnalyzerError::InsufficientHistory)
        ));
        // Only the analyze call reached the service.
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn alert_uses_alert_template() {
        let generator = FakeGenerator::replying("Emergency: low battery on 14.6 GHz at 10:03");

        let result = alert(&generator, SAMPLE_LOG, None).await.unwrap();
        assert!(result.raw.starts_with("Emergency"));
        assert_eq!(generator.prompts.lock().unwrap()[0].kind, PromptKind::Alert);
    }
}
