const ANALYZE_TEMPLATE: &str = "Analyze this satellite radio log and summarize in bullet points. \
Ensure frequencies are included in issues (if relevant) and key details. \
Use exactly these section headers:\n\
Issues: (e.g., low signal, noise, interference with frequency)\n\
High-priority messages: (e.g., emergencies)\n\
Key details: (coordinates, times, frequencies, signal strengths)\n\
Log:\n";

const ALERT_TEMPLATE: &str = "Write one short, urgent alert message for a satellite operator \
summarizing the most critical problem in this radio log (emergencies, low signal, interference). \
Mention the frequency and time involved. If nothing is critical, say that all systems are nominal.\n\
Log:\n";

const COMPARE_TEMPLATE: &str = "Compare these two satellite radio logs and describe the trends \
in bullet points, one per line: changes in signal strength, frequencies, interference and \
high-priority messages between the previous log and the latest log.\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Analyze,
    Alert,
    Compare,
}

impl PromptKind {
    pub fn temperature(self) -> f32 {
        match self {
            PromptKind::Analyze | PromptKind::Compare => 0.5,
            PromptKind::Alert => 0.7,
        }
    }

    pub fn max_completion_tokens(self) -> u32 {
        match self {
            PromptKind::Analyze => 400,
            PromptKind::Alert => 100,
            PromptKind::Compare => 300,
        }
    }
}

/// One fully built prompt, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub content: String,
}

impl Prompt {
    pub fn analyze(log_text: &str) -> Self {
        Self {
            kind: PromptKind::Analyze,
            content: format!("{}{}", ANALYZE_TEMPLATE, log_text),
        }
    }

    pub fn alert(log_text: &str) -> Self {
        Self {
            kind: PromptKind::Alert,
            content: format!("{}{}", ALERT_TEMPLATE, log_text),
        }
    }

    pub fn compare(previous: &str, latest: &str) -> Self {
        Self {
            kind: PromptKind::Compare,
            content: format!(
                "{}Previous log:\n{}\n\nLatest log:\n{}",
                COMPARE_TEMPLATE, previous, latest
            ),
        }
    }
}
