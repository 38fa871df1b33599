use serde::Serialize;

const ISSUES_MARKER: &str = "Issues:";
const HIGH_PRIORITY_MARKER: &str = "High-priority messages:";
const KEY_DETAILS_MARKER: &str = "Key details:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Unsectioned,
    Issues,
    HighPriority,
    KeyDetails,
}

/// Model output grouped by the section headers it was asked to use.
///
/// Matching is a plain substring search, so a model that words its headers
/// differently simply yields everything under `unsectioned`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisSections {
    pub unsectioned: Vec<String>,
    pub issues: Vec<String>,
    pub high_priority: Vec<String>,
    pub key_details: Vec<String>,
}

impl AnalysisSections {
    fn bucket(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Unsectioned => &mut self.unsectioned,
            Section::Issues => &mut self.issues,
            Section::HighPriority => &mut self.high_priority,
            Section::KeyDetails => &mut self.key_details,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.unsectioned.is_empty()
            && self.issues.is_empty()
            && self.high_priority.is_empty()
            && self.key_details.is_empty()
    }
}

fn find_marker(line: &str) -> Option<(Section, &str)> {
    [
        (ISSUES_MARKER, Section::Issues),
        (HIGH_PRIORITY_MARKER, Section::HighPriority),
        (KEY_DETAILS_MARKER, Section::KeyDetails),
    ]
    .into_iter()
    .find_map(|(marker, section)| {
        line.find(marker)
            .map(|pos| (section, &line[pos + marker.len()..]))
    })
}

/// Strips list bullets and markdown emphasis around an item.
fn clean_item(text: &str) -> Option<String> {
    let cleaned = text
        .trim()
        .trim_start_matches(['-', '*', '•', ':', ' ', '\t'])
        .trim_end_matches(['*', ' ', '\t'])
        .trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Splits an analysis response into sections. Lines before the first
/// recognized header land in `unsectioned`.
pub fn partition_analysis(text: &str) -> AnalysisSections {
    let mut sections = AnalysisSections::default();
    let mut current = Section::Unsectioned;

    for line in text.lines() {
        let rest = match find_marker(line) {
            Some((section, rest)) => {
                current = section;
                rest
            }
            None => line,
        };

        if let Some(item) = clean_item(rest) {
            sections.bucket(current).push(item);
        }
    }

    sections
}

/// One bullet per non-empty line.
pub fn comparison_bullets(text: &str) -> Vec<String> {
    text.lines().filter_map(clean_item).collect()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_bullets_html(items: &[String]) -> String {
    let mut html = String::from("<ul>");
    for item in items {
        html.push_str("<li>");
        html.push_str(&escape_html(item));
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}

pub fn render_analysis_html(sections: &AnalysisSections) -> String {
    let mut html = String::new();
    let groups = [
        ("Summary", "unsectioned", &sections.unsectioned),
        ("Issues", "issues", &sections.issues),
        ("High-priority messages", "high-priority", &sections.high_priority),
        ("Key details", "key-details", &sections.key_details),
    ];

    for (title, class, items) in groups {
        if items.is_empty() {
            continue;
        }
        html.push_str(&format!(
            "<section class=\"{}\"><h3>{}</h3>{}</section>",
            class,
            title,
            render_bullets_html(items)
        ));
    }

    if html.is_empty() {
        html.push_str("<p class=\"empty\">The model returned no content.</p>");
    }
    html
}

pub fn render_alert_html(alert: &str) -> String {
    format!(
        "<div class=\"alert\"><strong>ALERT:</strong> {}</div>",
        escape_html(alert.trim())
    )
}
