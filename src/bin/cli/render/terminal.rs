use learntrack_lib::flashcards::Card;
use learntrack_lib::topics::{PhaseStatus, TopicStatus};

/// ANSI color codes
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn short_id(id: &uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

pub fn topic_status_label(status: TopicStatus) -> &'static str {
    match status {
        TopicStatus::NotStarted => "not started",
        TopicStatus::InProgress => "in progress",
        TopicStatus::Complete => "complete",
    }
}

pub fn phase_marker(status: PhaseStatus, use_color: bool) -> String {
    match status {
        PhaseStatus::Pending => paint("[ ]", Color::GRAY, use_color),
        PhaseStatus::InProgress => paint("[~]", Color::YELLOW, use_color),
        PhaseStatus::Complete => paint("[x]", Color::GREEN, use_color),
    }
}

/// Text progress bar such as `[####------] 2/5`
pub fn progress_bar(done: usize, total: usize, width: usize) -> String {
    let filled = if total == 0 { 0 } else { done * width / total };
    format!(
        "[{}{}] {}/{}",
        "#".repeat(filled),
        "-".repeat(width - filled),
        done,
        total
    )
}

/// One-line summary of a card for listings
pub fn card_line(card: &Card, width: usize, use_color: bool) -> String {
    let front = truncate(&card.front, width);
    let schedule = format!(
        "{} ease {:.2}, {} reviews",
        learntrack_lib::flashcards::format_interval(card.interval),
        card.ease,
        card.review_count
    );
    format!(
        "{}  {:<w$}  {}",
        paint(&short_id(&card.id), Color::CYAN, use_color),
        front,
        paint(&schedule, Color::GRAY, use_color),
        w = width
    )
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}

/// Word-wrap text to `max_width`, indenting every line with `prefix`
pub fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let effective_width = max_width.saturating_sub(prefix.len());

    for line in text.lines() {
        if line.chars().count() <= effective_width {
            lines.push(format!("{}{}", prefix, line));
            continue;
        }

        let mut current = String::new();
        for word in line.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= effective_width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(format!("{}{}", prefix, current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(format!("{}{}", prefix, current));
        }
    }

    lines
}
