//! Interactive review session
//!
//! The queue is the due set at the start of the session, walked by index.
//! Cards deleted during the session are skipped; clones join the next session.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use uuid::Uuid;

use learntrack_lib::flashcards::{format_interval, Grade};
use learntrack_lib::storage::EntityStore;
use learntrack_lib::StudyTracker;

use super::cards::parse_quality;
use crate::app::App;
use crate::render::terminal::{paint, wrap_lines, Color};

const WRAP_WIDTH: usize = 72;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub queued: usize,
    pub reviewed: usize,
}

enum Step {
    Next,
    Quit,
}

pub fn run(app: &mut App, topic: Option<&str>, use_color: bool) -> Result<()> {
    let topic_id = app.find_topic_opt(topic)?.map(|t| t.id);
    let storage = &app.storage;
    let mut persist = |store: &EntityStore| {
        if let Err(e) = storage.save(store) {
            log::error!("Failed to save data: {}", e);
            eprintln!("warning: could not save changes: {}", e);
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    session(&mut app.tracker, topic_id, &mut input, &mut output, &mut persist, use_color)?;
    Ok(())
}

/// Drive a review session reading commands from `input`
pub fn session(
    tracker: &mut StudyTracker,
    topic_id: Option<Uuid>,
    input: &mut impl BufRead,
    out: &mut impl Write,
    persist: &mut dyn FnMut(&EntityStore),
    use_color: bool,
) -> Result<SessionSummary> {
    let queue: Vec<Uuid> = tracker.due_cards(topic_id).iter().map(|c| c.id).collect();
    let mut summary = SessionSummary {
        queued: queue.len(),
        reviewed: 0,
    };

    if queue.is_empty() {
        writeln!(out, "All caught up.")?;
        return Ok(summary);
    }

    for (index, card_id) in queue.iter().enumerate() {
        let Some(card) = tracker.store().card(*card_id).cloned() else {
            continue;
        };
        let topic_name = tracker
            .store()
            .topic(card.topic_id)
            .map(|t| t.name.as_str())
            .unwrap_or("?");

        writeln!(out)?;
        writeln!(
            out,
            "{}",
            paint(&format!("{} \u{2022} {}/{}", topic_name, index + 1, queue.len()), Color::GRAY, use_color)
        )?;
        for line in wrap_lines(&card.front, "  ", WRAP_WIDTH) {
            writeln!(out, "{}", paint(&line, Color::BOLD, use_color))?;
        }
        write!(out, "[Enter] show answer, [q] quit: ")?;
        out.flush()?;

        match read_command(input)? {
            None => break,
            Some(cmd) if cmd == "q" => break,
            Some(_) => {}
        }

        for line in wrap_lines(&card.back, "  ", WRAP_WIDTH) {
            writeln!(out, "{}", line)?;
        }

        match grade_prompt(tracker, *card_id, input, out, persist, use_color)? {
            (Step::Next, graded) => summary.reviewed += usize::from(graded),
            (Step::Quit, _) => break,
        }
    }

    writeln!(out)?;
    writeln!(out, "Reviewed {} of {} cards.", summary.reviewed, summary.queued)?;
    Ok(summary)
}

/// Ask for a grade until one is given. Returns whether the card was graded.
fn grade_prompt(
    tracker: &mut StudyTracker,
    card_id: Uuid,
    input: &mut impl BufRead,
    out: &mut impl Write,
    persist: &mut dyn FnMut(&EntityStore),
    use_color: bool,
) -> Result<(Step, bool)> {
    loop {
        let Some(preview) = tracker.preview_intervals(card_id) else {
            return Ok((Step::Next, false));
        };
        let options: Vec<String> = Grade::ALL
            .iter()
            .zip(preview)
            .map(|(grade, days)| format!("[{}] {:?} ({})", grade.quality(), grade, format_interval(days)))
            .collect();
        write!(out, "{}  [c]lone [d]elete [u]ndo [q]uit: ", options.join(" "))?;
        out.flush()?;

        let Some(cmd) = read_command(input)? else {
            return Ok((Step::Quit, false));
        };

        match cmd.as_str() {
            "q" => return Ok((Step::Quit, false)),
            "c" => {
                if tracker.clone_card(card_id).is_some() {
                    persist(tracker.store());
                    writeln!(out, "Cloned.")?;
                }
            }
            "d" => {
                if tracker.delete_card(card_id) {
                    persist(tracker.store());
                    writeln!(out, "Deleted.")?;
                }
                return Ok((Step::Next, false));
            }
            "u" => {
                if tracker.undo() {
                    persist(tracker.store());
                    writeln!(out, "Undone.")?;
                } else {
                    writeln!(out, "Nothing to undo.")?;
                }
            }
            other => match parse_quality(other) {
                Ok(quality) => {
                    if let Some(card) = tracker.grade(card_id, quality) {
                        persist(tracker.store());
                        writeln!(
                            out,
                            "{}",
                            paint(&format!("Next review in {}", format_interval(card.interval)), Color::GREEN, use_color)
                        )?;
                        return Ok((Step::Next, true));
                    }
                    return Ok((Step::Next, false));
                }
                Err(_) => writeln!(out, "Unknown choice '{}'", other)?,
            },
        }
    }
}

fn read_command(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};
    use learntrack_lib::storage::persistence::example_dataset;
    use learntrack_lib::FixedClock;
    use std::io::Cursor;

    fn tracker() -> StudyTracker {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 18, 9, 0, 0)
            .unwrap();
        let store = example_dataset(now.with_timezone(&Utc));
        StudyTracker::new(store, Box::new(FixedClock::new(now)))
    }

    fn run_session(tracker: &mut StudyTracker, script: &str) -> (SessionSummary, usize) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let mut saves = 0;
        let summary = session(tracker, None, &mut input, &mut out, &mut |_| saves += 1, false).unwrap();
        (summary, saves)
    }

    #[test]
    fn test_session_grades_in_order() {
        let mut tracker = tracker();
        let ids: Vec<_> = tracker.store().cards().iter().map(|c| c.id).collect();

        let (summary, saves) = run_session(&mut tracker, "\n3\n\nEasy\n\n1\n");
        assert_eq!(summary, SessionSummary { queued: 3, reviewed: 3 });
        assert_eq!(saves, 3);

        let intervals: Vec<_> = ids.iter().map(|id| tracker.store().card(*id).unwrap().interval).collect();
        assert_eq!(intervals, [15, 16, 1]);
        assert_eq!(tracker.due_count(None), 0);
    }

    #[test]
    fn test_session_quit_and_eof() {
        let mut tracker = tracker();
        let (summary, _) = run_session(&mut tracker, "\n5\nq\n");
        assert_eq!(summary.reviewed, 1);
        assert_eq!(tracker.due_count(None), 2);

        let (summary, saves) = run_session(&mut tracker, "");
        assert_eq!(summary, SessionSummary { queued: 2, reviewed: 0 });
        assert_eq!(saves, 0);
    }

    #[test]
    fn test_session_delete_then_undo() {
        let mut tracker = tracker();
        let before = tracker.store().clone();

        // delete the first card, undo it on the second, then quit
        let (summary, saves) = run_session(&mut tracker, "\nd\n\nu\nq\n");
        assert_eq!(summary.reviewed, 0);
        assert_eq!(saves, 2);
        assert_eq!(tracker.store(), &before);
    }

    #[test]
    fn test_session_ignores_unknown_choice() {
        let mut tracker = tracker();
        let (summary, _) = run_session(&mut tracker, "\nmaybe\nc\n3\nq\n");
        assert_eq!(summary.reviewed, 1);
        assert_eq!(tracker.store().cards().len(), 4);
    }

    #[test]
    fn test_session_empty_queue() {
        let mut tracker = StudyTracker::new(EntityStore::default(), Box::new(FixedClock::new(Utc::now().fixed_offset())));
        let (summary, _) = run_session(&mut tracker, "\n");
        assert_eq!(summary, SessionSummary::default());
    }
}
