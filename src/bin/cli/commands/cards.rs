use anyhow::{bail, Context, Result};

use learntrack_lib::flashcards::{format_interval, Card, Grade};

use crate::app::App;
use crate::render::terminal::{card_line, short_id};
use crate::OutputFormat;

/// Parse `again`, `good`, `easy` or a raw quality number
pub fn parse_quality(input: &str) -> Result<i32> {
    if let Some(grade) = Grade::from_name(input.trim()) {
        return Ok(grade.quality());
    }
    input
        .trim()
        .parse::<i32>()
        .with_context(|| format!("Invalid grade '{}'. Use again, good, easy or a number.", input))
}

fn print_card(card: &Card, format: &OutputFormat, verb: &str) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(card)?),
        OutputFormat::Plain => {
            println!("{} card \"{}\"", verb, card.front);
            println!("  ID: {}", card.id);
        }
    }
    Ok(())
}

pub fn run_add(app: &mut App, topic: &str, front: &str, back: &str, format: &OutputFormat) -> Result<()> {
    let topic = app.find_topic(topic)?;
    let Some(card) = app.tracker.add_card(topic.id, front, back) else {
        bail!("Both sides of a card need text");
    };
    app.save()?;
    print_card(&card, format, "Added")
}

pub fn run_clone(app: &mut App, query: &str, format: &OutputFormat) -> Result<()> {
    let original = app.find_card(query)?;
    let Some(card) = app.tracker.clone_card(original.id) else {
        bail!("Card {} disappeared", original.id);
    };
    app.save()?;
    print_card(&card, format, "Cloned")
}

pub fn run_delete(app: &mut App, query: &str, format: &OutputFormat) -> Result<()> {
    let card = app.find_card(query)?;
    app.tracker.delete_card(card.id);
    app.save()?;
    print_card(&card, format, "Deleted")
}

pub fn run_due(app: &App, topic: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let topic = app.find_topic_opt(topic)?;
    let due = app.tracker.due_cards(topic.as_ref().map(|t| t.id));

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&due)?),
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("All caught up.");
                return Ok(());
            }
            let width = due.iter().map(|c| c.front.chars().count()).max().unwrap_or(5).clamp(5, 48);
            for card in &due {
                println!("{}", card_line(card, width, use_color));
            }
            println!();
            println!("{} cards due", due.len());
        }
    }
    Ok(())
}

pub fn run_grade(app: &mut App, query: &str, grade: &str, format: &OutputFormat) -> Result<()> {
    let quality = parse_quality(grade)?;
    let card = app.find_card(query)?;
    let Some(updated) = app.tracker.grade(card.id, quality) else {
        bail!("Card {} disappeared", card.id);
    };
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&updated)?),
        OutputFormat::Plain => {
            println!(
                "{}: next review in {} (ease {:.2})",
                short_id(&updated.id),
                format_interval(updated.interval),
                updated.ease
            );
        }
    }
    Ok(())
}
