use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, topic: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let topic = app.find_topic_opt(topic)?;
    let stats = app.tracker.stats(topic.as_ref().map(|t| t.id));

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Plain => {
            let scope = topic.as_ref().map_or("All topics", |t| t.name.as_str());
            println!("{}", paint(scope, Color::BOLD, use_color));
            println!("  Topics:    {}", stats.total_topics);
            println!("  Cards:     {}", stats.total_cards);
            println!("  Due:       {}", stats.due_cards);
            println!(
                "  Mastered:  {} (interval over {} days)",
                stats.mastered_cards, app.config.mastered_after_days
            );
            println!("  Streak:    {} days", stats.total_streak);
        }
    }

    Ok(())
}
