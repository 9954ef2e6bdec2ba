use anyhow::{bail, Result};

use learntrack_lib::topics::{PhaseStatus, Topic, TopicStatus, TopicUpdate};

use crate::app::App;
use crate::render::terminal::{phase_marker, progress_bar, short_id, topic_status_label, Color, paint};
use crate::OutputFormat;

fn topic_json(app: &App, topic: &Topic) -> serde_json::Value {
    let (completed, total) = topic.progress();
    serde_json::json!({
        "id": topic.id.to_string(),
        "name": topic.name,
        "status": topic.status,
        "phasesCompleted": completed,
        "phasesTotal": total,
        "streak": topic.streak,
        "lastReviewDate": topic.last_review_date,
        "tags": topic.tags,
        "dueCards": app.tracker.due_count(Some(topic.id)),
    })
}

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let topics = app.tracker.store().topics();

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = topics.iter().map(|t| topic_json(app, t)).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if topics.is_empty() {
                println!("No topics. Create one with `topic new <name>`.");
                return Ok(());
            }

            for topic in topics {
                let (completed, total) = topic.progress();
                let due = app.tracker.due_count(Some(topic.id));
                let due_label = format!("{} due", due);
                println!(
                    "{}  {} ({})",
                    paint(&short_id(&topic.id), Color::CYAN, use_color),
                    paint(&topic.name, Color::BOLD, use_color),
                    topic_status_label(topic.status)
                );
                println!(
                    "          {}  streak {}  {}",
                    progress_bar(completed, total, 10),
                    topic.streak,
                    if due > 0 { paint(&due_label, Color::YELLOW, use_color) } else { due_label }
                );
                for phase in &topic.phases {
                    println!("          {} {}. {}", phase_marker(phase.status, use_color), phase.id, phase.name);
                }
                if !topic.tags.is_empty() {
                    println!("          {}", topic.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" "));
                }
            }
        }
    }

    Ok(())
}

pub fn run_new(app: &mut App, name: &str, format: &OutputFormat) -> Result<()> {
    let Some(topic) = app.tracker.create_topic(name) else {
        bail!("Topic name cannot be empty");
    };
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&topic_json(app, &topic))?),
        OutputFormat::Plain => {
            println!("Created topic \"{}\"", topic.name);
            println!("  ID: {}", topic.id);
        }
    }
    Ok(())
}

pub fn run_delete(app: &mut App, query: &str, format: &OutputFormat) -> Result<()> {
    let topic = app.find_topic(query)?;
    let cards = app.tracker.store().cards_for(topic.id).count();

    app.tracker.delete_topic(topic.id);
    app.save()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": topic.id.to_string(),
                "deletedCards": cards,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("Deleted topic \"{}\" and {} cards", topic.name, cards),
    }
    Ok(())
}

pub fn run_edit(
    app: &mut App,
    query: &str,
    name: Option<String>,
    description: Option<String>,
    status: Option<TopicStatus>,
    tags: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let topic = app.find_topic(query)?;
    let update = TopicUpdate {
        name,
        description,
        status,
        tags: tags.map(|t| {
            t.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }),
    };
    if update.is_empty() {
        bail!("Nothing to change. Pass --name, --description, --status or --tags.");
    }

    let Some(updated) = app.tracker.update_topic(topic.id, update) else {
        bail!("Topic {} disappeared", topic.id);
    };
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&topic_json(app, &updated))?),
        OutputFormat::Plain => println!("Updated topic \"{}\"", updated.name),
    }
    Ok(())
}

pub fn run_idea(app: &mut App, query: &str, text: &str, format: &OutputFormat) -> Result<()> {
    let topic = app.find_topic(query)?;
    let Some(idea) = app.tracker.add_idea(topic.id, text) else {
        bail!("Idea text cannot be empty");
    };
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&idea)?),
        OutputFormat::Plain => {
            println!("Added idea to \"{}\"", topic.name);
            println!("  ID: {}", idea.id);
        }
    }
    Ok(())
}

pub fn run_connect(
    app: &mut App,
    query: &str,
    from: &str,
    to: &str,
    label: &str,
    format: &OutputFormat,
) -> Result<()> {
    let topic = app.find_topic(query)?;
    let from = app.find_idea(&topic, from)?;
    let to = app.find_idea(&topic, to)?;

    if !app.tracker.add_connection(topic.id, from, to, label) {
        bail!("Could not connect ideas in \"{}\"", topic.name);
    }
    app.save()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "from": from, "to": to, "label": label });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("Connected {} -> {}", short_id(&from), short_id(&to)),
    }
    Ok(())
}

pub fn run_position(app: &mut App, query: &str, key: &str, value: &str, format: &OutputFormat) -> Result<()> {
    let topic = app.find_topic(query)?;
    if !app.tracker.set_position(topic.id, key, value) {
        bail!("Position name cannot be empty");
    }
    app.save()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "topic": topic.id, "key": key.trim(), "value": value });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("{}: {} = {}", topic.name, key.trim(), value),
    }
    Ok(())
}

pub fn run_phase(app: &mut App, query: &str, phase_id: u32, status: PhaseStatus, format: &OutputFormat) -> Result<()> {
    let topic = app.find_topic(query)?;
    if !app.tracker.set_phase_status(topic.id, phase_id, status) {
        bail!(
            "Topic \"{}\" has no phase {}. Phases:\n{}",
            topic.name,
            phase_id,
            topic.phases.iter().map(|p| format!("  {}. {}", p.id, p.name)).collect::<Vec<_>>().join("\n")
        );
    }
    app.save()?;

    let (completed, total) = app.tracker.topic_progress(topic.id).unwrap_or((0, 0));
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "topic": topic.id,
                "phase": phase_id,
                "status": status,
                "phasesCompleted": completed,
                "phasesTotal": total,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("{}: {}", topic.name, progress_bar(completed, total, 10)),
    }
    Ok(())
}
