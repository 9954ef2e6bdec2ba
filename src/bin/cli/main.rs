mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use learntrack_lib::topics::{PhaseStatus, TopicStatus};

#[derive(Parser)]
#[command(name = "learntrack-cli", about = "Study topics and review flashcards on a spaced schedule", version)]
struct Cli {
    /// Use a specific config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum TopicStatusArg {
    NotStarted,
    InProgress,
    Complete,
}

impl From<TopicStatusArg> for TopicStatus {
    fn from(arg: TopicStatusArg) -> Self {
        match arg {
            TopicStatusArg::NotStarted => TopicStatus::NotStarted,
            TopicStatusArg::InProgress => TopicStatus::InProgress,
            TopicStatusArg::Complete => TopicStatus::Complete,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PhaseStatusArg {
    Pending,
    InProgress,
    Complete,
}

impl From<PhaseStatusArg> for PhaseStatus {
    fn from(arg: PhaseStatusArg) -> Self {
        match arg {
            PhaseStatusArg::Pending => PhaseStatus::Pending,
            PhaseStatusArg::InProgress => PhaseStatus::InProgress,
            PhaseStatusArg::Complete => PhaseStatus::Complete,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List topics with progress, streak and due cards
    Topics,

    /// Create and edit topics
    #[command(subcommand)]
    Topic(TopicCommand),

    /// Add, clone and delete flashcards
    #[command(subcommand)]
    Card(CardCommand),

    /// List cards due for review
    Due {
        /// Only cards of this topic (id prefix or name)
        #[arg(long)]
        topic: Option<String>,
    },

    /// Grade a single card
    Grade {
        /// Card id (unique prefix)
        card: String,
        /// again, good, easy or a quality number
        grade: String,
    },

    /// Interactive review session over the due cards
    Review {
        /// Only cards of this topic (id prefix or name)
        #[arg(long)]
        topic: Option<String>,
    },

    /// Show review statistics
    Stats {
        /// Only this topic (id prefix or name)
        #[arg(long)]
        topic: Option<String>,
    },

    /// Export all data to a JSON file
    Export {
        /// Output file (default: learn-<millis>.json in the export dir)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace all data with an exported JSON file
    Import {
        /// Path to an export file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum TopicCommand {
    /// Create a topic
    New {
        /// Topic name
        name: String,
    },

    /// Delete a topic and all of its cards
    Delete {
        /// Topic id prefix or name
        topic: String,
    },

    /// Edit a topic's fields
    Edit {
        /// Topic id prefix or name
        topic: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TopicStatusArg>,
        /// Comma-separated tags (replaces the current tags)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Add a key idea
    Idea {
        /// Topic id prefix or name
        topic: String,
        text: String,
    },

    /// Connect two key ideas of a topic
    Connect {
        /// Topic id prefix or name
        topic: String,
        /// Source idea id prefix
        from: String,
        /// Target idea id prefix
        to: String,
        #[arg(long, default_value = "")]
        label: String,
    },

    /// Set your position on a question
    Position {
        /// Topic id prefix or name
        topic: String,
        key: String,
        value: String,
    },

    /// Set the status of a phase
    Phase {
        /// Topic id prefix or name
        topic: String,
        phase: u32,
        status: PhaseStatusArg,
    },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Add a card to a topic
    Add {
        /// Topic id prefix or name
        topic: String,
        front: String,
        back: String,
    },

    /// Copy a card with a fresh schedule
    Clone {
        /// Card id (unique prefix)
        card: String,
    },

    /// Delete a card
    Delete {
        /// Card id (unique prefix)
        card: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let mut app = app::App::new(cli.config.as_deref())?;

    match cli.command {
        Command::Topics => {
            commands::topics::run_list(&app, &cli.format, use_color)?;
        }
        Command::Topic(subcmd) => match subcmd {
            TopicCommand::New { name } => {
                commands::topics::run_new(&mut app, &name, &cli.format)?;
            }
            TopicCommand::Delete { topic } => {
                commands::topics::run_delete(&mut app, &topic, &cli.format)?;
            }
            TopicCommand::Edit { topic, name, description, status, tags } => {
                commands::topics::run_edit(
                    &mut app,
                    &topic,
                    name,
                    description,
                    status.map(Into::into),
                    tags.as_deref(),
                    &cli.format,
                )?;
            }
            TopicCommand::Idea { topic, text } => {
                commands::topics::run_idea(&mut app, &topic, &text, &cli.format)?;
            }
            TopicCommand::Connect { topic, from, to, label } => {
                commands::topics::run_connect(&mut app, &topic, &from, &to, &label, &cli.format)?;
            }
            TopicCommand::Position { topic, key, value } => {
                commands::topics::run_position(&mut app, &topic, &key, &value, &cli.format)?;
            }
            TopicCommand::Phase { topic, phase, status } => {
                commands::topics::run_phase(&mut app, &topic, phase, status.into(), &cli.format)?;
            }
        },
        Command::Card(subcmd) => match subcmd {
            CardCommand::Add { topic, front, back } => {
                commands::cards::run_add(&mut app, &topic, &front, &back, &cli.format)?;
            }
            CardCommand::Clone { card } => {
                commands::cards::run_clone(&mut app, &card, &cli.format)?;
            }
            CardCommand::Delete { card } => {
                commands::cards::run_delete(&mut app, &card, &cli.format)?;
            }
        },
        Command::Due { topic } => {
            commands::cards::run_due(&app, topic.as_deref(), &cli.format, use_color)?;
        }
        Command::Grade { card, grade } => {
            commands::cards::run_grade(&mut app, &card, &grade, &cli.format)?;
        }
        Command::Review { topic } => {
            commands::review::run(&mut app, topic.as_deref(), use_color)?;
        }
        Command::Stats { topic } => {
            commands::stats::run(&app, topic.as_deref(), &cli.format, use_color)?;
        }
        Command::Export { output } => {
            commands::transfer::run_export(&app, output, &cli.format)?;
        }
        Command::Import { path } => {
            commands::transfer::run_import(&mut app, &path, &cli.format)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
