//! `daybook` CLI — publish, edit and browse single-day events from the command line.
//!
//! Events live in a JSON file. Two events on the same date never overlap: every add or
//! update is admitted against the other events of its day first.
//!
//! ## Usage
//!
//! ```sh
//! # Publish an event (prints its id)
//! daybook add --title "Team sync" --date 2030-06-01 --start 09:00 --end 10:00
//!
//! # Browse one day, or everything
//! daybook list --date 2030-06-01
//! daybook list --json
//!
//! # Move an event; it is checked against its siblings, not itself
//! daybook update <ID> --title "Team sync" --date 2030-06-01 --start 08:00 --end 09:30
//!
//! # Would this slot be admitted? (exit status 1 on conflict)
//! daybook check --date 2030-06-01 --start 09:30 --end 10:30
//!
//! # Free gaps of at least 45 minutes during office hours
//! daybook free --date 2030-06-01 --from 09:00 --to 17:00 --min 45
//!
//! # Use another store file and verbose logs
//! DAYBOOK_STORE=/tmp/events.json daybook --log-level debug list
//! ```

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use daybook_engine::{
    normalize, parse_date, Decision, Event, EventDraft, EventId, JsonFileStore, Scheduler,
    TimeOfDay,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "daybook",
    version,
    about = "Publish and browse single-day events that never overlap"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path of the JSON event store
    #[arg(long, global = true, env = "DAYBOOK_STORE", default_value = "daybook.json")]
    store: PathBuf,

    /// Log filter directive (e.g. "info" or "daybook_engine=debug")
    #[arg(long, global = true, env = "DAYBOOK_LOG", default_value = "warn")]
    log_level: String,

    /// Date to treat as today when rejecting past dates (defaults to the local date)
    #[arg(long, global = true)]
    today: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a new event
    Add {
        #[command(flatten)]
        event: EventArgs,
        /// Authoring user recorded on the event
        #[arg(long, env = "DAYBOOK_AUTHOR", default_value = "admin")]
        author: String,
    },
    /// Replace the details of an existing event
    Update {
        /// Event id
        id: String,
        #[command(flatten)]
        event: EventArgs,
    },
    /// Delete an event
    Delete {
        /// Event id
        id: String,
    },
    /// Show one event
    Show {
        /// Event id
        id: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List events sorted by date and start time
    List {
        /// Only events on this date
        #[arg(long)]
        date: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether a time slot would be admitted, without saving anything
    Check {
        #[arg(long)]
        date: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Ignore this event id (as when updating it)
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Show free time slots on a date
    Free {
        #[arg(long)]
        date: String,
        /// Window start
        #[arg(long, default_value = "00:00")]
        from: String,
        /// Window end
        #[arg(long, default_value = "23:59")]
        to: String,
        /// Only the first slot of at least this many minutes
        #[arg(long)]
        min: Option<i64>,
    },
}

#[derive(Args)]
struct EventArgs {
    /// Event title (3-100 characters)
    #[arg(long)]
    title: String,
    /// Optional description (up to 500 characters)
    #[arg(long)]
    description: Option<String>,
    /// Calendar date, e.g. 2030-06-01
    #[arg(long)]
    date: String,
    /// Start time, HH:mm (24-hour)
    #[arg(long)]
    start: String,
    /// End time, HH:mm (24-hour)
    #[arg(long)]
    end: String,
}

impl From<EventArgs> for EventDraft {
    fn from(args: EventArgs) -> Self {
        EventDraft {
            title: args.title,
            description: args.description,
            date: args.date,
            start_time: args.start,
            end_time: args.end,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let today = match cli.today.as_deref() {
        Some(raw) => parse_date(raw).context("Invalid --today")?,
        None => Local::now().date_naive(),
    };
    tracing::debug!(store = %cli.store.display(), %today, "opening event store");
    let scheduler = Scheduler::new(JsonFileStore::new(cli.store));

    match cli.command {
        Commands::Add { event, author } => {
            let draft = EventDraft::from(event);
            let created = scheduler
                .create(&draft, &author, today)
                .context("Failed to add event")?;
            println!("{}", created.id);
        }
        Commands::Update { id, event } => {
            let id = parse_id(&id)?;
            let draft = EventDraft::from(event);
            let updated = scheduler
                .update(id, &draft, today)
                .context("Failed to update event")?;
            println!("{}", format_event(&updated));
        }
        Commands::Delete { id } => {
            let id = parse_id(&id)?;
            let removed = scheduler.delete(id).context("Failed to delete event")?;
            println!("Deleted {}", removed.id);
        }
        Commands::Show { id, json } => {
            let id = parse_id(&id)?;
            let event = scheduler.get(id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("{}", format_event(&event));
                if let Some(description) = &event.description {
                    println!("    {}", description);
                }
            }
        }
        Commands::List { date, json } => {
            let day = date.as_deref().map(parse_date).transpose()?;
            let events = scheduler.list(day)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else if events.is_empty() {
                println!("No events");
            } else {
                for event in &events {
                    println!("{}", format_event(event));
                }
            }
        }
        Commands::Check {
            date,
            start,
            end,
            exclude,
        } => {
            let interval = normalize(&date, &start, &end)?;
            let exclude = exclude.as_deref().map(parse_id).transpose()?;
            match scheduler.check(&interval, exclude)? {
                Decision::Admit => println!("admit"),
                Decision::Reject { .. } => {
                    for conflict in scheduler.conflicts(&interval, exclude)? {
                        println!(
                            "conflict with {} ({}-{}, {} min overlap)",
                            conflict.booking.id,
                            conflict.booking.interval.start(),
                            conflict.booking.interval.end(),
                            conflict.overlap_minutes
                        );
                    }
                    process::exit(1);
                }
            }
        }
        Commands::Free {
            date,
            from,
            to,
            min,
        } => {
            let day = parse_date(&date)?;
            let from = parse_time("--from", &from)?;
            let to = parse_time("--to", &to)?;
            let slots = scheduler.free_slots(day, from, to)?;
            let slots: Vec<_> = match min {
                Some(min) => slots
                    .into_iter()
                    .find(|slot| slot.duration_minutes >= min)
                    .into_iter()
                    .collect(),
                None => slots,
            };

            if slots.is_empty() {
                println!("No free slots");
            }
            for slot in slots {
                println!("{}-{} ({} min)", slot.start, slot.end, slot.duration_minutes);
            }
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. Stdout stays reserved for command output.
fn init_logging(filter: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter: {}", filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn parse_id(raw: &str) -> Result<EventId> {
    raw.parse::<EventId>()
        .with_context(|| format!("Invalid event id: {}", raw))
}

fn parse_time(flag: &str, raw: &str) -> Result<TimeOfDay> {
    raw.parse::<TimeOfDay>()
        .with_context(|| format!("Invalid {} time", flag))
}

fn format_event(event: &Event) -> String {
    format!(
        "{}  {} {}-{}  {}",
        event.id,
        event.date(),
        event.start_time(),
        event.end_time(),
        event.title
    )
}
