use anyhow::{Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};

use tempo_core::task::{Deadline, Effort, Impact};
use tempo_store::{FsKv, TaskStore};

mod dashboard;
mod review;
mod state;

#[derive(Parser, Debug)]
#[command(name = "tempo", version, about = "Tempo personal task prioritization CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task to the active list
    Add {
        /// Display name
        name: String,

        #[arg(long, value_enum)]
        impact: ImpactArg,

        #[arg(long, value_enum)]
        effort: EffortArg,

        #[arg(long, value_enum)]
        deadline: DeadlineArg,
    },

    /// Show the ranked dashboard (the default)
    Dashboard,

    /// Mark an active task complete
    Done { id: String },

    /// Move a completed task back to the active list
    Undone { id: String },

    /// Edit an active task
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_enum)]
        impact: Option<ImpactArg>,

        #[arg(long, value_enum)]
        effort: Option<EffortArg>,

        #[arg(long, value_enum)]
        deadline: Option<DeadlineArg>,
    },

    /// Delete an active task
    Delete { id: String },

    /// Delete every active task (irreversible)
    Clear {
        /// Confirm the bulk delete
        #[arg(long)]
        yes: bool,
    },

    /// Move all completed tasks to the archive; subcommands manage the archive
    Archive {
        #[command(subcommand)]
        command: Option<ArchiveCommand>,
    },

    /// Run the pending daily review
    Review,

    /// Show or change configuration
    Config {
        /// Set the IANA timezone used to resolve calendar days
        #[arg(long)]
        timezone: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ArchiveCommand {
    /// List archived tasks
    List,

    /// Restore an archived task to the completed list
    Restore { id: String },

    /// Permanently delete one archived task (irreversible)
    Delete { id: String },

    /// Permanently delete every archived task (irreversible)
    Clear {
        /// Confirm the bulk delete
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImpactArg {
    High,
    Low,
}

impl From<ImpactArg> for Impact {
    fn from(arg: ImpactArg) -> Self {
        match arg {
            ImpactArg::High => Impact::High,
            ImpactArg::Low => Impact::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EffortArg {
    Low,
    High,
}

impl From<EffortArg> for Effort {
    fn from(arg: EffortArg) -> Self {
        match arg {
            EffortArg::Low => Effort::Low,
            EffortArg::High => Effort::High,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DeadlineArg {
    Today,
    ThisWeek,
    ThisSprint,
    AfterSprint,
}

impl From<DeadlineArg> for Deadline {
    fn from(arg: DeadlineArg) -> Self {
        match arg {
            DeadlineArg::Today => Deadline::Today,
            DeadlineArg::ThisWeek => Deadline::ThisWeek,
            DeadlineArg::ThisSprint => Deadline::ThisSprint,
            DeadlineArg::AfterSprint => Deadline::AfterSprint,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let profile = state::read_profile()?;
    let tz = tempo_core::parse_timezone(&profile.timezone)?;
    let kv = FsKv::open(state::store_dir()?)?;
    let mut store = TaskStore::load(kv);

    let now = Utc::now();
    let today = tempo_core::local_day(now, tz);

    // Load-time maintenance: sweep stale review records, then run the
    // daily-review trigger. When no session is due this advances the day
    // marker; a due session keeps the marker until the review completes.
    store.prune_review_records(today);
    let pending_review = store.begin_daily_review(today);

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Add {
            name,
            impact,
            effort,
            deadline,
        } => {
            let id = store.add_task(&name, impact.into(), effort.into(), deadline.into(), now)?;
            println!("Added task {id}");
        }

        Command::Dashboard => {
            if let Some(session) = &pending_review {
                let n = session.pending().len();
                println!(
                    "You have {} unreviewed {} from a previous day. Run: tempo review\n",
                    n,
                    if n == 1 { "task" } else { "tasks" }
                );
            }
            dashboard::render(&store);
        }

        Command::Done { id } => {
            store.complete(&id, now)?;
            println!("Completed {id}");
        }

        Command::Undone { id } => {
            store.uncomplete(&id)?;
            println!("Moved {id} back to the active list");
        }

        Command::Edit {
            id,
            name,
            impact,
            effort,
            deadline,
        } => {
            store.update_task(
                &id,
                name.as_deref(),
                impact.map(Into::into),
                effort.map(Into::into),
                deadline.map(Into::into),
            )?;
            println!("Updated {id}");
        }

        Command::Delete { id } => {
            store.delete_task(&id)?;
            println!("Deleted {id}");
        }

        Command::Clear { yes } => {
            if !yes {
                bail!("refusing to delete all active tasks without --yes");
            }
            let n = store.clear_active();
            println!("Deleted {n} active tasks");
        }

        Command::Archive { command } => match command {
            None => {
                let n = store.archive_completed(now);
                println!("Archived {n} completed tasks");
            }
            Some(ArchiveCommand::List) => dashboard::render_archive(&store),
            Some(ArchiveCommand::Restore { id }) => {
                store.restore_archived(&id)?;
                println!("Restored {id} to the completed list");
            }
            Some(ArchiveCommand::Delete { id }) => {
                store.delete_archived(&id)?;
                println!("Permanently deleted {id}");
            }
            Some(ArchiveCommand::Clear { yes }) => {
                if !yes {
                    bail!("refusing to delete the whole archive without --yes");
                }
                let n = store.clear_archived();
                println!("Permanently deleted {n} archived tasks");
            }
        },

        Command::Review => match pending_review {
            Some(session) => review::run_review(&mut store, session)?,
            None => println!("No review pending."),
        },

        Command::Config { timezone } => match timezone {
            Some(tz_name) => {
                // Validate before persisting.
                tempo_core::parse_timezone(&tz_name)?;
                let mut profile = profile;
                profile.timezone = tz_name;
                if profile.created_at_utc.is_none() {
                    profile.created_at_utc = Some(now.to_rfc3339());
                }
                state::write_profile(&profile)?;
                println!("Timezone set to {}", profile.timezone);
            }
            None => {
                println!("Data dir:  {}", state::tempo_home()?.display());
                println!("Timezone:  {}", profile.timezone);
            }
        },
    }

    Ok(())
}
