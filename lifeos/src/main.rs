//! lifeos - local-first personal analytics
//!
//! Command-line frontend for logging records (activities, journal entries,
//! expenses, goals) and producing the cross-module analytics report as JSON.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};

use lifeos_core::dates::parse_timestamp;
use lifeos_core::{
    analytics, ActivityRecord, BudgetRecord, Config, Database, ExpenseRecord, GoalBucket,
    GoalRecord, JournalEntry, Mood,
};

#[derive(Parser)]
#[command(name = "lifeos", about = "Local-first personal analytics", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the comprehensive analytics report as JSON
    Report {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Log a new record
    #[command(subcommand)]
    Log(LogCommand),
    /// Manage goals
    #[command(subcommand)]
    Goal(GoalCommand),
    /// Manage budgets
    #[command(subcommand)]
    Budget(BudgetCommand),
}

#[derive(Subcommand)]
enum LogCommand {
    /// Log a fitness activity (advances matching active fitness goals)
    Activity {
        /// Activity kind, e.g. "running"
        #[arg(long = "type")]
        kind: String,
        /// Amount (distance, reps, minutes - unit implied by kind)
        #[arg(long)]
        amount: f64,
        /// When it happened ("YYYY-MM-DD" or full timestamp, default now)
        #[arg(long)]
        date: Option<String>,
        /// Optional free-text notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Write a journal entry
    Journal {
        /// Entry text
        content: String,
        /// Mood: awful, down, neutral, good, or great
        #[arg(long)]
        mood: Option<String>,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// When it was written ("YYYY-MM-DD" or full timestamp, default now)
        #[arg(long)]
        date: Option<String>,
    },
    /// Record an expense
    Expense {
        /// Amount spent
        #[arg(long)]
        amount: f64,
        /// Spending category, e.g. "food"
        #[arg(long)]
        category: String,
        /// Optional description
        #[arg(long, default_value = "")]
        description: String,
        /// When it was spent ("YYYY-MM-DD" or full timestamp, default now)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
enum GoalCommand {
    /// Add a goal
    Add {
        /// Goal name
        name: String,
        /// Numeric target to reach
        #[arg(long)]
        target: f64,
        /// Category; for fitness goals this is the activity kind to track
        #[arg(long, default_value = "")]
        category: String,
        /// Goal bucket: fitness or general
        #[arg(long, default_value = "general")]
        bucket: String,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// Mark a goal as completed
    Complete {
        /// Goal id
        id: String,
    },
    /// List goals in a bucket
    List {
        /// Goal bucket: fitness or general
        #[arg(long, default_value = "general")]
        bucket: String,
    },
}

#[derive(Subcommand)]
enum BudgetCommand {
    /// Set the monthly cap for a spending category
    Set {
        /// Spending category
        category: String,
        /// Monthly cap
        #[arg(long)]
        amount: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging (to file, stdout is reserved for JSON output)
    let _log_guard =
        lifeos_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("lifeos starting up");

    let db_path = Config::database_path();
    tracing::info!(path = %db_path.display(), "Opening database");

    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let result = run(&cli, &db, &config);

    tracing::info!("lifeos shutting down");

    result
}

fn run(cli: &Cli, db: &Database, config: &Config) -> Result<()> {
    let now = Local::now().naive_local();

    match &cli.command {
        Command::Report { pretty } => {
            let snapshot = db.read_snapshot().context("failed to read records")?;
            let report = analytics::comprehensive(&snapshot, now, &config.analytics);
            let json = if *pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{}", json);
        }
        Command::Log(log) => run_log(log, db, now)?,
        Command::Goal(goal) => run_goal(goal, db, now.date())?,
        Command::Budget(BudgetCommand::Set { category, amount }) => {
            db.set_budget(&BudgetRecord {
                category: category.clone(),
                amount: *amount,
            })?;
            println!("Budget for '{}' set to {:.2}/month", category, amount);
        }
    }

    Ok(())
}

fn run_log(log: &LogCommand, db: &Database, now: NaiveDateTime) -> Result<()> {
    match log {
        LogCommand::Activity {
            kind,
            amount,
            date,
            notes,
        } => {
            let activity = ActivityRecord::new(
                kind.clone(),
                *amount,
                parse_date_arg(date.as_deref(), now)?,
                notes.clone(),
            );
            db.log_activity(&activity)?;
            println!("Logged {} {} ({})", amount, kind, activity.id);
        }
        LogCommand::Journal {
            content,
            mood,
            tags,
            date,
        } => {
            let entry = JournalEntry::new(
                parse_date_arg(date.as_deref(), now)?,
                content.clone(),
                mood.as_deref().and_then(Mood::parse_lenient),
                tags.iter().filter(|t| !t.is_empty()).cloned().collect(),
            );
            db.insert_entry(&entry)?;
            println!("Journal entry saved ({})", entry.id);
        }
        LogCommand::Expense {
            amount,
            category,
            description,
            date,
        } => {
            let expense = ExpenseRecord::new(
                parse_date_arg(date.as_deref(), now)?,
                *amount,
                category.clone(),
                description.clone(),
            );
            db.insert_expense(&expense)?;
            println!("Recorded {:.2} on {} ({})", amount, category, expense.id);
        }
    }
    Ok(())
}

fn run_goal(goal: &GoalCommand, db: &Database, today: NaiveDate) -> Result<()> {
    match goal {
        GoalCommand::Add {
            name,
            target,
            category,
            bucket,
            due,
        } => {
            let bucket: GoalBucket = bucket
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("invalid --bucket")?;
            let target_date = due
                .as_deref()
                .map(|d| {
                    NaiveDate::parse_from_str(d, "%Y-%m-%d")
                        .with_context(|| format!("invalid --due date: {}", d))
                })
                .transpose()?;
            let record = GoalRecord::new(name.clone(), category.clone(), *target, target_date, today);
            db.insert_goal(bucket, &record)?;
            println!("Goal '{}' added ({})", name, record.id);
        }
        GoalCommand::Complete { id } => {
            db.complete_goal(id, today)
                .with_context(|| format!("failed to complete goal {}", id))?;
            println!("Goal {} completed", id);
        }
        GoalCommand::List { bucket } => {
            let bucket: GoalBucket = bucket
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("invalid --bucket")?;
            for goal in db.goals(bucket)? {
                let due = goal
                    .target_date
                    .map(|d| format!(" due {}", d))
                    .unwrap_or_default();
                println!(
                    "{}  [{}] {} ({}/{}{})",
                    goal.id,
                    goal.status.as_str(),
                    goal.name,
                    goal.current,
                    goal.target,
                    due
                );
            }
        }
    }
    Ok(())
}

/// Parse an optional date argument; bare dates land at midnight.
fn parse_date_arg(arg: Option<&str>, now: NaiveDateTime) -> Result<NaiveDateTime> {
    match arg {
        None => Ok(now),
        Some(s) => parse_timestamp(s).with_context(|| format!("invalid date: {}", s)),
    }
}
