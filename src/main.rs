//! # BizReach — company outreach tracker
//!
//! Keeps the list of companies, the communication cadence, and the log of
//! past communications, and tells you who is overdue or due today.
//!
//! Usage:
//!   bizreach init --demo                          # Write config + demo data
//!   bizreach company add --name "Tech Corp" --location Hyderabad
//!   bizreach log --company <ID> --type Email --notes "Intro"
//!   bizreach dashboard                            # Status, history, next step
//!   bizreach notifications                        # Overdue + due today
//!   bizreach watch --interval 600                 # Periodic reminders

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use bizreach_core::config::{ReachConfig, StorageBackend};
use bizreach_core::traits::clock::SystemClock;
use bizreach_core::traits::ids::UuidIds;
use bizreach_core::types::{CompanyPatch, MethodPatch, NewCommunication, NewCompany, NewMethod};
use bizreach_scheduler::{
    CompanyStatus, JsonFileStore, OutreachEngine, SnapshotStore, SqliteStore, seed,
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bizreach",
    version,
    about = "📬 BizReach — company outreach tracker"
)]
struct Cli {
    /// Config file (default: ~/.bizreach/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Data file, overrides `storage.path` from the config
    #[arg(long)]
    data: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config and, optionally, demo data
    Init {
        /// Seed five demo companies with history
        #[arg(long)]
        demo: bool,
        /// Overwrite an existing config / data file
        #[arg(long)]
        force: bool,
    },
    /// Manage companies
    #[command(subcommand)]
    Company(CompanyCommand),
    /// Manage communication methods
    #[command(subcommand)]
    Method(MethodCommand),
    /// Log a communication for one or more companies
    Log {
        /// Company id (repeatable)
        #[arg(long = "company", required = true)]
        companies: Vec<String>,
        /// Method name, e.g. "Email"
        #[arg(long = "type")]
        kind: String,
        /// YYYY-MM-DD or RFC 3339 (default: now)
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Communication history of a company, newest first
    History {
        company: String,
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Every company with its status, recent history, and next step
    Dashboard {
        #[arg(long)]
        json: bool,
    },
    /// Overdue and due-today companies
    Notifications {
        #[arg(long)]
        json: bool,
    },
    /// Print reminders periodically until interrupted
    Watch {
        /// Seconds between checks (default: reminder.check_interval_secs)
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[derive(Args)]
struct CompanyFields {
    #[arg(long)]
    linkedin: Option<String>,
    /// Contact email (repeatable)
    #[arg(long = "email")]
    emails: Vec<String>,
    /// Contact phone number (repeatable)
    #[arg(long = "phone")]
    phones: Vec<String>,
    #[arg(long)]
    comments: Option<String>,
    /// Days between communications
    #[arg(long)]
    periodicity: Option<u32>,
}

#[derive(Subcommand)]
enum CompanyCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        #[command(flatten)]
        fields: CompanyFields,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Remove the LinkedIn profile
        #[arg(long, conflicts_with = "linkedin")]
        clear_linkedin: bool,
        #[command(flatten)]
        fields: CompanyFields,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
    List,
    Show {
        id: String,
    },
}

#[derive(Subcommand)]
enum MethodCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Cadence position (default: after the last method)
        #[arg(long)]
        sequence: Option<u32>,
        #[arg(long)]
        mandatory: bool,
        #[arg(long)]
        id: Option<String>,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        sequence: Option<u32>,
        #[arg(long)]
        mandatory: Option<bool>,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
    List,
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

/// `YYYY-MM-DD` (midnight UTC) or RFC 3339.
fn parse_when(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}' (expected YYYY-MM-DD or RFC 3339)"))?;
    match date.and_hms_opt(0, 0, 0) {
        Some(midnight) => Ok(midnight.and_utc()),
        None => bail!("invalid date '{raw}'"),
    }
}

fn open_store(config: &ReachConfig, path: &Path) -> Result<Box<dyn SnapshotStore>> {
    Ok(match config.storage.backend {
        StorageBackend::Json => Box::new(JsonFileStore::new(path)),
        StorageBackend::Sqlite => Box::new(SqliteStore::open(path)?),
    })
}

fn status_icon(status: CompanyStatus) -> &'static str {
    match status {
        CompanyStatus::Overdue => "🔴",
        CompanyStatus::DueToday => "🟡",
        CompanyStatus::Normal => "🟢",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "bizreach=debug,bizreach_scheduler=debug,bizreach_core=debug"
    } else {
        "bizreach=info,bizreach_scheduler=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config_path = cli
        .config
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(ReachConfig::default_path);
    let config = match &cli.config {
        None => ReachConfig::load()?,
        Some(_) if config_path.exists() => ReachConfig::load_from(&config_path)?,
        Some(_) => ReachConfig::default(),
    };
    let data_path = cli
        .data
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(|| config.storage_path());

    if let Command::Init { demo, force } = &cli.command {
        return init(&config, &config_path, &data_path, *demo, *force);
    }

    let mut engine = OutreachEngine::open(
        &config,
        Arc::new(SystemClock),
        Arc::new(UuidIds),
        open_store(&config, &data_path)?,
    )?;

    match cli.command {
        Command::Init { .. } => unreachable!("handled above"),
        Command::Company(cmd) => company_command(&mut engine, cmd)?,
        Command::Method(cmd) => method_command(&mut engine, cmd)?,
        Command::Log {
            companies,
            kind,
            date,
            notes,
        } => {
            let timestamp = match date {
                Some(raw) => parse_when(&raw)?,
                None => engine.now(),
            };
            let input = NewCommunication::new(kind, timestamp).with_notes(notes);
            let records = engine.record_communication_bulk(&companies, input)?;
            for record in &records {
                println!(
                    "✅ Logged '{}' for {} (sequence {})",
                    record.kind, record.company_id, record.sequence
                );
            }
        }
        Command::History { company, limit } => {
            let records = match limit {
                Some(n) => engine.last_n_communications(&company, n),
                None => engine.all_communications(&company),
            };
            if records.is_empty() {
                println!("No communications logged for {company}.");
            }
            for r in records {
                println!(
                    "{}  #{:<2} {:<18} {}",
                    r.timestamp.format("%Y-%m-%d"),
                    r.sequence,
                    r.kind,
                    if r.notes.is_empty() { "No notes" } else { r.notes.as_str() }
                );
            }
        }
        Command::Dashboard { json } => {
            let rows = engine.dashboard(engine.now());
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in &rows {
                    println!(
                        "{} {} ({}) — {}",
                        status_icon(row.status),
                        row.company.name,
                        row.company.id,
                        row.status
                    );
                    for r in &row.recent {
                        println!("     {}  {}", r.timestamp.format("%Y-%m-%d"), r.kind);
                    }
                    if let Some(next) = &row.next {
                        println!(
                            "     ➡️  next: {} on {}",
                            next.kind,
                            next.date.format("%Y-%m-%d")
                        );
                    }
                }
            }
        }
        Command::Notifications { json } => {
            let summary = engine.notifications(engine.now());
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else if summary.is_empty() {
                println!("✅ Nothing overdue or due today");
            } else {
                println!("🔔 Notifications: {}", summary.count());
                println!("\nOverdue Communications");
                for n in &summary.overdue {
                    println!("   {}", n.message);
                }
                println!("\nToday's Communications");
                for n in &summary.due_today {
                    println!("   {}", n.message);
                }
            }
        }
        Command::Watch { interval } => {
            let interval = interval.unwrap_or(config.reminder.check_interval_secs);
            let shared = Arc::new(Mutex::new(engine));
            tokio::select! {
                _ = bizreach_scheduler::spawn_reminder_loop(shared, interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("👋 Stopping reminders");
                }
            }
        }
    }

    Ok(())
}

fn init(
    config: &ReachConfig,
    config_path: &Path,
    data_path: &Path,
    demo: bool,
    force: bool,
) -> Result<()> {
    println!("📬 BizReach — Setup\n");

    if config_path.exists() && !force {
        println!("⚠️  Config already exists: {}", config_path.display());
    } else {
        config.save_to(config_path)?;
        println!("✅ Config written: {}", config_path.display());
    }

    let store = open_store(config, data_path)?;
    let existing = store.load()?;
    if !existing.is_empty() && !force {
        println!("⚠️  Data already exists: {}", store.location());
        return Ok(());
    }

    let snapshot = if demo {
        seed::demo_snapshot(&UuidIds, Utc::now())
    } else {
        OutreachEngine::with_defaults(config).snapshot()
    };
    store.save(&snapshot)?;
    println!(
        "✅ Data written: {} ({} companies, {} methods)",
        store.location(),
        snapshot.companies.len(),
        snapshot.communication_methods.len()
    );
    Ok(())
}

fn company_command(engine: &mut OutreachEngine, cmd: CompanyCommand) -> Result<()> {
    match cmd {
        CompanyCommand::Add {
            name,
            location,
            fields,
        } => {
            let input = NewCompany {
                name,
                location,
                linkedin_profile: fields.linkedin,
                emails: (!fields.emails.is_empty()).then_some(fields.emails),
                phone_numbers: (!fields.phones.is_empty()).then_some(fields.phones),
                comments: fields.comments.unwrap_or_default(),
                communication_periodicity: fields.periodicity,
            };
            let company = engine.add_company(input)?;
            println!("✅ Company added: {} ({})", company.name, company.id);
        }
        CompanyCommand::Update {
            id,
            name,
            location,
            clear_linkedin,
            fields,
        } => {
            let patch = CompanyPatch {
                id,
                name,
                location,
                linkedin_profile: if clear_linkedin {
                    Some(None)
                } else {
                    fields.linkedin.map(Some)
                },
                emails: (!fields.emails.is_empty()).then_some(fields.emails),
                phone_numbers: (!fields.phones.is_empty()).then_some(fields.phones),
                comments: fields.comments,
                communication_periodicity: fields.periodicity,
            };
            let company = engine.update_company(patch)?;
            println!("✅ Company updated: {} ({})", company.name, company.id);
        }
        CompanyCommand::Delete { id } => {
            if engine.delete_company(&id) {
                println!("🗑️  Company deleted: {id}");
            } else {
                println!("Nothing to delete: {id}");
            }
        }
        CompanyCommand::List => {
            let now = engine.now();
            for c in engine.companies() {
                let status = engine.policy().status(c, now);
                println!(
                    "{} {:<38} {:<24} {:<12} every {}d",
                    status_icon(status),
                    c.id,
                    c.name,
                    c.location,
                    c.communication_periodicity
                );
            }
        }
        CompanyCommand::Show { id } => {
            let Some(company) = engine.company(&id) else {
                bail!("company not found: {id}");
            };
            println!("{}", serde_json::to_string_pretty(company)?);
            if let Some(next) = engine.next_scheduled_communication(&id) {
                println!("➡️  next: {} on {}", next.kind, next.date.format("%Y-%m-%d"));
            }
        }
    }
    Ok(())
}

fn method_command(engine: &mut OutreachEngine, cmd: MethodCommand) -> Result<()> {
    match cmd {
        MethodCommand::Add {
            name,
            description,
            sequence,
            mandatory,
            id,
        } => {
            let method = engine.add_method(NewMethod {
                id,
                name,
                description,
                sequence,
                is_mandatory: mandatory,
            })?;
            println!("✅ Method added: {} (sequence {})", method.name, method.sequence);
        }
        MethodCommand::Update {
            id,
            name,
            description,
            sequence,
            mandatory,
        } => {
            let method = engine.update_method(MethodPatch {
                id,
                name,
                description,
                sequence,
                is_mandatory: mandatory,
            })?;
            println!("✅ Method updated: {} (sequence {})", method.name, method.sequence);
        }
        MethodCommand::Delete { id } => {
            if engine.delete_method(&id) {
                println!("🗑️  Method deleted: {id}");
            } else {
                println!("Nothing to delete: {id}");
            }
        }
        MethodCommand::List => {
            for m in engine.methods() {
                println!(
                    "{:>3}. {:<20} {:<10} {}",
                    m.sequence,
                    m.name,
                    if m.is_mandatory { "Mandatory" } else { "Optional" },
                    m.description
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_when_date_only() {
        let t = parse_when("2026-03-05").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_when_rfc3339() {
        let t = parse_when("2026-03-05T10:30:00+02:00").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2026, 3, 5, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_when_rejects_garbage() {
        assert!(parse_when("next tuesday").is_err());
    }

    #[test]
    fn test_cli_parses_bulk_log() {
        let cli = Cli::try_parse_from([
            "bizreach", "log", "--company", "a", "--company", "b", "--type", "Email",
        ])
        .unwrap();
        match cli.command {
            Command::Log { companies, kind, .. } => {
                assert_eq!(companies, ["a", "b"]);
                assert_eq!(kind, "Email");
            }
            _ => panic!("expected log command"),
        }
    }
}
