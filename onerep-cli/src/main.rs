mod tui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use onerep::config::{DurationSettings, Settings};
use onerep::cues::{ChannelCueSink, CueDispatcher};
use onerep::db::SqliteStore;
use onerep::exercise::{ProfileId, Routine};
use onerep::logging::{init_logger, init_logger_with_target, parse_level};
use onerep::phase::PhaseKind;
use onerep::session::{Collaborators, SessionOrchestrator};
use onerep::store::{LogStore, ProfileService, seed_default_routine};

#[derive(Parser, Debug)]
#[command(version, about = "OneRep - single set to failure workout timer", long_about = None)]
struct Args {
    /// SQLite database holding routines and the set log
    #[arg(long, env = "ONEREP_DATABASE_URL", default_value = "onerep.db")]
    database: String,
    /// JSON settings file with phase durations and cue options
    #[arg(long, env = "ONEREP_SETTINGS", default_value = "onerep-settings.json")]
    settings: PathBuf,
    #[arg(short, long, default_value_t = 1)]
    profile: u32,
    #[arg(long, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a workout in the terminal
    Run {
        /// Alternate sets with this second profile
        #[arg(long)]
        partner: Option<u32>,
        /// Where log output goes while the screen is in use
        #[arg(long, default_value = "onerep.log")]
        log_file: PathBuf,
    },
    /// List logged sets, newest first
    History {
        #[arg(short, long)]
        exercise: Option<String>,
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Heaviest logged weight per exercise
    Records,
    /// Show phase durations, or change them with --set phase=seconds
    Settings {
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, u32)>,
    },
    /// Give the profile the default Full Body routine
    Seed {
        /// Replace an existing routine
        #[arg(long)]
        force: bool,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, u32), String> {
    let (phase, seconds) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected phase=seconds, got `{raw}`"))?;
    let seconds = seconds
        .trim()
        .parse()
        .map_err(|e| format!("bad seconds in `{raw}`: {e}"))?;
    Ok((phase.trim().to_string(), seconds))
}

fn print_durations(settings: &Settings) {
    for phase in PhaseKind::TIMED {
        println!(
            "{:<16}{:>4}s",
            phase.display_name(),
            settings.durations.duration_for(phase)
        );
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    let level = parse_level(&args.log_level)
        .with_context(|| format!("unknown log level `{}`", args.log_level))?;
    let profile = ProfileId(args.profile);

    match args.command {
        Commands::Run { partner, log_file } => {
            let file = std::fs::File::create(&log_file)
                .with_context(|| format!("cannot write log file {}", log_file.display()))?;
            init_logger_with_target(level, env_logger::Target::Pipe(Box::new(file)));

            let store = Arc::new(SqliteStore::open(&args.database)?);
            let settings = Settings::load(&args.settings)?;
            for p in std::iter::once(profile).chain(partner.map(ProfileId)) {
                if seed_default_routine(store.as_ref(), p)? {
                    info!("Seeded default routine for {}", p);
                }
            }

            let (cue_tx, cue_rx) = mpsc::unbounded_channel();
            let mut engine = SessionOrchestrator::new(
                profile,
                DurationSettings::new(settings.durations),
                Collaborators {
                    log_store: store.clone(),
                    profiles: store.clone(),
                    cue_sink: Box::new(ChannelCueSink::new(cue_tx)),
                },
            )
            .with_dispatcher(CueDispatcher::new(settings.cues.clone()))
            .with_workout_type(settings.workout_type.clone());

            if let Some(other) = partner {
                anyhow::ensure!(
                    engine.start_partner_mode(profile, ProfileId(other)),
                    "partner must be a different profile than {}",
                    profile
                );
            }

            let terminal = ratatui::init();
            let result = tui::run(terminal, engine, cue_rx).await;
            ratatui::restore();
            result
        }
        Commands::History { exercise, limit } => {
            init_logger(level);
            let store = SqliteStore::open(&args.database)?;
            let entries = store.history(profile, exercise.as_deref(), limit)?;
            if entries.is_empty() {
                println!("No sets logged for {}", profile);
            }
            for entry in entries {
                println!(
                    "{}  {:<20}{:>12}{}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.exercise_name,
                    entry.value.to_string(),
                    if entry.reached_failure { "  to failure" } else { "" }
                );
            }
            Ok(())
        }
        Commands::Records => {
            init_logger(level);
            let store = SqliteStore::open(&args.database)?;
            for record in store.personal_records(profile)? {
                println!("{:<20}{:>8.1} lbs", record.exercise_name, record.weight);
            }
            Ok(())
        }
        Commands::Settings { set } => {
            init_logger(level);
            let mut settings = Settings::load(&args.settings)?;
            for (phase, seconds) in &set {
                let stored = settings.set_duration(phase, *seconds)?;
                if stored != *seconds {
                    println!("{} clamped to {}s", phase, stored);
                }
            }
            if !set.is_empty() {
                settings.save(&args.settings)?;
            }
            print_durations(&settings);
            Ok(())
        }
        Commands::Seed { force } => {
            init_logger(level);
            let store = SqliteStore::open(&args.database)?;
            let seeded = if force {
                store.save_routine(profile, &Routine::full_body())?;
                true
            } else {
                seed_default_routine(&store, profile)?
            };
            if seeded {
                println!("{} now has the Full Body HIT routine", profile);
            } else {
                println!("{} already has a routine, use --force to replace it", profile);
            }
            Ok(())
        }
    }
}
