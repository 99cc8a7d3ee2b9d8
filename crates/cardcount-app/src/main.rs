use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use cardcount_app::config::AppConfig;
use cardcount_app::drill::{DrillOptions, run_drill};
use cardcount_app::logging::init_logging;
use cardcount_app::session::{OutputFormat, SessionController};
use cardcount_core::ledger::OverflowPolicy;
use cardcount_core::model::shoe::MAX_DECKS;
use cardcount_core::scoring::CountSystemKind;

/// Card counting practice at the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "cardcount",
    author,
    version,
    about = "Log dealt cards and keep a running count"
)]
struct Cli {
    /// Path to an optional YAML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log cards one gesture per line (default).
    Play(PlayArgs),
    /// Deal from a seeded shoe and print the running count.
    Drill(DrillArgs),
    /// Exit after validating the configuration.
    CheckConfig,
}

#[derive(Debug, Default, Args)]
struct PlayArgs {
    /// Override the history capacity.
    #[arg(long, value_name = "ENTRIES")]
    capacity: Option<usize>,

    /// Override the overflow policy (reject | truncate).
    #[arg(long, value_name = "POLICY")]
    overflow: Option<OverflowPolicy>,

    /// Override the count system (weighted | hi_lo).
    #[arg(long, value_name = "SYSTEM")]
    system: Option<CountSystemKind>,

    /// Override how many recent entries are shown.
    #[arg(long, value_name = "COUNT")]
    recent: Option<usize>,

    /// Output format for each gesture.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Read gestures from a file instead of stdin.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
}

impl PlayArgs {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(capacity) = self.capacity {
            config.ledger.capacity = Some(capacity);
        }
        if let Some(overflow) = self.overflow {
            config.ledger.overflow = overflow;
        }
        if let Some(system) = self.system {
            config.system = system;
        }
        if let Some(recent) = self.recent {
            config.display.recent = recent;
        }
    }
}

#[derive(Debug, Args)]
struct DrillArgs {
    /// RNG seed for the shoe (random when omitted).
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Number of 52-card decks in the shoe (1 to 8).
    #[arg(
        long,
        value_name = "DECKS",
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..=MAX_DECKS as i64)
    )]
    decks: u16,

    /// Number of cards to deal.
    #[arg(long, value_name = "CARDS", default_value_t = 52)]
    cards: usize,

    /// Count system (defaults to the configured one).
    #[arg(long, value_name = "SYSTEM")]
    system: Option<CountSystemKind>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Play(PlayArgs::default())) {
        Command::Play(args) => {
            args.apply_overrides(&mut config);
            config.validate()?;
            let _logging_guard = init_logging(&config.logging)?;

            let mut controller = SessionController::new(&config, args.format);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let summary = match args.script.as_ref() {
                Some(path) => {
                    let file = File::open(path)
                        .with_context(|| format!("opening gesture script {}", path.display()))?;
                    controller.run(BufReader::new(file), &mut out)?
                }
                None => controller.run(io::stdin().lock(), &mut out)?,
            };
            if args.format == OutputFormat::Text {
                println!(
                    "Session over: {} gesture{}, {} error{}, final count {} over {} entries",
                    summary.gestures,
                    if summary.gestures == 1 { "" } else { "s" },
                    summary.errors,
                    if summary.errors == 1 { "" } else { "s" },
                    summary.total,
                    summary.entries
                );
            }
        }
        Command::Drill(args) => {
            config.validate()?;
            let _logging_guard = init_logging(&config.logging)?;
            let options = DrillOptions {
                seed: args.seed,
                decks: usize::from(args.decks),
                cards: args.cards,
                system: args.system.unwrap_or(config.system),
            };
            let stdout = io::stdout();
            run_drill(&options, &mut stdout.lock())?;
        }
        Command::CheckConfig => {
            config.validate()?;
            println!(
                "Configuration OK: {} count, {} at {} entries, recent window {}, structured logs {}",
                config.system.as_str(),
                config.ledger.overflow.as_str(),
                config.ledger_settings().resolved_capacity(),
                config.display.recent,
                if config.logging.enable_structured { "on" } else { "off" }
            );
        }
    }

    Ok(())
}
