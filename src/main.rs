use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fmt::Display;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracer_picker::assign::{Competition, Run, RunAssigner};
use tracer_picker::committee::CommitteeCode;
use tracer_picker::history::{history_key, load_history, save_history};
use tracer_picker::Error;

const EXIT_SUCCESS: i32 = 0;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_VALIDATION: i32 = 5;
const EXIT_SCHEDULING: i32 = 6;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Propose trace committees for a competition's four runs
    Draw {
        /// Competition date (DD/MM/YYYY)
        #[arg(long)]
        date: String,

        /// Competition location
        #[arg(long)]
        location: String,

        /// Discipline code (e.g. SL, GS)
        #[arg(long)]
        discipline: String,

        /// Competition code
        #[arg(long)]
        code: String,

        /// Organizing committee, which traces runs 1 and 3
        #[arg(long)]
        organizer: String,

        /// File listing one committee code per competitor, or - for stdin
        #[arg(long)]
        competitors: PathBuf,

        /// Give a drawn run to another candidate, e.g. --override 2=MB
        #[arg(long = "override", value_name = "RUN=CODE")]
        overrides: Vec<String>,

        /// Record the result in the history ledger
        #[arg(long)]
        confirm: bool,
    },
    /// Show per-committee history statistics
    Stats,
    /// Print the history key a competition is stored under
    Key {
        #[arg(long)]
        date: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        discipline: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "tracer-picker")]
#[command(about = "Assigns course-setting duty for ski competition runs", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/tracer-picker/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn exit_with(code: i32, message: impl Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(code);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with(EXIT_IO, format!("Failed to serialize output: {}", e)),
    }
}

fn read_competitors(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        std::fs::read_to_string(path)
    }
}

fn parse_override(raw: &str) -> Result<(Run, CommitteeCode), String> {
    let (run, committee) = raw
        .split_once('=')
        .ok_or_else(|| format!("Invalid override '{}': expected RUN=CODE", raw))?;
    let run: Run = run.parse()?;
    let committee: CommitteeCode = committee.parse().map_err(|e| format!("{}", e))?;
    Ok((run, committee))
}

fn parse_date_or_exit(date: &str) -> chrono::NaiveDate {
    match tracer_picker::date::parse_date(date) {
        Ok(d) => d,
        Err(e) => exit_with(
            EXIT_VALIDATION,
            format!("Invalid date '{}', expected DD/MM/YYYY: {}", date, e),
        ),
    }
}

fn main() {
    let cli = Cli::parse();
    tracer_picker::logging::init_tracing(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);
    let config = match tracer_picker::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };

    if let Err(errors) = tracer_picker::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let history_path = match config.history_path() {
        Ok(p) => p,
        Err(e) => exit_with(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };

    match cli.command {
        Commands::Key {
            date,
            location,
            discipline,
        } => {
            let date = parse_date_or_exit(&date);
            println!("{}", history_key(date, &location, &discipline));
        }
        Commands::Stats => {
            let mut history = load_history(&history_path);
            if let Some(season) = &config.season {
                history = history.within_season(season);
            }
            print_json(&history.summary());
        }
        Commands::Draw {
            date,
            location,
            discipline,
            code,
            organizer,
            competitors,
            overrides,
            confirm,
        } => {
            let organizer: CommitteeCode = match organizer.parse() {
                Ok(c) => c,
                Err(e) => exit_with(EXIT_VALIDATION, format!("Organizer: {}", e)),
            };
            let competition = Competition {
                date: parse_date_or_exit(&date),
                location,
                discipline,
                competition_code: code,
                organizer,
            };

            let overrides: Vec<(Run, CommitteeCode)> = match overrides
                .iter()
                .map(|raw| parse_override(raw))
                .collect::<Result<Vec<_>, String>>()
            {
                Ok(o) => o,
                Err(e) => exit_with(EXIT_VALIDATION, e),
            };

            let content = match read_competitors(&competitors) {
                Ok(c) => c,
                Err(e) => exit_with(
                    EXIT_IO,
                    format!(
                        "Failed to read competitors from {}: {}",
                        competitors.display(),
                        e
                    ),
                ),
            };
            let raw_codes = content
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty());

            let history = load_history(&history_path);
            let assigner = RunAssigner::new(config.effective_scoring(), config.draw_policy())
                .with_season(config.season);

            let mut proposal = match assigner.propose_from_registrations(
                competition,
                raw_codes,
                &config.tally_config(),
                &history,
            ) {
                Ok(p) => p,
                Err(e @ Error::Validation(_)) => {
                    exit_with(EXIT_VALIDATION, format!("Validation error: {}", e))
                }
                Err(e @ Error::Scheduling(_)) => {
                    exit_with(EXIT_SCHEDULING, format!("Scheduling error: {}", e))
                }
            };

            for (run, committee) in overrides {
                if let Err(e) = proposal.override_run(run, committee) {
                    exit_with(EXIT_SCHEDULING, format!("Override rejected: {}", e));
                }
            }

            let result = if confirm {
                let (result, history) = proposal.confirm(history);
                if let Err(e) = save_history(&history_path, &history) {
                    exit_with(EXIT_IO, format!("Failed to save history: {:#}", e));
                }
                result
            } else {
                proposal.into_result()
            };

            print_json(&result);
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
