use std::process;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use droidmoe::WebScraper;
use droidmoe::types::{ScoreKind, ScoreRequest, UserRequest};

#[derive(Parser)]
#[command(name = "droidmoe")]
#[command(about = "An osudroid.moe profile scraper", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a user profile: ranks, ranked score, dpp, accuracy, playcount
    User {
        #[arg(long, help = "UID of the osu!droid account")]
        uid: u32,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Fetch a user's top or recent scores
    Scores {
        #[arg(long, help = "UID of the osu!droid account")]
        uid: u32,

        #[arg(
            long,
            default_value = "top",
            value_parser = parse_kind,
            help = "Which score list to fetch: 'top' or 'recent'"
        )]
        kind: ScoreKind,

        #[arg(
            long,
            help = "Maximum number of scores to return (the site renders at most 50)"
        )]
        limit: Option<u32>,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn parse_kind(s: &str) -> Result<ScoreKind, String> {
    ScoreKind::from_str(s).map_err(|e| e.to_string())
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let scraper = WebScraper::new().unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    match cli.command {
        Commands::User { uid, format } => {
            let request = UserRequest { uid, page: None };

            let user = scraper.fetch_user(&request).await.unwrap_or_else(|e| {
                log::error!("Error fetching user {}: {}", uid, e);
                process::exit(1);
            });

            match user {
                Some(user) => match format {
                    OutputFormat::Json => serialize_json(&user),
                    OutputFormat::Text => println!("{}", user),
                },
                None => println!("User {} was not found.", uid),
            }
        }

        Commands::Scores {
            uid,
            kind,
            limit,
            format,
        } => {
            let request = ScoreRequest {
                uid,
                page: None,
                kind,
                limit,
            };

            let scores = scraper.fetch_scores(&request).await.unwrap_or_else(|e| {
                log::error!("Error fetching {} scores for {}: {}", kind, uid, e);
                process::exit(1);
            });

            match scores {
                Some(scores) => match format {
                    OutputFormat::Json => serialize_json(&scores),
                    OutputFormat::Text => {
                        if scores.is_empty() {
                            println!("No {} scores to display.", kind);
                        } else {
                            for (i, score) in scores.iter().enumerate() {
                                println!("{:>3}. {}", i + 1, score);
                            }
                            println!("Total: {} score(s)", scores.len());
                        }
                    }
                },
                None => println!("User {} was not found.", uid),
            }
        }
    }
}
