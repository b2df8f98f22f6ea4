//! quizloop CLI: play quizzes in the terminal and inspect the results.

use std::path::PathBuf;
use std::process;

use clap::{ArgGroup, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quizloop",
    version,
    about = "Multiple-choice quizzes with review rounds until every question is fixed"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz interactively
    #[command(group(
        ArgGroup::new("source")
            .required(true)
            .args(["file", "quiz", "resume"])
    ))]
    Play {
        /// Path to a CSV quiz file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Quiz file name in the configured catalog
        #[arg(long)]
        quiz: Option<String>,

        /// Continue the last unfinished quiz
        #[arg(long)]
        resume: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for saved progress and results
        #[arg(long)]
        state_dir: Option<PathBuf>,
    },

    /// Show the results of the last finished quiz
    Results {
        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for saved progress and results
        #[arg(long)]
        state_dir: Option<PathBuf>,
    },

    /// List the quizzes in the configured catalog
    List {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a CSV quiz file and report rejected rows
    Validate {
        /// Path to a CSV quiz file
        #[arg(long)]
        file: PathBuf,
    },

    /// Create a starter config and a sample quiz
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizloop=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            file,
            quiz,
            resume,
            config,
            state_dir,
        } => {
            let source = match (file, quiz) {
                (Some(file), _) => commands::play::Source::File(file),
                (None, Some(quiz)) => commands::play::Source::Catalog(quiz),
                (None, None) => {
                    debug_assert!(resume);
                    commands::play::Source::Resume
                }
            };
            commands::play::execute(source, config, state_dir).await
        }
        Commands::Results {
            format,
            output,
            config,
            state_dir,
        } => commands::results::execute(format, output, config, state_dir),
        Commands::List { config } => commands::list::execute(config).await,
        Commands::Validate { file } => commands::validate::execute(file),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
