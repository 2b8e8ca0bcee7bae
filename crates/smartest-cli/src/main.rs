//! smartest CLI — grade quiz answers from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "smartest",
    version,
    about = "Heuristic grader for AI-course quiz answers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one answer against a reference answer
    Evaluate {
        /// The correct answer
        #[arg(long)]
        reference: String,

        /// The answer to score
        #[arg(long)]
        answer: String,

        /// Topic id whose keywords are used (e.g. "n-queens")
        #[arg(long)]
        topic: Option<String>,

        /// Comma-separated keywords; wins over --topic
        #[arg(long)]
        keywords: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Grade a sheet of responses against an answer key
    Grade {
        /// Question sheet
        #[arg(long)]
        questions: PathBuf,

        /// Answer key sheet
        #[arg(long)]
        key: PathBuf,

        /// Responses sheet
        #[arg(long)]
        responses: PathBuf,

        /// Output directory
        #[arg(long, default_value = "./smartest-results")]
        output: PathBuf,

        /// Output format: text, json, html, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Report title (defaults to the question sheet name)
        #[arg(long)]
        title: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two grade reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Minimum score change, in points, that counts
        #[arg(long, default_value = "5")]
        threshold: f64,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check a question sheet against its answer key
    Validate {
        /// Question sheet
        #[arg(long)]
        questions: PathBuf,

        /// Answer key sheet
        #[arg(long)]
        key: PathBuf,
    },

    /// List topics and their keywords
    Topics {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and example sheets
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("smartest=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            reference,
            answer,
            topic,
            keywords,
            config,
            format,
        } => commands::evaluate::execute(reference, answer, topic, keywords, config, format),
        Commands::Grade {
            questions,
            key,
            responses,
            output,
            format,
            title,
            config,
        } => commands::grade::execute(questions, key, responses, output, format, title, config),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Validate { questions, key } => commands::validate::execute(questions, key),
        Commands::Topics { config } => commands::topics::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
