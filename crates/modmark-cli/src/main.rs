//! The `modmark` binary: rubric authoring and feedback from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "modmark", version, about = "Rubric authoring and feedback for modmark")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a rubric from a spreadsheet (.csv, .xlsx, .xls, .ods)
    Import {
        /// Spreadsheet to read (first sheet only)
        #[arg(long)]
        file: PathBuf,

        /// Write the parsed matrix as JSON
        #[arg(long)]
        out: Option<PathBuf>,

        /// Create the rubric on the backend after importing
        #[arg(long)]
        create: bool,

        /// Section that will own the created rubric
        #[arg(long)]
        section: Option<String>,
    },

    /// Export a rubric matrix to CSV in the import layout
    Export {
        /// Matrix JSON file or spreadsheet
        #[arg(long)]
        file: PathBuf,

        /// CSV file to write
        #[arg(long)]
        out: PathBuf,
    },

    /// Check a rubric matrix for missing or invalid fields
    Validate {
        /// Matrix JSON file or spreadsheet
        #[arg(long)]
        file: PathBuf,
    },

    /// List the rubrics of a section
    List {
        #[arg(long)]
        section: String,
    },

    /// Show a stored rubric
    Show {
        #[arg(long)]
        id: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create a rubric on the backend
    Create {
        /// Matrix JSON file or spreadsheet
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        section: Option<String>,
    },

    /// Replace a stored rubric's contents
    Update {
        #[arg(long)]
        id: String,

        /// Matrix JSON file or spreadsheet
        #[arg(long)]
        file: PathBuf,
    },

    /// Delete a stored rubric
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Render feedback for a graded submission
    Feedback {
        /// Rubric document JSON file, or a rubric id to fetch
        #[arg(long)]
        rubric: String,

        /// Submission grades JSON file
        #[arg(long)]
        grades: PathBuf,

        /// Output format: text, markdown, html, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Label for the submission shown in the report
        #[arg(long)]
        subject: Option<String>,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Create a starter modmark.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("modmark=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Import {
            file,
            out,
            create,
            section,
        } => commands::import::execute(file, out, create, section, config).await,
        Commands::Export { file, out } => commands::export::execute(file, out),
        Commands::Validate { file } => commands::validate::execute(file),
        Commands::List { section } => commands::rubric::list(section, config).await,
        Commands::Show { id, format } => commands::rubric::show(id, format, config).await,
        Commands::Create { file, section } => {
            commands::rubric::create(file, section, config).await
        }
        Commands::Update { id, file } => commands::rubric::update(id, file, config).await,
        Commands::Delete { id } => commands::rubric::delete(id, config).await,
        Commands::Feedback {
            rubric,
            grades,
            format,
            subject,
            out,
        } => commands::feedback::execute(rubric, grades, format, subject, out, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
