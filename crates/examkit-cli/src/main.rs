//! examkit CLI: build, take, and review timed exams from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(name = "examkit", version, about = "Timed exam builder and trainer")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example exam
    Init,

    /// Validate exam TOML files
    Validate {
        /// Path to exam file or directory
        #[arg(long)]
        exam: PathBuf,
    },

    /// Import exams into the store, replacing any with the same id
    Import {
        /// Path to exam file or directory
        #[arg(long)]
        exam: PathBuf,
    },

    /// List stored exams
    List,

    /// Take an exam interactively
    Take {
        #[arg(long)]
        exam_id: String,
    },

    /// Submit answers from a JSON file without the interactive prompt
    Submit {
        #[arg(long)]
        exam_id: String,

        /// JSON object mapping question id to answer
        #[arg(long)]
        answers: PathBuf,
    },

    /// Show attempt history for an exam
    History {
        #[arg(long)]
        exam_id: String,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show every attempt across exams with overall statistics
    Summaries {
        /// Output format: text or json
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Write an HTML report of all history
    Report {
        #[arg(long, default_value = "examkit-report.html")]
        output: PathBuf,
    },

    /// Manage folders
    Folders {
        #[command(subcommand)]
        command: FolderCommands,
    },
}

#[derive(Subcommand)]
enum FolderCommands {
    /// Create a folder
    Create {
        #[arg(long)]
        name: String,

        /// Opaque icon payload (emoji, name, or data URL)
        #[arg(long)]
        icon: Option<String>,
    },

    /// List folders
    List,

    /// File an exam under a folder, or remove it when no folder is given
    Assign {
        #[arg(long)]
        exam_id: String,

        #[arg(long)]
        folder_id: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examkit=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { exam } => commands::validate::execute(exam, config),
        Commands::Import { exam } => commands::import::execute(exam, config),
        Commands::List => commands::list::execute(config).await,
        Commands::Take { exam_id } => commands::take::execute(exam_id, config).await,
        Commands::Submit { exam_id, answers } => {
            commands::submit::execute(exam_id, answers, config)
        }
        Commands::History { exam_id, format } => {
            commands::history::execute(exam_id, format, config)
        }
        Commands::Summaries { format } => commands::summaries::execute(format, config),
        Commands::Report { output } => commands::report::execute(output, config),
        Commands::Folders { command } => match command {
            FolderCommands::Create { name, icon } => {
                commands::folders::create(name, icon, config).await
            }
            FolderCommands::List => commands::folders::list(config).await,
            FolderCommands::Assign { exam_id, folder_id } => {
                commands::folders::assign(exam_id, folder_id, config).await
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
