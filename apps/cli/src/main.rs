use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use meeting_bot_core::{ApiConfig, MeetingType};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod notifier;

/// CLI wrapper for MeetingType (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliMeetingType {
    #[default]
    TeamMeeting,
    Interview,
    ClientCall,
    Standup,
}

impl From<CliMeetingType> for MeetingType {
    fn from(cli: CliMeetingType) -> Self {
        match cli {
            CliMeetingType::TeamMeeting => MeetingType::TeamMeeting,
            CliMeetingType::Interview => MeetingType::Interview,
            CliMeetingType::ClientCall => MeetingType::ClientCall,
            CliMeetingType::Standup => MeetingType::Standup,
        }
    }
}

#[derive(Parser)]
#[command(name = "meeting-bot")]
#[command(about = "Upload a recording or paste a transcript to generate a meeting summary")]
struct Cli {
    /// API host, https:// is assumed when no scheme is given [env: MEETING_BOT_API_URL]
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a meeting and show the generated summary
    Create {
        /// Meeting title
        #[arg(short, long)]
        title: String,

        /// Meeting type
        #[arg(short = 'k', long = "type", default_value = "team-meeting")]
        meeting_type: CliMeetingType,

        /// Transcript text
        #[arg(long, conflicts_with = "transcript_file")]
        transcript: Option<String>,

        /// Read the transcript from a text file
        #[arg(long)]
        transcript_file: Option<PathBuf>,

        /// Audio or video recording to upload
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// List past meetings
    History {
        /// Case-insensitive title search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact meeting type, e.g. "Standup"
        #[arg(short = 'k', long = "type", default_value = "")]
        filter_type: String,
    },
    /// Open a past meeting's report
    View { id: i64 },
    /// Show a meeting's stored details, including its transcript
    Show { id: i64 },
    /// Delete a meeting
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Keep the row unless the server confirms the delete
        #[arg(long)]
        strict: bool,
    },
    /// Print the most recent result
    Result {
        /// Forget the saved result instead of printing it
        #[arg(long)]
        clear: bool,
    },
}

pub(crate) fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.api_url {
        Some(url) => ApiConfig::new(url),
        None => ApiConfig::from_env(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let app = commands::App::new(config);

    let outcome = match cli.command {
        Command::Create {
            title,
            meeting_type,
            transcript,
            transcript_file,
            file,
        } => {
            app.create(title, meeting_type.into(), transcript, transcript_file, file)
                .await
        }
        Command::History {
            search,
            filter_type,
        } => app.history(&search, &filter_type).await,
        Command::View { id } => app.view(id).await,
        Command::Show { id } => app.show(id).await,
        Command::Delete { id, yes, strict } => app.delete(id, yes, strict).await,
        Command::Result { clear } => app.result(clear).await,
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
