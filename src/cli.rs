use clap::{Args, Parser, Subcommand};

use crate::logic::analysis::{Submission, SubmitterInfo};

/// Command-line interface definition.
/// Submits content to the classification service and manages scan history.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Analyze emails, SMS messages and URLs for phishing and export PDF reports"
)]
pub struct Cli {
    /// Submitter id for stored scans (defaults to PHISHGUARD_USER_ID)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Name printed in report headers
    #[arg(long = "user-name", global = true)]
    pub user_name: Option<String>,

    /// Email printed in report headers
    #[arg(long = "user-email", global = true)]
    pub user_email: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze an email
    Email {
        /// Email body
        #[arg(long)]
        content: String,

        /// Subject line
        #[arg(long, default_value = "")]
        subject: String,

        /// Sender address
        #[arg(long)]
        sender: Option<String>,

        #[command(flatten)]
        output: AnalyzeOutput,
    },

    /// Analyze an SMS message
    Sms {
        /// Message text
        message: String,

        #[command(flatten)]
        output: AnalyzeOutput,
    },

    /// Analyze a URL
    Url {
        /// URL to check; a bare host gets http:// prefixed
        url: String,

        #[command(flatten)]
        output: AnalyzeOutput,
    },

    /// List stored scans, newest first
    History {
        #[arg(long, default_value_t = crate::constants::DEFAULT_HISTORY_LIMIT)]
        limit: usize,

        #[arg(long)]
        json: bool,
    },

    /// Show one stored scan
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Scan counters for the current user
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Export a stored scan as a PDF report
    Export { id: String },

    /// Delete a stored scan
    Delete { id: String },

    /// Check the classification service
    Health,
}

/// Output options shared by the analyze commands
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeOutput {
    /// Store the result in scan history
    #[arg(long)]
    pub save: bool,

    /// Write a PDF report to the export directory
    #[arg(long)]
    pub export: bool,

    /// Print the view model as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse CLI arguments from process args.
    pub fn from_args() -> Self {
        Self::parse()
    }

    pub fn submitter(&self) -> SubmitterInfo {
        SubmitterInfo {
            user_name: self.user_name.clone(),
            user_email: self.user_email.clone(),
        }
    }
}

impl Command {
    /// The submission and output flags for analyze commands
    pub fn analysis(&self) -> Option<(Submission, &AnalyzeOutput)> {
        match self {
            Command::Email { content, subject, sender, output } => Some((
                Submission::Email {
                    subject: subject.clone(),
                    sender_email: sender.clone(),
                    content: content.clone(),
                },
                output,
            )),
            Command::Sms { message, output } => Some((Submission::Sms { message: message.clone() }, output)),
            Command::Url { url, output } => Some((Submission::Url { url: url.clone() }, output)),
            _ => None,
        }
    }
}
