//! PhishGuard - Command-line entry point

use std::process::ExitCode;

use phishguard_core::api::commands::{self, Services, Session};
use phishguard_core::cli::{Cli, Command};
use phishguard_core::config::AppConfig;
use phishguard_core::constants;
use phishguard_core::display;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::from_args();
    let config = AppConfig::from_env();

    log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);
    log::info!("   Service: {}", config.api_url);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli, config)) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<String, String> {
    let services = Services::from_config(&config).map_err(|e| e.user_message())?;
    let session = Session {
        user_id: cli.user.clone().unwrap_or_else(|| config.user_id.clone()),
        submitter: cli.submitter(),
    };

    if let Some((submission, output)) = cli.command.analysis() {
        let outcome = commands::analyze_content(&services, &session, submission, output.save).await?;

        let mut text = if output.json {
            to_json(&outcome.view)?
        } else {
            display::render_outcome(&outcome)
        };
        if output.export {
            let path = commands::export_outcome(&services, &session, &outcome).await?;
            text.push_str(&format!("Report written to {}\n", path.display()));
        }
        return Ok(text);
    }

    match &cli.command {
        Command::History { limit, json } => {
            let entries = commands::get_history(&services, &session, *limit).await?;
            if *json { to_json(&entries) } else { Ok(display::render_history(&entries)) }
        }
        Command::Show { id, json } => {
            let outcome = commands::get_record(&services, id).await?;
            if *json { to_json(&outcome) } else { Ok(display::render_outcome(&outcome)) }
        }
        Command::Stats { json } => {
            let stats = commands::get_stats(&services, &session).await?;
            if *json { to_json(&stats) } else { Ok(display::render_stats(&stats)) }
        }
        Command::Export { id } => {
            let path = commands::export_record(&services, &session, id).await?;
            Ok(format!("Report written to {}\n", path.display()))
        }
        Command::Delete { id } => {
            commands::delete_record(&services, id).await?;
            Ok(format!("Deleted {}\n", id))
        }
        Command::Health => {
            let health = commands::check_health(&services).await?;
            Ok(display::render_health(&health))
        }
        Command::Email { .. } | Command::Sms { .. } | Command::Url { .. } => Ok(String::new()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value)
        .map(|s| s + "\n")
        .map_err(|e| e.to_string())
}
