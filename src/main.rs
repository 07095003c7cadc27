mod api;
mod app_system;
mod clients;
mod domain;
mod error;
mod manager;
mod messages;
mod terminal;
mod view;

#[cfg(test)]
mod mock_framework;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::app_system::{setup_tracing, AppConfig, UserManagerSystem};
use crate::terminal::{InputCommand, Outcome};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    let system = UserManagerSystem::start(&config, tokio::io::stdout()).await?;
    eprintln!("{}", terminal::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Failed to read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<InputCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!(input = %line, "Bad command");
                eprintln!("{}", e);
                continue;
            }
        };

        match terminal::execute(&system.client, command).await {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Notice(text)) => eprintln!("{}", text),
            Ok(Outcome::Quit) => break,
            Err(e) => {
                error!(error = %e, "User manager unavailable");
                break;
            }
        }
    }

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}
