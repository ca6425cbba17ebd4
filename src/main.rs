mod api;
mod config;
mod export;
mod models;
mod preview;
mod report;
#[cfg(test)]
mod test_support;
mod ui;

use anyhow::{Context, Result};
use config::Config;
use ui::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;
    let config = apply_cli_overrides(config);

    // Initialize API client
    let client = api::LmsClient::new(config.api_base.clone(), config.token.clone());

    // Start TUI application
    let mut app = App::new(
        client,
        config.role,
        config.assignment_id,
        config.user_id,
        config.class_id,
    );
    app.run().await?;

    Ok(())
}

#[cfg(feature = "cli")]
fn apply_cli_overrides(mut config: Config) -> Config {
    use clap::Parser;

    /// Command-line overrides for scripted invocations.
    #[derive(Parser)]
    #[command(name = "assignment_viewer", version)]
    struct Args {
        /// Assignment to open
        #[arg(long)]
        assignment: Option<String>,
        /// Class the assignment belongs to
        #[arg(long)]
        class: Option<String>,
        /// Role to act as: student or trainer
        #[arg(long)]
        role: Option<models::Role>,
    }

    let args = Args::parse();
    if let Some(assignment) = args.assignment {
        config.assignment_id = assignment;
    }
    if let Some(class) = args.class {
        config.class_id = Some(class);
    }
    if let Some(role) = args.role {
        config.role = role;
    }
    config
}

#[cfg(not(feature = "cli"))]
fn apply_cli_overrides(config: Config) -> Config {
    config
}
