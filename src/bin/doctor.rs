//! taskqueue-doctor - checks whether the taskqueue CLI is reachable.
//!
//! Resolves the executable (honoring `TASKQUEUE_BIN`), and prints the queue
//! status or install guidance.

use std::sync::Arc;

use taskqueue_bridge::{locator, Config, SystemShell, TaskQueueCli};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskqueue_bridge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!("Working directory: {}", config.working_dir.display());

    let shell = Arc::new(SystemShell);

    let executable = match config.cli_override.clone() {
        Some(path) => {
            info!("Using TASKQUEUE_BIN override: {}", path);
            Some(path)
        }
        None => locator::detect(shell.as_ref(), &config.working_dir).await,
    };

    let Some(executable) = executable else {
        println!("{}", locator::install_guidance());
        std::process::exit(1);
    };

    println!("taskqueue executable: {}", executable);

    let cli = TaskQueueCli::new(executable, config.working_dir.clone(), shell);
    let result = cli.status().await;
    if result.success {
        println!("{}", result.stdout);
    } else {
        println!(
            "status failed (exit {}): {}",
            result.exit_code, result.stderr
        );
        std::process::exit(1);
    }

    Ok(())
}
