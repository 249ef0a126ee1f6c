//! Casement host
//!
//! Headless entry point: wires the lifecycle manager to a SQLite profile
//! and runs it until the process is asked to quit.

mod state;

use casement_core::{Config, LifecycleEvent};
use state::AppState;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    casement_core::init_logging();

    let config = Config::load(state::config_path())?;
    let AppState {
        mut manager,
        mut events,
        handle,
    } = AppState::new(config, args)?;

    manager.init();

    let quit = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received");
            quit.send(LifecycleEvent::Quit);
        }
    });

    handle.send(LifecycleEvent::Ready);
    manager.run(&mut events).await;

    tracing::info!("Casement stopped");

    Ok(())
}
