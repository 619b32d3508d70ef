use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the config watcher on its own Tokio runtime so the GTK main loop
/// never blocks on file system events.
pub fn start_background_services(tx: Sender<AppEvent>) {
    let spawned = thread::Builder::new()
        .name("wheel-services".into())
        .spawn(move || {
            let rt = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create Tokio runtime: {}", e);
                    return;
                }
            };

            rt.block_on(crate::config::run_async_watcher(tx));
            log::debug!("Background services finished");
        });

    if let Err(e) = spawned {
        log::error!("Failed to start background services: {}", e);
    }
}
