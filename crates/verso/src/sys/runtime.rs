use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;

/// Runs the config watcher on its own thread with a single-threaded tokio
/// runtime. Failures only disable hot reload.
pub fn start_background_services(tx: Sender<AppEvent>) {
    let spawned = thread::Builder::new()
        .name("verso-watcher".into())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create Tokio runtime, config reload disabled: {}", e);
                    return;
                }
            };

            rt.block_on(crate::config::watch_config(tx));
        });

    if let Err(e) = spawned {
        log::error!("Failed to start config watcher thread: {}", e);
    }
}
