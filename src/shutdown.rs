// External stop trigger: Ctrl+C, SIGTERM, or a line on stdin.

use std::io::Read;

use tokio::sync::oneshot;

/// Completes when the operator asks the monitor to stop.
///
/// With `watch_stdin`, any input on stdin counts as a stop request. A closed
/// stdin (e.g. `< /dev/null` or a detached service) is ignored.
pub async fn wait_for_stop(watch_stdin: bool) {
    tokio::select! {
        _ = signal() => tracing::info!("Received shutdown signal"),
        _ = keypress(), if watch_stdin => tracing::info!("Received stop request on stdin"),
    }
}

/// Reads stdin on a detached thread so a pending read never holds up runtime shutdown.
async fn keypress() {
    let (tx, rx) = oneshot::channel();
    let spawned = std::thread::Builder::new()
        .name("stdin-stop".into())
        .spawn(move || {
            let mut buf = [0u8; 1];
            match std::io::stdin().read(&mut buf) {
                Ok(n) if n > 0 => {
                    let _ = tx.send(());
                }
                Ok(_) => tracing::debug!("stdin closed; waiting for a signal instead"),
                Err(e) => tracing::warn!(error = %e, "Error reading keyboard input"),
            }
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "could not watch stdin");
        return std::future::pending().await;
    }
    if rx.await.is_err() {
        std::future::pending::<()>().await
    }
}

async fn signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
