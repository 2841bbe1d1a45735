//! Process termination signals

/// Resolves once the process is asked to terminate
///
/// On Unix this is SIGTERM or SIGINT. A signal that cannot be registered is
/// logged and ignored; with neither available, Ctrl+C is used instead.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .inspect_err(|e| tracing::warn!(error = %e, "Could not register SIGTERM handler"))
        .ok();
    let mut sigint = signal(SignalKind::interrupt())
        .inspect_err(|e| tracing::warn!(error = %e, "Could not register SIGINT handler"))
        .ok();

    let received = match (sigterm.as_mut(), sigint.as_mut()) {
        (Some(term), Some(int)) => tokio::select! {
            _ = term.recv() => "SIGTERM",
            _ = int.recv() => "SIGINT",
        },
        (Some(term), None) => {
            term.recv().await;
            "SIGTERM"
        }
        (None, Some(int)) => {
            int.recv().await;
            "SIGINT"
        }
        (None, None) => return ctrl_c().await,
    };

    tracing::info!(signal = received, "Shutdown requested");
}

/// Resolves once the process is asked to terminate (Ctrl+C)
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    ctrl_c().await
}

/// Wait for Ctrl+C; if it cannot be listened for, never resolve
async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!(signal = "Ctrl+C", "Shutdown requested"),
        Err(e) => {
            tracing::error!(error = %e, "Cannot listen for Ctrl+C, the server must be killed");
            std::future::pending::<()>().await;
        }
    }
}
