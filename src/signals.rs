// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! OS signal handling for the binary.
//!
//! On unix SIGINT, SIGTERM and SIGQUIT end a run; elsewhere only Ctrl-C.

use tokio_util::sync::CancellationToken;

use crate::observability::messages::scheduler::ShutdownRequested;
use crate::observability::messages::StructuredLog;

/// Wait for a termination signal and return its name.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = tokio::signal::ctrl_c() => "SIGINT",
        _ = sigint.recv() => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
        _ = sigquit.recv() => "SIGQUIT",
    };
    Ok(name)
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl-C")
}

/// Cancel `cancel` on the first termination signal.
///
/// Returns early without cancelling when the token is cancelled elsewhere.
pub async fn cancel_on_shutdown_signal(cancel: CancellationToken) -> std::io::Result<()> {
    tokio::select! {
        _ = cancel.cancelled() => Ok(()),
        received = wait_for_shutdown_signal() => {
            let signal = received?;
            ShutdownRequested { signal }.log();
            cancel.cancel();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_elsewhere_ends_signal_watch() {
        let cancel = CancellationToken::new();
        let watch = tokio::spawn(cancel_on_shutdown_signal(cancel.clone()));

        cancel.cancel();
        let result = tokio::time::timeout(Duration::from_secs(1), watch)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
