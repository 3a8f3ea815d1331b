use super::{ReceiptcamOrchestrator, ShutdownReason};
use crate::error::Result;
use crate::events::ReceiptcamEvent;
use crate::input::route;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

impl ReceiptcamOrchestrator {
    /// Run the main application loop with signal handling.
    ///
    /// Consumes bus events one at a time; input received while an action
    /// is still being handled queues on the bus and is routed afterwards
    /// against the then-current state, so stale triggers fall out as
    /// no-ops.
    pub async fn run(&mut self) -> Result<i32> {
        info!("Receiptcam is running");

        let mut events = self.subscribe();

        #[cfg(unix)]
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        let reason = loop {
            #[cfg(unix)]
            let terminate = sigterm.recv();
            #[cfg(not(unix))]
            let terminate = std::future::pending::<Option<()>>();

            tokio::select! {
                event = events.recv() => {
                    match event {
                        Ok(event) => {
                            if let Some(reason) = self.handle_event(event).await {
                                break reason;
                            }
                        }
                        Err(RecvError::Lagged(missed)) => {
                            warn!("Event bus lagged; {} events dropped", missed);
                        }
                        Err(RecvError::Closed) => {
                            break ShutdownReason::Error("event bus closed".to_string());
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received SIGINT signal (Ctrl+C)");
                    break ShutdownReason::Signal("SIGINT".to_string());
                }
                _ = terminate => {
                    info!("Received SIGTERM signal");
                    break ShutdownReason::Signal("SIGTERM".to_string());
                }
            }
        };

        info!("Shutdown initiated: {:?}", reason);
        self.reset().await;
        self.shutdown().await?;

        let exit_code = match reason {
            ShutdownReason::Error(_) => 1,
            _ => 0,
        };
        Ok(exit_code)
    }

    /// Process one bus event. Returns a reason when the loop should end.
    async fn handle_event(&mut self, event: ReceiptcamEvent) -> Option<ShutdownReason> {
        match event {
            ReceiptcamEvent::InputReceived { input, .. } => {
                let state = self.state_machine.current();
                let Some(action) = route(input, state) else {
                    debug!("Input {:?} not honored in {:?}", input, state);
                    return None;
                };
                if !self.handle_action(action).await {
                    return Some(ShutdownReason::UserRequest);
                }
                None
            }
            ReceiptcamEvent::ShutdownRequested { reason, .. } => {
                Some(ShutdownReason::Signal(reason))
            }
            other => {
                debug!("Event observed: {}", other.description());
                None
            }
        }
    }
}
