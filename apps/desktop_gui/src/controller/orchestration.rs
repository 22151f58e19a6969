//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker. Returns false (and explains why in
/// `status`) when the command could not be queued.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn ask(request_id: u64) -> BackendCommand {
        BackendCommand::AskAssistant {
            request_id,
            query: "how do I vote?".to_string(),
        }
    }

    #[test]
    fn queues_command_when_capacity_allows() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, ask(1), &mut status));
        assert!(status.is_empty());
        assert!(matches!(
            rx.try_recv(),
            Ok(BackendCommand::AskAssistant { request_id: 1, .. })
        ));
    }

    #[test]
    fn reports_full_queue_on_status_line() {
        let (tx, _rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, ask(1), &mut status));
        assert!(!dispatch_backend_command(&tx, ask(2), &mut status));
        assert!(status.contains("queue is full"));
    }

    #[test]
    fn reports_disconnected_backend_on_status_line() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut status = String::new();
        assert!(!dispatch_backend_command(&tx, ask(1), &mut status));
        assert!(status.contains("disconnected"));
    }
}
