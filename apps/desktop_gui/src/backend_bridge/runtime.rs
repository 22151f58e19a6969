//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use assistant_client::{Assistant, AssistantError};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Spawns the backend worker thread. It owns a tokio runtime and serves
/// commands until every UI sender is dropped.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    assistant: Arc<dyn Assistant>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::AskAssistant { request_id, query } => {
                        let assistant = Arc::clone(&assistant);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let ask = tokio::spawn(async move { assistant.ask(&query).await });
                            let result = match ask.await {
                                Ok(result) => result,
                                Err(err) => Err(AssistantError::ServiceUnavailable(format!(
                                    "assistant task failed: {err}"
                                ))),
                            };
                            match &result {
                                Ok(answer) => tracing::debug!(
                                    request_id,
                                    answer_len = answer.len(),
                                    "assistant answered"
                                ),
                                Err(err) => tracing::warn!(request_id, "assistant unavailable: {err}"),
                            }
                            // Every dispatched request gets exactly one reply; wait for room
                            // in the UI queue rather than leave the panel loading.
                            let sent = tokio::task::block_in_place(|| {
                                ui_tx.send(UiEvent::AssistantReplied { request_id, result })
                            });
                            if sent.is_err() {
                                tracing::warn!(request_id, "ui event queue closed before assistant reply");
                            }
                        });
                    }
                }
            }

            tracing::info!("ui command channel closed; backend worker stopping");
        });
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assistant_client::MissingAssistant;
    use async_trait::async_trait;
    use crossbeam_channel::bounded;

    use super::*;

    struct EchoAssistant;

    #[async_trait]
    impl Assistant for EchoAssistant {
        async fn ask(&self, query: &str) -> Result<String, AssistantError> {
            Ok(format!("echo: {query}"))
        }
    }

    struct PanickingAssistant;

    #[async_trait]
    impl Assistant for PanickingAssistant {
        async fn ask(&self, _query: &str) -> Result<String, AssistantError> {
            panic!("assistant blew up");
        }
    }

    fn next_reply(ui_rx: &Receiver<UiEvent>) -> (u64, Result<String, AssistantError>) {
        loop {
            match ui_rx.recv_timeout(Duration::from_secs(5)).expect("ui event") {
                UiEvent::AssistantReplied { request_id, result } => return (request_id, result),
                UiEvent::Info(_) => continue,
                UiEvent::Error(err) => panic!("unexpected backend error: {}", err.message()),
            }
        }
    }

    #[test]
    fn serves_assistant_queries_and_stops_when_ui_hangs_up() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(16);
        let handle = launch(cmd_rx, ui_tx, Arc::new(EchoAssistant));

        cmd_tx
            .send(BackendCommand::AskAssistant {
                request_id: 3,
                query: "turnout".to_string(),
            })
            .expect("send");

        let (request_id, result) = next_reply(&ui_rx);
        assert_eq!(request_id, 3);
        assert_eq!(result.expect("answer"), "echo: turnout");

        drop(cmd_tx);
        handle.join().expect("worker exits");
    }

    #[test]
    fn forwards_assistant_failures_as_replies() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(16);
        let handle = launch(cmd_rx, ui_tx, Arc::new(MissingAssistant));

        cmd_tx
            .send(BackendCommand::AskAssistant {
                request_id: 1,
                query: "anything".to_string(),
            })
            .expect("send");

        let (request_id, result) = next_reply(&ui_rx);
        assert_eq!(request_id, 1);
        assert!(matches!(result, Err(AssistantError::ServiceUnavailable(_))));

        drop(cmd_tx);
        handle.join().expect("worker exits");
    }

    #[test]
    fn panicking_assistant_still_produces_a_reply() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(16);
        let handle = launch(cmd_rx, ui_tx, Arc::new(PanickingAssistant));

        cmd_tx
            .send(BackendCommand::AskAssistant {
                request_id: 7,
                query: "who counts the votes?".to_string(),
            })
            .expect("send");

        let (request_id, result) = next_reply(&ui_rx);
        assert_eq!(request_id, 7);
        assert!(matches!(result, Err(AssistantError::ServiceUnavailable(_))));

        drop(cmd_tx);
        handle.join().expect("worker exits");
    }

    #[test]
    fn reply_waits_for_room_in_a_full_ui_queue() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(1);
        let handle = launch(cmd_rx, ui_tx, Arc::new(EchoAssistant));

        cmd_tx
            .send(BackendCommand::AskAssistant {
                request_id: 9,
                query: "polls".to_string(),
            })
            .expect("send");

        // Let the startup info events and the reply contend for the single slot.
        std::thread::sleep(Duration::from_millis(200));

        let (request_id, result) = next_reply(&ui_rx);
        assert_eq!(request_id, 9);
        assert_eq!(result.expect("answer"), "echo: polls");

        drop(cmd_tx);
        handle.join().expect("worker exits");
    }
}
