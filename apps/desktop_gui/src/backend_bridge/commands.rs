//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    AskAssistant { request_id: u64, query: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::AskAssistant { .. } => "ask_assistant",
        }
    }
}
