//! Bridge between the egui thread and the tokio worker that talks to the network.

pub mod commands;
pub mod runtime;
