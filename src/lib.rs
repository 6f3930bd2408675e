//! task-tracker library - task records, the JSON file store, and the `tm` CLI

pub mod cli;
pub mod config;
pub mod task;
