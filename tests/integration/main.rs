mod dictation_flow;
mod history_store;
mod media_capture;
pub mod support;
