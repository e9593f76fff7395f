pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod platform;
pub mod server;
pub mod webhook;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;
