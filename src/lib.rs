pub mod app;
pub mod catalog;
pub mod channels;
pub mod config;
pub mod extract;
pub mod fallback;
pub mod gate;
pub mod intent;
pub mod orchestrator;
pub mod plan;
pub mod prompts;
pub mod proposals;
pub mod provider;
pub mod runtime;
pub mod shared;
pub mod store;
pub mod summary;
pub mod templates;
pub mod whychain;
