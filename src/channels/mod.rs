pub mod chat;

pub use chat::{format_reply, run_chat_session, run_chat_session_stdio};
