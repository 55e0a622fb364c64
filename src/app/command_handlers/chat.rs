use crate::app::command_support::{load_orchestrator, parse_user_flag};
use crate::channels::run_chat_session_stdio;

pub fn cmd_chat(args: &[String]) -> Result<String, String> {
    let user_id = parse_user_flag(args, "chat [--user <id>]")?;
    let orchestrator = load_orchestrator()?;
    run_chat_session_stdio(&orchestrator, &user_id)
}
