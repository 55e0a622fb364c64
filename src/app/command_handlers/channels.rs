use crate::app::command_support::load_orchestrator;
use crate::channels::format_reply;
use crate::shared::ids::UserId;

pub fn cmd_send(args: &[String]) -> Result<String, String> {
    if args.len() < 2 {
        return Err("usage: send <user_id> <message>".to_string());
    }
    let user_id = UserId::parse(&args[0])?;
    let message = args[1..].join(" ");

    let orchestrator = load_orchestrator()?;
    let reply = orchestrator
        .handle_turn(user_id.as_str(), &message)
        .map_err(|e| e.to_string())?;
    Ok(format_reply(&reply))
}
