use crate::orchestrator::{Orchestrator, Reply};
use crate::provider::TextGenerator;
use std::io::{self, BufRead, Write};

const CHAT_EXIT_COMMANDS: &[&str] = &["/exit", "exit", "quit"];

pub fn run_chat_session_stdio<G: TextGenerator>(
    orchestrator: &Orchestrator<G>,
    user_id: &str,
) -> Result<String, String> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();
    run_chat_session(orchestrator, user_id, &mut input, &mut output)
}

/// Line-oriented REPL over one orchestrator. Every non-empty line is one turn.
pub fn run_chat_session<G: TextGenerator, R: BufRead, W: Write>(
    orchestrator: &Orchestrator<G>,
    user_id: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String, String> {
    writeln!(
        output,
        "chat user={user_id} project={}",
        orchestrator.active().get(user_id)
    )
    .map_err(|e| format!("failed to write chat output: {e}"))?;
    writeln!(output, "type `/exit` to quit")
        .map_err(|e| format!("failed to write chat output: {e}"))?;

    let mut turns = 0usize;
    loop {
        write!(output, "you> ").map_err(|e| format!("failed to write chat prompt: {e}"))?;
        output
            .flush()
            .map_err(|e| format!("failed to flush chat prompt: {e}"))?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| format!("failed to read chat input: {e}"))?;
        if read == 0 {
            break;
        }

        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if is_chat_exit_command(message) {
            break;
        }

        let reply = orchestrator
            .handle_turn(user_id, message)
            .map_err(|e| format!("chat processing failed: {e}"))?;
        write_reply(output, &reply)?;
        turns += 1;
    }

    Ok(format!("chat ended\nuser={user_id} turns={turns}"))
}

/// Renders a reply the way `chat` and `send` print it.
pub fn format_reply(reply: &Reply) -> String {
    if reply.suggestions.is_empty() {
        return reply.text.clone();
    }
    let options = reply
        .suggestions
        .iter()
        .map(|s| format!("[{s}]"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}\n\n{options}", reply.text)
}

fn write_reply<W: Write>(output: &mut W, reply: &Reply) -> Result<(), String> {
    writeln!(output, "assistant> {}", format_reply(reply))
        .map_err(|e| format!("failed to write chat output: {e}"))?;
    output
        .flush()
        .map_err(|e| format!("failed to flush chat output: {e}"))
}

fn is_chat_exit_command(message: &str) -> bool {
    CHAT_EXIT_COMMANDS
        .iter()
        .any(|command| message.eq_ignore_ascii_case(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_commands_are_case_insensitive() {
        assert!(is_chat_exit_command("/EXIT"));
        assert!(is_chat_exit_command("quit"));
        assert!(!is_chat_exit_command("/exits"));
    }

    #[test]
    fn suggestions_render_after_the_text() {
        let reply = Reply::text("привет").with_suggestion("ок");
        assert_eq!(format_reply(&reply), "привет\n\n[ок]");
        assert_eq!(format_reply(&Reply::text("x")), "x");
    }
}
