use crate::app::cli::{help_text, parse_cli_verb, CliVerb};

pub mod channels;
pub mod chat;
pub mod projects;
pub mod setup;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Setup => setup::cmd_setup(),
        CliVerb::Chat => chat::cmd_chat(&args[1..]),
        CliVerb::Send => channels::cmd_send(&args[1..]),
        CliVerb::Projects => projects::cmd_projects(),
        CliVerb::Status => projects::cmd_status(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
