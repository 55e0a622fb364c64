#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Setup,
    Chat,
    Send,
    Projects,
    Status,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "setup" => CliVerb::Setup,
        "chat" => CliVerb::Chat,
        "send" => CliVerb::Send,
        "projects" => CliVerb::Projects,
        "status" => CliVerb::Status,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  setup                                Write config and create state directories"
            .to_string(),
        "  chat [--user <id>]                   Run the A3 dialogue in this terminal".to_string(),
        "  send <user> <message>                Run one turn and print the reply".to_string(),
        "  projects                             List stored project ids".to_string(),
        "  status [--user <id>]                 Show the active project, step and phases"
            .to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_verbs_parse() {
        assert_eq!(parse_cli_verb("chat"), CliVerb::Chat);
        assert_eq!(parse_cli_verb("--help"), CliVerb::Help);
        assert_eq!(parse_cli_verb("start"), CliVerb::Unknown);
    }

    #[test]
    fn help_mentions_every_verb() {
        let help = help_text();
        for verb in ["setup", "chat", "send", "projects", "status"] {
            assert!(help.contains(verb), "missing {verb}");
        }
    }
}
