//! Command parsing: raw input line to a typed command.
//!
//! The verb is the text up to the first whitespace run, matched
//! case-insensitively; everything after it is split on whitespace into
//! arguments with their order preserved. Unknown verbs parse to
//! [`Command::Unknown`] so the dispatcher can report them without failing.

/// A recognized (or explicitly unrecognized) command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    About,
    Status,
    Inventory,
    Clear,
    /// `move <direction>`; the argument is validated at dispatch time.
    Move(Option<String>),
    Look,
    /// `register <username>`
    Register(Option<String>),
    /// `login <username>`
    Login(Option<String>),
    Logout,
    ShowUsers,
    Whoami,
    /// Verb outside the command table, carried for the error message.
    Unknown(String),
}

impl Command {
    /// Parse a raw input line. Returns `None` for blank input.
    pub fn parse(input: &str) -> Option<Command> {
        let mut parts = input.split_whitespace();
        let verb = parts.next()?.to_lowercase();
        let mut args = parts.map(str::to_string);

        let command = match verb.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "about" => Command::About,
            "status" => Command::Status,
            "inventory" => Command::Inventory,
            "clear" => Command::Clear,
            "move" => Command::Move(args.next()),
            "look" => Command::Look,
            "register" => Command::Register(args.next()),
            "login" => Command::Login(args.next()),
            "logout" => Command::Logout,
            "showusers" => Command::ShowUsers,
            "whoami" => Command::Whoami,
            _ => Command::Unknown(verb),
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_is_case_insensitive() {
        assert_eq!(Command::parse("LOOK"), Some(Command::Look));
        assert_eq!(Command::parse("Help"), Some(Command::Help));
    }

    #[test]
    fn first_argument_is_kept() {
        assert_eq!(
            Command::parse("move north"),
            Some(Command::Move(Some("north".into())))
        );
        assert_eq!(
            Command::parse("register Neo"),
            Some(Command::Register(Some("Neo".into())))
        );
    }

    #[test]
    fn missing_argument_is_none() {
        assert_eq!(Command::parse("move"), Some(Command::Move(None)));
        assert_eq!(Command::parse("login"), Some(Command::Login(None)));
    }

    #[test]
    fn blank_input_is_none() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn unknown_verb_is_carried() {
        assert_eq!(
            Command::parse("dance fast"),
            Some(Command::Unknown("dance".into()))
        );
    }

    #[test]
    fn extra_whitespace_is_tolerated() {
        assert_eq!(
            Command::parse("  move    south  "),
            Some(Command::Move(Some("south".into())))
        );
    }
}
