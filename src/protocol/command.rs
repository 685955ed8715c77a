//! FTP command parsing
//!
//! Tokenizes a control-connection line into a command verb and its
//! arguments, validating argument counts along the way.

/// Represents an FTP command parsed from the client input.
///
/// Argument-carrying variants hold tokens in their original case; the verb
/// itself is matched case-insensitively. `BadUsage` captures a recognized
/// verb used with the wrong number of arguments, together with the text of
/// the 501 reply.
#[derive(Debug, PartialEq)]
pub enum Command {
    User(String),
    Quit,
    Noop,
    Type(String),
    Mode(String),
    Stru(String),
    Port(String),
    Pasv,
    Pwd,
    Cwd(String),
    Retr(String),
    Stor(String),
    List(Option<String>),
    BadUsage(&'static str),
    Unknown,
}

/// Parses one line from the control connection.
///
/// The line is split on ASCII whitespace runs; the first token is the verb,
/// the rest are arguments. Returns `None` for a blank line, which the
/// session silently skips.
pub fn parse_command(line: &str) -> Option<Command> {
    let mut tokens = line.split_ascii_whitespace();
    let verb = tokens.next()?.to_ascii_uppercase();
    let args: Vec<&str> = tokens.collect();

    let command = match verb.as_str() {
        "USER" => match args.first() {
            Some(name) => Command::User(name.to_string()),
            None => Command::BadUsage("Usage: USER name"),
        },
        "QUIT" => Command::Quit,
        "NOOP" => Command::Noop,
        "TYPE" => match args.len() {
            1 | 2 => Command::Type(args.join(" ")),
            _ => Command::BadUsage("Usage: TYPE A"),
        },
        "MODE" => match args.as_slice() {
            [arg] => Command::Mode(arg.to_string()),
            _ => Command::BadUsage("Usage: MODE S"),
        },
        "STRU" => match args.as_slice() {
            [arg] => Command::Stru(arg.to_string()),
            _ => Command::BadUsage("Usage: STRU F"),
        },
        "PORT" => match args.as_slice() {
            [arg] => Command::Port(arg.to_string()),
            _ => Command::BadUsage("Usage: PORT h1,h2,h3,h4,p1,p2"),
        },
        "PASV" => Command::Pasv,
        "PWD" => {
            if args.is_empty() {
                Command::Pwd
            } else {
                Command::BadUsage("Syntax error of argument")
            }
        }
        "CWD" => match args.first() {
            Some(path) => Command::Cwd(path.to_string()),
            None => Command::BadUsage("Usage: CWD directory"),
        },
        "RETR" => match args.first() {
            Some(path) => Command::Retr(path.to_string()),
            None => Command::BadUsage("Usage: RETR file"),
        },
        "STOR" => match args.first() {
            Some(path) => Command::Stor(path.to_string()),
            None => Command::BadUsage("Usage: STOR file"),
        },
        "LIST" => Command::List(args.first().map(|s| s.to_string())),
        _ => Command::Unknown,
    };

    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_command("QUIT"), Some(Command::Quit));
        assert_eq!(parse_command("NOOP"), Some(Command::Noop));
        assert_eq!(parse_command("PASV"), Some(Command::Pasv));
        assert_eq!(parse_command("PWD"), Some(Command::Pwd));
        assert_eq!(parse_command("LIST"), Some(Command::List(None)));
    }

    #[test]
    fn test_parse_commands_with_args() {
        assert_eq!(
            parse_command("USER anon"),
            Some(Command::User("anon".to_string()))
        );
        assert_eq!(
            parse_command("CWD /some/path"),
            Some(Command::Cwd("/some/path".to_string()))
        );
        assert_eq!(
            parse_command("RETR file.txt"),
            Some(Command::Retr("file.txt".to_string()))
        );
        assert_eq!(
            parse_command("STOR upload.txt"),
            Some(Command::Stor("upload.txt".to_string()))
        );
        assert_eq!(
            parse_command("PORT 127,0,0,1,31,64"),
            Some(Command::Port("127,0,0,1,31,64".to_string()))
        );
        assert_eq!(
            parse_command("LIST subdir"),
            Some(Command::List(Some("subdir".to_string())))
        );
    }

    #[test]
    fn test_verb_case_and_argument_case() {
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(
            parse_command("retr File.TXT"),
            Some(Command::Retr("File.TXT".to_string()))
        );
    }

    #[test]
    fn test_type_argument_joining() {
        assert_eq!(parse_command("TYPE I"), Some(Command::Type("I".to_string())));
        assert_eq!(
            parse_command("TYPE A N"),
            Some(Command::Type("A N".to_string()))
        );
        assert_eq!(
            parse_command("TYPE L 8"),
            Some(Command::Type("L 8".to_string()))
        );
    }

    #[test]
    fn test_blank_lines_yield_no_command() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("\t"), None);
    }

    #[test]
    fn test_bad_usage() {
        assert_eq!(
            parse_command("TYPE"),
            Some(Command::BadUsage("Usage: TYPE A"))
        );
        assert_eq!(
            parse_command("TYPE A N 8"),
            Some(Command::BadUsage("Usage: TYPE A"))
        );
        assert_eq!(
            parse_command("MODE S F"),
            Some(Command::BadUsage("Usage: MODE S"))
        );
        assert_eq!(
            parse_command("PORT"),
            Some(Command::BadUsage("Usage: PORT h1,h2,h3,h4,p1,p2"))
        );
        assert_eq!(
            parse_command("PWD extra"),
            Some(Command::BadUsage("Syntax error of argument"))
        );
        assert_eq!(parse_command("RETR"), Some(Command::BadUsage("Usage: RETR file")));
        assert_eq!(parse_command("USER"), Some(Command::BadUsage("Usage: USER name")));
    }

    #[test]
    fn test_unknown_commands() {
        assert_eq!(parse_command("ABOR"), Some(Command::Unknown));
        assert_eq!(parse_command("FEAT"), Some(Command::Unknown));
        assert_eq!(parse_command("xyzzy arg"), Some(Command::Unknown));
    }
}
