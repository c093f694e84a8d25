//! Parser for shell commands
//!
//! Turns a tokenized line into a typed [`Command`]. All arity and numeric
//! checks happen here so a malformed command never reaches the filesystem.

use crate::error::{Result, ShellError};
use crate::registry::HandleId;
use crate::tokenizer::TokenizedLine;
use std::str::FromStr;

/// Shell commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `create <n> <file>...` - create (or touch) files
    Create { paths: Vec<String> },
    /// `open <n> <file>...` - open files and register their handles
    Open { paths: Vec<String> },
    /// `close <id>`
    Close { id: HandleId },
    /// `write <id> <data> [offset]`
    Write {
        id: HandleId,
        data: String,
        offset: Option<u64>,
    },
    /// `read <id> <count> [offset]`
    Read {
        id: HandleId,
        count: usize,
        offset: Option<u64>,
    },
    /// `copy <source> <destination>`
    Copy { source: String, destination: String },
    /// `move <source> <destination>`
    Move { source: String, destination: String },
    /// `cd <dir>` - creates the directory, it does not change into it
    MakeDir { path: String },
    /// `ls <dir>`
    ListDir { path: String },
    /// `rm <path>`
    Remove { path: String },
    /// `list` - show open handles
    List,
    Help,
    Exit,
}

impl Command {
    /// The command word as typed at the prompt
    pub fn name(&self) -> &'static str {
        match self {
            Command::Create { .. } => "create",
            Command::Open { .. } => "open",
            Command::Close { .. } => "close",
            Command::Write { .. } => "write",
            Command::Read { .. } => "read",
            Command::Copy { .. } => "copy",
            Command::Move { .. } => "move",
            Command::MakeDir { .. } => "cd",
            Command::ListDir { .. } => "ls",
            Command::Remove { .. } => "rm",
            Command::List => "list",
            Command::Help => "help",
            Command::Exit => "exit",
        }
    }

    /// Check if this command ends the session
    pub fn is_terminating(&self) -> bool {
        matches!(self, Command::Exit)
    }
}

/// Parse a tokenized line into a command
pub fn parse_command(line: &TokenizedLine) -> Result<Command> {
    let args = line.args();
    let name = match line.command() {
        Some(name) => name,
        None => return Err(ShellError::invalid_argument(0, "empty command")),
    };

    match name {
        "create" => {
            if args.len() < 3 {
                return Err(not_enough(1));
            }
            Ok(Command::Create {
                paths: parse_counted_paths(args)?,
            })
        }
        "open" => {
            if args.len() < 2 {
                return Err(not_enough(1));
            }
            Ok(Command::Open {
                paths: parse_counted_paths(args)?,
            })
        }
        "close" => {
            expect_exactly(args, 2)?;
            Ok(Command::Close {
                id: parse_number(args, 1, "handle")?,
            })
        }
        "write" => {
            expect_between(args, 3, 4)?;
            Ok(Command::Write {
                id: parse_number(args, 1, "handle")?,
                data: args[2].clone(),
                offset: parse_offset(args)?,
            })
        }
        "read" => {
            expect_between(args, 3, 4)?;
            Ok(Command::Read {
                id: parse_number(args, 1, "handle")?,
                count: parse_number(args, 2, "byte count")?,
                offset: parse_offset(args)?,
            })
        }
        "copy" => {
            expect_exactly(args, 3)?;
            Ok(Command::Copy {
                source: args[1].clone(),
                destination: args[2].clone(),
            })
        }
        "move" => {
            expect_exactly(args, 3)?;
            Ok(Command::Move {
                source: args[1].clone(),
                destination: args[2].clone(),
            })
        }
        "cd" => {
            expect_exactly(args, 2)?;
            Ok(Command::MakeDir {
                path: args[1].clone(),
            })
        }
        "ls" => {
            expect_exactly(args, 2)?;
            Ok(Command::ListDir {
                path: args[1].clone(),
            })
        }
        "rm" => {
            expect_exactly(args, 2)?;
            Ok(Command::Remove {
                path: args[1].clone(),
            })
        }
        // Trailing tokens are ignored for the argument-less commands
        "list" => Ok(Command::List),
        "help" => Ok(Command::Help),
        "exit" => Ok(Command::Exit),
        other => Err(ShellError::UnknownCommand(other.to_string())),
    }
}

fn not_enough(position: usize) -> ShellError {
    ShellError::invalid_argument(position, "not enough arguments")
}

fn expect_exactly(args: &[String], expected: usize) -> Result<()> {
    expect_between(args, expected, expected)
}

/// Check the token count (command included) lies in `min..=max`
fn expect_between(args: &[String], min: usize, max: usize) -> Result<()> {
    if args.len() < min {
        Err(not_enough(args.len()))
    } else if args.len() > max {
        Err(ShellError::invalid_argument(max, "too many arguments"))
    } else {
        Ok(())
    }
}

/// `<n> <path1> ... <pathN>` where the count must match the paths given
fn parse_counted_paths(args: &[String]) -> Result<Vec<String>> {
    let count: usize = parse_number(args, 1, "file count")?;
    if count.checked_add(2) != Some(args.len()) {
        return Err(ShellError::invalid_argument(
            2,
            "file count does not match the files given",
        ));
    }
    Ok(args[2..].to_vec())
}

fn parse_offset(args: &[String]) -> Result<Option<u64>> {
    if args.len() < 4 {
        return Ok(None);
    }
    parse_number(args, 3, "offset").map(Some)
}

fn parse_number<T: FromStr>(args: &[String], position: usize, what: &str) -> Result<T> {
    args[position].parse().map_err(|_| {
        ShellError::invalid_argument(position, format!("invalid {}: {}", what, args[position]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_TOKENS;
    use crate::tokenizer::tokenize;

    fn parse(line: &str) -> Result<Command> {
        parse_command(&tokenize(line, MAX_TOKENS))
    }

    fn position_of(result: Result<Command>) -> usize {
        match result {
            Err(ShellError::InvalidArgument { position, .. }) => position,
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_create() {
        assert_eq!(
            parse("create 2 a.txt b.txt").unwrap(),
            Command::Create {
                paths: vec!["a.txt".to_string(), "b.txt".to_string()]
            }
        );
    }

    #[test]
    fn test_parse_create_count_mismatch() {
        assert_eq!(position_of(parse("create 3 a.txt b.txt")), 2);
        assert_eq!(position_of(parse("create 1")), 1);
        assert_eq!(position_of(parse("create x a.txt")), 1);
    }

    #[test]
    fn test_parse_create_beyond_token_limit() {
        // Six tokens survive, so five files can never match
        assert_eq!(position_of(parse("create 5 a b c d e")), 2);
    }

    #[test]
    fn test_parse_huge_file_count() {
        assert_eq!(position_of(parse("create 18446744073709551615 a")), 2);
        assert_eq!(position_of(parse("open 18446744073709551614")), 2);
        assert_eq!(position_of(parse("open 18446744073709551615 a b")), 2);
    }

    #[test]
    fn test_parse_open() {
        assert_eq!(
            parse("open 1 a.txt").unwrap(),
            Command::Open {
                paths: vec!["a.txt".to_string()]
            }
        );
        assert_eq!(parse("open 0").unwrap(), Command::Open { paths: vec![] });
        assert_eq!(position_of(parse("open")), 1);
        assert_eq!(position_of(parse("open 2 a.txt")), 2);
    }

    #[test]
    fn test_parse_close() {
        assert_eq!(parse("close 3").unwrap(), Command::Close { id: 3 });
        assert_eq!(position_of(parse("close")), 1);
        assert_eq!(position_of(parse("close 3 4")), 2);
        assert_eq!(position_of(parse("close abc")), 1);
    }

    #[test]
    fn test_parse_write() {
        assert_eq!(
            parse("write 3 hello").unwrap(),
            Command::Write {
                id: 3,
                data: "hello".to_string(),
                offset: None
            }
        );
        assert_eq!(
            parse("write 3 hello 10").unwrap(),
            Command::Write {
                id: 3,
                data: "hello".to_string(),
                offset: Some(10)
            }
        );
        assert_eq!(position_of(parse("write 3")), 2);
        assert_eq!(position_of(parse("write 3 hello -1")), 3);
        assert_eq!(position_of(parse("write 3 hello 1 2")), 4);
    }

    #[test]
    fn test_parse_read() {
        assert_eq!(
            parse("read 3 5 0").unwrap(),
            Command::Read {
                id: 3,
                count: 5,
                offset: Some(0)
            }
        );
        assert_eq!(position_of(parse("read 3 many")), 2);
        assert_eq!(position_of(parse("read x 5")), 1);
    }

    #[test]
    fn test_parse_path_commands() {
        assert_eq!(
            parse("copy a b").unwrap(),
            Command::Copy {
                source: "a".to_string(),
                destination: "b".to_string()
            }
        );
        assert_eq!(
            parse("move a b").unwrap(),
            Command::Move {
                source: "a".to_string(),
                destination: "b".to_string()
            }
        );
        assert_eq!(parse("cd d").unwrap(), Command::MakeDir { path: "d".to_string() });
        assert_eq!(parse("ls d").unwrap(), Command::ListDir { path: "d".to_string() });
        assert_eq!(parse("rm d").unwrap(), Command::Remove { path: "d".to_string() });
        assert_eq!(position_of(parse("copy a")), 2);
        assert_eq!(position_of(parse("ls")), 1);
    }

    #[test]
    fn test_parse_argumentless_commands() {
        assert_eq!(parse("list").unwrap(), Command::List);
        assert_eq!(parse("help me").unwrap(), Command::Help);
        let exit = parse("exit").unwrap();
        assert!(exit.is_terminating());
        assert_eq!(exit.name(), "exit");
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse("frobnicate a"),
            Err(ShellError::UnknownCommand("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::MakeDir { path: "d".to_string() }.name(), "cd");
        assert_eq!(Command::List.name(), "list");
        assert!(!Command::List.is_terminating());
    }
}
