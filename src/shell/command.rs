//! Shell command parsing.
//!
//! A command line is a verb followed by comma-separated arguments, so item
//! names may contain spaces: `capture Dmnd Staff, weapons`.

use crate::core::{LoadMode, ModusKind};
use crate::error::{ModusError, Result};
use crate::modus::FolderTag;

/// How `load` should read the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadRequest {
    /// Use the configured load mode.
    Default,
    /// Use this mode.
    Mode(LoadMode),
    /// Ask where each record goes (folder modus only).
    Manual,
}

/// A parsed shell command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Capture { item: String, folder: Option<FolderTag> },
    Take { index: usize, folder: Option<FolderTag> },
    Name { item: String, folder: Option<FolderTag> },
    Draw,
    Shuffle,
    ShuffleDraw,
    Eject,
    Save,
    Load(LoadRequest),
    Switch { kind: ModusKind, mode: Option<LoadMode> },
    Checkpoint,
    Rollback,
    Show,
    Hand,
    Pickup,
    Drop(Option<String>),
    Describe,
    Help(Option<String>),
    Quit,
}

impl Command {
    /// Parse one input line. Verbs are case-insensitive.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',').map(str::trim).collect()
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "capture" | "add" | "c" => {
                let (item, folder) = item_and_folder(&args, "capture")?;
                Self::Capture { item, folder }
            }
            "take" | "t" => {
                let index = args
                    .first()
                    .filter(|arg| !arg.is_empty())
                    .ok_or_else(|| ModusError::parse("usage: take <index>[, <folder>]"))?;
                let index = index
                    .parse()
                    .map_err(|_| ModusError::parse(format!("`{index}` is not an index")))?;
                Self::Take {
                    index,
                    folder: folder_arg(&args)?,
                }
            }
            "name" | "n" => {
                let (item, folder) = item_and_folder(&args, "name")?;
                Self::Name { item, folder }
            }
            "draw" | "d" => Self::Draw,
            "shuffle" => Self::Shuffle,
            "drawcard" => Self::ShuffleDraw,
            "eject" => Self::Eject,
            "save" | "s" => Self::Save,
            "load" | "l" => match args.first() {
                None => Self::Load(LoadRequest::Default),
                Some(arg) if arg.eq_ignore_ascii_case("manual") || *arg == "2" => {
                    Self::Load(LoadRequest::Manual)
                }
                Some(arg) => Self::Load(LoadRequest::Mode(LoadMode::parse(arg)?)),
            },
            "switch" | "modus" => {
                let kind = args
                    .first()
                    .ok_or_else(|| ModusError::parse("usage: switch <modus>[, <load mode>]"))?;
                Self::Switch {
                    kind: ModusKind::parse(kind)?,
                    mode: args.get(1).map(|mode| LoadMode::parse(mode)).transpose()?,
                }
            }
            "checkpoint" => Self::Checkpoint,
            "rollback" => Self::Rollback,
            "show" | "ls" => Self::Show,
            "hand" => Self::Hand,
            "pickup" => Self::Pickup,
            "drop" => Self::Drop(
                args.first()
                    .filter(|arg| !arg.is_empty())
                    .map(|arg| (*arg).to_string()),
            ),
            "describe" => Self::Describe,
            "help" | "?" => Self::Help(args.first().map(|s| s.to_ascii_lowercase())),
            "quit" | "exit" | "q" => Self::Quit,
            "" => return Err(ModusError::parse("empty command")),
            other => return Err(ModusError::parse(format!("unknown command `{other}`"))),
        };
        Ok(command)
    }
}

fn item_and_folder(args: &[&str], verb: &str) -> Result<(String, Option<FolderTag>)> {
    let item = args
        .first()
        .filter(|arg| !arg.is_empty())
        .ok_or_else(|| ModusError::parse(format!("usage: {verb} <item>[, <folder>]")))?;
    Ok(((*item).to_string(), folder_arg(args)?))
}

fn folder_arg(args: &[&str]) -> Result<Option<FolderTag>> {
    match args.get(1) {
        Some(arg) if !arg.is_empty() => FolderTag::parse(arg).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_capture() {
        assert_eq!(
            Command::parse("capture Dmnd Staff, weapons").unwrap(),
            Command::Capture {
                item: "Dmnd Staff".into(),
                folder: Some(FolderTag::Weapons),
            }
        );
        assert_eq!(
            Command::parse("  CAPTURE Gem ").unwrap(),
            Command::Capture {
                item: "Gem".into(),
                folder: None,
            }
        );
        assert!(Command::parse("capture").is_err());
        assert!(matches!(
            Command::parse("capture Gem, x-files"),
            Err(ModusError::UnknownFolder(_))
        ));
    }

    #[test]
    fn test_parse_take() {
        assert_eq!(
            Command::parse("take 3, k").unwrap(),
            Command::Take {
                index: 3,
                folder: Some(FolderTag::KeyCritical),
            }
        );
        assert!(Command::parse("take three").is_err());
        assert!(Command::parse("take -1").is_err());
    }

    #[test]
    fn test_parse_load_and_switch() {
        assert_eq!(Command::parse("load").unwrap(), Command::Load(LoadRequest::Default));
        assert_eq!(
            Command::parse("load fast").unwrap(),
            Command::Load(LoadRequest::Mode(LoadMode::Fast))
        );
        assert_eq!(Command::parse("load manual").unwrap(), Command::Load(LoadRequest::Manual));
        assert_eq!(
            Command::parse("switch deck, no-empty").unwrap(),
            Command::Switch {
                kind: ModusKind::TarotDeck,
                mode: Some(LoadMode::NonEmpty),
            }
        );
        assert!(Command::parse("switch").is_err());
    }

    #[test]
    fn test_parse_simple_verbs() {
        assert_eq!(Command::parse("draw").unwrap(), Command::Draw);
        assert_eq!(Command::parse("drawcard").unwrap(), Command::ShuffleDraw);
        assert_eq!(Command::parse("help take").unwrap(), Command::Help(Some("take".into())));
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
        assert_eq!(Command::parse("drop").unwrap(), Command::Drop(None));
        assert_eq!(
            Command::parse("drop Dmnd Staff").unwrap(),
            Command::Drop(Some("Dmnd Staff".into()))
        );
        assert!(Command::parse("").is_err());
        assert!(Command::parse("fly").is_err());
    }
}
