//! Line-oriented command consoles for the main window and satellites.

use tether_common::{KindError, KindParams, WindowKey, WindowKind};
use tether_satellite::SatelliteCommand;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConsoleError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("'{command}' needs a {arg}")]
    MissingArgument {
        command: &'static str,
        arg: &'static str,
    },

    #[error("invalid chain id: {0}")]
    InvalidChainId(String),

    #[error(transparent)]
    Kind(#[from] KindError),
}

/// A command typed into the main window's console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainCommand {
    Add(WindowKind),
    Remove(WindowKey),
    RemoveAll,
    Minimize(WindowKey),
    MinimizeAll,
    PopOut(WindowKey),
    List,
    Quit,
}

pub const MAIN_HELP: &str = "commands: add wallet | add message | add miniapp <url> | \
add token <chainId> <address> | remove <key> | remove-all | minimize <key> | \
minimize-all | pop-out <key> | list | quit";

pub const SATELLITE_HELP: &str = "commands: pop-in | close";

/// Parse one console line. Blank lines yield `Ok(None)`.
pub fn parse_main(line: &str) -> Result<Option<MainCommand>, ConsoleError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let cmd = match command {
        "add" => MainCommand::Add(parse_kind(&mut words)?),
        "remove" => MainCommand::Remove(key_arg(&mut words, "remove")?),
        "remove-all" => MainCommand::RemoveAll,
        "minimize" => MainCommand::Minimize(key_arg(&mut words, "minimize")?),
        "minimize-all" => MainCommand::MinimizeAll,
        "pop-out" => MainCommand::PopOut(key_arg(&mut words, "pop-out")?),
        "list" | "ls" => MainCommand::List,
        "quit" | "exit" => MainCommand::Quit,
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };
    Ok(Some(cmd))
}

/// Parse one satellite console line. Blank lines yield `Ok(None)`.
pub fn parse_satellite(line: &str) -> Result<Option<SatelliteCommand>, ConsoleError> {
    match line.split_whitespace().next() {
        None => Ok(None),
        Some("pop-in") => Ok(Some(SatelliteCommand::PopIn)),
        Some("close") => Ok(Some(SatelliteCommand::Close)),
        Some(other) => Err(ConsoleError::UnknownCommand(other.to_string())),
    }
}

fn parse_kind<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<WindowKind, ConsoleError> {
    let name = words.next().ok_or(ConsoleError::MissingArgument {
        command: "add",
        arg: "window kind",
    })?;

    let params = match name {
        "miniapp" => KindParams {
            url: words.next().map(str::to_string),
            ..Default::default()
        },
        "token" => {
            let chain_id = words
                .next()
                .map(|raw| {
                    raw.parse::<u64>()
                        .map_err(|_| ConsoleError::InvalidChainId(raw.to_string()))
                })
                .transpose()?;
            KindParams {
                chain_id,
                address: words.next().map(str::to_string),
                ..Default::default()
            }
        }
        _ => KindParams::default(),
    };

    Ok(WindowKind::from_parts(name, params)?)
}

fn key_arg<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<WindowKey, ConsoleError> {
    words
        .next()
        .map(WindowKey::from)
        .ok_or(ConsoleError::MissingArgument {
            command,
            arg: "window key",
        })
}
