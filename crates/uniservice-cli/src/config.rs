//! Separates configuration flags from the lifecycle verb.

use std::ffi::{OsStr, OsString};

use crate::cli::CONFIG_CLI_FLAGS;

/// Arguments for the configuration loader and for clap, each led by the
/// program name.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ArgumentSplit {
    pub(crate) config: Vec<OsString>,
    pub(crate) command: Vec<OsString>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    ConfigFlag { needs_value: bool },
    Other,
}

fn classify(argument: &OsStr) -> Token {
    let Some(text) = argument.to_str() else {
        return Token::Other;
    };
    let (flag, inline_value) = match text.split_once('=') {
        Some((flag, _)) => (flag, true),
        None => (text, false),
    };
    if CONFIG_CLI_FLAGS.contains(&flag) {
        Token::ConfigFlag {
            needs_value: !inline_value,
        }
    } else {
        Token::Other
    }
}

/// Routes the leading configuration flags (and their values) to the loader;
/// everything from the first other token onwards goes to clap.
pub(crate) fn split_arguments(args: impl IntoIterator<Item = OsString>) -> ArgumentSplit {
    let mut args = args.into_iter();
    let program = args
        .next()
        .unwrap_or_else(|| OsString::from("uniservice"));
    let mut split = ArgumentSplit {
        config: vec![program.clone()],
        command: vec![program],
    };

    while let Some(argument) = args.next() {
        match classify(&argument) {
            Token::ConfigFlag { needs_value } => {
                split.config.push(argument);
                if needs_value {
                    split.config.extend(args.next());
                }
            }
            Token::Other => {
                split.command.push(argument);
                split.command.extend(args.by_ref());
            }
        }
    }
    split
}
