//! Interactive console for a foreground watcher.
//!
//! Each line typed on stdin is parsed into a [`ConsoleCommand`] and sent to
//! the watcher's control loop. The console thread ends on EOF, which closes
//! the channel; the watcher keeps running until it is told to quit or a
//! shutdown signal arrives.

use crate::libs::messages::Message;
use crate::libs::threshold::Threshold;
use crate::msg_error;
use std::io::BufRead;
use tokio::sync::mpsc;

/// A command accepted by the watcher's control loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Stop,
    Threshold(Threshold),
    Ack,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl ConsoleCommand {
    /// Parses one console line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next()?.to_lowercase();
        let rest: Vec<&str> = words.collect();

        let command = match verb.as_str() {
            "start" | "s" => ConsoleCommand::Start,
            "stop" | "x" => ConsoleCommand::Stop,
            "threshold" | "t" => ConsoleCommand::Threshold(Threshold::parse_lenient(&rest.join(" "))),
            "ack" | "a" => ConsoleCommand::Ack,
            "status" | "?" => ConsoleCommand::Status,
            "help" | "h" => ConsoleCommand::Help,
            "quit" | "exit" | "q" => ConsoleCommand::Quit,
            _ => ConsoleCommand::Unknown(line.trim().to_string()),
        };
        Some(command)
    }
}

/// Reads stdin line by line and forwards parsed commands.
///
/// Runs on a detached OS thread; the blocking stdin read cannot be cancelled.
pub fn spawn_stdin(tx: mpsc::Sender<ConsoleCommand>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if let Some(command) = ConsoleCommand::parse(&line) {
                        if tx.blocking_send(command).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    msg_error!(Message::ConsoleReadFailed(e.to_string()));
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_verbs_and_aliases() {
        assert_eq!(ConsoleCommand::parse("start"), Some(ConsoleCommand::Start));
        assert_eq!(ConsoleCommand::parse("  STOP "), Some(ConsoleCommand::Stop));
        assert_eq!(ConsoleCommand::parse("a"), Some(ConsoleCommand::Ack));
        assert_eq!(ConsoleCommand::parse("q"), Some(ConsoleCommand::Quit));
        assert_eq!(ConsoleCommand::parse("   "), None);
    }

    #[test]
    fn threshold_argument_is_parsed_leniently() {
        assert_eq!(ConsoleCommand::parse("threshold 8"), Some(ConsoleCommand::Threshold(Threshold::from_secs(8))));
        assert_eq!(ConsoleCommand::parse("t lots"), Some(ConsoleCommand::Threshold(Threshold::Never)));
        assert_eq!(ConsoleCommand::parse("threshold"), Some(ConsoleCommand::Threshold(Threshold::Never)));
    }

    #[test]
    fn unknown_input_is_kept_for_the_hint() {
        assert_eq!(ConsoleCommand::parse("pause now"), Some(ConsoleCommand::Unknown("pause now".to_string())));
    }
}
