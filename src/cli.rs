//! CLI channel: stdin/stdout chat with Anna.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::stream;
use futures::{FutureExt, Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::intake::Reply;
use crate::outfits::render_outfits;

/// Lines typed by the user.
pub type LineStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// A slash command typed instead of an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Quit,
    /// Show the current settings.
    ShowSettings,
    /// Save a new API base URL.
    SetApiBase(String),
    /// Save a new client key; empty clears it.
    SetKey(String),
    Help,
}

impl CliCommand {
    /// Parse a line starting with `/`. Anything else is an answer.
    pub fn parse(line: &str) -> Option<CliCommand> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let mut parts = rest.splitn(3, char::is_whitespace);
        let cmd = parts.next().unwrap_or_default().to_lowercase();
        match cmd.as_str() {
            "quit" | "exit" => Some(Self::Quit),
            "settings" => Some(Self::ShowSettings),
            "set" => {
                let field = parts.next().unwrap_or_default().to_lowercase();
                let value = parts.next().unwrap_or_default().trim().to_string();
                match field.as_str() {
                    "base" => Some(Self::SetApiBase(value)),
                    "key" => Some(Self::SetKey(value)),
                    _ => Some(Self::Help),
                }
            }
            _ => Some(Self::Help),
        }
    }
}

pub const HELP: &str = "Commando's: /settings, /set base <url>, /set key [sleutel], /quit";

/// Startup hint printed with the banner. The wizard's first answer is the
/// purpose of the outfit.
pub const INTRO: &str = "Typ waarvoor je een outfit zoekt, bijv. werk, vrije tijd of een bruiloft.";

/// Reads stdin lines on a background task and prints Anna's replies.
///
/// Input can be paused while a generation call is in flight. Lines typed
/// while paused are dropped rather than answered after the call returns.
pub struct CliChannel {
    input_open: Arc<AtomicBool>,
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl CliChannel {
    pub fn new() -> Self {
        Self {
            input_open: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Start reading stdin. The stream ends at EOF.
    pub fn start(&self) -> LineStream {
        self.read_lines(BufReader::new(tokio::io::stdin()))
    }

    fn read_lines<R>(&self, reader: R) -> LineStream
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let input_open = Arc::clone(&self.input_open);

        tokio::spawn(async move {
            let mut lines = reader.lines();

            eprint!("> ");

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if !input_open.load(Ordering::SeqCst) {
                            tracing::debug!("Dropping input typed while busy");
                            continue;
                        }
                        if line.trim().is_empty() {
                            eprint!("> ");
                            continue;
                        }
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
        });

        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|line| (line, rx))
        });

        Box::pin(stream.fuse())
    }

    /// Stop accepting lines until [`CliChannel::resume_input`].
    pub fn pause_input(&self) {
        self.input_open.store(false, Ordering::SeqCst);
    }

    /// Discard lines queued before or during the pause, then accept input
    /// again. Returns how many lines were dropped.
    pub fn resume_input(&self, lines: &mut LineStream) -> usize {
        let mut dropped = 0;
        while let Some(Some(_)) = lines.next().now_or_never() {
            dropped += 1;
        }
        if dropped > 0 {
            tracing::debug!(dropped, "Discarded queued input");
        }
        self.input_open.store(true, Ordering::SeqCst);
        dropped
    }

    /// Print Anna's replies, then the input prompt.
    pub fn respond(&self, replies: &[Reply]) {
        for reply in replies {
            match reply {
                Reply::Text(text) => println!("\nAnna: {text}"),
                Reply::Outfits(response) => {
                    for message in render_outfits(response) {
                        println!("\n{message}");
                    }
                }
            }
        }
        eprint!("> ");
    }

    /// Print a line from the app itself (not the wizard).
    pub fn notice(&self, text: &str) {
        println!("\n{text}");
        eprint!("> ");
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncWriteExt;

    use super::*;

    #[test]
    fn plain_answers_are_not_commands() {
        assert_eq!(CliCommand::parse("casual, sportief"), None);
        assert_eq!(CliCommand::parse("ja"), None);
    }

    #[test]
    fn parses_commands() {
        assert_eq!(CliCommand::parse("/quit"), Some(CliCommand::Quit));
        assert_eq!(CliCommand::parse(" /EXIT "), Some(CliCommand::Quit));
        assert_eq!(CliCommand::parse("/settings"), Some(CliCommand::ShowSettings));
        assert_eq!(
            CliCommand::parse("/set base https://anna.example"),
            Some(CliCommand::SetApiBase("https://anna.example".into()))
        );
        assert_eq!(CliCommand::parse("/set key"), Some(CliCommand::SetKey(String::new())));
        assert_eq!(CliCommand::parse("/set key abc"), Some(CliCommand::SetKey("abc".into())));
        assert_eq!(CliCommand::parse("/dance"), Some(CliCommand::Help));
    }

    async fn settle() {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn lines_typed_while_paused_are_dropped() {
        let cli = CliChannel::new();
        let (mut writer, reader) = tokio::io::duplex(64);
        let mut lines = cli.read_lines(BufReader::new(reader));

        cli.pause_input();
        writer.write_all(b"ja\n").await.unwrap();
        settle().await;
        cli.resume_input(&mut lines);

        writer.write_all(b"nee\n").await.unwrap();
        assert_eq!(lines.next().await.as_deref(), Some("nee"));
    }

    #[tokio::test]
    async fn resume_discards_lines_queued_before_pause() {
        let cli = CliChannel::new();
        let mut lines = cli.read_lines(BufReader::new(&b"ja\nja\n"[..]));
        settle().await;

        cli.pause_input();
        assert_eq!(cli.resume_input(&mut lines), 2);
        assert_eq!(lines.next().await, None);
    }

    #[tokio::test]
    async fn blank_lines_never_reach_the_stream() {
        let cli = CliChannel::new();
        let mut lines = cli.read_lines(BufReader::new(&b"\n  \nwerk\n"[..]));
        assert_eq!(lines.next().await.as_deref(), Some("werk"));
        assert_eq!(lines.next().await, None);
    }
}
