//! Text command console
//!
//! Parses `/command [arg]` lines and keeps the scrollback and input history.
//! Executing a command touches the whole game, so that part lives in
//! `Game::execute_command`.

use std::collections::VecDeque;

/// Scrollback length
pub const MAX_MESSAGES: usize = 10;
/// Remembered command lines
pub const MAX_HISTORY: usize = 20;

/// Command names and their help text, in help order
pub const COMMANDS: [(&str, &str); 8] = [
    ("help", "Show the command list"),
    ("mode", "Change difficulty (endless/easy/normal/hard)"),
    ("play", "Start the game"),
    ("reset", "Reset the game"),
    ("sound", "Toggle sound on/off"),
    ("score", "Show the best scores"),
    ("info", "About the game"),
    ("clear", "Clear the console"),
];

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Report the mode, or switch to the named one
    Mode(Option<String>),
    Play,
    Reset,
    Sound,
    Score,
    Info,
    Clear,
    Unknown(String),
}

impl Command {
    /// Parse a command line. Case-insensitive, the leading `/` is optional.
    /// Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim().to_lowercase();
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        let name = name.strip_prefix('/').unwrap_or(name);
        let arg = parts.next().map(str::to_string);

        let command = match name {
            "help" | "h" => Command::Help,
            "mode" | "m" => Command::Mode(arg),
            "play" | "p" => Command::Play,
            "reset" | "r" => Command::Reset,
            "sound" | "s" => Command::Sound,
            "score" => Command::Score,
            "info" | "i" => Command::Info,
            "clear" | "c" => Command::Clear,
            other => Command::Unknown(other.to_string()),
        };
        Some(command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Echo of the line the player typed
    Command,
    Success,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

/// Scrollback plus command history
#[derive(Debug, Clone, Default)]
pub struct Console {
    messages: VecDeque<Message>,
    /// Newest first
    history: VecDeque<String>,
    /// Position while browsing history, `None` when editing a fresh line
    cursor: Option<usize>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, dropping the oldest past `MAX_MESSAGES`
    pub fn push(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.messages.push_back(Message {
            kind,
            text: text.into(),
        });
        while self.messages.len() > MAX_MESSAGES {
            self.messages.pop_front();
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(MessageKind::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(MessageKind::Success, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(MessageKind::Warn, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(MessageKind::Error, text);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Most recent `n` messages, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Message> {
        self.messages.iter().skip(self.messages.len().saturating_sub(n))
    }

    /// Remember an executed line and stop browsing
    pub fn record(&mut self, line: &str) {
        self.history.push_front(line.to_string());
        self.history.truncate(MAX_HISTORY);
        self.cursor = None;
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Step back to an older line (up arrow). `None` when already at the
    /// oldest entry.
    pub fn history_prev(&mut self) -> Option<&str> {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next >= self.history.len() {
            return None;
        }
        self.cursor = Some(next);
        self.history.get(next).map(String::as_str)
    }

    /// Step forward to a newer line (down arrow). Moving past the newest
    /// entry yields an empty line; `None` when not browsing.
    pub fn history_next(&mut self) -> Option<&str> {
        match self.cursor? {
            0 => {
                self.cursor = None;
                Some("")
            }
            c => {
                self.cursor = Some(c - 1);
                self.history.get(c - 1).map(String::as_str)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases_and_case() {
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("H"), Some(Command::Help));
        assert_eq!(Command::parse("  /P "), Some(Command::Play));
        assert_eq!(
            Command::parse("/Mode EASY"),
            Some(Command::Mode(Some("easy".to_string())))
        );
        assert_eq!(Command::parse("m"), Some(Command::Mode(None)));
        assert_eq!(Command::parse("/score"), Some(Command::Score));
        assert_eq!(
            Command::parse("/launch now"),
            Some(Command::Unknown("launch".to_string()))
        );
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn test_messages_are_capped() {
        let mut console = Console::new();
        for i in 0..15 {
            console.info(format!("line {}", i));
        }
        let texts: Vec<_> = console.messages().map(|m| m.text.clone()).collect();
        assert_eq!(texts.len(), MAX_MESSAGES);
        assert_eq!(texts[0], "line 5");
        assert_eq!(texts[9], "line 14");

        let recent: Vec<_> = console.recent(2).map(|m| m.text.as_str()).collect();
        assert_eq!(recent, vec!["line 13", "line 14"]);

        console.clear();
        assert_eq!(console.messages().count(), 0);
    }

    #[test]
    fn test_history_navigation() {
        let mut console = Console::new();
        console.record("/mode easy");
        console.record("/play");

        assert_eq!(console.history_next(), None);
        assert_eq!(console.history_prev(), Some("/play"));
        assert_eq!(console.history_prev(), Some("/mode easy"));
        assert_eq!(console.history_prev(), None);
        assert_eq!(console.history_next(), Some("/play"));
        assert_eq!(console.history_next(), Some(""));
        assert_eq!(console.history_next(), None);
    }

    #[test]
    fn test_history_is_capped() {
        let mut console = Console::new();
        for i in 0..25 {
            console.record(&format!("/mode {}", i));
        }
        assert_eq!(console.history_len(), MAX_HISTORY);
        assert_eq!(console.history_prev(), Some("/mode 24"));
    }
}
