use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Oldest messages are dropped past this many.
const MAX_MESSAGES: usize = 2000;

/// What the run loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// Append this body to the log.
    Send(String),
    /// Repaint the whole screen.
    Redraw,
    /// Leave the console; `kill_session` asks to tear the agents down too.
    Quit { kill_session: bool },
}

/// Console state: the visible transcript and the line being typed.
pub struct App {
    pub user: String,
    pub session: String,
    /// Raw log lines; malformed ones are kept and shown as plain text.
    pub messages: Vec<String>,
    pub input: String,
    /// Cursor position in chars, `0..=input.chars().count()`.
    pub cursor: usize,
    pub error: Option<String>,
}

impl App {
    pub fn new(user: String, session: String) -> Self {
        Self {
            user,
            session,
            messages: Vec::new(),
            input: String::new(),
            cursor: 0,
            error: None,
        }
    }

    pub fn push_lines(&mut self, lines: impl IntoIterator<Item = String>) {
        self.messages.extend(lines);
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Action::Quit {
                kill_session: false,
            },
            KeyCode::Char('d') if ctrl => Action::Quit { kill_session: true },
            KeyCode::Char('l') if ctrl => Action::Redraw,
            KeyCode::Char('u') if ctrl => {
                self.input.clear();
                self.cursor = 0;
                Action::None
            }
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                Action::None
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.input_len();
                Action::None
            }
            KeyCode::Char(_) if ctrl => Action::None,
            KeyCode::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.input.insert(at, c);
                self.cursor += 1;
                Action::None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.input.remove(at);
                }
                Action::None
            }
            KeyCode::Delete => {
                if self.cursor < self.input_len() {
                    let at = self.byte_index(self.cursor);
                    self.input.remove(at);
                }
                Action::None
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                Action::None
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.input_len());
                Action::None
            }
            KeyCode::Home => {
                self.cursor = 0;
                Action::None
            }
            KeyCode::End => {
                self.cursor = self.input_len();
                Action::None
            }
            _ => Action::None,
        }
    }

    fn submit(&mut self) -> Action {
        if self.input.trim().is_empty() {
            return Action::None;
        }
        self.cursor = 0;
        Action::Send(std::mem::take(&mut self.input))
    }

    fn input_len(&self) -> usize {
        self.input.chars().count()
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}
