use huddle_core::identity::AGENT_PREFIX;

/// Field separator used in `list-panes -F` output.
pub(crate) const FIELD_SEP: char = '\t';

/// `list-panes` format string matching [`Pane::parse`].
pub(crate) const PANE_FORMAT: &str =
    "#{pane_id}\t#{pane_index}\t#{pane_title}\t#{pane_current_command}";

/// One pane of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    /// tmux pane id, e.g. `%3`. Stable for the life of the pane.
    pub id: String,
    pub index: usize,
    pub title: String,
    pub command: String,
}

impl Pane {
    /// Parse one line of `list-panes` output.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.splitn(4, FIELD_SEP);
        let id = fields.next()?.trim();
        let index = fields.next()?.trim().parse().ok()?;
        let title = fields.next().unwrap_or("").to_string();
        let command = fields.next().unwrap_or("").trim().to_string();
        if !id.starts_with('%') {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            index,
            title,
            command,
        })
    }
}

/// How a user names a pane on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneRef {
    /// A tmux pane id such as `%7`.
    Id(String),
    /// Agent number as given to `start` (`agent3` or `3`).
    Agent(usize),
    /// Anything else, matched against pane titles.
    Title(String),
}

impl PaneRef {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with('%') {
            return PaneRef::Id(raw.to_string());
        }
        let digits = raw.strip_prefix(AGENT_PREFIX).unwrap_or(raw);
        match digits.parse::<usize>() {
            Ok(n) if n > 0 && !digits.is_empty() => PaneRef::Agent(n),
            _ => PaneRef::Title(raw.to_string()),
        }
    }

    /// Pick the matching pane. Agents match by title `agent<N>` first, then
    /// by pane index `N-1`.
    pub fn resolve<'a>(&self, panes: &'a [Pane]) -> Option<&'a Pane> {
        match self {
            PaneRef::Id(id) => panes.iter().find(|p| &p.id == id),
            PaneRef::Agent(n) => {
                let title = agent_title(*n);
                panes
                    .iter()
                    .find(|p| p.title == title)
                    .or_else(|| panes.iter().find(|p| p.index + 1 == *n))
            }
            PaneRef::Title(t) => panes.iter().find(|p| &p.title == t),
        }
    }
}

impl std::fmt::Display for PaneRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaneRef::Id(id) => f.write_str(id),
            PaneRef::Agent(n) => f.write_str(&agent_title(*n)),
            PaneRef::Title(t) => f.write_str(t),
        }
    }
}

/// Pane title given to agent `n`.
pub fn agent_title(n: usize) -> String {
    format!("{AGENT_PREFIX}{n}")
}
