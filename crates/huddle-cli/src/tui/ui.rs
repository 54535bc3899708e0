use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use textwrap::{wrap, Options, WordSplitter};

use huddle_core::clock::now_hms;
use huddle_core::identity::AGENT_PREFIX;
use huddle_core::{LogEntry, HUMAN_AUTHOR, SYSTEM_AUTHOR};

use super::app::App;

/// Render the full console frame.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // messages
            Constraint::Length(1), // status bar
            Constraint::Length(1), // input
        ])
        .split(f.area());

    render_messages(f, app, chunks[0]);
    render_status_bar(f, app, chunks[1]);
    render_input(f, app, chunks[2]);
}

pub fn author_style(author: &str) -> Style {
    match author {
        HUMAN_AUTHOR => Style::default().fg(Color::Green),
        SYSTEM_AUTHOR => Style::default().fg(Color::Yellow),
        a if a.starts_with(AGENT_PREFIX) => Style::default().fg(Color::Cyan),
        _ => Style::default(),
    }
}

/// Narrowest body column before wrapping falls back to the full width.
const MIN_BODY_WIDTH: usize = 20;

fn wrap_to(text: &str, width: usize) -> Vec<String> {
    let options = Options::new(width.max(1))
        .break_words(true)
        .word_splitter(WordSplitter::NoHyphenation);
    let lines: Vec<String> = wrap(text, options).into_iter().map(|l| l.into_owned()).collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// Screen rows for one raw log line at `width` columns.
///
/// Entries keep the `[time] [author] ` prefix on the first row and indent
/// continuation rows to line up under the body. Lines that do not parse
/// are wrapped as plain text.
fn message_rows(raw: &str, width: usize) -> Vec<Line<'static>> {
    let Some(entry) = LogEntry::parse(raw) else {
        return wrap_to(raw, width).into_iter().map(Line::from).collect();
    };
    let stamp = format!("[{}] ", entry.timestamp);
    let author = format!("[{}]", entry.author);
    let indent = stamp.chars().count() + author.chars().count() + 1;
    let (body_width, indent) = match width.saturating_sub(indent) {
        w if w >= MIN_BODY_WIDTH => (w, indent),
        _ => (width, 0),
    };

    let mut body = wrap_to(&entry.body, body_width).into_iter();
    let first = body.next().unwrap_or_default();
    let mut rows = vec![Line::from(vec![
        Span::styled(stamp, Style::default().add_modifier(Modifier::DIM)),
        Span::styled(author, author_style(&entry.author).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::raw(first),
    ])];
    rows.extend(body.map(|rest| Line::from(format!("{}{rest}", " ".repeat(indent)))));
    rows
}

fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let height = area.height as usize;
    let width = area.width as usize;
    let mut rows: Vec<Line> = Vec::new();
    // Walk back from the newest message until the area is full.
    for raw in app.messages.iter().rev() {
        let mut message = message_rows(raw, width);
        message.append(&mut rows);
        rows = message;
        if rows.len() >= height {
            break;
        }
    }
    let start = rows.len().saturating_sub(height);
    f.render_widget(Paragraph::new(rows.split_off(start)), area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.error {
        Some(err) => (
            format!(" ERROR: {err}"),
            Style::default().fg(Color::White).bg(Color::Red),
        ),
        None => (
            format!(
                " {} │ {} │ Enter:send  Ctrl-D:quit+kill  Ctrl-C:quit  Ctrl-L:redraw",
                app.session,
                now_hms()
            ),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
    };
    f.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let prompt = input_prompt(&app.user);
    let prompt_width = prompt.chars().count();
    let line = Line::from(vec![
        Span::styled(prompt, Style::default().fg(Color::Green)),
        Span::raw(app.input.as_str()),
    ]);
    f.render_widget(Paragraph::new(line), area);

    let x = area.x as usize + prompt_width + app.cursor;
    let max_x = area.right().saturating_sub(1) as usize;
    f.set_cursor_position(Position::new(x.min(max_x) as u16, area.y));
}

pub fn input_prompt(user: &str) -> String {
    format!("[{user}]> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn author_colours() {
        assert_eq!(author_style("human").fg, Some(Color::Green));
        assert_eq!(author_style("system").fg, Some(Color::Yellow));
        assert_eq!(author_style("agent3").fg, Some(Color::Cyan));
        assert_eq!(author_style("reviewer").fg, None);
    }

    #[test]
    fn shows_latest_messages_that_fit() {
        let mut app = App::new("human".into(), "multi-agent".into());
        app.push_lines((1..=5).map(|i| format!("[10:00:00] [agent1] msg {i}")));
        app.input = "draft".into();
        app.cursor = 5;

        let rows = screen(&app, 60, 5);
        assert_eq!(rows[0], "[10:00:00] [agent1] msg 3");
        assert_eq!(rows[2], "[10:00:00] [agent1] msg 5");
        assert!(rows[3].contains("multi-agent │"));
        assert_eq!(rows[4], "[human]> draft");
    }

    #[test]
    fn long_messages_wrap_under_the_body() {
        let mut app = App::new("human".into(), "s".into());
        app.push_lines([
            "[10:00:00] [agent1] alpha beta gamma delta epsilon zeta eta theta".to_string(),
            "not a chat line at all".to_string(),
        ]);

        let rows = screen(&app, 40, 6);
        assert_eq!(rows[0], "[10:00:00] [agent1] alpha beta gamma");
        assert_eq!(rows[1], "                    delta epsilon zeta");
        assert_eq!(rows[2], "                    eta theta");
        assert_eq!(rows[3], "not a chat line at all");
    }

    #[test]
    fn wrapped_rows_count_against_the_visible_area() {
        let mut app = App::new("human".into(), "s".into());
        app.push_lines([
            "[10:00:00] [agent1] old".to_string(),
            "[10:00:01] [agent2] one two three four five six seven eight nine ten".to_string(),
        ]);

        let rows = screen(&app, 40, 6);
        assert_eq!(rows[0], "[10:00:00] [agent1] old");
        assert_eq!(rows[3], "                    nine ten");

        let rows = screen(&app, 40, 5);
        assert_eq!(rows[0], "[10:00:01] [agent2] one two three four");
        assert_eq!(rows[1], "                    five six seven eight");
        assert_eq!(rows[2], "                    nine ten");
    }

    #[test]
    fn error_replaces_status() {
        let mut app = App::new("human".into(), "s".into());
        app.error = Some("disk full".into());
        let rows = screen(&app, 40, 3);
        assert_eq!(rows[1], " ERROR: disk full");
    }
}
