//! Terminal output.
//!
//! Layout math (column widths, truncation) uses display width rather than
//! byte length so that wide characters line up. Colors come from `console`,
//! which turns them off when stdout is not a terminal.

use super::setup::Commands;
use console::Style;
use todoapp::api::{CmdMessage, CmdResult, MessageLevel};
use todoapp::model::{Status, Todo};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const DONE_MARKER: &str = "[x]";
const PENDING_MARKER: &str = "[ ]";
const NEWLINE_MARKER: &str = " ⏎ ";

/// Renders the outcome of `command` as the text to print on stdout.
pub fn render_result(command: &Commands, result: &CmdResult, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(result)?));
    }

    let mut out = String::new();
    match command {
        Commands::List { .. } => out.push_str(&render_list(&result.listed)),
        Commands::Get { .. } => out.push_str(&render_full(&result.listed)),
        _ => {}
    }
    out.push_str(&render_messages(&result.messages));
    Ok(out)
}

pub fn render_list(todos: &[Todo]) -> String {
    let id_width = todos.iter().map(|t| t.id.width()).max().unwrap_or(0);
    let muted = Style::new().dim();

    let mut out = String::new();
    for todo in todos {
        let padding = " ".repeat(id_width - todo.id.width());
        let prefix_width = DONE_MARKER.width() + 1 + id_width + 2;
        let data = truncate_to_width(
            &single_line(&todo.data),
            LINE_WIDTH.saturating_sub(prefix_width),
        );
        out.push_str(&format!(
            "{} {}{}  {}\n",
            status_marker(todo.status),
            muted.apply_to(&todo.id),
            padding,
            data
        ));
    }
    out
}

pub fn render_full(todos: &[Todo]) -> String {
    let label = Style::new().bold();
    let mut out = String::new();
    for (i, todo) in todos.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{} {}\n", label.apply_to("id:"), todo.id));
        out.push_str(&format!(
            "{} {}\n",
            label.apply_to("status:"),
            status_style(todo.status).apply_to(todo.status)
        ));
        out.push_str(&format!("{}\n{}\n", label.apply_to("data:"), todo.data));
    }
    out
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    messages
        .iter()
        .map(|message| {
            let style = match message.level {
                MessageLevel::Info => Style::new().dim(),
                MessageLevel::Success => Style::new().green(),
            };
            format!("{}\n", style.apply_to(&message.content))
        })
        .collect()
}

fn status_style(status: Status) -> Style {
    match status {
        Status::Done => Style::new().green(),
        Status::Pending => Style::new().yellow(),
    }
}

fn status_marker(status: Status) -> console::StyledObject<&'static str> {
    let marker = match status {
        Status::Done => DONE_MARKER,
        Status::Pending => PENDING_MARKER,
    };
    status_style(status).apply_to(marker)
}

fn single_line(data: &str) -> String {
    data.replace("\r\n", "\n").replace(['\n', '\r'], NEWLINE_MARKER)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let limit = max_width.saturating_sub(1);
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;

    fn plain(s: &str) -> String {
        strip_ansi_codes(s).into_owned()
    }

    #[test]
    fn test_list_aligns_ids_by_display_width() {
        let todos = vec![
            Todo::with_id("1", "short id", Status::Pending),
            Todo::with_id("日本", "wide id", Status::Done),
        ];
        let out = plain(&render_list(&todos));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "[ ] 1     short id");
        assert_eq!(lines[1], "[x] 日本  wide id");
    }

    #[test]
    fn test_list_flattens_multiline_data() {
        let todos = vec![Todo::with_id("1", "first\nsecond", Status::Pending)];
        assert_eq!(plain(&render_list(&todos)), "[ ] 1  first ⏎ second\n");
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        assert_eq!(render_list(&[]), "");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 5), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn test_full_view_keeps_data_verbatim() {
        let todos = vec![Todo::with_id("7", "line one\nline two", Status::Done)];
        assert_eq!(
            plain(&render_full(&todos)),
            "id: 7\nstatus: DONE\ndata:\nline one\nline two\n"
        );
    }

    #[test]
    fn test_messages_follow_listing() {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info("No todos."));
        let out = render_result(&Commands::List { status: None }, &result, false).unwrap();
        assert_eq!(plain(&out), "No todos.\n");
    }

    #[test]
    fn test_json_output() {
        let mut result = CmdResult::default();
        result.affected.push(Todo::with_id("1", "one", Status::Done));
        let out = render_result(
            &Commands::Rm {
                id: "1".to_string(),
            },
            &result,
            true,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["affected"][0]["status"], "DONE");
        assert_eq!(value["messages"], serde_json::json!([]));
    }
}
