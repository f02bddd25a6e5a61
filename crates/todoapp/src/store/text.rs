//! # Line-oriented Text Backend
//!
//! One item per line, fields joined by `": "` in the order `id`, `data`,
//! `status`:
//!
//! ```text
//! 1: buy milk: TODO
//! 2: call mom: DONE
//! ```
//!
//! Lines are joined with `\n` and the last line has no trailing newline.
//! `\r\n` is read as `\n`. A line with only two fields is pending.
//!
//! ## Escaping
//!
//! A bare `": "` split cannot represent data that itself contains the
//! separator, so fields are percent-escaped on write:
//!
//! | Character | Written as |
//! |-----------|------------|
//! | `%`       | `%25`      |
//! | `:`       | `%3A`      |
//! | `\n`      | `%0A`      |
//! | `\r`      | `%0D`      |
//!
//! An escaped field never contains a colon or a line break, so splitting on
//! the separator is exact and any data round-trips. Unescaped files written
//! by older tools read back unchanged as long as their fields hold no `%`.
//!
//! ## Rejected Lines
//!
//! Empty lines, lines with fewer than two or more than three fields,
//! broken `%` escapes and unknown status tokens are reported as
//! `MalformedLine` with the 1-based line number. That includes an empty
//! last line left by a trailing newline.

use super::file_store::{FileFormat, FileStore, FormatError};
use crate::model::{Status, Todo};

pub type TextStore = FileStore<TextLines>;

pub const SEPARATOR: &str = ": ";

pub struct TextLines;

impl FileFormat for TextLines {
    type Collection = Vec<Todo>;

    const NAME: &'static str = "text";
    const EMPTY: &'static str = "";

    fn decode(raw: &str) -> Result<Vec<Todo>, FormatError> {
        let normalized = raw.replace("\r\n", "\n");
        normalized
            .split('\n')
            .enumerate()
            .map(|(i, line)| {
                parse_line(line).map_err(|reason| FormatError::Line {
                    line: i + 1,
                    reason,
                })
            })
            .collect()
    }

    fn encode(items: &Vec<Todo>) -> Result<String, FormatError> {
        Ok(items.iter().map(format_line).collect::<Vec<_>>().join("\n"))
    }

    fn items(items: &Vec<Todo>) -> Vec<Todo> {
        items.clone()
    }

    fn find<'a>(items: &'a Vec<Todo>, id: &str) -> Option<&'a Todo> {
        items.iter().find(|t| t.id == id)
    }

    fn find_mut<'a>(items: &'a mut Vec<Todo>, id: &str) -> Option<&'a mut Todo> {
        items.iter_mut().find(|t| t.id == id)
    }

    fn insert(items: &mut Vec<Todo>, todo: Todo) {
        items.push(todo);
    }

    fn take(items: &mut Vec<Todo>, id: &str) -> Option<Todo> {
        let pos = items.iter().position(|t| t.id == id)?;
        Some(items.remove(pos))
    }
}

pub fn format_line(todo: &Todo) -> String {
    format!(
        "{}{SEPARATOR}{}{SEPARATOR}{}",
        escape(&todo.id),
        escape(&todo.data),
        todo.status
    )
}

pub fn parse_line(line: &str) -> Result<Todo, String> {
    if line.is_empty() {
        return Err("empty line".to_string());
    }

    let parts: Vec<&str> = line.split(SEPARATOR).collect();
    let (id, data, status) = match parts.as_slice() {
        [id, data] => (*id, *data, ""),
        [id, data, status] => (*id, *data, *status),
        [_] => return Err(format!("expected at least 2 fields, found 1: {:?}", line)),
        _ => {
            return Err(format!(
                "expected at most 3 fields, found {}: {:?}",
                parts.len(),
                line
            ))
        }
    };

    let status = Status::parse(status).map_err(|e| e.to_string())?;
    Ok(Todo {
        id: unescape(id)?,
        data: unescape(data)?,
        status,
    })
}

pub fn escape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for ch in field.chars() {
        match ch {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            '\n' => out.push_str("%0A"),
            '\r' => out.push_str("%0D"),
            other => out.push(other),
        }
    }
    out
}

pub fn unescape(field: &str) -> Result<String, String> {
    if !field.contains('%') {
        return Ok(field.to_string());
    }

    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| format!("invalid escape at byte {} in {:?}", i, field))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| format!("escape produces invalid UTF-8 in {:?}", field))
}
