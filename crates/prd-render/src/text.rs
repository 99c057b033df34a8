//! Plain-text helpers: inline Markdown stripping and word wrapping

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Strip inline Markdown markup, keeping readable text
///
/// Only emphasis, code spans, links and inline HTML are removed. Block
/// syntax at the start of a line (list numbers, `#`, `>`, rules, fences) is
/// kept as literal text. Blank lines separate paragraphs and become `\n`.
/// Link targets are kept in parentheses after the link text unless the text
/// already is the target.
#[must_use]
pub fn strip_markdown(source: &str) -> String {
    let guarded = source
        .lines()
        .map(guard_block_markers)
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = String::with_capacity(source.len());
    let mut links: Vec<(String, usize)> = Vec::new();

    for event in Parser::new(&guarded) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::Html(html) => out.push_str(html.trim_end()),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            Event::Start(Tag::Link { dest_url, .. }) => links.push((dest_url.to_string(), out.len())),
            Event::End(TagEnd::Link) => {
                if let Some((dest, start)) = links.pop() {
                    if out.get(start..).is_some_and(|text| text.trim() != dest) {
                        out.push_str(&format!(" ({dest})"));
                    }
                }
            }
            Event::End(TagEnd::Paragraph | TagEnd::HtmlBlock) => out.push('\n'),
            _ => {}
        }
    }
    out.trim_end().to_string()
}

/// Escape whatever would make a line open a block construct
///
/// Leading indentation is dropped so the line cannot become an indented
/// code block. Escapes are chosen so inline emphasis at the line start
/// still parses.
fn guard_block_markers(line: &str) -> String {
    let line = line.trim_start();
    let mut chars = line.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let second = chars.next();

    let escape_first = match first {
        '#' | '>' | '-' | '+' | '=' | '~' => true,
        '*' => second.map_or(true, char::is_whitespace) || is_rule(line),
        '_' => is_rule(line),
        '`' => line.starts_with("```"),
        _ => false,
    };
    if escape_first {
        return format!("\\{line}");
    }

    // `2024. Launch` and `1) Step` open ordered lists
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && matches!(line[digits..].chars().next(), Some('.' | ')')) {
        return format!("{}\\{}", &line[..digits], &line[digits..]);
    }
    line.to_string()
}

/// Thematic break: three or more of one marker, spaces allowed
fn is_rule(line: &str) -> bool {
    let mut marks = line.chars().filter(|c| !c.is_whitespace());
    let Some(mark) = marks.next() else {
        return false;
    };
    let mut count = 1;
    for c in marks {
        if c != mark {
            return false;
        }
        count += 1;
    }
    count >= 3
}

/// Greedy word wrap to `width` columns
///
/// Words longer than a line are split. Blank input yields no lines.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        let word_len = chars.len();
        if word_len == 0 {
            continue;
        }
        if line_len > 0 && line_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line.extend(chars);
        line_len += word_len;
    }
    if line_len > 0 {
        lines.push(line);
    }
    lines
}

/// Wrap with a first-line prefix and a hanging indent for the rest
#[must_use]
pub fn wrap_prefixed(text: &str, width: usize, prefix: &str, indent: &str) -> Vec<String> {
    let inner = width.saturating_sub(prefix.chars().count()).max(1);
    wrap(text, inner)
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let lead = if i == 0 { prefix } else { indent };
            format!("{lead}{line}")
        })
        .collect()
}

/// Truncate to `width` characters
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}
