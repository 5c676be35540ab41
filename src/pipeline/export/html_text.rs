//! Flattens report HTML into printable text lines.
//!
//! Loose by construction: no CSS, no nesting model. Block-level tags break
//! lines, table cells are joined with " | ", headings and header rows are
//! marked bold. Content of `<head>`, `<style>` and `<script>` is dropped.

/// One printable line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub bold: bool,
    /// Horizontal rule (`<hr>`), rendered as a separator.
    pub rule: bool,
}

const SKIPPED_ELEMENTS: &[&str] = &["head", "style", "script", "title"];
const BLOCK_ELEMENTS: &[&str] = &[
    "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "table", "li", "ul", "ol", "body", "br",
];
const BOLD_ELEMENTS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "th", "strong", "b"];

struct Builder {
    lines: Vec<TextLine>,
    current: String,
    current_bold: bool,
    bold_depth: usize,
    cells_in_row: usize,
}

impl Builder {
    fn break_line(&mut self) {
        let text = collapse_whitespace(&self.current);
        if !text.is_empty() {
            self.lines.push(TextLine {
                text,
                bold: self.current_bold,
                rule: false,
            });
        }
        self.current.clear();
        self.current_bold = false;
        self.cells_in_row = 0;
    }

    fn push_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            if !self.current.is_empty() {
                self.current.push(' ');
            }
            return;
        }
        if self.bold_depth > 0 {
            self.current_bold = true;
        }
        self.current.push_str(&decode_entities(text));
    }
}

/// Flatten `html` into lines.
pub fn html_to_lines(html: &str) -> Vec<TextLine> {
    let mut b = Builder {
        lines: Vec::new(),
        current: String::new(),
        current_bold: false,
        bold_depth: 0,
        cells_in_row: 0,
    };
    let mut skip_until: Option<String> = None;
    let mut rest = html;

    while !rest.is_empty() {
        let Some(open) = rest.find('<') else {
            if skip_until.is_none() {
                b.push_text(rest);
            }
            break;
        };
        if open > 0 && skip_until.is_none() {
            b.push_text(&rest[..open]);
        }
        let after = &rest[open + 1..];
        let Some(close) = after.find('>') else {
            // Unterminated tag: treat the remainder as text.
            if skip_until.is_none() {
                b.push_text(&rest[open..]);
            }
            break;
        };
        let tag = &after[..close];
        rest = &after[close + 1..];

        let (closing, name) = parse_tag_name(tag);
        if name.is_empty() {
            continue;
        }

        if let Some(ref skipped) = skip_until {
            if closing && *skipped == name {
                skip_until = None;
            }
            continue;
        }
        if !closing && SKIPPED_ELEMENTS.contains(&name.as_str()) && !tag.ends_with('/') {
            skip_until = Some(name);
            continue;
        }

        if name == "hr" {
            b.break_line();
            b.lines.push(TextLine {
                text: String::new(),
                bold: false,
                rule: true,
            });
            continue;
        }

        if !closing && matches!(name.as_str(), "td" | "th") {
            if b.cells_in_row > 0 {
                b.current.push_str(" | ");
            }
            b.cells_in_row += 1;
        }

        if BOLD_ELEMENTS.contains(&name.as_str()) {
            if closing {
                b.bold_depth = b.bold_depth.saturating_sub(1);
            } else {
                b.bold_depth += 1;
            }
        }

        if BLOCK_ELEMENTS.contains(&name.as_str()) {
            b.break_line();
        }
    }
    b.break_line();
    b.lines
}

fn parse_tag_name(tag: &str) -> (bool, String) {
    let tag = tag.trim();
    if tag.starts_with('!') || tag.starts_with('?') {
        return (false, String::new());
    }
    let (closing, body) = match tag.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, tag),
    };
    let name: String = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    (closing, name)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the handful of entities the renderer emits, plus numeric ones.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';') {
            Some(semi) if semi <= 10 => {
                let entity = &tail[1..semi];
                match decode_entity(entity) {
                    Some(c) => out.push(c),
                    None => out.push_str(&tail[..=semi]),
                }
                rest = &tail[semi + 1..];
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = entity.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
