//! Inline token scanner shared by `input:`, `paste:` and `output:`.
//!
//! Recognized tokens:
//!
//! | Token | Part |
//! |-------|------|
//! | `%{delay 500}` | [`Part::Delay`] |
//! | `%{begin:32}` | [`Part::ColorBegin`] with a text color |
//! | `%{begin:40;32}` | [`Part::ColorBegin`] with background and text colors |
//! | `%{end}`, `%{end:40;32}` | [`Part::ColorEnd`] |
//!
//! Color codes may carry a trailing `m` (`%{begin:40m;32m}`). Anything that
//! looks like `%{...}` but does not match the grammar stays literal text.

/// A fragment of an input, paste or output payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Printed output text.
    Text(String),
    /// Text typed one character at a time.
    Typing(String),
    /// Text pasted in one go.
    Insert(String),
    /// A pause in milliseconds.
    Delay(u64),
    ColorBegin { background: Option<u8>, text: u8 },
    ColorEnd,
}

impl Part {
    pub fn is_literal(&self) -> bool {
        matches!(self, Part::Text(_) | Part::Typing(_) | Part::Insert(_))
    }

    /// The literal value, if this is a literal part.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Part::Text(s) | Part::Typing(s) | Part::Insert(s) => Some(s),
            _ => None,
        }
    }

    /// Which literal kind this part is, if any.
    pub fn literal_kind(&self) -> Option<LiteralKind> {
        match self {
            Part::Text(_) => Some(LiteralKind::Text),
            Part::Typing(_) => Some(LiteralKind::Typing),
            Part::Insert(_) => Some(LiteralKind::Insert),
            _ => None,
        }
    }
}

/// The tag given to literal runs found by [`scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Text,
    Typing,
    Insert,
}

impl LiteralKind {
    pub fn part(self, value: impl Into<String>) -> Part {
        let value = value.into();
        match self {
            LiteralKind::Text => Part::Text(value),
            LiteralKind::Typing => Part::Typing(value),
            LiteralKind::Insert => Part::Insert(value),
        }
    }
}

/// Split `text` into literal runs and tokens, left to right.
///
/// Empty literal runs around tokens are dropped. Text without any token comes
/// back as a single literal part, even when it is empty.
///
/// # Example
///
/// ```
/// use scenetty::tokens::{scan, LiteralKind, Part};
///
/// let parts = scan("ls%{delay 300} -la", LiteralKind::Typing);
/// assert_eq!(
///     parts,
///     vec![
///         Part::Typing("ls".into()),
///         Part::Delay(300),
///         Part::Typing(" -la".into()),
///     ]
/// );
/// ```
pub fn scan(text: &str, kind: LiteralKind) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find("%{") {
        let open = cursor + offset;
        let body_start = open + 2;
        let Some(body_len) = text[body_start..].find('}') else {
            break;
        };
        let close = body_start + body_len;
        match parse_token(&text[body_start..close]) {
            Some(token) => {
                push_literal(&mut parts, kind, &text[literal_start..open]);
                parts.push(token);
                cursor = close + 1;
                literal_start = cursor;
            }
            // `%` is one byte, so `open + 1` is a char boundary.
            None => cursor = open + 1,
        }
    }

    if parts.is_empty() {
        return vec![kind.part(text)];
    }
    push_literal(&mut parts, kind, &text[literal_start..]);
    parts
}

fn push_literal(parts: &mut Vec<Part>, kind: LiteralKind, literal: &str) {
    if !literal.is_empty() {
        parts.push(kind.part(literal));
    }
}

fn parse_token(body: &str) -> Option<Part> {
    if let Some(rest) = body.strip_prefix("delay") {
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        return parse_uint(rest.trim()).map(Part::Delay);
    }
    if let Some(spec) = body.strip_prefix("begin:") {
        return parse_color_spec(spec);
    }
    if body == "end" || body.starts_with("end:") {
        return Some(Part::ColorEnd);
    }
    None
}

fn parse_color_spec(spec: &str) -> Option<Part> {
    match spec.split_once(';') {
        Some((background, text)) => Some(Part::ColorBegin {
            background: Some(parse_color_code(background)?),
            text: parse_color_code(text)?,
        }),
        None => Some(Part::ColorBegin {
            background: None,
            text: parse_color_code(spec)?,
        }),
    }
}

fn parse_color_code(code: &str) -> Option<u8> {
    let code = code.trim();
    let digits = code.strip_suffix('m').unwrap_or(code);
    u8::try_from(parse_uint(digits)?).ok()
}

fn parse_uint(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Render parts back into scenario text using the token grammar.
pub fn render(parts: &[Part]) -> String {
    let mut out = String::new();
    for part in parts {
        render_part(part, &mut out);
    }
    out
}

pub(crate) fn render_part(part: &Part, out: &mut String) {
    match part {
        Part::Text(s) | Part::Typing(s) | Part::Insert(s) => out.push_str(s),
        Part::Delay(ms) => out.push_str(&format!("%{{delay {ms}}}")),
        Part::ColorBegin {
            background: Some(background),
            text,
        } => out.push_str(&format!("%{{begin:{background};{text}}}")),
        Part::ColorBegin {
            background: None,
            text,
        } => out.push_str(&format!("%{{begin:{text}}}")),
        Part::ColorEnd => out.push_str("%{end}"),
    }
}
