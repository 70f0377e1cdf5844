//! Placeholder tokens and the segmented view of templated text.
//!
//! A placeholder is rendered as `\u{0}\u{1}<|NAME|>\u{1}\u{0}`.  The
//! control-character brackets keep tokens distinguishable from ordinary
//! occurrences of the variable name, and the rendering is byte-compatible
//! with repositories written by earlier versions of the tool.

/// Opening delimiter of a placeholder token.
pub const OPEN: &str = "\u{0}\u{1}<|";

/// Closing delimiter of a placeholder token.
pub const CLOSE: &str = "|>\u{1}\u{0}";

/// A placeholder for one device variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Device variable name.
    pub name: &'a str,
}

impl<'a> Placeholder<'a> {
    /// Create a placeholder for `name`.
    #[must_use]
    pub const fn new(name: &'a str) -> Self {
        Self { name }
    }

    /// Render the token text stored in templates.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{OPEN}{}{CLOSE}", self.name)
    }
}

/// Whether `text` contains either placeholder delimiter.
#[must_use]
pub fn contains_delimiter(text: &str) -> bool {
    text.contains(OPEN) || text.contains(CLOSE)
}

/// A run of templated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text.
    Text(String),
    /// A placeholder token, identified by variable name.
    Token(String),
}

/// Split `text` into literal runs and placeholder tokens.
///
/// An opening delimiter without a matching close, or enclosing a name that
/// contains control characters, is kept as literal text.
#[must_use]
pub fn segments(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let (before, from_open) = rest.split_at(start);
        literal.push_str(before);
        let after_open = from_open.get(OPEN.len()..).unwrap_or_default();
        match after_open.find(CLOSE) {
            Some(end) => {
                let name = after_open.get(..end).unwrap_or_default();
                if is_valid_name(name) {
                    if !literal.is_empty() {
                        out.push(Segment::Text(std::mem::take(&mut literal)));
                    }
                    out.push(Segment::Token(name.to_string()));
                    rest = after_open.get(end + CLOSE.len()..).unwrap_or_default();
                } else {
                    literal.push_str(OPEN);
                    rest = after_open;
                }
            }
            None => {
                literal.push_str(from_open);
                rest = "";
            }
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        out.push(Segment::Text(literal));
    }
    out
}

/// Replace every occurrence of `value` inside literal runs with a token for
/// `name`.  Existing tokens are left untouched.
#[must_use]
pub fn substitute(segments: Vec<Segment>, name: &str, value: &str) -> Vec<Segment> {
    if value.is_empty() {
        return segments;
    }
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Text(text) => {
                let mut pieces = text.split(value).peekable();
                while let Some(piece) = pieces.next() {
                    if !piece.is_empty() {
                        out.push(Segment::Text(piece.to_string()));
                    }
                    if pieces.peek().is_some() {
                        out.push(Segment::Token(name.to_string()));
                    }
                }
            }
            token @ Segment::Token(_) => out.push(token),
        }
    }
    out
}

/// Render segments back into a single string.
#[must_use]
pub fn render(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.clone(),
            Segment::Token(name) => Placeholder::new(name).render(),
        })
        .collect()
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_control)
}
