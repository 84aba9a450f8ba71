use crate::{Error, Result};
use std::fmt;

/// A trusted SQL fragment with alias placeholders.
///
/// Placeholders are written `{a}`, `{m}` or `{d}`. Literal braces are
/// written `{{` and `}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `{a}`: alias of the table a field is read from
    Alias,

    /// `{m}`: alias of the table holding a relationship field
    Master,

    /// `{d}`: alias of the table a relationship points to
    Detail,
}

impl Template {
    /// Parses `src`, accepting only the given placeholders.
    pub fn parse(src: &str, allowed: &[Placeholder]) -> Result<Template> {
        let mut segments = vec![];
        let mut text = String::new();
        let mut chars = src.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for ch in chars.by_ref() {
                        if ch == '}' {
                            closed = true;
                            break;
                        }
                        name.push(ch);
                    }
                    if !closed {
                        return Err(Error::invalid_schema(format!(
                            "unclosed placeholder `{{{name}` in `{src}`"
                        )));
                    }

                    let placeholder = Placeholder::from_name(&name)
                        .filter(|placeholder| allowed.contains(placeholder))
                        .ok_or_else(|| {
                            Error::invalid_schema(format!(
                                "unknown placeholder `{{{name}}}` in `{src}`"
                            ))
                        })?;

                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Placeholder(placeholder));
                }
                '}' => {
                    return Err(Error::invalid_schema(format!(
                        "unbalanced `}}` in `{src}`"
                    )))
                }
                ch => text.push(ch),
            }
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Template { segments })
    }

    /// Substitutes every placeholder with the alias `alias` returns for it.
    pub fn render(&self, mut alias: impl FnMut(Placeholder) -> String) -> String {
        let mut dst = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => dst.push_str(text),
                Segment::Placeholder(placeholder) => dst.push_str(&alias(*placeholder)),
            }
        }

        dst
    }

    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|segment| *segment == Segment::Placeholder(placeholder))
    }
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Placeholder> {
        match name {
            "a" => Some(Placeholder::Alias),
            "m" => Some(Placeholder::Master),
            "d" => Some(Placeholder::Detail),
            _ => None,
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Alias => f.write_str("{a}"),
            Placeholder::Master => f.write_str("{m}"),
            Placeholder::Detail => f.write_str("{d}"),
        }
    }
}
