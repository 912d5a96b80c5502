//! Marker grammar
//!
//! Server-rendered markup carries its data requirements as naming-convention markers inside
//! class attributes and text:
//!
//! ```text
//! svelte-<seg>-<seg>{type}-...-          plain reference to a property path
//! iter-<ancestors>-<prop>[<index>]--     loop over a list property
//! iter-<ancestors>-<prop>[<key>-<val>]-- iteration over a keyed map property
//! ```
//!
//! Scanning is two-staged: a regex finds candidate prefixes at word boundaries, then the body
//! after the prefix is lexed with logos ([`tokens`]) and recognized by hand into a tagged
//! [`Marker`]. Text that merely looks like a prefix (Svelte's own `svelte-1xyz` scoped classes,
//! an `iter-` utility class without a binding) is not a marker. Text that is unmistakably a
//! marker but is cut short is a [`MarkerError`]. A word running on past the last dash is plain
//! text after the marker: `svelte-kit-based` is `svelte-kit-` followed by `based`.

pub mod annotation;
pub mod tokens;

use crate::error::MarkerError;
use crate::schema::PropType;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use tokens::{lex_marker_body, MarkerToken};

pub const REFERENCE_PREFIX: &str = "svelte-";
pub const ITERATION_PREFIX: &str = "iter-";

/// Candidate marker prefixes; group 1 tells the two families apart
static MARKER_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(svelte|iter)-").unwrap());

/// One dash-delimited path segment of a plain reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub annotation: Option<PropType>,
}

/// A plain property reference, `svelte-a-b{int}-`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub segments: Vec<Segment>,
}

impl Reference {
    /// The property path with type annotations stripped
    pub fn path(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.name.clone()).collect()
    }
}

/// How an iteration binds its variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Loop { index: String },
    KeyedMap { key: String, value: String },
}

impl Binding {
    /// The variable holding the current element
    pub fn variable(&self) -> &str {
        match self {
            Binding::Loop { index } => index,
            Binding::KeyedMap { value, .. } => value,
        }
    }
}

/// An iteration marker, `iter-items[i]-meta[k-v]--`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationMarker {
    /// Path segments written before the bound property (their own bindings are dropped)
    pub ancestors: Vec<String>,
    pub name: String,
    pub binding: Binding,
}

/// A recognized marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Reference(Reference),
    Iteration(IterationMarker),
}

/// Marker family, as reported by [`classify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    PlainReference,
    Loop,
    KeyedMap,
    NoMatch,
}

impl Marker {
    pub fn kind(&self) -> MarkerKind {
        match self {
            Marker::Reference(_) => MarkerKind::PlainReference,
            Marker::Iteration(IterationMarker {
                binding: Binding::Loop { .. },
                ..
            }) => MarkerKind::Loop,
            Marker::Iteration(IterationMarker {
                binding: Binding::KeyedMap { .. },
                ..
            }) => MarkerKind::KeyedMap,
        }
    }
}

/// Marker with its byte range in the scanned text
pub type SpannedMarker = (Marker, Range<usize>);

/// Find every marker in `text`, in order of appearance.
pub fn scan(text: &str) -> Result<Vec<SpannedMarker>, MarkerError> {
    let mut markers = Vec::new();
    let mut resume_at = 0;

    for caps in MARKER_PREFIX_REGEX.captures_iter(text) {
        let Some(prefix) = caps.get(0) else {
            continue;
        };
        if prefix.start() < resume_at {
            continue;
        }

        let body_start = prefix.end();
        let body = &text[body_start..];
        let recognized = match &caps[1] {
            "svelte" => recognize_reference(text, prefix.start(), body)?,
            _ => recognize_iteration(text, prefix.start(), body)?,
        };

        if let Some((marker, body_len)) = recognized {
            let span = prefix.start()..body_start + body_len;
            resume_at = span.end;
            markers.push((marker, span));
        }
    }

    Ok(markers)
}

/// Classify a single token, e.g. one class name.
///
/// Only a marker starting at the beginning of the token counts.
pub fn classify(token: &str) -> Result<MarkerKind, MarkerError> {
    Ok(scan(token)?
        .into_iter()
        .find(|(_, span)| span.start == 0)
        .map_or(MarkerKind::NoMatch, |(marker, _)| marker.kind()))
}

/// Token cursor over a lexed marker body
struct Cursor<'s> {
    body: &'s str,
    tokens: Vec<(MarkerToken, Range<usize>)>,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn new(body: &'s str) -> Self {
        Cursor {
            body,
            tokens: lex_marker_body(body),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<MarkerToken> {
        self.tokens.get(self.pos).map(|(token, _)| *token)
    }

    fn eat(&mut self, expected: MarkerToken) -> Option<&'s str> {
        match self.tokens.get(self.pos) {
            Some((token, span)) if *token == expected => {
                self.pos += 1;
                Some(&self.body[span.clone()])
            }
            _ => None,
        }
    }

    /// Byte offset just past the last consumed token
    fn offset(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|last| self.tokens.get(last))
            .map_or(0, |(_, span)| span.end)
    }

    fn rest(&self) -> &'s str {
        &self.body[self.offset()..]
    }
}

/// Text of a (possibly truncated) marker for error messages
fn marker_text(text: &str, start: usize, end: usize) -> String {
    text[start..end].to_string()
}

/// End of the whitespace- or markup-delimited word starting at `start`
fn word_end(text: &str, start: usize) -> usize {
    text[start..]
        .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>'))
        .map_or(text.len(), |len| start + len)
}

fn recognize_reference(
    text: &str,
    start: usize,
    body: &str,
) -> Result<Option<(Marker, usize)>, MarkerError> {
    let mut cursor = Cursor::new(body);
    let mut segments = Vec::new();
    let body_start = start + REFERENCE_PREFIX.len();

    loop {
        // End of the marker if this segment turns out to be trailing text
        let segment_start = cursor.offset();
        let Some(name) = cursor.eat(MarkerToken::Ident) else {
            // Only reachable before the first segment: after a dash we check for an ident first
            return Ok(None);
        };

        let annotation = match cursor.eat(MarkerToken::Annotation) {
            Some(raw) => {
                let inner = &raw[1..raw.len() - 1];
                let ty = annotation::parse_annotation(inner).ok_or_else(|| {
                    MarkerError::InvalidType {
                        annotation: inner.to_string(),
                        marker: marker_text(text, start, body_start + cursor.offset()),
                    }
                })?;
                Some(ty)
            }
            None if cursor.rest().starts_with('{') => {
                return Err(MarkerError::Unterminated {
                    marker: marker_text(text, start, word_end(text, start)),
                    expected: "}",
                });
            }
            None => None,
        };

        if cursor.eat(MarkerToken::Dash).is_none() {
            if annotation.is_some() {
                return Err(MarkerError::Unterminated {
                    marker: marker_text(text, start, body_start + cursor.offset()),
                    expected: "-",
                });
            }
            // `svelte-kit` is not a marker; `svelte-kit-based` is `svelte-kit-` then `based`
            if segments.is_empty() {
                return Ok(None);
            }
            return Ok(Some((
                Marker::Reference(Reference { segments }),
                segment_start,
            )));
        }

        segments.push(Segment {
            name: name.to_string(),
            annotation,
        });

        match cursor.peek() {
            Some(MarkerToken::Ident) => continue,
            Some(MarkerToken::Dash) => {
                cursor.eat(MarkerToken::Dash);
                break;
            }
            _ => break,
        }
    }

    Ok(Some((
        Marker::Reference(Reference { segments }),
        cursor.offset(),
    )))
}

fn recognize_iteration(
    text: &str,
    start: usize,
    body: &str,
) -> Result<Option<(Marker, usize)>, MarkerError> {
    let mut cursor = Cursor::new(body);
    let mut ancestors = Vec::new();
    let mut saw_binding = false;
    let body_start = start + ITERATION_PREFIX.len();
    let unterminated = |cursor: &Cursor, expected| MarkerError::Unterminated {
        marker: marker_text(text, start, body_start + cursor.offset()),
        expected,
    };

    loop {
        let Some(name) = cursor.eat(MarkerToken::Ident) else {
            if saw_binding {
                return Err(unterminated(&cursor, "--"));
            }
            return Ok(None);
        };

        let binding = if cursor.eat(MarkerToken::OpenBracket).is_some() {
            saw_binding = true;
            let first = cursor
                .eat(MarkerToken::Ident)
                .ok_or_else(|| unterminated(&cursor, "]"))?;
            let binding = if cursor.eat(MarkerToken::Dash).is_some() {
                let value = cursor
                    .eat(MarkerToken::Ident)
                    .ok_or_else(|| unterminated(&cursor, "]"))?;
                Binding::KeyedMap {
                    key: first.to_string(),
                    value: value.to_string(),
                }
            } else {
                Binding::Loop {
                    index: first.to_string(),
                }
            };
            cursor
                .eat(MarkerToken::CloseBracket)
                .ok_or_else(|| unterminated(&cursor, "]"))?;
            Some(binding)
        } else {
            None
        };

        if cursor.eat(MarkerToken::Dash).is_none() {
            if saw_binding {
                return Err(unterminated(&cursor, "--"));
            }
            return Ok(None);
        }

        if cursor.eat(MarkerToken::Dash).is_some() {
            return match binding {
                Some(binding) => Ok(Some((
                    Marker::Iteration(IterationMarker {
                        ancestors,
                        name: name.to_string(),
                        binding,
                    }),
                    cursor.offset(),
                ))),
                None if saw_binding => Err(unterminated(&cursor, "[")),
                None => Ok(None),
            };
        }

        ancestors.push(name.to_string());
    }
}
