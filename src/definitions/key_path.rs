//! # Key paths
//!
//! Parsing for the binding strings markup authors place on elements:
//!
//! ```text
//! hero.title                 -> text content of the element
//! [placeholder]form.name     -> the `placeholder` attribute
//! ```
//!
//! There is no escaping, a literal `.` inside a segment cannot be expressed.

use crate::utils::ImStr;
use std::fmt::Display;

/// Separator between path segments
const SEGMENT_SEPARATOR: char = '.';

/// Dotted address into a translation bundle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPath {
    segments: Vec<ImStr>,
}

/// Name of the element attribute a resolved value is written into
/// instead of the text content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTarget(ImStr);

impl KeyPath {
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|value| value.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                write!(f, "{SEGMENT_SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl From<&str> for KeyPath {
    fn from(value: &str) -> Self {
        parse_binding(value).0
    }
}

impl AttributeTarget {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Splits the attribute target prefix off the first segment, returning
/// the attribute name and whatever followed the closing bracket
fn split_attribute(segment: &str) -> Option<(&str, &str)> {
    let rest = segment.strip_prefix('[')?;
    let (name, rest) = rest.split_once(']')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, rest))
}

/// Parses a raw binding string into its [KeyPath] and optional
/// [AttributeTarget]
pub fn parse_binding(raw: &str) -> (KeyPath, Option<AttributeTarget>) {
    let raw = raw.trim();
    if raw.is_empty() {
        return (KeyPath::default(), None);
    }

    let mut segments: Vec<ImStr> = Vec::new();
    let mut target = None;

    for (index, segment) in raw.split(SEGMENT_SEPARATOR).enumerate() {
        if index == 0 {
            if let Some((name, rest)) = split_attribute(segment) {
                target = Some(AttributeTarget(Box::from(name)));

                // Bare `[attr]` segment is removed entirely
                if !rest.is_empty() {
                    segments.push(Box::from(rest));
                }
                continue;
            }
        }

        segments.push(Box::from(segment));
    }

    (KeyPath { segments }, target)
}
