//! AST types for parsed lines
//!
//! These types are the data contract shared by the parser, the variable
//! expander, and the pipeline executor.

use std::fmt;

/// One quoted or unquoted run inside a word.
///
/// `expand` is false only for single-quoted text, which is taken literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSegment {
    pub text: String,
    pub expand: bool,
}

impl ArgSegment {
    /// A segment subject to variable expansion (bare or double-quoted text).
    pub fn expandable(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expand: true,
        }
    }

    /// A literal segment (single-quoted text).
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expand: false,
        }
    }
}

/// An argument word: lexically adjacent segments glued together.
///
/// `'foo'bar` is one ArgToken with two segments; `'foo' bar` is two ArgTokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArgToken {
    pub segments: Vec<ArgSegment>,
}

impl ArgToken {
    pub fn new(segments: Vec<ArgSegment>) -> Self {
        Self { segments }
    }

    pub fn push(&mut self, segment: ArgSegment) {
        self.segments.push(segment);
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The decoded text with expansion markers ignored. Used for assignment
    /// values, which are stored without expansion.
    pub fn decoded(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

impl fmt::Display for ArgToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment.text)?;
        }
        Ok(())
    }
}

/// One pipeline stage: a command name plus its arguments, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    pub name: ArgToken,
    pub args: Vec<ArgToken>,
}

/// An ordered chain of commands connected left-to-right by pipes.
///
/// May be empty: a blank or assignment-only line parses to an empty pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pipeline {
    pub commands: Vec<CommandNode>,
}

impl Pipeline {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}
