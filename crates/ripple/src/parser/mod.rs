//! Parser module for Ripple
//!
//! Turns one raw line into a [`Pipeline`]: zero or more leading assignments
//! followed by an optional pipe-separated command list. Assignments are
//! applied to the [`Environment`] here - global when the statement has no
//! command list, local (statement-scoped) otherwise.

mod ast;
mod lexer;
mod tokens;

pub use ast::{ArgSegment, ArgToken, CommandNode, Pipeline};
pub use lexer::Lexer;
pub use tokens::{Span, SpannedToken, Token};

use crate::env::Environment;
use crate::error::{Error, Result};

/// Parse one line, applying its assignments to `env`.
///
/// A grammar-level syntax error aborts the whole line: no assignment is
/// applied and no pipeline is produced.
pub fn parse_line(input: &str, env: &Environment) -> Result<Pipeline> {
    let tokens = Lexer::new(input).tokenize()?;
    let pipeline = Parser::new(tokens, input.len()).parse(env)?;
    tracing::debug!(stages = pipeline.len(), "parsed line");
    Ok(pipeline)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    input_len: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>, input_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            input_len,
        }
    }

    fn parse(mut self, env: &Environment) -> Result<Pipeline> {
        let assignments = self.parse_assignments();

        let mut commands = Vec::new();
        if self.peek().is_some() {
            loop {
                match self.parse_command() {
                    Some(cmd) => commands.push(cmd),
                    None => {
                        return Err(Error::syntax("expected command", self.current_offset()));
                    }
                }
                if matches!(self.peek(), Some(Token::Pipe)) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        }

        // `VAR=val` alone exports; `VAR=val cmd` is a per-statement override.
        for (name, value) in assignments {
            if commands.is_empty() {
                env.set_global(name, value);
            } else {
                env.set_local(name, value);
            }
        }

        Ok(Pipeline { commands })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn current_offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|t| t.span.start)
            .unwrap_or(self.input_len)
    }

    /// Leading `NAME=value` pairs. The value is every word-like token glued
    /// to the `=` with no gap; a missing value assigns the empty string.
    fn parse_assignments(&mut self) -> Vec<(String, String)> {
        let mut out = Vec::new();

        while let Some(SpannedToken {
            token: Token::Name(name),
            ..
        }) = self.tokens.get(self.pos)
        {
            // The lexer only emits Name immediately before Equals.
            debug_assert!(matches!(
                self.tokens.get(self.pos + 1).map(|t| &t.token),
                Some(Token::Equals)
            ));
            let name = name.clone();
            let equals_end = self.tokens[self.pos + 1].span.end;
            self.pos += 2;

            let value = self
                .glue_from(equals_end)
                .map(|tok| tok.decoded())
                .unwrap_or_default();
            out.push((name, value));
        }

        out
    }

    /// One pipeline stage: glued ArgTokens up to a pipe or end of line.
    /// Returns `None` when no word material is present (`|` with nothing
    /// before it, or a trailing `|`).
    fn parse_command(&mut self) -> Option<CommandNode> {
        let mut words = Vec::new();

        while let Some(spanned) = self.tokens.get(self.pos) {
            if !spanned.token.is_word_like() {
                break;
            }
            let start = spanned.span.start;
            // Always glues at least the current token.
            words.push(self.glue_from(start).unwrap());
        }

        let mut words = words.into_iter();
        let name = words.next()?;
        Some(CommandNode {
            name,
            args: words.collect(),
        })
    }

    /// Merge consecutive word-like tokens into one ArgToken while each
    /// token's start equals the previous token's end. `from` anchors the
    /// first token: if it does not begin exactly there, nothing is glued.
    fn glue_from(&mut self, from: usize) -> Option<ArgToken> {
        let mut token = ArgToken::default();
        let mut expected_start = from;

        while let Some(spanned) = self.tokens.get(self.pos) {
            if !spanned.token.is_word_like() || spanned.span.start != expected_start {
                break;
            }
            token.push(segment_of(&spanned.token));
            expected_start = spanned.span.end;
            self.pos += 1;
        }

        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }
}

fn segment_of(token: &Token) -> ArgSegment {
    match token {
        Token::Word(text) => ArgSegment::expandable(text.clone()),
        Token::SingleQuoted(text) => ArgSegment::literal(text.clone()),
        Token::DoubleQuoted(text) => ArgSegment::expandable(text.clone()),
        Token::Name(name) => ArgSegment::expandable(name.clone()),
        Token::Equals => ArgSegment::expandable("="),
        Token::Pipe => unreachable!("pipe is not word material"),
    }
}
