//! Lexer for shell lines
//!
//! Tokenizes one line of input into words, quoted strings, assignment parts
//! and pipe separators, tracking byte offsets for adjacency gluing and for
//! syntax-error reporting.

use super::tokens::{Span, SpannedToken, Token};
use crate::error::{Error, Result};

/// Lexer over a single input line.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte offset into the input
    pos: usize,
    /// End offset of the previous word-like token, for word-start detection
    prev_word_end: Option<usize>,
    /// Queued token; `NAME=` lexes as two tokens in one step
    pending: Option<SpannedToken>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given line.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            prev_word_end: None,
            pending: None,
        }
    }

    /// Lex the entire line up front.
    ///
    /// A syntax error anywhere aborts the whole line, so there is no value in
    /// streaming tokens to the parser.
    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>> {
        let mut out = Vec::new();
        while let Some(tok) = self.next_token()? {
            out.push(tok);
        }
        Ok(out)
    }

    /// Get the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<SpannedToken>> {
        if let Some(tok) = self.pending.take() {
            self.prev_word_end = Some(tok.span.end);
            return Ok(Some(tok));
        }

        self.skip_whitespace();
        let Some(ch) = self.peek_char() else {
            return Ok(None);
        };
        let start = self.pos;

        let tok = match ch {
            '|' => {
                self.advance();
                self.prev_word_end = None;
                SpannedToken {
                    token: Token::Pipe,
                    span: Span::new(start, self.pos),
                }
            }
            '\'' => self.read_quoted('\'')?,
            '"' => self.read_quoted('"')?,
            _ => {
                if self.at_word_start() {
                    if let Some(tok) = self.try_read_assignment_name() {
                        tok
                    } else {
                        self.read_bare_word()
                    }
                } else {
                    self.read_bare_word()
                }
            }
        };

        if tok.token.is_word_like() {
            self.prev_word_end = Some(tok.span.end);
        }
        Ok(Some(tok))
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// A bare run begins a new word unless it is glued to the previous
    /// word-like token with no gap (e.g. the `bar` in `'foo'bar`).
    fn at_word_start(&self) -> bool {
        self.prev_word_end != Some(self.pos)
    }

    /// Try to lex `NAME=` at the current position into a `Name` token plus a
    /// queued `Equals`. Returns `None` if the text here is not an assignment
    /// prefix, leaving the position untouched.
    fn try_read_assignment_name(&mut self) -> Option<SpannedToken> {
        let rest = &self.input[self.pos..];
        let mut chars = rest.char_indices();

        match chars.next() {
            Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return None,
        }

        let mut name_len = 0;
        for (i, c) in chars {
            if c.is_ascii_alphanumeric() || c == '_' {
                continue;
            }
            if c == '=' {
                name_len = i;
            }
            break;
        }
        if name_len == 0 {
            return None;
        }

        let start = self.pos;
        let name = rest[..name_len].to_string();
        self.pos += name_len + 1;

        self.pending = Some(SpannedToken {
            token: Token::Equals,
            span: Span::new(start + name_len, start + name_len + 1),
        });
        Some(SpannedToken {
            token: Token::Name(name),
            span: Span::new(start, start + name_len),
        })
    }

    /// Read a quoted string, collapsing a backslash before the quote
    /// character into that quote. All other content is taken verbatim.
    fn read_quoted(&mut self, quote: char) -> Result<SpannedToken> {
        let start = self.pos;
        self.advance(); // opening quote

        let mut text = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(Error::syntax(
                        format!("unterminated {} quote", quote_kind(quote)),
                        start,
                    ));
                }
                Some('\\') if self.peek_second() == Some(quote) => {
                    self.advance();
                    self.advance();
                    text.push(quote);
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }

        let token = if quote == '\'' {
            Token::SingleQuoted(text)
        } else {
            Token::DoubleQuoted(text)
        };
        Ok(SpannedToken {
            token,
            span: Span::new(start, self.pos),
        })
    }

    /// Read a bare run up to whitespace, a pipe, or an unescaped quote.
    /// A backslash before either quote character collapses to that quote.
    fn read_bare_word(&mut self) -> SpannedToken {
        let start = self.pos;
        let mut text = String::new();

        while let Some(ch) = self.peek_char() {
            match ch {
                c if c.is_whitespace() => break,
                '|' | '\'' | '"' => break,
                '\\' if matches!(self.peek_second(), Some('\'') | Some('"')) => {
                    self.advance();
                    let q = self.advance().unwrap_or('\\');
                    text.push(q);
                }
                c => {
                    self.advance();
                    text.push(c);
                }
            }
        }

        SpannedToken {
            token: Token::Word(text),
            span: Span::new(start, self.pos),
        }
    }
}

fn quote_kind(quote: char) -> &'static str {
    if quote == '\'' {
        "single"
    } else {
        "double"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(input: &str) -> Vec<SpannedToken> {
        Lexer::new(input).tokenize().expect("lex failure")
    }

    fn kinds(input: &str) -> Vec<Token> {
        lex(input).into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn bare_words_and_pipe() {
        assert_eq!(
            kinds("echo hi | wc"),
            vec![
                Token::Word("echo".into()),
                Token::Word("hi".into()),
                Token::Pipe,
                Token::Word("wc".into()),
            ]
        );
    }

    #[test]
    fn spans_track_byte_offsets() {
        let toks = lex("echo  hi");
        assert_eq!(toks[0].span, Span::new(0, 4));
        assert_eq!(toks[1].span, Span::new(6, 8));
    }

    #[test]
    fn single_quoted_decodes_escaped_quote() {
        assert_eq!(
            kinds(r"'it\'s'"),
            vec![Token::SingleQuoted("it's".into())]
        );
    }

    #[test]
    fn single_quoted_keeps_other_backslashes() {
        assert_eq!(
            kinds(r"'a\nb'"),
            vec![Token::SingleQuoted(r"a\nb".into())]
        );
    }

    #[test]
    fn double_quoted_decodes_escaped_quote() {
        assert_eq!(
            kinds(r#""say \"hi\"""#),
            vec![Token::DoubleQuoted(r#"say "hi""#.into())]
        );
    }

    #[test]
    fn adjacent_tokens_share_boundary_offsets() {
        let toks = lex("'foo'bar");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].span.end, toks[1].span.start);
    }

    #[test]
    fn assignment_splits_into_name_and_equals() {
        assert_eq!(
            kinds("X=1"),
            vec![
                Token::Name("X".into()),
                Token::Equals,
                Token::Word("1".into()),
            ]
        );
    }

    #[test]
    fn assignment_not_split_mid_word() {
        // `a=b` after `echo` is ordinary word material at the parser level,
        // but the lexer still classifies it by position: `a` starts a word,
        // so it lexes as an assignment prefix.
        assert_eq!(
            kinds("echo a=b"),
            vec![
                Token::Word("echo".into()),
                Token::Name("a".into()),
                Token::Equals,
                Token::Word("b".into()),
            ]
        );
    }

    #[test]
    fn glued_value_is_not_reclassified() {
        // The `a=b` in `X=a=b` is glued to the equals, not at word start.
        assert_eq!(
            kinds("X=a=b"),
            vec![
                Token::Name("X".into()),
                Token::Equals,
                Token::Word("a=b".into()),
            ]
        );
    }

    #[test]
    fn leading_equals_is_a_bare_word() {
        assert_eq!(kinds("=foo"), vec![Token::Word("=foo".into())]);
    }

    #[test]
    fn unterminated_single_quote_reports_opening_offset() {
        let err = Lexer::new("echo 'oops").tokenize().unwrap_err();
        match err {
            Error::Syntax { offset, .. } => assert_eq!(offset, 5),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unterminated_double_quote_reports_opening_offset() {
        let err = Lexer::new(r#"echo "oops"#).tokenize().unwrap_err();
        match err {
            Error::Syntax { offset, .. } => assert_eq!(offset, 5),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bare_backslash_quote_collapses() {
        assert_eq!(kinds(r"a\'b"), vec![Token::Word("a'b".into())]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(lex("").is_empty());
        assert!(lex("   \t ").is_empty());
    }
}
