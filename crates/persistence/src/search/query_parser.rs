//! Textual constraint parser.
//!
//! Produces an untyped clause chain; field lookup and value coercion happen
//! in the [`QueryTranslator`](super::translator::QueryTranslator).
//!
//! # Grammar
//!
//! ```text
//! query    = clause ( op? clause )*
//! op       = "AND" / "OR" / "NOT" / "AND NOT" / "&&" / "||"
//! clause   = "NOT"? ( field ":" )? value
//! value    = phrase / range / word
//! phrase   = '"' chars '"'                  ; \" and \\ escapes
//! range    = ( "[" / "{" ) bound " TO " bound ( "]" / "}" )
//! bound    = literal / "*" / "-inf" / "inf" / "-∞" / "∞"
//! ```
//!
//! Operators are upper case; a missing operator means AND. There is no
//! precedence and no grouping: each clause is combined with the result of
//! everything before it, left to right.

use crate::error::SearchError;
use crate::types::ChainOp;

/// An unparsed term value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTerm {
    /// Quoted phrase.
    Phrase(String),
    /// Bare word; may hold `*`/`?` wildcards or be `*` alone.
    Word(String),
}

/// One end of an unparsed range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawBound {
    /// `*` or an infinity marker.
    Open,
    /// Inclusive literal.
    Inclusive(String),
    /// Exclusive literal.
    Exclusive(String),
}

/// An unparsed clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawClause {
    /// A term on a field, or on the full-text field when unfielded.
    Term {
        /// Field name as written.
        field: Option<String>,
        /// The value.
        term: RawTerm,
    },
    /// A range on a field.
    Range {
        /// Field name as written.
        field: String,
        /// Lower end.
        lower: RawBound,
        /// Upper end.
        upper: RawBound,
        /// The range text, for error messages.
        fragment: String,
    },
}

/// Cursor-based parser over a constraint string.
pub struct QueryParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> QueryParser<'a> {
    /// Creates a parser.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parses a constraint into its clause chain.
    pub fn parse(input: &str) -> Result<Vec<(ChainOp, RawClause)>, SearchError> {
        let mut parser = QueryParser::new(input);
        let mut chain = Vec::new();

        loop {
            parser.skip_whitespace();
            if parser.at_end() {
                break;
            }
            let op = parser.parse_operator(chain.is_empty())?;
            parser.skip_whitespace();
            if parser.at_end() {
                return Err(SearchError::malformed(input, "operator without a following clause"));
            }
            let clause = parser.parse_clause()?;
            chain.push((op, clause));
        }

        Ok(chain)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes and returns the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Checks if position + offset is at a word boundary.
    fn is_word_boundary(&self, offset: usize) -> bool {
        match self.input[self.pos..].get(offset..).and_then(|s| s.chars().next()) {
            None => true,
            Some(c) => c.is_whitespace() || c == '"',
        }
    }

    /// Matches an upper-case keyword at the cursor.
    fn keyword(&self, word: &str) -> bool {
        self.rest().starts_with(word) && self.is_word_boundary(word.len())
    }

    fn parse_operator(&mut self, first: bool) -> Result<ChainOp, SearchError> {
        if self.keyword("NOT") {
            self.pos += 3;
            return Ok(ChainOp::Not);
        }

        let combinator = if self.keyword("AND") {
            self.pos += 3;
            Some(ChainOp::And)
        } else if self.rest().starts_with("&&") {
            self.pos += 2;
            Some(ChainOp::And)
        } else if self.keyword("OR") {
            self.pos += 2;
            Some(ChainOp::Or)
        } else if self.rest().starts_with("||") {
            self.pos += 2;
            Some(ChainOp::Or)
        } else {
            None
        };

        match combinator {
            None => Ok(ChainOp::And),
            Some(_) if first => Err(SearchError::malformed(
                self.input,
                "query cannot start with a binary operator",
            )),
            Some(ChainOp::And) => {
                self.skip_whitespace();
                if self.keyword("NOT") {
                    self.pos += 3;
                    Ok(ChainOp::Not)
                } else {
                    Ok(ChainOp::And)
                }
            }
            Some(op) => Ok(op),
        }
    }

    fn parse_clause(&mut self) -> Result<RawClause, SearchError> {
        let start = self.pos;
        if matches!(self.peek(), Some('(' | ')')) {
            return Err(SearchError::malformed(
                self.fragment_from(start),
                "grouping with parentheses is not supported",
            ));
        }

        let field = self.parse_field();
        match (self.peek(), field) {
            (Some('"'), field) => Ok(RawClause::Term {
                field,
                term: RawTerm::Phrase(self.parse_quoted(start)?),
            }),
            (Some('[' | '{'), Some(field)) => self.parse_range(field, start),
            (Some('[' | '{'), None) => Err(SearchError::malformed(
                self.fragment_from(start),
                "a range needs a field",
            )),
            (_, field) => {
                let word = self.parse_word();
                if word.is_empty() {
                    return Err(SearchError::malformed(
                        self.fragment_from(start),
                        "missing value",
                    ));
                }
                Ok(RawClause::Term {
                    field,
                    term: RawTerm::Word(word),
                })
            }
        }
    }

    /// Consumes `name:` when present.
    fn parse_field(&mut self) -> Option<String> {
        let rest = self.rest();
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if c.is_alphabetic() => {}
            _ => return None,
        }
        for (i, c) in chars {
            if c == ':' {
                self.pos += i + 1;
                return Some(rest[..i].to_string());
            }
            if !(c.is_alphanumeric() || c == '_' || c == '-') {
                return None;
            }
        }
        None
    }

    fn parse_word(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.input[start..self.pos].to_string()
    }

    fn parse_quoted(&mut self, start: usize) -> Result<String, SearchError> {
        self.consume();
        let mut out = String::new();
        loop {
            match self.consume() {
                None => {
                    return Err(SearchError::malformed(
                        self.fragment_from(start),
                        "unterminated phrase",
                    ));
                }
                Some('"') => return Ok(out),
                Some('\\') => match self.consume() {
                    Some(c) => out.push(c),
                    None => {
                        return Err(SearchError::malformed(
                            self.fragment_from(start),
                            "dangling escape",
                        ));
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_range(&mut self, field: String, start: usize) -> Result<RawClause, SearchError> {
        let lower_inclusive = self.consume() == Some('[');
        let body_start = self.pos;
        let Some(offset) = self.rest().find([']', '}']) else {
            return Err(SearchError::malformed(
                self.fragment_from(start),
                "unterminated range",
            ));
        };
        let body = &self.input[body_start..body_start + offset];
        self.pos = body_start + offset;
        let upper_inclusive = self.consume() == Some(']');
        let fragment = self.fragment_from(start);

        let Some((low, high)) = body.split_once(" TO ") else {
            return Err(SearchError::malformed(fragment, "range needs 'low TO high'"));
        };

        let lower = raw_bound(low, lower_inclusive);
        let upper = raw_bound(high, upper_inclusive);
        if matches!(lower, RawBound::Inclusive(ref s) | RawBound::Exclusive(ref s) if s.is_empty())
            || matches!(upper, RawBound::Inclusive(ref s) | RawBound::Exclusive(ref s) if s.is_empty())
        {
            return Err(SearchError::malformed(fragment, "empty range bound"));
        }

        Ok(RawClause::Range {
            field,
            lower,
            upper,
            fragment,
        })
    }

    fn fragment_from(&self, start: usize) -> String {
        self.input[start..self.pos.min(self.input.len())].to_string()
    }
}

fn raw_bound(text: &str, inclusive: bool) -> RawBound {
    let text = text.trim();
    let open = matches!(
        text.to_lowercase().as_str(),
        "*" | "-∞" | "∞" | "+∞" | "-inf" | "inf" | "+inf"
    );
    if open {
        RawBound::Open
    } else if inclusive {
        RawBound::Inclusive(text.to_string())
    } else {
        RawBound::Exclusive(text.to_string())
    }
}
