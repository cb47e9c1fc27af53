//! lexer.rs
//!
//! This module provides a simple lexical analyzer (lexer) for canonical calculator expressions.
//! It splits an input string into a sequence of `Lexeme`s, each representing a
//! continuous piece of text with its corresponding position in the original string.
//!
//! The lexer handles identifiers, numeric literals (including decimal and scientific
//! notation), the two-character power operator `**`, and single-character operators
//! or punctuation. Anything else becomes a one-character lexeme and is rejected later
//! by the parser.

use std::ops::Range;

/// Text of the exponentiation operator as typed by the `pow` key.
pub const POWER_OPERATOR: &str = "**";

/// Represents a single lexeme extracted from the input string.
///
/// A `Lexeme` stores a text slice and its span (start..end indices) within
/// the original input string.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    text: String,
    span: Range<usize>,
}

impl Lexeme {
    /// Create a new `Lexeme`.
    ///
    /// # Argument
    ///
    /// * `text` - The slice of text corresponding to the lexeme.
    /// * `span` - The range of the lexeme in the original input string.
    pub fn new(text: &str, span: Range<usize>) -> Self {
        Self {
            text: text.to_string(),
            span
        }
    }

    /// Returns the text slice of the lexeme.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the start index of the lexeme in the original input string.
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Returns the end index of the lexeme in the original input string.
    pub fn end(&self) -> usize {
        self.span.end
    }
}

impl std::fmt::Display for Lexeme
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{name} [{start}, {end})", name=self.text, start=self.span.start, end=self.span.end)
    }
}

/// Type alias for a collection of lexemes.
pub type Lexemes = Vec<Lexeme>;

type CharIter<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

/// Consumes the next char and returns the index just after it.
fn advance(chars: &mut CharIter, fallback: usize) -> usize {
    chars.next()
        .map(|(idx, ch)| idx + ch.len_utf8())
        .unwrap_or(fallback)
}

/// Parses an identifier starting at `start_idx`.
///
/// An identifier is a sequence of alphanumeric characters or underscores,
/// so `log10` stays a single lexeme.
///
/// # Returns
///
/// The ending index of the identifier.
fn parse_ident(start_idx: usize, chars: &mut CharIter) -> usize
{
    let mut end = start_idx + 1;
    while let Some(&(_, ch)) = chars.peek() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            end = advance(chars, end);
        } else {
            break;
        }
    }

    end
}

/// Returns true when the chars after an `e`/`E` form a valid exponent.
///
/// The exponent marker is only part of the number when a digit follows it,
/// optionally after a sign; otherwise `2e` lexes as `2` and `e`.
fn exponent_follows(chars: &CharIter) -> bool {
    let mut ahead = chars.clone();
    ahead.next(); // the 'e' itself
    match ahead.next() {
        Some((_, d)) if d.is_ascii_digit() => true,
        Some((_, '+' | '-')) => matches!(ahead.next(), Some((_, d)) if d.is_ascii_digit()),
        _ => false,
    }
}

/// Parses a numeric literal starting at `start_idx`.
///
/// Supports integers, decimals, and scientific notation (`1e21`, `2.5e-7`).
/// Malformed literals such as `1.2.3` are accepted here and rejected by the parser.
///
/// # Returns
///
/// The ending index of the numeric literal.
fn parse_number(start_idx: usize, chars: &mut CharIter) -> usize
{
    let mut end = start_idx + 1;
    let mut seen_e = false;

    while let Some(&(_, ch)) = chars.peek() {
        match ch {
            d if d.is_ascii_digit() || d == '.' => {
                end = advance(chars, end);
            },
            'e' | 'E' if !seen_e && exponent_follows(chars) => {
                seen_e = true;
                end = advance(chars, end);
                if let Some(&(_, '+' | '-')) = chars.peek() {
                    end = advance(chars, end);
                }
            },
            _ => break,
        }
    }

    end
}

/// Splits the input string into a sequence of `Lexeme`s.
///
/// # Arguments
///
/// * `input` - The input string to lex.
///
/// # Returns
///
/// A vector of lexemes representing identifiers, numbers, and operator tokens.
pub fn from(input: &str) -> Lexemes {
    let mut lexemes = Lexemes::default();
    let mut chars = input.char_indices().peekable();

    while let Some((start_idx, ch)) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }

        let end_idx = match ch {
            '0'..='9' | '.' => parse_number(start_idx, &mut chars),
            'a'..='z' | 'A'..='Z' | '_' => parse_ident(start_idx, &mut chars),
            '*' if matches!(chars.peek(), Some(&(_, '*'))) => advance(&mut chars, start_idx + 1),
            _ => start_idx + ch.len_utf8(),
        };

        lexemes.push(Lexeme::new(&input[start_idx..end_idx], start_idx..end_idx));
    }

    lexemes
}
