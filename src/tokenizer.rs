//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! The tokenizer is intentionally tiny – it knows nothing about the grammar
//! beyond recognising keywords, identifiers, unsigned decimal literals and
//! the handful of punctuators. Unrecognised characters are not fatal: they
//! are noted in the trace and skipped, and scanning continues.

use crate::error::{CompileError, CompileResult, Trace};

/// Keywords of the source language. Matching is case-sensitive; `inicio` is
/// an ordinary identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
  Inicio,
  Monitor,
  Execute,
  Termino,
  Zero,
  If,
  Then,
  Else,
  Fim,
  Eval,
  Vezes,
  Enquanto,
  Faca,
}

impl Keyword {
  /// Keyword lookup for an identifier-shaped lexeme.
  pub fn lookup(lexeme: &str) -> Option<Self> {
    match lexeme {
      "INICIO" => Some(Self::Inicio),
      "MONITOR" => Some(Self::Monitor),
      "EXECUTE" => Some(Self::Execute),
      "TERMINO" => Some(Self::Termino),
      "ZERO" => Some(Self::Zero),
      "IF" => Some(Self::If),
      "THEN" => Some(Self::Then),
      "ELSE" => Some(Self::Else),
      "FIM" => Some(Self::Fim),
      "EVAL" => Some(Self::Eval),
      "VEZES" => Some(Self::Vezes),
      "ENQUANTO" => Some(Self::Enquanto),
      "FACA" => Some(Self::Faca),
      _ => None,
    }
  }

  /// The source-language spelling, used in diagnostics.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Inicio => "INICIO",
      Self::Monitor => "MONITOR",
      Self::Execute => "EXECUTE",
      Self::Termino => "TERMINO",
      Self::Zero => "ZERO",
      Self::If => "IF",
      Self::Then => "THEN",
      Self::Else => "ELSE",
      Self::Fim => "FIM",
      Self::Eval => "EVAL",
      Self::Vezes => "VEZES",
      Self::Enquanto => "ENQUANTO",
      Self::Faca => "FACA",
    }
  }
}

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Keyword(Keyword),
  Ident,
  Num,
  Punctuator,
  Eof,
}

/// Thin wrapper for lexical information needed by later stages.
#[derive(Debug, Clone)]
pub struct Token {
  pub kind: TokenKind,
  pub value: Option<i64>,
  pub loc: usize,
  pub len: usize,
}

impl Token {
  /// Convenience constructor to keep the `tokenize` loop readable.
  pub fn new(kind: TokenKind, loc: usize, len: usize, value: Option<i64>) -> Self {
    Self {
      kind,
      value,
      loc,
      len,
    }
  }
}

/// Lex the input into a flat vector of tokens terminated by an `Eof` marker.
pub fn tokenize(input: &str, trace: &mut Trace) -> CompileResult<Vec<Token>> {
  let mut tokens = Vec::new();
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let c = bytes[i];
    if c.is_ascii_whitespace() {
      i += 1;
      continue;
    }

    if c.is_ascii_digit() {
      let start = i;
      i += 1;
      while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
      }
      let text = &input[start..i];
      let value = text
        .parse::<i64>()
        .map_err(|err| CompileError::at(input, start, format!("invalid number: {err}")))?;
      tokens.push(Token::new(TokenKind::Num, start, i - start, Some(value)));
      continue;
    }

    if c.is_ascii_alphabetic() || c == b'_' {
      let start = i;
      i += 1;
      while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
      }
      let lexeme = &input[start..i];
      let kind = match Keyword::lookup(lexeme) {
        Some(keyword) => TokenKind::Keyword(keyword),
        None => TokenKind::Ident,
      };
      tokens.push(Token::new(kind, start, i - start, None));
      continue;
    }

    if matches!(c, b'=' | b'+' | b'*' | b',' | b'(' | b')') {
      tokens.push(Token::new(TokenKind::Punctuator, i, 1, None));
      i += 1;
      continue;
    }

    // Lexical recovery: report the character and keep scanning.
    let invalid_char = input[i..].chars().next().unwrap_or('\0');
    trace.note(format!(
      "lexical error: skipping unrecognised character '{invalid_char}'"
    ));
    i += invalid_char.len_utf8();
  }

  tokens.push(Token::new(TokenKind::Eof, input.len(), 0, None));
  Ok(tokens)
}

/// Return the slice from the source that produced this token.
pub fn token_text<'a>(token: &Token, source: &'a str) -> &'a str {
  let end = token.loc + token.len;
  &source[token.loc..end]
}

/// Human-friendly description used in diagnostics.
pub fn describe_token(token: Option<&Token>, source: &str) -> String {
  match token {
    Some(t) => match t.kind {
      TokenKind::Eof => "end of input".to_string(),
      _ => token_text(t, source).to_string(),
    },
    None => "end of input".to_string(),
  }
}
