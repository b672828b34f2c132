//! Shared error and diagnostic utilities used across the translation
//! pipeline.
//!
//! Diagnostics are kept lightweight on purpose – fatal errors point at the
//! offending source line with a caret, and the non-fatal trace is just an
//! ordered list of one-line notes the CLI can print or drop.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  #[snafu(display("line {line}: {source_line}\n{marker} {message}"))]
  WithLocation {
    line: usize,
    source_line: String,
    marker: String,
    message: String,
  },
}

impl CompileError {
  /// Construct an error anchored at a specific byte offset in the source.
  pub fn at(source: &str, loc: usize, message: impl Into<String>) -> Self {
    let safe_loc = loc.min(source.len());
    let line_start = source[..safe_loc].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[safe_loc..]
      .find('\n')
      .map_or(source.len(), |i| safe_loc + i);
    let line = source[..line_start].matches('\n').count() + 1;
    let source_line = source[line_start..line_end].to_string();
    let prefix_width = format!("line {line}: ").chars().count();
    let char_offset = source[line_start..safe_loc].chars().count();
    let marker = format!("{}^", " ".repeat(prefix_width + char_offset));
    Self::WithLocation {
      line,
      source_line,
      marker,
      message: message.into(),
    }
  }
}

/// Ordered collection of observational one-line diagnostics.
///
/// The tokenizer notes skipped characters here and the translator notes each
/// construct it recognises. The trace never influences the generated program.
#[derive(Debug, Default)]
pub struct Trace {
  notes: Vec<String>,
}

impl Trace {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn note(&mut self, message: impl Into<String>) {
    self.notes.push(message.into());
  }

  pub fn notes(&self) -> &[String] {
    &self.notes
  }

  pub fn into_notes(self) -> Vec<String> {
    self.notes
  }
}
