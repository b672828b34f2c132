//! Crate root: wires together the translation pipeline.
//!
//! The stages are intentionally small and composable so they can be evolved
//! independently:
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `tables` holds the symbol table and monitor set mutated during
//!   translation.
//! - `translator` owns all syntactic knowledge and performs syntax-directed
//!   translation as each grammar rule reduces – there is no AST pass.
//! - `assembler` wraps the translated body into a complete C program.
//! - `error` centralises reporting utilities shared by the other modules.

pub mod error;
pub mod tables;
pub mod tokenizer;
pub mod translator;

mod assembler;

pub use error::{CompileError, CompileResult, Trace};

/// A finished translation: the generated C program plus the observational
/// diagnostic trace collected along the way.
#[derive(Debug)]
pub struct Translation {
  pub program: String,
  pub trace: Vec<String>,
}

/// Translate a source program into a complete C program.
///
/// On syntax failure no program is assembled; the error carries the
/// offending location. Lexical errors (unrecognised characters) are
/// recovered by skipping and show up as trace notes instead.
pub fn translate(source: &str) -> CompileResult<Translation> {
  let mut trace = Trace::new();
  let tokens = tokenizer::tokenize(source, &mut trace)?;
  let unit = translator::translate(tokens, source, &mut trace)?;
  let program = assembler::assemble(&unit);
  Ok(Translation {
    program,
    trace: trace.into_notes(),
  })
}
