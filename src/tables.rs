//! Table state mutated by the translation: the symbol table and the set of
//! monitored variables.
//!
//! Both are created fresh for each translation and owned by the translator,
//! so no state leaks between runs. The symbol table preserves
//! first-declaration order because the assembler's declaration section and
//! final dump are contractually emitted in that order.

use std::collections::{HashMap, HashSet};

/// One declared variable. The value is fixed at 0 by declaration; the
/// generated program does all arithmetic at run time.
#[derive(Debug, Clone)]
pub struct Symbol {
  pub name: String,
  pub value: i64,
}

/// Declaration-order-preserving mapping from variable name to value.
#[derive(Debug, Default)]
pub struct SymbolTable {
  symbols: Vec<Symbol>,
  index: HashMap<String, usize>,
}

impl SymbolTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declare `name` with an initial value of 0. Re-declaring is idempotent:
  /// the original entry and its position are kept.
  pub fn declare(&mut self, name: &str) {
    if self.index.contains_key(name) {
      return;
    }
    self.index.insert(name.to_string(), self.symbols.len());
    self.symbols.push(Symbol {
      name: name.to_string(),
      value: 0,
    });
  }

  pub fn contains(&self, name: &str) -> bool {
    self.index.contains_key(name)
  }

  /// Symbols in first-declaration order.
  pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
    self.symbols.iter()
  }

  pub fn len(&self) -> usize {
    self.symbols.len()
  }

  pub fn is_empty(&self) -> bool {
    self.symbols.is_empty()
  }
}

/// Names flagged as monitored during the declaration section. Read-only once
/// statement translation begins.
#[derive(Debug, Default)]
pub struct MonitorSet {
  names: HashSet<String>,
}

impl MonitorSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Flag `name` as monitored. Duplicate inserts are a no-op.
  pub fn insert(&mut self, name: &str) {
    self.names.insert(name.to_string());
  }

  pub fn contains(&self, name: &str) -> bool {
    self.names.contains(name)
  }
}
