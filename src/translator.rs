//! Recursive-descent grammar with syntax-directed translation.
//!
//! This is the engine of the crate. There is no AST: each grammar rule's
//! semantic action runs as the rule reduces, producing either a table
//! mutation (declarations), a C expression string, or a statement fragment.
//! Fragments concatenate in source order, which is the sole contract the
//! assembler relies on for interleaving declarations, conditionals and
//! loops correctly.
//!
//! Grammar:
//!
//! ```text
//! program    := INICIO decl_list MONITOR mdecl_list EXECUTE stmt_list TERMINO
//! decl_list  := ID (',' decl_list)?
//! mdecl_list := ID (',' mdecl_list)?
//! stmt_list  := stmt stmt_list?
//! stmt       := ID '=' expr
//!             | ZERO '(' ID ')'
//!             | IF ID THEN stmt_list (ELSE stmt_list)? FIM
//!             | EVAL stmt_list VEZES (ID | NUM) FIM
//!             | ENQUANTO ID FACA stmt_list FIM
//! expr       := term ('+' term)*
//! term       := primary ('*' primary)*
//! primary    := ID | NUM
//! ```
//!
//! `*` binds tighter than `+` and both are left-associative. Referencing a
//! variable that was not declared in either header list is a fatal error;
//! there is no silent default.

use crate::error::{CompileError, CompileResult, Trace};
use crate::tables::{MonitorSet, SymbolTable};
use crate::tokenizer::{Keyword, Token, TokenKind, describe_token, token_text};

/// Ordered list of C statement lines produced for one syntactic construct.
pub type Fragment = Vec<String>;

/// Everything the assembler needs: the final tables plus the translated
/// statement body.
#[derive(Debug)]
pub struct TranslationUnit {
  pub symbols: SymbolTable,
  pub monitors: MonitorSet,
  pub body: Fragment,
}

/// Translate a token stream into a [`TranslationUnit`].
///
/// The symbol table and monitor set are created here and owned by the
/// translator for the duration of the call, so repeated translations never
/// share state.
pub fn translate(
  tokens: Vec<Token>,
  source: &str,
  trace: &mut Trace,
) -> CompileResult<TranslationUnit> {
  let mut translator = Translator {
    stream: TokenStream::new(tokens, source),
    symbols: SymbolTable::new(),
    monitors: MonitorSet::new(),
    hidden_counter: 0,
  };
  let body = translator.program(trace)?;
  Ok(TranslationUnit {
    symbols: translator.symbols,
    monitors: translator.monitors,
    body,
  })
}

struct Translator<'a> {
  stream: TokenStream<'a>,
  symbols: SymbolTable,
  monitors: MonitorSet,
  hidden_counter: usize,
}

impl Translator<'_> {
  fn program(&mut self, trace: &mut Trace) -> CompileResult<Fragment> {
    self.stream.expect_keyword(Keyword::Inicio)?;
    self.decl_list(false, trace)?;
    self.stream.expect_keyword(Keyword::Monitor)?;
    self.decl_list(true, trace)?;
    self.stream.expect_keyword(Keyword::Execute)?;
    let body = self.stmt_list(trace)?;
    self.stream.expect_keyword(Keyword::Termino)?;

    if !self.stream.is_eof() {
      let token = self.stream.peek();
      let got = describe_token(token, self.stream.source);
      let loc = token.map_or(self.stream.source.len(), |t| t.loc);
      return Err(CompileError::at(
        self.stream.source,
        loc,
        format!("unexpected token \"{got}\" after TERMINO"),
      ));
    }

    trace.note("program recognised successfully");
    Ok(body)
  }

  /// `decl_list` and `mdecl_list` share one shape; the monitored flag is the
  /// only difference. Declaring a name twice is idempotent in the symbol
  /// table and never duplicates monitor membership.
  fn decl_list(&mut self, monitored: bool, trace: &mut Trace) -> CompileResult<()> {
    loop {
      let (name, _) = self.stream.get_ident()?;
      self.symbols.declare(&name);
      if monitored {
        self.monitors.insert(&name);
        trace.note(format!("monitored variable declared: {name}"));
      } else {
        trace.note(format!("variable declared: {name}"));
      }
      if !self.stream.equal(",") {
        return Ok(());
      }
    }
  }

  fn stmt_list(&mut self, trace: &mut Trace) -> CompileResult<Fragment> {
    let mut fragment = self.stmt(trace)?;
    while self.starts_stmt() {
      fragment.extend(self.stmt(trace)?);
    }
    Ok(fragment)
  }

  /// Whether the current token can begin a statement. Anything else ends the
  /// enclosing statement list and is left for the caller to consume.
  fn starts_stmt(&self) -> bool {
    matches!(
      self.stream.peek().map(|token| token.kind),
      Some(
        TokenKind::Ident
          | TokenKind::Keyword(Keyword::Zero)
          | TokenKind::Keyword(Keyword::If)
          | TokenKind::Keyword(Keyword::Eval)
          | TokenKind::Keyword(Keyword::Enquanto)
      )
    )
  }

  fn stmt(&mut self, trace: &mut Trace) -> CompileResult<Fragment> {
    match self.stream.peek().map(|token| token.kind) {
      Some(TokenKind::Ident) => self.assignment(trace),
      Some(TokenKind::Keyword(Keyword::Zero)) => self.zero(trace),
      Some(TokenKind::Keyword(Keyword::If)) => self.conditional(trace),
      Some(TokenKind::Keyword(Keyword::Eval)) => self.counted_loop(trace),
      Some(TokenKind::Keyword(Keyword::Enquanto)) => self.guarded_loop(trace),
      _ => {
        let token = self.stream.peek();
        let got = describe_token(token, self.stream.source);
        let loc = token.map_or(self.stream.source.len(), |t| t.loc);
        Err(CompileError::at(
          self.stream.source,
          loc,
          format!("expected a statement, but got \"{got}\""),
        ))
      }
    }
  }

  /// `ID '=' expr`
  fn assignment(&mut self, trace: &mut Trace) -> CompileResult<Fragment> {
    let (name, loc) = self.stream.get_ident()?;
    self.check_declared(&name, loc)?;
    self.stream.skip("=")?;
    let value = self.expr()?;

    let mut fragment = vec![format!("{name} = {value};")];
    if self.monitors.contains(&name) {
      fragment.push(announce(&name));
    }
    trace.note(format!("assignment translated: {name}"));
    Ok(fragment)
  }

  /// `ZERO '(' ID ')'` – the announcement, when emitted, reports the freshly
  /// zeroed variable, never a stale operand.
  fn zero(&mut self, trace: &mut Trace) -> CompileResult<Fragment> {
    self.stream.expect_keyword(Keyword::Zero)?;
    self.stream.skip("(")?;
    let (name, loc) = self.stream.get_ident()?;
    self.check_declared(&name, loc)?;
    self.stream.skip(")")?;

    let mut fragment = vec![format!("{name} = 0;")];
    if self.monitors.contains(&name) {
      fragment.push(announce(&name));
    }
    trace.note(format!("reset translated: {name}"));
    Ok(fragment)
  }

  /// `IF ID THEN stmt_list (ELSE stmt_list)? FIM` – the guard is a run-time
  /// truthiness test (nonzero means true); the branch fragments keep their
  /// source order regardless of any compile-time knowledge of the guard.
  fn conditional(&mut self, trace: &mut Trace) -> CompileResult<Fragment> {
    self.stream.expect_keyword(Keyword::If)?;
    let (guard, loc) = self.stream.get_ident()?;
    self.check_declared(&guard, loc)?;
    self.stream.expect_keyword(Keyword::Then)?;
    let then_body = self.stmt_list(trace)?;
    let else_body = if self.stream.equal_keyword(Keyword::Else) {
      Some(self.stmt_list(trace)?)
    } else {
      None
    };
    self.stream.expect_keyword(Keyword::Fim)?;

    let mut fragment = vec![format!("if ({guard} != 0) {{")];
    fragment.extend(indent(then_body));
    if let Some(else_body) = else_body {
      fragment.push("} else {".to_string());
      fragment.extend(indent(else_body));
    }
    fragment.push("}".to_string());
    trace.note(format!("conditional translated: guard {guard}"));
    Ok(fragment)
  }

  /// `EVAL stmt_list VEZES (ID | NUM) FIM` – the bound is captured once
  /// before the first iteration, so the body may mutate the bound variable
  /// without changing the trip count. The loop counter and captured bound
  /// use hidden names guaranteed not to collide with declared variables.
  fn counted_loop(&mut self, trace: &mut Trace) -> CompileResult<Fragment> {
    self.stream.expect_keyword(Keyword::Eval)?;
    let body = self.stmt_list(trace)?;
    self.stream.expect_keyword(Keyword::Vezes)?;

    let bound = match self.stream.peek().map(|token| token.kind) {
      Some(TokenKind::Num) => {
        let (value, _) = self.stream.get_number()?;
        value.to_string()
      }
      _ => {
        let (name, loc) = self.stream.get_ident()?;
        self.check_declared(&name, loc)?;
        name
      }
    };
    self.stream.expect_keyword(Keyword::Fim)?;

    let (counter, limit) = self.fresh_hidden_pair();
    let mut fragment = vec![format!(
      "for (int {counter} = 0, {limit} = {bound}; {counter} < {limit}; {counter}++) {{"
    )];
    fragment.extend(indent(body));
    fragment.push("}".to_string());
    trace.note(format!("counted loop translated: {bound} iterations"));
    Ok(fragment)
  }

  /// `ENQUANTO ID FACA stmt_list FIM` – pre-test loop, guard re-evaluated
  /// before every iteration in the emitted program.
  fn guarded_loop(&mut self, trace: &mut Trace) -> CompileResult<Fragment> {
    self.stream.expect_keyword(Keyword::Enquanto)?;
    let (guard, loc) = self.stream.get_ident()?;
    self.check_declared(&guard, loc)?;
    self.stream.expect_keyword(Keyword::Faca)?;
    let body = self.stmt_list(trace)?;
    self.stream.expect_keyword(Keyword::Fim)?;

    let mut fragment = vec![format!("while ({guard} != 0) {{")];
    fragment.extend(indent(body));
    fragment.push("}".to_string());
    trace.note(format!("while loop translated: guard {guard}"));
    Ok(fragment)
  }

  /// `expr := term ('+' term)*`
  fn expr(&mut self) -> CompileResult<String> {
    let mut value = self.term()?;
    while self.stream.equal("+") {
      let rhs = self.term()?;
      value = format!("({value} + {rhs})");
    }
    Ok(value)
  }

  /// `term := primary ('*' primary)*`
  fn term(&mut self) -> CompileResult<String> {
    let mut value = self.primary()?;
    while self.stream.equal("*") {
      let rhs = self.primary()?;
      value = format!("({value} * {rhs})");
    }
    Ok(value)
  }

  /// `primary := ID | NUM`
  fn primary(&mut self) -> CompileResult<String> {
    match self.stream.peek().map(|token| token.kind) {
      Some(TokenKind::Ident) => {
        let (name, loc) = self.stream.get_ident()?;
        self.check_declared(&name, loc)?;
        Ok(name)
      }
      Some(TokenKind::Num) => {
        let (value, _) = self.stream.get_number()?;
        Ok(value.to_string())
      }
      _ => {
        let token = self.stream.peek();
        let got = describe_token(token, self.stream.source);
        let loc = token.map_or(self.stream.source.len(), |t| t.loc);
        Err(CompileError::at(
          self.stream.source,
          loc,
          format!("expected an identifier or a number, but got \"{got}\""),
        ))
      }
    }
  }

  fn check_declared(&self, name: &str, loc: usize) -> CompileResult<()> {
    if self.symbols.contains(name) {
      Ok(())
    } else {
      Err(CompileError::at(
        self.stream.source,
        loc,
        format!("undeclared variable \"{name}\""),
      ))
    }
  }

  /// Fresh counter/limit names for a counted loop. Source identifiers may
  /// themselves start with underscores, so keep bumping until neither name
  /// is declared.
  fn fresh_hidden_pair(&mut self) -> (String, String) {
    loop {
      let n = self.hidden_counter;
      self.hidden_counter += 1;
      let counter = format!("__vezes_i{n}");
      let limit = format!("__vezes_n{n}");
      if !self.symbols.contains(&counter) && !self.symbols.contains(&limit) {
        return (counter, limit);
      }
    }
  }
}

/// Monitor announcement: always the variable's current value by name, never
/// the expression that produced it.
fn announce(name: &str) -> String {
  format!("printf(\"{name} = %d\\n\", {name});")
}

/// Re-indent a nested fragment one block level deeper.
fn indent(fragment: Fragment) -> Fragment {
  fragment
    .into_iter()
    .map(|line| format!("    {line}"))
    .collect()
}

/// Lightweight cursor over the token vector.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> TokenStream<'a> {
  /// Take ownership of the token stream; the translator advances `pos` as it
  /// consumes input.
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  /// Consume the current token if it matches the provided punctuator.
  fn equal(&mut self, op: &str) -> bool {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Punctuator
      && token.len == op.len()
      && token_text(token, self.source) == op
    {
      self.pos += 1;
      return true;
    }
    false
  }

  fn skip(&mut self, s: &str) -> CompileResult<()> {
    if self.equal(s) {
      Ok(())
    } else {
      let (loc, got) = match self.tokens.get(self.pos) {
        Some(token) => (token.loc, describe_token(Some(token), self.source)),
        None => (self.source.len(), "end of input".to_string()),
      };
      Err(CompileError::at(
        self.source,
        loc,
        format!("expected \"{s}\", but got \"{got}\""),
      ))
    }
  }

  /// Consume the current token if it is the given keyword.
  fn equal_keyword(&mut self, keyword: Keyword) -> bool {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Keyword(keyword)
    {
      self.pos += 1;
      return true;
    }
    false
  }

  fn expect_keyword(&mut self, keyword: Keyword) -> CompileResult<()> {
    if self.equal_keyword(keyword) {
      Ok(())
    } else {
      let (loc, got) = match self.tokens.get(self.pos) {
        Some(token) => (token.loc, describe_token(Some(token), self.source)),
        None => (self.source.len(), "end of input".to_string()),
      };
      Err(CompileError::at(
        self.source,
        loc,
        format!("expected \"{}\", but got \"{got}\"", keyword.as_str()),
      ))
    }
  }

  /// Parse the current token as an integer literal returning its value and
  /// location.
  fn get_number(&mut self) -> CompileResult<(i64, usize)> {
    if let Some(token) = self.tokens.get(self.pos)
      && token.kind == TokenKind::Num
    {
      let value = token.value.ok_or_else(|| {
        CompileError::at(
          self.source,
          token.loc,
          "internal error: numeric token missing value",
        )
      })?;
      let loc = token.loc;
      self.pos += 1;
      return Ok((value, loc));
    }

    let (loc, got) = match self.tokens.get(self.pos) {
      Some(token) => (token.loc, describe_token(Some(token), self.source)),
      None => (self.source.len(), "end of input".to_string()),
    };
    Err(CompileError::at(
      self.source,
      loc,
      format!("expected a number, but got \"{got}\""),
    ))
  }

  /// Parse the current token as an identifier.
  fn get_ident(&mut self) -> CompileResult<(String, usize)> {
    if let Some(token) = self.tokens.get(self.pos)
      && token.kind == TokenKind::Ident
    {
      let name = token_text(token, self.source).to_string();
      let loc = token.loc;
      self.pos += 1;
      return Ok((name, loc));
    }

    let (loc, got) = match self.tokens.get(self.pos) {
      Some(token) => (token.loc, describe_token(Some(token), self.source)),
      None => (self.source.len(), "end of input".to_string()),
    };
    Err(CompileError::at(
      self.source,
      loc,
      format!("expected an identifier, but got \"{got}\""),
    ))
  }

  fn is_eof(&self) -> bool {
    matches!(self.peek().map(|token| token.kind), Some(TokenKind::Eof))
  }
}
