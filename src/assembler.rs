//! Program assembly: wrap the translated body into a complete C program.
//!
//! The emitted document is a deterministic function of the translation unit:
//! a fixed prologue, one declaration per symbol in first-declaration order
//! (monitored variables announce their starting 0 right away), the body
//! fragment, a consolidated dump of every variable's final value, and a
//! fixed epilogue.

use crate::translator::TranslationUnit;

/// Emit the complete C program for a translation unit.
pub fn assemble(unit: &TranslationUnit) -> String {
  let mut out = String::new();
  out.push_str("#include <stdio.h>\n");
  out.push_str("\n");
  out.push_str("int main(void) {\n");

  for symbol in unit.symbols.iter() {
    out.push_str(&format!("    int {} = 0;\n", symbol.name));
    if unit.monitors.contains(&symbol.name) {
      out.push_str(&format!(
        "    printf(\"{0} = %d\\n\", {0});\n",
        symbol.name
      ));
    }
  }

  out.push('\n');
  for line in &unit.body {
    out.push_str(&format!("    {line}\n"));
  }

  out.push('\n');
  out.push_str(&final_dump(unit));
  out.push_str("    return 0;\n");
  out.push_str("}\n");
  out
}

/// One consolidated `printf` announcing every declared variable's final
/// value, in declaration order.
fn final_dump(unit: &TranslationUnit) -> String {
  let names: Vec<&str> = unit.symbols.iter().map(|s| s.name.as_str()).collect();
  let formats: Vec<String> = names.iter().map(|name| format!("{name} = %d")).collect();
  format!(
    "    printf(\"{}\\n\", {});\n",
    formats.join(", "),
    names.join(", ")
  )
}
