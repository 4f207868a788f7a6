//! Legacy text repair for decomposed Cyrillic input.
//!
//! Some historic exports carry `й` as the base letter `и` followed by the
//! combining breve U+0306 instead of the precomposed character. This is an
//! explicit, opt-in fixup — it is never applied implicitly on reads, so
//! stored text is only ever rewritten at call sites that ask for it.

const COMBINING_BREVE: char = '\u{0306}';

/// Recompose `и` + U+0306 into `й` and drop any stray combining breve.
/// All other characters pass through untouched.
pub fn collapse_breve(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    if ch == COMBINING_BREVE {
      if out.ends_with('и') {
        out.pop();
        out.push('й');
      }
      // stray breve with no base letter: dropped
      continue;
    }
    out.push(ch);
  }
  out
}
