//! Small utility helpers used across modules.

/// True if unicode char belongs to CJK ranges.
pub fn is_cjk(ch: char) -> bool {
  ('\u{4E00}'..='\u{9FFF}').contains(&ch)
    || ('\u{3400}'..='\u{4DBF}').contains(&ch)
    || ('\u{20000}'..='\u{2A6DF}').contains(&ch)
    || ('\u{2A700}'..='\u{2B73F}').contains(&ch)
    || ('\u{2B740}'..='\u{2B81F}').contains(&ch)
    || ('\u{2B820}'..='\u{2CEAF}').contains(&ch)
    || ('\u{F900}'..='\u{FAFF}').contains(&ch)
}

/// Exactly one character, or `None`.
pub fn single_char(s: &str) -> Option<char> {
  let mut it = s.trim().chars();
  match (it.next(), it.next()) {
    (Some(c), None) => Some(c),
    _ => None,
  }
}

/// Log-safe truncation for user-typed text (char boundary safe).
pub fn trunc_for_log(s: &str, max_chars: usize) -> String {
  let n = s.chars().count();
  if n <= max_chars {
    s.to_string()
  } else {
    let head: String = s.chars().take(max_chars).collect();
    format!("{head}… ({n} chars total)")
  }
}
