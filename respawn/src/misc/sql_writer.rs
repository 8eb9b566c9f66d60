use alloc::string::String;

/// Writes `value` as a SQL string literal, doubling every inner `'`.
#[inline]
pub fn push_literal(buffer: &mut String, value: &str) {
  buffer.push('\'');
  for ch in value.chars() {
    if ch == '\'' {
      buffer.push('\'');
    }
    buffer.push(ch);
  }
  buffer.push('\'');
}

/// Writes `ident` enclosed by `open` and `close`. Every inner occurrence of `close` is doubled,
/// which is how all supported dialects escape delimited identifiers.
#[inline]
pub fn push_quoted(buffer: &mut String, (open, close): (char, char), ident: &str) {
  buffer.push(open);
  for ch in ident.chars() {
    if ch == close {
      buffer.push(close);
    }
    buffer.push(ch);
  }
  buffer.push(close);
}

/// Calls `cb` for each element of `iter`, writing `separator` between consecutive elements.
#[inline]
pub fn push_separated<T>(
  buffer: &mut String,
  iter: impl IntoIterator<Item = T>,
  separator: &str,
  mut cb: impl FnMut(&mut String, T) -> crate::Result<()>,
) -> crate::Result<()> {
  let mut is_first = true;
  for elem in iter {
    if !is_first {
      buffer.push_str(separator);
    }
    is_first = false;
    cb(buffer, elem)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use crate::misc::{push_literal, push_quoted, push_separated};
  use alloc::string::String;

  #[test]
  fn literals_double_single_quotes() {
    let mut buffer = String::new();
    push_literal(&mut buffer, "o'neil");
    assert_eq!(buffer, "'o''neil'");
  }

  #[test]
  fn quoted_identifiers_double_the_closing_delimiter() {
    let mut buffer = String::new();
    push_quoted(&mut buffer, ('"', '"'), r#"we"ird"#);
    buffer.push(' ');
    push_quoted(&mut buffer, ('[', ']'), "a]b[c");
    buffer.push(' ');
    push_quoted(&mut buffer, ('`', '`'), "x`y");
    assert_eq!(buffer, r#""we""ird" [a]]b[c] `x``y`"#);
  }

  #[test]
  fn separated_elements() {
    let mut buffer = String::new();
    push_separated(&mut buffer, ["a", "b", "c"], ", ", |local, elem| {
      push_literal(local, elem);
      Ok(())
    })
    .unwrap();
    assert_eq!(buffer, "'a', 'b', 'c'");
    buffer.clear();
    push_separated(&mut buffer, [""; 0], ", ", |_, _| Ok(())).unwrap();
    assert_eq!(buffer, "");
  }
}
