/// Emit a string literal delimited by double quotes, escaping characters that
/// would otherwise terminate or change the meaning of the literal. Non-ASCII
/// characters are preserved as UTF-8 except for U+2028/U+2029, which are
/// always escaped so older engines don't treat them as line terminators.
pub fn emit_string_literal_double_quoted(out: &mut Vec<u8>, value: &str) {
  out.push(b'"');

  let mut chars = value.chars().peekable();
  while let Some(ch) = chars.next() {
    match ch {
      '\\' => out.extend_from_slice(b"\\\\"),
      '"' => out.extend_from_slice(b"\\\""),
      '\n' => out.extend_from_slice(b"\\n"),
      '\r' => out.extend_from_slice(b"\\r"),
      '\t' => out.extend_from_slice(b"\\t"),
      '\0' => {
        // `\0` followed by a digit would be a legacy octal escape.
        let next_is_digit = chars.peek().is_some_and(|c| c.is_ascii_digit());
        if next_is_digit {
          out.extend_from_slice(b"\\x00");
        } else {
          out.extend_from_slice(b"\\0");
        }
      }
      '\u{2028}' => out.extend_from_slice(b"\\u2028"),
      '\u{2029}' => out.extend_from_slice(b"\\u2029"),
      ch if ch < '\u{20}' || ch == '\u{7f}' => {
        out.extend_from_slice(format!("\\x{:02X}", ch as u32).as_bytes());
      }
      ch => {
        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
      }
    }
  }

  out.push(b'"');
}

/// Whether `name` can be written without quotes where an IdentifierName is
/// expected (property keys, import and export names). Conservative for
/// non-ASCII text: anything outside `[A-Za-z0-9_$]` gets quoted.
pub fn is_plain_identifier_name(name: &str) -> bool {
  let mut bytes = name.bytes();
  match bytes.next() {
    Some(b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$') => {}
    _ => return false,
  };
  bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
}

#[cfg(test)]
mod tests {
  use super::*;

  fn emit_string(value: &str) -> String {
    let mut out = Vec::new();
    emit_string_literal_double_quoted(&mut out, value);
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn escapes_quotes_and_backslashes() {
    assert_eq!(emit_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
    assert_eq!(emit_string("it's"), "\"it's\"");
  }

  #[test]
  fn escapes_control_characters() {
    assert_eq!(emit_string("a\nb\tc"), "\"a\\nb\\tc\"");
    assert_eq!(emit_string("a\u{0007}b"), "\"a\\x07b\"");
  }

  #[test]
  fn escapes_zero_followed_by_digit() {
    assert_eq!(emit_string("\u{0000}9"), "\"\\x009\"");
    assert_eq!(emit_string("\u{0000}a"), "\"\\0a\"");
  }

  #[test]
  fn escapes_line_separators() {
    assert_eq!(emit_string("a\u{2028}b"), "\"a\\u2028b\"");
    assert_eq!(emit_string("a\u{2029}b"), "\"a\\u2029b\"");
  }

  #[test]
  fn keeps_non_ascii_text() {
    assert_eq!(emit_string("héllo"), "\"héllo\"");
  }

  #[test]
  fn plain_identifier_names() {
    assert!(is_plain_identifier_name("hot"));
    assert!(is_plain_identifier_name("$_a1"));
    assert!(!is_plain_identifier_name("1a"));
    assert!(!is_plain_identifier_name("foo-bar"));
    assert!(!is_plain_identifier_name(""));
  }
}
