//! Boundary-aware byte buffer writer used by the printers.
//!
//! Callers emit token-like fragments (keywords, identifiers, numbers,
//! punctuation) and the [`Emitter`] inserts the minimal whitespace required to
//! prevent the concatenation from being lexed as a different token (e.g.
//! `returnx`, `a++b`, `a--b`). In [`EmitMode::Pretty`] it additionally tracks
//! an indentation level that is applied lazily at the start of each line, so
//! dedenting before a closing brace needs no lookahead.

use crate::escape::emit_string_literal_double_quoted;
use parse_js::loc::Loc;
use std::fmt;

const INDENT: &[u8] = b"  ";

/// Controls how the emitter lays out whitespace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmitMode {
  /// Only inserts whitespace when necessary to avoid token ambiguity.
  #[default]
  Minified,
  /// One statement per line, two-space indentation, spaces around binary
  /// operators.
  Pretty,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EmitOptions {
  pub mode: EmitMode,
}

impl EmitOptions {
  pub fn minified() -> Self {
    EmitOptions {
      mode: EmitMode::Minified,
    }
  }

  pub fn pretty() -> Self {
    EmitOptions {
      mode: EmitMode::Pretty,
    }
  }
}

#[derive(Debug)]
pub enum EmitErrorKind {
  Fmt(fmt::Error),
  Unsupported(&'static str),
}

#[derive(Debug)]
pub struct EmitError {
  pub kind: EmitErrorKind,
  pub loc: Option<Loc>,
}

impl EmitError {
  pub(crate) fn unsupported(message: &'static str) -> Self {
    Self {
      kind: EmitErrorKind::Unsupported(message),
      loc: None,
    }
  }

  pub(crate) fn with_loc(mut self, loc: Loc) -> Self {
    // The innermost node wins.
    if self.loc.is_none() {
      self.loc = Some(loc);
    }
    self
  }
}

impl fmt::Display for EmitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.kind {
      EmitErrorKind::Fmt(err) => write!(f, "formatting failed: {}", err)?,
      EmitErrorKind::Unsupported(what) => write!(f, "cannot emit {}", what)?,
    };
    if let Some(loc) = self.loc {
      write!(f, " around loc [{}:{}]", loc.0, loc.1)?;
    };
    Ok(())
  }
}

impl std::error::Error for EmitError {}

impl From<fmt::Error> for EmitError {
  fn from(value: fmt::Error) -> Self {
    Self {
      kind: EmitErrorKind::Fmt(value),
      loc: None,
    }
  }
}

pub type EmitResult = Result<(), EmitError>;

pub(crate) fn with_node_context<T>(
  loc: Loc,
  f: impl FnOnce() -> Result<T, EmitError>,
) -> Result<T, EmitError> {
  f().map_err(|err| err.with_loc(loc))
}

#[derive(Debug, Clone)]
pub struct Emitter {
  out: Vec<u8>,
  opts: EmitOptions,
  state: State,
  indent_level: usize,
  // Set by a line break; indentation is written before the next fragment.
  pending_indent: bool,
}

#[derive(Debug, Clone, Copy)]
struct State {
  trailing: Boundary,
  html_close: HtmlClose,
}

impl Default for State {
  fn default() -> Self {
    State {
      trailing: Boundary::None,
      html_close: HtmlClose::LineStart,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
  None,
  Word,
  Number,
  Plus,
  PlusPlus,
  Minus,
  MinusMinus,
  Slash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leading {
  None,
  Word,
  Number,
  Plus,
  Minus,
  Slash,
  Star,
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
  Word,
  Number,
  Plus,
  PlusPlus,
  Minus,
  MinusMinus,
  Other,
}

#[derive(Debug, Clone, Copy)]
struct FragmentBoundary {
  leading: Leading,
  trailing: Boundary,
}

// Tracks whether the current line so far is whitespace followed by `--`, as
// a following `>` would turn the line into an HTML close comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HtmlClose {
  LineStart,
  Dash,
  DashDash,
  Other,
}

impl Emitter {
  pub fn new(opts: EmitOptions) -> Self {
    Emitter {
      out: Vec::new(),
      opts,
      state: State::default(),
      indent_level: 0,
      pending_indent: false,
    }
  }

  pub fn with_capacity(capacity: usize, opts: EmitOptions) -> Self {
    Emitter {
      out: Vec::with_capacity(capacity),
      ..Emitter::new(opts)
    }
  }

  pub fn mode(&self) -> EmitMode {
    self.opts.mode
  }

  pub fn options(&self) -> EmitOptions {
    self.opts
  }

  pub fn is_pretty(&self) -> bool {
    self.opts.mode == EmitMode::Pretty
  }

  /// Returns a read-only view of the buffer.
  pub fn as_bytes(&self) -> &[u8] {
    &self.out
  }

  /// Consumes the emitter, returning the underlying buffer.
  pub fn into_bytes(self) -> Vec<u8> {
    self.out
  }

  /// Consumes the emitter, returning the output as text. Every fragment is
  /// written from a `&str`, so the buffer is always valid UTF-8.
  pub fn into_string(self) -> String {
    match String::from_utf8(self.out) {
      Ok(text) => text,
      Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
  }

  /// Clears the buffer and resets token-boundary and indentation state.
  pub fn clear(&mut self) {
    self.out.clear();
    self.state = State::default();
    self.indent_level = 0;
    self.pending_indent = false;
  }

  /// Writes a single byte, updating boundary tracking.
  pub fn write_byte(&mut self, byte: u8) {
    let boundary = classify_byte(byte);
    self.insert_boundary(boundary.leading);
    self.insert_html_comment_break(&[byte]);
    self.push_bytes(&[byte]);
    self.state.trailing = boundary.trailing;
  }

  /// Writes a single-token fragment (or whitespace), classifying its first and
  /// last characters to decide whether a separating space is required.
  pub fn write_str(&mut self, text: &str) {
    if text.is_empty() {
      return;
    }

    let boundaries = classify_fragment(text.as_bytes());
    self.insert_boundary(boundaries.leading);
    self.insert_html_comment_break(text.as_bytes());
    self.push_bytes(text.as_bytes());
    self.state.trailing = boundaries.trailing;
  }

  pub fn write_keyword(&mut self, keyword: &str) {
    self.write_with_kind(keyword, TokenKind::Word);
  }

  pub fn write_identifier(&mut self, identifier: &str) {
    self.write_with_kind(identifier, TokenKind::Word);
  }

  pub fn write_number(&mut self, number: &str) {
    self.write_with_kind(number, TokenKind::Number);
  }

  /// Emits punctuation or operators.
  pub fn write_punct(&mut self, punct: &str) {
    let kind = match punct {
      "+" => TokenKind::Plus,
      "++" => TokenKind::PlusPlus,
      "-" => TokenKind::Minus,
      "--" => TokenKind::MinusMinus,
      _ => TokenKind::Other,
    };
    self.write_with_kind(punct, kind);
  }

  /// Emits a double-quoted string literal.
  pub fn write_string_literal(&mut self, value: &str) {
    let mut buf = Vec::with_capacity(value.len() + 2);
    emit_string_literal_double_quoted(&mut buf, value);
    self.insert_boundary(Leading::Other);
    self.push_bytes(&buf);
    self.state.trailing = Boundary::None;
  }

  pub fn write_space(&mut self) {
    self.push_bytes(b" ");
    self.state.trailing = Boundary::None;
  }

  /// A space in pretty mode, nothing otherwise.
  pub fn write_soft_space(&mut self) {
    if self.is_pretty() {
      self.write_space();
    }
  }

  /// Emits a newline and clears boundary tracking.
  pub fn write_newline(&mut self) {
    self.write_byte(b'\n');
  }

  /// Starts a new line in pretty mode; the current indentation is applied
  /// before whatever is written next. Does nothing when minifying.
  pub fn write_line_break(&mut self) {
    if !self.is_pretty() {
      return;
    }
    self.pending_indent = false;
    self.write_newline();
    self.pending_indent = true;
  }

  pub fn indent(&mut self) {
    self.indent_level += 1;
  }

  pub fn dedent(&mut self) {
    self.indent_level = self.indent_level.saturating_sub(1);
  }

  pub fn write_comma(&mut self) {
    self.write_punct(",");
    self.write_soft_space();
  }

  pub fn write_semicolon(&mut self) {
    self.write_punct(";");
  }

  /// Writes bytes as-is without attempting to enforce token boundaries.
  /// Resets trailing state to avoid affecting subsequent boundary decisions.
  pub fn write_raw_str(&mut self, text: &str) {
    self.push_bytes(text.as_bytes());
    self.state.trailing = Boundary::None;
  }

  /// Emits items separated by `separator` (followed by a space in pretty
  /// mode), stopping at the first error.
  pub fn emit_punctuated_list<T, E>(
    &mut self,
    items: &[T],
    separator: &str,
    mut emit_item: impl FnMut(&mut Self, &T) -> Result<(), E>,
  ) -> Result<(), E> {
    for (idx, item) in items.iter().enumerate() {
      if idx > 0 {
        self.write_punct(separator);
        self.write_soft_space();
      }
      emit_item(self, item)?;
    }
    Ok(())
  }

  fn write_with_kind(&mut self, text: &str, kind: TokenKind) {
    if text.is_empty() {
      return;
    }

    let boundaries = classify_fragment_with_kind(text.as_bytes(), kind);
    self.insert_boundary(boundaries.leading);
    self.insert_html_comment_break(text.as_bytes());
    self.push_bytes(text.as_bytes());
    self.state.trailing = boundaries.trailing;
  }

  fn insert_boundary(&mut self, next: Leading) {
    if next == Leading::None {
      return;
    }

    if needs_space(self.state.trailing, next) {
      self.push_bytes(b" ");
      self.state.trailing = Boundary::None;
    }
  }

  fn insert_html_comment_break(&mut self, bytes: &[u8]) {
    if would_open_html_comment(&self.out, bytes)
      || would_close_html_comment(self.state.html_close, bytes)
    {
      self.push_bytes(b" ");
      self.state.trailing = Boundary::None;
    }
  }

  fn push_bytes(&mut self, bytes: &[u8]) {
    if bytes.is_empty() {
      return;
    }
    if self.pending_indent {
      self.pending_indent = false;
      for _ in 0..self.indent_level {
        self.out.extend_from_slice(INDENT);
      }
    }
    self.out.extend_from_slice(bytes);
    self.state.html_close = advance_html_close(self.state.html_close, bytes);
  }
}

impl Default for Emitter {
  fn default() -> Self {
    Emitter::new(EmitOptions::default())
  }
}

impl std::fmt::Write for Emitter {
  fn write_str(&mut self, s: &str) -> std::fmt::Result {
    Emitter::write_str(self, s);
    Ok(())
  }
}

fn needs_space(prev: Boundary, next: Leading) -> bool {
  matches!(
    (prev, next),
    (Boundary::Word | Boundary::Number, Leading::Word | Leading::Number)
      | (Boundary::Plus | Boundary::PlusPlus, Leading::Plus)
      | (Boundary::Minus | Boundary::MinusMinus, Leading::Minus)
      | (Boundary::Slash, Leading::Slash | Leading::Star)
  )
}

fn classify_fragment(bytes: &[u8]) -> FragmentBoundary {
  let Some(&first) = bytes.first() else {
    return FragmentBoundary {
      leading: Leading::None,
      trailing: Boundary::None,
    };
  };
  let leading = if first.is_ascii_whitespace() {
    Leading::None
  } else {
    classify_leading_char(first)
  };
  let last_idx = bytes.len() - 1;
  let trailing = if bytes[last_idx].is_ascii_whitespace() {
    Boundary::None
  } else {
    classify_trailing_char(bytes, last_idx)
  };
  FragmentBoundary { leading, trailing }
}

fn classify_fragment_with_kind(bytes: &[u8], kind: TokenKind) -> FragmentBoundary {
  if kind == TokenKind::Other {
    return classify_fragment(bytes);
  }
  FragmentBoundary {
    leading: kind.leading(),
    trailing: kind.trailing(),
  }
}

fn classify_byte(byte: u8) -> FragmentBoundary {
  classify_fragment(&[byte])
}

fn classify_leading_char(ch: u8) -> Leading {
  match ch {
    b'0'..=b'9' => Leading::Number,
    // Non-ASCII bytes can only start identifiers here; strings are written separately.
    b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' | b'\\' | 0x80..=0xff => Leading::Word,
    b'+' => Leading::Plus,
    b'-' => Leading::Minus,
    b'/' => Leading::Slash,
    b'*' => Leading::Star,
    _ => Leading::Other,
  }
}

fn classify_trailing_char(bytes: &[u8], idx: usize) -> Boundary {
  match bytes[idx] {
    b'0'..=b'9' => Boundary::Number,
    b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' | 0x80..=0xff => Boundary::Word,
    b'+' if idx >= 1 && bytes[idx - 1] == b'+' => Boundary::PlusPlus,
    b'+' => Boundary::Plus,
    b'-' if idx >= 1 && bytes[idx - 1] == b'-' => Boundary::MinusMinus,
    b'-' => Boundary::Minus,
    b'/' => Boundary::Slash,
    _ => Boundary::None,
  }
}

impl TokenKind {
  fn leading(self) -> Leading {
    match self {
      TokenKind::Word => Leading::Word,
      TokenKind::Number => Leading::Number,
      TokenKind::Plus | TokenKind::PlusPlus => Leading::Plus,
      TokenKind::Minus | TokenKind::MinusMinus => Leading::Minus,
      TokenKind::Other => Leading::Other,
    }
  }

  fn trailing(self) -> Boundary {
    match self {
      TokenKind::PlusPlus => Boundary::PlusPlus,
      TokenKind::MinusMinus => Boundary::MinusMinus,
      TokenKind::Plus => Boundary::Plus,
      TokenKind::Minus => Boundary::Minus,
      TokenKind::Word => Boundary::Word,
      TokenKind::Number => Boundary::Number,
      TokenKind::Other => Boundary::None,
    }
  }
}

// `<!--` opens a single-line comment anywhere in a script. Only sequences
// straddling the already written output and the next fragment are checked;
// a single fragment never contains one.
fn would_open_html_comment(out: &[u8], next: &[u8]) -> bool {
  const OPEN: &[u8] = b"<!--";
  let tail = &out[out.len().saturating_sub(OPEN.len() - 1)..];
  let head = &next[..next.len().min(OPEN.len() - 1)];
  let mut window = Vec::with_capacity(tail.len() + head.len());
  window.extend_from_slice(tail);
  window.extend_from_slice(head);
  (0..window.len().saturating_sub(OPEN.len() - 1))
    .filter(|&start| start < tail.len() && start + OPEN.len() > tail.len())
    .any(|start| window[start..].starts_with(OPEN))
}

fn would_close_html_comment(mut state: HtmlClose, bytes: &[u8]) -> bool {
  for &byte in bytes {
    if state == HtmlClose::DashDash && byte == b'>' {
      return true;
    }
    state = next_html_close(state, byte);
  }
  false
}

fn advance_html_close(mut state: HtmlClose, bytes: &[u8]) -> HtmlClose {
  for &byte in bytes {
    state = next_html_close(state, byte);
  }
  state
}

fn next_html_close(state: HtmlClose, byte: u8) -> HtmlClose {
  match (state, byte) {
    (_, b'\n' | b'\r') => HtmlClose::LineStart,
    (HtmlClose::LineStart, b'-') => HtmlClose::Dash,
    (HtmlClose::LineStart, b) if b.is_ascii_whitespace() => HtmlClose::LineStart,
    (HtmlClose::Dash, b'-') => HtmlClose::DashDash,
    _ => HtmlClose::Other,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn html_open_detection_only_checks_the_seam() {
    assert!(would_open_html_comment(b"a<", b"!--b"));
    assert!(would_open_html_comment(b"a<!", b"--"));
    assert!(would_open_html_comment(b"a<!-", b"-"));
    assert!(!would_open_html_comment(b"", b"<!--"));
    assert!(!would_open_html_comment(b"a<", b"!b"));
  }

  #[test]
  fn html_close_only_at_line_start() {
    assert!(would_close_html_comment(HtmlClose::DashDash, b">"));
    assert!(!would_close_html_comment(HtmlClose::Other, b">"));
    assert_eq!(advance_html_close(HtmlClose::LineStart, b"  --"), HtmlClose::DashDash);
    assert_eq!(advance_html_close(HtmlClose::LineStart, b"a--"), HtmlClose::Other);
  }
}
