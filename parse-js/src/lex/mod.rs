use crate::char::is_id_continue;
use crate::char::is_id_start;
use crate::char::is_line_terminator;
use crate::char::is_whitespace;
use crate::char::CharFilter;
use crate::char::DIGIT;
use crate::char::DIGIT_BIN;
use crate::char::DIGIT_HEX;
use crate::char::DIGIT_OCT;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;
use ahash::HashMap;
use ahash::HashMapExt;
use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickKind;
use aho_corasick::Anchored;
use aho_corasick::Input;
use aho_corasick::MatchKind;
use aho_corasick::StartKind;
use core::ops::Index;
use memchr::memchr2;
use memchr::memchr3;
use memchr::memmem;
use once_cell::sync::Lazy;

#[cfg(test)]
mod tests;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LexMode {
  SlashIsRegex,
  Standard,
  // Lexes the string part of a template that follows a `}` closing a substitution.
  TemplateStrContinue,
}

#[derive(Copy, Clone, Debug)]
pub struct LexerCheckpoint {
  next: usize,
}

// Contains the match length.
#[derive(Copy, Clone)]
struct Match(usize);

impl Match {
  pub fn len(&self) -> usize {
    self.0
  }

  pub fn prefix(&self, n: usize) -> Match {
    debug_assert!(n <= self.len());
    Match(n)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

struct PatternMatcher {
  patterns: Vec<TT>,
  matcher: AhoCorasick,
}

impl PatternMatcher {
  pub fn new(patterns: Vec<(TT, String)>) -> Self {
    let (tts, syns): (Vec<_>, Vec<_>) = patterns.into_iter().unzip();
    let matcher = AhoCorasick::builder()
      .start_kind(StartKind::Anchored)
      .kind(Some(AhoCorasickKind::DFA))
      .match_kind(MatchKind::LeftmostLongest)
      .build(syns)
      .expect("punctuator patterns form a valid automaton");
    PatternMatcher {
      patterns: tts,
      matcher,
    }
  }

  pub fn find(&self, lexer: &Lexer) -> LexResult<(TT, Match)> {
    self
      .matcher
      .find(Input::new(&lexer.source[lexer.next..]).anchored(Anchored::Yes))
      .map(|m| (self.patterns[m.pattern().as_usize()], Match(m.end())))
      .ok_or(LexNotFound)
  }
}

#[derive(Debug)]
struct LexNotFound;

type LexResult<T> = Result<T, LexNotFound>;

pub struct Lexer<'a> {
  source: &'a str,
  next: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(code: &'a str) -> Lexer<'a> {
    Lexer {
      source: code,
      next: 0,
    }
  }

  pub fn source(&self) -> &'a str {
    self.source
  }

  pub fn next(&self) -> usize {
    self.next
  }

  fn end(&self) -> usize {
    self.source.len()
  }

  fn remaining(&self) -> usize {
    self.end() - self.next
  }

  fn at_end(&self) -> bool {
    self.next >= self.end()
  }

  fn peek(&self, n: usize) -> LexResult<char> {
    self.peek_or_eof(n).ok_or(LexNotFound)
  }

  fn peek_or_eof(&self, n: usize) -> Option<char> {
    self.source[self.next..].chars().nth(n)
  }

  /// WARNING: Prefer checkpoints instead. Only use this if you know what you're doing.
  pub fn set_next(&mut self, next: usize) {
    self.next = next;
  }

  pub fn checkpoint(&self) -> LexerCheckpoint {
    LexerCheckpoint { next: self.next }
  }

  pub fn since_checkpoint(&self, checkpoint: LexerCheckpoint) -> Loc {
    Loc(checkpoint.next, self.next)
  }

  pub fn apply_checkpoint(&mut self, checkpoint: LexerCheckpoint) {
    self.next = checkpoint.next;
  }

  fn if_char(&self, c: char) -> Match {
    match self.peek_or_eof(0) {
      Some(first) if first == c => Match(c.len_utf8()),
      _ => Match(0),
    }
  }

  fn while_not_2_chars(&self, a: u8, b: u8) -> Match {
    Match(memchr2(a, b, self.source[self.next..].as_bytes()).unwrap_or(self.remaining()))
  }

  fn while_not_3_chars(&self, a: u8, b: u8, c: u8) -> Match {
    Match(memchr3(a, b, c, self.source[self.next..].as_bytes()).unwrap_or(self.remaining()))
  }

  fn while_chars(&self, chars: &CharFilter) -> Match {
    let mut len = 0;
    for ch in self.source[self.next..].chars() {
      if !chars.has(ch) {
        break;
      };
      len += ch.len_utf8();
    }
    Match(len)
  }

  fn consume(&mut self, m: Match) -> Match {
    self.next += m.len();
    m
  }

  fn consume_next(&mut self) -> LexResult<char> {
    let c = self.peek(0)?;
    self.next += c.len_utf8();
    Ok(c)
  }

  fn skip_expect(&mut self, n: usize) {
    debug_assert!(self.next + n <= self.end());
    self.next += n;
  }

  fn drive_fallible(
    &mut self,
    preceded_by_line_terminator: bool,
    f: impl FnOnce(&mut Self) -> LexResult<TT>,
  ) -> Token {
    let cp = self.checkpoint();
    let typ = f(self).unwrap_or(TT::Invalid);
    Token {
      loc: self.since_checkpoint(cp),
      typ,
      preceded_by_line_terminator,
    }
  }
}

impl<'a> Index<Loc> for Lexer<'a> {
  type Output = str;

  fn index(&self, index: Loc) -> &Self::Output {
    &self.source[index.0..index.1]
  }
}

#[rustfmt::skip]
pub static OPERATORS_MAPPING: Lazy<HashMap<TT, &'static str>> = Lazy::new(|| {
  let mut map = HashMap::<TT, &'static str>::new();
  map.insert(TT::At, "@");
  map.insert(TT::Ampersand, "&");
  map.insert(TT::AmpersandAmpersand, "&&");
  map.insert(TT::AmpersandAmpersandEquals, "&&=");
  map.insert(TT::AmpersandEquals, "&=");
  map.insert(TT::Asterisk, "*");
  map.insert(TT::AsteriskAsterisk, "**");
  map.insert(TT::AsteriskAsteriskEquals, "**=");
  map.insert(TT::AsteriskEquals, "*=");
  map.insert(TT::Bar, "|");
  map.insert(TT::BarBar, "||");
  map.insert(TT::BarBarEquals, "||=");
  map.insert(TT::BarEquals, "|=");
  map.insert(TT::BraceClose, "}");
  map.insert(TT::BraceOpen, "{");
  map.insert(TT::BracketClose, "]");
  map.insert(TT::BracketOpen, "[");
  map.insert(TT::Caret, "^");
  map.insert(TT::CaretEquals, "^=");
  map.insert(TT::ChevronLeft, "<");
  map.insert(TT::ChevronLeftChevronLeft, "<<");
  map.insert(TT::ChevronLeftChevronLeftEquals, "<<=");
  map.insert(TT::ChevronLeftEquals, "<=");
  map.insert(TT::ChevronRight, ">");
  map.insert(TT::ChevronRightChevronRight, ">>");
  map.insert(TT::ChevronRightChevronRightChevronRight, ">>>");
  map.insert(TT::ChevronRightChevronRightChevronRightEquals, ">>>=");
  map.insert(TT::ChevronRightChevronRightEquals, ">>=");
  map.insert(TT::ChevronRightEquals, ">=");
  map.insert(TT::Colon, ":");
  map.insert(TT::Comma, ",");
  map.insert(TT::Dot, ".");
  map.insert(TT::DotDotDot, "...");
  map.insert(TT::Equals, "=");
  map.insert(TT::EqualsChevronRight, "=>");
  map.insert(TT::EqualsEquals, "==");
  map.insert(TT::EqualsEqualsEquals, "===");
  map.insert(TT::Exclamation, "!");
  map.insert(TT::ExclamationEquals, "!=");
  map.insert(TT::ExclamationEqualsEquals, "!==");
  map.insert(TT::Hash, "#");
  map.insert(TT::Hyphen, "-");
  map.insert(TT::HyphenEquals, "-=");
  map.insert(TT::HyphenHyphen, "--");
  map.insert(TT::ParenthesisClose, ")");
  map.insert(TT::ParenthesisOpen, "(");
  map.insert(TT::Percent, "%");
  map.insert(TT::PercentEquals, "%=");
  map.insert(TT::Plus, "+");
  map.insert(TT::PlusEquals, "+=");
  map.insert(TT::PlusPlus, "++");
  map.insert(TT::Question, "?");
  map.insert(TT::QuestionDot, "?.");
  map.insert(TT::QuestionQuestion, "??");
  map.insert(TT::QuestionQuestionEquals, "??=");
  map.insert(TT::Semicolon, ";");
  map.insert(TT::Slash, "/");
  map.insert(TT::SlashEquals, "/=");
  map.insert(TT::Tilde, "~");
  map
});

pub static KEYWORDS_MAPPING: Lazy<HashMap<TT, &'static str>> = Lazy::new(|| {
  let mut map = HashMap::<TT, &'static str>::new();
  map.insert(TT::KeywordAs, "as");
  map.insert(TT::KeywordAsync, "async");
  map.insert(TT::KeywordAwait, "await");
  map.insert(TT::KeywordBreak, "break");
  map.insert(TT::KeywordCase, "case");
  map.insert(TT::KeywordCatch, "catch");
  map.insert(TT::KeywordClass, "class");
  map.insert(TT::KeywordConst, "const");
  map.insert(TT::KeywordContinue, "continue");
  map.insert(TT::KeywordDebugger, "debugger");
  map.insert(TT::KeywordDefault, "default");
  map.insert(TT::KeywordDelete, "delete");
  map.insert(TT::KeywordDo, "do");
  map.insert(TT::KeywordElse, "else");
  map.insert(TT::KeywordEnum, "enum");
  map.insert(TT::KeywordExport, "export");
  map.insert(TT::KeywordExtends, "extends");
  map.insert(TT::KeywordFinally, "finally");
  map.insert(TT::KeywordFor, "for");
  map.insert(TT::KeywordFrom, "from");
  map.insert(TT::KeywordFunction, "function");
  map.insert(TT::KeywordGet, "get");
  map.insert(TT::KeywordIf, "if");
  map.insert(TT::KeywordImport, "import");
  map.insert(TT::KeywordIn, "in");
  map.insert(TT::KeywordInstanceof, "instanceof");
  map.insert(TT::KeywordLet, "let");
  map.insert(TT::KeywordNew, "new");
  map.insert(TT::KeywordOf, "of");
  map.insert(TT::KeywordReturn, "return");
  map.insert(TT::KeywordSet, "set");
  map.insert(TT::KeywordStatic, "static");
  map.insert(TT::KeywordSuper, "super");
  map.insert(TT::KeywordSwitch, "switch");
  map.insert(TT::KeywordThis, "this");
  map.insert(TT::KeywordThrow, "throw");
  map.insert(TT::KeywordTry, "try");
  map.insert(TT::KeywordTypeof, "typeof");
  map.insert(TT::KeywordVar, "var");
  map.insert(TT::KeywordVoid, "void");
  map.insert(TT::KeywordWhile, "while");
  map.insert(TT::KeywordWith, "with");
  map.insert(TT::KeywordYield, "yield");
  map.insert(TT::LiteralFalse, "false");
  map.insert(TT::LiteralNull, "null");
  map.insert(TT::LiteralTrue, "true");
  map
});

pub static KEYWORD_STRS: Lazy<HashMap<&'static str, TT>> =
  Lazy::new(|| KEYWORDS_MAPPING.iter().map(|(&tt, &s)| (s, tt)).collect());

#[rustfmt::skip]
static SIG: Lazy<PatternMatcher> = Lazy::new(|| {
  let mut patterns: Vec<(TT, String)> = Vec::new();
  for (&k, &v) in OPERATORS_MAPPING.iter() {
    patterns.push((k, v.into()));
  }
  for c in "0123456789".chars() {
    patterns.push((TT::LiteralNumber, c.to_string()));
  }
  patterns.push((TT::LiteralNumberBin, "0b".into()));
  patterns.push((TT::LiteralNumberBin, "0B".into()));
  patterns.push((TT::LiteralNumberHex, "0x".into()));
  patterns.push((TT::LiteralNumberHex, "0X".into()));
  patterns.push((TT::LiteralNumberOct, "0o".into()));
  patterns.push((TT::LiteralNumberOct, "0O".into()));
  // Prevent `.` immediately followed by a digit from being recognised as the `.` operator.
  for digit in '0'..='9' {
    patterns.push((TT::LiteralNumber, format!(".{}", digit)));
  }
  // Prevent `?` immediately followed by a decimal number from being recognised as the `?.` operator.
  for digit in '0'..='9' {
    patterns.push((TT::Question, format!("?.{}", digit)));
  }
  patterns.push((TT::LiteralString, "\"".into()));
  patterns.push((TT::LiteralString, "'".into()));
  patterns.push((TT::LiteralTemplatePartString, "`".into()));
  PatternMatcher::new(patterns)
});

/// Returns whether the comment includes a line terminator, or None without
/// consuming anything if the comment is never closed.
fn lex_multiline_comment(lexer: &mut Lexer<'_>) -> Option<bool> {
  let rest = &lexer.source[lexer.next + 2..];
  let len = memmem::find(rest.as_bytes(), b"*/")? + 2;
  let contains_newline = rest[..len].chars().any(is_line_terminator);
  lexer.skip_expect(2 + len);
  Some(contains_newline)
}

fn lex_private_member(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  // Consume `#`.
  lexer.skip_expect(1);
  match lexer.peek_or_eof(0) {
    Some(c) if is_id_start(c) => lexer.skip_expect(c.len_utf8()),
    // A lone `#` is never valid outside a hashbang.
    _ => return Ok(TT::Invalid),
  };
  while let Some(c) = lexer.peek_or_eof(0).filter(|c| is_id_continue(*c)) {
    lexer.skip_expect(c.len_utf8());
  }
  Ok(TT::PrivateMember)
}

fn lex_single_comment(lexer: &mut Lexer<'_>) {
  // The line terminator itself is left for the whitespace loop.
  let m = lexer.while_not_2_chars(b'\n', b'\r');
  lexer.consume(m);
}

fn lex_identifier(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  let start = lexer.next();
  let mut escaped = false;
  loop {
    match lexer.peek_or_eof(0) {
      Some('\\') => {
        lex_unicode_escape(lexer)?;
        escaped = true;
      }
      Some(c) if is_id_continue(c) || (lexer.next() == start && is_id_start(c)) => {
        lexer.skip_expect(c.len_utf8());
      }
      _ => break,
    };
  }
  let raw = &lexer.source[start..lexer.next()];
  // Escaped identifiers never act as keywords.
  if escaped {
    return Ok(TT::Identifier);
  };
  Ok(KEYWORD_STRS.get(raw).copied().unwrap_or(TT::Identifier))
}

fn lex_unicode_escape(lexer: &mut Lexer<'_>) -> LexResult<()> {
  // Consume `\`.
  lexer.skip_expect(1);
  if lexer.consume_next()? != 'u' {
    return Err(LexNotFound);
  };
  if lexer.peek_or_eof(0) == Some('{') {
    lexer.skip_expect(1);
    let digits = lexer.consume(lexer.while_chars(&DIGIT_HEX));
    if digits.is_empty() || lexer.consume_next()? != '}' {
      return Err(LexNotFound);
    };
  } else {
    for _ in 0..4 {
      let c = lexer.consume_next()?;
      if !c.is_ascii_hexdigit() {
        return Err(LexNotFound);
      };
    }
  };
  Ok(())
}

fn lex_bigint_or_number(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  let starts_with_dot = lexer.peek(0)? == '.';
  lexer.consume(lexer.while_chars(&DIGIT));
  if !starts_with_dot && !lexer.consume(lexer.if_char('n')).is_empty() {
    return Ok(TT::LiteralBigInt);
  };
  if !lexer.consume(lexer.if_char('.')).is_empty() {
    lexer.consume(lexer.while_chars(&DIGIT));
  };
  if matches!(lexer.peek_or_eof(0), Some('e' | 'E')) {
    lexer.skip_expect(1);
    if matches!(lexer.peek(0)?, '+' | '-') {
      lexer.skip_expect(1);
    };
    if lexer.consume(lexer.while_chars(&DIGIT)).is_empty() {
      return Err(LexNotFound);
    };
  };
  Ok(TT::LiteralNumber)
}

fn lex_radix_bigint_or_number(lexer: &mut Lexer<'_>, digits: &CharFilter) -> LexResult<TT> {
  // Consume the `0x`, `0o` or `0b` prefix.
  lexer.skip_expect(2);
  if lexer.consume(lexer.while_chars(digits)).is_empty() {
    return Err(LexNotFound);
  };
  if !lexer.consume(lexer.if_char('n')).is_empty() {
    return Ok(TT::LiteralBigInt);
  };
  Ok(TT::LiteralNumber)
}

// Validation of the pattern body is left to the JS engine.
fn lex_regex(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  // Consume slash.
  lexer.skip_expect(1);
  let mut in_charset = false;
  loop {
    match lexer.consume_next()? {
      '\\' => {
        // Cannot escape line terminator.
        let escaped_char = lexer.consume_next()?;
        if is_line_terminator(escaped_char) {
          return Ok(TT::Invalid);
        };
      }
      '/' if !in_charset => {
        break;
      }
      '[' => {
        in_charset = true;
      }
      ']' if in_charset => {
        in_charset = false;
      }
      c if is_line_terminator(c) => {
        return Ok(TT::Invalid);
      }
      _ => {}
    };
  }
  // Flags.
  while let Some(c) = lexer.peek_or_eof(0).filter(|c| is_id_continue(*c)) {
    lexer.skip_expect(c.len_utf8());
  }
  Ok(TT::LiteralRegex)
}

fn lex_string(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  let quote = lexer.consume_next()?;
  let mut invalid = false;
  loop {
    let m = lexer.while_not_3_chars(b'\\', b'\n', quote as u8);
    lexer.consume(m);
    match lexer.consume_next()? {
      '\\' => {
        // Escaped characters, including line continuations, are validated when decoding.
        let escaped = lexer.consume_next()?;
        if escaped == '\r' && lexer.peek_or_eof(0) == Some('\n') {
          lexer.skip_expect(1);
        };
      }
      '\n' => {
        invalid = true;
      }
      c if c == quote => break,
      _ => unreachable!(),
    };
  }
  if invalid {
    Ok(TT::Invalid)
  } else {
    Ok(TT::LiteralString)
  }
}

/// Ends with `${` or backtick.
fn lex_template_string_continue(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  loop {
    let m = lexer.while_not_3_chars(b'\\', b'`', b'$');
    lexer.consume(m);
    match lexer.consume_next()? {
      '\\' => {
        lexer.consume_next()?;
      }
      '`' => return Ok(TT::LiteralTemplatePartStringEnd),
      '$' => {
        if !lexer.consume(lexer.if_char('{')).is_empty() {
          return Ok(TT::LiteralTemplatePartString);
        };
      }
      _ => unreachable!(),
    };
  }
}

/// Skips whitespace and comments, returning whether a line terminator was crossed.
fn skip_insignificant(lexer: &mut Lexer<'_>) -> bool {
  let mut preceded_by_line_terminator = false;
  // Hashbang comments are only valid at the very start of the source.
  if lexer.next() == 0 && lexer.source.starts_with("#!") {
    lex_single_comment(lexer);
  };
  loop {
    let rest = &lexer.source[lexer.next..];
    if rest.starts_with("/*") {
      // Left in place so that lex_next can report it.
      let Some(contains_newline) = lex_multiline_comment(lexer) else {
        break;
      };
      preceded_by_line_terminator |= contains_newline;
      continue;
    };
    if rest.starts_with("//") {
      lex_single_comment(lexer);
      continue;
    };
    match rest.chars().next() {
      Some(c) if is_line_terminator(c) => {
        preceded_by_line_terminator = true;
        lexer.skip_expect(c.len_utf8());
      }
      Some(c) if is_whitespace(c) => {
        lexer.skip_expect(c.len_utf8());
      }
      _ => break,
    };
  }
  preceded_by_line_terminator
}

pub fn lex_next(lexer: &mut Lexer<'_>, mode: LexMode) -> Token {
  if mode == LexMode::TemplateStrContinue {
    return lexer.drive_fallible(false, lex_template_string_continue);
  };

  let preceded_by_line_terminator = skip_insignificant(lexer);

  // EOF is different from Invalid, so we should emit this specifically instead of letting drive_fallible return an Invalid.
  if lexer.at_end() {
    return Token {
      loc: Loc(lexer.end(), lexer.end()),
      typ: TT::EOF,
      preceded_by_line_terminator,
    };
  };

  lexer.drive_fallible(preceded_by_line_terminator, |lexer| {
    if lexer.source[lexer.next..].starts_with("/*") {
      // Unterminated comment.
      lexer.skip_expect(lexer.remaining());
      return Ok(TT::Invalid);
    };
    let c = lexer.peek(0)?;
    if c == '\\' || is_id_start(c) {
      return lex_identifier(lexer);
    };
    let (tt, mut mat) = SIG.find(lexer)?;
    match tt {
      TT::LiteralNumber => lex_bigint_or_number(lexer),
      TT::LiteralNumberBin => lex_radix_bigint_or_number(lexer, &DIGIT_BIN),
      TT::LiteralNumberHex => lex_radix_bigint_or_number(lexer, &DIGIT_HEX),
      TT::LiteralNumberOct => lex_radix_bigint_or_number(lexer, &DIGIT_OCT),
      TT::LiteralString => lex_string(lexer),
      TT::LiteralTemplatePartString => {
        // Consume backtick.
        lexer.skip_expect(1);
        lex_template_string_continue(lexer)
      }
      TT::Slash | TT::SlashEquals if mode == LexMode::SlashIsRegex => lex_regex(lexer),
      TT::Hash => lex_private_member(lexer),
      // Decorators are outside the supported syntax.
      TT::At => {
        lexer.consume(mat);
        Ok(TT::Invalid)
      }
      typ => {
        if typ == TT::Question && mat.len() != 1 {
          // We've matched `?.[0-9]`.
          mat = mat.prefix(1);
        };
        lexer.consume(mat);
        Ok(typ)
      }
    }
  })
}
