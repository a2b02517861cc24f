use crate::lex::lex_next;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::token::TT;
use crate::token::TT::*;

fn check<const N: usize>(code: &str, expecteds: [TT; N]) {
  let mut lexer = Lexer::new(code);
  for expected in expecteds {
    let t = lex_next(&mut lexer, LexMode::Standard);
    assert_eq!(t.typ, expected, "in {:?}", code);
  }
  let t = lex_next(&mut lexer, LexMode::Standard);
  assert_eq!(EOF, t.typ);
}

#[test]
fn test_lex_keywords() {
  check("if", [KeywordIf]);
  check("instanceof", [KeywordInstanceof]);
  check("iffy", [Identifier]);
  check("\\u0069f", [Identifier]);
}

#[test]
fn test_lex_identifiers() {
  check("h929", [Identifier]);
  check("$module _hot", [Identifier, Identifier]);
  check("ünïcode", [Identifier]);
}

#[test]
fn test_lex_literal_numbers() {
  check("1", [LiteralNumber]);
  check("929", [LiteralNumber]);
  check(".929", [LiteralNumber]);
  check("1_000.5e-3", [LiteralNumber]);
  check(". 929", [Dot, LiteralNumber]);
  check("?.929", [Question, LiteralNumber]);
  check("?..929", [QuestionDot, LiteralNumber]);
  check("0xff 0o17 0b10", [LiteralNumber, LiteralNumber, LiteralNumber]);
  check("10n 0x1fn", [LiteralBigInt, LiteralBigInt]);
  check("1e", [Invalid]);
}

#[test]
fn test_lex_literal_strings() {
  check("'hello world'", [LiteralString]);
  check(r#""it's \"quoted\"""#, [LiteralString]);
  check("'line\\\ncontinued'", [LiteralString]);
  check("'hello world\n'", [Invalid]);
}

#[test]
fn test_lex_comments_and_line_terminators() {
  let mut lexer = Lexer::new("a /* x */ b // c\n/* d\n */ c");
  let a = lex_next(&mut lexer, LexMode::Standard);
  let b = lex_next(&mut lexer, LexMode::Standard);
  let c = lex_next(&mut lexer, LexMode::Standard);
  assert_eq!((a.typ, a.preceded_by_line_terminator), (Identifier, false));
  assert_eq!((b.typ, b.preceded_by_line_terminator), (Identifier, false));
  assert_eq!((c.typ, c.preceded_by_line_terminator), (Identifier, true));
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, EOF);
}

#[test]
fn test_lex_hashbang() {
  check("#!/usr/bin/env node\nx", [Identifier]);
}

#[test]
fn test_lex_regex_depends_on_mode() {
  let mut lexer = Lexer::new("/a[/]b/gi");
  let t = lex_next(&mut lexer, LexMode::SlashIsRegex);
  assert_eq!(t.typ, LiteralRegex);
  assert_eq!(&lexer[t.loc], "/a[/]b/gi");

  let mut lexer = Lexer::new("/a/");
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, Slash);
}

#[test]
fn test_lex_template_parts() {
  let mut lexer = Lexer::new("`a${b}c`");
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, LiteralTemplatePartString);
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, Identifier);
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, BraceClose);
  let end = lex_next(&mut lexer, LexMode::TemplateStrContinue);
  assert_eq!(end.typ, LiteralTemplatePartStringEnd);
  assert_eq!(&lexer[end.loc], "c`");
}

#[test]
fn test_lex_operators() {
  check(
    "a ??= b?.c >>>= d",
    [
      Identifier,
      QuestionQuestionEquals,
      Identifier,
      QuestionDot,
      Identifier,
      ChevronRightChevronRightChevronRightEquals,
      Identifier,
    ],
  );
  check("@x", [Invalid, Identifier]);
}

#[test]
fn test_lex_private_members() {
  check("#count", [PrivateMember]);
  check("this.#count", [KeywordThis, Dot, PrivateMember]);
  check("#x in y", [PrivateMember, KeywordIn, Identifier]);
  check("# x", [Invalid, Identifier]);
}

#[test]
fn test_lex_unterminated_comment() {
  let mut lexer = Lexer::new("a /* never closed\n b");
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, Identifier);
  let t = lex_next(&mut lexer, LexMode::Standard);
  assert_eq!(t.typ, Invalid);
  assert_eq!(&lexer[t.loc], "/* never closed\n b");
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, EOF);

  check("/*", [Invalid]);
  check("/**/", []);
}
