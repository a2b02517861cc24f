use crate::ast::node::Node;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::lex_next;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;
use crate::token::UNRESERVED_KEYWORDS;
use crate::TopLevelMode;
use derive_visitor::Drive;
use derive_visitor::DriveMut;

pub mod class_or_object;
pub mod expr;
pub mod func;
pub mod import_export;
pub mod operator;
pub mod stmt;
#[cfg(test)]
mod tests;
pub mod toplevel;

#[derive(Clone, Copy, Debug)]
pub struct ParsePatternRules {
  // `await` can be used as an identifier; false inside async functions and at the top level of modules.
  pub await_allowed: bool,
  // `yield` can be used as an identifier; false inside generators.
  pub yield_allowed: bool,
}

impl ParsePatternRules {
  pub fn is_valid_pattern_identifier(&self, typ: TT) -> bool {
    match typ {
      TT::Identifier => true,
      TT::KeywordAwait => self.await_allowed,
      TT::KeywordYield => self.yield_allowed,
      t => UNRESERVED_KEYWORDS.contains(&t),
    }
  }
}

// Passed by value into every parse_* method; altered copies are made with the with_* methods instead of mutating.
#[derive(Clone, Copy, Debug)]
pub struct ParseCtx {
  pub rules: ParsePatternRules,
}

impl ParseCtx {
  pub fn with_rules(&self, rules: ParsePatternRules) -> ParseCtx {
    ParseCtx { rules, ..*self }
  }

  /// Context for the parameters and body of a non-arrow function.
  pub fn for_function(&self, async_: bool, generator: bool) -> ParseCtx {
    self.with_rules(ParsePatternRules {
      await_allowed: !async_,
      yield_allowed: !generator,
    })
  }
}

#[derive(Debug)]
#[must_use]
pub struct MaybeToken {
  typ: TT,
  loc: Loc,
  matched: bool,
}

impl MaybeToken {
  pub fn is_match(&self) -> bool {
    self.matched
  }

  pub fn match_loc(&self) -> Option<Loc> {
    if self.matched {
      Some(self.loc)
    } else {
      None
    }
  }

  pub fn error(&self, err: SyntaxErrorType) -> SyntaxError {
    debug_assert!(!self.matched);
    self.loc.error(err, Some(self.typ))
  }

  pub fn and_then<R, F: FnOnce() -> SyntaxResult<R>>(self, f: F) -> SyntaxResult<Option<R>> {
    Ok(if self.matched { Some(f()?) } else { None })
  }
}

pub struct ParserCheckpoint {
  next_tok_i: usize,
}

/// To get the lexer's `next` after this token was lexed, use `token.loc.1`.
struct BufferedToken {
  token: Token,
  lex_mode: LexMode,
}

pub struct Parser<'a> {
  lexer: Lexer<'a>,
  buf: Vec<BufferedToken>,
  next_tok_i: usize,
  top_level_mode: TopLevelMode,
}

// Parsing methods are spread across the submodules as `impl Parser` blocks rather than free functions taking `&mut Parser`.
impl<'a> Parser<'a> {
  pub fn new(lexer: Lexer<'a>, top_level_mode: TopLevelMode) -> Parser<'a> {
    Parser {
      lexer,
      buf: Vec::new(),
      next_tok_i: 0,
      top_level_mode,
    }
  }

  pub fn top_level_mode(&self) -> TopLevelMode {
    self.top_level_mode
  }

  pub fn source_range(&self) -> Loc {
    Loc(0, self.lexer.source().len())
  }

  pub fn str(&self, loc: Loc) -> &'a str {
    &self.lexer.source()[loc.0..loc.1]
  }

  pub fn string(&self, loc: Loc) -> String {
    self.str(loc).to_string()
  }

  pub fn checkpoint(&self) -> ParserCheckpoint {
    ParserCheckpoint {
      next_tok_i: self.next_tok_i,
    }
  }

  pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
    self.next_tok_i = checkpoint.next_tok_i;
  }

  /// Location spanning every token consumed since `checkpoint`.
  pub fn since_checkpoint(&self, checkpoint: &ParserCheckpoint) -> Loc {
    let start_i = checkpoint.next_tok_i;
    if self.next_tok_i > start_i {
      Loc(
        self.buf[start_i].token.loc.0,
        self.buf[self.next_tok_i - 1].token.loc.1,
      )
    } else {
      let at = start_i
        .checked_sub(1)
        .and_then(|i| self.buf.get(i))
        .map_or(0, |t| t.token.loc.1);
      Loc(at, at)
    }
  }

  /// Location of the most recently consumed token.
  pub fn last_consumed_loc(&self) -> Loc {
    self
      .next_tok_i
      .checked_sub(1)
      .and_then(|i| self.buf.get(i))
      .map_or(Loc(0, 0), |t| t.token.loc)
  }

  /// Runs `f` and wraps its result in a node spanning the tokens it consumed.
  pub fn with_loc<S: Drive + DriveMut, F: FnOnce(&mut Self) -> SyntaxResult<S>>(
    &mut self,
    f: F,
  ) -> SyntaxResult<Node<S>> {
    let cp = self.checkpoint();
    let stx = f(self)?;
    Ok(Node::new(self.since_checkpoint(&cp), stx))
  }

  /// Runs `f`, rewinding to the current position if it fails or declines by returning `None`.
  pub fn rewindable<T, F: FnOnce(&mut Self) -> SyntaxResult<Option<T>>>(
    &mut self,
    f: F,
  ) -> Option<T> {
    let cp = self.checkpoint();
    match f(self) {
      Ok(Some(v)) => Some(v),
      Ok(None) | Err(_) => {
        self.restore_checkpoint(cp);
        None
      }
    }
  }

  fn reset_to(&mut self, n: usize) {
    self.next_tok_i = n;
    self.buf.truncate(n);
    match self.buf.last() {
      Some(t) => self.lexer.set_next(t.token.loc.1),
      None => self.lexer.set_next(0),
    };
  }

  fn forward<K: FnOnce(&Token) -> bool>(&mut self, mode: LexMode, keep: K) -> (bool, Token) {
    if self
      .buf
      .get(self.next_tok_i)
      .is_some_and(|t| t.lex_mode != mode)
    {
      self.reset_to(self.next_tok_i);
    };
    if self.buf.len() == self.next_tok_i {
      let token = lex_next(&mut self.lexer, mode);
      self.buf.push(BufferedToken {
        token,
        lex_mode: mode,
      });
    };
    let t = self.buf[self.next_tok_i].token.clone();
    let k = keep(&t);
    if k {
      self.next_tok_i += 1;
    };
    (k, t)
  }

  pub fn consume_with_mode(&mut self, mode: LexMode) -> Token {
    self.forward(mode, |_| true).1
  }

  pub fn consume(&mut self) -> Token {
    self.consume_with_mode(LexMode::Standard)
  }

  pub fn peek_with_mode(&mut self, mode: LexMode) -> Token {
    self.forward(mode, |_| false).1
  }

  pub fn peek(&mut self) -> Token {
    self.peek_with_mode(LexMode::Standard)
  }

  pub fn peek_2(&mut self) -> (Token, Token) {
    let cp = self.checkpoint();
    let a = self.forward(LexMode::Standard, |_| true);
    let b = self.forward(LexMode::Standard, |_| true);
    self.restore_checkpoint(cp);
    (a.1, b.1)
  }

  pub fn peek_3(&mut self) -> (Token, Token, Token) {
    let cp = self.checkpoint();
    let a = self.forward(LexMode::Standard, |_| true);
    let b = self.forward(LexMode::Standard, |_| true);
    let c = self.forward(LexMode::Standard, |_| true);
    self.restore_checkpoint(cp);
    (a.1, b.1, c.1)
  }

  pub fn consume_if(&mut self, typ: TT) -> MaybeToken {
    let (matched, t) = self.forward(LexMode::Standard, |t| t.typ == typ);
    MaybeToken {
      typ,
      matched,
      loc: t.loc,
    }
  }

  pub fn require_with_mode(&mut self, typ: TT, mode: LexMode) -> SyntaxResult<Token> {
    let t = self.consume_with_mode(mode);
    if t.typ != typ {
      Err(self.unexpected(&t, SyntaxErrorType::RequiredTokenNotFound(typ)))
    } else {
      Ok(t)
    }
  }

  pub fn require(&mut self, typ: TT) -> SyntaxResult<Token> {
    self.require_with_mode(typ, LexMode::Standard)
  }

  pub fn require_identifier(&mut self, ctx: ParseCtx) -> SyntaxResult<Token> {
    let t = self.consume();
    if !ctx.rules.is_valid_pattern_identifier(t.typ) {
      return Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("identifier")));
    };
    Ok(t)
  }

  /// Consumes a `;`, or accepts its automatic insertion before a line break, `}` or the end of input.
  pub fn require_semicolon_or_asi(&mut self) -> SyntaxResult<()> {
    let t = self.peek();
    match t.typ {
      TT::Semicolon => {
        self.consume();
        Ok(())
      }
      TT::BraceClose | TT::EOF => Ok(()),
      _ if t.preceded_by_line_terminator => Ok(()),
      _ => Err(self.unexpected(&t, SyntaxErrorType::RequiredTokenNotFound(TT::Semicolon))),
    }
  }

  /// Builds the error for an unexpected token, preferring a precise error for tokens the lexer rejected.
  pub fn unexpected(&self, t: &Token, fallback: SyntaxErrorType) -> SyntaxError {
    let typ = match t.typ {
      TT::EOF => SyntaxErrorType::UnexpectedEnd,
      TT::Invalid => {
        let raw = self.str(t.loc);
        if raw.starts_with("/*") {
          return t.loc.error(SyntaxErrorType::UnterminatedComment, Some(t.typ));
        };
        match raw.chars().next() {
          Some('"' | '\'') => SyntaxErrorType::LineTerminatorInString,
          Some('/') => SyntaxErrorType::LineTerminatorInRegex,
          Some(c) if c.is_ascii_digit() || c == '.' => SyntaxErrorType::MalformedLiteralNumber,
          Some('#') => SyntaxErrorType::ExpectedSyntax("private name"),
          Some('@') => SyntaxErrorType::UnsupportedSyntax("decorators"),
          Some('\\') => SyntaxErrorType::InvalidCharacterEscape,
          _ => fallback,
        }
      }
      _ => fallback,
    };
    t.loc.error(typ, Some(t.typ))
  }
}
