use crate::loc::Loc;
use crate::token::TT;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Formatter;
use std::error::Error;
use std::fmt::Display;

/// A stable classification of syntax errors produced by the parser.
///
/// Diagnostic codes (prefix `PS`) are assigned per variant and are stable:
/// - `PS0001`: [`SyntaxErrorType::ExpectedNotFound`]
/// - `PS0002`: [`SyntaxErrorType::ExpectedSyntax`]
/// - `PS0003`: [`SyntaxErrorType::InvalidCharacterEscape`]
/// - `PS0004`: [`SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters`]
/// - `PS0005`: [`SyntaxErrorType::LineTerminatorAfterThrow`]
/// - `PS0006`: [`SyntaxErrorType::LineTerminatorInRegex`]
/// - `PS0007`: [`SyntaxErrorType::LineTerminatorInString`]
/// - `PS0008`: [`SyntaxErrorType::MalformedLiteralBigInt`]
/// - `PS0009`: [`SyntaxErrorType::MalformedLiteralNumber`]
/// - `PS0010`: [`SyntaxErrorType::RequiredTokenNotFound`]
/// - `PS0011`: [`SyntaxErrorType::TryStatementHasNoCatchOrFinally`]
/// - `PS0012`: [`SyntaxErrorType::UnexpectedEnd`]
/// - `PS0013`: [`SyntaxErrorType::UnsupportedSyntax`]
/// - `PS0014`: [`SyntaxErrorType::ModuleSyntaxInScript`]
/// - `PS0015`: [`SyntaxErrorType::UnterminatedComment`]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
  ExpectedNotFound,
  ExpectedSyntax(&'static str),
  InvalidCharacterEscape,
  LineTerminatorAfterArrowFunctionParameters,
  LineTerminatorAfterThrow,
  LineTerminatorInRegex,
  LineTerminatorInString,
  MalformedLiteralBigInt,
  MalformedLiteralNumber,
  RequiredTokenNotFound(TT),
  TryStatementHasNoCatchOrFinally,
  UnexpectedEnd,
  // `with`, decorators and similar constructs this parser deliberately rejects.
  UnsupportedSyntax(&'static str),
  ModuleSyntaxInScript,
  UnterminatedComment,
}

#[derive(Clone)]
pub struct SyntaxError {
  pub typ: SyntaxErrorType,
  pub loc: Loc,
  pub actual_token: Option<TT>,
}

impl SyntaxError {
  pub fn new(typ: SyntaxErrorType, loc: Loc, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError {
      typ,
      loc,
      actual_token,
    }
  }

  pub fn code(&self) -> &'static str {
    self.typ.code()
  }

  pub fn message(&self) -> String {
    self.typ.message(self.actual_token)
  }
}

impl Debug for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{} around loc [{}:{}]", self, self.loc.0, self.loc.1)
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.code(), self.message())?;
    if let Some(tok) = self.actual_token {
      write!(f, " [token={:?}]", tok)?;
    };
    Ok(())
  }
}

impl Error for SyntaxError {}

impl PartialEq for SyntaxError {
  fn eq(&self, other: &Self) -> bool {
    self.typ == other.typ
  }
}

impl Eq for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

impl SyntaxErrorType {
  /// Stable diagnostic code for this syntax error variant.
  pub fn code(&self) -> &'static str {
    match self {
      SyntaxErrorType::ExpectedNotFound => "PS0001",
      SyntaxErrorType::ExpectedSyntax(_) => "PS0002",
      SyntaxErrorType::InvalidCharacterEscape => "PS0003",
      SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters => "PS0004",
      SyntaxErrorType::LineTerminatorAfterThrow => "PS0005",
      SyntaxErrorType::LineTerminatorInRegex => "PS0006",
      SyntaxErrorType::LineTerminatorInString => "PS0007",
      SyntaxErrorType::MalformedLiteralBigInt => "PS0008",
      SyntaxErrorType::MalformedLiteralNumber => "PS0009",
      SyntaxErrorType::RequiredTokenNotFound(_) => "PS0010",
      SyntaxErrorType::TryStatementHasNoCatchOrFinally => "PS0011",
      SyntaxErrorType::UnexpectedEnd => "PS0012",
      SyntaxErrorType::UnsupportedSyntax(_) => "PS0013",
      SyntaxErrorType::ModuleSyntaxInScript => "PS0014",
      SyntaxErrorType::UnterminatedComment => "PS0015",
    }
  }

  /// Human-readable message describing this syntax error.
  pub fn message(&self, actual_token: Option<TT>) -> String {
    match self {
      SyntaxErrorType::ExpectedNotFound => "expected token not found".into(),
      SyntaxErrorType::ExpectedSyntax(expected) => format!("expected {}", expected),
      SyntaxErrorType::InvalidCharacterEscape => "invalid character escape".into(),
      SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters => {
        "line terminator not allowed after arrow function parameters".into()
      }
      SyntaxErrorType::LineTerminatorAfterThrow => {
        "line terminator not allowed after `throw`".into()
      }
      SyntaxErrorType::LineTerminatorInRegex => {
        "line terminator not allowed in regular expression".into()
      }
      SyntaxErrorType::LineTerminatorInString => {
        "line terminator not allowed in string literal".into()
      }
      SyntaxErrorType::MalformedLiteralBigInt => "malformed bigint literal".into(),
      SyntaxErrorType::MalformedLiteralNumber => "malformed number literal".into(),
      SyntaxErrorType::RequiredTokenNotFound(token) => format!("expected token {:?}", token),
      SyntaxErrorType::TryStatementHasNoCatchOrFinally => {
        "try statement requires a catch or finally block".into()
      }
      SyntaxErrorType::UnexpectedEnd => actual_token
        .map(|tok| format!("unexpected end before {:?}", tok))
        .unwrap_or_else(|| "unexpected end of input".into()),
      SyntaxErrorType::UnsupportedSyntax(what) => format!("{} are not supported", what),
      SyntaxErrorType::ModuleSyntaxInScript => {
        "import and export declarations are only allowed in modules".into()
      }
      SyntaxErrorType::UnterminatedComment => "unterminated comment".into(),
    }
  }
}
