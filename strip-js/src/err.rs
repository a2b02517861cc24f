use emit_js::EmitError;
use parse_js::error::SyntaxError;
use parse_js::loc::Loc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StripError {
  #[error("syntax error: {0}")]
  Syntax(SyntaxError),
  #[error("emit error: {0}")]
  Emit(EmitError),
}

impl StripError {
  /// Where in the source the error applies, if known.
  pub fn loc(&self) -> Option<Loc> {
    match self {
      StripError::Syntax(err) => Some(err.loc),
      StripError::Emit(err) => err.loc,
    }
  }

  /// Stable code for tooling, e.g. `PS0003` or `EMIT`.
  pub fn code(&self) -> &'static str {
    match self {
      StripError::Syntax(err) => err.code(),
      StripError::Emit(_) => "EMIT",
    }
  }
}
