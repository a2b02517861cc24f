use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::token::TT;
use serde::Serialize;
use std::cmp::max;
use std::cmp::min;
use std::ops::Add;
use std::ops::AddAssign;

/// A location within the current source file expressed as UTF-8 byte offsets.
/// Serializes as `[start, end]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn error(self, typ: SyntaxErrorType, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError::new(typ, self, actual_token)
  }

  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = min(self.0, other.0);
    self.1 = max(self.1, other.1);
  }

  pub fn add_option(self, rhs: Option<Loc>) -> Loc {
    let mut new = self;
    if let Some(rhs) = rhs {
      new.extend(rhs);
    };
    new
  }

  /// One-based line and column of the start offset, with columns counted in chars.
  /// Offsets past the end of `source` clamp to the last position.
  pub fn line_col(&self, source: &str) -> (usize, usize) {
    let mut end = min(self.0, source.len());
    while !source.is_char_boundary(end) {
      end -= 1;
    }
    let before = &source[..end];
    let line = memchr::memchr_iter(b'\n', before.as_bytes()).count() + 1;
    let line_start = memchr::memrchr(b'\n', before.as_bytes()).map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
  }
}

impl Add for Loc {
  type Output = Loc;

  fn add(self, rhs: Self) -> Self::Output {
    let mut new = self;
    new.extend(rhs);
    new
  }
}

impl AddAssign for Loc {
  fn add_assign(&mut self, rhs: Self) {
    self.extend(rhs);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn adding_locs_covers_both() {
    assert_eq!(Loc(4, 10) + Loc(2, 6), Loc(2, 10));
    assert_eq!(Loc(4, 10).add_option(None), Loc(4, 10));
    assert_eq!(Loc(4, 10).add_option(Some(Loc(9, 20))), Loc(4, 20));
  }

  #[test]
  fn line_col_counts_from_one() {
    let src = "a;\nif (x) {\n  ü.y;\n}";
    assert_eq!(Loc(0, 1).line_col(src), (1, 1));
    assert_eq!(Loc(3, 5).line_col(src), (2, 1));
    let dot = src.find(".y").unwrap();
    assert_eq!(Loc(dot, dot + 1).line_col(src), (3, 4));
    assert_eq!(Loc(1000, 1000).line_col(src), (4, 2));
  }
}
