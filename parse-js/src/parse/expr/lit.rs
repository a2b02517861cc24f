use super::super::ParseCtx;
use super::super::Parser;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::lit::LitArrExpr;
use crate::ast::expr::lit::LitBigIntExpr;
use crate::ast::expr::lit::LitBoolExpr;
use crate::ast::expr::lit::LitNullExpr;
use crate::ast::expr::lit::LitNumExpr;
use crate::ast::expr::lit::LitRegexExpr;
use crate::ast::expr::lit::LitStrExpr;
use crate::ast::expr::lit::LitTemplateExpr;
use crate::ast::expr::lit::LitTemplatePart;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::char::is_line_terminator;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::loc::Loc;
use crate::num::JsNumber;
use crate::token::TT;

/// Parses the source text of a number literal, including radix prefixes and separators.
pub fn normalise_literal_number(raw: &str) -> Option<JsNumber> {
  let raw = raw.replace('_', "");
  let radix = match raw.get(..2) {
    Some("0b" | "0B") => Some(2),
    Some("0o" | "0O") => Some(8),
    Some("0x" | "0X") => Some(16),
    // Legacy octal like `0777`; `08` and `09` fall back to decimal.
    _ if raw.len() > 1
      && raw.starts_with('0')
      && raw.bytes().all(|b| (b'0'..=b'7').contains(&b)) =>
    {
      return fold_radix(&raw[1..], 8);
    }
    _ => None,
  };
  match radix {
    Some(radix) => fold_radix(&raw[2..], radix),
    None => raw.parse::<f64>().ok().map(JsNumber),
  }
}

// Digits beyond the precision of f64 are rounded, matching how engines treat large literals.
fn fold_radix(digits: &str, radix: u32) -> Option<JsNumber> {
  if digits.is_empty() {
    return None;
  };
  let mut value = 0f64;
  for c in digits.chars() {
    value = value * radix as f64 + c.to_digit(radix)? as f64;
  }
  Some(JsNumber(value))
}

fn hex_value(raw: &str) -> Option<u32> {
  if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
    return None;
  };
  u32::from_str_radix(raw, 16).ok()
}

/// Decodes the escape sequences within the body of a string literal (without quotes).
pub fn normalise_literal_string(raw: &str) -> Option<String> {
  let mut out = String::with_capacity(raw.len());
  // A high surrogate from a `\u` escape waiting for its low half.
  let mut pending_high: Option<u32> = None;
  let mut rest = raw;
  while let Some(c) = rest.chars().next() {
    if c != '\\' {
      if pending_high.take().is_some() {
        out.push(char::REPLACEMENT_CHARACTER);
      };
      out.push(c);
      rest = &rest[c.len_utf8()..];
      continue;
    };
    rest = &rest[1..];
    let esc = rest.chars().next()?;
    rest = &rest[esc.len_utf8()..];
    let code_unit = match esc {
      'u' => {
        let (value, len) = if let Some(braced) = rest.strip_prefix('{') {
          let end = braced.find('}')?;
          let value = hex_value(&braced[..end])?;
          if value > 0x10FFFF {
            return None;
          };
          (value, end + 2)
        } else {
          (hex_value(rest.get(..4)?)?, 4)
        };
        rest = &rest[len..];
        Some(value)
      }
      'x' => {
        let value = hex_value(rest.get(..2)?)?;
        rest = &rest[2..];
        Some(value)
      }
      _ => None,
    };
    if let Some(unit) = code_unit {
      match (pending_high.take(), unit) {
        (Some(high), 0xDC00..=0xDFFF) => {
          let cp = 0x10000 + ((high - 0xD800) << 10) + (unit - 0xDC00);
          out.push(char::from_u32(cp)?);
        }
        (prev, 0xD800..=0xDBFF) => {
          if prev.is_some() {
            out.push(char::REPLACEMENT_CHARACTER);
          };
          pending_high = Some(unit);
        }
        (prev, unit) => {
          if prev.is_some() {
            out.push(char::REPLACEMENT_CHARACTER);
          };
          out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
      };
      continue;
    };
    if pending_high.take().is_some() {
      out.push(char::REPLACEMENT_CHARACTER);
    };
    match esc {
      'b' => out.push('\x08'),
      'f' => out.push('\x0c'),
      'n' => out.push('\n'),
      'r' => out.push('\r'),
      't' => out.push('\t'),
      'v' => out.push('\x0b'),
      '0'..='7' => {
        let mut value = esc as u32 - '0' as u32;
        // At most three digits, and only while the value stays within a byte.
        let max_len = if esc <= '3' { 2 } else { 1 };
        let extra = rest
          .bytes()
          .take(max_len)
          .take_while(|b| (b'0'..=b'7').contains(b))
          .count();
        for b in rest[..extra].bytes() {
          value = value * 8 + (b - b'0') as u32;
        }
        rest = &rest[extra..];
        out.push(char::from_u32(value)?);
      }
      '8' | '9' => out.push(esc),
      // Line continuation.
      '\r' => {
        if let Some(r) = rest.strip_prefix('\n') {
          rest = r;
        };
      }
      c if is_line_terminator(c) => {}
      c => out.push(c),
    };
  }
  if pending_high.is_some() {
    out.push(char::REPLACEMENT_CHARACTER);
  };
  Some(out)
}

impl<'a> Parser<'a> {
  pub fn lit_arr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let node = self.with_loc(|p| {
      p.require(TT::BracketOpen)?;
      let mut elements = Vec::new();
      loop {
        if p.consume_if(TT::BracketClose).is_match() {
          break;
        };
        if p.consume_if(TT::Comma).is_match() {
          elements.push(LitArrElem::Empty);
          continue;
        };
        let spread = p.consume_if(TT::DotDotDot).is_match();
        let value = p.expr_assign(ctx, &[TT::Comma, TT::BracketClose])?;
        elements.push(if spread {
          LitArrElem::Spread(value)
        } else {
          LitArrElem::Single(value)
        });
        if !p.consume_if(TT::Comma).is_match() {
          p.require(TT::BracketClose)?;
          break;
        };
      }
      Ok(LitArrExpr { elements })
    })?;
    Ok(node.into_wrapped())
  }

  pub fn lit_bigint(&mut self) -> SyntaxResult<Node<Expr>> {
    let t = self.require(TT::LiteralBigInt)?;
    let raw = self.str(t.loc);
    let value = raw
      .strip_suffix('n')
      .filter(|digits| !digits.is_empty())
      .ok_or_else(|| t.error(SyntaxErrorType::MalformedLiteralBigInt))?
      .to_string();
    Ok(Node::new(t.loc, LitBigIntExpr { value }).into_wrapped())
  }

  pub fn lit_bool(&mut self) -> SyntaxResult<Node<Expr>> {
    let t = self.consume();
    let value = match t.typ {
      TT::LiteralTrue => true,
      TT::LiteralFalse => false,
      _ => return Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("boolean"))),
    };
    Ok(Node::new(t.loc, LitBoolExpr { value }).into_wrapped())
  }

  pub fn lit_null(&mut self) -> SyntaxResult<Node<Expr>> {
    let t = self.require(TT::LiteralNull)?;
    Ok(Node::new(t.loc, LitNullExpr {}).into_wrapped())
  }

  pub fn lit_num(&mut self) -> SyntaxResult<Node<Expr>> {
    let t = self.require(TT::LiteralNumber)?;
    let value = normalise_literal_number(self.str(t.loc))
      .ok_or_else(|| t.error(SyntaxErrorType::MalformedLiteralNumber))?;
    Ok(Node::new(t.loc, LitNumExpr { value }).into_wrapped())
  }

  pub fn lit_regex(&mut self) -> SyntaxResult<Node<Expr>> {
    let t = self.require_with_mode(TT::LiteralRegex, LexMode::SlashIsRegex)?;
    Ok(
      Node::new(t.loc, LitRegexExpr {
        value: self.string(t.loc),
      })
      .into_wrapped(),
    )
  }

  /// Decoded value of the string literal at `loc`, which must include its quotes.
  pub fn lit_str_val_at(&self, loc: Loc) -> SyntaxResult<String> {
    let raw = self.str(loc);
    normalise_literal_string(&raw[1..raw.len() - 1])
      .ok_or_else(|| loc.error(SyntaxErrorType::InvalidCharacterEscape, Some(TT::LiteralString)))
  }

  pub fn lit_str_val(&mut self) -> SyntaxResult<String> {
    let t = self.require(TT::LiteralString)?;
    self.lit_str_val_at(t.loc)
  }

  pub fn lit_str(&mut self) -> SyntaxResult<Node<Expr>> {
    let node = self.with_loc(|p| {
      let value = p.lit_str_val()?;
      Ok(LitStrExpr { value })
    })?;
    Ok(node.into_wrapped())
  }

  /// Parses a template starting at its opening backtick. String parts keep their raw source text.
  pub fn lit_template_parts(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<LitTemplatePart>> {
    let t = self.consume();
    let mut parts = Vec::new();
    let mut t = match t.typ {
      TT::LiteralTemplatePartString | TT::LiteralTemplatePartStringEnd => t,
      _ => return Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("template"))),
    };
    // Skip the opening backtick; continuation parts start right after the `}`.
    let mut start_offset = 1;
    loop {
      let raw = self.str(t.loc);
      match t.typ {
        TT::LiteralTemplatePartStringEnd => {
          parts.push(LitTemplatePart::String(
            raw[start_offset..raw.len() - 1].to_string(),
          ));
          break;
        }
        TT::LiteralTemplatePartString => {
          parts.push(LitTemplatePart::String(
            raw[start_offset..raw.len() - 2].to_string(),
          ));
          let substitution = self.expr(ctx, &[TT::BraceClose])?;
          parts.push(LitTemplatePart::Substitution(substitution));
          self.require(TT::BraceClose)?;
          t = self.consume_with_mode(LexMode::TemplateStrContinue);
          start_offset = 0;
        }
        _ => return Err(self.unexpected(&t, SyntaxErrorType::UnexpectedEnd)),
      };
    }
    Ok(parts)
  }

  pub fn lit_template(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let node = self.with_loc(|p| {
      let parts = p.lit_template_parts(ctx)?;
      Ok(LitTemplateExpr { parts })
    })?;
    Ok(node.into_wrapped())
  }
}
