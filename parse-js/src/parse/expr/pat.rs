use super::super::ParseCtx;
use super::super::Parser;
use crate::ast::class_or_object::ObjKey;
use crate::ast::expr::pat::ArrPat;
use crate::ast::expr::pat::ArrPatElem;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::pat::ObjPat;
use crate::ast::expr::pat::ObjPatProp;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn id_pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<IdPat>> {
    self.with_loc(|p| {
      let t = p.require_identifier(ctx)?;
      Ok(IdPat {
        name: p.string(t.loc),
      })
    })
  }

  /// Default value after `=`, if present.
  fn pat_default(&mut self, ctx: ParseCtx, terminators: &[TT]) -> SyntaxResult<Option<Node<Expr>>> {
    self
      .consume_if(TT::Equals)
      .and_then(|| self.expr_assign(ctx, terminators))
  }

  /// A binding pattern as found in declarations, parameters and catch clauses.
  pub fn pat_decl(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Pat>> {
    let t = self.peek();
    match t.typ {
      TT::BracketOpen => Ok(self.arr_pat(ctx)?.into_wrapped()),
      TT::BraceOpen => Ok(self.obj_pat(ctx)?.into_wrapped()),
      typ if ctx.rules.is_valid_pattern_identifier(typ) => Ok(self.id_pat(ctx)?.into_wrapped()),
      _ => Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("pattern"))),
    }
  }

  fn arr_pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ArrPat>> {
    self.with_loc(|p| {
      p.require(TT::BracketOpen)?;
      let mut elements = Vec::new();
      let mut rest = None;
      loop {
        if p.consume_if(TT::BracketClose).is_match() {
          break;
        };
        if p.consume_if(TT::Comma).is_match() {
          elements.push(None);
          continue;
        };
        if p.consume_if(TT::DotDotDot).is_match() {
          rest = Some(p.pat_decl(ctx)?);
          p.require(TT::BracketClose)?;
          break;
        };
        let target = p.pat_decl(ctx)?;
        let default_value = p.pat_default(ctx, &[TT::Comma, TT::BracketClose])?;
        elements.push(Some(ArrPatElem {
          target,
          default_value,
        }));
        if !p.consume_if(TT::Comma).is_match() {
          p.require(TT::BracketClose)?;
          break;
        };
      }
      Ok(ArrPat { elements, rest })
    })
  }

  fn obj_pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ObjPat>> {
    self.with_loc(|p| {
      p.require(TT::BraceOpen)?;
      let mut properties = Vec::new();
      let mut rest = None;
      loop {
        if p.consume_if(TT::BraceClose).is_match() {
          break;
        };
        if p.consume_if(TT::DotDotDot).is_match() {
          rest = Some(p.id_pat(ctx)?);
          p.require(TT::BraceClose)?;
          break;
        };
        let prop = p.with_loc(|p| {
          let key_tok = p.peek();
          let key = p.obj_key(ctx)?;
          let (target, shorthand) = if p.consume_if(TT::Colon).is_match() {
            (p.pat_decl(ctx)?, false)
          } else {
            // Shorthand: the key itself is the binding.
            let ObjKey::Direct(name) = &key else {
              return Err(p.unexpected(&key_tok, SyntaxErrorType::ExpectedSyntax("identifier")));
            };
            if !ctx.rules.is_valid_pattern_identifier(key_tok.typ) {
              return Err(p.unexpected(&key_tok, SyntaxErrorType::ExpectedSyntax("identifier")));
            };
            let target = Node::new(key_tok.loc, IdPat { name: name.clone() }).into_wrapped();
            (target, true)
          };
          let default_value = p.pat_default(ctx, &[TT::Comma, TT::BraceClose])?;
          Ok(ObjPatProp {
            key,
            target,
            shorthand,
            default_value,
          })
        })?;
        properties.push(prop);
        if !p.consume_if(TT::Comma).is_match() {
          p.require(TT::BraceClose)?;
          break;
        };
      }
      Ok(ObjPat { properties, rest })
    })
  }
}
