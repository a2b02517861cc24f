use super::ParseCtx;
use super::Parser;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::func::ParamDecl;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// Parses a parenthesised parameter list, including both parentheses.
  pub fn func_params(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<ParamDecl>>> {
    self.require(TT::ParenthesisOpen)?;
    let mut parameters = Vec::new();
    loop {
      if self.consume_if(TT::ParenthesisClose).is_match() {
        break;
      };
      let param = self.with_loc(|p| {
        let rest = p.consume_if(TT::DotDotDot).is_match();
        let pattern = p.pat_decl(ctx)?;
        let default_value = p
          .consume_if(TT::Equals)
          .and_then(|| p.expr_assign(ctx, &[TT::Comma, TT::ParenthesisClose]))?;
        Ok(ParamDecl {
          rest,
          pattern,
          default_value,
        })
      })?;
      let rest = param.stx.rest;
      parameters.push(param);
      // A rest parameter must be last.
      if rest || !self.consume_if(TT::Comma).is_match() {
        self.require(TT::ParenthesisClose)?;
        break;
      };
    }
    Ok(parameters)
  }

  /// Parses a braced function body.
  pub fn func_body(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<Stmt>>> {
    self.require(TT::BraceOpen)?;
    let body = self.stmts(ctx, TT::BraceClose)?;
    self.require(TT::BraceClose)?;
    Ok(body)
  }

  /// Parameters and body of a non-arrow function. `ctx` must already be the function's own context.
  pub fn func(&mut self, ctx: ParseCtx, async_: bool, generator: bool) -> SyntaxResult<Node<Func>> {
    self.with_loc(|p| {
      let parameters = p.func_params(ctx)?;
      let body = p.func_body(ctx)?;
      Ok(Func {
        arrow: false,
        async_,
        generator,
        parameters,
        body: FuncBody::Block(body),
      })
    })
  }
}
