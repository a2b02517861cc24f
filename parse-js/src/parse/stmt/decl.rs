use super::super::ParseCtx;
use super::super::Parser;
use crate::ast::expr::pat::ClassOrFuncName;
use crate::ast::expr::pat::Pat;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ClassDecl;
use crate::ast::stmt::decl::FuncDecl;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::decl::VarDeclarator;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn var_decl_mode(&mut self) -> SyntaxResult<VarDeclMode> {
    let t = self.consume();
    Ok(match t.typ {
      TT::KeywordVar => VarDeclMode::Var,
      TT::KeywordLet => VarDeclMode::Let,
      TT::KeywordConst => VarDeclMode::Const,
      _ => return Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("variable declaration"))),
    })
  }

  /// Parses the initializer of `first` and any further comma-separated declarators.
  pub fn var_declarators(
    &mut self,
    ctx: ParseCtx,
    first: Node<Pat>,
    terminators: &[TT],
  ) -> SyntaxResult<Vec<VarDeclarator>> {
    let mut declarators = Vec::new();
    let mut pattern = first;
    loop {
      let initializer = self
        .consume_if(TT::Equals)
        .and_then(|| self.expr_assign(ctx, terminators))?;
      declarators.push(VarDeclarator {
        pattern,
        initializer,
      });
      if !self.consume_if(TT::Comma).is_match() {
        break;
      };
      pattern = self.pat_decl(ctx)?;
    }
    Ok(declarators)
  }

  /// Parses a `var`, `let` or `const` declaration without its trailing semicolon.
  pub fn var_decl(
    &mut self,
    ctx: ParseCtx,
    terminators: &[TT],
    export: bool,
  ) -> SyntaxResult<Node<VarDecl>> {
    self.with_loc(|p| {
      let mode = p.var_decl_mode()?;
      let first = p.pat_decl(ctx)?;
      let declarators = p.var_declarators(ctx, first, terminators)?;
      Ok(VarDecl {
        export,
        mode,
        declarators,
      })
    })
  }

  pub fn func_decl(
    &mut self,
    ctx: ParseCtx,
    export: bool,
    export_default: bool,
  ) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      let async_ = p.consume_if(TT::KeywordAsync).is_match();
      p.require(TT::KeywordFunction)?;
      let generator = p.consume_if(TT::Asterisk).is_match();
      let t = p.peek();
      let name = if ctx.rules.is_valid_pattern_identifier(t.typ) {
        p.consume();
        Some(Node::new(t.loc, ClassOrFuncName {
          name: p.string(t.loc),
        }))
      } else if export_default {
        None
      } else {
        return Err(p.unexpected(&t, SyntaxErrorType::ExpectedSyntax("function name")));
      };
      let func = p.func(ctx.for_function(async_, generator), async_, generator)?;
      Ok(FuncDecl {
        export,
        export_default,
        name,
        func,
      })
    })?;
    Ok(node.into_wrapped())
  }

  pub fn class_decl(
    &mut self,
    ctx: ParseCtx,
    export: bool,
    export_default: bool,
  ) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      let parts = p.class_parts(ctx, !export_default)?;
      Ok(ClassDecl {
        export,
        export_default,
        name: parts.name,
        extends: parts.extends,
        members: parts.members,
      })
    })?;
    Ok(node.into_wrapped())
  }
}
