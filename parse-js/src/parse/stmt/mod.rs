pub mod decl;

use super::ParseCtx;
use super::Parser;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::BlockStmt;
use crate::ast::stmt::BreakStmt;
use crate::ast::stmt::CatchBlock;
use crate::ast::stmt::ContinueStmt;
use crate::ast::stmt::DebuggerStmt;
use crate::ast::stmt::DoWhileStmt;
use crate::ast::stmt::EmptyStmt;
use crate::ast::stmt::ExprStmt;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::ForInStmt;
use crate::ast::stmt::ForOfStmt;
use crate::ast::stmt::ForTripleStmt;
use crate::ast::stmt::ForTripleStmtInit;
use crate::ast::stmt::IfStmt;
use crate::ast::stmt::LabelStmt;
use crate::ast::stmt::ReturnStmt;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::SwitchBranch;
use crate::ast::stmt::SwitchStmt;
use crate::ast::stmt::ThrowStmt;
use crate::ast::stmt::TryStmt;
use crate::ast::stmt::WhileStmt;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::token::TT;
use crate::TopLevelMode;

impl<'a> Parser<'a> {
  /// Parses statements until `end`, which is not consumed.
  pub fn stmts(&mut self, ctx: ParseCtx, end: TT) -> SyntaxResult<Vec<Node<Stmt>>> {
    let mut body = Vec::new();
    loop {
      let t = self.peek();
      if t.typ == end {
        break;
      };
      if t.typ == TT::EOF {
        return Err(self.unexpected(&t, SyntaxErrorType::UnexpectedEnd));
      };
      body.push(self.stmt(ctx)?);
    }
    Ok(body)
  }

  // Whether `let` at the current position starts a declaration rather than being an identifier.
  fn let_starts_decl(&mut self, ctx: ParseCtx) -> bool {
    let (_, next) = self.peek_2();
    matches!(next.typ, TT::BracketOpen | TT::BraceOpen)
      || ctx.rules.is_valid_pattern_identifier(next.typ)
  }

  pub fn stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let (t, next) = self.peek_2();
    match t.typ {
      TT::BraceOpen => Ok(self.block_stmt(ctx)?.into_wrapped()),
      TT::KeywordBreak => self.break_stmt(ctx),
      TT::KeywordContinue => self.continue_stmt(ctx),
      TT::KeywordDebugger => {
        let node = self.with_loc(|p| {
          p.consume();
          p.require_semicolon_or_asi()?;
          Ok(DebuggerStmt {})
        })?;
        Ok(node.into_wrapped())
      }
      TT::KeywordDo => self.do_while_stmt(ctx),
      TT::KeywordExport | TT::KeywordImport
        if !(t.typ == TT::KeywordImport && matches!(next.typ, TT::ParenthesisOpen | TT::Dot)) =>
      {
        if self.top_level_mode() != TopLevelMode::Module {
          return Err(t.error(SyntaxErrorType::ModuleSyntaxInScript));
        };
        if t.typ == TT::KeywordExport {
          self.export_stmt(ctx)
        } else {
          self.import_stmt(ctx)
        }
      }
      TT::KeywordFor => self.for_stmt(ctx),
      TT::KeywordFunction => self.func_decl(ctx, false, false),
      TT::KeywordAsync
        if next.typ == TT::KeywordFunction && !next.preceded_by_line_terminator =>
      {
        self.func_decl(ctx, false, false)
      }
      TT::KeywordIf => self.if_stmt(ctx),
      TT::KeywordReturn => self.return_stmt(ctx),
      TT::KeywordSwitch => self.switch_stmt(ctx),
      TT::KeywordThrow => self.throw_stmt(ctx),
      TT::KeywordTry => self.try_stmt(ctx),
      TT::KeywordWhile => self.while_stmt(ctx),
      TT::KeywordVar | TT::KeywordConst => self.var_decl_stmt(ctx),
      TT::KeywordLet if self.let_starts_decl(ctx) => self.var_decl_stmt(ctx),
      TT::KeywordClass => self.class_decl(ctx, false, false),
      TT::KeywordWith => Err(t.error(SyntaxErrorType::UnsupportedSyntax("with statements"))),
      TT::Semicolon => {
        self.consume();
        Ok(Node::new(t.loc, EmptyStmt {}).into_wrapped())
      }
      typ if next.typ == TT::Colon && ctx.rules.is_valid_pattern_identifier(typ) => {
        self.label_stmt(ctx)
      }
      _ => self.expr_stmt(ctx),
    }
  }

  pub fn block_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<BlockStmt>> {
    self.with_loc(|p| {
      p.require(TT::BraceOpen)?;
      let body = p.stmts(ctx, TT::BraceClose)?;
      p.require(TT::BraceClose)?;
      Ok(BlockStmt { body })
    })
  }

  // Label of a `break` or `continue`, which must be on the same line.
  fn jump_label(&mut self, ctx: ParseCtx) -> SyntaxResult<Option<String>> {
    let t = self.peek();
    let label = if !t.preceded_by_line_terminator && ctx.rules.is_valid_pattern_identifier(t.typ) {
      self.consume();
      Some(self.string(t.loc))
    } else {
      None
    };
    self.require_semicolon_or_asi()?;
    Ok(label)
  }

  fn break_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      p.require(TT::KeywordBreak)?;
      let label = p.jump_label(ctx)?;
      Ok(BreakStmt { label })
    })?;
    Ok(node.into_wrapped())
  }

  fn continue_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      p.require(TT::KeywordContinue)?;
      let label = p.jump_label(ctx)?;
      Ok(ContinueStmt { label })
    })?;
    Ok(node.into_wrapped())
  }

  // Parenthesised condition of `if`, `while`, `switch` and `do`.
  fn paren_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    self.require(TT::ParenthesisOpen)?;
    let expr = self.expr(ctx, &[TT::ParenthesisClose])?;
    self.require(TT::ParenthesisClose)?;
    Ok(expr)
  }

  fn do_while_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      p.require(TT::KeywordDo)?;
      let body = p.stmt(ctx)?;
      p.require(TT::KeywordWhile)?;
      let condition = p.paren_expr(ctx)?;
      // A semicolon is always inserted after `do ... while (x)` if missing.
      let _ = p.consume_if(TT::Semicolon);
      Ok(DoWhileStmt { condition, body })
    })?;
    Ok(node.into_wrapped())
  }

  fn for_in_of_body(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    self.require(TT::ParenthesisClose)?;
    self.stmt(ctx)
  }

  fn for_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let cp = self.checkpoint();
    self.require(TT::KeywordFor)?;
    let await_ = self.consume_if(TT::KeywordAwait).is_match();
    self.require(TT::ParenthesisOpen)?;

    let t = self.peek();
    let is_decl = match t.typ {
      TT::KeywordVar | TT::KeywordConst => true,
      TT::KeywordLet => self.let_starts_decl(ctx),
      _ => false,
    };
    let init = if is_decl {
      let mode = self.var_decl_mode()?;
      let pattern = self.pat_decl(ctx)?;
      if self.consume_if(TT::KeywordIn).is_match() {
        let rhs = self.expr(ctx, &[TT::ParenthesisClose])?;
        let body = self.for_in_of_body(ctx)?;
        let lhs = ForInOfLhs::Decl((mode, pattern));
        let loc = self.since_checkpoint(&cp);
        return Ok(Node::new(loc, ForInStmt { lhs, rhs, body }).into_wrapped());
      };
      if self.consume_if(TT::KeywordOf).is_match() {
        let rhs = self.expr_assign(ctx, &[TT::ParenthesisClose])?;
        let body = self.for_in_of_body(ctx)?;
        let lhs = ForInOfLhs::Decl((mode, pattern));
        let loc = self.since_checkpoint(&cp);
        return Ok(
          Node::new(loc, ForOfStmt {
            await_,
            lhs,
            rhs,
            body,
          })
          .into_wrapped(),
        );
      };
      let declarators = self.var_declarators(ctx, pattern, &[TT::Semicolon, TT::KeywordIn])?;
      let decl = Node::new(t.loc + self.last_consumed_loc(), VarDecl {
        export: false,
        mode,
        declarators,
      });
      ForTripleStmtInit::Decl(decl)
    } else if t.typ == TT::Semicolon {
      ForTripleStmtInit::None
    } else {
      let lhs = self.expr(ctx, &[TT::Semicolon, TT::KeywordIn, TT::KeywordOf])?;
      if self.consume_if(TT::KeywordIn).is_match() {
        let rhs = self.expr(ctx, &[TT::ParenthesisClose])?;
        let body = self.for_in_of_body(ctx)?;
        let lhs = ForInOfLhs::Assign(lhs);
        let loc = self.since_checkpoint(&cp);
        return Ok(Node::new(loc, ForInStmt { lhs, rhs, body }).into_wrapped());
      };
      if self.consume_if(TT::KeywordOf).is_match() {
        let rhs = self.expr_assign(ctx, &[TT::ParenthesisClose])?;
        let body = self.for_in_of_body(ctx)?;
        let lhs = ForInOfLhs::Assign(lhs);
        let loc = self.since_checkpoint(&cp);
        return Ok(
          Node::new(loc, ForOfStmt {
            await_,
            lhs,
            rhs,
            body,
          })
          .into_wrapped(),
        );
      };
      ForTripleStmtInit::Expr(lhs)
    };

    self.require(TT::Semicolon)?;
    let cond = if self.peek().typ == TT::Semicolon {
      None
    } else {
      Some(self.expr(ctx, &[TT::Semicolon])?)
    };
    self.require(TT::Semicolon)?;
    let post = if self.peek().typ == TT::ParenthesisClose {
      None
    } else {
      Some(self.expr(ctx, &[TT::ParenthesisClose])?)
    };
    self.require(TT::ParenthesisClose)?;
    let body = self.stmt(ctx)?;
    let loc = self.since_checkpoint(&cp);
    Ok(
      Node::new(loc, ForTripleStmt {
        init,
        cond,
        post,
        body,
      })
      .into_wrapped(),
    )
  }

  fn if_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      p.require(TT::KeywordIf)?;
      let test = p.paren_expr(ctx)?;
      let consequent = p.stmt(ctx)?;
      let alternate = p
        .consume_if(TT::KeywordElse)
        .and_then(|| p.stmt(ctx))?;
      Ok(IfStmt {
        test,
        consequent,
        alternate,
      })
    })?;
    Ok(node.into_wrapped())
  }

  fn label_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      let t = p.require_identifier(ctx)?;
      p.require(TT::Colon)?;
      let statement = p.stmt(ctx)?;
      Ok(LabelStmt {
        name: p.string(t.loc),
        statement,
      })
    })?;
    Ok(node.into_wrapped())
  }

  fn return_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      p.require(TT::KeywordReturn)?;
      let next = p.peek_with_mode(LexMode::SlashIsRegex);
      let value = if next.preceded_by_line_terminator
        || matches!(next.typ, TT::Semicolon | TT::BraceClose | TT::EOF)
      {
        None
      } else {
        Some(p.expr(ctx, &[TT::Semicolon])?)
      };
      p.require_semicolon_or_asi()?;
      Ok(ReturnStmt { value })
    })?;
    Ok(node.into_wrapped())
  }

  fn switch_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      p.require(TT::KeywordSwitch)?;
      let test = p.paren_expr(ctx)?;
      p.require(TT::BraceOpen)?;
      let mut branches = Vec::new();
      while !p.consume_if(TT::BraceClose).is_match() {
        let branch = p.with_loc(|p| {
          let t = p.consume();
          let case = match t.typ {
            TT::KeywordCase => Some(p.expr(ctx, &[TT::Colon])?),
            TT::KeywordDefault => None,
            _ => return Err(p.unexpected(&t, SyntaxErrorType::ExpectedSyntax("switch case"))),
          };
          p.require(TT::Colon)?;
          let mut body = Vec::new();
          while !matches!(
            p.peek().typ,
            TT::KeywordCase | TT::KeywordDefault | TT::BraceClose | TT::EOF
          ) {
            body.push(p.stmt(ctx)?);
          }
          Ok(SwitchBranch { case, body })
        })?;
        branches.push(branch);
      }
      Ok(SwitchStmt { test, branches })
    })?;
    Ok(node.into_wrapped())
  }

  fn throw_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      p.require(TT::KeywordThrow)?;
      let next = p.peek_with_mode(LexMode::SlashIsRegex);
      if next.preceded_by_line_terminator {
        return Err(next.error(SyntaxErrorType::LineTerminatorAfterThrow));
      };
      let value = p.expr(ctx, &[TT::Semicolon])?;
      p.require_semicolon_or_asi()?;
      Ok(ThrowStmt { value })
    })?;
    Ok(node.into_wrapped())
  }

  fn try_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      let t = p.require(TT::KeywordTry)?;
      let wrapped = p.block_stmt(ctx)?;
      let catch = if p.consume_if(TT::KeywordCatch).is_match() {
        Some(p.with_loc(|p| {
          let parameter = if p.consume_if(TT::ParenthesisOpen).is_match() {
            let pattern = p.pat_decl(ctx)?;
            p.require(TT::ParenthesisClose)?;
            Some(pattern)
          } else {
            None
          };
          p.require(TT::BraceOpen)?;
          let body = p.stmts(ctx, TT::BraceClose)?;
          p.require(TT::BraceClose)?;
          Ok(CatchBlock { parameter, body })
        })?)
      } else {
        None
      };
      let finally = if p.consume_if(TT::KeywordFinally).is_match() {
        Some(p.block_stmt(ctx)?)
      } else {
        None
      };
      if catch.is_none() && finally.is_none() {
        return Err(t.error(SyntaxErrorType::TryStatementHasNoCatchOrFinally));
      };
      Ok(TryStmt {
        wrapped,
        catch,
        finally,
      })
    })?;
    Ok(node.into_wrapped())
  }

  fn while_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      p.require(TT::KeywordWhile)?;
      let condition = p.paren_expr(ctx)?;
      let body = p.stmt(ctx)?;
      Ok(WhileStmt { condition, body })
    })?;
    Ok(node.into_wrapped())
  }

  fn var_decl_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let cp = self.checkpoint();
    let mut decl = self.var_decl(ctx, &[], false)?;
    self.require_semicolon_or_asi()?;
    decl.loc = self.since_checkpoint(&cp);
    Ok(decl.into_wrapped())
  }

  fn expr_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      let expr = p.expr(ctx, &[])?;
      p.require_semicolon_or_asi()?;
      Ok(ExprStmt { expr })
    })?;
    Ok(node.into_wrapped())
  }
}
