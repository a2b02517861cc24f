pub mod lit;
pub mod pat;

use super::operator::MULTARY_OPERATOR_MAPPING;
use super::operator::UNARY_OPERATOR_MAPPING;
use super::ParseCtx;
use super::ParsePatternRules;
use super::Parser;
use crate::ast::expr::pat::ClassOrFuncName;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::ArrowFuncExpr;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::CallArg;
use crate::ast::expr::CallExpr;
use crate::ast::expr::ClassExpr;
use crate::ast::expr::ComputedMemberExpr;
use crate::ast::expr::CondExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::FuncExpr;
use crate::ast::expr::IdExpr;
use crate::ast::expr::ImportExpr;
use crate::ast::expr::ImportMeta;
use crate::ast::expr::MemberExpr;
use crate::ast::expr::NewExpr;
use crate::ast::expr::NewTarget;
use crate::ast::expr::PrivateNameExpr;
use crate::ast::expr::SuperExpr;
use crate::ast::expr::TaggedTemplateExpr;
use crate::ast::expr::ThisExpr;
use crate::ast::expr::UnaryExpr;
use crate::ast::expr::UnaryPostfixExpr;
use crate::ast::expr::YieldExpr;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::func::ParamDecl;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::lex::KEYWORDS_MAPPING;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::token::TT;

/// Whether the token can follow `.` as a property name; keywords are allowed there.
pub fn is_identifier_name(typ: TT) -> bool {
  typ == TT::Identifier || KEYWORDS_MAPPING.contains_key(&typ)
}

fn precedence(name: OperatorName) -> u8 {
  OPERATORS[&name].precedence
}

impl<'a> Parser<'a> {
  pub fn expr(&mut self, ctx: ParseCtx, terminators: &[TT]) -> SyntaxResult<Node<Expr>> {
    self.expr_with_min_prec(ctx, 1, terminators)
  }

  /// Any expression except a top-level comma sequence.
  pub fn expr_assign(&mut self, ctx: ParseCtx, terminators: &[TT]) -> SyntaxResult<Node<Expr>> {
    self.expr_with_min_prec(ctx, precedence(OperatorName::Assignment), terminators)
  }

  pub fn expr_with_min_prec(
    &mut self,
    ctx: ParseCtx,
    min_prec: u8,
    terminators: &[TT],
  ) -> SyntaxResult<Node<Expr>> {
    let (mut left, bare_arrow) = self.expr_operand(ctx, terminators)?;

    loop {
      let t = self.peek();
      if terminators.contains(&t.typ) {
        break;
      };

      // An unparenthesised arrow function can only be followed by a comma.
      if bare_arrow && t.typ != TT::Comma {
        break;
      };

      if matches!(t.typ, TT::PlusPlus | TT::HyphenHyphen) {
        // Restricted production: a line break before `++`/`--` ends the expression.
        if t.preceded_by_line_terminator {
          break;
        };
        let operator = if t.typ == TT::PlusPlus {
          OperatorName::PostfixIncrement
        } else {
          OperatorName::PostfixDecrement
        };
        if precedence(operator) < min_prec {
          break;
        };
        self.consume();
        left = Node::new(left.loc + t.loc, UnaryPostfixExpr {
          operator,
          argument: left,
        })
        .into_wrapped();
        continue;
      };

      let Some(operator) = MULTARY_OPERATOR_MAPPING.get(&t.typ) else {
        break;
      };
      if operator.precedence < min_prec {
        break;
      };

      left = match operator.name {
        OperatorName::MemberAccess => {
          self.consume();
          self.member_access(left, false)?
        }
        OperatorName::ComputedMemberAccess => {
          self.consume();
          self.computed_member_access(ctx, left, false)?
        }
        OperatorName::OptionalChainingMemberAccess => {
          self.consume();
          match self.peek().typ {
            TT::BracketOpen => {
              self.consume();
              self.computed_member_access(ctx, left, true)?
            }
            TT::ParenthesisOpen => {
              self.consume();
              self.call(ctx, left, true)?
            }
            _ => self.member_access(left, true)?,
          }
        }
        OperatorName::Call => {
          if t.typ == TT::ParenthesisOpen {
            self.consume();
            self.call(ctx, left, false)?
          } else {
            let parts = self.lit_template_parts(ctx)?;
            Node::new(left.loc + self.last_consumed_loc(), TaggedTemplateExpr {
              function: left,
              parts,
            })
            .into_wrapped()
          }
        }
        OperatorName::Conditional => {
          self.consume();
          let consequent = self.expr_assign(ctx, &[TT::Colon])?;
          self.require(TT::Colon)?;
          let alternate = self.expr_assign(ctx, terminators)?;
          Node::new(left.loc + alternate.loc, CondExpr {
            test: left,
            consequent,
            alternate,
          })
          .into_wrapped()
        }
        name => {
          self.consume();
          let next_min_prec = match operator.associativity {
            Associativity::Left => operator.precedence + 1,
            Associativity::Right => operator.precedence,
          };
          let right = self.expr_with_min_prec(ctx, next_min_prec, terminators)?;
          Node::new(left.loc + right.loc, BinaryExpr {
            operator: name,
            left,
            right,
          })
          .into_wrapped()
        }
      };
    }

    Ok(left)
  }

  /// Parses a unary expression or primary expression. The flag is set if the result is an unparenthesised arrow function.
  fn expr_operand(
    &mut self,
    ctx: ParseCtx,
    terminators: &[TT],
  ) -> SyntaxResult<(Node<Expr>, bool)> {
    let t = self.peek_with_mode(LexMode::SlashIsRegex);
    let unary = UNARY_OPERATOR_MAPPING
      .get(&t.typ)
      .filter(|_| t.typ != TT::KeywordAwait || !ctx.rules.await_allowed);
    if let Some(operator) = unary {
      self.consume_with_mode(LexMode::SlashIsRegex);
      let argument = self.expr_with_min_prec(ctx, operator.precedence, terminators)?;
      let node = Node::new(t.loc + argument.loc, UnaryExpr {
        operator: operator.name,
        argument,
      });
      return Ok((node.into_wrapped(), false));
    };
    match t.typ {
      TT::KeywordYield if !ctx.rules.yield_allowed => Ok((self.expr_yield(ctx, terminators)?, false)),
      TT::KeywordNew => Ok((self.expr_new(ctx, terminators)?, false)),
      _ => self.expr_primary(ctx, terminators),
    }
  }

  fn expr_primary(
    &mut self,
    ctx: ParseCtx,
    terminators: &[TT],
  ) -> SyntaxResult<(Node<Expr>, bool)> {
    let t = self.peek_with_mode(LexMode::SlashIsRegex);
    let expr = match t.typ {
      TT::ParenthesisOpen => {
        if let Some(arrow) = self.arrow_func(ctx, false, terminators)? {
          return Ok((arrow, true));
        };
        self.require(TT::ParenthesisOpen)?;
        let expr = self.expr(ctx, &[TT::ParenthesisClose])?;
        self.require(TT::ParenthesisClose)?;
        expr
      }
      TT::BracketOpen => self.lit_arr(ctx)?,
      TT::BraceOpen => self.lit_obj(ctx)?,
      TT::KeywordFunction => self.expr_func(ctx)?,
      TT::KeywordAsync => {
        let (_, next) = self.peek_2();
        if next.typ == TT::KeywordFunction && !next.preceded_by_line_terminator {
          self.expr_func(ctx)?
        } else {
          if !next.preceded_by_line_terminator
            && (next.typ == TT::ParenthesisOpen || ctx.rules.is_valid_pattern_identifier(next.typ))
          {
            if let Some(arrow) = self.arrow_func(ctx, true, terminators)? {
              return Ok((arrow, true));
            };
          };
          self.expr_id(ctx)?
        }
      }
      TT::KeywordThis => {
        self.consume();
        Node::new(t.loc, ThisExpr {}).into_wrapped()
      }
      TT::LiteralTrue | TT::LiteralFalse => self.lit_bool()?,
      TT::LiteralNull => self.lit_null()?,
      TT::LiteralNumber => self.lit_num()?,
      TT::LiteralBigInt => self.lit_bigint()?,
      TT::LiteralString => self.lit_str()?,
      TT::LiteralRegex => self.lit_regex()?,
      TT::LiteralTemplatePartString | TT::LiteralTemplatePartStringEnd => self.lit_template(ctx)?,
      TT::KeywordClass => self.expr_class(ctx)?,
      // Only valid before `(`, `.` or `[`, which the operator loop takes care of.
      TT::KeywordSuper => {
        self.consume();
        Node::new(t.loc, SuperExpr {}).into_wrapped()
      }
      TT::KeywordImport => self.expr_import(ctx)?,
      // `#x in obj`.
      TT::PrivateMember => {
        self.consume();
        Node::new(t.loc, PrivateNameExpr {
          name: self.string(t.loc),
        })
        .into_wrapped()
      }
      typ if ctx.rules.is_valid_pattern_identifier(typ) => {
        if self.peek_2().1.typ == TT::EqualsChevronRight {
          if let Some(arrow) = self.arrow_func(ctx, false, terminators)? {
            return Ok((arrow, true));
          };
        };
        self.expr_id(ctx)?
      }
      _ => {
        return Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("expression operand")));
      }
    };
    Ok((expr, false))
  }

  fn expr_id(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let node = self.with_loc(|p| {
      let t = p.require_identifier(ctx)?;
      Ok(IdExpr {
        name: p.string(t.loc),
      })
    })?;
    Ok(node.into_wrapped())
  }

  /// Parses `.name` or `.#name` after the dot has been consumed.
  fn member_access(&mut self, left: Node<Expr>, optional_chaining: bool) -> SyntaxResult<Node<Expr>> {
    let prop = self.consume();
    if !is_identifier_name(prop.typ) && prop.typ != TT::PrivateMember {
      return Err(self.unexpected(&prop, SyntaxErrorType::ExpectedSyntax("property name")));
    };
    Ok(
      Node::new(left.loc + prop.loc, MemberExpr {
        optional_chaining,
        left,
        right: self.string(prop.loc),
      })
      .into_wrapped(),
    )
  }

  /// Parses `[member]` after the opening bracket has been consumed.
  fn computed_member_access(
    &mut self,
    ctx: ParseCtx,
    object: Node<Expr>,
    optional_chaining: bool,
  ) -> SyntaxResult<Node<Expr>> {
    let member = self.expr(ctx, &[TT::BracketClose])?;
    let end = self.require(TT::BracketClose)?;
    Ok(
      Node::new(object.loc + end.loc, ComputedMemberExpr {
        optional_chaining,
        object,
        member,
      })
      .into_wrapped(),
    )
  }

  /// Parses the arguments after the opening parenthesis has been consumed.
  fn call(
    &mut self,
    ctx: ParseCtx,
    callee: Node<Expr>,
    optional_chaining: bool,
  ) -> SyntaxResult<Node<Expr>> {
    let arguments = self.call_args(ctx)?;
    Ok(
      Node::new(callee.loc + self.last_consumed_loc(), CallExpr {
        optional_chaining,
        callee,
        arguments,
      })
      .into_wrapped(),
    )
  }

  /// Parses call arguments up to and including the closing parenthesis.
  pub fn call_args(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<CallArg>>> {
    let mut args = Vec::new();
    loop {
      if self.consume_if(TT::ParenthesisClose).is_match() {
        break;
      };
      let arg = self.with_loc(|p| {
        let spread = p.consume_if(TT::DotDotDot).is_match();
        let value = p.expr_assign(ctx, &[TT::Comma, TT::ParenthesisClose])?;
        Ok(CallArg { spread, value })
      })?;
      args.push(arg);
      if !self.consume_if(TT::Comma).is_match() {
        self.require(TT::ParenthesisClose)?;
        break;
      };
    }
    Ok(args)
  }

  fn expr_new(&mut self, ctx: ParseCtx, terminators: &[TT]) -> SyntaxResult<Node<Expr>> {
    let new = self.require(TT::KeywordNew)?;
    let next = self.peek();
    if next.typ == TT::Dot {
      self.consume();
      let prop = self.consume();
      if prop.typ != TT::Identifier || self.str(prop.loc) != "target" {
        return Err(self.unexpected(&prop, SyntaxErrorType::ExpectedSyntax("`target` property")));
      };
      return Ok(Node::new(new.loc + prop.loc, NewTarget {}).into_wrapped());
    };
    let mut callee = if next.typ == TT::KeywordNew {
      self.expr_new(ctx, terminators)?
    } else {
      self.expr_primary(ctx, terminators)?.0
    };
    // Calls end the callee: `new a.b(c)` constructs `a.b`.
    loop {
      let t = self.peek();
      callee = match t.typ {
        TT::Dot => {
          self.consume();
          self.member_access(callee, false)?
        }
        TT::BracketOpen => {
          self.consume();
          self.computed_member_access(ctx, callee, false)?
        }
        TT::LiteralTemplatePartString | TT::LiteralTemplatePartStringEnd => {
          let parts = self.lit_template_parts(ctx)?;
          Node::new(callee.loc + self.last_consumed_loc(), TaggedTemplateExpr {
            function: callee,
            parts,
          })
          .into_wrapped()
        }
        _ => break,
      };
    }
    let arguments = if self.consume_if(TT::ParenthesisOpen).is_match() {
      self.call_args(ctx)?
    } else {
      Vec::new()
    };
    Ok(Node::new(new.loc + self.last_consumed_loc(), NewExpr { callee, arguments }).into_wrapped())
  }

  fn expr_yield(&mut self, ctx: ParseCtx, terminators: &[TT]) -> SyntaxResult<Node<Expr>> {
    let node = self.with_loc(|p| {
      p.require(TT::KeywordYield)?;
      let delegate = p.consume_if(TT::Asterisk).is_match();
      let next = p.peek_with_mode(LexMode::SlashIsRegex);
      let ends = next.preceded_by_line_terminator
        || terminators.contains(&next.typ)
        || matches!(
          next.typ,
          TT::ParenthesisClose
            | TT::BracketClose
            | TT::BraceClose
            | TT::Comma
            | TT::Semicolon
            | TT::Colon
            | TT::EOF
        );
      let argument = if ends && !delegate {
        None
      } else {
        Some(p.expr_assign(ctx, terminators)?)
      };
      Ok(YieldExpr { delegate, argument })
    })?;
    Ok(node.into_wrapped())
  }

  pub fn expr_func(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let node = self.with_loc(|p| {
      let async_ = p.consume_if(TT::KeywordAsync).is_match();
      p.require(TT::KeywordFunction)?;
      let generator = p.consume_if(TT::Asterisk).is_match();
      let name = if ctx.rules.is_valid_pattern_identifier(p.peek().typ) {
        Some(p.with_loc(|p| {
          let t = p.consume();
          Ok(ClassOrFuncName {
            name: p.string(t.loc),
          })
        })?)
      } else {
        None
      };
      let func = p.func(ctx.for_function(async_, generator), async_, generator)?;
      Ok(FuncExpr { name, func })
    })?;
    Ok(node.into_wrapped())
  }

  fn expr_class(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let node = self.with_loc(|p| {
      let parts = p.class_parts(ctx, false)?;
      Ok(ClassExpr {
        name: parts.name,
        extends: parts.extends,
        members: parts.members,
      })
    })?;
    Ok(node.into_wrapped())
  }

  /// Parses `import(module)`, `import(module, options)` or `import.meta`.
  fn expr_import(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let start = self.require(TT::KeywordImport)?;
    if self.consume_if(TT::Dot).is_match() {
      let prop = self.consume();
      if prop.typ != TT::Identifier || self.str(prop.loc) != "meta" {
        return Err(self.unexpected(&prop, SyntaxErrorType::ExpectedSyntax("`meta` property")));
      };
      return Ok(Node::new(start.loc + prop.loc, ImportMeta {}).into_wrapped());
    };
    self.require(TT::ParenthesisOpen)?;
    let terminators = [TT::Comma, TT::ParenthesisClose];
    let module = self.expr_assign(ctx, &terminators)?;
    let mut options = None;
    if self.consume_if(TT::Comma).is_match() && self.peek().typ != TT::ParenthesisClose {
      options = Some(self.expr_assign(ctx, &terminators)?);
      // Trailing comma.
      let _ = self.consume_if(TT::Comma);
    };
    let end = self.require(TT::ParenthesisClose)?;
    Ok(Node::new(start.loc + end.loc, ImportExpr { module, options }).into_wrapped())
  }

  /// Attempts to parse an arrow function, returning `None` without consuming anything if the
  /// upcoming tokens are not arrow function parameters followed by `=>`.
  fn arrow_func(
    &mut self,
    ctx: ParseCtx,
    async_: bool,
    terminators: &[TT],
  ) -> SyntaxResult<Option<Node<Expr>>> {
    let cp = self.checkpoint();
    let params_ctx = if async_ {
      ctx.with_rules(ParsePatternRules {
        await_allowed: false,
        ..ctx.rules
      })
    } else {
      ctx
    };
    let head = self.rewindable(|p| {
      if async_ {
        p.require(TT::KeywordAsync)?;
      };
      let parameters = if p.peek().typ == TT::ParenthesisOpen {
        p.func_params(params_ctx)?
      } else {
        let param = p.with_loc(|p| {
          let pattern = p.with_loc(|p| {
            let t = p.require_identifier(ctx)?;
            Ok(IdPat {
              name: p.string(t.loc),
            })
          })?;
          Ok(ParamDecl {
            rest: false,
            pattern: pattern.into_wrapped(),
            default_value: None,
          })
        })?;
        vec![param]
      };
      let arrow = p.consume();
      if arrow.typ != TT::EqualsChevronRight {
        return Ok(None);
      };
      Ok(Some((parameters, arrow)))
    });
    let Some((parameters, arrow)) = head else {
      return Ok(None);
    };
    if arrow.preceded_by_line_terminator {
      return Err(arrow.error(SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters));
    };

    let body_ctx = params_ctx;
    let body = if self.peek().typ == TT::BraceOpen {
      FuncBody::Block(self.func_body(body_ctx)?)
    } else {
      FuncBody::Expression(self.expr_assign(body_ctx, terminators)?)
    };
    let loc = self.since_checkpoint(&cp);
    let func = Node::new(loc, Func {
      arrow: true,
      async_,
      generator: false,
      parameters,
      body,
    });
    Ok(Some(Node::new(loc, ArrowFuncExpr { func }).into_wrapped()))
  }
}
