use super::expr::is_identifier_name;
use super::expr::lit::normalise_literal_number;
use super::ParseCtx;
use super::Parser;
use crate::ast::class_or_object::ClassMember;
use crate::ast::class_or_object::ClassMethod;
use crate::ast::class_or_object::ClassProp;
use crate::ast::class_or_object::ClassStaticBlock;
use crate::ast::class_or_object::MethodKind;
use crate::ast::class_or_object::ObjKey;
use crate::ast::class_or_object::ObjMember;
use crate::ast::expr::lit::LitObjExpr;
use crate::ast::expr::pat::ClassOrFuncName;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::IdExpr;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::token::TT;

// Tokens after `get`, `set`, `async` or `static` that mean it is the member name itself.
fn ends_key(typ: TT) -> bool {
  matches!(
    typ,
    TT::ParenthesisOpen | TT::Colon | TT::Comma | TT::BraceClose | TT::Equals | TT::Semicolon
  )
}

pub struct ClassParts {
  pub name: Option<Node<ClassOrFuncName>>,
  pub extends: Option<Node<Expr>>,
  pub members: Vec<ClassMember>,
}

impl<'a> Parser<'a> {
  pub fn obj_key(&mut self, ctx: ParseCtx) -> SyntaxResult<ObjKey> {
    let t = self.peek();
    match t.typ {
      TT::LiteralString => Ok(ObjKey::Str(self.lit_str_val()?)),
      TT::LiteralNumber => {
        self.consume();
        let value = normalise_literal_number(self.str(t.loc))
          .ok_or_else(|| t.error(SyntaxErrorType::MalformedLiteralNumber))?;
        Ok(ObjKey::Num(value))
      }
      TT::BracketOpen => {
        self.consume();
        let key = self.expr_assign(ctx, &[TT::BracketClose])?;
        self.require(TT::BracketClose)?;
        Ok(ObjKey::Computed(key))
      }
      typ if is_identifier_name(typ) => {
        self.consume();
        Ok(ObjKey::Direct(self.string(t.loc)))
      }
      _ => Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("property key"))),
    }
  }

  /// Consumes the `get`, `set`, `async` and `*` prefixes of a method, if any.
  fn method_head(&mut self) -> (MethodKind, bool, bool) {
    let (a, b) = self.peek_2();
    match a.typ {
      TT::KeywordGet | TT::KeywordSet if !ends_key(b.typ) => {
        self.consume();
        let kind = if a.typ == TT::KeywordGet {
          MethodKind::Getter
        } else {
          MethodKind::Setter
        };
        (kind, false, false)
      }
      TT::KeywordAsync if !ends_key(b.typ) && !b.preceded_by_line_terminator => {
        self.consume();
        let generator = self.consume_if(TT::Asterisk).is_match();
        (MethodKind::Method, true, generator)
      }
      TT::Asterisk => {
        self.consume();
        (MethodKind::Method, false, true)
      }
      _ => (MethodKind::Method, false, false),
    }
  }

  fn obj_member(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ObjMember>> {
    self.with_loc(|p| {
      if p.consume_if(TT::DotDotDot).is_match() {
        let value = p.expr_assign(ctx, &[TT::Comma, TT::BraceClose])?;
        return Ok(ObjMember::Spread { value });
      };
      let (kind, async_, generator) = p.method_head();
      if kind != MethodKind::Method || async_ || generator {
        let key = p.obj_key(ctx)?;
        let func = p.func(ctx.for_function(async_, generator), async_, generator)?;
        return Ok(ObjMember::Method { kind, key, func });
      };

      let key_tok = p.peek();
      let key = p.obj_key(ctx)?;
      if p.peek().typ == TT::ParenthesisOpen {
        let func = p.func(ctx.for_function(false, false), false, false)?;
        return Ok(ObjMember::Method {
          kind: MethodKind::Method,
          key,
          func,
        });
      };
      if p.consume_if(TT::Colon).is_match() {
        let value = p.expr_assign(ctx, &[TT::Comma, TT::BraceClose])?;
        return Ok(ObjMember::Prop { key, value });
      };

      let ObjKey::Direct(name) = key else {
        return Err(p.unexpected(&key_tok, SyntaxErrorType::RequiredTokenNotFound(TT::Colon)));
      };
      if !ctx.rules.is_valid_pattern_identifier(key_tok.typ) {
        return Err(p.unexpected(&key_tok, SyntaxErrorType::ExpectedSyntax("identifier")));
      };
      let id = Node::new(key_tok.loc, IdExpr { name: name.clone() });
      // `{ a = 1 } = obj` only makes sense as an assignment target; keep it as `a: a = 1`.
      if p.consume_if(TT::Equals).is_match() {
        let default_value = p.expr_assign(ctx, &[TT::Comma, TT::BraceClose])?;
        let loc = key_tok.loc + default_value.loc;
        let value = Node::new(loc, BinaryExpr {
          operator: OperatorName::Assignment,
          left: id.into_wrapped::<Expr>(),
          right: default_value,
        })
        .into_wrapped();
        return Ok(ObjMember::Prop {
          key: ObjKey::Direct(name),
          value,
        });
      };
      Ok(ObjMember::Shorthand { id })
    })
  }

  pub fn lit_obj(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Expr>> {
    let node = self.with_loc(|p| {
      p.require(TT::BraceOpen)?;
      let mut members = Vec::new();
      loop {
        if p.consume_if(TT::BraceClose).is_match() {
          break;
        };
        members.push(p.obj_member(ctx)?);
        if !p.consume_if(TT::Comma).is_match() {
          p.require(TT::BraceClose)?;
          break;
        };
      }
      Ok(LitObjExpr { members })
    })?;
    Ok(node.into_wrapped())
  }

  /// Like `obj_key`, but also accepts private names such as `#count`.
  fn class_key(&mut self, ctx: ParseCtx) -> SyntaxResult<ObjKey> {
    let t = self.peek();
    if t.typ == TT::PrivateMember {
      self.consume();
      return Ok(ObjKey::Private(self.string(t.loc)));
    };
    self.obj_key(ctx)
  }

  // It's strictly one of these:
  // - static { <stmts> }
  // - static? <key> [ '=' <expr> ]? [ <asi> | ';' ]
  // - static? [ get | set | async | '*' | async '*' ]? <key> '(' ...
  fn class_member(&mut self, ctx: ParseCtx) -> SyntaxResult<ClassMember> {
    let (a, b) = self.peek_2();
    if a.typ == TT::KeywordStatic && b.typ == TT::BraceOpen {
      let block = self.with_loc(|p| {
        p.consume();
        let body = p.func_body(ctx.for_function(false, false))?;
        Ok(ClassStaticBlock { body })
      })?;
      return Ok(ClassMember::StaticBlock(block));
    };

    let cp = self.checkpoint();
    let static_ = a.typ == TT::KeywordStatic && !ends_key(b.typ);
    if static_ {
      self.consume();
    };
    let (kind, async_, generator) = self.method_head();
    let key = self.class_key(ctx)?;
    if kind != MethodKind::Method || async_ || generator || self.peek().typ == TT::ParenthesisOpen {
      let func = self.func(ctx.for_function(async_, generator), async_, generator)?;
      return Ok(ClassMember::Method(Node::new(
        self.since_checkpoint(&cp),
        ClassMethod {
          static_,
          kind,
          key,
          func,
        },
      )));
    };

    // Initializers are evaluated like method bodies, so `await` and `yield` are plain names.
    let value = self
      .consume_if(TT::Equals)
      .and_then(|| self.expr_assign(ctx.for_function(false, false), &[TT::Semicolon, TT::BraceClose]))?;
    self.require_semicolon_or_asi()?;
    Ok(ClassMember::Prop(Node::new(
      self.since_checkpoint(&cp),
      ClassProp {
        static_,
        key,
        value,
      },
    )))
  }

  pub fn class_body(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<ClassMember>> {
    self.require(TT::BraceOpen)?;
    let mut members = Vec::new();
    loop {
      if self.consume_if(TT::BraceClose).is_match() {
        break;
      };
      // Stray semicolons between members are allowed.
      if self.consume_if(TT::Semicolon).is_match() {
        continue;
      };
      members.push(self.class_member(ctx)?);
    }
    Ok(members)
  }

  /// Parses `class Name extends Heritage { ... }` where the name is optional unless `name_required`.
  pub fn class_parts(&mut self, ctx: ParseCtx, name_required: bool) -> SyntaxResult<ClassParts> {
    self.require(TT::KeywordClass)?;
    let t = self.peek();
    let name = if t.typ != TT::KeywordExtends && ctx.rules.is_valid_pattern_identifier(t.typ) {
      self.consume();
      Some(Node::new(t.loc, ClassOrFuncName {
        name: self.string(t.loc),
      }))
    } else if name_required {
      return Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("class name")));
    } else {
      None
    };
    // The heritage is a left-hand-side expression, so stop before any binary operator.
    let extends = self.consume_if(TT::KeywordExtends).and_then(|| {
      let min_prec = OPERATORS[&OperatorName::Call].precedence;
      self.expr_with_min_prec(ctx, min_prec, &[TT::BraceOpen])
    })?;
    let members = self.class_body(ctx)?;
    Ok(ClassParts {
      name,
      extends,
      members,
    })
  }
}
