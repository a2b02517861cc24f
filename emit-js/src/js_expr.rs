use parse_js::ast::expr::lit::{LitArrElem, LitArrExpr, LitNumExpr, LitObjExpr, LitTemplatePart};
use parse_js::ast::class_or_object::{ClassMember, MethodKind, ObjKey, ObjMember};
use parse_js::ast::expr::{
  ArrowFuncExpr, BinaryExpr, CallArg, CallExpr, ClassExpr, ComputedMemberExpr, CondExpr, Expr,
  FuncExpr, ImportExpr, MemberExpr, NewExpr, TaggedTemplateExpr, UnaryExpr, UnaryPostfixExpr,
  YieldExpr,
};
use parse_js::ast::func::{Func, FuncBody};
use parse_js::ast::node::Node;
use parse_js::operator::OperatorName;

use crate::emitter::{with_node_context, EmitError, EmitResult};
use crate::escape::is_plain_identifier_name;
use crate::js_pat::emit_js_param_list;
use crate::js_stmt::emit_js_block_body;
use crate::precedence::{
  arrow_body_needs_parens, assignment_prec, child_min_prec_for_binary, expr_prec,
  mixes_nullish_with_logical, new_callee_needs_parens, operator_prec, Prec, Side,
  CALL_MEMBER_PRECEDENCE,
};
use crate::Emitter;

struct JsExprEmitter<'a> {
  out: &'a mut Emitter,
}

impl<'a> JsExprEmitter<'a> {
  fn emit_expr_with_min_prec(&mut self, expr: &Node<Expr>, min_prec: Prec) -> EmitResult {
    let needs_parens = expr_prec(expr) < min_prec;
    if needs_parens {
      self.out.write_punct("(");
    }
    with_node_context(expr.loc, || self.emit_expr_no_parens(expr))?;
    if needs_parens {
      self.out.write_punct(")");
    }
    Ok(())
  }

  fn emit_parenthesised(&mut self, expr: &Node<Expr>) -> EmitResult {
    self.out.write_punct("(");
    self.emit_expr_with_min_prec(expr, Prec::LOWEST)?;
    self.out.write_punct(")");
    Ok(())
  }

  fn emit_expr_no_parens(&mut self, expr: &Node<Expr>) -> EmitResult {
    match expr.stx.as_ref() {
      Expr::ArrowFunc(arrow) => self.emit_arrow_func(arrow),
      Expr::Binary(binary) => self.emit_binary(binary),
      Expr::Call(call) => self.emit_call(call),
      Expr::Class(class) => self.emit_class_expr(class),
      Expr::ComputedMember(member) => self.emit_computed_member(member),
      Expr::Cond(cond) => self.emit_cond(cond),
      Expr::Func(func) => self.emit_func_expr(func),
      Expr::Id(id) => {
        self.out.write_identifier(&id.stx.name);
        Ok(())
      }
      Expr::Import(import) => self.emit_import(import),
      Expr::ImportMeta(_) => {
        self.out.write_keyword("import");
        self.out.write_punct(".");
        self.out.write_identifier("meta");
        Ok(())
      }
      Expr::Member(member) => self.emit_member(member),
      Expr::New(new) => self.emit_new(new),
      Expr::NewTarget(_) => {
        self.out.write_keyword("new");
        self.out.write_punct(".");
        self.out.write_identifier("target");
        Ok(())
      }
      Expr::PrivateName(name) => {
        self.out.write_identifier(&name.stx.name);
        Ok(())
      }
      Expr::Super(_) => {
        self.out.write_keyword("super");
        Ok(())
      }
      Expr::TaggedTemplate(tagged) => self.emit_tagged_template(tagged),
      Expr::This(_) => {
        self.out.write_keyword("this");
        Ok(())
      }
      Expr::Unary(unary) => self.emit_unary(unary),
      Expr::UnaryPostfix(unary) => self.emit_unary_postfix(unary),
      Expr::Yield(yield_) => self.emit_yield(yield_),
      Expr::LitArr(arr) => self.emit_lit_arr(arr),
      Expr::LitBigInt(lit) => {
        self.out.write_number(&format!("{}n", lit.stx.value));
        Ok(())
      }
      Expr::LitBool(lit) => {
        self
          .out
          .write_keyword(if lit.stx.value { "true" } else { "false" });
        Ok(())
      }
      Expr::LitNull(_) => {
        self.out.write_keyword("null");
        Ok(())
      }
      Expr::LitNum(lit) => {
        self.out.write_number(&render_number(lit.stx.value.0));
        Ok(())
      }
      Expr::LitObj(obj) => self.emit_lit_obj(obj),
      Expr::LitRegex(lit) => {
        self.out.write_str(&lit.stx.value);
        Ok(())
      }
      Expr::LitStr(lit) => {
        self.out.write_string_literal(&lit.stx.value);
        Ok(())
      }
      Expr::LitTemplate(lit) => self.emit_template_parts(&lit.stx.parts),
    }
  }

  fn emit_arrow_func(&mut self, arrow: &Node<ArrowFuncExpr>) -> EmitResult {
    let func = arrow.stx.func.stx.as_ref();
    if func.async_ {
      self.out.write_keyword("async");
      self.out.write_soft_space();
    }
    emit_js_param_list(self.out, &func.parameters)?;
    self.out.write_soft_space();
    self.out.write_punct("=>");
    self.out.write_soft_space();
    match &func.body {
      FuncBody::Block(body) => emit_js_block_body(self.out, body),
      FuncBody::Expression(body) if arrow_body_needs_parens(body) => self.emit_parenthesised(body),
      FuncBody::Expression(body) => self.emit_expr_with_min_prec(body, assignment_prec()),
    }
  }

  fn emit_binary(&mut self, binary: &Node<BinaryExpr>) -> EmitResult {
    let operator = binary.stx.operator;
    let left = &binary.stx.left;
    let right = &binary.stx.right;

    // `-a ** b` is a syntax error, the base must be parenthesised.
    let left_forced = (operator == OperatorName::Exponentiation
      && matches!(left.stx.as_ref(), Expr::Unary(_)))
      || mixes_nullish_with_logical(operator, left);
    if left_forced {
      self.emit_parenthesised(left)?;
    } else {
      self.emit_expr_with_min_prec(left, child_min_prec_for_binary(operator, Side::Left))?;
    }

    if operator != OperatorName::Comma {
      self.out.write_soft_space();
    }
    emit_binary_operator(self.out, operator)?;
    self.out.write_soft_space();

    if mixes_nullish_with_logical(operator, right) {
      self.emit_parenthesised(right)
    } else {
      self.emit_expr_with_min_prec(right, child_min_prec_for_binary(operator, Side::Right))
    }
  }

  fn emit_call_args(&mut self, args: &[Node<CallArg>]) -> EmitResult {
    self.out.write_punct("(");
    self.out.emit_punctuated_list(args, ",", |out, arg| {
      if arg.stx.spread {
        out.write_punct("...");
      }
      emit_js_expr_with_min_prec(out, &arg.stx.value, assignment_prec())
    })?;
    self.out.write_punct(")");
    Ok(())
  }

  fn emit_call(&mut self, call: &Node<CallExpr>) -> EmitResult {
    self.emit_expr_with_min_prec(&call.stx.callee, CALL_MEMBER_PRECEDENCE)?;
    if call.stx.optional_chaining {
      self.out.write_punct("?.");
    }
    self.emit_call_args(&call.stx.arguments)
  }

  fn emit_class_expr(&mut self, class: &Node<ClassExpr>) -> EmitResult {
    let name = class.stx.name.as_ref().map(|name| name.stx.name.as_str());
    emit_js_class(self.out, name, class.stx.extends.as_ref(), &class.stx.members)
  }

  fn emit_import(&mut self, import: &Node<ImportExpr>) -> EmitResult {
    self.out.write_keyword("import");
    self.out.write_punct("(");
    self.emit_expr_with_min_prec(&import.stx.module, assignment_prec())?;
    if let Some(options) = &import.stx.options {
      self.out.write_comma();
      self.emit_expr_with_min_prec(options, assignment_prec())?;
    }
    self.out.write_punct(")");
    Ok(())
  }

  fn emit_new(&mut self, new: &Node<NewExpr>) -> EmitResult {
    self.out.write_keyword("new");
    if new_callee_needs_parens(&new.stx.callee) {
      self.emit_parenthesised(&new.stx.callee)?;
    } else {
      self.emit_expr_with_min_prec(&new.stx.callee, CALL_MEMBER_PRECEDENCE)?;
    }
    self.emit_call_args(&new.stx.arguments)
  }

  fn emit_member(&mut self, member: &Node<MemberExpr>) -> EmitResult {
    match member.stx.left.stx.as_ref() {
      Expr::LitNum(num) if !member.stx.optional_chaining => self.emit_number_receiver(num),
      _ => self.emit_expr_with_min_prec(&member.stx.left, CALL_MEMBER_PRECEDENCE)?,
    };
    self
      .out
      .write_punct(if member.stx.optional_chaining { "?." } else { "." });
    self.out.write_identifier(&member.stx.right);
    Ok(())
  }

  // `1.x` would lex as the number `1.` followed by `x`.
  fn emit_number_receiver(&mut self, num: &Node<LitNumExpr>) {
    let rendered = render_number(num.stx.value.0);
    self.out.write_number(&rendered);
    if rendered.bytes().all(|b| b.is_ascii_digit()) {
      self.out.write_punct(".");
    }
  }

  fn emit_computed_member(&mut self, member: &Node<ComputedMemberExpr>) -> EmitResult {
    self.emit_expr_with_min_prec(&member.stx.object, CALL_MEMBER_PRECEDENCE)?;
    if member.stx.optional_chaining {
      self.out.write_punct("?.");
    }
    self.out.write_punct("[");
    self.emit_expr_with_min_prec(&member.stx.member, Prec::LOWEST)?;
    self.out.write_punct("]");
    Ok(())
  }

  fn emit_cond(&mut self, cond: &Node<CondExpr>) -> EmitResult {
    let cond_prec = operator_prec(OperatorName::Conditional);
    self.emit_expr_with_min_prec(&cond.stx.test, cond_prec.tighter())?;
    self.out.write_soft_space();
    self.out.write_punct("?");
    self.out.write_soft_space();
    self.emit_expr_with_min_prec(&cond.stx.consequent, assignment_prec())?;
    self.out.write_soft_space();
    self.out.write_punct(":");
    self.out.write_soft_space();
    self.emit_expr_with_min_prec(&cond.stx.alternate, assignment_prec())
  }

  fn emit_func_expr(&mut self, func: &Node<FuncExpr>) -> EmitResult {
    let name = func.stx.name.as_ref().map(|name| name.stx.name.as_str());
    emit_js_func(self.out, name, &func.stx.func)
  }

  fn emit_tagged_template(&mut self, tagged: &Node<TaggedTemplateExpr>) -> EmitResult {
    self.emit_expr_with_min_prec(&tagged.stx.function, CALL_MEMBER_PRECEDENCE)?;
    self.emit_template_parts(&tagged.stx.parts)
  }

  // String parts are raw source text, so they are written back untouched.
  fn emit_template_parts(&mut self, parts: &[LitTemplatePart]) -> EmitResult {
    self.out.write_punct("`");
    for part in parts {
      match part {
        LitTemplatePart::String(raw) => self.out.write_raw_str(raw),
        LitTemplatePart::Substitution(expr) => {
          self.out.write_raw_str("${");
          self.emit_expr_with_min_prec(expr, Prec::LOWEST)?;
          self.out.write_raw_str("}");
        }
      }
    }
    self.out.write_raw_str("`");
    Ok(())
  }

  fn emit_unary(&mut self, unary: &Node<UnaryExpr>) -> EmitResult {
    let operator = unary.stx.operator;
    emit_unary_operator(self.out, operator)?;
    if matches!(
      unary.stx.argument.stx.as_ref(),
      Expr::Binary(inner) if inner.stx.operator == OperatorName::Exponentiation
    ) {
      return self.emit_parenthesised(&unary.stx.argument);
    }
    self.emit_expr_with_min_prec(&unary.stx.argument, operator_prec(operator))
  }

  fn emit_unary_postfix(&mut self, unary: &Node<UnaryPostfixExpr>) -> EmitResult {
    let operator = unary.stx.operator;
    self.emit_expr_with_min_prec(&unary.stx.argument, operator_prec(operator).tighter())?;
    emit_unary_operator(self.out, operator)
  }

  fn emit_yield(&mut self, yield_: &Node<YieldExpr>) -> EmitResult {
    self.out.write_keyword("yield");
    if yield_.stx.delegate {
      self.out.write_punct("*");
    }
    if let Some(argument) = &yield_.stx.argument {
      self.out.write_soft_space();
      self.emit_expr_with_min_prec(argument, assignment_prec())?;
    }
    Ok(())
  }

  fn emit_lit_arr(&mut self, arr: &Node<LitArrExpr>) -> EmitResult {
    let elements = &arr.stx.elements;
    self.out.write_punct("[");
    self.out.emit_punctuated_list(elements, ",", |out, elem| match elem {
      LitArrElem::Single(value) => emit_js_expr_with_min_prec(out, value, assignment_prec()),
      LitArrElem::Spread(value) => {
        out.write_punct("...");
        emit_js_expr_with_min_prec(out, value, assignment_prec())
      }
      LitArrElem::Empty => Ok(()),
    })?;
    // A trailing hole needs its own comma, otherwise the length shrinks.
    if matches!(elements.last(), Some(LitArrElem::Empty)) {
      self.out.write_punct(",");
    }
    self.out.write_punct("]");
    Ok(())
  }

  fn emit_lit_obj(&mut self, obj: &Node<LitObjExpr>) -> EmitResult {
    let members = &obj.stx.members;
    self.out.write_punct("{");
    if !members.is_empty() {
      self.out.write_soft_space();
    }
    self.out.emit_punctuated_list(members, ",", |out, member| {
      with_node_context(member.loc, || emit_obj_member(out, &member.stx))
    })?;
    if !members.is_empty() {
      self.out.write_soft_space();
    }
    self.out.write_punct("}");
    Ok(())
  }
}

fn emit_obj_member(out: &mut Emitter, member: &ObjMember) -> EmitResult {
  match member {
    ObjMember::Prop { key, value } => {
      emit_obj_key(out, key)?;
      out.write_punct(":");
      out.write_soft_space();
      emit_js_expr_with_min_prec(out, value, assignment_prec())
    }
    ObjMember::Method { kind, key, func } => emit_method(out, *kind, key, func),
    ObjMember::Shorthand { id } => {
      out.write_identifier(&id.stx.name);
      Ok(())
    }
    ObjMember::Spread { value } => {
      out.write_punct("...");
      emit_js_expr_with_min_prec(out, value, assignment_prec())
    }
  }
}

fn emit_method(out: &mut Emitter, kind: MethodKind, key: &ObjKey, func: &Node<Func>) -> EmitResult {
  match kind {
    MethodKind::Getter => out.write_keyword("get"),
    MethodKind::Setter => out.write_keyword("set"),
    MethodKind::Method => {
      if func.stx.async_ {
        out.write_keyword("async");
      }
      if func.stx.generator {
        out.write_punct("*");
      }
    }
  };
  emit_obj_key(out, key)?;
  emit_func_signature_and_body(out, &func.stx)
}

fn emit_class_member(out: &mut Emitter, member: &ClassMember) -> EmitResult {
  match member {
    ClassMember::Method(method) => with_node_context(method.loc, || {
      if method.stx.static_ {
        out.write_keyword("static");
      }
      emit_method(out, method.stx.kind, &method.stx.key, &method.stx.func)
    }),
    ClassMember::Prop(prop) => with_node_context(prop.loc, || {
      if prop.stx.static_ {
        out.write_keyword("static");
      }
      emit_obj_key(out, &prop.stx.key)?;
      if let Some(value) = &prop.stx.value {
        out.write_soft_space();
        out.write_punct("=");
        out.write_soft_space();
        emit_js_expr_with_min_prec(out, value, assignment_prec())?;
      }
      // Always terminated, so the next member's name or `[` never continues the initializer.
      out.write_semicolon();
      Ok(())
    }),
    ClassMember::StaticBlock(block) => with_node_context(block.loc, || {
      out.write_keyword("static");
      out.write_soft_space();
      emit_js_block_body(out, &block.stx.body)
    }),
  }
}

/// Emits a class expression or declaration: `class`, optional name, heritage and members, one per line.
pub(crate) fn emit_js_class(
  out: &mut Emitter,
  name: Option<&str>,
  extends: Option<&Node<Expr>>,
  members: &[ClassMember],
) -> EmitResult {
  out.write_keyword("class");
  if let Some(name) = name {
    out.write_identifier(name);
  }
  if let Some(extends) = extends {
    out.write_keyword("extends");
    // The heritage is a left-hand-side expression.
    emit_js_expr_with_min_prec(out, extends, CALL_MEMBER_PRECEDENCE)?;
  }
  out.write_soft_space();
  out.write_punct("{");
  out.indent();
  for member in members {
    out.write_line_break();
    emit_class_member(out, member)?;
  }
  out.dedent();
  if !members.is_empty() {
    out.write_line_break();
  }
  out.write_punct("}");
  Ok(())
}

pub(crate) fn emit_obj_key(out: &mut Emitter, key: &ObjKey) -> EmitResult {
  match key {
    ObjKey::Direct(name) => out.write_identifier(name),
    ObjKey::Str(value) if is_plain_identifier_name(value) => out.write_identifier(value),
    ObjKey::Str(value) => out.write_string_literal(value),
    ObjKey::Num(value) => out.write_number(&render_number(value.0)),
    ObjKey::Private(name) => out.write_identifier(name),
    ObjKey::Computed(expr) => {
      out.write_punct("[");
      emit_js_expr_with_min_prec(out, expr, assignment_prec())?;
      out.write_punct("]");
    }
  };
  Ok(())
}

/// Emits a function expression or declaration head and body: `function`,
/// modifiers, optional name, parameters and block.
pub(crate) fn emit_js_func(out: &mut Emitter, name: Option<&str>, func: &Node<Func>) -> EmitResult {
  let func = func.stx.as_ref();
  if func.async_ {
    out.write_keyword("async");
  }
  out.write_keyword("function");
  if func.generator {
    out.write_punct("*");
  }
  if let Some(name) = name {
    out.write_soft_space();
    out.write_identifier(name);
  }
  emit_func_signature_and_body(out, func)
}

fn emit_func_signature_and_body(out: &mut Emitter, func: &Func) -> EmitResult {
  emit_js_param_list(out, &func.parameters)?;
  out.write_soft_space();
  match &func.body {
    FuncBody::Block(body) => emit_js_block_body(out, body),
    FuncBody::Expression(_) => Err(EmitError::unsupported(
      "an expression body outside of an arrow function",
    )),
  }
}

pub fn emit_js_expr(out: &mut Emitter, expr: &Node<Expr>) -> EmitResult {
  emit_js_expr_with_min_prec(out, expr, Prec::LOWEST)
}

pub fn emit_js_expr_with_min_prec(
  out: &mut Emitter,
  expr: &Node<Expr>,
  min_prec: Prec,
) -> EmitResult {
  JsExprEmitter { out }.emit_expr_with_min_prec(expr, min_prec)
}

/// Renders a number the way `Number.prototype.toString` does, except that
/// exponents carry no `+` sign. Literals are never negative or NaN.
pub fn render_number(value: f64) -> String {
  if value == 0.0 {
    return "0".to_string();
  }
  if value.is_infinite() {
    // Overflows to Infinity when parsed, without relying on the global binding.
    return "1e999".to_string();
  }
  // Rust's shortest round-trip digits, e.g. `1.2345e3`.
  let sci = format!("{:e}", value);
  let (mantissa, exponent) = sci.split_once('e').unwrap_or((&sci, "0"));
  let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
  let exponent: i64 = exponent.parse().unwrap_or(0);
  let k = digits.len() as i64;
  // Position of the decimal point relative to the first digit.
  let n = exponent + 1;
  if k <= n && n <= 21 {
    format!("{}{}", digits, "0".repeat((n - k) as usize))
  } else if 0 < n && n <= 21 {
    let (int, frac) = digits.split_at(n as usize);
    format!("{}.{}", int, frac)
  } else if -6 < n && n <= 0 {
    format!("0.{}{}", "0".repeat((-n) as usize), digits)
  } else if k == 1 {
    format!("{}e{}", digits, n - 1)
  } else {
    format!("{}.{}e{}", &digits[..1], &digits[1..], n - 1)
  }
}

enum OperatorToken {
  Keyword(&'static str),
  Punct(&'static str),
}

fn emit_binary_operator(out: &mut Emitter, operator: OperatorName) -> EmitResult {
  let token = match operator {
    OperatorName::Addition => OperatorToken::Punct("+"),
    OperatorName::Subtraction => OperatorToken::Punct("-"),
    OperatorName::Multiplication => OperatorToken::Punct("*"),
    OperatorName::Division => OperatorToken::Punct("/"),
    OperatorName::Remainder => OperatorToken::Punct("%"),
    OperatorName::Exponentiation => OperatorToken::Punct("**"),
    OperatorName::LessThan => OperatorToken::Punct("<"),
    OperatorName::LessThanOrEqual => OperatorToken::Punct("<="),
    OperatorName::GreaterThan => OperatorToken::Punct(">"),
    OperatorName::GreaterThanOrEqual => OperatorToken::Punct(">="),
    OperatorName::Equality => OperatorToken::Punct("=="),
    OperatorName::Inequality => OperatorToken::Punct("!="),
    OperatorName::StrictEquality => OperatorToken::Punct("==="),
    OperatorName::StrictInequality => OperatorToken::Punct("!=="),
    OperatorName::BitwiseAnd => OperatorToken::Punct("&"),
    OperatorName::BitwiseOr => OperatorToken::Punct("|"),
    OperatorName::BitwiseXor => OperatorToken::Punct("^"),
    OperatorName::BitwiseLeftShift => OperatorToken::Punct("<<"),
    OperatorName::BitwiseRightShift => OperatorToken::Punct(">>"),
    OperatorName::BitwiseUnsignedRightShift => OperatorToken::Punct(">>>"),
    OperatorName::LogicalAnd => OperatorToken::Punct("&&"),
    OperatorName::LogicalOr => OperatorToken::Punct("||"),
    OperatorName::NullishCoalescing => OperatorToken::Punct("??"),
    OperatorName::In => OperatorToken::Keyword("in"),
    OperatorName::Instanceof => OperatorToken::Keyword("instanceof"),
    OperatorName::Comma => OperatorToken::Punct(","),
    OperatorName::Assignment => OperatorToken::Punct("="),
    OperatorName::AssignmentAddition => OperatorToken::Punct("+="),
    OperatorName::AssignmentBitwiseAnd => OperatorToken::Punct("&="),
    OperatorName::AssignmentBitwiseLeftShift => OperatorToken::Punct("<<="),
    OperatorName::AssignmentBitwiseOr => OperatorToken::Punct("|="),
    OperatorName::AssignmentBitwiseRightShift => OperatorToken::Punct(">>="),
    OperatorName::AssignmentBitwiseUnsignedRightShift => OperatorToken::Punct(">>>="),
    OperatorName::AssignmentBitwiseXor => OperatorToken::Punct("^="),
    OperatorName::AssignmentDivision => OperatorToken::Punct("/="),
    OperatorName::AssignmentExponentiation => OperatorToken::Punct("**="),
    OperatorName::AssignmentLogicalAnd => OperatorToken::Punct("&&="),
    OperatorName::AssignmentLogicalOr => OperatorToken::Punct("||="),
    OperatorName::AssignmentMultiplication => OperatorToken::Punct("*="),
    OperatorName::AssignmentNullishCoalescing => OperatorToken::Punct("??="),
    OperatorName::AssignmentRemainder => OperatorToken::Punct("%="),
    OperatorName::AssignmentSubtraction => OperatorToken::Punct("-="),
    _ => return Err(EmitError::unsupported("a non-binary operator in a binary expression")),
  };
  write_operator_token(out, token);
  Ok(())
}

fn emit_unary_operator(out: &mut Emitter, operator: OperatorName) -> EmitResult {
  let token = match operator {
    OperatorName::LogicalNot => OperatorToken::Punct("!"),
    OperatorName::BitwiseNot => OperatorToken::Punct("~"),
    OperatorName::UnaryPlus => OperatorToken::Punct("+"),
    OperatorName::UnaryNegation => OperatorToken::Punct("-"),
    OperatorName::PrefixIncrement | OperatorName::PostfixIncrement => OperatorToken::Punct("++"),
    OperatorName::PrefixDecrement | OperatorName::PostfixDecrement => OperatorToken::Punct("--"),
    OperatorName::Typeof => OperatorToken::Keyword("typeof"),
    OperatorName::Void => OperatorToken::Keyword("void"),
    OperatorName::Delete => OperatorToken::Keyword("delete"),
    OperatorName::Await => OperatorToken::Keyword("await"),
    _ => return Err(EmitError::unsupported("a non-unary operator in a unary expression")),
  };
  write_operator_token(out, token);
  Ok(())
}

fn write_operator_token(out: &mut Emitter, token: OperatorToken) {
  match token {
    OperatorToken::Keyword(keyword) => out.write_keyword(keyword),
    OperatorToken::Punct(punct) => out.write_punct(punct),
  }
}

#[cfg(test)]
mod tests {
  use super::render_number;

  #[test]
  fn renders_numbers_like_javascript() {
    assert_eq!(render_number(0.0), "0");
    assert_eq!(render_number(1.0), "1");
    assert_eq!(render_number(255.0), "255");
    assert_eq!(render_number(1.5), "1.5");
    assert_eq!(render_number(0.001), "0.001");
    assert_eq!(render_number(1e21), "1e21");
    assert_eq!(render_number(1e20), "100000000000000000000");
    assert_eq!(render_number(1.5e-7), "1.5e-7");
    assert_eq!(render_number(123456.789), "123456.789");
    assert_eq!(render_number(f64::INFINITY), "1e999");
  }
}
