use parse_js::ast::expr::Expr;
use parse_js::ast::func::FuncBody;
use parse_js::ast::node::Node;
use parse_js::operator::{Associativity, OperatorName, OPERATORS};

/// Wrapper around a precedence value with total ordering.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Prec(u8);

impl Prec {
  pub const LOWEST: Prec = Prec(1);

  pub const fn new(value: u8) -> Self {
    Prec(value)
  }

  pub const fn tighter(self) -> Self {
    Prec(self.0 + 1)
  }

  pub const fn value(self) -> u8 {
    self.0
  }
}

/// Precedence for optional chaining, member access, and call-like operators.
pub const CALL_MEMBER_PRECEDENCE: Prec = Prec::new(18);
/// Precedence for atomic expressions (identifiers, literals, etc.).
pub const PRIMARY_PRECEDENCE: Prec = Prec::new(19);

#[derive(Clone, Copy, Debug)]
pub enum Side {
  Left,
  Right,
}

pub fn operator_prec(op: OperatorName) -> Prec {
  // The table covers every operator name.
  Prec::new(OPERATORS.get(&op).map_or(0, |op| op.precedence))
}

/// Any expression that can appear where an AssignmentExpression is expected.
pub fn assignment_prec() -> Prec {
  operator_prec(OperatorName::Assignment)
}

pub fn child_min_prec_for_binary(op: OperatorName, side: Side) -> Prec {
  let Some(operator) = OPERATORS.get(&op) else {
    return PRIMARY_PRECEDENCE;
  };
  let prec = Prec::new(operator.precedence);
  match (operator.associativity, side) {
    (Associativity::Left, Side::Left) | (Associativity::Right, Side::Right) => prec,
    (Associativity::Left, Side::Right) | (Associativity::Right, Side::Left) => prec.tighter(),
  }
}

/// Returns the precedence of an expression kind, derived from the parser's
/// table so that the printed text re-parses to the same tree.
pub fn expr_prec(expr: &Node<Expr>) -> Prec {
  match expr.stx.as_ref() {
    Expr::Binary(binary) => operator_prec(binary.stx.operator),
    Expr::Cond(_) => operator_prec(OperatorName::Conditional),
    Expr::Unary(unary) => operator_prec(unary.stx.operator),
    Expr::UnaryPostfix(unary) => operator_prec(unary.stx.operator),
    Expr::ArrowFunc(_) | Expr::Yield(_) => assignment_prec(),
    // Always printed with an argument list, which makes it a member expression.
    Expr::New(_) => CALL_MEMBER_PRECEDENCE,
    Expr::Call(_)
    | Expr::Import(_)
    | Expr::Member(_)
    | Expr::ComputedMember(_)
    | Expr::TaggedTemplate(_) => CALL_MEMBER_PRECEDENCE,
    Expr::Class(_)
    | Expr::Func(_)
    | Expr::Id(_)
    | Expr::ImportMeta(_)
    | Expr::NewTarget(_)
    | Expr::PrivateName(_)
    | Expr::Super(_)
    | Expr::This(_)
    | Expr::LitArr(_)
    | Expr::LitBigInt(_)
    | Expr::LitBool(_)
    | Expr::LitNull(_)
    | Expr::LitNum(_)
    | Expr::LitObj(_)
    | Expr::LitRegex(_)
    | Expr::LitStr(_)
    | Expr::LitTemplate(_) => PRIMARY_PRECEDENCE,
  }
}

/// `??` cannot be mixed with `||` or `&&` without parentheses.
pub fn mixes_nullish_with_logical(parent: OperatorName, child: &Node<Expr>) -> bool {
  let Expr::Binary(child) = child.stx.as_ref() else {
    return false;
  };
  let child = child.stx.operator;
  match parent {
    OperatorName::NullishCoalescing => {
      matches!(child, OperatorName::LogicalOr | OperatorName::LogicalAnd)
    }
    OperatorName::LogicalOr | OperatorName::LogicalAnd => {
      child == OperatorName::NullishCoalescing
    }
    _ => false,
  }
}

/// The leftmost expression that ends up first in the printed text, ignoring
/// parentheses this crate may add around it.
pub fn leftmost(expr: &Node<Expr>) -> &Node<Expr> {
  match expr.stx.as_ref() {
    Expr::Binary(binary) => leftmost(&binary.stx.left),
    Expr::Call(call) => leftmost(&call.stx.callee),
    Expr::ComputedMember(member) => leftmost(&member.stx.object),
    Expr::Cond(cond) => leftmost(&cond.stx.test),
    Expr::Member(member) => leftmost(&member.stx.left),
    Expr::TaggedTemplate(tagged) => leftmost(&tagged.stx.function),
    Expr::UnaryPostfix(postfix) => leftmost(&postfix.stx.argument),
    _ => expr,
  }
}

/// Whether an expression statement must be wrapped so it isn't read as a
/// block, a declaration or a `let` declaration.
pub fn expr_stmt_needs_parens(expr: &Node<Expr>) -> bool {
  match leftmost(expr).stx.as_ref() {
    Expr::LitObj(_) | Expr::Func(_) | Expr::Class(_) => true,
    Expr::Id(id) => id.stx.name == "let",
    _ => false,
  }
}

/// An arrow function's expression body starting with `{` would be read as a
/// block body.
pub fn arrow_body_needs_parens(body: &Node<Expr>) -> bool {
  matches!(leftmost(body).stx.as_ref(), Expr::LitObj(_))
}

/// Whether `in` appears outside parentheses and function bodies, which
/// matters inside a `for (...;` head.
pub fn contains_bare_in(expr: &Node<Expr>) -> bool {
  match expr.stx.as_ref() {
    Expr::Binary(binary) => {
      binary.stx.operator == OperatorName::In
        || contains_bare_in(&binary.stx.left)
        || contains_bare_in(&binary.stx.right)
    }
    Expr::Cond(cond) => {
      contains_bare_in(&cond.stx.test)
        || contains_bare_in(&cond.stx.consequent)
        || contains_bare_in(&cond.stx.alternate)
    }
    Expr::Yield(yield_) => yield_.stx.argument.as_ref().is_some_and(contains_bare_in),
    Expr::ArrowFunc(arrow) => match &arrow.stx.func.stx.body {
      FuncBody::Expression(body) => contains_bare_in(body),
      FuncBody::Block(_) => false,
    },
    _ => false,
  }
}

/// `new a()()` calls the result of `new a()`, so a callee that contains a
/// call (or an optional chain) must be parenthesised.
pub fn new_callee_needs_parens(callee: &Node<Expr>) -> bool {
  match callee.stx.as_ref() {
    // `new import(x)` is not a thing.
    Expr::Call(_) | Expr::Import(_) => true,
    Expr::Member(member) => {
      member.stx.optional_chaining || new_callee_needs_parens(&member.stx.left)
    }
    Expr::ComputedMember(member) => {
      member.stx.optional_chaining || new_callee_needs_parens(&member.stx.object)
    }
    Expr::TaggedTemplate(tagged) => new_callee_needs_parens(&tagged.stx.function),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn binary_children_respect_associativity() {
    let add = operator_prec(OperatorName::Addition);
    assert_eq!(child_min_prec_for_binary(OperatorName::Addition, Side::Left), add);
    assert_eq!(
      child_min_prec_for_binary(OperatorName::Addition, Side::Right),
      add.tighter()
    );
    let exp = operator_prec(OperatorName::Exponentiation);
    assert_eq!(
      child_min_prec_for_binary(OperatorName::Exponentiation, Side::Left),
      exp.tighter()
    );
    assert_eq!(child_min_prec_for_binary(OperatorName::Exponentiation, Side::Right), exp);
  }

  #[test]
  fn member_and_primary_levels_line_up_with_the_table() {
    assert_eq!(operator_prec(OperatorName::Call), CALL_MEMBER_PRECEDENCE);
    assert!(PRIMARY_PRECEDENCE > CALL_MEMBER_PRECEDENCE);
    assert_eq!(operator_prec(OperatorName::Comma), Prec::LOWEST);
  }
}
