use crate::config::PatternSpec;
use crate::global::is_global_named;
use crate::pattern::match_probe;
use crate::pattern::ProbeKind;
use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::num::JsNumber;
use parse_js::operator::OperatorName;

/// A statically known JavaScript primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum JsValue {
  Undefined,
  Boolean(bool),
  Number(JsNumber),
  String(String),
  Null,
}

impl JsValue {
  /// JavaScript ToBoolean.
  pub fn to_boolean(&self) -> bool {
    match self {
      JsValue::Undefined | JsValue::Null => false,
      JsValue::Boolean(b) => *b,
      JsValue::Number(n) => n.is_truthy(),
      JsValue::String(s) => !s.is_empty(),
    }
  }

  pub fn type_of(&self) -> &'static str {
    match self {
      JsValue::Undefined => "undefined",
      JsValue::Boolean(_) => "boolean",
      JsValue::Number(_) => "number",
      JsValue::String(_) => "string",
      JsValue::Null => "object",
    }
  }

  fn is_nullish(&self) -> bool {
    matches!(self, JsValue::Undefined | JsValue::Null)
  }

  /// `===`. Unlike `JsNumber`'s `Eq`, NaN is unequal to itself and the zeros
  /// are equal.
  pub fn strict_equals(&self, other: &JsValue) -> bool {
    match (self, other) {
      (JsValue::Undefined, JsValue::Undefined) | (JsValue::Null, JsValue::Null) => true,
      (JsValue::Boolean(a), JsValue::Boolean(b)) => a == b,
      (JsValue::Number(a), JsValue::Number(b)) => a.0 == b.0,
      (JsValue::String(a), JsValue::String(b)) => a == b,
      _ => false,
    }
  }

  /// `==`, only where no type coercion between kinds is involved. Returns
  /// `None` otherwise.
  pub fn loose_equals(&self, other: &JsValue) -> Option<bool> {
    if self.is_nullish() && other.is_nullish() {
      return Some(true);
    };
    if std::mem::discriminant(self) == std::mem::discriminant(other) {
      return Some(self.strict_equals(other));
    };
    None
  }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EvalResult {
  /// Nothing is known.
  Unknown,
  /// The operands are known, but the result was not folded.
  Wildcard,
  Concrete(JsValue),
}

impl EvalResult {
  /// The value as a branch condition. Only concrete results decide a branch.
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      EvalResult::Concrete(v) => Some(v.to_boolean()),
      EvalResult::Unknown | EvalResult::Wildcard => None,
    }
  }

  /// Combines two operands with `op`. Unknown wins over Wildcard, which wins
  /// over concrete values.
  fn combine(
    left: EvalResult,
    right: EvalResult,
    op: impl FnOnce(&JsValue, &JsValue) -> Option<bool>,
  ) -> EvalResult {
    match (left, right) {
      (EvalResult::Unknown, _) | (_, EvalResult::Unknown) => EvalResult::Unknown,
      (EvalResult::Wildcard, _) | (_, EvalResult::Wildcard) => EvalResult::Wildcard,
      (EvalResult::Concrete(l), EvalResult::Concrete(r)) => match op(&l, &r) {
        Some(b) => EvalResult::Concrete(JsValue::Boolean(b)),
        None => EvalResult::Wildcard,
      },
    }
  }
}

/// Evaluates `expr` treating probes as absent. Total: shapes it doesn't
/// understand are Unknown.
pub fn evaluate(expr: &Node<Expr>, spec: &PatternSpec) -> EvalResult {
  if let Some(kind) = match_probe(expr, spec) {
    return EvalResult::Concrete(match kind {
      ProbeKind::Member => JsValue::Undefined,
      ProbeKind::In => JsValue::Boolean(false),
    });
  };
  match expr.stx.as_ref() {
    Expr::LitBool(lit) => EvalResult::Concrete(JsValue::Boolean(lit.stx.value)),
    Expr::LitNum(lit) => EvalResult::Concrete(JsValue::Number(lit.stx.value)),
    Expr::LitStr(lit) => EvalResult::Concrete(JsValue::String(lit.stx.value.clone())),
    Expr::LitNull(_) => EvalResult::Concrete(JsValue::Null),
    Expr::Id(_) if is_global_named(expr, "undefined") => EvalResult::Concrete(JsValue::Undefined),
    Expr::Unary(unary) => {
      let EvalResult::Concrete(arg) = evaluate(&unary.stx.argument, spec) else {
        return EvalResult::Unknown;
      };
      match unary.stx.operator {
        OperatorName::LogicalNot => EvalResult::Concrete(JsValue::Boolean(!arg.to_boolean())),
        OperatorName::Typeof => EvalResult::Concrete(JsValue::String(arg.type_of().to_string())),
        _ => EvalResult::Unknown,
      }
    }
    Expr::Binary(binary) => {
      let (strict, negated) = match binary.stx.operator {
        OperatorName::StrictEquality => (true, false),
        OperatorName::StrictInequality => (true, true),
        OperatorName::Equality => (false, false),
        OperatorName::Inequality => (false, true),
        _ => return EvalResult::Unknown,
      };
      EvalResult::combine(
        evaluate(&binary.stx.left, spec),
        evaluate(&binary.stx.right, spec),
        |l, r| {
          let equal = if strict {
            Some(l.strict_equals(r))
          } else {
            l.loose_equals(r)
          };
          equal.map(|equal| equal != negated)
        },
      )
    }
    _ => EvalResult::Unknown,
  }
}

#[cfg(test)]
mod tests {
  use super::evaluate;
  use super::EvalResult;
  use super::JsValue;
  use crate::config::PatternSpec;
  use parse_js::ast::stmt::Stmt;
  use parse_js::num::JsNumber;
  use parse_js::parse;
  use symbol_js::compute_symbols;
  use symbol_js::TopLevelMode;

  fn eval(src: &str) -> EvalResult {
    let mut top = parse(src).unwrap();
    compute_symbols(&mut top, TopLevelMode::Global);
    match top.stx.body.last().unwrap().stx.as_ref() {
      Stmt::Expr(stmt) => evaluate(&stmt.stx.expr, &PatternSpec::default()),
      other => panic!("expected expression statement, got {other:?}"),
    }
  }

  fn concrete_bool(b: bool) -> EvalResult {
    EvalResult::Concrete(JsValue::Boolean(b))
  }

  #[test]
  fn test_probes() {
    assert_eq!(eval("module.hot;"), EvalResult::Concrete(JsValue::Undefined));
    assert_eq!(eval("module['hot'];"), EvalResult::Concrete(JsValue::Undefined));
    assert_eq!(eval("'hot' in module;"), concrete_bool(false));
  }

  #[test]
  fn test_literals() {
    assert_eq!(eval("null;"), EvalResult::Concrete(JsValue::Null));
    assert_eq!(eval("'a';"), EvalResult::Concrete(JsValue::String("a".to_string())));
    assert_eq!(eval("1.5;"), EvalResult::Concrete(JsValue::Number(JsNumber(1.5))));
    assert_eq!(eval("true;"), concrete_bool(true));
    assert_eq!(eval("undefined;"), EvalResult::Concrete(JsValue::Undefined));
    assert_eq!(eval("let undefined = 1; undefined;"), EvalResult::Unknown);
  }

  #[test]
  fn test_unary() {
    assert_eq!(eval("!module.hot;"), concrete_bool(true));
    assert_eq!(eval("!!module.hot;"), concrete_bool(false));
    assert_eq!(eval("!('hot' in module);"), concrete_bool(true));
    assert_eq!(
      eval("typeof module.hot;"),
      EvalResult::Concrete(JsValue::String("undefined".to_string()))
    );
    assert_eq!(eval("typeof null;"), EvalResult::Concrete(JsValue::String("object".to_string())));
    assert_eq!(eval("!foo;"), EvalResult::Unknown);
    assert_eq!(eval("-1;"), EvalResult::Unknown);
    assert_eq!(eval("!(module.hot == false);"), EvalResult::Unknown);
  }

  #[test]
  fn test_strict_comparisons() {
    assert_eq!(eval("module.hot === undefined;"), concrete_bool(true));
    assert_eq!(eval("module.hot !== undefined;"), concrete_bool(false));
    assert_eq!(eval("module.hot === null;"), concrete_bool(false));
    assert_eq!(eval("typeof module.hot === 'undefined';"), concrete_bool(true));
    assert_eq!(eval("typeof module.hot !== 'object';"), concrete_bool(true));
  }

  #[test]
  fn test_loose_comparisons() {
    assert_eq!(eval("module.hot == null;"), concrete_bool(true));
    assert_eq!(eval("module.hot != undefined;"), concrete_bool(false));
    assert_eq!(eval("module.hot == false;"), EvalResult::Wildcard);
    assert_eq!(eval("'hot' in module == false;"), concrete_bool(true));
    assert_eq!(eval("'hot' in module != 0;"), EvalResult::Wildcard);
  }

  #[test]
  fn test_combination_order() {
    assert_eq!(eval("module.hot == foo;"), EvalResult::Unknown);
    assert_eq!(eval("(module.hot == false) === true;"), EvalResult::Wildcard);
    assert_eq!(eval("(module.hot == false) === foo;"), EvalResult::Unknown);
  }

  #[test]
  fn test_opaque_shapes() {
    assert_eq!(eval("module.hot && a;"), EvalResult::Unknown);
    assert_eq!(eval("f(module.hot);"), EvalResult::Unknown);
    assert_eq!(eval("module.other;"), EvalResult::Unknown);
    assert_eq!(eval("var module; module.hot;"), EvalResult::Unknown);
  }

  #[test]
  fn test_number_semantics() {
    let nan = JsValue::Number(JsNumber(f64::NAN));
    assert!(!nan.strict_equals(&nan));
    assert!(JsValue::Number(JsNumber(0.0)).strict_equals(&JsValue::Number(JsNumber(-0.0))));
    assert!(!nan.to_boolean());
    assert!(!JsValue::String(String::new()).to_boolean());
    assert_eq!(
      JsValue::Number(JsNumber(1.0)).loose_equals(&JsValue::String("1".to_string())),
      None
    );
  }

  #[test]
  fn test_as_bool() {
    assert_eq!(EvalResult::Concrete(JsValue::Undefined).as_bool(), Some(false));
    assert_eq!(EvalResult::Wildcard.as_bool(), None);
    assert_eq!(EvalResult::Unknown.as_bool(), None);
  }
}
