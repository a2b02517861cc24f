use crate::config::PatternSpec;
use crate::global::is_global_named;
use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::operator::OperatorName;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
  /// `module.hot`, `module["hot"]`, or their optional-chaining forms.
  Member,
  /// `"hot" in module`.
  In,
}

/// Recognises the probe. Anything else, including the same shape on a
/// shadowed object, is not a probe.
pub fn match_probe(expr: &Node<Expr>, spec: &PatternSpec) -> Option<ProbeKind> {
  match expr.stx.as_ref() {
    Expr::Member(member)
      if member.stx.right == spec.property_name
        && is_global_named(&member.stx.left, &spec.object_name) =>
    {
      Some(ProbeKind::Member)
    }
    Expr::ComputedMember(member)
      if is_str_lit(&member.stx.member, &spec.property_name)
        && is_global_named(&member.stx.object, &spec.object_name) =>
    {
      Some(ProbeKind::Member)
    }
    Expr::Binary(binary)
      if binary.stx.operator == OperatorName::In
        && is_str_lit(&binary.stx.left, &spec.property_name)
        && is_global_named(&binary.stx.right, &spec.object_name) =>
    {
      Some(ProbeKind::In)
    }
    _ => None,
  }
}

fn is_str_lit(expr: &Node<Expr>, value: &str) -> bool {
  matches!(expr.stx.as_ref(), Expr::LitStr(lit) if lit.stx.value == value)
}

#[cfg(test)]
mod tests {
  use super::match_probe;
  use super::ProbeKind;
  use crate::config::PatternSpec;
  use parse_js::ast::stmt::Stmt;
  use parse_js::parse;
  use symbol_js::compute_symbols;
  use symbol_js::TopLevelMode;

  fn probe_of_last_stmt(src: &str, spec: &PatternSpec) -> Option<ProbeKind> {
    let mut top = parse(src).unwrap();
    compute_symbols(&mut top, TopLevelMode::Global);
    match top.stx.body.last().unwrap().stx.as_ref() {
      Stmt::Expr(stmt) => match_probe(&stmt.stx.expr, spec),
      other => panic!("expected expression statement, got {other:?}"),
    }
  }

  #[test]
  fn test_member_forms() {
    let spec = PatternSpec::default();
    for src in ["module.hot;", "module['hot'];", "module?.hot;", "module?.[\"hot\"];"] {
      assert_eq!(probe_of_last_stmt(src, &spec), Some(ProbeKind::Member), "{src}");
    }
  }

  #[test]
  fn test_in_form() {
    let spec = PatternSpec::default();
    assert_eq!(probe_of_last_stmt("'hot' in module;", &spec), Some(ProbeKind::In));
    assert_eq!(probe_of_last_stmt("hot in module;", &spec), None);
    assert_eq!(probe_of_last_stmt("'hot' in other;", &spec), None);
  }

  #[test]
  fn test_non_probes() {
    let spec = PatternSpec::default();
    for src in [
      "other.hot;",
      "module.other;",
      "module[hot];",
      "module.hot.accept;",
      "this.module.hot;",
      "var module; module.hot;",
    ] {
      assert_eq!(probe_of_last_stmt(src, &spec), None, "{src}");
    }
  }

  #[test]
  fn test_custom_names() {
    let spec = PatternSpec::new("env", "debug");
    assert_eq!(probe_of_last_stmt("env.debug;", &spec), Some(ProbeKind::Member));
    assert_eq!(probe_of_last_stmt("'debug' in env;", &spec), Some(ProbeKind::In));
    assert_eq!(probe_of_last_stmt("module.hot;", &spec), None);
  }
}
