use parse_js::ast::expr::Expr;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::node::Node;
use symbol_js::symbol::Scope;

/// Whether `id` refers to a global: nothing in its enclosing scopes binds the
/// name, and the root scope saw it used as a free reference. Nodes that never
/// went through `compute_symbols` have no scope and are never global.
pub fn is_global(id: &Node<IdExpr>) -> bool {
  id.assoc
    .get::<Scope>()
    .is_some_and(|scope| scope.is_global(&id.stx.name))
}

/// Whether `expr` is the unshadowed global identifier `name`.
pub fn is_global_named(expr: &Node<Expr>, name: &str) -> bool {
  match expr.stx.as_ref() {
    Expr::Id(id) => id.stx.name == name && is_global(id),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::is_global_named;
  use parse_js::ast::expr::Expr;
  use parse_js::ast::expr::IdExpr;
  use parse_js::ast::node::Node;
  use parse_js::ast::stmt::Stmt;
  use parse_js::loc::Loc;
  use parse_js::parse;
  use symbol_js::compute_symbols;
  use symbol_js::TopLevelMode;

  fn first_expr_stmt_is_global(src: &str, name: &str) -> bool {
    let mut top = parse(src).unwrap();
    compute_symbols(&mut top, TopLevelMode::Global);
    let expr = top
      .stx
      .body
      .iter()
      .rev()
      .find_map(|stmt| match stmt.stx.as_ref() {
        Stmt::Expr(e) => Some(&e.stx.expr),
        _ => None,
      })
      .unwrap();
    is_global_named(expr, name)
  }

  #[test]
  fn test_free_reference_is_global() {
    assert!(first_expr_stmt_is_global("module;", "module"));
  }

  #[test]
  fn test_declared_name_is_not_global() {
    assert!(!first_expr_stmt_is_global("var module; module;", "module"));
    assert!(!first_expr_stmt_is_global("let module = 1; module;", "module"));
    assert!(!first_expr_stmt_is_global("function module() {} module;", "module"));
  }

  #[test]
  fn test_other_names_and_shapes() {
    assert!(!first_expr_stmt_is_global("module;", "exports"));
    assert!(!first_expr_stmt_is_global("module.hot;", "module"));
  }

  #[test]
  fn test_unannotated_node_is_not_global() {
    let id: Node<Expr> = Node::new(Loc(0, 6), IdExpr {
      name: "module".to_string(),
    })
    .into_wrapped();
    assert!(!is_global_named(&id, "module"));
  }
}
