use derive_visitor::Drive;
use derive_visitor::Visitor;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::node::Node;
use parse_js::parse;
use parse_js::parse_with_options;
use parse_js::ParseOptions;
use symbol_js::compute_symbols;
use symbol_js::symbol::Scope;
use symbol_js::symbol::ScopeType;
use symbol_js::TopLevelMode;

type IdExprNode = Node<IdExpr>;

// Collects the scopes attached to every `IdExpr` named `name`, in source order.
#[derive(Visitor)]
#[visitor(IdExprNode(enter))]
struct ScopeCollector {
  name: String,
  scopes: Vec<Scope>,
}

impl ScopeCollector {
  fn new(name: &str) -> Self {
    ScopeCollector {
      name: name.to_string(),
      scopes: Vec::new(),
    }
  }

  fn enter_id_expr_node(&mut self, node: &IdExprNode) {
    if node.stx.name == self.name {
      self.scopes.push(node.assoc.get::<Scope>().expect("scope attached").clone());
    };
  }
}

fn global_flags(src: &str, mode: TopLevelMode, name: &str) -> Vec<bool> {
  let mut top = parse_with_options(src, ParseOptions {
    top_level_mode: mode,
  })
  .unwrap();
  compute_symbols(&mut top, mode);
  let mut collector = ScopeCollector::new(name);
  top.drive(&mut collector);
  collector.scopes.iter().map(|s| s.is_global(name)).collect()
}

#[test]
fn resolves_outer_let_with_declaration_scope() {
  let mut top_level = parse(
    r#"
      function outer() {
        let value = 1;
        return function inner() {
          return value;
        };
      }
    "#,
  )
  .unwrap();
  let root = compute_symbols(&mut top_level, TopLevelMode::Global);
  assert_eq!(root.typ(), ScopeType::Global);

  let mut collector = ScopeCollector::new("value");
  top_level.drive(&mut collector);
  let uses = collector.scopes;
  assert_eq!(uses.len(), 1);
  let use_scope = &uses[0];
  assert_eq!(use_scope.typ(), ScopeType::NonArrowFunction);

  let (decl_scope, _) = use_scope
    .find_symbol_up_to_with_scope("value", |_| false)
    .expect("symbol should resolve across nested closures");
  assert_ne!(&decl_scope, use_scope);
  assert_eq!(decl_scope.parent(), Some(root.clone()));
  assert!(root.has_binding("outer"));
  assert!(!root.has_binding("value"));
}

#[test]
fn unbound_reference_is_global() {
  assert_eq!(
    global_flags("module.hot; if (module) {}", TopLevelMode::Global, "module"),
    vec![true, true]
  );
}

#[test]
fn declarations_shadow_global() {
  let cases = [
    "var module = {}; module.hot;",
    "function f(module) { module.hot; }",
    "{ let module; module.hot; }",
    "const f = (module) => module.hot;",
    "try {} catch (module) { module.hot; }",
    "function module() {} module.hot;",
    "(function module() { module.hot; });",
    "function f({ a: [module] }) { module.hot; }",
  ];
  for src in cases {
    assert_eq!(global_flags(src, TopLevelMode::Global, "module"), vec![false], "{}", src);
  }
}

#[test]
fn var_hoists_out_of_blocks_but_let_does_not() {
  assert_eq!(
    global_flags("{ var module; } module.hot;", TopLevelMode::Global, "module"),
    vec![false]
  );
  assert_eq!(
    global_flags("{ let module; } module.hot;", TopLevelMode::Global, "module"),
    vec![true]
  );
  // Hoisted declarations later in the function still bind earlier uses.
  assert_eq!(
    global_flags("function f() { module.hot; var module; }", TopLevelMode::Global, "module"),
    vec![false]
  );
}

#[test]
fn imports_bind_in_module_scope() {
  assert_eq!(
    global_flags("import module from 'm'; module.hot;", TopLevelMode::Module, "module"),
    vec![false]
  );
  assert_eq!(
    global_flags("import * as module from 'm'; module.hot;", TopLevelMode::Module, "module"),
    vec![false]
  );
  assert_eq!(
    global_flags("import { x as module } from 'm'; module.hot;", TopLevelMode::Module, "module"),
    vec![false]
  );
}

#[test]
fn class_bodies_are_scoped() {
  let cases = [
    // Method parameters and bodies.
    ("class A { m(module) { module.hot; } }", vec![false]),
    ("class A { m() { module.hot; } }", vec![true]),
    ("class A { static { var module; module.hot; } }", vec![false]),
    // A class expression's name is bound inside the class only.
    ("(class module { m() { module.hot; } }); module.hot;", vec![false, true]),
    // A class declaration binds in the enclosing scope.
    ("class module {} module.hot;", vec![false]),
    ("{ class module {} } module.hot;", vec![true]),
    // Field initializers and computed keys are ordinary expressions.
    ("class A { x = module.hot; [module.key]() {} }", vec![true, true]),
  ];
  for (src, expected) in cases {
    assert_eq!(global_flags(src, TopLevelMode::Global, "module"), expected, "{}", src);
  }
}

#[test]
fn static_block_var_stays_in_block() {
  assert_eq!(
    global_flags("class A { static { var module; } } module.hot;", TopLevelMode::Global, "module"),
    vec![true]
  );
}

#[test]
fn dynamic_import_callbacks_resolve() {
  assert_eq!(
    global_flags("import('./a').then(() => module.hot);", TopLevelMode::Global, "module"),
    vec![true]
  );
  assert_eq!(
    global_flags("import('./a').then((module) => module.hot);", TopLevelMode::Global, "module"),
    vec![false]
  );
}

#[test]
fn private_names_and_super_are_not_references() {
  let mut top = parse("class A extends B { #module; m() { super.m(#module in this); } }").unwrap();
  let root = compute_symbols(&mut top, TopLevelMode::Global);
  let references = root.data().references().clone();
  assert!(references.contains("B"));
  assert!(!references.contains("#module"));
  assert!(!references.contains("module"));
  assert!(root.has_binding("A"));
}

#[test]
fn switch_scope_excludes_discriminant() {
  assert_eq!(
    global_flags("switch (module.hot) { case 1: let module; module.hot; }", TopLevelMode::Global, "module"),
    vec![true, false]
  );
}
