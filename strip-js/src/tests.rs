use crate::strip;
use crate::strip_top_level;
use crate::ConstructKind;
use crate::Outcome;
use crate::PatternSpec;
use crate::StripOptions;
use crate::StripOutput;
use crate::TopLevelMode;
use emit_js::EmitOptions;
use parse_js::parse;

fn stripped_with(options: &StripOptions, src: &str) -> StripOutput {
  strip(options, src).unwrap()
}

fn minified(src: &str) -> String {
  stripped_with(&StripOptions::new(TopLevelMode::Global), src).code
}

fn pretty(src: &str) -> String {
  let options = StripOptions::new(TopLevelMode::Global).with_emit(EmitOptions::pretty());
  stripped_with(&options, src).code
}

fn assert_untouched(mode: TopLevelMode, src: &str) {
  let out = stripped_with(&StripOptions::new(mode), src);
  assert!(out.firings.is_empty(), "unexpected firings for {src}: {:?}", out.firings);
  assert_eq!(out.code, src);
}

#[test]
fn test_direct_probe_removes_statement() {
  assert_eq!(
    minified("if (module.hot) { module.hot.accept(); }\nstart();"),
    "start();"
  );
  assert_eq!(minified("if (module['hot']) a();\nb();"), "b();");
  assert_eq!(minified("if (module?.hot) a();\nb();"), "b();");
}

#[test]
fn test_direct_probe_keeps_alternate() {
  assert_eq!(minified("if (module.hot) { a(); } else { b(); }"), "{b();}");
  assert_eq!(minified("if (module.hot) a(); else b();"), "b();");
}

#[test]
fn test_conditional_expressions() {
  assert_eq!(minified("x = module.hot ? a : b;"), "x=b;");
  assert_eq!(minified("x = !module.hot ? a : b;"), "x=a;");
  assert_eq!(minified("f('hot' in module ? 1 : 2);"), "f(2);");
  assert_eq!(minified("const g = () => module.hot ? x : y;"), "const g=()=>y;");
  // The surviving branch is re-parenthesised for its new position.
  assert_eq!(minified("x = (module.hot ? a : b + c) * 2;"), "x=(b+c)*2;");
}

#[test]
fn test_negation_keeps_consequent() {
  assert_eq!(minified("if (!module.hot) { a(); } else { b(); }"), "{a();}");
  assert_eq!(minified("if (!module.hot) a();"), "a();");
}

#[test]
fn test_membership_test() {
  assert_eq!(minified("if ('hot' in module) { a(); }\nb();"), "b();");
  assert_eq!(minified("if (!('hot' in module)) { a(); }"), "{a();}");
}

#[test]
fn test_equality_folding() {
  assert_eq!(minified("if (module.hot === undefined) { a(); } else { b(); }"), "{a();}");
  assert_eq!(minified("if (typeof module.hot !== 'undefined') { a(); }\nb();"), "b();");
  assert_eq!(minified("if (module.hot != null) a();\nb();"), "b();");
  assert_untouched(TopLevelMode::Global, "if (module.hot == false) { a(); }\n");
  assert_untouched(TopLevelMode::Global, "if (module.hot === other) { a(); }\n");
}

#[test]
fn test_else_chain_is_spliced() {
  assert_eq!(
    pretty("if (module.hot) { A(); } else if (otherTest) { B(); } else { C(); }"),
    "if (otherTest) {\n  B();\n} else {\n  C();\n}\n"
  );
  assert_eq!(
    minified("if (module.hot) { A(); } else if (otherTest) { B(); } else { C(); }"),
    "if(otherTest){B();}else{C();}"
  );
}

#[test]
fn test_statement_slots() {
  // An `else` that would never run is dropped.
  assert_eq!(minified("if (a) b(); else if (module.hot) c();"), "if(a){b();}");
  // Slots that need a statement get an empty block.
  assert_eq!(minified("while (x) if (module.hot) a();"), "while(x){}");
  assert_eq!(minified("l: if (module.hot) a();"), "l:{}");
  assert_eq!(minified("if (a) if (module.hot) b();"), "if(a){}");
  assert_eq!(minified("if (a) { if (!module.hot) { b(); } }"), "if(a){{b();}}");
}

#[test]
fn test_nested_functions_are_rewritten() {
  assert_eq!(
    minified("function f() { if (module.hot) { a(); } return 1; }"),
    "function f(){return 1;}"
  );
  assert_eq!(
    minified("switch (x) { case 1: if (module.hot) a(); break; }"),
    "switch(x){case 1:break;}"
  );
}

#[test]
fn test_class_bodies_are_rewritten() {
  assert_eq!(
    minified("class A { m() { if (module.hot) { a(); } return 1; } }"),
    "class A{m(){return 1;}}"
  );
  assert_eq!(
    minified("class A { static { if (!module.hot) init(); } }"),
    "class A{static{init();}}"
  );
  assert_eq!(
    minified("class A { static hot = module.hot ? 1 : 2; }"),
    "class A{static hot=2;}"
  );
  assert_eq!(
    minified("x = class extends B { #hot = 1; m() { super.m(); return module.hot ? super.x : this.#hot; } };"),
    "x=class extends B{#hot=1;m(){super.m();return this.#hot;}};"
  );
  assert_eq!(
    minified("function F() { if (new.target) { if (module.hot) a(); } }"),
    "function F(){if(new.target){}}"
  );
}

#[test]
fn test_dynamic_import_callbacks_are_rewritten() {
  assert_eq!(
    minified("import('./app').then((app) => { if (module.hot) { module.hot.accept(); } app.start(); });"),
    "import(\"./app\").then((app)=>{app.start();});"
  );
  assert_eq!(
    minified("import(module.hot ? './dev' : './prod');"),
    "import(\"./prod\");"
  );
}

#[test]
fn test_shadowed_object_is_untouched() {
  for src in [
    "var module = {};\nif (module.hot) a();\n",
    "if (module.hot) a();\nvar module;\n",
    "let module = {};\nif (module.hot) a();\n",
    "{ const module = {}; if (module.hot) a(); }\n",
    "function f(module) { if (module.hot) a(); }\n",
    "function f({ module }) { return module.hot ? 1 : 2; }\n",
    "function module() {}\nif (module.hot) a();\n",
    "(function module() { if (module.hot) a(); })();\n",
    "try {} catch (module) { if ('hot' in module) a(); }\n",
    "const f = (module) => module.hot ? 1 : 2;\n",
    "class module {}\nif (module.hot) a();\n",
    "(class module { m() { return module.hot ? 1 : 2; } });\n",
    "class A { static { var module = {}; if (module.hot) a(); } }\n",
    "import('./m').then((module) => { if (module.hot) a(); });\n",
  ] {
    assert_untouched(TopLevelMode::Global, src);
  }
  assert_untouched(
    TopLevelMode::Module,
    "import module from 'm';\nif (module.hot) a();\n",
  );
  assert_untouched(
    TopLevelMode::Module,
    "import { hot as module } from 'm';\nif (module.hot) a();\n",
  );
}

#[test]
fn test_shadowing_is_scoped() {
  // The binding only covers its own block.
  assert_eq!(
    minified("{ let module = {}; x(module.hot); }\nif (module.hot) a();\nb();"),
    "{let module={};x(module.hot);}b();"
  );
}

#[test]
fn test_non_probes_are_untouched() {
  for src in [
    "if (otherObject.hot) { a(); }\n",
    "if (module.other) { a(); }\n",
    "if (module[hot]) { a(); }\n",
    "if (module.hot.accept) { a(); }\n",
    "const hot = module.hot;\nif (hot) a();\n",
    "f(module.hot);\n",
    "if (f(module.hot)) a();\n",
    "if (module.hot && a) b();\n",
    "if (() => module.hot) a();\n",
    "x = module.hot;\n",
    "if (true) a();\n",
  ] {
    assert_untouched(TopLevelMode::Global, src);
  }
}

#[test]
fn test_nearest_test_is_rewritten() {
  let out = stripped_with(
    &StripOptions::new(TopLevelMode::Global),
    "if (module.hot ? a : b) c();",
  );
  assert_eq!(out.code, "if(b){c();}");
  assert_eq!(out.firings.len(), 1);
  assert_eq!(out.firings[0].construct, ConstructKind::Conditional);
}

#[test]
fn test_custom_pattern() {
  let options = StripOptions::new(TopLevelMode::Global).with_pattern(PatternSpec::new("env", "debug"));
  let out = stripped_with(
    &options,
    "if (env.debug) { log(); }\nif (module.hot) { accept(); }\nx = 'debug' in env ? 1 : 2;",
  );
  assert_eq!(out.code, "if(module.hot){accept();}x=2;");
  assert_eq!(out.firings.len(), 2);
}

#[test]
fn test_firing_records() {
  let src = "if (module.hot) a();\nif (!module.hot) b();\nif (module.hot) c(); else d();\ny = module.hot ? 1 : 2;";
  let out = stripped_with(&StripOptions::new(TopLevelMode::Global), src);
  let outcomes: Vec<_> = out
    .firings
    .iter()
    .map(|f| (f.construct, f.outcome))
    .collect();
  assert_eq!(outcomes, vec![
    (ConstructKind::If, Outcome::Removed),
    (ConstructKind::If, Outcome::Consequent),
    (ConstructKind::If, Outcome::Alternate),
    (ConstructKind::Conditional, Outcome::Alternate),
  ]);
  let first = out.firings[0].loc;
  assert_eq!(&src[first.0..first.0 + 2], "if");
  assert_eq!(out.code, "b();d();y=2;");
}

#[test]
fn test_idempotent() {
  let options = StripOptions::new(TopLevelMode::Global);
  for src in [
    "if (module.hot) { A(); } else if (otherTest) { B(); } else { C(); }",
    "x = module.hot ? (module.hot ? 1 : 2) : 3; if (a) { if (!module.hot) b(); }",
    "function f() { return 'hot' in module ? g() : h(); }",
  ] {
    let once = strip(&options, src).unwrap();
    assert!(!once.firings.is_empty());
    let twice = strip(&options, &once.code).unwrap();
    assert!(twice.firings.is_empty(), "second pass fired for {src}");
    assert_eq!(twice.code, once.code);
  }
}

#[test]
fn test_unannotated_tree_never_fires() {
  let mut top = parse("if (module.hot) a();").unwrap();
  let firings = strip_top_level(&mut top, &PatternSpec::default());
  assert!(firings.is_empty());
  assert_eq!(top.stx.body.len(), 1);
}

#[test]
fn test_leading_trivia_is_kept() {
  assert_eq!(minified("#!/usr/bin/env node\nif (module.hot) a();"), "#!/usr/bin/env node\n");
  assert_eq!(
    minified("#!/usr/bin/env node\n// banner\n/* keep */\nif (module.hot) a();\nb();"),
    "#!/usr/bin/env node\n// banner\n/* keep */\nb();"
  );
  // Whitespace alone is not kept.
  assert_eq!(minified("\n\nif (module.hot) a();\nb();"), "b();");
}

#[test]
fn test_syntax_error() {
  let err = strip(&StripOptions::new(TopLevelMode::Global), "if (module.hot {").unwrap_err();
  assert!(err.loc().is_some());
  assert!(err.code().starts_with("PS"));
}

#[test]
fn test_unterminated_comment_is_an_error() {
  let options = StripOptions::new(TopLevelMode::Global);
  let err = strip(&options, "/*").unwrap_err();
  assert_eq!(err.code(), "PS0015");
  let err = strip(&options, "if (module.hot) a();\n/* never closed").unwrap_err();
  assert_eq!(err.code(), "PS0015");
}
