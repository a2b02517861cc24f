use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::lit::LitTemplatePart;
use crate::ast::expr::Expr;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::class_or_object::ClassMember;
use crate::ast::class_or_object::MethodKind;
use crate::ast::class_or_object::ObjKey;
use crate::ast::class_or_object::ObjMember;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use crate::operator::OperatorName;
use crate::parse;
use serde_json::json;

// Parses `src` as a single expression statement.
fn parse_expr(src: &str) -> Node<Expr> {
  let mut top = parse(src).unwrap();
  assert_eq!(top.stx.body.len(), 1, "expected one statement in {:?}", src);
  match *top.stx.body.remove(0).stx {
    Stmt::Expr(e) => e.stx.expr,
    other => panic!("expected expression statement, got {:?}", other),
  }
}

#[test]
fn test_serialized_shape() {
  let expr = parse_expr("module.hot");
  assert_eq!(
    serde_json::to_value(&expr).unwrap(),
    json!({
      "$t": "Member",
      "optional_chaining": false,
      "left": { "$t": "Id", "name": "module" },
      "right": "hot",
    })
  );
  assert_eq!(expr.loc, Loc(0, 10));
}

#[test]
fn test_binary_precedence() {
  let expr = parse_expr("a + b * c - d");
  let Expr::Binary(sub) = *expr.stx else {
    panic!("expected binary");
  };
  assert_eq!(sub.stx.operator, OperatorName::Subtraction);
  let Expr::Binary(add) = &*sub.stx.left.stx else {
    panic!("expected binary");
  };
  assert_eq!(add.stx.operator, OperatorName::Addition);
  let Expr::Binary(mul) = &*add.stx.right.stx else {
    panic!("expected binary");
  };
  assert_eq!(mul.stx.operator, OperatorName::Multiplication);
}

#[test]
fn test_exponent_and_assignment_are_right_associative() {
  let Expr::Binary(exp) = *parse_expr("a ** b ** c").stx else {
    panic!("expected binary");
  };
  assert!(matches!(*exp.stx.left.stx, Expr::Id(_)));
  assert!(matches!(*exp.stx.right.stx, Expr::Binary(_)));

  let Expr::Binary(assign) = *parse_expr("a = b = c").stx else {
    panic!("expected binary");
  };
  assert_eq!(assign.stx.operator, OperatorName::Assignment);
  assert!(matches!(*assign.stx.right.stx, Expr::Binary(_)));
}

#[test]
fn test_conditional() {
  let Expr::Binary(assign) = *parse_expr("x = a ? b : c ? d : e").stx else {
    panic!("expected binary");
  };
  let Expr::Cond(cond) = *assign.stx.right.stx else {
    panic!("expected conditional");
  };
  assert!(matches!(*cond.stx.test.stx, Expr::Id(_)));
  assert!(matches!(*cond.stx.alternate.stx, Expr::Cond(_)));
}

#[test]
fn test_member_call_chain() {
  let Expr::Call(call) = *parse_expr("module.hot.accept(a, ...b)").stx else {
    panic!("expected call");
  };
  assert_eq!(call.stx.arguments.len(), 2);
  assert!(call.stx.arguments[1].stx.spread);
  let Expr::Member(accept) = *call.stx.callee.stx else {
    panic!("expected member");
  };
  assert_eq!(accept.stx.right, "accept");

  let Expr::ComputedMember(m) = *parse_expr("module['hot']").stx else {
    panic!("expected computed member");
  };
  assert!(matches!(*m.stx.member.stx, Expr::LitStr(_)));

  let Expr::Member(m) = *parse_expr("a?.b").stx else {
    panic!("expected member");
  };
  assert!(m.stx.optional_chaining);

  // Keywords are valid property names.
  let Expr::Member(m) = *parse_expr("a.default").stx else {
    panic!("expected member");
  };
  assert_eq!(m.stx.right, "default");
}

#[test]
fn test_in_operator() {
  let Expr::Binary(b) = *parse_expr("'hot' in module").stx else {
    panic!("expected binary");
  };
  assert_eq!(b.stx.operator, OperatorName::In);
}

#[test]
fn test_unary_and_postfix() {
  let Expr::Unary(u) = *parse_expr("typeof module.hot").stx else {
    panic!("expected unary");
  };
  assert_eq!(u.stx.operator, OperatorName::Typeof);
  assert!(matches!(*u.stx.argument.stx, Expr::Member(_)));

  let Expr::UnaryPostfix(p) = *parse_expr("i++").stx else {
    panic!("expected postfix");
  };
  assert_eq!(p.stx.operator, OperatorName::PostfixIncrement);
}

#[test]
fn test_postfix_after_line_break_starts_new_statement() {
  let top = parse("a\n++b").unwrap();
  assert_eq!(top.stx.body.len(), 2);
}

#[test]
fn test_grouping_and_comma() {
  let Expr::Binary(b) = *parse_expr("(a, b)").stx else {
    panic!("expected binary");
  };
  assert_eq!(b.stx.operator, OperatorName::Comma);
}

#[test]
fn test_arrow_functions() {
  let Expr::ArrowFunc(f) = *parse_expr("(a, {b}, ...c) => a + b").stx else {
    panic!("expected arrow function");
  };
  let func = &f.stx.func.stx;
  assert!(func.arrow);
  assert_eq!(func.parameters.len(), 3);
  assert!(func.parameters[2].stx.rest);
  assert!(matches!(func.body, FuncBody::Expression(_)));

  let Expr::ArrowFunc(f) = *parse_expr("async x => { await x; }").stx else {
    panic!("expected arrow function");
  };
  assert!(f.stx.func.stx.async_);
  assert!(matches!(f.stx.func.stx.body, FuncBody::Block(_)));

  let Expr::ArrowFunc(f) = *parse_expr("() => ({})").stx else {
    panic!("expected arrow function");
  };
  let FuncBody::Expression(body) = &f.stx.func.stx.body else {
    panic!("expected expression body");
  };
  assert!(matches!(*body.stx, Expr::LitObj(_)));
}

#[test]
fn test_arrow_function_is_not_called_across_lines() {
  let top = parse("x => {}\n(foo)").unwrap();
  assert_eq!(top.stx.body.len(), 2);
  let Expr::Call(call) = *parse_expr("(x => x)(1)").stx else {
    panic!("expected call");
  };
  assert!(matches!(*call.stx.callee.stx, Expr::ArrowFunc(_)));
}

#[test]
fn test_async_as_identifier() {
  let Expr::Call(call) = *parse_expr("async(a)").stx else {
    panic!("expected call");
  };
  assert!(matches!(*call.stx.callee.stx, Expr::Id(_)));
}

#[test]
fn test_function_expression() {
  let Expr::Func(f) = *parse_expr("(function* gen(a = 1) { yield a; })").stx else {
    panic!("expected function");
  };
  assert_eq!(f.stx.name.as_ref().unwrap().stx.name, "gen");
  assert!(f.stx.func.stx.generator);
  assert!(f.stx.func.stx.parameters[0].stx.default_value.is_some());
}

#[test]
fn test_new_expression() {
  let Expr::New(n) = *parse_expr("new a.B(1)").stx else {
    panic!("expected new");
  };
  assert!(matches!(*n.stx.callee.stx, Expr::Member(_)));
  assert_eq!(n.stx.arguments.len(), 1);

  let Expr::Member(m) = *parse_expr("new Foo().bar").stx else {
    panic!("expected member");
  };
  assert!(matches!(*m.stx.left.stx, Expr::New(_)));
}

#[test]
fn test_literals() {
  let Expr::LitArr(arr) = *parse_expr("[1, , ...a, 'x']").stx else {
    panic!("expected array");
  };
  assert!(matches!(arr.stx.elements[1], LitArrElem::Empty));
  assert!(matches!(arr.stx.elements[2], LitArrElem::Spread(_)));
  assert_eq!(arr.stx.elements.len(), 4);

  let Expr::LitStr(s) = *parse_expr(r#""a\tb""#).stx else {
    panic!("expected string");
  };
  assert_eq!(s.stx.value, "a\tb");

  let Expr::LitBigInt(b) = *parse_expr("0x10n").stx else {
    panic!("expected bigint");
  };
  assert_eq!(b.stx.value, "0x10");

  let Expr::Call(call) = *parse_expr("/a+b/gi.test(x)").stx else {
    panic!("expected call");
  };
  let Expr::Member(m) = *call.stx.callee.stx else {
    panic!("expected member");
  };
  let Expr::LitRegex(re) = *m.stx.left.stx else {
    panic!("expected regex");
  };
  assert_eq!(re.stx.value, "/a+b/gi");
}

#[test]
fn test_template() {
  let Expr::LitTemplate(t) = *parse_expr("`a${b}c${ {d} }e`").stx else {
    panic!("expected template");
  };
  let parts = &t.stx.parts;
  assert_eq!(parts.len(), 5);
  assert!(matches!(&parts[0], LitTemplatePart::String(s) if s == "a"));
  assert!(matches!(&parts[2], LitTemplatePart::String(s) if s == "c"));
  assert!(matches!(&parts[3], LitTemplatePart::Substitution(_)));
  assert!(matches!(&parts[4], LitTemplatePart::String(s) if s == "e"));

  let Expr::TaggedTemplate(t) = *parse_expr("tag`x`").stx else {
    panic!("expected tagged template");
  };
  assert_eq!(t.stx.parts.len(), 1);
}

#[test]
fn test_object_literal() {
  let src = "({ a, b: 1, 'c': 2, 3: 4, [d]: 5, get e() {}, set e(v) {}, async *f() {}, g() {}, ...h, get: 6 })";
  let Expr::LitObj(obj) = *parse_expr(src).stx else {
    panic!("expected object");
  };
  let members: Vec<_> = obj.stx.members.iter().map(|m| &*m.stx).collect();
  assert_eq!(members.len(), 11);
  assert!(matches!(members[0], ObjMember::Shorthand { id } if id.stx.name == "a"));
  assert!(matches!(members[2], ObjMember::Prop { key: ObjKey::Str(k), .. } if k == "c"));
  assert!(matches!(members[3], ObjMember::Prop { key: ObjKey::Num(_), .. }));
  assert!(matches!(members[4], ObjMember::Prop { key: ObjKey::Computed(_), .. }));
  assert!(matches!(members[5], ObjMember::Method { kind: MethodKind::Getter, .. }));
  assert!(matches!(members[6], ObjMember::Method { kind: MethodKind::Setter, .. }));
  assert!(
    matches!(members[7], ObjMember::Method { kind: MethodKind::Method, func, .. } if func.stx.async_ && func.stx.generator)
  );
  assert!(matches!(members[9], ObjMember::Spread { .. }));
  assert!(matches!(members[10], ObjMember::Prop { key: ObjKey::Direct(k), .. } if k == "get"));
}

#[test]
fn test_operand_errors() {
  assert_eq!(
    parse("a + ;").unwrap_err().typ,
    SyntaxErrorType::ExpectedSyntax("expression operand")
  );
  assert_eq!(parse("a +").unwrap_err().typ, SyntaxErrorType::UnexpectedEnd);
  assert_eq!(
    parse("this.# x").unwrap_err().typ,
    SyntaxErrorType::ExpectedSyntax("private name")
  );
  assert_eq!(
    parse("new.tar").unwrap_err().typ,
    SyntaxErrorType::ExpectedSyntax("`target` property")
  );
  assert_eq!(
    parse("'abc\n'").unwrap_err().typ,
    SyntaxErrorType::LineTerminatorInString
  );
}

#[test]
fn test_class_expression() {
  let Expr::Class(c) = *parse_expr("(class Named extends (a, b) { constructor() { super(); } })").stx else {
    panic!("expected class");
  };
  assert_eq!(c.stx.name.as_ref().unwrap().stx.name, "Named");
  assert!(matches!(c.stx.extends.as_ref().map(|e| &*e.stx), Some(Expr::Binary(_))));
  let ClassMember::Method(m) = &c.stx.members[0] else {
    panic!("expected constructor");
  };
  assert!(matches!(&m.stx.key, ObjKey::Direct(k) if k == "constructor"));
  let FuncBody::Block(body) = &m.stx.func.stx.body else {
    panic!("expected block body");
  };
  let Stmt::Expr(e) = &*body[0].stx else {
    panic!("expected expression");
  };
  let Expr::Call(call) = &*e.stx.expr.stx else {
    panic!("expected call");
  };
  assert!(matches!(*call.stx.callee.stx, Expr::Super(_)));

  let Expr::Class(anon) = *parse_expr("(class {})").stx else {
    panic!("expected class");
  };
  assert!(anon.stx.name.is_none() && anon.stx.members.is_empty());
}

#[test]
fn test_private_names() {
  let Expr::Member(m) = *parse_expr("this.#x").stx else {
    panic!("expected member");
  };
  assert_eq!(m.stx.right, "#x");
  let Expr::Binary(b) = *parse_expr("#x in obj").stx else {
    panic!("expected binary");
  };
  assert_eq!(b.stx.operator, OperatorName::In);
  assert!(matches!(&*b.stx.left.stx, Expr::PrivateName(p) if p.stx.name == "#x"));
}

#[test]
fn test_dynamic_import() {
  let Expr::Call(call) = *parse_expr("import('./hot').then(m => m.default)").stx else {
    panic!("expected call");
  };
  let Expr::Member(then) = &*call.stx.callee.stx else {
    panic!("expected member");
  };
  let Expr::Import(import) = &*then.stx.left.stx else {
    panic!("expected import");
  };
  assert!(import.stx.options.is_none());
  assert_eq!(import.loc, Loc(0, 15));

  let Expr::Import(with_options) = *parse_expr("import(x, { with: {} },)").stx else {
    panic!("expected import");
  };
  assert!(with_options.stx.options.is_some());
}

#[test]
fn test_meta_properties() {
  let Expr::Member(m) = *parse_expr("import.meta.url").stx else {
    panic!("expected member");
  };
  assert!(matches!(*m.stx.left.stx, Expr::ImportMeta(_)));
  let Expr::Func(f) = *parse_expr("(function () { return new.target; })").stx else {
    panic!("expected function");
  };
  let FuncBody::Block(body) = &f.stx.func.stx.body else {
    panic!("expected block body");
  };
  let Stmt::Return(r) = &*body[0].stx else {
    panic!("expected return");
  };
  assert!(matches!(r.stx.value.as_ref().map(|v| &*v.stx), Some(Expr::NewTarget(_))));
}
