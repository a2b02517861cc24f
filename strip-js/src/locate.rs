use crate::config::PatternSpec;
use crate::pattern::match_probe;
use crate::pattern::ProbeKind;
use parse_js::ast::expr::lit::LitArrElem;
use parse_js::ast::expr::lit::LitTemplatePart;
use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::loc::Loc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeSite {
  pub loc: Loc,
  pub kind: ProbeKind,
}

/// Probes whose nearest enclosing test position is `test`.
///
/// A probe is governed by a test when every node between the two is a plain
/// expression. The walk stops at function boundaries (a probe there belongs to
/// another evaluation), at object literals, and at the test of a nested `?:`,
/// which is the nearer test for whatever it contains.
pub fn governed_probes(test: &Node<Expr>, spec: &PatternSpec) -> Vec<ProbeSite> {
  let mut sites = Vec::new();
  collect(test, spec, &mut sites);
  sites
}

fn collect(expr: &Node<Expr>, spec: &PatternSpec, out: &mut Vec<ProbeSite>) {
  if let Some(kind) = match_probe(expr, spec) {
    out.push(ProbeSite {
      loc: expr.loc,
      kind,
    });
    return;
  };
  match expr.stx.as_ref() {
    Expr::Binary(binary) => {
      collect(&binary.stx.left, spec, out);
      collect(&binary.stx.right, spec, out);
    }
    Expr::Unary(unary) => collect(&unary.stx.argument, spec, out),
    Expr::UnaryPostfix(unary) => collect(&unary.stx.argument, spec, out),
    Expr::Member(member) => collect(&member.stx.left, spec, out),
    Expr::ComputedMember(member) => {
      collect(&member.stx.object, spec, out);
      collect(&member.stx.member, spec, out);
    }
    Expr::Call(call) => {
      collect(&call.stx.callee, spec, out);
      for arg in call.stx.arguments.iter() {
        collect(&arg.stx.value, spec, out);
      }
    }
    Expr::New(new) => {
      collect(&new.stx.callee, spec, out);
      for arg in new.stx.arguments.iter() {
        collect(&arg.stx.value, spec, out);
      }
    }
    Expr::Cond(cond) => {
      collect(&cond.stx.consequent, spec, out);
      collect(&cond.stx.alternate, spec, out);
    }
    Expr::LitArr(arr) => {
      for elem in arr.stx.elements.iter() {
        match elem {
          LitArrElem::Single(e) | LitArrElem::Spread(e) => collect(e, spec, out),
          LitArrElem::Empty => {}
        };
      }
    }
    Expr::LitTemplate(tpl) => collect_template(&tpl.stx.parts, spec, out),
    Expr::TaggedTemplate(tagged) => {
      collect(&tagged.stx.function, spec, out);
      collect_template(&tagged.stx.parts, spec, out);
    }
    // Function bodies, object literals and the rest are not pure expression
    // positions, or have no children.
    _ => {}
  };
}

fn collect_template(parts: &[LitTemplatePart], spec: &PatternSpec, out: &mut Vec<ProbeSite>) {
  for part in parts {
    if let LitTemplatePart::Substitution(e) = part {
      collect(e, spec, out);
    };
  }
}
