use super::expr::Expr;
use super::expr::IdExpr;
use super::func::Func;
use super::node::Node;
use super::stmt::Stmt;
use crate::num::JsNumber;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

// Never an IdExpr: a direct key is not a variable usage.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ObjKey {
  // Identifier names, including keywords.
  #[drive(skip)]
  Direct(String),
  #[drive(skip)]
  Str(String),
  #[drive(skip)]
  Num(JsNumber),
  Computed(Node<Expr>),
  // Class members only, e.g. `#count`. Includes the `#`.
  #[drive(skip)]
  Private(String),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Drive, DriveMut)]
pub enum MethodKind {
  Method,
  Getter,
  Setter,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ObjMember {
  Prop {
    key: ObjKey,
    value: Node<Expr>,
  },
  Method {
    kind: MethodKind,
    key: ObjKey,
    func: Node<Func>,
  },
  // `{ a }`; the identifier is a real variable usage.
  Shorthand {
    id: Node<IdExpr>,
  },
  Spread {
    value: Node<Expr>,
  },
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassMethod {
  #[drive(skip)]
  pub static_: bool,
  pub kind: MethodKind,
  pub key: ObjKey,
  pub func: Node<Func>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassProp {
  #[drive(skip)]
  pub static_: bool,
  pub key: ObjKey,
  pub value: Option<Node<Expr>>,
}

// `static { ... }` runs like a function body with its own scope.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassStaticBlock {
  pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
#[serde(tag = "$t")]
pub enum ClassMember {
  Method(Node<ClassMethod>),
  Prop(Node<ClassProp>),
  StaticBlock(Node<ClassStaticBlock>),
}
