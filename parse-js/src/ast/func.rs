use super::expr::pat::Pat;
use super::expr::Expr;
use super::node::Node;
use super::stmt::Stmt;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct Func {
  #[drive(skip)]
  pub arrow: bool,
  #[drive(skip)]
  pub async_: bool,
  #[drive(skip)]
  pub generator: bool,
  pub parameters: Vec<Node<ParamDecl>>,
  pub body: FuncBody,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum FuncBody {
  Block(Vec<Node<Stmt>>),
  // Arrow functions only.
  Expression(Node<Expr>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ParamDecl {
  #[drive(skip)]
  pub rest: bool,
  pub pattern: Node<Pat>,
  pub default_value: Option<Node<Expr>>,
}
