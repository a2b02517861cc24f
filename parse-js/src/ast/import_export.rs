use super::expr::pat::IdPat;
use super::node::Node;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ImportName {
  // For `import {a as b}`, this is "a"; string names are kept unquoted.
  #[drive(skip)]
  pub importable: String,
  pub alias: Node<IdPat>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ImportNames {
  // `import * as name`.
  All(Node<IdPat>),
  Specific(Vec<Node<ImportName>>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ExportName {
  // For `export {a as b}`, this is "a".
  #[drive(skip)]
  pub exportable: String,
  #[drive(skip)]
  pub alias: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ExportNames {
  // `export * from "module"` or `export * as alias from "module"`.
  #[drive(skip)]
  All(Option<String>),
  Specific(Vec<Node<ExportName>>),
}
