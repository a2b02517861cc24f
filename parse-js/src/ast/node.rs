use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use ahash::HashMap;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;
use serde::Serializer;
use std::any::Any;
use std::any::TypeId;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;

#[derive(Default)]
pub struct NodeAssocData {
  // Bounded by Send + Sync so annotated trees can still move across threads.
  map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl NodeAssocData {
  pub fn get<T: Any>(&self) -> Option<&T> {
    let t = TypeId::of::<T>();
    self.map.get(&t).and_then(|v| v.downcast_ref())
  }

  pub fn set<T: Any + Send + Sync>(&mut self, v: T) {
    let t = TypeId::of::<T>();
    self.map.insert(t, Box::new(v));
  }

  pub fn remove<T: Any>(&mut self) -> bool {
    self.map.remove(&TypeId::of::<T>()).is_some()
  }
}

#[derive(Drive, DriveMut)]
pub struct Node<S: Drive + DriveMut> {
  // Not a source range: rewritten trees contain nodes that never existed in the source, so this is best effort.
  #[drive(skip)]
  pub loc: Loc,
  pub stx: Box<S>,
  #[drive(skip)]
  pub assoc: NodeAssocData,
}

impl<S: Drive + DriveMut> Node<S> {
  pub fn new(loc: Loc, stx: S) -> Node<S> {
    Node {
      loc,
      stx: Box::new(stx),
      assoc: NodeAssocData::default(),
    }
  }

  /// Maps the syntax, keeping the location and associated data.
  pub fn map_stx<T: Drive + DriveMut, F: FnOnce(S) -> T>(self, f: F) -> Node<T> {
    Node {
      loc: self.loc,
      stx: Box::new(f(*self.stx)),
      assoc: self.assoc,
    }
  }

  /// Wraps the node inside another node with the same loc, with syntax derived from the provided callback.
  pub fn wrap<T: Drive + DriveMut, F: FnOnce(Node<S>) -> T>(self, f: F) -> Node<T> {
    let loc = self.loc;
    let stx = f(self);
    Node::new(loc, stx)
  }

  /// Wraps a typed node into its enum, e.g. `Node<IdExpr>` into `Node<Expr>`.
  pub fn into_wrapped<W: From<Node<S>> + Drive + DriveMut>(self) -> Node<W> {
    self.wrap(W::from)
  }

  /// Create an error at this node's location.
  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    self.loc.error(typ, None)
  }
}

impl<S: Debug + Drive + DriveMut> Debug for Node<S> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    self.stx.fmt(f)
  }
}

impl<S: Serialize + Drive + DriveMut> Serialize for Node<S> {
  fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
    self.stx.serialize(serializer)
  }
}

#[cfg(test)]
mod tests {
  use super::Node;
  use super::NodeAssocData;
  use crate::ast::expr::Expr;
  use crate::ast::expr::IdExpr;
  use crate::loc::Loc;

  #[test]
  fn test_node_assoc_data() {
    struct MyType(u32);
    let mut assoc = NodeAssocData::default();
    assert!(assoc.get::<MyType>().is_none());
    assoc.set(MyType(32));
    let v = assoc.get::<MyType>().unwrap();
    assert_eq!(v.0, 32);
    assert!(assoc.remove::<MyType>());
    assert!(assoc.get::<MyType>().is_none());
  }

  #[test]
  fn test_into_wrapped_keeps_loc() {
    let id = Node::new(Loc(3, 9), IdExpr {
      name: "module".to_string(),
    });
    let expr: Node<Expr> = id.into_wrapped();
    assert_eq!(expr.loc, Loc(3, 9));
    assert!(matches!(expr.stx.as_ref(), Expr::Id(id) if id.stx.name == "module"));
  }
}
