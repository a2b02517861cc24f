use ahash::HashMap;
use ahash::HashMapExt;
use ahash::HashSet;
use ahash::HashSetExt;
use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// A unique declaration. Two bindings with the same name in different scopes are different symbols.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Symbol(u64);

impl Symbol {
  pub fn id(self) -> u64 {
    self.0
  }
}

/// Shared counter handing out symbols; clones draw from the same sequence.
#[derive(Clone, Default)]
pub struct SymbolGenerator(Arc<AtomicU64>);

impl SymbolGenerator {
  pub fn new() -> SymbolGenerator {
    SymbolGenerator::default()
  }

  pub fn next(&self) -> Symbol {
    Symbol(self.0.fetch_add(1, Ordering::Relaxed))
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ScopeType {
  Global,
  Module,
  NonArrowFunction,
  ArrowFunction,
  Block,
  Catch,
  // Holds only the name of a named function expression, between the outer scope and the function's own.
  FunctionExpressionName,
  // Class bodies; a class expression's name is bound here.
  Class,
  ClassStaticBlock,
}

impl ScopeType {
  pub fn is_closure(self) -> bool {
    matches!(self, ScopeType::NonArrowFunction | ScopeType::ArrowFunction)
  }

  pub fn is_root(self) -> bool {
    matches!(self, ScopeType::Global | ScopeType::Module)
  }

  /// Whether `var` declarations stop here.
  pub fn is_closure_or_root(self) -> bool {
    self.is_closure() || self.is_root() || self == ScopeType::ClassStaticBlock
  }
}

pub struct ScopeData {
  symbol_generator: SymbolGenerator,
  typ: ScopeType,
  parent: Option<Scope>,
  children: Vec<Scope>,
  symbols: HashMap<String, Symbol>,
  // Declaration order, for deterministic iteration.
  symbol_names: Vec<String>,
  // Only populated on the root scope.
  references: HashSet<String>,
}

impl ScopeData {
  pub fn typ(&self) -> ScopeType {
    self.typ
  }

  pub fn parent(&self) -> Option<&Scope> {
    self.parent.as_ref()
  }

  pub fn children(&self) -> &[Scope] {
    &self.children
  }

  /// Declares `name` in this scope. Redeclarations return the existing symbol.
  pub fn add_symbol(&mut self, name: String) -> Symbol {
    if let Some(&symbol) = self.symbols.get(&name) {
      return symbol;
    };
    let symbol = self.symbol_generator.next();
    self.symbol_names.push(name.clone());
    self.symbols.insert(name, symbol);
    symbol
  }

  pub fn get_symbol(&self, name: &str) -> Option<Symbol> {
    self.symbols.get(name).copied()
  }

  pub fn symbol_names(&self) -> &Vec<String> {
    &self.symbol_names
  }

  pub fn references(&self) -> &HashSet<String> {
    &self.references
  }
}

/// A handle to a lexical scope. Cloning is cheap and clones compare equal.
#[derive(Clone)]
pub struct Scope(Arc<RwLock<ScopeData>>);

impl Scope {
  pub fn new(symbol_generator: SymbolGenerator, parent: Option<Scope>, typ: ScopeType) -> Scope {
    Scope(Arc::new(RwLock::new(ScopeData {
      symbol_generator,
      typ,
      parent,
      children: Vec::new(),
      symbols: HashMap::new(),
      symbol_names: Vec::new(),
      references: HashSet::new(),
    })))
  }

  pub fn data(&self) -> RwLockReadGuard<'_, ScopeData> {
    self.0.read()
  }

  pub fn data_mut(&self) -> RwLockWriteGuard<'_, ScopeData> {
    self.0.write()
  }

  pub fn typ(&self) -> ScopeType {
    self.data().typ
  }

  pub fn parent(&self) -> Option<Scope> {
    self.data().parent.clone()
  }

  pub fn create_child_scope(&self, typ: ScopeType) -> Scope {
    let generator = self.data().symbol_generator.clone();
    let child = Scope::new(generator, Some(self.clone()), typ);
    self.data_mut().children.push(child.clone());
    child
  }

  /// The nearest scope, starting from this one, whose type satisfies `pred`.
  pub fn find_self_or_ancestor(&self, pred: impl Fn(ScopeType) -> bool) -> Option<Scope> {
    let mut cur = Some(self.clone());
    while let Some(scope) = cur {
      if pred(scope.typ()) {
        return Some(scope);
      };
      cur = scope.parent();
    }
    None
  }

  /// The scope `var` and function declarations made here belong to.
  pub fn find_closure_or_root(&self) -> Scope {
    self
      .find_self_or_ancestor(ScopeType::is_closure_or_root)
      .unwrap_or_else(|| self.root())
  }

  pub fn root(&self) -> Scope {
    let mut cur = self.clone();
    while let Some(parent) = cur.parent() {
      cur = parent;
    }
    cur
  }

  /// Walks up from this scope looking for `name`, giving up after the first scope matching `stop`.
  pub fn find_symbol_up_to_with_scope(
    &self,
    name: &str,
    stop: impl Fn(ScopeType) -> bool,
  ) -> Option<(Scope, Symbol)> {
    let mut cur = Some(self.clone());
    while let Some(scope) = cur {
      let (symbol, typ, parent) = {
        let data = scope.data();
        (data.get_symbol(name), data.typ, data.parent.clone())
      };
      if let Some(symbol) = symbol {
        return Some((scope, symbol));
      };
      if stop(typ) {
        return None;
      };
      cur = parent;
    }
    None
  }

  pub fn find_symbol(&self, name: &str) -> Option<Symbol> {
    self
      .find_symbol_up_to_with_scope(name, |_| false)
      .map(|(_, symbol)| symbol)
  }

  /// Whether `name` is declared in this scope or any enclosing one.
  pub fn has_binding(&self, name: &str) -> bool {
    self.find_symbol(name).is_some()
  }

  /// Records a use of `name` on the root scope.
  pub fn add_reference(&self, name: &str) {
    let root = self.root();
    let mut data = root.data_mut();
    if !data.references.contains(name) {
      data.references.insert(name.to_string());
    };
  }

  /// True iff `name` has no binding visible from here and the root recorded it as a reference.
  pub fn is_global(&self, name: &str) -> bool {
    !self.has_binding(name) && self.root().data().references.contains(name)
  }
}

impl PartialEq for Scope {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for Scope {}

impl Debug for Scope {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let data = self.data();
    f.debug_struct("Scope")
      .field("typ", &data.typ)
      .field("symbols", &data.symbol_names)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::Scope;
  use super::ScopeType;
  use super::SymbolGenerator;

  #[test]
  fn find_symbol_returns_decl_scope() {
    let generator = SymbolGenerator::new();
    let global = Scope::new(generator.clone(), None, ScopeType::Global);
    global.data_mut().add_symbol("global".into());

    let func = global.create_child_scope(ScopeType::NonArrowFunction);
    func.data_mut().add_symbol("func".into());

    let block = func.create_child_scope(ScopeType::Block);
    block.data_mut().add_symbol("block".into());

    let inner = block.create_child_scope(ScopeType::Block);

    let (scope, _) = inner
      .find_symbol_up_to_with_scope("block", |_| false)
      .expect("symbol in block scope");
    assert_eq!(scope, block);

    let (scope, _) = inner
      .find_symbol_up_to_with_scope("func", |_| false)
      .expect("symbol in function scope");
    assert_eq!(scope, func);

    let (scope, _) = inner
      .find_symbol_up_to_with_scope("global", |_| false)
      .expect("symbol in global scope");
    assert_eq!(scope, global);
    assert_eq!(inner.root(), global);
    assert_eq!(inner.find_closure_or_root(), func);
  }

  #[test]
  fn find_symbol_stops_at_matching_scope_predicate() {
    let global = Scope::new(SymbolGenerator::new(), None, ScopeType::Global);
    global.data_mut().add_symbol("name".into());

    let block = global.create_child_scope(ScopeType::Block);
    let inner = block.create_child_scope(ScopeType::ArrowFunction);

    assert!(inner
      .find_symbol_up_to_with_scope("name", |t| t == ScopeType::Block)
      .is_none());

    block.data_mut().add_symbol("name".into());

    let (scope, _) = inner
      .find_symbol_up_to_with_scope("name", |t| t == ScopeType::Block)
      .expect("symbol in stopping scope");
    assert_eq!(scope, block);
  }

  #[test]
  fn symbol_declaration_order_is_deterministic() {
    let scope = Scope::new(SymbolGenerator::new(), None, ScopeType::Global);
    let first = {
      let mut data = scope.data_mut();
      let first = data.add_symbol("first".into());
      data.add_symbol("second".into());
      assert_eq!(data.add_symbol("first".into()), first);
      data.add_symbol("third".into());
      first
    };
    assert_eq!(scope.data().symbol_names(), &vec![
      "first".to_string(),
      "second".to_string(),
      "third".to_string()
    ]);
    assert_eq!(scope.find_symbol("first"), Some(first));
  }

  #[test]
  fn is_global_requires_recorded_reference() {
    let global = Scope::new(SymbolGenerator::new(), None, ScopeType::Global);
    let func = global.create_child_scope(ScopeType::NonArrowFunction);
    assert!(!func.is_global("module"));
    func.add_reference("module");
    assert!(func.is_global("module"));
    assert!(global.data().references().contains("module"));
    func.data_mut().add_symbol("module".into());
    assert!(!func.is_global("module"));
    assert!(global.is_global("module"));
  }
}
