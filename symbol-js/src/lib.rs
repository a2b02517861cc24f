use derive_visitor::DriveMut;
use parse_js::ast::node::Node;
use parse_js::ast::stx::TopLevel;
use symbol::Scope;
use symbol::ScopeType;
use symbol::SymbolGenerator;
use visitor::DeclVisitor;

pub mod symbol;
pub mod visitor;

pub use parse_js::TopLevelMode;

/// Builds the scope tree for `top_level_node`, annotating identifier nodes with their enclosing scope.
/// Returns the root scope.
pub fn compute_symbols(top_level_node: &mut Node<TopLevel>, top_level_mode: TopLevelMode) -> Scope {
  let top_level_scope = Scope::new(SymbolGenerator::new(), None, match top_level_mode {
    TopLevelMode::Global => ScopeType::Global,
    TopLevelMode::Module => ScopeType::Module,
  });
  let mut visitor = DeclVisitor::new(top_level_scope.clone());
  top_level_node.drive_mut(&mut visitor);
  top_level_scope
}
