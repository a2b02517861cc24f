use crate::symbol::Scope;
use crate::symbol::ScopeType;
use derive_visitor::VisitorMut;
use parse_js::ast::class_or_object::ClassStaticBlock;
use parse_js::ast::expr::pat::IdPat;
use parse_js::ast::expr::ClassExpr;
use parse_js::ast::expr::FuncExpr;
use parse_js::ast::expr::IdExpr;
use parse_js::ast::func::Func;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::decl::ClassDecl;
use parse_js::ast::stmt::decl::FuncDecl;
use parse_js::ast::stmt::decl::VarDecl;
use parse_js::ast::stmt::decl::VarDeclMode;
use parse_js::ast::stmt::BlockStmt;
use parse_js::ast::stmt::CatchBlock;
use parse_js::ast::stmt::ForInOfLhs;
use parse_js::ast::stmt::ForInStmt;
use parse_js::ast::stmt::ForOfStmt;
use parse_js::ast::stmt::ForTripleStmt;
use parse_js::ast::stmt::ImportStmt;
use parse_js::ast::stmt::SwitchBranch;
use parse_js::ast::stmt::SwitchStmt;

type BlockStmtNode = Node<BlockStmt>;
type CatchBlockNode = Node<CatchBlock>;
type ClassDeclNode = Node<ClassDecl>;
type ClassExprNode = Node<ClassExpr>;
type ClassStaticBlockNode = Node<ClassStaticBlock>;
type ForInStmtNode = Node<ForInStmt>;
type ForOfStmtNode = Node<ForOfStmt>;
type ForTripleStmtNode = Node<ForTripleStmt>;
type FuncDeclNode = Node<FuncDecl>;
type FuncExprNode = Node<FuncExpr>;
type FuncNode = Node<Func>;
type IdExprNode = Node<IdExpr>;
type IdPatNode = Node<IdPat>;
type ImportStmtNode = Node<ImportStmt>;
type SwitchBranchNode = Node<SwitchBranch>;
type SwitchStmtNode = Node<SwitchStmt>;
type VarDeclNode = Node<VarDecl>;

/// Walks a tree once, declaring bindings in their scopes and attaching the enclosing [`Scope`] to
/// every `IdExpr` and `IdPat` node.
///
/// Every `IdPat` is a binding. It is declared in the scope on top of `decl_target_stack`, which the
/// owning declaration (variable declaration, parameters, catch clause, import) pushes on entry.
#[derive(VisitorMut)]
#[visitor(
  BlockStmtNode,
  CatchBlockNode,
  ClassDeclNode,
  ClassExprNode,
  ClassStaticBlockNode,
  ForInOfLhs,
  ForInStmtNode,
  ForOfStmtNode,
  ForTripleStmtNode,
  FuncDeclNode(enter),
  FuncExprNode,
  FuncNode,
  IdExprNode(enter),
  IdPatNode(enter),
  ImportStmtNode,
  SwitchBranchNode(enter),
  SwitchStmtNode,
  VarDeclNode
)]
pub struct DeclVisitor {
  scope_stack: Vec<Scope>,
  decl_target_stack: Vec<Scope>,
  // Whether each enclosing switch has pushed its shared block scope yet.
  switch_scope_stack: Vec<bool>,
}

impl DeclVisitor {
  pub fn new(top_level_scope: Scope) -> DeclVisitor {
    DeclVisitor {
      scope_stack: vec![top_level_scope],
      decl_target_stack: Vec::new(),
      switch_scope_stack: Vec::new(),
    }
  }

  fn scope(&self) -> &Scope {
    // The top-level scope is never popped.
    &self.scope_stack[self.scope_stack.len() - 1]
  }

  fn enter_scope(&mut self, typ: ScopeType) {
    let child = self.scope().create_child_scope(typ);
    self.scope_stack.push(child);
  }

  fn exit_scope(&mut self) {
    debug_assert!(self.scope_stack.len() > 1);
    self.scope_stack.pop();
  }

  fn decl_target(&self, mode: VarDeclMode) -> Scope {
    match mode {
      VarDeclMode::Var => self.scope().find_closure_or_root(),
      VarDeclMode::Let | VarDeclMode::Const => self.scope().clone(),
    }
  }
}

impl DeclVisitor {
  fn enter_block_stmt_node(&mut self, _node: &mut BlockStmtNode) {
    self.enter_scope(ScopeType::Block);
  }

  fn exit_block_stmt_node(&mut self, _node: &mut BlockStmtNode) {
    self.exit_scope();
  }

  // The parameter and the body share one scope.
  fn enter_catch_block_node(&mut self, _node: &mut CatchBlockNode) {
    self.enter_scope(ScopeType::Catch);
    let scope = self.scope().clone();
    self.decl_target_stack.push(scope);
  }

  fn exit_catch_block_node(&mut self, _node: &mut CatchBlockNode) {
    self.decl_target_stack.pop();
    self.exit_scope();
  }

  fn enter_class_decl_node(&mut self, node: &mut ClassDeclNode) {
    if let Some(name) = &node.stx.name {
      self.scope().data_mut().add_symbol(name.stx.name.clone());
    };
    self.enter_scope(ScopeType::Class);
  }

  fn exit_class_decl_node(&mut self, _node: &mut ClassDeclNode) {
    self.exit_scope();
  }

  fn enter_class_expr_node(&mut self, node: &mut ClassExprNode) {
    self.enter_scope(ScopeType::Class);
    if let Some(name) = &node.stx.name {
      self.scope().data_mut().add_symbol(name.stx.name.clone());
    };
  }

  fn exit_class_expr_node(&mut self, _node: &mut ClassExprNode) {
    self.exit_scope();
  }

  fn enter_class_static_block_node(&mut self, _node: &mut ClassStaticBlockNode) {
    self.enter_scope(ScopeType::ClassStaticBlock);
  }

  fn exit_class_static_block_node(&mut self, _node: &mut ClassStaticBlockNode) {
    self.exit_scope();
  }

  fn enter_for_in_of_lhs(&mut self, node: &mut ForInOfLhs) {
    if let ForInOfLhs::Decl((mode, _)) = node {
      let target = self.decl_target(*mode);
      self.decl_target_stack.push(target);
    };
  }

  fn exit_for_in_of_lhs(&mut self, node: &mut ForInOfLhs) {
    if let ForInOfLhs::Decl(_) = node {
      self.decl_target_stack.pop();
    };
  }

  // Loop heads get a block scope so `let` bindings in them stay inside the loop.
  fn enter_for_in_stmt_node(&mut self, _node: &mut ForInStmtNode) {
    self.enter_scope(ScopeType::Block);
  }

  fn exit_for_in_stmt_node(&mut self, _node: &mut ForInStmtNode) {
    self.exit_scope();
  }

  fn enter_for_of_stmt_node(&mut self, _node: &mut ForOfStmtNode) {
    self.enter_scope(ScopeType::Block);
  }

  fn exit_for_of_stmt_node(&mut self, _node: &mut ForOfStmtNode) {
    self.exit_scope();
  }

  fn enter_for_triple_stmt_node(&mut self, _node: &mut ForTripleStmtNode) {
    self.enter_scope(ScopeType::Block);
  }

  fn exit_for_triple_stmt_node(&mut self, _node: &mut ForTripleStmtNode) {
    self.exit_scope();
  }

  fn enter_func_decl_node(&mut self, node: &mut FuncDeclNode) {
    if let Some(name) = &node.stx.name {
      // Block-level functions are also visible in the closure in sloppy mode, so bind both.
      let name = name.stx.name.clone();
      self.scope().data_mut().add_symbol(name.clone());
      self.scope().find_closure_or_root().data_mut().add_symbol(name);
    };
  }

  fn enter_func_expr_node(&mut self, node: &mut FuncExprNode) {
    self.enter_scope(ScopeType::FunctionExpressionName);
    if let Some(name) = &node.stx.name {
      self.scope().data_mut().add_symbol(name.stx.name.clone());
    };
  }

  fn exit_func_expr_node(&mut self, _node: &mut FuncExprNode) {
    self.exit_scope();
  }

  fn enter_func_node(&mut self, node: &mut FuncNode) {
    self.enter_scope(if node.stx.arrow {
      ScopeType::ArrowFunction
    } else {
      ScopeType::NonArrowFunction
    });
    // Parameters.
    let scope = self.scope().clone();
    self.decl_target_stack.push(scope);
  }

  fn exit_func_node(&mut self, _node: &mut FuncNode) {
    self.decl_target_stack.pop();
    self.exit_scope();
  }

  fn enter_id_expr_node(&mut self, node: &mut IdExprNode) {
    let scope = self.scope().clone();
    scope.add_reference(&node.stx.name);
    node.assoc.set(scope);
  }

  fn enter_id_pat_node(&mut self, node: &mut IdPatNode) {
    if let Some(target) = self.decl_target_stack.last() {
      target.data_mut().add_symbol(node.stx.name.clone());
    };
    node.assoc.set(self.scope().clone());
  }

  fn enter_import_stmt_node(&mut self, _node: &mut ImportStmtNode) {
    let root = self.scope().root();
    self.decl_target_stack.push(root);
  }

  fn exit_import_stmt_node(&mut self, _node: &mut ImportStmtNode) {
    self.decl_target_stack.pop();
  }

  fn enter_switch_stmt_node(&mut self, _node: &mut SwitchStmtNode) {
    self.switch_scope_stack.push(false);
  }

  // All branches share one block scope, entered at the first branch so the discriminant stays outside.
  fn enter_switch_branch_node(&mut self, _node: &mut SwitchBranchNode) {
    let Some(active) = self.switch_scope_stack.last().copied() else {
      return;
    };
    if !active {
      self.enter_scope(ScopeType::Block);
      if let Some(active) = self.switch_scope_stack.last_mut() {
        *active = true;
      };
    };
  }

  fn exit_switch_stmt_node(&mut self, _node: &mut SwitchStmtNode) {
    if self.switch_scope_stack.pop() == Some(true) {
      self.exit_scope();
    };
  }

  fn enter_var_decl_node(&mut self, node: &mut VarDeclNode) {
    let target = self.decl_target(node.stx.mode);
    self.decl_target_stack.push(target);
  }

  fn exit_var_decl_node(&mut self, _node: &mut VarDeclNode) {
    self.decl_target_stack.pop();
  }
}
