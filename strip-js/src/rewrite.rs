use crate::config::PatternSpec;
use crate::eval::evaluate;
use crate::locate::governed_probes;
use derive_visitor::VisitorMut;
use parse_js::ast::class_or_object::ClassStaticBlock;
use parse_js::ast::expr::lit::LitNullExpr;
use parse_js::ast::expr::CondExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::func::Func;
use parse_js::ast::func::FuncBody;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::BlockStmt;
use parse_js::ast::stmt::CatchBlock;
use parse_js::ast::stmt::IfStmt;
use parse_js::ast::stmt::Stmt;
use parse_js::ast::stmt::SwitchBranch;
use parse_js::ast::stx::TopLevel;
use parse_js::loc::Loc;
use serde::Serialize;
use std::mem;
use tracing::debug;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructKind {
  If,
  Conditional,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  /// Replaced by its consequent.
  Consequent,
  /// Replaced by its alternate.
  Alternate,
  /// An `if` without an alternate whose test is always false.
  Removed,
}

/// One rewritten construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Firing {
  pub loc: Loc,
  pub construct: ConstructKind,
  pub outcome: Outcome,
}

type BlockStmtNode = Node<BlockStmt>;
type CatchBlockNode = Node<CatchBlock>;
type ClassStaticBlockNode = Node<ClassStaticBlock>;
type ExprNode = Node<Expr>;
type FuncNode = Node<Func>;
type StmtNode = Node<Stmt>;
type SwitchBranchNode = Node<SwitchBranch>;
type TopLevelNode = Node<TopLevel>;

// Marks a statement that was stripped without a replacement. The statement list or slot that owns
// it decides what happens to it once its own exit hook runs.
struct RemovedStmt;

fn removed_stmt(loc: Loc) -> Node<Stmt> {
  let mut stmt: Node<Stmt> = Node::new(loc, BlockStmt { body: Vec::new() }).into_wrapped();
  stmt.assoc.set(RemovedStmt);
  stmt
}

fn is_removed(stmt: &Node<Stmt>) -> bool {
  stmt.assoc.get::<RemovedStmt>().is_some()
}

fn drop_removed(stmts: &mut Vec<Node<Stmt>>) {
  stmts.retain(|stmt| !is_removed(stmt));
}

// A slot that must hold a statement, such as a loop body, keeps an empty block.
fn keep_required(slot: &mut Node<Stmt>) {
  if is_removed(slot) {
    *slot = Node::new(slot.loc, BlockStmt { body: Vec::new() }).into_wrapped();
  };
}

/// Rewrites decided `if` statements and `?:` expressions on the way back up, so inner constructs
/// are settled (and recorded) before the ones containing them.
#[derive(VisitorMut)]
#[visitor(
  BlockStmtNode(exit),
  CatchBlockNode(exit),
  ClassStaticBlockNode(exit),
  ExprNode(exit),
  FuncNode(exit),
  StmtNode(exit),
  SwitchBranchNode(exit),
  TopLevelNode(exit)
)]
pub(crate) struct Rewriter {
  spec: PatternSpec,
  pub firings: Vec<Firing>,
}

impl Rewriter {
  pub fn new(spec: &PatternSpec) -> Self {
    Rewriter {
      spec: spec.clone(),
      firings: Vec::new(),
    }
  }

  /// The branch a test selects, if a probe governs it and it evaluates to a
  /// concrete value.
  fn decide(&self, test: &Node<Expr>, construct: ConstructKind) -> Option<bool> {
    let probes = governed_probes(test, &self.spec);
    if probes.is_empty() {
      return None;
    };
    let result = evaluate(test, &self.spec);
    let value = result.as_bool();
    if value.is_none() {
      trace!(
        start = test.loc.0,
        end = test.loc.1,
        ?construct,
        ?result,
        probes = probes.len(),
        "test is not decidable"
      );
    };
    value
  }

  fn fire(&mut self, loc: Loc, construct: ConstructKind, outcome: Outcome) {
    debug!(start = loc.0, end = loc.1, ?construct, ?outcome, "stripped branch");
    self.firings.push(Firing {
      loc,
      construct,
      outcome,
    });
  }
}

impl Rewriter {
  fn exit_block_stmt_node(&mut self, node: &mut BlockStmtNode) {
    drop_removed(&mut node.stx.body);
  }

  fn exit_catch_block_node(&mut self, node: &mut CatchBlockNode) {
    drop_removed(&mut node.stx.body);
  }

  fn exit_class_static_block_node(&mut self, node: &mut ClassStaticBlockNode) {
    drop_removed(&mut node.stx.body);
  }

  fn exit_func_node(&mut self, node: &mut FuncNode) {
    if let FuncBody::Block(body) = &mut node.stx.body {
      drop_removed(body);
    };
  }

  fn exit_switch_branch_node(&mut self, node: &mut SwitchBranchNode) {
    drop_removed(&mut node.stx.body);
  }

  fn exit_top_level_node(&mut self, node: &mut TopLevelNode) {
    drop_removed(&mut node.stx.body);
  }

  fn exit_stmt_node(&mut self, node: &mut StmtNode) {
    // Child statements have already been rewritten.
    match node.stx.as_mut() {
      Stmt::DoWhile(stmt) => keep_required(&mut stmt.stx.body),
      Stmt::ForIn(stmt) => keep_required(&mut stmt.stx.body),
      Stmt::ForOf(stmt) => keep_required(&mut stmt.stx.body),
      Stmt::ForTriple(stmt) => keep_required(&mut stmt.stx.body),
      Stmt::If(stmt) => {
        keep_required(&mut stmt.stx.consequent);
        if stmt.stx.alternate.as_ref().is_some_and(is_removed) {
          stmt.stx.alternate = None;
        };
      }
      Stmt::Label(stmt) => keep_required(&mut stmt.stx.statement),
      Stmt::While(stmt) => keep_required(&mut stmt.stx.body),
      _ => {}
    };

    let value = match node.stx.as_ref() {
      Stmt::If(if_stmt) => self.decide(&if_stmt.stx.test, ConstructKind::If),
      _ => None,
    };
    let Some(value) = value else {
      return;
    };
    let loc = node.loc;
    let taken = mem::replace(node, removed_stmt(loc));
    let Stmt::If(if_stmt) = *taken.stx else {
      return;
    };
    let IfStmt {
      consequent,
      alternate,
      ..
    } = *if_stmt.stx;
    if value {
      self.fire(loc, ConstructKind::If, Outcome::Consequent);
      *node = consequent;
    } else if let Some(alternate) = alternate {
      self.fire(loc, ConstructKind::If, Outcome::Alternate);
      *node = alternate;
    } else {
      self.fire(loc, ConstructKind::If, Outcome::Removed);
    };
  }

  fn exit_expr_node(&mut self, node: &mut ExprNode) {
    let value = match node.stx.as_ref() {
      Expr::Cond(cond) => self.decide(&cond.stx.test, ConstructKind::Conditional),
      _ => None,
    };
    let Some(value) = value else {
      return;
    };
    let loc = node.loc;
    let placeholder = Node::new(loc, LitNullExpr {}).into_wrapped();
    let taken = mem::replace(node, placeholder);
    let Expr::Cond(cond) = *taken.stx else {
      return;
    };
    let CondExpr {
      consequent,
      alternate,
      ..
    } = *cond.stx;
    if value {
      self.fire(loc, ConstructKind::Conditional, Outcome::Consequent);
      *node = consequent;
    } else {
      self.fire(loc, ConstructKind::Conditional, Outcome::Alternate);
      *node = alternate;
    };
  }
}
