use parse_js::ast::expr::Expr;
use parse_js::ast::import_export::{ExportNames, ImportNames};
use parse_js::ast::node::Node;
use parse_js::ast::stmt::decl::{ClassDecl, FuncDecl, VarDecl, VarDeclMode};
use parse_js::ast::stmt::{
  BlockStmt, CatchBlock, DoWhileStmt, ExportDefaultExprStmt, ExportListStmt, ForInOfLhs,
  ForInStmt, ForOfStmt, ForTripleStmt, ForTripleStmtInit, IfStmt, ImportStmt, LabelStmt, Stmt,
  SwitchStmt, TryStmt, WhileStmt,
};
use parse_js::ast::stx::TopLevel;

use crate::emitter::{with_node_context, EmitError, EmitResult};
use crate::escape::is_plain_identifier_name;
use crate::js_expr::{emit_js_class, emit_js_expr, emit_js_expr_with_min_prec, emit_js_func};
use crate::js_pat::emit_js_pat;
use crate::precedence::{
  assignment_prec, contains_bare_in, expr_stmt_needs_parens, leftmost, CALL_MEMBER_PRECEDENCE,
};
use crate::Emitter;

/// Emits every statement of a program. In pretty mode each statement is on
/// its own line and the output ends with a newline.
pub fn emit_js_top_level(out: &mut Emitter, top: &TopLevel) -> EmitResult {
  let mut first = true;
  for stmt in &top.body {
    if matches!(stmt.stx.as_ref(), Stmt::Empty(_)) {
      continue;
    }
    if !first {
      out.write_line_break();
    }
    first = false;
    emit_js_stmt(out, stmt)?;
  }
  if !first {
    out.write_line_break();
  }
  Ok(())
}

pub fn emit_js_stmt(out: &mut Emitter, stmt: &Node<Stmt>) -> EmitResult {
  with_node_context(stmt.loc, || match stmt.stx.as_ref() {
    Stmt::Block(block) => emit_block(out, block),
    Stmt::Break(stmt) => emit_jump(out, "break", stmt.stx.label.as_deref()),
    Stmt::Continue(stmt) => emit_jump(out, "continue", stmt.stx.label.as_deref()),
    Stmt::Debugger(_) => {
      out.write_keyword("debugger");
      out.write_semicolon();
      Ok(())
    }
    Stmt::DoWhile(stmt) => emit_do_while(out, stmt),
    Stmt::Empty(_) => {
      out.write_semicolon();
      Ok(())
    }
    Stmt::ExportDefaultExpr(stmt) => emit_export_default_expr(out, stmt),
    Stmt::ExportList(stmt) => emit_export_list(out, stmt),
    Stmt::Expr(stmt) => emit_expr_stmt(out, &stmt.stx.expr),
    Stmt::ForIn(stmt) => emit_for_in(out, stmt),
    Stmt::ForOf(stmt) => emit_for_of(out, stmt),
    Stmt::ForTriple(stmt) => emit_for_triple(out, stmt),
    Stmt::If(stmt) => emit_if(out, stmt),
    Stmt::Import(stmt) => emit_import(out, stmt),
    Stmt::Label(stmt) => emit_label(out, stmt),
    Stmt::Return(stmt) => {
      out.write_keyword("return");
      if let Some(value) = &stmt.stx.value {
        out.write_soft_space();
        emit_js_expr(out, value)?;
      }
      out.write_semicolon();
      Ok(())
    }
    Stmt::Switch(stmt) => emit_switch(out, stmt),
    Stmt::Throw(stmt) => {
      out.write_keyword("throw");
      out.write_soft_space();
      emit_js_expr(out, &stmt.stx.value)?;
      out.write_semicolon();
      Ok(())
    }
    Stmt::Try(stmt) => emit_try(out, stmt),
    Stmt::While(stmt) => emit_while(out, stmt),
    Stmt::ClassDecl(decl) => emit_class_decl(out, decl),
    Stmt::FunctionDecl(decl) => emit_func_decl(out, decl),
    Stmt::VarDecl(decl) => {
      emit_var_decl(out, decl, false)?;
      out.write_semicolon();
      Ok(())
    }
  })
}

/// Emits `{`, the statements one per line, and `}`. An empty list prints `{}`.
pub fn emit_js_block_body(out: &mut Emitter, body: &[Node<Stmt>]) -> EmitResult {
  out.write_punct("{");
  let mut empty = true;
  out.indent();
  for stmt in body {
    if matches!(stmt.stx.as_ref(), Stmt::Empty(_)) {
      continue;
    }
    empty = false;
    out.write_line_break();
    emit_js_stmt(out, stmt)?;
  }
  out.dedent();
  if !empty {
    out.write_line_break();
  }
  out.write_punct("}");
  Ok(())
}

fn emit_block(out: &mut Emitter, block: &Node<BlockStmt>) -> EmitResult {
  emit_js_block_body(out, &block.stx.body)
}

// Bodies of `if`, loops and labels are always printed as blocks, which also
// rules out dangling `else` ambiguity.
fn emit_stmt_as_block(out: &mut Emitter, stmt: &Node<Stmt>) -> EmitResult {
  out.write_soft_space();
  match stmt.stx.as_ref() {
    Stmt::Block(block) => emit_block(out, block),
    _ => emit_js_block_body(out, std::slice::from_ref(stmt)),
  }
}

fn emit_jump(out: &mut Emitter, keyword: &str, label: Option<&str>) -> EmitResult {
  out.write_keyword(keyword);
  if let Some(label) = label {
    out.write_identifier(label);
  }
  out.write_semicolon();
  Ok(())
}

fn emit_expr_stmt(out: &mut Emitter, expr: &Node<Expr>) -> EmitResult {
  if expr_stmt_needs_parens(expr) {
    out.write_punct("(");
    emit_js_expr(out, expr)?;
    out.write_punct(")");
  } else {
    emit_js_expr(out, expr)?;
  }
  out.write_semicolon();
  Ok(())
}

fn emit_paren_test(out: &mut Emitter, keyword: &str, test: &Node<Expr>) -> EmitResult {
  out.write_keyword(keyword);
  out.write_soft_space();
  out.write_punct("(");
  emit_js_expr(out, test)?;
  out.write_punct(")");
  Ok(())
}

fn emit_if(out: &mut Emitter, if_stmt: &Node<IfStmt>) -> EmitResult {
  emit_paren_test(out, "if", &if_stmt.stx.test)?;
  emit_stmt_as_block(out, &if_stmt.stx.consequent)?;
  if let Some(alternate) = &if_stmt.stx.alternate {
    out.write_soft_space();
    out.write_keyword("else");
    match alternate.stx.as_ref() {
      // Chains stay flat: `else if`.
      Stmt::If(chained) => {
        out.write_space();
        with_node_context(alternate.loc, || emit_if(out, chained))?;
      }
      _ => emit_stmt_as_block(out, alternate)?,
    }
  }
  Ok(())
}

fn emit_while(out: &mut Emitter, while_stmt: &Node<WhileStmt>) -> EmitResult {
  emit_paren_test(out, "while", &while_stmt.stx.condition)?;
  emit_stmt_as_block(out, &while_stmt.stx.body)
}

fn emit_do_while(out: &mut Emitter, do_while: &Node<DoWhileStmt>) -> EmitResult {
  out.write_keyword("do");
  emit_stmt_as_block(out, &do_while.stx.body)?;
  out.write_soft_space();
  emit_paren_test(out, "while", &do_while.stx.condition)?;
  out.write_semicolon();
  Ok(())
}

fn emit_for_triple(out: &mut Emitter, for_stmt: &Node<ForTripleStmt>) -> EmitResult {
  out.write_keyword("for");
  out.write_soft_space();
  out.write_punct("(");
  match &for_stmt.stx.init {
    ForTripleStmtInit::None => {}
    ForTripleStmtInit::Expr(expr) => {
      // `for (a in b;;)` would be read as a for-in head.
      let wrap = contains_bare_in(expr) || expr_stmt_needs_parens(expr);
      if wrap {
        out.write_punct("(");
      }
      emit_js_expr(out, expr)?;
      if wrap {
        out.write_punct(")");
      }
    }
    ForTripleStmtInit::Decl(decl) => emit_var_decl(out, decl, true)?,
  };
  out.write_semicolon();
  if let Some(cond) = &for_stmt.stx.cond {
    out.write_soft_space();
    emit_js_expr(out, cond)?;
  }
  out.write_semicolon();
  if let Some(post) = &for_stmt.stx.post {
    out.write_soft_space();
    emit_js_expr(out, post)?;
  }
  out.write_punct(")");
  emit_stmt_as_block(out, &for_stmt.stx.body)
}

fn emit_for_in_of_lhs(out: &mut Emitter, lhs: &ForInOfLhs) -> EmitResult {
  match lhs {
    ForInOfLhs::Assign(target) => {
      // `for (let [a] of b)` would declare instead of assign; `for (async of x)` is banned.
      let wrap = match leftmost(target).stx.as_ref() {
        Expr::Id(id) => id.stx.name == "let" || id.stx.name == "async",
        _ => false,
      };
      if wrap {
        out.write_punct("(");
        emit_js_expr(out, target)?;
        out.write_punct(")");
        Ok(())
      } else {
        emit_js_expr_with_min_prec(out, target, CALL_MEMBER_PRECEDENCE)
      }
    }
    ForInOfLhs::Decl((mode, pat)) => {
      out.write_keyword(var_decl_keyword(*mode));
      out.write_soft_space();
      emit_js_pat(out, pat)
    }
  }
}

fn emit_for_in(out: &mut Emitter, for_in: &Node<ForInStmt>) -> EmitResult {
  out.write_keyword("for");
  out.write_soft_space();
  out.write_punct("(");
  emit_for_in_of_lhs(out, &for_in.stx.lhs)?;
  out.write_soft_space();
  out.write_keyword("in");
  out.write_soft_space();
  emit_js_expr(out, &for_in.stx.rhs)?;
  out.write_punct(")");
  emit_stmt_as_block(out, &for_in.stx.body)
}

fn emit_for_of(out: &mut Emitter, for_of: &Node<ForOfStmt>) -> EmitResult {
  out.write_keyword("for");
  if for_of.stx.await_ {
    out.write_keyword("await");
  }
  out.write_soft_space();
  out.write_punct("(");
  emit_for_in_of_lhs(out, &for_of.stx.lhs)?;
  out.write_soft_space();
  out.write_keyword("of");
  out.write_soft_space();
  emit_js_expr_with_min_prec(out, &for_of.stx.rhs, assignment_prec())?;
  out.write_punct(")");
  emit_stmt_as_block(out, &for_of.stx.body)
}

fn emit_label(out: &mut Emitter, label: &Node<LabelStmt>) -> EmitResult {
  out.write_identifier(&label.stx.name);
  out.write_punct(":");
  out.write_soft_space();
  // Not wrapped: `continue label` must still find the labelled loop.
  emit_js_stmt(out, &label.stx.statement)
}

fn emit_switch(out: &mut Emitter, switch: &Node<SwitchStmt>) -> EmitResult {
  emit_paren_test(out, "switch", &switch.stx.test)?;
  out.write_soft_space();
  out.write_punct("{");
  out.indent();
  for branch in &switch.stx.branches {
    out.write_line_break();
    match &branch.stx.case {
      Some(case) => {
        out.write_keyword("case");
        out.write_soft_space();
        emit_js_expr(out, case)?;
      }
      None => out.write_keyword("default"),
    };
    out.write_punct(":");
    out.indent();
    for stmt in &branch.stx.body {
      out.write_line_break();
      emit_js_stmt(out, stmt)?;
    }
    out.dedent();
  }
  out.dedent();
  if !switch.stx.branches.is_empty() {
    out.write_line_break();
  }
  out.write_punct("}");
  Ok(())
}

fn emit_catch(out: &mut Emitter, catch: &Node<CatchBlock>) -> EmitResult {
  out.write_soft_space();
  out.write_keyword("catch");
  if let Some(parameter) = &catch.stx.parameter {
    out.write_soft_space();
    out.write_punct("(");
    emit_js_pat(out, parameter)?;
    out.write_punct(")");
  }
  out.write_soft_space();
  emit_js_block_body(out, &catch.stx.body)
}

fn emit_try(out: &mut Emitter, try_stmt: &Node<TryStmt>) -> EmitResult {
  out.write_keyword("try");
  out.write_soft_space();
  emit_block(out, &try_stmt.stx.wrapped)?;
  if let Some(catch) = &try_stmt.stx.catch {
    emit_catch(out, catch)?;
  }
  if let Some(finally) = &try_stmt.stx.finally {
    out.write_soft_space();
    out.write_keyword("finally");
    out.write_soft_space();
    emit_block(out, finally)?;
  }
  Ok(())
}

fn var_decl_keyword(mode: VarDeclMode) -> &'static str {
  match mode {
    VarDeclMode::Var => "var",
    VarDeclMode::Let => "let",
    VarDeclMode::Const => "const",
  }
}

fn emit_var_decl(out: &mut Emitter, decl: &Node<VarDecl>, in_for_head: bool) -> EmitResult {
  if decl.stx.export {
    out.write_keyword("export");
  }
  out.write_keyword(var_decl_keyword(decl.stx.mode));
  out.write_soft_space();
  out.emit_punctuated_list(&decl.stx.declarators, ",", |out, declarator| {
    emit_js_pat(out, &declarator.pattern)?;
    let Some(init) = &declarator.initializer else {
      return Ok(());
    };
    out.write_soft_space();
    out.write_punct("=");
    out.write_soft_space();
    if in_for_head && contains_bare_in(init) {
      out.write_punct("(");
      emit_js_expr(out, init)?;
      out.write_punct(")");
      Ok(())
    } else {
      emit_js_expr_with_min_prec(out, init, assignment_prec())
    }
  })
}

fn emit_func_decl(out: &mut Emitter, decl: &Node<FuncDecl>) -> EmitResult {
  // A default export also carries the `export` flag.
  if decl.stx.export_default {
    out.write_keyword("export");
    out.write_keyword("default");
  } else if decl.stx.export {
    out.write_keyword("export");
  }
  let name = decl.stx.name.as_ref().map(|name| name.stx.name.as_str());
  emit_js_func(out, name, &decl.stx.func)
}

fn emit_class_decl(out: &mut Emitter, decl: &Node<ClassDecl>) -> EmitResult {
  // A default export also carries the `export` flag.
  if decl.stx.export_default {
    out.write_keyword("export");
    out.write_keyword("default");
  } else if decl.stx.export {
    out.write_keyword("export");
  }
  let name = decl.stx.name.as_ref().map(|name| name.stx.name.as_str());
  emit_js_class(out, name, decl.stx.extends.as_ref(), &decl.stx.members)
}

fn emit_export_default_expr(out: &mut Emitter, stmt: &Node<ExportDefaultExprStmt>) -> EmitResult {
  out.write_keyword("export");
  out.write_keyword("default");
  out.write_soft_space();
  let expr = &stmt.stx.expression;
  // A leading `function` or `class` would turn the expression into a declaration.
  if matches!(leftmost(expr).stx.as_ref(), Expr::Func(_) | Expr::Class(_)) {
    out.write_punct("(");
    emit_js_expr(out, expr)?;
    out.write_punct(")");
  } else {
    emit_js_expr_with_min_prec(out, expr, assignment_prec())?;
  }
  out.write_semicolon();
  Ok(())
}

fn emit_module_name(out: &mut Emitter, name: &str) {
  if is_plain_identifier_name(name) {
    out.write_identifier(name);
  } else {
    out.write_string_literal(name);
  }
}

fn emit_from(out: &mut Emitter, module: &str) {
  out.write_soft_space();
  out.write_keyword("from");
  out.write_soft_space();
  out.write_string_literal(module);
}

fn emit_import(out: &mut Emitter, import: &Node<ImportStmt>) -> EmitResult {
  out.write_keyword("import");
  let mut has_bindings = false;
  if let Some(default) = &import.stx.default {
    out.write_identifier(&default.stx.name);
    has_bindings = true;
  }
  if let Some(names) = &import.stx.names {
    if has_bindings {
      out.write_comma();
    } else {
      out.write_soft_space();
    }
    has_bindings = true;
    match names {
      ImportNames::All(alias) => {
        out.write_punct("*");
        out.write_keyword("as");
        out.write_identifier(&alias.stx.name);
      }
      ImportNames::Specific(names) => {
        out.write_punct("{");
        out.emit_punctuated_list(names, ",", |out, name| {
          let alias = &name.stx.alias.stx.name;
          if &name.stx.importable != alias {
            emit_module_name(out, &name.stx.importable);
            out.write_keyword("as");
          }
          out.write_identifier(alias);
          Ok::<_, EmitError>(())
        })?;
        out.write_punct("}");
      }
    };
  }
  if has_bindings {
    emit_from(out, &import.stx.module);
  } else {
    out.write_soft_space();
    out.write_string_literal(&import.stx.module);
  }
  out.write_semicolon();
  Ok(())
}

fn emit_export_list(out: &mut Emitter, export: &Node<ExportListStmt>) -> EmitResult {
  out.write_keyword("export");
  match &export.stx.names {
    ExportNames::All(alias) => {
      out.write_punct("*");
      if let Some(alias) = alias {
        out.write_keyword("as");
        emit_module_name(out, alias);
      }
    }
    ExportNames::Specific(names) => {
      out.write_soft_space();
      out.write_punct("{");
      out.emit_punctuated_list(names, ",", |out, name| {
        emit_module_name(out, &name.stx.exportable);
        if name.stx.exportable != name.stx.alias {
          out.write_keyword("as");
          emit_module_name(out, &name.stx.alias);
        }
        Ok::<_, EmitError>(())
      })?;
      out.write_punct("}");
    }
  };
  if let Some(from) = &export.stx.from {
    emit_from(out, from);
  }
  out.write_semicolon();
  Ok(())
}
