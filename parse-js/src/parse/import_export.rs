use super::expr::is_identifier_name;
use super::ParseCtx;
use super::Parser;
use crate::ast::expr::pat::IdPat;
use crate::ast::import_export::ExportName;
use crate::ast::import_export::ExportNames;
use crate::ast::import_export::ImportName;
use crate::ast::import_export::ImportNames;
use crate::ast::node::Node;
use crate::ast::stmt::ExportDefaultExprStmt;
use crate::ast::stmt::ExportListStmt;
use crate::ast::stmt::ImportStmt;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  // Names in import and export lists can be any identifier name or a string.
  fn module_export_name(&mut self) -> SyntaxResult<String> {
    let t = self.peek();
    if t.typ == TT::LiteralString {
      return self.lit_str_val();
    };
    self.consume();
    if !is_identifier_name(t.typ) {
      return Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("exported name")));
    };
    Ok(self.string(t.loc))
  }

  fn import_names(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<ImportName>>> {
    self.require(TT::BraceOpen)?;
    let mut names = Vec::new();
    loop {
      if self.consume_if(TT::BraceClose).is_match() {
        break;
      };
      let name = self.with_loc(|p| {
        let t = p.peek();
        let importable = p.module_export_name()?;
        let alias = if p.consume_if(TT::KeywordAs).is_match() {
          p.id_pat(ctx)?
        } else {
          if !ctx.rules.is_valid_pattern_identifier(t.typ) {
            return Err(p.unexpected(&t, SyntaxErrorType::ExpectedSyntax("identifier")));
          };
          Node::new(t.loc, IdPat {
            name: importable.clone(),
          })
        };
        Ok(ImportName { importable, alias })
      })?;
      names.push(name);
      if !self.consume_if(TT::Comma).is_match() {
        self.require(TT::BraceClose)?;
        break;
      };
    }
    Ok(names)
  }

  pub fn import_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let node = self.with_loc(|p| {
      p.require(TT::KeywordImport)?;
      if p.peek().typ == TT::LiteralString {
        let module = p.lit_str_val()?;
        p.require_semicolon_or_asi()?;
        return Ok(ImportStmt {
          default: None,
          names: None,
          module,
        });
      };
      let default = if ctx.rules.is_valid_pattern_identifier(p.peek().typ) {
        Some(p.id_pat(ctx)?)
      } else {
        None
      };
      let names = if default.is_none() || p.consume_if(TT::Comma).is_match() {
        if p.consume_if(TT::Asterisk).is_match() {
          p.require(TT::KeywordAs)?;
          Some(ImportNames::All(p.id_pat(ctx)?))
        } else {
          Some(ImportNames::Specific(p.import_names(ctx)?))
        }
      } else {
        None
      };
      p.require(TT::KeywordFrom)?;
      let module = p.lit_str_val()?;
      p.require_semicolon_or_asi()?;
      Ok(ImportStmt {
        default,
        names,
        module,
      })
    })?;
    Ok(node.into_wrapped())
  }

  fn export_names(&mut self) -> SyntaxResult<Vec<Node<ExportName>>> {
    self.require(TT::BraceOpen)?;
    let mut names = Vec::new();
    loop {
      if self.consume_if(TT::BraceClose).is_match() {
        break;
      };
      let name = self.with_loc(|p| {
        let exportable = p.module_export_name()?;
        let alias = if p.consume_if(TT::KeywordAs).is_match() {
          p.module_export_name()?
        } else {
          exportable.clone()
        };
        Ok(ExportName { exportable, alias })
      })?;
      names.push(name);
      if !self.consume_if(TT::Comma).is_match() {
        self.require(TT::BraceClose)?;
        break;
      };
    }
    Ok(names)
  }

  pub fn export_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let cp = self.checkpoint();
    self.require(TT::KeywordExport)?;
    let t = self.peek();
    let mut stmt: Node<Stmt> = match t.typ {
      TT::BraceOpen => {
        let names = self.export_names()?;
        let from = if self.consume_if(TT::KeywordFrom).is_match() {
          Some(self.lit_str_val()?)
        } else {
          None
        };
        self.require_semicolon_or_asi()?;
        Node::new(t.loc, ExportListStmt {
          names: ExportNames::Specific(names),
          from,
        })
        .into_wrapped()
      }
      TT::Asterisk => {
        self.consume();
        let alias = if self.consume_if(TT::KeywordAs).is_match() {
          Some(self.module_export_name()?)
        } else {
          None
        };
        self.require(TT::KeywordFrom)?;
        let from = self.lit_str_val()?;
        self.require_semicolon_or_asi()?;
        Node::new(t.loc, ExportListStmt {
          names: ExportNames::All(alias),
          from: Some(from),
        })
        .into_wrapped()
      }
      TT::KeywordVar | TT::KeywordLet | TT::KeywordConst => {
        let decl = self.var_decl(ctx, &[], true)?;
        self.require_semicolon_or_asi()?;
        decl.into_wrapped()
      }
      TT::KeywordFunction | TT::KeywordAsync => self.func_decl(ctx, true, false)?,
      TT::KeywordDefault => {
        self.consume();
        let (a, b) = self.peek_2();
        let is_func = a.typ == TT::KeywordFunction
          || (a.typ == TT::KeywordAsync
            && b.typ == TT::KeywordFunction
            && !b.preceded_by_line_terminator);
        if is_func {
          self.func_decl(ctx, true, true)?
        } else if a.typ == TT::KeywordClass {
          self.class_decl(ctx, true, true)?
        } else {
          let expression = self.expr_assign(ctx, &[])?;
          self.require_semicolon_or_asi()?;
          Node::new(expression.loc, ExportDefaultExprStmt { expression }).into_wrapped()
        }
      }
      TT::KeywordClass => self.class_decl(ctx, true, false)?,
      _ => {
        return Err(self.unexpected(&t, SyntaxErrorType::ExpectedSyntax("exportable")));
      }
    };
    stmt.loc = self.since_checkpoint(&cp);
    Ok(stmt)
  }
}
