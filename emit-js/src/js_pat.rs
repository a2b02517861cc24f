use parse_js::ast::expr::pat::{ArrPat, ObjPat, ObjPatProp, Pat};
use parse_js::ast::expr::Expr;
use parse_js::ast::func::ParamDecl;
use parse_js::ast::node::Node;

use crate::emitter::{with_node_context, EmitResult};
use crate::js_expr::{emit_js_expr_with_min_prec, emit_obj_key};
use crate::precedence::assignment_prec;
use crate::Emitter;

pub fn emit_js_pat(out: &mut Emitter, pat: &Node<Pat>) -> EmitResult {
  with_node_context(pat.loc, || match pat.stx.as_ref() {
    Pat::Arr(arr) => emit_array_pattern(out, arr),
    Pat::Id(id) => {
      out.write_identifier(&id.stx.name);
      Ok(())
    }
    Pat::Obj(obj) => emit_object_pattern(out, obj),
  })
}

fn emit_default(out: &mut Emitter, default: Option<&Node<Expr>>) -> EmitResult {
  if let Some(default) = default {
    out.write_soft_space();
    out.write_punct("=");
    out.write_soft_space();
    emit_js_expr_with_min_prec(out, default, assignment_prec())?;
  }
  Ok(())
}

pub fn emit_js_param_decl(out: &mut Emitter, decl: &Node<ParamDecl>) -> EmitResult {
  if decl.stx.rest {
    out.write_punct("...");
  }
  emit_js_pat(out, &decl.stx.pattern)?;
  emit_default(out, decl.stx.default_value.as_ref())
}

pub(crate) fn emit_js_param_list(out: &mut Emitter, params: &[Node<ParamDecl>]) -> EmitResult {
  out.write_punct("(");
  out.emit_punctuated_list(params, ",", emit_js_param_decl)?;
  out.write_punct(")");
  Ok(())
}

fn emit_array_pattern(out: &mut Emitter, arr: &Node<ArrPat>) -> EmitResult {
  let elements = &arr.stx.elements;
  out.write_punct("[");
  out.emit_punctuated_list(elements, ",", |out, elem| match elem {
    Some(elem) => {
      emit_js_pat(out, &elem.target)?;
      emit_default(out, elem.default_value.as_ref())
    }
    None => Ok(()),
  })?;
  if let Some(rest) = &arr.stx.rest {
    if !elements.is_empty() {
      out.write_comma();
    }
    out.write_punct("...");
    emit_js_pat(out, rest)?;
  } else if matches!(elements.last(), Some(None)) {
    // Keeps a trailing hole, as for array literals.
    out.write_punct(",");
  }
  out.write_punct("]");
  Ok(())
}

fn emit_object_pattern(out: &mut Emitter, obj: &Node<ObjPat>) -> EmitResult {
  let properties = &obj.stx.properties;
  let non_empty = !properties.is_empty() || obj.stx.rest.is_some();
  out.write_punct("{");
  if non_empty {
    out.write_soft_space();
  }
  out.emit_punctuated_list(properties, ",", emit_obj_pat_prop)?;
  if let Some(rest) = &obj.stx.rest {
    if !properties.is_empty() {
      out.write_comma();
    }
    out.write_punct("...");
    out.write_identifier(&rest.stx.name);
  }
  if non_empty {
    out.write_soft_space();
  }
  out.write_punct("}");
  Ok(())
}

fn emit_obj_pat_prop(out: &mut Emitter, prop: &Node<ObjPatProp>) -> EmitResult {
  emit_obj_key(out, &prop.stx.key)?;
  if !prop.stx.shorthand {
    out.write_punct(":");
    out.write_soft_space();
    emit_js_pat(out, &prop.stx.target)?;
  }
  emit_default(out, prop.stx.default_value.as_ref())
}
