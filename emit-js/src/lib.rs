mod emitter;
mod escape;
mod js_expr;
mod js_pat;
mod js_stmt;
pub mod precedence;

pub use emitter::EmitError;
pub use emitter::EmitErrorKind;
pub use emitter::EmitMode;
pub use emitter::EmitOptions;
pub use emitter::EmitResult;
pub use emitter::Emitter;
pub use escape::emit_string_literal_double_quoted;
pub use js_expr::emit_js_expr;
pub use js_expr::render_number;
pub use js_pat::emit_js_pat;
pub use js_stmt::emit_js_stmt;
pub use js_stmt::emit_js_top_level;

use parse_js::ast::stx::TopLevel;

/// Prints a whole program.
pub fn emit(top: &TopLevel, options: EmitOptions) -> Result<String, EmitError> {
  let mut emitter = Emitter::new(options);
  emit_js_top_level(&mut emitter, top)?;
  Ok(emitter.into_string())
}
