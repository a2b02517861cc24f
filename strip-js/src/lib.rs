use derive_visitor::DriveMut;
use emit_js::emit;
use parse_js::ast::node::Node;
use parse_js::ast::stx::TopLevel;
use parse_js::parse_with_options;
use parse_js::ParseOptions;
use rewrite::Rewriter;
use symbol_js::compute_symbols;
use tracing::debug;
use tracing::debug_span;

pub mod config;
pub mod err;
pub mod eval;
pub mod global;
pub mod locate;
pub mod pattern;
pub mod rewrite;
#[cfg(test)]
mod tests;

pub use config::PatternSpec;
pub use emit_js::EmitMode;
pub use emit_js::EmitOptions;
pub use err::StripError;
pub use eval::EvalResult;
pub use eval::JsValue;
pub use pattern::ProbeKind;
pub use rewrite::ConstructKind;
pub use rewrite::Firing;
pub use rewrite::Outcome;
pub use symbol_js::TopLevelMode;

#[derive(Clone, Debug, Default)]
pub struct StripOptions {
  pub pattern: PatternSpec,
  pub top_level_mode: TopLevelMode,
  pub emit: EmitOptions,
}

impl StripOptions {
  pub fn new(top_level_mode: TopLevelMode) -> Self {
    StripOptions {
      top_level_mode,
      ..Default::default()
    }
  }

  pub fn with_pattern(mut self, pattern: PatternSpec) -> Self {
    self.pattern = pattern;
    self
  }

  pub fn with_emit(mut self, emit: EmitOptions) -> Self {
    self.emit = emit;
    self
  }
}

#[derive(Clone, Debug)]
pub struct StripOutput {
  pub code: String,
  pub firings: Vec<Firing>,
}

/// Removes the branches of `if` statements and `?:` expressions whose tests
/// are decided by the probe, returning the rewritten program.
///
/// Comments and formatting only survive if nothing was rewritten, in which
/// case `code` is `source` unchanged. Otherwise a hashbang and any comments
/// before the first statement are kept at the top of the output.
///
/// # Arguments
///
/// * `options` - Probe to decide, whether the source is a script or module, and how to print the result.
/// * `source` - Source code.
///
/// # Examples
///
/// ```
/// use strip_js::{strip, StripOptions, TopLevelMode};
///
/// let options = StripOptions::new(TopLevelMode::Global);
/// let out = strip(&options, "if (module.hot) { module.hot.accept(); } start();").unwrap();
/// assert_eq!(out.code, "start();");
/// assert_eq!(out.firings.len(), 1);
/// ```
pub fn strip(options: &StripOptions, source: &str) -> Result<StripOutput, StripError> {
  let mut top = parse_with_options(source, ParseOptions {
    top_level_mode: options.top_level_mode,
  })
  .map_err(StripError::Syntax)?;
  compute_symbols(&mut top, options.top_level_mode);
  let header = leading_trivia(source, &top);
  let firings = strip_top_level(&mut top, &options.pattern);
  if firings.is_empty() {
    return Ok(StripOutput {
      code: source.to_string(),
      firings,
    });
  };
  let mut code = emit(&top.stx, options.emit).map_err(StripError::Emit)?;
  if !header.is_empty() {
    code.insert(0, '\n');
    code.insert_str(0, header);
  };
  Ok(StripOutput { code, firings })
}

// Everything before the first statement: the hashbang and leading comments.
fn leading_trivia<'a>(source: &'a str, top: &Node<TopLevel>) -> &'a str {
  let end = top.stx.body.first().map_or(source.len(), |stmt| stmt.loc.0);
  source.get(..end).unwrap_or("").trim_end()
}

/// Rewrites an already parsed program in place. Identifiers must carry the
/// scopes attached by `compute_symbols`; without them nothing is recognised
/// as the global probe object and nothing fires.
pub fn strip_top_level(top: &mut Node<TopLevel>, spec: &PatternSpec) -> Vec<Firing> {
  let span = debug_span!(
    "strip",
    object = %spec.object_name,
    property = %spec.property_name
  );
  let _guard = span.enter();
  let mut rewriter = Rewriter::new(spec);
  top.drive_mut(&mut rewriter);
  debug!(firings = rewriter.firings.len(), "strip pass finished");
  rewriter.firings
}
