use super::ParseCtx;
use super::ParsePatternRules;
use super::Parser;
use crate::ast::node::Node;
use crate::ast::stx::TopLevel;
use crate::error::SyntaxResult;
use crate::token::TT;
use crate::TopLevelMode;

impl<'a> Parser<'a> {
  pub fn parse_top_level(&mut self) -> SyntaxResult<Node<TopLevel>> {
    let ctx = ParseCtx {
      rules: ParsePatternRules {
        // Modules allow top-level await, so `await` is never an identifier there.
        await_allowed: self.top_level_mode() == TopLevelMode::Global,
        yield_allowed: true,
      },
    };
    let body = self.stmts(ctx, TT::EOF)?;
    self.require(TT::EOF)?;
    Ok(Node::new(self.source_range(), TopLevel { body }))
  }
}
