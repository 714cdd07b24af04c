pub mod classifier;
pub mod completion;
mod grammar;
mod keywords;
mod scope_map;
pub mod styled;

use std::cell::RefCell;

use syntect::parsing::SyntaxSet;
use tracing::debug;

use keywords::ShortContentRules;
use scope_map::ScopeMap;
use styled::{RenderTier, StyledText, Token};

pub use classifier::{classify, language_name};
pub use completion::complete_syntax;

/// Prefixes at or below this many characters skip the grammar tier.
pub const SHORT_CONTENT_THRESHOLD: usize = 10;

/// Anything that can turn a revealed prefix into styled text.
pub trait Highlight {
    fn render(&self, text: &str, language_tag: &str) -> StyledText;
}

/// Why a tier did not produce output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierError {
    /// The tier does not handle this input; try the next one.
    NotApplicable,
    /// The tier tried and failed.
    Failed(String),
}

const STYLED_PLAN: &[RenderTier] = &[
    RenderTier::FullSyntax,
    RenderTier::ShortContent,
    RenderTier::EscapeOnly,
];

const UNSTYLED_PLAN: &[RenderTier] = &[RenderTier::EscapeOnly];

/// Tiered highlighter: grammar tokenizer, short-fragment regex pass, plain escape.
pub struct HighlightEngine {
    syntax_set: SyntaxSet,
    scope_map: RefCell<ScopeMap>,
    short_rules: Option<ShortContentRules>,
}

impl HighlightEngine {
    pub fn new() -> Self {
        Self::with_syntax_set(SyntaxSet::load_defaults_newlines())
    }

    pub fn with_syntax_set(syntax_set: SyntaxSet) -> Self {
        let short_rules = match ShortContentRules::new() {
            Ok(rules) => Some(rules),
            Err(e) => {
                debug!(error = %e, "short-content patterns unavailable");
                None
            }
        };
        Self {
            syntax_set,
            scope_map: RefCell::new(ScopeMap::new()),
            short_rules,
        }
    }

    /// Ordered tiers to try for a language.
    pub fn plan(language_tag: &str) -> &'static [RenderTier] {
        if classifier::is_unstyled(language_tag) {
            UNSTYLED_PLAN
        } else {
            STYLED_PLAN
        }
    }

    /// Whether a grammar is bundled for the language.
    pub fn has_grammar(&self, language_tag: &str) -> bool {
        grammar::find_grammar(&self.syntax_set, language_tag).is_some()
    }

    /// Run a single tier.
    pub fn attempt(
        &self,
        tier: RenderTier,
        text: &str,
        language_tag: &str,
    ) -> Result<Vec<Token>, TierError> {
        let short = text.chars().count() <= SHORT_CONTENT_THRESHOLD;
        match tier {
            RenderTier::FullSyntax => {
                if short {
                    return Err(TierError::NotApplicable);
                }
                self.full_syntax(text, language_tag)
            }
            RenderTier::ShortContent => {
                if !short {
                    return Err(TierError::NotApplicable);
                }
                match &self.short_rules {
                    Some(rules) => rules.highlight(text, language_tag),
                    None => Err(TierError::Failed("short-content patterns unavailable".into())),
                }
            }
            RenderTier::EscapeOnly => Ok(StyledText::escaped(text).tokens().to_vec()),
            RenderTier::Placeholder => Err(TierError::NotApplicable),
        }
    }

    fn full_syntax(&self, text: &str, language_tag: &str) -> Result<Vec<Token>, TierError> {
        let syntax = grammar::find_grammar(&self.syntax_set, language_tag)
            .ok_or_else(|| TierError::Failed(format!("no grammar for `{}`", language_tag)))?;
        let padded = complete_syntax(text, language_tag);
        let mut scope_map = self.scope_map.borrow_mut();
        grammar::tokenize(&padded, text.len(), syntax, &self.syntax_set, &mut scope_map)
    }
}

impl Default for HighlightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlight for HighlightEngine {
    fn render(&self, text: &str, language_tag: &str) -> StyledText {
        for &tier in Self::plan(language_tag) {
            match self.attempt(tier, text, language_tag) {
                Ok(tokens) => return StyledText::from_tokens(tier, tokens),
                Err(TierError::NotApplicable) => {}
                Err(TierError::Failed(reason)) => {
                    debug!(?tier, language = language_tag, %reason, "highlight tier failed, falling back");
                }
            }
        }
        StyledText::escaped(text)
    }
}
