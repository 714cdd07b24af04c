use std::collections::HashMap;

use syntect::parsing::{Scope, ScopeStack};

use super::styled::TokenClass;

/// Scope-name prefixes in priority order. The first match for the innermost
/// classifiable scope decides the token class.
const PREFIX_TABLE: &[(&str, TokenClass)] = &[
    ("comment", TokenClass::Comment),
    ("punctuation.definition.comment", TokenClass::Comment),
    ("string", TokenClass::String),
    ("punctuation.definition.string", TokenClass::String),
    ("constant.numeric", TokenClass::Number),
    ("constant.language", TokenClass::Boolean),
    ("constant", TokenClass::Constant),
    ("keyword.operator", TokenClass::Operator),
    ("keyword", TokenClass::Keyword),
    ("storage", TokenClass::Keyword),
    ("entity.name.function", TokenClass::Function),
    ("support.function", TokenClass::Function),
    ("variable.function", TokenClass::Function),
    ("entity.name.tag", TokenClass::Tag),
    ("entity.other.attribute-name", TokenClass::AttrName),
    ("support.type.property-name", TokenClass::Property),
    ("entity.name.class", TokenClass::ClassName),
    ("entity.name.type", TokenClass::ClassName),
    ("entity.other.inherited-class", TokenClass::ClassName),
    ("support.class", TokenClass::ClassName),
    ("support.type", TokenClass::ClassName),
    ("punctuation", TokenClass::Punctuation),
];

/// Maps syntect scope stacks to token classes, memoizing per scope atom.
pub struct ScopeMap {
    by_scope: HashMap<Scope, Option<TokenClass>>,
}

impl ScopeMap {
    pub fn new() -> Self {
        Self {
            by_scope: HashMap::new(),
        }
    }

    /// Classify a full stack by looking at its innermost scopes first.
    pub fn classify(&mut self, stack: &ScopeStack) -> TokenClass {
        for scope in stack.as_slice().iter().rev() {
            if let Some(class) = self.classify_scope(*scope) {
                return class;
            }
        }
        TokenClass::Plain
    }

    fn classify_scope(&mut self, scope: Scope) -> Option<TokenClass> {
        *self
            .by_scope
            .entry(scope)
            .or_insert_with(|| class_for_name(&scope.build_string()))
    }
}

impl Default for ScopeMap {
    fn default() -> Self {
        Self::new()
    }
}

fn class_for_name(name: &str) -> Option<TokenClass> {
    PREFIX_TABLE
        .iter()
        .find(|(prefix, _)| {
            name == *prefix
                || (name.starts_with(prefix) && name.as_bytes().get(prefix.len()) == Some(&b'.'))
        })
        .map(|(_, class)| *class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn stack(scopes: &str) -> ScopeStack {
        ScopeStack::from_str(scopes).unwrap()
    }

    #[test]
    fn test_prefix_requires_segment_boundary() {
        assert_eq!(class_for_name("string.quoted.double.js"), Some(TokenClass::String));
        assert_eq!(class_for_name("stringy.thing"), None);
        assert_eq!(class_for_name("keyword.operator.assignment"), Some(TokenClass::Operator));
        assert_eq!(class_for_name("storage.type.js"), Some(TokenClass::Keyword));
        assert_eq!(class_for_name("source.js"), None);
    }

    #[test]
    fn test_innermost_scope_wins() {
        let mut map = ScopeMap::new();
        let s = stack("source.js string.quoted.double.js punctuation.definition.string.begin.js");
        assert_eq!(map.classify(&s), TokenClass::String);

        let s = stack("source.js meta.function.js entity.name.function.js");
        assert_eq!(map.classify(&s), TokenClass::Function);
    }

    #[test]
    fn test_unclassified_stack_is_plain() {
        let mut map = ScopeMap::new();
        let s = stack("source.js variable.other.readwrite.js");
        assert_eq!(map.classify(&s), TokenClass::Plain);
    }
}
