use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};

use super::TierError;
use super::scope_map::ScopeMap;
use super::styled::{Token, TokenClass};

/// Syntect lookup token for a language tag. Tags without a bundled grammar
/// borrow the closest relative.
pub fn grammar_token(tag: &str) -> &str {
    match tag {
        "typescript" | "jsx" | "tsx" => "js",
        "scss" | "sass" | "less" => "css",
        "vue" | "svelte" => "html",
        "csharp" => "cs",
        "bash" => "sh",
        other => other,
    }
}

/// Look up a real grammar for `tag`. Plain Text does not count.
pub fn find_grammar<'a>(syntax_set: &'a SyntaxSet, tag: &str) -> Option<&'a SyntaxReference> {
    let syntax = syntax_set.find_syntax_by_token(grammar_token(tag))?;
    if syntax.name == "Plain Text" {
        return None;
    }
    Some(syntax)
}

/// Tokenize `text` line by line. Only the first `keep` bytes are emitted, so
/// padding appended after the real prefix never reaches the output.
pub fn tokenize(
    text: &str,
    keep: usize,
    syntax: &SyntaxReference,
    syntax_set: &SyntaxSet,
    scope_map: &mut ScopeMap,
) -> Result<Vec<Token>, TierError> {
    let mut parse_state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();
    let mut tokens: Vec<Token> = Vec::new();
    let mut line_start = 0;

    for line in LinesWithEndings::new(text) {
        if line_start >= keep {
            break;
        }
        let ops = parse_state
            .parse_line(line, syntax_set)
            .map_err(|e| TierError::Failed(format!("parse error: {}", e)))?;

        let mut cursor = 0;
        for (index, op) in &ops {
            let index = (*index).min(line.len());
            if index > cursor {
                emit(&mut tokens, scope_map.classify(&stack), &line[cursor..index], line_start + cursor, keep);
                cursor = index;
            }
            stack
                .apply(op)
                .map_err(|e| TierError::Failed(format!("scope error: {}", e)))?;
        }
        if cursor < line.len() {
            emit(&mut tokens, scope_map.classify(&stack), &line[cursor..], line_start + cursor, keep);
        }
        line_start += line.len();
    }

    Ok(tokens)
}

fn emit(
    tokens: &mut Vec<Token>,
    class: TokenClass,
    piece: &str,
    offset: usize,
    keep: usize,
) {
    if offset >= keep {
        return;
    }
    let piece = if offset + piece.len() > keep {
        let mut end = keep - offset;
        while !piece.is_char_boundary(end) {
            end -= 1;
        }
        &piece[..end]
    } else {
        piece
    };
    if piece.is_empty() {
        return;
    }
    match tokens.last_mut() {
        Some(last) if last.class == class => last.text.push_str(piece),
        _ => tokens.push(Token {
            class,
            text: piece.to_string(),
        }),
    }
}

/// Iterates lines and keeps the trailing `\n`, which syntect's newline
/// grammars expect.
pub struct LinesWithEndings<'a> {
    text: &'a str,
}

impl<'a> LinesWithEndings<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl<'a> Iterator for LinesWithEndings<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.text.is_empty() {
            return None;
        }
        let end = self.text.find('\n').map(|i| i + 1).unwrap_or(self.text.len());
        let line = &self.text[..end];
        self.text = &self.text[end..];
        Some(line)
    }
}
