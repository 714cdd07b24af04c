use std::collections::HashMap;

use regex_lite::Regex;

use super::TierError;
use super::styled::{Token, TokenClass};

/// Tags with a keyword list.
const KEYWORD_LANGUAGES: &[&str] = &["javascript", "typescript", "python", "java", "cpp", "c", "html", "css"];

/// Keyword lists for the short-fragment pass.
pub fn keywords_for(tag: &str) -> &'static [&'static str] {
    match tag {
        "javascript" => &[
            "function", "var", "let", "const", "if", "else", "for", "while", "return", "true",
            "false", "null", "undefined",
        ],
        "typescript" => &[
            "function", "var", "let", "const", "if", "else", "for", "while", "return", "true",
            "false", "null", "undefined", "interface", "type", "class",
        ],
        "python" => &[
            "def", "if", "else", "elif", "for", "while", "return", "True", "False", "None",
            "class", "import", "from",
        ],
        "java" => &[
            "public", "private", "protected", "class", "interface", "if", "else", "for", "while",
            "return", "true", "false", "null",
        ],
        "cpp" => &[
            "if", "else", "for", "while", "return", "true", "false", "nullptr", "class", "struct",
            "public", "private",
        ],
        "c" => &["if", "else", "for", "while", "return", "true", "false", "NULL", "struct"],
        "html" => &[
            "html", "head", "body", "div", "span", "p", "h1", "h2", "h3", "h4", "h5", "h6", "a",
            "img", "ul", "ol", "li",
        ],
        "css" => &[
            "color", "background", "margin", "padding", "border", "width", "height", "display",
            "position", "float",
        ],
        _ => &[],
    }
}

/// Compiled patterns for the three passes.
pub struct ShortContentRules {
    keywords: HashMap<&'static str, Regex>,
    strings: Regex,
    line_comments: Regex,
    block_comments: Regex,
}

impl ShortContentRules {
    pub fn new() -> Result<Self, regex_lite::Error> {
        let mut keywords = HashMap::new();
        for &tag in KEYWORD_LANGUAGES {
            keywords.insert(tag, keyword_pattern(keywords_for(tag))?);
        }
        Ok(Self {
            keywords,
            strings: Regex::new(r#""[^"'`]*?"|'[^"'`]*?'|`[^"'`]*?`"#)?,
            line_comments: Regex::new(r"(?m)//.*$")?,
            block_comments: Regex::new(r"(?s)/\*.*?\*/")?,
        })
    }

    /// Keyword, then string, then comment passes over a per-byte class map.
    ///
    /// A pass only claims bytes no earlier pass claimed, so a keyword inside
    /// a string literal keeps its keyword class.
    pub fn highlight(&self, text: &str, tag: &str) -> Result<Vec<Token>, TierError> {
        let mut classes = vec![TokenClass::Plain; text.len()];

        if let Some(keyword_re) = self.keywords.get(tag) {
            claim(&mut classes, keyword_re, text, TokenClass::Keyword);
        }
        claim(&mut classes, &self.strings, text, TokenClass::String);
        claim(&mut classes, &self.line_comments, text, TokenClass::Comment);
        claim(&mut classes, &self.block_comments, text, TokenClass::Comment);

        Ok(runs(text, &classes))
    }
}

fn keyword_pattern(words: &[&str]) -> Result<Regex, regex_lite::Error> {
    let alternation = words.iter().map(|w| regex_lite::escape(w)).collect::<Vec<_>>().join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
}

fn claim(classes: &mut [TokenClass], re: &Regex, text: &str, class: TokenClass) {
    for m in re.find_iter(text) {
        for slot in &mut classes[m.start()..m.end()] {
            if *slot == TokenClass::Plain {
                *slot = class;
            }
        }
    }
}

fn runs(text: &str, classes: &[TokenClass]) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    for (offset, ch) in text.char_indices() {
        let class = classes[offset];
        match tokens.last_mut() {
            Some(last) if last.class == class => last.text.push(ch),
            _ => tokens.push(Token {
                class,
                text: ch.to_string(),
            }),
        }
    }
    tokens
}
