//! Make a revealed prefix look syntactically finished before tokenizing.
//!
//! Closers are only ever appended; the caller discards everything past the
//! original prefix after tokenizing.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    CLike,
    Python,
    Markup,
    Stylesheet,
    Json,
    Other,
}

fn family(tag: &str) -> Family {
    match tag {
        "javascript" | "typescript" | "jsx" | "tsx" => Family::CLike,
        "python" => Family::Python,
        "html" => Family::Markup,
        "css" => Family::Stylesheet,
        "json" => Family::Json,
        _ => Family::Other,
    }
}

#[derive(Clone, Copy)]
enum Comments {
    None,
    /// `//` line comments and `/* */` blocks.
    Slash,
    /// `/* */` blocks only.
    Block,
    /// `#` line comments.
    Hash,
}

struct Rules {
    quotes: &'static [char],
    brackets: &'static [(char, char)],
    comments: Comments,
    close_quote: bool,
}

const CLIKE: Rules = Rules {
    quotes: &['"', '\'', '`'],
    brackets: &[('{', '}'), ('(', ')'), ('[', ']')],
    comments: Comments::Slash,
    close_quote: true,
};

const PYTHON: Rules = Rules {
    quotes: &['"', '\''],
    brackets: &[('(', ')')],
    comments: Comments::Hash,
    close_quote: true,
};

const STYLESHEET: Rules = Rules {
    quotes: &[],
    brackets: &[('{', '}')],
    comments: Comments::Block,
    close_quote: false,
};

const JSON: Rules = Rules {
    quotes: &['"'],
    brackets: &[('{', '}')],
    comments: Comments::None,
    close_quote: true,
};

/// Return `text` with whatever closers its language family needs appended.
pub fn complete_syntax(text: &str, tag: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    match family(tag) {
        Family::CLike => complete_with(text, &CLIKE),
        Family::Python => complete_with(text, &PYTHON),
        Family::Stylesheet => complete_with(text, &STYLESHEET),
        Family::Json => complete_with(text, &JSON),
        Family::Markup => complete_markup(text),
        Family::Other => text.to_string(),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    Quoted(char),
    LineComment,
    BlockComment,
}

fn complete_with(text: &str, rules: &Rules) -> String {
    let mut state = State::Code;
    let mut closers: Vec<char> = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => {
                let next = chars.peek().copied();
                match (rules.comments, c, next) {
                    (Comments::Slash, '/', Some('/')) => {
                        chars.next();
                        state = State::LineComment;
                        continue;
                    }
                    (Comments::Slash | Comments::Block, '/', Some('*')) => {
                        chars.next();
                        state = State::BlockComment;
                        continue;
                    }
                    (Comments::Hash, '#', _) => {
                        state = State::LineComment;
                        continue;
                    }
                    _ => {}
                }
                if rules.quotes.contains(&c) {
                    state = State::Quoted(c);
                } else if let Some(&(_, close)) = rules.brackets.iter().find(|(open, _)| *open == c) {
                    closers.push(close);
                } else if closers.last() == Some(&c) {
                    closers.pop();
                }
            }
            State::Quoted(quote) => {
                if c == '\\' {
                    chars.next();
                } else if c == quote || (c == '\n' && quote != '`') {
                    state = State::Code;
                }
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                }
            }
        }
    }

    let mut result = String::with_capacity(text.len() + closers.len() + 1);
    result.push_str(text);
    if let State::Quoted(quote) = state
        && rules.close_quote
    {
        result.push(quote);
    }
    result.extend(closers.iter().rev());
    result
}

/// Close a trailing tag that was cut off mid-way, e.g. `<div class="a"`.
fn complete_markup(text: &str) -> String {
    let mut result = text.to_string();
    if let Some(open) = text.rfind('<') {
        let tail = &text[open + 1..];
        let starts_with_name = tail
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        if starts_with_name && !tail.contains('>') {
            result.push('>');
        }
    }
    result
}
