/// Text shown when nothing has been revealed yet.
pub const PLACEHOLDER_TEXT: &str = "Import a text file to start the presentation...";

/// Token classes understood by both skins. Names follow Prism's `token <class>`
/// convention so existing stylesheets keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Plain,
    Keyword,
    String,
    Comment,
    Number,
    Boolean,
    Constant,
    Operator,
    Punctuation,
    Function,
    ClassName,
    Property,
    Tag,
    AttrName,
}

impl TokenClass {
    /// CSS class suffix, `None` for plain runs.
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Keyword => Some("keyword"),
            Self::String => Some("string"),
            Self::Comment => Some("comment"),
            Self::Number => Some("number"),
            Self::Boolean => Some("boolean"),
            Self::Constant => Some("constant"),
            Self::Operator => Some("operator"),
            Self::Punctuation => Some("punctuation"),
            Self::Function => Some("function"),
            Self::ClassName => Some("class-name"),
            Self::Property => Some("property"),
            Self::Tag => Some("tag"),
            Self::AttrName => Some("attr-name"),
        }
    }
}

/// Which strategy produced a [`StyledText`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTier {
    FullSyntax,
    ShortContent,
    EscapeOnly,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub class: TokenClass,
    pub text: String,
}

/// Renderer-agnostic styled text: a flat run list where neighbouring runs
/// never share a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText {
    tokens: Vec<Token>,
    tier: RenderTier,
}

impl StyledText {
    pub fn new(tier: RenderTier) -> Self {
        Self {
            tokens: Vec::new(),
            tier,
        }
    }

    pub fn from_tokens(tier: RenderTier, tokens: Vec<Token>) -> Self {
        let mut styled = Self::new(tier);
        for token in tokens {
            styled.push(token.class, &token.text);
        }
        styled
    }

    /// Unstyled rendering of `text`. Cannot fail.
    pub fn escaped(text: &str) -> Self {
        let mut styled = Self::new(RenderTier::EscapeOnly);
        styled.push(TokenClass::Plain, text);
        styled
    }

    pub fn placeholder() -> Self {
        let mut styled = Self::new(RenderTier::Placeholder);
        styled.push(TokenClass::Plain, PLACEHOLDER_TEXT);
        styled
    }

    /// Append a run, merging it into the previous one when the class matches.
    pub fn push(&mut self, class: TokenClass, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.tokens.last_mut() {
            Some(last) if last.class == class => last.text.push_str(text),
            _ => self.tokens.push(Token {
                class,
                text: text.to_string(),
            }),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn tier(&self) -> RenderTier {
        self.tier
    }

    pub fn is_placeholder(&self) -> bool {
        self.tier == RenderTier::Placeholder
    }

    /// Concatenated text of all runs.
    pub fn plain_text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// First run carrying `class` whose text equals `text`, if any.
    pub fn find(&self, class: TokenClass, text: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.class == class && t.text == text)
    }

    /// Prism-compatible markup, e.g. `<span class="token keyword">let</span>`.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token.class.css_class() {
                Some(class) => {
                    out.push_str("<span class=\"token ");
                    out.push_str(class);
                    out.push_str("\">");
                    push_escaped(&mut out, &token.text);
                    out.push_str("</span>");
                }
                None => push_escaped(&mut out, &token.text),
            }
        }
        out
    }
}

/// Escape text for embedding in HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
