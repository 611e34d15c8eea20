//! Tokens and the trivia attached to them.
//!
//! Every byte of a source file belongs either to a token's text or to the
//! leading/trailing trivia of some token, so a tree built from these renders
//! back to the exact input.

use serde::{Deserialize, Serialize};

/// A piece of non-semantic text between tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trivia {
    /// Spaces and tabs.
    Whitespace(String),
    /// `\n`, `\r\n` or `\r`.
    EndOfLine(String),
    /// `// ...` up to (not including) the line break.
    LineComment(String),
    /// `/* ... */`
    BlockComment(String),
    /// Anything else the frontend did not turn into a token
    /// (preprocessor lines, error recovery leftovers).
    Skipped(String),
}

impl Trivia {
    pub fn text(&self) -> &str {
        match self {
            Trivia::Whitespace(s)
            | Trivia::EndOfLine(s)
            | Trivia::LineComment(s)
            | Trivia::BlockComment(s)
            | Trivia::Skipped(s) => s,
        }
    }

    pub fn is_end_of_line(&self) -> bool {
        matches!(self, Trivia::EndOfLine(_))
    }
}

/// An ordered run of trivia.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaList(Vec<Trivia>);

impl TriviaList {
    pub fn new(items: Vec<Trivia>) -> Self {
        Self(items)
    }

    /// A single space, the usual separator between keywords.
    pub fn space() -> Self {
        Self(vec![Trivia::Whitespace(" ".to_string())])
    }

    /// Split raw inter-token text into trivia pieces.
    pub fn parse(text: &str) -> Self {
        let mut items = Vec::new();
        let mut rest = text;

        while !rest.is_empty() {
            let trivia = if rest.starts_with("\r\n") {
                Trivia::EndOfLine(rest[..2].to_string())
            } else if rest.starts_with('\n') || rest.starts_with('\r') {
                Trivia::EndOfLine(rest[..1].to_string())
            } else if rest.starts_with("//") {
                let len = rest.find(|c: char| c == '\n' || c == '\r').unwrap_or(rest.len());
                Trivia::LineComment(rest[..len].to_string())
            } else if rest.starts_with("/*") {
                let len = rest[2..].find("*/").map(|i| i + 4).unwrap_or(rest.len());
                Trivia::BlockComment(rest[..len].to_string())
            } else if rest.starts_with(is_inline_whitespace) {
                let len = rest
                    .char_indices()
                    .find(|(_, c)| !is_inline_whitespace(*c))
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                Trivia::Whitespace(rest[..len].to_string())
            } else {
                let len = rest
                    .char_indices()
                    .find(|(_, c)| c.is_whitespace())
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                Trivia::Skipped(rest[..len].to_string())
            };

            let len = trivia.text().len();
            items.push(trivia);
            rest = &rest[len..];
        }

        Self(items)
    }

    /// Split the text between two tokens into the trailing trivia of the first
    /// (everything up to and including the first line break) and the leading
    /// trivia of the second.
    pub fn split_gap(text: &str) -> (TriviaList, TriviaList) {
        let mut items = Self::parse(text).0;
        match items.iter().position(Trivia::is_end_of_line) {
            Some(eol) => {
                let leading = items.split_off(eol + 1);
                (Self(items), Self(leading))
            }
            None => (Self(items), Self::default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trivia> {
        self.0.iter()
    }

    pub fn insert(&mut self, index: usize, trivia: Trivia) {
        let index = index.min(self.0.len());
        self.0.insert(index, trivia);
    }

    pub fn push(&mut self, trivia: Trivia) {
        self.0.push(trivia);
    }

    pub fn contains(&self, trivia: &Trivia) -> bool {
        self.0.contains(trivia)
    }

    pub fn write_source(&self, out: &mut String) {
        for trivia in &self.0 {
            out.push_str(trivia.text());
        }
    }
}

fn is_inline_whitespace(c: char) -> bool {
    c.is_whitespace() && c != '\n' && c != '\r'
}

/// A lexical token with its surrounding trivia.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub leading: TriviaList,
    pub text: String,
    pub trailing: TriviaList,
}

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            leading: TriviaList::default(),
            text: text.into(),
            trailing: TriviaList::default(),
        }
    }

    pub fn with_leading(mut self, leading: TriviaList) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_trailing(mut self, trailing: TriviaList) -> Self {
        self.trailing = trailing;
        self
    }

    pub fn write_source(&self, out: &mut String) {
        self.leading.write_source(out);
        out.push_str(&self.text);
        self.trailing.write_source(out);
    }

    pub fn to_source(&self) -> String {
        let mut out = String::new();
        self.write_source(&mut out);
        out
    }
}

/// Render a token run including all trivia.
pub fn write_tokens(tokens: &[Token], out: &mut String) {
    for token in tokens {
        token.write_source(out);
    }
}

/// Concatenate token texts, ignoring trivia.
pub fn tokens_text(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// Give `new` the outer trivia of `old`: the leading trivia of the first token
/// and the trailing trivia of the last.
pub fn transfer_trivia(new: &mut [Token], old: &[Token]) {
    if let (Some(first), Some(old_first)) = (new.first_mut(), old.first()) {
        first.leading = old_first.leading.clone();
    }
    if let (Some(last), Some(old_last)) = (new.last_mut(), old.last()) {
        last.trailing = old_last.trailing.clone();
    }
}
