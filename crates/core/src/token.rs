use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification carried by a single token.
///
/// `Whitespace` and `Delimiter` are assigned by the tokenizer and never change;
/// `Static` tokens move between `Static`, `Amount`, `Merchant` and `Wildcard`
/// as the user classifies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Static,
    Delimiter,
    Whitespace,
    Amount,
    Merchant,
    Wildcard,
}

impl TokenKind {
    /// Whitespace and delimiter tokens only ever separate classified tokens.
    pub fn is_separator(self) -> bool {
        matches!(self, TokenKind::Delimiter | TokenKind::Whitespace)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Static => write!(f, "static"),
            TokenKind::Delimiter => write!(f, "delimiter"),
            TokenKind::Whitespace => write!(f, "whitespace"),
            TokenKind::Amount => write!(f, "amount"),
            TokenKind::Merchant => write!(f, "merchant"),
            TokenKind::Wildcard => write!(f, "wildcard"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self { text: text.into(), kind }
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '-' | ',' | '.')
}

/// Split a message into tokens covering every character exactly once.
///
/// Each whitespace character and each of `-`, `,`, `.` becomes its own
/// one-character token; maximal runs of any other characters become `Static`.
pub fn tokenize(message: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run_start: Option<usize> = None;

    for (idx, c) in message.char_indices() {
        let kind = if c.is_whitespace() {
            TokenKind::Whitespace
        } else if is_delimiter(c) {
            TokenKind::Delimiter
        } else {
            if run_start.is_none() {
                run_start = Some(idx);
            }
            continue;
        };

        if let Some(start) = run_start.take() {
            tokens.push(Token::new(&message[start..idx], TokenKind::Static));
        }
        tokens.push(Token::new(&message[idx..idx + c.len_utf8()], kind));
    }

    if let Some(start) = run_start {
        tokens.push(Token::new(&message[start..], TokenKind::Static));
    }

    tokens
}

/// Concatenate token texts back into the message they came from.
pub fn join_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn splits_words_and_spaces() {
        let tokens = tokenize("Rs 500 debited");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Rs", " ", "500", " ", "debited"]);
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Static,
                TokenKind::Whitespace,
                TokenKind::Static,
                TokenKind::Whitespace,
                TokenKind::Static,
            ]
        );
    }

    #[test]
    fn delimiters_are_single_character_tokens() {
        let tokens = tokenize("Rs.1,234.50-ok");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Rs", ".", "1", ",", "234", ".", "50", "-", "ok"]);
        assert_eq!(tokens[1].kind, TokenKind::Delimiter);
        assert_eq!(tokens[3].kind, TokenKind::Delimiter);
        assert_eq!(tokens[7].kind, TokenKind::Delimiter);
    }

    #[test]
    fn single_character_words_stay_static() {
        let tokens = tokenize("a 5");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Static, TokenKind::Whitespace, TokenKind::Static]
        );
    }

    #[test]
    fn consecutive_whitespace_is_not_merged() {
        let tokens = tokenize("a \t\nb");
        assert_eq!(tokens.len(), 5);
        assert!(tokens[1..4].iter().all(|t| t.kind == TokenKind::Whitespace));
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn reconstructs_original_text() {
        for s in [
            "",
            " ",
            "Rs 500 debited to Amazon",
            "  leading and trailing  ",
            "A/c XX1234 debited INR 1,499.00 on 05-Oct-24. Info: UPI-Swiggy",
            "₹250 paid to Café Zoë — ref#77",
            "...---,,,",
        ] {
            assert_eq!(join_tokens(&tokenize(s)), s);
        }
    }

    #[test]
    fn multibyte_characters_stay_in_runs() {
        let tokens = tokenize("₹250 Café");
        assert_eq!(tokens[0].text, "₹250");
        assert_eq!(tokens[2].text, "Café");
    }
}
