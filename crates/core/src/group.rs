use serde::{Deserialize, Serialize};

use crate::token::{Token, TokenKind};

/// A maximal run of same-classified tokens, with the separators between
/// them absorbed into `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub kind: TokenKind,
}

impl Span {
    fn new(text: String, kind: TokenKind) -> Self {
        Self { text, kind }
    }
}

/// Coalesce tokens into spans for regex assembly.
///
/// Separators between two tokens of the same kind join the open span.
/// Separators on a kind boundary are kept as literal text: appended to the
/// preceding span when it is static, prefixed to the following span when that
/// one is static, or emitted as a span of their own otherwise. Concatenating
/// every span's text always yields the original message.
pub fn group_tokens(tokens: &[Token]) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    let mut separator = String::new();

    for token in tokens {
        if token.kind.is_separator() {
            separator.push_str(&token.text);
            continue;
        }

        match spans.last_mut() {
            Some(open) if open.kind == token.kind => {
                open.text.push_str(&separator);
                open.text.push_str(&token.text);
            }
            Some(open) if open.kind == TokenKind::Static => {
                open.text.push_str(&separator);
                spans.push(Span::new(token.text.clone(), token.kind));
            }
            _ if token.kind == TokenKind::Static => {
                spans.push(Span::new(format!("{separator}{}", token.text), token.kind));
            }
            _ => {
                if !separator.is_empty() {
                    spans.push(Span::new(separator.clone(), TokenKind::Static));
                }
                spans.push(Span::new(token.text.clone(), token.kind));
            }
        }
        separator.clear();
    }

    if !separator.is_empty() {
        match spans.last_mut() {
            Some(open) if open.kind == TokenKind::Static => open.text.push_str(&separator),
            _ => spans.push(Span::new(separator, TokenKind::Static)),
        }
    }

    spans
}
