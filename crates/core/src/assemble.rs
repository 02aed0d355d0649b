use crate::group::Span;
use crate::token::TokenKind;

pub const AMOUNT_GROUP: &str = "(?P<amount>.*?)";
pub const MERCHANT_GROUP: &str = "(?P<merchant>.*?)";
pub const WILDCARD: &str = ".*?";

const METACHARACTERS: &[char] = &[
    '-', '[', ']', '{', '}', '(', ')', '*', '+', '?', '.', ',', '\\', '^', '$', '|', '#',
];

/// Backslash-escape every regex metacharacter in `text`.
pub fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if METACHARACTERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Turn grouped spans into a single pattern string.
pub fn assemble(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|span| match span.kind {
            TokenKind::Amount => AMOUNT_GROUP.to_string(),
            TokenKind::Merchant => MERCHANT_GROUP.to_string(),
            TokenKind::Wildcard => WILDCARD.to_string(),
            _ => escape_literal(&span.text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::group_tokens;
    use crate::token::tokenize;

    fn span(text: &str, kind: TokenKind) -> Span {
        Span { text: text.to_string(), kind }
    }

    #[test]
    fn escapes_every_metacharacter() {
        assert_eq!(
            escape_literal(r"-[]{}()*+?.,\^$|#"),
            r"\-\[\]\{\}\(\)\*\+\?\.\,\\\^\$\|\#"
        );
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(escape_literal("Rs 500 debited to"), "Rs 500 debited to");
    }

    #[test]
    fn classified_spans_become_markers() {
        let spans = vec![
            span("Rs ", TokenKind::Static),
            span("500", TokenKind::Amount),
            span(" debited to ", TokenKind::Static),
            span("Amazon", TokenKind::Merchant),
            span(" ", TokenKind::Static),
            span("ref 1", TokenKind::Wildcard),
        ];
        assert_eq!(
            assemble(&spans),
            r"Rs (?P<amount>.*?) debited to (?P<merchant>.*?) .*?"
        );
    }

    #[test]
    fn empty_spans_give_empty_pattern() {
        assert_eq!(assemble(&[]), "");
    }

    #[test]
    fn escaped_literal_matches_only_itself() {
        for literal in [
            "Rs.1,234.50",
            "A/c *1234 (savings)",
            "50% off [today] {only}",
            r"C:\path ^start$ a|b #tag",
            "a+b?c-d",
        ] {
            let re = regex::Regex::new(&format!("^{}$", escape_literal(literal))).unwrap();
            assert!(re.is_match(literal), "{literal}");
            let mutated = literal.replacen(|c: char| METACHARACTERS.contains(&c), "x", 1);
            assert!(!re.is_match(&mutated), "{mutated}");
        }
    }

    #[test]
    fn assembled_pattern_extracts_fields() {
        // INR ␣ 1 , 499 . 00 ␣ spent ␣ at ␣ Big - Bazaar . ␣ Avl ␣ bal ␣ 20 . 00
        let mut tokens = tokenize("INR 1,499.00 spent at Big-Bazaar. Avl bal 20.00");
        for idx in [2, 4, 6] {
            tokens[idx].kind = TokenKind::Amount;
        }
        tokens[12].kind = TokenKind::Merchant;
        tokens[14].kind = TokenKind::Merchant;
        tokens[21].kind = TokenKind::Wildcard;

        let pattern = assemble(&group_tokens(&tokens));
        assert_eq!(
            pattern,
            r"INR (?P<amount>.*?) spent at (?P<merchant>.*?)\. Avl bal .*?\.00"
        );
        let re = regex::Regex::new(&pattern).unwrap();
        let caps = re.captures("INR 1,499.00 spent at Big-Bazaar. Avl bal 20.00").unwrap();
        assert_eq!(&caps["amount"], "1,499.00");
        assert_eq!(&caps["merchant"], "Big-Bazaar");
    }
}
