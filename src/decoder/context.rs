use crate::dataset::Token;

/// Classifier context for one token of a sentence.
///
/// Neighbouring tags outside the sentence render as empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FeatureContext {
    pub tag: String,
    pub pre_tag: String,
    pub next_tag: String,
    pub pre_pre_tag: String,
    /// Label of the previous token: the hypothesis being extended while
    /// decoding, the gold label while extracting training events.
    pub pre_type: String,
    pub first_word: bool,
    pub is_capital: bool,
}

fn tag_of(token: &Token) -> &str {
    token.tag().unwrap_or(token.literal())
}

impl FeatureContext {
    pub fn new(tokens: &[Token], t: usize, previous_label: Option<&str>) -> Self {
        let at = |i: Option<usize>| {
            i.and_then(|i| tokens.get(i))
                .map(tag_of)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            tag: at(Some(t)),
            pre_tag: at(t.checked_sub(1)),
            next_tag: at(t.checked_add(1)),
            pre_pre_tag: at(t.checked_sub(2)),
            pre_type: previous_label.unwrap_or_default().to_string(),
            first_word: t == 0,
            is_capital: tokens.get(t).map_or(false, Token::starts_with_capital),
        }
    }

    /// `key=value` features in a fixed order.
    pub fn to_features(&self) -> Vec<String> {
        vec![
            format!("tag={}", self.tag),
            format!("preTag={}", self.pre_tag),
            format!("nextTag={}", self.next_tag),
            format!("prePreTag={}", self.pre_pre_tag),
            format!("preType={}", self.pre_type),
            format!("firstWord={}", self.first_word),
            format!("isCapital={}", self.is_capital),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<Token> {
        vec![
            Token::new("The").with_tag("DT"),
            Token::new("old").with_tag("JJ"),
            Token::new("Dog").with_tag("NN"),
            Token::new("barks"),
        ]
    }

    #[test]
    fn first_token() {
        let tokens = tokens();
        let c = FeatureContext::new(&tokens, 0, None);
        assert_eq!(
            c.to_features(),
            vec![
                "tag=DT",
                "preTag=",
                "nextTag=JJ",
                "prePreTag=",
                "preType=",
                "firstWord=true",
                "isCapital=true"
            ]
        );
    }

    #[test]
    fn inner_token() {
        let tokens = tokens();
        let c = FeatureContext::new(&tokens, 2, Some("I-NP"));
        assert_eq!(c.tag, "NN");
        assert_eq!(c.pre_tag, "JJ");
        assert_eq!(c.pre_pre_tag, "DT");
        assert_eq!(c.next_tag, "barks");
        assert_eq!(c.pre_type, "I-NP");
        assert!(!c.first_word);
        assert!(c.is_capital);
    }

    #[test]
    fn last_token_falls_back_to_literal() {
        let tokens = tokens();
        let c = FeatureContext::new(&tokens, 3, Some("O"));
        assert_eq!(c.tag, "barks");
        assert_eq!(c.next_tag, "");
        assert!(!c.is_capital);
    }

    #[test]
    fn pure() {
        let tokens = tokens();
        assert_eq!(
            FeatureContext::new(&tokens, 1, Some("B-NP")),
            FeatureContext::new(&tokens, 1, Some("B-NP"))
        );
    }
}
