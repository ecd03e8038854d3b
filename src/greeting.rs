//! Personalization read from the page's query string.
//!
//! Values are plain text; the DOM layer writes them with `textContent`.

use std::borrow::Cow;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Greeting {
    pub to: String,
    pub from: String,
    pub message: String,
}

impl Greeting {
    /// Build from a key lookup. `msg` wins over `message`; empty values fall
    /// through to the next candidate, then everything is trimmed.
    pub fn from_lookup<F>(get: F, default_message: &str) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| get(key).filter(|v| !v.is_empty());
        let to = present("to").unwrap_or_default();
        let from = present("from").unwrap_or_default();
        let message = present("msg")
            .or_else(|| present("message"))
            .unwrap_or_else(|| default_message.to_string());
        Self {
            to: to.trim().to_string(),
            from: from.trim().to_string(),
            message: message.trim().to_string(),
        }
    }

    /// Parse a `location.search` string such as `?to=Esra&from=Ali&msg=Hi`.
    pub fn from_query(search: &str, default_message: &str) -> Self {
        let pairs = parse_query(search);
        Self::from_lookup(
            |key| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone()),
            default_message,
        )
    }

    /// `"To: <name>"`, or empty when no recipient was given.
    pub fn to_line(&self) -> String {
        labeled("To", &self.to)
    }

    pub fn from_line(&self) -> String {
        labeled("From", &self.from)
    }
}

fn labeled(label: &str, value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("{label}: {value}")
    }
}

/// Form-urlencoded pairs in document order; duplicates are kept so lookups
/// see the first occurrence.
pub fn parse_query(search: &str) -> Vec<(String, String)> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (k, v) = part.split_once('=').unwrap_or((part, ""));
            (decode_component(k), decode_component(v))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced: Cow<str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MESSAGE;

    #[test]
    fn full_query_is_labeled() {
        let g = Greeting::from_query("?to=Esra&from=Ali&msg=Hi", DEFAULT_MESSAGE);
        assert_eq!(g.to_line(), "To: Esra");
        assert_eq!(g.from_line(), "From: Ali");
        assert_eq!(g.message, "Hi");
    }

    #[test]
    fn empty_query_uses_defaults() {
        let g = Greeting::from_query("", DEFAULT_MESSAGE);
        assert_eq!(g.to_line(), "");
        assert_eq!(g.from_line(), "");
        assert_eq!(g.message, DEFAULT_MESSAGE.trim());
        assert!(g.message.contains('\n'));
    }

    #[test]
    fn msg_beats_message() {
        let g = Greeting::from_query("?message=second&msg=first", DEFAULT_MESSAGE);
        assert_eq!(g.message, "first");
        let g = Greeting::from_query("?message=only", DEFAULT_MESSAGE);
        assert_eq!(g.message, "only");
    }

    #[test]
    fn empty_msg_falls_through_to_message() {
        let g = Greeting::from_query("?msg=&message=fallback", DEFAULT_MESSAGE);
        assert_eq!(g.message, "fallback");
    }

    #[test]
    fn values_are_decoded_and_trimmed() {
        let query = "?to=%20%20Esra+K%20&msg=Happy%20Birthday%21";
        let g = Greeting::from_query(query, DEFAULT_MESSAGE);
        assert_eq!(g.to, "Esra K");
        assert_eq!(g.message, "Happy Birthday!");
    }

    #[test]
    fn whitespace_only_name_hides_label() {
        let g = Greeting::from_query("?from=+++", DEFAULT_MESSAGE);
        assert_eq!(g.from_line(), "");
    }

    #[test]
    fn markup_stays_literal() {
        let g = Greeting::from_query("?to=%3Cb%3Ex%3C%2Fb%3E", DEFAULT_MESSAGE);
        assert_eq!(g.to_line(), "To: <b>x</b>");
    }

    #[test]
    fn first_duplicate_wins_and_bad_escapes_survive() {
        let pairs = parse_query("a=1&a=2&b=%ZZ&flag");
        assert_eq!(pairs[0], ("a".into(), "1".into()));
        assert_eq!(pairs[2], ("b".into(), "%ZZ".into()));
        assert_eq!(pairs[3], ("flag".into(), String::new()));
        let g = Greeting::from_query("?to=A&to=B", DEFAULT_MESSAGE);
        assert_eq!(g.to, "A");
    }
}
