//! Text clean-up shared by every site extractor.

use std::sync::OnceLock;

use regex::Regex;

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("regex should be valid"))
}

/// Collapses every whitespace run (including non-breaking spaces) to one space and trims.
pub fn remove_excess_whitespace(s: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"\s+").replace_all(s, " ").trim().to_owned()
}

/// Removes parenthesized annotations such as allergen codes: `Keitto (L,G)` -> `Keitto`.
pub fn strip_annotations(s: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"\s*\([^)]*\)").replace_all(s, "").into_owned()
}

/// Splits a `13,50€` style price out of `s`. Returns the remaining text and the
/// price re-emitted as `amount€`.
///
/// An amount followed by a currency sign wins. Without one, the last bare
/// `digits,digits` amount is taken, so `2,5 dl ... 6,50` prices at `6,50€`.
pub fn split_price(s: &str) -> (String, Option<String>) {
    static PRICED: OnceLock<Regex> = OnceLock::new();
    static BARE: OnceLock<Regex> = OnceLock::new();
    let found = regex(&PRICED, r"(\d+,\d{1,2})\s*(?:€|(?i:eur)\b)")
        .captures(s)
        .or_else(|| regex(&BARE, r"(\d+,\d{1,2})").captures_iter(s).last());
    let Some((whole, amount)) = found.and_then(|caps| Some((caps.get(0)?, caps.get(1)?))) else {
        return (s.to_owned(), None);
    };
    let rest = format!("{}{}", &s[..whole.start()], &s[whole.end()..]);
    (rest, Some(format!("{}€", amount.as_str())))
}

/// Normalizes a dedicated price field. `13,50 €` and `13,50` both become `13,50€`.
/// Text without any digit, such as `Market price`, is not a price.
pub fn normalize_price(raw: &str) -> Option<String> {
    let raw = remove_excess_whitespace(raw);
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    match split_price(&raw) {
        (_, Some(price)) => Some(price),
        (rest, None) => Some(format!("{}€", rest.trim_end_matches('€').trim_end())),
    }
}

/// `SUOLALIHAKEITTO` -> `Suolalihakeitto`, word by word on spaces.
pub fn title_case(s: &str) -> String {
    s.to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A fragment with no letters or digits, e.g. `—` or `•`.
pub fn is_placeholder(s: &str) -> bool {
    !s.chars().any(char::is_alphanumeric)
}

/// Cleans a raw dish title and pulls out any price in it.
///
/// Annotations, `d.m.` date fragments and stray currency signs are removed,
/// whitespace is collapsed and the result is title cased. Returns `None` when
/// nothing readable is left.
pub fn clean_title(raw: &str) -> Option<(String, Option<String>)> {
    static DATE: OnceLock<Regex> = OnceLock::new();
    static CURRENCY: OnceLock<Regex> = OnceLock::new();
    let text = strip_annotations(raw);
    let (text, price) = split_price(&text);
    let text = regex(&DATE, r"\b\d{1,2}\.\d{1,2}\.(?:\d{2,4})?").replace_all(&text, " ");
    let text = regex(&CURRENCY, r"€|(?i:\beur\b)").replace_all(&text, " ");
    let text = remove_excess_whitespace(&text);
    let text =
        text.trim_matches(|c: char| matches!(c, '-' | '–' | '—' | ':' | ',' | ';' | '•' | ' '));
    if is_placeholder(text) {
        return None;
    }
    Some((title_case(text), price))
}
