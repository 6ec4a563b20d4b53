use std::sync::OnceLock;

use chrono::NaiveDate;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;

use crate::menu::{Dish, Menu};
use crate::parse::error::{Error, Result};
use crate::parse::normalize::remove_excess_whitespace;
use crate::parse::weekday::{contains_date_fragment, day_month};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Option<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    description: Option<String>,
    /// `content:encoded` once prefixes are stripped
    encoded: Option<String>,
}

/// One feed item per day. The item whose title carries today's `d.m` wins,
/// otherwise the feed is assumed to be filtered to today and the first item is used.
pub fn extract(body: &str, today: NaiveDate) -> Result<Menu> {
    let xml = strip_prefixes(&scrub_html_entities_for_xml(body));
    let rss: Rss = from_str(&xml)?;
    let items = match rss.channel {
        Some(channel) if !channel.items.is_empty() => channel.items,
        _ => return Err(Error::feed_error("Could not parse RSS feed structure")),
    };

    let date = day_month(today);
    let item = items
        .iter()
        .find(|item| {
            item.title
                .as_deref()
                .is_some_and(|title| contains_date_fragment(title, &date))
        })
        .unwrap_or(&items[0]);

    let Some(markup) = [&item.description, &item.encoded]
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty())
    else {
        return Ok(Menu::Dishes(Vec::new()));
    };
    Ok(html_lines(markup).iter().filter_map(|line| Dish::parse(line)).collect())
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&euro;", "€")
}

/// `<content:encoded>` -> `<encoded>`
fn strip_prefixes(xml: &str) -> String {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX
        .get_or_init(|| Regex::new(r"<(/?)[A-Za-z_][\w.-]*:").expect("regex should be valid"))
        .replace_all(xml, "<$1")
        .into_owned()
}

/// Breaks are line ends, other tags are dropped and entities decoded.
fn html_lines(markup: &str) -> Vec<String> {
    static BREAK: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();
    let text = BREAK
        .get_or_init(|| Regex::new(r"(?i)<br\s*/?>|</p>|</li>").expect("regex should be valid"))
        .replace_all(markup, "\n");
    let text = TAG
        .get_or_init(|| Regex::new(r"<[^>]*>").expect("regex should be valid"))
        .replace_all(&text, "");
    html_escape::decode_html_entities(&text)
        .lines()
        .map(remove_excess_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::sites::fixtures::{date, read};

    fn titles(menu: Menu) -> Vec<String> {
        match menu {
            Menu::Dishes(dishes) => dishes.iter().map(|d| d.title().to_owned()).collect(),
            Menu::Closed => panic!("feed has no closed notice"),
        }
    }

    #[test]
    fn test_item_for_todays_date() {
        let menu = extract(&read("rss.xml"), date(2026, 10, 13)).unwrap();
        assert_eq!(
            titles(menu),
            vec!["Broileria & Riisiä", "Kasvispihvit", "Mustikkapiirakka"]
        );
    }

    #[test]
    fn test_encoded_content_when_description_missing() {
        let menu = extract(&read("rss.xml"), date(2026, 10, 14)).unwrap();
        assert_eq!(titles(menu), vec!["Hernekeitto", "Pannukakku"]);
    }

    #[test]
    fn test_first_item_when_no_date_matches() {
        let menu = extract(&read("rss.xml"), date(2026, 10, 16)).unwrap();
        let Menu::Dishes(dishes) = menu else {
            panic!("expected dishes");
        };
        assert_eq!(dishes[0].title(), "Lohikeitto");
        assert_eq!(dishes[0].price(), Some("11,90€"));
    }

    #[test]
    fn test_strip_prefixes() {
        assert_eq!(
            strip_prefixes(r#"<content:encoded><![CDATA[<p>x</p>]]></content:encoded>"#),
            "<encoded><![CDATA[<p>x</p>]]></encoded>"
        );
    }

    #[test]
    fn test_channel_without_items_is_error() {
        let body = "<rss><channel><title>Lounas</title></channel></rss>";
        let err = extract(body, date(2026, 10, 13)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Feed Structure Error: Could not parse RSS feed structure"
        );
    }
}
