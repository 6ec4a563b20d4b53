use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::Html;

use crate::menu::{Dish, Menu};
use crate::parse::dom::{line_segments, text_from_selection};
use crate::parse::weekday::{mentions_weekday, Language};
use crate::static_selector;

/// Each day is a `.mygridbase` block headed by the English weekday in bold;
/// dishes are the `<br>` separated lines of its `.lounas` paragraph.
pub fn extract(html: &Html, today: NaiveDate) -> Menu {
    static_selector!(DAY_BLOCK <- ".mygridbase");
    static_selector!(DAY_HEADING <- ".myparagraph.bold strong");
    static_selector!(LUNCH <- ".myparagraph.lounas");

    let Some(block) = html.select(&DAY_BLOCK).find(|block| {
        text_from_selection(&DAY_HEADING, *block)
            .is_some_and(|heading| mentions_weekday(&heading, today, Language::English))
    }) else {
        return Menu::Dishes(Vec::new());
    };

    block
        .select(&LUNCH)
        .next()
        .map(line_segments)
        .unwrap_or_default()
        .iter()
        .filter(|line| !is_opening_hours(line))
        .filter_map(|line| Dish::parse(line))
        .collect()
}

/// `Lunch 10.30 & 14.00` style serving times.
fn is_opening_hours(line: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,2}[.:]\d{2}\s*&").expect("regex should be valid"))
        .is_match(line)
}
