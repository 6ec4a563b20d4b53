use chrono::NaiveDate;
use scraper::Html;

use crate::menu::{Dish, Menu};
use crate::parse::dom::{closest_with_class, element_text, next_matching, text_from_selection};
use crate::parse::weekday::{mentions_weekday, Language};
use crate::static_selector;

/// Every weekday is its own layout column. Inside it each dish starts with a
/// price table, followed by a title block and a text block.
pub fn extract(html: &Html, today: NaiveDate) -> Menu {
    static_selector!(DAY_HEADING <- "h3.fusion-title-heading");
    static_selector!(PRICE_TABLE <- "div.table-2.menutaulukko");
    static_selector!(STRONG <- "strong");
    static_selector!(TITLE <- "div.fusion-title");
    static_selector!(TEXT <- "div.fusion-text");

    let Some(heading) = html
        .select(&DAY_HEADING)
        .find(|heading| mentions_weekday(&element_text(*heading), today, Language::English))
    else {
        return Menu::Dishes(Vec::new());
    };
    let Some(column) = closest_with_class(heading, "fusion-layout-column") else {
        log::debug!("hanko aasia: day heading outside of a layout column");
        return Menu::Dishes(Vec::new());
    };

    column
        .select(&PRICE_TABLE)
        .filter_map(|table| {
            let title = next_matching(table, &TITLE)?;
            let mut dish = Dish::parse(&element_text(title))?;
            if let Some(price) = text_from_selection(&STRONG, table) {
                dish = dish.with_price(&price);
            }
            if let Some(text) = next_matching(title, &TEXT) {
                dish = dish.with_description(&element_text(text));
            }
            Some(dish)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::sites::fixtures::{date, read};

    #[test]
    fn test_tuesday_column() {
        let html = Html::parse_document(&read("hanko_aasia.html"));
        let Menu::Dishes(dishes) = extract(&html, date(2026, 10, 13)) else {
            panic!("expected dishes");
        };
        assert_eq!(dishes.len(), 2);
        assert_eq!(dishes[0].title(), "Kana Pad Thai");
        assert_eq!(dishes[0].price(), Some("13,50€"));
        assert_eq!(
            dishes[0].description(),
            Some("Rice noodles, chicken, peanuts (L, G)")
        );
        assert_eq!(dishes[1].title(), "Tofu Curry");
        assert_eq!(dishes[1].price(), Some("12,90€"));
        assert_eq!(dishes[1].description(), None);
    }

    #[test]
    fn test_missing_day() {
        let html = Html::parse_document(&read("hanko_aasia.html"));
        assert_eq!(extract(&html, date(2026, 10, 16)), Menu::Dishes(vec![]));
    }
}
