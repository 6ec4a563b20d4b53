use chrono::{Datelike, NaiveDate};
use scraper::Html;

use crate::menu::{Dish, Menu};
use crate::parse::dom::{element_text, siblings_until, text_from_selection};
use crate::parse::weekday::{weekday_name, Language};
use crate::static_selector;

/// Headings are the bare Finnish weekday in capitals. Each dish paragraph has
/// the name and price in bold and the ingredients in italics.
pub fn extract(html: &Html, today: NaiveDate) -> Menu {
    static_selector!(HEADING <- "div.page-content h3");
    static_selector!(H3 <- "h3");
    static_selector!(STRONG <- "strong");
    static_selector!(EM <- "em");

    let day = weekday_name(today.weekday(), Language::Finnish).to_uppercase();
    let Some(heading) = html
        .select(&HEADING)
        .find(|heading| element_text(*heading).to_uppercase() == day)
    else {
        return Menu::Dishes(Vec::new());
    };

    siblings_until(heading, &H3)
        .filter(|el| el.value().name() == "p")
        .filter_map(|p| {
            let title = p
                .select(&STRONG)
                .map(element_text)
                .collect::<Vec<_>>()
                .join(" ");
            let dish = Dish::parse(&title)?;
            Some(match text_from_selection(&EM, p) {
                Some(description) => dish.with_description(&description),
                None => dish,
            })
        })
        .collect()
}
