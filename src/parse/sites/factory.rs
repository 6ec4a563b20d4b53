use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use crate::menu::{Dish, Menu};
use crate::parse::dom::{element_text, line_segments, siblings_until};
use crate::parse::weekday::{
    contains_date_fragment, day_month, day_month_year, mentions_weekday, Language,
};
use crate::static_selector;

static_selector!(HEADING <- ".list h3");
static_selector!(H3 <- "h3");
static_selector!(ITEM <- "li");

/// Headings read like `Tiistai 13.10.2026`. A dated heading is preferred;
/// when it yields nothing, any heading naming today's weekday is tried.
pub fn extract(html: &Html, today: NaiveDate) -> Menu {
    let full = day_month_year(today);
    let short = day_month(today);

    let dated = html.select(&HEADING).find(|heading| {
        let text = element_text(*heading);
        contains_date_fragment(&text, &full)
            || (contains_date_fragment(&text, &short)
                && mentions_weekday(&text, today, Language::Finnish))
    });

    let mut lines = Vec::new();
    if let Some(heading) = dated {
        lines = section_lines(heading, true);
        if lines.is_empty() {
            lines = section_lines(heading, false);
        }
    }
    if lines.is_empty() {
        log::debug!("factory: no dated heading for {full}, trying weekday only");
        lines = html
            .select(&HEADING)
            .filter(|heading| mentions_weekday(&element_text(*heading), today, Language::Finnish))
            .map(|heading| section_lines(heading, false))
            .find(|lines| !lines.is_empty())
            .unwrap_or_default();
    }

    lines.iter().filter_map(|line| Dish::parse(line)).collect()
}

/// Lines between `heading` and the next `h3`, from paragraphs only or from every element.
fn section_lines(heading: ElementRef, paragraphs_only: bool) -> Vec<String> {
    siblings_until(heading, &H3)
        .filter(|el| !paragraphs_only || el.value().name() == "p")
        .flat_map(|el| {
            let items: Vec<String> = el.select(&ITEM).map(element_text).collect();
            if items.is_empty() {
                line_segments(el)
            } else {
                items
            }
        })
        .collect()
}
