use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use crate::menu::{Dish, Menu};
use crate::parse::dom::{element_text, line_segments};
use crate::parse::weekday::{
    contains_date_fragment, day_month, mentions_weekday, starts_with_any_weekday, Language,
};
use crate::static_selector;

/// The page lists several weeks under the same weekday names, so today's
/// header must carry both the Finnish weekday and `d.m`. A bold paragraph
/// starts a dish; plain paragraphs and list items under it are its details.
pub fn extract(html: &Html, today: NaiveDate) -> Menu {
    static_selector!(CONTAINER <- "div.brxe-knlxvt.brxe-text");
    static_selector!(STRONG <- "strong");
    static_selector!(ITEM <- "li");

    let Some(container) = html.select(&CONTAINER).next() else {
        return Menu::Dishes(Vec::new());
    };
    let date = day_month(today);
    let elements: Vec<ElementRef> = container.children().filter_map(ElementRef::wrap).collect();

    let Some(header) = elements.iter().position(|el| {
        el.value().name() == "p" && {
            let text = element_text(*el);
            mentions_weekday(&text, today, Language::Finnish)
                && contains_date_fragment(&text, &date)
        }
    }) else {
        return Menu::Dishes(Vec::new());
    };

    let mut dishes = Vec::new();
    let mut current: Option<Dish> = None;
    for el in &elements[header + 1..] {
        match el.value().name() {
            "p" => {
                let text = element_text(*el);
                if starts_with_any_weekday(&text, Language::Finnish)
                    && !contains_date_fragment(&text, &date)
                {
                    break;
                }
                if el.select(&STRONG).next().is_some() {
                    dishes.extend(current.take());
                    current = Dish::parse(&text);
                } else if let Some(dish) = current.as_mut() {
                    for line in line_segments(*el) {
                        dish.push_detail(&line);
                    }
                }
            }
            "ul" => {
                if let Some(dish) = current.as_mut() {
                    for item in el.select(&ITEM) {
                        dish.push_detail(&element_text(item));
                    }
                }
            }
            _ => {}
        }
    }
    dishes.extend(current);
    Menu::Dishes(dishes)
}
