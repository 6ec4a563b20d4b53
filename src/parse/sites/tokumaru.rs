use chrono::NaiveDate;
use scraper::Html;

use crate::menu::{Dish, Menu};
use crate::parse::dom::{element_text, siblings_until};
use crate::parse::normalize::split_price;
use crate::parse::weekday::{mentions_weekday, Language};
use crate::static_selector;

/// English weekday headings followed by paragraphs. A paragraph carrying a
/// price starts a dish and the paragraphs after it describe that dish; a day
/// without any prices lists one dish per paragraph.
pub fn extract(html: &Html, today: NaiveDate) -> Menu {
    static_selector!(CONTENT <- "main.content.menu-content .sqs-html-content");
    static_selector!(H3 <- "h3");

    let Some(content) = html.select(&CONTENT).next() else {
        return Menu::Dishes(Vec::new());
    };
    let Some(heading) = content
        .select(&H3)
        .find(|heading| mentions_weekday(&element_text(*heading), today, Language::English))
    else {
        return Menu::Dishes(Vec::new());
    };

    let paragraphs: Vec<String> = siblings_until(heading, &H3)
        .filter(|el| el.value().name() == "p")
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    if !paragraphs.iter().any(|p| split_price(p).1.is_some()) {
        return paragraphs.iter().filter_map(|p| Dish::parse(p)).collect();
    }

    let mut dishes = Vec::new();
    let mut pending: Option<Dish> = None;
    let mut notes: Vec<&str> = Vec::new();
    for text in &paragraphs {
        if pending.is_none() || split_price(text).1.is_some() {
            dishes.extend(pending.take().map(|dish| describe(dish, &notes)));
            notes.clear();
            pending = Dish::parse(text);
        } else {
            notes.push(text);
        }
    }
    dishes.extend(pending.map(|dish| describe(dish, &notes)));
    Menu::Dishes(dishes)
}

fn describe(dish: Dish, notes: &[&str]) -> Dish {
    if notes.is_empty() {
        dish
    } else {
        dish.with_description(&notes.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::sites::fixtures::{date, read};

    fn dishes(fixture: &str, today: NaiveDate) -> Vec<Dish> {
        let html = Html::parse_document(&read(fixture));
        match extract(&html, today) {
            Menu::Dishes(dishes) => dishes,
            Menu::Closed => panic!("site has no closed notice"),
        }
    }

    #[test]
    fn test_tuesday_paragraphs_end_before_wednesday() {
        let dishes = dishes("tokumaru_plain.html", date(2026, 10, 13));
        let titles: Vec<_> = dishes.iter().map(Dish::title).collect();
        assert_eq!(titles, vec!["Soup Of The Day", "Chicken Curry With Rice"]);
        assert!(dishes.iter().all(|d| d.description().is_none()));
    }

    #[test]
    fn test_priced_titles_with_descriptions() {
        let dishes = dishes("tokumaru.html", date(2026, 10, 14));
        assert_eq!(dishes.len(), 2);
        assert_eq!(dishes[0].title(), "Tonkotsu Ramen");
        assert_eq!(dishes[0].price(), Some("13,50€"));
        assert_eq!(
            dishes[0].description(),
            Some("Pork broth, chashu, egg. Served with pickles.")
        );
        assert_eq!(dishes[1].title(), "Vegan Miso Ramen");
        assert_eq!(dishes[1].price(), Some("12,90€"));
        assert_eq!(dishes[1].description(), Some("Miso, tofu, corn"));
    }

    #[test]
    fn test_missing_content_area() {
        let html = Html::parse_document("<main><h3>Tuesday</h3><p>Soup</p></main>");
        assert_eq!(extract(&html, date(2026, 10, 13)), Menu::Dishes(vec![]));
    }
}
