use scraper::{ElementRef, Html};

use crate::menu::{Dish, Menu};
use crate::parse::dom::{element_text, text_from_selection};
use crate::parse::normalize::{clean_title, normalize_price};
use crate::static_selector;

/// The menu is the same every day of the week: each category block is one
/// dish and its size or filling options become the details.
pub fn extract(html: &Html) -> Menu {
    static_selector!(CATEGORY <- "div.single-item");

    html.select(&CATEGORY).filter_map(category).collect()
}

fn category(block: ElementRef) -> Option<Dish> {
    static_selector!(HEADING <- "h2.heading-40");
    static_selector!(H2 <- "h2");
    static_selector!(DIV <- "div");
    static_selector!(P <- "p");
    static_selector!(OPTION <- "div.single-item__options div.flex");

    let title = text_from_selection(&HEADING, block).or_else(|| text_from_selection(&H2, block))?;
    let mut dish = Dish::parse(&title)?;

    // the wrapper class is `max-w-[800px]`, which selector syntax cannot spell unescaped
    let description = block
        .select(&DIV)
        .find(|div| div.value().classes().any(|class| class == "max-w-[800px]"))
        .and_then(|div| div.select(&P).next())
        .map(element_text);
    if let Some(description) = description {
        dish = dish.with_description(&description);
    }

    for option in block.select(&OPTION) {
        let paragraphs: Vec<String> = option.select(&P).map(element_text).collect();
        let Some((name, _)) = paragraphs.first().and_then(|first| clean_title(first)) else {
            continue;
        };
        let price = match paragraphs.as_slice() {
            [_, .., last] => normalize_price(last),
            _ => None,
        };
        match price {
            Some(price) => dish.push_detail(&format!("{name} {price}")),
            None => dish.push_detail(&name),
        }
    }
    Some(dish)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::sites::fixtures::read;

    #[test]
    fn test_categories_with_options() {
        let html = Html::parse_document(&read("sizzle_station.html"));
        let Menu::Dishes(dishes) = extract(&html) else {
            panic!("expected dishes");
        };
        assert_eq!(dishes.len(), 2);

        assert_eq!(dishes[0].title(), "Smash Burgers");
        assert_eq!(
            dishes[0].description(),
            Some("Two smashed patties on a toasted bun")
        );
        assert_eq!(
            dishes[0].details(),
            ["Classic Smash 13,90€", "Bacon Smash 14,90€", "Extra Cheese"]
        );

        assert_eq!(dishes[1].title(), "Loaded Fries");
        assert_eq!(dishes[1].description(), None);
        assert_eq!(dishes[1].details(), ["Truffle Fries 7,50€"]);
    }
}
