use std::{fmt::Write, sync::OnceLock};

use html_escape::{decode_html_entities, encode_text};
use regex::Regex;

use super::{Dish, Menu};

pub const NOT_FOUND: &str = "Sorry, today's menu could not be found. Please check again later.";
pub const CLOSED: &str = "The restaurant is closed today.";

/// Renders a menu to its markup form. A footer is only appended under a found menu.
pub fn render(menu: &Menu, footer: Option<&str>) -> String {
    let dishes = match menu {
        Menu::Closed => return CLOSED.to_owned(),
        Menu::Dishes(dishes) if dishes.is_empty() => return NOT_FOUND.to_owned(),
        Menu::Dishes(dishes) => dishes,
    };
    let mut out = String::from("<ul>");
    for dish in dishes {
        render_dish(&mut out, dish);
    }
    out.push_str("</ul>");
    if let Some(footer) = footer {
        out.push_str("<br/>");
        out.push_str(footer);
    }
    out
}

fn render_dish(out: &mut String, dish: &Dish) {
    out.push_str("<li><strong>");
    out.push_str(&encode_text(dish.title()));
    if let Some(price) = dish.price() {
        let _ = write!(out, " <span>{}</span>", encode_text(price));
    }
    out.push_str("</strong>");
    if let Some(description) = dish.description() {
        out.push_str("<br>");
        out.push_str(&encode_text(description));
    }
    if !dish.details().is_empty() {
        out.push_str("<ul>");
        for detail in dish.details() {
            let _ = write!(out, "<li>{}</li>", encode_text(detail));
        }
        out.push_str("</ul>");
    }
    out.push_str("</li>");
}

/// Derives the chat form from the markup form by removing tags: list items
/// become `•` lines (nested lists indented), `<br>` and paragraphs start new
/// lines and entities are decoded.
pub fn to_plain(markup: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| {
        Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)[^>]*>").expect("regex should be valid")
    });

    let mut out = String::with_capacity(markup.len());
    let mut depth = 0usize;
    let mut last = 0;
    for caps in tag.captures_iter(markup) {
        let whole = caps.get(0).expect("group 0 always matches");
        out.push_str(&decode_html_entities(&markup[last..whole.start()]));
        last = whole.end();
        let closing = !caps[1].is_empty();
        match (caps[2].to_ascii_lowercase().as_str(), closing) {
            ("ul" | "ol", false) => depth += 1,
            ("ul" | "ol", true) => depth = depth.saturating_sub(1),
            ("li", false) => {
                out.push('\n');
                out.push_str(&"  ".repeat(depth.saturating_sub(1)));
                out.push_str("• ");
            }
            ("br", _) => {
                out.push('\n');
                out.push_str(&"  ".repeat(depth));
            }
            ("p", _) => out.push('\n'),
            _ => {}
        }
    }
    out.push_str(&decode_html_entities(&markup[last..]));

    out.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
