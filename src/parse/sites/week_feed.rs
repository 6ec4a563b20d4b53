use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::menu::{Dish, Menu};
use crate::parse::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    success: bool,
    data: Option<Data>,
}

#[derive(Debug, Deserialize)]
struct Data {
    week: Option<Week>,
}

#[derive(Debug, Deserialize)]
struct Week {
    #[serde(default)]
    days: Vec<Day>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Day {
    day_number: Option<u32>,
    #[serde(default)]
    is_closed: bool,
    #[serde(default)]
    lunches: Vec<Lunch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Lunch {
    title: Option<Localized>,
    description: Option<Localized>,
    normal_price: Option<Price>,
}

#[derive(Debug, Deserialize)]
struct Price {
    price: Option<String>,
    unit: Option<Localized>,
}

#[derive(Debug, Default, Deserialize)]
struct Localized {
    en: Option<String>,
    fi: Option<String>,
}

impl Localized {
    /// English text, Finnish when the English one is missing or blank.
    fn text(&self) -> Option<&str> {
        [&self.en, &self.fi]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

/// JSON week feed shared by several lunch restaurants. Days are numbered from
/// Sunday = 0; a feed without today's number falls back to its first day.
pub fn extract(body: &str, today: NaiveDate) -> Result<Menu> {
    let feed: Feed = serde_json::from_str(body)?;
    let week = match feed.data {
        Some(Data { week: Some(week) }) if feed.success => week,
        _ => return Err(Error::feed_error("Invalid JSON structure")),
    };

    let number = today.weekday().num_days_from_sunday();
    let Some(day) = week
        .days
        .iter()
        .find(|day| day.day_number == Some(number))
        .or_else(|| week.days.first())
    else {
        return Ok(Menu::Dishes(Vec::new()));
    };
    if day.is_closed {
        return Ok(Menu::Closed);
    }

    Ok(day.lunches.iter().filter_map(lunch).collect())
}

fn lunch(lunch: &Lunch) -> Option<Dish> {
    let mut dish = Dish::parse(lunch.title.as_ref()?.text()?)?;
    if let Some(price) = &lunch.normal_price {
        if let Some(amount) = price.price.as_deref() {
            let unit = price.unit.as_ref().and_then(Localized::text).unwrap_or_default();
            dish = dish.with_price(&format!("{amount} {unit}"));
        }
    }
    if let Some(description) = lunch.description.as_ref().and_then(Localized::text) {
        dish = dish.with_description(description);
    }
    Some(dish)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::sites::fixtures::{date, read};

    #[test]
    fn test_todays_day_number() {
        // Wednesday is day 3
        let Menu::Dishes(dishes) = extract(&read("week_feed.json"), date(2026, 10, 14)).unwrap()
        else {
            panic!("expected dishes");
        };
        assert_eq!(dishes.len(), 2);
        assert_eq!(dishes[0].title(), "Chicken Tikka Masala");
        assert_eq!(dishes[0].price(), Some("12,70€"));
        assert_eq!(dishes[0].description(), Some("Basmati rice, naan"));
        // no English title
        assert_eq!(dishes[1].title(), "Kasvislasagne");
        assert_eq!(dishes[1].price(), None);
        assert_eq!(dishes[1].description(), Some("Salaatti"));
    }

    #[test]
    fn test_closed_day() {
        let menu = extract(&read("week_feed.json"), date(2026, 10, 15)).unwrap();
        assert_eq!(menu, Menu::Closed);
    }

    #[test]
    fn test_unknown_day_uses_first() {
        // Saturday (6) is not in the feed, Monday comes first
        let Menu::Dishes(dishes) = extract(&read("week_feed.json"), date(2026, 10, 17)).unwrap()
        else {
            panic!("expected dishes");
        };
        let titles: Vec<_> = dishes.iter().map(Dish::title).collect();
        assert_eq!(titles, vec!["Salmon Soup"]);
    }

    #[test]
    fn test_empty_week() {
        let body = r#"{"success": true, "data": {"week": {"days": []}}}"#;
        assert_eq!(
            extract(body, date(2026, 10, 14)).unwrap(),
            Menu::Dishes(vec![])
        );
    }

    #[test]
    fn test_missing_week_is_error() {
        let body = r#"{"success": true, "data": {}}"#;
        let err = extract(body, date(2026, 10, 14)).unwrap_err();
        assert_eq!(err.to_string(), "Feed Structure Error: Invalid JSON structure");
    }
}
