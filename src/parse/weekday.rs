use chrono::{Datelike, NaiveDate, Weekday};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    English,
    Finnish,
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Lower case weekday name in the given language.
pub const fn weekday_name(day: Weekday, language: Language) -> &'static str {
    match language {
        Language::English => match day {
            Weekday::Mon => "monday",
            Weekday::Tue => "tuesday",
            Weekday::Wed => "wednesday",
            Weekday::Thu => "thursday",
            Weekday::Fri => "friday",
            Weekday::Sat => "saturday",
            Weekday::Sun => "sunday",
        },
        Language::Finnish => match day {
            Weekday::Mon => "maanantai",
            Weekday::Tue => "tiistai",
            Weekday::Wed => "keskiviikko",
            Weekday::Thu => "torstai",
            Weekday::Fri => "perjantai",
            Weekday::Sat => "lauantai",
            Weekday::Sun => "sunnuntai",
        },
    }
}

/// Whether `text` mentions today's weekday, ignoring case.
pub fn mentions_weekday(text: &str, today: NaiveDate, language: Language) -> bool {
    text.to_lowercase()
        .contains(weekday_name(today.weekday(), language))
}

/// Whether `text` begins with any weekday name, ignoring case.
pub fn starts_with_any_weekday(text: &str, language: Language) -> bool {
    let text = text.trim_start().to_lowercase();
    WEEK.iter()
        .any(|&day| text.starts_with(weekday_name(day, language)))
}

/// `26.2` for 26 February.
pub fn day_month(date: NaiveDate) -> String {
    format!("{}.{}", date.day(), date.month())
}

/// `26.2.2025` for 26 February 2025.
pub fn day_month_year(date: NaiveDate) -> String {
    format!("{}.{}.{}", date.day(), date.month(), date.year())
}

/// Finds `fragment` in `text` where it is not glued to other digits, so `6.2`
/// does not match inside `26.2.` and `26.2` does not match `26.20`.
pub fn contains_date_fragment(text: &str, fragment: &str) -> bool {
    text.match_indices(fragment).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fragments() {
        let d = date(2025, 2, 26);
        assert_eq!(day_month(d), "26.2");
        assert_eq!(day_month_year(d), "26.2.2025");
    }

    #[test]
    fn test_contains_date_fragment_respects_digit_boundaries() {
        assert!(contains_date_fragment("KESKIVIIKKO 26.2.", "26.2"));
        assert!(contains_date_fragment("ke 26.2.2025", "26.2"));
        assert!(!contains_date_fragment("KESKIVIIKKO 26.2.", "6.2"));
        assert!(!contains_date_fragment("torstai 26.20", "26.2"));
        assert!(contains_date_fragment("Lounas 6.2 – 10.2", "6.2"));
    }

    #[test]
    fn test_weekday_matching() {
        let wednesday = date(2025, 2, 26);
        assert!(mentions_weekday("KESKIVIIKKO 26.2.", wednesday, Language::Finnish));
        assert!(mentions_weekday("Wednesday", wednesday, Language::English));
        assert!(!mentions_weekday("TORSTAI", wednesday, Language::Finnish));
        assert!(starts_with_any_weekday("  Torstai 27.2.", Language::Finnish));
        assert!(!starts_with_any_weekday("Päivän keitto", Language::Finnish));
    }
}
