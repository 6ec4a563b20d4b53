use std::sync::OnceLock;

use scraper::Selector;

/// A CSS selector parsed on first use and shared for the life of the process.
#[derive(Debug)]
pub(super) struct StaticSelector<'a> {
    cell: OnceLock<Selector>,
    selector: &'a str,
}

impl<'a> StaticSelector<'a> {
    pub(super) const fn new(selector: &'a str) -> Self {
        Self {
            cell: OnceLock::new(),
            selector,
        }
    }
}

impl<'a> core::ops::Deref for StaticSelector<'a> {
    type Target = Selector;

    fn deref(&self) -> &Self::Target {
        self.cell
            .get_or_init(|| match Selector::parse(self.selector) {
                Ok(sel) => sel,
                Err(e) => panic!("Error parsing static selector {}: {:?}", self.selector, e),
            })
    }
}

#[macro_export]
macro_rules! static_selector {
    ($x: ident <- $sel: literal) => {
        static $x: $crate::parse::static_selector::StaticSelector =
            $crate::parse::static_selector::StaticSelector::new($sel);
    };
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    #[test]
    fn test_selector_is_reused() {
        static_selector!(STRONG <- "p > strong");
        let html = Html::parse_fragment("<p><strong>Keitto</strong></p><p>Leipä</p>");
        assert_eq!(html.select(&STRONG).count(), 1);
        // second deref hits the cached selector
        assert_eq!(html.select(&STRONG).count(), 1);
    }
}
