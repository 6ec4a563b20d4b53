use scraper::{ElementRef, Node, Selector};

use super::normalize::remove_excess_whitespace;

/// All text below `element`, whitespace collapsed.
pub fn element_text(element: ElementRef) -> String {
    remove_excess_whitespace(&element.text().collect::<String>())
}

/// Text of the first match of `selector` under `element`, if it has any text.
pub fn text_from_selection(selector: &Selector, element: ElementRef) -> Option<String> {
    element
        .select(selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

/// Splits the text of `element` at every `<br>`, keeping inline markup text in order.
/// Empty lines are dropped.
pub fn line_segments(element: ElementRef) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => current.push_str(text),
            Node::Element(el) if el.name() == "br" => {
                lines.push(remove_excess_whitespace(&current));
                current.clear();
            }
            _ => {}
        }
    }
    lines.push(remove_excess_whitespace(&current));
    lines.retain(|line| !line.is_empty());
    lines
}

/// Following sibling elements of `element`, stopping before the first one matching `stop`.
pub fn siblings_until<'a, 'b>(
    element: ElementRef<'a>,
    stop: &'b Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'b
where
    'a: 'b,
{
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(move |sibling| !stop.matches(sibling))
}

/// First following sibling element matching `selector`.
pub fn next_matching<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| selector.matches(sibling))
}

/// Nearest ancestor element carrying `class`.
pub fn closest_with_class<'a>(element: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().classes().any(|c| c == class))
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;
    use crate::static_selector;

    #[test]
    fn test_line_segments() {
        static_selector!(P <- "p");
        let html = Html::parse_fragment(
            "<p>Kanakeitto <strong>(L)</strong><br>  Lohikiusaus<br/><br>\n Leipä &amp; voi </p>",
        );
        let p = html.select(&P).next().unwrap();
        assert_eq!(
            line_segments(p),
            vec!["Kanakeitto (L)", "Lohikiusaus", "Leipä & voi"]
        );
    }

    #[test]
    fn test_siblings_until() {
        static_selector!(H3 <- "h3");
        static_selector!(P <- "p");
        let html = Html::parse_fragment("<div><h3>A</h3><p>1</p><p>2</p><h3>B</h3><p>3</p></div>");
        let first = html.select(&H3).next().unwrap();
        let texts: Vec<_> = siblings_until(first, &H3).map(element_text).collect();
        assert_eq!(texts, vec!["1", "2"]);
        assert_eq!(
            next_matching(first, &P).map(element_text).as_deref(),
            Some("1")
        );
    }

    #[test]
    fn test_closest_with_class() {
        static_selector!(SPAN <- "span");
        let html = Html::parse_fragment(
            r#"<div class="col outer"><div class="inner"><span>x</span></div></div>"#,
        );
        let span = html.select(&SPAN).next().unwrap();
        let outer = closest_with_class(span, "outer").unwrap();
        assert!(outer.value().classes().any(|c| c == "col"));
        assert!(closest_with_class(span, "missing").is_none());
    }
}
