use crate::parse::normalize::{clean_title, normalize_price, remove_excess_whitespace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dish {
    title: String,
    price: Option<String>,
    description: Option<String>,
    details: Vec<String>,
}

impl Dish {
    /// Builds a dish from a raw title fragment. A price inside the title is
    /// moved to `price`. Returns `None` when no title survives normalization.
    pub fn parse(raw_title: &str) -> Option<Self> {
        let (title, price) = clean_title(raw_title)?;
        Some(Self {
            title,
            price,
            description: None,
            details: Vec::new(),
        })
    }

    /// Sets the price from a dedicated price field; keeps the title price if the field is empty.
    #[must_use]
    pub fn with_price(mut self, raw: &str) -> Self {
        if let Some(price) = normalize_price(raw) {
            self.price = Some(price);
        }
        self
    }

    #[must_use]
    pub fn with_description(mut self, raw: &str) -> Self {
        let description = remove_excess_whitespace(raw);
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    pub fn push_detail(&mut self, raw: &str) {
        let detail = remove_excess_whitespace(raw);
        if !crate::parse::normalize::is_placeholder(&detail) {
            self.details.push(detail);
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> Option<&str> {
        self.price.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }
}
