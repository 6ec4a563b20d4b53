mod dish;
pub mod render;

pub use dish::Dish;

use juniper::graphql_object;

/// What an extractor found for today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Menu {
    Dishes(Vec<Dish>),
    Closed,
}

impl FromIterator<Dish> for Menu {
    fn from_iter<I: IntoIterator<Item = Dish>>(iter: I) -> Self {
        Self::Dishes(iter.into_iter().collect())
    }
}

/// One restaurant's entry in the aggregated answer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResult {
    pub source_id: String,
    pub display_name: String,
    pub content: String,
}

impl MenuResult {
    /// The chat form of `content`.
    pub fn plain(&self) -> String {
        render::to_plain(&self.content)
    }
}

#[graphql_object]
impl MenuResult {
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Menu as an HTML list, or a sentence when no menu is available.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// `content` with markup removed, one dish per bullet line.
    #[graphql(name = "plain")]
    pub fn plain_text(&self) -> String {
        self.plain()
    }
}
