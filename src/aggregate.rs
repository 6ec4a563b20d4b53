use chrono::NaiveDate;
use futures::future::join_all;
use html_escape::encode_text;
use reqwest::Client;
use tracing::instrument;

use crate::{
    cache::{CacheKey, DayCache},
    config::Source,
    fetch::fetch_text,
    menu::{render::render, MenuResult},
};

/// Source of "today".
#[derive(Clone, Copy, Debug)]
pub enum Clock {
    Local,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(self) -> NaiveDate {
        match self {
            Self::Local => chrono::Local::now().date_naive(),
            Self::Fixed(date) => date,
        }
    }
}

/// Answers "what is for lunch today" for every configured source.
#[derive(Debug)]
pub struct Aggregator {
    sources: Vec<Source>,
    client: Client,
    cache: DayCache,
    clock: Clock,
}

impl Aggregator {
    pub fn new(sources: Vec<Source>, client: Client, cache: DayCache) -> Self {
        Self {
            sources,
            client,
            cache,
            clock: Clock::Local,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// One result per source, in configuration order. Never fails: a source
    /// that cannot be fetched or parsed yields a failure sentence as content.
    pub async fn all_menus(&self) -> Vec<MenuResult> {
        self.menus(None).await
    }

    /// Like [`Self::all_menus`], restricted to `ids` when given.
    pub async fn menus(&self, ids: Option<&[String]>) -> Vec<MenuResult> {
        let today = self.clock.today();
        let wanted = self
            .sources
            .iter()
            .filter(|source| ids.map_or(true, |ids| ids.contains(&source.id)));
        join_all(wanted.map(|source| self.menu(source, today))).await
    }

    /// Drops every cached entry and fetches all menus again.
    pub async fn refresh_all(&self) -> Vec<MenuResult> {
        for source in &self.sources {
            if let Err(e) = self.cache.clear(&source.id).await {
                log::warn!("could not clear cached menu of {}: {e}", source.id);
            }
        }
        self.all_menus().await
    }

    async fn menu(&self, source: &Source, today: NaiveDate) -> MenuResult {
        let key = CacheKey::for_date(source.cadence(), today);
        let content = match self
            .cache
            .get_or_refresh(&source.id, &key, || self.scrape(source, today))
            .await
        {
            Ok(content) => content,
            Err(e) => {
                log::warn!("menu of {} failed: {e}", source.id);
                failure_sentence(&e)
            }
        };
        MenuResult {
            source_id: source.id.clone(),
            display_name: source.name.clone(),
            content,
        }
    }

    #[instrument(skip(self, source), fields(source = %source.id))]
    async fn scrape(&self, source: &Source, today: NaiveDate) -> crate::Result<String> {
        let body = fetch_text(&self.client, &source.url).await?;
        let menu = source.extractor.extract(&body, today)?;
        Ok(render(&menu, source.footer.as_deref()))
    }
}

/// Content shown in place of a menu that could not be fetched or parsed.
fn failure_sentence(e: &crate::Error) -> String {
    format!("Failed to fetch the menu: {}", encode_text(&e.to_string()))
}
