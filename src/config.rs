use std::{
    collections::HashSet,
    env, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::OnceLock,
    time::Duration,
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{cache::Cadence, parse::Extractor, Error};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(14 * 60);

/// Where cache entries live, from the `CACHE` variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheLocation {
    Directory(PathBuf),
    Memory,
    Firestore { project: String },
}

/// A restaurant whose menu is scraped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub name: String,
    pub url: Url,
    pub extractor: Extractor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cadence: Option<Cadence>,
    /// Markup shown under a found menu, e.g. buffet prices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl Source {
    pub fn new(id: &str, name: &str, url: Url, extractor: Extractor) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            url,
            extractor,
            cadence: None,
            footer: None,
        }
    }

    #[must_use]
    pub fn with_footer(mut self, footer: &str) -> Self {
        self.footer = Some(footer.to_owned());
        self
    }

    /// The configured cadence, or the one the site template publishes at.
    pub fn cadence(&self) -> Cadence {
        self.cadence.unwrap_or(if self.extractor.is_weekly() {
            Cadence::Weekly
        } else {
            Cadence::Daily
        })
    }

    /// The restaurants served when no `SOURCES` file is given.
    pub fn defaults() -> Vec<Self> {
        [
            (
                "klondyke",
                "Klondyke",
                "https://en.klondyketalo.fi/lounaslista",
                Extractor::Klondyke,
                None,
            ),
            (
                "burgers-and-wine",
                "Burgers & Wine",
                "https://burgersandwine.fi/lounas/",
                Extractor::BurgersAndWine,
                Some(
                    "<p>Lunch menu price: <strong>14,50€</strong></p>\
                     <p>Lunch menu for 3 persons: <strong>39,00€</strong></p>",
                ),
            ),
            (
                "factory-pasila",
                "Factory Pasila",
                "https://ravintolafactory.com/lounasravintolat/ravintolat/factory-pasila/",
                Extractor::Factory,
                Some("<p>Buffet price: <strong>13,30€</strong></p>"),
            ),
            (
                "hanko-aasia",
                "Hanko Aasia",
                "https://www.hankoaasia.fi/en/lounas/",
                Extractor::HankoAasia,
                None,
            ),
            (
                "limone-tripla",
                "Limone Tripla",
                "https://tripla.limone.fi/lounas/",
                Extractor::Limone,
                None,
            ),
            (
                "tokumaru",
                "Tokumaru",
                "https://www.tokumaru.fi/lunch-menu",
                Extractor::Tokumaru,
                None,
            ),
        ]
        .into_iter()
        .filter_map(|(id, name, url, extractor, footer)| {
            let source = Self::new(id, name, Url::parse(url).ok()?, extractor);
            Some(match footer {
                Some(footer) => source.with_footer(footer),
                None => source,
            })
        })
        .collect()
    }
}

/// Reads a JSON array of sources and checks that the ids are unique slugs.
pub fn load_sources(path: impl AsRef<Path>) -> crate::Result<Vec<Source>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let sources: Vec<Source> = serde_json::from_str(&text)?;
    validate_sources(&sources)?;
    log::info!("loaded {} sources from {}", sources.len(), path.display());
    Ok(sources)
}

fn validate_sources(sources: &[Source]) -> crate::Result<()> {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    let slug = SLUG.get_or_init(|| Regex::new(r"^[a-z0-9_-]+$").expect("regex should be valid"));

    if sources.is_empty() {
        return Err(Error::config("no sources configured"));
    }
    let mut seen = HashSet::new();
    for source in sources {
        if !slug.is_match(&source.id) {
            return Err(Error::config(format!("source id {:?} is not a slug", source.id)));
        }
        if !seen.insert(source.id.as_str()) {
            return Err(Error::config(format!("duplicate source id {:?}", source.id)));
        }
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub cache: CacheLocation,
    pub sources: Vec<Source>,
    pub fetch_timeout: Duration,
    pub keep_alive: Option<Url>,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let port = var("PORT").unwrap_or_else(|| "3000".to_owned());
        let addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|e| Error::config(format!("invalid HOST/PORT {host}:{port}: {e}")))?;

        let cache = match var("CACHE").as_deref() {
            Some(":memory:") => CacheLocation::Memory,
            Some(":firestore:") => CacheLocation::Firestore {
                project: var("FIRESTORE_PROJECT").unwrap_or_else(|| "lunchbot".to_owned()),
            },
            Some(dir) => CacheLocation::Directory(dir.into()),
            None => {
                log::info!("env var CACHE not set, caching in ./cache");
                CacheLocation::Directory("cache".into())
            }
        };

        let sources = match var("SOURCES") {
            Some(path) => load_sources(path)?,
            None => Source::defaults(),
        };

        let fetch_timeout = match var("FETCH_TIMEOUT_SECS") {
            Some(secs) => secs
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| Error::config(format!("invalid FETCH_TIMEOUT_SECS {secs}: {e}")))?,
            None => DEFAULT_FETCH_TIMEOUT,
        };

        let keep_alive = var("KEEP_ALIVE_URL")
            .map(|url| {
                Url::parse(&url)
                    .map_err(|e| Error::config(format!("invalid KEEP_ALIVE_URL {url}: {e}")))
            })
            .transpose()?;

        Ok(Self {
            addr,
            cache,
            sources,
            fetch_timeout,
            keep_alive,
        })
    }
}
