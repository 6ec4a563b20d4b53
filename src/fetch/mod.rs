use std::{num::NonZeroU32, sync::OnceLock, time::Duration};

use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::InMemoryState,
};
use reqwest::Client;
use tracing::{instrument, Level};
use url::Url;

pub fn make_client(timeout: Duration) -> crate::Result<Client> {
    let client = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .gzip(true)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

static RATE_LIMIT: NonZeroU32 = match NonZeroU32::new(20) {
    Some(limit) => limit,
    None => panic!("rate limit must be positive"),
};
static DELAY_JITTER: Duration = Duration::from_millis(500);
static RATE_LIMITER: OnceLock<
    governor::RateLimiter<
        governor::state::NotKeyed,
        InMemoryState,
        QuantaClock,
        NoOpMiddleware<QuantaInstant>,
    >,
> = OnceLock::new();

/// Fetches `url` as text. Non-success statuses are errors.
#[instrument(skip(client, url), fields(url = %url), level = Level::TRACE)]
pub async fn fetch_text(client: &Client, url: &Url) -> crate::Result<String> {
    let rate_limiter = RATE_LIMITER
        .get_or_init(|| governor::RateLimiter::direct(governor::Quota::per_second(RATE_LIMIT)));
    let retry_jitter = governor::Jitter::new(Duration::ZERO, DELAY_JITTER);
    rate_limiter.until_ready_with_jitter(retry_jitter).await;

    let start = std::time::Instant::now();
    let res = client.get(url.clone()).send().await?.error_for_status()?;
    let text = res.text().await?;
    log::trace!("Got {} bytes from {url} in \t {:?}", text.len(), start.elapsed());
    Ok(text)
}
