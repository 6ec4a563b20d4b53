use std::{
    fmt::Write,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, on, post, MethodFilter},
    Json, Router,
};
use html_escape::encode_text;
use serde_json::json;

use crate::{
    aggregate::Aggregator,
    menu::render::{CLOSED, NOT_FOUND},
};

const HEADERS: [&str; 20] = [
    "Gather 'round, hungry mortals. Behold today's feast:",
    "Stomach rumbling louder than thunder? Silence it with:",
    "Fueling stations for humans detected. Commencing download:",
    "Alert: Low energy detected. Recommend immediate refueling with:",
    "Engage taste sensors! Today's culinary adventure includes:",
    "Human sustenance protocol initiated. Today's choices are:",
    "In need of a taste explosion? Today's menu is ready to detonate:",
    "Your daily dose of deliciousness is ready for consumption:",
    "Ravenous for some bytes? Here's what's cooking in the data kitchen:",
    "Stomach in standby mode? Activate with today's menu:",
    "Prepare your utensil appendages. Today's sustenance options are:",
    "Uploading today's menu to your taste mainframe. Please stand by:",
    "Executing program: Gourmet Delight. Today's culinary code is:",
    "Memory low on tasty bytes? Recharge with today's menu:",
    "Attention, human unit! Your fuel options today include:",
    "Engaging taste protocols. Analyzing today's delicious data:",
    "Input hunger; output satisfaction. Today's menu algorithm includes:",
    "Seeking culinary adventure? Your quest begins with:",
    "Your daily nutrition subroutine is ready to execute with:",
    "Warning: High probability of taste bud overload. Proceed with today's menu:",
];

#[derive(Clone, Debug)]
pub struct AppState {
    aggregator: Arc<Aggregator>,
    slack_requests: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self {
            aggregator,
            slack_requests: Arc::new(AtomicU64::new(0)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/health", get(health))
        .route("/slack/commands", post(slack_command))
        .route("/request-refresh", on(MethodFilter::PUT, refresh))
        .with_state(state)
}

async fn page(State(state): State<AppState>) -> Html<String> {
    let mut body = String::from(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>LunchBot</title></head><body><h1>Today's lunch</h1>",
    );
    for menu in state.aggregator.all_menus().await {
        let _ = write!(
            body,
            "<section id=\"{}\"><h2>{}</h2>{}</section>",
            menu.source_id,
            encode_text(&menu.display_name),
            menu.content
        );
    }
    body.push_str("</body></html>");
    Html(body)
}

async fn health(State(state): State<AppState>) -> String {
    format!(
        "LunchBot is running! Slack requests received: {}",
        state.slack_requests.load(Ordering::Relaxed)
    )
}

/// Slash command answer posted into the channel: a header line, then every
/// restaurant's menu as a code block.
async fn slack_command(State(state): State<AppState>) -> impl IntoResponse {
    let count = state.slack_requests.fetch_add(1, Ordering::Relaxed) + 1;
    log::info!("Slack request count: {count}");
    let header = HEADERS[usize::try_from(count).unwrap_or_default() % HEADERS.len()];

    let mut text = format!("*{header}*\n");
    for menu in state.aggregator.all_menus().await {
        let _ = write!(text, "\n*{}*\n```{}```\n", menu.display_name, menu.plain());
    }
    let _ = write!(text, "\nSlack requests received: {count}");
    Json(json!({ "response_type": "in_channel", "text": text }))
}

async fn refresh(State(state): State<AppState>) -> (StatusCode, String) {
    let menus = state.aggregator.refresh_all().await;
    let mut summary = format!("Refreshed {} menus\n", menus.len());
    for menu in &menus {
        let status = if menu.content == NOT_FOUND || menu.content == CLOSED {
            menu.content.clone()
        } else if menu.content.starts_with("<ul>") {
            let dishes = menu.plain().lines().filter(|line| line.starts_with("• ")).count();
            format!("{dishes} dishes")
        } else {
            menu.content.clone()
        };
        let _ = writeln!(summary, "{}: {status}", menu.source_id);
    }
    (StatusCode::CREATED, summary)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
    };
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::{
        aggregate::Clock,
        cache::{DayCache, Store},
        config::{CacheLocation, Source},
        fetch::make_client,
        parse::{sites::fixtures, Extractor},
    };

    async fn app() -> Router {
        // nothing listens on port 1, so every fetch fails fast
        let sources = vec![Source::new(
            "hanko-aasia",
            "Hanko Aasia",
            Url::parse("http://127.0.0.1:1/lounas").unwrap(),
            Extractor::HankoAasia,
        )];
        let store = Store::open(&CacheLocation::Memory).await.unwrap();
        let aggregator = Aggregator::new(
            sources,
            make_client(Duration::from_secs(5)).unwrap(),
            DayCache::new(store),
        )
        .with_clock(Clock::Fixed(fixtures::date(2026, 10, 13)));
        router(AppState::new(Arc::new(aggregator)))
    }

    async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, String) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_slack_command_counts_requests() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "LunchBot is running! Slack requests received: 0");

        let (status, body) = send(&app, Method::POST, "/slack/commands").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["response_type"], "in_channel");
        let text = json["text"].as_str().unwrap();
        assert!(text.starts_with(&format!("*{}*", HEADERS[1])));
        assert!(text.contains("*Hanko Aasia*\n```Failed to fetch the menu: "));
        assert!(text.ends_with("Slack requests received: 1"));

        let (_, body) = send(&app, Method::GET, "/health").await;
        assert_eq!(body, "LunchBot is running! Slack requests received: 1");
    }

    #[tokio::test]
    async fn test_page_lists_every_source() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(
            "<section id=\"hanko-aasia\"><h2>Hanko Aasia</h2>Failed to fetch the menu: "
        ));
    }

    #[tokio::test]
    async fn test_refresh_needs_put() {
        let app = app().await;
        let (status, _) = send(&app, Method::GET, "/request-refresh").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, body) = send(&app, Method::PUT, "/request-refresh").await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.starts_with("Refreshed 1 menus\nhanko-aasia: Failed to fetch the menu: "));
    }
}
