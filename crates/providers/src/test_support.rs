//! In-process HTTP servers and fixtures for adapter tests.

use axum::Router;
use chrono::NaiveTime;
use stoa_core::context::{Context, RawSignals, classify};
use stoa_core::item::Item;

/// Serve `router` on an ephemeral port and return its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn stressed_morning() -> Context {
    classify(
        &RawSignals::default().with_heart_rate(115.0),
        &NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
    )
}

pub fn candidates() -> Vec<Item> {
    vec![
        Item::new(
            "letters-13",
            "We suffer more in imagination than in reality.",
            "Seneca",
            "Letters",
        )
        .with_tags(["stress"]),
        Item::new(
            "meditations-2-1",
            "Begin the morning by saying to thyself...",
            "Marcus Aurelius",
            "Meditations",
        )
        .with_tags(["morning"]),
    ]
}
