//! In-memory fixtures shared by unit tests

use crate::error::{Error, Result};
use crate::http::Transport;
use crate::types::JsonValue;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub(crate) const PAGE_1: &str = "https://api.test/api/character";
pub(crate) const PAGE_2: &str = "https://api.test/api/character?page=2";
pub(crate) const PAGE_3: &str = "https://api.test/api/character?page=3";

enum MockResponse {
    Json(JsonValue),
    Delayed(JsonValue, Duration),
    Status(u16),
    Hang,
}

/// Transport serving canned responses keyed by URL
#[derive(Default)]
pub(crate) struct MockTransport {
    responses: HashMap<String, MockResponse>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(mut self, url: &str, body: JsonValue) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Json(body));
        self
    }

    pub(crate) fn with_delayed_page(mut self, url: &str, body: JsonValue, delay: Duration) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Delayed(body, delay));
        self
    }

    pub(crate) fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), MockResponse::Status(status));
        self
    }

    pub(crate) fn with_hang(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), MockResponse::Hang);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_json(&self, url: &str) -> Result<JsonValue> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(MockResponse::Json(body)) => Ok(body.clone()),
            Some(MockResponse::Delayed(body, delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(body.clone())
            }
            Some(MockResponse::Status(status)) => Err(Error::http_status(*status, "mock")),
            Some(MockResponse::Hang) => std::future::pending().await,
            None => Err(Error::http_status(404, "no such page")),
        }
    }
}

/// A character object in the upstream shape
pub(crate) fn character(
    name: &str,
    species: &str,
    status: &str,
    origin: &str,
    location: &str,
) -> JsonValue {
    json!({
        "id": 1,
        "name": name,
        "status": status,
        "species": species,
        "type": "",
        "gender": "unknown",
        "origin": {"name": origin, "url": ""},
        "location": {"name": location, "url": ""},
        "image": format!("https://api.test/avatar/{}.jpeg", name.replace(' ', "_")),
        "episode": [],
    })
}

/// A page body in the upstream shape
pub(crate) fn page(results: Vec<JsonValue>, next: Option<&str>) -> JsonValue {
    json!({
        "info": {"count": results.len(), "pages": 3, "next": next, "prev": null},
        "results": results,
    })
}

/// Three pages with matches interleaved among non-matches
pub(crate) fn three_page_transport() -> MockTransport {
    MockTransport::new()
        .with_page(
            PAGE_1,
            page(
                vec![
                    character(
                        "Rick Sanchez",
                        "Human",
                        "Alive",
                        "Earth (C-137)",
                        "Citadel of Ricks",
                    ),
                    character("Birdperson", "Alien", "Dead", "Bird World", "Planet Squanch"),
                    character("Morty Smith", "Human", "Alive", "unknown", "Citadel of Ricks"),
                ],
                Some(PAGE_2),
            ),
        )
        .with_page(
            PAGE_2,
            page(
                vec![
                    character(
                        "Summer Smith",
                        "Human",
                        "Alive",
                        "Earth (Replacement Dimension)",
                        "Earth (Replacement Dimension)",
                    ),
                    character(
                        "Abadango Cluster Princess",
                        "Alien",
                        "Alive",
                        "Abadango",
                        "Abadango",
                    ),
                ],
                Some(PAGE_3),
            ),
        )
        .with_page(
            PAGE_3,
            page(
                vec![
                    character("Adjudicator Rick", "Human", "Dead", "unknown", "Citadel of Ricks"),
                    character(
                        "Beth Smith",
                        "Human",
                        "Alive",
                        "Earth (Replacement Dimension)",
                        "Earth (Replacement Dimension)",
                    ),
                ],
                None,
            ),
        )
}
