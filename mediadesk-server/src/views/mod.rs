//! Server-rendered views.
//!
//! Every view has a name and a serializable model. Browsers get HTML; a
//! client sending `Accept: application/json` gets the name and model as JSON,
//! which is what the integration tests assert against.

pub mod works;

use axum::{
    Json,
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

pub fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|media| {
            let media = media.split(';').next().unwrap_or_default().trim();
            media.eq_ignore_ascii_case("application/json")
        })
}

#[derive(Debug)]
pub struct View<M> {
    pub name: &'static str,
    pub model: M,
}

impl<M: Serialize> View<M> {
    pub fn new(name: &'static str, model: M) -> Self {
        Self { name, model }
    }

    /// JSON when asked for, otherwise the HTML produced by `render`.
    pub fn negotiate<F>(self, headers: &HeaderMap, render: F) -> Response
    where
        F: FnOnce(&M) -> String,
    {
        if wants_json(headers) {
            Json(json!({ "view": self.name, "model": self.model })).into_response()
        } else {
            Html(render(&self.model)).into_response()
        }
    }
}

/// Minimal HTML text/attribute escaping.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
