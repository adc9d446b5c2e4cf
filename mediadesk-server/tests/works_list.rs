use anyhow::Result;
use axum::http::StatusCode;
use serde_json::Value;

#[path = "support/mod.rs"]
mod support;
use support::{admin, build_test_app, collection, work};

fn fixtures() -> Vec<mediadesk_core::model::Work> {
    vec![
        work("work1", "Title1")
            .with_host_id("host-a")
            .with_collections([collection("collection1"), collection("collection2")]),
        work("work2", "Title huh"),
        work("work3", "Another").with_host_id("work1-alias"),
    ]
}

fn content_ids(body: &Value) -> Vec<String> {
    body["model"]["page"]["content"]
        .as_array()
        .map(|works| {
            works
                .iter()
                .filter_map(|w| w["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

async fn search(server: &axum_test::TestServer, term: &str) -> Value {
    let response = server
        .get("/works")
        .add_query_param("search", term)
        .add_header("Authorization", admin())
        .add_header("Accept", "application/json")
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn list_without_search_returns_all_works() -> Result<()> {
    let app = build_test_app(fixtures()).await?;

    let response = app
        .server
        .get("/works")
        .add_header("Authorization", admin())
        .add_header("Accept", "application/json")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["view"], "works/works");
    assert_eq!(content_ids(&body), vec!["work1", "work2", "work3"]);

    let first = &body["model"]["page"]["content"][0];
    assert_eq!(first["title"], "Title1");
    assert_eq!(first["hostId"], "host-a");
    assert_eq!(first["allowedNetwork"], "global");
    assert_eq!(first["collections"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["model"]["page"]["totalElements"], 3);
    Ok(())
}

#[tokio::test]
async fn bare_term_matches_title() -> Result<()> {
    let app = build_test_app(fixtures()).await?;
    let body = search(&app.server, "huh").await;
    assert_eq!(content_ids(&body), vec!["work2"]);
    assert_eq!(body["model"]["search"], "huh");
    Ok(())
}

#[tokio::test]
async fn bare_term_matches_id_and_collection_once() -> Result<()> {
    let app = build_test_app(fixtures()).await?;

    assert_eq!(content_ids(&search(&app.server, "work2").await), vec!["work2"]);
    // Two matching collections still yield a single row.
    assert_eq!(
        content_ids(&search(&app.server, "collection").await),
        vec!["work1"]
    );
    Ok(())
}

#[tokio::test]
async fn title_prefix_ignores_id() -> Result<()> {
    let app = build_test_app(fixtures()).await?;

    assert_eq!(content_ids(&search(&app.server, "title:huh").await), vec!["work2"]);
    assert!(content_ids(&search(&app.server, "title:work").await).is_empty());
    Ok(())
}

#[tokio::test]
async fn host_id_prefix_never_matches_id() -> Result<()> {
    let app = build_test_app(fixtures()).await?;

    assert_eq!(
        content_ids(&search(&app.server, "hostId:work1").await),
        vec!["work3"]
    );
    assert_eq!(
        content_ids(&search(&app.server, "hostId:host-a").await),
        vec!["work1"]
    );
    Ok(())
}

#[tokio::test]
async fn pages_are_sized_and_numbered() -> Result<()> {
    let works = (1..=5).map(|n| work(&format!("w{n}"), "T")).collect();
    let app = build_test_app(works).await?;

    let response = app
        .server
        .get("/works")
        .add_query_param("page", 1)
        .add_query_param("size", 2)
        .add_header("Authorization", admin())
        .add_header("Accept", "application/json")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(content_ids(&body), vec!["w3", "w4"]);
    assert_eq!(body["model"]["page"]["number"], 1);
    assert_eq!(body["model"]["page"]["totalPages"], 3);
    Ok(())
}

#[tokio::test]
async fn browsers_get_html() -> Result<()> {
    let app = build_test_app(fixtures()).await?;

    let response = app
        .server
        .get("/works")
        .add_query_param("search", "huh")
        .add_header("Authorization", admin())
        .await;
    response.assert_status(StatusCode::OK);
    let html = response.text();

    assert!(html.contains("data-view=\"works/works\""));
    assert!(html.contains("Title huh"));
    assert!(!html.contains("Title1"));
    assert!(html.contains("name=\"params[network]\""));
    Ok(())
}

#[tokio::test]
async fn page_number_past_the_end_renders_empty() -> Result<()> {
    let app = build_test_app(fixtures()).await?;

    let response = app
        .server
        .get("/works")
        .add_query_param("page", u32::MAX)
        .add_header("Authorization", admin())
        .await;
    response.assert_status(StatusCode::OK);
    let html = response.text();
    assert!(html.contains("No works found."));
    assert!(html.contains(&format!("Page {} of 1 (3 works)", u32::MAX)));

    let response = app
        .server
        .get("/works")
        .add_query_param("page", u32::MAX)
        .add_header("Authorization", admin())
        .add_header("Accept", "application/json")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(content_ids(&body).is_empty());
    assert_eq!(body["model"]["page"]["totalElements"], 3);
    Ok(())
}
