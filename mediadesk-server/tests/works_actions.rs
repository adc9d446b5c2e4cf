use anyhow::Result;
use axum::http::StatusCode;
use mediadesk_core::database::ports::works::WorksReadPort;
use mediadesk_core::model::WorkId;
use serde_json::Value;

#[path = "support/mod.rs"]
mod support;
use support::{TestApp, admin, build_test_app, work};

async fn seeded() -> Result<TestApp> {
    build_test_app(vec![
        work("work1", "Title1"),
        work("work2", "Title2"),
        work("work3", "Title3"),
    ])
    .await
}

async fn network_of(app: &TestApp, id: &str) -> Result<String> {
    let work = app
        .repo
        .get_by_id(&WorkId::new(id)?)
        .await?
        .ok_or_else(|| anyhow::anyhow!("{id} missing"))?;
    Ok(work.allowed_network)
}

#[tokio::test]
async fn set_network_updates_only_selected_works() -> Result<()> {
    let app = seeded().await?;

    let response = app
        .server
        .post("/works")
        .add_header("Authorization", admin())
        .form(&[
            ("workIds", "work2"),
            ("workIds", "work3"),
            ("action", "set-network"),
            ("params[network]", "disabled"),
            ("params[comment]", ""),
            ("params[reduce]", ""),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/works");

    assert_eq!(network_of(&app, "work1").await?, "global");
    assert_eq!(network_of(&app, "work2").await?, "disabled");
    assert_eq!(network_of(&app, "work3").await?, "disabled");
    assert_eq!(app.repo.count().await?, 3);
    Ok(())
}

#[tokio::test]
async fn applied_action_is_logged() -> Result<()> {
    let app = seeded().await?;

    app.server
        .post("/works")
        .add_header("Authorization", admin())
        .form(&[
            ("workIds", "work1"),
            ("workIds", "missing"),
            ("action", "set-network"),
            ("params[network]", "disabled"),
            ("params[comment]", "takedown request"),
        ])
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let response = app
        .server
        .get("/works/log")
        .add_header("Authorization", admin())
        .await;
    response.assert_status_ok();
    let log: Value = response.json();

    let entry = &log[0];
    assert_eq!(entry["action"], "set-network");
    assert_eq!(entry["performedBy"], "admin");
    assert_eq!(entry["affected"], 1);
    assert_eq!(entry["parameters"]["comment"], "takedown request");
    Ok(())
}

#[tokio::test]
async fn empty_selection_still_redirects() -> Result<()> {
    let app = seeded().await?;

    let response = app
        .server
        .post("/works")
        .add_header("Authorization", admin())
        .form(&[("action", "set-network"), ("params[network]", "disabled")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(network_of(&app, "work1").await?, "global");
    Ok(())
}

#[tokio::test]
async fn unknown_action_is_a_bad_request() -> Result<()> {
    let app = seeded().await?;

    let response = app
        .server
        .post("/works")
        .add_header("Authorization", admin())
        .form(&[("workIds", "work1"), ("action", "purge")])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["status"], 400);
    assert_eq!(network_of(&app, "work1").await?, "global");
    Ok(())
}

#[tokio::test]
async fn missing_or_unlisted_network_is_a_bad_request() -> Result<()> {
    let app = seeded().await?;

    let missing = app
        .server
        .post("/works")
        .add_header("Authorization", admin())
        .form(&[("workIds", "work1"), ("action", "set-network")])
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);

    let unlisted = app
        .server
        .post("/works")
        .add_header("Authorization", admin())
        .form(&[
            ("workIds", "work1"),
            ("action", "set-network"),
            ("params[network]", "intranet"),
        ])
        .await;
    unlisted.assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(network_of(&app, "work1").await?, "global");
    Ok(())
}
