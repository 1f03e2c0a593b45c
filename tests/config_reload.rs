//! Hot reload of config.json while serving.

use std::time::Duration;

use reqwest::StatusCode;

mod common;

use common::ConfigFolder;

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

async fn body_of(client: &reqwest::Client, url: &str) -> Option<(StatusCode, String)> {
    let res = client.get(url).send().await.ok()?;
    let status = res.status();
    Some((status, res.text().await.ok()?))
}

#[tokio::test]
async fn test_reload_swaps_rules_and_resets_sequences() {
    let config = r#"{ "routes": [ { "matching": "^/seq$", "reply_with": ["one.txt", "two.txt"] } ] }"#;
    let folder = ConfigFolder::new(config, &[("one.txt", "1"), ("two.txt", "2"), ("new.txt", "new")]);
    let server = common::start_server(&folder).await;
    let client = client();

    assert_eq!(body_of(&client, &server.url("/seq")).await.unwrap().1, "1");
    assert_eq!(body_of(&client, &server.url("/seq")).await.unwrap().1, "2");

    folder.write_config(
        r#"{ "routes": [
            { "matching": "^/seq$", "reply_with": ["one.txt", "two.txt"] },
            { "matching": "^/new$", "reply_with": "new.txt" }
        ] }"#,
    );

    let reloaded = common::eventually(Duration::from_secs(10), || {
        let client = client.clone();
        let url = server.url("/new");
        async move { matches!(body_of(&client, &url).await, Some((StatusCode::OK, _))) }
    })
    .await;
    assert!(reloaded, "new route never became active");

    // New rule instances start from the first entry again.
    assert_eq!(body_of(&client, &server.url("/seq")).await.unwrap().1, "1");
}

#[tokio::test]
async fn test_invalid_reload_keeps_serving_previous_rules() {
    let config = r#"{ "routes": [ { "matching": "^/ok$", "reply_with": "ok.txt" } ] }"#;
    let folder = ConfigFolder::new(config, &[("ok.txt", "ok")]);
    let server = common::start_server(&folder).await;
    let client = client();

    folder.write_config(r#"{ "routes": [ { "matching": "^/broken$", "reply_with": "missing.txt" } ] }"#);
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let (status, body) = body_of(&client, &server.url("/ok")).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _) = body_of(&client, &server.url("/broken")).await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);

    folder.write_config("{ not json");
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(body_of(&client, &server.url("/ok")).await.unwrap().1, "ok");
}
