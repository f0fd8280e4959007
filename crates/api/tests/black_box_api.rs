use reqwest::StatusCode;
use serde_json::json;

use stockroom_api::config::ApiConfig;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = stockroom_api::app::build_app(&ApiConfig::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn open_session(&self, client: &reqwest::Client) -> String {
        let res = client
            .post(format!("{}/sessions", self.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = res.json().await.unwrap();
        body["session_id"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn add(
    client: &reqwest::Client,
    base_url: &str,
    session: &str,
    name: &str,
    amount: i64,
) -> reqwest::Response {
    client
        .post(format!("{}/sessions/{}/items", base_url, session))
        .json(&json!({ "name": name, "amount": amount }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn add_remove_and_snapshot_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = srv.open_session(&client).await;

    let res = add(&client, &srv.base_url, &session, "widget", 3).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = add(&client, &srv.base_url, &session, "widget", 2).await;
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["quantity"], 5);

    let snap: serde_json::Value = client
        .get(format!("{}/sessions/{}/items", srv.base_url, session))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snap["items"], json!([{ "name": "widget", "quantity": 5 }]));
    assert_eq!(snap["distinct_items"], 1);
    assert_eq!(snap["total_units"], 5);

    let res = client
        .post(format!("{}/sessions/{}/items/widget/remove", srv.base_url, session))
        .json(&json!({ "amount": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["quantity"], 0);
    assert_eq!(body["deleted"], true);

    let snap: serde_json::Value = client
        .get(format!("{}/sessions/{}/items", srv.base_url, session))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snap["items"], json!([]));
}

#[tokio::test]
async fn over_removal_reports_current_quantity() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = srv.open_session(&client).await;

    add(&client, &srv.base_url, &session, "widget", 2).await;

    let res = client
        .post(format!("{}/sessions/{}/items/widget/remove", srv.base_url, session))
        .json(&json!({ "amount": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["current"], 2);
}

#[tokio::test]
async fn missing_items_and_sessions_are_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = srv.open_session(&client).await;

    let res = client
        .post(format!("{}/sessions/{}/items/gadget/remove", srv.base_url, session))
        .json(&json!({ "amount": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/sessions/{}/items/gadget", srv.base_url, session))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!(
            "{}/sessions/018f0000-0000-7000-8000-000000000000/items",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/sessions/not-a-session/items", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = srv.open_session(&client).await;

    for (name, amount) in [("", 1), ("widget", 0), ("widget", -2), ("widget", 6)] {
        let res = add(&client, &srv.base_url, &session, name, amount).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "name={name:?} amount={amount}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "invalid_input");
    }

    let history: serde_json::Value = client
        .get(format!("{}/sessions/{}/history", srv.base_url, session))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["count"], 0);
}

#[tokio::test]
async fn remove_all_and_history_newest_first() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let session = srv.open_session(&client).await;

    add(&client, &srv.base_url, &session, "a", 1).await;
    add(&client, &srv.base_url, &session, "b", 2).await;

    let res = client
        .delete(format!("{}/sessions/{}/items/a", srv.base_url, session))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["removed"], 1);

    let history: serde_json::Value = client
        .get(format!("{}/sessions/{}/history?limit=2", srv.base_url, session))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["count"], 2);
    let newest = &history["entries"][0];
    assert_eq!(newest["kind"], "REMOVE_ALL");
    assert_eq!(newest["item"], "a");
    assert_eq!(newest["delta"], 1);
    assert_eq!(newest["resulting_quantity"], 0);
    assert_eq!(history["entries"][1]["kind"], "ADD");
}

#[tokio::test]
async fn sessions_are_isolated_and_closable() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let first = srv.open_session(&client).await;
    let second = srv.open_session(&client).await;

    add(&client, &srv.base_url, &first, "widget", 4).await;

    let snap: serde_json::Value = client
        .get(format!("{}/sessions/{}/items", srv.base_url, second))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snap["total_units"], 0);

    let res = client
        .delete(format!("{}/sessions/{}", srv.base_url, first))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/sessions/{}/items", srv.base_url, first))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
