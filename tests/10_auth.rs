mod common;

use axum::http::{Method, StatusCode};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{json, Value};

use common::TestApp;

fn claims(token: &str) -> Value {
    let payload = token.split('.').nth(1).expect("payload segment");
    serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).expect("base64")).expect("claims json")
}

#[tokio::test]
async fn signup_signin_and_protected_request() {
    let app = TestApp::new();

    let (status, body) = app
        .form(Method::POST, "/signup", "email=a%40b.com&password=p1&timezone=UTC", None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "a@b.com");
    assert_eq!(body["timezone"], "UTC");
    assert!(body["userid"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(body.get("passhash").is_none());
    let userid = body["userid"].as_str().unwrap().to_string();

    let (status, body) = app.get("/signin?email=a%40b.com&password=p1", None).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token").to_string();
    assert_eq!(app.state.tokens.verify(&token).unwrap().user_id, userid);

    let uri = format!("/{userid}/budgets");
    let (status, body) = app.get(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "values": [] }));

    let (status, body) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "No token provided" }));
}

#[tokio::test]
async fn signin_rejects_bad_credentials() {
    let app = TestApp::new();
    app.register("a@b.com", "p1").await;

    let (status, body) = app.get("/signin?email=a%40b.com&password=p2", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Invalid login" }));

    let (status, body) = app.get("/signin?email=x%40y.com&password=p1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "user x@y.com does not exist" }));
}

#[tokio::test]
async fn signin_requires_arguments() {
    let app = TestApp::new();

    let (status, body) = app.get("/signin?password=p1", None).await;
    assert_eq!(status.as_u16(), 419);
    assert_eq!(body, json!({ "message": "No email argument provided" }));

    let (status, body) = app.get("/signin?email=a%40b.com", None).await;
    assert_eq!(status.as_u16(), 419);
    assert_eq!(body, json!({ "message": "No password argument provided" }));

    let (status, _) = app.get("/signin?email=&password=p1", None).await;
    assert_eq!(status.as_u16(), 419);
}

#[tokio::test]
async fn remember_me_issues_longer_token() {
    let app = TestApp::new();
    app.register("a@b.com", "p1").await;

    let (_, body) = app.get("/signin?email=a%40b.com&password=p1", None).await;
    let standard = claims(body["token"].as_str().unwrap());

    let (status, body) = app
        .get("/signin?email=a%40b.com&password=p1&rememberme=true", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let remembered = claims(body["token"].as_str().unwrap());

    let lifetime = |c: &Value| c["exp"].as_i64().unwrap() - c["iat"].as_i64().unwrap();
    assert!(lifetime(&remembered) > lifetime(&standard));
}

#[tokio::test]
async fn signup_validation() {
    let app = TestApp::new();

    let (status, body) = app
        .form(Method::POST, "/signup", "email=a%40b.com&password=p1", None)
        .await;
    assert_eq!(status.as_u16(), 419);
    assert_eq!(body, json!({ "message": "No timezone argument provided" }));

    let (status, _) = app
        .form(Method::POST, "/signup", "email=not-an-email&password=p1&timezone=UTC", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .form(Method::POST, "/signup", "email=a%40b.com&password=p1&timezone=Mars%2FBase", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("timezone"));
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = TestApp::new();
    app.register("a@b.com", "p1").await;

    let (status, body) = app
        .form(Method::POST, "/signup", "email=a%40b.com&password=other&timezone=UTC", None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "message": "email a@b.com is already in use" }));
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let app = TestApp::new();
    let (userid, token) = app.register("a@b.com", "p1").await;
    let uri = format!("/{userid}/budgets");

    let mut forged = token.clone().into_bytes();
    let last = forged.len() - 2;
    forged[last] = if forged[last] == b'A' { b'B' } else { b'A' };
    let forged = String::from_utf8(forged).unwrap();

    let (status, body) = app.get(&uri, Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let (status, _) = app.get(&uri, Some(&format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_uses_message_envelope() {
    let app = TestApp::new();
    let (status, body) = app.get("/nowhere/at/all/here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not found" }));
}
