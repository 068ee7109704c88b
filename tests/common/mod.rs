#![allow(dead_code)]

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use budget_userservice::app::app;
use budget_userservice::auth::{GeneratedKeys, KeyStore};
use budget_userservice::config::AppConfig;
use budget_userservice::state::AppState;

/// Router driven in-process with `oneshot`.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_state(|state| state)
    }

    /// Build the app after letting the caller swap collaborators.
    pub fn with_state(customize: impl FnOnce(AppState) -> AppState) -> Self {
        let config = AppConfig::development();
        let keys = Arc::new(KeyStore::generate().expect("generate keys"));
        let state = customize(AppState::new(&config, keys).expect("build state"));
        let router = app(state.clone(), &config);
        Self { router, state }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, token).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None, token).await
    }

    /// Send a url-encoded form body.
    pub async fn form(&self, method: Method, uri: &str, body: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(method, uri, Some(body), token).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<&str>, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self.router.clone().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, body)
    }

    /// Sign up and sign in; returns `(userid, token)`.
    pub async fn register(&self, email: &str, password: &str) -> (String, String) {
        let encoded_email = email.replace('@', "%40");
        let (status, body) = self
            .form(
                Method::POST,
                "/signup",
                &format!("email={encoded_email}&password={password}&timezone=UTC"),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let userid = body["userid"].as_str().expect("userid").to_string();

        let (status, body) = self
            .get(&format!("/signin?email={encoded_email}&password={password}"), None)
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let token = body["token"].as_str().expect("token").to_string();

        (userid, token)
    }
}

/// The service binary running on a free local port.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
    _keys: TempDir,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let keys = TempDir::new()?;
        GeneratedKeys::generate()?.write_to(keys.path(), false)?;

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let child = server_command(keys.path(), port)
            .spawn()
            .context("failed to spawn server binary")?;

        let server = Self {
            port,
            base_url: format!("http://127.0.0.1:{port}"),
            child,
            _keys: keys,
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(format!("{}/health", self.base_url)).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Command for the service binary with key paths under `keys_dir`.
pub fn server_command(keys_dir: &Path, port: u16) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_budget-userservice"));
    cmd.arg("serve")
        .env("APP_ENV", "development")
        .env("USERSERVICE_HOST", "127.0.0.1")
        .env("USERSERVICE_PORT", port.to_string())
        .env("SECURITY_PRIVATE_KEY_PATH", keys_dir.join("private.pem"))
        .env("SECURITY_PUBLIC_KEY_PATH", keys_dir.join("public.pem"))
        .env("RUST_LOG", "warn")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit());
    cmd
}
