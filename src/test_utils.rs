use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{
    app::build_app,
    config::{AppConfig, SessionConfig},
    db,
    state::AppState,
    storage::{LocalStorage, StorageClient},
};

pub const BOUNDARY: &str = "fittrack-test-boundary";

/// Full router over an in-memory database and a throwaway upload directory.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let upload_dir = tempfile::tempdir().expect("tempdir");
        // One connection that never recycles, so the in-memory database lives as long as the pool
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        db::migrate(&pool).await.expect("migrations");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            upload_dir: upload_dir.path().to_path_buf(),
            max_upload_bytes: 1024 * 1024,
            session: SessionConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 30,
                cookie_name: "fittrack_session".into(),
                secure_cookie: false,
            },
        });
        let storage = Arc::new(LocalStorage::new(upload_dir.path()).expect("storage"))
            as Arc<dyn StorageClient>;
        let state = AppState::from_parts(pool, config, storage);

        Self {
            router: build_app(state.clone()),
            state,
            upload_dir,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.expect("router is infallible")
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut req = Request::builder().method("GET").uri(path);
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, path: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut req = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        self.send(req.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        data: &[u8],
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let mut req = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        self.send(req.body(Body::from(body)).unwrap()).await
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Response<Body> {
        let body = format!("name={name}&email={email}&password={password}&weight=60&goal=lose");
        self.post_form("/signup", &body, None).await
    }

    /// Logs in and returns the `Cookie` header value for the new session.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let res = self
            .post_form("/login", &format!("email={email}&password={password}"), None)
            .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/dashboard");
        session_cookie(&res).expect("login sets a session cookie")
    }

    pub async fn signup_and_login(&self, email: &str) -> String {
        let res = self.signup("Ann", email, "p1").await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        self.login(email, "p1").await
    }

    pub async fn user_count(&self) -> i64 {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.state.db)
            .await
            .unwrap();
        n
    }

    pub async fn session_count(&self) -> i64 {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.state.db)
            .await
            .unwrap();
        n
    }
}

pub fn location(res: &Response<Body>) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// `name=value` part of the first `Set-Cookie` header.
pub fn session_cookie(res: &Response<Body>) -> Option<String> {
    res.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_string())
}

pub async fn body_bytes(res: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_text(res: Response<Body>) -> String {
    String::from_utf8(body_bytes(res).await).unwrap()
}
