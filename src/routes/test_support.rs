//! Router fixture shared by the route tests: an in-memory store holding one
//! student and two subjects, `MAT201` requiring `MAT101`.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use crate::academics::memory_store::MemoryStore;
use crate::app::create_app;
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::state::AppState;

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    pub student: i32,
    pub algebra: i32,
    pub analysis: i32,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let career = store.insert_career("TSDS");
    let student = store.insert_student(career, "L-1001");
    let algebra = store.insert_subject(career, "MAT101", "Álgebra I", 1);
    let analysis = store.insert_subject(career, "MAT201", "Análisis II", 2);
    store.insert_requirement(analysis, algebra);

    let state = AppState::with_store(
        DatabaseConnection::Disconnected,
        store.clone(),
        "route-test-secret",
        3600,
    );
    TestApp {
        store,
        state,
        student,
        algebra,
        analysis,
    }
}

impl TestApp {
    pub fn token(&self, role: RoleEnum) -> String {
        self.state.jwt.create_jwt(99, "Staff", role).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let app = create_app(self.state.clone(), false, "*").unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&body).into_owned())
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
