use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::academics::{EnrollmentService, EntityStore, SeaOrmStore};
use crate::utils::jwt::JwtManager;

/// Shared handles passed to every handler through axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub enrollments: Arc<EnrollmentService>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, jwt_secret: &str, jwt_expires_in: i64) -> Self {
        let store: Arc<dyn EntityStore> = Arc::new(SeaOrmStore::new(db.clone()));
        Self::with_store(db, store, jwt_secret, jwt_expires_in)
    }

    /// Builds the state around an explicit store, e.g. an in-memory one.
    pub fn with_store(
        db: DatabaseConnection,
        store: Arc<dyn EntityStore>,
        jwt_secret: &str,
        jwt_expires_in: i64,
    ) -> Self {
        Self {
            db,
            enrollments: Arc::new(EnrollmentService::new(store)),
            jwt: Arc::new(JwtManager::new(jwt_secret, jwt_expires_in)),
        }
    }
}
