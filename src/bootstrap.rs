use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::repositories::UserRepository;

/// Creates the default admin account unless a user with `admin_email`
/// already exists.
pub async fn initialize_admin_user(
    db: &DatabaseConnection,
    admin_email: &str,
    admin_password: &str,
) -> Result<()> {
    let user_repo = UserRepository::new(db.clone());

    let existing_admin = user_repo
        .find_by_email(admin_email)
        .await
        .context("Failed to check existing admin")?;

    if existing_admin.is_some() {
        tracing::info!("Admin user already exists, skipping initialization");
        return Ok(());
    }

    tracing::info!("Creating default admin user...");

    let hashed_password = bcrypt::hash(admin_password, bcrypt::DEFAULT_COST)
        .context("Failed to hash admin password")?;

    let admin = user_repo
        .create(
            admin_email.to_string(),
            hashed_password,
            "System Administrator".to_string(),
            RoleEnum::Admin,
        )
        .await
        .context("Failed to insert admin user")?;

    tracing::info!(user_id = admin.id, email = %admin.email, "Admin user created");
    tracing::warn!("Please change the default admin password after first login");

    Ok(())
}
