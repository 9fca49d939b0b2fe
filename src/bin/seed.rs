//! Database seed script for creating an initial user
//! Run with: cargo run --bin seed

use content_calendar::{config::Config, db::Database, services::auth_service::hash_password};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    if config.database.url.is_empty() {
        anyhow::bail!("Missing required environment variables: DATABASE_URL");
    }

    println!("Connecting to database...");
    let db = Database::connect(&config.database).await?;
    db.run_migrations().await?;
    println!("Connected successfully!");

    let email = std::env::var("SEED_EMAIL").unwrap_or_else(|_| "demo@example.com".to_string());
    let password = std::env::var("SEED_PASSWORD").unwrap_or_else(|_| "changeme123".to_string());
    let full_name = std::env::var("SEED_FULL_NAME").unwrap_or_else(|_| "Demo User".to_string());

    println!("Hashing password...");
    let hashed_password = hash_password(&password).map_err(|e| anyhow::anyhow!("{e}"))?;

    // Existing accounts get their password reset and are reactivated
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (email, hashed_password, full_name, is_active)
        VALUES ($1, $2, $3, TRUE)
        ON CONFLICT (email)
        DO UPDATE SET hashed_password = EXCLUDED.hashed_password, is_active = TRUE
        RETURNING id
        "#,
    )
    .bind(&email)
    .bind(&hashed_password)
    .bind(&full_name)
    .fetch_one(&db.pg)
    .await?;

    println!("\n========================================");
    println!("User Account Ready!");
    println!("========================================");
    println!("ID:       {}", id);
    println!("Email:    {}", email);
    println!("Password: {}", password);
    println!("========================================");
    println!("\nLog in with POST /api/auth/login");

    Ok(())
}
