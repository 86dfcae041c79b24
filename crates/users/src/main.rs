use std::sync::Arc;

use anyhow::Context;

use feed_users::store::{InMemoryUserStore, PostgresUserStore, UserStore};

struct Config {
    bind_addr: String,
    jwt_secret: String,
    issuer: String,
    database_url: Option<String>,
}

impl Config {
    fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });
        let issuer = std::env::var("TRUSTED_ISSUER")
            .unwrap_or_else(|_| "http://keycloak.local/realms/feed".to_string());
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".to_string()),
            jwt_secret,
            issuer,
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    feed_observability::init("feed-users");

    let config = Config::from_env();

    let store: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => {
            let pool = sqlx::PgPool::connect(url)
                .await
                .context("failed to connect to postgres")?;
            PostgresUserStore::ensure_schema(&pool)
                .await
                .context("failed to ensure users schema")?;
            Arc::new(PostgresUserStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (dev only)");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let verifier = Arc::new(feed_auth::Hs256Verifier::new(
        config.jwt_secret.as_bytes(),
        &config.issuer,
    ));

    let app = feed_users::build_app(store, verifier);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("feed-users listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
