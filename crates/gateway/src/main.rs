use std::sync::Arc;

use anyhow::Context;

use feed_gateway::{Proxy, Upstreams};

struct Config {
    bind_addr: String,
    jwt_secret: String,
    issuer: String,
    allowed_origins: Vec<String>,
    upstreams: Upstreams,
}

impl Config {
    fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });
        let issuer = std::env::var("TRUSTED_ISSUER")
            .unwrap_or_else(|_| "http://keycloak.local/realms/feed".to_string());
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            jwt_secret,
            issuer,
            allowed_origins,
            upstreams: Upstreams {
                users: std::env::var("USERSERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:8081".to_string()),
                posts: std::env::var("POSTSERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:8082".to_string()),
                timeline: std::env::var("TIMELINESERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:8083".to_string()),
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    feed_observability::init("feed-gateway");

    let config = Config::from_env();

    let proxy = Arc::new(
        Proxy::new(config.upstreams.clone()).context("failed to build upstream client")?,
    );
    let verifier = Arc::new(feed_auth::Hs256Verifier::new(
        config.jwt_secret.as_bytes(),
        &config.issuer,
    ));

    let app = feed_gateway::build_app(proxy, verifier, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("feed-gateway listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
