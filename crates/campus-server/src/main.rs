//! CAMPUS Server — application entry point.
//!
//! Reads configuration from `CAMPUS_*` environment variables, connects
//! to SurrealDB, runs migrations, and serves the HTTP API.

use std::env;
use std::process::ExitCode;

use campus_api::AppState;
use campus_auth::AuthConfig;
use campus_db::{DbConfig, DbManager, run_migrations};
use tracing_subscriber::EnvFilter;

const INSECURE_DEFAULT_SECRET: &str = "campus-dev-secret";

/// Environment lookup, injectable so configuration parsing is testable.
fn auth_config_from(get: impl Fn(&str) -> Option<String>) -> AuthConfig {
    let jwt_secret = match get("CAMPUS_JWT_SECRET") {
        Some(secret) if !secret.is_empty() => secret,
        _ => {
            tracing::warn!(
                "CAMPUS_JWT_SECRET is not set; falling back to an insecure \
                 default secret. Do not run like this in production."
            );
            INSECURE_DEFAULT_SECRET.to_string()
        }
    };

    let token_lifetime_secs = get("CAMPUS_TOKEN_LIFETIME_SECS")
        .and_then(|v| v.parse().ok())
        .unwrap_or(86_400);

    AuthConfig {
        jwt_secret,
        token_lifetime_secs,
        ..AuthConfig::default()
    }
}

fn db_config_from(get: impl Fn(&str) -> Option<String>) -> DbConfig {
    let defaults = DbConfig::default();
    let or = |name: &str, default: String| get(name).unwrap_or(default);
    DbConfig {
        url: or("CAMPUS_DB_URL", defaults.url),
        namespace: or("CAMPUS_DB_NS", defaults.namespace),
        database: or("CAMPUS_DB_NAME", defaults.database),
        username: or("CAMPUS_DB_USER", defaults.username),
        password: or("CAMPUS_DB_PASS", defaults.password),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let from_env = |name: &str| env::var(name).ok();
    let db_config = db_config_from(from_env);
    let auth_config = auth_config_from(from_env);
    let listen_addr =
        env::var("CAMPUS_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let manager = DbManager::connect(&db_config).await?;
    run_migrations(&manager.client()).await?;

    let state = AppState::new(manager.client(), auth_config);
    let app = campus_api::router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(addr = %listen_addr, "CAMPUS server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("campus=info".parse().expect("directive")),
        )
        .json()
        .init();

    tracing::info!("Starting CAMPUS server...");

    match run().await {
        Ok(()) => {
            tracing::info!("CAMPUS server stopped.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn db_config_defaults_match_campus_db() {
        let empty: HashMap<String, String> = HashMap::new();
        let config = db_config_from(|name| empty.get(name).cloned());
        let defaults = DbConfig::default();

        assert_eq!(config.url, defaults.url);
        assert_eq!(config.namespace, defaults.namespace);
        assert_eq!(config.database, defaults.database);
    }

    #[test]
    fn db_config_reads_campus_vars() {
        let vars = env(&[
            ("CAMPUS_DB_URL", "ws://db.internal:8000"),
            ("CAMPUS_DB_NS", "prod"),
            ("CAMPUS_DB_NAME", "campus"),
        ]);
        let config = db_config_from(|name| vars.get(name).cloned());

        assert_eq!(config.url, "ws://db.internal:8000");
        assert_eq!(config.namespace, "prod");
        assert_eq!(config.database, "campus");
        assert_eq!(config.username, DbConfig::default().username);
    }

    #[test]
    fn auth_config_falls_back_to_insecure_default() {
        let empty: HashMap<String, String> = HashMap::new();
        let config = auth_config_from(|name| empty.get(name).cloned());

        assert_eq!(config.jwt_secret, INSECURE_DEFAULT_SECRET);
        assert_eq!(config.token_lifetime_secs, 86_400);
    }

    #[test]
    fn auth_config_reads_secret_and_lifetime() {
        let vars = env(&[
            ("CAMPUS_JWT_SECRET", "a-real-secret"),
            ("CAMPUS_TOKEN_LIFETIME_SECS", "3600"),
        ]);
        let config = auth_config_from(|name| vars.get(name).cloned());

        assert_eq!(config.jwt_secret, "a-real-secret");
        assert_eq!(config.token_lifetime_secs, 3600);

        // An unparsable lifetime falls back rather than failing startup.
        let vars = env(&[("CAMPUS_TOKEN_LIFETIME_SECS", "soon")]);
        let config = auth_config_from(|name| vars.get(name).cloned());
        assert_eq!(config.token_lifetime_secs, 86_400);
    }
}

