//! Application configuration loaded from environment variables.

use std::env;

use scribe_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Prefix for every route, e.g. `/api`. Empty serves from the root.
    pub base_path: String,
    /// Externally visible origin used in pagination links.
    pub public_url: String,
    pub database: Option<DatabaseConfig>,
    pub allowed_origins: Vec<String>,
    pub summary_fields: Vec<String>,
    pub default_page_limit: u64,
    pub max_page_limit: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let port = parsed("PORT").unwrap_or(3005);

        let database = env::var("MONGO_URL").ok().map(|url| DatabaseConfig {
            url,
            database: env::var("MONGO_DATABASE").unwrap_or_else(|_| "scribe".to_string()),
            max_pool_size: parsed("MONGO_MAX_POOL_SIZE").unwrap_or(100),
            min_pool_size: parsed("MONGO_MIN_POOL_SIZE").unwrap_or(10),
        });

        let mut allowed_origins = split_list(&env::var("ALLOWED_ORIGINS").unwrap_or_default());
        for key in ["FE_DEV_URL", "FE_PROD_URL"] {
            if let Ok(url) = env::var(key) {
                allowed_origins.extend(split_list(&url));
            }
        }

        let summary_fields = env::var("SUMMARY_FIELDS")
            .map(|v| split_list(&v))
            .unwrap_or_else(|_| {
                ["firstName", "lastName", "userName", "name"]
                    .map(String::from)
                    .to_vec()
            });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            base_path: normalize_base_path(&env::var("API_BASE_PATH").unwrap_or_default()),
            public_url: env::var("PUBLIC_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            database,
            allowed_origins,
            summary_fields,
            default_page_limit: parsed("DEFAULT_PAGE_LIMIT").unwrap_or(10),
            max_page_limit: parsed("MAX_PAGE_LIMIT").unwrap_or(100),
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Comma-separated values, trimmed, empties dropped. Origins never carry a
/// trailing slash, so one is stripped.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// `api/` → `/api`; `/` and empty → empty.
fn normalize_base_path(value: &str) -> String {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
