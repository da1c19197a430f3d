use std::path::PathBuf;
use std::str::FromStr;

use helpcenter_core::media::{
    UploadPolicy, DEFAULT_IMAGE_EXTENSIONS, DEFAULT_MAX_IMAGE_BYTES, DEFAULT_MAX_VIDEO_BYTES,
    DEFAULT_VIDEO_EXTENSIONS,
};

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding uploaded media (default: `uploads`).
    pub media_root: PathBuf,
    /// Public path prefix media is served under (default: `/uploads`).
    pub media_url_prefix: String,
    /// Size and type limits for uploads.
    pub upload_policy: UploadPolicy,
    /// Insert sample articles into an empty catalog at startup.
    pub seed_sample_articles: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                  |
    /// |----------------------------|--------------------------|
    /// | `DATABASE_URL`             | required                 |
    /// | `HOST`                     | `0.0.0.0`                |
    /// | `PORT`                     | `3000`                   |
    /// | `CORS_ORIGINS`             | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                     |
    /// | `MEDIA_ROOT`               | `uploads`                |
    /// | `MEDIA_URL_PREFIX`         | `/uploads`               |
    /// | `MAX_IMAGE_BYTES`          | `10485760`               |
    /// | `MAX_VIDEO_BYTES`          | `209715200`              |
    /// | `ALLOWED_IMAGE_EXTENSIONS` | `png,jpg,jpeg,gif,webp`  |
    /// | `ALLOWED_VIDEO_EXTENSIONS` | `mp4,webm,mov`           |
    /// | `SEED_SAMPLE_ARTICLES`     | `true`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_var(&lookup, "PORT", 3000u16)?;

        let cors_origins = split_list(
            &lookup("CORS_ORIGINS").unwrap_or_else(|| "http://localhost:3000".into()),
        );

        let request_timeout_secs = parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 30u64)?;

        let media_root = PathBuf::from(lookup("MEDIA_ROOT").unwrap_or_else(|| "uploads".into()));
        let media_url_prefix = normalize_prefix(
            &lookup("MEDIA_URL_PREFIX").unwrap_or_else(|| "/uploads".into()),
        );
        if media_url_prefix.is_empty() {
            return Err(ConfigError::Invalid {
                name: "MEDIA_URL_PREFIX",
                value: lookup("MEDIA_URL_PREFIX").unwrap_or_default(),
            });
        }

        let upload_policy = UploadPolicy {
            max_image_bytes: parse_var(&lookup, "MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES)?,
            max_video_bytes: parse_var(&lookup, "MAX_VIDEO_BYTES", DEFAULT_MAX_VIDEO_BYTES)?,
            image_extensions: extensions_var(
                &lookup,
                "ALLOWED_IMAGE_EXTENSIONS",
                DEFAULT_IMAGE_EXTENSIONS,
            ),
            video_extensions: extensions_var(
                &lookup,
                "ALLOWED_VIDEO_EXTENSIONS",
                DEFAULT_VIDEO_EXTENSIONS,
            ),
        };

        let seed_sample_articles = parse_var(&lookup, "SEED_SAMPLE_ARTICLES", true)?;

        Ok(Self {
            database_url,
            host,
            port,
            cors_origins,
            request_timeout_secs,
            media_root,
            media_url_prefix,
            upload_policy,
            seed_sample_articles,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

fn extensions_var(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: &[&str],
) -> Vec<String> {
    match lookup(name) {
        Some(raw) => split_list(&raw)
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// `uploads/` -> `/uploads`
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/help")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.media_root, PathBuf::from("uploads"));
        assert_eq!(config.media_url_prefix, "/uploads");
        assert_eq!(config.upload_policy.max_image_bytes, DEFAULT_MAX_IMAGE_BYTES);
        assert_eq!(config.upload_policy.video_extensions, vec!["mp4", "webm", "mov"]);
        assert!(config.seed_sample_articles);
    }

    #[test]
    fn database_url_is_required() {
        assert_matches!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/help"),
            ("PORT", "8080"),
            ("MEDIA_URL_PREFIX", "media/"),
            ("MAX_VIDEO_BYTES", "1024"),
            ("ALLOWED_IMAGE_EXTENSIONS", ".PNG, svg"),
            ("SEED_SAMPLE_ARTICLES", "false"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.media_url_prefix, "/media");
        assert_eq!(config.upload_policy.max_video_bytes, 1024);
        assert_eq!(config.upload_policy.image_extensions, vec!["png", "svg"]);
        assert!(!config.seed_sample_articles);
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let err = load(&[("DATABASE_URL", "postgres://db/help"), ("PORT", "http")]).unwrap_err();
        assert_matches!(&err, ConfigError::Invalid { name: "PORT", .. });
        assert_eq!(err.to_string(), "PORT has invalid value 'http'");
    }

    #[test]
    fn root_media_prefix_is_rejected() {
        let err = load(&[("DATABASE_URL", "postgres://db/help"), ("MEDIA_URL_PREFIX", "/")])
            .unwrap_err();
        assert_matches!(err, ConfigError::Invalid { name: "MEDIA_URL_PREFIX", .. });
    }
}
