//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! - LOG_LEVEL sets the filter, either a bare level ("debug") or full
//!   directives. Falls back to [`DEFAULT_FILTER`].
//! - LOG_FORMAT=json switches to structured JSON lines; anything else is the
//!   human-readable format.
//!
//! Targets in use: `combo_words` (server lifecycle), `quiz` (sessions and
//! grading), `vocab` (loading and the shared-character index).

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,quiz=debug,vocab=debug,combo_words=debug,tower_http=info,axum=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_env_value(v: Option<&str>) -> Self {
        match v.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let format = LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // The two formats produce different subscriber types, so init in each arm.
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format() {
        assert_eq!(LogFormat::from_env_value(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("pretty")), LogFormat::Pretty);
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Pretty);
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
