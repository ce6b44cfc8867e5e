use crate::{env_or_default, Environment};
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre for startup failures in `main`.
///
/// Shows the file:line of the failure and hides the environment section.
/// Calling it again is a no-op.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Output format of the fmt layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// One flattened JSON object per event, no module target
    Json,
    /// Multi-line human readable output with module targets
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT=json|pretty` wins; otherwise production logs JSON and everything else pretty
    pub fn resolve(environment: &Environment) -> Self {
        match env_or_default("LOG_FORMAT", "").to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ if environment.is_production() => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Directives used when `RUST_LOG` is unset
pub fn default_directives(environment: &Environment) -> &'static str {
    if environment.is_production() {
        "info,tower_http=info,mongodb=warn"
    } else {
        "debug,tower_http=debug,mongodb=info,hyper=info"
    }
}

/// Initialize the global subscriber.
///
/// The registry carries an `EnvFilter` (`RUST_LOG` or [`default_directives`]), the fmt
/// layer picked by [`LogFormat::resolve`] and a `tracing_error::ErrorLayer`, so eyre
/// reports raised inside `#[instrument]`ed service and repository calls include the
/// span trace.
///
/// A second call (common in tests) leaves the first subscriber in place.
///
/// ```ignore
/// install_color_eyre();
/// let config = Config::from_env()?;
/// init_tracing(&config.environment);
/// ```
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)));
    let format = LogFormat::resolve(environment);

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
    };

    match result {
        Ok(()) => info!(?environment, ?format, "tracing initialized"),
        Err(_) => debug!("tracing already initialized"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_follows_environment() {
        temp_env::with_var_unset("LOG_FORMAT", || {
            assert_eq!(LogFormat::resolve(&Environment::Production), LogFormat::Json);
            assert_eq!(LogFormat::resolve(&Environment::Development), LogFormat::Pretty);
        });
    }

    #[test]
    fn test_log_format_override() {
        temp_env::with_var("LOG_FORMAT", Some("JSON"), || {
            assert_eq!(LogFormat::resolve(&Environment::Development), LogFormat::Json);
        });
        temp_env::with_var("LOG_FORMAT", Some("pretty"), || {
            assert_eq!(LogFormat::resolve(&Environment::Production), LogFormat::Pretty);
        });
        temp_env::with_var("LOG_FORMAT", Some("xml"), || {
            assert_eq!(LogFormat::resolve(&Environment::Production), LogFormat::Json);
        });
    }

    #[test]
    fn test_default_directives_quiet_the_driver_in_production() {
        assert!(default_directives(&Environment::Production).contains("mongodb=warn"));
        assert!(default_directives(&Environment::Development).starts_with("debug"));
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            init_tracing(&Environment::Development);
            init_tracing(&Environment::Production);
        });
    }
}
