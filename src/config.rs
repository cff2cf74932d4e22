//! Connection settings for the service bus.
//!
//! [`BusSettings`] is the plain record the configuration builder mutates
//! before it is frozen. Settings can also be seeded from environment
//! variables (or a `.env` file via `dotenvy`):
//!
//! | Variable                    | Field            | Default           |
//! |-----------------------------|------------------|-------------------|
//! | `SERVICEBUS_APPLICATION_ID` | `application_id` | empty (required)  |
//! | `SERVICEBUS_NAMESPACE`      | `namespace`      | empty             |
//! | `SERVICEBUS_ISSUER_NAME`    | `issuer_name`    | empty             |
//! | `SERVICEBUS_ISSUER_KEY`     | `issuer_key`     | empty             |
//! | `SERVICEBUS_SERVICE_PATH`   | `service_path`   | empty             |
//! | `SERVICEBUS_TOPIC_NAME`     | `topic_name`     | `pro_ext_topic`   |
//! | `SERVICEBUS_MAX_THREADS`    | `max_threads`    | `1`               |

use std::fmt;

use serde::Serialize;

/// Topic used when none is configured.
pub const DEFAULT_TOPIC_NAME: &str = "pro_ext_topic";

/// Handler concurrency used when none is configured.
pub const DEFAULT_MAX_THREADS: u8 = 1;

/// Connection and behavior settings of the bus client.
///
/// The issuer key is a credential: it is redacted from `Debug` output and
/// never serialized.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct BusSettings {
    /// Identifies this application on the bus. Required at build time.
    pub application_id: String,

    /// Service bus namespace.
    pub namespace: String,

    /// Issuer (shared secret owner) name.
    pub issuer_name: String,

    /// Issuer shared secret.
    #[serde(skip_serializing)]
    pub issuer_key: String,

    /// Service path appended to the namespace address.
    pub service_path: String,

    /// Topic every message is published to.
    pub topic_name: String,

    /// Number of threads the receiver may use to call message handlers.
    pub max_threads: u8,
}

impl BusSettings {
    /// Loads settings from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    /// Missing variables keep their defaults; a `SERVICEBUS_MAX_THREADS`
    /// that is not a number in `1..=255` falls back to `1`.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    ///
    /// Uses the same keys and fallbacks as [`BusSettings::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);

        let max_threads = lookup("SERVICEBUS_MAX_THREADS")
            .and_then(|v| v.trim().parse::<u8>().ok())
            .filter(|n| *n >= 1)
            .unwrap_or(DEFAULT_MAX_THREADS);

        Self {
            application_id: text("SERVICEBUS_APPLICATION_ID", defaults.application_id),
            namespace: text("SERVICEBUS_NAMESPACE", defaults.namespace),
            issuer_name: text("SERVICEBUS_ISSUER_NAME", defaults.issuer_name),
            issuer_key: text("SERVICEBUS_ISSUER_KEY", defaults.issuer_key),
            service_path: text("SERVICEBUS_SERVICE_PATH", defaults.service_path),
            topic_name: text("SERVICEBUS_TOPIC_NAME", defaults.topic_name),
            max_threads,
        }
    }

    /// Returns `true` if an application id has been set.
    #[must_use]
    pub fn has_application_id(&self) -> bool {
        !self.application_id.trim().is_empty()
    }
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            application_id: String::new(),
            namespace: String::new(),
            issuer_name: String::new(),
            issuer_key: String::new(),
            service_path: String::new(),
            topic_name: DEFAULT_TOPIC_NAME.to_string(),
            max_threads: DEFAULT_MAX_THREADS,
        }
    }
}

impl fmt::Debug for BusSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issuer_key = if self.issuer_key.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("BusSettings")
            .field("application_id", &self.application_id)
            .field("namespace", &self.namespace)
            .field("issuer_name", &self.issuer_name)
            .field("issuer_key", &issuer_key)
            .field("service_path", &self.service_path)
            .field("topic_name", &self.topic_name)
            .field("max_threads", &self.max_threads)
            .finish()
    }
}
