//! Bus error types.
//!
//! [`BusError`] is the central error type for the crate. Bootstrap
//! failures ([`BusError::InvalidArgument`], [`BusError::Configuration`],
//! [`BusError::AlreadyConfigured`]) are fatal: they are returned to the
//! caller of the offending method and never retried internally.

/// Error enum shared by the configuration lifecycle and the default
/// components.
///
/// # Categories
///
/// | Variant             | Raised by                          | Fatal |
/// |---------------------|------------------------------------|-------|
/// | `InvalidArgument`   | registration methods, acquisition  | yes   |
/// | `Configuration`     | `ConfigurationBuilder::build`      | yes   |
/// | `AlreadyConfigured` | acquisition / build after freeze   | yes   |
/// | `Serialization`     | `Serializer` implementations       | no    |
/// | `Endpoint`          | `Receiver` implementations         | yes   |
/// | `Send`              | `Sender` implementations           | no    |
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// An absent or blank value was passed where one is required.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A required setting is missing when the configuration is built.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The process-wide configuration has already been built.
    #[error("bus configuration has already been built")]
    AlreadyConfigured,

    /// Payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A receive endpoint could not be registered.
    #[error("endpoint error: {0}")]
    Endpoint(String),

    /// A message could not be handed to the transport.
    #[error("send error: {0}")]
    Send(String),
}

impl BusError {
    /// Returns `true` for errors that abort bootstrap.
    ///
    /// Fatal errors leave the process without a usable bus; the only
    /// recovery is to correct the inputs and configure again.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidArgument(_)
            | Self::Configuration(_)
            | Self::AlreadyConfigured
            | Self::Endpoint(_) => true,
            Self::Serialization(_) | Self::Send(_) => false,
        }
    }
}
