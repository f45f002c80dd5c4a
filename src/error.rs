use thiserror::Error;

/// Main error type for layerconf operations
#[derive(Debug, Error)]
pub enum LayerconfError {
    #[error("Configuration initialization failed for '{resource}': {reason}")]
    ConfigInit {
        resource: String,
        reason: InitFailure,
    },
}

/// Underlying cause of a failed configuration initialization
#[derive(Debug, Error)]
pub enum InitFailure {
    #[error("resource not found (searched: {searched})")]
    NotFound { searched: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("properties parse error: {0}")]
    Parse(#[from] java_properties::PropertiesError),
}

impl LayerconfError {
    pub fn config_init<S: Into<String>>(resource: S, reason: InitFailure) -> Self {
        Self::ConfigInit {
            resource: resource.into(),
            reason,
        }
    }

    pub fn not_found<S: Into<String>>(resource: S, searched: S) -> Self {
        Self::config_init(
            resource,
            InitFailure::NotFound {
                searched: searched.into(),
            },
        )
    }

    /// The resource identifier that failed to initialize
    pub fn resource(&self) -> &str {
        match self {
            Self::ConfigInit { resource, .. } => resource,
        }
    }
}

/// Result type alias for layerconf operations
pub type Result<T> = std::result::Result<T, LayerconfError>;
