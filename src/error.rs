//! Error types and handling for the `SummerFinder` application

use thiserror::Error;

/// Main error type for the `SummerFinder` application
#[derive(Error, Debug)]
pub enum SummerFinderError {
    /// Settings or home configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The campground list is missing or malformed
    #[error("Failed to load campgrounds from {path}: {message}")]
    CampgroundLoad { path: String, message: String },

    /// A forecast request for one campground failed
    #[error("Error fetching weather for {target}: {message}")]
    WeatherFetch { target: String, message: String },

    /// SMS delivery failed
    #[error("Notification failed: {message}")]
    Notification { message: String },

    /// Other third-party API errors (geocoding, elevation)
    #[error("API error: {message}")]
    Api { message: String },

    /// A data conversion tool could not read or write its format
    #[error("Conversion failed: {message}")]
    Conversion { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON (de)serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl SummerFinderError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new campground load error
    pub fn campground_load<P: Into<String>, S: Into<String>>(path: P, message: S) -> Self {
        Self::CampgroundLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new weather fetch error
    pub fn weather_fetch<T: Into<String>, S: Into<String>>(target: T, message: S) -> Self {
        Self::WeatherFetch {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a new notification error
    pub fn notification<S: Into<String>>(message: S) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new conversion error
    pub fn conversion<S: Into<String>>(message: S) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Re-tag a weather fetch failure with the campground it was issued for.
    /// Other variants pass through unchanged.
    #[must_use]
    pub fn for_campground(self, name: &str) -> Self {
        match self {
            Self::WeatherFetch { message, .. } => Self::WeatherFetch {
                target: name.to_string(),
                message,
            },
            other => other,
        }
    }

    /// Whether this failure is scoped to a single campground
    #[must_use]
    pub fn is_candidate_scoped(&self) -> bool {
        matches!(self, Self::WeatherFetch { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SummerFinderError::Config { .. } => {
                "Configuration error. Please check your settings and config.json.".to_string()
            }
            SummerFinderError::CampgroundLoad { path, .. } => {
                format!("Could not read the campground list at {path}.")
            }
            SummerFinderError::WeatherFetch { target, .. } => {
                format!("Weather forecast unavailable for {target}.")
            }
            SummerFinderError::Notification { .. } => {
                "The SMS notification could not be delivered.".to_string()
            }
            SummerFinderError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            SummerFinderError::Conversion { message } => {
                format!("Could not convert the campground data: {message}")
            }
            SummerFinderError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SummerFinderError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            SummerFinderError::Json { .. } => "Malformed JSON document.".to_string(),
        }
    }
}
