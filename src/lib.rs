//! `SummerFinder` - find campgrounds with summer-like weekend weather near home
//!
//! This library provides the campground store, the forecast client, the
//! summer day search with progress reporting, SMS notification, the HTTP
//! front end and the campground data conversion tools.

pub mod api;
pub mod campgrounds;
pub mod config;
pub mod convert;
pub mod error;
pub mod finder;
pub mod models;
pub mod notify;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use campgrounds::{load_campgrounds, save_campgrounds};
pub use config::{HomeConfig, RetryMode, Settings, resolve_home};
pub use error::SummerFinderError;
pub use finder::{ProgressEvent, ProgressSink, SummerDayFinder};
pub use models::{Campground, ForecastDay, GeoPoint, HomeLocation, SearchParameters, SummerDayMatch};
pub use notify::{DeliveryResult, Notifier};
pub use weather::{ForecastProvider, WeatherClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SummerFinderError>;
