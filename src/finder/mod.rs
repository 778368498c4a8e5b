//! Summer day search
//!
//! Pre-filters campgrounds by distance from home, fetches forecasts for the
//! survivors one at a time, keeps the weekend (or any) days whose high falls
//! inside the temperature band and sorts the result for display.

pub mod evaluator;
pub mod progress;
pub mod search;

pub use evaluator::{eligible_distance, evaluate_campground, select_summer_days};
pub use progress::{ChannelSink, ConsoleSink, NullSink, ProgressEvent, ProgressSink};
pub use search::{SummerDayFinder, sort_summer_days};
