//! Progress reporting for a running search

use std::fmt;

use tokio::sync::mpsc::UnboundedSender;

use crate::models::{HomeLocation, SummerDayMatch};

/// A notification emitted while a search runs
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Emitted once, before any forecast is requested
    Considering {
        eligible: usize,
        max_miles: f64,
        home: Option<HomeLocation>,
    },
    /// About to evaluate the campground at `position` (1-based) of `total`
    Checking {
        name: String,
        position: usize,
        total: usize,
    },
    Found(SummerDayMatch),
    /// A campground was skipped because its forecast could not be fetched
    Failed { message: String },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Considering {
                eligible,
                max_miles,
                home,
            } => {
                write!(
                    f,
                    "Considering {eligible} campgrounds within {max_miles:?} miles of home "
                )?;
                match home {
                    Some(home) => write!(f, "{home}.")?,
                    None => write!(f, "any location.")?,
                }
                Ok(())
            }
            Self::Checking {
                name,
                position,
                total,
            } => write!(f, "Checking {name} ({position}/{total})"),
            Self::Found(summer_day) => {
                write!(f, "Found summer day at {}", summer_day.name)?;
                if summer_day.is_waterfront() {
                    write!(f, " ({} waterfront)", summer_day.waterfront)?;
                }
                write!(
                    f,
                    " - {} {} ({}°F)",
                    summer_day.day, summer_day.date, summer_day.temp
                )
            }
            Self::Failed { message } => f.write_str(message),
        }
    }
}

/// Destination for progress events.
///
/// Sinks must not fail the search: a sink whose consumer has gone away simply
/// drops the events.
pub trait ProgressSink {
    fn emit(&mut self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProgressEvent),
{
    fn emit(&mut self, event: ProgressEvent) {
        self(event);
    }
}

impl ProgressSink for Vec<ProgressEvent> {
    fn emit(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&mut self, _event: ProgressEvent) {}
}

/// Prints one line per event to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn emit(&mut self, event: ProgressEvent) {
        println!("{event}");
    }
}

/// Forwards rendered events to a channel; a closed channel drops them
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&mut self, event: ProgressEvent) {
        let _ = self.tx.send(event.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summer_day(waterfront: &str) -> SummerDayMatch {
        SummerDayMatch {
            name: "Lake Anna".to_string(),
            dist: 60.2,
            date: "2024-07-06".to_string(),
            day: "Saturday".to_string(),
            temp: 84.5,
            waterfront: waterfront.to_string(),
        }
    }

    #[test]
    fn test_considering_message_with_home() {
        let event = ProgressEvent::Considering {
            eligible: 12,
            max_miles: 150.0,
            home: Some(HomeLocation::new(38.93, -77.37)),
        };
        assert_eq!(
            event.to_string(),
            "Considering 12 campgrounds within 150.0 miles of home (38.93, -77.37)."
        );
    }

    #[test]
    fn test_considering_message_without_home() {
        let event = ProgressEvent::Considering {
            eligible: 3,
            max_miles: 400.0,
            home: None,
        };
        assert_eq!(
            event.to_string(),
            "Considering 3 campgrounds within 400.0 miles of home any location."
        );
    }

    #[test]
    fn test_checking_message() {
        let event = ProgressEvent::Checking {
            name: "Big Meadows".to_string(),
            position: 2,
            total: 7,
        };
        assert_eq!(event.to_string(), "Checking Big Meadows (2/7)");
    }

    #[test]
    fn test_found_message_labels_waterfront() {
        assert_eq!(
            ProgressEvent::Found(summer_day("lake")).to_string(),
            "Found summer day at Lake Anna (lake waterfront) - Saturday 2024-07-06 (84.5°F)"
        );
        assert_eq!(
            ProgressEvent::Found(summer_day("none")).to_string(),
            "Found summer day at Lake Anna - Saturday 2024-07-06 (84.5°F)"
        );
    }

    #[test]
    fn test_closure_sink() {
        let mut lines = Vec::new();
        {
            let mut sink = |event: ProgressEvent| lines.push(event.to_string());
            sink.emit(ProgressEvent::Failed {
                message: "boom".to_string(),
            });
        }
        assert_eq!(lines, vec!["boom".to_string()]);
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut sink = ChannelSink::new(tx);

        sink.emit(ProgressEvent::Failed {
            message: "first".to_string(),
        });
        assert_eq!(rx.try_recv().unwrap(), "first");

        drop(rx);
        sink.emit(ProgressEvent::Failed {
            message: "dropped".to_string(),
        });
    }
}
