//! Search orchestration across the campground list

use std::cmp::Ordering;

use tracing::{info, instrument, warn};

use super::evaluator::{eligible_distance, evaluate_campground};
use super::progress::{ProgressEvent, ProgressSink};
use crate::models::{Campground, HomeLocation, SearchParameters, SummerDayMatch};
use crate::weather::ForecastProvider;

/// Runs searches against a forecast provider
#[derive(Debug, Clone)]
pub struct SummerDayFinder<P> {
    provider: P,
}

impl<P: ForecastProvider> SummerDayFinder<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Find every qualifying (campground, day) pair, sorted for display.
    ///
    /// Campgrounds are evaluated one at a time in input order. A campground
    /// whose forecast fails is reported through the sink and skipped; the
    /// search itself never fails.
    #[instrument(skip_all, fields(campgrounds = campgrounds.len()))]
    pub async fn search<S>(
        &self,
        campgrounds: &[Campground],
        params: &SearchParameters,
        home: Option<&HomeLocation>,
        sink: &mut S,
    ) -> Vec<SummerDayMatch>
    where
        S: ProgressSink + ?Sized,
    {
        let eligible: Vec<&Campground> = campgrounds
            .iter()
            .filter(|campground| eligible_distance(campground, home, params.max_miles).is_some())
            .collect();
        let total = eligible.len();

        info!(
            "Searching {} of {} campgrounds (max {} miles, {}-{}°F, weekends only: {})",
            total,
            campgrounds.len(),
            params.max_miles,
            params.min_high_temp,
            params.max_high_temp,
            params.weekends_only
        );
        sink.emit(ProgressEvent::Considering {
            eligible: total,
            max_miles: params.max_miles,
            home: home.copied(),
        });

        let mut summer_days = Vec::new();
        let mut failures = 0usize;

        for (index, campground) in eligible.into_iter().enumerate() {
            sink.emit(ProgressEvent::Checking {
                name: campground.name.clone(),
                position: index + 1,
                total,
            });

            match evaluate_campground(&self.provider, campground, params, home).await {
                Ok(matches) => {
                    for summer_day in matches {
                        sink.emit(ProgressEvent::Found(summer_day.clone()));
                        summer_days.push(summer_day);
                    }
                }
                Err(e) => {
                    failures += 1;
                    warn!("{e}");
                    sink.emit(ProgressEvent::Failed {
                        message: e.to_string(),
                    });
                }
            }
        }

        sort_summer_days(&mut summer_days, params.prefer_waterfront);
        info!(
            "Search finished with {} summer days ({} campgrounds failed)",
            summer_days.len(),
            failures
        );
        summer_days
    }
}

/// Stable sort by ascending distance, waterfront matches first when preferred
pub fn sort_summer_days(summer_days: &mut [SummerDayMatch], prefer_waterfront: bool) {
    summer_days.sort_by(|a, b| {
        let waterfront = if prefer_waterfront {
            b.is_waterfront().cmp(&a.is_waterfront())
        } else {
            Ordering::Equal
        };
        waterfront.then_with(|| a.dist.total_cmp(&b.dist))
    });
}
