//! Per-campground evaluation: distance check, forecast fetch, day filtering

use tracing::{debug, instrument};

use crate::Result;
use crate::models::{
    Campground, ForecastDay, HomeLocation, SearchParameters, SummerDayMatch, distance_from_home,
    round_miles,
};
use crate::weather::ForecastProvider;

/// Distance from home when the campground is eligible, `None` otherwise.
///
/// Eligible means strictly closer than `max_miles`. Without a home location
/// there is no distance filtering and the distance is 0.
#[must_use]
pub fn eligible_distance(
    campground: &Campground,
    home: Option<&HomeLocation>,
    max_miles: f64,
) -> Option<f64> {
    let Some(home) = home else {
        return Some(0.0);
    };
    let dist = distance_from_home(Some(home), &campground.location);
    (dist < max_miles).then_some(dist)
}

/// Evaluate one campground.
///
/// Ineligible campgrounds return no matches without a forecast request.
/// A forecast failure is returned tagged with the campground name.
#[instrument(skip_all, fields(campground = %campground.name))]
pub async fn evaluate_campground<P>(
    provider: &P,
    campground: &Campground,
    params: &SearchParameters,
    home: Option<&HomeLocation>,
) -> Result<Vec<SummerDayMatch>>
where
    P: ForecastProvider + ?Sized,
{
    let Some(dist) = eligible_distance(campground, home, params.max_miles) else {
        debug!("Out of range, skipping forecast");
        return Ok(Vec::new());
    };

    let days = provider
        .forecast(&campground.location)
        .await
        .map_err(|e| e.for_campground(&campground.name))?;

    let summer_days = select_summer_days(campground, dist, &days, params);
    debug!(
        "{} of {} forecast days qualify",
        summer_days.len(),
        days.len()
    );
    Ok(summer_days)
}

/// Keep the forecast days whose high is within the band and whose weekday
/// passes the weekend filter. Days without a temperature, or with a reading
/// of exactly 0, are skipped.
#[must_use]
pub fn select_summer_days(
    campground: &Campground,
    dist: f64,
    days: &[ForecastDay],
    params: &SearchParameters,
) -> Vec<SummerDayMatch> {
    let dist = round_miles(dist);

    days.iter()
        .filter(|day| !params.weekends_only || day.is_weekend())
        .filter_map(|day| {
            let temp = day.max_temp_f.filter(|temp| *temp != 0.0)?;
            params.temp_in_band(temp).then(|| SummerDayMatch {
                name: campground.name.clone(),
                dist,
                date: day.date.format("%Y-%m-%d").to_string(),
                day: day.weekday_name(),
                temp,
                waterfront: campground.waterfront_label().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SummerFinderError;
    use crate::models::GeoPoint;
    use chrono::NaiveDate;
    use rstest::rstest;
    use std::cell::Cell;

    struct FixedForecast {
        days: Vec<ForecastDay>,
        calls: Cell<usize>,
    }

    impl FixedForecast {
        fn new(days: Vec<ForecastDay>) -> Self {
            Self {
                days,
                calls: Cell::new(0),
            }
        }
    }

    impl ForecastProvider for FixedForecast {
        async fn forecast(&self, _point: &GeoPoint) -> Result<Vec<ForecastDay>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.days.clone())
        }
    }

    struct FailingForecast;

    impl ForecastProvider for FailingForecast {
        async fn forecast(&self, point: &GeoPoint) -> Result<Vec<ForecastDay>> {
            Err(SummerFinderError::weather_fetch(point.key(), "timed out"))
        }
    }

    fn day(date: &str, temp: Option<f64>) -> ForecastDay {
        ForecastDay::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), temp)
    }

    fn home() -> HomeLocation {
        HomeLocation::new(38.93, -77.37)
    }

    #[tokio::test]
    async fn test_single_saturday_match() {
        let provider = FixedForecast::new(vec![day("2024-07-06", Some(75.0))]);
        let campground = Campground::new("Home Camp", GeoPoint::new(38.93, -77.37));
        let params = SearchParameters {
            max_miles: 50.0,
            ..Default::default()
        };

        let matches = evaluate_campground(&provider, &campground, &params, Some(&home()))
            .await
            .unwrap();

        assert_eq!(
            matches,
            vec![SummerDayMatch {
                name: "Home Camp".to_string(),
                dist: 0.0,
                date: "2024-07-06".to_string(),
                day: "Saturday".to_string(),
                temp: 75.0,
                waterfront: "none".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_too_hot_gives_no_match() {
        let provider = FixedForecast::new(vec![day("2024-07-06", Some(95.0))]);
        let campground = Campground::new("Home Camp", GeoPoint::new(38.93, -77.37));
        let params = SearchParameters {
            max_miles: 50.0,
            ..Default::default()
        };

        let matches = evaluate_campground(&provider, &campground, &params, Some(&home()))
            .await
            .unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_skips_forecast() {
        let provider = FixedForecast::new(vec![day("2024-07-06", Some(75.0))]);
        // Roughly 200 miles south-west of home
        let campground = Campground::new("Far Camp", GeoPoint::new(36.5, -80.0));
        let params = SearchParameters {
            max_miles: 50.0,
            ..Default::default()
        };

        let matches = evaluate_campground(&provider, &campground, &params, Some(&home()))
            .await
            .unwrap();

        assert!(matches.is_empty());
        assert_eq!(provider.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_no_home_means_zero_distance() {
        let provider = FixedForecast::new(vec![day("2024-07-07", Some(80.0))]);
        let campground = Campground::new("Anywhere", GeoPoint::new(44.0, -110.0));
        let params = SearchParameters {
            max_miles: 1.0,
            ..Default::default()
        };

        let matches = evaluate_campground(&provider, &campground, &params, None)
            .await
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].dist, 0.0);
    }

    #[tokio::test]
    async fn test_failure_tagged_with_campground_name() {
        let campground = Campground::new("Stormy Point", GeoPoint::new(38.9, -77.4));
        let err = evaluate_campground(
            &FailingForecast,
            &campground,
            &SearchParameters::default(),
            Some(&home()),
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error fetching weather for Stormy Point: timed out"
        );
    }

    #[rstest]
    #[case::friday_weekends_only("2024-07-05", Some(75.0), true, false)]
    #[case::friday_all_days("2024-07-05", Some(75.0), false, true)]
    #[case::sunday("2024-07-07", Some(75.0), true, true)]
    #[case::lower_bound("2024-07-06", Some(70.0), true, true)]
    #[case::upper_bound("2024-07-06", Some(88.0), true, true)]
    #[case::too_cold("2024-07-06", Some(69.9), true, false)]
    #[case::too_hot("2024-07-06", Some(88.1), true, false)]
    #[case::missing_temp("2024-07-06", None, true, false)]
    fn test_day_selection(
        #[case] date: &str,
        #[case] temp: Option<f64>,
        #[case] weekends_only: bool,
        #[case] expected: bool,
    ) {
        let campground = Campground::new("Camp", GeoPoint::new(38.0, -78.0));
        let params = SearchParameters {
            weekends_only,
            ..Default::default()
        };

        let matches = select_summer_days(&campground, 0.0, &[day(date, temp)], &params);
        assert_eq!(!matches.is_empty(), expected);
    }

    #[rstest]
    #[case::zero_temp(Some(0.0), false)]
    #[case::below_zero(Some(-5.0), true)]
    #[case::above_zero(Some(5.0), true)]
    fn test_cold_band(#[case] temp: Option<f64>, #[case] expected: bool) {
        let campground = Campground::new("Camp", GeoPoint::new(38.0, -78.0));
        let params = SearchParameters {
            min_high_temp: -10.0,
            max_high_temp: 10.0,
            ..Default::default()
        };

        let matches = select_summer_days(&campground, 0.0, &[day("2024-07-06", temp)], &params);
        assert_eq!(!matches.is_empty(), expected);
    }

    #[test]
    fn test_match_carries_waterfront_and_rounded_distance() {
        let campground =
            Campground::new("Lakeside", GeoPoint::new(38.0, -78.0)).with_waterfront("lake");
        let params = SearchParameters::default();

        let matches =
            select_summer_days(&campground, 42.6666, &[day("2024-07-06", Some(80.0))], &params);

        assert_eq!(matches[0].dist, 42.7);
        assert_eq!(matches[0].waterfront, "lake");
    }

    #[test]
    fn test_eligibility_is_strict() {
        let campground = Campground::new("Edge", GeoPoint::new(38.93, -77.37));
        assert!(eligible_distance(&campground, Some(&home()), 0.0).is_none());
        assert_eq!(eligible_distance(&campground, Some(&home()), 0.1), Some(0.0));
        assert_eq!(eligible_distance(&campground, None, 0.0), Some(0.0));
    }
}
