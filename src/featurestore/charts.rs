// featurestore/charts.rs
//
// Pure chart-configuration builders. The configs are handed as-is to an
// external renderer; only the bucketing and rounding arithmetic lives
// here.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use super::models::{Feature, Quotas};

/// Whole days between two instants, rounded to the nearest day.
pub fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    const DAY_MS: f64 = 1000.0 * 60.0 * 60.0 * 24.0;
    ((end - start).num_milliseconds() as f64 / DAY_MS).round() as i64
}

/// Interval in days between chart buckets: one day when the span fits in
/// the requested number of points, otherwise the span divided evenly
/// (floored). Zero requested points degrade to daily intervals.
pub fn date_interval(num_points: usize, span_days: i64) -> i64 {
    if num_points == 0 || span_days <= num_points as i64 {
        1
    } else {
        span_days / num_points as i64
    }
}

/// Bucket boundaries from `start` to `end`: at most `max_points` dates
/// stepped by `interval_days`, always beginning with the exact start and
/// ending with the exact end. A non-positive span collapses to the single
/// end date.
pub fn date_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval_days: i64,
    max_points: usize,
) -> Vec<DateTime<Utc>> {
    let span = days_between(start, end);
    if span <= 0 || max_points == 0 {
        return vec![end];
    }

    let mut dates = vec![start];
    let mut cursor = start;
    let steps = (span as f64 / interval_days as f64).ceil() as i64;
    for _ in 0..steps {
        if dates.len() >= max_points {
            break;
        }
        cursor += Duration::days(interval_days);
        dates.push(cursor);
    }
    // The final boundary is always the exact end date.
    if let Some(last) = dates.last_mut() {
        *last = end;
    }
    dates
}

/// Number of features created on or before `day`.
pub fn features_created_by(features: &[Feature], day: DateTime<Utc>) -> usize {
    features.iter().filter(|f| f.date <= day).count()
}

/// Time-bucketed count-of-features series: labels and per-bucket counts
/// from the earliest feature's creation date to `now`, in at most
/// `num_points` buckets. An empty feature list yields a single zero
/// point.
pub fn feature_progress_series(
    features: &[Feature],
    now: DateTime<Utc>,
    num_points: usize,
) -> (Vec<String>, Vec<usize>) {
    let Some(earliest) = features.iter().map(|f| f.date).min() else {
        return (vec![format_day(now)], vec![0]);
    };

    let span = days_between(earliest, now);
    let interval = date_interval(num_points, span.max(0));
    let days = date_range(earliest, now, interval, num_points);

    let labels = days.iter().map(|d| format_day(*d)).collect();
    let counts = days
        .iter()
        .map(|d| features_created_by(features, *d))
        .collect();
    (labels, counts)
}

fn format_day(day: DateTime<Utc>) -> String {
    day.format("%d-%m-%y").to_string()
}

/// Line-chart options for the feature progress header widget.
pub fn feature_progress_chart(
    features: &[Feature],
    now: DateTime<Utc>,
    num_points: usize,
) -> Value {
    let (labels, counts) = feature_progress_series(features, now, num_points);
    json!({
        "chart": {
            "height": 150,
            "type": "line",
            "zoom": { "enabled": false },
            "toolbar": { "show": false }
        },
        "yaxis": { "tickAmount": 2 },
        "dataLabels": { "enabled": false },
        "stroke": { "curve": "straight" },
        "series": [{ "name": "Features", "data": counts }],
        "grid": {
            "row": { "colors": ["#f3f3f3", "transparent"], "opacity": 0.5 }
        },
        "xaxis": {
            "categories": labels,
            "labels": { "rotate": -35, "rotateAlways": true }
        },
        "colors": ["#111"]
    })
}

/// Percentage of the storage quota in use, rounded to the nearest
/// integer. Zero when no quota is set.
pub fn quota_percentage(quotas: &Quotas) -> u64 {
    if quotas.featurestore_hdfs_quota_in_bytes == 0 {
        return 0;
    }
    let ratio = quotas.featurestore_hdfs_usage_in_bytes as f64
        / quotas.featurestore_hdfs_quota_in_bytes as f64;
    (ratio * 100.0).round() as u64
}

/// Radial-bar options for the quota header widget.
pub fn quota_chart(quotas: &Quotas) -> Value {
    json!({
        "chart": { "height": 175, "type": "radialBar" },
        "plotOptions": {
            "radialBar": {
                "hollow": { "size": "70%", "offsetY": -60, "offsetX": -200 }
            }
        },
        "fill": { "colors": ["#111"] },
        "dataLabels": { "style": { "fontSize": "14px", "colors": ["#111"] } },
        "stroke": { "lineCap": "round" },
        "colors": ["#111"],
        "series": [quota_percentage(quotas)],
        "labels": ["Quota"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn feature(name: &str, created: &str) -> Feature {
        Feature {
            name: name.to_string(),
            feature_type: "int".into(),
            description: None,
            primary: false,
            featuregroup: "g".into(),
            version: 1,
            date: created.parse().expect("ts"),
            idx: 1,
        }
    }

    fn quotas(usage: u64, quota: u64) -> Quotas {
        Quotas {
            featurestore_hdfs_usage_in_bytes: usage,
            featurestore_hdfs_quota_in_bytes: quota,
            featurestore_hdfs_ns_count: 10,
            featurestore_hdfs_ns_quota: 100,
        }
    }

    #[test]
    fn interval_is_one_day_for_short_spans() {
        assert_eq!(date_interval(5, 3), 1);
        assert_eq!(date_interval(5, 5), 1);
        assert_eq!(date_interval(5, 50), 10);
    }

    #[test]
    fn zero_requested_points_degrade_to_daily_intervals() {
        assert_eq!(date_interval(0, 60), 1);
        assert_eq!(date_interval(0, 0), 1);
    }

    #[test]
    fn progress_series_with_zero_points_collapses_to_the_end_date() {
        let features = vec![feature("a", "2026-01-01T00:00:00Z")];
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let (labels, counts) = feature_progress_series(&features, now, 0);
        assert_eq!(labels, vec!["01-03-26".to_string()]);
        assert_eq!(counts, vec![1]);
    }

    #[test]
    fn range_starts_at_start_and_ends_at_end() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let span = days_between(start, end);
        let range = date_range(start, end, date_interval(5, span), 5);
        assert!(range.len() <= 5);
        assert_eq!(range.first(), Some(&start));
        assert_eq!(range.last(), Some(&end));
    }

    #[test]
    fn same_day_span_collapses_to_single_bucket() {
        let day = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        let range = date_range(day, day, 1, 5);
        assert_eq!(range, vec![day]);
    }

    #[test]
    fn progress_series_counts_are_nondecreasing_and_end_at_total() {
        let features = vec![
            feature("a", "2026-01-01T00:00:00Z"),
            feature("b", "2026-01-15T00:00:00Z"),
            feature("c", "2026-02-20T00:00:00Z"),
        ];
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let (labels, counts) = feature_progress_series(&features, now, 5);
        assert_eq!(labels.len(), counts.len());
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*counts.last().expect("last"), features.len());
        assert_eq!(labels[0], "01-01-26");
        assert_eq!(labels.last().map(String::as_str), Some("01-03-26"));
    }

    #[test]
    fn empty_feature_list_yields_single_zero_point() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let (labels, counts) = feature_progress_series(&[], now, 5);
        assert_eq!(counts, vec![0]);
        assert_eq!(labels, vec!["01-03-26".to_string()]);
    }

    #[test]
    fn quota_percentage_rounds_to_nearest_integer() {
        assert_eq!(quota_percentage(&quotas(333, 1000)), 33);
        assert_eq!(quota_percentage(&quotas(335, 1000)), 34);
        assert_eq!(quota_percentage(&quotas(1000, 1000)), 100);
    }

    #[test]
    fn zero_quota_reports_zero_percent() {
        assert_eq!(quota_percentage(&quotas(500, 0)), 0);
    }

    #[test]
    fn chart_configs_carry_the_series() {
        let cfg = quota_chart(&quotas(500, 1000));
        assert_eq!(cfg["series"][0], 50);
        assert_eq!(cfg["chart"]["type"], "radialBar");

        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let line = feature_progress_chart(&[], now, 5);
        assert_eq!(line["chart"]["type"], "line");
        assert_eq!(line["series"][0]["name"], "Features");
        assert_eq!(line["series"][0]["data"][0], 0);
    }
}
