use chrono::{Duration, NaiveDate};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Days covered by the statistics, today included.
pub const WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyVisits {
    pub date: NaiveDate,
    pub visits: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficStats {
    pub daily_data: Vec<DailyVisits>,
    pub total_visits: u64,
    pub highest_daily: u64,
    pub average_daily: u64,
}

impl TrafficStats {
    fn from_days(days: Vec<DailyVisits>) -> Self {
        let total_visits: u64 = days.iter().map(|d| d.visits).sum();
        let highest_daily = days.iter().map(|d| d.visits).max().unwrap_or(0);
        TrafficStats {
            average_daily: (total_visits as f64 / WINDOW_DAYS as f64).round() as u64,
            daily_data: days,
            total_visits,
            highest_daily,
        }
    }
}

/// Per-URL visit counter owned by the serving layer.
pub trait TrafficStore: Send + Sync {
    /// Count one visit on `today` and drop days that fell out of the retention window.
    fn record_visit(&self, url: &str, today: NaiveDate);

    /// The last seven days ending on `today`, oldest first.
    fn stats(&self, url: &str, today: NaiveDate) -> TrafficStats;
}

#[derive(Debug, Default)]
pub struct InMemoryTrafficStore {
    visits: DashMap<String, BTreeMap<NaiveDate, u64>>,
}

impl InMemoryTrafficStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrafficStore for InMemoryTrafficStore {
    fn record_visit(&self, url: &str, today: NaiveDate) {
        let mut days = self.visits.entry(url.to_string()).or_default();
        *days.entry(today).or_insert(0) += 1;
        let cutoff = today - Duration::days(WINDOW_DAYS);
        days.retain(|date, _| *date >= cutoff);
        tracing::debug!(url, days = days.len(), "Visit recorded");
    }

    fn stats(&self, url: &str, today: NaiveDate) -> TrafficStats {
        let entry = self.visits.get(url);
        let days = (0..WINDOW_DAYS)
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                let visits = entry
                    .as_ref()
                    .and_then(|days| days.get(&date).copied())
                    .unwrap_or(0);
                DailyVisits { date, visits }
            })
            .collect();
        TrafficStats::from_days(days)
    }
}
