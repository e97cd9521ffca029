use crate::session::{round_epoc, SessionEpoc};
use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weekly EPOC load record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyEpoc {
    /// Sunday the week starts on
    pub week_start: NaiveDate,

    /// Sum of session EPOC totals, rounded to one decimal place
    pub total_epoc: Decimal,

    /// Number of sessions contributing to the week
    pub session_count: usize,

    /// Unrounded per-session totals in the order they were aggregated
    pub session_totals: Vec<f64>,
}

/// The Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday();
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

/// Aggregates session EPOC into weekly load
#[derive(Debug, Default)]
pub struct WeeklyEpocCalculator;

impl WeeklyEpocCalculator {
    pub fn new() -> Self {
        WeeklyEpocCalculator
    }

    /// Group session EPOC by week start
    ///
    /// Totals are summed unrounded and rounded once per week.
    pub fn aggregate(&self, sessions: &[SessionEpoc]) -> BTreeMap<NaiveDate, WeeklyEpoc> {
        let mut weekly: BTreeMap<NaiveDate, WeeklyEpoc> = BTreeMap::new();

        for session in sessions {
            let start = week_start(session.date);

            weekly
                .entry(start)
                .and_modify(|week| {
                    week.session_count += 1;
                    week.session_totals.push(session.total);
                })
                .or_insert(WeeklyEpoc {
                    week_start: start,
                    total_epoc: Decimal::ZERO,
                    session_count: 1,
                    session_totals: vec![session.total],
                });
        }

        for week in weekly.values_mut() {
            week.total_epoc = round_epoc(week.session_totals.iter().sum());
        }

        weekly
    }

    /// Weekly load in ascending week order
    pub fn weekly_series(&self, sessions: &[SessionEpoc]) -> Vec<WeeklyEpoc> {
        let series: Vec<WeeklyEpoc> = self.aggregate(sessions).into_values().collect();
        tracing::debug!(weeks = series.len(), sessions = sessions.len(), "Weekly EPOC aggregated");
        series
    }
}
