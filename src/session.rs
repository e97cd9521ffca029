//! Session-level EPOC
//!
//! Applies the EPOC estimator to recorded workout sessions. Sessions without
//! both a power and a heart-rate series are skipped rather than treated as
//! errors.

use crate::epoc::{estimate_epoc, AthleteCalibration, EpocParams};
use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Resting heart rate assumed when the athlete has not set one
pub const DEFAULT_RESTING_HR: f64 = 60.0;

/// Maximum heart rate assumed when the athlete has not set one
pub const DEFAULT_MAX_HR: f64 = 190.0;

/// A recorded workout with optional sample streams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: String,

    /// Date the session took place
    pub date: NaiveDate,

    /// Power samples in watts
    #[serde(default)]
    pub power_data: Option<Vec<f64>>,

    /// Heart-rate samples in bpm
    #[serde(default)]
    pub heart_rate_data: Option<Vec<f64>>,
}

impl WorkoutSession {
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
            power_data: None,
            heart_rate_data: None,
        }
    }

    pub fn with_samples(mut self, power: Vec<f64>, heart_rate: Vec<f64>) -> Self {
        self.power_data = Some(power);
        self.heart_rate_data = Some(heart_rate);
        self
    }

    /// Highest power sample, if any
    pub fn peak_power(&self) -> Option<f64> {
        self.power_data
            .as_ref()
            .and_then(|p| p.iter().copied().reduce(f64::max))
    }

    fn samples(&self) -> Option<(&[f64], &[f64])> {
        let power = self.power_data.as_deref().filter(|p| !p.is_empty())?;
        let hr = self.heart_rate_data.as_deref().filter(|h| !h.is_empty())?;
        Some((power, hr))
    }
}

/// Athlete settings relevant to EPOC estimation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AthleteSettings {
    /// Resting heart rate in bpm
    pub resting_heart_rate: Option<f64>,

    /// Maximum heart rate in bpm
    pub max_heart_rate: Option<f64>,

    /// Power at VO2max in watts; session peak power is used when unset
    pub p_vo2max: Option<f64>,
}

impl AthleteSettings {
    /// Build a calibration, falling back to `peak_power` for power at VO2max
    pub fn calibration_for(&self, peak_power: f64) -> AthleteCalibration {
        AthleteCalibration::new(
            self.p_vo2max.unwrap_or(peak_power),
            self.resting_heart_rate.unwrap_or(DEFAULT_RESTING_HR),
            self.max_heart_rate.unwrap_or(DEFAULT_MAX_HR),
        )
    }
}

/// EPOC result for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEpoc {
    pub session_id: String,
    pub date: NaiveDate,

    /// Final EPOC of the session
    pub total: f64,

    /// Per-sample EPOC trajectory
    pub series: Vec<f64>,

    /// Total rounded to one decimal place (ml/kg display value)
    pub rounded_total: Decimal,
}

/// Round an EPOC value to one decimal place
///
/// Rounds the exact binary value of `value`, so 1.45 (stored as 1.4499...)
/// rounds down to 1.4.
pub fn round_epoc(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Estimate EPOC for a single session
///
/// Returns `None` when the session lacks power or heart-rate samples.
pub fn session_epoc(
    session: &WorkoutSession,
    settings: &AthleteSettings,
    params: &EpocParams,
) -> Option<SessionEpoc> {
    let Some((power, hr)) = session.samples() else {
        tracing::debug!(session = %session.id, "Skipping session without power and heart-rate data");
        return None;
    };

    let peak = session.peak_power().unwrap_or(0.0);
    let calibration = settings.calibration_for(peak);
    let estimate = estimate_epoc(power.iter().copied(), hr.iter().copied(), &calibration, params);

    Some(SessionEpoc {
        session_id: session.id.clone(),
        date: session.date,
        total: estimate.total,
        rounded_total: round_epoc(estimate.total),
        series: estimate.series,
    })
}

/// Estimate EPOC for many sessions in parallel
///
/// Sessions are independent, so each is estimated on its own worker. Output
/// keeps input order and omits sessions without usable data.
pub fn estimate_sessions_parallel(
    sessions: &[WorkoutSession],
    settings: &AthleteSettings,
    params: &EpocParams,
) -> Vec<SessionEpoc> {
    let results: Vec<SessionEpoc> = sessions
        .par_iter()
        .filter_map(|session| session_epoc(session, settings, params))
        .collect();

    tracing::info!(
        sessions = sessions.len(),
        estimated = results.len(),
        "Session EPOC batch complete"
    );

    results
}
