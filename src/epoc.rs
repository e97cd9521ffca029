//! EPOC (Excess Post-Exercise Oxygen Consumption) estimation
//!
//! Converts a stream of power and heart-rate samples into an accumulating,
//! decaying fatigue signal. Each sample is reduced to a relative intensity,
//! the larger of a power-based and a heart-rate-reserve-based fraction of
//! maximal effort, and fed through a single recurrence:
//!
//! - `I <= I0` (recovery): `dE = -k_down * E * dt`
//! - `I > I0` (accumulation): `dE = k_up / (1 + beta * E) * (I - I0)^n * dt`
//!
//! and `E` is clamped at zero after every step.
//!
//! Degenerate calibration (zero power at VO2max, zero heart-rate reserve)
//! disables the affected intensity term instead of failing. Nothing in this
//! module returns an error.

use serde::{Deserialize, Serialize};

/// Athlete calibration constants used to normalise samples into intensity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AthleteCalibration {
    /// Power output at VO2max in watts (0 disables the power term)
    pub p_vo2max: f64,

    /// Resting heart rate in bpm
    pub hr_rest: f64,

    /// Maximum heart rate in bpm
    pub hr_max: f64,
}

impl AthleteCalibration {
    pub fn new(p_vo2max: f64, hr_rest: f64, hr_max: f64) -> Self {
        Self {
            p_vo2max,
            hr_rest,
            hr_max,
        }
    }

    /// Heart-rate reserve (`hr_max - hr_rest`)
    pub fn heart_rate_reserve(&self) -> f64 {
        self.hr_max - self.hr_rest
    }
}

/// Model hyperparameters for the EPOC recurrence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpocParams {
    /// Decay rate in the recovery regime (default: 1.0)
    pub k_down: f64,

    /// Accumulation rate above threshold (default: 15.0)
    pub k_up: f64,

    /// Nonlinearity exponent applied to excess intensity (default: 2.0)
    pub n: f64,

    /// Saturation factor throttling growth at high EPOC (default: 0.05)
    pub beta: f64,

    /// Intensity threshold separating recovery from accumulation (default: 0.4)
    pub i0: f64,

    /// Time step in minutes per sample (default: 5 seconds)
    pub dt: f64,
}

impl Default for EpocParams {
    fn default() -> Self {
        Self {
            k_down: 1.0,
            k_up: 15.0,
            n: 2.0,
            beta: 0.05,
            i0: 0.4,
            dt: 5.0 / 60.0,
        }
    }
}

/// Relative intensity of a single sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intensity {
    /// Power as a fraction of power at VO2max
    pub power: f64,

    /// Fraction of heart-rate reserve in use
    pub heart_rate: f64,
}

impl Intensity {
    /// Combined intensity: whichever signal indicates the higher effort
    ///
    /// The power term wins unless the heart-rate term is strictly greater, so
    /// a NaN power term propagates and the step clamps EPOC to zero.
    pub fn combined(&self) -> f64 {
        if self.heart_rate > self.power {
            self.heart_rate
        } else {
            self.power
        }
    }
}

/// Compute the intensity terms for one sample pair
pub fn intensity(power: f64, hr: f64, calibration: &AthleteCalibration) -> Intensity {
    let power_intensity = if calibration.p_vo2max != 0.0 {
        power / calibration.p_vo2max
    } else {
        0.0
    };

    let reserve = calibration.heart_rate_reserve();
    let hr_intensity = if reserve != 0.0 {
        (hr - calibration.hr_rest) / reserve
    } else {
        0.0
    };

    Intensity {
        power: power_intensity,
        heart_rate: hr_intensity,
    }
}

/// Result of an EPOC estimation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpocEstimate {
    /// EPOC after the last processed sample (0.0 when none were processed)
    pub total: f64,

    /// EPOC after each processed sample, in input order
    pub series: Vec<f64>,
}

impl EpocEstimate {
    /// Peak EPOC reached during the run
    pub fn peak(&self) -> f64 {
        self.series.iter().copied().fold(0.0, f64::max)
    }

    /// Number of processed sample pairs
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Incremental EPOC state for callers feeding samples one at a time
#[derive(Debug, Clone)]
pub struct EpocEstimator {
    calibration: AthleteCalibration,
    params: EpocParams,
    epoc: f64,
}

impl EpocEstimator {
    /// Create an estimator starting from zero EPOC
    pub fn new(calibration: AthleteCalibration, params: EpocParams) -> Self {
        Self {
            calibration,
            params,
            epoc: 0.0,
        }
    }

    /// Current accumulated EPOC
    pub fn current(&self) -> f64 {
        self.epoc
    }

    pub fn calibration(&self) -> &AthleteCalibration {
        &self.calibration
    }

    pub fn params(&self) -> &EpocParams {
        &self.params
    }

    /// Discard accumulated state
    pub fn reset(&mut self) {
        self.epoc = 0.0;
    }

    /// Apply one recurrence step and return the updated EPOC
    pub fn step(&mut self, power: f64, hr: f64) -> f64 {
        let p = &self.params;
        let e = self.epoc;
        let i = intensity(power, hr, &self.calibration).combined();

        // Equality with the threshold belongs to the recovery regime
        let delta = if i <= p.i0 {
            -p.k_down * e * p.dt
        } else {
            (p.k_up / (1.0 + p.beta * e)) * (i - p.i0).powf(p.n) * p.dt
        };

        // NaN and negative results both land on zero
        let next = e + delta;
        self.epoc = if next > 0.0 { next } else { 0.0 };

        tracing::trace!(power, hr, intensity = i, delta, epoc = self.epoc, "EPOC step");

        self.epoc
    }
}

/// Lazy iterator yielding EPOC after each paired sample
///
/// Pairing stops as soon as either input is exhausted. Dropping the iterator
/// early is the way to cancel a long-running estimation.
#[derive(Debug, Clone)]
pub struct EpocSeries<P, H> {
    power: P,
    hr: H,
    estimator: EpocEstimator,
}

impl<P, H> EpocSeries<P, H>
where
    P: Iterator<Item = f64>,
    H: Iterator<Item = f64>,
{
    pub fn new<IP, IH>(
        power: IP,
        hr: IH,
        calibration: AthleteCalibration,
        params: EpocParams,
    ) -> Self
    where
        IP: IntoIterator<Item = f64, IntoIter = P>,
        IH: IntoIterator<Item = f64, IntoIter = H>,
    {
        Self {
            power: power.into_iter(),
            hr: hr.into_iter(),
            estimator: EpocEstimator::new(calibration, params),
        }
    }

    /// EPOC after the most recently yielded sample
    pub fn current(&self) -> f64 {
        self.estimator.current()
    }
}

impl<P, H> Iterator for EpocSeries<P, H>
where
    P: Iterator<Item = f64>,
    H: Iterator<Item = f64>,
{
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let power = self.power.next()?;
        let hr = self.hr.next()?;
        Some(self.estimator.step(power, hr))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (p_lo, p_hi) = self.power.size_hint();
        let (h_lo, h_hi) = self.hr.size_hint();
        let hi = match (p_hi, h_hi) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        (p_lo.min(h_lo), hi)
    }
}

/// Estimate EPOC over a whole workout
///
/// Returns the final EPOC and the trajectory. Inputs of unequal length are
/// truncated to the shorter one; empty input yields `(0.0, [])`.
pub fn estimate_epoc<IP, IH>(
    power: IP,
    hr: IH,
    calibration: &AthleteCalibration,
    params: &EpocParams,
) -> EpocEstimate
where
    IP: IntoIterator<Item = f64>,
    IH: IntoIterator<Item = f64>,
{
    let series: Vec<f64> = EpocSeries::new(power, hr, *calibration, *params).collect();
    let total = series.last().copied().unwrap_or(0.0);

    tracing::debug!(
        samples = series.len(),
        total,
        p_vo2max = calibration.p_vo2max,
        hr_rest = calibration.hr_rest,
        hr_max = calibration.hr_max,
        "EPOC estimated"
    );

    EpocEstimate { total, series }
}
