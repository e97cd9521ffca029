// Library interface for epocrs modules
// This allows integration tests and benchmarks to access the core functionality

pub mod config;
pub mod epoc;
pub mod error;
pub mod logging;
pub mod session;
pub mod weekly;

// Re-export commonly used types for convenience
pub use config::EpocConfig;
pub use epoc::{
    estimate_epoc, intensity, AthleteCalibration, EpocEstimate, EpocEstimator, EpocParams,
    EpocSeries, Intensity,
};
pub use error::{EpocRsError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use session::{
    estimate_sessions_parallel, session_epoc, AthleteSettings, SessionEpoc, WorkoutSession,
};
pub use weekly::{WeeklyEpoc, WeeklyEpocCalculator};
