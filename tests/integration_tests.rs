use chrono::NaiveDate;
use epocrs::{
    estimate_epoc, estimate_sessions_parallel, AthleteCalibration, AthleteSettings, EpocConfig,
    EpocParams, WeeklyEpocCalculator, WorkoutSession,
};
use proptest::prelude::*;
use rust_decimal_macros::dec;

/// Integration tests that exercise the public API end to end

const DEMO_POWER: [f64; 7] = [100.0, 150.0, 200.0, 250.0, 300.0, 150.0, 100.0];
const DEMO_HR: [f64; 7] = [120.0, 130.0, 140.0, 160.0, 170.0, 150.0, 120.0];

fn demo_calibration() -> AthleteCalibration {
    AthleteCalibration::new(300.0, 60.0, 180.0)
}

fn session(id: &str, date: NaiveDate) -> WorkoutSession {
    WorkoutSession::new(id, date).with_samples(DEMO_POWER.to_vec(), DEMO_HR.to_vec())
}

#[test]
fn test_empty_workout() {
    let result = estimate_epoc(
        std::iter::empty(),
        std::iter::empty(),
        &demo_calibration(),
        &EpocParams::default(),
    );
    assert_eq!(result.total, 0.0);
    assert!(result.series.is_empty());
}

#[test]
fn test_demo_workout_total() {
    let result = estimate_epoc(DEMO_POWER, DEMO_HR, &demo_calibration(), &EpocParams::default());
    assert_eq!(format!("{:.2}", result.total), "0.98");
    assert_eq!(result.total, *result.series.last().unwrap());
}

#[test]
fn test_repeated_calls_are_bit_identical() {
    let first = estimate_epoc(DEMO_POWER, DEMO_HR, &demo_calibration(), &EpocParams::default());
    let second = estimate_epoc(DEMO_POWER, DEMO_HR, &demo_calibration(), &EpocParams::default());

    assert_eq!(first.total.to_bits(), second.total.to_bits());
    assert!(first
        .series
        .iter()
        .zip(&second.series)
        .all(|(a, b)| a.to_bits() == b.to_bits()));
}

#[test]
fn test_recovery_after_effort_decays() {
    let mut power = vec![300.0; 24];
    power.extend(vec![0.0; 120]);
    let hr = vec![60.0; power.len()];

    let result = estimate_epoc(power, hr, &demo_calibration(), &EpocParams::default());
    let peak_index = 23;
    let recovery = &result.series[peak_index..];

    assert!(recovery.windows(2).all(|w| w[1] <= w[0]));
    assert!(result.total < result.series[peak_index] * 0.01);
}

#[test]
fn test_sessions_to_weekly_load() {
    let settings = AthleteSettings {
        resting_heart_rate: Some(60.0),
        max_heart_rate: Some(180.0),
        p_vo2max: None,
    };
    let sessions = vec![
        session("mon", NaiveDate::from_ymd_opt(2024, 9, 23).unwrap()),
        session("thu", NaiveDate::from_ymd_opt(2024, 9, 26).unwrap()),
        WorkoutSession::new("no-data", NaiveDate::from_ymd_opt(2024, 9, 27).unwrap()),
        session("next", NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()),
    ];

    let epocs = estimate_sessions_parallel(&sessions, &settings, &EpocParams::default());
    assert_eq!(epocs.len(), 3);

    let weekly = WeeklyEpocCalculator::new().weekly_series(&epocs);
    assert_eq!(weekly.len(), 2);
    assert_eq!(weekly[0].week_start, NaiveDate::from_ymd_opt(2024, 9, 22).unwrap());
    assert_eq!(weekly[0].session_count, 2);
    // 2 x 0.9769 = 1.9538
    assert_eq!(weekly[0].total_epoc, dec!(2.0));
    assert_eq!(weekly[1].session_count, 1);
    assert_eq!(weekly[1].total_epoc, dec!(1.0));
}

#[test]
fn test_config_drives_model() {
    let config: EpocConfig = toml::from_str(
        r#"
        [model]
        i0 = 0.9
        "#,
    )
    .unwrap();

    // Only the 300 W sample (I = 1.0) exceeds the raised threshold
    let result = estimate_epoc(DEMO_POWER, DEMO_HR, &demo_calibration(), &config.model);
    assert!(result.series[..4].iter().all(|&e| e == 0.0));
    assert!(result.series[4] > 0.0);
}

proptest! {
    #[test]
    fn prop_trajectory_is_non_negative(
        samples in prop::collection::vec((0.0f64..600.0, 40.0f64..210.0), 0..200),
        p_vo2max in 0.0f64..500.0,
        hr_rest in 40.0f64..80.0,
        hr_max in 150.0f64..210.0,
    ) {
        let (power, hr): (Vec<f64>, Vec<f64>) = samples.into_iter().unzip();
        let calibration = AthleteCalibration::new(p_vo2max, hr_rest, hr_max);
        let result = estimate_epoc(power, hr, &calibration, &EpocParams::default());

        prop_assert!(result.series.iter().all(|&e| e >= 0.0));
        prop_assert!(result.total >= 0.0);
    }

    #[test]
    fn prop_length_is_shorter_input(
        power in prop::collection::vec(-100.0f64..600.0, 0..100),
        hr in prop::collection::vec(0.0f64..300.0, 0..100),
    ) {
        let expected = power.len().min(hr.len());
        let result = estimate_epoc(power, hr, &demo_calibration(), &EpocParams::default());

        prop_assert_eq!(result.series.len(), expected);
        prop_assert_eq!(result.total, result.series.last().copied().unwrap_or(0.0));
    }

    #[test]
    fn prop_low_intensity_never_accumulates(
        len in 0usize..100,
        power in 0.0f64..120.0,
    ) {
        // Power at most 40% of 300 W and resting heart rate: I <= I0
        let result = estimate_epoc(
            vec![power; len],
            vec![60.0; len],
            &demo_calibration(),
            &EpocParams::default(),
        );
        prop_assert!(result.series.iter().all(|&e| e == 0.0));
    }
}
