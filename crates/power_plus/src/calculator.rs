//! Power+ metric and grade bands.
//!
//! Power+ compares a player's swing efficiency (bat speed per foot of swing
//! length) against a fixed league-average efficiency, scaled so that 100 is
//! league average.

use common::Grade;

// ── League baseline ───────────────────────────────────────────────────

/// League-average bat speed (mph).
pub const LEAGUE_AVG_BAT_SPEED: f64 = 72.0;
/// League-average swing length (ft).
pub const LEAGUE_AVG_SWING_LENGTH: f64 = 7.3;
/// Baseline efficiency every player is normalised against.
pub const LEAGUE_AVG_EFFICIENCY: f64 = LEAGUE_AVG_BAT_SPEED / LEAGUE_AVG_SWING_LENGTH;

// ── Grade thresholds (inclusive lower bounds) ─────────────────────────

pub const ELITE_THRESHOLD: f64 = 110.0;
pub const ABOVE_AVERAGE_THRESHOLD: f64 = 105.0;
pub const AVERAGE_THRESHOLD: f64 = 95.0;
pub const BELOW_AVERAGE_THRESHOLD: f64 = 90.0;

// ── Main API ──────────────────────────────────────────────────────────

/// Compute Power+ and its grade.
///
/// Returns `(None, Grade::NotAvailable)` when either input is missing or
/// non-finite, or when the swing length is not positive.
pub fn compute(bat_speed: Option<f64>, swing_length: Option<f64>) -> (Option<f64>, Grade) {
    let power_plus = power_plus(bat_speed, swing_length);
    (power_plus, grade(power_plus))
}

/// Power+ rounded to one decimal place, if defined.
pub fn power_plus(bat_speed: Option<f64>, swing_length: Option<f64>) -> Option<f64> {
    let speed = bat_speed.filter(|v| v.is_finite())?;
    let length = swing_length.filter(|v| v.is_finite())?;
    if length <= 0.0 {
        return None;
    }

    let efficiency = speed / length;
    Some(round_to(efficiency / LEAGUE_AVG_EFFICIENCY * 100.0, 1))
}

/// Grade band for a Power+ value.
///
/// Bands are `[threshold, ∞)` checked from the highest threshold down.
pub fn grade(power_plus: Option<f64>) -> Grade {
    let Some(value) = power_plus else {
        return Grade::NotAvailable;
    };

    if value >= ELITE_THRESHOLD {
        Grade::Elite
    } else if value >= ABOVE_AVERAGE_THRESHOLD {
        Grade::AboveAverage
    } else if value >= AVERAGE_THRESHOLD {
        Grade::Average
    } else if value >= BELOW_AVERAGE_THRESHOLD {
        Grade::BelowAverage
    } else {
        Grade::Poor
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_league_average_swing_scores_100() {
        let (pp, g) = compute(Some(LEAGUE_AVG_BAT_SPEED), Some(LEAGUE_AVG_SWING_LENGTH));
        assert_eq!(pp, Some(100.0));
        assert_eq!(g, Grade::Average);
    }

    #[test]
    fn test_known_value_rounds_to_one_decimal() {
        // (75.1 / 7.6) / (72 / 7.3) * 100 = 100.19...
        let pp = power_plus(Some(75.1), Some(7.6)).unwrap();
        assert_eq!(pp, 100.2);
    }

    #[test]
    fn test_zero_length_is_undefined() {
        assert_eq!(compute(Some(74.0), Some(0.0)), (None, Grade::NotAvailable));
    }

    #[test]
    fn test_missing_or_nan_inputs_are_undefined() {
        assert_eq!(compute(None, Some(7.3)), (None, Grade::NotAvailable));
        assert_eq!(compute(Some(72.0), None), (None, Grade::NotAvailable));
        assert_eq!(compute(Some(f64::NAN), Some(7.3)), (None, Grade::NotAvailable));
        assert_eq!(compute(Some(72.0), Some(f64::NAN)), (None, Grade::NotAvailable));
        assert_eq!(compute(None, None), (None, Grade::NotAvailable));
    }

    #[test]
    fn test_negative_length_is_undefined() {
        assert_eq!(power_plus(Some(72.0), Some(-7.3)), None);
    }

    #[test]
    fn test_grade_boundaries() {
        let cases = [
            (110.0, Grade::Elite),
            (109.9, Grade::AboveAverage),
            (105.0, Grade::AboveAverage),
            (104.9, Grade::Average),
            (95.0, Grade::Average),
            (94.9, Grade::BelowAverage),
            (90.0, Grade::BelowAverage),
            (89.9, Grade::Poor),
        ];
        for (value, expected) in cases {
            assert_eq!(grade(Some(value)), expected, "power_plus={}", value);
        }
        assert_eq!(grade(None), Grade::NotAvailable);
    }

    proptest! {
        #[test]
        fn power_plus_has_one_decimal(speed in 40.0f64..100.0, length in 4.0f64..10.0) {
            let pp = power_plus(Some(speed), Some(length)).unwrap();
            prop_assert!(((pp * 10.0) - (pp * 10.0).round()).abs() < 1e-6);
            prop_assert_eq!(Some(pp), power_plus(Some(speed), Some(length)));
        }

        #[test]
        fn power_plus_never_decreases_with_speed(
            speed in 40.0f64..100.0,
            delta in 0.0f64..20.0,
            length in 4.0f64..10.0,
        ) {
            let slow = power_plus(Some(speed), Some(length)).unwrap();
            let fast = power_plus(Some(speed + delta), Some(length)).unwrap();
            prop_assert!(fast >= slow, "fast={} slow={}", fast, slow);
        }

        #[test]
        fn zero_length_never_grades(speed in proptest::option::of(0.0f64..120.0)) {
            prop_assert_eq!(compute(speed, Some(0.0)), (None, Grade::NotAvailable));
        }
    }
}
