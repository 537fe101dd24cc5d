use chrono::NaiveTime;

use crate::model::shift::Shift;

/// Violation flags derived from punches against a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PunchFlags {
    pub late: bool,
    pub early_leave: bool,
}

/// Derives `late` / `early_leave` for a day.
///
/// A check-in strictly after start + grace is late. A check-out before the
/// shift end is an early leave, and so is any partial punch (exactly one of
/// the two present), shift or not. Without a check-in nothing counts as late.
pub fn evaluate_punches(
    shift: Option<&Shift>,
    check_in: Option<NaiveTime>,
    check_out: Option<NaiveTime>,
) -> PunchFlags {
    let late = match (shift, check_in) {
        (Some(shift), Some(check_in)) => check_in > shift.late_after(),
        _ => false,
    };

    let early_leave = match (check_in, check_out) {
        (Some(_), Some(check_out)) => shift.is_some_and(|shift| check_out < shift.end_time),
        (None, None) => false,
        _ => true,
    };

    PunchFlags { late, early_leave }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::classifier::{DayClass, classify};
    use crate::model::attendance::{AttendanceDay, DayStatus};
    use chrono::NaiveDate;

    fn t(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    fn general() -> Shift {
        Shift {
            code: "GEN".to_string(),
            name: "General".to_string(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            grace_minutes: 15,
        }
    }

    #[test]
    fn grace_period_is_inclusive() {
        let shift = general();
        assert!(!evaluate_punches(Some(&shift), t(9, 15), t(18, 0)).late);
        assert!(evaluate_punches(Some(&shift), t(9, 16), t(18, 0)).late);
    }

    #[test]
    fn leaving_before_end_is_early() {
        let shift = general();
        let flags = evaluate_punches(Some(&shift), t(9, 0), t(17, 59));
        assert_eq!(flags, PunchFlags { late: false, early_leave: true });
        assert!(!evaluate_punches(Some(&shift), t(9, 0), t(18, 0)).early_leave);
    }

    #[test]
    fn missing_check_out_is_early_leave() {
        let flags = evaluate_punches(Some(&general()), t(9, 30), None);
        assert_eq!(flags, PunchFlags { late: true, early_leave: true });
    }

    #[test]
    fn missing_check_in_is_never_late() {
        let flags = evaluate_punches(Some(&general()), None, t(18, 0));
        assert_eq!(flags, PunchFlags { late: false, early_leave: true });
    }

    #[test]
    fn no_shift_only_flags_partial_punches() {
        assert_eq!(evaluate_punches(None, t(11, 0), t(12, 0)), PunchFlags::default());
        assert!(evaluate_punches(None, t(11, 0), None).early_leave);
        assert!(evaluate_punches(None, None, t(12, 0)).early_leave);
        assert_eq!(evaluate_punches(None, None, None), PunchFlags::default());
    }

    #[test]
    fn legacy_excusal_covers_missing_check_in() {
        let flags = evaluate_punches(Some(&general()), None, t(18, 0));
        let day = AttendanceDay {
            late: flags.late,
            early_leave: flags.early_leave,
            excused: true,
            ..AttendanceDay::new(
                NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
                DayStatus::Present,
            )
        }
        .with_punches(None, t(18, 0));

        assert_eq!(classify(&day), DayClass::ExcusedViolation);

        let unexcused = AttendanceDay { excused: false, ..day };
        assert_eq!(classify(&unexcused), DayClass::PartialPunch);
    }
}
