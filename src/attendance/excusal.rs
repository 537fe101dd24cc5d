use crate::model::attendance::AttendanceDay;

/// Whether each violation on a day has been excused by a reviewer.
///
/// Per-violation flags win whenever they are set, even to `false`. Only when a
/// flag is absent does the legacy `excused` flag apply, and then only to a
/// violation that actually occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvedExcusal {
    pub late: bool,
    pub early: bool,
}

impl ResolvedExcusal {
    pub fn resolve(day: &AttendanceDay) -> Self {
        Self {
            late: day.late_excused.unwrap_or(day.excused && day.late),
            early: day.early_excused.unwrap_or(day.excused && day.early_leave),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::DayStatus;
    use chrono::NaiveDate;

    fn day() -> AttendanceDay {
        AttendanceDay::new(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), DayStatus::Present)
    }

    #[test]
    fn explicit_false_beats_legacy_flag() {
        let mut d = day();
        d.late = true;
        d.excused = true;
        d.late_excused = Some(false);

        assert!(!ResolvedExcusal::resolve(&d).late);
    }

    #[test]
    fn legacy_flag_excuses_late_when_split_flag_absent() {
        let mut d = day();
        d.late = true;
        d.excused = true;

        let resolved = ResolvedExcusal::resolve(&d);
        assert!(resolved.late);
        // no early violation, so nothing to excuse there
        assert!(!resolved.early);
    }

    #[test]
    fn explicit_true_applies_without_legacy_flag() {
        let mut d = day();
        d.early_leave = true;
        d.early_excused = Some(true);

        assert_eq!(
            ResolvedExcusal::resolve(&d),
            ResolvedExcusal { late: false, early: true }
        );
    }

    #[test]
    fn nothing_excused_by_default() {
        let mut d = day();
        d.late = true;
        d.early_leave = true;

        assert_eq!(ResolvedExcusal::resolve(&d), ResolvedExcusal::default());
    }

    #[test]
    fn split_flags_are_independent() {
        let mut d = day();
        d.late = true;
        d.early_leave = true;
        d.excused = true;
        d.late_excused = Some(false);

        let resolved = ResolvedExcusal::resolve(&d);
        assert!(!resolved.late);
        assert!(resolved.early);
    }
}
