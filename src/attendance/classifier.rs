use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

use crate::attendance::excusal::ResolvedExcusal;
use crate::attendance::gate::UpcomingGate;
use crate::model::attendance::{AttendanceDay, DayStatus, PunchState, YearMonth};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaveKind {
    Paid,
    Unpaid,
    Sick,
}

/// What a day means for attendance review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayClass {
    OnTime,
    LateOnly,
    EarlyOnly,
    LateAndEarly,
    ExcusedViolation,
    Holiday,
    Absent,
    Leave(LeaveKind),
    WorkFromHome,
    PartialPunch,
    LeaveWithoutInform,
    Unclassified,
    /// Not yet closed for attendance; never counted.
    Upcoming,
}

impl Serialize for DayClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Display severity of a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Info,
    Neutral,
}

impl DayClass {
    /// Stable identifier used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            DayClass::OnTime => "on-time",
            DayClass::LateOnly => "late",
            DayClass::EarlyOnly => "early",
            DayClass::LateAndEarly => "late-and-early",
            DayClass::ExcusedViolation => "excused",
            DayClass::Holiday => "holiday",
            DayClass::Absent => "absent",
            DayClass::Leave(LeaveKind::Paid) => "paid-leave",
            DayClass::Leave(LeaveKind::Unpaid) => "unpaid-leave",
            DayClass::Leave(LeaveKind::Sick) => "sick-leave",
            DayClass::WorkFromHome => "work-from-home",
            DayClass::PartialPunch => "partial-punch",
            DayClass::LeaveWithoutInform => "leave-without-inform",
            DayClass::Unclassified => "unclassified",
            DayClass::Upcoming => "upcoming",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            DayClass::OnTime => Tone::Success,
            DayClass::LateOnly | DayClass::EarlyOnly => Tone::Warning,
            DayClass::LateAndEarly
            | DayClass::PartialPunch
            | DayClass::Absent
            | DayClass::LeaveWithoutInform => Tone::Danger,
            DayClass::Leave(LeaveKind::Unpaid) => Tone::Warning,
            DayClass::ExcusedViolation
            | DayClass::Holiday
            | DayClass::Leave(_)
            | DayClass::WorkFromHome => Tone::Info,
            DayClass::Unclassified | DayClass::Upcoming => Tone::Neutral,
        }
    }

    pub fn has_late_violation(&self) -> bool {
        matches!(self, DayClass::LateOnly | DayClass::LateAndEarly)
    }

    pub fn has_early_violation(&self) -> bool {
        matches!(self, DayClass::EarlyOnly | DayClass::LateAndEarly)
    }
}

/// Classifies one day. First matching rule wins: absence/leave signals when
/// there are no punches, then punch completeness, then violation severity.
pub fn classify(day: &AttendanceDay) -> DayClass {
    match day.punch_state() {
        PunchState::Missing => classify_without_punches(day.status),
        PunchState::Partial => {
            if ResolvedExcusal::resolve(day).early {
                DayClass::ExcusedViolation
            } else {
                DayClass::PartialPunch
            }
        }
        PunchState::Complete => {
            let excusal = ResolvedExcusal::resolve(day);
            let late = day.late && !excusal.late;
            let early = day.early_leave && !excusal.early;

            match (late, early) {
                (false, false) => DayClass::OnTime,
                (true, true) => DayClass::LateAndEarly,
                (true, false) => DayClass::LateOnly,
                (false, true) => DayClass::EarlyOnly,
            }
        }
    }
}

fn classify_without_punches(status: DayStatus) -> DayClass {
    match status {
        DayStatus::WorkFromHome => DayClass::WorkFromHome,
        DayStatus::Holiday => DayClass::Holiday,
        DayStatus::PaidLeave => DayClass::Leave(LeaveKind::Paid),
        DayStatus::UnpaidLeave => DayClass::Leave(LeaveKind::Unpaid),
        DayStatus::SickLeave => DayClass::Leave(LeaveKind::Sick),
        DayStatus::Absent => DayClass::Absent,
        DayStatus::LeaveWithoutInform => DayClass::LeaveWithoutInform,
        DayStatus::Present | DayStatus::HalfDay | DayStatus::NewInduction => {
            DayClass::Unclassified
        }
    }
}

/// Like [`classify`], but reports [`DayClass::Upcoming`] for days the gate
/// still considers open.
pub fn classify_at(
    day: &AttendanceDay,
    month: YearMonth,
    now: NaiveDateTime,
    gate: &UpcomingGate,
) -> DayClass {
    if gate.is_upcoming(day.date, month, now) {
        DayClass::Upcoming
    } else {
        classify(day)
    }
}
