use chrono::{NaiveDate, NaiveDateTime};
use hrm_attendance::attendance::aggregator::complete_month;
use hrm_attendance::attendance::{
    DayClass, MonthlyAggregator, RateBasis, UpcomingGate, ViolationRules, classify,
};
use hrm_attendance::model::attendance::{AttendanceDay, YearMonth};
use hrm_attendance::model::employee::Employee;
use serde_json::json;

fn employee() -> Employee {
    Employee {
        emp_code: "EMP-042".to_string(),
        name: "Arif Hossain".to_string(),
        department: Some("Operations".to_string()),
        designation: Some("Coordinator".to_string()),
        shift: Some("GEN".to_string()),
        monthly_salary: 31_000.0,
        status: "active".to_string(),
    }
}

fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").unwrap()
}

/// First ten days of March 2026 as the attendance store returns them.
fn recorded_days() -> Vec<AttendanceDay> {
    serde_json::from_value(json!([
        { "date": "2026-03-01", "status": "Holiday" },
        { "date": "2026-03-02", "status": "Present", "checkIn": "09:10", "checkOut": "18:00",
          "late": true, "earlyLeave": false, "lateExcused": false, "excused": true },
        { "date": "2026-03-03", "status": "Present", "checkIn": null, "checkOut": "18:00",
          "earlyLeave": true, "excused": true },
        { "date": "2026-03-04", "status": "Present", "checkIn": "09:20", "checkOut": "17:00",
          "late": true, "earlyLeave": true },
        { "date": "2026-03-05", "status": "Present", "checkIn": "09:30", "checkOut": "17:30",
          "late": true, "lateExcused": true, "earlyLeave": true, "earlyExcused": false },
        { "date": "2026-03-06", "status": "Paid Leave" },
        { "date": "2026-03-07", "status": "Holiday" },
        { "date": "2026-03-08", "status": "Holiday" },
        { "date": "2026-03-10", "status": "Present", "checkIn": "08:50", "checkOut": "18:00" }
    ]))
    .unwrap()
}

fn aggregator() -> MonthlyAggregator<ViolationRules> {
    MonthlyAggregator::new(UpcomingGate::default(), ViolationRules::default())
}

#[test]
fn month_in_progress_before_cutoff() {
    let month: YearMonth = "2026-03".parse().unwrap();
    let days = complete_month(month, recorded_days());

    let record = aggregator().aggregate(&employee(), month, days, at("2026-03-10 08:30"));

    let classes: Vec<DayClass> = record.days.iter().map(|d| d.classification).collect();
    assert_eq!(
        &classes[..10],
        &[
            DayClass::Holiday,
            DayClass::LateOnly,
            DayClass::ExcusedViolation,
            DayClass::LateAndEarly,
            DayClass::EarlyOnly,
            DayClass::Leave(hrm_attendance::attendance::LeaveKind::Paid),
            DayClass::Holiday,
            DayClass::Holiday,
            DayClass::Absent,
            DayClass::Upcoming,
        ]
    );
    assert!(record.days[10..].iter().all(|d| d.upcoming));
    assert_eq!(record.days.len(), 31);

    assert_eq!(record.late_count, 2);
    assert_eq!(record.early_count, 2);
    // 0.25 late + 0.5 late-and-early + 0.25 early + 1 absent
    assert_eq!(record.salary_deduct_days, 2.0);
    assert_eq!(record.salary_deduct_amount, 2_000.0);
    assert_eq!(record.net_salary, 29_000.0);
}

#[test]
fn today_counts_once_cutoff_has_passed() {
    let month: YearMonth = "2026-03".parse().unwrap();
    let days = complete_month(month, recorded_days());

    let record = aggregator().aggregate(&employee(), month, days, at("2026-03-10 08:55"));

    let today = &record.days[9];
    assert!(!today.upcoming);
    assert_eq!(today.classification, DayClass::OnTime);
    assert_eq!(record.late_count, 2);
    assert_eq!(record.salary_deduct_days, 2.0);
}

#[test]
fn late_count_matches_classified_late_days() {
    let month: YearMonth = "2026-03".parse().unwrap();
    let now = at("2026-04-02 12:00");
    let record = aggregator().aggregate(
        &employee(),
        month,
        complete_month(month, recorded_days()),
        now,
    );

    let late_days = record
        .days
        .iter()
        .filter(|d| !d.upcoming && classify(&d.day).has_late_violation())
        .count() as u32;

    assert_eq!(record.late_count, late_days);
    // Past month: every unrecorded date after the 10th is absent
    assert_eq!(
        record
            .days
            .iter()
            .filter(|d| d.classification == DayClass::Absent)
            .count(),
        22
    );
}

#[test]
fn fixed_rate_basis_changes_amount_only() {
    let month: YearMonth = "2026-03".parse().unwrap();
    let rules = ViolationRules {
        rate_basis: RateBasis::FixedDays(31_000.0 / 1_500.0),
        ..ViolationRules::default()
    };
    let aggregator = MonthlyAggregator::new(UpcomingGate::default(), rules);

    let record = aggregator.aggregate(
        &employee(),
        month,
        complete_month(month, recorded_days()),
        at("2026-03-10 08:30"),
    );

    assert_eq!(record.salary_deduct_days, 2.0);
    assert_eq!(record.salary_deduct_amount, 3_000.0);
    assert_eq!(record.net_salary, 28_000.0);
}

#[test]
fn future_month_is_entirely_upcoming() {
    let month: YearMonth = "2026-04".parse().unwrap();
    let record = aggregator().aggregate(
        &employee(),
        month,
        complete_month(month, Vec::new()),
        at("2026-03-31 23:59"),
    );

    assert!(record.days.iter().all(|d| d.classification == DayClass::Upcoming));
    assert_eq!(record.salary_deduct_days, 0.0);
    assert_eq!(record.net_salary, 31_000.0);
}

#[test]
fn record_serializes_with_wire_names() {
    let month: YearMonth = "2026-03".parse().unwrap();
    let record = aggregator().aggregate(
        &employee(),
        month,
        complete_month(month, recorded_days()),
        at("2026-03-10 08:30"),
    );

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["empCode"], "EMP-042");
    assert_eq!(value["lateCount"], 2);
    assert_eq!(value["netSalary"], 29_000.0);

    let second = &value["days"][1];
    assert_eq!(second["date"], "2026-03-02");
    assert_eq!(second["checkIn"], "09:10");
    assert_eq!(second["classification"], "late");
    assert_eq!(second["tone"], "warning");
    assert_eq!(second["statusShortCode"], "P");

    assert_eq!(value["days"][8]["status"], "Absent");
    assert_eq!(value["days"][8]["reason"], "No attendance record");
    assert!(value["days"][1].get("reason").is_none());

    assert_eq!(value["days"][5]["status"], "Paid Leave");
    assert_eq!(value["days"][5]["statusShortCode"], "PL");
}

#[test]
fn complete_month_starts_on_the_first() {
    let month: YearMonth = "2026-02".parse().unwrap();
    let days = complete_month(month, recorded_days());

    assert_eq!(days.len(), 28);
    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
}
