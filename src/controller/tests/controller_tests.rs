use super::*;
use crate::model::{AttendanceForm, AttendanceRecord, AttendanceStatus, Employee, EmployeeForm};
use crate::store::{InMemoryStore, StoreErrorKind};
use chrono::NaiveDate;
use std::sync::Arc;

fn employee(id: &str, name: &str) -> Employee {
    Employee {
        employee_id: id.into(),
        full_name: name.into(),
        email: format!("{}@corp.io", id.to_lowercase()),
        department: "Ops".into(),
    }
}

fn record(id: &str, date: &str, status: AttendanceStatus) -> AttendanceRecord {
    AttendanceRecord {
        employee_id: id.into(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("date"),
        status,
    }
}

fn seeded() -> Arc<InMemoryStore> {
    Arc::new(
        InMemoryStore::with_employees([employee("E1", "Ann"), employee("E2", "Bob")]).with_attendance([
            record("E1", "2024-01-05", AttendanceStatus::Present),
            record("E1", "2024-01-09", AttendanceStatus::Absent),
            record("E1", "2024-02-02", AttendanceStatus::Present),
            record("E2", "2024-02-03", AttendanceStatus::Absent),
        ]),
    )
}

fn ids(employees: &[&Employee]) -> Vec<String> {
    employees.iter().map(|e| e.employee_id.clone()).collect()
}

#[actix_web::test]
async fn roster_loads_newest_first_and_filters_by_search() {
    let store = seeded();
    let mut roster = RosterController::new(store.clone());

    roster.load().await.expect("load");
    assert_eq!(ids(&roster.visible()), ["E2", "E1"]);

    roster.set_search("an");
    assert_eq!(ids(&roster.visible()), ["E1"]);

    roster.set_search("");
    assert_eq!(roster.visible().len(), 2);
}

#[actix_web::test]
async fn failed_roster_load_is_not_an_empty_roster() {
    let store = Arc::new(InMemoryStore::new());
    let mut roster = RosterController::new(store.clone());

    roster.load().await.expect("empty load");
    assert!(matches!(roster.state(), LoadState::Ready(list) if list.is_empty()));

    store.set_failure(Some(StoreError::transport("connection refused")));
    let err = roster.load().await.expect_err("down");
    assert_eq!(err.kind, StoreErrorKind::Transport);
    assert!(roster.state().error().is_some());
    assert!(roster.state().ready().is_none());
}

#[actix_web::test]
async fn duplicate_employee_leaves_roster_unchanged() {
    let store = seeded();
    let mut roster = RosterController::new(store.clone());
    roster.load().await.expect("load");

    let form = EmployeeForm {
        employee_id: "E1".into(),
        full_name: "Another Ann".into(),
        email: "ann2@corp.io".into(),
        department: "Ops".into(),
    };
    let err = roster.add(&form).await.expect_err("conflict");

    assert!(matches!(err, SubmitError::Store(ref e) if e.kind == StoreErrorKind::Conflict));
    assert_eq!(store.employee_ids(), ["E2", "E1"]);
    assert_eq!(ids(&roster.visible()), ["E2", "E1"]);
    assert_eq!(roster.visible()[1].full_name, "Ann");
}

#[actix_web::test]
async fn invalid_employee_form_never_reaches_the_store() {
    let store = seeded();
    let mut roster = RosterController::new(store.clone());

    let form = EmployeeForm {
        employee_id: "E9".into(),
        full_name: "Nine".into(),
        email: "nine-at-corp".into(),
        department: String::new(),
    };
    let err = roster.add(&form).await.expect_err("invalid");

    let SubmitError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.get("email"), Some("Invalid email"));
    assert_eq!(errors.get("department"), Some("Required"));
    assert_eq!(roster.form_errors(), &errors);
    assert_eq!(store.calls(), 0);
}

#[actix_web::test]
async fn add_and_delete_refresh_the_roster() {
    let store = seeded();
    let mut roster = RosterController::new(store.clone());

    let form = EmployeeForm {
        employee_id: "E3".into(),
        full_name: "Cy".into(),
        email: "cy@corp.io".into(),
        department: "Eng".into(),
    };
    let created = roster.add_and_reload(&form).await.expect("add");
    assert_eq!(created.employee_id, "E3");
    assert!(roster.form_errors().is_empty());
    assert_eq!(ids(&roster.visible()), ["E3", "E2", "E1"]);

    roster.delete_and_reload("E2").await.expect("delete");
    assert_eq!(ids(&roster.visible()), ["E3", "E1"]);

    let err = roster.delete_and_reload("E2").await.expect_err("already gone");
    assert_eq!(err.kind, StoreErrorKind::NotFound);
}

#[actix_web::test]
async fn plain_add_and_delete_issue_one_store_call_each() {
    let store = seeded();
    let mut roster = RosterController::new(store.clone());

    let form = EmployeeForm {
        employee_id: "E3".into(),
        full_name: "Cy".into(),
        email: "cy@corp.io".into(),
        department: "Eng".into(),
    };
    roster.add(&form).await.expect("add");
    assert_eq!(store.calls(), 1);
    assert!(matches!(roster.state(), LoadState::Idle));

    roster.delete("E3").await.expect("delete");
    assert_eq!(store.calls(), 2);
    assert_eq!(store.employee_ids(), ["E2", "E1"]);
}

#[actix_web::test]
async fn stale_roster_result_is_dropped() {
    let store = seeded();
    let mut roster = RosterController::new(store);

    let first = roster.begin_load();
    let second = roster.begin_load();

    assert!(!roster.finish_load(first, Ok(vec![employee("OLD", "Stale")])));
    assert!(roster.state().is_loading());

    assert!(roster.finish_load(second, Ok(vec![employee("E1", "Ann")])));
    assert_eq!(ids(&roster.visible()), ["E1"]);
}

#[actix_web::test]
async fn attendance_form_without_employee_makes_no_store_call() {
    let store = seeded();
    let mut screen = AttendanceController::new(store.clone());

    let form = AttendanceForm {
        employee_id: String::new(),
        date: "2024-03-01".into(),
        status: "Present".into(),
    };
    let err = screen.submit(&form).await.expect_err("no employee");

    let SubmitError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.get("employee_id"), Some("Select an employee"));
    assert_eq!(store.calls(), 0);
}

#[actix_web::test]
async fn submitting_for_selected_employee_refreshes_history() {
    let store = seeded();
    let mut screen = AttendanceController::new(store.clone());
    screen.load_roster().await.expect("roster");
    screen.select_employee("E1").await.expect("select");
    assert_eq!(screen.visible_records().len(), 3);

    let form = AttendanceForm {
        employee_id: "E1".into(),
        date: "2024-03-01".into(),
        status: "Absent".into(),
    };
    screen.submit(&form).await.expect("submit");

    let dates: Vec<_> = screen.visible_records().iter().map(|r| r.iso_date()).collect();
    assert_eq!(dates, ["2024-03-01", "2024-02-02", "2024-01-09", "2024-01-05"]);
    assert_eq!(screen.totals().absent, 2);
}

#[actix_web::test]
async fn duplicate_attendance_is_appended() {
    let store = seeded();
    let mut screen = AttendanceController::new(store.clone());
    screen.select_employee("E2").await.expect("select");

    let form = AttendanceForm {
        employee_id: "E2".into(),
        date: "2024-02-03".into(),
        status: "Present".into(),
    };
    screen.submit(&form).await.expect("submit");

    assert_eq!(screen.visible_records().len(), 2);
    let totals = screen.totals();
    assert_eq!((totals.present, totals.absent), (1, 1));
}

#[actix_web::test]
async fn date_query_filters_rows_but_not_totals() {
    let store = seeded();
    let mut screen = AttendanceController::new(store);
    screen.select_employee("E1").await.expect("select");

    screen.set_date_query("2024-01");
    assert_eq!(screen.visible_records().len(), 2);

    let totals = screen.totals();
    assert_eq!((totals.present, totals.absent), (2, 1));
}

#[actix_web::test]
async fn switching_selection_discards_the_earlier_fetch() {
    let store = seeded();
    let mut screen = AttendanceController::new(store);

    let for_ann = screen.select("E1");
    let for_bob = screen.select("E2");

    let late = vec![record("E1", "2024-01-05", AttendanceStatus::Present)];
    assert!(!screen.finish_records(for_ann, Ok(late)));
    assert!(screen.records().is_loading());

    let fresh = vec![record("E2", "2024-02-03", AttendanceStatus::Absent)];
    assert!(screen.finish_records(for_bob, Ok(fresh)));
    assert_eq!(screen.selected(), Some("E2"));
    assert_eq!(screen.visible_records()[0].employee_id, "E2");

    screen.clear_selection();
    assert!(screen.selected().is_none());
    assert!(screen.visible_records().is_empty());
}

#[actix_web::test]
async fn failed_history_fetch_is_an_error_state() {
    let store = seeded();
    store.fail_attendance_for("E1");
    let mut screen = AttendanceController::new(store);

    let err = screen.select_employee("E1").await.expect_err("unavailable");
    assert_eq!(err.kind, StoreErrorKind::Transport);
    assert!(screen.records().error().is_some());
    assert_eq!(screen.totals().total(), 0);
}

#[actix_web::test]
async fn dashboard_overview_skips_unreachable_employees() {
    let store = seeded();
    store.fail_attendance_for("E2");
    let mut dashboard = DashboardController::new(store);

    dashboard.load().await.expect("load");
    let cards = dashboard.overview().ready().copied().expect("overview");

    assert_eq!(cards.total_employees, 2);
    assert_eq!(cards.total_records, 3);
    assert_eq!(cards.present, 2);
    assert_eq!(cards.absent, 1);
    assert_eq!(cards.attendance_rate, 67);
}

#[actix_web::test]
async fn dashboard_fails_when_roster_is_unavailable() {
    let store = seeded();
    store.set_failure(Some(StoreError::new(StoreErrorKind::Unauthorized, "bad key")));
    let mut dashboard = DashboardController::new(store);

    let err = dashboard.load().await.expect_err("unauthorized");
    assert_eq!(err.kind, StoreErrorKind::Unauthorized);
    assert!(dashboard.overview().error().is_some());
    assert!(dashboard.employees().error().is_some());
}

#[actix_web::test]
async fn dashboard_drill_down_summarises_selected_employee() {
    let store = seeded();
    let mut dashboard = DashboardController::new(store);
    dashboard.load_roster().await.expect("roster");

    dashboard.set_search("BOB");
    assert_eq!(ids(&dashboard.filtered_employees()), ["E2"]);

    assert!(!dashboard.select_employee("E404").await.expect("lookup"));
    assert!(dashboard.selected().is_none());

    assert!(dashboard.select_employee("E1").await.expect("select"));
    assert_eq!(dashboard.selected().map(|e| e.full_name.as_str()), Some("Ann"));

    let summary = dashboard.summary().expect("summary");
    assert_eq!((summary.totals.present, summary.totals.absent), (2, 1));
    let months: Vec<_> = summary
        .monthly
        .iter()
        .map(|b| (b.month.as_str(), b.present, b.absent))
        .collect();
    assert_eq!(months, [("2024-01", 1, 1), ("2024-02", 1, 0)]);

    dashboard.set_date_query("02-02");
    assert_eq!(dashboard.visible_records().len(), 1);
    assert_eq!(dashboard.summary().expect("summary").totals.total(), 3);
}
