//! Pure aggregation over fetched attendance records and rosters.
//!
//! Every function here is total: empty input yields empty or zeroed output.

use std::collections::BTreeMap;

use crate::model::{
    AttendanceRecord, AttendanceStatus, AttendanceTotals, CalendarMarks, Employee,
    EmployeeSummary, MonthlyBucket, Overview,
};

/// Groups records by `YYYY-MM` and counts statuses, ascending by month.
pub fn monthly_buckets(records: &[AttendanceRecord]) -> Vec<MonthlyBucket> {
    let mut months: BTreeMap<String, (usize, usize)> = BTreeMap::new();

    for record in records {
        let counts = months.entry(record.month_key()).or_default();
        match record.status {
            AttendanceStatus::Present => counts.0 += 1,
            AttendanceStatus::Absent => counts.1 += 1,
        }
    }

    months
        .into_iter()
        .map(|(month, (present, absent))| MonthlyBucket {
            month,
            present,
            absent,
        })
        .collect()
}

pub fn totals(records: &[AttendanceRecord]) -> AttendanceTotals {
    records
        .iter()
        .fold(AttendanceTotals::default(), |mut acc, record| {
            match record.status {
                AttendanceStatus::Present => acc.present += 1,
                AttendanceStatus::Absent => acc.absent += 1,
            }
            acc
        })
}

/// Keeps records whose ISO date contains `query` as a substring.
pub fn filter_by_date<'a>(records: &'a [AttendanceRecord], query: &str) -> Vec<&'a AttendanceRecord> {
    if query.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| record.iso_date().contains(query))
        .collect()
}

/// Case-insensitive match on either `full_name` or `employee_id`.
pub fn filter_roster<'a>(employees: &'a [Employee], query: &str) -> Vec<&'a Employee> {
    let needle = query.to_lowercase();

    employees
        .iter()
        .filter(|employee| {
            employee.full_name.to_lowercase().contains(&needle)
                || employee.employee_id.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Splits dates by status. A date recorded with both statuses lands in both lists.
pub fn calendar_marks(records: &[AttendanceRecord]) -> CalendarMarks {
    let mut marks = CalendarMarks::default();

    for record in records {
        match record.status {
            AttendanceStatus::Present => marks.present_dates.push(record.date),
            AttendanceStatus::Absent => marks.absent_dates.push(record.date),
        }
    }

    marks
}

/// Percentage of `present` over `total`, rounded half up. Zero when `total` is zero.
pub fn attendance_rate(present: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let present = present.min(total) as u64;
    let total = total as u64;
    ((present * 200 + total) / (2 * total)) as u32
}

pub fn summarize(records: &[AttendanceRecord]) -> EmployeeSummary {
    EmployeeSummary {
        totals: totals(records),
        monthly: monthly_buckets(records),
        calendar: calendar_marks(records),
    }
}

/// Folds per-employee record lists into the dashboard cards.
pub fn overview<'a, I>(total_employees: usize, per_employee: I) -> Overview
where
    I: IntoIterator<Item = &'a [AttendanceRecord]>,
{
    let combined = per_employee
        .into_iter()
        .map(totals)
        .fold(AttendanceTotals::default(), |acc, t| AttendanceTotals {
            present: acc.present + t.present,
            absent: acc.absent + t.absent,
        });

    let total_records = combined.total();

    Overview {
        total_employees,
        total_records,
        present: combined.present,
        absent: combined.absent,
        attendance_rate: attendance_rate(combined.present, total_records),
    }
}
