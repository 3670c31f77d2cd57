use chrono::NaiveDate;
use sqlx::MySql;
use sqlx::mysql::MySqlArguments;
use sqlx::query::QueryAs;

use crate::model::attendance::AttendanceFilter;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    U64(u64),
    Date(NaiveDate),
}

/// ===============================
/// WHERE clause container
/// ===============================
#[derive(Debug, Default, PartialEq)]
pub struct SqlWhere {
    pub clause: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build WHERE for attendance listing
/// ===============================
///
/// Columns are qualified with the `a` alias of the attendance table.
pub fn build_attendance_where(filter: &AttendanceFilter) -> SqlWhere {
    let mut conditions = Vec::new();
    let mut values = Vec::new();

    if let Some(worker_id) = filter.worker_id {
        conditions.push("a.worker_id = ?");
        values.push(SqlValue::U64(worker_id));
    }

    if let Some(start) = filter.start_date {
        conditions.push("a.date >= ?");
        values.push(SqlValue::Date(start));
    }

    if let Some(end) = filter.end_date {
        conditions.push("a.date <= ?");
        values.push(SqlValue::Date(end));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    SqlWhere { clause, values }
}

/// ===============================
/// Bind values in order
/// ===============================
pub fn bind_all<'q, O>(
    mut query: QueryAs<'q, MySql, O, MySqlArguments>,
    values: Vec<SqlValue>,
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::U64(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where() {
        assert_eq!(build_attendance_where(&AttendanceFilter::default()), SqlWhere::default());
    }

    #[test]
    fn all_filters_are_joined_in_bind_order() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let filter = AttendanceFilter {
            worker_id: Some(3),
            start_date: Some(start),
            end_date: Some(end),
        };

        let built = build_attendance_where(&filter);

        assert_eq!(
            built.clause,
            "WHERE a.worker_id = ? AND a.date >= ? AND a.date <= ?"
        );
        assert_eq!(
            built.values,
            vec![SqlValue::U64(3), SqlValue::Date(start), SqlValue::Date(end)]
        );
    }

    #[test]
    fn open_ended_range_binds_only_its_bound() {
        let end = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let filter = AttendanceFilter {
            end_date: Some(end),
            ..Default::default()
        };

        let built = build_attendance_where(&filter);

        assert_eq!(built.clause, "WHERE a.date <= ?");
        assert_eq!(built.values, vec![SqlValue::Date(end)]);
    }
}
