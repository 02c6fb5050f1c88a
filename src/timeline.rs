// 📅 Timeline - Month axis labels
// Maps month indices to calendar labels like "Aug 11".

use chrono::{Months, NaiveDate};

/// Calendar date for a month index relative to the project start.
pub fn month_date(start_date: NaiveDate, month_index: u32) -> NaiveDate {
    start_date + Months::new(month_index)
}

/// Short axis label for a month index, e.g. "Aug 14".
pub fn month_label(start_date: NaiveDate, month_index: u32) -> String {
    month_date(start_date, month_index).format("%b %y").to_string()
}

/// Labels for every month in the horizon, in order.
pub fn month_labels(start_date: NaiveDate, horizon_months: u32) -> Vec<String> {
    (0..horizon_months)
        .map(|i| month_label(start_date, i))
        .collect()
}
