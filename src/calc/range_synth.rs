use crate::data::slot_key::SlotKey;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Weekday labels indexed from Sunday.
const JP_WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// A maximal run of consecutive selected hours: `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HourRun {
    pub start: u32,
    pub end: u32,
}

pub fn jp_weekday(date: NaiveDate) -> &'static str {
    JP_WEEKDAYS[date.weekday().num_days_from_sunday() as usize]
}

/// Collapses sorted, de-duplicated hours into contiguous runs.
pub fn merge_runs(sorted_hours: &[u32]) -> Vec<HourRun> {
    let mut runs: Vec<HourRun> = Vec::new();
    for &hour in sorted_hours {
        match runs.last_mut() {
            Some(run) if run.end == hour => run.end = hour + 1,
            _ => runs.push(HourRun {
                start: hour,
                end: hour + 1,
            }),
        }
    }
    runs
}

/// Groups keys by date, ascending, with each date's hours sorted.
pub fn group_by_date<'a, I>(keys: I) -> BTreeMap<NaiveDate, Vec<u32>>
where
    I: IntoIterator<Item = &'a SlotKey>,
{
    let mut groups: BTreeMap<NaiveDate, Vec<u32>> = BTreeMap::new();
    for key in keys {
        let (date, hour) = key.decode();
        groups.entry(date).or_default().push(hour);
    }
    for hours in groups.values_mut() {
        hours.sort_unstable();
        hours.dedup();
    }
    groups
}

/// One summary line: `10月18日(金) 9:00-12:00 14:00-16:00`.
pub fn format_date_line(date: NaiveDate, runs: &[HourRun]) -> String {
    let mut line = format!("{}月{}日({}) ", date.month(), date.day(), jp_weekday(date));
    for run in runs {
        // Writing to a String cannot fail.
        let _ = write!(line, "{}:00-{}:00 ", run.start, run.end);
    }
    line.trim_end().to_string()
}

/// Renders the schedule summary for every selected slot, one line per date in
/// chronological order. Empty input yields an empty string.
pub fn synthesize<'a, I>(keys: I) -> String
where
    I: IntoIterator<Item = &'a SlotKey>,
{
    let lines: Vec<String> = group_by_date(keys)
        .into_iter()
        .filter(|(_, hours)| !hours.is_empty())
        .map(|(date, hours)| format_date_line(date, &merge_runs(&hours)))
        .collect();
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(day: u32, hours: &[u32]) -> Vec<SlotKey> {
        let date = NaiveDate::from_ymd_opt(2024, 10, day).unwrap();
        hours
            .iter()
            .map(|h| SlotKey::at_hour(date, *h).unwrap())
            .collect()
    }

    #[test]
    fn test_merges_contiguous_hours_and_splits_on_gaps() {
        let k = keys(18, &[9, 10, 11, 14, 15]);
        assert_eq!(synthesize(&k), "10月18日(金) 9:00-12:00 14:00-16:00");
    }

    #[test]
    fn test_single_isolated_hour() {
        let k = keys(18, &[13]);
        assert_eq!(synthesize(&k), "10月18日(金) 13:00-14:00");
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let k = keys(18, &[15, 9, 14, 11, 10]);
        assert_eq!(synthesize(&k), "10月18日(金) 9:00-12:00 14:00-16:00");
    }

    #[test]
    fn test_dates_render_chronologically() {
        let mut k = keys(20, &[10]);
        k.extend(keys(18, &[9]));
        assert_eq!(
            synthesize(&k),
            "10月18日(金) 9:00-10:00\n10月20日(日) 10:00-11:00"
        );
    }

    #[test]
    fn test_empty_selection_gives_empty_text() {
        let k: Vec<SlotKey> = Vec::new();
        assert_eq!(synthesize(&k), "");
    }

    #[test]
    fn test_full_day_collapses_to_one_run() {
        let hours: Vec<u32> = (8..22).collect();
        let k = keys(14, &hours);
        assert_eq!(synthesize(&k), "10月14日(月) 8:00-22:00");
    }

    #[test]
    fn test_merge_runs_alternating_hours() {
        assert_eq!(
            merge_runs(&[8, 10, 12]),
            vec![
                HourRun { start: 8, end: 9 },
                HourRun { start: 10, end: 11 },
                HourRun { start: 12, end: 13 },
            ]
        );
    }

    #[test]
    fn test_merge_runs_empty() {
        assert!(merge_runs(&[]).is_empty());
    }

    #[test]
    fn test_group_by_date_dedups_hours() {
        let mut k = keys(18, &[9, 10]);
        k.extend(keys(18, &[9]));
        let groups = group_by_date(&k);
        let date = NaiveDate::from_ymd_opt(2024, 10, 18).unwrap();
        assert_eq!(groups[&date], vec![9, 10]);
    }

    #[test]
    fn test_weekday_kanji_table() {
        let sunday = NaiveDate::from_ymd_opt(2024, 10, 20).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 10, 26).unwrap();
        assert_eq!(jp_weekday(sunday), "日");
        assert_eq!(jp_weekday(saturday), "土");
    }

    #[test]
    fn test_format_date_line_single_digit_month() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let line = format_date_line(date, &[HourRun { start: 8, end: 10 }]);
        assert_eq!(line, "1月3日(水) 8:00-10:00");
    }
}
