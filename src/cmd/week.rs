use crate::calc::range_synth::jp_weekday;
use crate::calc::{WeekWindow, today};
use anyhow::{Context, Result};
use chrono::NaiveDate;

pub fn run(date: Option<NaiveDate>) -> Result<()> {
    let window = window_for(date.unwrap_or_else(today))?;
    write_week(&window, &mut std::io::stdout())
}

fn window_for(date: NaiveDate) -> Result<WeekWindow> {
    WeekWindow::containing(date)
        .with_context(|| format!("no full week around {date} fits in the supported date range"))
}

pub(crate) fn write_week<W: std::io::Write>(window: &WeekWindow, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "Week of {} - {}",
        window.monday().format("%Y-%m-%d"),
        window.sunday().format("%Y-%m-%d")
    )?;
    writeln!(out, "---")?;
    for date in window.dates() {
        writeln!(out, "  {}  {}", date.format("%Y-%m-%d"), jp_weekday(*date))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(y: i32, m: u32, d: u32) -> String {
        let window = window_for(NaiveDate::from_ymd_opt(y, m, d).unwrap()).unwrap();
        let mut buf = Vec::new();
        write_week(&window, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_week_header() {
        let out = render(2024, 1, 3);
        assert!(out.starts_with("Week of 2024-01-01 - 2024-01-07"));
    }

    #[test]
    fn test_write_week_lists_seven_days_monday_first() {
        let out = render(2024, 1, 7);
        let days: Vec<&str> = out.lines().skip(2).collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], "  2024-01-01  月");
        assert_eq!(days[6], "  2024-01-07  日");
    }

    #[test]
    fn test_week_at_max_date_is_an_error() {
        let err = window_for(NaiveDate::MAX).unwrap_err();
        assert!(err.to_string().contains("supported date range"));
        assert!(run(Some(NaiveDate::MAX)).is_err());
    }
}
