use chrono::{Datelike, Days, Local, NaiveDate, NaiveTime, Timelike};

use crate::data::slot_key::{FIRST_HOUR, SLOTS_PER_DAY};

pub const DAYS_PER_WEEK: usize = 7;

/// The seven dates shown in the grid, Monday through Sunday.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeekWindow {
    dates: [NaiveDate; DAYS_PER_WEEK],
}

impl WeekWindow {
    /// Window for the week containing `reference`. Sunday belongs to the week that
    /// started the Monday before it.
    ///
    /// Returns `None` when the week runs past the range chrono can represent.
    pub fn containing(reference: NaiveDate) -> Option<Self> {
        let back = reference.weekday().num_days_from_monday() as u64;
        let monday = reference.checked_sub_days(Days::new(back))?;
        let mut dates = [monday; DAYS_PER_WEEK];
        for (i, date) in dates.iter_mut().enumerate() {
            *date = monday.checked_add_days(Days::new(i as u64))?;
        }
        Some(WeekWindow { dates })
    }

    pub fn monday(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn sunday(&self) -> NaiveDate {
        self.dates[DAYS_PER_WEEK - 1]
    }

    pub fn get(&self, day_index: usize) -> Option<NaiveDate> {
        self.dates.get(day_index).copied()
    }

    pub fn dates(&self) -> &[NaiveDate; DAYS_PER_WEEK] {
        &self.dates
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.position(date).is_some()
    }

    /// Column index of `date` within the window.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.iter().position(|d| *d == date)
    }
}

/// Moves `date` by whole weeks (negative goes back). `None` past chrono's bounds.
pub fn shift_week(date: NaiveDate, weeks: i64) -> Option<NaiveDate> {
    let days = Days::new(weeks.unsigned_abs().checked_mul(7)?);
    if weeks < 0 {
        date.checked_sub_days(days)
    } else {
        date.checked_add_days(days)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Where the "now" line sits in the grid: the row and the minute within it,
/// floored to five minutes. `None` outside 8:00-22:00.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NowMarker {
    pub slot_index: usize,
    pub minute: u32,
}

pub fn now_marker(time: NaiveTime) -> Option<NowMarker> {
    let hour = time.hour();
    if hour < FIRST_HOUR || hour >= FIRST_HOUR + SLOTS_PER_DAY as u32 {
        return None;
    }
    Some(NowMarker {
        slot_index: (hour - FIRST_HOUR) as usize,
        minute: time.minute() / 5 * 5,
    })
}
