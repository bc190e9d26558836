use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// Number of hourly rows in the weekly grid.
pub const SLOTS_PER_DAY: usize = 14;
/// Hour of day that slot index 0 starts at.
pub const FIRST_HOUR: u32 = 8;

const KEY_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("slot index out of range: {0} (expected 0..14)")]
    SlotOutOfRange(usize),
    #[error("hour {0} is outside the schedulable range 8:00-21:00")]
    HourOutOfRange(u32),
    #[error("slot must start on the hour: {0}")]
    NotOnTheHour(String),
    #[error("invalid slot '{0}' (expected YYYY-MM-DDTHH:00)")]
    Parse(String),
}

/// One selectable cell: a calendar date plus the hour the slot starts at.
///
/// Minutes and seconds are always zero, so equality and ordering are those of the
/// underlying wall-clock instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey(NaiveDateTime);

impl SlotKey {
    /// Builds the key for `slot_index` (0 = 8:00) on `date`.
    pub fn new(date: NaiveDate, slot_index: usize) -> Result<Self, SlotError> {
        if slot_index >= SLOTS_PER_DAY {
            return Err(SlotError::SlotOutOfRange(slot_index));
        }
        Self::at_hour(date, FIRST_HOUR + slot_index as u32)
    }

    /// Builds the key for a slot starting at `hour` on `date`.
    pub fn at_hour(date: NaiveDate, hour: u32) -> Result<Self, SlotError> {
        if !(FIRST_HOUR..FIRST_HOUR + SLOTS_PER_DAY as u32).contains(&hour) {
            return Err(SlotError::HourOutOfRange(hour));
        }
        let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or(SlotError::HourOutOfRange(hour))?;
        Ok(SlotKey(date.and_time(time)))
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn slot_index(&self) -> usize {
        (self.hour() - FIRST_HOUR) as usize
    }

    /// Exact inverse of [`SlotKey::new`]'s date/hour pair.
    pub fn decode(&self) -> (NaiveDate, u32) {
        (self.date(), self.hour())
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for SlotKey {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dt = NaiveDateTime::parse_from_str(s.trim(), KEY_FORMAT)
            .map_err(|_| SlotError::Parse(s.to_string()))?;
        if dt.minute() != 0 || dt.second() != 0 {
            return Err(SlotError::NotOnTheHour(s.to_string()));
        }
        SlotKey::at_hour(dt.date(), dt.hour())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_slot_index_maps_to_hour_offset() {
        let key = SlotKey::new(d(2024, 10, 18), 0).unwrap();
        assert_eq!(key.decode(), (d(2024, 10, 18), 8));
        let last = SlotKey::new(d(2024, 10, 18), 13).unwrap();
        assert_eq!(last.hour(), 21);
        assert_eq!(last.slot_index(), 13);
    }

    #[test]
    fn test_out_of_range_slot_is_rejected() {
        assert_eq!(
            SlotKey::new(d(2024, 10, 18), 14),
            Err(SlotError::SlotOutOfRange(14))
        );
    }

    #[test]
    fn test_at_hour_rejects_hours_outside_grid() {
        assert_eq!(SlotKey::at_hour(d(2024, 1, 1), 7), Err(SlotError::HourOutOfRange(7)));
        assert_eq!(SlotKey::at_hour(d(2024, 1, 1), 22), Err(SlotError::HourOutOfRange(22)));
    }

    #[test]
    fn test_equal_keys_for_same_date_and_hour() {
        let a = SlotKey::new(d(2024, 3, 5), 4).unwrap();
        let b = SlotKey::at_hour(d(2024, 3, 5), 12).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ordering_follows_the_instant() {
        let evening = SlotKey::at_hour(d(2024, 10, 18), 21).unwrap();
        let next_morning = SlotKey::at_hour(d(2024, 10, 19), 8).unwrap();
        assert!(evening < next_morning);
    }

    #[test]
    fn test_display_and_parse() {
        let key = SlotKey::at_hour(d(2024, 10, 18), 9).unwrap();
        assert_eq!(key.to_string(), "2024-10-18T09:00");
        assert_eq!("2024-10-18T09:00".parse::<SlotKey>().unwrap(), key);
    }

    #[test]
    fn test_parse_rejects_partial_hour() {
        assert!(matches!(
            "2024-10-18T09:30".parse::<SlotKey>(),
            Err(SlotError::NotOnTheHour(_))
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!("tomorrow".parse::<SlotKey>(), Err(SlotError::Parse(_))));
    }
}
