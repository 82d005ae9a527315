use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_DURATION_MINUTES: u32 = 10;

/// Timestamp layout `cmd.cgi` expects for `start_time` and `end_time`.
pub const TIMESTAMP_FORMAT: &str = "%m-%d-%Y %H:%M:%S";

/// Fixed downtime window. `end` is always `start + duration_minutes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DowntimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration_minutes: u32,
}

impl DowntimeWindow {
    pub fn starting_at(start: DateTime<Utc>, duration_minutes: u32) -> Result<Self, String> {
        if duration_minutes == 0 {
            return Err("downtime duration must be a positive number of minutes".to_string());
        }
        let end = start
            .checked_add_signed(Duration::minutes(i64::from(duration_minutes)))
            .ok_or_else(|| format!("downtime end overflows for {duration_minutes} minutes"))?;
        Ok(Self {
            start,
            end,
            duration_minutes,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn fixed(&self) -> bool {
        true
    }

    pub fn start_field(&self) -> String {
        self.start.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn end_field(&self) -> String {
        self.end.format(TIMESTAMP_FORMAT).to_string()
    }
}
