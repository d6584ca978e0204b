use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Day of week a schedule row or visit falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Mon => WeekDay::Monday,
            Weekday::Tue => WeekDay::Tuesday,
            Weekday::Wed => WeekDay::Wednesday,
            Weekday::Thu => WeekDay::Thursday,
            Weekday::Fri => WeekDay::Friday,
            Weekday::Sat => WeekDay::Saturday,
            Weekday::Sun => WeekDay::Sunday,
        }
    }

    /// Storage representation, used in filter query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekDay::Monday => "monday",
            WeekDay::Tuesday => "tuesday",
            WeekDay::Wednesday => "wednesday",
            WeekDay::Thursday => "thursday",
            WeekDay::Friday => "friday",
            WeekDay::Saturday => "saturday",
            WeekDay::Sunday => "sunday",
        }
    }
}

impl std::fmt::Display for WeekDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_from_date() {
        // 2024-06-03 is a Monday
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(WeekDay::from_date(date), WeekDay::Monday);
        assert_eq!(WeekDay::from_date(date.succ_opt().unwrap()), WeekDay::Tuesday);
    }

    #[test]
    fn weekday_serializes_lowercase() {
        let json = serde_json::to_string(&WeekDay::Wednesday).unwrap();
        assert_eq!(json, "\"wednesday\"");
        let back: WeekDay = serde_json::from_str("\"sunday\"").unwrap();
        assert_eq!(back, WeekDay::Sunday);
    }
}
