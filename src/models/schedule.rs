use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Day of the week, serialized by its full English name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl Weekday {
    /// Today's weekday in local time
    pub fn today() -> Self {
        use chrono::Datelike;
        chrono::Local::now().weekday().into()
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Weekday::ALL[day.num_days_from_monday() as usize]
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Weekday {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Weekday::ALL
            .iter()
            .copied()
            .find(|day| {
                let name = day.name().to_lowercase();
                name == lower || (lower.len() >= 3 && name.starts_with(&lower))
            })
            .ok_or_else(|| anyhow::anyhow!("Invalid weekday: {}", s))
    }
}

/// Weekly schedule body for `POST /api/auth/schedule/save/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(default)]
    pub training_days: BTreeSet<Weekday>,

    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

/// `GET /api/auth/schedule/get/` response envelope
#[derive(Debug, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default = "default_true")]
    pub success: bool,

    #[serde(default)]
    pub schedule: Option<WeeklySchedule>,

    #[serde(default)]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_parsing() {
        assert_eq!("monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("Wed".parse::<Weekday>().unwrap(), Weekday::Wednesday);
        assert!("Mo".parse::<Weekday>().is_err());
        assert!("Funday".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_schedule_wire_format() {
        let schedule = WeeklySchedule {
            training_days: [Weekday::Friday, Weekday::Monday].into_iter().collect(),
            notifications_enabled: false,
        };

        let body = serde_json::to_value(&schedule).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "training_days": ["Monday", "Friday"],
                "notifications_enabled": false
            })
        );
    }

    #[test]
    fn test_from_chrono_weekday() {
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
    }
}
