use crate::app_lib::json::value_text;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AcademicYear {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub academic_year_code: Option<String>,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
}

/// Accepts `YYYY-MM-DD` and timestamps that start with one.
fn parse_day(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl AcademicYear {
    #[must_use]
    pub fn id_text(&self) -> String {
        value_text(&self.id)
    }

    /// Whether `today` falls inside `[date_from, date_to]`. Years with a
    /// missing or unreadable bound never contain a day.
    #[must_use]
    pub fn contains(&self, today: NaiveDate) -> bool {
        match (
            parse_day(self.date_from.as_deref()),
            parse_day(self.date_to.as_deref()),
        ) {
            (Some(from), Some(to)) => from <= today && today <= to,
            _ => false,
        }
    }
}

/// The year containing `today`, else the first one listed.
#[must_use]
pub fn select_current(years: &[AcademicYear], today: NaiveDate) -> Option<&AcademicYear> {
    years
        .iter()
        .find(|year| year.contains(today))
        .or_else(|| years.first())
}
