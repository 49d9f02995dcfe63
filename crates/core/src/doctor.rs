//! Doctor records as returned by the read-only doctor directory

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregate patient rating
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub average: f32,
    pub count: u32,
}

/// Working hours for one weekday, times as `HH:MM`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub is_available: bool,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_end_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub rating: Rating,
    pub consultation_fee: f64,
    /// Years of practice
    #[serde(default)]
    pub experience: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    /// Keyed by lowercase weekday name, see [`weekday_key`]
    #[serde(default)]
    pub availability: HashMap<String, DayAvailability>,
}

impl Doctor {
    /// Name with a single "Dr." prefix
    pub fn display_name(&self) -> String {
        let bare = strip_title(&self.name);
        format!("Dr. {}", bare)
    }

    /// Working hours on the weekday of `date`, if the doctor works that day
    pub fn availability_on(&self, date: NaiveDate) -> Option<&DayAvailability> {
        self.availability
            .get(weekday_key(date.weekday()))
            .filter(|day| day.is_available)
    }
}

/// Canonical lowercase full weekday name used as availability key
pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Remove a leading "Dr."/"Doctor" title
pub fn strip_title(name: &str) -> &str {
    let trimmed = name.trim();
    let lower = trimmed.to_ascii_lowercase();
    for prefix in ["doctor ", "dr. ", "dr.", "dr "] {
        if lower.starts_with(prefix) {
            return trimmed[prefix.len()..].trim_start();
        }
    }
    trimmed
}

/// Result ordering requested from the directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoctorSort {
    #[default]
    RatingDesc,
    ExperienceDesc,
    FeeAsc,
}

/// Directory lookup parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorQuery {
    pub doctor_name: Option<String>,
    pub specialization: Option<String>,
    pub limit: usize,
    pub sort: DoctorSort,
}

impl DoctorQuery {
    pub fn new(limit: usize) -> Self {
        Self {
            doctor_name: None,
            specialization: None,
            limit,
            sort: DoctorSort::RatingDesc,
        }
    }

    pub fn with_doctor_name(mut self, name: Option<String>) -> Self {
        self.doctor_name = name;
        self
    }

    pub fn with_specialization(mut self, specialization: Option<String>) -> Self {
        self.specialization = specialization;
        self
    }

    /// Human-readable description of what is being searched for
    pub fn describe(&self) -> String {
        match (&self.doctor_name, &self.specialization) {
            (Some(name), Some(spec)) => format!("Dr. {} ({})", name, spec),
            (Some(name), None) => format!("Dr. {}", name),
            (None, Some(spec)) => spec.clone(),
            (None, None) => "your search".to_string(),
        }
    }
}
