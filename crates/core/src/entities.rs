//! Entity slots extracted from a single message

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Optional typed slots pulled out of one user message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entities {
    /// Title-cased specialization, e.g. "Cardiologist"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// Doctor name without the "Dr."/"Doctor" prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
}

impl Entities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }

    pub fn with_doctor_name(mut self, name: impl Into<String>) -> Self {
        self.doctor_name = Some(name.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_appointment_id(mut self, id: impl Into<String>) -> Self {
        self.appointment_id = Some(id.into());
        self
    }

    /// Number of populated slots
    pub fn count(&self) -> usize {
        [
            self.specialization.is_some(),
            self.doctor_name.is_some(),
            self.date.is_some(),
            self.time.is_some(),
            self.appointment_id.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Whether any slot that can carry a booking flow forward is present.
    ///
    /// Appointment references are excluded: they never continue a prior flow.
    pub fn has_flow_slots(&self) -> bool {
        self.doctor_name.is_some()
            || self.specialization.is_some()
            || self.date.is_some()
            || self.time.is_some()
    }

    /// Whether a doctor can be looked up from these slots
    pub fn has_doctor_reference(&self) -> bool {
        self.doctor_name.is_some() || self.specialization.is_some()
    }

    /// Fill slots that are empty here from `other`, keeping existing values
    pub fn or(mut self, other: &Entities) -> Self {
        if self.specialization.is_none() {
            self.specialization = other.specialization.clone();
        }
        if self.doctor_name.is_none() {
            self.doctor_name = other.doctor_name.clone();
        }
        if self.date.is_none() {
            self.date = other.date;
        }
        if self.time.is_none() {
            self.time = other.time;
        }
        if self.appointment_id.is_none() {
            self.appointment_id = other.appointment_id.clone();
        }
        self
    }
}

/// Serde adapter for `Option<NaiveTime>` as 24-hour `HH:MM`
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_empty() {
        let entities = Entities::new();
        assert!(entities.is_empty());

        let entities = Entities::new()
            .with_specialization("Cardiologist")
            .with_time(NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert_eq!(entities.count(), 2);
        assert!(entities.has_flow_slots());
    }

    #[test]
    fn test_appointment_id_alone_is_not_a_flow_slot() {
        let entities = Entities::new().with_appointment_id("42");
        assert!(!entities.is_empty());
        assert!(!entities.has_flow_slots());
    }

    #[test]
    fn test_or_keeps_existing_values() {
        let local = Entities::new().with_specialization("Dermatologist");
        let remote = Entities::new()
            .with_specialization("Cardiologist")
            .with_doctor_name("Mehta");
        let merged = local.or(&remote);
        assert_eq!(merged.specialization.as_deref(), Some("Dermatologist"));
        assert_eq!(merged.doctor_name.as_deref(), Some("Mehta"));
    }

    #[test]
    fn test_json_shape() {
        let entities = Entities::new()
            .with_doctor_name("Sharma")
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
            .with_time(NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        let json = serde_json::to_value(&entities).unwrap();
        assert_eq!(json["doctorName"], "Sharma");
        assert_eq!(json["date"], "2024-03-15");
        assert_eq!(json["time"], "09:30");
        assert!(json.get("specialization").is_none());

        let parsed: Entities = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, entities);
    }
}
