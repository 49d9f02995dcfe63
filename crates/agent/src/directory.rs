//! File-backed doctor directory
//!
//! Loads doctor records from a YAML or JSON file once at startup and answers
//! [`DoctorDirectory`] queries from memory. Open slots are derived from the
//! day's working window minus the break.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use std::cmp::Ordering;
use std::path::Path;

use medassist_core::{strip_title, Doctor, DoctorDirectory, DoctorQuery, DoctorSort, Error, Result};

use crate::AgentError;

/// Doctor directory held in memory
#[derive(Debug, Clone)]
pub struct InMemoryDoctorDirectory {
    doctors: Vec<Doctor>,
    slot_minutes: u32,
}

impl InMemoryDoctorDirectory {
    pub fn new(doctors: Vec<Doctor>) -> Self {
        Self {
            doctors,
            slot_minutes: 30,
        }
    }

    pub fn with_slot_minutes(mut self, minutes: u32) -> Self {
        self.slot_minutes = minutes.max(1);
        self
    }

    /// Load from a `.json`, `.yaml` or `.yml` file containing a list of doctors
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, AgentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AgentError::Directory(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        let doctors: Vec<Doctor> = if is_json {
            serde_json::from_str(&content)
                .map_err(|e| AgentError::Directory(format!("Invalid JSON in {}: {}", path.display(), e)))?
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| AgentError::Directory(format!("Invalid YAML in {}: {}", path.display(), e)))?
        };

        tracing::info!(path = %path.display(), doctors = doctors.len(), "Loaded doctor directory");
        Ok(Self::new(doctors))
    }

    pub fn len(&self) -> usize {
        self.doctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty()
    }

    fn matches(doctor: &Doctor, query: &DoctorQuery) -> bool {
        let name_ok = query.doctor_name.as_deref().map_or(true, |wanted| {
            let wanted = strip_title(wanted).to_lowercase();
            strip_title(&doctor.name).to_lowercase().contains(&wanted)
        });

        let specialization_ok = query.specialization.as_deref().map_or(true, |wanted| {
            let wanted = wanted.to_lowercase();
            let actual = doctor.specialization.to_lowercase();
            actual.contains(&wanted) || wanted.contains(&actual)
        });

        name_ok && specialization_ok
    }

    fn compare(sort: DoctorSort, a: &Doctor, b: &Doctor) -> Ordering {
        match sort {
            DoctorSort::RatingDesc => b
                .rating
                .average
                .partial_cmp(&a.rating.average)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.rating.count.cmp(&a.rating.count)),
            DoctorSort::ExperienceDesc => b.experience.cmp(&a.experience),
            DoctorSort::FeeAsc => a
                .consultation_fee
                .partial_cmp(&b.consultation_fee)
                .unwrap_or(Ordering::Equal),
        }
    }
}

#[async_trait]
impl DoctorDirectory for InMemoryDoctorDirectory {
    async fn find_doctors(&self, query: &DoctorQuery) -> Result<Vec<Doctor>> {
        let mut found: Vec<Doctor> = self
            .doctors
            .iter()
            .filter(|doctor| Self::matches(doctor, query))
            .cloned()
            .collect();

        found.sort_by(|a, b| Self::compare(query.sort, a, b));
        found.truncate(query.limit);

        tracing::debug!(query = %query.describe(), results = found.len(), "Doctor lookup");
        Ok(found)
    }

    async fn open_slots(&self, doctor: &Doctor, date: NaiveDate) -> Result<Vec<String>> {
        let Some(day) = doctor.availability_on(date) else {
            return Ok(Vec::new());
        };

        let start = parse_hhmm(&day.start_time)?;
        let end = parse_hhmm(&day.end_time)?;
        let break_window = match (&day.break_start_time, &day.break_end_time) {
            (Some(from), Some(to)) => Some((parse_hhmm(from)?, parse_hhmm(to)?)),
            _ => None,
        };

        let step = Duration::minutes(self.slot_minutes as i64);
        let mut slots = Vec::new();
        let mut slot = start;

        while slot < end {
            let (slot_end, wrapped) = slot.overflowing_add_signed(step);
            if wrapped != 0 || slot_end > end {
                break;
            }
            let in_break = break_window
                .map_or(false, |(from, to)| slot < to && slot_end > from);
            if !in_break {
                slots.push(slot.format("%H:%M").to_string());
            }
            slot = slot_end;
        }

        Ok(slots)
    }
}

fn parse_hhmm(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| Error::Directory(format!("Invalid time '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_core::{DayAvailability, Rating};
    use std::collections::HashMap;
    use std::io::Write;

    fn doctor(name: &str, specialization: &str, rating: f32, fee: f64, experience: u32) -> Doctor {
        let mut availability = HashMap::new();
        availability.insert(
            "friday".to_string(),
            DayAvailability {
                is_available: true,
                start_time: "09:00".to_string(),
                end_time: "12:00".to_string(),
                break_start_time: Some("10:00".to_string()),
                break_end_time: Some("10:30".to_string()),
            },
        );
        Doctor {
            name: name.to_string(),
            specialization: specialization.to_string(),
            rating: Rating {
                average: rating,
                count: 10,
            },
            consultation_fee: fee,
            experience,
            bio: None,
            languages: vec![],
            availability,
        }
    }

    fn directory() -> InMemoryDoctorDirectory {
        InMemoryDoctorDirectory::new(vec![
            doctor("Rahul Verma", "Cardiologist", 4.4, 600.0, 9),
            doctor("Priya Sharma", "Cardiologist", 4.8, 800.0, 14),
            doctor("Anil Mehta", "Dermatologist", 4.6, 500.0, 11),
        ])
    }

    /// Friday
    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[tokio::test]
    async fn test_find_by_specialization_sorted_by_rating() {
        let query = DoctorQuery::new(5).with_specialization(Some("cardiologist".to_string()));
        let found = directory().find_doctors(&query).await.unwrap();
        let names: Vec<_> = found.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Priya Sharma", "Rahul Verma"]);
    }

    #[tokio::test]
    async fn test_find_by_partial_name_with_title() {
        let query = DoctorQuery::new(5).with_doctor_name(Some("Dr. sharma".to_string()));
        let found = directory().find_doctors(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].specialization, "Cardiologist");
    }

    #[tokio::test]
    async fn test_find_respects_limit_and_sort() {
        let mut query = DoctorQuery::new(2);
        query.sort = DoctorSort::FeeAsc;
        let found = directory().find_doctors(&query).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Anil Mehta");
    }

    #[tokio::test]
    async fn test_no_match() {
        let query = DoctorQuery::new(5).with_specialization(Some("Neurologist".to_string()));
        assert!(directory().find_doctors(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_slots_skip_break() {
        let dir = directory();
        let d = doctor("Priya Sharma", "Cardiologist", 4.8, 800.0, 14);
        let slots = dir.open_slots(&d, friday()).await.unwrap();
        assert_eq!(slots, vec!["09:00", "09:30", "10:30", "11:00", "11:30"]);

        // Saturday: not working
        let saturday = friday().succ_opt().unwrap();
        assert!(dir.open_slots(&d, saturday).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_hours_are_an_error() {
        let mut d = doctor("X", "Dentist", 4.0, 300.0, 2);
        if let Some(day) = d.availability.get_mut("friday") {
            day.start_time = "nine".to_string();
        }
        assert!(directory().open_slots(&d, friday()).await.is_err());
    }

    #[test]
    fn test_load_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("doctors.yaml");
        let mut file = std::fs::File::create(&yaml_path).unwrap();
        writeln!(
            file,
            "- name: Kavya Iyer\n  specialization: Pediatrician\n  consultationFee: 700\n  availability:\n    monday: {{ isAvailable: true, startTime: \"08:30\", endTime: \"15:30\" }}"
        )
        .unwrap();
        let loaded = InMemoryDoctorDirectory::from_file(&yaml_path).unwrap();
        assert_eq!(loaded.len(), 1);

        let json_path = dir.path().join("doctors.json");
        std::fs::write(
            &json_path,
            r#"[{"name": "Meera Nair", "specialization": "Neurologist", "consultationFee": 1000}]"#,
        )
        .unwrap();
        let loaded = InMemoryDoctorDirectory::from_file(&json_path).unwrap();
        assert_eq!(loaded.len(), 1);

        assert!(InMemoryDoctorDirectory::from_file(dir.path().join("missing.yaml")).is_err());
    }
}
