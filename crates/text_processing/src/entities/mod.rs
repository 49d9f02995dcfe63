//! Booking entity extraction
//!
//! Pulls the slots a booking conversation needs out of free text:
//! - Specialization (normalized to a canonical title-case name)
//! - Doctor name (without "Dr."/"Doctor" title)
//! - Date (relative terms, next weekday, ISO, month names, numeric)
//! - Time (12-hour, 24-hour, named periods)
//! - Appointment reference (24-char hex id or a number)
//!
//! Each slot is extracted independently. Within one slot the patterns are
//! tried in a fixed order and the first match wins.
//!
//! # Example
//!
//! ```ignore
//! use medassist_text_processing::EntityExtractor;
//!
//! let extractor = EntityExtractor::new();
//! let entities = extractor.extract_at("book a cardiologist tomorrow at 3pm", today);
//!
//! assert_eq!(entities.specialization.as_deref(), Some("Cardiologist"));
//! ```

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, Weekday};
use medassist_core::Entities;
use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// STATIC REGEX PATTERNS - Compiled once at program start
// =============================================================================

// Specialization aliases -> canonical name
static SPECIALIZATION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"cardiologists?|cardiology|cardiac|heart (?:specialist|doctor)", "Cardiologist"),
        (r"dermatologists?|dermatology|skin (?:specialist|doctor)", "Dermatologist"),
        (r"p(?:a)?ediatricians?|p(?:a)?ediatrics|child specialist|children'?s doctor", "Pediatrician"),
        (r"orthop(?:a)?edics?|orthop(?:a)?edists?|ortho|bone (?:specialist|doctor)", "Orthopedic"),
        (r"neurologists?|neurology|brain specialist|nerve specialist", "Neurologist"),
        (r"gyn(?:a)?ecologists?|gyn(?:a)?ecology|women'?s health", "Gynecologist"),
        (r"psychiatrists?|psychiatry|mental health", "Psychiatrist"),
        (r"ophthalmologists?|ophthalmology|eye (?:specialist|doctor)", "Ophthalmologist"),
        (r"ent|ear,? nose(?: and|,)? throat", "ENT Specialist"),
        (r"dentists?|dental", "Dentist"),
        (r"general physicians?|general practitioners?|gp|family doctor", "General Physician"),
        (r"gastroenterologists?|gastroenterology|gastro|stomach specialist", "Gastroenterologist"),
        (r"urologists?|urology", "Urologist"),
        (r"endocrinologists?|endocrinology|diabetes specialist", "Endocrinologist"),
        (r"pulmonologists?|pulmonology|lung specialist", "Pulmonologist"),
        (r"oncologists?|oncology|cancer specialist", "Oncologist"),
    ]
    .into_iter()
    .map(|(aliases, name)| (Regex::new(&format!(r"(?i)\b(?:{})\b", aliases)).unwrap(), name))
    .collect()
});

// "Dr." / "Doctor" followed by one or two name tokens
static DOCTOR_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(dr\.?|doctor)\s+([a-z][a-z'\-]*)(?:\s+([a-z][a-z'\-]*))?").unwrap()
});

/// Tokens that can follow a doctor's name but are never part of it
const NON_NAME_TOKENS: &[&str] = &[
    "a", "about", "again", "also", "am", "an", "and", "appointment", "appointments", "are",
    "asap", "at", "availability", "available", "be", "book", "booking", "but", "call", "can",
    "consult", "consultation", "could", "details", "did", "do", "does", "fee", "fees", "for",
    "free", "from", "had", "has", "here", "home", "i", "if", "immediately", "in", "info", "is",
    "it", "me", "my", "near", "nearby", "next", "not", "now", "of", "on", "online", "or",
    "please", "profile", "quickly", "right", "said", "schedule", "should", "slot", "slots",
    "soon", "specialist", "specialists", "that", "the", "there", "this", "timing", "timings",
    "to", "today", "tomorrow", "tonight", "urgent", "urgently", "visit", "was", "who", "will",
    "with", "would",
];

// Meridiem must end the word: "2 amazing" is not 2 AM
static TIME_12H_MINUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})[:.](\d{2})\s*([ap]\.?m\b\.?)").unwrap());
static TIME_12H_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*([ap]\.?m\b\.?)").unwrap());
static TIME_24H: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").unwrap());
static TIME_PERIOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(morning|afternoon|evening|noon)\b").unwrap());

static DATE_RELATIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(day after tomorrow|tomorrow|today)\b").unwrap());
static DATE_NEXT_WEEKDAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bnext\s+(mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun)(?:day|sday|nesday|rsday|urday)?\b")
        .unwrap()
});
static DATE_ISO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());

const MONTHS: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

static DATE_MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b({})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b", MONTHS)).unwrap()
});
static DATE_DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({})\b", MONTHS)).unwrap()
});
static DATE_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4})\b").unwrap());

static APPOINTMENT_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bappointment\s*(?:id|number|no\.?|#)?\s*[:#]?\s*([a-f0-9]{24}|\d+)\b").unwrap()
});

/// Extraction tunables
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractorConfig {
    /// Skip specialization when the message also says "appointment"
    pub suppress_specialization_with_appointment: bool,
}

/// Rule-based entity extractor
#[derive(Debug, Clone, Default)]
pub struct EntityExtractor {
    config: ExtractorConfig,
}

impl EntityExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extract all slots, resolving relative dates against the local date
    pub fn extract(&self, text: &str) -> Entities {
        self.extract_at(text, Local::now().date_naive())
    }

    /// Extract all slots, resolving relative dates against `today`
    pub fn extract_at(&self, text: &str, today: NaiveDate) -> Entities {
        Entities {
            specialization: self.extract_specialization(text),
            doctor_name: self.extract_doctor_name(text),
            date: self.extract_date(text, today),
            time: self.extract_time(text),
            appointment_id: self.extract_appointment_id(text),
        }
    }

    /// Canonical specialization whose alias appears earliest in the text
    pub fn extract_specialization(&self, text: &str) -> Option<String> {
        if self.suppresses_specialization(text) {
            return None;
        }
        match_specialization(text)
    }

    /// Whether the suppression flag drops any specialization for `text`
    pub fn suppresses_specialization(&self, text: &str) -> bool {
        self.config.suppress_specialization_with_appointment
            && text.to_lowercase().contains("appointment")
    }

    /// Doctor name following a "Dr."/"Doctor" title, in title case.
    ///
    /// After "Dr" any casing is accepted. After the plain word "doctor" only
    /// capitalised tokens count, so "a doctor urgently" names nobody.
    pub fn extract_doctor_name(&self, text: &str) -> Option<String> {
        for caps in DOCTOR_NAME_PATTERN.captures_iter(text) {
            let abbreviated = caps[1].to_lowercase().starts_with("dr");
            let tokens: Vec<&str> = [caps.get(2), caps.get(3)]
                .into_iter()
                .flatten()
                .map(|m| m.as_str())
                .take_while(|token| {
                    is_name_token(token) && (abbreviated || starts_uppercase(token))
                })
                .collect();

            if !tokens.is_empty() {
                return Some(
                    tokens
                        .iter()
                        .map(|token| title_case(token))
                        .collect::<Vec<_>>()
                        .join(" "),
                );
            }
        }
        None
    }

    /// Time of day, first matching form wins
    pub fn extract_time(&self, text: &str) -> Option<NaiveTime> {
        if let Some(caps) = TIME_12H_MINUTES.captures(text) {
            let hour: u32 = caps[1].parse().ok()?;
            let minute: u32 = caps[2].parse().ok()?;
            if let Some(time) = to_24h(hour, minute, &caps[3]) {
                return Some(time);
            }
        }

        if let Some(caps) = TIME_12H_BARE.captures(text) {
            let hour: u32 = caps[1].parse().ok()?;
            if let Some(time) = to_24h(hour, 0, &caps[2]) {
                return Some(time);
            }
        }

        if let Some(caps) = TIME_24H.captures(text) {
            let hour: u32 = caps[1].parse().ok()?;
            let minute: u32 = caps[2].parse().ok()?;
            if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
                return Some(time);
            }
        }

        TIME_PERIOD.captures(text).and_then(|caps| {
            let hour = match caps[1].to_lowercase().as_str() {
                "morning" => 9,
                "afternoon" => 14,
                "evening" => 17,
                "noon" => 12,
                _ => return None,
            };
            NaiveTime::from_hms_opt(hour, 0, 0)
        })
    }

    /// Calendar date, first matching form wins
    pub fn extract_date(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        if let Some(caps) = DATE_RELATIVE.captures(text) {
            let offset = match caps[1].to_lowercase().as_str() {
                "today" => 0,
                "tomorrow" => 1,
                _ => 2,
            };
            return Some(today + Duration::days(offset));
        }

        if let Some(caps) = DATE_NEXT_WEEKDAY.captures(text) {
            if let Some(target) = parse_weekday(&caps[1]) {
                return Some(next_weekday(today, target));
            }
        }

        if let Some(caps) = DATE_ISO.captures(text) {
            let date = (|| {
                NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
            })();
            if date.is_some() {
                return date;
            }
        }

        if let Some(caps) = DATE_MONTH_DAY.captures(text) {
            if let Some(date) = parse_month(&caps[1])
                .zip(caps[2].parse().ok())
                .and_then(|(month, day)| upcoming_month_day(today, month, day))
            {
                return Some(date);
            }
        }

        if let Some(caps) = DATE_DAY_MONTH.captures(text) {
            if let Some(date) = parse_month(&caps[2])
                .zip(caps[1].parse().ok())
                .and_then(|(month, day)| upcoming_month_day(today, month, day))
            {
                return Some(date);
            }
        }

        DATE_NUMERIC.captures(text).and_then(|caps| {
            NaiveDate::from_ymd_opt(caps[3].parse().ok()?, caps[2].parse().ok()?, caps[1].parse().ok()?)
        })
    }

    /// Appointment reference following the word "appointment"
    pub fn extract_appointment_id(&self, text: &str) -> Option<String> {
        APPOINTMENT_ID
            .captures(text)
            .map(|caps| caps[1].to_string())
    }
}

/// Canonical specialization for the earliest alias in `text`, ignoring the
/// suppression flag
pub fn match_specialization(text: &str) -> Option<String> {
    SPECIALIZATION_PATTERNS
        .iter()
        .filter_map(|(pattern, name)| pattern.find(text).map(|m| (m.start(), *name)))
        .min_by_key(|(start, _)| *start)
        .map(|(_, name)| name.to_string())
}

fn is_name_token(token: &str) -> bool {
    let lower = token.to_lowercase();
    !NON_NAME_TOKENS.contains(&lower.as_str()) && match_specialization(&lower).is_none()
}

fn starts_uppercase(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn to_24h(hour: u32, minute: u32, meridiem: &str) -> Option<NaiveTime> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    let pm = meridiem.to_lowercase().starts_with('p');
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn parse_weekday(token: &str) -> Option<Weekday> {
    match token.to_lowercase().get(..3)? {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Next occurrence of `target` strictly after `today` (1 to 7 days ahead)
fn next_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let mut ahead = (wanted - current).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    today + Duration::days(ahead)
}

fn parse_month(token: &str) -> Option<u32> {
    let month = match token.to_lowercase().get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Month/day in the current year, or next year when already past
fn upcoming_month_day(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
    match this_year {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Friday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_specialization_aliases() {
        let extractor = EntityExtractor::new();
        assert_eq!(
            extractor.extract_specialization("book a cardiologist").as_deref(),
            Some("Cardiologist")
        );
        assert_eq!(
            extractor.extract_specialization("need a SKIN specialist").as_deref(),
            Some("Dermatologist")
        );
        assert_eq!(
            extractor.extract_specialization("any good ENT near me").as_deref(),
            Some("ENT Specialist")
        );
        // "appointment" contains "ent" but not as a word
        assert!(extractor.extract_specialization("my appointment").is_none());
    }

    #[test]
    fn test_specialization_earliest_mention_wins() {
        let extractor = EntityExtractor::new();
        assert_eq!(
            extractor
                .extract_specialization("dermatology or cardiology?")
                .as_deref(),
            Some("Dermatologist")
        );
    }

    #[test]
    fn test_specialization_suppression_flag() {
        let plain = EntityExtractor::new();
        let suppressing = EntityExtractor::with_config(ExtractorConfig {
            suppress_specialization_with_appointment: true,
        });
        let text = "cardiology appointment please";
        assert_eq!(plain.extract_specialization(text).as_deref(), Some("Cardiologist"));
        assert!(suppressing.extract_specialization(text).is_none());
        assert_eq!(
            suppressing.extract_specialization("find a cardiologist").as_deref(),
            Some("Cardiologist")
        );
    }

    #[test]
    fn test_doctor_name() {
        let extractor = EntityExtractor::new();
        assert_eq!(
            extractor.extract_doctor_name("Is Dr. Sharma available today?").as_deref(),
            Some("Sharma")
        );
        assert_eq!(
            extractor.extract_doctor_name("book with doctor Priya Sharma").as_deref(),
            Some("Priya Sharma")
        );
        assert_eq!(
            extractor.extract_doctor_name("dr mehta appointment tomorrow").as_deref(),
            Some("Mehta")
        );
        assert!(extractor.extract_doctor_name("I need a doctor for my back").is_none());
        assert!(extractor.extract_doctor_name("find a doctor").is_none());
        assert!(extractor.extract_doctor_name("the doctor was rude").is_none());
    }

    #[test]
    fn test_plain_doctor_needs_capitalised_name() {
        let extractor = EntityExtractor::new();
        for text in [
            "I need a doctor urgently",
            "I need a doctor soon",
            "looking for a doctor online",
            "can a doctor specialist see me",
            "book with doctor priya sharma",
            "any doctor today please",
        ] {
            assert!(extractor.extract_doctor_name(text).is_none(), "{}", text);
        }
        // Abbreviated title keeps lowercase names
        assert_eq!(
            extractor.extract_doctor_name("dr priya sharma please").as_deref(),
            Some("Priya Sharma")
        );
        // Stop words apply even when capitalised
        assert!(extractor.extract_doctor_name("Dr. Urgently").is_none());
        assert!(extractor.extract_doctor_name("Doctor Online").is_none());
    }

    #[test]
    fn test_doctor_name_stops_at_specialization() {
        let extractor = EntityExtractor::new();
        assert_eq!(
            extractor.extract_doctor_name("Dr. Rao cardiologist").as_deref(),
            Some("Rao")
        );
    }

    #[test]
    fn test_time_forms() {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.extract_time("at 3:30 pm"), Some(hm(15, 30)));
        assert_eq!(extractor.extract_time("at 3pm"), Some(hm(15, 0)));
        assert_eq!(extractor.extract_time("10 AM works"), Some(hm(10, 0)));
        assert_eq!(extractor.extract_time("at 14:45"), Some(hm(14, 45)));
        assert_eq!(extractor.extract_time("in the evening"), Some(hm(17, 0)));
        assert_eq!(extractor.extract_time("tomorrow morning"), Some(hm(9, 0)));
        assert_eq!(extractor.extract_time("around noon"), Some(hm(12, 0)));
        assert_eq!(extractor.extract_time("afternoon"), Some(hm(14, 0)));
        assert!(extractor.extract_time("sometime").is_none());
    }

    #[test]
    fn test_meridiem_must_end_the_word() {
        let extractor = EntityExtractor::new();
        assert!(extractor.extract_time("2 amazing doctors").is_none());
        assert!(extractor.extract_time("give me 5 pmt options").is_none());
        assert_eq!(extractor.extract_time("2 am"), Some(hm(2, 0)));
        assert_eq!(extractor.extract_time("at 4 p.m."), Some(hm(16, 0)));
        assert_eq!(extractor.extract_time("4pm, please"), Some(hm(16, 0)));
    }

    #[test]
    fn test_time_with_dot_separator() {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.extract_time("at 10.30am"), Some(hm(10, 30)));
        assert_eq!(extractor.extract_time("2.15 pm works"), Some(hm(14, 15)));
    }

    #[test]
    fn test_time_noon_and_midnight() {
        let extractor = EntityExtractor::new();
        assert_eq!(extractor.extract_time("12pm"), Some(hm(12, 0)));
        assert_eq!(extractor.extract_time("12am"), Some(hm(0, 0)));
        assert_eq!(extractor.extract_time("12:15 a.m."), Some(hm(0, 15)));
    }

    #[test]
    fn test_time_precedence() {
        let extractor = EntityExtractor::new();
        // Explicit clock time beats the named period
        assert_eq!(extractor.extract_time("morning at 11am"), Some(hm(11, 0)));
    }

    #[test]
    fn test_relative_dates() {
        let extractor = EntityExtractor::new();
        let today = today();
        assert_eq!(extractor.extract_date("today please", today), Some(today));
        assert_eq!(
            extractor.extract_date("Tomorrow", today),
            Some(today + Duration::days(1))
        );
        assert_eq!(
            extractor.extract_date("day after tomorrow", today),
            Some(today + Duration::days(2))
        );
    }

    #[test]
    fn test_next_weekday_is_strictly_future() {
        let extractor = EntityExtractor::new();
        let today = today();
        for (phrase, weekday) in [
            ("next monday", Weekday::Mon),
            ("next thursday", Weekday::Thu),
            ("next friday", Weekday::Fri),
            ("next Sat", Weekday::Sat),
        ] {
            let date = extractor.extract_date(phrase, today).unwrap();
            let ahead = (date - today).num_days();
            assert_eq!(date.weekday(), weekday, "{}", phrase);
            assert!((1..=7).contains(&ahead), "{} resolved {} days ahead", phrase, ahead);
        }
        // Same weekday as today jumps a full week
        assert_eq!(
            extractor.extract_date("next friday", today),
            Some(today + Duration::days(7))
        );
    }

    #[test]
    fn test_absolute_dates() {
        let extractor = EntityExtractor::new();
        let today = today();
        assert_eq!(
            extractor.extract_date("on 2024-04-02", today),
            NaiveDate::from_ymd_opt(2024, 4, 2)
        );
        assert_eq!(
            extractor.extract_date("March 20th", today),
            NaiveDate::from_ymd_opt(2024, 3, 20)
        );
        assert_eq!(
            extractor.extract_date("on 5 april", today),
            NaiveDate::from_ymd_opt(2024, 4, 5)
        );
        assert_eq!(
            extractor.extract_date("25/12/2024", today),
            NaiveDate::from_ymd_opt(2024, 12, 25)
        );
    }

    #[test]
    fn test_past_month_day_rolls_to_next_year() {
        let extractor = EntityExtractor::new();
        assert_eq!(
            extractor.extract_date("jan 10", today()),
            NaiveDate::from_ymd_opt(2025, 1, 10)
        );
    }

    #[test]
    fn test_invalid_dates_are_skipped() {
        let extractor = EntityExtractor::new();
        assert!(extractor.extract_date("2024-13-40", today()).is_none());
        assert!(extractor.extract_date("31/02/2024", today()).is_none());
    }

    #[test]
    fn test_appointment_id() {
        let extractor = EntityExtractor::new();
        assert_eq!(
            extractor
                .extract_appointment_id("cancel appointment 65f1a2b3c4d5e6f7a8b9c0d1")
                .as_deref(),
            Some("65f1a2b3c4d5e6f7a8b9c0d1")
        );
        assert_eq!(
            extractor.extract_appointment_id("appointment #1042").as_deref(),
            Some("1042")
        );
        assert_eq!(
            extractor.extract_appointment_id("appointment id: 77").as_deref(),
            Some("77")
        );
        assert!(extractor.extract_appointment_id("appointment at 3pm").is_none());
    }

    #[test]
    fn test_extract_all_slots() {
        let extractor = EntityExtractor::new();
        let entities =
            extractor.extract_at("book Dr. Sharma, cardiologist, tomorrow at 4:15 pm", today());
        assert_eq!(entities.doctor_name.as_deref(), Some("Sharma"));
        assert_eq!(entities.specialization.as_deref(), Some("Cardiologist"));
        assert_eq!(entities.date, Some(today() + Duration::days(1)));
        assert_eq!(entities.time, Some(hm(16, 15)));
        assert!(entities.appointment_id.is_none());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = EntityExtractor::new();
        let text = "next tuesday 10am with dr iyer, pediatrician";
        assert_eq!(extractor.extract_at(text, today()), extractor.extract_at(text, today()));
    }

    #[test]
    fn test_no_entities() {
        let extractor = EntityExtractor::new();
        assert!(extractor.extract_at("hello there", today()).is_empty());
    }
}
