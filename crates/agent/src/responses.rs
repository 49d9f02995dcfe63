//! Reply texts
//!
//! Everything the assistant says that is not produced by the external AI is
//! built here, so wording and policy numbers live in one place.

use chrono::{Datelike, NaiveDate, NaiveTime};

use medassist_config::constants::policy;
use medassist_core::{weekday_key, DayAvailability, Doctor};

/// Appended to every medical or symptom reply
pub const MEDICAL_DISCLAIMER: &str = "Please note: this is general information only and not a medical diagnosis. \
For advice about your own health, please consult a qualified doctor.";

const WEEK: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

// -----------------------------------------------------------------------------
// Formatting helpers
// -----------------------------------------------------------------------------

/// "Saturday, 16 March 2024"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

/// "3:00 PM"
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// "₹800" or "₹750.50"
pub fn format_fee(fee: f64) -> String {
    if fee.fract() == 0.0 {
        format!("₹{:.0}", fee)
    } else {
        format!("₹{:.2}", fee)
    }
}

/// Working window in 12-hour form, e.g. "9:00 AM - 5:00 PM". Falls back to
/// the raw strings when they are not valid `HH:MM`.
fn format_window(start: &str, end: &str) -> String {
    let pretty = |value: &str| {
        NaiveTime::parse_from_str(value, "%H:%M")
            .map(format_time)
            .unwrap_or_else(|_| value.to_string())
    };
    format!("{} - {}", pretty(start), pretty(end))
}

/// At most `max` slots, with a "+N more" suffix for the rest
pub fn format_slots(slots: &[String], max: usize) -> String {
    if slots.len() <= max {
        return slots.join(", ");
    }
    format!("{} (+{} more)", slots[..max].join(", "), slots.len() - max)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// What the user is asking about, e.g. "Dr. Sharma" or "a Cardiologist"
pub fn describe_target(doctor_name: Option<&str>, specialization: Option<&str>) -> String {
    match (doctor_name, specialization) {
        (Some(name), Some(specialization)) => format!("Dr. {} ({})", name, specialization),
        (Some(name), None) => format!("Dr. {}", name),
        (None, Some(specialization)) => format!("a {}", specialization),
        (None, None) => "a doctor".to_string(),
    }
}

// -----------------------------------------------------------------------------
// Small talk
// -----------------------------------------------------------------------------

pub fn greeting() -> String {
    "Hello! I'm your appointment assistant. I can help you find a doctor, check availability, \
     book an appointment or answer questions about payments and refunds. How can I help you today?"
        .to_string()
}

pub fn farewell() -> String {
    "Goodbye! Take care, and feel free to come back whenever you need help with an appointment."
        .to_string()
}

pub fn thanks() -> String {
    "You're welcome! Is there anything else I can help you with?".to_string()
}

/// Menu shown when nothing more specific applies
pub fn generic_menu() -> String {
    "I can help you with:\n\
     - Finding a doctor by name or specialization\n\
     - Checking a doctor's availability\n\
     - Booking, cancelling or rescheduling appointments\n\
     - Payment and refund questions\n\
     - General health information\n\
     What would you like to do?"
        .to_string()
}

pub fn apology() -> String {
    "Sorry, something went wrong while handling your message. Please try again in a moment."
        .to_string()
}

// -----------------------------------------------------------------------------
// Doctors
// -----------------------------------------------------------------------------

/// One numbered entry of a search result
pub fn doctor_card(index: usize, doctor: &Doctor) -> String {
    let mut card = format!(
        "{}. {} - {}\n   Rating {:.1}/5 ({} reviews) | Fee {} | {} years experience",
        index,
        doctor.display_name(),
        doctor.specialization,
        doctor.rating.average,
        doctor.rating.count,
        format_fee(doctor.consultation_fee),
        doctor.experience,
    );
    if !doctor.languages.is_empty() {
        card.push_str(&format!("\n   Speaks: {}", doctor.languages.join(", ")));
    }
    card
}

pub fn doctor_list(target: &str, doctors: &[Doctor]) -> String {
    let cards = doctors
        .iter()
        .enumerate()
        .map(|(i, doctor)| doctor_card(i + 1, doctor))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Here are the doctors I found for {}:\n\n{}\n\n\
         Would you like to check availability or book an appointment with one of them?",
        target, cards
    )
}

pub fn no_doctors_found(target: &str) -> String {
    format!(
        "I couldn't find {} in our directory. You could try another specialization \
         or check the spelling of the doctor's name.",
        target
    )
}

pub fn find_doctor_guidance() -> String {
    "I can help you find a doctor. Which specialization are you looking for \
     (for example Cardiologist, Dermatologist or Pediatrician), or do you have a doctor's name in mind?"
        .to_string()
}

pub fn ask_doctor_name() -> String {
    "Which doctor would you like to know more about? Please tell me the doctor's name.".to_string()
}

/// Full profile with weekly schedule
pub fn doctor_profile(doctor: &Doctor) -> String {
    let mut profile = format!(
        "{} - {}\nRating {:.1}/5 ({} reviews)\nExperience: {} years\nConsultation fee: {}",
        doctor.display_name(),
        doctor.specialization,
        doctor.rating.average,
        doctor.rating.count,
        doctor.experience,
        format_fee(doctor.consultation_fee),
    );

    if let Some(bio) = doctor.bio.as_deref().filter(|b| !b.trim().is_empty()) {
        profile.push_str(&format!("\n\n{}", bio.trim()));
    }
    if !doctor.languages.is_empty() {
        profile.push_str(&format!("\n\nLanguages: {}", doctor.languages.join(", ")));
    }

    let schedule: Vec<String> = WEEK
        .iter()
        .filter_map(|day| {
            doctor
                .availability
                .get(*day)
                .filter(|a| a.is_available)
                .map(|a| format!("- {}: {}", capitalize(day), day_hours(a)))
        })
        .collect();

    if schedule.is_empty() {
        profile.push_str("\n\nNo weekly schedule is published for this doctor yet.");
    } else {
        profile.push_str(&format!("\n\nWeekly schedule:\n{}", schedule.join("\n")));
    }

    profile.push_str("\n\nWould you like to book an appointment?");
    profile
}

fn day_hours(day: &DayAvailability) -> String {
    let mut hours = format_window(&day.start_time, &day.end_time);
    if let (Some(from), Some(to)) = (&day.break_start_time, &day.break_end_time) {
        hours.push_str(&format!(" (break {})", format_window(from, to)));
    }
    hours
}

// -----------------------------------------------------------------------------
// Availability
// -----------------------------------------------------------------------------

pub fn ask_availability_target() -> String {
    "Whose availability would you like to check? Tell me a doctor's name or a specialization.".to_string()
}

/// Today's availability for one doctor
pub fn availability(doctor: &Doctor, today: NaiveDate, slots: &[String], max_slots: usize) -> String {
    let day_name = capitalize(weekday_key(today.weekday()));

    let Some(day) = doctor.availability_on(today) else {
        return format!(
            "{} is not available today ({}). Fee: {}.",
            doctor.display_name(),
            day_name,
            format_fee(doctor.consultation_fee),
        );
    };

    let mut text = format!(
        "{} is available today ({}) from {}",
        doctor.display_name(),
        day_name,
        format_window(&day.start_time, &day.end_time),
    );
    if let (Some(from), Some(to)) = (&day.break_start_time, &day.break_end_time) {
        text.push_str(&format!(", with a break from {}", format_window(from, to)));
    }
    text.push_str(&format!(". Fee: {}.", format_fee(doctor.consultation_fee)));

    if slots.is_empty() {
        text.push_str("\nNo open slots are listed for today.");
    } else {
        text.push_str(&format!("\nOpen slots: {}", format_slots(slots, max_slots)));
    }
    text
}

// -----------------------------------------------------------------------------
// Booking flow
// -----------------------------------------------------------------------------

pub fn login_prompt(action: &str) -> String {
    format!(
        "To {}, please log in to your account first. Once you're signed in, I can help you right away.",
        action
    )
}

pub fn ask_doctor_or_specialization() -> String {
    "Sure, let's book an appointment. Which doctor or specialization would you like to see?".to_string()
}

pub fn ask_date(target: &str) -> String {
    format!(
        "What date would you like to see {}? You can say things like \"tomorrow\", \"next Monday\" or \"20 March\".",
        target
    )
}

pub fn ask_time(target: &str, date: NaiveDate) -> String {
    format!(
        "What time would you prefer on {} with {}? For example \"10am\" or \"3:30 pm\".",
        format_date(date),
        target
    )
}

pub fn booking_summary(target: &str, date: NaiveDate, time: NaiveTime, note: Option<&str>) -> String {
    let mut text = format!(
        "Here is your appointment request:\n\
         - Doctor: {}\n\
         - Date: {}\n\
         - Time: {}\n\n",
        target,
        format_date(date),
        format_time(time),
    );
    if let Some(note) = note {
        text.push_str(note);
        text.push_str("\n\n");
    }
    text.push_str(
        "To confirm, open the doctor's page, pick this slot and complete the payment. \
         You'll receive a confirmation once the booking is done.",
    );
    text
}

pub fn not_working_on(doctor: &Doctor, date: NaiveDate) -> String {
    format!(
        "Note: {} does not usually see patients on {}s, so you may want to pick another date.",
        doctor.display_name(),
        capitalize(weekday_key(date.weekday())),
    )
}

// -----------------------------------------------------------------------------
// Existing appointments
// -----------------------------------------------------------------------------

pub fn cancel_guidance(appointment_id: Option<&str>) -> String {
    let reference = appointment_id
        .map(|id| format!(" for appointment {}", id))
        .unwrap_or_default();
    format!(
        "To cancel{}, go to My Appointments, select the appointment and choose Cancel. \
         Appointments cannot be cancelled within {} hours of booking.\n\n{}",
        reference,
        policy::CANCELLATION_LOCK_HOURS,
        refund_tiers(),
    )
}

pub fn reschedule_guidance(appointment_id: Option<&str>) -> String {
    let reference = appointment_id
        .map(|id| format!(" appointment {}", id))
        .unwrap_or_else(|| " your appointment".to_string());
    format!(
        "To reschedule{}, go to My Appointments, select it and choose Reschedule, then pick a new slot. \
         Rescheduling is possible up to {} hours before the appointment time.",
        reference,
        policy::RESCHEDULE_MIN_NOTICE_HOURS,
    )
}

pub fn view_guidance() -> String {
    "You can see all your upcoming and past appointments under My Appointments in your account. \
     Each entry shows the doctor, date, time and payment status."
        .to_string()
}

// -----------------------------------------------------------------------------
// Help and policy
// -----------------------------------------------------------------------------

pub fn how_to_book() -> String {
    "Booking takes a few steps:\n\
     1. Search for a doctor by name or specialization\n\
     2. Open the doctor's profile and pick a date and time slot\n\
     3. Confirm your details and pay the consultation fee\n\
     4. You'll receive a confirmation with your appointment details\n\
     I can also help you find a doctor right here."
        .to_string()
}

pub fn how_to_cancel() -> String {
    format!(
        "To cancel an appointment, open My Appointments, select the appointment and choose Cancel. \
         Appointments cannot be cancelled within {} hours of booking.\n\n{}",
        policy::CANCELLATION_LOCK_HOURS,
        refund_tiers(),
    )
}

pub fn how_to_reschedule() -> String {
    format!(
        "To reschedule, open My Appointments, select the appointment, choose Reschedule and pick a new slot. \
         Rescheduling is allowed up to {} hours before the appointment time.",
        policy::RESCHEDULE_MIN_NOTICE_HOURS,
    )
}

pub fn payment_info() -> String {
    "We accept UPI, credit and debit cards, and net banking. The consultation fee is paid when you \
     book, and a receipt is sent to your registered email."
        .to_string()
}

fn refund_tiers() -> String {
    format!(
        "Refunds depend on how early you cancel:\n\
         - More than {full} hours before the appointment: {full_pct}% refund\n\
         - Between {partial} and {full} hours before: {partial_pct}% refund\n\
         - Less than {partial} hours before: {late_pct}% refund",
        full = policy::FULL_REFUND_MIN_HOURS,
        partial = policy::PARTIAL_REFUND_MIN_HOURS,
        full_pct = policy::FULL_REFUND_PERCENT,
        partial_pct = policy::PARTIAL_REFUND_PERCENT,
        late_pct = policy::LATE_REFUND_PERCENT,
    )
}

pub fn refund_policy() -> String {
    format!(
        "{}\n\nRefunds go back to your original payment method. \
         Appointments cannot be cancelled within {} hours of booking.",
        refund_tiers(),
        policy::CANCELLATION_LOCK_HOURS,
    )
}

pub fn account_help() -> String {
    "For account issues: use \"Forgot password\" on the login page to reset your password, \
     and check your email or phone for the verification code when signing up. \
     You can update your details under My Profile once you're logged in."
        .to_string()
}

pub fn platform_help() -> String {
    format!(
        "This platform lets you find doctors, check their availability and book appointments online.\n\n{}",
        generic_menu()
    )
}

pub fn complaint() -> String {
    "I'm sorry to hear about your experience. Please share the details through Help & Support \
     in your account, including the appointment and doctor involved, and our team will follow up."
        .to_string()
}

pub fn urgent_help() -> String {
    "If this is a medical emergency, please call your local emergency number or go to the nearest \
     hospital right away. Do not wait for an online appointment."
        .to_string()
}

// -----------------------------------------------------------------------------
// Medical
// -----------------------------------------------------------------------------

pub fn general_medical_guidance() -> String {
    "I can share general health information, but I can't assess your condition. \
     A doctor can give you proper advice after a consultation."
        .to_string()
}

pub fn symptom_guidance() -> String {
    "I'm sorry you're not feeling well. Symptoms can have many causes, and a doctor is the right \
     person to evaluate them."
        .to_string()
}

/// Body, disclaimer, then an offer to find a doctor
pub fn medical_reply(body: &str, specialization: Option<&str>) -> String {
    let offer = match specialization {
        Some(specialization) => format!("Would you like me to find a {} for you?", specialization),
        None => "Would you like me to help you find a doctor?".to_string(),
    };
    format!("{}\n\n{}\n\n{}", body.trim(), MEDICAL_DISCLAIMER, offer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_core::Rating;
    use std::collections::HashMap;

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn doctor() -> Doctor {
        let mut availability = HashMap::new();
        availability.insert(
            "friday".to_string(),
            DayAvailability {
                is_available: true,
                start_time: "09:00".to_string(),
                end_time: "17:00".to_string(),
                break_start_time: Some("13:00".to_string()),
                break_end_time: Some("14:00".to_string()),
            },
        );
        Doctor {
            name: "Priya Sharma".to_string(),
            specialization: "Cardiologist".to_string(),
            rating: Rating {
                average: 4.8,
                count: 212,
            },
            consultation_fee: 800.0,
            experience: 14,
            bio: Some("Interventional cardiologist.".to_string()),
            languages: vec!["English".to_string(), "Hindi".to_string()],
            availability,
        }
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()), "Saturday, 16 March 2024");
        assert_eq!(format_time(NaiveTime::from_hms_opt(15, 0, 0).unwrap()), "3:00 PM");
        assert_eq!(format_fee(800.0), "₹800");
        assert_eq!(format_fee(750.5), "₹750.50");
    }

    #[test]
    fn test_slot_cap() {
        let slots: Vec<String> = (0..10).map(|i| format!("{:02}:00", 8 + i)).collect();
        let text = format_slots(&slots, 8);
        assert!(text.ends_with("(+2 more)"));
        assert!(!text.contains("16:00"));
        assert_eq!(format_slots(&slots[..3], 8), "08:00, 09:00, 10:00");
    }

    #[test]
    fn test_refund_policy_tiers() {
        let text = refund_policy();
        assert!(text.contains("More than 24 hours before the appointment: 100% refund"));
        assert!(text.contains("Between 2 and 24 hours before: 50% refund"));
        assert!(text.contains("Less than 2 hours before: 0% refund"));
        assert!(text.contains("within 12 hours of booking"));
    }

    #[test]
    fn test_availability_today() {
        let slots = vec!["09:00".to_string(), "09:30".to_string()];
        let text = availability(&doctor(), friday(), &slots, 8);
        assert!(text.contains("Dr. Priya Sharma is available today (Friday) from 9:00 AM - 5:00 PM"));
        assert!(text.contains("break from 1:00 PM - 2:00 PM"));
        assert!(text.contains("₹800"));
        assert!(text.contains("09:00, 09:30"));

        let saturday = friday().succ_opt().unwrap();
        assert!(availability(&doctor(), saturday, &[], 8).contains("not available today (Saturday)"));
    }

    #[test]
    fn test_profile_lists_schedule() {
        let text = doctor_profile(&doctor());
        assert!(text.contains("Interventional cardiologist."));
        assert!(text.contains("Languages: English, Hindi"));
        assert!(text.contains("- Friday: 9:00 AM - 5:00 PM (break 1:00 PM - 2:00 PM)"));
    }

    #[test]
    fn test_medical_reply_has_disclaimer() {
        let text = medical_reply("Drink fluids.", Some("General Physician"));
        assert!(text.starts_with("Drink fluids."));
        assert!(text.contains(MEDICAL_DISCLAIMER));
        assert!(text.ends_with("find a General Physician for you?"));
    }

    #[test]
    fn test_describe_target() {
        assert_eq!(describe_target(Some("Sharma"), None), "Dr. Sharma");
        assert_eq!(describe_target(None, Some("Cardiologist")), "a Cardiologist");
        assert_eq!(describe_target(None, None), "a doctor");
    }
}
