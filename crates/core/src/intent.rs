//! Intent enumeration
//!
//! The closed set of purposes a user message can be classified into.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Classified purpose of one user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Farewell,
    Thanks,
    FindDoctor,
    BookAppointment,
    CheckAvailability,
    CancelAppointment,
    RescheduleAppointment,
    ViewAppointments,
    HowToBook,
    HowToCancel,
    HowToReschedule,
    DoctorDetails,
    PaymentInfo,
    RefundQuery,
    AccountHelp,
    PlatformHelp,
    MedicalQuery,
    SymptomAnalysis,
    Complaint,
    UrgentHelp,
    /// Generic intent used when nothing more specific applies
    #[default]
    Other,
}

impl Intent {
    /// Every intent, in declaration order
    pub const ALL: [Intent; 22] = [
        Intent::Greeting,
        Intent::Farewell,
        Intent::Thanks,
        Intent::FindDoctor,
        Intent::BookAppointment,
        Intent::CheckAvailability,
        Intent::CancelAppointment,
        Intent::RescheduleAppointment,
        Intent::ViewAppointments,
        Intent::HowToBook,
        Intent::HowToCancel,
        Intent::HowToReschedule,
        Intent::DoctorDetails,
        Intent::PaymentInfo,
        Intent::RefundQuery,
        Intent::AccountHelp,
        Intent::PlatformHelp,
        Intent::MedicalQuery,
        Intent::SymptomAnalysis,
        Intent::Complaint,
        Intent::UrgentHelp,
        Intent::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Farewell => "farewell",
            Intent::Thanks => "thanks",
            Intent::FindDoctor => "find_doctor",
            Intent::BookAppointment => "book_appointment",
            Intent::CheckAvailability => "check_availability",
            Intent::CancelAppointment => "cancel_appointment",
            Intent::RescheduleAppointment => "reschedule_appointment",
            Intent::ViewAppointments => "view_appointments",
            Intent::HowToBook => "how_to_book",
            Intent::HowToCancel => "how_to_cancel",
            Intent::HowToReschedule => "how_to_reschedule",
            Intent::DoctorDetails => "doctor_details",
            Intent::PaymentInfo => "payment_info",
            Intent::RefundQuery => "refund_query",
            Intent::AccountHelp => "account_help",
            Intent::PlatformHelp => "platform_help",
            Intent::MedicalQuery => "medical_query",
            Intent::SymptomAnalysis => "symptom_analysis",
            Intent::Complaint => "complaint",
            Intent::UrgentHelp => "urgent_help",
            Intent::Other => "other",
        }
    }

    /// Whether this is the generic catch-all intent
    pub fn is_generic(&self) -> bool {
        matches!(self, Intent::Other)
    }

    /// Intents that act on the caller's own appointments and need a signed-in user
    pub fn requires_identity(&self) -> bool {
        matches!(
            self,
            Intent::BookAppointment
                | Intent::CancelAppointment
                | Intent::RescheduleAppointment
                | Intent::ViewAppointments
        )
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == normalized)
            .ok_or_else(|| Error::UnknownIntent(s.to_string()))
    }
}
