//! Prompt construction for the external AI
//!
//! Two kinds of request are sent:
//! - closed-set classification, answered with a JSON object
//! - free-form replies (general medical information, fallback chat) built
//!   from the recent conversation history

use chrono::NaiveDate;
use medassist_core::{Intent, Turn, TurnRole};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl From<TurnRole> for Role {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
        }
    }
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role.into(),
            content: turn.content.clone(),
        }
    }
}

/// One-line description of each intent for the classification prompt
pub fn describe_intent(intent: Intent) -> &'static str {
    match intent {
        Intent::Greeting => "the user says hello",
        Intent::Farewell => "the user says goodbye",
        Intent::Thanks => "the user thanks the assistant",
        Intent::FindDoctor => "search for doctors by name or specialization",
        Intent::BookAppointment => "book or schedule a new appointment",
        Intent::CheckAvailability => "ask when a doctor or specialization is available",
        Intent::CancelAppointment => "cancel an existing appointment",
        Intent::RescheduleAppointment => "move an existing appointment to another time",
        Intent::ViewAppointments => "list or check the user's own appointments",
        Intent::HowToBook => "ask how the booking process works",
        Intent::HowToCancel => "ask how cancelling works",
        Intent::HowToReschedule => "ask how rescheduling works",
        Intent::DoctorDetails => "ask for a specific doctor's profile",
        Intent::PaymentInfo => "ask about payment methods or charges",
        Intent::RefundQuery => "ask about refunds",
        Intent::AccountHelp => "login, password, registration or profile problems",
        Intent::PlatformHelp => "ask what the platform or assistant can do",
        Intent::MedicalQuery => "general health or medicine question",
        Intent::SymptomAnalysis => "describe their own symptoms",
        Intent::Complaint => "complain about a doctor or the service",
        Intent::UrgentHelp => "emergency or urgent medical situation",
        Intent::Other => "anything else",
    }
}

/// System prompt for closed-set classification
pub fn classification_system_prompt(today: NaiveDate) -> String {
    let intents = Intent::ALL
        .iter()
        .map(|intent| format!("- {}: {}", intent.as_str(), describe_intent(*intent)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You classify messages sent to the assistant of a doctor appointment booking platform.\n\
         Reply with one JSON object and nothing else, in this shape:\n\
         {{\"intent\": \"<intent>\", \"entities\": {{\"specialization\": null, \"doctorName\": null, \
         \"date\": null, \"time\": null, \"appointmentId\": null}}, \"confidence\": 0.0}}\n\n\
         Intents (use exactly one of these names):\n{intents}\n\n\
         Entity rules:\n\
         - specialization: medical specialty in title case, e.g. \"Cardiologist\"\n\
         - doctorName: the doctor's name without \"Dr.\"\n\
         - date: YYYY-MM-DD, resolve relative dates against today ({today})\n\
         - time: 24-hour HH:MM\n\
         - appointmentId: the appointment reference if one is given\n\
         Use null for anything not mentioned.",
        intents = intents,
        today = today.format("%Y-%m-%d"),
    )
}

/// Messages for classifying one user message
pub fn classification_messages(message: &str, today: NaiveDate) -> Vec<Message> {
    vec![
        Message::system(classification_system_prompt(today)),
        Message::user(message),
    ]
}

/// System prompt for free-form replies
pub const FREEFORM_SYSTEM_PROMPT: &str = "You are the assistant of a doctor appointment booking platform. \
Answer briefly and politely. You may share general health information but never give a diagnosis \
or prescribe medication. For anything beyond general information, suggest consulting a doctor.";

/// Messages for a free-form reply: system prompt, recent history, then the prompt
pub fn freeform_messages(prompt: &str, history: &[Turn]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(FREEFORM_SYSTEM_PROMPT));
    messages.extend(history.iter().map(Message::from));
    messages.push(Message::user(prompt));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_prompt_lists_every_intent() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let prompt = classification_system_prompt(today);
        for intent in Intent::ALL {
            assert!(prompt.contains(&format!("- {}:", intent.as_str())), "{}", intent);
        }
        assert!(prompt.contains("2024-03-15"));
    }

    #[test]
    fn test_freeform_messages_keep_history_order() {
        let history = vec![Turn::user("hi"), Turn::assistant("Hello!")];
        let messages = freeform_messages("what is a cardiologist?", &history);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1], Message::user("hi"));
        assert_eq!(messages[2], Message::assistant("Hello!"));
        assert_eq!(messages[3].content, "what is a cardiologist?");
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Message::system("x")).unwrap();
        assert!(json.contains("\"system\""));
    }
}
