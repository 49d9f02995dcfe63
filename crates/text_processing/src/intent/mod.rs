//! Rule-based intent classification
//!
//! The fallback classifier is an ordered list of [`IntentRule`]s evaluated
//! top to bottom; the first rule whose predicate holds decides the intent.
//! Keeping the order in one table makes precedence auditable and lets each
//! rule be tested on its own.
//!
//! Precedence, highest first:
//! 1. greeting / farewell / thanks (whole message)
//! 2. "how do I / how to" + book, cancel or reschedule
//! 3. refund, then payment
//! 4. availability keyword together with a doctor or specialization
//! 5. cancel, reschedule, view appointments
//! 6. complaint
//! 7. book / schedule
//! 8. doctor details
//! 9. find doctor (keyword or extracted specialization)
//! 10. account help, then platform help
//! 11. urgent, symptom, then general medical keywords
//! 12. any extracted doctor or specialization defaults to find doctor
//!
//! Anything else is [`Intent::Other`].
//!
//! # Example
//!
//! ```ignore
//! use medassist_core::Entities;
//! use medassist_text_processing::IntentClassifier;
//!
//! let classifier = IntentClassifier::new();
//! let result = classifier.classify("how do I cancel?", &Entities::new());
//!
//! assert_eq!(result.intent, Intent::HowToCancel);
//! ```

use medassist_core::{Classification, Entities, Intent};
use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// STATIC REGEX PATTERNS - Compiled once at program start
// =============================================================================

// Whole-message patterns, matched against the normalized text
static GREETING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:hi+|hello+|hey+|hiya|howdy|namaste|greetings|good (?:morning|afternoon|evening|day))(?: there| doctor| all| team)?$").unwrap()
});
static FAREWELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:ok(?:ay)? )?(?:bye|bye bye|goodbye|good bye|see you|see ya|see you later|take care|good night|talk later)$").unwrap()
});
static THANKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:ok(?:ay)? )?(?:thanks?|thank you|thx|ty|much appreciated|thanks for (?:the|your) help)(?: so much| a lot| very much)?$").unwrap()
});

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s']").unwrap());

// Keyword groups, matched against the lowercased text
static HOW_TO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bhow (?:do|can|should|would) (?:i|we)\b|\bhow to\b|\bsteps to\b|\bprocess (?:to|for)\b").unwrap()
});
static BOOK_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bbook|\bschedul").unwrap());
static CANCEL_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcancel").unwrap());
static RESCHEDULE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\breschedul|\bpostpone").unwrap());

static REFUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\brefund|\bmoney back\b|\breimburse").unwrap());
static PAYMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bpay(?:ment|ments|ing)?\b|\bupi\b|\b(?:credit|debit) card\b|\bnet ?banking\b|\binvoice\b|\breceipt\b|\bbilling\b|\btransaction\b").unwrap()
});

static AVAILABILITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bavailab(?:le|ility)\b|\bslots?\b|\btimings?\b|\bworking hours\b|\bfree (?:today|tomorrow|on)\b|\bwhen can i (?:see|meet|visit)\b").unwrap()
});

static CANCEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bcancel").unwrap());
static RESCHEDULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\breschedul|\bpostpone|\b(?:change|move|shift)\b.*\b(?:appointment|booking)\b").unwrap()
});
static VIEW_APPOINTMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:my|upcoming|existing|previous|past|all)\s+(?:appointments?|bookings?)\b|\b(?:show|view|see|list|check)\b.*\b(?:appointments|bookings)\b|\bdo i have (?:an?|any) (?:appointments?|bookings?)\b").unwrap()
});

static COMPLAINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bcomplain|\bdisappointed\b|\bunhappy\b|\bterrible\b|\bworst\b|\brude\b|\bnot satisfied\b|\bbad (?:experience|service)\b|\bpoor service\b").unwrap()
});

static BOOK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bbook|\bschedule\b|\b(?:make|need|want|get|fix|set up) an? appointment\b").unwrap()
});

static DOCTOR_DETAILS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\babout (?:dr\b|doctor\b)|\bwho is (?:dr\b|doctor\b)|\b(?:dr|doctor)\b.*\b(?:profile|qualifications?|background|bio)\b|\b(?:profile|details|qualifications?|experience) of (?:dr\b|doctor\b)").unwrap()
});

static FIND_DOCTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfind\b|\bsearch\b|\blook(?:ing)? for\b|\brecommend|\bsuggest|\bshow (?:me )?(?:doctors|specialists)\b|\blist (?:of )?doctors\b|\b(?:best|good|top) (?:doctors?|specialists?)\b|\bwhich doctors?\b|\bneed an? (?:doctor|specialist)\b|\bdoctors? near\b").unwrap()
});

static ACCOUNT_HELP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bpassword\b|\blog ?in\b|\bsign ?(?:in|up)\b|\bregist(?:er|ration)\b|\bmy account\b|\bmy profile\b|\botp\b|\bverify (?:my )?(?:email|phone)\b").unwrap()
});
static PLATFORM_HELP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^help$|\bhow does (?:this|the) (?:app|platform|site|website|service) work\b|\bwhat can you do\b|\bhow (?:do i )?use (?:this|the) (?:app|platform|site|website)\b|\bcontact support\b|\bcustomer (?:care|support)\b|\bsupport team\b").unwrap()
});

static URGENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bemergency\b|\burgent|\bambulance\b|\bchest pain\b|\bcan'?t breathe\b|\bdifficulty breathing\b|\bunconscious\b|\bheart attack\b|\bstroke\b|\bsevere bleeding\b|\bsuicid|\boverdose\b").unwrap()
});
static SYMPTOM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bsymptoms?\b|\bsuffering from\b|\bi(?: am|'m|'ve been)? (?:having|feeling|have|feel|got)\b.*\b(?:pain|ache|fever|cough|cold|rash|itch\w*|headache|dizz\w*|nause\w*|vomit\w*|swelling|bleeding|sore)\b|\bmy \w+ (?:hurts|aches|is swollen|is itchy)\b").unwrap()
});
static MEDICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bdisease\b|\bmedicines?\b|\bmedications?\b|\btablets?\b|\bdosage\b|\bside effects?\b|\bdiabetes\b|\bblood pressure\b|\bcholesterol\b|\bvitamins?\b|\bvaccin|\bdiet\b|\bpain\b|\bfever\b|\bheadache\b|\bcough\b|\bcold\b|\binfection\b|\ballerg").unwrap()
});

/// What a rule predicate sees
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// Lowercased message
    pub text: &'a str,
    /// Lowercased message without punctuation, single-spaced
    pub normalized: &'a str,
    /// Slots extracted from the same message
    pub entities: &'a Entities,
}

/// One `(predicate, intent)` entry of the cascade
#[derive(Clone)]
pub struct IntentRule {
    /// Rule identifier for logs and tests
    pub name: &'static str,
    pub intent: Intent,
    predicate: fn(&RuleInput<'_>) -> bool,
}

impl IntentRule {
    pub fn new(name: &'static str, intent: Intent, predicate: fn(&RuleInput<'_>) -> bool) -> Self {
        Self {
            name,
            intent,
            predicate,
        }
    }

    pub fn matches(&self, input: &RuleInput<'_>) -> bool {
        (self.predicate)(input)
    }
}

impl std::fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRule")
            .field("name", &self.name)
            .field("intent", &self.intent)
            .finish()
    }
}

/// The cascade in precedence order
pub fn default_rules() -> Vec<IntentRule> {
    vec![
        IntentRule::new("greeting", Intent::Greeting, |i| GREETING.is_match(i.normalized)),
        IntentRule::new("farewell", Intent::Farewell, |i| FAREWELL.is_match(i.normalized)),
        IntentRule::new("thanks", Intent::Thanks, |i| THANKS.is_match(i.normalized)),
        IntentRule::new("how_to_reschedule", Intent::HowToReschedule, |i| {
            HOW_TO.is_match(i.text) && RESCHEDULE_WORD.is_match(i.text)
        }),
        IntentRule::new("how_to_cancel", Intent::HowToCancel, |i| {
            HOW_TO.is_match(i.text) && CANCEL_WORD.is_match(i.text)
        }),
        IntentRule::new("how_to_book", Intent::HowToBook, |i| {
            HOW_TO.is_match(i.text) && BOOK_WORD.is_match(i.text)
        }),
        IntentRule::new("refund", Intent::RefundQuery, |i| REFUND.is_match(i.text)),
        IntentRule::new("payment", Intent::PaymentInfo, |i| PAYMENT.is_match(i.text)),
        IntentRule::new("availability", Intent::CheckAvailability, |i| {
            AVAILABILITY.is_match(i.text) && i.entities.has_doctor_reference()
        }),
        IntentRule::new("cancel", Intent::CancelAppointment, |i| CANCEL.is_match(i.text)),
        IntentRule::new("reschedule", Intent::RescheduleAppointment, |i| {
            RESCHEDULE.is_match(i.text)
        }),
        IntentRule::new("view_appointments", Intent::ViewAppointments, |i| {
            VIEW_APPOINTMENTS.is_match(i.text)
        }),
        IntentRule::new("complaint", Intent::Complaint, |i| COMPLAINT.is_match(i.text)),
        IntentRule::new("book", Intent::BookAppointment, |i| BOOK.is_match(i.text)),
        IntentRule::new("doctor_details", Intent::DoctorDetails, |i| {
            DOCTOR_DETAILS.is_match(i.text)
        }),
        IntentRule::new("find_doctor", Intent::FindDoctor, |i| {
            FIND_DOCTOR.is_match(i.text) || i.entities.specialization.is_some()
        }),
        IntentRule::new("account_help", Intent::AccountHelp, |i| ACCOUNT_HELP.is_match(i.text)),
        IntentRule::new("platform_help", Intent::PlatformHelp, |i| {
            PLATFORM_HELP.is_match(i.normalized)
        }),
        IntentRule::new("urgent", Intent::UrgentHelp, |i| URGENT.is_match(i.text)),
        IntentRule::new("symptom", Intent::SymptomAnalysis, |i| SYMPTOM.is_match(i.text)),
        IntentRule::new("medical", Intent::MedicalQuery, |i| MEDICAL.is_match(i.text)),
        IntentRule::new("doctor_reference", Intent::FindDoctor, |i| {
            i.entities.has_doctor_reference()
        }),
    ]
}

/// Lowercase, drop punctuation, collapse whitespace
pub fn normalize(message: &str) -> String {
    NON_WORD
        .replace_all(&message.to_lowercase(), " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deterministic fallback classifier
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Classifier over a custom rule list
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// First matching rule, if any
    pub fn matching_rule(&self, message: &str, entities: &Entities) -> Option<&IntentRule> {
        let text = message.to_lowercase();
        let normalized = normalize(message);
        let input = RuleInput {
            text: &text,
            normalized: &normalized,
            entities,
        };
        self.rules.iter().find(|rule| rule.matches(&input))
    }

    /// Classify a message given the slots already extracted from it
    pub fn classify(&self, message: &str, entities: &Entities) -> Classification {
        let intent = match self.matching_rule(message, entities) {
            Some(rule) => {
                tracing::debug!(rule = rule.name, intent = %rule.intent, "Rule matched");
                rule.intent
            }
            None => Intent::Other,
        };
        Classification::scored(intent, entities.clone())
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
