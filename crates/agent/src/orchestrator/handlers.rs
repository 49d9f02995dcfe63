//! Per-intent handlers
//!
//! Each handler sees the slots from the current message and the session with
//! its context already merged.

use medassist_core::{DoctorQuery, Entities, Intent, Session, Turn};

use super::Orchestrator;
use crate::responses;
use crate::AgentError;

/// Doctor or specialization a request is about
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SearchTarget {
    pub doctor_name: Option<String>,
    pub specialization: Option<String>,
}

impl SearchTarget {
    /// The current message's reference if it names one, else the one the
    /// latest referring turn supplied.
    ///
    /// Taken as a pair so a name and a specialization from different turns
    /// never narrow one search together.
    pub fn resolve(entities: &Entities, session: &Session) -> Self {
        if entities.has_doctor_reference() {
            Self {
                doctor_name: entities.doctor_name.clone(),
                specialization: entities.specialization.clone(),
            }
        } else {
            let (doctor_name, specialization) = session.context.doctor_reference();
            Self {
                doctor_name: doctor_name.map(str::to_string),
                specialization: specialization.map(str::to_string),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.doctor_name.is_none() && self.specialization.is_none()
    }

    pub fn describe(&self) -> String {
        responses::describe_target(self.doctor_name.as_deref(), self.specialization.as_deref())
    }

    pub fn query(&self, limit: usize) -> DoctorQuery {
        DoctorQuery::new(limit)
            .with_doctor_name(self.doctor_name.clone())
            .with_specialization(self.specialization.clone())
    }
}

impl Orchestrator {
    pub(super) async fn dispatch(
        &self,
        intent: Intent,
        message: &str,
        entities: &Entities,
        session: &Session,
        recent: &[Turn],
        caller: Option<&str>,
    ) -> Result<String, AgentError> {
        if intent.requires_identity() && caller.is_none() {
            return Ok(responses::login_prompt(login_action(intent)));
        }

        let response = match intent {
            Intent::Greeting => responses::greeting(),
            Intent::Farewell => responses::farewell(),
            Intent::Thanks => responses::thanks(),

            Intent::FindDoctor => self.handle_find_doctor(entities, session).await?,
            Intent::BookAppointment => self.handle_booking(entities, session).await?,
            Intent::CheckAvailability => self.handle_availability(entities, session).await?,
            Intent::DoctorDetails => self.handle_doctor_details(entities, session).await?,

            Intent::CancelAppointment => {
                responses::cancel_guidance(entities.appointment_id.as_deref())
            }
            Intent::RescheduleAppointment => {
                responses::reschedule_guidance(entities.appointment_id.as_deref())
            }
            Intent::ViewAppointments => responses::view_guidance(),

            Intent::HowToBook => responses::how_to_book(),
            Intent::HowToCancel => responses::how_to_cancel(),
            Intent::HowToReschedule => responses::how_to_reschedule(),
            Intent::PaymentInfo => responses::payment_info(),
            Intent::RefundQuery => responses::refund_policy(),
            Intent::AccountHelp => responses::account_help(),
            Intent::PlatformHelp => responses::platform_help(),
            Intent::Complaint => responses::complaint(),
            Intent::UrgentHelp => responses::urgent_help(),

            Intent::MedicalQuery | Intent::SymptomAnalysis => {
                self.handle_medical(intent, message, session, recent).await
            }
            Intent::Other => self.handle_other(message, recent).await,
        };

        Ok(response)
    }

    async fn handle_find_doctor(
        &self,
        entities: &Entities,
        session: &Session,
    ) -> Result<String, AgentError> {
        let target = SearchTarget::resolve(entities, session);
        if target.is_empty() {
            return Ok(responses::find_doctor_guidance());
        }

        let doctors = self
            .directory
            .find_doctors(&target.query(self.config.max_doctor_results))
            .await?;

        if doctors.is_empty() {
            Ok(responses::no_doctors_found(&target.describe()))
        } else {
            Ok(responses::doctor_list(&target.describe(), &doctors))
        }
    }

    /// Walk the booking slots: target, then date, then time, then summary.
    /// The summary is a request; the booking itself happens outside chat.
    async fn handle_booking(
        &self,
        entities: &Entities,
        session: &Session,
    ) -> Result<String, AgentError> {
        let target = SearchTarget::resolve(entities, session);
        if target.is_empty() {
            return Ok(responses::ask_doctor_or_specialization());
        }
        let description = target.describe();

        let Some(date) = entities.date.or(session.context.date) else {
            return Ok(responses::ask_date(&description));
        };
        let Some(time) = entities.time.or(session.context.time) else {
            return Ok(responses::ask_time(&description, date));
        };

        // A named doctor's weekly schedule can flag an unlikely day
        let mut note = None;
        if target.doctor_name.is_some() {
            let doctors = self.directory.find_doctors(&target.query(1)).await?;
            if let Some(doctor) = doctors.first() {
                if doctor.availability_on(date).is_none() {
                    note = Some(responses::not_working_on(doctor, date));
                }
            }
        }

        Ok(responses::booking_summary(&description, date, time, note.as_deref()))
    }

    /// Today's window, break, fee and open slots for each matching doctor
    async fn handle_availability(
        &self,
        entities: &Entities,
        session: &Session,
    ) -> Result<String, AgentError> {
        let target = SearchTarget::resolve(entities, session);
        if target.is_empty() {
            return Ok(responses::ask_availability_target());
        }

        let doctors = self
            .directory
            .find_doctors(&target.query(self.config.max_doctor_results))
            .await?;
        if doctors.is_empty() {
            return Ok(responses::no_doctors_found(&target.describe()));
        }

        let today = self.clock.today();
        let mut sections = Vec::with_capacity(doctors.len());
        for doctor in &doctors {
            // A malformed record only costs that doctor's section
            let slots = match self.directory.open_slots(doctor, today).await {
                Ok(slots) => slots,
                Err(e) => {
                    tracing::warn!(
                        doctor = %doctor.name,
                        error = %e,
                        "Skipping doctor with unreadable schedule"
                    );
                    continue;
                }
            };
            sections.push(responses::availability(
                doctor,
                today,
                &slots,
                self.config.max_listed_slots,
            ));
        }

        if sections.is_empty() {
            return Ok(responses::no_doctors_found(&target.describe()));
        }
        Ok(sections.join("\n\n"))
    }

    async fn handle_doctor_details(
        &self,
        entities: &Entities,
        session: &Session,
    ) -> Result<String, AgentError> {
        let Some(name) = entities
            .doctor_name
            .clone()
            .or_else(|| session.context.doctor_name.clone())
        else {
            return Ok(responses::ask_doctor_name());
        };

        let query = DoctorQuery::new(1).with_doctor_name(Some(name.clone()));
        match self.directory.find_doctors(&query).await?.first() {
            Some(doctor) => Ok(responses::doctor_profile(doctor)),
            None => Ok(responses::no_doctors_found(&responses::describe_target(
                Some(&name),
                None,
            ))),
        }
    }

    async fn handle_medical(
        &self,
        intent: Intent,
        message: &str,
        session: &Session,
        recent: &[Turn],
    ) -> String {
        let generated = match &self.ai {
            Some(ai) => ai.generate_freeform(message, recent).await,
            None => None,
        };

        let body = generated.unwrap_or_else(|| {
            if intent == Intent::SymptomAnalysis {
                responses::symptom_guidance()
            } else {
                responses::general_medical_guidance()
            }
        });

        responses::medical_reply(&body, session.context.specialization.as_deref())
    }

    async fn handle_other(&self, message: &str, recent: &[Turn]) -> String {
        let generated = match &self.ai {
            Some(ai) => ai.generate_freeform(message, recent).await,
            None => None,
        };
        generated.unwrap_or_else(responses::generic_menu)
    }
}

fn login_action(intent: Intent) -> &'static str {
    match intent {
        Intent::BookAppointment => "book an appointment",
        Intent::CancelAppointment => "cancel an appointment",
        Intent::RescheduleAppointment => "reschedule an appointment",
        _ => "view your appointments",
    }
}
