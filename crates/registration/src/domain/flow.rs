//! Step state machine for one registration session.
//!
//! `welcome → [gallery…] → form → success`, strictly forward. Submission is
//! split in two halves so the datastore call can run without holding the
//! session lock: [`RegistrationFlow::begin_submit`] validates and arms the
//! in-flight guard, [`RegistrationFlow::complete_submit`] applies the result.

use crate::domain::{
    form::{Field, FieldErrors, FormPatch, FormVariant, RegistrationInput},
    notification::Notification,
    requests::member::CreateMemberRequest,
    share::{Community, ShareAction},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::errors::RepositoryError;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use thiserror::Error;
use utoipa::ToSchema;

pub const PHONE_ALREADY_REGISTERED: &str = "This phone number is already registered.";
pub const PHONE_FORMAT_REJECTED: &str = "Phone number format is invalid.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Welcome,
    Gallery { index: usize },
    Form,
    Success { created_name: String },
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Welcome => "welcome",
            FlowState::Gallery { .. } => "gallery",
            FlowState::Form => "form",
            FlowState::Success { .. } => "success",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("cannot {action} on the {step} step")]
    InvalidTransition {
        step: &'static str,
        action: &'static str,
    },
}

/// How a submit request ended, as reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    Registered,
    Invalid,
    AlreadySubmitting,
    DuplicatePhone,
    RejectedPhone,
    AccessDenied,
    Failed,
}

/// Holds the in-flight flag while a submission is outstanding.
///
/// Dropping it releases the flag, so an insert that errors, panics or is
/// cancelled never leaves the session stuck in "submitting".
#[derive(Debug)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag.clone()))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A validated record waiting for the datastore.
#[derive(Debug)]
pub struct PendingSubmission {
    pub record: CreateMemberRequest,
    _guard: InFlight,
}

#[derive(Debug)]
pub enum SubmitStart {
    Pending(PendingSubmission),
    AlreadySubmitting,
    Rejected(FieldErrors),
}

#[derive(Debug)]
pub struct RegistrationFlow {
    variant: Arc<FormVariant>,
    community: Arc<Community>,
    state: FlowState,
    input: RegistrationInput,
    errors: FieldErrors,
    notifications: Vec<Notification>,
    in_flight: Arc<AtomicBool>,
}

impl RegistrationFlow {
    pub fn new(variant: Arc<FormVariant>, community: Arc<Community>) -> Self {
        Self {
            variant,
            community,
            state: FlowState::Welcome,
            input: RegistrationInput::default(),
            errors: FieldErrors::new(),
            notifications: Vec::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn input(&self) -> &RegistrationInput {
        &self.input
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn variant(&self) -> &FormVariant {
        &self.variant
    }

    pub fn community(&self) -> &Community {
        &self.community
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn gallery_image(&self) -> Option<&str> {
        match self.state {
            FlowState::Gallery { index } => self.variant.gallery.get(index).map(String::as_str),
            _ => None,
        }
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Tap / confirm on the welcome or gallery screen.
    pub fn advance(&mut self) -> Result<&FlowState, FlowError> {
        self.state = match &self.state {
            FlowState::Welcome if self.variant.has_gallery() => FlowState::Gallery { index: 0 },
            FlowState::Welcome => FlowState::Form,
            FlowState::Gallery { index } if index + 1 < self.variant.gallery.len() => {
                FlowState::Gallery { index: index + 1 }
            }
            FlowState::Gallery { .. } => FlowState::Form,
            other => {
                return Err(FlowError::InvalidTransition {
                    step: other.name(),
                    action: "advance",
                });
            }
        };
        Ok(&self.state)
    }

    /// Applies user edits. Errors on touched fields are cleared until the next submit.
    pub fn update(&mut self, patch: FormPatch) -> Result<(), FlowError> {
        self.ensure_form("edit the form")?;

        for field in patch.apply(&mut self.input) {
            self.errors.remove(field);
        }
        Ok(())
    }

    pub fn begin_submit(&mut self, today: NaiveDate) -> Result<SubmitStart, FlowError> {
        self.ensure_form("submit")?;

        if self.is_submitting() {
            return Ok(SubmitStart::AlreadySubmitting);
        }

        let record = match self.input.validate(&self.variant, today) {
            Ok(record) => record,
            Err(errors) => {
                self.errors = errors.clone();
                return Ok(SubmitStart::Rejected(errors));
            }
        };

        let Some(guard) = InFlight::acquire(&self.in_flight) else {
            return Ok(SubmitStart::AlreadySubmitting);
        };

        self.errors.clear();
        self.input.set_phone(record.phone.clone());

        Ok(SubmitStart::Pending(PendingSubmission {
            record,
            _guard: guard,
        }))
    }

    /// Applies the datastore result; `stored_name` is the name echoed back by
    /// the datastore, if it returned one. The toast for this submission is
    /// returned to the caller and never queued on the session.
    pub fn complete_submit(
        &mut self,
        pending: PendingSubmission,
        result: Result<Option<String>, RepositoryError>,
    ) -> (SubmitOutcome, Notification) {
        let PendingSubmission { record, _guard } = pending;

        match result {
            Ok(stored_name) => {
                let created_name = stored_name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or(record.name);

                self.state = FlowState::Success { created_name };
                self.input = RegistrationInput::default();
                self.errors.clear();
                (
                    SubmitOutcome::Registered,
                    Notification::success("Registration complete")
                        .with_description(format!("Welcome to {}!", self.community.org_name)),
                )
            }
            Err(RepositoryError::Conflict(_)) => {
                self.errors.insert(Field::Phone, PHONE_ALREADY_REGISTERED);
                (
                    SubmitOutcome::DuplicatePhone,
                    Notification::warning("Phone number already registered")
                        .with_description("Use another number or contact the organizers."),
                )
            }
            Err(RepositoryError::Constraint(_)) => {
                self.errors.insert(Field::Phone, PHONE_FORMAT_REJECTED);
                (
                    SubmitOutcome::RejectedPhone,
                    Notification::error("Invalid phone number format")
                        .with_description("Use the 08… or +62… format."),
                )
            }
            Err(RepositoryError::Forbidden(_)) => (
                SubmitOutcome::AccessDenied,
                Notification::error("Access denied")
                    .with_description("Registrations cannot be saved right now."),
            ),
            Err(RepositoryError::Unknown(message)) => (
                SubmitOutcome::Failed,
                Notification::error("Failed to save registration")
                    .with_description(message.unwrap_or_else(|| "Something went wrong.".into())),
            ),
        }
    }

    /// Reports a submission that ended without any datastore answer.
    pub fn submit_interrupted(description: impl Into<String>) -> (SubmitOutcome, Notification) {
        (
            SubmitOutcome::Failed,
            Notification::error("Failed to save registration").with_description(description),
        )
    }

    pub fn share(&mut self, native_available: bool) -> ShareAction {
        let (action, notification) = self.community.share(native_available);
        self.notifications.extend(notification);
        action
    }

    fn ensure_form(&self, action: &'static str) -> Result<(), FlowError> {
        match self.state {
            FlowState::Form => Ok(()),
            ref other => Err(FlowError::InvalidTransition {
                step: other.name(),
                action,
            }),
        }
    }
}
