use crate::domain::{
    flow::{FlowState, RegistrationFlow, SubmitOutcome},
    notification::Notification,
    share::ShareAction,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepResponse {
    Welcome,
    Gallery {
        index: usize,
        total: usize,
        image: String,
    },
    Form,
    Success {
        created_name: String,
        group_link: String,
    },
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq, Default)]
pub struct FormValuesResponse {
    pub name: String,
    pub phone: String,
    pub birth_date: Option<String>,
    pub faculty: Option<String>,
    pub major: Option<String>,
    pub study_time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    pub id: Uuid,
    pub org_name: String,
    pub step: StepResponse,
    pub form: FormValuesResponse,
    pub major_options: Vec<String>,
    pub errors: BTreeMap<String, String>,
    pub submitting: bool,
    pub notifications: Vec<Notification>,
}

impl SessionResponse {
    /// Snapshots the flow and drains its pending notifications.
    pub fn from_flow(id: Uuid, flow: &mut RegistrationFlow) -> Self {
        let step = match flow.state() {
            FlowState::Welcome => StepResponse::Welcome,
            FlowState::Gallery { index } => StepResponse::Gallery {
                index: *index,
                total: flow.variant().gallery.len(),
                image: flow.gallery_image().unwrap_or_default().to_string(),
            },
            FlowState::Form => StepResponse::Form,
            FlowState::Success { created_name } => StepResponse::Success {
                created_name: created_name.clone(),
                group_link: flow.community().group_link.clone(),
            },
        };

        let input = flow.input();
        let form = FormValuesResponse {
            name: input.name.clone(),
            phone: input.phone.clone(),
            birth_date: input.birth_date.clone(),
            faculty: input.faculty.clone(),
            major: input.major.clone(),
            study_time: input.study_time.clone(),
        };

        let major_options = input
            .major_options()
            .iter()
            .map(|m| m.label().to_string())
            .collect();

        let errors = flow
            .errors()
            .iter()
            .map(|(field, msg)| (field.as_str().to_string(), msg.to_string()))
            .collect();

        Self {
            id,
            org_name: flow.community().org_name.clone(),
            step,
            form,
            major_options,
            errors,
            submitting: flow.is_submitting(),
            notifications: flow.take_notifications(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub outcome: SubmitOutcome,
    pub session: SessionResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ShareResponse {
    pub action: ShareAction,
    pub notifications: Vec<Notification>,
}
