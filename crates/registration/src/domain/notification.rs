use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A toast the client shows once and then forgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title)
    }
}
