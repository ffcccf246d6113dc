use crate::domain::notification::Notification;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Organization details shown on the success screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Community {
    pub org_name: String,
    pub group_link: String,
}

/// What the client should do with the chat-group link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ShareAction {
    NativeShare {
        title: String,
        text: String,
        url: String,
    },
    CopyToClipboard {
        url: String,
    },
}

impl Community {
    /// Prefers the host's native share sheet and falls back to the clipboard.
    pub fn share(&self, native_available: bool) -> (ShareAction, Option<Notification>) {
        if native_available {
            let action = ShareAction::NativeShare {
                title: format!("{} – Chat Group", self.org_name),
                text: format!("Come join the {} chat group!", self.org_name),
                url: self.group_link.clone(),
            };
            return (action, None);
        }

        let notification =
            Notification::info("Link copied").with_description("Group link copied to clipboard.");
        (
            ShareAction::CopyToClipboard {
                url: self.group_link.clone(),
            },
            Some(notification),
        )
    }
}
