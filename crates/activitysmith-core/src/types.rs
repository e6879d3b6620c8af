use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SendPushNotification,
    StartLiveActivity,
    UpdateLiveActivity,
    EndLiveActivity,
}

impl ActionKind {
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::SendPushNotification,
            ActionKind::StartLiveActivity,
            ActionKind::UpdateLiveActivity,
            ActionKind::EndLiveActivity,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::SendPushNotification => "send_push_notification",
            ActionKind::StartLiveActivity => "start_live_activity",
            ActionKind::UpdateLiveActivity => "update_live_activity",
            ActionKind::EndLiveActivity => "end_live_activity",
        }
    }

    /// Update and end address an existing Live Activity by id.
    pub fn requires_live_activity_id(self) -> bool {
        matches!(
            self,
            ActionKind::UpdateLiveActivity | ActionKind::EndLiveActivity
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// A credential that must never show up in logs or debug dumps.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("\"\"")
        } else {
            f.write_str("***")
        }
    }
}

impl Serialize for Secret {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if self.0.is_empty() { "" } else { "***" })
    }
}
