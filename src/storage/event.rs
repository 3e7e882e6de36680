//! Trigger Event - one alarm firing for one subject

use serde::{Deserialize, Serialize};

/// A single row of the input table: `alarm_type` fired for `subject_id`.
///
/// `is_positive` is the subject's ground-truth label. It belongs to the subject,
/// not the event, so every row of one subject must carry the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerEvent {
    subject_id: String,
    alarm_type: String,
    is_positive: bool,
}

impl TriggerEvent {
    /// Create a trigger event.
    ///
    /// # Arguments
    ///
    /// * `subject_id` - Identifier of the flagged subject
    /// * `alarm_type` - Name of the rule that fired
    /// * `is_positive` - Ground-truth label of the subject
    #[must_use]
    pub fn new(
        subject_id: impl Into<String>,
        alarm_type: impl Into<String>,
        is_positive: bool,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            alarm_type: alarm_type.into(),
            is_positive,
        }
    }

    /// Get the subject ID.
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Get the alarm type.
    #[must_use]
    pub fn alarm_type(&self) -> &str {
        &self.alarm_type
    }

    /// Get the subject's ground-truth label.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.is_positive
    }
}

impl<S: Into<String>, A: Into<String>> From<(S, A, bool)> for TriggerEvent {
    fn from((subject_id, alarm_type, is_positive): (S, A, bool)) -> Self {
        Self::new(subject_id, alarm_type, is_positive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_event_accessors() {
        let event = TriggerEvent::new("42", "velocity", true);
        assert_eq!(event.subject_id(), "42");
        assert_eq!(event.alarm_type(), "velocity");
        assert!(event.is_positive());
    }

    #[test]
    fn test_trigger_event_from_tuple() {
        let event: TriggerEvent = ("7", "geo", false).into();
        assert_eq!(event, TriggerEvent::new("7", "geo", false));
    }

    #[test]
    fn test_trigger_event_json() {
        let event = TriggerEvent::new("1", "A", true);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"subject_id":"1","alarm_type":"A","is_positive":true}"#);
        let back: TriggerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
