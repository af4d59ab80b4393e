use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Feedback workflow status. Admins may move a record in any direction;
/// there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    Pending,
    Reviewed,
    Resolved,
}

impl FeedbackStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "reviewed" => Some(Self::Reviewed),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Resolved => "resolved",
        }
    }
}

/// A feedback record. Created by any authenticated user, mutated only by
/// admin status transitions, never deleted.
#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub id: i64,
    pub level_number: i64,
    pub user_id: i64,
    pub username: String,
    pub rating: i64,
    pub category: String,
    pub comment: String,
    pub submitted_at: DateTime<Utc>,
    pub status: FeedbackStatus,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        for s in ["pending", "reviewed", "resolved"] {
            assert_eq!(FeedbackStatus::from_str(s).unwrap().as_str(), s);
        }
        assert!(FeedbackStatus::from_str("closed").is_none());
        assert!(FeedbackStatus::from_str("Pending").is_none());
    }
}
