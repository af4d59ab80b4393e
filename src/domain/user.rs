use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// First level every account starts at
pub const BASE_LEVEL: i64 = 100;

/// Highest level the derived current-level can report
pub const LEVEL_CEILING: i64 = 400;

/// Authorization role, stored on the user row and checked exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn from_str(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Role assigned at signup. Accounts whose username contains "admin"
    /// register as admins (legacy policy, kept for compatibility); every
    /// authorization check afterwards reads the stored role.
    pub fn for_new_user(username: &str) -> Self {
        if username.to_lowercase().contains("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }
}

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    Free,
    Pro,
    Enterprise,
}

impl Subscription {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }
}

/// A stored user account
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub subscription: Subscription,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Threshold-derived achievement label
#[derive(Debug, Clone, Serialize)]
pub struct Badge {
    pub name: &'static str,
    pub icon: &'static str,
    pub earned_at: DateTime<Utc>,
}

/// Badge catalog entry (threshold definitions, also served to admins)
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BadgeSpec {
    pub name: &'static str,
    pub icon: &'static str,
    pub threshold: i64,
}

pub const BADGES: [BadgeSpec; 3] = [
    BadgeSpec {
        name: "First Steps",
        icon: "\u{1F3AF}",
        threshold: 1,
    },
    BadgeSpec {
        name: "Dedicated Learner",
        icon: "\u{1F4DA}",
        threshold: 10,
    },
    BadgeSpec {
        name: "Python Expert",
        icon: "\u{1F40D}",
        threshold: 50,
    },
];

/// Stats recomputed on demand from the progress rows; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub current_level: i64,
    pub total_xp: i64,
    pub completed_levels: i64,
    pub streak: i64,
    pub badges: Vec<Badge>,
    pub achievements: Vec<serde_json::Value>,
}

impl UserStats {
    /// Derive stats from the aggregate of a user's completed progress rows.
    ///
    /// `first_completed_at` stamps the "First Steps" badge; the later badges
    /// carry the recomputation time, matching the original service.
    pub fn derive(
        completed_levels: i64,
        total_xp: i64,
        max_completed: Option<i64>,
        first_completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        let current_level = match max_completed {
            Some(max) => (max + 1).min(LEVEL_CEILING),
            None => BASE_LEVEL,
        };

        let badges = BADGES
            .iter()
            .filter(|spec| completed_levels >= spec.threshold)
            .map(|spec| Badge {
                name: spec.name,
                icon: spec.icon,
                earned_at: if spec.threshold == 1 {
                    first_completed_at.unwrap_or_else(Utc::now)
                } else {
                    Utc::now()
                },
            })
            .collect();

        Self {
            current_level,
            total_xp,
            completed_levels,
            streak: 0,
            badges,
            achievements: Vec::new(),
        }
    }
}

/// User payload returned by the auth endpoints
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub current_level: i64,
    pub total_xp: i64,
    pub completed_levels: i64,
    pub streak: i64,
    pub badges: Vec<Badge>,
    pub achievements: Vec<serde_json::Value>,
    pub subscription: Subscription,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn new(user: &User, stats: &UserStats) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            current_level: stats.current_level,
            total_xp: stats.total_xp,
            completed_levels: stats.completed_levels,
            streak: stats.streak,
            badges: stats.badges.clone(),
            achievements: stats.achievements.clone(),
            subscription: user.subscription,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}
