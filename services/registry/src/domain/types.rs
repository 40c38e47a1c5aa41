use chrono::{DateTime, Utc};

use personnel_domain::locale::Locale;
use personnel_domain::reconcile::Identified;
use personnel_domain::unique_id::UniqueId;
use personnel_domain::user::{Gender, UserType};

/// Login account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub user_type: UserType,
    /// Id of the owning row for `user_type` (an employee id for employees).
    pub entity_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub user_type: UserType,
    pub entity_id: i64,
}

#[derive(Debug, Clone)]
pub struct Employee {
    pub id: i64,
    pub unique_id: UniqueId,
    pub tin: String,
    pub gender: Gender,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub unique_id: UniqueId,
    pub tin: String,
    pub gender: Gender,
}

/// Persisted refresh-token session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: i64,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

// ── Employee details ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDetail {
    pub id: i64,
    pub employee_id: i64,
    pub language: Locale,
    pub surname: String,
    pub name: String,
    pub middlename: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Desired state of one detail row. `id == 0` requests a new row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDetailDraft {
    pub id: i64,
    pub employee_id: i64,
    pub language: Locale,
    pub surname: String,
    pub name: String,
    pub middlename: String,
}

impl Identified for EmployeeDetailDraft {
    fn id(&self) -> i64 {
        self.id
    }
}

impl From<EmployeeDetail> for EmployeeDetailDraft {
    fn from(detail: EmployeeDetail) -> Self {
        Self {
            id: detail.id,
            employee_id: detail.employee_id,
            language: detail.language,
            surname: detail.surname,
            name: detail.name,
            middlename: detail.middlename,
        }
    }
}

// ── Research areas ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchArea {
    pub id: i64,
    pub employee_id: i64,
    pub language: Locale,
    pub title: String,
    pub key_topics: Vec<KeyTopic>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResearchArea {
    pub employee_id: i64,
    pub language: Locale,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTopic {
    pub id: i64,
    pub research_area_id: i64,
    pub key_topic_title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Desired state of one key topic. `id == 0` requests a new row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTopicDraft {
    pub id: i64,
    pub key_topic_title: String,
}

impl Identified for KeyTopicDraft {
    fn id(&self) -> i64 {
        self.id
    }
}

impl From<KeyTopic> for KeyTopicDraft {
    fn from(topic: KeyTopic) -> Self {
        Self {
            id: topic.id,
            key_topic_title: topic.key_topic_title,
        }
    }
}
