use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use personnel_auth_types::token::TokenManager;
use personnel_domain::locale::Locale;
use personnel_domain::messages::Messages;
use personnel_domain::unique_id::UniqueId;
use personnel_domain::user::{Gender, UserType};
use personnel_registry::domain::repository::{
    EmployeeDetailRepository, EmployeeRepository, ResearchAreaRepository, SessionRepository, Store,
    Transaction, UserRepository,
};
use personnel_registry::domain::types::{
    Employee, EmployeeDetail, EmployeeDetailDraft, KeyTopic, KeyTopicDraft, NewEmployee,
    NewResearchArea, NewSession, NewUser, ResearchArea, Session, User,
};
use personnel_registry::error::RegistryError;
use personnel_testing::auth::test_token_manager;

pub fn messages() -> Arc<Messages> {
    Arc::new(Messages::builtin(Locale::En))
}

pub fn tokens() -> Arc<TokenManager> {
    test_token_manager()
}

// ── MemState ─────────────────────────────────────────────────────────────────

/// Tables of the in-memory store. Research areas are kept without key topics;
/// topics live in their own table as in the database.
#[derive(Debug, Clone, Default)]
pub struct MemState {
    pub users: Vec<User>,
    pub employees: Vec<Employee>,
    pub sessions: Vec<Session>,
    pub details: Vec<EmployeeDetail>,
    pub areas: Vec<ResearchArea>,
    pub key_topics: Vec<KeyTopic>,
    next_id: i64,
}

impl MemState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn area_with_topics(&self, area: &ResearchArea) -> ResearchArea {
        let mut area = area.clone();
        area.key_topics = self
            .key_topics
            .iter()
            .filter(|t| t.research_area_id == area.id)
            .cloned()
            .collect();
        area
    }
}

/// Failure injection switches shared by a store and its transactions.
#[derive(Debug, Default)]
pub struct Faults {
    /// Number of upcoming `create_employee` calls that report a taken unique id.
    pub unique_id_collisions: usize,
    /// `delete_session` fails with an internal error.
    pub fail_delete_session: bool,
    /// `delete_session` reports that the row was already gone.
    pub session_already_deleted: bool,
    /// `create_employee_detail` fails with an internal error.
    pub fail_create_detail: bool,
    /// `delete_key_topic` fails with an internal error.
    pub fail_delete_key_topic: bool,
}

// ── MemDb ────────────────────────────────────────────────────────────────────

/// In-memory transactional store.
///
/// `begin` snapshots the committed state; the transaction works on the copy
/// and `commit` writes it back. Dropping a transaction discards the copy.
#[derive(Clone, Default)]
pub struct MemDb {
    committed: Arc<Mutex<MemState>>,
    faults: Arc<Mutex<Faults>>,
    employee_inserts: Arc<AtomicUsize>,
    commits: Arc<AtomicUsize>,
    working: Option<Arc<Mutex<MemState>>>,
}

impl MemDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the committed state.
    pub fn snapshot(&self) -> MemState {
        self.committed.lock().unwrap().clone()
    }

    pub fn faults(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap()
    }

    /// Number of `create_employee` calls, including rejected ones.
    pub fn employee_inserts(&self) -> usize {
        self.employee_inserts.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    fn state(&self) -> MutexGuard<'_, MemState> {
        match &self.working {
            Some(working) => working.lock().unwrap(),
            None => self.committed.lock().unwrap(),
        }
    }

    // ── Seeding (writes straight to committed state) ─────────────────────────

    pub fn seed_employee(&self, unique_id: &str) -> Employee {
        let mut state = self.committed.lock().unwrap();
        let now = Utc::now();
        let employee = Employee {
            id: state.next_id(),
            unique_id: unique_id.parse().unwrap(),
            tin: "123456789".to_owned(),
            gender: Gender::Female,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        };
        state.employees.push(employee.clone());
        employee
    }

    pub fn seed_detail(&self, employee_id: i64, language: Locale, surname: &str) -> EmployeeDetail {
        let mut state = self.committed.lock().unwrap();
        let now = Utc::now();
        let detail = EmployeeDetail {
            id: state.next_id(),
            employee_id,
            language,
            surname: surname.to_owned(),
            name: format!("{surname}-name"),
            middlename: String::new(),
            created_at: now,
            updated_at: now,
        };
        state.details.push(detail.clone());
        detail
    }

    pub fn seed_research_area(
        &self,
        employee_id: i64,
        language: Locale,
        title: &str,
        topics: &[&str],
    ) -> ResearchArea {
        let mut state = self.committed.lock().unwrap();
        let now = Utc::now();
        let area = ResearchArea {
            id: state.next_id(),
            employee_id,
            language,
            title: title.to_owned(),
            key_topics: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        state.areas.push(area.clone());
        for title in topics {
            let topic = KeyTopic {
                id: state.next_id(),
                research_area_id: area.id,
                key_topic_title: (*title).to_owned(),
                created_at: now,
                updated_at: now,
            };
            state.key_topics.push(topic);
        }
        state.area_with_topics(&area)
    }

    pub fn seed_session(&self, user_id: i64, refresh_token: &str) -> Session {
        let mut state = self.committed.lock().unwrap();
        let session = Session {
            id: state.next_id(),
            user_id,
            refresh_token: refresh_token.to_owned(),
            expires_at: Utc::now() + chrono::Duration::days(1),
            created_at: Utc::now(),
        };
        state.sessions.push(session.clone());
        session
    }
}

impl Store for MemDb {
    type Tx = MemDb;

    async fn begin(&self) -> Result<Self::Tx, RegistryError> {
        let snapshot = self.committed.lock().unwrap().clone();
        Ok(MemDb {
            working: Some(Arc::new(Mutex::new(snapshot))),
            ..self.clone()
        })
    }
}

impl Transaction for MemDb {
    async fn commit(self) -> Result<(), RegistryError> {
        let Some(working) = self.working else {
            return Err(anyhow::anyhow!("commit outside transaction").into());
        };
        let state = working.lock().unwrap().clone();
        *self.committed.lock().unwrap() = state;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl UserRepository for MemDb {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RegistryError> {
        Ok(self.state().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, RegistryError> {
        Ok(self.state().users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, RegistryError> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(RegistryError::AlreadyExists);
        }
        let now = Utc::now();
        let created = User {
            id: state.next_id(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            user_type: user.user_type,
            entity_id: user.entity_id,
            created_at: now,
            updated_at: now,
        };
        state.users.push(created.clone());
        Ok(created)
    }
}

impl EmployeeRepository for MemDb {
    async fn find_employee(&self, id: i64) -> Result<Option<Employee>, RegistryError> {
        Ok(self.state().employees.iter().find(|e| e.id == id).cloned())
    }

    async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee, RegistryError> {
        self.employee_inserts.fetch_add(1, Ordering::SeqCst);
        {
            let mut faults = self.faults();
            if faults.unique_id_collisions > 0 {
                faults.unique_id_collisions -= 1;
                return Err(RegistryError::AlreadyExists);
            }
        }
        let mut state = self.state();
        if state
            .employees
            .iter()
            .any(|e| e.unique_id == employee.unique_id)
        {
            return Err(RegistryError::AlreadyExists);
        }
        let now = Utc::now();
        let created = Employee {
            id: state.next_id(),
            unique_id: employee.unique_id.clone(),
            tin: employee.tin.clone(),
            gender: employee.gender,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        };
        state.employees.push(created.clone());
        Ok(created)
    }
}

impl SessionRepository for MemDb {
    async fn create_session(&self, session: &NewSession) -> Result<Session, RegistryError> {
        let mut state = self.state();
        if state
            .sessions
            .iter()
            .any(|s| s.refresh_token == session.refresh_token)
        {
            return Err(RegistryError::AlreadyExists);
        }
        let created = Session {
            id: state.next_id(),
            user_id: session.user_id,
            refresh_token: session.refresh_token.clone(),
            expires_at: session.expires_at,
            created_at: Utc::now(),
        };
        state.sessions.push(created.clone());
        Ok(created)
    }

    async fn find_session_by_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<Session>, RegistryError> {
        Ok(self
            .state()
            .sessions
            .iter()
            .find(|s| s.refresh_token == refresh_token)
            .cloned())
    }

    async fn delete_session(&self, id: i64) -> Result<bool, RegistryError> {
        {
            let faults = self.faults();
            if faults.fail_delete_session {
                return Err(anyhow::anyhow!("connection reset").into());
            }
            if faults.session_already_deleted {
                return Ok(false);
            }
        }
        let mut state = self.state();
        let before = state.sessions.len();
        state.sessions.retain(|s| s.id != id);
        Ok(state.sessions.len() < before)
    }

    async fn delete_sessions_by_user(&self, user_id: i64) -> Result<u64, RegistryError> {
        let mut state = self.state();
        let before = state.sessions.len();
        state.sessions.retain(|s| s.user_id != user_id);
        Ok((before - state.sessions.len()) as u64)
    }
}

impl EmployeeDetailRepository for MemDb {
    async fn list_employee_details(
        &self,
        employee_id: i64,
        language: Locale,
    ) -> Result<Vec<EmployeeDetail>, RegistryError> {
        Ok(self
            .state()
            .details
            .iter()
            .filter(|d| d.employee_id == employee_id && d.language == language)
            .cloned()
            .collect())
    }

    async fn create_employee_detail(
        &self,
        detail: &EmployeeDetailDraft,
    ) -> Result<i64, RegistryError> {
        if self.faults().fail_create_detail {
            return Err(anyhow::anyhow!("disk full").into());
        }
        let mut state = self.state();
        let now = Utc::now();
        let id = state.next_id();
        state.details.push(EmployeeDetail {
            id,
            employee_id: detail.employee_id,
            language: detail.language,
            surname: detail.surname.clone(),
            name: detail.name.clone(),
            middlename: detail.middlename.clone(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update_employee_detail(
        &self,
        detail: &EmployeeDetailDraft,
    ) -> Result<(), RegistryError> {
        let mut state = self.state();
        let row = state
            .details
            .iter_mut()
            .find(|d| {
                d.id == detail.id
                    && d.employee_id == detail.employee_id
                    && d.language == detail.language
            })
            .ok_or(RegistryError::NotFound)?;
        row.surname = detail.surname.clone();
        row.name = detail.name.clone();
        row.middlename = detail.middlename.clone();
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_employee_detail(
        &self,
        detail: &EmployeeDetailDraft,
    ) -> Result<(), RegistryError> {
        let mut state = self.state();
        let before = state.details.len();
        state.details.retain(|d| {
            !(d.id == detail.id
                && d.employee_id == detail.employee_id
                && d.language == detail.language)
        });
        if state.details.len() == before {
            return Err(RegistryError::NotFound);
        }
        Ok(())
    }
}

impl ResearchAreaRepository for MemDb {
    async fn find_research_area(
        &self,
        id: i64,
        language: Locale,
    ) -> Result<Option<ResearchArea>, RegistryError> {
        let state = self.state();
        Ok(state
            .areas
            .iter()
            .find(|a| a.id == id && a.language == language)
            .map(|a| state.area_with_topics(a)))
    }

    async fn list_research_areas(
        &self,
        employee_id: i64,
        language: Locale,
    ) -> Result<Vec<ResearchArea>, RegistryError> {
        let state = self.state();
        Ok(state
            .areas
            .iter()
            .filter(|a| a.employee_id == employee_id && a.language == language)
            .map(|a| state.area_with_topics(a))
            .collect())
    }

    async fn create_research_area(&self, area: &NewResearchArea) -> Result<i64, RegistryError> {
        let mut state = self.state();
        let now = Utc::now();
        let id = state.next_id();
        state.areas.push(ResearchArea {
            id,
            employee_id: area.employee_id,
            language: area.language,
            title: area.title.clone(),
            key_topics: Vec::new(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update_research_area(&self, id: i64, title: &str) -> Result<(), RegistryError> {
        let mut state = self.state();
        let area = state
            .areas
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RegistryError::NotFound)?;
        area.title = title.to_owned();
        area.updated_at = Utc::now();
        Ok(())
    }

    async fn list_key_topics(
        &self,
        research_area_id: i64,
    ) -> Result<Vec<KeyTopic>, RegistryError> {
        Ok(self
            .state()
            .key_topics
            .iter()
            .filter(|t| t.research_area_id == research_area_id)
            .cloned()
            .collect())
    }

    async fn create_key_topic(
        &self,
        research_area_id: i64,
        topic: &KeyTopicDraft,
    ) -> Result<i64, RegistryError> {
        let mut state = self.state();
        let now = Utc::now();
        let id = state.next_id();
        state.key_topics.push(KeyTopic {
            id,
            research_area_id,
            key_topic_title: topic.key_topic_title.clone(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update_key_topic(
        &self,
        research_area_id: i64,
        topic: &KeyTopicDraft,
    ) -> Result<(), RegistryError> {
        let mut state = self.state();
        let row = state
            .key_topics
            .iter_mut()
            .find(|t| t.id == topic.id && t.research_area_id == research_area_id)
            .ok_or(RegistryError::NotFound)?;
        row.key_topic_title = topic.key_topic_title.clone();
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_key_topic(&self, research_area_id: i64, id: i64) -> Result<(), RegistryError> {
        if self.faults().fail_delete_key_topic {
            return Err(anyhow::anyhow!("lock timeout").into());
        }
        let mut state = self.state();
        let before = state.key_topics.len();
        state
            .key_topics
            .retain(|t| !(t.id == id && t.research_area_id == research_area_id));
        if state.key_topics.len() == before {
            return Err(RegistryError::NotFound);
        }
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// Seed an account directly. The empty password hash never verifies.
pub fn seed_user(db: &MemDb, email: &str, user_type: UserType, entity_id: i64) -> User {
    seed_user_with_hash(db, email, user_type, entity_id, "")
}

pub fn seed_user_with_hash(
    db: &MemDb,
    email: &str,
    user_type: UserType,
    entity_id: i64,
    password_hash: &str,
) -> User {
    let mut state = db.committed.lock().unwrap();
    let now = Utc::now();
    let user = User {
        id: state.next_id(),
        email: email.to_owned(),
        password_hash: password_hash.to_owned(),
        user_type,
        entity_id,
        created_at: now,
        updated_at: now,
    };
    state.users.push(user.clone());
    user
}

pub fn is_unique_id(uid: &str) -> bool {
    uid.parse::<UniqueId>().is_ok()
}
