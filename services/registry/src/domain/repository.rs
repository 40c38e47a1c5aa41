#![allow(async_fn_in_trait)]

use personnel_domain::locale::Locale;

use crate::domain::types::{
    Employee, EmployeeDetail, EmployeeDetailDraft, KeyTopic, KeyTopicDraft, NewEmployee,
    NewResearchArea, NewSession, NewUser, ResearchArea, Session, User,
};
use crate::error::RegistryError;

/// Repository for login accounts.
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RegistryError>;

    async fn find_user(&self, id: i64) -> Result<Option<User>, RegistryError>;

    /// Fails with [`RegistryError::AlreadyExists`] when the email is taken.
    async fn create_user(&self, user: &NewUser) -> Result<User, RegistryError>;
}

/// Repository for employee root records.
pub trait EmployeeRepository: Send + Sync {
    async fn find_employee(&self, id: i64) -> Result<Option<Employee>, RegistryError>;

    /// Fails with [`RegistryError::AlreadyExists`] when the unique id is taken.
    /// The conflict leaves the surrounding transaction usable.
    async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee, RegistryError>;
}

/// Repository for refresh-token sessions.
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: &NewSession) -> Result<Session, RegistryError>;

    async fn find_session_by_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<Session>, RegistryError>;

    /// Delete one session. Returns `true` if deleted, `false` if it was already gone.
    async fn delete_session(&self, id: i64) -> Result<bool, RegistryError>;

    /// Delete every session of a user. Returns the number of rows removed.
    async fn delete_sessions_by_user(&self, user_id: i64) -> Result<u64, RegistryError>;
}

/// Repository for localized employee details.
pub trait EmployeeDetailRepository: Send + Sync {
    async fn list_employee_details(
        &self,
        employee_id: i64,
        language: Locale,
    ) -> Result<Vec<EmployeeDetail>, RegistryError>;

    /// Insert a detail row and return its id.
    async fn create_employee_detail(
        &self,
        detail: &EmployeeDetailDraft,
    ) -> Result<i64, RegistryError>;

    /// Update the row matching id, employee and language; [`RegistryError::NotFound`] if none.
    async fn update_employee_detail(
        &self,
        detail: &EmployeeDetailDraft,
    ) -> Result<(), RegistryError>;

    /// Delete the row matching id, employee and language; [`RegistryError::NotFound`] if none.
    async fn delete_employee_detail(
        &self,
        detail: &EmployeeDetailDraft,
    ) -> Result<(), RegistryError>;
}

/// Repository for research areas and their key topics.
pub trait ResearchAreaRepository: Send + Sync {
    /// Area in the given language with its key topics.
    async fn find_research_area(
        &self,
        id: i64,
        language: Locale,
    ) -> Result<Option<ResearchArea>, RegistryError>;

    async fn list_research_areas(
        &self,
        employee_id: i64,
        language: Locale,
    ) -> Result<Vec<ResearchArea>, RegistryError>;

    /// Insert an area without key topics and return its id.
    async fn create_research_area(&self, area: &NewResearchArea) -> Result<i64, RegistryError>;

    async fn update_research_area(&self, id: i64, title: &str) -> Result<(), RegistryError>;

    async fn list_key_topics(&self, research_area_id: i64)
    -> Result<Vec<KeyTopic>, RegistryError>;

    async fn create_key_topic(
        &self,
        research_area_id: i64,
        topic: &KeyTopicDraft,
    ) -> Result<i64, RegistryError>;

    /// Update a topic of the given area; [`RegistryError::NotFound`] if it belongs elsewhere.
    async fn update_key_topic(
        &self,
        research_area_id: i64,
        topic: &KeyTopicDraft,
    ) -> Result<(), RegistryError>;

    async fn delete_key_topic(&self, research_area_id: i64, id: i64)
    -> Result<(), RegistryError>;
}

/// Every repository the registry uses, reachable from one handle.
pub trait Repositories:
    UserRepository
    + EmployeeRepository
    + SessionRepository
    + EmployeeDetailRepository
    + ResearchAreaRepository
{
}

impl<T> Repositories for T where
    T: UserRepository
        + EmployeeRepository
        + SessionRepository
        + EmployeeDetailRepository
        + ResearchAreaRepository
{
}

/// Open transaction. Dropping it without [`Transaction::commit`] rolls back.
pub trait Transaction: Repositories + Sized {
    async fn commit(self) -> Result<(), RegistryError>;
}

/// Transactional store: repositories outside a transaction plus [`Store::begin`].
pub trait Store: Repositories {
    type Tx: Transaction;

    async fn begin(&self) -> Result<Self::Tx, RegistryError>;
}
