use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use personnel_domain::locale::Locale;
use personnel_domain::unique_id::UniqueId;
use personnel_domain::user::{Gender, UserType};
use personnel_registry_schema::{
    employee_details, employees, research_area_key_topics, research_areas, user_sessions, users,
};

use crate::domain::repository::{
    EmployeeDetailRepository, EmployeeRepository, ResearchAreaRepository, SessionRepository, Store,
    Transaction, UserRepository,
};
use crate::domain::types::{
    Employee, EmployeeDetail, EmployeeDetailDraft, KeyTopic, KeyTopicDraft, NewEmployee,
    NewResearchArea, NewSession, NewUser, ResearchArea, Session, User,
};
use crate::error::RegistryError;

/// sea-orm backed repositories over any connection.
///
/// `Db<DatabaseConnection>` runs each call on the pool; `Db<DatabaseTransaction>`
/// runs inside one transaction and rolls back when dropped without `commit`.
#[derive(Clone)]
pub struct Db<C> {
    pub conn: C,
}

impl<C> Db<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

impl Store for Db<DatabaseConnection> {
    type Tx = Db<DatabaseTransaction>;

    async fn begin(&self) -> Result<Self::Tx, RegistryError> {
        let txn = self.conn.begin().await.context("begin transaction")?;
        Ok(Db::new(txn))
    }
}

impl Transaction for Db<DatabaseTransaction> {
    async fn commit(self) -> Result<(), RegistryError> {
        self.conn.commit().await.context("commit transaction")?;
        Ok(())
    }
}

/// Map the error of an `ON CONFLICT DO NOTHING` insert.
fn insert_error(e: DbErr, what: &'static str) -> RegistryError {
    match e {
        DbErr::RecordNotInserted => RegistryError::AlreadyExists,
        e => anyhow::Error::new(e).context(what).into(),
    }
}

fn parse_locale(code: &str) -> Result<Locale, RegistryError> {
    Ok(code
        .parse::<Locale>()
        .with_context(|| format!("stored language code {code:?}"))?)
}

// ── User repository ──────────────────────────────────────────────────────────

impl<C: ConnectionTrait + Send + Sync> UserRepository for Db<C> {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RegistryError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, RegistryError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, RegistryError> {
        let now = Utc::now();
        let model = users::ActiveModel {
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            user_type: Set(user.user_type.as_str().to_owned()),
            entity_id: Set(user.entity_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let id = users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::Email)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .map_err(|e| insert_error(e, "create user"))?
            .last_insert_id;
        Ok(User {
            id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            user_type: user.user_type,
            entity_id: user.entity_id,
            created_at: now,
            updated_at: now,
        })
    }
}

fn user_from_model(model: users::Model) -> Result<User, RegistryError> {
    let user_type = model
        .user_type
        .parse::<UserType>()
        .with_context(|| format!("user {} has unknown user type", model.id))?;
    Ok(User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        user_type,
        entity_id: model.entity_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Employee repository ──────────────────────────────────────────────────────

impl<C: ConnectionTrait + Send + Sync> EmployeeRepository for Db<C> {
    async fn find_employee(&self, id: i64) -> Result<Option<Employee>, RegistryError> {
        let model = employees::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find employee by id")?;
        model.map(employee_from_model).transpose()
    }

    async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee, RegistryError> {
        let now = Utc::now();
        let model = employees::ActiveModel {
            unique_id: Set(employee.unique_id.as_str().to_owned()),
            tin: Set(employee.tin.clone()),
            gender: Set(employee.gender.code().to_owned()),
            profile_picture: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        // DO NOTHING instead of a failing insert: a unique violation would abort
        // the Postgres transaction the registration retry loop runs in.
        let id = employees::Entity::insert(model)
            .on_conflict(
                OnConflict::column(employees::Column::UniqueId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .map_err(|e| insert_error(e, "create employee"))?
            .last_insert_id;
        Ok(Employee {
            id,
            unique_id: employee.unique_id.clone(),
            tin: employee.tin.clone(),
            gender: employee.gender,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        })
    }
}

fn employee_from_model(model: employees::Model) -> Result<Employee, RegistryError> {
    let unique_id = model
        .unique_id
        .parse::<UniqueId>()
        .with_context(|| format!("employee {} has malformed unique id", model.id))?;
    let gender = Gender::from_code(&model.gender)
        .with_context(|| format!("employee {} has unknown gender", model.id))?;
    Ok(Employee {
        id: model.id,
        unique_id,
        tin: model.tin,
        gender,
        profile_picture: model.profile_picture,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Session repository ───────────────────────────────────────────────────────

impl<C: ConnectionTrait + Send + Sync> SessionRepository for Db<C> {
    async fn create_session(&self, session: &NewSession) -> Result<Session, RegistryError> {
        let now = Utc::now();
        let id = user_sessions::Entity::insert(user_sessions::ActiveModel {
            user_id: Set(session.user_id),
            refresh_token: Set(session.refresh_token.clone()),
            expires_at: Set(session.expires_at),
            created_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await
        .context("create session")?
        .last_insert_id;
        Ok(Session {
            id,
            user_id: session.user_id,
            refresh_token: session.refresh_token.clone(),
            expires_at: session.expires_at,
            created_at: now,
        })
    }

    async fn find_session_by_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<Session>, RegistryError> {
        let model = user_sessions::Entity::find()
            .filter(user_sessions::Column::RefreshToken.eq(refresh_token))
            .one(&self.conn)
            .await
            .context("find session by token")?;
        Ok(model.map(session_from_model))
    }

    async fn delete_session(&self, id: i64) -> Result<bool, RegistryError> {
        let result = user_sessions::Entity::delete_many()
            .filter(user_sessions::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("delete session")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_sessions_by_user(&self, user_id: i64) -> Result<u64, RegistryError> {
        let result = user_sessions::Entity::delete_many()
            .filter(user_sessions::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("delete sessions by user")?;
        Ok(result.rows_affected)
    }
}

fn session_from_model(model: user_sessions::Model) -> Session {
    Session {
        id: model.id,
        user_id: model.user_id,
        refresh_token: model.refresh_token,
        expires_at: model.expires_at,
        created_at: model.created_at,
    }
}

// ── Employee detail repository ───────────────────────────────────────────────

impl<C: ConnectionTrait + Send + Sync> EmployeeDetailRepository for Db<C> {
    async fn list_employee_details(
        &self,
        employee_id: i64,
        language: Locale,
    ) -> Result<Vec<EmployeeDetail>, RegistryError> {
        let models = employee_details::Entity::find()
            .filter(employee_details::Column::EmployeeId.eq(employee_id))
            .filter(employee_details::Column::LanguageCode.eq(language.code()))
            .order_by_asc(employee_details::Column::Id)
            .all(&self.conn)
            .await
            .context("list employee details")?;
        models.into_iter().map(detail_from_model).collect()
    }

    async fn create_employee_detail(
        &self,
        detail: &EmployeeDetailDraft,
    ) -> Result<i64, RegistryError> {
        let now = Utc::now();
        let result = employee_details::Entity::insert(employee_details::ActiveModel {
            employee_id: Set(detail.employee_id),
            language_code: Set(detail.language.code().to_owned()),
            surname: Set(detail.surname.clone()),
            name: Set(detail.name.clone()),
            middlename: Set(detail.middlename.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await
        .context("create employee detail")?;
        Ok(result.last_insert_id)
    }

    async fn update_employee_detail(
        &self,
        detail: &EmployeeDetailDraft,
    ) -> Result<(), RegistryError> {
        let result = employee_details::Entity::update_many()
            .col_expr(
                employee_details::Column::Surname,
                Expr::value(detail.surname.clone()),
            )
            .col_expr(employee_details::Column::Name, Expr::value(detail.name.clone()))
            .col_expr(
                employee_details::Column::Middlename,
                Expr::value(detail.middlename.clone()),
            )
            .col_expr(employee_details::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(employee_details::Column::Id.eq(detail.id))
            .filter(employee_details::Column::EmployeeId.eq(detail.employee_id))
            .filter(employee_details::Column::LanguageCode.eq(detail.language.code()))
            .exec(&self.conn)
            .await
            .context("update employee detail")?;
        if result.rows_affected == 0 {
            return Err(RegistryError::NotFound);
        }
        Ok(())
    }

    async fn delete_employee_detail(
        &self,
        detail: &EmployeeDetailDraft,
    ) -> Result<(), RegistryError> {
        let result = employee_details::Entity::delete_many()
            .filter(employee_details::Column::Id.eq(detail.id))
            .filter(employee_details::Column::EmployeeId.eq(detail.employee_id))
            .filter(employee_details::Column::LanguageCode.eq(detail.language.code()))
            .exec(&self.conn)
            .await
            .context("delete employee detail")?;
        if result.rows_affected == 0 {
            return Err(RegistryError::NotFound);
        }
        Ok(())
    }
}

fn detail_from_model(model: employee_details::Model) -> Result<EmployeeDetail, RegistryError> {
    Ok(EmployeeDetail {
        id: model.id,
        employee_id: model.employee_id,
        language: parse_locale(&model.language_code)?,
        surname: model.surname,
        name: model.name,
        middlename: model.middlename,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Research area repository ─────────────────────────────────────────────────

impl<C: ConnectionTrait + Send + Sync> ResearchAreaRepository for Db<C> {
    async fn find_research_area(
        &self,
        id: i64,
        language: Locale,
    ) -> Result<Option<ResearchArea>, RegistryError> {
        let Some(model) = research_areas::Entity::find_by_id(id)
            .filter(research_areas::Column::LanguageCode.eq(language.code()))
            .one(&self.conn)
            .await
            .context("find research area")?
        else {
            return Ok(None);
        };
        let key_topics = self.list_key_topics(model.id).await?;
        research_area_from_model(model, key_topics).map(Some)
    }

    async fn list_research_areas(
        &self,
        employee_id: i64,
        language: Locale,
    ) -> Result<Vec<ResearchArea>, RegistryError> {
        let areas = research_areas::Entity::find()
            .filter(research_areas::Column::EmployeeId.eq(employee_id))
            .filter(research_areas::Column::LanguageCode.eq(language.code()))
            .order_by_asc(research_areas::Column::Id)
            .all(&self.conn)
            .await
            .context("list research areas")?;
        if areas.is_empty() {
            return Ok(Vec::new());
        }

        let area_ids: Vec<i64> = areas.iter().map(|a| a.id).collect();
        let topics = research_area_key_topics::Entity::find()
            .filter(research_area_key_topics::Column::ResearchAreaId.is_in(area_ids))
            .order_by_asc(research_area_key_topics::Column::Id)
            .all(&self.conn)
            .await
            .context("list key topics of research areas")?;
        let mut by_area: HashMap<i64, Vec<KeyTopic>> = HashMap::new();
        for topic in topics {
            by_area
                .entry(topic.research_area_id)
                .or_default()
                .push(key_topic_from_model(topic));
        }

        areas
            .into_iter()
            .map(|area| {
                let key_topics = by_area.remove(&area.id).unwrap_or_default();
                research_area_from_model(area, key_topics)
            })
            .collect()
    }

    async fn create_research_area(&self, area: &NewResearchArea) -> Result<i64, RegistryError> {
        let now = Utc::now();
        let result = research_areas::Entity::insert(research_areas::ActiveModel {
            employee_id: Set(area.employee_id),
            language_code: Set(area.language.code().to_owned()),
            title: Set(area.title.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await
        .context("create research area")?;
        Ok(result.last_insert_id)
    }

    async fn update_research_area(&self, id: i64, title: &str) -> Result<(), RegistryError> {
        let result = research_areas::Entity::update_many()
            .col_expr(research_areas::Column::Title, Expr::value(title))
            .col_expr(research_areas::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(research_areas::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("update research area")?;
        if result.rows_affected == 0 {
            return Err(RegistryError::NotFound);
        }
        Ok(())
    }

    async fn list_key_topics(
        &self,
        research_area_id: i64,
    ) -> Result<Vec<KeyTopic>, RegistryError> {
        let models = research_area_key_topics::Entity::find()
            .filter(research_area_key_topics::Column::ResearchAreaId.eq(research_area_id))
            .order_by_asc(research_area_key_topics::Column::Id)
            .all(&self.conn)
            .await
            .context("list key topics")?;
        Ok(models.into_iter().map(key_topic_from_model).collect())
    }

    async fn create_key_topic(
        &self,
        research_area_id: i64,
        topic: &KeyTopicDraft,
    ) -> Result<i64, RegistryError> {
        let now = Utc::now();
        let result = research_area_key_topics::Entity::insert(
            research_area_key_topics::ActiveModel {
                research_area_id: Set(research_area_id),
                key_topic_title: Set(topic.key_topic_title.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            },
        )
        .exec(&self.conn)
        .await
        .context("create key topic")?;
        Ok(result.last_insert_id)
    }

    async fn update_key_topic(
        &self,
        research_area_id: i64,
        topic: &KeyTopicDraft,
    ) -> Result<(), RegistryError> {
        let result = research_area_key_topics::Entity::update_many()
            .col_expr(
                research_area_key_topics::Column::KeyTopicTitle,
                Expr::value(topic.key_topic_title.clone()),
            )
            .col_expr(
                research_area_key_topics::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(research_area_key_topics::Column::Id.eq(topic.id))
            .filter(research_area_key_topics::Column::ResearchAreaId.eq(research_area_id))
            .exec(&self.conn)
            .await
            .context("update key topic")?;
        if result.rows_affected == 0 {
            return Err(RegistryError::NotFound);
        }
        Ok(())
    }

    async fn delete_key_topic(&self, research_area_id: i64, id: i64) -> Result<(), RegistryError> {
        let result = research_area_key_topics::Entity::delete_many()
            .filter(research_area_key_topics::Column::Id.eq(id))
            .filter(research_area_key_topics::Column::ResearchAreaId.eq(research_area_id))
            .exec(&self.conn)
            .await
            .context("delete key topic")?;
        if result.rows_affected == 0 {
            return Err(RegistryError::NotFound);
        }
        Ok(())
    }
}

fn research_area_from_model(
    model: research_areas::Model,
    key_topics: Vec<KeyTopic>,
) -> Result<ResearchArea, RegistryError> {
    Ok(ResearchArea {
        id: model.id,
        employee_id: model.employee_id,
        language: parse_locale(&model.language_code)?,
        title: model.title,
        key_topics,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn key_topic_from_model(model: research_area_key_topics::Model) -> KeyTopic {
    KeyTopic {
        id: model.id,
        research_area_id: model.research_area_id,
        key_topic_title: model.key_topic_title,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
