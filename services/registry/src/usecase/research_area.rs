use std::sync::Arc;

use personnel_domain::locale::Locale;
use personnel_domain::messages::{MessageKey, Messages};
use personnel_domain::reconcile::reconcile;

use crate::domain::repository::{
    EmployeeRepository, ResearchAreaRepository, Store, Transaction,
};
use crate::domain::types::{KeyTopicDraft, NewResearchArea, ResearchArea};
use crate::error::RegistryError;
use crate::usecase::validation::{client_error, validate_unique_ids};

// ── ListResearchAreas ────────────────────────────────────────────────────────

pub struct ListResearchAreasUseCase<R: EmployeeRepository + ResearchAreaRepository> {
    pub repo: R,
}

impl<R: EmployeeRepository + ResearchAreaRepository> ListResearchAreasUseCase<R> {
    pub async fn execute(
        &self,
        employee_id: i64,
        locale: Locale,
    ) -> Result<Vec<ResearchArea>, RegistryError> {
        self.repo
            .find_employee(employee_id)
            .await?
            .ok_or(RegistryError::NotFound)?;
        self.repo.list_research_areas(employee_id, locale).await
    }
}

// ── CreateResearchArea ───────────────────────────────────────────────────────

pub struct CreateResearchAreaInput {
    pub employee_id: i64,
    pub locale: Locale,
    pub title: String,
    pub key_topics: Vec<String>,
}

pub struct CreateResearchAreaUseCase<S: Store> {
    pub store: S,
    pub messages: Arc<Messages>,
}

impl<S: Store> CreateResearchAreaUseCase<S> {
    pub async fn execute(
        &self,
        input: CreateResearchAreaInput,
    ) -> Result<ResearchArea, RegistryError> {
        if input.title.trim().is_empty() {
            return Err(client_error(&self.messages, input.locale, MessageKey::EmptyTitle));
        }

        let tx = self.store.begin().await?;

        tx.find_employee(input.employee_id)
            .await?
            .ok_or(RegistryError::NotFound)?;

        let area_id = tx
            .create_research_area(&NewResearchArea {
                employee_id: input.employee_id,
                language: input.locale,
                title: input.title,
            })
            .await?;
        for key_topic_title in input.key_topics {
            tx.create_key_topic(
                area_id,
                &KeyTopicDraft {
                    id: 0,
                    key_topic_title,
                },
            )
            .await?;
        }

        let area = tx
            .find_research_area(area_id, input.locale)
            .await?
            .ok_or_else(|| anyhow::anyhow!("research area {area_id} vanished after insert"))?;
        tx.commit().await?;
        Ok(area)
    }
}

// ── UpdateResearchArea ───────────────────────────────────────────────────────

pub struct UpdateResearchAreaInput {
    pub research_area_id: i64,
    pub locale: Locale,
    pub title: String,
    /// Full desired set of key topics. `id == 0` creates a topic.
    pub key_topics: Vec<KeyTopicDraft>,
}

pub struct UpdateResearchAreaUseCase<S: Store> {
    pub store: S,
    pub messages: Arc<Messages>,
}

impl<S: Store> UpdateResearchAreaUseCase<S> {
    /// Update the title and reconcile the key topics of a research area that
    /// exists in the request language.
    pub async fn execute(
        &self,
        input: UpdateResearchAreaInput,
    ) -> Result<ResearchArea, RegistryError> {
        if input.title.trim().is_empty() {
            return Err(client_error(&self.messages, input.locale, MessageKey::EmptyTitle));
        }
        validate_unique_ids(&input.key_topics)
            .map_err(|key| client_error(&self.messages, input.locale, key))?;

        let tx = self.store.begin().await?;

        let area = tx
            .find_research_area(input.research_area_id, input.locale)
            .await?
            .ok_or(RegistryError::NotFound)?;
        tx.update_research_area(area.id, &input.title).await?;

        let persisted = area.key_topics.into_iter().map(KeyTopicDraft::from).collect();
        let plan = reconcile(persisted, input.key_topics);

        for topic in &plan.updated {
            tx.update_key_topic(area.id, topic).await?;
        }
        for topic in &plan.created {
            tx.create_key_topic(area.id, topic).await?;
        }
        for topic in &plan.removed {
            tx.delete_key_topic(area.id, topic.id).await?;
        }

        let updated = tx
            .find_research_area(area.id, input.locale)
            .await?
            .ok_or(RegistryError::NotFound)?;
        tx.commit().await?;
        Ok(updated)
    }
}
