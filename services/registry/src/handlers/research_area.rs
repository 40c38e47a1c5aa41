use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use personnel_auth_types::bearer::BearerIdentity;
use personnel_core::locale::Lang;
use personnel_domain::locale::Locale;

use crate::domain::types::{KeyTopic, KeyTopicDraft, ResearchArea};
use crate::error::RegistryError;
use crate::state::AppState;
use crate::usecase::research_area::{
    CreateResearchAreaInput, CreateResearchAreaUseCase, ListResearchAreasUseCase,
    UpdateResearchAreaInput, UpdateResearchAreaUseCase,
};

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKeyTopicRequest {
    pub key_topic_title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResearchAreaRequest {
    pub title: String,
    #[serde(default)]
    pub key_topics: Vec<NewKeyTopicRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyTopicRequest {
    #[serde(default)]
    pub id: i64,
    pub key_topic_title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResearchAreaRequest {
    pub title: String,
    #[serde(default)]
    pub key_topics: Vec<KeyTopicRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyTopicResponse {
    pub id: i64,
    pub research_area_id: i64,
    pub key_topic_title: String,
}

impl From<KeyTopic> for KeyTopicResponse {
    fn from(topic: KeyTopic) -> Self {
        Self {
            id: topic.id,
            research_area_id: topic.research_area_id,
            key_topic_title: topic.key_topic_title,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchAreaResponse {
    pub id: i64,
    pub employee_id: i64,
    pub language_code: Locale,
    pub title: String,
    pub key_topics: Vec<KeyTopicResponse>,
    #[serde(serialize_with = "personnel_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "personnel_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ResearchArea> for ResearchAreaResponse {
    fn from(area: ResearchArea) -> Self {
        Self {
            id: area.id,
            employee_id: area.employee_id,
            language_code: area.language,
            title: area.title,
            key_topics: area.key_topics.into_iter().map(Into::into).collect(),
            created_at: area.created_at,
            updated_at: area.updated_at,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

pub async fn list_research_areas(
    State(state): State<AppState>,
    _identity: BearerIdentity,
    Lang(locale): Lang,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<ResearchAreaResponse>>, RegistryError> {
    let Path(employee_id) = path?;
    let usecase = ListResearchAreasUseCase {
        repo: state.store(),
    };
    let areas = usecase.execute(employee_id, locale).await?;
    Ok(Json(areas.into_iter().map(Into::into).collect()))
}

pub async fn create_research_area(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Lang(locale): Lang,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CreateResearchAreaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ResearchAreaResponse>), RegistryError> {
    let Path(employee_id) = path?;
    let Json(body) = body?;
    let usecase = CreateResearchAreaUseCase {
        store: state.store(),
        messages: state.messages.clone(),
    };
    let area = usecase
        .execute(CreateResearchAreaInput {
            employee_id,
            locale,
            title: body.title,
            key_topics: body
                .key_topics
                .into_iter()
                .map(|t| t.key_topic_title)
                .collect(),
        })
        .await?;
    tracing::info!(
        user_id = identity.user_id,
        research_area_id = area.id,
        "research area created"
    );
    Ok((StatusCode::CREATED, Json(area.into())))
}

pub async fn update_research_area(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Lang(locale): Lang,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateResearchAreaRequest>, JsonRejection>,
) -> Result<Json<ResearchAreaResponse>, RegistryError> {
    let Path(research_area_id) = path?;
    let Json(body) = body?;
    let usecase = UpdateResearchAreaUseCase {
        store: state.store(),
        messages: state.messages.clone(),
    };
    let area = usecase
        .execute(UpdateResearchAreaInput {
            research_area_id,
            locale,
            title: body.title,
            key_topics: body
                .key_topics
                .into_iter()
                .map(|t| KeyTopicDraft {
                    id: t.id,
                    key_topic_title: t.key_topic_title,
                })
                .collect(),
        })
        .await?;
    tracing::info!(user_id = identity.user_id, research_area_id, "research area updated");
    Ok(Json(area.into()))
}
