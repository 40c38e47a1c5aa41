use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use personnel_auth_types::bearer::BearerIdentity;
use personnel_core::locale::Lang;
use personnel_domain::locale::Locale;

use crate::domain::types::EmployeeDetail;
use crate::error::RegistryError;
use crate::state::AppState;
use crate::usecase::employee_detail::{
    EmployeeDetailInput, ListEmployeeDetailsUseCase, UpdateEmployeeDetailsInput,
    UpdateEmployeeDetailsUseCase,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetailRequest {
    #[serde(default)]
    pub id: i64,
    pub employee_id: i64,
    pub surname: String,
    pub name: String,
    #[serde(default)]
    pub middlename: String,
}

#[derive(Deserialize)]
pub struct UpdateEmployeeDetailsRequest {
    pub data: Vec<EmployeeDetailRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetailResponse {
    pub id: i64,
    pub employee_id: i64,
    pub language_code: Locale,
    pub surname: String,
    pub name: String,
    pub middlename: String,
    #[serde(serialize_with = "personnel_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "personnel_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<EmployeeDetail> for EmployeeDetailResponse {
    fn from(detail: EmployeeDetail) -> Self {
        Self {
            id: detail.id,
            employee_id: detail.employee_id,
            language_code: detail.language,
            surname: detail.surname,
            name: detail.name,
            middlename: detail.middlename,
            created_at: detail.created_at,
            updated_at: detail.updated_at,
        }
    }
}

pub async fn list_employee_details(
    State(state): State<AppState>,
    _identity: BearerIdentity,
    Lang(locale): Lang,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<EmployeeDetailResponse>>, RegistryError> {
    let Path(employee_id) = path?;
    let usecase = ListEmployeeDetailsUseCase {
        repo: state.store(),
    };
    let details = usecase.execute(employee_id, locale).await?;
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

pub async fn update_employee_details(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Lang(locale): Lang,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateEmployeeDetailsRequest>, JsonRejection>,
) -> Result<Json<Vec<EmployeeDetailResponse>>, RegistryError> {
    let Path(employee_id) = path?;
    let Json(body) = body?;
    let usecase = UpdateEmployeeDetailsUseCase {
        store: state.store(),
        messages: state.messages.clone(),
    };
    let details = usecase
        .execute(UpdateEmployeeDetailsInput {
            employee_id,
            locale,
            details: body
                .data
                .into_iter()
                .map(|d| EmployeeDetailInput {
                    id: d.id,
                    employee_id: d.employee_id,
                    surname: d.surname,
                    name: d.name,
                    middlename: d.middlename,
                })
                .collect(),
        })
        .await?;
    tracing::info!(user_id = identity.user_id, employee_id, "employee details updated");
    Ok(Json(details.into_iter().map(Into::into).collect()))
}
