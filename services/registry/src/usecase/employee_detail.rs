use std::sync::Arc;

use personnel_domain::locale::Locale;
use personnel_domain::messages::{MessageKey, Messages};
use personnel_domain::reconcile::reconcile;

use crate::domain::repository::{
    EmployeeDetailRepository, EmployeeRepository, Store, Transaction,
};
use crate::domain::types::{EmployeeDetail, EmployeeDetailDraft};
use crate::error::RegistryError;
use crate::usecase::validation::{client_error, validate_unique_ids};

// ── ListEmployeeDetails ──────────────────────────────────────────────────────

pub struct ListEmployeeDetailsUseCase<R: EmployeeRepository + EmployeeDetailRepository> {
    pub repo: R,
}

impl<R: EmployeeRepository + EmployeeDetailRepository> ListEmployeeDetailsUseCase<R> {
    pub async fn execute(
        &self,
        employee_id: i64,
        locale: Locale,
    ) -> Result<Vec<EmployeeDetail>, RegistryError> {
        self.repo
            .find_employee(employee_id)
            .await?
            .ok_or(RegistryError::NotFound)?;
        self.repo.list_employee_details(employee_id, locale).await
    }
}

// ── UpdateEmployeeDetails ────────────────────────────────────────────────────

/// One submitted detail row. `id == 0` creates a row.
#[derive(Debug, Clone)]
pub struct EmployeeDetailInput {
    pub id: i64,
    pub employee_id: i64,
    pub surname: String,
    pub name: String,
    pub middlename: String,
}

pub struct UpdateEmployeeDetailsInput {
    pub employee_id: i64,
    pub locale: Locale,
    /// Full desired state of the employee's details in `locale`.
    pub details: Vec<EmployeeDetailInput>,
}

pub struct UpdateEmployeeDetailsUseCase<S: Store> {
    pub store: S,
    pub messages: Arc<Messages>,
}

impl<S: Store> UpdateEmployeeDetailsUseCase<S> {
    /// Replace the employee's details in the request language with the
    /// submitted collection and return the resulting rows.
    pub async fn execute(
        &self,
        input: UpdateEmployeeDetailsInput,
    ) -> Result<Vec<EmployeeDetail>, RegistryError> {
        let invalid = |key| client_error(&self.messages, input.locale, key);

        if input
            .details
            .iter()
            .any(|d| d.employee_id != input.employee_id)
        {
            return Err(invalid(MessageKey::EmployeeMismatch));
        }
        let desired: Vec<EmployeeDetailDraft> = input
            .details
            .into_iter()
            .map(|d| EmployeeDetailDraft {
                id: d.id,
                employee_id: input.employee_id,
                language: input.locale,
                surname: d.surname,
                name: d.name,
                middlename: d.middlename,
            })
            .collect();
        validate_unique_ids(&desired).map_err(invalid)?;

        let tx = self.store.begin().await?;

        tx.find_employee(input.employee_id)
            .await?
            .ok_or(RegistryError::NotFound)?;

        let persisted = tx
            .list_employee_details(input.employee_id, input.locale)
            .await?
            .into_iter()
            .map(EmployeeDetailDraft::from)
            .collect();
        let plan = reconcile(persisted, desired);

        for detail in &plan.updated {
            tx.update_employee_detail(detail).await?;
        }
        for detail in &plan.created {
            tx.create_employee_detail(detail).await?;
        }
        for detail in &plan.removed {
            tx.delete_employee_detail(detail).await?;
        }

        let details = tx
            .list_employee_details(input.employee_id, input.locale)
            .await?;
        tx.commit().await?;

        tracing::debug!(
            employee_id = input.employee_id,
            language = %input.locale,
            updated = plan.updated.len(),
            created = plan.created.len(),
            removed = plan.removed.len(),
            "employee details reconciled"
        );
        Ok(details)
    }
}
