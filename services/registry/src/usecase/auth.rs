use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;

use personnel_auth_types::token::TokenManager;
use personnel_domain::locale::Locale;
use personnel_domain::messages::{MessageKey, Messages};
use personnel_domain::unique_id::UniqueId;
use personnel_domain::user::UserType;

use crate::domain::repository::{
    EmployeeRepository, Repositories, SessionRepository, Store, Transaction, UserRepository,
};
use crate::domain::types::{NewEmployee, NewSession, NewUser, User};
use crate::error::RegistryError;
use crate::usecase::password::{hash_password, verify_against_dummy, verify_password};
use crate::usecase::validation::{
    client_error, parse_gender, validate_email, validate_password, validate_tin,
};

/// Upper bound on unique id draws per registration. With 10^8 ids a miss this
/// long means the table is saturated or the store is misbehaving.
pub const MAX_UNIQUE_ID_ATTEMPTS: usize = 32;

pub const TOKEN_TYPE: &str = "Bearer";

/// Tokens and identity returned by login and refresh.
#[derive(Debug, Clone)]
pub struct AuthOutput {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Employee unique id; empty for other user types.
    pub uid: String,
    pub user_role: UserType,
}

/// Issue an access/refresh pair for `user` and persist the refresh session.
pub async fn issue_tokens<R>(
    repo: &R,
    tokens: &TokenManager,
    user: &User,
) -> Result<AuthOutput, RegistryError>
where
    R: SessionRepository + EmployeeRepository,
{
    let (access_token, _) = tokens.generate_access_token(user.id, user.user_type.as_str())?;
    let (refresh_token, _) = tokens.generate_refresh_token(user.id)?;

    repo.create_session(&NewSession {
        user_id: user.id,
        refresh_token: refresh_token.clone(),
        expires_at: Utc::now() + tokens.refresh_token_duration(),
    })
    .await?;

    let uid = match user.user_type {
        UserType::Employee => repo
            .find_employee(user.entity_id)
            .await?
            .map(|employee| employee.unique_id.to_string())
            .ok_or_else(|| {
                anyhow!(
                    "employee {} of user {} not found",
                    user.entity_id,
                    user.id
                )
            })?,
        UserType::Admin => String::new(),
    };

    Ok(AuthOutput {
        access_token,
        refresh_token,
        token_type: TOKEN_TYPE,
        uid,
        user_role: user.user_type,
    })
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub tin: String,
    pub gender: String,
    pub email: String,
    pub password: String,
    pub locale: Locale,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: i64,
    pub employee_id: i64,
    pub unique_id: UniqueId,
}

pub struct RegisterUseCase<S: Store> {
    pub store: S,
    pub messages: Arc<Messages>,
}

impl<S: Store> RegisterUseCase<S> {
    pub async fn execute(&self, input: RegisterInput) -> Result<RegisterOutput, RegistryError> {
        let invalid = |key| client_error(&self.messages, input.locale, key);
        validate_tin(&input.tin).map_err(invalid)?;
        let gender = parse_gender(&input.gender).map_err(invalid)?;
        validate_email(&input.email).map_err(invalid)?;
        validate_password(&input.password).map_err(invalid)?;

        let password_hash = hash_password(input.password).await?;

        let tx = self.store.begin().await?;

        let mut attempts = 0;
        let employee = loop {
            attempts += 1;
            let candidate = NewEmployee {
                unique_id: UniqueId::generate(),
                tin: input.tin.clone(),
                gender,
            };
            match tx.create_employee(&candidate).await {
                Ok(employee) => break employee,
                Err(RegistryError::AlreadyExists) if attempts < MAX_UNIQUE_ID_ATTEMPTS => {
                    tracing::debug!(unique_id = %candidate.unique_id, "unique id taken, retrying");
                }
                Err(RegistryError::AlreadyExists) => {
                    return Err(anyhow!("no free unique id after {attempts} attempts").into());
                }
                Err(e) => return Err(e),
            }
        };

        let user = tx
            .create_user(&NewUser {
                email: input.email.clone(),
                password_hash,
                user_type: UserType::Employee,
                entity_id: employee.id,
            })
            .await
            .map_err(|e| match e {
                RegistryError::AlreadyExists => RegistryError::BadRequest(self.messages.render(
                    input.locale,
                    MessageKey::EmailAlreadyExists,
                    &[("email", input.email.as_str())],
                )),
                e => e,
            })?;

        tx.commit().await?;

        tracing::info!(user_id = user.id, employee_id = employee.id, "employee registered");
        Ok(RegisterOutput {
            user_id: user.id,
            employee_id: employee.id,
            unique_id: employee.unique_id,
        })
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub locale: Locale,
}

pub struct LoginUseCase<R: Repositories> {
    pub repo: R,
    pub tokens: Arc<TokenManager>,
    pub messages: Arc<Messages>,
}

impl<R: Repositories> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<AuthOutput, RegistryError> {
        if input.email.is_empty() {
            return Err(client_error(&self.messages, input.locale, MessageKey::InvalidEmail));
        }
        if input.password.is_empty() {
            return Err(client_error(&self.messages, input.locale, MessageKey::InvalidPassword));
        }
        // Unknown email and wrong password must be indistinguishable.
        let invalid_credentials =
            || client_error(&self.messages, input.locale, MessageKey::InvalidCredentials);

        let Some(user) = self.repo.find_user_by_email(&input.email).await? else {
            // Spend the same Argon2 work as a real check so timing does not
            // reveal whether the account exists.
            verify_against_dummy(input.password).await?;
            return Err(invalid_credentials());
        };

        if !verify_password(input.password, user.password_hash.clone()).await? {
            return Err(invalid_credentials());
        }

        issue_tokens(&self.repo, &self.tokens, &user).await
    }
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

pub struct RefreshTokenUseCase<S: Store> {
    pub store: S,
    pub tokens: Arc<TokenManager>,
}

impl<S: Store> RefreshTokenUseCase<S> {
    /// Rotate a refresh token: the presented session is deleted and a new one
    /// issued in the same transaction, so each refresh token works once.
    pub async fn execute(&self, refresh_token: &str) -> Result<AuthOutput, RegistryError> {
        let claims = self.tokens.validate_refresh_token(refresh_token)?;

        let tx = self.store.begin().await?;

        let session = tx
            .find_session_by_token(refresh_token)
            .await?
            .ok_or(RegistryError::Unauthorized)?;
        if session.user_id != claims.user_id {
            return Err(RegistryError::Unauthorized);
        }
        // A concurrent refresh with the same token already rotated it.
        if !tx.delete_session(session.id).await? {
            return Err(RegistryError::Unauthorized);
        }

        let user = tx
            .find_user(claims.user_id)
            .await?
            .ok_or(RegistryError::Unauthorized)?;
        let output = issue_tokens(&tx, &self.tokens, &user).await?;

        tx.commit().await?;
        Ok(output)
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<R: Repositories> {
    pub repo: R,
    pub tokens: Arc<TokenManager>,
}

impl<R: Repositories> LogoutUseCase<R> {
    pub async fn execute(&self, refresh_token: &str) -> Result<(), RegistryError> {
        let claims = self.tokens.validate_refresh_token(refresh_token)?;

        match self.revoke(claims.user_id, refresh_token).await {
            Ok(()) => Ok(()),
            Err(e @ RegistryError::NotFound) => Err(e),
            Err(e) => {
                // The token is genuine but its session state is inconsistent or
                // unknown (owner mismatch, failed delete): drop every session
                // of the user.
                match self.repo.delete_sessions_by_user(claims.user_id).await {
                    Ok(purged) => tracing::warn!(
                        user_id = claims.user_id,
                        purged,
                        error = %e,
                        "logout failed, purged all sessions of user"
                    ),
                    Err(purge_err) => tracing::error!(
                        user_id = claims.user_id,
                        error = %purge_err,
                        "failed to purge sessions after logout failure"
                    ),
                }
                Err(e)
            }
        }
    }

    async fn revoke(&self, user_id: i64, refresh_token: &str) -> Result<(), RegistryError> {
        let session = self
            .repo
            .find_session_by_token(refresh_token)
            .await?
            .ok_or(RegistryError::NotFound)?;
        if session.user_id != user_id {
            return Err(RegistryError::Unauthorized);
        }
        if !self.repo.delete_session(session.id).await? {
            return Err(RegistryError::NotFound);
        }
        Ok(())
    }
}
