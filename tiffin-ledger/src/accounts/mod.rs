//! Account administration
//!
//! Registration, approval, activation and the cascade delete. Every write
//! passes the standing through [`normalize_standing`] first so an operator
//! can never be stored inactive or unapproved.

use std::sync::Arc;

use shared::models::{
    Account, AccountCreate, AccountStanding, AccountUpdate, ProfileUpdate, Role,
    enforce_operator_standing,
};
use shared::util::{normalize_email, snowflake_id};
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

use crate::auth::{AccountGate, Actor, require_member, require_operator};
use crate::db::repository::account::{self, CascadeReport};
use crate::db::repository::RepoError;
use crate::utils::Clock;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};

/// Apply the operator invariant to a (role, active, approved) triple
pub fn normalize_standing(role: Role, is_active: bool, is_approved: bool) -> AccountStanding {
    let mut standing = AccountStanding {
        role,
        is_active,
        is_approved,
    };
    enforce_operator_standing(&mut standing);
    standing
}

fn validate_email(email: &str) -> AppResult<String> {
    let email = normalize_email(&validate_required_text(email, "email", MAX_EMAIL_LEN)?);
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("Invalid email address '{email}'"),
        ));
    }
    Ok(email)
}

fn account_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::AccountNotFound, format!("Account {id} not found"))
        .with_detail("account_id", id)
}

fn map_duplicate_email(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::EmailAlreadyRegistered, msg),
        other => other.into(),
    }
}

#[derive(Debug, Clone)]
pub struct AccountService {
    pool: SqlitePool,
    gate: Arc<dyn AccountGate>,
    clock: Arc<dyn Clock>,
    operator_secret: Option<String>,
}

impl AccountService {
    pub fn new(
        pool: SqlitePool,
        gate: Arc<dyn AccountGate>,
        clock: Arc<dyn Clock>,
        operator_secret: Option<String>,
    ) -> Self {
        Self {
            pool,
            gate,
            clock,
            operator_secret,
        }
    }

    async fn create(&self, input: AccountCreate, standing: AccountStanding) -> AppResult<Account> {
        let name = validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
        let email = validate_email(&input.email)?;
        let phone = input.phone.as_deref().map(str::trim).unwrap_or_default();
        validate_optional_text(Some(phone), "phone", MAX_SHORT_TEXT_LEN)?;

        let account = account::insert(
            &self.pool,
            snowflake_id(),
            &name,
            &email,
            phone,
            standing.normalized(),
            self.clock.now_millis(),
        )
        .await
        .map_err(map_duplicate_email)?;

        tracing::info!(
            account_id = account.id,
            email = %account.email,
            role = ?account.role,
            "Account registered"
        );
        Ok(account)
    }

    /// Self-registration; the account waits for operator approval
    pub async fn register_subscriber(&self, input: AccountCreate) -> AppResult<Account> {
        self.create(input, normalize_standing(Role::Subscriber, true, false))
            .await
    }

    /// Operator registration guarded by the configured secret
    pub async fn register_operator(&self, input: AccountCreate, secret: &str) -> AppResult<Account> {
        let accepted = self
            .operator_secret
            .as_deref()
            .is_some_and(|expected| !expected.is_empty() && expected == secret);
        if !accepted {
            crate::security_log!("WARN", "operator_secret_rejected", email = input.email.as_str());
            return Err(AppError::new(ErrorCode::OperatorSecretInvalid));
        }
        self.create(input, normalize_standing(Role::Operator, true, true))
            .await
    }

    /// Create the default operator unless any operator exists.
    ///
    /// Returns the created account, `None` when nothing was needed.
    pub async fn seed_operator(&self, email: &str, name: &str) -> AppResult<Option<Account>> {
        if self.first_operator().await?.is_some() {
            return Ok(None);
        }
        let input = AccountCreate {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
        };
        match self
            .create(input, normalize_standing(Role::Operator, true, true))
            .await
        {
            Ok(account) => Ok(Some(account)),
            // Seeded concurrently, or the email is held by a subscriber
            Err(e) if e.code == ErrorCode::EmailAlreadyRegistered => {
                tracing::warn!(email = %email, "Seed operator email already registered");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// The oldest operator account, if any
    pub async fn first_operator(&self) -> AppResult<Option<Account>> {
        Ok(account::find_first_with_role(&self.pool, Role::Operator).await?)
    }

    pub async fn find(&self, id: i64) -> AppResult<Account> {
        account::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| account_not_found(id))
    }

    /// Case-insensitive lookup
    pub async fn find_by_email(&self, email: &str) -> AppResult<Account> {
        let email = normalize_email(email);
        account::find_by_email(&self.pool, &email)
            .await?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::AccountNotFound, format!("No account for '{email}'"))
            })
    }

    pub async fn list_pending(&self, actor: Actor) -> AppResult<Vec<Account>> {
        require_operator(self.gate.as_ref(), actor).await?;
        Ok(account::find_pending(&self.pool).await?)
    }

    pub async fn list_subscribers(&self, actor: Actor) -> AppResult<Vec<Account>> {
        require_operator(self.gate.as_ref(), actor).await?;
        Ok(account::find_subscribers(&self.pool).await?)
    }

    async fn write(&self, current: &Account, name: &str, phone: &str, standing: AccountStanding) -> AppResult<Account> {
        let updated = account::update(
            &self.pool,
            current.id,
            name,
            phone,
            standing.normalized(),
            self.clock.now_millis(),
        )
        .await?;
        Ok(updated)
    }

    pub async fn approve(&self, actor: Actor, user_id: i64) -> AppResult<Account> {
        require_operator(self.gate.as_ref(), actor).await?;
        let current = self.find(user_id).await?;
        let standing = AccountStanding {
            is_approved: true,
            ..current.standing()
        };
        let updated = self.write(&current, &current.name, &current.phone, standing).await?;
        tracing::info!(account_id = user_id, approved_by = actor.account_id, "Account approved");
        Ok(updated)
    }

    /// Flip `is_active`; an operator stays active
    pub async fn toggle_active(&self, actor: Actor, user_id: i64) -> AppResult<Account> {
        require_operator(self.gate.as_ref(), actor).await?;
        let current = self.find(user_id).await?;
        let standing = AccountStanding {
            is_active: !current.is_active,
            ..current.standing()
        };
        let updated = self.write(&current, &current.name, &current.phone, standing).await?;
        tracing::info!(account_id = user_id, is_active = updated.is_active, "Account activation toggled");
        Ok(updated)
    }

    /// Operator edit of any account; absent fields are kept
    pub async fn update_account(&self, actor: Actor, user_id: i64, update: AccountUpdate) -> AppResult<Account> {
        require_operator(self.gate.as_ref(), actor).await?;
        let current = self.find(user_id).await?;

        let name = match update.name.as_deref() {
            Some(name) => validate_required_text(name, "name", MAX_NAME_LEN)?,
            None => current.name.clone(),
        };
        let phone = update
            .phone
            .as_deref()
            .map(str::trim)
            .unwrap_or(&current.phone)
            .to_string();
        validate_optional_text(Some(&phone), "phone", MAX_SHORT_TEXT_LEN)?;

        let standing = AccountStanding {
            role: update.role.unwrap_or(current.role),
            is_active: update.is_active.unwrap_or(current.is_active),
            is_approved: update.is_approved.unwrap_or(current.is_approved),
        };
        let updated = self.write(&current, &name, &phone, standing).await?;
        tracing::info!(account_id = user_id, role = ?updated.role, "Account updated");
        Ok(updated)
    }

    /// Self-service edit of name and phone
    pub async fn update_profile(&self, actor: Actor, update: ProfileUpdate) -> AppResult<Account> {
        require_member(self.gate.as_ref(), actor).await?;
        let current = self.find(actor.account_id).await?;

        let name = match update.name.as_deref() {
            Some(name) => validate_required_text(name, "name", MAX_NAME_LEN)?,
            None => current.name.clone(),
        };
        let phone = update
            .phone
            .as_deref()
            .map(str::trim)
            .unwrap_or(&current.phone)
            .to_string();
        validate_optional_text(Some(&phone), "phone", MAX_SHORT_TEXT_LEN)?;

        self.write(&current, &name, &phone, current.standing()).await
    }

    /// Remove an account together with its ledger and ad-hoc entries
    pub async fn delete_account(&self, actor: Actor, user_id: i64) -> AppResult<CascadeReport> {
        require_operator(self.gate.as_ref(), actor).await?;
        if actor.account_id == user_id {
            return Err(AppError::forbidden("Operators cannot delete their own account"));
        }
        let report = account::delete_cascade(&self.pool, user_id)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => account_not_found(user_id),
                other => other.into(),
            })?;
        tracing::info!(
            account_id = user_id,
            deleted_by = actor.account_id,
            ledger_entries = report.ledger_entries,
            adhoc_entries = report.adhoc_entries,
            "Account deleted"
        );
        Ok(report)
    }
}
