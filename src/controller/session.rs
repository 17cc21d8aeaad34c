//! Session Loader
//!
//! Resolves an authenticated user id to its profile row and household,
//! and routes membership changes through the remote procedures.

use std::sync::Arc;

use tracing::warn;

use crate::domain::{DomainError, DomainResult, Household, User};
use crate::gateway::{Procedures, TableGateway};

/// The signed-in user's profile and household, loaded together
pub struct Session {
    users: Arc<dyn TableGateway<User>>,
    households: Arc<dyn TableGateway<Household>>,
    procedures: Arc<dyn Procedures>,
    user_id: String,
    user: Option<User>,
    household: Option<Household>,
    loading: bool,
    error: Option<String>,
}

impl Session {
    pub fn new(
        users: Arc<dyn TableGateway<User>>,
        households: Arc<dyn TableGateway<Household>>,
        procedures: Arc<dyn Procedures>,
        user_id: &str,
    ) -> Self {
        Self {
            users,
            households,
            procedures,
            user_id: user_id.to_string(),
            user: None,
            household: None,
            loading: false,
            error: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn household(&self) -> Option<&Household> {
        self.household.as_ref()
    }

    /// The household id collections should be scoped to, once loaded
    pub fn household_id(&self) -> Option<&str> {
        self.household.as_ref().map(|h| h.id.as_str())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the profile row, then the household row if the user
    /// belongs to one
    pub async fn load(&mut self) -> DomainResult<()> {
        self.loading = true;
        self.error = None;
        let outcome = self.fetch().await;
        self.loading = false;
        if let Err(e) = &outcome {
            warn!(user_id = %self.user_id, error = %e, "session load failed");
            self.error = Some(e.to_string());
        }
        outcome
    }

    async fn fetch(&mut self) -> DomainResult<()> {
        let user = self
            .users
            .find_by_id(&self.user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user {}", self.user_id)))?;

        self.household = match user.household_id.as_deref() {
            Some(household_id) => Some(
                self.households
                    .find_by_id(household_id)
                    .await?
                    .ok_or_else(|| DomainError::NotFound(format!("household {}", household_id)))?,
            ),
            None => None,
        };
        self.user = Some(user);
        Ok(())
    }

    /// Create a household owned by this user and reload
    pub async fn create_household(&mut self, name: &str) -> DomainResult<String> {
        let household_id = self
            .procedures
            .create_household_for_user(&self.user_id, name)
            .await?;
        self.load().await?;
        Ok(household_id)
    }

    /// Join the household behind an invite code and reload
    pub async fn join_household(&mut self, code: &str) -> DomainResult<String> {
        let code = code.trim();
        if code.is_empty() {
            return Err(DomainError::Invalid("invite code is empty".to_string()));
        }
        let household_id = self.procedures.join_household(&self.user_id, code).await?;
        self.load().await?;
        Ok(household_id)
    }

    /// Rotate the current household's invite code
    pub async fn regenerate_invite_code(&mut self) -> DomainResult<String> {
        let household_id = self
            .household_id()
            .ok_or_else(|| DomainError::Invalid("no household to rotate".to_string()))?
            .to_string();
        let code = self.procedures.regenerate_invite_code(&household_id).await?;
        if let Some(household) = &mut self.household {
            household.invite_code = code.clone();
        }
        Ok(code)
    }
}
