use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::core::{AppError, PageRequest, Pagination, Result, ServiceError};
use crate::modules::users::models::{EditUserRequest, SystemUser};
use crate::modules::users::repositories::UserRepository;

/// Service for system user management
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    pub async fn list_users(
        &self,
        tenant_id: i64,
        page: PageRequest,
    ) -> Result<(Vec<SystemUser>, Pagination)> {
        let (users, total) = self.user_repo.list(tenant_id, page).await?;
        Ok((users, page.meta(total)))
    }

    pub async fn get_user(&self, tenant_id: i64, user_id: i64) -> Result<SystemUser> {
        self.user_repo
            .find_by_id(tenant_id, user_id)
            .await?
            .ok_or(AppError::Service(ServiceError::UserNotFound))
    }

    /// Edit the details of the given user.
    ///
    /// Email and phone number collisions with other users of the tenant are
    /// reported together.
    pub async fn edit_user(
        &self,
        tenant_id: i64,
        user_id: i64,
        request: EditUserRequest,
    ) -> Result<()> {
        let details = request.validate()?;
        let user = self.get_user(tenant_id, user_id).await?;

        let mut conflicts = Vec::new();

        if let Some(other) = self.user_repo.find_by_email(tenant_id, &details.email).await? {
            if other.id != user.id {
                conflicts.push(ServiceError::EmailAlreadyExists);
            }
        }
        if let Some(phone_number) = &details.phone_number {
            if let Some(other) = self
                .user_repo
                .find_by_phone_number(tenant_id, phone_number)
                .await?
            {
                if other.id != user.id {
                    conflicts.push(ServiceError::PhoneNumberAlreadyExist);
                }
            }
        }
        if !conflicts.is_empty() {
            return Err(AppError::Services(conflicts));
        }

        self.user_repo
            .update_details(tenant_id, user.id, &details)
            .await?;

        info!(tenant_id, user_id, "User details updated");
        Ok(())
    }

    /// Soft delete the given user
    pub async fn delete_user(&self, tenant_id: i64, user_id: i64) -> Result<()> {
        let user = self.get_user(tenant_id, user_id).await?;
        self.user_repo
            .soft_delete(tenant_id, user.id, Utc::now())
            .await?;

        info!(tenant_id, user_id, "User deleted");
        Ok(())
    }

    pub async fn activate_user(&self, tenant_id: i64, user_id: i64) -> Result<()> {
        let user = self.get_user(tenant_id, user_id).await?;
        if user.active {
            return Err(ServiceError::UserAlreadyActive.into());
        }

        self.user_repo.set_active(tenant_id, user.id, true).await?;

        info!(tenant_id, user_id, "User activated");
        Ok(())
    }

    pub async fn inactivate_user(&self, tenant_id: i64, user_id: i64) -> Result<()> {
        let user = self.get_user(tenant_id, user_id).await?;
        if !user.active {
            return Err(ServiceError::UserAlreadyInactive.into());
        }

        self.user_repo.set_active(tenant_id, user.id, false).await?;

        info!(tenant_id, user_id, "User inactivated");
        Ok(())
    }
}

// Service behavior is exercised over HTTP in tests/contract/user_api_test.rs
