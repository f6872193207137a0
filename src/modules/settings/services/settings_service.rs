use std::sync::Arc;

use tracing::{info, warn};

use crate::core::{Currency, Result};
use crate::modules::settings::models::{
    OrganizationProfile, Setting, SettingsRequest, BASE_CURRENCY_KEY, ORGANIZATION_GROUP,
    ORGANIZATION_NAME_KEY,
};
use crate::modules::settings::repositories::SettingRepository;

pub struct SettingsService {
    setting_repo: Arc<dyn SettingRepository>,
}

impl SettingsService {
    pub fn new(setting_repo: Arc<dyn SettingRepository>) -> Self {
        Self { setting_repo }
    }

    pub async fn get_settings(&self, tenant_id: i64) -> Result<Vec<Setting>> {
        self.setting_repo.list(tenant_id).await
    }

    pub async fn save_settings(&self, tenant_id: i64, request: SettingsRequest) -> Result<()> {
        for option in &request.options {
            option.validate()?;
        }

        self.setting_repo.upsert(tenant_id, &request.options).await?;

        info!(tenant_id, count = request.options.len(), "Settings saved");
        Ok(())
    }

    /// Organization name and base currency, falling back to defaults for
    /// options that were never saved
    pub async fn organization(&self, tenant_id: i64) -> Result<OrganizationProfile> {
        let mut profile = OrganizationProfile::default();

        if let Some(name) = self
            .setting_repo
            .get(tenant_id, ORGANIZATION_GROUP, ORGANIZATION_NAME_KEY)
            .await?
        {
            profile.name = name;
        }

        if let Some(code) = self
            .setting_repo
            .get(tenant_id, ORGANIZATION_GROUP, BASE_CURRENCY_KEY)
            .await?
        {
            match code.parse::<Currency>() {
                Ok(currency) => profile.base_currency = currency,
                Err(e) => warn!(tenant_id, error = %e, "Ignoring stored base currency"),
            }
        }

        Ok(profile)
    }
}
