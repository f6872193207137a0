mod setting;

pub use setting::{
    OrganizationProfile, Setting, SettingsRequest, BASE_CURRENCY_KEY, ORGANIZATION_GROUP,
    ORGANIZATION_NAME_KEY,
};
