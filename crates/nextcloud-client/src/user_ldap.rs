// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · user_ldap
// ──────────────────────────────────────────────────────────────────────────────
// LDAP backend configurations (user_ldap app, OCS API v1 under ocs/v2.php):
//  • Create / read / edit / delete configurations
//  • Single-key get/set helpers
//  • Cache invalidation via the cache TTL
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::{NcResult, NextcloudError};
use crate::request::{encode_segment, Endpoint, Fields, Requester};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const ENDPOINT: Endpoint = Endpoint::new("/ocs/v2.php/apps/user_ldap/api/v1/config", 200);

/// Configuration keys the user_ldap app accepts in `configData`.
pub const LDAP_CONFIG_KEYS: &[&str] = &[
    "hasMemberOfFilterSupport",
    "homeFolderNamingRule",
    "lastJpegPhotoLookup",
    "ldapAgentName",
    "ldapAgentPassword",
    "ldapAttributesForGroupSearch",
    "ldapAttributesForUserSearch",
    "ldapBackupHost",
    "ldapBackupPort",
    "ldapBase",
    "ldapBaseGroups",
    "ldapBaseUsers",
    "ldapCacheTTL",
    "ldapConfigurationActive",
    "ldapDefaultPPolicyDN",
    "ldapDynamicGroupMemberURL",
    "ldapEmailAttribute",
    "ldapExperiencedAdmin",
    "ldapExpertUUIDGroupAttr",
    "ldapExpertUUIDUserAttr",
    "ldapExpertUsernameAttr",
    "ldapExtStorageHomeAttribute",
    "ldapGidNumber",
    "ldapGroupDisplayName",
    "ldapGroupFilter",
    "ldapGroupFilterGroups",
    "ldapGroupFilterMode",
    "ldapGroupFilterObjectclass",
    "ldapGroupMemberAssocAttr",
    "ldapHost",
    "ldapIgnoreNamingRules",
    "ldapLoginFilter",
    "ldapLoginFilterAttributes",
    "ldapLoginFilterEmail",
    "ldapLoginFilterMode",
    "ldapLoginFilterUsername",
    "ldapMatchingRuleInChainState",
    "ldapNestedGroups",
    "ldapOverrideMainServer",
    "ldapPagingSize",
    "ldapPort",
    "ldapQuotaAttribute",
    "ldapQuotaDefault",
    "ldapTLS",
    "ldapUserAvatarRule",
    "ldapUserDisplayName",
    "ldapUserDisplayName2",
    "ldapUserFilter",
    "ldapUserFilterGroups",
    "ldapUserFilterMode",
    "ldapUserFilterObjectclass",
    "ldapUuidGroupAttribute",
    "ldapUuidUserAttribute",
    "turnOffCertCheck",
    "turnOnPasswordChange",
    "useMemberOfToDetectMembership",
];

const CACHE_TTL_KEY: &str = "ldapCacheTTL";

pub fn is_known_ldap_key(key: &str) -> bool {
    LDAP_CONFIG_KEYS.contains(&key)
}

#[derive(Deserialize)]
struct CreatedConfig {
    #[serde(rename = "configID")]
    config_id: String,
}

#[derive(Clone, Copy)]
pub struct UserLdap<'a> {
    requester: &'a dyn Requester,
}

impl<'a> UserLdap<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    /// Create an empty configuration; returns its id (e.g. `s01`).
    pub async fn create_ldap_config(&self) -> NcResult<String> {
        let resp = self.requester.ocs(ENDPOINT.post("")).await?;
        Ok(resp.decode::<CreatedConfig>()?.config_id)
    }

    pub async fn get_ldap_config(
        &self,
        config_id: &str,
        show_password: bool,
    ) -> NcResult<BTreeMap<String, Value>> {
        let fields = Fields::new().push_flag("showPassword", show_password);
        let resp = self
            .requester
            .ocs(ENDPOINT.get(encode_segment(config_id)).fields(fields))
            .await?;
        Ok(resp.decode()?)
    }

    pub async fn edit_ldap_config(
        &self,
        config_id: &str,
        data: &BTreeMap<String, String>,
    ) -> NcResult<()> {
        let fields = data.iter().fold(Fields::new(), |fields, (key, value)| {
            fields.push(&format!("configData[{key}]"), value)
        });
        self.requester
            .ocs(ENDPOINT.put(encode_segment(config_id)).fields(fields))
            .await?;
        Ok(())
    }

    pub async fn delete_ldap_config(&self, config_id: &str) -> NcResult<()> {
        self.requester
            .ocs(ENDPOINT.delete(encode_segment(config_id)))
            .await?;
        Ok(())
    }

    /// Value of one key, or `None` when the server does not report it.
    pub async fn get_ldap_config_value(&self, config_id: &str, key: &str) -> NcResult<Option<Value>> {
        check_key(key)?;
        let mut config = self.get_ldap_config(config_id, false).await?;
        Ok(config.remove(key))
    }

    pub async fn set_ldap_config_value(
        &self,
        config_id: &str,
        key: &str,
        value: &str,
    ) -> NcResult<()> {
        check_key(key)?;
        let data = BTreeMap::from([(key.to_string(), value.to_string())]);
        self.edit_ldap_config(config_id, &data).await
    }

    /// Drop cached LDAP lookups by zeroing the cache TTL, then restoring it.
    pub async fn invalidate_ldap_cache(&self, config_id: &str) -> NcResult<()> {
        let previous = match self.get_ldap_config_value(config_id, CACHE_TTL_KEY).await? {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        self.set_ldap_config_value(config_id, CACHE_TTL_KEY, "0").await?;
        if !previous.is_empty() && previous != "0" {
            self.set_ldap_config_value(config_id, CACHE_TTL_KEY, &previous).await?;
        }
        Ok(())
    }
}

fn check_key(key: &str) -> NcResult<()> {
    if is_known_ldap_key(key) {
        Ok(())
    } else {
        Err(NextcloudError::invalid(format!("unknown LDAP config key: {key}")))
    }
}
