// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · apps
// ──────────────────────────────────────────────────────────────────────────────
// Provisioning API (v1): list, inspect, enable and disable installed apps.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NcResult;
use crate::request::{encode_segment, Endpoint, Fields, Requester};
use nextcloud_types::AppFilter;
use serde::Deserialize;

pub const ENDPOINT: Endpoint = Endpoint::new("/ocs/v1.php/cloud/apps", 100);

#[derive(Deserialize)]
struct AppList {
    #[serde(default)]
    apps: Vec<String>,
}

#[derive(Clone, Copy)]
pub struct Apps<'a> {
    requester: &'a dyn Requester,
}

impl<'a> Apps<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    /// App ids, optionally only enabled or disabled ones.
    pub async fn get_apps(&self, filter: Option<AppFilter>) -> NcResult<Vec<String>> {
        let fields = Fields::new().push_opt("filter", filter.map(|f| f.as_str()));
        let resp = self.requester.ocs(ENDPOINT.get("").fields(fields)).await?;
        Ok(resp.decode::<AppList>()?.apps)
    }

    /// The app's info document as the server reports it.
    pub async fn get_app(&self, app_id: &str) -> NcResult<serde_json::Value> {
        let resp = self.requester.ocs(ENDPOINT.get(encode_segment(app_id))).await?;
        Ok(resp.into_data())
    }

    pub async fn enable_app(&self, app_id: &str) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.post(encode_segment(app_id))).await?;
        Ok(())
    }

    pub async fn disable_app(&self, app_id: &str) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.delete(encode_segment(app_id))).await?;
        Ok(())
    }
}
