// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · activity
// ──────────────────────────────────────────────────────────────────────────────
// OCS Activity API v2: the current user's feed, optionally narrowed to a
// single object (e.g. one file).
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NcResult;
use crate::request::{Endpoint, Fields, Requester};
use nextcloud_types::{ActivityItem, ActivityQuery};

pub const ENDPOINT: Endpoint = Endpoint::new("/ocs/v2.php/apps/activity/api/v2/activity", 200);

#[derive(Clone, Copy)]
pub struct Activity<'a> {
    requester: &'a dyn Requester,
}

impl<'a> Activity<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    /// List activities. Both `object_type` and `object_id` must be set to
    /// use the per-object filter; unset parameters are not sent.
    pub async fn get_activities(&self, query: &ActivityQuery) -> NcResult<Vec<ActivityItem>> {
        let path = match (&query.object_type, query.object_id) {
            (Some(_), Some(_)) => "filter",
            _ => "",
        };
        let fields = Fields::new()
            .push_opt("since", query.since)
            .push_opt("limit", query.limit)
            .push_opt("object_type", query.object_type.as_deref())
            .push_opt("object_id", query.object_id)
            .push_opt("sort", query.sort.map(|s| s.as_str()));

        let resp = self.requester.ocs(ENDPOINT.get(path).fields(fields)).await?;
        Ok(resp.decode()?)
    }

    /// Activities of one file, newest first.
    pub async fn activities_for_file(
        &self,
        file_id: u64,
        limit: Option<u32>,
    ) -> NcResult<Vec<ActivityItem>> {
        let query = ActivityQuery {
            limit,
            object_type: Some("files".to_string()),
            object_id: Some(file_id),
            ..ActivityQuery::default()
        };
        self.get_activities(&query).await
    }
}
