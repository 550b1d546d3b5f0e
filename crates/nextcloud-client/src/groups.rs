// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · groups
// ──────────────────────────────────────────────────────────────────────────────
// Provisioning API (v1): search, create, inspect and delete groups.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NcResult;
use crate::request::{encode_segment, Endpoint, Fields, Requester};
use serde::Deserialize;

pub const ENDPOINT: Endpoint = Endpoint::new("/ocs/v1.php/cloud/groups", 100);

#[derive(Deserialize)]
struct GroupList {
    #[serde(default)]
    groups: Vec<String>,
}

#[derive(Deserialize)]
struct MemberList {
    #[serde(default)]
    users: Vec<String>,
}

#[derive(Clone, Copy)]
pub struct Groups<'a> {
    requester: &'a dyn Requester,
}

impl<'a> Groups<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    pub async fn get_groups(
        &self,
        search: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> NcResult<Vec<String>> {
        let fields = Fields::new()
            .push_opt("search", search)
            .push_opt("limit", limit)
            .push_opt("offset", offset);
        let resp = self.requester.ocs(ENDPOINT.get("").fields(fields)).await?;
        Ok(resp.decode::<GroupList>()?.groups)
    }

    pub async fn add_group(&self, gid: &str) -> NcResult<()> {
        let fields = Fields::new().push("groupid", gid);
        self.requester.ocs(ENDPOINT.post("").fields(fields)).await?;
        Ok(())
    }

    /// Member user ids of the group.
    pub async fn get_group(&self, gid: &str) -> NcResult<Vec<String>> {
        let resp = self.requester.ocs(ENDPOINT.get(encode_segment(gid))).await?;
        Ok(resp.decode::<MemberList>()?.users)
    }

    /// User ids holding sub-admin rights over the group.
    pub async fn get_subadmins(&self, gid: &str) -> NcResult<Vec<String>> {
        let resp = self
            .requester
            .ocs(ENDPOINT.get(format!("{}/subadmins", encode_segment(gid))))
            .await?;
        Ok(resp.decode()?)
    }

    pub async fn delete_group(&self, gid: &str) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.delete(encode_segment(gid))).await?;
        Ok(())
    }
}
