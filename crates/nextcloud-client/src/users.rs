// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · users
// ──────────────────────────────────────────────────────────────────────────────
// Provisioning API (v1) user management:
//  • Create, search, fetch, edit, enable/disable and delete users
//  • Group membership and sub-admin rights
//  • Welcome mail
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NcResult;
use crate::request::{encode_segment, Endpoint, Fields, Requester};
use nextcloud_types::{UserField, UserInfo};
use serde::Deserialize;

pub const ENDPOINT: Endpoint = Endpoint::new("/ocs/v1.php/cloud/users", 100);

#[derive(Deserialize)]
struct UserList {
    #[serde(default)]
    users: Vec<String>,
}

#[derive(Deserialize)]
struct GroupList {
    #[serde(default)]
    groups: Vec<String>,
}

#[derive(Clone, Copy)]
pub struct Users<'a> {
    requester: &'a dyn Requester,
}

impl<'a> Users<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    // ── Accounts ─────────────────────────────────────────────────────────

    pub async fn add_user(&self, uid: &str, password: &str) -> NcResult<()> {
        let fields = Fields::new().push("userid", uid).push("password", password);
        self.requester.ocs(ENDPOINT.post("").fields(fields)).await?;
        Ok(())
    }

    /// User ids, optionally filtered by `search` and paged.
    pub async fn get_users(
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
        Ok(resp.decode::<UserList>()?.users)
    }

    pub async fn get_user(&self, uid: &str) -> NcResult<UserInfo> {
        let resp = self.requester.ocs(ENDPOINT.get(encode_segment(uid))).await?;
        Ok(resp.decode()?)
    }

    pub async fn edit_user(&self, uid: &str, field: UserField, value: &str) -> NcResult<()> {
        let fields = Fields::new().push("key", field.as_str()).push("value", value);
        self.requester
            .ocs(ENDPOINT.put(encode_segment(uid)).fields(fields))
            .await?;
        Ok(())
    }

    pub async fn disable_user(&self, uid: &str) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.put(sub(uid, "disable"))).await?;
        Ok(())
    }

    pub async fn enable_user(&self, uid: &str) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.put(sub(uid, "enable"))).await?;
        Ok(())
    }

    pub async fn delete_user(&self, uid: &str) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.delete(encode_segment(uid))).await?;
        Ok(())
    }

    // ── Groups & sub-admins ──────────────────────────────────────────────

    pub async fn get_user_groups(&self, uid: &str) -> NcResult<Vec<String>> {
        let resp = self.requester.ocs(ENDPOINT.get(sub(uid, "groups"))).await?;
        Ok(resp.decode::<GroupList>()?.groups)
    }

    pub async fn add_to_group(&self, uid: &str, gid: &str) -> NcResult<()> {
        let fields = Fields::new().push("groupid", gid);
        self.requester
            .ocs(ENDPOINT.post(sub(uid, "groups")).fields(fields))
            .await?;
        Ok(())
    }

    pub async fn remove_from_group(&self, uid: &str, gid: &str) -> NcResult<()> {
        let fields = Fields::new().push("groupid", gid);
        self.requester
            .ocs(ENDPOINT.delete(sub(uid, "groups")).fields(fields))
            .await?;
        Ok(())
    }

    /// Make the user a sub-admin of `gid`.
    pub async fn create_subadmin(&self, uid: &str, gid: &str) -> NcResult<()> {
        let fields = Fields::new().push("groupid", gid);
        self.requester
            .ocs(ENDPOINT.post(sub(uid, "subadmins")).fields(fields))
            .await?;
        Ok(())
    }

    pub async fn remove_subadmin(&self, uid: &str, gid: &str) -> NcResult<()> {
        let fields = Fields::new().push("groupid", gid);
        self.requester
            .ocs(ENDPOINT.delete(sub(uid, "subadmins")).fields(fields))
            .await?;
        Ok(())
    }

    /// Groups the user administers.
    pub async fn get_subadmin_groups(&self, uid: &str) -> NcResult<Vec<String>> {
        let resp = self.requester.ocs(ENDPOINT.get(sub(uid, "subadmins"))).await?;
        Ok(resp.decode()?)
    }

    pub async fn resend_welcome_mail(&self, uid: &str) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.post(sub(uid, "welcome"))).await?;
        Ok(())
    }
}

fn sub(uid: &str, rest: &str) -> String {
    format!("{}/{}", encode_segment(uid), rest)
}
