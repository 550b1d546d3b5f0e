// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · group_folders
// ──────────────────────────────────────────────────────────────────────────────
// Admin-managed group folders (the groupfolders app):
//  • List / fetch / create / rename / delete folders
//  • Grant and revoke group access, per-group permissions
//  • Quota and advanced-permission (ACL) switches
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NcResult;
use crate::request::{encode_segment, Endpoint, Fields, Requester};
use nextcloud_types::{GroupFolder, SharePermissions};
use serde::Deserialize;
use serde_json::Value;

pub const ENDPOINT: Endpoint = Endpoint::new("/apps/groupfolders/folders", 100);

#[derive(Deserialize)]
struct CreatedFolder {
    id: u64,
}

#[derive(Clone, Copy)]
pub struct GroupFolders<'a> {
    requester: &'a dyn Requester,
}

impl<'a> GroupFolders<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    /// All group folders, ordered by id.
    pub async fn get_group_folders(&self) -> NcResult<Vec<GroupFolder>> {
        let resp = self.requester.ocs(ENDPOINT.get("")).await?;
        folders_from_data(resp.into_data())
    }

    pub async fn get_group_folder(&self, folder_id: u64) -> NcResult<GroupFolder> {
        let resp = self.requester.ocs(ENDPOINT.get(folder_id.to_string())).await?;
        Ok(resp.decode()?)
    }

    /// Create a folder mounted at `mountpoint`; returns its id.
    pub async fn create_group_folder(&self, mountpoint: &str) -> NcResult<u64> {
        let fields = Fields::new().push("mountpoint", mountpoint);
        let resp = self.requester.ocs(ENDPOINT.post("").fields(fields)).await?;
        Ok(resp.decode::<CreatedFolder>()?.id)
    }

    pub async fn delete_group_folder(&self, folder_id: u64) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.delete(folder_id.to_string())).await?;
        Ok(())
    }

    pub async fn grant_access(&self, folder_id: u64, gid: &str) -> NcResult<()> {
        let fields = Fields::new().push("group", gid);
        self.requester
            .ocs(ENDPOINT.post(format!("{folder_id}/groups")).fields(fields))
            .await?;
        Ok(())
    }

    pub async fn revoke_access(&self, folder_id: u64, gid: &str) -> NcResult<()> {
        self.requester
            .ocs(ENDPOINT.delete(group_path(folder_id, gid)))
            .await?;
        Ok(())
    }

    pub async fn set_permissions(
        &self,
        folder_id: u64,
        gid: &str,
        permissions: SharePermissions,
    ) -> NcResult<()> {
        let fields = Fields::new().push("permissions", permissions);
        self.requester
            .ocs(ENDPOINT.post(group_path(folder_id, gid)).fields(fields))
            .await?;
        Ok(())
    }

    /// Quota in bytes, or `QUOTA_UNLIMITED`.
    pub async fn set_quota(&self, folder_id: u64, quota: i64) -> NcResult<()> {
        let fields = Fields::new().push("quota", quota);
        self.requester
            .ocs(ENDPOINT.post(format!("{folder_id}/quota")).fields(fields))
            .await?;
        Ok(())
    }

    pub async fn rename_group_folder(&self, folder_id: u64, mountpoint: &str) -> NcResult<()> {
        let fields = Fields::new().push("mountpoint", mountpoint);
        self.requester
            .ocs(ENDPOINT.post(format!("{folder_id}/mountpoint")).fields(fields))
            .await?;
        Ok(())
    }

    /// Toggle advanced permissions for the folder.
    pub async fn set_acl(&self, folder_id: u64, enabled: bool) -> NcResult<()> {
        let fields = Fields::new().push_flag("acl", enabled);
        self.requester
            .ocs(ENDPOINT.post(format!("{folder_id}/acl")).fields(fields))
            .await?;
        Ok(())
    }
}

fn group_path(folder_id: u64, gid: &str) -> String {
    format!("{folder_id}/groups/{}", encode_segment(gid))
}

/// The listing is an id-keyed object, or `[]` when there are no folders.
fn folders_from_data(data: Value) -> NcResult<Vec<GroupFolder>> {
    let mut folders: Vec<GroupFolder> = match data {
        Value::Object(map) => map
            .into_iter()
            .map(|(_, v)| serde_json::from_value(v))
            .collect::<Result<_, _>>()?,
        other => serde_json::from_value(other)?,
    };
    folders.sort_by_key(|f| f.id);
    Ok(folders)
}
