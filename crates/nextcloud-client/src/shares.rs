// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · shares
// ──────────────────────────────────────────────────────────────────────────────
// OCS Share API v1 operations:
//  • List shares (all / by path / shared with me)
//  • Get single share
//  • Create share (user, group, public link, email, federated, circle, Talk)
//  • Update one attribute of a share
//  • Delete share
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::{NcResult, NextcloudError};
use crate::request::{Endpoint, Fields, Requester};
use log::debug;
use nextcloud_types::*;

pub const ENDPOINT: Endpoint = Endpoint::new("/ocs/v2.php/apps/files_sharing/api/v1", 200);

#[derive(Clone, Copy)]
pub struct Shares<'a> {
    requester: &'a dyn Requester,
}

impl<'a> Shares<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    // ── Listing ──────────────────────────────────────────────────────────

    /// All shares created by the current user.
    pub async fn get_shares(&self) -> NcResult<Vec<ShareInfo>> {
        let resp = self.requester.ocs(ENDPOINT.get("shares")).await?;
        Ok(resp.decode()?)
    }

    /// Shares of one file or folder. `reshares` includes shares by other
    /// users; `subfiles` lists the shares of a folder's children instead.
    pub async fn get_shares_from_path(
        &self,
        path: &str,
        reshares: Option<bool>,
        subfiles: Option<bool>,
    ) -> NcResult<Vec<ShareInfo>> {
        let mut fields = Fields::new().push("path", path);
        if let Some(reshares) = reshares {
            fields = fields.push_bool("reshares", reshares);
        }
        if let Some(subfiles) = subfiles {
            fields = fields.push_bool("subfiles", subfiles);
        }
        let resp = self.requester.ocs(ENDPOINT.get("shares").fields(fields)).await?;
        Ok(resp.decode()?)
    }

    /// Shares other users made with the current user.
    pub async fn get_shared_with_me(&self) -> NcResult<Vec<ShareInfo>> {
        let fields = Fields::new().push_bool("shared_with_me", true);
        let resp = self.requester.ocs(ENDPOINT.get("shares").fields(fields)).await?;
        Ok(resp.decode()?)
    }

    /// A single share. The API wraps it in a one-element list.
    pub async fn get_share_info(&self, share_id: &str) -> NcResult<ShareInfo> {
        let resp = self.requester.ocs(ENDPOINT.get(share_path(share_id))).await?;
        resp.decode::<Vec<ShareInfo>>()?
            .into_iter()
            .next()
            .ok_or_else(|| NextcloudError::Ocs {
                http_status: 404,
                statuscode: 404,
                message: format!("share {share_id} not found"),
            })
    }

    // ── Create / update / delete ─────────────────────────────────────────

    pub async fn create_share(&self, args: &CreateShare) -> NcResult<ShareInfo> {
        let fields = create_fields(args)?;
        let resp = self.requester.ocs(ENDPOINT.post("shares").fields(fields)).await?;
        Ok(resp.decode()?)
    }

    pub async fn update_share(&self, share_id: &str, update: &ShareUpdate) -> NcResult<ShareInfo> {
        let fields = update_fields(update)?;
        let resp = self
            .requester
            .ocs(ENDPOINT.put(share_path(share_id)).fields(fields))
            .await?;
        Ok(resp.decode()?)
    }

    pub async fn delete_share(&self, share_id: &str) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.delete(share_path(share_id))).await?;
        Ok(())
    }
}

fn share_path(share_id: &str) -> String {
    format!("shares/{}", crate::request::encode_segment(share_id))
}

fn check_permissions(permissions: SharePermissions) -> NcResult<()> {
    if permissions.is_valid() {
        Ok(())
    } else {
        Err(NextcloudError::invalid(format!(
            "permissions {permissions} outside of {}",
            SharePermissions::ALL
        )))
    }
}

fn create_fields(args: &CreateShare) -> NcResult<Fields> {
    if args.path.is_empty() {
        return Err(NextcloudError::invalid("share path must not be empty"));
    }
    let share_with = args.share_with.as_deref().filter(|s| !s.is_empty());
    if args.share_type.requires_recipient() && share_with.is_none() {
        return Err(NextcloudError::invalid(format!(
            "share type {:?} requires share_with",
            args.share_type
        )));
    }
    if let Some(perms) = args.permissions {
        check_permissions(perms)?;
    }

    let mut fields = Fields::new()
        .push("path", &args.path)
        .push("shareType", args.share_type)
        .push_opt("shareWith", share_with);
    if args.public_upload == Some(true) {
        fields = fields.push_bool("publicUpload", true);
    }
    match (&args.password, args.share_type) {
        (Some(pw), ShareType::PublicLink) => fields = fields.push("password", pw),
        (Some(_), other) => debug!("password ignored for share type {:?}", other),
        (None, _) => {}
    }
    fields = fields
        .push_opt("permissions", args.permissions)
        .push_opt("expireDate", args.expire_date.map(expire_date));
    Ok(fields)
}

fn update_fields(update: &ShareUpdate) -> NcResult<Fields> {
    let fields = Fields::new();
    Ok(match update {
        ShareUpdate::Permissions(perms) => {
            check_permissions(*perms)?;
            fields.push("permissions", perms)
        }
        ShareUpdate::Password(pw) => fields.push("password", pw),
        ShareUpdate::PublicUpload(allow) => fields.push_bool("publicUpload", *allow),
        ShareUpdate::ExpireDate(date) => fields.push("expireDate", expire_date(*date)),
        ShareUpdate::Note(note) => fields.push("note", note),
        ShareUpdate::Label(label) => fields.push("label", label),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
