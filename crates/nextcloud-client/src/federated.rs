// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · federated
// ──────────────────────────────────────────────────────────────────────────────
// Federated shares received from other servers, pending and accepted.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NcResult;
use crate::request::{Endpoint, Requester};
use nextcloud_types::RemoteShare;

pub const ENDPOINT: Endpoint = Endpoint::new("/ocs/v2.php/apps/files_sharing/api/v1", 200);

#[derive(Clone, Copy)]
pub struct FederatedShares<'a> {
    requester: &'a dyn Requester,
}

impl<'a> FederatedShares<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    pub async fn list_accepted(&self) -> NcResult<Vec<RemoteShare>> {
        let resp = self.requester.ocs(ENDPOINT.get("remote_shares")).await?;
        Ok(resp.decode()?)
    }

    pub async fn get_known(&self, share_id: u64) -> NcResult<RemoteShare> {
        let resp = self
            .requester
            .ocs(ENDPOINT.get(format!("remote_shares/{share_id}")))
            .await?;
        Ok(resp.decode()?)
    }

    pub async fn delete_accepted(&self, share_id: u64) -> NcResult<()> {
        self.requester
            .ocs(ENDPOINT.delete(format!("remote_shares/{share_id}")))
            .await?;
        Ok(())
    }

    pub async fn list_pending(&self) -> NcResult<Vec<RemoteShare>> {
        let resp = self.requester.ocs(ENDPOINT.get("remote_shares/pending")).await?;
        Ok(resp.decode()?)
    }

    pub async fn accept_pending(&self, share_id: u64) -> NcResult<()> {
        self.requester
            .ocs(ENDPOINT.post(format!("remote_shares/pending/{share_id}")))
            .await?;
        Ok(())
    }

    pub async fn decline_pending(&self, share_id: u64) -> NcResult<()> {
        self.requester
            .ocs(ENDPOINT.delete(format!("remote_shares/pending/{share_id}")))
            .await?;
        Ok(())
    }
}
