// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · notifications
// ──────────────────────────────────────────────────────────────────────────────
// Notifications API (v2): read and dismiss notifications.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NcResult;
use crate::request::{Endpoint, Requester};
use nextcloud_types::Notification;

pub const ENDPOINT: Endpoint =
    Endpoint::new("/ocs/v2.php/apps/notifications/api/v2/notifications", 200);

#[derive(Clone, Copy)]
pub struct Notifications<'a> {
    requester: &'a dyn Requester,
}

impl<'a> Notifications<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    pub async fn get_notifications(&self) -> NcResult<Vec<Notification>> {
        let resp = self.requester.ocs(ENDPOINT.get("")).await?;
        Ok(resp.decode()?)
    }

    pub async fn get_notification(&self, id: u64) -> NcResult<Notification> {
        let resp = self.requester.ocs(ENDPOINT.get(id.to_string())).await?;
        Ok(resp.decode()?)
    }

    pub async fn delete_notification(&self, id: u64) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.delete(id.to_string())).await?;
        Ok(())
    }

    pub async fn delete_all_notifications(&self) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.delete("")).await?;
        Ok(())
    }
}
