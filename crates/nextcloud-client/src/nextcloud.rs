// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · nextcloud
// ──────────────────────────────────────────────────────────────────────────────
// `NextCloud` facade: one requester, one accessor per endpoint group.
// ──────────────────────────────────────────────────────────────────────────────

use crate::activity::Activity;
use crate::apps::Apps;
use crate::capabilities::Capabilities;
use crate::chat::Chat;
use crate::client::NextcloudClient;
use crate::config::ClientConfig;
use crate::conversations::Conversations;
use crate::error::NcResult;
use crate::federated::FederatedShares;
use crate::group_folders::GroupFolders;
use crate::groups::Groups;
use crate::notifications::Notifications;
use crate::request::Requester;
use crate::shares::Shares;
use crate::user_ldap::UserLdap;
use crate::users::Users;
use crate::webdav::WebDav;
use log::{info, warn};
use nextcloud_types::ServerCapabilities;

/// Entry point bundling every endpoint wrapper over one requester.
pub struct NextCloud<R: Requester = NextcloudClient> {
    requester: R,
    user: String,
}

impl NextCloud<NextcloudClient> {
    pub fn new(config: ClientConfig) -> NcResult<Self> {
        let user = config.user.clone();
        Ok(Self {
            requester: NextcloudClient::new(config)?,
            user,
        })
    }

    /// Configure from `NEXTCLOUD_*` environment variables.
    pub fn from_env() -> NcResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn client(&self) -> &NextcloudClient {
        &self.requester
    }
}

impl<R: Requester> NextCloud<R> {
    /// Wrap an existing requester acting as `user`.
    pub fn with_requester(requester: R, user: impl Into<String>) -> Self {
        Self {
            requester,
            user: user.into(),
        }
    }

    /// The authenticated user id; the default WebDAV home.
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn requester(&self) -> &dyn Requester {
        &self.requester
    }

    pub fn activity(&self) -> Activity<'_> {
        Activity::new(&self.requester)
    }

    pub fn apps(&self) -> Apps<'_> {
        Apps::new(&self.requester)
    }

    pub fn capabilities(&self) -> Capabilities<'_> {
        Capabilities::new(&self.requester)
    }

    pub fn chat(&self) -> Chat<'_> {
        Chat::new(&self.requester)
    }

    pub fn conversations(&self) -> Conversations<'_> {
        Conversations::new(&self.requester)
    }

    pub fn federated_shares(&self) -> FederatedShares<'_> {
        FederatedShares::new(&self.requester)
    }

    pub fn group_folders(&self) -> GroupFolders<'_> {
        GroupFolders::new(&self.requester)
    }

    pub fn groups(&self) -> Groups<'_> {
        Groups::new(&self.requester)
    }

    pub fn notifications(&self) -> Notifications<'_> {
        Notifications::new(&self.requester)
    }

    pub fn shares(&self) -> Shares<'_> {
        Shares::new(&self.requester)
    }

    pub fn user_ldap(&self) -> UserLdap<'_> {
        UserLdap::new(&self.requester)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(&self.requester)
    }

    pub fn webdav(&self) -> WebDav<'_> {
        WebDav::new(&self.requester)
    }

    /// Verify URL and credentials with an authenticated capabilities call.
    pub async fn check_connection(&self) -> NcResult<ServerCapabilities> {
        match self.capabilities().get_capabilities().await {
            Ok(caps) => {
                let version = caps
                    .version
                    .as_ref()
                    .and_then(|v| v.string.clone())
                    .unwrap_or_else(|| "unknown".to_string());
                info!("connected as {} (server {})", self.user, version);
                Ok(caps)
            }
            Err(e) => {
                warn!("connection check failed for {}: {}", self.user, e);
                Err(e)
            }
        }
    }
}
