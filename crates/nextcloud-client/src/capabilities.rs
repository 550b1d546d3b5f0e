// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · capabilities
// ──────────────────────────────────────────────────────────────────────────────
// Server version and capability tree, plus dotted-path lookups into it
// (e.g. `spreed.features`, `files_sharing.public.enabled`).
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NcResult;
use crate::request::{Endpoint, Requester};
use nextcloud_types::ServerCapabilities;
use serde_json::Value;

pub const ENDPOINT: Endpoint = Endpoint::new("/ocs/v1.php/cloud/capabilities", 100);

#[derive(Clone, Copy)]
pub struct Capabilities<'a> {
    requester: &'a dyn Requester,
}

impl<'a> Capabilities<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    pub async fn get_capabilities(&self) -> NcResult<ServerCapabilities> {
        let resp = self.requester.ocs(ENDPOINT.get("")).await?;
        Ok(resp.decode()?)
    }
}

fn lookup<'c>(caps: &'c ServerCapabilities, path: &str) -> Option<&'c Value> {
    let mut current = &caps.capabilities.as_ref()?.0;
    for key in path.split('.') {
        current = current.get(key)?;
    }
    Some(current)
}

/// Whether the dotted `path` exists in the capability tree.
pub fn has_capability(caps: &ServerCapabilities, path: &str) -> bool {
    lookup(caps, path).is_some()
}

/// Extract a capability value as a string.
pub fn capability_str(caps: &ServerCapabilities, path: &str) -> Option<String> {
    lookup(caps, path)?.as_str().map(str::to_string)
}

/// Whether a Talk feature flag (`spreed.features`) is advertised.
pub fn has_talk_feature(caps: &ServerCapabilities, feature: &str) -> bool {
    lookup(caps, "spreed.features")
        .and_then(Value::as_array)
        .map(|list| list.iter().any(|f| f.as_str() == Some(feature)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRequester;
    use nextcloud_types::CapabilitiesMap;
    use serde_json::json;

    fn caps() -> ServerCapabilities {
        ServerCapabilities {
            version: None,
            capabilities: Some(CapabilitiesMap(json!({
                "files": {"bigfilechunking": true},
                "core": {"webdav-root": "remote.php/webdav"},
                "spreed": {"features": ["audio", "chat-v2"]}
            }))),
        }
    }

    #[tokio::test]
    async fn fetch_decodes_version() {
        let mock = MockRequester::with_data(json!({
            "version": {"major": 28, "minor": 0, "micro": 4, "string": "28.0.4"},
            "capabilities": {"core": {"pollinterval": 60}}
        }));
        let caps = Capabilities::new(&mock).get_capabilities().await.unwrap();
        let version = caps.version.as_ref().unwrap();
        assert_eq!(version.major, Some(28));
        assert_eq!(version.string.as_deref(), Some("28.0.4"));
        assert!(has_capability(&caps, "core.pollinterval"));
        assert_eq!(mock.last_ocs().url_path(), "/ocs/v1.php/cloud/capabilities");
    }

    #[test]
    fn has_capability_nested() {
        let caps = caps();
        assert!(has_capability(&caps, "files.bigfilechunking"));
        assert!(!has_capability(&caps, "files.nonexistent"));
        assert!(!has_capability(&caps, "missing"));
        assert!(!has_capability(&ServerCapabilities::default(), "files"));
    }

    #[test]
    fn capability_str_value() {
        let caps = caps();
        assert_eq!(
            capability_str(&caps, "core.webdav-root").as_deref(),
            Some("remote.php/webdav")
        );
        assert_eq!(capability_str(&caps, "files.bigfilechunking"), None);
    }

    #[test]
    fn talk_features() {
        let caps = caps();
        assert!(has_talk_feature(&caps, "chat-v2"));
        assert!(!has_talk_feature(&caps, "federation"));
    }
}
