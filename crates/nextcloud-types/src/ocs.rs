// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-types · ocs
// ──────────────────────────────────────────────────────────────────────────────
// The OCS JSON envelope shared by every `/ocs/v{1,2}.php` endpoint:
//   { "ocs": { "meta": { ... }, "data": ... } }
// ──────────────────────────────────────────────────────────────────────────────

use crate::constants::OcsCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Standard OCS response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcsResponse<T> {
    pub ocs: OcsEnvelope<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcsEnvelope<T> {
    pub meta: OcsMeta,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcsMeta {
    pub status: String,
    pub statuscode: u32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "totalitems", default)]
    pub total_items: Option<String>,
    #[serde(rename = "itemsperpage", default)]
    pub items_per_page: Option<String>,
}

impl OcsMeta {
    /// Meta block for a reply the server answered without a body (e.g. 304).
    pub fn synthesized(statuscode: u32) -> Self {
        Self {
            status: "ok".to_string(),
            statuscode,
            message: None,
            total_items: None,
            items_per_page: None,
        }
    }

    pub fn is_success(&self, success_code: u32) -> bool {
        self.statuscode == success_code
    }

    /// The generic OCS code, if `statuscode` is one of them.
    pub fn ocs_code(&self) -> Option<OcsCode> {
        i32::try_from(self.statuscode)
            .ok()
            .and_then(OcsCode::from_i32)
    }
}

impl<T> OcsResponse<T> {
    pub fn meta(&self) -> &OcsMeta {
        &self.ocs.meta
    }

    pub fn data(&self) -> &T {
        &self.ocs.data
    }

    pub fn into_data(self) -> T {
        self.ocs.data
    }
}

impl OcsResponse<serde_json::Value> {
    /// Envelope standing in for an empty-bodied success reply.
    pub fn empty(statuscode: u32) -> Self {
        Self {
            ocs: OcsEnvelope {
                meta: OcsMeta::synthesized(statuscode),
                data: serde_json::Value::Array(Vec::new()),
            },
        }
    }

    /// Deserialize `data` into a concrete type.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.ocs.data)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const V2_OK: &str = r#"{"ocs":{"meta":{"status":"ok","statuscode":200,"message":"OK","totalitems":"","itemsperpage":""},"data":{"id":"alice"}}}"#;

    #[test]
    fn parse_v2_envelope() {
        let resp: OcsResponse<serde_json::Value> = serde_json::from_str(V2_OK).unwrap();
        assert_eq!(resp.meta().statuscode, 200);
        assert!(resp.meta().is_success(200));
        assert!(!resp.meta().is_success(100));
        assert_eq!(resp.data()["id"], "alice");
    }

    #[test]
    fn parse_meta_without_optional_fields() {
        let body = r#"{"ocs":{"meta":{"status":"failure","statuscode":998},"data":[]}}"#;
        let resp: OcsResponse<serde_json::Value> = serde_json::from_str(body).unwrap();
        assert_eq!(resp.meta().message, None);
        assert_eq!(resp.meta().ocs_code(), Some(OcsCode::NotFound));
    }

    #[test]
    fn decode_typed_data() {
        #[derive(Deserialize)]
        struct User {
            id: String,
        }
        let resp: OcsResponse<serde_json::Value> = serde_json::from_str(V2_OK).unwrap();
        let user: User = resp.decode().unwrap();
        assert_eq!(user.id, "alice");
    }

    #[test]
    fn empty_envelope_is_success() {
        let resp = OcsResponse::empty(200);
        assert!(resp.meta().is_success(200));
        let items: Vec<serde_json::Value> = resp.decode().unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn ocs_meta_serialization() {
        let meta = OcsMeta {
            status: "ok".into(),
            statuscode: 100,
            message: Some("OK".into()),
            total_items: None,
            items_per_page: None,
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"statuscode\":100"));
        assert_eq!(meta.ocs_code(), Some(OcsCode::Ok));
    }
}
