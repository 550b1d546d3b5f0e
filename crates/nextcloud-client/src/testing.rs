//! Recording `Requester` double for wrapper unit tests.

use crate::error::NcResult;
use crate::request::{DavReply, DavRequest, OcsRequest, Requester};
use async_trait::async_trait;
use nextcloud_types::{OcsEnvelope, OcsMeta, OcsResponse};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct MockRequester {
    ocs_calls: Mutex<Vec<OcsRequest>>,
    dav_calls: Mutex<Vec<DavRequest>>,
    ocs_replies: Mutex<VecDeque<NcResult<OcsResponse<Value>>>>,
    dav_replies: Mutex<VecDeque<NcResult<DavReply>>>,
}

impl MockRequester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock whose first OCS call answers with `data`.
    pub fn with_data(data: Value) -> Self {
        let mock = Self::new();
        mock.push_data(data);
        mock
    }

    pub fn push_data(&self, data: Value) {
        let reply = OcsResponse {
            ocs: OcsEnvelope {
                meta: OcsMeta::synthesized(200),
                data,
            },
        };
        self.ocs_replies.lock().unwrap().push_back(Ok(reply));
    }

    pub fn push_ocs_error(&self, err: crate::error::NextcloudError) {
        self.ocs_replies.lock().unwrap().push_back(Err(err));
    }

    pub fn push_dav(&self, status: u16, body: &str) {
        self.dav_replies.lock().unwrap().push_back(Ok(DavReply {
            status,
            body: body.as_bytes().to_vec(),
        }));
    }

    pub fn push_dav_error(&self, err: crate::error::NextcloudError) {
        self.dav_replies.lock().unwrap().push_back(Err(err));
    }

    pub fn ocs_calls(&self) -> Vec<OcsRequest> {
        self.ocs_calls.lock().unwrap().clone()
    }

    pub fn last_ocs(&self) -> OcsRequest {
        self.ocs_calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no OCS request recorded")
    }

    pub fn dav_calls(&self) -> Vec<DavRequest> {
        self.dav_calls.lock().unwrap().clone()
    }

    pub fn last_dav(&self) -> DavRequest {
        self.dav_calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no WebDAV request recorded")
    }
}

#[async_trait]
impl Requester for MockRequester {
    async fn ocs(&self, request: OcsRequest) -> NcResult<OcsResponse<Value>> {
        let code = request.endpoint.success_code;
        self.ocs_calls.lock().unwrap().push(request);
        let reply = self.ocs_replies.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Ok(OcsResponse::empty(code)))
    }

    async fn dav(&self, request: DavRequest) -> NcResult<DavReply> {
        self.dav_calls.lock().unwrap().push(request);
        let reply = self.dav_replies.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| {
            Ok(DavReply {
                status: 201,
                body: Vec::new(),
            })
        })
    }
}

/// Assert the exact ordered field list of a recorded request.
pub(crate) fn assert_fields(request: &OcsRequest, expected: &[(&str, &str)]) {
    let actual: Vec<(&str, &str)> = request
        .fields
        .as_slice()
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(actual, expected, "fields of {} {}", request.method, request.url_path());
}
