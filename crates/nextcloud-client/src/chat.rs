// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · chat
// ──────────────────────────────────────────────────────────────────────────────
// Talk chat API v1: read history, long-poll for new messages, post, mark
// read and delete.
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NcResult;
use crate::request::{encode_segment, Endpoint, Fields, Requester};
use nextcloud_types::{ChatMessage, MessageQuery, NewMessage};
use std::time::Duration;

pub const ENDPOINT: Endpoint = Endpoint::new("/ocs/v2.php/apps/spreed/api/v1/chat", 200);

/// Grace period on top of the server-side poll timeout.
const POLL_GRACE: Duration = Duration::from_secs(10);

#[derive(Clone, Copy)]
pub struct Chat<'a> {
    requester: &'a dyn Requester,
}

impl<'a> Chat<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    /// Fetch messages of a conversation.
    ///
    /// With `look_into_future` the server holds the request for up to
    /// `timeout` seconds and answers 304 when nothing arrived, which
    /// yields an empty list.
    pub async fn get_messages(
        &self,
        token: &str,
        query: &MessageQuery,
    ) -> NcResult<Vec<ChatMessage>> {
        let mut fields = Fields::new()
            .push_flag("lookIntoFuture", query.look_into_future)
            .push("limit", query.limit)
            .push_flag("setReadMarker", query.set_read_marker)
            .push_flag("includeLastKnown", query.include_last_known);
        if query.look_into_future {
            fields = fields.push("timeout", query.timeout);
        }
        fields = fields.push_opt("lastKnownMessageId", query.last_known_message_id);

        let mut request = ENDPOINT.get(encode_segment(token)).fields(fields);
        if query.look_into_future {
            request = request.timeout(Duration::from_secs(u64::from(query.timeout)) + POLL_GRACE);
        }

        let resp = self.requester.ocs(request).await?;
        Ok(resp.decode()?)
    }

    /// Post a message; returns the stored message.
    pub async fn send_message(&self, token: &str, message: &NewMessage) -> NcResult<ChatMessage> {
        let fields = Fields::new()
            .push("message", &message.message)
            .push_opt("actorDisplayName", message.actor_display_name.as_deref())
            .push_opt("replyTo", message.reply_to)
            .push_opt("referenceId", message.reference_id.as_deref());
        let resp = self
            .requester
            .ocs(ENDPOINT.post(encode_segment(token)).fields(fields))
            .await?;
        Ok(resp.decode()?)
    }

    pub async fn mark_as_read(&self, token: &str, last_read_message: i64) -> NcResult<()> {
        let fields = Fields::new().push("lastReadMessage", last_read_message);
        self.requester
            .ocs(
                ENDPOINT
                    .post(format!("{}/read", encode_segment(token)))
                    .fields(fields),
            )
            .await?;
        Ok(())
    }

    /// Delete a message; the server replaces it with a system message,
    /// which is returned.
    pub async fn delete_message(&self, token: &str, message_id: i64) -> NcResult<ChatMessage> {
        let resp = self
            .requester
            .ocs(ENDPOINT.delete(format!("{}/{}", encode_segment(token), message_id)))
            .await?;
        Ok(resp.decode()?)
    }
}
