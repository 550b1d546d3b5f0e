// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-client · conversations
// ──────────────────────────────────────────────────────────────────────────────
// Talk conversation (room) management, spreed API v1:
//  • Create one-to-one / group / public conversations
//  • List, fetch, rename and delete
//  • Public/private, read-only, password, favorite, notification level
//  • Participants
// ──────────────────────────────────────────────────────────────────────────────

use crate::error::NcResult;
use crate::request::{encode_segment, Endpoint, Fields, Requester};
use nextcloud_types::*;

pub const ENDPOINT: Endpoint = Endpoint::new("/ocs/v2.php/apps/spreed/api/v1/room", 200);

/// Conversation wrapper over a shared requester.
#[derive(Clone, Copy)]
pub struct Conversations<'a> {
    requester: &'a dyn Requester,
}

impl<'a> Conversations<'a> {
    pub fn new(requester: &'a dyn Requester) -> Self {
        Self { requester }
    }

    // ── Create ───────────────────────────────────────────────────────────

    /// Start a one-to-one conversation with `invite` (a user id).
    pub async fn add_one_to_one_conversation(&self, invite: &str) -> NcResult<Conversation> {
        let fields = Fields::new()
            .push("roomType", ConversationType::OneToOne)
            .push("invite", invite);
        let resp = self.requester.ocs(ENDPOINT.post("").fields(fields)).await?;
        Ok(resp.decode()?)
    }

    /// Create a group conversation, optionally inviting a group or circle.
    pub async fn add_group_conversation(
        &self,
        name: &str,
        invite: Option<&str>,
        source: ParticipantSource,
    ) -> NcResult<Conversation> {
        let fields = Fields::new()
            .push("roomType", ConversationType::Group)
            .push_opt("invite", invite)
            .push("roomName", name)
            .push("source", source.as_str());
        let resp = self.requester.ocs(ENDPOINT.post("").fields(fields)).await?;
        Ok(resp.decode()?)
    }

    pub async fn add_public_conversation(&self, name: &str) -> NcResult<Conversation> {
        let fields = Fields::new()
            .push("roomType", ConversationType::Public)
            .push("roomName", name);
        let resp = self.requester.ocs(ENDPOINT.post("").fields(fields)).await?;
        Ok(resp.decode()?)
    }

    // ── Read ─────────────────────────────────────────────────────────────

    /// All conversations the current user takes part in.
    pub async fn get_conversations(&self) -> NcResult<Vec<Conversation>> {
        let resp = self.requester.ocs(ENDPOINT.get("")).await?;
        Ok(resp.decode()?)
    }

    pub async fn get_conversation(&self, token: &str) -> NcResult<Conversation> {
        let resp = self.requester.ocs(ENDPOINT.get(encode_segment(token))).await?;
        Ok(resp.decode()?)
    }

    // ── Update / delete ──────────────────────────────────────────────────

    pub async fn rename_conversation(&self, token: &str, name: &str) -> NcResult<()> {
        let fields = Fields::new().push("roomName", name);
        self.requester
            .ocs(ENDPOINT.put(encode_segment(token)).fields(fields))
            .await?;
        Ok(())
    }

    pub async fn delete_conversation(&self, token: &str) -> NcResult<()> {
        self.requester
            .ocs(ENDPOINT.delete(encode_segment(token)))
            .await?;
        Ok(())
    }

    /// Allow guests to join via link.
    pub async fn make_conversation_public(&self, token: &str) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.post(sub(token, "public"))).await?;
        Ok(())
    }

    pub async fn make_conversation_private(&self, token: &str) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.delete(sub(token, "public"))).await?;
        Ok(())
    }

    pub async fn set_read_only_conversation(&self, token: &str, read_only: bool) -> NcResult<()> {
        let fields = Fields::new().push("state", ReadState::from(read_only));
        self.requester
            .ocs(ENDPOINT.put(sub(token, "read-only")).fields(fields))
            .await?;
        Ok(())
    }

    pub async fn set_conversation_password(&self, token: &str, password: &str) -> NcResult<()> {
        let fields = Fields::new().push("password", password);
        self.requester
            .ocs(ENDPOINT.put(sub(token, "password")).fields(fields))
            .await?;
        Ok(())
    }

    pub async fn add_conversation_to_favorites(&self, token: &str) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.post(sub(token, "favorite"))).await?;
        Ok(())
    }

    pub async fn remove_conversation_from_favorites(&self, token: &str) -> NcResult<()> {
        self.requester.ocs(ENDPOINT.delete(sub(token, "favorite"))).await?;
        Ok(())
    }

    pub async fn set_notification_level(
        &self,
        token: &str,
        level: NotificationLevel,
    ) -> NcResult<()> {
        let fields = Fields::new().push("level", level);
        self.requester
            .ocs(ENDPOINT.post(sub(token, "notify")).fields(fields))
            .await?;
        Ok(())
    }

    // ── Participants ─────────────────────────────────────────────────────

    pub async fn get_participants(&self, token: &str) -> NcResult<Vec<Participant>> {
        let resp = self
            .requester
            .ocs(ENDPOINT.get(sub(token, "participants")))
            .await?;
        Ok(resp.decode()?)
    }

    pub async fn add_participant(
        &self,
        token: &str,
        participant: &str,
        source: ParticipantSource,
    ) -> NcResult<()> {
        let fields = Fields::new()
            .push("newParticipant", participant)
            .push("source", source.as_str());
        self.requester
            .ocs(ENDPOINT.post(sub(token, "participants")).fields(fields))
            .await?;
        Ok(())
    }

    pub async fn remove_participant(&self, token: &str, participant: &str) -> NcResult<()> {
        let fields = Fields::new().push("participant", participant);
        self.requester
            .ocs(ENDPOINT.delete(sub(token, "participants")).fields(fields))
            .await?;
        Ok(())
    }

    /// Remove the current user from the conversation.
    pub async fn leave_conversation(&self, token: &str) -> NcResult<()> {
        self.requester
            .ocs(ENDPOINT.delete(sub(token, "participants/self")))
            .await?;
        Ok(())
    }
}

fn sub(token: &str, rest: &str) -> String {
    format!("{}/{}", encode_segment(token), rest)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
