// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-types · types
// ──────────────────────────────────────────────────────────────────────────────
// Response models and request argument types covering:
//  • Talk conversations, participants, chat messages
//  • Sharing (local + federated shares)
//  • Provisioning (users, groups, apps, capabilities)
//  • Activity feed & notifications
//  • Group folders
//  • WebDAV resource metadata
//
// Models deserialize leniently: fields the server may omit default instead
// of failing the whole response.
// ──────────────────────────────────────────────────────────────────────────────

use crate::constants::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Talk: conversations ──────────────────────────────────────────────────────

/// A Talk conversation (room) as returned by the room endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conversation {
    pub id: Option<u64>,
    /// Opaque identifier used in every room/chat URL.
    pub token: String,
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub conversation_type: i32,
    pub read_only: i32,
    pub has_password: bool,
    pub is_favorite: bool,
    pub notification_level: i32,
    pub participant_type: i32,
    pub lobby_state: i32,
    pub unread_messages: u64,
    pub unread_mention: bool,
    pub last_activity: i64,
    pub last_read_message: Option<i64>,
    /// Either a message object or `[]` when the room has no messages yet.
    pub last_message: Option<serde_json::Value>,
}

impl Conversation {
    pub fn conversation_type(&self) -> Option<ConversationType> {
        ConversationType::from_i32(self.conversation_type)
    }

    pub fn read_state(&self) -> Option<ReadState> {
        ReadState::from_i32(self.read_only)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_state() == Some(ReadState::ReadOnly)
    }

    pub fn notification_level(&self) -> Option<NotificationLevel> {
        NotificationLevel::from_i32(self.notification_level)
    }

    pub fn participant_type(&self) -> Option<ParticipantType> {
        ParticipantType::from_i32(self.participant_type)
    }

    pub fn lobby_state(&self) -> Option<LobbyState> {
        LobbyState::from_i32(self.lobby_state)
    }
}

/// A participant of a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Participant {
    pub user_id: Option<String>,
    pub actor_type: Option<String>,
    pub actor_id: Option<String>,
    pub display_name: String,
    pub participant_type: i32,
    pub last_ping: i64,
    pub session_id: Option<String>,
    pub in_call: InCallFlags,
}

impl Participant {
    pub fn participant_type(&self) -> Option<ParticipantType> {
        ParticipantType::from_i32(self.participant_type)
    }
}

/// Where a participant / invite is resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantSource {
    Users,
    Groups,
    Circles,
    Emails,
}

impl ParticipantSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Groups => "groups",
            Self::Circles => "circles",
            Self::Emails => "emails",
        }
    }
}

impl Default for ParticipantSource {
    fn default() -> Self {
        Self::Groups
    }
}

// ── Talk: chat ───────────────────────────────────────────────────────────────

/// A chat message of a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatMessage {
    pub id: i64,
    pub token: String,
    pub actor_type: String,
    pub actor_id: String,
    pub actor_display_name: String,
    pub timestamp: i64,
    pub message: String,
    pub message_parameters: serde_json::Value,
    pub system_message: String,
    pub message_type: String,
    pub is_replyable: bool,
    pub reference_id: Option<String>,
    /// The message replied to, when this is a reply.
    pub parent: Option<serde_json::Value>,
}

impl ChatMessage {
    pub fn actor_type(&self) -> Option<ActorType> {
        self.actor_type.parse().ok()
    }

    pub fn is_system_message(&self) -> bool {
        !self.system_message.is_empty()
    }
}

/// Parameters for fetching chat messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageQuery {
    /// Poll and wait for new messages (`true`) or read history (`false`).
    pub look_into_future: bool,
    /// Number of messages to receive.
    pub limit: u32,
    /// Offset: the last message id the caller already has.
    pub last_known_message_id: Option<i64>,
    /// Seconds the server may hold the request; only sent when polling.
    pub timeout: u32,
    /// Move the read marker after fetching.
    pub set_read_marker: bool,
    /// Include the `lastKnownMessageId` message itself.
    pub include_last_known: bool,
}

impl Default for MessageQuery {
    fn default() -> Self {
        Self {
            look_into_future: false,
            limit: 200,
            last_known_message_id: None,
            timeout: 30,
            set_read_marker: true,
            include_last_known: false,
        }
    }
}

impl MessageQuery {
    /// History before `last_known` (or the latest page when `None`).
    pub fn history(limit: u32, last_known: Option<i64>) -> Self {
        Self {
            limit,
            last_known_message_id: last_known,
            ..Self::default()
        }
    }

    /// Long-poll for messages newer than `last_known`.
    pub fn poll(last_known: i64, timeout: u32) -> Self {
        Self {
            look_into_future: true,
            last_known_message_id: Some(last_known),
            timeout,
            ..Self::default()
        }
    }
}

/// A message to post into a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub message: String,
    /// Display name for guest actors.
    pub actor_display_name: Option<String>,
    /// Id of the message this one replies to.
    pub reply_to: Option<i64>,
    /// Client-side id used to deduplicate echoes.
    pub reference_id: Option<String>,
}

impl NewMessage {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

// ── Sharing (OCS Share API v1) ───────────────────────────────────────────────

/// Representation of an existing share returned by OCS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareInfo {
    pub id: String,
    pub share_type: i32,
    pub uid_owner: String,
    pub displayname_owner: String,
    pub permissions: u32,
    pub stime: Option<u64>,
    pub parent: Option<serde_json::Value>,
    pub expiration: Option<String>,
    pub token: Option<String>,
    pub uid_file_owner: String,
    pub displayname_file_owner: String,
    pub note: Option<String>,
    pub label: Option<String>,
    pub path: String,
    pub item_type: String,
    pub item_source: Option<u64>,
    pub file_source: Option<u64>,
    pub file_parent: Option<u64>,
    pub file_target: Option<String>,
    pub share_with: Option<String>,
    pub share_with_displayname: Option<String>,
    pub url: Option<String>,
    pub mail_send: Option<u32>,
    pub hide_download: Option<u32>,
    pub mimetype: Option<String>,
    pub storage_id: Option<String>,
}

impl ShareInfo {
    pub fn share_type(&self) -> Option<ShareType> {
        ShareType::from_i32(self.share_type)
    }

    pub fn permissions(&self) -> SharePermissions {
        SharePermissions(self.permissions)
    }
}

/// Arguments for creating a new share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateShare {
    /// Path to the file or folder to share.
    pub path: String,
    pub share_type: ShareType,
    /// Username, group name, email or federated cloud id.
    pub share_with: Option<String>,
    /// Allow uploads into a publicly shared folder.
    pub public_upload: Option<bool>,
    /// Password protection (public links only).
    pub password: Option<String>,
    pub permissions: Option<SharePermissions>,
    pub expire_date: Option<NaiveDate>,
}

impl CreateShare {
    pub fn public_link(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            share_type: ShareType::PublicLink,
            share_with: None,
            public_upload: None,
            password: None,
            permissions: None,
            expire_date: None,
        }
    }

    pub fn with_recipient(
        path: impl Into<String>,
        share_type: ShareType,
        share_with: impl Into<String>,
    ) -> Self {
        Self {
            share_with: Some(share_with.into()),
            share_type,
            ..Self::public_link(path)
        }
    }
}

/// A single attribute change of an existing share. The share API accepts
/// one attribute per update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShareUpdate {
    Permissions(SharePermissions),
    Password(String),
    PublicUpload(bool),
    ExpireDate(NaiveDate),
    Note(String),
    Label(String),
}

/// A federated (remote) share as seen by the receiving server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteShare {
    pub id: serde_json::Value,
    pub remote: String,
    pub remote_id: Option<serde_json::Value>,
    pub share_token: Option<String>,
    pub name: String,
    pub owner: String,
    pub user: String,
    pub mountpoint: String,
    pub accepted: Option<serde_json::Value>,
    pub mimetype: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
}

// ── Provisioning: users / groups / apps ──────────────────────────────────────

/// User information from the provisioning API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub id: String,
    pub enabled: Option<bool>,
    #[serde(rename = "displayname")]
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub groups: Vec<String>,
    pub language: Option<String>,
    pub locale: Option<String>,
    pub backend: Option<String>,
    #[serde(rename = "lastLogin")]
    pub last_login: Option<u64>,
    pub quota: Option<UserQuota>,
}

/// Quota information for a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserQuota {
    pub free: Option<i64>,
    pub used: Option<i64>,
    pub total: Option<i64>,
    pub relative: Option<f64>,
    /// Configured quota: bytes, `QUOTA_UNLIMITED` or a string such as "none".
    pub quota: Option<serde_json::Value>,
}

/// User attributes editable through the provisioning API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserField {
    Email,
    Quota,
    Phone,
    Address,
    Website,
    Twitter,
    #[serde(rename = "displayname")]
    DisplayName,
    Password,
}

impl UserField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Quota => "quota",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::Website => "website",
            Self::Twitter => "twitter",
            Self::DisplayName => "displayname",
            Self::Password => "password",
        }
    }
}

impl std::str::FromStr for UserField {
    type Err = UnknownConstant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "email" => Self::Email,
            "quota" => Self::Quota,
            "phone" => Self::Phone,
            "address" => Self::Address,
            "website" => Self::Website,
            "twitter" => Self::Twitter,
            "displayname" => Self::DisplayName,
            "password" => Self::Password,
            other => {
                return Err(UnknownConstant {
                    kind: "user field",
                    value: other.to_string(),
                })
            }
        };
        Ok(field)
    }
}

/// Filter for the app listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppFilter {
    Enabled,
    Disabled,
}

impl AppFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }
}

// ── Capabilities ─────────────────────────────────────────────────────────────

/// Server capabilities from `ocs/v1.php/cloud/capabilities`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerCapabilities {
    pub version: Option<ServerVersion>,
    pub capabilities: Option<CapabilitiesMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerVersion {
    pub major: Option<u32>,
    pub minor: Option<u32>,
    pub micro: Option<u32>,
    pub string: Option<String>,
    pub edition: Option<String>,
    #[serde(rename = "extendedSupport")]
    pub extended_support: Option<bool>,
}

/// Catch-all for the capabilities tree; consumers drill in via dotted paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapabilitiesMap(pub serde_json::Value);

// ── Activity Feed ────────────────────────────────────────────────────────────

/// A single activity from the OCS activity API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityItem {
    pub activity_id: u64,
    pub app: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub affecteduser: String,
    pub user: String,
    pub timestamp: u64,
    pub datetime: Option<String>,
    pub subject: String,
    pub message: Option<String>,
    pub object_type: Option<String>,
    pub object_id: Option<u64>,
    pub object_name: Option<String>,
    pub link: Option<String>,
    pub icon: Option<String>,
}

/// Sort order of the activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Parameters for querying the activity feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityQuery {
    /// Only activities newer than this activity id.
    pub since: Option<u64>,
    pub limit: Option<u32>,
    /// Restrict to one object; needs `object_id` as well.
    pub object_type: Option<String>,
    pub object_id: Option<u64>,
    pub sort: Option<SortOrder>,
}

// ── Notifications ────────────────────────────────────────────────────────────

/// A Nextcloud notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub notification_id: u64,
    pub app: String,
    pub user: String,
    pub datetime: String,
    pub object_type: String,
    pub object_id: String,
    pub subject: String,
    pub message: Option<String>,
    pub link: Option<String>,
    pub icon: Option<String>,
    pub actions: Vec<NotificationAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationAction {
    pub label: String,
    pub link: String,
    #[serde(rename = "type")]
    pub action_type: String,
    pub primary: bool,
}

// ── Group folders ────────────────────────────────────────────────────────────

/// An admin-managed group folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupFolder {
    pub id: u64,
    pub mount_point: String,
    /// Group id → permission bitmask. The server sends `[]` when empty.
    pub groups: serde_json::Value,
    pub quota: i64,
    pub size: i64,
    pub acl: bool,
}

impl GroupFolder {
    pub fn group_permissions(&self, gid: &str) -> Option<SharePermissions> {
        self.groups
            .get(gid)
            .and_then(|v| v.as_u64())
            .map(|p| SharePermissions(p as u32))
    }

    pub fn has_unlimited_quota(&self) -> bool {
        self.quota == QUOTA_UNLIMITED
    }
}

// ── WebDAV Resource Metadata ─────────────────────────────────────────────────

/// The type of a WebDAV resource.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub enum DavResourceType {
    #[default]
    File,
    Folder,
}

/// A single WebDAV resource returned from a PROPFIND / REPORT.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DavResource {
    /// Full href from the DAV response (URL-encoded path).
    pub href: String,
    /// Decoded display name.
    pub display_name: String,
    pub resource_type: DavResourceType,
    /// Content type / MIME (files only).
    pub content_type: Option<String>,
    /// Size in bytes (files only).
    pub content_length: Option<u64>,
    /// ETag without surrounding quotes.
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    /// Nextcloud file-id (oc:fileid).
    pub file_id: Option<u64>,
    pub owner_id: Option<String>,
    pub owner_display_name: Option<String>,
    /// Nextcloud permissions string (e.g. "RGDNVCK").
    pub permissions: Option<String>,
    /// Content checksum from server (e.g. `SHA1:…`).
    pub checksum: Option<String>,
    pub has_preview: Option<bool>,
    pub favorite: Option<bool>,
    pub comments_count: Option<u64>,
    /// Size of contained resources (for folders, from oc:size).
    pub size: Option<u64>,
}

impl DavResource {
    pub fn is_folder(&self) -> bool {
        self.resource_type == DavResourceType::Folder
    }
}

/// Depth header value for PROPFIND requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum PropfindDepth {
    Zero,
    One,
    Infinity,
}

impl PropfindDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Infinity => "infinity",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
