// ──────────────────────────────────────────────────────────────────────────────
// nextcloud-types · constants
// ──────────────────────────────────────────────────────────────────────────────
// Integer and string constants mirrored from the Nextcloud documentation:
//  • OCS status codes
//  • Sharing (share types, permission bitmask)
//  • Talk (conversation, participant, lobby, notification constants)
//  • Provisioning (quota)
// See <https://nextcloud-talk.readthedocs.io/en/latest/constants/>.
// ──────────────────────────────────────────────────────────────────────────────

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quota value meaning "no limit" (provisioning + group folders).
pub const QUOTA_UNLIMITED: i64 = -3;

/// A value that is not one of the documented constants of `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownConstant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownConstant {
    fn new(kind: &'static str, value: impl ToString) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Declares an integer-valued constant set with `from_i32` / `as_i32` and
/// serde support through the integer representation.
macro_rules! int_constants {
    (
        $(#[$meta:meta])*
        $name:ident : $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i32", into = "i32")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub fn from_i32(v: i32) -> Option<Self> {
                match v {
                    $( $value => Some(Self::$variant), )+
                    _ => None,
                }
            }

            pub fn as_i32(&self) -> i32 {
                match self {
                    $( Self::$variant => $value, )+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = UnknownConstant;

            fn try_from(v: i32) -> Result<Self, Self::Error> {
                Self::from_i32(v).ok_or_else(|| UnknownConstant::new($kind, v))
            }
        }

        impl From<$name> for i32 {
            fn from(v: $name) -> i32 {
                v.as_i32()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_i32())
            }
        }
    };
}

// ── OCS ──────────────────────────────────────────────────────────────────────

int_constants! {
    /// Generic OCS `meta.statuscode` values.
    OcsCode: "OCS status code" {
        Ok = 100,
        ServerError = 996,
        NotAuthorized = 997,
        NotFound = 998,
        UnknownError = 999,
    }
}

// ── Sharing ──────────────────────────────────────────────────────────────────

int_constants! {
    /// Nextcloud share types.
    ShareType: "share type" {
        User = 0,
        Group = 1,
        PublicLink = 3,
        Email = 4,
        FederatedCloudShare = 6,
        Circle = 7,
        TalkConversation = 10,
        Deck = 12,
        ScienceMesh = 15,
    }
}

impl ShareType {
    /// Share types addressed to a recipient; these need `shareWith`.
    pub fn requires_recipient(&self) -> bool {
        matches!(
            self,
            Self::User | Self::Group | Self::Email | Self::FederatedCloudShare | Self::Circle
        )
    }
}

/// OCS share permissions bitmap. A share's permissions are the sum of the
/// selected flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharePermissions(pub u32);

impl SharePermissions {
    pub const READ: u32 = 1;
    pub const UPDATE: u32 = 2;
    pub const CREATE: u32 = 4;
    pub const DELETE: u32 = 8;
    pub const SHARE: u32 = 16;
    pub const ALL: u32 = 31;

    pub fn all() -> Self {
        Self(Self::ALL)
    }

    pub fn read_only() -> Self {
        Self(Self::READ)
    }

    pub fn with(self, flag: u32) -> Self {
        Self(self.0 | flag)
    }

    pub fn can_read(&self) -> bool {
        self.0 & Self::READ != 0
    }
    pub fn can_update(&self) -> bool {
        self.0 & Self::UPDATE != 0
    }
    pub fn can_create(&self) -> bool {
        self.0 & Self::CREATE != 0
    }
    pub fn can_delete(&self) -> bool {
        self.0 & Self::DELETE != 0
    }
    pub fn can_share(&self) -> bool {
        self.0 & Self::SHARE != 0
    }

    /// Only bits inside `ALL` are meaningful to the server.
    pub fn is_valid(&self) -> bool {
        self.0 & !Self::ALL == 0
    }
}

impl std::fmt::Display for SharePermissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Talk ─────────────────────────────────────────────────────────────────────

int_constants! {
    /// Talk conversation (room) types.
    ConversationType: "conversation type" {
        OneToOne = 1,
        Group = 2,
        Public = 3,
        Changelog = 4,
    }
}

int_constants! {
    /// Read-only state of a conversation.
    ReadState: "read state" {
        ReadWrite = 0,
        ReadOnly = 1,
    }
}

impl From<bool> for ReadState {
    fn from(read_only: bool) -> Self {
        if read_only {
            Self::ReadOnly
        } else {
            Self::ReadWrite
        }
    }
}

int_constants! {
    /// Role of a participant inside a conversation.
    ParticipantType: "participant type" {
        Owner = 1,
        Moderator = 2,
        User = 3,
        Guest = 4,
        PublicLink = 5,
        GuestModerator = 6,
    }
}

impl ParticipantType {
    pub fn is_moderator(&self) -> bool {
        matches!(self, Self::Owner | Self::Moderator | Self::GuestModerator)
    }
}

int_constants! {
    /// Webinar lobby state.
    LobbyState: "lobby state" {
        NoLobby = 0,
        Lobby = 1,
    }
}

int_constants! {
    /// Per-conversation notification level.
    NotificationLevel: "notification level" {
        Default = 0,
        Always = 1,
        Mention = 2,
        Never = 3,
    }
}

/// In-call flags of a participant (bitmask; 0 means disconnected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InCallFlags(pub u32);

impl InCallFlags {
    pub const DISCONNECTED: u32 = 0;
    pub const IN_CALL: u32 = 1;
    pub const PROVIDES_AUDIO: u32 = 2;
    pub const PROVIDES_VIDEO: u32 = 4;

    pub fn is_in_call(&self) -> bool {
        self.0 & Self::IN_CALL != 0
    }
    pub fn provides_audio(&self) -> bool {
        self.0 & Self::PROVIDES_AUDIO != 0
    }
    pub fn provides_video(&self) -> bool {
        self.0 & Self::PROVIDES_VIDEO != 0
    }
}

/// Kind of actor behind a chat message or participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
    Guests,
    Users,
    Bots,
}

impl ActorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guests => "guests",
            Self::Users => "users",
            Self::Bots => "bots",
        }
    }
}

impl std::str::FromStr for ActorType {
    type Err = UnknownConstant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guests" => Ok(Self::Guests),
            "users" => Ok(Self::Users),
            "bots" => Ok(Self::Bots),
            other => Err(UnknownConstant::new("actor type", other)),
        }
    }
}

// ── Dates ────────────────────────────────────────────────────────────────────

/// Format a date the way share `expireDate` expects it (`YYYY-MM-DD`).
pub fn expire_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
