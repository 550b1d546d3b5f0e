//! # nextcloud-client
//!
//! Async bindings for a Nextcloud server's OCS REST API and WebDAV
//! interface:
//!
//! - **Talk**: conversations, participants and chat (spreed API v1)
//! - **Sharing**: local shares and federated (remote) shares
//! - **Provisioning**: users, groups, apps and server capabilities
//! - **Admin apps**: LDAP configurations and group folders
//! - **Activity / notifications**: feed and notification inbox
//! - **WebDAV**: listing, transfer, folders, move/copy, favorites
//!
//! Each endpoint group is a small wrapper borrowing a shared [`Requester`];
//! [`NextcloudClient`] is the reqwest-backed implementation and
//! [`NextCloud`] bundles all wrappers behind one value.

pub mod activity;
pub mod apps;
pub mod capabilities;
pub mod chat;
pub mod client;
pub mod config;
pub mod conversations;
pub mod error;
pub mod federated;
pub mod group_folders;
pub mod groups;
pub mod multistatus;
pub mod nextcloud;
pub mod notifications;
pub mod request;
pub mod shares;
pub mod user_ldap;
pub mod users;
pub mod webdav;

#[cfg(test)]
mod testing;

pub use client::NextcloudClient;
pub use config::ClientConfig;
pub use error::{ErrorCategory, NcResult, NextcloudError};
pub use nextcloud::NextCloud;
pub use request::{DavReply, DavRequest, Endpoint, Fields, OcsRequest, Requester};

pub use nextcloud_types as types;
