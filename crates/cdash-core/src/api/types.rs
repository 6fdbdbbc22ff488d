//! Request and response bodies exchanged with the remote API.

use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::feed::{FeedItem, document_id};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterResponse {
    pub token: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginBonus {
    pub awarded: bool,
    pub credits: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreditsResponse {
    pub credits: i64,
}

/// A user account as returned by `/users/profile` and `/users`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "RawUserAccount")]
pub struct UserAccount {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub credits: i64,
}

#[derive(Deserialize)]
struct RawUserAccount {
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    credits: Option<i64>,
}

impl From<RawUserAccount> for UserAccount {
    fn from(raw: RawUserAccount) -> Self {
        Self {
            id: document_id(raw.object_id, raw.id),
            name: raw.name.unwrap_or_default(),
            email: raw.email.unwrap_or_default(),
            role: raw.role.unwrap_or_default(),
            credits: raw.credits.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileUpdateResponse {
    pub token: Option<String>,
    pub name: String,
    pub email: String,
    pub credits: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AggregateResponse {
    pub feeds: Vec<FeedItem>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveFeedRequest<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub source: &'a str,
}

impl<'a> From<&'a FeedItem> for SaveFeedRequest<'a> {
    fn from(item: &'a FeedItem) -> Self {
        Self {
            title: &item.title,
            link: &item.link,
            source: &item.source,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportRequest<'a> {
    #[serde(rename = "feedId")]
    pub feed_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddCreditsRequest {
    pub credits: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChangeRoleRequest {
    pub role: Role,
}

/// Usage numbers shown on the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Analytics {
    pub total_posts: u64,
    pub reported_posts: u64,
    pub saved_posts: u64,
    pub active_users: u64,
}
