//! Admin panel: user management and usage analytics.
//!
//! The role check here only decides what to offer; the server enforces it.

use anyhow::{Result, anyhow, bail};
use tracing::info;

use crate::api::{Analytics, ApiClient, UserAccount};
use crate::notice::{Notice, Notices};

/// Parses a credits amount the way the admin form does: anything that is not
/// a whole number counts as zero.
pub fn parse_credit_amount(input: &str) -> i64 {
    input.trim().parse().unwrap_or(0)
}

#[derive(Debug, Default)]
pub struct AdminPanel {
    pub users: Vec<UserAccount>,
    pub analytics: Option<Analytics>,
    pub notices: Notices,
}

impl AdminPanel {
    /// Starts from a user list the dashboard already fetched.
    pub fn new(users: Vec<UserAccount>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    pub async fn load_users(&mut self, api: &ApiClient) -> Result<()> {
        match api.users().await {
            Ok(users) => {
                self.users = users;
                Ok(())
            }
            Err(e) => {
                self.notices
                    .push(Notice::error(format!("Failed to fetch users: {}", e.user_message())));
                Err(e.into())
            }
        }
    }

    pub async fn analytics(&mut self, api: &ApiClient) -> Result<Analytics> {
        match api.analytics().await {
            Ok(analytics) => {
                self.analytics = Some(analytics);
                Ok(analytics)
            }
            Err(e) => {
                self.notices.push(Notice::error(format!(
                    "Failed to fetch analytics: {}",
                    e.user_message()
                )));
                Err(e.into())
            }
        }
    }

    /// Grants credits to a user. Non-positive amounts are rejected locally.
    pub async fn add_credits(&mut self, api: &ApiClient, user_id: &str, amount: i64) -> Result<()> {
        if amount <= 0 {
            self.notices
                .push(Notice::error("Please enter a valid number of credits"));
            bail!("Credits amount must be a positive number");
        }

        if let Err(e) = api.add_credits(user_id, amount).await {
            self.notices.push(Notice::error(format!(
                "Failed to add credits: {}",
                e.user_message()
            )));
            return Err(e.into());
        }

        if let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) {
            user.credits = user.credits.saturating_add(amount);
        }
        info!(user_id, amount, "Added credits");
        self.notices
            .push(Notice::success(format!("Added {amount} credits successfully")));
        Ok(())
    }

    /// Flips a user between `admin` and `user`, based on the cached role.
    pub async fn toggle_role(&mut self, api: &ApiClient, user_id: &str) -> Result<()> {
        let current = self
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.role)
            .ok_or_else(|| anyhow!("Unknown user: {user_id}"))?;
        let new_role = current.toggled();

        if let Err(e) = api.change_role(user_id, new_role).await {
            self.notices.push(Notice::error(format!(
                "Failed to update role: {}",
                e.user_message()
            )));
            return Err(e.into());
        }

        if let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) {
            user.role = new_role;
        }
        info!(user_id, role = %new_role, "Changed user role");
        self.notices
            .push(Notice::success(format!("User role updated to {new_role}")));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::Role;

    fn users() -> Vec<UserAccount> {
        vec![
            UserAccount {
                id: "u1".into(),
                name: "Ann".into(),
                email: "ann@x".into(),
                role: Role::User,
                credits: 5,
            },
            UserAccount {
                id: "u2".into(),
                name: "Bo".into(),
                email: "bo@x".into(),
                role: Role::Admin,
                credits: 0,
            },
        ]
    }

    #[test]
    fn test_parse_credit_amount() {
        assert_eq!(parse_credit_amount(" 25 "), 25);
        assert_eq!(parse_credit_amount("abc"), 0);
        assert_eq!(parse_credit_amount(""), 0);
        assert_eq!(parse_credit_amount("-3"), -3);
    }

    #[tokio::test]
    async fn test_add_credits_rejects_non_positive_locally() {
        let server = MockServer::start().await;
        let api = ApiClient::new(server.uri(), None).unwrap();
        let mut panel = AdminPanel::new(users());

        assert!(panel.add_credits(&api, "u1", 0).await.is_err());
        assert!(panel.add_credits(&api, "u1", -4).await.is_err());
        assert!(server.received_requests().await.unwrap().is_empty());
        assert_eq!(panel.users[0].credits, 5);
    }

    #[tokio::test]
    async fn test_add_credits_updates_cached_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/add-credits/u1"))
            .and(body_json(json!({ "credits": 10 })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        let api = ApiClient::new(server.uri(), None).unwrap();
        let mut panel = AdminPanel::new(users());

        panel.add_credits(&api, "u1", 10).await.unwrap();
        assert_eq!(panel.users[0].credits, 15);
    }

    #[tokio::test]
    async fn test_add_credits_saturates_cached_balance() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/add-credits/u1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let api = ApiClient::new(server.uri(), None).unwrap();
        let mut panel = AdminPanel::new(users());

        let amount = parse_credit_amount("9223372036854775807");
        panel.add_credits(&api, "u1", amount).await.unwrap();
        assert_eq!(panel.users[0].credits, i64::MAX);
    }

    #[tokio::test]
    async fn test_toggle_role_flips_cached_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/change-role/u2"))
            .and(body_json(json!({ "role": "user" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        let api = ApiClient::new(server.uri(), None).unwrap();
        let mut panel = AdminPanel::new(users());

        panel.toggle_role(&api, "u2").await.unwrap();
        assert_eq!(panel.users[1].role, Role::User);
    }

    #[tokio::test]
    async fn test_toggle_role_failure_leaves_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/change-role/u1"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Admin only" })))
            .mount(&server)
            .await;
        let api = ApiClient::new(server.uri(), None).unwrap();
        let mut panel = AdminPanel::new(users());

        assert!(panel.toggle_role(&api, "u1").await.is_err());
        assert_eq!(panel.users[0].role, Role::User);
        let notices = panel.notices.drain();
        assert!(notices[0].message.contains("Admin only"));
    }

    #[tokio::test]
    async fn test_toggle_role_unknown_user() {
        let server = MockServer::start().await;
        let api = ApiClient::new(server.uri(), None).unwrap();
        let mut panel = AdminPanel::new(users());

        let err = panel.toggle_role(&api, "nobody").await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown user: nobody");
    }

    #[tokio::test]
    async fn test_analytics_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/analytics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalPosts": 3, "reportedPosts": 0, "savedPosts": 1, "activeUsers": 2
            })))
            .mount(&server)
            .await;
        let api = ApiClient::new(server.uri(), None).unwrap();
        let mut panel = AdminPanel::default();

        let analytics = panel.analytics(&api).await.unwrap();
        assert_eq!(analytics.total_posts, 3);
        assert_eq!(panel.analytics, Some(analytics));
    }
}
