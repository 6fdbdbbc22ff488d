//! Profile page: view and edit the current account.

use anyhow::{Result, bail};
use tracing::info;

use crate::api::{ApiClient, ProfileUpdate, UserAccount};
use crate::auth::{SessionGate, TokenStore};
use crate::notice::{Notice, Notices};

pub const UPDATE_SUCCESS_MESSAGE: &str =
    "Profile updated successfully! You received 20 additional credits.";

/// Edit form contents. Empty password fields mean "keep the current password".
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl ProfileForm {
    /// Checks the form locally and builds the request body.
    pub fn validate(&self) -> Result<ProfileUpdate> {
        let password = self.password.as_deref().filter(|p| !p.is_empty());
        if let Some(password) = password {
            let confirm = self.confirm_password.as_deref().unwrap_or_default();
            if password != confirm {
                bail!("Passwords do not match");
            }
        }
        if self.email.trim().is_empty() {
            bail!("Email is required");
        }
        Ok(ProfileUpdate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: password.map(ToString::to_string),
        })
    }
}

#[derive(Debug, Default)]
pub struct ProfilePage {
    pub account: Option<UserAccount>,
    pub credits: i64,
    pub notices: Notices,
}

impl ProfilePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the account and credits, and refreshes the identity's display fields.
    pub async fn fetch<S: TokenStore>(
        &mut self,
        api: &ApiClient,
        gate: &mut SessionGate<S>,
    ) -> Result<()> {
        let (account, credits) = tokio::join!(api.profile(), api.credits());
        let (account, credits) = match (account, credits) {
            (Ok(account), Ok(credits)) => (account, credits),
            (Err(e), _) | (_, Err(e)) => {
                self.notices.push(Notice::error(format!(
                    "Failed to load profile data: {}",
                    e.user_message()
                )));
                return Err(e.into());
            }
        };

        gate.update_display(&account.name, &account.email);
        self.credits = credits;
        self.account = Some(account);
        Ok(())
    }

    /// Submits the edit form.
    ///
    /// A token in the response replaces the session token, so the client's
    /// bearer header follows the new identity.
    pub async fn update<S: TokenStore>(
        &mut self,
        api: &mut ApiClient,
        gate: &mut SessionGate<S>,
        form: &ProfileForm,
    ) -> Result<()> {
        let update = match form.validate() {
            Ok(update) => update,
            Err(e) => {
                self.notices.push(Notice::error(e.to_string()));
                return Err(e);
            }
        };

        let res = match api.update_profile(&update).await {
            Ok(res) => res,
            Err(e) => {
                self.notices.push(Notice::error(format!(
                    "Failed to update profile: {}",
                    e.user_message()
                )));
                return Err(e.into());
            }
        };

        if let Some(token) = res.token.as_deref().filter(|t| !t.is_empty()) {
            gate.set_token(token);
            api.set_token(gate.token());
        }

        let name = if res.name.is_empty() { &update.name } else { &res.name };
        let email = if res.email.is_empty() { &update.email } else { &res.email };
        gate.update_display(name, email);

        if let Some(credits) = res.credits {
            self.credits = credits;
        }
        if let Some(account) = self.account.as_mut() {
            account.name.clone_from(name);
            account.email.clone_from(email);
            account.credits = self.credits;
        }

        info!("Profile updated");
        self.notices.push(Notice::success(UPDATE_SUCCESS_MESSAGE));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::auth::claims::test_support::jwt;

    fn logged_in_gate() -> SessionGate<MemoryTokenStore> {
        let mut gate = SessionGate::new(MemoryTokenStore::new());
        gate.set_token(jwt(&json!({ "id": "u1", "name": "Old", "email": "old@x", "role": "user" })));
        gate
    }

    fn form(password: Option<&str>, confirm: Option<&str>) -> ProfileForm {
        ProfileForm {
            name: "Ann".into(),
            email: "ann@x".into(),
            password: password.map(Into::into),
            confirm_password: confirm.map(Into::into),
        }
    }

    #[test]
    fn test_validate_rejects_mismatched_passwords() {
        let err = form(Some("a"), Some("b")).validate().unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_validate_treats_empty_password_as_unchanged() {
        let update = form(Some(""), None).validate().unwrap();
        assert!(update.password.is_none());

        let update = form(Some("pw"), Some("pw")).validate().unwrap();
        assert_eq!(update.password.as_deref(), Some("pw"));
    }

    #[tokio::test]
    async fn test_mismatched_passwords_send_no_request() {
        let server = MockServer::start().await;
        let mut api = ApiClient::new(server.uri(), None).unwrap();
        let mut gate = logged_in_gate();
        let mut page = ProfilePage::new();

        assert!(page.update(&mut api, &mut gate, &form(Some("a"), Some("b"))).await.is_err());
        assert!(page.notices.has_errors());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_updates_display_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "u1", "name": "Ann", "email": "ann@x", "role": "user", "credits": 4
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/credits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "credits": 4 })))
            .mount(&server)
            .await;
        let api = ApiClient::new(server.uri(), None).unwrap();
        let mut gate = logged_in_gate();
        let mut page = ProfilePage::new();

        page.fetch(&api, &mut gate).await.unwrap();

        assert_eq!(page.credits, 4);
        assert_eq!(gate.identity().unwrap().name, "Ann");
        assert_eq!(page.account.as_ref().unwrap().email, "ann@x");
    }

    #[tokio::test]
    async fn test_update_adopts_returned_token() {
        let server = MockServer::start().await;
        let new_token = jwt(&json!({ "id": "u1", "name": "Ann", "email": "ann@x", "role": "admin" }));
        Mock::given(method("PATCH"))
            .and(path("/users/profile"))
            .and(body_json(json!({ "name": "Ann", "email": "ann@x", "password": "pw" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": &new_token, "name": "Ann", "email": "ann@x", "credits": 24
            })))
            .expect(1)
            .mount(&server)
            .await;
        let mut api = ApiClient::new(server.uri(), None).unwrap();
        let mut gate = logged_in_gate();
        let mut page = ProfilePage::new();

        page.update(&mut api, &mut gate, &form(Some("pw"), Some("pw")))
            .await
            .unwrap();

        assert_eq!(gate.token(), Some(new_token.as_str()));
        assert!(gate.is_admin());
        assert_eq!(page.credits, 24);
        assert_eq!(page.notices.drain()[0].message, UPDATE_SUCCESS_MESSAGE);

        Mock::given(method("GET"))
            .and(path("/credits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "credits": 24 })))
            .mount(&server)
            .await;
        api.credits().await.unwrap();
        let requests = server.received_requests().await.unwrap();
        let auth = requests.last().unwrap().headers.get("authorization").unwrap();
        assert_eq!(auth.to_str().unwrap(), format!("Bearer {new_token}"));
    }

    #[tokio::test]
    async fn test_update_without_token_keeps_session() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/users/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "credits": 5 })))
            .mount(&server)
            .await;
        let mut api = ApiClient::new(server.uri(), None).unwrap();
        let mut gate = logged_in_gate();
        let before = gate.token().map(ToString::to_string);
        let mut page = ProfilePage::new();

        page.update(&mut api, &mut gate, &form(None, None)).await.unwrap();

        assert_eq!(gate.token().map(ToString::to_string), before);
        assert_eq!(gate.identity().unwrap().name, "Ann");
    }
}
