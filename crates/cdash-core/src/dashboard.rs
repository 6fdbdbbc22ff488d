//! Dashboard data loading and feed actions.
//!
//! Holds the last-known values shown on the dashboard. A failed load reports
//! the failure through a notice and leaves the failing parts untouched; the
//! feed list is only replaced by a complete reconciliation of every source.

use anyhow::Result;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiResult, SaveFeedRequest, UserAccount};
use crate::auth::{SessionGate, TokenStore};
use crate::feed::{FeedItem, FeedSource, reconcile};
use crate::notice::{Notice, Notices};

/// Fetches the primary listing and every aggregation source, then reconciles.
///
/// The sources are requested concurrently and merged only after all of them
/// have settled. Any failure fails the whole load (first error in source order).
pub async fn fetch_feeds(api: &ApiClient) -> ApiResult<Vec<FeedItem>> {
    let (all, reddit, linkedin) = tokio::join!(
        api.all_feeds(),
        api.aggregate(FeedSource::Reddit),
        api.aggregate(FeedSource::Linkedin),
    );

    let all = all?;
    let reddit = reddit?;
    let linkedin = linkedin?;

    Ok(reconcile::merge([all, reddit.feeds, linkedin.feeds]))
}

/// Dashboard view state.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub credits: i64,
    pub feeds: Vec<FeedItem>,
    pub saved: Vec<FeedItem>,
    /// Only populated for admins.
    pub users: Vec<UserAccount>,
    pub notices: Notices,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads everything the dashboard shows.
    ///
    /// The login bonus check and the admin user list are best effort; credits,
    /// feeds and saved feeds are required.
    pub async fn load<S: TokenStore>(
        &mut self,
        api: &ApiClient,
        gate: &SessionGate<S>,
    ) -> Result<()> {
        let is_admin = gate.is_admin();

        let users = async {
            if is_admin {
                Some(api.users().await)
            } else {
                None
            }
        };
        let (bonus, credits, feeds, saved, users) = tokio::join!(
            api.login_bonus(),
            api.credits(),
            fetch_feeds(api),
            api.saved_feeds(),
            users,
        );

        let mut first_error = None;
        match credits {
            Ok(credits) => self.credits = credits,
            Err(e) => first_error = first_error.or(Some(e)),
        }
        match feeds {
            Ok(feeds) => self.feeds = feeds,
            Err(e) => first_error = first_error.or(Some(e)),
        }
        match saved {
            Ok(saved) => self.saved = saved,
            Err(e) => first_error = first_error.or(Some(e)),
        }

        match bonus {
            Ok(bonus) if bonus.awarded => {
                if let Some(credits) = bonus.credits {
                    self.credits = credits;
                }
                let message = bonus
                    .message
                    .unwrap_or_else(|| "Daily login bonus awarded".to_string());
                self.notices.push(Notice::success(format!("🎉 {message}")));
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to check login bonus: {e}"),
        }

        match users {
            Some(Ok(users)) => self.users = users,
            Some(Err(e)) => warn!("Failed to fetch users: {e}"),
            None => {}
        }

        if let Some(e) = first_error {
            self.notices.push(Notice::error(format!(
                "Error loading data: There was a problem loading your dashboard data ({})",
                e.user_message()
            )));
            return Err(e.into());
        }
        Ok(())
    }

    /// Loads the saved-feeds page: saved items and the credits balance.
    pub async fn load_saved(&mut self, api: &ApiClient) -> Result<()> {
        let (saved, credits) = tokio::join!(api.saved_feeds(), api.credits());
        match (saved, credits) {
            (Ok(saved), Ok(credits)) => {
                self.saved = saved;
                self.credits = credits;
                Ok(())
            }
            (Err(e), _) | (_, Err(e)) => {
                self.notices.push(Notice::error(format!(
                    "Failed to load saved feeds: {}",
                    e.user_message()
                )));
                Err(e.into())
            }
        }
    }

    /// Re-fetches and reconciles the feed list.
    pub async fn refresh_feeds(&mut self, api: &ApiClient) -> Result<()> {
        match fetch_feeds(api).await {
            Ok(feeds) => {
                self.feeds = feeds;
                Ok(())
            }
            Err(e) => {
                self.notices.push(Notice::error(format!(
                    "Failed to fetch feeds: {}",
                    e.user_message()
                )));
                Err(e.into())
            }
        }
    }

    /// Admin action: pulls fresh LinkedIn posts, then reloads the feed list.
    pub async fn aggregate_linkedin(&mut self, api: &ApiClient) -> Result<()> {
        let source = FeedSource::Linkedin;
        let result = async {
            let res = api.aggregate(source).await?;
            let feeds = fetch_feeds(api).await?;
            ApiResult::Ok((res, feeds))
        }
        .await;

        match result {
            Ok((res, feeds)) => {
                self.feeds = feeds;
                let message = res.message.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| {
                    format!("Successfully aggregated {} feeds", source.display_name())
                });
                info!("{message}");
                self.notices.push(Notice::success(message));
                if res.feeds.is_empty() {
                    self.notices.push(Notice::info(format!(
                        "No new {} posts found",
                        source.display_name()
                    )));
                }
                Ok(())
            }
            Err(e) => {
                self.notices.push(Notice::error(format!(
                    "Aggregation failed: Failed to aggregate {} feeds ({})",
                    source.display_name(),
                    e.user_message()
                )));
                Err(e.into())
            }
        }
    }

    /// Saves a feed item, then refreshes the saved list and credits.
    pub async fn save_feed(&mut self, api: &ApiClient, item: &FeedItem) -> Result<()> {
        let result = async {
            api.save_feed(&SaveFeedRequest::from(item)).await?;
            let (saved, credits) = tokio::join!(api.saved_feeds(), api.credits());
            ApiResult::Ok((saved?, credits?))
        }
        .await;

        match result {
            Ok((saved, credits)) => {
                self.saved = saved;
                self.credits = credits;
                self.notices.push(Notice::success(
                    "Feed saved: The feed has been added to your saved items",
                ));
                Ok(())
            }
            Err(e) => {
                self.notices.push(Notice::error(format!(
                    "Failed to save: There was an error saving this feed ({})",
                    e.user_message()
                )));
                Err(e.into())
            }
        }
    }

    /// Reports a feed item, then reloads the feed list.
    pub async fn report_feed(&mut self, api: &ApiClient, feed_id: &str) -> Result<()> {
        let result = async {
            api.report_feed(feed_id).await?;
            fetch_feeds(api).await
        }
        .await;

        match result {
            Ok(feeds) => {
                self.feeds = feeds;
                self.notices
                    .push(Notice::success("Feed reported: Thank you for your feedback"));
                Ok(())
            }
            Err(e) => {
                self.notices.push(Notice::error(format!(
                    "Failed to report: There was an error reporting this feed ({})",
                    e.user_message()
                )));
                Err(e.into())
            }
        }
    }

    /// Deletes a saved item. The local list changes only after the server confirms.
    pub async fn delete_saved(&mut self, api: &ApiClient, feed_id: &str) -> Result<()> {
        match api.delete_saved(feed_id).await {
            Ok(()) => {
                self.saved.retain(|feed| feed.id != feed_id);
                self.notices
                    .push(Notice::success("Saved feed removed from your list"));
                Ok(())
            }
            Err(e) => {
                self.notices.push(Notice::error(format!(
                    "Failed to delete: {}",
                    e.user_message()
                )));
                Err(e.into())
            }
        }
    }

    /// Looks up a feed item in the current list.
    pub fn find_feed(&self, feed_id: &str) -> Option<&FeedItem> {
        self.feeds.iter().find(|feed| feed.id == feed_id)
    }
}
