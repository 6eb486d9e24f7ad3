//! Refresh, pagination and intent handling around the dashboard state
//!
//! Every write goes request, then full refresh, then re-derive. The
//! dashboard is only replaced after a refresh fully succeeds.

use crate::error::ClientError;
use crate::store::WeightStore;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use weight_tracker_shared::dashboard::{Command, Dashboard, DerivedView, Intent};
use weight_tracker_shared::types::DEFAULT_PAGE_SIZE;

/// Releases the "load more" flag when dropped, including on cancellation
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Outcome of a "load more" request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    /// A page was appended
    Loaded,
    /// No further pages exist
    Exhausted,
    /// Another load is in flight
    Busy,
    /// A refresh replaced the history while the page was loading
    Stale,
}

/// Drives a [`Dashboard`] against a [`WeightStore`]
pub struct Orchestrator<S> {
    store: S,
    dashboard: RwLock<Dashboard>,
    page_size: u32,
    loading_more: AtomicBool,
    /// Bumped on every applied refresh
    generation: AtomicU64,
}

impl<S: WeightStore> Orchestrator<S> {
    pub fn new(store: S) -> Self {
        Self::with_page_size(store, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(store: S, page_size: u32) -> Self {
        Self {
            store,
            dashboard: RwLock::new(Dashboard::new()),
            page_size: page_size.max(1),
            loading_more: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot of the current state
    pub async fn snapshot(&self) -> Dashboard {
        self.dashboard.read().await.clone()
    }

    /// Derive every display value for `today`
    pub async fn view(&self, today: NaiveDate) -> DerivedView {
        self.dashboard.read().await.derive(today)
    }

    /// Fetch all entries, the first history page and the profile together
    ///
    /// Any failure aborts the cycle and leaves the previous state in place.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let fetched = tokio::try_join!(
            self.store.list_all_entries(),
            self.store.list_entries(1, self.page_size),
            self.store.get_profile(),
        );

        match fetched {
            Ok((entries, first_page, profile)) => {
                let mut dashboard = self.dashboard.write().await;
                dashboard.apply_refresh(entries, first_page, profile, self.page_size);
                self.generation.fetch_add(1, Ordering::AcqRel);
                debug!(entries = dashboard.entries().len(), "Dashboard refreshed");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Refresh failed, keeping previous data");
                Err(e)
            }
        }
    }

    /// Append the next page of history
    pub async fn load_more(&self) -> Result<LoadMore, ClientError> {
        let Some(_guard) = BusyGuard::acquire(&self.loading_more) else {
            return Ok(LoadMore::Busy);
        };

        let generation = self.generation.load(Ordering::Acquire);
        let Some(next) = self.dashboard.read().await.next_history_page() else {
            return Ok(LoadMore::Exhausted);
        };

        let page = self.store.list_entries(next, self.page_size).await?;

        let mut dashboard = self.dashboard.write().await;
        if self.generation.load(Ordering::Acquire) != generation {
            return Ok(LoadMore::Stale);
        }
        dashboard.append_history_page(page, self.page_size);
        Ok(LoadMore::Loaded)
    }

    /// Validate and execute a user intent
    ///
    /// Validation failures are returned before any request is issued.
    pub async fn dispatch(&self, intent: Intent, today: NaiveDate) -> Result<(), ClientError> {
        let command = self.dashboard.read().await.validate(intent, today)?;

        match command {
            Command::CreateEntry(req) => {
                self.store.create_entry(&req).await?;
                info!(date = %req.date, "Entry saved");
                self.refresh().await
            }
            Command::DeleteEntry(id) => {
                self.store.delete_entry(id).await?;
                info!(entry_id = %id, "Entry deleted");
                self.refresh().await
            }
            Command::SetPeriod(period) => {
                self.dashboard.write().await.set_period(period);
                Ok(())
            }
            Command::SaveProfile(req) => {
                self.store.save_profile(&req).await?;
                self.refresh().await
            }
            Command::UploadAvatar {
                file_name,
                content_type,
                bytes,
            } => {
                let url = self.store.upload_avatar(bytes, &file_name, &content_type).await?;
                info!(avatar_url = %url, "Avatar uploaded");
                self.refresh().await
            }
            Command::Noop => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_guard_is_exclusive() {
        let flag = AtomicBool::new(false);
        let guard = BusyGuard::acquire(&flag);
        assert!(guard.is_some());
        assert!(BusyGuard::acquire(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Acquire));
        assert!(BusyGuard::acquire(&flag).is_some());
    }
}
