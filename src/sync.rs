//! Sync controller: runs every API round trip and applies the result to the
//! registry, the draft and the map.
//!
//! DESIGN
//! ======
//! Single-threaded like the page it drives. State lives in a `RefCell` and
//! every method takes `&self`, so several operations can be in flight at
//! once (two "show track" clicks before either fetch returns). No borrow is
//! held across an `.await`; ordering hazards between a response and a newer
//! click are resolved by the registry's fetch tickets.
//!
//! ERROR HANDLING
//! ==============
//! Each operation ends its own failure: the error is logged, pushed as a
//! [`Notice`] for the UI to show, and returned. Nothing is retried; the user
//! repeats the action. A failed submission keeps the draft intact.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::cell::{Ref, RefCell};

use crate::api::{ApiError, TrackApi};
use crate::color::{self, Color};
use crate::draft::DraftSession;
use crate::model::{self, Point, UserId};
use crate::popup::{self, PopupOpened};
use crate::registry::{AddOutcome, FetchTicket, Toggle, TrackRegistry};
use crate::scene::{LayerId, MapSurface};

// =============================================================================
// ERRORS & NOTICES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("draft has no points")]
    EmptyDraft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// Transient user-facing message about a failed or empty operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// What a show/toggle request did to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackChange {
    Shown(LayerId),
    Hidden,
    /// A pending fetch was cancelled before it rendered.
    Cancelled,
    /// The user has no points; nothing was drawn.
    Empty,
    /// A newer click superseded this request; its response was dropped.
    Stale,
}

/// A draft the service accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submitted {
    pub user_id: UserId,
    /// Number of points saved.
    pub points: usize,
    /// How the new track reached the map. `None` when fetching it back
    /// failed; that failure is already reported as a notice.
    pub shown: Option<TrackChange>,
}

// =============================================================================
// VIEW STATE
// =============================================================================

/// Everything the controller mutates, owned in one place.
#[derive(Debug)]
pub struct ViewState<S> {
    surface: S,
    registry: TrackRegistry,
    draft: DraftSession,
    users: Vec<UserId>,
    next_user_id: UserId,
    notices: Vec<Notice>,
}

impl<S> ViewState<S> {
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    #[must_use]
    pub fn draft(&self) -> &DraftSession {
        &self.draft
    }

    /// Users from the last successful list, ascending.
    #[must_use]
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Suggested id for a new user: one past the largest listed id.
    #[must_use]
    pub fn next_user_id(&self) -> UserId {
        self.next_user_id
    }

    #[must_use]
    pub fn max_user_id(&self) -> UserId {
        self.users.iter().copied().max().unwrap_or(0)
    }

    /// Current display color for a user.
    #[must_use]
    pub fn color_of(&self, user_id: UserId) -> Color {
        color::color_of(user_id, self.max_user_id())
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct SyncController<A, S> {
    api: A,
    view: RefCell<ViewState<S>>,
}

impl<A: TrackApi, S: MapSurface> SyncController<A, S> {
    pub fn new(api: A, surface: S) -> Self {
        let view = ViewState {
            surface,
            registry: TrackRegistry::new(),
            draft: DraftSession::new(),
            users: Vec::new(),
            next_user_id: 0,
            notices: Vec::new(),
        };
        Self { api, view: RefCell::new(view) }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Read-only view of the current state. Do not hold across an `.await`
    /// on this controller.
    pub fn view(&self) -> Ref<'_, ViewState<S>> {
        self.view.borrow()
    }

    /// Drain pending notices for display.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.view.borrow_mut().notices)
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    /// Refresh the user list and the suggested next id.
    ///
    /// # Errors
    ///
    /// Returns the API error; the previous list is kept.
    pub async fn list_users(&self) -> Result<Vec<UserId>, SyncError> {
        tracing::info!("fetching users");
        let mut users = self
            .api
            .list_users()
            .await
            .map_err(|e| self.report("Could not fetch user list", e.into()))?;
        users.sort_unstable();
        users.dedup();

        let mut view = self.view.borrow_mut();
        view.next_user_id = model::next_user_id(&users);
        view.users.clone_from(&users);
        tracing::debug!(count = users.len(), next_user_id = view.next_user_id, "user list updated");
        Ok(users)
    }

    /// Hide the user's track, delete the user, then refresh the list.
    ///
    /// # Errors
    ///
    /// Returns the API error from the delete or the refresh. The list is
    /// only refreshed when the delete succeeded.
    pub async fn delete_user(&self, user_id: UserId) -> Result<(), SyncError> {
        tracing::info!(user_id, "deleting user");
        {
            let mut guard = self.view.borrow_mut();
            let view = &mut *guard;
            view.registry.remove(&mut view.surface, user_id);
        }
        self.api
            .delete_user(user_id)
            .await
            .map_err(|e| self.report("Could not delete user", e.into()))?;
        self.list_users().await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Tracks
    // -------------------------------------------------------------------------

    /// List-entry click: hide the track if shown (or pending), else show it.
    ///
    /// # Errors
    ///
    /// Returns the API error if the points fetch fails.
    pub async fn toggle_track(&self, user_id: UserId) -> Result<TrackChange, SyncError> {
        let ticket = {
            let mut guard = self.view.borrow_mut();
            let view = &mut *guard;
            match view.registry.toggle(&mut view.surface, user_id) {
                Toggle::Hidden => return Ok(TrackChange::Hidden),
                Toggle::Cancelled => return Ok(TrackChange::Cancelled),
                Toggle::NotVisible => view.registry.begin_fetch(user_id),
            }
        };
        self.fetch_and_add(ticket).await
    }

    /// Show (or re-show) a user's track, replacing any layer already shown.
    ///
    /// # Errors
    ///
    /// Returns the API error if the points fetch fails.
    pub async fn show_track(&self, user_id: UserId) -> Result<TrackChange, SyncError> {
        let ticket = {
            let mut guard = self.view.borrow_mut();
            let view = &mut *guard;
            view.registry.remove(&mut view.surface, user_id);
            view.registry.begin_fetch(user_id)
        };
        self.fetch_and_add(ticket).await
    }

    async fn fetch_and_add(&self, ticket: FetchTicket) -> Result<TrackChange, SyncError> {
        let user_id = ticket.user_id();
        tracing::debug!(user_id, "fetching track");
        let points = match self.api.fetch_points(user_id).await {
            Ok(points) => points,
            Err(e) => {
                let mut guard = self.view.borrow_mut();
                let view = &mut *guard;
                // Only the current request owns the pending slot.
                if view.registry.is_current(ticket) {
                    view.registry.remove(&mut view.surface, user_id);
                }
                drop(guard);
                return Err(self.report("Could not fetch tracks for user", e.into()));
            }
        };

        let mut guard = self.view.borrow_mut();
        let view = &mut *guard;
        let color = view.color_of(user_id);
        let change = match view.registry.add(&mut view.surface, ticket, &points, color) {
            AddOutcome::Shown(layer) => TrackChange::Shown(layer),
            AddOutcome::Stale => TrackChange::Stale,
            AddOutcome::Empty => {
                view.notices.push(Notice {
                    level: NoticeLevel::Warning,
                    message: format!("User #{user_id} has no recorded points"),
                });
                TrackChange::Empty
            }
        };
        Ok(change)
    }

    /// Fill a freshly opened popup with the user's track summary.
    ///
    /// Returns `false` if the popup's layer left the map while the summary
    /// was in flight.
    ///
    /// # Errors
    ///
    /// Returns the API error if the summary fetch fails.
    pub async fn open_popup(&self, event: PopupOpened) -> Result<bool, SyncError> {
        let summary = self
            .api
            .fetch_summary(event.user_id)
            .await
            .map_err(|e| self.report("Could not fetch track info", e.into()))?;

        let mut view = self.view.borrow_mut();
        if !view.surface.has_group(event.layer) {
            tracing::debug!(user_id = event.user_id, "popup closed with its layer; dropping summary");
            return Ok(false);
        }
        let content = popup::track_info_html(event.user_id, &summary);
        Ok(view.surface.set_popup_content(event.layer, event.shape, content))
    }

    // -------------------------------------------------------------------------
    // Draft
    // -------------------------------------------------------------------------

    /// Map double-click: add a point to the draft.
    pub fn record_point(&self, at: Point) {
        let mut guard = self.view.borrow_mut();
        let view = &mut *guard;
        view.draft.record_point(&mut view.surface, at);
    }

    pub fn clear_draft(&self) {
        let mut guard = self.view.borrow_mut();
        let view = &mut *guard;
        view.draft.clear(&mut view.surface);
    }

    /// Save the draft as `user_id`'s track, then refresh the list and show
    /// the new track.
    ///
    /// Only the submitted points leave the draft; points recorded while the
    /// create was in flight stay for the next submission. Once the create
    /// succeeds the result is `Ok` even if the refresh or the show fails.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::EmptyDraft`] without a request when there is
    /// nothing to send, or the API error from the create. On a failed create
    /// the draft is left untouched.
    pub async fn submit_draft(&self, user_id: UserId) -> Result<Submitted, SyncError> {
        let (points, epoch) = {
            let view = self.view.borrow();
            (view.draft.points(), view.draft.epoch())
        };
        if points.is_empty() {
            return Err(self.report("Could not create new user", SyncError::EmptyDraft));
        }

        tracing::info!(user_id, points = points.len(), "saving new user");
        self.api
            .create_points(user_id, &points)
            .await
            .map_err(|e| self.report("Could not create new user", e.into()))?;
        tracing::info!(user_id, "new user created");

        {
            let mut guard = self.view.borrow_mut();
            let view = &mut *guard;
            if view.draft.epoch() == epoch {
                view.draft.drop_submitted(&mut view.surface, points.len());
            }
        }
        // Failures below are already reported; the track is saved regardless.
        let _ = self.list_users().await;
        let shown = self.show_track(user_id).await.ok();
        Ok(Submitted { user_id, points: points.len(), shown })
    }

    fn report(&self, context: &str, error: SyncError) -> SyncError {
        tracing::error!(error = %error, "{context}");
        let message = match &error {
            SyncError::Api(api) if api.is_transport() => format!("{context}: service unreachable ({error})"),
            _ => format!("{context}: {error}"),
        };
        self.view.borrow_mut().notices.push(Notice { level: NoticeLevel::Error, message });
        error
    }
}
