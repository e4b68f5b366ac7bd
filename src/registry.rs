//! Track visibility registry: which users' tracks are on the map.
//!
//! DESIGN
//! ======
//! At most one rendered layer per user. Showing a track is split in two:
//! [`TrackRegistry::begin_fetch`] hands out a [`FetchTicket`] before the
//! points request goes out, and [`TrackRegistry::add`] renders the response
//! only if that ticket is still current. Toggling, removing or re-requesting
//! the same user retires the ticket, so a slow response for a track the user
//! already hid is dropped instead of reappearing.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;

use crate::color::Color;
use crate::model::{Point, UserId};
use crate::render;
use crate::scene::{LayerId, MapSurface};

/// Proof that a points fetch was requested for `user_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    user_id: UserId,
    generation: u64,
}

impl FetchTicket {
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Outcome of clicking a user's list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The track was on the map and has been removed.
    Hidden,
    /// A fetch was in flight; its response will be discarded.
    Cancelled,
    /// Nothing was shown or pending; the caller should fetch and show it.
    NotVisible,
}

impl Toggle {
    /// Whether the click turned the track off. `false` means the caller
    /// should fetch and show it.
    #[must_use]
    pub fn was_visible(self) -> bool {
        !matches!(self, Self::NotVisible)
    }
}

/// Outcome of [`TrackRegistry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Shown(LayerId),
    /// The ticket was retired before the response arrived.
    Stale,
    /// The track had no points; nothing was drawn.
    Empty,
}

#[derive(Debug, Default)]
pub struct TrackRegistry {
    visible: HashMap<UserId, LayerId>,
    pending: HashMap<UserId, u64>,
    next_generation: u64,
}

impl TrackRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide the track if shown, cancel it if pending, otherwise do nothing.
    pub fn toggle<S: MapSurface + ?Sized>(&mut self, surface: &mut S, user_id: UserId) -> Toggle {
        let was_pending = self.pending.remove(&user_id).is_some();
        if let Some(layer) = self.visible.remove(&user_id) {
            render::remove_group(surface, layer);
            tracing::debug!(user_id, "track hidden");
            return Toggle::Hidden;
        }
        if was_pending {
            tracing::debug!(user_id, "pending track fetch cancelled");
            return Toggle::Cancelled;
        }
        Toggle::NotVisible
    }

    /// Remove the user's layer from the map and retire any pending fetch.
    ///
    /// Returns whether a layer was shown. Idempotent.
    pub fn remove<S: MapSurface + ?Sized>(&mut self, surface: &mut S, user_id: UserId) -> bool {
        self.pending.remove(&user_id);
        match self.visible.remove(&user_id) {
            Some(layer) => {
                render::remove_group(surface, layer);
                true
            }
            None => false,
        }
    }

    /// Register a points request for `user_id`, superseding any earlier one.
    pub fn begin_fetch(&mut self, user_id: UserId) -> FetchTicket {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.pending.insert(user_id, generation);
        FetchTicket { user_id, generation }
    }

    /// Whether `ticket` is still the current request for its user.
    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.pending.get(&ticket.user_id) == Some(&ticket.generation)
    }

    /// Render a fetched track and register it for the ticket's user.
    ///
    /// Any layer already shown for the user is removed first.
    pub fn add<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        ticket: FetchTicket,
        points: &[Point],
        color: Color,
    ) -> AddOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(user_id = ticket.user_id, "discarding stale track response");
            return AddOutcome::Stale;
        }
        self.pending.remove(&ticket.user_id);
        self.remove(surface, ticket.user_id);

        let Some(layer) = render::render_group(surface, ticket.user_id, points, color) else {
            tracing::warn!(user_id = ticket.user_id, "track has no points; nothing to show");
            return AddOutcome::Empty;
        };
        self.visible.insert(ticket.user_id, layer);
        tracing::debug!(user_id = ticket.user_id, points = points.len(), "track shown");
        AddOutcome::Shown(layer)
    }

    #[must_use]
    pub fn is_visible(&self, user_id: UserId) -> bool {
        self.visible.contains_key(&user_id)
    }

    #[must_use]
    pub fn is_pending(&self, user_id: UserId) -> bool {
        self.pending.contains_key(&user_id)
    }

    #[must_use]
    pub fn layer(&self, user_id: UserId) -> Option<LayerId> {
        self.visible.get(&user_id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}
