//! # trackmap
//!
//! Client-side core for browsing and authoring GPS tracks stored in a
//! position-log REST service.
//!
//! DESIGN
//! ======
//! Two state holders drive everything the user sees: the
//! [`registry::TrackRegistry`] (which users' tracks are on the map) and the
//! [`draft::DraftSession`] (the unsaved track being clicked together). Both
//! talk to the map only through the [`scene::MapSurface`] capability trait,
//! via the stateless helpers in [`render`]. The [`sync::SyncController`]
//! owns the API client and both state holders and runs every round trip.
//!
//! Nothing here touches a DOM. A browser shell implements `MapSurface` on top
//! of its mapping library; the bundled [`scene::Scene`] is a retained,
//! in-memory surface used by the CLI and the tests.

pub mod api;
pub mod color;
pub mod config;
pub mod draft;
pub mod geo;
pub mod model;
pub mod popup;
pub mod registry;
pub mod render;
pub mod scene;
pub mod sync;
