//! Keeps a floating outline widget attached to every editor surface of a
//! host UI.
//!
//! The host owns the UI tree and the event bus. The [`Engine`] observes both:
//!
//! - tree mutations are classified into change [`signal`]s and coalesced by
//!   deadline timers ([`coalesce`]) instead of acting on every record;
//! - surfaces are discovered and deduplicated in [`surface`], and the
//!   document each one shows is resolved by an ordered strategy chain in
//!   [`identity`];
//! - the [`SurfaceRegistry`] keeps exactly one widget per live surface,
//!   refreshing it only when the surface's [`DocumentKey`] changes;
//! - edit transactions from the host are interpreted in [`txlog`] to detect
//!   heading changes.
//!
//! Widgets are supplied by the embedder through [`WidgetFactory`]; the
//! engine never renders anything itself.

pub mod coalesce;
mod engine;
pub mod host;
pub mod identity;
pub mod registry;
mod selectors;
pub mod signal;
pub mod surface;
pub mod txlog;
pub mod widget;

pub use engine::{Engine, RESULT_NAVIGATION_KEYS};
pub use host::{HostEvent, HostEventKind, HostPort};
pub use identity::{DocumentKey, HISTORY_SENTINEL, extract_doc_id_from_path};
pub use registry::{ReconcileReport, SurfaceRegistry, UpdateOutcome};
pub use surface::SurfaceKind;
pub use widget::{OutlineWidget, RefreshContext, WidgetFactory, WidgetOptions};

// Dev-dependencies only the integration suites use.
#[cfg(test)]
use proptest as _;
#[cfg(test)]
use tracing_subscriber as _;
