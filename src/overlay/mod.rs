//! Keyboard, focus and scroll side effects for modal surfaces.

mod controller;
mod host;
mod keys;

pub use controller::{OverlayController, OverlayOptions, OverlaySession, OverlayState};
pub use host::{Element, ElementId, ElementKind, ElementTree, ListenerKind, OverlayHost};
pub use keys::{
    resolve_overlay_key, KeyModifiers, KeyOutcome, KeyPress, OverlayAction, OverlayKey,
    TabDirection,
};
