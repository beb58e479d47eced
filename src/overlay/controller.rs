//! Escape-to-close, scroll lock and focus containment for an open overlay.
//!
//! Each behavior is an [`Effect`] keyed on its own dependency tuple. When the
//! tuple changes the previous guard is released before a new one is
//! acquired, so a listener or scroll override never outlives the condition
//! that installed it.

use super::host::{ElementId, ListenerKind, OverlayHost};
use super::keys::{resolve_overlay_key, KeyOutcome, KeyPress, OverlayAction, TabDirection};

const SCROLL_LOCK_OVERFLOW: &str = "hidden";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    pub enable_escape: bool,
    pub enable_scroll_lock: bool,
    pub enable_focus_trap: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            enable_escape: true,
            enable_scroll_lock: true,
            enable_focus_trap: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayState {
    pub is_open: bool,
    pub container: Option<ElementId>,
}

impl OverlayState {
    pub const fn open(container: Option<ElementId>) -> Self {
        Self {
            is_open: true,
            container,
        }
    }

    pub const fn closed() -> Self {
        Self {
            is_open: false,
            container: None,
        }
    }
}

trait EffectGuard: Sized {
    type Deps: Copy + PartialEq;

    fn acquire(deps: Self::Deps, host: &mut dyn OverlayHost) -> Option<Self>;
    fn release(self, host: &mut dyn OverlayHost);
}

struct Effect<G: EffectGuard> {
    deps: Option<G::Deps>,
    guard: Option<G>,
}

impl<G: EffectGuard> Effect<G> {
    fn new() -> Self {
        Self {
            deps: None,
            guard: None,
        }
    }

    fn reconcile(&mut self, deps: G::Deps, host: &mut dyn OverlayHost) {
        if self.deps == Some(deps) {
            return;
        }
        self.release(host);
        self.deps = Some(deps);
        self.guard = G::acquire(deps, host);
    }

    fn release(&mut self, host: &mut dyn OverlayHost) {
        if let Some(guard) = self.guard.take() {
            guard.release(host);
        }
    }

    fn teardown(&mut self, host: &mut dyn OverlayHost) {
        self.release(host);
        self.deps = None;
    }

    fn guard(&self) -> Option<&G> {
        self.guard.as_ref()
    }

    fn is_active(&self) -> bool {
        self.guard.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ToggleDeps {
    is_open: bool,
    enabled: bool,
}

impl ToggleDeps {
    fn active(self) -> bool {
        self.is_open && self.enabled
    }
}

struct EscapeListener;

impl EffectGuard for EscapeListener {
    type Deps = ToggleDeps;

    fn acquire(deps: ToggleDeps, host: &mut dyn OverlayHost) -> Option<Self> {
        if !deps.active() {
            return None;
        }
        host.attach_listener(ListenerKind::Escape);
        Some(Self)
    }

    fn release(self, host: &mut dyn OverlayHost) {
        host.detach_listener(ListenerKind::Escape);
    }
}

struct ScrollLock {
    previous_overflow: Option<String>,
}

impl EffectGuard for ScrollLock {
    type Deps = ToggleDeps;

    fn acquire(deps: ToggleDeps, host: &mut dyn OverlayHost) -> Option<Self> {
        if !deps.active() {
            return None;
        }
        let previous_overflow = host.body_overflow();
        host.set_body_overflow(Some(SCROLL_LOCK_OVERFLOW));
        tracing::debug!(?previous_overflow, "page scroll locked");
        Some(Self { previous_overflow })
    }

    fn release(self, host: &mut dyn OverlayHost) {
        host.set_body_overflow(self.previous_overflow.as_deref());
        tracing::debug!(restored = ?self.previous_overflow, "page scroll restored");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FocusTrapDeps {
    is_open: bool,
    enabled: bool,
    container: Option<ElementId>,
}

struct FocusTrap {
    container: ElementId,
}

impl EffectGuard for FocusTrap {
    type Deps = FocusTrapDeps;

    fn acquire(deps: FocusTrapDeps, host: &mut dyn OverlayHost) -> Option<Self> {
        let container = deps.container.filter(|_| deps.is_open && deps.enabled)?;
        host.attach_listener(ListenerKind::FocusTrap);
        Some(Self { container })
    }

    fn release(self, host: &mut dyn OverlayHost) {
        host.detach_listener(ListenerKind::FocusTrap);
    }
}

impl FocusTrap {
    /// Returns true when focus was moved and the host's own Tab handling
    /// must be suppressed.
    fn handle_tab(&self, direction: TabDirection, host: &mut dyn OverlayHost) -> bool {
        let focusable = host.focusable_within(self.container);
        let (Some(&first), Some(&last)) = (focusable.first(), focusable.last()) else {
            return false;
        };

        let active = host.active_element();
        if !active.is_some_and(|element| host.contains(self.container, element)) {
            host.focus(first);
            return true;
        }

        let tracked = active.is_some_and(|element| focusable.contains(&element));
        let target = match direction {
            TabDirection::Forward if !tracked || active == Some(last) => first,
            TabDirection::Backward if !tracked || active == Some(first) => last,
            _ => return false,
        };
        host.focus(target);
        true
    }
}

/// Owns the overlay's side effects. The host is passed into every call, so
/// the controller cannot release anything on its own: call
/// [`OverlayController::teardown`] before dropping it, or drive it through
/// [`OverlayController::attach`], whose session tears down on drop.
pub struct OverlayController {
    options: OverlayOptions,
    state: OverlayState,
    on_close: Box<dyn FnMut()>,
    escape: Effect<EscapeListener>,
    scroll_lock: Effect<ScrollLock>,
    focus_trap: Effect<FocusTrap>,
}

impl OverlayController {
    pub fn new(options: OverlayOptions, on_close: impl FnMut() + 'static) -> Self {
        Self {
            options,
            state: OverlayState::default(),
            on_close: Box::new(on_close),
            escape: Effect::new(),
            scroll_lock: Effect::new(),
            focus_trap: Effect::new(),
        }
    }

    pub fn options(&self) -> OverlayOptions {
        self.options
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn sync(&mut self, state: OverlayState, host: &mut dyn OverlayHost) {
        tracing::debug!(from = ?self.state, to = ?state, "sync overlay state");
        self.state = state;
        self.reconcile(host);
    }

    pub fn set_options(&mut self, options: OverlayOptions, host: &mut dyn OverlayHost) {
        self.options = options;
        self.reconcile(host);
    }

    fn reconcile(&mut self, host: &mut dyn OverlayHost) {
        let OverlayState { is_open, container } = self.state;
        self.escape.reconcile(
            ToggleDeps {
                is_open,
                enabled: self.options.enable_escape,
            },
            host,
        );
        self.scroll_lock.reconcile(
            ToggleDeps {
                is_open,
                enabled: self.options.enable_scroll_lock,
            },
            host,
        );
        self.focus_trap.reconcile(
            FocusTrapDeps {
                is_open,
                enabled: self.options.enable_focus_trap,
                container,
            },
            host,
        );
    }

    /// Feeds one key press to whichever listeners are currently attached.
    pub fn handle_key(&mut self, press: KeyPress, host: &mut dyn OverlayHost) -> KeyOutcome {
        let mut outcome = KeyOutcome::default();
        match resolve_overlay_key(press) {
            Some(OverlayAction::Close) if self.escape.is_active() => {
                (self.on_close)();
                outcome.close_requested = true;
            }
            Some(OverlayAction::MoveFocus(direction)) => {
                if let Some(trap) = self.focus_trap.guard() {
                    outcome.default_prevented = trap.handle_tab(direction, host);
                }
            }
            _ => {}
        }
        outcome
    }

    pub fn is_escape_active(&self) -> bool {
        self.escape.is_active()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_active()
    }

    pub fn is_focus_trapped(&self) -> bool {
        self.focus_trap.is_active()
    }

    /// Releases every behavior. Safe to call repeatedly.
    pub fn teardown(&mut self, host: &mut dyn OverlayHost) {
        self.escape.teardown(host);
        self.scroll_lock.teardown(host);
        self.focus_trap.teardown(host);
    }

    /// Binds the controller to `host` until the returned session is dropped.
    pub fn attach<'a, H: OverlayHost>(&'a mut self, host: &'a mut H) -> OverlaySession<'a, H> {
        OverlaySession {
            controller: self,
            host,
        }
    }

    fn is_holding_effects(&self) -> bool {
        self.is_escape_active() || self.is_scroll_locked() || self.is_focus_trapped()
    }
}

impl Drop for OverlayController {
    fn drop(&mut self) {
        if self.is_holding_effects() {
            tracing::warn!(
                state = ?self.state,
                "overlay controller dropped without teardown; host effects leaked"
            );
        }
    }
}

/// A controller borrowed together with its host. Dropping the session
/// releases every effect the controller still holds.
pub struct OverlaySession<'a, H: OverlayHost> {
    controller: &'a mut OverlayController,
    host: &'a mut H,
}

impl<H: OverlayHost> OverlaySession<'_, H> {
    pub fn sync(&mut self, state: OverlayState) {
        self.controller.sync(state, &mut *self.host);
    }

    pub fn set_options(&mut self, options: OverlayOptions) {
        self.controller.set_options(options, &mut *self.host);
    }

    pub fn handle_key(&mut self, press: KeyPress) -> KeyOutcome {
        self.controller.handle_key(press, &mut *self.host)
    }

    pub fn controller(&self) -> &OverlayController {
        &*self.controller
    }

    pub fn host(&self) -> &H {
        &*self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut *self.host
    }
}

impl<H: OverlayHost> Drop for OverlaySession<'_, H> {
    fn drop(&mut self) {
        self.controller.teardown(&mut *self.host);
    }
}

impl std::fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayController")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("escape", &self.escape.is_active())
            .field("scroll_lock", &self.scroll_lock.is_active())
            .field("focus_trap", &self.focus_trap.is_active())
            .finish()
    }
}
