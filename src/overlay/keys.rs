#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKey {
    Character(char),
    Tab,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub shift: bool,
}

impl KeyModifiers {
    pub const fn new(shift: bool) -> Self {
        Self { shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: OverlayKey,
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    pub const fn new(key: OverlayKey, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }

    pub const fn plain(key: OverlayKey) -> Self {
        Self::new(key, KeyModifiers::new(false))
    }

    pub const fn shifted(key: OverlayKey) -> Self {
        Self::new(key, KeyModifiers::new(true))
    }
}

/// What the controller did with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// The host must not run its own default handling (Tab navigation).
    pub default_prevented: bool,
    pub close_requested: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    Close,
    MoveFocus(TabDirection),
}

pub fn resolve_overlay_key(press: KeyPress) -> Option<OverlayAction> {
    match (press.key, press.modifiers.shift) {
        (OverlayKey::Escape, _) => Some(OverlayAction::Close),
        (OverlayKey::Tab, false) => Some(OverlayAction::MoveFocus(TabDirection::Forward)),
        (OverlayKey::Tab, true) => Some(OverlayAction::MoveFocus(TabDirection::Backward)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_overlay_key_maps_escape_regardless_of_modifiers() {
        assert_eq!(
            resolve_overlay_key(KeyPress::plain(OverlayKey::Escape)),
            Some(OverlayAction::Close)
        );
        assert_eq!(
            resolve_overlay_key(KeyPress::shifted(OverlayKey::Escape)),
            Some(OverlayAction::Close)
        );
    }

    #[test]
    fn resolve_overlay_key_uses_shift_for_tab_direction() {
        assert_eq!(
            resolve_overlay_key(KeyPress::plain(OverlayKey::Tab)),
            Some(OverlayAction::MoveFocus(TabDirection::Forward))
        );
        assert_eq!(
            resolve_overlay_key(KeyPress::shifted(OverlayKey::Tab)),
            Some(OverlayAction::MoveFocus(TabDirection::Backward))
        );
    }

    #[test]
    fn resolve_overlay_key_ignores_other_keys() {
        assert_eq!(resolve_overlay_key(KeyPress::plain(OverlayKey::Enter)), None);
        assert_eq!(
            resolve_overlay_key(KeyPress::plain(OverlayKey::Character('q'))),
            None
        );
    }
}
