//! The UI runtime as seen by the overlay controller.
//!
//! [`OverlayHost`] is the seam to a real widget toolkit. [`ElementTree`] is an
//! in-memory host with browser-like focus rules, used by headless callers and
//! by the tests.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Escape,
    FocusTrap,
}

pub trait OverlayHost {
    fn active_element(&self) -> Option<ElementId>;
    fn focus(&mut self, element: ElementId);
    /// True when `element` is `container` or one of its descendants.
    fn contains(&self, container: ElementId, element: ElementId) -> bool;
    /// Tabbable, rendered descendants of `container` in document order.
    fn focusable_within(&self, container: ElementId) -> Vec<ElementId>;
    /// Inline `overflow` of the page body; `None` when unset.
    fn body_overflow(&self) -> Option<String>;
    fn set_body_overflow(&mut self, overflow: Option<&str>);
    fn attach_listener(&mut self, kind: ListenerKind);
    fn detach_listener(&mut self, kind: ListenerKind);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Button,
    Link,
    Input,
    Select,
    TextArea,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub label: String,
    pub href: Option<String>,
    pub tab_index: Option<i32>,
    pub disabled: bool,
    pub hidden: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn new(kind: ElementKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            href: None,
            tab_index: None,
            disabled: false,
            hidden: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self::new(ElementKind::Button, label)
    }

    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(ElementKind::Link, label).with_href(href)
    }

    pub fn generic(label: impl Into<String>) -> Self {
        Self::new(ElementKind::Generic, label)
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    fn is_tabbable(&self) -> bool {
        if self.disabled || self.tab_index.is_some_and(|index| index < 0) {
            return false;
        }
        match self.kind {
            ElementKind::Button
            | ElementKind::Input
            | ElementKind::Select
            | ElementKind::TextArea => true,
            ElementKind::Link => self.href.is_some() || self.tab_index.is_some(),
            ElementKind::Generic => self.tab_index.is_some(),
        }
    }
}

/// Arena-backed element tree rooted at a body element.
#[derive(Debug, Clone)]
pub struct ElementTree {
    elements: Vec<Element>,
    active: Option<ElementId>,
    body_overflow: Option<String>,
    listeners: HashMap<ListenerKind, usize>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self {
            elements: vec![Element::generic("body")],
            active: None,
            body_overflow: None,
            listeners: HashMap::new(),
        }
    }

    pub fn body(&self) -> ElementId {
        ElementId(0)
    }

    /// Appends `element` as the last child of `parent`. An unknown parent
    /// falls back to the body.
    pub fn append(&mut self, parent: ElementId, mut element: Element) -> ElementId {
        let parent = if parent.0 < self.elements.len() {
            parent
        } else {
            tracing::warn!(?parent, "unknown parent element; appending to body");
            self.body()
        };
        let id = ElementId(self.elements.len());
        element.parent = Some(parent);
        element.children.clear();
        self.elements.push(element);
        self.elements[parent.0].children.push(id);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.listeners.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.values().sum()
    }

    /// Pre-order descendants of `root`, excluding `root` itself.
    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut ordered = Vec::new();
        let mut stack = match self.get(root) {
            Some(element) => element.children.iter().rev().copied().collect::<Vec<_>>(),
            None => return ordered,
        };
        while let Some(id) = stack.pop() {
            ordered.push(id);
            if let Some(element) = self.get(id) {
                stack.extend(element.children.iter().rev().copied());
            }
        }
        ordered
    }

    fn is_rendered(&self, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.get(current) {
                Some(element) if element.hidden => return false,
                Some(element) => cursor = element.parent,
                None => return false,
            }
        }
        true
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayHost for ElementTree {
    fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    fn focus(&mut self, element: ElementId) {
        if self.get(element).is_some() {
            self.active = Some(element);
        }
    }

    fn contains(&self, container: ElementId, element: ElementId) -> bool {
        let mut cursor = Some(element);
        while let Some(current) = cursor {
            if current == container {
                return true;
            }
            cursor = self.get(current).and_then(Element::parent);
        }
        false
    }

    fn focusable_within(&self, container: ElementId) -> Vec<ElementId> {
        self.descendants(container)
            .into_iter()
            .filter(|&id| {
                self.get(id).is_some_and(Element::is_tabbable) && self.is_rendered(id)
            })
            .collect()
    }

    fn body_overflow(&self) -> Option<String> {
        self.body_overflow.clone()
    }

    fn set_body_overflow(&mut self, overflow: Option<&str>) {
        self.body_overflow = overflow.map(str::to_string);
    }

    fn attach_listener(&mut self, kind: ListenerKind) {
        *self.listeners.entry(kind).or_insert(0) += 1;
    }

    fn detach_listener(&mut self, kind: ListenerKind) {
        match self.listeners.get_mut(&kind) {
            Some(count) if *count > 0 => *count -= 1,
            _ => tracing::warn!(?kind, "detaching a listener that is not attached"),
        }
    }
}
