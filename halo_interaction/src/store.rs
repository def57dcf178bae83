// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction state store: one record per decorated node.

use std::collections::BTreeMap;

use halo_scene::{OverlayFlags, OverlayStyle, Scene};
use kurbo::Rect;

use crate::pool::OverlayElement;
use crate::timer::TimerId;

/// Highlight state of a decorated node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionState {
    /// Pointer over the node.
    Hovered,
    /// Node selected, pointer elsewhere.
    Selected,
    /// Both.
    HoveredSelected,
    /// Overlay leaving; released when the fade window ends.
    FadingOut,
}

/// Where a node is in its interaction lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodePhase {
    /// No overlay and no pass pending.
    Idle,
    /// Waiting for a frame to resolve its geometry.
    Resolving,
    /// Decorated.
    Active,
    /// Decorated, fading out.
    FadingOut,
}

/// Live timers owned by a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeTimers {
    /// Hover exit debounce.
    pub exit: Option<TimerId>,
    /// Fade window.
    pub fade: Option<TimerId>,
    /// Selection pulse.
    pub pulse: Option<TimerId>,
}

impl NodeTimers {
    /// Every live timer id.
    pub fn iter(&self) -> impl Iterator<Item = TimerId> {
        [self.exit, self.fade, self.pulse].into_iter().flatten()
    }
}

/// An active interaction: a node and the overlay it exclusively owns.
#[derive(Debug)]
pub struct NodeRecord {
    node: String,
    tier: String,
    overlay: OverlayElement,
    geometry: Rect,
    pub(crate) hovered: bool,
    pub(crate) selected: bool,
    pub(crate) pulsing: bool,
    pub(crate) fading: bool,
    pub(crate) timers: NodeTimers,
}

impl NodeRecord {
    pub(crate) fn new(
        node: impl Into<String>,
        tier: impl Into<String>,
        overlay: OverlayElement,
        geometry: Rect,
    ) -> Self {
        Self {
            node: node.into(),
            tier: tier.into(),
            overlay,
            geometry,
            hovered: false,
            selected: false,
            pulsing: false,
            fading: false,
            timers: NodeTimers::default(),
        }
    }

    /// Node id.
    pub fn node(&self) -> &str {
        &self.node
    }

    /// Node tier.
    pub fn tier(&self) -> &str {
        &self.tier
    }

    /// Padded, container-relative geometry.
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// The owned overlay.
    pub fn overlay(&self) -> &OverlayElement {
        &self.overlay
    }

    /// Whether the pointer is considered over the node.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether the node is selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether the pulse decoration is playing.
    pub fn is_pulsing(&self) -> bool {
        self.pulsing
    }

    /// Live timers.
    pub fn timers(&self) -> NodeTimers {
        self.timers
    }

    /// Current highlight state.
    pub fn state(&self) -> InteractionState {
        match (self.fading, self.hovered, self.selected) {
            (true, ..) => InteractionState::FadingOut,
            (false, true, true) => InteractionState::HoveredSelected,
            (false, false, true) => InteractionState::Selected,
            (false, _, false) => InteractionState::Hovered,
        }
    }

    /// Presentation flags for the current state.
    pub fn flags(&self) -> OverlayFlags {
        let mut flags = OverlayFlags::empty();
        flags.set(OverlayFlags::HOVERED, self.hovered && !self.fading);
        flags.set(OverlayFlags::SELECTED, self.selected);
        flags.set(OverlayFlags::FADING_OUT, self.fading);
        flags.set(OverlayFlags::PULSE, self.pulsing);
        flags
    }

    /// Push the record's state onto its overlay.
    pub(crate) fn sync(&mut self, scene: &mut Scene) {
        *self.overlay.style_mut() = OverlayStyle {
            node: Some(self.node.clone()),
            tier: Some(self.tier.clone()),
            flags: self.flags(),
            geometry: Some(self.geometry),
        };
        self.overlay.sync(scene);
    }

    /// Give up the overlay, returning it with the live timers to cancel.
    pub(crate) fn into_parts(self) -> (OverlayElement, NodeTimers) {
        (self.overlay, self.timers)
    }
}

/// Active records keyed by node id.
#[derive(Debug, Default)]
pub struct InteractionStore {
    records: BTreeMap<String, NodeRecord>,
}

impl InteractionStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for `node`.
    pub fn get(&self, node: &str) -> Option<&NodeRecord> {
        self.records.get(node)
    }

    pub(crate) fn get_mut(&mut self, node: &str) -> Option<&mut NodeRecord> {
        self.records.get_mut(node)
    }

    /// Whether `node` has an active record.
    pub fn contains(&self, node: &str) -> bool {
        self.records.contains_key(node)
    }

    pub(crate) fn insert(&mut self, record: NodeRecord) {
        let previous = self.records.insert(record.node.clone(), record);
        debug_assert!(previous.is_none(), "node already had an active overlay");
    }

    pub(crate) fn remove(&mut self, node: &str) -> Option<NodeRecord> {
        self.records.remove(node)
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = NodeRecord> + use<> {
        core::mem::take(&mut self.records).into_values()
    }

    /// Number of active records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing is decorated.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in node id order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeRecord> {
        self.records.values()
    }
}
