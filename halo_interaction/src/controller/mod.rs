// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction controller: scheduler, state transitions and public operations.
//!
//! ## Driving the controller
//!
//! The controller never suspends. The host feeds it three kinds of input, all on
//! one thread:
//!
//! - pointer-driven operations ([`create_hover_interaction`], [`end_hover_interaction`],
//!   [`create_selection_interaction`], [`clear_selection`], [`cleanup`]);
//! - [`on_frame`] once per display refresh while [`wants_frame`] is true, after the
//!   chart's layout pass for that frame was committed;
//! - [`advance_to`] with the current host time, which fires due timers. Call it before
//!   dispatching operations at a new instant so that new timers start from that instant.
//!
//! Every input becomes an [`Event`] handled by [`InteractionController::handle`].
//!
//! ## Passes
//!
//! Geometry is only measured during [`on_frame`]. At most one resolver pass is in
//! flight. Hover requests arriving meanwhile share a single latest-wins slot;
//! selection requests queue behind it. When a pass resumes, it first checks that its
//! node is still hovered or selected and is dropped otherwise.
//!
//! [`create_hover_interaction`]: InteractionController::create_hover_interaction
//! [`end_hover_interaction`]: InteractionController::end_hover_interaction
//! [`create_selection_interaction`]: InteractionController::create_selection_interaction
//! [`clear_selection`]: InteractionController::clear_selection
//! [`cleanup`]: InteractionController::cleanup
//! [`on_frame`]: InteractionController::on_frame
//! [`wants_frame`]: InteractionController::wants_frame
//! [`advance_to`]: InteractionController::advance_to

mod cleanup;

use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

use halo_scene::Scene;

use crate::catalog::NodeCatalog;
use crate::config::OverlayConfig;
use crate::pool::OverlayPool;
use crate::resolver::Resolver;
use crate::settings::SettingsSource;
use crate::store::{InteractionState, InteractionStore, NodePhase, NodeRecord};
use crate::timer::{TimerId, TimerKind, TimerQueue};

/// Everything that can happen to the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The pointer entered a node.
    HoverStarted(String),
    /// The pointer left a node. `None` uses the configured debounce.
    HoverEnded {
        /// Node left.
        node: String,
        /// Debounce before removal; zero removes at once.
        delay: Option<Duration>,
    },
    /// A node was selected.
    SelectionRequested {
        /// Node selected.
        node: String,
        /// Play the one-shot pulse.
        pulse: bool,
    },
    /// A node, or every node when `None`, was deselected.
    SelectionCleared(Option<String>),
    /// The display refreshed and the chart's layout is committed.
    FrameReady,
    /// A timer came due.
    TimerFired {
        /// Timer handle.
        id: TimerId,
        /// What it was for.
        kind: TimerKind,
    },
    /// The page is going away.
    TeardownRequested,
}

/// Controller lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Accepting operations.
    #[default]
    Running,
    /// `cleanup()` was called; waiting for the grace period.
    TearingDown,
    /// Every overlay was detached.
    Closed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ResolveRequest {
    node: String,
    pulse: bool,
}

/// The per-page interaction controller.
#[derive(Debug)]
pub struct InteractionController {
    config: OverlayConfig,
    enabled: bool,
    lifecycle: Lifecycle,
    catalog: NodeCatalog,
    resolver: Resolver,
    pool: OverlayPool,
    store: InteractionStore,
    timers: TimerQueue,
    selected: BTreeSet<String>,
    hovered: Option<String>,
    in_flight: Option<ResolveRequest>,
    pending_hover: Option<String>,
    pending_selections: VecDeque<ResolveRequest>,
    frame_requested: bool,
    teardown_timer: Option<TimerId>,
    now: Duration,
}

impl InteractionController {
    /// Create the controller.
    ///
    /// `settings` is consulted exactly once. A disabled controller ignores every
    /// operation and never creates an overlay.
    pub fn init(config: OverlayConfig, settings: &impl SettingsSource, catalog: NodeCatalog) -> Self {
        let enabled = settings.enabled().unwrap_or(false);
        tracing::debug!(enabled, nodes = catalog.len(), "interaction controller initialized");
        Self {
            resolver: Resolver::new(config.padding),
            pool: OverlayPool::with_capacity(config.pool_capacity),
            config,
            enabled,
            lifecycle: Lifecycle::Running,
            catalog,
            store: InteractionStore::new(),
            timers: TimerQueue::new(),
            selected: BTreeSet::new(),
            hovered: None,
            in_flight: None,
            pending_hover: None,
            pending_selections: VecDeque::new(),
            frame_requested: false,
            teardown_timer: None,
            now: Duration::ZERO,
        }
    }

    /// Replace the matcher chain.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    // --- public operations ---

    /// Highlight `node` as hovered.
    pub fn create_hover_interaction(&mut self, scene: &mut Scene, node: &str) {
        self.handle(scene, Event::HoverStarted(node.to_owned()));
    }

    /// The pointer left `node`. `None` uses the configured debounce.
    pub fn end_hover_interaction(&mut self, scene: &mut Scene, node: &str, delay: Option<Duration>) {
        self.handle(
            scene,
            Event::HoverEnded {
                node: node.to_owned(),
                delay,
            },
        );
    }

    /// Mark `node` as selected, optionally playing the pulse.
    pub fn create_selection_interaction(&mut self, scene: &mut Scene, node: &str, show_pulse: bool) {
        self.handle(
            scene,
            Event::SelectionRequested {
                node: node.to_owned(),
                pulse: show_pulse,
            },
        );
    }

    /// Deselect `node`, or every selected node when `None`.
    pub fn clear_selection(&mut self, scene: &mut Scene, node: Option<&str>) {
        self.handle(scene, Event::SelectionCleared(node.map(str::to_owned)));
    }

    /// Begin teardown. Remaining overlays are detached after the grace period.
    pub fn cleanup(&mut self, scene: &mut Scene) {
        self.handle(scene, Event::TeardownRequested);
    }

    /// Display refresh callback.
    pub fn on_frame(&mut self, scene: &mut Scene) {
        self.handle(scene, Event::FrameReady);
    }

    /// Move the clock to `now`, firing due timers in deadline order.
    pub fn advance_to(&mut self, scene: &mut Scene, now: Duration) {
        while let Some((id, at, kind)) = self.timers.pop_due(now) {
            self.now = self.now.max(at);
            self.handle(scene, Event::TimerFired { id, kind });
        }
        self.now = self.now.max(now);
    }

    /// Apply one event.
    pub fn handle(&mut self, scene: &mut Scene, event: Event) {
        if !self.enabled {
            if event == Event::TeardownRequested {
                self.lifecycle = Lifecycle::Closed;
            }
            return;
        }
        let accepted = match self.lifecycle {
            Lifecycle::Running => true,
            Lifecycle::TearingDown => matches!(event, Event::TimerFired { .. }),
            Lifecycle::Closed => false,
        };
        if !accepted {
            tracing::debug!(?event, lifecycle = ?self.lifecycle, "ignoring event after cleanup");
            return;
        }
        tracing::trace!(?event, now = ?self.now, "handling");
        match event {
            Event::HoverStarted(node) => self.hover_started(scene, node),
            Event::HoverEnded { node, delay } => {
                let delay = delay.unwrap_or(self.config.hover_exit_delay);
                self.hover_ended(scene, &node, delay);
            }
            Event::SelectionRequested { node, pulse } => self.selection_requested(scene, node, pulse),
            Event::SelectionCleared(Some(node)) => self.deselect(scene, &node),
            Event::SelectionCleared(None) => {
                let all: Vec<String> = self.selected.iter().cloned().collect();
                for node in all {
                    self.deselect(scene, &node);
                }
            }
            Event::FrameReady => self.frame_ready(scene),
            Event::TimerFired { id, kind } => self.timer_fired(scene, id, kind),
            Event::TeardownRequested => self.begin_teardown(scene),
        }
    }

    // --- host queries ---

    /// Whether the host should call [`on_frame`](Self::on_frame) on the next refresh.
    pub fn wants_frame(&self) -> bool {
        self.frame_requested
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Whether the settings enabled highlighting.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current lifecycle stage.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The controller's clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Active configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The node table.
    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    /// Whether a resolver pass is in flight.
    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Node waiting in the coalesced hover slot.
    pub fn pending_hover(&self) -> Option<&str> {
        self.pending_hover.as_deref()
    }

    /// Node the pointer is over.
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Selected nodes in id order.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Whether `node` is selected.
    pub fn is_selected(&self, node: &str) -> bool {
        self.selected.contains(node)
    }

    /// Active record of `node`.
    pub fn record(&self, node: &str) -> Option<&NodeRecord> {
        self.store.get(node)
    }

    /// Highlight state of `node`, if it is decorated.
    pub fn state(&self, node: &str) -> Option<InteractionState> {
        self.store.get(node).map(NodeRecord::state)
    }

    /// Lifecycle phase of `node`.
    pub fn phase(&self, node: &str) -> NodePhase {
        if let Some(record) = self.store.get(node) {
            return if record.fading {
                NodePhase::FadingOut
            } else {
                NodePhase::Active
            };
        }
        let queued = self.in_flight.as_ref().is_some_and(|r| r.node == node)
            || self.pending_hover.as_deref() == Some(node)
            || self.pending_selections.iter().any(|r| r.node == node);
        if queued {
            NodePhase::Resolving
        } else {
            NodePhase::Idle
        }
    }

    /// Active records.
    pub fn store(&self) -> &InteractionStore {
        &self.store
    }

    /// The overlay pool.
    pub fn pool(&self) -> &OverlayPool {
        &self.pool
    }

    // --- hover ---

    fn hover_started(&mut self, scene: &mut Scene, node: String) {
        if !self.catalog.contains(&node) {
            tracing::debug!(node = %node, "hover on node missing from catalog");
            return;
        }
        if let Some(previous) = self.hovered.take_if(|h| *h != node) {
            self.demote(scene, &previous);
        }
        self.hovered = Some(node.clone());

        if let Some(record) = self.store.get_mut(&node) {
            if let Some(id) = record.timers.exit.take() {
                let _ = self.timers.cancel(id);
            }
            if let Some(id) = record.timers.fade.take() {
                let _ = self.timers.cancel(id);
                record.fading = false;
                tracing::trace!(node = %node, "fading overlay revived");
            }
            record.hovered = true;
            record.sync(scene);
            self.pending_hover = None;
            return;
        }

        match self.in_flight.as_ref().map(|r| r.node == node) {
            Some(true) => self.pending_hover = None,
            Some(false) => {
                if let Some(dropped) = self.pending_hover.replace(node) {
                    tracing::trace!(%dropped, "pending hover superseded");
                }
            }
            None => {
                let request = self.hover_request(node);
                self.start_pass(request);
            }
        }
    }

    fn hover_ended(&mut self, scene: &mut Scene, node: &str, delay: Duration) {
        if self.hovered.as_deref() != Some(node) {
            tracing::debug!(node, "hover end for node that is not hovered");
            return;
        }
        if !self.store.contains(node) {
            // Nothing shown yet; the pass is dropped when it resumes.
            self.hovered = None;
            if self.pending_hover.as_deref() == Some(node) {
                self.pending_hover = None;
            }
            return;
        }
        if delay.is_zero() {
            self.hovered = None;
            self.pointer_left(scene, node, true);
            return;
        }
        let at = self.now + delay;
        if let Some(record) = self.store.get_mut(node) {
            if let Some(id) = record.timers.exit.take() {
                let _ = self.timers.cancel(id);
            }
            record.timers.exit = Some(self.timers.schedule(at, TimerKind::HoverExit(node.to_owned())));
        }
    }

    /// A different node took the hover.
    fn demote(&mut self, scene: &mut Scene, node: &str) {
        if self.pending_hover.as_deref() == Some(node) {
            self.pending_hover = None;
        }
        self.pointer_left(scene, node, false);
    }

    /// Drop the hover decoration of `node`: selected nodes keep their overlay,
    /// others fade out, or go straight back to the pool when `immediate`.
    fn pointer_left(&mut self, scene: &mut Scene, node: &str, immediate: bool) {
        let Some(record) = self.store.get_mut(node) else {
            return;
        };
        if let Some(id) = record.timers.exit.take() {
            let _ = self.timers.cancel(id);
        }
        if record.selected {
            record.hovered = false;
            record.sync(scene);
        } else if immediate {
            self.release_node(scene, node);
        } else {
            self.start_fade(scene, node);
        }
    }

    fn start_fade(&mut self, scene: &mut Scene, node: &str) {
        let at = self.now + self.config.fade_duration;
        let Some(record) = self.store.get_mut(node) else {
            return;
        };
        if record.fading {
            return;
        }
        record.hovered = false;
        record.fading = true;
        record.timers.fade = Some(self.timers.schedule(at, TimerKind::FadeOut(node.to_owned())));
        record.sync(scene);
        tracing::trace!(node, "fading out");
    }

    // --- selection ---

    fn selection_requested(&mut self, scene: &mut Scene, node: String, pulse: bool) {
        if !self.catalog.contains(&node) {
            tracing::debug!(node = %node, "selection of node missing from catalog");
            return;
        }
        let _ = self.selected.insert(node.clone());
        let pulse_end = self.now + self.config.pulse_duration;

        if let Some(record) = self.store.get_mut(&node) {
            if let Some(id) = record.timers.fade.take() {
                let _ = self.timers.cancel(id);
                record.fading = false;
            }
            record.selected = true;
            if pulse {
                start_pulse(&mut self.timers, record, pulse_end);
            }
            record.sync(scene);
            return;
        }

        if let Some(request) = self.in_flight.as_mut().filter(|r| r.node == node) {
            request.pulse |= pulse;
            return;
        }
        if self.in_flight.is_none() {
            self.start_pass(ResolveRequest { node, pulse });
            return;
        }
        if let Some(queued) = self.pending_selections.iter_mut().find(|r| r.node == node) {
            queued.pulse |= pulse;
        } else {
            self.pending_selections.push_back(ResolveRequest { node, pulse });
        }
    }

    fn deselect(&mut self, scene: &mut Scene, node: &str) {
        if !self.selected.remove(node) {
            tracing::debug!(node, "node is not selected");
            return;
        }
        self.pending_selections.retain(|r| r.node != node);
        let Some(record) = self.store.get_mut(node) else {
            return;
        };
        record.selected = false;
        record.pulsing = false;
        if let Some(id) = record.timers.pulse.take() {
            let _ = self.timers.cancel(id);
        }
        if record.hovered || record.fading {
            record.sync(scene);
        } else {
            self.release_node(scene, node);
        }
    }

    // --- passes ---

    /// A hover pass absorbs any queued selection of the same node, pulse included.
    fn hover_request(&mut self, node: String) -> ResolveRequest {
        let pulse = self
            .pending_selections
            .iter()
            .position(|r| r.node == node)
            .and_then(|i| self.pending_selections.remove(i))
            .is_some_and(|r| r.pulse);
        ResolveRequest { node, pulse }
    }

    fn start_pass(&mut self, request: ResolveRequest) {
        tracing::trace!(node = %request.node, "resolving on next frame");
        self.in_flight = Some(request);
        self.frame_requested = true;
    }

    fn frame_ready(&mut self, scene: &mut Scene) {
        if !core::mem::take(&mut self.frame_requested) {
            return;
        }
        if let Some(request) = self.in_flight.take() {
            self.complete_pass(scene, &request);
        }
        self.service_next();
    }

    fn complete_pass(&mut self, scene: &mut Scene, request: &ResolveRequest) {
        let node = request.node.as_str();
        let hovered = self.hovered.as_deref() == Some(node);
        let selected = self.selected.contains(node);
        if !hovered && !selected {
            tracing::debug!(node, "dropping stale pass");
            return;
        }
        if self.store.contains(node) {
            return;
        }
        let Some(info) = self.catalog.get(node) else {
            return;
        };
        let resolution = match self.resolver.resolve(scene, node, info) {
            Ok(resolution) => resolution,
            Err(miss) => {
                tracing::warn!(node, %miss, "cannot place overlay");
                return;
            }
        };

        let mut record = NodeRecord::new(node, info.tier.as_str(), self.pool.acquire(), resolution.geometry);
        record.hovered = hovered;
        record.selected = selected;
        if selected && request.pulse {
            start_pulse(&mut self.timers, &mut record, self.now + self.config.pulse_duration);
        }
        record.sync(scene);
        tracing::trace!(
            node,
            strategy = resolution.strategy,
            geometry = ?resolution.geometry,
            "overlay attached"
        );
        self.store.insert(record);
    }

    /// Start the next queued pass, if any: the hover slot first, then selections.
    fn service_next(&mut self) {
        if self.in_flight.is_some() {
            return;
        }
        if let Some(node) = self.pending_hover.take()
            && self.hovered.as_deref() == Some(node.as_str())
            && !self.store.contains(&node)
        {
            let request = self.hover_request(node);
            self.start_pass(request);
            return;
        }
        while let Some(request) = self.pending_selections.pop_front() {
            if self.selected.contains(&request.node) && !self.store.contains(&request.node) {
                self.start_pass(request);
                return;
            }
        }
    }

    // --- timers ---

    fn timer_fired(&mut self, scene: &mut Scene, id: TimerId, kind: TimerKind) {
        match kind {
            TimerKind::HoverExit(node) => {
                let live = self.store.get(&node).is_some_and(|r| r.timers.exit == Some(id));
                if !live {
                    tracing::trace!(?id, node = %node, "stale exit timer");
                    return;
                }
                if let Some(record) = self.store.get_mut(&node) {
                    record.timers.exit = None;
                }
                if self.hovered.as_deref() == Some(node.as_str()) {
                    self.hovered = None;
                }
                self.pointer_left(scene, &node, false);
            }
            TimerKind::FadeOut(node) => {
                let live = self.store.get(&node).is_some_and(|r| r.timers.fade == Some(id));
                if !live {
                    tracing::trace!(?id, node = %node, "stale fade timer");
                    return;
                }
                self.release_node(scene, &node);
            }
            TimerKind::PulseEnd(node) => {
                let Some(record) = self.store.get_mut(&node).filter(|r| r.timers.pulse == Some(id)) else {
                    tracing::trace!(?id, node = %node, "stale pulse timer");
                    return;
                };
                record.timers.pulse = None;
                record.pulsing = false;
                record.sync(scene);
            }
            TimerKind::Teardown => {
                if self.teardown_timer == Some(id) {
                    self.teardown_timer = None;
                    self.finish_teardown(scene);
                }
            }
        }
    }

    /// Remove the record of `node` and return its overlay to the pool.
    fn release_node(&mut self, scene: &mut Scene, node: &str) {
        let Some(record) = self.store.remove(node) else {
            return;
        };
        let (overlay, timers) = record.into_parts();
        for id in timers.iter() {
            let _ = self.timers.cancel(id);
        }
        self.pool.release(scene, overlay);
        tracing::trace!(node, "overlay released");
    }
}

fn start_pulse(timers: &mut TimerQueue, record: &mut NodeRecord, until: Duration) {
    if let Some(id) = record.timers.pulse.take() {
        let _ = timers.cancel(id);
    }
    record.pulsing = true;
    record.timers.pulse = Some(timers.schedule(until, TimerKind::PulseEnd(record.node().to_owned())));
}
