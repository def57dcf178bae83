// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay pool: bounded reuse of decorative overlay elements.
//!
//! An [`OverlayElement`] is an owned value. It lives either in the pool (idle,
//! reset, detached) or inside exactly one active record; moving it is the only way
//! to hand it over, so an element can never be in both places.

use halo_scene::{ElementId, OverlayStyle, Scene};

/// A decorative overlay, possibly attached to the scene.
#[derive(Debug)]
pub struct OverlayElement {
    serial: u64,
    attachment: Option<ElementId>,
    style: OverlayStyle,
}

impl OverlayElement {
    /// Allocation serial; stable across reuse.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Scene element currently displaying this overlay.
    pub fn attachment(&self) -> Option<ElementId> {
        self.attachment
    }

    /// Current per-node style.
    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    pub(crate) fn style_mut(&mut self) -> &mut OverlayStyle {
        &mut self.style
    }

    /// Whether no per-node state remains.
    pub fn is_reset(&self) -> bool {
        self.attachment.is_none() && self.style.is_reset()
    }

    /// Display the overlay, or push its current style if it is already displayed.
    pub(crate) fn sync(&mut self, scene: &mut Scene) {
        match self.attachment {
            Some(id) if scene.restyle_overlay(id, self.style.clone()) => {}
            _ => self.attachment = Some(scene.attach_overlay(self.style.clone())),
        }
    }

    /// Remove the overlay from the scene. Tolerates an element that is already gone.
    pub(crate) fn detach(&mut self, scene: &mut Scene) {
        if let Some(id) = self.attachment.take()
            && scene.is_alive(id)
        {
            let _ = scene.detach_overlay(id);
        }
    }

    fn reset(&mut self) {
        self.style = OverlayStyle::default();
    }
}

/// Allocation and reuse counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Elements created because the pool was empty.
    pub allocated: u64,
    /// Acquisitions served from the pool.
    pub reused: u64,
    /// Elements handed back.
    pub released: u64,
    /// Released elements dropped because the pool was full.
    pub discarded: u64,
}

/// Capacity-bounded pool of idle overlays.
#[derive(Debug)]
pub struct OverlayPool {
    idle: Vec<OverlayElement>,
    capacity: usize,
    next_serial: u64,
    stats: PoolStats,
}

impl OverlayPool {
    /// An empty pool keeping at most `capacity` idle elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            idle: Vec::with_capacity(capacity),
            capacity,
            next_serial: 0,
            stats: PoolStats::default(),
        }
    }

    /// Take an idle element, or allocate a fresh one.
    pub fn acquire(&mut self) -> OverlayElement {
        if let Some(element) = self.idle.pop() {
            self.stats.reused += 1;
            return element;
        }
        self.stats.allocated += 1;
        let serial = self.next_serial;
        self.next_serial += 1;
        OverlayElement {
            serial,
            attachment: None,
            style: OverlayStyle::default(),
        }
    }

    /// Detach and reset `element`, then keep it if there is room.
    pub fn release(&mut self, scene: &mut Scene, mut element: OverlayElement) {
        element.detach(scene);
        element.reset();
        self.stats.released += 1;
        if self.idle.len() < self.capacity {
            self.idle.push(element);
        } else {
            self.stats.discarded += 1;
            tracing::trace!(serial = element.serial, "pool full, discarding overlay");
        }
    }

    /// Idle elements held.
    pub fn len(&self) -> usize {
        self.idle.len()
    }

    /// True if no idle element is held.
    pub fn is_empty(&self) -> bool {
        self.idle.is_empty()
    }

    /// Maximum number of idle elements.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Counters since construction.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Idle elements, most recently released last.
    pub fn idle(&self) -> impl Iterator<Item = &OverlayElement> {
        self.idle.iter()
    }
}
