// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning knobs for the interaction controller.

use core::time::Duration;

/// Configuration for [`InteractionController`](crate::controller::InteractionController).
///
/// Durations are measured on the host clock passed to
/// [`InteractionController::advance_to`](crate::controller::InteractionController::advance_to).
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Maximum number of idle overlays kept for reuse.
    /// Default: 10
    pub pool_capacity: usize,

    /// Padding added on every side of a resolved boundary box.
    /// Default: 2.0
    pub padding: f64,

    /// Debounce between a hover exit and the start of removal.
    /// Default: 50ms
    pub hover_exit_delay: Duration,

    /// How long a fading overlay stays attached before it returns to the pool.
    /// Default: 120ms
    pub fade_duration: Duration,

    /// Length of the one-shot selection pulse.
    /// Default: 300ms
    pub pulse_duration: Duration,

    /// Grace period between `cleanup()` and detaching the remaining overlays.
    /// Default: 150ms
    pub teardown_grace: Duration,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 10,
            padding: 2.0,
            hover_exit_delay: Duration::from_millis(50),
            fade_duration: Duration::from_millis(120),
            pulse_duration: Duration::from_millis(300),
            teardown_grace: Duration::from_millis(150),
        }
    }
}

impl OverlayConfig {
    /// Set the pool capacity.
    #[must_use]
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// Set the boundary padding.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the hover exit debounce.
    #[must_use]
    pub fn with_hover_exit_delay(mut self, delay: Duration) -> Self {
        self.hover_exit_delay = delay;
        self
    }

    /// Set the fade window.
    #[must_use]
    pub fn with_fade_duration(mut self, fade: Duration) -> Self {
        self.fade_duration = fade;
        self
    }

    /// Set the pulse window.
    #[must_use]
    pub fn with_pulse_duration(mut self, pulse: Duration) -> Self {
        self.pulse_duration = pulse;
        self
    }

    /// Set the teardown grace period.
    #[must_use]
    pub fn with_teardown_grace(mut self, grace: Duration) -> Self {
        self.teardown_grace = grace;
        self
    }
}
