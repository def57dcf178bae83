// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host settings consulted once at startup.

use serde::{Deserialize, Serialize};

/// A host-provided settings store.
///
/// Read exactly once by [`InteractionController::init`](crate::controller::InteractionController::init).
/// `None` means the host has no value yet; the controller then stays disabled.
pub trait SettingsSource {
    /// Whether hover/selection highlighting is enabled.
    fn enabled(&self) -> Option<bool>;
}

/// The glow toggle persisted by the host page.
///
/// Serialized as `{"enabled": true}`. A missing field reads as disabled, matching
/// the page's initial state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlowSettings {
    /// Highlighting on/off.
    #[serde(default)]
    pub enabled: bool,
}

impl GlowSettings {
    /// Parse the host's JSON settings blob.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl SettingsSource for GlowSettings {
    fn enabled(&self) -> Option<bool> {
        Some(self.enabled)
    }
}

impl SettingsSource for bool {
    fn enabled(&self) -> Option<bool> {
        Some(*self)
    }
}

impl<S: SettingsSource> SettingsSource for Option<S> {
    fn enabled(&self) -> Option<bool> {
        self.as_ref().and_then(SettingsSource::enabled)
    }
}
