// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Halo Interaction: hover and selection overlays for nodes drawn by an external chart.
//!
//! The chart owns layout and drawing; this crate only measures what it drew (through
//! a [`halo_scene::Scene`] mirror) and layers inert highlight overlays above it.
//!
//! - [`resolver`]: finds a node's boundary shape with an ordered chain of matchers.
//! - [`pool`]: bounded reuse of overlay elements.
//! - [`store`]: per-node interaction records and their states.
//! - [`timer`]: virtual-time timers for debounce, fade, pulse and teardown.
//! - [`controller`]: the scheduler and the public operations.
//! - [`catalog`], [`settings`], [`config`]: host-provided inputs.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use halo_interaction::{InteractionController, InteractionState, NodeCatalog, OverlayConfig};
//! use halo_scene::{LocalElement, OverlayFlags, Scene};
//! use kurbo::{Affine, Rect, Vec2};
//!
//! // The host mirrors the chart.
//! let mut scene = Scene::new(Rect::new(0.0, 0.0, 800.0, 600.0));
//! let group = scene.insert(None, LocalElement::group(Affine::translate(Vec2::new(40.0, 40.0))));
//! scene.insert(Some(group), LocalElement::shape(Rect::new(0.0, 0.0, 120.0, 40.0)));
//! scene.insert(Some(group), LocalElement::text(Rect::new(4.0, 4.0, 116.0, 36.0), "Data Quality"));
//! scene.commit();
//!
//! let catalog = NodeCatalog::from_json(r#"{"DQ": {"label": "Data Quality", "tier": "Foundational"}}"#).unwrap();
//! let mut controller = InteractionController::init(OverlayConfig::default(), &true, catalog);
//!
//! controller.create_hover_interaction(&mut scene, "DQ");
//! assert!(controller.wants_frame());
//! controller.on_frame(&mut scene);
//!
//! let (_, style) = scene.overlays().next().unwrap();
//! assert_eq!(style.flags, OverlayFlags::HOVERED);
//! assert_eq!(style.geometry, Some(Rect::new(38.0, 38.0, 162.0, 82.0)));
//! assert_eq!(controller.state("DQ"), Some(InteractionState::Hovered));
//!
//! // Leave: 50ms debounce, then a 120ms fade.
//! controller.end_hover_interaction(&mut scene, "DQ", None);
//! controller.advance_to(&mut scene, Duration::from_millis(50));
//! assert_eq!(controller.state("DQ"), Some(InteractionState::FadingOut));
//! controller.advance_to(&mut scene, Duration::from_millis(170));
//! assert_eq!(scene.overlay_count(), 0);
//! assert_eq!(controller.pool().len(), 1);
//! ```

pub mod catalog;
pub mod config;
pub mod controller;
pub mod pool;
pub mod resolver;
pub mod settings;
pub mod store;
pub mod timer;

pub use catalog::{CatalogError, NodeCatalog, NodeInfo};
pub use config::OverlayConfig;
pub use controller::{Event, InteractionController, Lifecycle};
pub use pool::{OverlayElement, OverlayPool, PoolStats};
pub use resolver::{Matcher, Resolution, ResolveMiss, Resolver};
pub use settings::{GlowSettings, SettingsSource};
pub use store::{InteractionState, InteractionStore, NodePhase, NodeRecord, NodeTimers};
pub use timer::{TimerId, TimerKind, TimerQueue};
