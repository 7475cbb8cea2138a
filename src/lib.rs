// Copyright 2025 the Gumo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke and pixel erasure for vector drawing canvases.
//!
//! Gumo decides what an eraser gesture removes from a canvas of drawn
//! elements. It has two modes:
//!
//! - **Stroke** erasing marks whole elements the pointer trail passes
//!   through, expanding to their outermost group and to bound text and
//!   containers. Moving back over a marked element while restoring unmarks
//!   it again.
//! - **Pixel** erasing removes the points of freehand and linear elements
//!   that lie under a circular eraser, deleting elements that are left with
//!   fewer than two points.
//!
//! The canvas is seen through the [`Scene`] trait and never mutated; a
//! committed gesture yields an [`EraseOutcome`] for the caller to apply.
//! [`Elements`] is a ready-made in-memory scene that can apply outcomes
//! itself.
//!
//! # Examples
//!
//! ```
//! use gumo::{Element, ElementId, Elements, EraseOutcome, Eraser, Rect};
//!
//! let mut scene: Elements = [
//!     Element::rectangle("a", Rect::new(0.0, 0.0, 10.0, 10.0)),
//!     Element::rectangle("b", Rect::new(50.0, 0.0, 60.0, 10.0)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut eraser = Eraser::default();
//! eraser.start_path((-5.0, 5.0));
//! let marked = eraser.add_point((5.0, 5.0), &scene);
//! assert_eq!(marked, vec![ElementId::from("a")]);
//!
//! let outcome = eraser.commit(&scene).unwrap();
//! assert!(matches!(&outcome, EraseOutcome::Stroke(result) if result.marked_for_deletion.len() == 1));
//! scene.apply(&outcome);
//! assert!(scene.get(&"a".into()).unwrap().is_deleted);
//! ```
//!
//! # Features
//!
//! - `mint`: Enable `From`/`Into` conversion of Gumo and [mint][] vector types.
//! - `serde`: Implement `serde::Deserialize` and `serde::Serialize` on elements,
//!   settings and outcomes. Deserializing settings validates the eraser size.
//! - `schemars`: Add best-effort support for using Gumo types in JSON schemas
//!   using [schemars][].
//!
//! Diagnostics are emitted through [tracing][]: `debug` for gesture
//! lifecycle events and `trace` for every hit.
//!
//! [mint]: https://docs.rs/mint
//! [schemars]: https://docs.rs/schemars
//! [tracing]: https://docs.rs/tracing

// LINEBENDER LINT SET - lib.rs - v1
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![allow(
    clippy::use_self,
    clippy::return_self_not_must_use,
    clippy::missing_errors_doc,
    clippy::exhaustive_enums,
    clippy::match_same_arms
)]

mod cache;
mod circle;
mod element;
mod eraser;
mod line;
mod pixel;
mod point;
mod rect;
mod scene;
mod settings;
mod shape;
mod stroke;
mod vec2;

pub use crate::cache::*;
pub use crate::circle::*;
pub use crate::element::*;
pub use crate::eraser::*;
pub use crate::line::*;
pub use crate::pixel::*;
pub use crate::point::*;
pub use crate::rect::*;
pub use crate::scene::*;
pub use crate::settings::*;
pub use crate::shape::*;
pub use crate::stroke::*;
pub use crate::vec2::*;
