//! # Crop Circle Core
//!
//! Geometry engine behind the crop-circle widget: a draggable, resizable
//! crop frame laid over an image. Compiles to WASM for the browser binding
//! and runs natively for tests and trace replay.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                CropWidget                   │
//! ├─────────────────────────────────────────────┤
//! │  Input Reconciler │  Resize Watcher         │
//! │  - Frame drag     │  - Coalescing scheduler │
//! │  - Handle drag    │  - Proportional rescale │
//! │  - Pinch          │  - Initial derivation   │
//! ├─────────────────────────────────────────────┤
//! │  Constraint Solver                          │
//! │  - Aspect lock  - Rollback  - Clamping      │
//! ├─────────────────────────────────────────────┤
//! │  Bounds Tracker   │  Presentation styles    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! All rectangles are [`InsetRect`]s: distances from the container's edges,
//! not absolute coordinates.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bounds;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod handle;
pub mod host;
pub mod input;
pub mod scheduler;
pub mod solver;
pub mod style;
pub mod widget;

pub use bounds::{Bounds, ElementGeometry};
pub use config::{CropOptions, Shape};
pub use error::{CropError, CropResult};
pub use event::{HitTarget, InputEvent, TouchEvent, TouchPhase, TouchPoint, PRIMARY_BUTTON};
pub use geometry::{FrameChange, InsetRect, Point, Size};
pub use handle::{Edges, Handle, HandleCount};
pub use host::{CropHost, RecordingHost};
pub use input::{InputReconciler, Interaction, Proposal, Reaction, ReconcileContext};
pub use scheduler::{CoalescingScheduler, FrameClock, FrameToken};
pub use solver::{AspectAdjust, ConstraintSolver, FrameState, SolveOutcome};
pub use style::{ChromeStyle, FrameStyle};
pub use widget::{CropWidget, FrameObserver};

/// Crop core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
