//! Input reconciliation: pointer and touch events to frame proposals.
//!
//! The reconciler is an explicit state machine over a single interaction
//! session:
//!
//! ```text
//!   Idle ──press frame──────────▶ DraggingFrame ──┐
//!    │  ──press handle─────────▶ DraggingHandle ─┤ release
//!    │  ──two-finger touch─────▶ Pinching ───────┤
//!    ◀───────────────────────────────────────────┘
//! ```
//!
//! It never touches the frame itself. Each move yields a [`Proposal`] that
//! the widget feeds to the constraint solver.

use crate::event::{HitTarget, InputEvent, TouchEvent, TouchPhase, PRIMARY_BUTTON};
use crate::geometry::{InsetRect, Point, Size};
use crate::handle::Handle;
use crate::solver::AspectAdjust;

/// The active interaction session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Interaction {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Moving the whole frame.
    DraggingFrame {
        /// Pointer offset from the frame's top-left corner at press time.
        grab: Point,
    },
    /// Resizing through a handle.
    DraggingHandle {
        /// The handle being dragged.
        handle: Handle,
        /// Pointer offset inside the handle element at press time.
        grab: Point,
    },
    /// Two-finger pinch/pan.
    Pinching {
        /// Second touch position of the previous sample.
        last: Point,
        /// First touch position of the previous sample.
        anchor: Point,
    },
}

impl Interaction {
    /// Whether a gesture is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// A frame the solver should try to commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proposal {
    /// Proposed frame.
    pub rect: InsetRect,
    /// Edges that absorb an aspect correction, if any.
    pub adjust: Option<AspectAdjust>,
}

/// What the reconciler made of an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reaction {
    /// Event was irrelevant in the current state.
    Ignored,
    /// A session started.
    Began,
    /// A session produced a new frame proposal.
    Propose(Proposal),
    /// The session ended.
    Released,
}

impl Reaction {
    /// Whether the host should suppress the event's default action.
    #[must_use]
    pub const fn consumes_event(&self) -> bool {
        matches!(self, Self::Began | Self::Propose(_))
    }
}

/// Frame and container state the reconciler reads for each event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileContext {
    /// Committed frame.
    pub frame: InsetRect,
    /// Page offset of the container.
    pub container_offset: Point,
    /// Container size the frame is measured against.
    pub container: Size,
}

impl ReconcileContext {
    fn to_container(&self, page: Point) -> Point {
        Point::new(
            page.x - self.container_offset.x,
            page.y - self.container_offset.y,
        )
    }
}

/// Turns raw input events into frame proposals.
#[derive(Debug, Clone, Default)]
pub struct InputReconciler {
    session: Interaction,
    no_touch_scroll: bool,
}

impl InputReconciler {
    /// Create a reconciler. With `no_touch_scroll`, a single-finger touch
    /// drags the frame instead of scrolling the page.
    #[must_use]
    pub const fn new(no_touch_scroll: bool) -> Self {
        Self {
            session: Interaction::Idle,
            no_touch_scroll,
        }
    }

    /// The current session.
    #[must_use]
    pub const fn session(&self) -> &Interaction {
        &self.session
    }

    /// Drop any session without emitting anything.
    pub fn reset(&mut self) {
        self.session = Interaction::Idle;
    }

    /// Feed one event through the state machine.
    pub fn handle(&mut self, event: &InputEvent, ctx: &ReconcileContext) -> Reaction {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                target,
            } => self.pointer_down(Point::new(*x, *y), *button, target, ctx),
            InputEvent::PointerMove { x, y } => self.pointer_move(Point::new(*x, *y), ctx),
            InputEvent::PointerUp { .. } => self.release(),
            InputEvent::Touch(touch) => match touch.phase {
                TouchPhase::Start => self.touch_start(touch, ctx),
                TouchPhase::Move => self.touch_move(touch, ctx),
                TouchPhase::End | TouchPhase::Cancel => self.release(),
            },
        }
    }

    fn pointer_down(
        &mut self,
        page: Point,
        button: u8,
        target: &HitTarget,
        ctx: &ReconcileContext,
    ) -> Reaction {
        if button != PRIMARY_BUTTON {
            return Reaction::Ignored;
        }

        match *target {
            HitTarget::Frame => self.begin_frame_drag(page, ctx),
            HitTarget::Handle { handle, offset } => {
                tracing::debug!(?handle, "Handle drag started");
                self.session = Interaction::DraggingHandle {
                    handle,
                    grab: offset,
                };
                Reaction::Began
            }
            HitTarget::Outside => Reaction::Ignored,
        }
    }

    fn begin_frame_drag(&mut self, page: Point, ctx: &ReconcileContext) -> Reaction {
        let pointer = ctx.to_container(page);
        let grab = Point::new(pointer.x - ctx.frame.left, pointer.y - ctx.frame.top);
        tracing::debug!(?grab, "Frame drag started");
        self.session = Interaction::DraggingFrame { grab };
        Reaction::Began
    }

    fn pointer_move(&mut self, page: Point, ctx: &ReconcileContext) -> Reaction {
        match self.session {
            Interaction::DraggingFrame { grab } => {
                Reaction::Propose(frame_drag_proposal(page, grab, ctx))
            }
            Interaction::DraggingHandle { handle, grab } => {
                Reaction::Propose(handle_drag_proposal(page, handle, grab, ctx))
            }
            Interaction::Pinching { .. } | Interaction::Idle => Reaction::Ignored,
        }
    }

    fn touch_start(&mut self, touch: &TouchEvent, ctx: &ReconcileContext) -> Reaction {
        match touch.touches.as_slice() {
            [only] if self.no_touch_scroll => self.begin_frame_drag(only.position(), ctx),
            [first, second] => {
                tracing::debug!("Pinch started");
                self.session = Interaction::Pinching {
                    last: first.position(),
                    anchor: second.position(),
                };
                Reaction::Began
            }
            _ => Reaction::Ignored,
        }
    }

    fn touch_move(&mut self, touch: &TouchEvent, ctx: &ReconcileContext) -> Reaction {
        match self.session {
            Interaction::Pinching { last, anchor } => {
                let [first, second, ..] = touch.touches.as_slice() else {
                    return Reaction::Ignored;
                };
                let (t1, t2) = (first.position(), second.position());
                let proposal = pinch_proposal(last, anchor, t1, t2, ctx);
                self.session = Interaction::Pinching {
                    last: t2,
                    anchor: t1,
                };
                Reaction::Propose(proposal)
            }
            Interaction::DraggingFrame { .. } | Interaction::DraggingHandle { .. } => {
                match touch.primary_touch() {
                    Some(point) => self.pointer_move(point.position(), ctx),
                    None => Reaction::Ignored,
                }
            }
            Interaction::Idle => Reaction::Ignored,
        }
    }

    fn release(&mut self) -> Reaction {
        if !self.session.is_active() {
            return Reaction::Ignored;
        }
        tracing::debug!(session = ?self.session, "Interaction finished");
        self.session = Interaction::Idle;
        Reaction::Released
    }
}

/// Translate the frame so the grab point follows the pointer.
fn frame_drag_proposal(page: Point, grab: Point, ctx: &ReconcileContext) -> Proposal {
    let pointer = ctx.to_container(page);
    let width = ctx.frame.width(ctx.container);
    let height = ctx.frame.height(ctx.container);
    let origin = Point::new(pointer.x - grab.x, pointer.y - grab.y);

    Proposal {
        rect: InsetRect::from_origin(origin, width, height, ctx.container),
        adjust: None,
    }
}

/// Move the handle's edges to the pointer.
///
/// The aspect correction goes to the axis the handle does not drive. Edges
/// are applied left, right, top, bottom and the last one picks the mode, so
/// a corner corrects on its own left or right edge.
fn handle_drag_proposal(
    page: Point,
    handle: Handle,
    grab: Point,
    ctx: &ReconcileContext,
) -> Proposal {
    let pointer = ctx.to_container(page);
    let x = pointer.x - grab.x;
    let y = pointer.y - grab.y;
    let edges = handle.edges();

    let fix_vertical = if edges.top {
        AspectAdjust::Top
    } else if edges.bottom {
        AspectAdjust::Bottom
    } else {
        AspectAdjust::Vertical
    };
    let fix_horizontal = if edges.left {
        AspectAdjust::Left
    } else if edges.right {
        AspectAdjust::Right
    } else {
        AspectAdjust::Horizontal
    };

    let mut rect = ctx.frame;
    let mut adjust = None;

    if edges.left {
        rect.left = x;
        adjust = Some(fix_vertical);
    }
    if edges.right {
        rect.right = ctx.container.width - x;
        adjust = Some(fix_vertical);
    }
    if edges.top {
        rect.top = y;
        adjust = Some(fix_horizontal);
    }
    if edges.bottom {
        rect.bottom = ctx.container.height - y;
        adjust = Some(fix_horizontal);
    }

    Proposal { rect, adjust }
}

/// Resize and pan the frame by how the two-finger box changed.
///
/// Half of each size change goes to each edge; the centre movement shifts
/// the whole frame. The axis that changed more is treated as primary and
/// the other axis is corrected against it.
fn pinch_proposal(
    last: Point,
    anchor: Point,
    t1: Point,
    t2: Point,
    ctx: &ReconcileContext,
) -> Proposal {
    let old_dx = (last.x - anchor.x).abs();
    let old_dy = (last.y - anchor.y).abs();
    let new_dx = (t2.x - t1.x).abs();
    let new_dy = (t2.y - t1.y).abs();

    let width_change = new_dx - old_dx;
    let height_change = new_dy - old_dy;

    let old_center = Point::new(
        anchor.x.min(last.x) + old_dx / 2.0,
        anchor.y.min(last.y) + old_dy / 2.0,
    );
    let new_center = Point::new(
        t1.x.min(t2.x) + new_dx / 2.0,
        t1.y.min(t2.y) + new_dy / 2.0,
    );
    let move_x = new_center.x - old_center.x;
    let move_y = new_center.y - old_center.y;

    let frame = ctx.frame;
    let rect = InsetRect::new(
        frame.top - (height_change / 2.0 - move_y),
        frame.left - (width_change / 2.0 - move_x),
        frame.bottom - (height_change / 2.0 + move_y),
        frame.right - (width_change / 2.0 + move_x),
    );

    let adjust = if width_change.abs() > height_change.abs() {
        AspectAdjust::Vertical
    } else {
        AspectAdjust::Horizontal
    };

    Proposal {
        rect,
        adjust: Some(adjust),
    }
}
