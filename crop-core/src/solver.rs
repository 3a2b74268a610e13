//! Constraint solver: turns a proposed frame into a valid one.
//!
//! Every frame change goes through [`ConstraintSolver::solve`], which runs
//! three rules in order:
//!
//! 1. aspect correction, when a ratio is locked and the caller names the
//!    edges that absorb the correction;
//! 2. rejection of negative, oversized or non-finite proposals, which
//!    restores the previous frame untouched;
//! 3. clamping into the bounds by translation, never by resizing.

use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::geometry::{InsetRect, Size};

/// Which edges absorb an aspect-ratio correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectAdjust {
    /// Shrink whichever dimension is in excess.
    Shrink,
    /// Split the height correction between top and bottom.
    Vertical,
    /// Split the width correction between left and right.
    Horizontal,
    /// Apply the whole width correction to the left edge.
    Left,
    /// Apply the whole width correction to the right edge.
    Right,
    /// Apply the whole height correction to the top edge.
    Top,
    /// Apply the whole height correction to the bottom edge.
    Bottom,
}

/// Result of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    /// The (corrected, clamped) proposal was committed.
    Committed,
    /// The proposal was invalid; the previous frame stays in place.
    RolledBack,
}

/// The committed frame plus the frame it replaced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    current: InsetRect,
    previous: InsetRect,
}

impl FrameState {
    /// Start with `rect` as both the current and previous frame.
    #[must_use]
    pub const fn new(rect: InsetRect) -> Self {
        Self {
            current: rect,
            previous: rect,
        }
    }

    /// The committed frame.
    #[must_use]
    pub const fn current(&self) -> InsetRect {
        self.current
    }

    /// Whether the last solve changed the frame.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.current != self.previous
    }

    fn commit(&mut self, rect: InsetRect) {
        self.previous = self.current;
        self.current = rect;
    }
}

/// Applies aspect, size and bounds rules to proposed frames.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConstraintSolver {
    aspect: Option<f64>,
}

impl ConstraintSolver {
    /// Create a solver, optionally locked to a width/height ratio.
    #[must_use]
    pub const fn new(aspect: Option<f64>) -> Self {
        Self { aspect }
    }

    /// The locked aspect ratio, if any.
    #[must_use]
    pub const fn aspect(&self) -> Option<f64> {
        self.aspect
    }

    /// Correct, check and clamp `proposed`, then commit it into `state`.
    pub fn solve(
        &self,
        state: &mut FrameState,
        proposed: InsetRect,
        adjust: Option<AspectAdjust>,
        container: Size,
        bounds: &Bounds,
    ) -> SolveOutcome {
        let mut rect = match (self.aspect, adjust) {
            (Some(aspect), Some(adjust)) => correct_aspect(proposed, adjust, aspect, container),
            _ => proposed,
        };

        let outcome = if fits(&rect, container, bounds) {
            SolveOutcome::Committed
        } else {
            tracing::debug!(
                ?rect,
                width = rect.width(container),
                height = rect.height(container),
                "Rejected frame proposal, keeping previous frame"
            );
            rect = state.current();
            SolveOutcome::RolledBack
        };

        clamp_into(&mut rect, bounds);
        state.commit(rect);
        tracing::trace!(?rect, ?outcome, "Frame solved");
        outcome
    }
}

/// Move the named edges so the frame matches `aspect` (width / height).
#[must_use]
pub fn correct_aspect(
    mut rect: InsetRect,
    adjust: AspectAdjust,
    aspect: f64,
    container: Size,
) -> InsetRect {
    let width = rect.width(container);
    let height = rect.height(container);
    let adjust_height = width / aspect - height;
    let adjust_width = height * aspect - width;

    let split_vertical = |rect: &mut InsetRect| {
        rect.top -= adjust_height / 2.0;
        rect.bottom -= adjust_height / 2.0;
    };
    let split_horizontal = |rect: &mut InsetRect| {
        rect.left -= adjust_width / 2.0;
        rect.right -= adjust_width / 2.0;
    };

    match adjust {
        AspectAdjust::Shrink if adjust_width > 0.0 => split_vertical(&mut rect),
        AspectAdjust::Shrink | AspectAdjust::Horizontal => split_horizontal(&mut rect),
        AspectAdjust::Vertical => split_vertical(&mut rect),
        AspectAdjust::Left => rect.left -= adjust_width,
        AspectAdjust::Right => rect.right -= adjust_width,
        AspectAdjust::Top => rect.top -= adjust_height,
        AspectAdjust::Bottom => rect.bottom -= adjust_height,
    }

    rect
}

/// Relative slack on size limits. Insets are differences of page offsets,
/// so their rounding error scales with the container, not the frame.
const SIZE_TOLERANCE: f64 = 8.0 * f64::EPSILON;

/// Whether `rect` is finite and no larger than the bounds on either axis.
pub(crate) fn fits(rect: &InsetRect, container: Size, bounds: &Bounds) -> bool {
    rect.is_finite()
        && within(rect.width(container), bounds.width, container.width)
        && within(rect.height(container), bounds.height, container.height)
}

fn within(extent: f64, limit: f64, scale: f64) -> bool {
    let slack = (limit.abs() + scale.abs()) * SIZE_TOLERANCE;
    extent >= -slack && extent <= limit + slack
}

/// Translate `rect` back inside `bounds`, one shift per axis.
///
/// The far edge wins when both edges of an axis are out of bounds.
fn clamp_into(rect: &mut InsetRect, bounds: &Bounds) {
    let mut dx = 0.0;
    let mut dy = 0.0;

    if rect.top < bounds.top {
        dy = bounds.top - rect.top;
    }
    if rect.bottom < bounds.bottom {
        dy = rect.bottom - bounds.bottom;
    }
    if rect.left < bounds.left {
        dx = bounds.left - rect.left;
    }
    if rect.right < bounds.right {
        dx = rect.right - bounds.right;
    }

    rect.translate(dx, dy);
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::bounds::ElementGeometry;

    const CONTAINER: Size = Size::new(400.0, 300.0);

    fn full_bounds() -> Bounds {
        Bounds::compute(&ElementGeometry::new(0.0, 0.0, 400.0, 300.0), None)
    }

    fn solve(
        solver: ConstraintSolver,
        state: &mut FrameState,
        proposed: InsetRect,
        adjust: Option<AspectAdjust>,
    ) -> SolveOutcome {
        solver.solve(state, proposed, adjust, CONTAINER, &full_bounds())
    }

    #[test]
    fn valid_proposal_commits_unchanged() {
        let mut state = FrameState::new(InsetRect::uniform(50.0));
        let proposed = InsetRect::new(10.0, 20.0, 30.0, 40.0);
        let outcome = solve(ConstraintSolver::default(), &mut state, proposed, None);
        assert_eq!(outcome, SolveOutcome::Committed);
        assert_eq!(state.current(), proposed);
        assert!(state.changed());
    }

    #[test]
    fn negative_width_rolls_back() {
        let before = InsetRect::uniform(50.0);
        let mut state = FrameState::new(before);
        let outcome = solve(
            ConstraintSolver::default(),
            &mut state,
            InsetRect::new(50.0, 300.0, 50.0, 200.0),
            None,
        );
        assert_eq!(outcome, SolveOutcome::RolledBack);
        assert_eq!(state.current(), before);
        assert!(!state.changed());
    }

    #[test]
    fn oversized_height_rolls_back() {
        let image = ElementGeometry::new(0.0, 50.0, 400.0, 200.0);
        let container = ElementGeometry::new(0.0, 0.0, 400.0, 300.0);
        let bounds = Bounds::compute(&container, Some(&image));
        let before = InsetRect::new(60.0, 10.0, 60.0, 10.0);
        let mut state = FrameState::new(before);

        let outcome = ConstraintSolver::default().solve(
            &mut state,
            InsetRect::new(10.0, 10.0, 10.0, 10.0),
            None,
            CONTAINER,
            &bounds,
        );
        assert_eq!(outcome, SolveOutcome::RolledBack);
        assert_eq!(state.current(), before);
    }

    #[test]
    fn non_finite_proposal_rolls_back() {
        let mut state = FrameState::new(InsetRect::uniform(50.0));
        let outcome = solve(
            ConstraintSolver::default(),
            &mut state,
            InsetRect::new(f64::NAN, 0.0, 0.0, 0.0),
            None,
        );
        assert_eq!(outcome, SolveOutcome::RolledBack);
        assert_eq!(state.current(), InsetRect::uniform(50.0));
    }

    #[test]
    fn out_of_bounds_proposal_is_translated_back() {
        let mut state = FrameState::new(InsetRect::uniform(50.0));
        solve(
            ConstraintSolver::default(),
            &mut state,
            InsetRect::new(-20.0, 120.0, 120.0, -20.0),
            None,
        );
        assert_eq!(state.current(), InsetRect::new(0.0, 100.0, 100.0, 0.0));
    }

    #[test]
    fn bottom_violation_wins_over_top() {
        let image = ElementGeometry::new(0.0, 100.0, 400.0, 100.0);
        let bounds = Bounds::compute(&ElementGeometry::new(0.0, 0.0, 400.0, 300.0), Some(&image));
        let mut rect = InsetRect::new(90.0, 0.0, 90.0, 0.0);
        clamp_into(&mut rect, &bounds);
        assert_eq!(rect, InsetRect::new(80.0, 0.0, 100.0, 0.0));
    }

    #[test]
    fn rounding_excess_still_commits() {
        let mut state = FrameState::new(InsetRect::uniform(50.0));
        let excess = 300.0 * f64::EPSILON;
        let outcome = solve(
            ConstraintSolver::default(),
            &mut state,
            InsetRect::new(0.0, 0.0, -excess, 0.0),
            None,
        );
        assert_eq!(outcome, SolveOutcome::Committed);
        assert!((state.current().height(CONTAINER) - 300.0).abs() < 1e-9);
        assert_eq!(state.current().bottom, 0.0);
    }

    #[test]
    fn one_pixel_too_tall_rolls_back() {
        let mut state = FrameState::new(InsetRect::uniform(50.0));
        let outcome = solve(
            ConstraintSolver::default(),
            &mut state,
            InsetRect::new(0.0, 0.0, -1.0, 0.0),
            None,
        );
        assert_eq!(outcome, SolveOutcome::RolledBack);
        assert_eq!(state.current(), InsetRect::uniform(50.0));
    }

    #[test]
    fn shrink_picks_the_excess_dimension() {
        let wide = InsetRect::new(50.0, 50.0, 50.0, 50.0);
        let square = correct_aspect(wide, AspectAdjust::Shrink, 1.0, CONTAINER);
        assert_eq!(square, InsetRect::new(50.0, 100.0, 50.0, 100.0));

        let tall = InsetRect::new(0.0, 150.0, 0.0, 150.0);
        let square = correct_aspect(tall, AspectAdjust::Shrink, 1.0, CONTAINER);
        assert_eq!(square, InsetRect::new(100.0, 150.0, 100.0, 150.0));
    }

    #[test]
    fn single_edge_modes_move_one_edge() {
        let rect = InsetRect::new(50.0, 50.0, 50.0, 50.0);
        let fixed = correct_aspect(rect, AspectAdjust::Right, 1.0, CONTAINER);
        assert_eq!(fixed, InsetRect::new(50.0, 50.0, 50.0, 150.0));

        let fixed = correct_aspect(rect, AspectAdjust::Top, 1.0, CONTAINER);
        assert_eq!(fixed, InsetRect::new(-50.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn aspect_is_ignored_without_mode() {
        let mut state = FrameState::new(InsetRect::uniform(50.0));
        solve(
            ConstraintSolver::new(Some(1.0)),
            &mut state,
            InsetRect::uniform(40.0),
            None,
        );
        assert_eq!(state.current(), InsetRect::uniform(40.0));
    }

    #[test]
    fn widening_a_square_grows_height_on_both_sides() {
        let container = Size::new(600.0, 600.0);
        let bounds = Bounds::compute(&ElementGeometry::new(0.0, 0.0, 600.0, 600.0), None);
        let mut state = FrameState::new(InsetRect::uniform(150.0));

        ConstraintSolver::new(Some(1.0)).solve(
            &mut state,
            InsetRect::new(150.0, 150.0, 150.0, 100.0),
            Some(AspectAdjust::Vertical),
            container,
            &bounds,
        );

        let rect = state.current();
        assert_eq!(rect, InsetRect::new(125.0, 150.0, 125.0, 100.0));
        assert_eq!(rect.width(container), 350.0);
        assert_eq!(rect.height(container), 350.0);
    }
}
