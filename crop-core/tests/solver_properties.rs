//! Property tests for the constraint solver.
//!
//! Whatever is proposed, a committed frame fits inside the bounds, solving
//! it again changes nothing, rejected proposals leave no trace and an
//! aspect lock survives any sequence of handle drags.

use crop_core::{
    AspectAdjust, Bounds, ConstraintSolver, CropOptions, CropWidget, ElementGeometry, FrameState,
    Handle, InputEvent, InsetRect, RecordingHost, SolveOutcome,
};
use proptest::prelude::*;

const EPSILON: f64 = 1e-6;

/// A container with an image somewhere inside it, on whole pixels.
fn arb_scene() -> impl Strategy<Value = (ElementGeometry, ElementGeometry)> {
    (100u32..1000, 100u32..1000)
        .prop_flat_map(|(cw, ch)| (Just(cw), Just(ch), 10..=cw, 10..=ch))
        .prop_flat_map(|(cw, ch, iw, ih)| {
            (
                Just(cw),
                Just(ch),
                Just(iw),
                Just(ih),
                0..=cw - iw,
                0..=ch - ih,
            )
        })
        .prop_map(|(cw, ch, iw, ih, x, y)| {
            (
                ElementGeometry::new(0.0, 0.0, f64::from(cw), f64::from(ch)),
                ElementGeometry::new(f64::from(x), f64::from(y), f64::from(iw), f64::from(ih)),
            )
        })
}

/// A container with an image inside it, on fractional page coordinates.
fn arb_fractional_scene() -> impl Strategy<Value = (ElementGeometry, ElementGeometry)> {
    (
        50.0f64..1000.0,
        50.0f64..1000.0,
        0.1f64..=1.0,
        0.1f64..=1.0,
        0.0f64..=1.0,
        0.0f64..=1.0,
    )
        .prop_map(|(cw, ch, fw, fh, fx, fy)| {
            let (iw, ih) = (cw * fw, ch * fh);
            (
                ElementGeometry::new(0.0, 0.0, cw, ch),
                ElementGeometry::new((cw - iw) * fx, (ch - ih) * fy, iw, ih),
            )
        })
}

/// Any whole-pixel proposal, including negative and oversized ones.
fn arb_rect() -> impl Strategy<Value = InsetRect> {
    (-300i32..1300, -300i32..1300, -300i32..1300, -300i32..1300).prop_map(|(t, l, b, r)| {
        InsetRect::new(f64::from(t), f64::from(l), f64::from(b), f64::from(r))
    })
}

fn arb_adjust() -> impl Strategy<Value = Option<AspectAdjust>> {
    prop::option::of(prop::sample::select(vec![
        AspectAdjust::Shrink,
        AspectAdjust::Vertical,
        AspectAdjust::Horizontal,
        AspectAdjust::Left,
        AspectAdjust::Right,
        AspectAdjust::Top,
        AspectAdjust::Bottom,
    ]))
}

proptest! {
    #[test]
    fn prop_commits_stay_inside_bounds(
        (container, image) in arb_scene(),
        aspect in prop::option::of(0.25f64..4.0),
        steps in prop::collection::vec((arb_rect(), arb_adjust()), 1..20)
    ) {
        let bounds = Bounds::compute(&container, Some(&image));
        let size = container.size();
        let solver = ConstraintSolver::new(aspect);
        let mut state = FrameState::new(bounds.as_rect());

        for (proposed, adjust) in steps {
            solver.solve(&mut state, proposed, adjust, size, &bounds);
            let rect = state.current();
            let width = rect.width(size);
            let height = rect.height(size);

            prop_assert!(width >= -EPSILON && width <= bounds.width + EPSILON,
                "width {} outside 0..={}", width, bounds.width);
            prop_assert!(height >= -EPSILON && height <= bounds.height + EPSILON,
                "height {} outside 0..={}", height, bounds.height);
            prop_assert!(rect.top >= bounds.top - EPSILON, "top {:?} above {:?}", rect, bounds);
            prop_assert!(rect.left >= bounds.left - EPSILON, "left {:?} past {:?}", rect, bounds);
            prop_assert!(rect.bottom >= bounds.bottom - EPSILON,
                "bottom {:?} below {:?}", rect, bounds);
            prop_assert!(rect.right >= bounds.right - EPSILON,
                "right {:?} past {:?}", rect, bounds);
        }
    }

    #[test]
    fn prop_solving_committed_frame_is_identity(
        (container, image) in arb_scene(),
        proposed in arb_rect()
    ) {
        let bounds = Bounds::compute(&container, Some(&image));
        let size = container.size();
        let solver = ConstraintSolver::default();
        let mut state = FrameState::new(bounds.as_rect());

        solver.solve(&mut state, proposed, None, size, &bounds);
        let committed = state.current();

        let outcome = solver.solve(&mut state, committed, None, size, &bounds);
        prop_assert_eq!(outcome, SolveOutcome::Committed);
        prop_assert_eq!(state.current(), committed);
        prop_assert!(!state.changed());
    }

    #[test]
    fn prop_rejected_proposal_restores_previous_bits(
        (container, image) in arb_scene(),
        proposed in arb_rect(),
        overlap in 1i32..500
    ) {
        let bounds = Bounds::compute(&container, Some(&image));
        let size = container.size();
        let solver = ConstraintSolver::default();
        let mut state = FrameState::new(bounds.as_rect());
        solver.solve(&mut state, proposed, None, size, &bounds);
        let before = state.current();

        // left + right exceeds the container width, so the width is negative
        let inverted = InsetRect::new(
            before.top,
            size.width - before.right + f64::from(overlap),
            before.bottom,
            before.right,
        );
        let outcome = solver.solve(&mut state, inverted, None, size, &bounds);

        prop_assert_eq!(outcome, SolveOutcome::RolledBack);
        let after = state.current();
        prop_assert_eq!(after.top.to_bits(), before.top.to_bits());
        prop_assert_eq!(after.left.to_bits(), before.left.to_bits());
        prop_assert_eq!(after.bottom.to_bits(), before.bottom.to_bits());
        prop_assert_eq!(after.right.to_bits(), before.right.to_bits());
    }

    #[test]
    fn prop_handle_drags_keep_aspect(
        (container, image) in arb_scene(),
        aspect in 0.25f64..4.0,
        drags in prop::collection::vec((0usize..8, -100.0f64..1100.0, -100.0f64..1100.0), 1..12)
    ) {
        let bounds = Bounds::compute(&container, Some(&image));
        let options = CropOptions::default()
            .with_initial(bounds.centered_aspect_rect(aspect))
            .with_aspect(aspect);
        let host = RecordingHost::new(container).with_image(image);
        let mut widget = CropWidget::new(host, options).expect("valid options");

        for (index, x, y) in drags {
            let handle = Handle::from_index(index).expect("index below 8");
            widget.handle_event(&InputEvent::press_handle(0.0, 0.0, handle));
            widget.handle_event(&InputEvent::move_to(x, y));
            widget.handle_event(&InputEvent::release(x, y));

            let change = widget.frame_change();
            if change.height > 1e-3 {
                let ratio = change.width / change.height;
                prop_assert!((ratio - aspect).abs() <= EPSILON * aspect.max(1.0),
                    "ratio {} drifted from {} after dragging {:?}", ratio, aspect, handle);
            }
        }
    }

    #[test]
    fn prop_deferred_frame_is_centred_aspect_rect(
        (container, image) in arb_fractional_scene(),
        aspect in 0.2f64..5.0
    ) {
        let options = CropOptions::default()
            .with_aspect(aspect)
            .with_no_initial_bounds(true);
        let host = RecordingHost::new(container).with_image(image);
        let mut widget = CropWidget::new(host, options).expect("valid options");

        widget.on_bounds_changed();

        let expected = widget.bounds().centered_aspect_rect(aspect);
        let change = widget.frame_change();
        prop_assert!(change.width >= 0.0 && change.height >= 0.0,
            "negative frame {:?}", change);
        let edges = [
            (change.top, expected.top),
            (change.left, expected.left),
            (change.bottom, expected.bottom),
            (change.right, expected.right),
        ];
        for (actual, wanted) in edges {
            prop_assert!((actual - wanted).abs() <= EPSILON, "{:?} vs {:?}", change, expected);
        }
    }
}
