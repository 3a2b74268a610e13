//! The crop widget: one owned instance per cropped image.
//!
//! `CropWidget` owns the committed frame, the bounds and the interaction
//! session, and drives them from three sources: input events, bounds
//! changes (immediate, for DOM mutations) and viewport resizes (coalesced
//! to one recomputation per animation frame). Every commit writes the frame
//! style through the host and marks a notification pending; pending
//! notifications are delivered once, when the public operation returns.

use std::fmt;

use crate::bounds::Bounds;
use crate::config::CropOptions;
use crate::error::CropResult;
use crate::event::InputEvent;
use crate::geometry::{FrameChange, InsetRect, Size};
use crate::host::CropHost;
use crate::input::{InputReconciler, Interaction, Reaction, ReconcileContext};
use crate::scheduler::{CoalescingScheduler, FrameToken};
use crate::solver::{self, AspectAdjust, ConstraintSolver, FrameState, SolveOutcome};
use crate::style::{ChromeStyle, FrameStyle};

/// Callback receiving frame-change notifications.
pub type FrameObserver = Box<dyn FnMut(&FrameChange)>;

/// Interactive crop frame over an image.
pub struct CropWidget<H: CropHost> {
    host: H,
    options: CropOptions,
    solver: ConstraintSolver,
    frame: FrameState,
    bounds: Bounds,
    container: Size,
    /// Set while construction-time geometry is untrusted; cleared for good
    /// by the first explicit user action.
    derive_from_bounds: bool,
    input: InputReconciler,
    scheduler: CoalescingScheduler,
    observer: Option<FrameObserver>,
    notify_pending: bool,
    removed: bool,
}

impl<H: CropHost> CropWidget<H> {
    /// Create a widget without an observer.
    ///
    /// # Errors
    ///
    /// Returns an error if the options fail validation.
    pub fn new(host: H, options: CropOptions) -> CropResult<Self> {
        Self::build(host, options, None)
    }

    /// Create a widget that reports frame changes to `observer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the options fail validation.
    pub fn with_observer(
        host: H,
        options: CropOptions,
        observer: impl FnMut(&FrameChange) + 'static,
    ) -> CropResult<Self> {
        Self::build(host, options, Some(Box::new(observer)))
    }

    fn build(host: H, options: CropOptions, observer: Option<FrameObserver>) -> CropResult<Self> {
        options.validate()?;

        let geometry = host.container();
        let bounds = Bounds::compute(&geometry, host.image().as_ref());
        let container = geometry.size();
        let initial = options.initial_rect();

        let mut widget = Self {
            host,
            solver: ConstraintSolver::new(options.force_aspect),
            frame: FrameState::new(initial),
            bounds,
            container,
            derive_from_bounds: options.no_initial_bounds,
            input: InputReconciler::new(options.no_touch_scroll),
            scheduler: CoalescingScheduler::new(),
            observer,
            notify_pending: false,
            removed: false,
            options,
        };

        widget
            .host
            .apply_chrome_style(&ChromeStyle::for_container(container));
        widget.move_frame(initial, Some(AspectAdjust::Shrink), false);

        tracing::info!(
            width = container.width,
            height = container.height,
            shape = ?widget.options.resolved_shape(),
            aspect = ?widget.options.force_aspect,
            deferred = widget.derive_from_bounds,
            "Crop widget attached"
        );

        widget.notify_pending = true;
        widget.flush();
        Ok(widget)
    }

    /// Options the widget was built with.
    #[must_use]
    pub const fn options(&self) -> &CropOptions {
        &self.options
    }

    /// Current bounds.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// The committed frame.
    #[must_use]
    pub const fn frame(&self) -> InsetRect {
        self.frame.current()
    }

    /// The committed frame with its derived size.
    #[must_use]
    pub fn frame_change(&self) -> FrameChange {
        FrameChange::new(self.frame.current(), self.container)
    }

    /// Container size the frame is measured against.
    #[must_use]
    pub const fn container_size(&self) -> Size {
        self.container
    }

    /// The active interaction session.
    #[must_use]
    pub const fn interaction(&self) -> &Interaction {
        self.input.session()
    }

    /// Whether the frame is still derived from the bounds on every change.
    #[must_use]
    pub const fn derives_from_bounds(&self) -> bool {
        self.derive_from_bounds
    }

    /// The outstanding resize frame request.
    #[must_use]
    pub const fn pending_frame(&self) -> Option<FrameToken> {
        self.scheduler.pending()
    }

    /// Whether [`remove`](Self::remove) has run.
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        self.removed
    }

    /// The host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Propose a frame directly.
    ///
    /// An `explicit` proposal counts as a user action and stops automatic
    /// re-derivation of the frame. After removal nothing is committed and
    /// the result is [`SolveOutcome::RolledBack`].
    pub fn solve(
        &mut self,
        proposed: InsetRect,
        adjust: Option<AspectAdjust>,
        explicit: bool,
    ) -> SolveOutcome {
        if self.removed {
            return SolveOutcome::RolledBack;
        }
        let outcome = self.move_frame(proposed, adjust, explicit);
        self.flush();
        outcome
    }

    /// Feed a pointer or touch event.
    ///
    /// Returns `true` when the host should suppress the event's default
    /// action.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if self.removed {
            return false;
        }

        let ctx = ReconcileContext {
            frame: self.frame.current(),
            container_offset: self.host.container().offset(),
            container: self.container,
        };

        let reaction = self.input.handle(event, &ctx);
        match reaction {
            Reaction::Propose(proposal) => {
                self.move_frame(proposal.rect, proposal.adjust, true);
            }
            Reaction::Released => self.notify_pending = true,
            Reaction::Began | Reaction::Ignored => {}
        }

        self.flush();
        reaction.consumes_event()
    }

    /// Re-read geometry and carry the frame over to the new bounds.
    ///
    /// The frame keeps its position relative to the image, scaled per axis.
    /// While the derive flag is set, or when the previous bounds had no area,
    /// a fresh frame is derived from the bounds instead.
    pub fn on_bounds_changed(&mut self) {
        if self.removed {
            return;
        }

        let geometry = self.host.container();
        let previous = self.bounds;
        self.bounds = Bounds::compute(&geometry, self.host.image().as_ref());
        self.container = geometry.size();

        let rescaled = if previous.is_degenerate() {
            tracing::debug!(?previous, "Previous bounds had no area, deriving frame");
            None
        } else {
            self.bounds.rescale(&previous, self.frame.current())
        };
        let proposed = match rescaled {
            Some(rect) if !self.derive_from_bounds => rect,
            _ => self.derived_frame(),
        };

        self.move_frame(proposed, None, false);
        self.host
            .apply_chrome_style(&ChromeStyle::for_container(self.container));

        tracing::debug!(
            width = self.container.width,
            height = self.container.height,
            frame = ?self.frame.current(),
            "Bounds changed"
        );

        self.notify_pending = true;
        self.flush();
    }

    /// The viewport resized; schedule one bounds recomputation.
    ///
    /// Returns the token the host must hand to
    /// [`animation_frame`](Self::animation_frame), or `None` after removal.
    pub fn browser_resized(&mut self) -> Option<FrameToken> {
        if self.removed {
            return None;
        }
        Some(self.scheduler.schedule(&mut self.host))
    }

    /// An animation frame fired. Returns `true` if it was the pending resize
    /// request and the bounds were recomputed.
    pub fn animation_frame(&mut self, token: FrameToken) -> bool {
        if self.removed || !self.scheduler.fire(token) {
            tracing::trace!(?token, "Ignoring stale frame");
            return false;
        }
        self.on_bounds_changed();
        true
    }

    /// Tear the widget down. Safe to call more than once.
    pub fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.scheduler.cancel(&mut self.host);
        self.input.reset();
        self.observer = None;
        self.notify_pending = false;
        self.removed = true;
        tracing::info!("Crop widget removed");
    }

    fn derived_frame(&self) -> InsetRect {
        match self.solver.aspect() {
            Some(aspect) => self.bounds.centered_aspect_rect(aspect),
            None => self.bounds.as_rect(),
        }
    }

    fn move_frame(
        &mut self,
        proposed: InsetRect,
        adjust: Option<AspectAdjust>,
        explicit: bool,
    ) -> SolveOutcome {
        if explicit && self.derive_from_bounds {
            self.derive_from_bounds = false;
            tracing::debug!("Frame positioned by user, no longer derived from bounds");
        }

        let outcome = self.solver.solve(
            &mut self.frame,
            proposed,
            adjust,
            self.container,
            &self.bounds,
        );

        // The construction frame is never validated, so a rollback can land
        // on a frame that does not fit.
        if outcome == SolveOutcome::RolledBack
            && !solver::fits(&self.frame.current(), self.container, &self.bounds)
        {
            let derived = self.derived_frame();
            tracing::debug!(?derived, "Rolled-back frame does not fit, deriving from bounds");
            self.solver
                .solve(&mut self.frame, derived, None, self.container, &self.bounds);
        }

        self.host
            .apply_frame_style(&FrameStyle::for_frame(self.frame.current(), self.container));

        if outcome == SolveOutcome::Committed || self.frame.changed() {
            self.notify_pending = true;
        }
        outcome
    }

    fn flush(&mut self) {
        if !std::mem::take(&mut self.notify_pending) {
            return;
        }
        let change = self.frame_change();
        if let Some(observer) = self.observer.as_mut() {
            observer(&change);
        }
    }
}

impl<H: CropHost + fmt::Debug> fmt::Debug for CropWidget<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropWidget")
            .field("host", &self.host)
            .field("frame", &self.frame)
            .field("bounds", &self.bounds)
            .field("container", &self.container)
            .field("interaction", self.input.session())
            .field("removed", &self.removed)
            .finish_non_exhaustive()
    }
}
