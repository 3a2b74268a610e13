//! Coalescing of resize storms into at most one recomputation per frame.
//!
//! The scheduler is independent of any timing primitive: the host's
//! [`FrameClock`] hands out tokens (the browser's `requestAnimationFrame`
//! ids) and later reports which token fired.

use serde::{Deserialize, Serialize};

/// Identifier of a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameToken(pub i32);

/// Source of animation-frame callbacks.
pub trait FrameClock {
    /// Ask for a callback on the next frame.
    fn request_frame(&mut self) -> FrameToken;

    /// Withdraw a request that has not fired yet.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Keeps at most one frame request outstanding.
///
/// Scheduling again before the pending frame fires cancels the pending
/// request and replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoalescingScheduler {
    pending: Option<FrameToken>,
}

impl CoalescingScheduler {
    /// Create an idle scheduler.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Request a frame, replacing any pending request.
    pub fn schedule<C: FrameClock + ?Sized>(&mut self, clock: &mut C) -> FrameToken {
        if let Some(stale) = self.pending.take() {
            clock.cancel_frame(stale);
            tracing::trace!(?stale, "Replaced pending frame request");
        }
        let token = clock.request_frame();
        self.pending = Some(token);
        token
    }

    /// Called when `token` fires. Returns `true` if it is the live request,
    /// which is then consumed; stale tokens return `false`.
    pub fn fire(&mut self, token: FrameToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Cancel the pending request, if any.
    pub fn cancel<C: FrameClock + ?Sized>(&mut self, clock: &mut C) {
        if let Some(token) = self.pending.take() {
            clock.cancel_frame(token);
        }
    }

    /// The outstanding request.
    #[must_use]
    pub const fn pending(&self) -> Option<FrameToken> {
        self.pending
    }
}
