//! Page transition service handed explicitly to whoever needs to navigate.
//!
//! The controller owns no timers. Hosts call [`TransitionController::poll`]
//! at or after [`TransitionController::next_deadline`] and carry out the
//! returned actions.

use crate::constants::{NAVIGATE_DELAY_MS, SETTLE_DELAY_MS};
use instant::Instant;
use smallvec::SmallVec;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionAction {
    /// Route push is due.
    Push(String),
    /// Loader should be hidden.
    Settled,
}

#[derive(Clone, Debug)]
pub struct TransitionController {
    path: String,
    transitioning: bool,
    push: Option<(Instant, String)>,
    settle_at: Option<Instant>,
}

impl TransitionController {
    pub fn new(current_path: impl Into<String>) -> Self {
        Self {
            path: current_path.into(),
            transitioning: false,
            push: None,
            settle_at: None,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn current_path(&self) -> &str {
        &self.path
    }

    /// Start a transition to `href`. Only same-origin absolute paths that
    /// differ from the current one are accepted.
    pub fn navigate(&mut self, href: &str, now: Instant) -> bool {
        if !href.starts_with('/') || href == self.path {
            return false;
        }
        self.cancel();
        self.transitioning = true;
        self.push = Some((now + Duration::from_millis(NAVIGATE_DELAY_MS), href.to_string()));
        self.settle_at = Some(now + Duration::from_millis(SETTLE_DELAY_MS));
        log::info!("[transition] {} -> {}", self.path, href);
        true
    }

    /// The router landed on `path`; an active transition settles a full
    /// settle delay after this.
    pub fn path_changed(&mut self, path: impl Into<String>, now: Instant) {
        let path = path.into();
        if path == self.path {
            return;
        }
        self.path = path;
        if self.transitioning {
            self.settle_at = Some(now + Duration::from_millis(SETTLE_DELAY_MS));
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        let push = self.push.as_ref().map(|(at, _)| *at);
        match (push, self.settle_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fire every deadline at or before `now`.
    pub fn poll(&mut self, now: Instant) -> SmallVec<[TransitionAction; 2]> {
        let mut out = SmallVec::new();
        if matches!(&self.push, Some((at, _)) if *at <= now) {
            if let Some((_, href)) = self.push.take() {
                out.push(TransitionAction::Push(href));
            }
        }
        if matches!(self.settle_at, Some(at) if at <= now) {
            self.settle_at = None;
            self.transitioning = false;
            out.push(TransitionAction::Settled);
        }
        out
    }

    /// Drop pending deadlines (host teardown or a newer navigation).
    pub fn cancel(&mut self) {
        self.push = None;
        self.settle_at = None;
    }
}
