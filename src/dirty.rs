//! # Unsaved Changes Tracking
//!
//! Flags unsaved edits to a form and gates navigation away from it. This is
//! a best-effort UX guard, not a data-integrity mechanism: it has no bearing
//! on collaborator-side consistency.

/// Tracks whether a form has unsaved edits. The flag is explicit state owned
/// by the tracker, exposed via an accessor; it starts clear, is set by any
/// tracked input mutation and cleared by a form submission.
#[derive(Clone, Debug, Default)]
pub struct DirtyFormTracker {
    dirty: bool,
}

impl DirtyFormTracker {
    /// Create a tracker with a clear flag.
    #[must_use]
    pub const fn new() -> Self {
        Self { dirty: false }
    }

    /// Record a mutation of a tracked input (text, checkbox or radio).
    pub fn field_changed(&mut self) {
        self.dirty = true;
    }

    /// Record a form submission.
    pub fn form_submitted(&mut self) {
        self.dirty = false;
    }

    /// Whether the form has unsaved edits.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Navigation-interception hook. Owns no state: the tracker is injected so
/// the decision is testable without ambient globals.
#[derive(Clone, Copy, Debug, Default)]
pub struct NavigationGuard;

impl NavigationGuard {
    /// Whether the host must prompt the user before navigating away. When
    /// the flag is clear, navigation proceeds silently.
    #[must_use]
    pub const fn should_intercept(tracker: &DirtyFormTracker) -> bool {
        tracker.is_dirty()
    }
}
