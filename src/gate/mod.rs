//! Submission gate.
//!
//! DESIGN
//! ======
//! The gate intercepts a form submission, swaps the form for the loader and
//! re-submits the form natively once a fixed delay has elapsed, so the
//! loader is on screen before the browser navigates away. The same element
//! identifiers and delay drive both this native model and the script the
//! server ships to browsers (see [`script`]).
//!
//! Elements are reached either by identifier through a [`Document`] or as
//! explicit [`GateElements`] handles. Lookup is lazy: each element is
//! resolved right before it is mutated, so a missing element aborts the gate
//! with earlier mutations still applied and nothing scheduled.
//!
//! CONCURRENCY
//! ===========
//! `fire` runs to completion without suspending. The deferred submission is a
//! spawned tokio task sleeping on a deadline fixed at call time, so callers
//! must be inside a tokio runtime. There is no cancellation path. A gate moves
//! `Idle -> Pending` once and never back; a second call while `Pending`
//! re-applies the visibility swap but does not schedule another submission.

pub mod script;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info};

/// Delay between intercepting a submission and re-submitting the form.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(2000);

pub const FORM_ID: &str = "analyzeForm";
pub const LOADER_ID: &str = "loader";
pub const CONTAINER_ID: &str = "main-container";

// =============================================================================
// UI SEAMS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    /// CSS `display` value used by the browser rendition.
    #[must_use]
    pub fn css_display(self) -> &'static str {
        match self {
            Self::Visible => "block",
            Self::Hidden => "none",
        }
    }
}

/// A UI node whose visibility the gate toggles.
pub trait UiElement: Send + Sync {
    fn set_visibility(&self, visibility: Visibility);
}

/// A form that can be submitted natively, bypassing its submit handler.
pub trait FormElement: UiElement {
    fn submit(&self);
}

/// Identifier lookup over an externally owned UI tree.
pub trait Document {
    fn form(&self, id: &str) -> Option<Arc<dyn FormElement>>;
    fn element(&self, id: &str) -> Option<Arc<dyn UiElement>>;
}

/// Explicit handles for the three elements the gate mutates.
#[derive(Clone)]
pub struct GateElements {
    pub form: Arc<dyn FormElement>,
    pub loader: Arc<dyn UiElement>,
    pub container: Arc<dyn UiElement>,
}

// =============================================================================
// ERROR / CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("missing UI element: #{0}")]
    MissingElement(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub form_id: String,
    pub loader_id: String,
    pub container_id: String,
    pub delay: Duration,
}

impl GateConfig {
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay, ..Self::default() }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            form_id: FORM_ID.to_owned(),
            loader_id: LOADER_ID.to_owned(),
            container_id: CONTAINER_ID.to_owned(),
            delay: SUBMIT_DELAY,
        }
    }
}

// =============================================================================
// GATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Pending,
}

pub struct SubmissionGate {
    config: GateConfig,
    pending: AtomicBool,
}

impl SubmissionGate {
    #[must_use]
    pub fn new(config: GateConfig) -> Self {
        Self { config, pending: AtomicBool::new(false) }
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        if self.pending.load(Ordering::Acquire) { GateState::Pending } else { GateState::Idle }
    }

    /// Run the gate against elements looked up by identifier.
    ///
    /// Always returns `Ok(false)`: the caller must suppress its own,
    /// immediate submission.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::MissingElement`] for the first identifier that
    /// does not resolve. Mutations made before the failed lookup remain and
    /// no submission is scheduled.
    pub fn fire(&self, document: &dyn Document) -> Result<bool, GateError> {
        let form = document
            .form(&self.config.form_id)
            .ok_or_else(|| GateError::MissingElement(self.config.form_id.clone()))?;
        form.set_visibility(Visibility::Hidden);

        let loader = document
            .element(&self.config.loader_id)
            .ok_or_else(|| GateError::MissingElement(self.config.loader_id.clone()))?;
        loader.set_visibility(Visibility::Visible);

        let container = document
            .element(&self.config.container_id)
            .ok_or_else(|| GateError::MissingElement(self.config.container_id.clone()))?;
        container.set_visibility(Visibility::Hidden);

        self.schedule_submit(form);
        Ok(false)
    }

    /// Run the gate against explicit element handles. Always returns `false`.
    pub fn fire_with(&self, elements: &GateElements) -> bool {
        elements.form.set_visibility(Visibility::Hidden);
        elements.loader.set_visibility(Visibility::Visible);
        elements.container.set_visibility(Visibility::Hidden);

        self.schedule_submit(Arc::clone(&elements.form));
        false
    }

    fn schedule_submit(&self, form: Arc<dyn FormElement>) {
        if self.pending.swap(true, Ordering::AcqRel) {
            debug!("submission already pending, not scheduling another");
            return;
        }

        // Deadline is fixed here, not when the task is first polled.
        let timer = tokio::time::sleep(self.config.delay);
        let delay_ms = u64::try_from(self.config.delay.as_millis()).unwrap_or(u64::MAX);
        info!(delay_ms, form = %self.config.form_id, "form submission deferred");

        tokio::spawn(async move {
            timer.await;
            debug!("submitting deferred form");
            form.submit();
        });
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
