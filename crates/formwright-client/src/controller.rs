//! Form state controller.
//!
//! A synchronous state machine that owns the form values, the per-field
//! errors, the selected category and the three schema load states. User
//! actions go through the `select_category` / `change_field` / `submit` /
//! `cancel` handlers; work that needs I/O or time is queued as [`Effect`]s and
//! its outcome is fed back through the `apply_*` methods.
//!
//! Every effect that can go stale carries a [`Ticket`]. A completion whose
//! ticket is no longer the live one is discarded, which is how a late
//! category-field response for a deselected category is kept out of the
//! registry.

use std::fmt;
use std::mem;
use std::time::Duration;

use formwright_core::validation::{missing_required, validate};
use formwright_core::{
    Category, CategoryId, FieldDescriptor, FieldErrors, FieldRegistry, FormValues, LoadState,
};
use tracing::{debug, info, warn};

use crate::config::DEFAULT_SUCCESS_DISPLAY;
use crate::error::{ControllerError, SubmissionError};
use crate::gateway::SubmissionReceipt;

/// Result type alias for controller handlers.
pub type Result<T> = std::result::Result<T, ControllerError>;

/// Tag identifying one issued request or timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle phase of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Schemas have not been requested.
    Idle,
    /// Basic fields or categories are still loading.
    LoadingSchemas,
    /// The form can be edited and submitted.
    Ready,
    /// A submission is in flight.
    Submitting,
    /// The last submission succeeded; the success indicator is showing.
    SubmitSucceeded,
    /// The last submission failed; the entered data is kept.
    SubmitFailed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::LoadingSchemas => "loading schemas",
            Self::Ready => "ready",
            Self::Submitting => "submitting",
            Self::SubmitSucceeded => "submit succeeded",
            Self::SubmitFailed => "submit failed",
        })
    }
}

/// Work requested by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the basic-field schema.
    LoadBasicFields,
    /// Fetch the category catalog.
    LoadCategories,
    /// Fetch the fields of `category`.
    LoadCategoryFields { ticket: Ticket, category: CategoryId },
    /// Send `values` to the submission gateway.
    Submit { ticket: Ticket, values: FormValues },
    /// Hide the success indicator after `after`.
    ClearSuccess { ticket: Ticket, after: Duration },
}

/// Outcome of feeding a completion back into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The completion updated the form.
    Applied,
    /// The completion was for a superseded request and was ignored.
    Stale,
}

/// The form state machine.
#[derive(Debug)]
pub struct FormController {
    phase: Phase,
    basic_fields: LoadState<Vec<FieldDescriptor>>,
    categories: LoadState<Vec<Category>>,
    category_fields: LoadState<Vec<FieldDescriptor>>,
    registry: FieldRegistry,
    selected: Option<CategoryId>,
    values: FormValues,
    errors: FieldErrors,
    last_ticket: u64,
    category_request: Option<Ticket>,
    submission: Option<Ticket>,
    success_timer: Option<Ticket>,
    submit_failure: Option<String>,
    last_receipt: Option<SubmissionReceipt>,
    success_display: Duration,
    effects: Vec<Effect>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_DISPLAY)
    }
}

impl FormController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(success_display: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            basic_fields: LoadState::Loading,
            categories: LoadState::Loading,
            category_fields: LoadState::Loaded(Vec::new()),
            registry: FieldRegistry::new(),
            selected: None,
            values: FormValues::new(),
            errors: FieldErrors::new(),
            last_ticket: 0,
            category_request: None,
            submission: None,
            success_timer: None,
            submit_failure: None,
            last_receipt: None,
            success_display,
            effects: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the merged basic + category fields, in display order.
    #[must_use]
    pub const fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Returns the basic-field load state.
    #[must_use]
    pub const fn basic_fields(&self) -> &LoadState<Vec<FieldDescriptor>> {
        &self.basic_fields
    }

    /// Returns the category catalog load state.
    #[must_use]
    pub const fn categories(&self) -> &LoadState<Vec<Category>> {
        &self.categories
    }

    /// Returns the load state of the selected category's fields.
    #[must_use]
    pub const fn category_fields(&self) -> &LoadState<Vec<FieldDescriptor>> {
        &self.category_fields
    }

    /// Returns the selected category.
    #[must_use]
    pub const fn selected_category(&self) -> Option<&CategoryId> {
        self.selected.as_ref()
    }

    /// Returns the entered values.
    #[must_use]
    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    /// Returns the per-field errors.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Returns the message of the last failed submission, if it is showing.
    #[must_use]
    pub fn submit_failure(&self) -> Option<&str> {
        self.submit_failure.as_deref()
    }

    /// Returns the receipt of the last accepted submission.
    #[must_use]
    pub const fn last_receipt(&self) -> Option<&SubmissionReceipt> {
        self.last_receipt.as_ref()
    }

    /// Returns whether the success indicator is showing.
    #[must_use]
    pub fn success_visible(&self) -> bool {
        self.phase == Phase::SubmitSucceeded
    }

    /// Returns whether a submission would currently be accepted locally.
    #[must_use]
    pub fn is_submit_eligible(&self) -> bool {
        formwright_core::validation::is_submit_eligible(&self.registry, &self.values, &self.errors)
    }

    /// Drains the effects queued by the handlers.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        mem::take(&mut self.effects)
    }

    // ------------------------------------------------------------------
    // User actions
    // ------------------------------------------------------------------

    /// Requests the basic-field and category schemas.
    ///
    /// Does nothing unless the controller is idle.
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::LoadingSchemas;
        self.basic_fields = LoadState::Loading;
        self.categories = LoadState::Loading;
        self.effects.push(Effect::LoadBasicFields);
        self.effects.push(Effect::LoadCategories);
    }

    /// Selects a category, or clears the selection with `None` or an empty id.
    ///
    /// All category-field values and errors are dropped. Any category-field
    /// request still in flight is superseded.
    pub fn select_category(&mut self, category: Option<CategoryId>) -> Result<()> {
        self.ensure_editable()?;

        let category = category.filter(|c| !c.is_empty());
        if let Some(id) = &category {
            if !self.categories.items().iter().any(|c| &c.id == id) {
                return Err(ControllerError::UnknownCategory(id.clone()));
            }
        }

        self.values.purge_category();
        self.errors.purge_category();
        self.selected.clone_from(&category);

        match category {
            None => {
                self.category_request = None;
                self.category_fields = LoadState::Loaded(Vec::new());
            }
            Some(id) => {
                let ticket = self.next_ticket();
                debug!(category = %id, %ticket, "requesting category fields");
                self.category_request = Some(ticket);
                self.category_fields = LoadState::Loading;
                self.effects.push(Effect::LoadCategoryFields {
                    ticket,
                    category: id,
                });
            }
        }

        self.rebuild_registry();
        Ok(())
    }

    /// Records a new value for a field and revalidates that field only.
    pub fn change_field(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;

        let descriptor = self
            .registry
            .get(key)
            .ok_or_else(|| ControllerError::UnknownField(key.to_string()))?;

        let value = value.into();
        let verdict = validate(descriptor, &value);
        self.errors.update(key, verdict);
        self.values.insert(key, value);
        Ok(())
    }

    /// Starts a submission of the current values.
    ///
    /// Rejected locally, without queuing any effect, when a field holds an
    /// error or a required field is empty; the missing-field errors are
    /// recorded so they show next to the fields.
    pub fn submit(&mut self) -> Result<()> {
        match self.phase {
            Phase::Submitting => return Err(ControllerError::Busy(self.phase)),
            Phase::Idle | Phase::LoadingSchemas => {
                return Err(ControllerError::NotReady(self.phase))
            }
            Phase::Ready | Phase::SubmitSucceeded | Phase::SubmitFailed => {}
        }

        if self.category_fields.is_loading() {
            return Err(ControllerError::CategoryFieldsLoading);
        }

        let missing = missing_required(&self.registry, &self.values);
        if !self.errors.is_empty() || !missing.is_empty() {
            self.errors.merge(missing);
            warn!(fields = self.errors.len(), "form has validation errors");
            return Err(ControllerError::ValidationFailed(self.errors.clone()));
        }

        let ticket = self.next_ticket();
        self.submission = Some(ticket);
        self.success_timer = None;
        self.submit_failure = None;
        self.phase = Phase::Submitting;
        self.effects.push(Effect::Submit {
            ticket,
            values: self.values.clone(),
        });
        Ok(())
    }

    /// Clears the form and abandons any pending category-field request.
    pub fn cancel(&mut self) -> Result<()> {
        if self.phase == Phase::Submitting {
            return Err(ControllerError::Busy(self.phase));
        }

        self.reset_form();
        self.submit_failure = None;
        self.success_timer = None;
        if !matches!(self.phase, Phase::Idle | Phase::LoadingSchemas) {
            self.phase = Phase::Ready;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------

    /// Applies the outcome of the basic-field request.
    pub fn apply_basic_fields(&mut self, state: LoadState<Vec<FieldDescriptor>>) {
        self.basic_fields = state;
        self.rebuild_registry();
        self.finish_loading();
    }

    /// Applies the outcome of the category catalog request.
    pub fn apply_categories(&mut self, state: LoadState<Vec<Category>>) {
        self.categories = state;
        self.finish_loading();
    }

    /// Applies the outcome of a category-field request.
    ///
    /// Only the response to the live request is applied.
    pub fn apply_category_fields(
        &mut self,
        ticket: Ticket,
        state: LoadState<Vec<FieldDescriptor>>,
    ) -> Resolution {
        if self.category_request != Some(ticket) {
            debug!(%ticket, "discarding stale category field response");
            return Resolution::Stale;
        }

        self.category_request = None;
        self.category_fields = state;
        self.rebuild_registry();
        Resolution::Applied
    }

    /// Applies the outcome of a submission.
    pub fn apply_submission(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<SubmissionReceipt, SubmissionError>,
    ) -> Resolution {
        if self.submission != Some(ticket) {
            debug!(%ticket, "discarding stale submission outcome");
            return Resolution::Stale;
        }
        self.submission = None;

        match result {
            Ok(receipt) => {
                info!("submission accepted");
                self.reset_form();
                self.last_receipt = Some(receipt);
                self.phase = Phase::SubmitSucceeded;

                let timer = self.next_ticket();
                self.success_timer = Some(timer);
                self.effects.push(Effect::ClearSuccess {
                    ticket: timer,
                    after: self.success_display,
                });
            }
            Err(e) => {
                self.submit_failure = Some(e.to_string());
                self.phase = Phase::SubmitFailed;
            }
        }
        Resolution::Applied
    }

    /// Hides the success indicator if `ticket` is the live timer.
    pub fn clear_success(&mut self, ticket: Ticket) -> Resolution {
        if self.phase != Phase::SubmitSucceeded || self.success_timer != Some(ticket) {
            return Resolution::Stale;
        }
        self.success_timer = None;
        self.phase = Phase::Ready;
        Resolution::Applied
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn next_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        Ticket(self.last_ticket)
    }

    fn ensure_editable(&self) -> Result<()> {
        match self.phase {
            Phase::Idle => Err(ControllerError::NotReady(self.phase)),
            Phase::Submitting => Err(ControllerError::Busy(self.phase)),
            _ => Ok(()),
        }
    }

    fn finish_loading(&mut self) {
        if self.phase == Phase::LoadingSchemas
            && self.basic_fields.is_resolved()
            && self.categories.is_resolved()
        {
            info!("form schemas resolved");
            self.phase = Phase::Ready;
        }
    }

    fn reset_form(&mut self) {
        self.values.clear();
        self.errors.clear();
        self.selected = None;
        self.category_request = None;
        self.category_fields = LoadState::Loaded(Vec::new());
        self.rebuild_registry();
    }

    /// Rebuilds the merged registry and drops values and errors of fields
    /// that are no longer active.
    fn rebuild_registry(&mut self) {
        self.registry =
            FieldRegistry::from_parts(self.basic_fields.items(), self.category_fields.items());

        let stale: Vec<String> = self
            .values
            .iter()
            .map(|(k, _)| k)
            .chain(self.errors.iter().map(|(k, _)| k))
            .filter(|k| !self.registry.contains(k))
            .map(str::to_string)
            .collect();
        for key in stale {
            self.values.remove(&key);
            self.errors.update(&key, None);
        }
    }
}
