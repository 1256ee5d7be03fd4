//! Top-level application state: the owned submission list, the current view
//! and the form.
//!
//! Every fetch and every successful create takes a sequence number. A fetch
//! that started before the latest create completed is stale and its result is
//! dropped, so the list never loses a submission this shell created.

use std::sync::Arc;

use shared::{calendar::CalendarMonth, domain::Submission};
use tracing::{debug, info, warn};

use crate::{
    error::{FormError, StoreError},
    form::FormController,
    list_view::{list_entries, sorted_view, ListEntry},
    store::SubmissionStore,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Form,
    List,
}

/// Handle for a fetch started with [`AppShell::begin_refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

pub struct AppShell {
    store: Arc<dyn SubmissionStore>,
    form: FormController,
    view: View,
    submissions: Vec<Submission>,
    loading: bool,
    load_error: Option<StoreError>,
    next_seq: u64,
    /// Sequence number of the latest successful create.
    mutation_barrier: u64,
    latest_fetch: u64,
    applied_fetch: u64,
}

impl AppShell {
    pub fn new(store: Arc<dyn SubmissionStore>, month: CalendarMonth) -> Self {
        Self {
            store,
            form: FormController::new(month),
            view: View::default(),
            submissions: Vec::new(),
            loading: true,
            load_error: None,
            next_seq: 0,
            mutation_barrier: 0,
            latest_fetch: 0,
            applied_fetch: 0,
        }
    }

    fn bump(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    pub fn begin_refresh(&mut self) -> FetchTicket {
        let seq = self.bump();
        self.latest_fetch = seq;
        self.loading = true;
        FetchTicket(seq)
    }

    /// Applies a fetch result. Returns `false` when the result was stale and
    /// dropped.
    pub fn finish_refresh(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Submission>, StoreError>,
    ) -> bool {
        let FetchTicket(seq) = ticket;
        if seq >= self.latest_fetch {
            self.loading = false;
        }

        if seq < self.mutation_barrier || seq < self.applied_fetch {
            debug!(
                seq,
                mutation_barrier = self.mutation_barrier,
                applied_fetch = self.applied_fetch,
                "dropping stale fetch result"
            );
            return false;
        }
        self.applied_fetch = seq;

        match result {
            Ok(submissions) => {
                debug!(count = submissions.len(), "submission list loaded");
                self.submissions = submissions;
                self.load_error = None;
            }
            Err(err) => {
                warn!(error = %err, "failed to load submissions");
                self.load_error = Some(err);
            }
        }
        true
    }

    pub async fn refresh(&mut self) -> bool {
        let ticket = self.begin_refresh();
        let result = self.store.fetch_all().await;
        self.finish_refresh(ticket, result)
    }

    /// Submits the form. On success the new submission joins the list and the
    /// list view is shown.
    pub async fn submit_form(&mut self) -> Result<Submission, FormError> {
        let submission = self.form.submit(self.store.as_ref()).await?;
        self.mutation_barrier = self.bump();
        self.submissions.push(submission.clone());
        self.view = View::List;
        info!(
            submission_id = %submission.id,
            total = self.submissions.len(),
            "submission added to list"
        );
        Ok(submission)
    }

    pub fn navigate(&mut self, view: View) {
        self.view = view;
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Creation order, as loaded and appended.
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn sorted_submissions(&self) -> Vec<Submission> {
        sorted_view(&self.submissions)
    }

    pub fn list_entries(&self) -> Vec<ListEntry> {
        list_entries(&self.submissions)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn load_error(&self) -> Option<&StoreError> {
        self.load_error.as_ref()
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
