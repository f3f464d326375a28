use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::{debug, error, info};

use crate::{
    api::MeetingApi,
    bridge::{NavigationBridge, Route},
    error::Result,
    types::MeetingDraft,
    views::Notifier,
};

pub const SUBMIT_FAILED_NOTICE: &str = "Something went wrong. Please try again.";
pub const TITLE_REQUIRED_NOTICE: &str = "Please enter a meeting title.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The report is on the bridge; show `route`.
    Submitted { id: Option<i64>, route: Route },
    /// Another submit is still in flight; nothing was sent.
    AlreadySubmitting,
}

/// Create-meeting form controller.
pub struct CreateView {
    api: Arc<dyn MeetingApi>,
    bridge: Arc<NavigationBridge>,
    notifier: Arc<dyn Notifier>,
    submitting: AtomicBool,
}

impl CreateView {
    pub fn new(
        api: Arc<dyn MeetingApi>,
        bridge: Arc<NavigationBridge>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            bridge,
            notifier,
            submitting: AtomicBool::new(false),
        }
    }

    /// Drives the disabled submit control and the progress indicator.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub async fn submit(&self, draft: MeetingDraft) -> Result<SubmitOutcome> {
        if self.submitting.swap(true, Ordering::AcqRel) {
            debug!("submit ignored, previous submit still running");
            return Ok(SubmitOutcome::AlreadySubmitting);
        }
        let _submitting = SubmittingFlag(&self.submitting);

        if let Err(e) = draft.validate() {
            self.notifier.notice(TITLE_REQUIRED_NOTICE);
            return Err(e);
        }

        let response = match self.api.create_meeting(&draft).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, title = %draft.title, "Failed to create meeting");
                self.notifier.notice(SUBMIT_FAILED_NOTICE);
                return Err(e);
            }
        };

        if let Err(e) = self.bridge.publish(response.result).await {
            error!(error = %e, "Failed to store meeting result");
            self.notifier.notice(SUBMIT_FAILED_NOTICE);
            return Err(e);
        }

        info!(id = ?response.id, title = %draft.title, "meeting created");
        Ok(SubmitOutcome::Submitted {
            id: response.id,
            route: Route::Result,
        })
    }
}

/// Resets the submitting flag however `submit` returns.
struct SubmittingFlag<'a>(&'a AtomicBool);

impl Drop for SubmittingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
