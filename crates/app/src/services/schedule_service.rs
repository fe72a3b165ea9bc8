//! Schedule service — runs one schedule REST call against the [`ScheduleApi`] port.

use relaydash_domain::error::DashboardError;

use crate::ports::ScheduleApi;
use crate::schedule_panel::{Outcome, ScheduleCall};

/// Application service executing [`ScheduleCall`]s.
pub struct ScheduleService<A> {
    api: A,
}

impl<A: ScheduleApi> ScheduleService<A> {
    /// Create a new service backed by the given API client.
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Perform `call` and wrap its result for the schedule panel.
    ///
    /// Failures are traced here; the panel only turns them into notices.
    #[tracing::instrument(skip(self, call), fields(call = call_name(&call)))]
    pub async fn execute(&self, call: ScheduleCall) -> Outcome {
        match call {
            ScheduleCall::List(device) => {
                let result = self.api.list(&device).await;
                if let Err(err) = &result {
                    trace_failure(err);
                }
                Outcome::Listed(result)
            }
            ScheduleCall::Create(draft) => Outcome::Mutated(traced(self.api.create(&draft).await)),
            ScheduleCall::Update(id, draft) => {
                Outcome::Mutated(traced(self.api.update(id, &draft).await))
            }
            ScheduleCall::Delete(id) => Outcome::Mutated(traced(self.api.delete(id).await)),
        }
    }
}

fn traced(result: Result<(), DashboardError>) -> Result<(), DashboardError> {
    if let Err(err) = &result {
        trace_failure(err);
    }
    result
}

fn call_name(call: &ScheduleCall) -> &'static str {
    match call {
        ScheduleCall::List(_) => "list",
        ScheduleCall::Create(_) => "create",
        ScheduleCall::Update(..) => "update",
        ScheduleCall::Delete(_) => "delete",
    }
}

fn trace_failure(err: &DashboardError) {
    match err {
        DashboardError::Rejected(rejected) => {
            tracing::warn!(error = %rejected, "hub rejected schedule request");
        }
        other => {
            let source = std::error::Error::source(other).map(ToString::to_string);
            tracing::error!(error = %other, source = ?source, "schedule request failed");
        }
    }
}
