//! Schedule API port — CRUD for schedules, owned by the hub.

use std::future::Future;

use relaydash_domain::error::DashboardError;
use relaydash_domain::id::ScheduleId;
use relaydash_domain::schedule::{Schedule, ScheduleDraft};

/// Remote schedule store.
///
/// Mutations resolve to `Ok(())` only when the hub answers `success: true`;
/// `success: false` is [`DashboardError::Rejected`], anything that prevents a
/// usable answer is [`DashboardError::Transport`].
pub trait ScheduleApi {
    /// List every schedule of one device.
    fn list(
        &self,
        device_name: &str,
    ) -> impl Future<Output = Result<Vec<Schedule>, DashboardError>> + Send;

    /// Create a schedule.
    fn create(
        &self,
        draft: &ScheduleDraft,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send;

    /// Replace the fields of an existing schedule.
    fn update(
        &self,
        id: ScheduleId,
        draft: &ScheduleDraft,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send;

    /// Delete a schedule.
    fn delete(&self, id: ScheduleId) -> impl Future<Output = Result<(), DashboardError>> + Send;
}

impl<T: ScheduleApi + Send + Sync> ScheduleApi for std::sync::Arc<T> {
    fn list(
        &self,
        device_name: &str,
    ) -> impl Future<Output = Result<Vec<Schedule>, DashboardError>> + Send {
        (**self).list(device_name)
    }

    fn create(
        &self,
        draft: &ScheduleDraft,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send {
        (**self).create(draft)
    }

    fn update(
        &self,
        id: ScheduleId,
        draft: &ScheduleDraft,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send {
        (**self).update(id, draft)
    }

    fn delete(&self, id: ScheduleId) -> impl Future<Output = Result<(), DashboardError>> + Send {
        (**self).delete(id)
    }
}
