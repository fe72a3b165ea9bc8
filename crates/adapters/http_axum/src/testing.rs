//! Test doubles shared by the handler tests.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use relaydash_app::controller::{Controller, ControllerConfig, DashboardHandle, DashboardSnapshot};
use relaydash_app::ports::{HubChannel, HubEvent, HubListener, ScheduleApi};
use relaydash_domain::device::{DeviceSet, DeviceState, RelayState, Target};
use relaydash_domain::error::DashboardError;
use relaydash_domain::id::ScheduleId;
use relaydash_domain::message::{InboundMessage, OutboundMessage};
use relaydash_domain::schedule::{Schedule, ScheduleDraft, Weekday, WeekdaySet};
use tower::ServiceExt;

use crate::state::AppState;

#[derive(Default)]
pub struct RecordingHub {
    sent: Mutex<Vec<OutboundMessage>>,
}

impl RecordingHub {
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl HubChannel for RecordingHub {
    fn emit(
        &self,
        message: OutboundMessage,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send {
        self.sent.lock().unwrap().push(message);
        async { Ok(()) }
    }
}

#[derive(Default)]
pub struct FakeApi {
    schedules: Mutex<Vec<Schedule>>,
    drafts: Mutex<Vec<ScheduleDraft>>,
    next_id: AtomicU64,
}

fn seed_draft(device: &str, time: &str, days: &[Weekday]) -> ScheduleDraft {
    let mut set = WeekdaySet::new();
    for day in days {
        set.insert(*day);
    }
    ScheduleDraft {
        device_name: device.to_string(),
        target: Target::Lamp,
        state: RelayState::On,
        time: time.to_string(),
        days: set,
    }
}

impl FakeApi {
    fn store(&self, draft: ScheduleDraft) {
        let id = ScheduleId::from(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.store_as(id, draft);
    }

    fn store_as(&self, id: ScheduleId, draft: ScheduleDraft) {
        self.schedules.lock().unwrap().push(Schedule {
            id,
            device_name: draft.device_name,
            target: draft.target,
            state: draft.state,
            time: draft.time,
            days: draft.days,
        });
    }

    pub fn seed(&self, device: &str, time: &str, days: &[Weekday]) {
        self.store(seed_draft(device, time, days));
    }

    /// Seed a schedule under a hub-chosen id.
    pub fn seed_as(&self, id: &str, device: &str, time: &str, days: &[Weekday]) {
        self.store_as(ScheduleId::new(id), seed_draft(device, time, days));
    }

    pub fn drafts(&self) -> Vec<ScheduleDraft> {
        self.drafts.lock().unwrap().clone()
    }
}

impl ScheduleApi for FakeApi {
    fn list(
        &self,
        device_name: &str,
    ) -> impl Future<Output = Result<Vec<Schedule>, DashboardError>> + Send {
        let result = Ok(self
            .schedules
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.device_name == device_name)
            .cloned()
            .collect());
        async { result }
    }

    fn create(
        &self,
        draft: &ScheduleDraft,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send {
        self.drafts.lock().unwrap().push(draft.clone());
        self.store(draft.clone());
        async { Ok(()) }
    }

    fn update(
        &self,
        id: ScheduleId,
        draft: &ScheduleDraft,
    ) -> impl Future<Output = Result<(), DashboardError>> + Send {
        self.drafts.lock().unwrap().push(draft.clone());
        if let Some(schedule) = self.schedules.lock().unwrap().iter_mut().find(|s| s.id == id) {
            schedule.time.clone_from(&draft.time);
            schedule.days = draft.days.clone();
        }
        async { Ok(()) }
    }

    fn delete(&self, id: ScheduleId) -> impl Future<Output = Result<(), DashboardError>> + Send {
        self.schedules.lock().unwrap().retain(|s| s.id != id);
        async { Ok(()) }
    }
}

/// A running controller wired to test doubles.
pub struct Harness {
    pub state: AppState,
    pub hub: Arc<RecordingHub>,
    pub api: Arc<FakeApi>,
}

impl Harness {
    pub fn start() -> Self {
        let hub = Arc::new(RecordingHub::default());
        let api = Arc::new(FakeApi::default());
        let (controller, handle) =
            Controller::new(Arc::clone(&hub), Arc::clone(&api), ControllerConfig::default());
        tokio::spawn(controller.run());
        Self {
            state: AppState::new(handle, 5),
            hub,
            api,
        }
    }

    /// State whose controller never ran.
    pub fn stopped() -> AppState {
        let (controller, handle) = Controller::new(
            RecordingHub::default(),
            FakeApi::default(),
            ControllerConfig::default(),
        );
        drop(controller);
        AppState::new(handle, 5)
    }

    /// Connect the hub and push a device set, then wait until it is rendered.
    pub async fn push_devices(&self, devices: &[(&str, RelayState, RelayState, bool)]) {
        let set: DeviceSet = devices
            .iter()
            .map(|&(name, lamp, cooler, connected)| {
                (
                    name,
                    DeviceState {
                        lamp,
                        cooler,
                        connected,
                    },
                )
            })
            .collect();
        self.state.handle.on_event(HubEvent::Connected {
            sid: Some("test-sid".to_string()),
        });
        self.state
            .handle
            .on_event(HubEvent::Message(InboundMessage::Devices(set)));
        wait_for(&self.state.handle, |snapshot| {
            devices
                .iter()
                .all(|(name, ..)| snapshot.dashboard.card(name).is_some())
        })
        .await;
    }
}

pub async fn wait_for(
    handle: &DashboardHandle,
    mut predicate: impl FnMut(&DashboardSnapshot) -> bool,
) {
    let mut snapshots = handle.subscribe();
    tokio::time::timeout(
        Duration::from_secs(2),
        snapshots.wait_for(|snapshot| predicate(snapshot)),
    )
    .await
    .expect("snapshot condition not reached in time")
    .expect("controller stopped");
}

/// Send one request through `app`; `form` is sent url-encoded.
pub async fn call(
    app: Router,
    method: Method,
    uri: &str,
    form: Option<&str>,
) -> (StatusCode, HeaderMap, String) {
    let mut request = Request::builder().method(method).uri(uri);
    if form.is_some() {
        request = request.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    }
    let body = Body::from(form.unwrap_or_default().to_string());
    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}
