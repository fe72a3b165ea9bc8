//! Controller — the single task that owns the dashboard state.
//!
//! Inputs (hub events, UI actions, REST completions) are processed one at a
//! time in arrival order. After each input a fresh [`DashboardSnapshot`] is
//! published on a `watch` channel. UI actions are acknowledged only after the
//! snapshot reflecting them has been published, so an HTTP handler can
//! redirect straight to a page that already shows the result.
//!
//! REST calls run in spawned tasks; their outcomes come back as inputs tagged
//! with the ticket they were issued with.

use std::sync::Arc;

use relaydash_domain::device::Target;
use relaydash_domain::error::NotFoundError;
use relaydash_domain::id::ScheduleId;
use relaydash_domain::message::CommandStyle;
use tokio::sync::{mpsc, oneshot, watch};

use crate::dashboard::DashboardState;
use crate::message_log::DEFAULT_CAPACITY;
use crate::ports::{HubChannel, HubEvent, HubListener, ScheduleApi};
use crate::schedule_panel::{Outcome, PanelError, Request, ScheduleForm, Ticket};
use crate::services::{CommandDispatcher, ScheduleService};

pub use crate::dashboard::DashboardSnapshot;

/// Something the user did on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Toggle { device: String, target: Target },
    OpenSchedules { device: String },
    CloseSchedules,
    SelectDevice { device: String },
    BeginEdit(ScheduleId),
    CancelEdit,
    Submit(ScheduleForm),
    RequestDelete(ScheduleId),
    ConfirmDelete,
    DismissDelete,
    DismissNotices,
}

/// Why [`DashboardHandle::dispatch`] failed.
///
/// Refusals the user can act on (busy, no day selected, ...) are not errors:
/// they show up as notices in the next snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("dashboard controller is not running")]
    ControllerGone,
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    pub log_capacity: usize,
    pub command_style: CommandStyle,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_CAPACITY,
            command_style: CommandStyle::default(),
        }
    }
}

#[derive(Debug)]
enum Input {
    Action {
        action: UiAction,
        ack: oneshot::Sender<Result<(), NotFoundError>>,
    },
    Hub(HubEvent),
}

#[derive(Debug)]
struct Completion {
    ticket: Ticket,
    outcome: Outcome,
}

/// Cheap, cloneable access to a running [`Controller`].
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    inputs: mpsc::UnboundedSender<Input>,
    snapshots: watch::Receiver<Arc<DashboardSnapshot>>,
}

impl DashboardHandle {
    /// Submit a UI action and wait until it is reflected in the snapshot.
    ///
    /// # Errors
    ///
    /// - [`ActionError::NotFound`] when the action references an unknown schedule
    /// - [`ActionError::ControllerGone`] when the controller task has stopped
    pub async fn dispatch(&self, action: UiAction) -> Result<(), ActionError> {
        let (ack, done) = oneshot::channel();
        self.inputs
            .send(Input::Action { action, ack })
            .map_err(|_| ActionError::ControllerGone)?;
        done.await.map_err(|_| ActionError::ControllerGone)??;
        Ok(())
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// A receiver notified on every new snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardSnapshot>> {
        self.snapshots.clone()
    }
}

impl HubListener for DashboardHandle {
    fn on_event(&self, event: HubEvent) {
        if self.inputs.send(Input::Hub(event)).is_err() {
            tracing::debug!("controller stopped, dropping hub event");
        }
    }
}

/// Owner of the [`DashboardState`].
pub struct Controller<H, A> {
    state: DashboardState,
    dispatcher: CommandDispatcher<H>,
    schedules: Arc<ScheduleService<A>>,
    inputs: mpsc::UnboundedReceiver<Input>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    snapshots: watch::Sender<Arc<DashboardSnapshot>>,
}

impl<H, A> Controller<H, A>
where
    H: HubChannel + Send + Sync + 'static,
    A: ScheduleApi + Send + Sync + 'static,
{
    /// Build a controller and the handle used to talk to it.
    ///
    /// Nothing happens until [`Controller::run`] is awaited.
    pub fn new(hub: H, api: A, config: ControllerConfig) -> (Self, DashboardHandle) {
        let state = DashboardState::new(config.log_capacity);
        let (snapshots, snapshots_rx) = watch::channel(Arc::new(state.snapshot()));
        let (inputs_tx, inputs) = mpsc::unbounded_channel();
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let controller = Self {
            state,
            dispatcher: CommandDispatcher::new(hub, config.command_style),
            schedules: Arc::new(ScheduleService::new(api)),
            inputs,
            completions_tx,
            completions,
            snapshots,
        };
        let handle = DashboardHandle {
            inputs: inputs_tx,
            snapshots: snapshots_rx,
        };
        (controller, handle)
    }

    /// Process inputs until every [`DashboardHandle`] has been dropped.
    pub async fn run(mut self) {
        tracing::info!("dashboard controller started");
        loop {
            tokio::select! {
                input = self.inputs.recv() => {
                    let Some(input) = input else { break };
                    self.handle(input).await;
                }
                Some(completion) = self.completions.recv() => {
                    self.complete(completion);
                    self.publish();
                }
            }
        }
        tracing::info!("dashboard controller stopped");
    }

    async fn handle(&mut self, input: Input) {
        match input {
            Input::Hub(event) => {
                tracing::debug!(?event, "hub event");
                self.state.apply_hub_event(event);
                self.publish();
            }
            Input::Action { action, ack } => {
                let result = self.act(action).await;
                self.publish();
                if ack.send(result).is_err() {
                    tracing::debug!("action caller went away before ack");
                }
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn act(&mut self, action: UiAction) -> Result<(), NotFoundError> {
        match action {
            UiAction::Toggle { device, target } => {
                let (devices, log) = self.state.devices_and_log();
                self.dispatcher.toggle(devices, &device, target, log).await;
            }
            UiAction::OpenSchedules { device } => {
                let mut names = vec![device.clone()];
                names.extend(
                    self.state
                        .devices()
                        .names()
                        .into_iter()
                        .filter(|name| *name != device),
                );
                if let Some(request) = self.state.panel_mut().open(names) {
                    self.spawn(request);
                }
            }
            UiAction::CloseSchedules => self.state.panel_mut().close(),
            UiAction::SelectDevice { device } => {
                let result = self.state.panel_mut().select_device(&device);
                self.issue(result)?;
            }
            UiAction::BeginEdit(id) => {
                let result = self.state.panel_mut().begin_edit(id);
                self.refuse_on_error(result)?;
            }
            UiAction::CancelEdit => self.state.panel_mut().cancel_edit(),
            UiAction::Submit(form) => {
                let result = self.state.panel_mut().submit(form);
                self.issue(result)?;
            }
            UiAction::RequestDelete(id) => {
                let result = self.state.panel_mut().request_delete(id);
                self.refuse_on_error(result)?;
            }
            UiAction::ConfirmDelete => match self.state.panel_mut().confirm_delete() {
                Ok(Some(request)) => self.spawn(request),
                Ok(None) => {}
                Err(err) => self.refuse(err)?,
            },
            UiAction::DismissDelete => self.state.panel_mut().dismiss_delete(),
            UiAction::DismissNotices => self.state.dismiss_notices(),
        }
        Ok(())
    }

    fn issue(&mut self, result: Result<Request, PanelError>) -> Result<(), NotFoundError> {
        match result {
            Ok(request) => {
                self.spawn(request);
                Ok(())
            }
            Err(err) => self.refuse(err),
        }
    }

    fn refuse_on_error(&mut self, result: Result<(), PanelError>) -> Result<(), NotFoundError> {
        result.or_else(|err| self.refuse(err))
    }

    /// Turn a panel refusal into a notice; unknown schedules go back to the caller.
    fn refuse(&mut self, err: PanelError) -> Result<(), NotFoundError> {
        match err {
            PanelError::NotFound(not_found) => Err(not_found),
            other => {
                tracing::debug!(error = %other, "schedule action refused");
                self.state.push_notice(other.notice());
                Ok(())
            }
        }
    }

    fn spawn(&self, request: Request) {
        let service = Arc::clone(&self.schedules);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let outcome = service.execute(request.call).await;
            let completion = Completion {
                ticket: request.ticket,
                outcome,
            };
            if completions.send(completion).is_err() {
                tracing::debug!("controller stopped, dropping schedule outcome");
            }
        });
    }

    fn complete(&mut self, completion: Completion) {
        let applied = self
            .state
            .panel_mut()
            .apply(&completion.ticket, completion.outcome);
        if let Some(notice) = applied.notice {
            self.state.push_notice(notice);
        }
        if let Some(request) = applied.follow_up {
            self.spawn(request);
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(Arc::new(self.state.snapshot()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::Notice;
    use crate::view::{DashboardView, ScheduleListView};
    use relaydash_domain::device::{DeviceSet, DeviceState, RelayState};
    use relaydash_domain::error::DashboardError;
    use relaydash_domain::message::{InboundMessage, OutboundMessage};
    use relaydash_domain::schedule::{Schedule, ScheduleDraft, Weekday};
    use std::future::Future;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingHub {
        sent: Mutex<Vec<OutboundMessage>>,
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
    struct InMemoryScheduleApi {
        store: Mutex<Vec<Schedule>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl InMemoryScheduleApi {
        fn with(schedules: Vec<Schedule>) -> Self {
            Self {
                store: Mutex::new(schedules),
                calls: Mutex::default(),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ScheduleApi for InMemoryScheduleApi {
        fn list(
            &self,
            device_name: &str,
        ) -> impl Future<Output = Result<Vec<Schedule>, DashboardError>> + Send {
            self.calls.lock().unwrap().push("list");
            let result: Vec<Schedule> = self
                .store
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.device_name == device_name)
                .cloned()
                .collect();
            async { Ok(result) }
        }

        fn create(
            &self,
            draft: &ScheduleDraft,
        ) -> impl Future<Output = Result<(), DashboardError>> + Send {
            self.calls.lock().unwrap().push("create");
            let mut store = self.store.lock().unwrap();
            let id = ScheduleId::new(format!("created-{}", store.len() + 1));
            store.push(Schedule {
                id,
                device_name: draft.device_name.clone(),
                target: draft.target,
                state: draft.state,
                time: draft.time.clone(),
                days: draft.days.clone(),
            });
            async { Ok(()) }
        }

        fn update(
            &self,
            id: ScheduleId,
            draft: &ScheduleDraft,
        ) -> impl Future<Output = Result<(), DashboardError>> + Send {
            self.calls.lock().unwrap().push("update");
            let mut store = self.store.lock().unwrap();
            if let Some(schedule) = store.iter_mut().find(|s| s.id == id) {
                schedule.time = draft.time.clone();
                schedule.days = draft.days.clone();
            }
            async { Ok(()) }
        }

        fn delete(&self, id: ScheduleId) -> impl Future<Output = Result<(), DashboardError>> + Send {
            self.calls.lock().unwrap().push("delete");
            self.store.lock().unwrap().retain(|s| s.id != id);
            async { Ok(()) }
        }
    }

    fn schedule(id: u64) -> Schedule {
        Schedule {
            id: ScheduleId::from(id),
            device_name: "Lab".to_string(),
            target: Target::Lamp,
            state: RelayState::On,
            time: "07:00".to_string(),
            days: [Weekday::Mon].into_iter().collect(),
        }
    }

    fn lab(connected: bool) -> HubEvent {
        let devices: DeviceSet = [(
            "Lab",
            DeviceState {
                lamp: RelayState::Off,
                cooler: RelayState::On,
                connected,
            },
        )]
        .into_iter()
        .collect();
        HubEvent::Message(InboundMessage::Devices(devices))
    }

    fn start(
        api: InMemoryScheduleApi,
    ) -> (Arc<RecordingHub>, Arc<InMemoryScheduleApi>, DashboardHandle) {
        let hub = Arc::new(RecordingHub::default());
        let api = Arc::new(api);
        let (controller, handle) =
            Controller::new(Arc::clone(&hub), Arc::clone(&api), ControllerConfig::default());
        tokio::spawn(controller.run());
        (hub, api, handle)
    }

    async fn wait_for(
        handle: &DashboardHandle,
        predicate: impl FnMut(&Arc<DashboardSnapshot>) -> bool,
    ) -> Arc<DashboardSnapshot> {
        let mut rx = handle.subscribe();
        let snapshot = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(predicate))
            .await
            .expect("timed out waiting for snapshot")
            .expect("controller stopped");
        Arc::clone(&snapshot)
    }

    fn list_items(snapshot: &DashboardSnapshot) -> Vec<ScheduleId> {
        snapshot
            .panel
            .as_ref()
            .map(|panel| panel.list.items().iter().map(|item| item.id.clone()).collect())
            .unwrap_or_default()
    }

    fn list_loaded(snapshot: &Arc<DashboardSnapshot>) -> bool {
        snapshot
            .panel
            .as_ref()
            .is_some_and(|panel| panel.list != ScheduleListView::Loading)
    }

    #[tokio::test]
    async fn should_emit_command_without_changing_devices() {
        let (hub, _api, handle) = start(InMemoryScheduleApi::default());
        handle.on_event(lab(true));

        handle
            .dispatch(UiAction::Toggle {
                device: "Lab".to_string(),
                target: Target::Lamp,
            })
            .await
            .unwrap();

        assert_eq!(hub.sent.lock().unwrap().len(), 1);
        let snapshot = handle.snapshot();
        let card = snapshot.dashboard.card("Lab").unwrap();
        assert_eq!(card.toggle(Target::Lamp).unwrap().button_label, "Ligar");
        assert_eq!(snapshot.log[0].text, "Comando enviado: Lab -> LAMP -> ON");
    }

    #[tokio::test]
    async fn should_refuse_toggle_when_device_offline() {
        let (hub, _api, handle) = start(InMemoryScheduleApi::default());
        handle.on_event(lab(false));

        handle
            .dispatch(UiAction::Toggle {
                device: "Lab".to_string(),
                target: Target::Cooler,
            })
            .await
            .unwrap();

        assert!(hub.sent.lock().unwrap().is_empty());
        assert_eq!(
            handle.snapshot().log[0].text,
            "Erro: Dispositivo Lab está Offline."
        );
    }

    #[tokio::test]
    async fn should_load_schedules_when_panel_opened() {
        let (_hub, _api, handle) = start(InMemoryScheduleApi::with(vec![schedule(7)]));

        handle
            .dispatch(UiAction::OpenSchedules {
                device: "Lab".to_string(),
            })
            .await
            .unwrap();
        let snapshot = wait_for(&handle, list_loaded).await;

        assert_eq!(list_items(&snapshot), vec![ScheduleId::new("7")]);
    }

    #[tokio::test]
    async fn should_refetch_list_without_deleted_schedule() {
        let (_hub, api, handle) = start(InMemoryScheduleApi::with(vec![schedule(7), schedule(8)]));
        handle
            .dispatch(UiAction::OpenSchedules {
                device: "Lab".to_string(),
            })
            .await
            .unwrap();
        wait_for(&handle, list_loaded).await;

        handle
            .dispatch(UiAction::RequestDelete(ScheduleId::new("7")))
            .await
            .unwrap();
        handle.dispatch(UiAction::ConfirmDelete).await.unwrap();
        let snapshot = wait_for(&handle, |s| {
            list_loaded(s) && list_items(s) == vec![ScheduleId::new("8")]
        })
        .await;

        assert_eq!(list_items(&snapshot), vec![ScheduleId::new("8")]);
        assert_eq!(api.calls(), vec!["list", "delete", "list"]);
    }

    #[tokio::test]
    async fn should_notify_without_request_when_no_day_selected() {
        let (_hub, api, handle) = start(InMemoryScheduleApi::default());
        handle
            .dispatch(UiAction::OpenSchedules {
                device: "Lab".to_string(),
            })
            .await
            .unwrap();
        wait_for(&handle, list_loaded).await;

        handle
            .dispatch(UiAction::Submit(ScheduleForm {
                time: "08:00".to_string(),
                ..ScheduleForm::default()
            }))
            .await
            .unwrap();

        assert_eq!(
            handle.snapshot().notices,
            vec![Notice::error("Selecione pelo menos 1 dia.")]
        );
        assert_eq!(api.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn should_create_then_reload_with_new_schedule() {
        let (_hub, _api, handle) = start(InMemoryScheduleApi::default());
        handle
            .dispatch(UiAction::OpenSchedules {
                device: "Lab".to_string(),
            })
            .await
            .unwrap();
        wait_for(&handle, list_loaded).await;

        handle
            .dispatch(UiAction::Submit(ScheduleForm {
                time: "08:00".to_string(),
                days: [Weekday::Tue].into_iter().collect(),
                ..ScheduleForm::default()
            }))
            .await
            .unwrap();
        let snapshot = wait_for(&handle, |s| list_loaded(s) && !list_items(s).is_empty()).await;

        assert_eq!(snapshot.notices, vec![Notice::info("Agendamento criado!")]);
        let form = &snapshot.panel.as_ref().unwrap().form;
        assert_eq!(form.time, "");
        assert_eq!(form.submit_label, "Adicionar Agendamento");
    }

    #[tokio::test]
    async fn should_reset_form_when_edit_cancelled() {
        let (_hub, _api, handle) = start(InMemoryScheduleApi::with(vec![schedule(7)]));
        handle
            .dispatch(UiAction::OpenSchedules {
                device: "Lab".to_string(),
            })
            .await
            .unwrap();
        wait_for(&handle, list_loaded).await;

        handle
            .dispatch(UiAction::BeginEdit(ScheduleId::new("7")))
            .await
            .unwrap();
        let editing = handle.snapshot();
        assert_eq!(
            editing.panel.as_ref().unwrap().form.submit_label,
            "Atualizar Agendamento"
        );

        handle.dispatch(UiAction::CancelEdit).await.unwrap();

        let form = handle.snapshot().panel.as_ref().unwrap().form.clone();
        assert_eq!(form.editing, None);
        assert_eq!(form.submit_label, "Adicionar Agendamento");
        assert!(!form.show_cancel);
        assert_eq!(form.time, "");
    }

    #[tokio::test]
    async fn should_return_not_found_when_editing_unknown_schedule() {
        let (_hub, _api, handle) = start(InMemoryScheduleApi::default());
        handle
            .dispatch(UiAction::OpenSchedules {
                device: "Lab".to_string(),
            })
            .await
            .unwrap();

        let result = handle.dispatch(UiAction::BeginEdit(ScheduleId::new("3"))).await;

        assert!(matches!(result, Err(ActionError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_show_disconnected_placeholder_after_hub_drops() {
        let (_hub, _api, handle) = start(InMemoryScheduleApi::default());
        handle.on_event(lab(true));
        handle.on_event(HubEvent::Disconnected);

        handle.dispatch(UiAction::DismissNotices).await.unwrap();

        let snapshot = handle.snapshot();
        assert!(matches!(snapshot.dashboard, DashboardView::Placeholder(_)));
        assert_eq!(snapshot.status.label, "Desconectado");
    }

    #[tokio::test]
    async fn should_fail_dispatch_when_controller_dropped() {
        let hub = Arc::new(RecordingHub::default());
        let api = Arc::new(InMemoryScheduleApi::default());
        let (controller, handle) = Controller::new(hub, api, ControllerConfig::default());
        drop(controller);

        let result = handle.dispatch(UiAction::DismissNotices).await;

        assert!(matches!(result, Err(ActionError::ControllerGone)));
    }
}
