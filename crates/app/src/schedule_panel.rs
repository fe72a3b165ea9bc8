//! Schedule panel — the create/edit state machine behind the schedule form.
//!
//! The panel never performs IO. Every operation that needs the hub returns a
//! [`Request`] tagged with a [`Ticket`]; the caller runs it and feeds the
//! [`Outcome`] back through [`SchedulePanel::apply`]. Tickets let the panel
//! discard answers that no longer match what is on screen:
//!
//! - a list answer is applied only when it is the newest list request and
//!   its device is still selected;
//! - a mutation answer always yields its notice, but only resets the form or
//!   reloads the list when its device is still selected;
//! - only one mutation may be in flight at a time.

use relaydash_domain::device::{RelayState, Target};
use relaydash_domain::error::{DashboardError, NotFoundError, ValidationError};
use relaydash_domain::id::{RequestId, ScheduleId};
use relaydash_domain::schedule::{Schedule, ScheduleDraft, WeekdaySet};

use crate::notice::Notice;
use crate::view::schedule::{DeviceOption, FormView, PanelView, ScheduleItemView, ScheduleListView};

const CREATED: &str = "Agendamento criado!";
const CREATE_FAILED: &str = "Erro ao criar.";
const UPDATED: &str = "Agendamento atualizado!";
const UPDATE_FAILED: &str = "Erro ao atualizar.";
const DELETE_FAILED: &str = "Erro ao excluir.";
const CONNECTION_FAILED: &str = "Erro de conexão com servidor.";

/// Whether the form creates a new schedule or edits a cached one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(ScheduleId),
}

/// Field values of the schedule form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleForm {
    pub target: Target,
    pub state: RelayState,
    pub time: String,
    pub days: WeekdaySet,
}

impl Default for ScheduleForm {
    fn default() -> Self {
        Self {
            target: Target::Lamp,
            state: RelayState::On,
            time: String::new(),
            days: WeekdaySet::new(),
        }
    }
}

impl ScheduleForm {
    /// Form populated from an existing schedule.
    #[must_use]
    pub fn from_schedule(schedule: &Schedule) -> Self {
        Self {
            target: schedule.target,
            state: schedule.state,
            time: schedule.time.clone(),
            days: schedule.days.clone(),
        }
    }

    /// Request body for `device_name`.
    #[must_use]
    pub fn to_draft(&self, device_name: &str) -> ScheduleDraft {
        ScheduleDraft {
            device_name: device_name.to_string(),
            target: self.target,
            state: self.state,
            time: self.time.clone(),
            days: self.days.clone(),
        }
    }
}

/// State of the schedule list of the selected device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    List,
    Create,
    Update(ScheduleId),
    Delete(ScheduleId),
}

/// Identifies one REST call: its id, the device it was issued for and what it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: RequestId,
    pub device: String,
    pub kind: RequestKind,
}

/// A schedule REST call to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleCall {
    List(String),
    Create(ScheduleDraft),
    Update(ScheduleId, ScheduleDraft),
    Delete(ScheduleId),
}

/// A call together with the ticket its answer must be applied with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub ticket: Ticket,
    pub call: ScheduleCall,
}

/// Result of running a [`ScheduleCall`].
#[derive(Debug)]
pub enum Outcome {
    Listed(Result<Vec<Schedule>, DashboardError>),
    Mutated(Result<(), DashboardError>),
}

/// What the caller has to do after [`SchedulePanel::apply`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub notice: Option<Notice>,
    pub follow_up: Option<Request>,
}

/// A panel operation refused before any request was issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error("schedule panel has no selected device")]
    Closed,

    #[error("a schedule mutation is already in flight")]
    Busy,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

impl PanelError {
    /// Notice shown to the user for this refusal.
    #[must_use]
    pub fn notice(&self) -> Notice {
        let text = match self {
            Self::Closed => "Nenhum dispositivo selecionado.",
            Self::Busy => "Aguarde a operação anterior terminar.",
            Self::Validation(ValidationError::NoDaySelected) => "Selecione pelo menos 1 dia.",
            Self::Validation(_) => "Dados do agendamento inválidos.",
            Self::NotFound(_) => "Agendamento não encontrado.",
        };
        Notice::error(text)
    }
}

/// The schedule panel and its form.
#[derive(Debug, Default)]
pub struct SchedulePanel {
    open: bool,
    devices: Vec<String>,
    selected: Option<String>,
    mode: FormMode,
    form: ScheduleForm,
    list: Option<ListState>,
    cache: Vec<Schedule>,
    pending_delete: Option<ScheduleId>,
    latest_list: Option<RequestId>,
    in_flight: Option<RequestId>,
    last_request: RequestId,
}

impl SchedulePanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.mode.clone()
    }

    #[must_use]
    pub fn form(&self) -> &ScheduleForm {
        &self.form
    }

    #[must_use]
    pub fn list_state(&self) -> Option<ListState> {
        self.list
    }

    /// Schedules of the selected device, as last loaded.
    #[must_use]
    pub fn schedules(&self) -> &[Schedule] {
        &self.cache
    }

    #[must_use]
    pub fn pending_delete(&self) -> Option<&ScheduleId> {
        self.pending_delete.as_ref()
    }

    /// `true` while a create, update or delete awaits its answer.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Open the panel for `devices`; the first one is selected and its list loaded.
    pub fn open(&mut self, devices: Vec<String>) -> Option<Request> {
        self.open = true;
        self.selected = devices.first().cloned();
        self.devices = devices;
        self.enter_create();
        self.pending_delete = None;
        self.load()
    }

    /// Hide the panel. In-flight mutations still report their notice.
    pub fn close(&mut self) {
        self.open = false;
        self.selected = None;
        self.latest_list = None;
        self.list = None;
        self.cache.clear();
        self.pending_delete = None;
        self.enter_create();
    }

    /// Replace the device choices without touching the selection or the form.
    pub fn set_devices(&mut self, devices: Vec<String>) {
        self.devices = devices;
    }

    /// Switch to another device: reload its list and return to create mode.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Closed`] when the panel is not open.
    pub fn select_device(&mut self, device: &str) -> Result<Request, PanelError> {
        if !self.open {
            return Err(PanelError::Closed);
        }
        self.selected = Some(device.to_string());
        self.enter_create();
        self.pending_delete = None;
        self.load().ok_or(PanelError::Closed)
    }

    /// Enter edit mode for a cached schedule, copying its fields into the form.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NotFound`] when `id` is not in the loaded list.
    pub fn begin_edit(&mut self, id: ScheduleId) -> Result<(), PanelError> {
        let schedule = self.cached(&id)?;
        self.form = ScheduleForm::from_schedule(schedule);
        self.mode = FormMode::Edit(id);
        Ok(())
    }

    /// Leave edit mode and reset the form.
    pub fn cancel_edit(&mut self) {
        self.enter_create();
    }

    /// Submit the form: create in create mode, update in edit mode.
    ///
    /// The submitted values are kept in the form whatever the outcome.
    ///
    /// # Errors
    ///
    /// - [`PanelError::Closed`] when no device is selected
    /// - [`PanelError::Busy`] when another mutation is in flight
    /// - [`PanelError::Validation`] when no day is selected
    pub fn submit(&mut self, form: ScheduleForm) -> Result<Request, PanelError> {
        let device = match (&self.selected, self.open) {
            (Some(device), true) => device.clone(),
            _ => return Err(PanelError::Closed),
        };
        self.form = form;
        if self.is_busy() {
            return Err(PanelError::Busy);
        }
        let draft = self.form.to_draft(&device);
        draft.validate()?;
        let request = match self.mode.clone() {
            FormMode::Create => self.issue(device, RequestKind::Create, ScheduleCall::Create(draft)),
            FormMode::Edit(id) => self.issue(
                device,
                RequestKind::Update(id.clone()),
                ScheduleCall::Update(id, draft),
            ),
        };
        self.in_flight = Some(request.ticket.id);
        Ok(request)
    }

    /// Ask for confirmation before deleting `id`.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NotFound`] when `id` is not in the loaded list.
    pub fn request_delete(&mut self, id: ScheduleId) -> Result<(), PanelError> {
        self.cached(&id)?;
        self.pending_delete = Some(id);
        Ok(())
    }

    /// Drop the pending confirmation.
    pub fn dismiss_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Confirm the pending deletion. Does nothing when nothing is pending.
    ///
    /// # Errors
    ///
    /// - [`PanelError::Closed`] when no device is selected
    /// - [`PanelError::Busy`] when another mutation is in flight
    pub fn confirm_delete(&mut self) -> Result<Option<Request>, PanelError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(None);
        };
        let Some(device) = self.selected.clone() else {
            return Err(PanelError::Closed);
        };
        if self.is_busy() {
            return Err(PanelError::Busy);
        }
        let request = self.issue(
            device,
            RequestKind::Delete(id.clone()),
            ScheduleCall::Delete(id),
        );
        self.in_flight = Some(request.ticket.id);
        Ok(Some(request))
    }

    /// Apply the outcome of a request issued by this panel.
    pub fn apply(&mut self, ticket: &Ticket, outcome: Outcome) -> Applied {
        match (&ticket.kind, outcome) {
            (RequestKind::List, Outcome::Listed(result)) => {
                self.apply_list(ticket, result);
                Applied::default()
            }
            (kind, Outcome::Mutated(result)) if *kind != RequestKind::List => {
                self.apply_mutation(ticket, result)
            }
            (kind, _) => {
                tracing::warn!(ticket = %ticket.id, ?kind, "outcome does not match request kind");
                Applied::default()
            }
        }
    }

    /// Render-ready view, `None` while closed.
    #[must_use]
    pub fn view(&self) -> Option<PanelView> {
        if !self.open {
            return None;
        }
        let selected = self.selected.clone().unwrap_or_default();
        let mut devices: Vec<DeviceOption> = self
            .devices
            .iter()
            .map(|name| DeviceOption {
                name: name.clone(),
                selected: *name == selected,
            })
            .collect();
        if !selected.is_empty() && !self.devices.contains(&selected) {
            devices.insert(
                0,
                DeviceOption {
                    name: selected.clone(),
                    selected: true,
                },
            );
        }
        let list = match self.list {
            None if selected.is_empty() => ScheduleListView::Empty,
            None | Some(ListState::Loading) => ScheduleListView::Loading,
            Some(ListState::Failed) => ScheduleListView::Failed,
            Some(ListState::Loaded) if self.cache.is_empty() => ScheduleListView::Empty,
            Some(ListState::Loaded) => {
                ScheduleListView::Items(self.cache.iter().map(ScheduleItemView::from).collect())
            }
        };
        Some(PanelView {
            devices,
            selected,
            list,
            form: FormView::new(&self.mode, &self.form),
            pending_delete: self.pending_delete.clone(),
            busy: self.is_busy(),
        })
    }

    fn cached(&self, id: &ScheduleId) -> Result<&Schedule, NotFoundError> {
        self.cache
            .iter()
            .find(|schedule| schedule.id == *id)
            .ok_or_else(|| NotFoundError {
                entity: "Schedule",
                id: id.to_string(),
            })
    }

    fn enter_create(&mut self) {
        self.mode = FormMode::Create;
        self.form = ScheduleForm::default();
    }

    fn is_current(&self, device: &str) -> bool {
        self.open && self.selected.as_deref() == Some(device)
    }

    fn issue(&mut self, device: String, kind: RequestKind, call: ScheduleCall) -> Request {
        self.last_request = self.last_request.next();
        Request {
            ticket: Ticket {
                id: self.last_request,
                device,
                kind,
            },
            call,
        }
    }

    fn load(&mut self) -> Option<Request> {
        let device = self.selected.clone()?;
        let request = self.issue(
            device.clone(),
            RequestKind::List,
            ScheduleCall::List(device),
        );
        self.latest_list = Some(request.ticket.id);
        self.list = Some(ListState::Loading);
        self.cache.clear();
        Some(request)
    }

    fn apply_list(&mut self, ticket: &Ticket, result: Result<Vec<Schedule>, DashboardError>) {
        if self.latest_list != Some(ticket.id) || !self.is_current(&ticket.device) {
            tracing::debug!(ticket = %ticket.id, device = %ticket.device, "discarding stale schedule list");
            return;
        }
        self.latest_list = None;
        match result {
            Ok(schedules) => {
                self.cache = schedules;
                self.list = Some(ListState::Loaded);
            }
            Err(_) => {
                self.list = Some(ListState::Failed);
            }
        }
    }

    fn apply_mutation(&mut self, ticket: &Ticket, result: Result<(), DashboardError>) -> Applied {
        if self.in_flight == Some(ticket.id) {
            self.in_flight = None;
        }
        let current = self.is_current(&ticket.device);
        match result {
            Ok(()) => {
                let notice = match &ticket.kind {
                    RequestKind::Create => Some(Notice::info(CREATED)),
                    RequestKind::Update(_) => Some(Notice::info(UPDATED)),
                    RequestKind::Delete(_) | RequestKind::List => None,
                };
                if !current {
                    return Applied {
                        notice,
                        follow_up: None,
                    };
                }
                let reset_form = match (&ticket.kind, &self.mode) {
                    (RequestKind::Delete(id), FormMode::Edit(editing)) => id == editing,
                    (RequestKind::Delete(_), FormMode::Create) => false,
                    _ => true,
                };
                if reset_form {
                    self.enter_create();
                }
                Applied {
                    notice,
                    follow_up: self.load(),
                }
            }
            Err(DashboardError::Rejected(_)) => {
                let text = match &ticket.kind {
                    RequestKind::Update(_) => UPDATE_FAILED,
                    RequestKind::Delete(_) => DELETE_FAILED,
                    RequestKind::Create | RequestKind::List => CREATE_FAILED,
                };
                Applied {
                    notice: Some(Notice::error(text)),
                    follow_up: None,
                }
            }
            Err(_) => Applied {
                notice: Some(Notice::error(CONNECTION_FAILED)),
                follow_up: None,
            },
        }
    }
}
