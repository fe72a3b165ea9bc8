//! Dashboard state — everything shown on the page, owned by the controller.

use relaydash_domain::device::DeviceSet;
use relaydash_domain::message::InboundMessage;
use relaydash_domain::status::{HubStatus, StatusIndicator};

use crate::message_log::{LogEntry, MessageLog};
use crate::notice::Notice;
use crate::ports::HubEvent;
use crate::schedule_panel::SchedulePanel;
use crate::view::{DashboardView, PanelView, Placeholder, render_devices};

/// Notices shown at once; older ones are dropped.
pub const MAX_NOTICES: usize = 3;

/// Life cycle of the real-time channel as seen by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Connection {
    /// No attempt has finished yet.
    #[default]
    Connecting,
    Connected { sid: Option<String> },
    /// The channel dropped after being established.
    Disconnected,
    /// The last connection attempt failed.
    Unreachable(String),
}

/// Mutable dashboard state. Only ever touched by one task.
#[derive(Debug)]
pub struct DashboardState {
    devices: DeviceSet,
    hub_status: HubStatus,
    connection: Connection,
    log: MessageLog,
    panel: SchedulePanel,
    notices: Vec<Notice>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(crate::message_log::DEFAULT_CAPACITY)
    }
}

impl DashboardState {
    #[must_use]
    pub fn new(log_capacity: usize) -> Self {
        Self {
            devices: DeviceSet::new(),
            hub_status: HubStatus::default(),
            connection: Connection::default(),
            log: MessageLog::with_capacity(log_capacity),
            panel: SchedulePanel::new(),
            notices: Vec::new(),
        }
    }

    /// Devices to read from and the log to write to, borrowed together.
    pub fn devices_and_log(&mut self) -> (&DeviceSet, &mut MessageLog) {
        (&self.devices, &mut self.log)
    }

    pub fn devices(&self) -> &DeviceSet {
        &self.devices
    }

    pub fn panel_mut(&mut self) -> &mut SchedulePanel {
        &mut self.panel
    }

    /// Queue a notice; only the newest [`MAX_NOTICES`] are kept.
    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
        let overflow = self.notices.len().saturating_sub(MAX_NOTICES);
        self.notices.drain(..overflow);
    }

    pub fn dismiss_notices(&mut self) {
        self.notices.clear();
    }

    /// Apply something that happened on the real-time channel.
    pub fn apply_hub_event(&mut self, event: HubEvent) {
        match event {
            HubEvent::Connected { sid } => {
                self.log.push(format!(
                    "Conectado ao Hub (SID: {}).",
                    sid.as_deref().unwrap_or("-")
                ));
                self.connection = Connection::Connected { sid };
            }
            HubEvent::Disconnected => {
                self.log.push("Desconectado do Hub.");
                self.connection = Connection::Disconnected;
                self.hub_status = HubStatus::Pending(HubStatus::DISCONNECTED.to_string());
                self.replace_devices(DeviceSet::new());
            }
            HubEvent::ConnectFailed { reason } => {
                if !matches!(self.connection, Connection::Unreachable(_)) {
                    self.log
                        .push("Erro: Não foi possível conectar ao Hub. Tentando reconectar...");
                }
                self.connection = Connection::Unreachable(reason);
                self.replace_devices(DeviceSet::new());
            }
            HubEvent::Message(message) => self.apply_message(message),
        }
    }

    fn apply_message(&mut self, message: InboundMessage) {
        match message {
            InboundMessage::EspStatus(update) => {
                self.hub_status = HubStatus::parse(&update.status);
                self.log.push(format!(
                    "Status atualizado: {} agora está {}.",
                    update.name.as_deref().unwrap_or("ESP32"),
                    update.status
                ));
            }
            InboundMessage::Log(line) => {
                self.log.push(format!("HUB: {}", line.message));
            }
            InboundMessage::Devices(devices) => {
                self.log
                    .push("Lista de dispositivos atualizada recebida do Hub.");
                self.replace_devices(devices);
            }
        }
    }

    fn replace_devices(&mut self, devices: DeviceSet) {
        self.panel.set_devices(devices.names());
        self.devices = devices;
    }

    /// Immutable, render-ready copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        let dashboard = match self.connection {
            Connection::Disconnected => DashboardView::Placeholder(Placeholder::Disconnected),
            Connection::Unreachable(_) => DashboardView::Placeholder(Placeholder::Unreachable),
            Connection::Connecting | Connection::Connected { .. } => render_devices(&self.devices),
        };
        DashboardSnapshot {
            status: self.hub_status.indicator(),
            connected: matches!(self.connection, Connection::Connected { .. }),
            dashboard,
            log: self.log.entries().cloned().collect(),
            notices: self.notices.clone(),
            panel: self.panel.view(),
        }
    }
}

/// What the page shows at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub status: StatusIndicator,
    pub connected: bool,
    pub dashboard: DashboardView,
    /// Newest first.
    pub log: Vec<LogEntry>,
    pub notices: Vec<Notice>,
    pub panel: Option<PanelView>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        DashboardState::default().snapshot()
    }
}
