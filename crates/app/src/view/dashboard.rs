//! Device dashboard view — one card per device, two toggles per card.

use relaydash_domain::device::{DeviceSet, DeviceState, RelayState, Target};
use relaydash_domain::status::{HubStatus, StatusIndicator};

/// A single relay toggle control.
///
/// Label, color and enabled flag are a pure function of `(state, connected)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleView {
    pub device: String,
    pub target: Target,
    pub title: &'static str,
    pub button_label: &'static str,
    pub button_class: &'static str,
    pub relay_label: String,
    pub icon_class: &'static str,
    pub disabled: bool,
}

impl ToggleView {
    #[must_use]
    pub fn new(device: &str, target: Target, state: RelayState, connected: bool) -> Self {
        let relay = target.relay_number();
        let (button_label, button_class, relay_state, icon_class) = match (connected, state) {
            (false, _) => ("Offline", "bg-gray-400", "Offline", "text-gray-400"),
            (true, RelayState::On) => ("Desligar", "bg-green-600", "Ligado", "text-yellow-600"),
            (true, RelayState::Off) => ("Ligar", "bg-red-600", "Desligado", "text-gray-400"),
        };
        Self {
            device: device.to_string(),
            target,
            title: target.title(),
            button_label,
            button_class,
            relay_label: format!("Relé {relay}: {relay_state}"),
            icon_class,
            disabled: !connected,
        }
    }
}

/// The block rendered for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCardView {
    pub name: String,
    pub connected: bool,
    pub status: StatusIndicator,
    pub card_class: &'static str,
    pub toggles: Vec<ToggleView>,
}

impl DeviceCardView {
    #[must_use]
    pub fn new(name: &str, state: &DeviceState) -> Self {
        let status = if state.connected {
            HubStatus::Online
        } else {
            HubStatus::Offline
        };
        Self {
            name: name.to_string(),
            connected: state.connected,
            status: status.indicator(),
            card_class: if state.connected {
                "opacity-100"
            } else {
                "opacity-60 grayscale"
            },
            toggles: Target::ALL
                .into_iter()
                .map(|target| ToggleView::new(name, target, state.relay(target), state.connected))
                .collect(),
        }
    }

    /// The toggle for `target`.
    #[must_use]
    pub fn toggle(&self, target: Target) -> Option<&ToggleView> {
        self.toggles.iter().find(|t| t.target == target)
    }
}

/// Message shown instead of device cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Connected, but the hub knows no devices.
    NoDevices,
    /// The channel dropped and is reconnecting.
    Disconnected,
    /// The channel could not be established.
    Unreachable,
}

impl Placeholder {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::NoDevices => "Nenhum microcontrolador encontrado.",
            Self::Disconnected => "Desconectado. Tentando reconectar...",
            Self::Unreachable => "Erro: Não foi possível conectar ao Hub. Tentando reconectar...",
        }
    }

    #[must_use]
    pub const fn detail(self) -> &'static str {
        match self {
            Self::NoDevices => "Aguardando dispositivos se conectarem...",
            Self::Disconnected | Self::Unreachable => "",
        }
    }
}

/// The whole device area of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    Placeholder(Placeholder),
    Devices(Vec<DeviceCardView>),
}

impl DashboardView {
    /// Card of the device called `name`, if rendered.
    #[must_use]
    pub fn card(&self, name: &str) -> Option<&DeviceCardView> {
        match self {
            Self::Devices(cards) => cards.iter().find(|c| c.name == name),
            Self::Placeholder(_) => None,
        }
    }
}

/// Render every device, or the empty placeholder.
#[must_use]
pub fn render_devices(devices: &DeviceSet) -> DashboardView {
    if devices.is_empty() {
        return DashboardView::Placeholder(Placeholder::NoDevices);
    }
    DashboardView::Devices(
        devices
            .iter()
            .map(|(name, state)| DeviceCardView::new(name, state))
            .collect(),
    )
}
