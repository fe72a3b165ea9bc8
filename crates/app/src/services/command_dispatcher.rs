//! Command dispatcher — turns a toggle click into a hub command.
//!
//! The dispatcher never mutates device state. The hub's next device broadcast
//! is the only thing that changes what the dashboard shows.

use relaydash_domain::device::{DeviceSet, Target};
use relaydash_domain::message::{CommandStyle, OutboundMessage};

use crate::message_log::MessageLog;
use crate::ports::HubChannel;

/// Application service for relay toggles.
pub struct CommandDispatcher<H> {
    hub: H,
    style: CommandStyle,
}

impl<H: HubChannel> CommandDispatcher<H> {
    pub fn new(hub: H, style: CommandStyle) -> Self {
        Self { hub, style }
    }

    /// Command that toggles `target` on `device`, or `None` when the device
    /// is unknown or not connected.
    #[must_use]
    pub fn plan(&self, devices: &DeviceSet, device: &str, target: Target) -> Option<OutboundMessage> {
        let state = devices.get(device).filter(|state| state.connected)?;
        let next = state.relay(target).toggled();
        Some(self.style.command(device, target, next))
    }

    /// Toggle `target` on `device`, appending the outcome to `log`.
    ///
    /// Emit failures are traced and logged; they never reach the caller.
    #[tracing::instrument(skip(self, devices, log))]
    pub async fn toggle(
        &self,
        devices: &DeviceSet,
        device: &str,
        target: Target,
        log: &mut MessageLog,
    ) {
        let Some(command) = self.plan(devices, device, target) else {
            log.push(format!("Erro: Dispositivo {device} está Offline."));
            return;
        };
        let line = format!(
            "{device} -> {} -> {}",
            command.target().as_str().to_uppercase(),
            command.state().as_str().to_uppercase()
        );
        match self.hub.emit(command).await {
            Ok(()) => log.push(format!("Comando enviado: {line}")),
            Err(err) => {
                tracing::error!(error = %err, "failed to emit command");
                log.push(format!("Erro: comando não enviado: {line}"));
            }
        }
    }
}
