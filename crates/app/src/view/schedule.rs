//! Schedule panel view — device selector, schedule list and form.

use relaydash_domain::device::{RelayState, Target};
use relaydash_domain::id::ScheduleId;
use relaydash_domain::schedule::{Schedule, Weekday};

use crate::schedule_panel::{FormMode, ScheduleForm};

/// Confirmation asked before a deletion.
pub const CONFIRM_DELETE: &str = "Deseja realmente excluir este agendamento?";

/// One entry of the schedule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleItemView {
    pub id: ScheduleId,
    /// `07:30 — ON`
    pub headline: String,
    pub target_title: &'static str,
    /// `Repetir: MON, WED`
    pub repeat: String,
}

impl From<&Schedule> for ScheduleItemView {
    fn from(schedule: &Schedule) -> Self {
        Self {
            id: schedule.id.clone(),
            headline: format!(
                "{} — {}",
                schedule.time,
                schedule.state.as_str().to_uppercase()
            ),
            target_title: schedule.target.title(),
            repeat: format!("Repetir: {}", schedule.days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleListView {
    Loading,
    Failed,
    Empty,
    Items(Vec<ScheduleItemView>),
}

impl ScheduleListView {
    /// Text shown instead of entries, if any.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some("Carregando agendamentos..."),
            Self::Failed => Some("Erro ao carregar agendamentos."),
            Self::Empty => Some("Nenhum agendamento encontrado."),
            Self::Items(_) => None,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[ScheduleItemView] {
        match self {
            Self::Items(items) => items,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOption {
    pub name: String,
    pub selected: bool,
}

/// An `<option>` of a fixed select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// A weekday checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOption {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub editing: Option<ScheduleId>,
    pub targets: Vec<SelectOption>,
    pub states: Vec<SelectOption>,
    pub time: String,
    pub days: Vec<DayOption>,
    pub submit_label: &'static str,
    pub submit_class: &'static str,
    pub show_cancel: bool,
}

impl FormView {
    #[must_use]
    pub fn new(mode: &FormMode, form: &ScheduleForm) -> Self {
        let editing = match mode {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id.clone()),
        };
        let (submit_label, submit_class) = if editing.is_some() {
            ("Atualizar Agendamento", "bg-green-600")
        } else {
            ("Adicionar Agendamento", "bg-blue-600")
        };
        let show_cancel = editing.is_some();
        Self {
            editing,
            targets: Target::ALL
                .into_iter()
                .map(|target| SelectOption {
                    value: target.as_str(),
                    label: target.title(),
                    selected: target == form.target,
                })
                .collect(),
            states: [RelayState::On, RelayState::Off]
                .into_iter()
                .map(|state| SelectOption {
                    value: state.as_str(),
                    label: if state.is_on() { "Ligar" } else { "Desligar" },
                    selected: state == form.state,
                })
                .collect(),
            time: form.time.clone(),
            days: Weekday::ALL
                .into_iter()
                .map(|day| DayOption {
                    value: day.as_str(),
                    label: day.short_label(),
                    checked: form.days.contains(day),
                })
                .collect(),
            submit_label,
            submit_class,
            show_cancel,
        }
    }
}

/// The open schedule panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub devices: Vec<DeviceOption>,
    pub selected: String,
    pub list: ScheduleListView,
    pub form: FormView,
    pub pending_delete: Option<ScheduleId>,
    pub busy: bool,
}
