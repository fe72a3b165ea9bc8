//! View models — pure, render-ready projections of the dashboard state.
//!
//! Adapters turn these into markup; nothing here knows about HTML.

pub mod dashboard;
pub mod schedule;

pub use dashboard::{DashboardView, DeviceCardView, Placeholder, ToggleView, render_devices};
pub use schedule::{
    CONFIRM_DELETE, DayOption, DeviceOption, FormView, PanelView, ScheduleItemView,
    ScheduleListView, SelectOption,
};
