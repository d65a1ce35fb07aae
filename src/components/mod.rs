//! UI Components
//!
//! Reusable Leptos components.

mod compose_mode_selector;
mod delete_confirm_button;
mod field_area;
mod intent_grid;
mod output_panel;
mod parts_editor;
mod predictor_bar;
mod settings_panel;
mod template_manager;

pub use compose_mode_selector::ComposeModeSelector;
pub use delete_confirm_button::DeleteConfirmButton;
pub use field_area::FieldArea;
pub use intent_grid::IntentGrid;
pub use output_panel::OutputPanel;
pub use parts_editor::PartsEditor;
pub use predictor_bar::PredictorBar;
pub use settings_panel::SettingsPanel;
pub use template_manager::TemplateManager;
