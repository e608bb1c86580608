//! Reusable UI components for the boarding pass TUI

pub mod form_field;
pub mod result_panel;

pub use form_field::{DropdownOption, FormField, FormFieldType};
pub use result_panel::ResultPanel;
