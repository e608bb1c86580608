//! Form field component for user input

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::ui::Styles;

/// Type of form field
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    Text,
    Dropdown,
}

/// Selectable dropdown entry: stored value plus shown label
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Individual form field
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub field_type: FormFieldType,
    pub is_focused: bool,
    /// Cursor position in characters
    pub cursor_position: usize,
    pub max_len: Option<usize>,
    pub char_filter: Option<fn(char) -> bool>,
    pub dropdown_options: Vec<DropdownOption>,
    pub dropdown_state: ListState,
    pub show_dropdown: bool,
}

impl FormField {
    pub fn new(label: &str, field_type: FormFieldType) -> Self {
        Self {
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            field_type,
            is_focused: false,
            cursor_position: 0,
            max_len: None,
            char_filter: None,
            dropdown_options: Vec::new(),
            dropdown_state: ListState::default(),
            show_dropdown: false,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn with_char_filter(mut self, filter: fn(char) -> bool) -> Self {
        self.char_filter = Some(filter);
        self
    }

    pub fn with_dropdown_options(mut self, options: Vec<DropdownOption>) -> Self {
        self.dropdown_options = options;
        if !self.dropdown_options.is_empty() {
            self.dropdown_state.select(Some(0));
        }
        self
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
        if !focused {
            self.show_dropdown = false;
        }
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert a character at the cursor. Returns whether the value changed.
    pub fn insert_char(&mut self, c: char) -> bool {
        if self.field_type == FormFieldType::Dropdown {
            return false;
        }
        if let Some(filter) = self.char_filter {
            if !filter(c) {
                return false;
            }
        }
        if let Some(max_len) = self.max_len {
            if self.char_count() >= max_len {
                return false;
            }
        }
        let offset = self.byte_offset(self.cursor_position);
        self.value.insert(offset, c);
        self.cursor_position += 1;
        true
    }

    pub fn delete_char(&mut self) -> bool {
        if self.field_type == FormFieldType::Dropdown || self.cursor_position == 0 {
            return false;
        }
        self.cursor_position -= 1;
        let offset = self.byte_offset(self.cursor_position);
        self.value.remove(offset);
        true
    }

    pub fn delete_char_forward(&mut self) -> bool {
        if self.field_type == FormFieldType::Dropdown || self.cursor_position >= self.char_count() {
            return false;
        }
        let offset = self.byte_offset(self.cursor_position);
        self.value.remove(offset);
        true
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.char_count();
    }

    /// Replace the value with the stored form value, keeping the cursor in range
    pub fn sync_value(&mut self, value: &str) {
        if self.value != value {
            let before = self.char_count();
            self.value = value.to_string();
            // Upper-casing can expand a character ("ß" to "SS")
            let after = self.char_count();
            if after > before {
                self.cursor_position += after - before;
            }
        }
        self.cursor_position = self.cursor_position.min(self.char_count());
        if self.field_type == FormFieldType::Dropdown {
            let index = self
                .dropdown_options
                .iter()
                .position(|option| option.value == self.value);
            self.dropdown_state.select(index.or(Some(0)));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Text shown in the field: the option label for dropdowns, else the raw value
    pub fn display_value(&self) -> &str {
        match self.field_type {
            FormFieldType::Dropdown => self
                .dropdown_options
                .iter()
                .find(|option| !option.value.is_empty() && option.value == self.value)
                .map(|option| option.label.as_str())
                .unwrap_or(""),
            FormFieldType::Text => &self.value,
        }
    }

    pub fn toggle_dropdown(&mut self) {
        if self.field_type == FormFieldType::Dropdown && !self.dropdown_options.is_empty() {
            self.show_dropdown = !self.show_dropdown;
        }
    }

    pub fn close_dropdown(&mut self) {
        self.show_dropdown = false;
    }

    /// Handle dropdown navigation
    pub fn dropdown_up(&mut self) {
        if self.dropdown_options.is_empty() {
            return;
        }
        let selected = self.dropdown_state.selected().unwrap_or(0);
        let new_selected = if selected == 0 {
            self.dropdown_options.len() - 1
        } else {
            selected - 1
        };
        self.dropdown_state.select(Some(new_selected));
    }

    pub fn dropdown_down(&mut self) {
        if self.dropdown_options.is_empty() {
            return;
        }
        let selected = self.dropdown_state.selected().unwrap_or(0);
        let new_selected = (selected + 1) % self.dropdown_options.len();
        self.dropdown_state.select(Some(new_selected));
    }

    /// Commit the highlighted option, returning its value
    pub fn select_dropdown_value(&mut self) -> Option<String> {
        let selected = self.dropdown_state.selected()?;
        let value = self.dropdown_options.get(selected)?.value.clone();
        self.value = value.clone();
        self.cursor_position = self.char_count();
        self.show_dropdown = false;
        Some(value)
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let shown = self.display_value();
        let display_text = if shown.is_empty() && !self.placeholder.is_empty() {
            self.placeholder.as_str()
        } else {
            shown
        };

        let border_style = if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let title = if self.field_type == FormFieldType::Dropdown {
            format!("{} ▾", self.label)
        } else {
            self.label.clone()
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let text_style = if shown.is_empty() && !self.placeholder.is_empty() {
            Styles::inactive()
        } else {
            Styles::default()
        };

        let paragraph = Paragraph::new(display_text.to_string())
            .style(text_style)
            .block(block);

        f.render_widget(paragraph, area);

        // Render cursor if focused and not a dropdown
        if self.is_focused && self.field_type != FormFieldType::Dropdown {
            let before_cursor: String = self.value.chars().take(self.cursor_position).collect();
            let cursor_x = area.x + 1 + before_cursor.width() as u16;
            let cursor_y = area.y + 1;
            if cursor_x < (area.x + area.width).saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }

    /// Render dropdown if visible
    pub fn render_dropdown(&mut self, f: &mut Frame, area: Rect) {
        if !self.show_dropdown || self.dropdown_options.is_empty() || area.height == 0 {
            return;
        }

        let items: Vec<ListItem> = self
            .dropdown_options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if Some(i) == self.dropdown_state.selected() {
                    Styles::selected()
                } else {
                    Style::default()
                };
                ListItem::new(option.label.clone()).style(style)
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::active_border());

        let list = List::new(items).block(block);

        f.render_widget(Clear, area);
        f.render_stateful_widget(list, area, &mut self.dropdown_state);
    }

    /// Rows needed to show every dropdown option
    pub fn dropdown_height(&self) -> u16 {
        self.dropdown_options.len() as u16 + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airline_dropdown() -> FormField {
        FormField::new("Select Airline", FormFieldType::Dropdown).with_dropdown_options(vec![
            DropdownOption::new("", "Choose your airline"),
            DropdownOption::new("indigo", "IndiGo"),
            DropdownOption::new("akasa", "Akasa Air"),
        ])
    }

    #[test]
    fn test_text_editing() {
        let mut field = FormField::new("Last Name", FormFieldType::Text);
        for c in "RAO".chars() {
            assert!(field.insert_char(c));
        }
        field.move_cursor_to_start();
        field.insert_char('X');
        assert_eq!(field.value, "XRAO");

        field.move_cursor_to_end();
        assert!(field.delete_char());
        assert_eq!(field.value, "XRA");

        field.move_cursor_to_start();
        assert!(field.delete_char_forward());
        assert_eq!(field.value, "RA");
        assert!(!field.delete_char());
    }

    #[test]
    fn test_multibyte_editing() {
        let mut field = FormField::new("Last Name", FormFieldType::Text);
        for c in "MÜLLER".chars() {
            field.insert_char(c);
        }
        field.move_cursor_left();
        field.move_cursor_left();
        field.move_cursor_left();
        field.move_cursor_left();
        assert!(field.delete_char());
        assert_eq!(field.value, "MLLER");
    }

    #[test]
    fn test_filter_and_max_len() {
        let mut field = FormField::new("PNR", FormFieldType::Text)
            .with_max_len(6)
            .with_char_filter(|c| c.is_ascii_alphanumeric());

        assert!(!field.insert_char('-'));
        for c in "abc1234".chars() {
            field.insert_char(c);
        }
        assert_eq!(field.value, "abc123");
    }

    #[test]
    fn test_sync_value_clamps_cursor() {
        let mut field = FormField::new("PNR", FormFieldType::Text);
        for c in "abc".chars() {
            field.insert_char(c);
        }
        field.sync_value("AB");
        assert_eq!(field.value, "AB");
        assert_eq!(field.cursor_position, 2);
    }

    #[test]
    fn test_dropdown_selection() {
        let mut field = airline_dropdown();
        assert!(!field.insert_char('x'));
        assert_eq!(field.display_value(), "");

        field.toggle_dropdown();
        assert!(field.show_dropdown);
        field.dropdown_down();
        assert_eq!(field.select_dropdown_value(), Some("indigo".to_string()));
        assert!(!field.show_dropdown);
        assert_eq!(field.display_value(), "IndiGo");

        field.dropdown_up();
        assert_eq!(field.select_dropdown_value(), Some(String::new()));
        assert_eq!(field.display_value(), "");
    }

    #[test]
    fn test_dropdown_wraps_and_syncs() {
        let mut field = airline_dropdown();
        field.dropdown_up();
        assert_eq!(field.dropdown_state.selected(), Some(2));
        field.dropdown_down();
        assert_eq!(field.dropdown_state.selected(), Some(0));

        field.sync_value("akasa");
        assert_eq!(field.dropdown_state.selected(), Some(2));
        field.sync_value("unknown");
        assert_eq!(field.dropdown_state.selected(), Some(0));
    }
}
