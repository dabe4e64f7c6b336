//! Single-line text inputs and multi-field forms.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// An editable line with a character-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
    masked: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input whose content renders as `*`.
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// What to draw: the value, or stars for masked inputs.
    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    fn byte_pos(&self, char_pos: usize) -> usize {
        self.value.chars().take(char_pos).map(|ch| ch.len_utf8()).sum()
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = self.byte_pos(self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let byte_pos = self.byte_pos(self.cursor - 1);
            self.value.remove(byte_pos);
            self.cursor -= 1;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let byte_pos = self.byte_pos(self.cursor);
            self.value.remove(byte_pos);
        }
    }

    /// Apply an editing key. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }

        match key.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.chars().count(),
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub input: TextInput,
    pub error: Option<String>,
}

/// Ordered fields with one focused; errors attach to fields by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: Vec<FormField>,
    focus: usize,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, label: &'static str) -> Self {
        self.fields.push(FormField {
            name,
            label,
            input: TextInput::new(),
            error: None,
        });
        self
    }

    pub fn masked_field(mut self, name: &'static str, label: &'static str) -> Self {
        self.fields.push(FormField {
            name,
            label,
            input: TextInput::masked(),
            error: None,
        });
        self
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_name(&self) -> Option<&'static str> {
        self.fields.get(self.focus).map(|f| f.name)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn focus_field(&mut self, name: &str) {
        if let Some(index) = self.fields.iter().position(|f| f.name == name) {
            self.focus = index;
        }
    }

    pub fn value(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.input.value())
            .unwrap_or("")
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.input.set_value(value);
        }
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.error.as_deref())
    }

    /// Attach an error to `name` and move focus there.
    pub fn set_error(&mut self, name: &str, message: impl Into<String>) {
        if let Some(index) = self.fields.iter().position(|f| f.name == name) {
            self.fields[index].error = Some(message.into());
            self.focus = index;
        }
    }

    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| f.error.is_some())
    }

    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.error = None;
        }
    }

    /// Empty every field and focus the first one.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.input.clear();
            field.error = None;
        }
        self.focus = 0;
    }

    /// Feed an editing key to the focused field.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.fields.get_mut(self.focus) {
            Some(field) => {
                let consumed = field.input.handle_key(key);
                if consumed {
                    field.error = None;
                }
                consumed
            }
            None => false,
        }
    }
}
