use serde::{Deserialize, Serialize};

/// One entry of a select control. `id` is what gets posted back to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
}

impl SelectOption {
    /// Server-rendered options use the label as their id
    pub fn labelled(label: &str) -> Self {
        Self {
            id: label.to_owned(),
            label: label.to_owned(),
        }
    }
}

/// Which of a camera's select controls a response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectKind {
    Station,
    Focus,
}

impl SelectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectKind::Station => "station",
            SelectKind::Focus => "focus",
        }
    }
}

/// Model behind a station or focus combo box
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectControl {
    options: Vec<SelectOption>,
    selected: Option<usize>,
}

impl SelectControl {
    pub fn with_choices<S: AsRef<str>>(choices: &[S]) -> Self {
        Self {
            options: choices.iter().map(|c| SelectOption::labelled(c.as_ref())).collect(),
            selected: None,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&SelectOption> {
        self.selected.and_then(|i| self.options.get(i))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected().map(|o| o.id.as_str())
    }

    pub fn selected_label(&self) -> &str {
        self.selected().map(|o| o.label.as_str()).unwrap_or("")
    }

    /// Select the option whose id is `id`. Returns false when there is none.
    pub fn select_id(&mut self, id: &str) -> bool {
        match self.options.iter().position(|o| o.id == id) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    /// Apply a value fetched from the server.
    ///
    /// An option for `value` is appended only when `value` equals
    /// `default_label` (the "not set" placeholder), never when the value is
    /// merely missing from the list. The matching option is then selected;
    /// if there is none the selection is left as it was.
    pub fn apply_fetched(&mut self, value: &str, default_label: &str) -> bool {
        if value == default_label {
            self.options.push(SelectOption::labelled(value));
        }
        self.select_id(value)
    }
}
