//! Column and form-field descriptors
//!
//! Descriptors carry no behavior; they are configuration the engine's
//! renderer consumes. Input kinds are a closed enumeration: a page cannot
//! invent a kind the renderer does not know.

use serde_json::Value;

use super::Row;

/// Recognized form input kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Number,
    Select,
    MultiSelect,
    Autocomplete,
    MultiAutocomplete,
    Date,
    DateTime,
    Checkbox,
    Radio,
    /// Read-only display of a value, no input.
    Label,
}

/// One entry of an option list for select-like kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

pub type ValueFormatter = fn(&Value) -> String;

/// Declarative description of one form input.
#[derive(Clone)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Layout span on a 12-column grid.
    pub col_span: u8,
    pub options: Vec<SelectOption>,
    pub read_only: bool,
    pub default_value: Option<Value>,
    pub format: Option<ValueFormatter>,
}

impl Field {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            col_span: 12,
            options: Vec::new(),
            read_only: false,
            default_value: None,
            format: None,
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn textarea(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::TextArea)
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn select(name: &'static str, label: &'static str, options: Vec<SelectOption>) -> Self {
        Self::new(name, label, FieldKind::Select).with_options(options)
    }

    pub fn multi_autocomplete(
        name: &'static str,
        label: &'static str,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(name, label, FieldKind::MultiAutocomplete).with_options(options)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn col_span(mut self, span: u8) -> Self {
        self.col_span = span;
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn format(mut self, format: ValueFormatter) -> Self {
        self.format = Some(format);
        self
    }

    /// Render a value for read-only display: the custom formatter when set,
    /// the matching option label(s) for select-like kinds, plain rendering
    /// otherwise.
    pub fn display(&self, value: &Value) -> String {
        if let Some(format) = self.format {
            return format(value);
        }
        if !self.options.is_empty() {
            return match value {
                Value::Array(values) => values
                    .iter()
                    .map(|v| self.option_label(v))
                    .collect::<Vec<_>>()
                    .join(", "),
                other => self.option_label(other),
            };
        }
        render_scalar(value)
    }

    fn option_label(&self, value: &Value) -> String {
        self.options
            .iter()
            .find(|option| option.value == *value)
            .map(|option| option.label.clone())
            .unwrap_or_else(|| render_scalar(value))
    }
}

pub type RowFormatter = fn(&Row) -> String;

/// Declarative description of one list column.
#[derive(Clone)]
pub struct Column {
    pub field: &'static str,
    pub header: &'static str,
    pub width: Option<u16>,
    pub flex: bool,
    pub format: Option<RowFormatter>,
}

impl Column {
    pub fn new(field: &'static str, header: &'static str) -> Self {
        Self {
            field,
            header,
            width: None,
            flex: false,
            format: None,
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn flex(mut self) -> Self {
        self.flex = true;
        self
    }

    pub fn format(mut self, format: RowFormatter) -> Self {
        self.format = Some(format);
        self
    }

    /// Cell text for a row: the custom formatter when set, the raw field
    /// value otherwise.
    pub fn render(&self, row: &Row) -> String {
        if let Some(format) = self.format {
            return format(row);
        }
        row.get(self.field).map(render_scalar).unwrap_or_default()
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
