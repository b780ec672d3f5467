//! Declarative definitions handed to the host panel
//!
//! These mirror the panel's own option model: each action and feedback
//! declares its inputs, and the panel renders them.

use serde::Serialize;
use serde_json::Value;

/// One entry of a dropdown
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

impl Choice {
    pub fn new<S: Into<String>, T: Into<String>>(id: S, label: T) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Input of an action or feedback
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OptionField {
    #[serde(rename = "textinput")]
    Text {
        id: String,
        label: String,
        default: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        tooltip: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        regex: Option<String>,
        required: bool,
        #[serde(rename = "useVariables")]
        use_variables: bool,
    },
    Number {
        id: String,
        label: String,
        default: Value,
        min: f64,
        max: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        tooltip: Option<String>,
        required: bool,
    },
    Dropdown {
        id: String,
        label: String,
        default: String,
        choices: Vec<Choice>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tooltip: Option<String>,
    },
}

impl OptionField {
    pub fn text(id: &str, label: &str) -> Self {
        Self::Text {
            id: id.into(),
            label: label.into(),
            default: String::new(),
            tooltip: None,
            regex: None,
            required: false,
            use_variables: true,
        }
    }

    pub fn number(id: &str, label: &str, default: Value, min: f64, max: f64) -> Self {
        Self::Number {
            id: id.into(),
            label: label.into(),
            default,
            min,
            max,
            tooltip: None,
            required: true,
        }
    }

    pub fn dropdown(id: &str, label: &str, choices: Vec<Choice>) -> Self {
        let default = choices.first().map(|c| c.id.clone()).unwrap_or_default();
        Self::Dropdown {
            id: id.into(),
            label: label.into(),
            default,
            choices,
            tooltip: None,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Text { id, .. } | Self::Number { id, .. } | Self::Dropdown { id, .. } => id,
        }
    }

    pub fn with_tooltip(mut self, text: &str) -> Self {
        match &mut self {
            Self::Text { tooltip, .. }
            | Self::Number { tooltip, .. }
            | Self::Dropdown { tooltip, .. } => *tooltip = Some(text.into()),
        }
        self
    }

    pub fn with_default<S: Into<String>>(mut self, value: S) -> Self {
        match &mut self {
            Self::Text { default, .. } | Self::Dropdown { default, .. } => *default = value.into(),
            Self::Number { default, .. } => *default = Value::String(value.into()),
        }
        self
    }

    pub fn with_regex(mut self, pattern: &str) -> Self {
        if let Self::Text { regex, .. } = &mut self {
            *regex = Some(pattern.into());
        }
        self
    }

    pub fn required(mut self, value: bool) -> Self {
        match &mut self {
            Self::Text { required, .. } | Self::Number { required, .. } => *required = value,
            Self::Dropdown { .. } => {}
        }
        self
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ActionDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub options: Vec<OptionField>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Boolean,
    Advanced,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FeedbackDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub options: Vec<OptionField>,
    /// Style applied while the feedback is true
    pub style: Style,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    #[serde(rename = "variableId")]
    pub id: String,
    pub name: String,
}

impl VariableDefinition {
    pub fn new<S: Into<String>, T: Into<String>>(id: S, name: T) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// 0xRRGGBB
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgcolor: Option<Rgb>,
}

/// Action invoked by a preset button press
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PresetAction {
    #[serde(rename = "actionId")]
    pub action_id: &'static str,
    pub options: Value,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PresetFeedback {
    #[serde(rename = "feedbackId")]
    pub feedback_id: &'static str,
    pub options: Value,
    pub style: Style,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PresetDefinition {
    pub id: String,
    pub category: String,
    pub name: String,
    pub style: Style,
    pub down: Vec<PresetAction>,
    pub feedbacks: Vec<PresetFeedback>,
}
