use ontheair::panel::schema::{
    ActionDefinition, Choice, FeedbackDefinition, OptionField, PresetDefinition,
    VariableDefinition,
};
use ontheair::panel::{Health, Host, Variables};

use std::cell::{Cell, RefCell};

/// Panel stand-in that keeps everything it is sent
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub statuses: RefCell<Vec<(Health, Option<String>)>>,
    pub variable_definitions: RefCell<Vec<VariableDefinition>>,
    /// Every value ever set, later values overwriting earlier ones
    pub variables: RefCell<Variables>,
    pub actions: RefCell<Vec<ActionDefinition>>,
    pub action_updates: Cell<usize>,
    pub feedbacks: RefCell<Vec<FeedbackDefinition>>,
    pub presets: RefCell<Vec<PresetDefinition>>,
    pub feedback_checks: Cell<usize>,
}

impl RecordingHost {
    pub fn last_status(&self) -> Option<(Health, Option<String>)> {
        self.statuses.borrow().last().cloned()
    }

    pub fn variable(&self, id: &str) -> Option<String> {
        self.variables.borrow().get(id).cloned()
    }

    pub fn has_variable_definition(&self, id: &str) -> bool {
        self.variable_definitions.borrow().iter().any(|d| d.id == id)
    }

    /// Choices of the first dropdown of action `id`
    pub fn dropdown(&self, id: &str) -> Vec<Choice> {
        let actions = self.actions.borrow();
        let action = actions
            .iter()
            .find(|a| a.id == id)
            .unwrap_or_else(|| panic!("No action '{}'", id));
        action
            .options
            .iter()
            .find_map(|option| match option {
                OptionField::Dropdown { choices, .. } => Some(choices.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

impl Host for RecordingHost {
    fn label(&self) -> &str {
        "otav"
    }

    fn set_status(&self, health: Health, message: Option<&str>) {
        log::debug!(target: "test::host", "Status {} {:?}", health, message);
        self.statuses
            .borrow_mut()
            .push((health, message.map(String::from)));
    }

    fn set_variable_definitions(&self, definitions: Vec<VariableDefinition>) {
        self.variable_definitions.replace(definitions);
    }

    fn set_variable_values(&self, values: Variables) {
        self.variables.borrow_mut().extend(values);
    }

    fn set_action_definitions(&self, definitions: Vec<ActionDefinition>) {
        self.actions.replace(definitions);
        self.action_updates.set(self.action_updates.get() + 1);
    }

    fn set_feedback_definitions(&self, definitions: Vec<FeedbackDefinition>) {
        self.feedbacks.replace(definitions);
    }

    fn set_preset_definitions(&self, definitions: Vec<PresetDefinition>) {
        self.presets.replace(definitions);
    }

    fn check_feedbacks(&self) {
        self.feedback_checks.set(self.feedback_checks.get() + 1);
    }
}
