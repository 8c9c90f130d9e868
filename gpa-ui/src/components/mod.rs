//! The textual UI tree produced by the render engine.
//!
//! A [`Screen`] is a complete description of what is shown: page content plus
//! at most one modal. Interactive nodes carry the [`Command`] they trigger, so
//! a host can wire them up without knowing anything about the controller.

pub mod dialogs;
pub mod presenter;

use gpa_core::{AnnualField, GradeComponent, Language};

use crate::commands::Command;
use crate::state::{ModuleField, Page};

/// Which free-text value an input edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputTarget {
    Module(ModuleField),
    Annual(AnnualField),
    CustomMethod(GradeComponent),
}

impl InputTarget {
    /// The command an edit of this input sends.
    pub fn command(
        &self,
        value: impl Into<String>,
    ) -> Command {
        match *self {
            Self::Module(field) => Command::UpdateModuleForm(field, value.into()),
            Self::Annual(field) => Command::HandleAnnualInput(field, value.into()),
            Self::CustomMethod(component) => Command::UpdateCustomMethodForm(component, value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    Heading(String),
    Text(String),
    /// Read-only label and value.
    Field { label: String, value: String },
    Button {
        label: String,
        command: Command,
        selected: bool,
    },
    Input {
        target: InputTarget,
        label: String,
        value: String,
        placeholder: String,
        /// Read-only; shown but not editable.
        locked: bool,
    },
    Checkbox {
        label: String,
        checked: bool,
        command: Command,
    },
    /// Nodes shown side by side.
    Row(Vec<ViewNode>),
    Section {
        title: String,
        children: Vec<ViewNode>,
    },
}

impl ViewNode {
    pub fn heading(text: impl Into<String>) -> Self {
        Self::Heading(text.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn field(
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Field {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn button(
        label: impl Into<String>,
        command: Command,
    ) -> Self {
        Self::Button {
            label: label.into(),
            command,
            selected: false,
        }
    }

    /// A choice button, highlighted when it matches the current setting.
    pub fn choice(
        label: impl Into<String>,
        command: Command,
        selected: bool,
    ) -> Self {
        Self::Button {
            label: label.into(),
            command,
            selected,
        }
    }

    pub fn section(
        title: impl Into<String>,
        children: Vec<ViewNode>,
    ) -> Self {
        Self::Section {
            title: title.into(),
            children,
        }
    }

    /// This node and all nested nodes, depth first.
    pub fn walk(&self) -> Vec<&ViewNode> {
        let mut nodes = vec![self];
        match self {
            Self::Row(children) | Self::Section { children, .. } => {
                for child in children {
                    nodes.extend(child.walk());
                }
            }
            _ => {}
        }
        nodes
    }
}

/// Reading direction of the active language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn for_language(language: Language) -> Self {
        if language.is_rtl() { Self::Rtl } else { Self::Ltr }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    /// Modal kind, e.g. `module` or `confirm`.
    pub kind: &'static str,
    pub title: String,
    pub body: Vec<ViewNode>,
    pub actions: Vec<ViewNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub language: Language,
    pub direction: Direction,
    pub dark: bool,
    pub page: Page,
    pub title: String,
    pub body: Vec<ViewNode>,
    pub modal: Option<ModalView>,
}

impl Screen {
    /// Every node on the page and in the modal, depth first.
    pub fn nodes(&self) -> Vec<&ViewNode> {
        let modal_nodes = self
            .modal
            .iter()
            .flat_map(|modal| modal.body.iter().chain(modal.actions.iter()));
        self.body.iter().chain(modal_nodes).flat_map(ViewNode::walk).collect()
    }

    /// Commands reachable from buttons and checkboxes.
    pub fn commands(&self) -> Vec<&Command> {
        self.nodes()
            .into_iter()
            .filter_map(|node| match node {
                ViewNode::Button { command, .. } | ViewNode::Checkbox { command, .. } => {
                    Some(command)
                }
                _ => None,
            })
            .collect()
    }

    pub fn input(
        &self,
        target: InputTarget,
    ) -> Option<&ViewNode> {
        self.nodes()
            .into_iter()
            .find(|node| matches!(node, ViewNode::Input { target: t, .. } if *t == target))
    }
}
