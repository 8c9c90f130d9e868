//! Plain-text presentation of screens and field patches.
//!
//! ```text
//! == Semester GPA ==  [ar rtl light]
//! [Back] -> navigate main
//! Calculation method: 60% / 40%
//! ...
//! +-- Add module (module) --
//! | Module name: [] -> update-module-form name <text>
//! ```
//!
//! Buttons and checkboxes show the command they send; inputs show the command
//! prefix an edit sends, followed by `<text>`.

use std::fmt::{self, Write as _};

use super::{ModalView, Screen, ViewNode};
use crate::app::FieldPatch;

impl fmt::Display for Screen {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let appearance = if self.dark { "dark" } else { "light" };
        writeln!(
            f,
            "== {} ==  [{} {} {}]",
            self.title,
            self.language.as_str(),
            self.direction.as_str(),
            appearance
        )?;
        for node in &self.body {
            write_node(f, node, "")?;
        }
        if let Some(modal) = &self.modal {
            write!(f, "{modal}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ModalView {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "+-- {} ({}) --", self.title, self.kind)?;
        for node in &self.body {
            write_node(f, node, "| ")?;
        }
        if !self.actions.is_empty() {
            write_node(f, &ViewNode::Row(self.actions.clone()), "| ")?;
        }
        Ok(())
    }
}

impl fmt::Display for FieldPatch {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} = \"{}\"", self.field.as_str(), self.value)?;
        if self.locked {
            f.write_str(" (locked)")?;
        }
        Ok(())
    }
}

fn write_node(
    f: &mut fmt::Formatter<'_>,
    node: &ViewNode,
    indent: &str,
) -> fmt::Result {
    match node {
        ViewNode::Section { title, children } => {
            writeln!(f, "{indent}{title}:")?;
            let nested = format!("{indent}  ");
            for child in children {
                write_node(f, child, &nested)?;
            }
            Ok(())
        }
        ViewNode::Row(children) => {
            let cells: Vec<String> = children.iter().map(inline).collect();
            writeln!(f, "{indent}{}", cells.join("  |  "))
        }
        _ => writeln!(f, "{indent}{}", inline(node)),
    }
}

/// One-line form of a node. Nested rows and sections are flattened.
fn inline(node: &ViewNode) -> String {
    match node {
        ViewNode::Heading(text) => format!("## {text}"),
        ViewNode::Text(text) => text.clone(),
        ViewNode::Field { label, value } => format!("{label}: {value}"),
        ViewNode::Button {
            label,
            command,
            selected,
        } => {
            let marker = if *selected { "*" } else { "" };
            format!("{marker}[{label}] -> {command}")
        }
        ViewNode::Input {
            target,
            label,
            value,
            placeholder,
            locked,
        } => {
            let mut out = format!("{label}: [{value}]");
            if value.is_empty() && !placeholder.is_empty() {
                let _ = write!(out, " ({placeholder})");
            }
            if *locked {
                out.push_str(" (locked)");
            } else {
                let _ = write!(out, " -> {} <text>", target.command(""));
            }
            out
        }
        ViewNode::Checkbox {
            label,
            checked,
            command,
        } => {
            let mark = if *checked { "x" } else { " " };
            format!("[{mark}] {label} -> {command}")
        }
        ViewNode::Row(children) => children.iter().map(inline).collect::<Vec<_>>().join("  |  "),
        ViewNode::Section { title, children } => {
            let inner: Vec<String> = children.iter().map(inline).collect();
            format!("{title}: {}", inner.join("  |  "))
        }
    }
}
