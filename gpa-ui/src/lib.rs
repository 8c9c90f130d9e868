pub mod app;
pub mod commands;
pub mod components;
pub mod config;
pub mod i18n;
pub mod logging;
pub mod state;
pub mod themes;
pub mod views;

pub use app::{FieldPatch, GpaApp, Outcome};
pub use commands::{Command, CommandParseError, UpdateChannel};
pub use components::{Screen, ViewNode};
pub use views::{RenderContext, render};
