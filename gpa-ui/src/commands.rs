//! The command surface: one variant per user action.
//!
//! Commands have a line-oriented text form, a kebab-case verb followed by its
//! arguments. Free-text commands take the rest of the line verbatim as their
//! last argument, so `update-module-form name  Linear Algebra` sets the name
//! to ` Linear Algebra`.
//!
//! | Verb                        | Arguments                                    | Channel |
//! |-----------------------------|----------------------------------------------|---------|
//! | `navigate`                  | `main\|semester-calculator\|annual-calculator\|settings` | render |
//! | `set-theme`                 | `light\|dark\|automatic`                     | render |
//! | `set-lang`                  | `ar\|fr\|en`                                 | render |
//! | `set-method`                | method id                                    | render |
//! | `set-credits`               | `30\|45`                                     | render |
//! | `open-module-modal`         | optional module id                           | render |
//! | `update-module-form`        | `name\|coeff\|credits\|tdGrade\|tpGrade\|examGrade` text | silent |
//! | `toggle-grade`              | `td\|tp\|exam`                               | render |
//! | `save-module`               |                                              | render |
//! | `delete-module`             | module id                                    | render |
//! | `delete-all-modules`        |                                              | render |
//! | `calculate-semester`        |                                              | render |
//! | `handle-annual-input`       | `s1AvgText\|s1CreditsText\|s2AvgText\|s2CreditsText` text | patch |
//! | `calculate-annual`          |                                              | render |
//! | `clear-annual`              |                                              | render |
//! | `open-info-modal`           |                                              | render |
//! | `open-privacy-modal`        |                                              | render |
//! | `open-data-modal`           |                                              | render |
//! | `close-modal`               |                                              | render |
//! | `confirm-action`            |                                              | render |
//! | `open-custom-method-modal`  |                                              | render |
//! | `update-custom-method-form` | `td\|tp\|exam` text                          | silent |
//! | `toggle-custom-component`   | `td\|tp`                                     | render |
//! | `save-custom-method`        |                                              | render |
//! | `delete-custom-method`      | method id                                    | render |
//! | `toggle-save-settings`      |                                              | render |

use std::fmt;
use std::str::FromStr;

use gpa_core::{AnnualField, GradeComponent, Language, Theme};
use thiserror::Error;

use crate::state::{ModuleField, Page};

/// Allowed values for `set-credits`.
pub const DEBT_CREDIT_OPTIONS: [u32; 2] = [30, 45];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate(Page),
    SetTheme(Theme),
    SetLang(Language),
    SetMethod(String),
    SetCredits(u32),
    OpenModuleModal(Option<String>),
    UpdateModuleForm(ModuleField, String),
    ToggleGrade(GradeComponent),
    SaveModule,
    DeleteModule(String),
    DeleteAllModules,
    CalculateSemester,
    HandleAnnualInput(AnnualField, String),
    CalculateAnnual,
    ClearAnnual,
    OpenInfoModal,
    OpenPrivacyModal,
    OpenDataModal,
    CloseModal,
    ConfirmAction,
    OpenCustomMethodModal,
    UpdateCustomMethodForm(GradeComponent, String),
    ToggleCustomComponent(GradeComponent),
    SaveCustomMethod,
    DeleteCustomMethod(String),
    ToggleSaveSettings,
}

/// How the display catches up after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateChannel {
    /// Rebuild the whole screen.
    FullRender,
    /// Update state only; the edited control already shows the new text.
    Silent,
    /// Update state and patch the dependent fields named in the outcome.
    FieldPatch,
}

impl Command {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Navigate(_) => "navigate",
            Self::SetTheme(_) => "set-theme",
            Self::SetLang(_) => "set-lang",
            Self::SetMethod(_) => "set-method",
            Self::SetCredits(_) => "set-credits",
            Self::OpenModuleModal(_) => "open-module-modal",
            Self::UpdateModuleForm(..) => "update-module-form",
            Self::ToggleGrade(_) => "toggle-grade",
            Self::SaveModule => "save-module",
            Self::DeleteModule(_) => "delete-module",
            Self::DeleteAllModules => "delete-all-modules",
            Self::CalculateSemester => "calculate-semester",
            Self::HandleAnnualInput(..) => "handle-annual-input",
            Self::CalculateAnnual => "calculate-annual",
            Self::ClearAnnual => "clear-annual",
            Self::OpenInfoModal => "open-info-modal",
            Self::OpenPrivacyModal => "open-privacy-modal",
            Self::OpenDataModal => "open-data-modal",
            Self::CloseModal => "close-modal",
            Self::ConfirmAction => "confirm-action",
            Self::OpenCustomMethodModal => "open-custom-method-modal",
            Self::UpdateCustomMethodForm(..) => "update-custom-method-form",
            Self::ToggleCustomComponent(_) => "toggle-custom-component",
            Self::SaveCustomMethod => "save-custom-method",
            Self::DeleteCustomMethod(_) => "delete-custom-method",
            Self::ToggleSaveSettings => "toggle-save-settings",
        }
    }

    pub fn channel(&self) -> UpdateChannel {
        match self {
            Self::UpdateModuleForm(..) | Self::UpdateCustomMethodForm(..) => UpdateChannel::Silent,
            Self::HandleAnnualInput(..) => UpdateChannel::FieldPatch,
            _ => UpdateChannel::FullRender,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("'{command}': invalid argument '{value}', expected {expected}")]
    InvalidArgument {
        command: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("'{command}' takes no further arguments, got '{extra}'")]
    UnexpectedArgument { command: &'static str, extra: String },
}

/// Remaining text after the verb, consumed argument by argument.
struct Args<'a> {
    command: &'static str,
    rest: &'a str,
}

impl<'a> Args<'a> {
    fn new(
        command: &'static str,
        rest: &'a str,
    ) -> Self {
        Self { command, rest }
    }

    /// Next whitespace-delimited word, if any.
    fn word(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            return None;
        }
        let (word, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
        self.rest = rest;
        Some(word)
    }

    fn required(
        &mut self,
        expected: &'static str,
    ) -> Result<&'a str, CommandParseError> {
        self.word().ok_or(CommandParseError::MissingArgument {
            command: self.command,
            expected,
        })
    }

    fn parsed<T>(
        &mut self,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, CommandParseError> {
        let value = self.required(expected)?;
        parse(value).ok_or_else(|| CommandParseError::InvalidArgument {
            command: self.command,
            value: value.to_string(),
            expected,
        })
    }

    /// Everything left on the line, verbatim.
    fn text(self) -> String {
        self.rest.to_string()
    }

    fn finish(self) -> Result<(), CommandParseError> {
        let extra = self.rest.trim();
        if extra.is_empty() {
            Ok(())
        } else {
            Err(CommandParseError::UnexpectedArgument {
                command: self.command,
                extra: extra.to_string(),
            })
        }
    }
}

const PAGES: &str = "main|semester-calculator|annual-calculator|settings";
const THEMES: &str = "light|dark|automatic";
const LANGUAGES: &str = "ar|fr|en";
const CREDITS: &str = "30|45";
const MODULE_FIELDS: &str = "name|coeff|credits|tdGrade|tpGrade|examGrade";
const COMPONENTS: &str = "td|tp|exam";
const CONTINUOUS_COMPONENTS: &str = "td|tp";
const ANNUAL_FIELDS: &str = "s1AvgText|s1CreditsText|s2AvgText|s2CreditsText";

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (verb, rest) = line.split_once(' ').unwrap_or((line.trim_end(), ""));
        if verb.is_empty() {
            return Err(CommandParseError::Empty);
        }

        // Unit commands reject trailing words.
        let unit = |command: Command| -> Result<Command, CommandParseError> {
            Args::new(command.verb(), rest).finish()?;
            Ok(command)
        };

        match verb {
            "navigate" => {
                let mut args = Args::new("navigate", rest);
                let page = args.parsed(PAGES, Page::parse)?;
                args.finish()?;
                Ok(Self::Navigate(page))
            }
            "set-theme" => {
                let mut args = Args::new("set-theme", rest);
                let theme = args.parsed(THEMES, Theme::parse)?;
                args.finish()?;
                Ok(Self::SetTheme(theme))
            }
            "set-lang" => {
                let mut args = Args::new("set-lang", rest);
                let language = args.parsed(LANGUAGES, Language::parse)?;
                args.finish()?;
                Ok(Self::SetLang(language))
            }
            "set-method" => {
                let mut args = Args::new("set-method", rest);
                let id = args.required("a method id")?.to_string();
                args.finish()?;
                Ok(Self::SetMethod(id))
            }
            "set-credits" => {
                let mut args = Args::new("set-credits", rest);
                let credits = args.parsed(CREDITS, |s| {
                    s.parse::<u32>().ok().filter(|n| DEBT_CREDIT_OPTIONS.contains(n))
                })?;
                args.finish()?;
                Ok(Self::SetCredits(credits))
            }
            "open-module-modal" => {
                let mut args = Args::new("open-module-modal", rest);
                let id = args.word().map(str::to_string);
                args.finish()?;
                Ok(Self::OpenModuleModal(id))
            }
            "update-module-form" => {
                let mut args = Args::new("update-module-form", rest);
                let field = args.parsed(MODULE_FIELDS, ModuleField::parse)?;
                Ok(Self::UpdateModuleForm(field, args.text()))
            }
            "toggle-grade" => {
                let mut args = Args::new("toggle-grade", rest);
                let component = args.parsed(COMPONENTS, GradeComponent::parse)?;
                args.finish()?;
                Ok(Self::ToggleGrade(component))
            }
            "delete-module" => {
                let mut args = Args::new("delete-module", rest);
                let id = args.required("a module id")?.to_string();
                args.finish()?;
                Ok(Self::DeleteModule(id))
            }
            "handle-annual-input" => {
                let mut args = Args::new("handle-annual-input", rest);
                let field = args.parsed(ANNUAL_FIELDS, AnnualField::parse)?;
                Ok(Self::HandleAnnualInput(field, args.text()))
            }
            "update-custom-method-form" => {
                let mut args = Args::new("update-custom-method-form", rest);
                let component = args.parsed(COMPONENTS, GradeComponent::parse)?;
                Ok(Self::UpdateCustomMethodForm(component, args.text()))
            }
            "toggle-custom-component" => {
                let mut args = Args::new("toggle-custom-component", rest);
                let component = args.parsed(CONTINUOUS_COMPONENTS, |s| {
                    GradeComponent::parse(s).filter(|c| *c != GradeComponent::Exam)
                })?;
                args.finish()?;
                Ok(Self::ToggleCustomComponent(component))
            }
            "delete-custom-method" => {
                let mut args = Args::new("delete-custom-method", rest);
                let id = args.required("a method id")?.to_string();
                args.finish()?;
                Ok(Self::DeleteCustomMethod(id))
            }
            "save-module" => unit(Self::SaveModule),
            "delete-all-modules" => unit(Self::DeleteAllModules),
            "calculate-semester" => unit(Self::CalculateSemester),
            "calculate-annual" => unit(Self::CalculateAnnual),
            "clear-annual" => unit(Self::ClearAnnual),
            "open-info-modal" => unit(Self::OpenInfoModal),
            "open-privacy-modal" => unit(Self::OpenPrivacyModal),
            "open-data-modal" => unit(Self::OpenDataModal),
            "close-modal" => unit(Self::CloseModal),
            "confirm-action" => unit(Self::ConfirmAction),
            "open-custom-method-modal" => unit(Self::OpenCustomMethodModal),
            "save-custom-method" => unit(Self::SaveCustomMethod),
            "toggle-save-settings" => unit(Self::ToggleSaveSettings),
            other => Err(CommandParseError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let verb = self.verb();
        match self {
            Self::Navigate(page) => write!(f, "{verb} {}", page.as_str()),
            Self::SetTheme(theme) => write!(f, "{verb} {}", theme.as_str()),
            Self::SetLang(language) => write!(f, "{verb} {}", language.as_str()),
            Self::SetMethod(id) | Self::DeleteModule(id) | Self::DeleteCustomMethod(id) => {
                write!(f, "{verb} {id}")
            }
            Self::SetCredits(credits) => write!(f, "{verb} {credits}"),
            Self::OpenModuleModal(Some(id)) => write!(f, "{verb} {id}"),
            Self::ToggleGrade(component) | Self::ToggleCustomComponent(component) => {
                write!(f, "{verb} {}", component.as_str())
            }
            Self::UpdateModuleForm(field, text) => write_free_text(f, verb, field.as_str(), text),
            Self::HandleAnnualInput(field, text) => write_free_text(f, verb, field.as_str(), text),
            Self::UpdateCustomMethodForm(component, text) => {
                write_free_text(f, verb, component.as_str(), text)
            }
            _ => f.write_str(verb),
        }
    }
}

fn write_free_text(
    f: &mut fmt::Formatter<'_>,
    verb: &str,
    field: &str,
    text: &str,
) -> fmt::Result {
    if text.is_empty() {
        write!(f, "{verb} {field}")
    } else {
        write!(f, "{verb} {field} {text}")
    }
}
