use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};

use gpa_core::store::Persistence;
use gpa_ui::config::{AppConfig, ConfigOverrides};
use gpa_ui::i18n::{Catalog, Localizer};
use gpa_ui::themes::{DesktopAppearance, FixedAppearance, SystemAppearance};
use gpa_ui::views::status_bar::{build_status_bar, hints};
use gpa_ui::{Command, GpaApp, Outcome, RenderContext, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Semester and annual GPA calculator.
///
/// Loads the saved state from the configured store, then reads one command
/// per line from stdin and prints the resulting screen to stdout. Logs go to
/// stderr.
#[derive(Debug, Parser)]
struct Cli {
    /// TOML configuration file. Every setting has a default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage backend: `memory`, `file` or `sqlite`.
    #[arg(long)]
    backend: Option<String>,

    /// Backend location: a JSON file path for `file`, a database path or
    /// `:memory:` for `sqlite`.
    #[arg(long)]
    store: Option<String>,

    /// Log filter directive, e.g. `debug` or `gpa_ui=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Answer for the automatic theme instead of asking the desktop.
    #[arg(long, value_enum)]
    theme_override: Option<ThemeOverride>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeOverride {
    Light,
    Dark,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            backend: self.backend.clone(),
            location: self.store.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
            prefer_dark: self.theme_override.map(|t| matches!(t, ThemeOverride::Dark)),
        }
    }
}

// ─── configuration ───────────────────────────────────────────────────────────

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let base = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    Ok(base.with_overrides(cli.overrides())?)
}

// ─── shell ───────────────────────────────────────────────────────────────────

/// Strips the line ending. Invalid UTF-8 is replaced, not fatal.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

#[derive(Debug, PartialEq, Eq)]
enum InputLine<'a> {
    Blank,
    /// Trimmed `:` directive.
    Shell(&'a str),
    /// App command with its trailing text untouched.
    App(&'a str),
}

fn classify(line: &str) -> InputLine<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        InputLine::Blank
    } else if trimmed.starts_with(':') {
        InputLine::Shell(trimmed)
    } else {
        InputLine::App(line)
    }
}

/// Lines starting with `:` are handled here; anything else is a [`Command`].
enum ShellAction {
    Continue,
    Quit,
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", build_status_bar(&hints::ALL))?;
    writeln!(out, ":log file <path> | :log off-file | :log console on|off")?;
    writeln!(out, "anything else is an app command, e.g. `navigate semester-calculator`")
}

fn run_shell_line(
    line: &str,
    app: &GpaApp,
    ctx: &RenderContext<'_>,
    out: &mut impl Write,
) -> anyhow::Result<ShellAction> {
    let mut words = line.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some(":quit" | ":q"), None, None) => return Ok(ShellAction::Quit),
        (Some(":help"), None, None) => print_help(out)?,
        (Some(":show"), None, None) => write!(out, "{}", app.render(ctx))?,
        (Some(":log"), Some("file"), Some(path)) => {
            logging::enable_file_logging(Path::new(path))?;
            info!(path, "file logging enabled");
        }
        (Some(":log"), Some("off-file"), None) => {
            info!("file logging disabled");
            logging::disable_file_logging();
        }
        (Some(":log"), Some("console"), Some(state @ ("on" | "off"))) => {
            logging::set_console_enabled(state == "on")?;
        }
        (Some(":log"), Some(level), None) => {
            logging::set_log_level(level)?;
            info!(level, "log level changed");
        }
        _ => writeln!(out, "unknown shell command `{line}`; try :help")?,
    }
    Ok(ShellAction::Continue)
}

fn report_outcome(
    outcome: Outcome,
    app: &GpaApp,
    ctx: &RenderContext<'_>,
    out: &mut impl Write,
) -> io::Result<()> {
    match outcome {
        Outcome::Render => write!(out, "{}", app.render(ctx)),
        Outcome::Patch(patches) => {
            for patch in patches {
                writeln!(out, "{patch}")?;
            }
            Ok(())
        }
        Outcome::Alert { message_key } => {
            let tr = Localizer::new(ctx.translator, app.state().language);
            writeln!(out, "! {}", tr.t(message_key))
        }
        Outcome::Quiet => Ok(()),
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    logging::init_logging(&config.logging.level);
    if let Some(path) = &config.logging.file {
        logging::enable_file_logging(path)?;
    }

    let store_config = config.store_config();
    debug!("opening {} store at {}", store_config.backend, store_config.location);
    let store = gpa_store::default_registry()
        .create(&store_config)
        .with_context(|| format!("cannot open the {} store", store_config.backend))?;
    let mut app = GpaApp::new(Persistence::new(store));

    let system_prefers_dark = match config.appearance.prefer_dark {
        Some(dark) => FixedAppearance(dark).prefers_dark(),
        None => DesktopAppearance.prefers_dark(),
    };
    let catalog = Catalog::builtin();
    let ctx = RenderContext {
        translator: &catalog,
        system_prefers_dark,
    };

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    write!(out, "{}", app.render(&ctx))?;
    writeln!(out, "{}", build_status_bar(&hints::ALL))?;
    out.flush()?;

    let mut input = stdin.lock();
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if input.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        let line = decode_line(&raw);
        if let Cow::Owned(_) = line {
            warn!(line = %line, "input is not valid UTF-8; invalid bytes replaced");
        }

        match classify(&line) {
            InputLine::Blank => continue,
            InputLine::Shell(directive) => match run_shell_line(directive, &app, &ctx, &mut out) {
                Ok(ShellAction::Quit) => break,
                Ok(ShellAction::Continue) => {}
                Err(e) => writeln!(out, "error: {e:#}")?,
            },
            InputLine::App(text) => match text.parse::<Command>() {
                Ok(command) => {
                    let outcome = app.dispatch(command);
                    report_outcome(outcome, &app, &ctx, &mut out)?;
                }
                Err(e) => {
                    warn!(input = text, "rejected command: {e}");
                    writeln!(out, "error: {e}")?;
                }
            },
        }
        out.flush()?;
    }

    info!("session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use gpa_ui::state::ModuleField;
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // line decoding tests
    // =========================================================================

    #[test]
    fn line_endings_are_stripped() {
        assert_eq!(decode_line(b"close-modal\n"), "close-modal");
        assert_eq!(decode_line(b"close-modal\r\n"), "close-modal");
        assert_eq!(decode_line(b"close-modal"), "close-modal");
    }

    #[test]
    fn trailing_spaces_survive_decoding() {
        let line = decode_line(b"update-module-form name Linear Algebra  \n");

        assert_eq!(line, "update-module-form name Linear Algebra  ");
    }

    #[test]
    fn invalid_utf8_is_replaced_instead_of_failing() {
        let line = decode_line(b"update-module-form name Caf\xe9\n");

        assert!(matches!(line, Cow::Owned(_)));
        assert_eq!(line, "update-module-form name Caf\u{FFFD}");
    }

    // =========================================================================
    // classify tests
    // =========================================================================

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(classify(""), InputLine::Blank);
        assert_eq!(classify("  \t "), InputLine::Blank);
    }

    #[test]
    fn shell_directives_are_trimmed() {
        assert_eq!(classify("  :log debug  "), InputLine::Shell(":log debug"));
    }

    #[test]
    fn free_text_keeps_its_trailing_spaces() {
        let InputLine::App(text) = classify("update-module-form name Linear Algebra  ") else {
            panic!("expected an app command");
        };

        assert_eq!(
            text.parse::<Command>().unwrap(),
            Command::UpdateModuleForm(ModuleField::Name, "Linear Algebra  ".into())
        );
    }

    #[test]
    fn unit_commands_tolerate_trailing_spaces() {
        let InputLine::App(text) = classify("close-modal   ") else {
            panic!("expected an app command");
        };

        assert_eq!(text.parse::<Command>().unwrap(), Command::CloseModal);
    }
}
