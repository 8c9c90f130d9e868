//! Dark-mode detection on Linux desktops.
//!
//! Reads `org.freedesktop.appearance color-scheme` from the XDG Desktop Portal
//! over the session D-Bus. When the portal is missing or reports no
//! preference, `GTK_THEME` decides.

use tracing::debug;
use zbus::{
    blocking::{Connection, Proxy},
    zvariant::OwnedValue,
};

const PORTAL_SERVICE: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const PORTAL_INTERFACE: &str = "org.freedesktop.portal.Settings";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColorScheme {
    NoPreference,
    PreferDark,
    PreferLight,
}

fn read_portal_setting(
    namespace: &str,
    key: &str,
) -> Option<OwnedValue> {
    let connection = Connection::session().ok()?;
    let proxy = Proxy::new(&connection, PORTAL_SERVICE, PORTAL_PATH, PORTAL_INTERFACE).ok()?;

    proxy.call("ReadOne", &(namespace, key)).ok()
}

fn scheme_from_raw(raw: u32) -> Option<ColorScheme> {
    match raw {
        0 => Some(ColorScheme::NoPreference),
        1 => Some(ColorScheme::PreferDark),
        2 => Some(ColorScheme::PreferLight),
        _ => None,
    }
}

fn parse_color_scheme(value: OwnedValue) -> Option<ColorScheme> {
    let raw = value
        .try_clone()
        .ok()
        .and_then(|v| u32::try_from(v).ok())
        .or_else(|| {
            value
                .try_clone()
                .ok()
                .and_then(|v| i32::try_from(v).ok())
                .and_then(|v| u32::try_from(v).ok())
        })?;

    scheme_from_raw(raw)
}

fn portal_color_scheme() -> Option<ColorScheme> {
    read_portal_setting("org.freedesktop.appearance", "color-scheme").and_then(parse_color_scheme)
}

fn gtk_theme_is_dark(theme: &str) -> bool {
    theme.to_ascii_lowercase().contains("dark")
}

fn resolve(
    scheme: Option<ColorScheme>,
    gtk_theme: Option<&str>,
) -> bool {
    match scheme {
        Some(ColorScheme::PreferDark) => true,
        Some(ColorScheme::PreferLight) => false,
        Some(ColorScheme::NoPreference) | None => gtk_theme.is_some_and(gtk_theme_is_dark),
    }
}

/// Whether the desktop asks applications for a dark appearance.
pub fn prefers_dark() -> bool {
    let scheme = portal_color_scheme();
    if scheme.is_none() {
        debug!("Portal color scheme unavailable; falling back to GTK_THEME");
    }

    let gtk_theme = std::env::var("GTK_THEME").ok();
    resolve(scheme, gtk_theme.as_deref())
}
