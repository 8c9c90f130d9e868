//! Light/dark resolution.

#[cfg(target_os = "linux")]
pub mod linux_theme;

use gpa_core::Theme;

/// Answers whether the surrounding desktop prefers a dark appearance.
pub trait SystemAppearance {
    fn prefers_dark(&self) -> bool;
}

/// A fixed answer, for overrides and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAppearance(pub bool);

impl SystemAppearance for FixedAppearance {
    fn prefers_dark(&self) -> bool {
        self.0
    }
}

/// Asks the desktop. Platforms with no way to ask report light.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopAppearance;

impl SystemAppearance for DesktopAppearance {
    #[cfg(target_os = "linux")]
    fn prefers_dark(&self) -> bool {
        linux_theme::prefers_dark()
    }

    #[cfg(not(target_os = "linux"))]
    fn prefers_dark(&self) -> bool {
        false
    }
}

/// The system answer is only consulted for [`Theme::Automatic`].
pub fn is_dark(
    theme: Theme,
    system_prefers_dark: bool,
) -> bool {
    match theme {
        Theme::Light => false,
        Theme::Dark => true,
        Theme::Automatic => system_prefers_dark,
    }
}
