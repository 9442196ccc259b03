use std::fmt;

use tracing::debug;

use crate::ScreenError;

/// Which of the two screens is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Questions are being defined. Initial state.
    #[default]
    Building,

    /// The validated questions are being filled in.
    Rendering,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Building => f.write_str("building"),
            Self::Rendering => f.write_str("rendering"),
        }
    }
}

/// Two-state flow controller.
///
/// `Building -> Rendering` only on successful builder validation and
/// `Rendering -> Building` only through an explicit edit. Nothing else.
#[derive(Debug, Clone, Default)]
pub struct ScreenController {
    screen: Screen,
}

impl ScreenController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_building(&self) -> bool {
        self.screen == Screen::Building
    }

    pub fn is_rendering(&self) -> bool {
        self.screen == Screen::Rendering
    }

    /// Enter the renderer after the builder validated successfully.
    pub fn on_builder_validation_success(&mut self) -> Result<(), ScreenError> {
        self.transition(Screen::Building, Screen::Rendering, "open the renderer")
    }

    /// Go back to the builder.
    pub fn edit_build(&mut self) -> Result<(), ScreenError> {
        self.transition(Screen::Rendering, Screen::Building, "edit the build")
    }

    /// Fail unless the given screen is active.
    pub fn require(&self, screen: Screen, action: &'static str) -> Result<(), ScreenError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(ScreenError::InvalidTransition {
                from: self.screen,
                action,
            })
        }
    }

    fn transition(
        &mut self,
        from: Screen,
        to: Screen,
        action: &'static str,
    ) -> Result<(), ScreenError> {
        self.require(from, action)?;
        debug!(%from, %to, "screen transition");
        self.screen = to;
        Ok(())
    }
}
