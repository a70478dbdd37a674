use crate::{
    model::{SearchPhase, UiState},
    surface::{DisplaySurface, SurfaceError},
};

pub const SEARCH_LABEL: &str = "Search";
pub const BUSY_LABEL: &str = "Searching...";

/// The submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTrigger {
    pub enabled: bool,
    pub label: String,
}

impl Default for SearchTrigger {
    fn default() -> Self {
        Self {
            enabled: true,
            label: SEARCH_LABEL.to_string(),
        }
    }
}

impl SearchTrigger {
    pub fn set_busy(&mut self) {
        self.enabled = false;
        self.label = BUSY_LABEL.to_string();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The city text box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    pub value: String,
    pub focused: bool,
}

impl InputField {
    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }
}

/// Everything the widget owns for its lifetime: the display surface, the
/// controls, and what is currently shown.
#[derive(Debug)]
pub struct AppContext<S> {
    pub surface: S,
    pub trigger: SearchTrigger,
    pub input: InputField,
    /// The last view that reached the surface.
    pub view: UiState,
    pub phase: SearchPhase,
    /// Set when the most recent surface write failed, cleared by the next
    /// successful one.
    pub write_error: Option<SurfaceError>,
}

impl<S: DisplaySurface> AppContext<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            trigger: SearchTrigger::default(),
            input: InputField::default(),
            view: UiState::Welcome,
            phase: SearchPhase::Idle,
            write_error: None,
        }
    }

    /// Take the error of the most recent surface write, if it failed.
    pub fn take_write_error(&mut self) -> Option<SurfaceError> {
        self.write_error.take()
    }
}
