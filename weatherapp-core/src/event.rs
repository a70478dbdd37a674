//! Maps raw UI events to controller commands.

use crate::{
    context::AppContext,
    controller::{SearchController, SearchOutcome},
    surface::DisplaySurface,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The text box now holds this value.
    Input(String),
    /// The search button was clicked.
    Click,
    /// A key was pressed inside the text box.
    KeyPress(Key),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Submit,
}

/// The command an event triggers, if any.
pub fn command_for(event: &UiEvent) -> Option<Command> {
    match event {
        UiEvent::Click | UiEvent::KeyPress(Key::Enter) => Some(Command::Submit),
        UiEvent::Input(_) | UiEvent::KeyPress(_) => None,
    }
}

impl SearchController {
    /// Apply `event` to the context. Each submitting event runs exactly one
    /// search with the current text box value.
    pub async fn dispatch<S: DisplaySurface>(
        &self,
        ctx: &mut AppContext<S>,
        event: UiEvent,
    ) -> Option<SearchOutcome> {
        if let UiEvent::Input(value) = &event {
            ctx.input.value.clone_from(value);
        }

        match command_for(&event)? {
            Command::Submit => {
                let raw = ctx.input.value.clone();
                Some(self.submit_search(ctx, &raw).await)
            }
        }
    }
}
