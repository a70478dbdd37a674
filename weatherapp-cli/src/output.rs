use std::io::Write;

use weatherapp_core::{DisplaySurface, Markup, surface::SurfaceError};

/// Prints each replacement of the display to stdout.
#[derive(Debug, Default)]
pub struct StdoutSurface;

impl DisplaySurface for StdoutSurface {
    fn replace(&mut self, markup: &Markup) -> Result<(), SurfaceError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", markup.as_str().trim())?;
        out.flush()?;
        Ok(())
    }
}
