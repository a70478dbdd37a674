//! The single display region the widget renders into.

use std::{fmt::Debug, fs, io, path::PathBuf};
use thiserror::Error;

use crate::presenter::Markup;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to write display output to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write display output: {0}")]
    Write(#[from] io::Error),
}

/// Something that shows markup. Every write replaces what was shown before.
pub trait DisplaySurface: Send + Debug {
    fn replace(&mut self, markup: &Markup) -> Result<(), SurfaceError>;
}

impl<T: DisplaySurface + ?Sized> DisplaySurface for &mut T {
    fn replace(&mut self, markup: &Markup) -> Result<(), SurfaceError> {
        (**self).replace(markup)
    }
}

/// In-memory surface holding the latest markup.
#[derive(Debug, Default)]
pub struct HtmlBuffer {
    content: Markup,
    writes: usize,
}

impl HtmlBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Number of replacements so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl DisplaySurface for HtmlBuffer {
    fn replace(&mut self, markup: &Markup) -> Result<(), SurfaceError> {
        self.content = markup.clone();
        self.writes += 1;
        Ok(())
    }
}

/// Surface backed by an HTML file that is rewritten on every replacement.
#[derive(Debug)]
pub struct FileSurface {
    path: PathBuf,
}

impl FileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl DisplaySurface for FileSurface {
    fn replace(&mut self, markup: &Markup) -> Result<(), SurfaceError> {
        fs::write(&self.path, markup.as_str()).map_err(|source| SurfaceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
