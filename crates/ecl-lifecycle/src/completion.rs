//! Completion percentage over the canonical stage order.

use ecl_core::Stage;

use crate::catalog::StageCatalog;

/// Scores progress as `round((position + 1) / total * 100)`.
#[derive(Debug, Clone, Copy)]
pub struct CompletionCalculator<'a> {
    catalog: &'a StageCatalog,
}

impl<'a> CompletionCalculator<'a> {
    pub fn new(catalog: &'a StageCatalog) -> Self {
        Self { catalog }
    }

    /// Percentage for `current`, rounded half up. `None` for exception sinks,
    /// which are outside the canonical order.
    pub fn completion_percent(&self, current: Stage) -> Option<u8> {
        let canonical = self.catalog.all();
        let position = canonical.iter().position(|d| d.stage == current)?;
        let total = canonical.len();
        // Integer form of round(((position + 1) / total) * 100).
        let scaled = ((position + 1) * 200 + total) / (2 * total);
        u8::try_from(scaled).ok()
    }
}
