//! Renderer trait and registry.

use crate::{DocxRenderer, Manuscript, PdfRenderer, TxtRenderer};
use folio_core::OutputFormat;
use folio_error::{FolioResult, RenderError, RenderErrorKind};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Turns a [`Manuscript`] into the bytes of one document format.
pub trait DocumentRenderer: Send + Sync {
    /// Format produced.
    fn format(&self) -> OutputFormat;

    /// Render the manuscript.
    fn render(&self, manuscript: &Manuscript) -> FolioResult<Vec<u8>>;
}

/// Renderers keyed by format.
///
/// # Examples
///
/// ```
/// use folio_compiler::RendererRegistry;
/// use folio_core::OutputFormat;
///
/// let registry = RendererRegistry::standard();
/// assert!(registry.get(OutputFormat::Pdf).is_ok());
/// assert!(RendererRegistry::new().get(OutputFormat::Pdf).is_err());
/// ```
#[derive(Clone, Default)]
pub struct RendererRegistry {
    renderers: BTreeMap<OutputFormat, Arc<dyn DocumentRenderer>>,
}

impl RendererRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the docx, pdf and txt renderers.
    pub fn standard() -> Self {
        Self::new()
            .with(Arc::new(DocxRenderer::default()))
            .with(Arc::new(PdfRenderer::default()))
            .with(Arc::new(TxtRenderer::default()))
    }

    /// Add or replace the renderer for its format.
    pub fn with(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.register(renderer);
        self
    }

    /// Add or replace the renderer for its format.
    pub fn register(&mut self, renderer: Arc<dyn DocumentRenderer>) {
        self.renderers.insert(renderer.format(), renderer);
    }

    /// Renderer for a format.
    pub fn get(&self, format: OutputFormat) -> FolioResult<Arc<dyn DocumentRenderer>> {
        self.renderers.get(&format).cloned().ok_or_else(|| {
            RenderError::new(RenderErrorKind::UnsupportedFormat(format.to_string())).into()
        })
    }

    /// Formats with a registered renderer.
    pub fn formats(&self) -> Vec<OutputFormat> {
        self.renderers.keys().copied().collect()
    }
}
