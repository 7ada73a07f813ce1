//! # WizGen Template Renderer
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! This module materializes a single template file into a new project. A file is
//! either rendered (placeholders substituted with the project's values through
//! the Tera engine) or copied byte-for-byte when it is an opaque asset.
//!
//! ## Architecture
//!
//! - The copy-only decision comes from the template's extension alone:
//!   `.bmp .ico .gif .rtf .css` are always copied verbatim, every other
//!   extension is always rendered. A caller-supplied hint never overrides it.
//! - Rendering uses `Tera::one_off` with autoescaping disabled, since the output
//!   is C source and plain text, not HTML.
//! - The destination is created or overwritten. Parent directories must already
//!   exist; creating them is the orchestrator's job.
//!
//! Errors:
//! - `WizardError::TemplateNotFound` when the source template is missing.
//! - `WizardError::Render` on substitution, read, or write failure.
//!
//! ## Examples
//!
//! ```rust
//! let renderer = TemplateRenderer::new(spec.placeholders());
//! renderer.render(&template_root.join("main.c"), &project_root.join("myapp.c"), false)?;
//! ```
//!
use crate::core::error::{Result, WizardError};
use anyhow::anyhow;
use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use tera::Tera;
use tracing::{debug, info};

/// Extensions that are copied verbatim and never passed through the engine.
pub const COPY_ONLY_EXTENSIONS: [&str; 5] = ["bmp", "ico", "gif", "rtf", "css"];

/// How a template ended up in the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    Copied,
}

/// Returns true when the file at `path` must be copied without substitution.
/// Extension matching ignores case.
pub fn is_copy_only_asset(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| COPY_ONLY_EXTENSIONS.contains(&ext.as_str()))
}

/// Resolves the effective copy-only mode for a template. The extension table
/// always wins over `requested`.
pub fn effective_copy_only(path: &Path, requested: bool) -> bool {
    let copy_only = is_copy_only_asset(path);
    if copy_only != requested {
        debug!(
            "Ignoring copy-only hint {} for '{}' (extension decides {})",
            requested,
            path.display(),
            copy_only
        );
    }
    copy_only
}

/// Renders templates against one project's placeholder values.
pub struct TemplateRenderer {
    context: tera::Context,
}

impl TemplateRenderer {
    pub fn new(context: tera::Context) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &tera::Context {
        &self.context
    }

    /// Materializes `template` at `destination`.
    pub fn render(
        &self,
        template: &Path,
        destination: &Path,
        requested_copy_only: bool,
    ) -> Result<RenderOutcome> {
        if !template.is_file() {
            return Err(anyhow!(WizardError::TemplateNotFound {
                path: template.to_path_buf(),
            }));
        }

        if effective_copy_only(template, requested_copy_only) {
            fs::copy(template, destination).map_err(|e| {
                anyhow!(WizardError::Render {
                    path: destination.to_path_buf(),
                    reason: format!("copy from '{}' failed: {}", template.display(), e),
                })
            })?;
            debug!(
                "Copied asset '{}' to '{}'",
                template.display(),
                destination.display()
            );
            return Ok(RenderOutcome::Copied);
        }

        let source = fs::read_to_string(template).map_err(|e| {
            anyhow!(WizardError::Render {
                path: template.to_path_buf(),
                reason: format!("read failed: {}", e),
            })
        })?;
        let rendered = self.render_str(&source, template)?;
        fs::write(destination, rendered).map_err(|e| {
            anyhow!(WizardError::Render {
                path: destination.to_path_buf(),
                reason: format!("write failed: {}", e),
            })
        })?;
        info!(
            "Rendered template '{}' to '{}'",
            template.display(),
            destination.display()
        );
        Ok(RenderOutcome::Rendered)
    }

    /// Substitutes placeholders in `source`. `origin` only labels errors.
    pub fn render_str(&self, source: &str, origin: &Path) -> Result<String> {
        Tera::one_off(source, &self.context, false).map_err(|e| {
            anyhow!(WizardError::Render {
                path: origin.to_path_buf(),
                reason: error_chain(&e),
            })
        })
    }
}

/// Tera reports the useful detail in the `source()` chain, not the top error.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}
