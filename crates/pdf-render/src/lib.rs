//! PDF rendering for generated plans.
//!
//! The pipeline hands this crate a collected profile and the AI-authored
//! plan text; it returns the bytes of a paginated A4 document. Rendering is
//! entirely in memory, so no temporary file ever exists on disk.

use intake_core::ClientProfile;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while rendering a plan document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// PDF generation failed.
    #[error("pdf generation failed: {0}")]
    Pdf(String),
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 5.5;

/// Maximum characters per body line before wrapping.
const WRAP_COLUMNS: usize = 95;

/// Render a profile and plan text into a PDF document.
pub fn render_plan(profile: &ClientProfile, plan_text: &str) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Plano Personalizado",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "content",
    );

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    let title = match profile.name.as_deref() {
        Some(name) => format!("Plano Personalizado — {name}"),
        None => "Plano Personalizado".to_string(),
    };
    layer.use_text(title, TITLE_SIZE, Mm(MARGIN_MM), Mm(y), &bold);
    y -= 2.0 * LINE_HEIGHT_MM;

    for line in profile_lines(profile) {
        layer.use_text(line, HEADING_SIZE, Mm(MARGIN_MM), Mm(y), &regular);
        y -= LINE_HEIGHT_MM;
    }
    y -= LINE_HEIGHT_MM;

    for paragraph_line in plan_text.lines() {
        for line in wrap_line(paragraph_line, WRAP_COLUMNS) {
            if y < MARGIN_MM {
                let (page, page_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
                layer = doc.get_page(page).get_layer(page_layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM;
            }
            if !line.is_empty() {
                layer.use_text(line, BODY_SIZE, Mm(MARGIN_MM), Mm(y), &regular);
            }
            y -= LINE_HEIGHT_MM;
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    debug!(bytes = bytes.len(), "plan document rendered");
    Ok(bytes)
}

/// The profile header block at the top of the document.
fn profile_lines(profile: &ClientProfile) -> Vec<String> {
    let field = |label: &str, value: &Option<String>| {
        format!("{label}: {}", value.as_deref().unwrap_or("—"))
    };

    vec![
        field("Nome", &profile.name),
        field("Idade", &profile.age),
        field("Objetivo", &profile.goal),
        field("Gênero", &profile.gender),
        field("Altura", &profile.height),
        field("Peso", &profile.weight),
    ]
}

/// Wrap a line at word boundaries to at most `columns` characters.
///
/// An empty input produces a single empty line so blank lines in the plan
/// keep their vertical space.
fn wrap_line(line: &str, columns: usize) -> Vec<String> {
    if line.trim().is_empty() {
        return vec![String::new()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > columns {
            wrapped.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        wrapped.push(current);
    }

    wrapped
}
