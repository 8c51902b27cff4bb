//! PDF output for composed receipts.

use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfLayerReference,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::ReceiptDocument;
use crate::receipt::layout::{compose, FixedLayout, PaintOp};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF composition failed: {0}")]
    Pdf(String),
}

/// Paints receipt documents onto a fixed form.
#[derive(Debug, Clone)]
pub struct ReceiptRenderer {
    layout: FixedLayout,
    template_path: Option<PathBuf>,
}

impl ReceiptRenderer {
    pub fn new(layout: FixedLayout, template_path: Option<PathBuf>) -> Self {
        Self {
            layout,
            template_path,
        }
    }

    pub fn layout(&self) -> &FixedLayout {
        &self.layout
    }

    /// Render `doc` to a single-page PDF.
    ///
    /// A missing or unreadable background template is skipped.
    pub fn render(&self, doc: &ReceiptDocument) -> Result<Vec<u8>, RenderError> {
        let ops = compose(doc, &self.layout);
        let background = self.template_path.as_deref().and_then(load_template);

        let (pdf, page, layer) = PdfDocument::new(
            format!("Official Receipt {}", doc.receipt_number),
            Mm(self.layout.page_width),
            Mm(self.layout.page_height),
            "Receipt".to_string(),
        );
        let canvas = pdf.get_page(page).get_layer(layer);

        if let Some(image) = background {
            paint_background(&canvas, &image, &self.layout);
        }

        let font = pdf
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(format!("{:?}", e)))?;

        for op in &ops {
            paint(&canvas, op, &font, self.layout.page_height);
        }

        let bytes = pdf
            .save_to_bytes()
            .map_err(|e| RenderError::Pdf(format!("{:?}", e)))?;

        tracing::debug!(
            receipt_number = %doc.receipt_number,
            fields = ops.len(),
            size = bytes.len(),
            "Receipt rendered"
        );

        Ok(bytes)
    }
}

fn paint(canvas: &PdfLayerReference, op: &PaintOp, font: &IndirectFontRef, page_height: f32) {
    // PDF user space grows upwards from the bottom-left corner.
    canvas.use_text(
        op.text.as_str(),
        op.font_size,
        Mm(op.x),
        Mm(page_height - op.baseline),
        font,
    );
}

fn load_template(path: &Path) -> Option<DynamicImage> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Receipt template not found, rendering without it");
        return None;
    }

    match image_crate::open(path) {
        Ok(image) => Some(image),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to decode receipt template, rendering without it"
            );
            None
        }
    }
}

fn paint_background(canvas: &PdfLayerReference, image: &DynamicImage, layout: &FixedLayout) {
    let (width_px, height_px) = image.dimensions();
    if width_px == 0 || height_px == 0 {
        return;
    }

    // Pick the DPI that makes the image exactly page-wide, then stretch vertically.
    let dpi = width_px as f32 * 25.4 / layout.page_width;
    let natural_height = height_px as f32 / dpi * 25.4;

    Image::from_dynamic_image(image).add_to_layer(
        canvas.clone(),
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(0.0)),
            scale_y: Some(layout.page_height / natural_height),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}
