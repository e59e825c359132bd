use crate::fit::{HelveticaMetrics, LINE_HEIGHT};
use crate::layout::{Rect, SheetLayout, TextBox};
use crate::types::Result;
use printpdf::*;
use std::path::Path;

/// Line width of the cut outlines (points)
const CUT_GUIDE_WIDTH: f32 = 0.5;

/// Grey level of the cut outlines
const CUT_GUIDE_GREY: f32 = 0.6;

pub async fn write_pdf(layout: &SheetLayout, output_path: impl AsRef<Path>) -> Result<()> {
    let layout = layout.clone();
    let output_path = output_path.as_ref().to_owned();

    let bytes = tokio::task::spawn_blocking(move || generate_pdf_bytes(&layout)).await??;

    tokio::fs::write(&output_path, bytes).await?;

    Ok(())
}

/// One PDF page per rendered sheet
pub fn generate_pdf_bytes(layout: &SheetLayout) -> Result<Vec<u8>> {
    let title = format!("Flashcards ({})", layout.side().name());
    let mut doc = PdfDocument::new(&title);

    let geometry = layout.geometry();
    let page_width = Mm::from(Pt(geometry.page_width_pt));
    let page_height = Mm::from(Pt(geometry.page_height_pt));

    let mut pages = Vec::new();
    for sheet in layout.sheets() {
        let mut ops = Vec::new();

        if layout.show_cut_guides() {
            ops.push(Op::SetOutlineColor {
                col: Color::Rgb(Rgb::new(CUT_GUIDE_GREY, CUT_GUIDE_GREY, CUT_GUIDE_GREY, None)),
            });
            ops.push(Op::SetOutlineThickness {
                pt: Pt(CUT_GUIDE_WIDTH),
            });
            for cut_box in &geometry.boxes {
                ops.push(outline(cut_box));
            }
        }

        for text_box in &sheet.boxes {
            let area = geometry.text_area(text_box.slot);
            push_text_ops(&mut ops, text_box, &area);
        }

        pages.push(PdfPage::new(page_width, page_height, ops));
    }

    doc.pages = pages;

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    for warning in &warnings {
        log::debug!("PDF save: {:?}", warning);
    }

    Ok(bytes)
}

fn outline(rect: &Rect) -> Op {
    let corner = |x: f32, y: f32| LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    };
    Op::DrawLine {
        line: Line {
            points: vec![
                corner(rect.x, rect.y),
                corner(rect.right(), rect.y),
                corner(rect.right(), rect.top()),
                corner(rect.x, rect.top()),
            ],
            is_closed: true,
        },
    }
}

/// Write the wrapped lines of a box, centred in its text area.
///
/// A rotated box is the unrotated layout turned 180° about the area centre.
fn push_text_ops(ops: &mut Vec<Op>, text_box: &TextBox, area: &Rect) {
    let size = text_box.size_pt;
    let lines = HelveticaMetrics::wrap(&text_box.text, size, area.width);
    if lines.is_empty() {
        return;
    }

    let line_height = size * LINE_HEIGHT;
    let block_height = lines.len() as f32 * line_height;
    let block_top = area.top() - (area.height - block_height).max(0.0) / 2.0;
    let centre_x = area.x + area.width / 2.0;
    let centre_y = area.y + area.height / 2.0;

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }

        let line_width = HelveticaMetrics::text_width(line, size);
        let x = area.x + (area.width - line_width) / 2.0;
        let baseline = block_top - i as f32 * line_height - size;

        let matrix = if text_box.rotated {
            TextMatrix::TranslateRotate(
                Pt(2.0 * centre_x - x),
                Pt(2.0 * centre_y - baseline),
                180.0,
            )
        } else {
            TextMatrix::Translate(Pt(x), Pt(baseline))
        };

        ops.push(Op::StartTextSection);
        ops.push(Op::SetFontSizeBuiltinFont {
            font: BuiltinFont::Helvetica,
            size: Pt(size),
        });
        ops.push(Op::SetTextMatrix { matrix });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(line.clone())],
            font: BuiltinFont::Helvetica,
        });
        ops.push(Op::EndTextSection);
    }
}
