//! Fixed-layout PDF rendering of a computed ROI+ report.

mod layout;

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::config::CompanyProfile;

use super::domain::{HealthBand, RoiSubmission};
use super::scoring::RoiProjection;
use layout::{Fonts, PageWriter, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

/// Renders the five-section report document as an in-memory byte stream.
pub struct ReportRenderer {
    company: CompanyProfile,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to render report document: {0}")]
    Pdf(#[from] printpdf::Error),
}

impl ReportRenderer {
    pub fn new(company: CompanyProfile) -> Self {
        Self { company }
    }

    /// Produce the finished PDF. Inputs are read-only; any write error inside
    /// the document builder is fatal for the request.
    pub fn render(
        &self,
        submission: &RoiSubmission,
        projection: &RoiProjection,
        score: u8,
    ) -> Result<Vec<u8>, RenderError> {
        let band = HealthBand::from_score(score);
        let (doc, first_page, first_layer) = PdfDocument::new(
            "ROI+ Report",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "content",
        );
        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        };

        let mut page = PageWriter::first(&doc, first_page, first_layer);
        layout::summary_section(&mut page, &fonts, &self.company, submission, score, band);

        let mut page = PageWriter::next(&doc);
        layout::financial_section(&mut page, &fonts, projection);

        let mut page = PageWriter::next(&doc);
        layout::diagnostics_section(&mut page, &fonts, submission, projection);

        let mut page = PageWriter::next(&doc);
        layout::action_plan_section(&mut page, &fonts);

        let mut page = PageWriter::next(&doc);
        layout::next_steps_section(&mut page, &fonts, &self.company);

        Ok(doc.save_to_bytes()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company() -> CompanyProfile {
        CompanyProfile {
            name: "AI1team".to_string(),
            email: "roi@ai1team.com".to_string(),
            website: "https://ai1team.com".to_string(),
        }
    }

    fn submission() -> RoiSubmission {
        RoiSubmission {
            name: "Test User".to_string(),
            company: "Test Company Ltd".to_string(),
            email: "roi@ai1team.com".to_string(),
            revenue: 1_000_000.0,
            inventory: 200_000.0,
            sku_count: 5_000.0,
            oos_pct: 5.0,
            overstock_pct: 15.0,
            cogs_pct: 50.0,
            marketing_pct: 15.0,
            logistics_pct: 10.0,
            operations_pct: 8.0,
            warehouses: 2,
            channels: 3,
        }
    }

    #[test]
    fn render_produces_a_pdf_stream() {
        let input = submission();
        let projection = crate::workflows::roi::scoring::project_roi(&input);
        let renderer = ReportRenderer::new(company());

        let bytes = renderer
            .render(&input, &projection, 54)
            .expect("report renders");

        assert!(bytes.starts_with(b"%PDF"), "output is not a PDF stream");
        assert!(bytes.len() > 1_000, "suspiciously small document");
    }

    #[test]
    fn render_does_not_mutate_inputs() {
        let input = submission();
        let projection = crate::workflows::roi::scoring::project_roi(&input);
        let before = (input.clone(), projection.clone());

        ReportRenderer::new(company())
            .render(&input, &projection, 54)
            .expect("report renders");

        assert_eq!(before.0, input);
        assert_eq!(before.1, projection);
    }
}
