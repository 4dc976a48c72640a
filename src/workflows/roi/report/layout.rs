//! Page composition for the five report sections. Builtin Helvetica only,
//! so all page text stays in the ASCII range (amounts carry an `EUR` prefix
//! instead of the euro sign).

use chrono::{Datelike, Utc};
use printpdf::{
    Color, IndirectFontRef, Mm, PdfDocumentReference, PdfLayerIndex, PdfLayerReference,
    PdfPageIndex, Rgb,
};

use crate::config::CompanyProfile;

use super::super::domain::{HealthBand, RoiSubmission};
use super::super::format::{format_currency, format_percent};
use super::super::scoring::RoiProjection;

pub(super) const PAGE_WIDTH_MM: f32 = 210.0;
pub(super) const PAGE_HEIGHT_MM: f32 = 297.0;

const MARGIN_MM: f32 = 18.0;
const TOP_MM: f32 = 272.0;

const NAVY: &str = "#0b3d91";
const INK: &str = "#333333";
const MUTED: &str = "#666666";
const FAINT: &str = "#999999";

pub(super) struct Fonts {
    pub regular: IndirectFontRef,
    pub bold: IndirectFontRef,
}

/// Cursor writing top-down on one page.
pub(super) struct PageWriter {
    layer: PdfLayerReference,
    y: f32,
}

impl PageWriter {
    pub(super) fn first(
        doc: &PdfDocumentReference,
        page: PdfPageIndex,
        layer: PdfLayerIndex,
    ) -> Self {
        Self {
            layer: doc.get_page(page).get_layer(layer),
            y: TOP_MM,
        }
    }

    pub(super) fn next(doc: &PdfDocumentReference) -> Self {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
        Self {
            layer: doc.get_page(page).get_layer(layer),
            y: TOP_MM,
        }
    }

    fn write(&mut self, font: &IndirectFontRef, size: f32, hex: &str, text: &str) {
        self.layer.set_fill_color(hex_color(hex));
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
        // Advance roughly 1.4 line heights; 1pt = 0.3528mm.
        self.y -= size * 0.3528 * 1.4;
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn footer(&mut self, font: &IndirectFontRef, text: &str) {
        self.layer.set_fill_color(hex_color(FAINT));
        self.layer.use_text(text, 9.0, Mm(MARGIN_MM), Mm(14.0), font);
    }
}

fn hex_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .unwrap_or(0) as f32
            / 255.0
    };
    Color::Rgb(Rgb::new(channel(0..2), channel(2..4), channel(4..6), None))
}

pub(super) fn summary_section(
    page: &mut PageWriter,
    fonts: &Fonts,
    company: &CompanyProfile,
    submission: &RoiSubmission,
    score: u8,
    band: HealthBand,
) {
    page.write(&fonts.bold, 28.0, NAVY, "ROI+ Report");
    page.write(&fonts.regular, 11.0, MUTED, &company.name);
    page.write(&fonts.regular, 10.0, FAINT, "AI resenja za pametniji e-commerce");
    page.gap(14.0);

    page.write(&fonts.regular, 13.0, INK, &submission.name);
    page.write(&fonts.bold, 20.0, NAVY, &submission.company);
    page.write(&fonts.regular, 11.0, MUTED, &submission.email);
    page.gap(14.0);

    page.write(&fonts.bold, 18.0, NAVY, "Health Score Analysis");
    page.write(&fonts.bold, 52.0, band.color(), &score.to_string());
    page.write(&fonts.regular, 18.0, MUTED, band.label());
    page.write(&fonts.regular, 11.0, INK, band.description());
    page.gap(14.0);

    page.write(&fonts.bold, 16.0, NAVY, "Key Input Values");
    page.write(
        &fonts.regular,
        10.0,
        INK,
        &format!(
            "Annual Revenue: EUR {}",
            format_currency(submission.revenue.round() as i64)
        ),
    );
    page.write(
        &fonts.regular,
        10.0,
        INK,
        &format!(
            "Inventory Value: EUR {}",
            format_currency(submission.inventory.round() as i64)
        ),
    );
    page.write(
        &fonts.regular,
        10.0,
        INK,
        &format!(
            "SKU Count: {}",
            format_currency(submission.sku_count.round() as i64)
        ),
    );
    page.write(
        &fonts.regular,
        10.0,
        INK,
        &format!(
            "Overstock: {}% | Out-of-Stock: {}%",
            submission.overstock_pct, submission.oos_pct
        ),
    );

    page.footer(
        &fonts.regular,
        &format!("{} (c) {} - Beograd", company.name, Utc::now().year()),
    );
}

pub(super) fn financial_section(page: &mut PageWriter, fonts: &Fonts, projection: &RoiProjection) {
    page.write(&fonts.bold, 26.0, NAVY, "Financial Impact Analysis");
    page.gap(8.0);

    page.write(&fonts.regular, 12.0, MUTED, "Estimated Annual ROI+ Effect");
    page.write(
        &fonts.bold,
        36.0,
        NAVY,
        &format!("EUR {}", format_currency(projection.roi_eur)),
    );
    page.write(
        &fonts.bold,
        18.0,
        "#22c55e",
        &format!("{} of Revenue", format_percent(projection.roi_pct)),
    );
    page.gap(14.0);

    page.write(&fonts.bold, 16.0, NAVY, "Key Metrics");
    page.write(
        &fonts.regular,
        11.0,
        INK,
        &format!(
            "Inventory-to-Revenue Ratio: {}",
            format_percent(projection.inventory_to_revenue)
        ),
    );
    page.write(
        &fonts.regular,
        11.0,
        INK,
        &format!(
            "AI Savings Potential: EUR {}/year",
            format_currency(projection.ai_savings)
        ),
    );
    page.write(
        &fonts.regular,
        11.0,
        INK,
        &format!("Dead Stock: EUR {}", format_currency(projection.dead_stock)),
    );
    page.gap(8.0);

    page.write(&fonts.bold, 14.0, NAVY, "Investment");
    page.write(
        &fonts.regular,
        11.0,
        INK,
        &format!("Monthly: EUR {}", format_currency(projection.monthly_fee)),
    );
    page.write(
        &fonts.regular,
        11.0,
        INK,
        &format!("Annual: EUR {}", format_currency(projection.annual_fee)),
    );
}

pub(super) fn diagnostics_section(
    page: &mut PageWriter,
    fonts: &Fonts,
    submission: &RoiSubmission,
    projection: &RoiProjection,
) {
    page.write(&fonts.bold, 26.0, NAVY, "Diagnostic Analysis");
    page.gap(8.0);

    page.write(&fonts.bold, 16.0, NAVY, "Overstock Signal");
    page.write(
        &fonts.regular,
        11.0,
        INK,
        &format!("Current: {}%", submission.overstock_pct),
    );
    page.write(
        &fonts.regular,
        11.0,
        INK,
        &format!(
            "Impact: EUR {} tied up",
            format_currency(projection.dead_stock)
        ),
    );
    page.gap(8.0);

    page.write(&fonts.bold, 16.0, NAVY, "Out-of-Stock Signal");
    page.write(
        &fonts.regular,
        11.0,
        INK,
        &format!("Current: {}%", submission.oos_pct),
    );
    let lost_revenue = (submission.revenue * submission.oos_pct / 100.0).round() as i64;
    page.write(
        &fonts.regular,
        11.0,
        INK,
        &format!("Lost Revenue: EUR {}/year", format_currency(lost_revenue)),
    );
    page.gap(8.0);

    page.write(&fonts.bold, 16.0, NAVY, "Cost Structure");
    page.write(
        &fonts.regular,
        11.0,
        INK,
        &format!(
            "COGS: {}% | Marketing: {}%",
            submission.cogs_pct, submission.marketing_pct
        ),
    );
    page.write(
        &fonts.regular,
        11.0,
        INK,
        &format!(
            "Logistics: {}% | Operations: {}%",
            submission.logistics_pct, submission.operations_pct
        ),
    );
}

pub(super) fn action_plan_section(page: &mut PageWriter, fonts: &Fonts) {
    page.write(&fonts.bold, 26.0, NAVY, "90-Day Action Plan");
    page.gap(8.0);

    page.write(&fonts.bold, 15.0, NAVY, "Days 1-30: Foundation");
    page.write(&fonts.regular, 10.0, INK, "- Data integration and analysis");
    page.write(&fonts.regular, 10.0, INK, "- AI model training");
    page.write(&fonts.regular, 10.0, INK, "- Baseline metrics setup");
    page.gap(8.0);

    page.write(&fonts.bold, 15.0, NAVY, "Days 31-60: Optimization");
    page.write(&fonts.regular, 10.0, INK, "- Deploy predictive recommendations");
    page.write(&fonts.regular, 10.0, INK, "- Automated reorder points");
    page.write(&fonts.regular, 10.0, INK, "- Multi-channel balancing");
    page.gap(8.0);

    page.write(&fonts.bold, 15.0, NAVY, "Days 61-90: Scale");
    page.write(&fonts.regular, 10.0, INK, "- Full AI autopilot");
    page.write(&fonts.regular, 10.0, INK, "- Performance review");
    page.write(&fonts.regular, 10.0, INK, "- ROI measurement");
}

pub(super) fn next_steps_section(page: &mut PageWriter, fonts: &Fonts, company: &CompanyProfile) {
    page.write(&fonts.bold, 26.0, NAVY, "Next Steps");
    page.gap(8.0);

    page.write(&fonts.bold, 17.0, NAVY, "1. Strategy Call");
    page.write(
        &fonts.regular,
        11.0,
        INK,
        "Schedule a 30-minute session with our AI experts",
    );
    page.write(
        &fonts.regular,
        11.0,
        INK,
        &format!("Contact: {}", company.email),
    );
    page.gap(14.0);

    page.write(&fonts.bold, 17.0, NAVY, "2. Proof of Concept");
    page.write(&fonts.regular, 11.0, INK, "Begin with a 30-day pilot program");
    page.write(&fonts.regular, 11.0, INK, "- Limited scope implementation");
    page.write(&fonts.regular, 11.0, INK, "- Real-time tracking");
    page.write(&fonts.regular, 11.0, INK, "- No long-term commitment");
    page.gap(14.0);

    page.write(&fonts.bold, 20.0, NAVY, "Ready to Get Started?");
    page.write(
        &fonts.regular,
        12.0,
        INK,
        &format!("Email: {}", company.email),
    );
    page.write(
        &fonts.regular,
        12.0,
        INK,
        &format!("Visit: {}", company.website),
    );

    page.footer(
        &fonts.regular,
        &format!("{} (c) {} - Beograd", company.name, Utc::now().year()),
    );
}
