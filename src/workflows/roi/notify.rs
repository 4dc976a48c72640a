//! Message templating for the outbound report email.

use chrono::{Datelike, Utc};

use crate::config::CompanyProfile;

use super::domain::{HealthBand, RoiSubmission};
use super::format::{format_currency, format_percent};
use super::mailer::{EmailAttachment, OutboundEmail};
use super::scoring::RoiProjection;

/// Attachment name presented to the recipient (storage filenames carry
/// uniqueness suffixes the reader should not see).
pub(crate) fn attachment_filename(company: &str) -> String {
    let slug: String = company
        .trim()
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .collect();
    format!("ROIplus_Report_{slug}.pdf")
}

/// Build the full outbound message: subject, HTML body, CC to the company
/// inbox, and the rendered PDF as the single attachment.
pub(crate) fn report_email(
    company: &CompanyProfile,
    submission: &RoiSubmission,
    projection: &RoiProjection,
    score: u8,
    document: Vec<u8>,
) -> OutboundEmail {
    let band = HealthBand::from_score(score);

    OutboundEmail {
        to: submission.email.clone(),
        cc: Some(company.email.clone()),
        subject: format!("Your ROI+\u{2122} Report is Ready \u{2014} {}", company.name),
        html_body: html_body(company, submission, projection, score, band),
        attachment: EmailAttachment {
            filename: attachment_filename(&submission.company),
            bytes: document,
        },
    }
}

fn html_body(
    company: &CompanyProfile,
    submission: &RoiSubmission,
    projection: &RoiProjection,
    score: u8,
    band: HealthBand,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: #0b3d91; color: white; padding: 30px; text-align: center; border-radius: 8px; }}
    .content {{ background: #f9fafb; padding: 30px; margin-top: 20px; border-radius: 8px; }}
    .score {{ font-size: 48px; font-weight: bold; color: {band_color}; }}
    .metric {{ background: white; padding: 15px; margin: 10px 0; border-radius: 6px; }}
    .button {{ background: #d4af37; color: white; padding: 12px 30px; text-decoration: none; border-radius: 6px; display: inline-block; margin: 20px 0; }}
    .footer {{ text-align: center; color: #999; font-size: 12px; margin-top: 30px; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Your ROI+ Report is Ready!</h1>
    </div>
    <div class="content">
      <p>Dear <strong>{name}</strong>,</p>
      <p>Thank you for using the {company_name} ROI+ Calculator. Your comprehensive 5-page report is attached.</p>
      <div style="text-align: center; background: white; padding: 20px; border-radius: 8px; margin: 20px 0;">
        <div style="color: #666; font-size: 14px;">YOUR HEALTH SCORE</div>
        <div class="score">{score}</div>
        <div style="color: #666; font-size: 16px;">{band_label}</div>
      </div>
      <div class="metric">
        <strong>Estimated Annual ROI+:</strong> &euro;{roi_eur} ({roi_pct})
      </div>
      <div class="metric">
        <strong>AI Savings Potential:</strong> &euro;{ai_savings}
      </div>
      <div class="metric">
        <strong>Dead Stock Identified:</strong> &euro;{dead_stock}
      </div>
      <p><strong>What's in your report:</strong></p>
      <ul>
        <li>Health Score analysis</li>
        <li>Financial impact projections</li>
        <li>Diagnostic insights</li>
        <li>90-day action plan</li>
        <li>Next steps</li>
      </ul>
      <div style="text-align: center;">
        <a href="mailto:{company_email}" class="button">Schedule Strategy Call</a>
      </div>
      <p>Questions? Reply to this email or contact us at <a href="mailto:{company_email}">{company_email}</a></p>
      <p>Best regards,<br><strong>{company_name} Team</strong></p>
    </div>
    <div class="footer">
      <p>{company_name} &copy; {year} &mdash; Beograd<br>
      <a href="{website}">{website}</a></p>
    </div>
  </div>
</body>
</html>
"#,
        band_color = band.color(),
        name = submission.name,
        company_name = company.name,
        score = score,
        band_label = band.label(),
        roi_eur = format_currency(projection.roi_eur),
        roi_pct = format_percent(projection.roi_pct),
        ai_savings = format_currency(projection.ai_savings),
        dead_stock = format_currency(projection.dead_stock),
        company_email = company.email,
        year = Utc::now().year(),
        website = company.website,
    )
}
