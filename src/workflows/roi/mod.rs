//! ROI+ submission workflow: intake validation, metric computation, PDF
//! report rendering, and email delivery of the finished report.

pub mod domain;
pub(crate) mod format;
pub mod mailer;
pub(crate) mod notify;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;
pub mod storage;

pub use domain::{HealthBand, IntakeError, RoiIntakeRequest, RoiSubmission};
pub use mailer::{DeliveryError, EmailAttachment, MailTransport, OutboundEmail, SmtpMailer};
pub use report::{RenderError, ReportRenderer};
pub use router::roi_router;
pub use scoring::{health_score, project_roi, RoiProjection};
pub use service::{RoiReportOutcome, RoiReportService, RoiWorkflowError};
pub use storage::{ArtifactStore, ReportArtifact, StorageError};
