use std::sync::Arc;

use tracing::{debug, info};

use crate::config::CompanyProfile;

use super::domain::{HealthBand, IntakeError, RoiIntakeRequest};
use super::mailer::{DeliveryError, MailTransport};
use super::notify;
use super::report::{RenderError, ReportRenderer};
use super::scoring::{self, RoiProjection};
use super::storage::{report_filename, ArtifactStore, StorageError};

/// What a successful submission produces for the API response.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiReportOutcome {
    pub health_score: u8,
    pub health_band: HealthBand,
    pub projection: RoiProjection,
}

/// Error raised by the submission pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RoiWorkflowError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Sequential submission pipeline: validate, compute, render, store,
/// dispatch, release. No retries at any stage.
pub struct RoiReportService<M> {
    company: CompanyProfile,
    renderer: ReportRenderer,
    store: Arc<ArtifactStore>,
    transport: Arc<M>,
}

impl<M> RoiReportService<M>
where
    M: MailTransport + 'static,
{
    pub fn new(company: CompanyProfile, store: Arc<ArtifactStore>, transport: Arc<M>) -> Self {
        let renderer = ReportRenderer::new(company.clone());
        Self {
            company,
            renderer,
            store,
            transport,
        }
    }

    pub async fn submit(
        &self,
        request: RoiIntakeRequest,
    ) -> Result<RoiReportOutcome, RoiWorkflowError> {
        let submission = request.validate()?;
        info!(company = %submission.company, "processing roi submission");

        let health_score = scoring::health_score(&submission);
        let health_band = HealthBand::from_score(health_score);
        let projection = scoring::project_roi(&submission);
        debug!(health_score, roi_eur = projection.roi_eur, "metrics computed");

        let document = self.renderer.render(&submission, &projection, health_score)?;
        let artifact = self
            .store
            .store(&report_filename(&submission.company), &document)
            .await?;
        debug!(filename = %artifact.filename, "report rendered");

        let email = notify::report_email(
            &self.company,
            &submission,
            &projection,
            health_score,
            document,
        );
        let delivery = self.transport.send(email).await;

        // The artifact's one job is done once dispatch has been attempted;
        // release it on the failure path too.
        self.store.remove(&artifact).await;
        delivery?;

        info!(recipient = %submission.email, "roi report delivered");
        Ok(RoiReportOutcome {
            health_score,
            health_band,
            projection,
        })
    }
}
