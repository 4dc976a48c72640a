use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use roi_plus::config::AppConfig;
use roi_plus::error::AppError;
use roi_plus::telemetry;
use roi_plus::workflows::roi::{
    health_score, project_roi, roi_router, ArtifactStore, HealthBand, ReportRenderer,
    RoiReportService, RoiSubmission, SmtpMailer,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "ROI+ Report Service",
    about = "Serve the ROI+ calculator API or compute a report from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute health score and ROI projections for one set of inputs
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Submitter name shown on the report
    #[arg(long, default_value = "Demo User")]
    name: String,
    /// Company the report is prepared for
    #[arg(long)]
    company: String,
    /// Submitter email shown on the report
    #[arg(long, default_value = "demo@example.com")]
    email: String,
    /// Annual revenue, EUR
    #[arg(long)]
    rev: f64,
    /// Inventory value, EUR
    #[arg(long)]
    inv: f64,
    /// SKU count
    #[arg(long)]
    sku: f64,
    /// Out-of-stock percentage
    #[arg(long)]
    oos: f64,
    /// Overstock percentage
    #[arg(long)]
    over: f64,
    /// Cost of goods sold, percent of revenue
    #[arg(long)]
    cogs: f64,
    /// Marketing spend, percent of revenue
    #[arg(long)]
    mkt: f64,
    /// Logistics spend, percent of revenue
    #[arg(long)]
    logi: f64,
    /// Operations spend, percent of revenue
    #[arg(long)]
    ops: f64,
    /// Warehouse count
    #[arg(long, default_value_t = 0)]
    warehouses: u32,
    /// Sales channel count
    #[arg(long, default_value_t = 0)]
    channels: u32,
    /// Also write the rendered PDF report to this path
    #[arg(long)]
    pdf: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Report(args) => run_report(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let store = Arc::new(ArtifactStore::new(
        config.storage.dir.clone(),
        config.storage.cleanup_delay,
    ));
    let _sweeper = store.spawn_sweeper();

    let mailer = Arc::new(SmtpMailer::from_config(&config.smtp, &config.company)?);
    let service = Arc::new(RoiReportService::new(config.company.clone(), store, mailer));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(roi_router(service, config.environment.verbose_errors()))
        .layer(prometheus_layer)
        .layer(cors_layer(&config.cors.allowed_origins));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "roi+ report service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let submission = RoiSubmission {
        name: args.name,
        company: args.company,
        email: args.email,
        revenue: args.rev,
        inventory: args.inv,
        sku_count: args.sku,
        oos_pct: args.oos,
        overstock_pct: args.over,
        cogs_pct: args.cogs,
        marketing_pct: args.mkt,
        logistics_pct: args.logi,
        operations_pct: args.ops,
        warehouses: args.warehouses,
        channels: args.channels,
    };

    let score = health_score(&submission);
    let band = HealthBand::from_score(score);
    let projection = project_roi(&submission);

    println!("ROI+ report for {}", submission.company);
    println!("Health score: {} ({})", score, band.label());
    println!("  {}", band.description());
    println!("\nProjections");
    println!(
        "- Annual ROI+: EUR {} ({:.2}% of revenue)",
        projection.roi_eur, projection.roi_pct
    );
    println!("- AI savings potential: EUR {}/year", projection.ai_savings);
    println!("- Dead stock: EUR {}", projection.dead_stock);
    println!(
        "- Inventory-to-revenue ratio: {:.2}%",
        projection.inventory_to_revenue
    );
    println!("\nInvestment");
    println!("- Monthly fee: EUR {}", projection.monthly_fee);
    println!("- Annual fee: EUR {}", projection.annual_fee);

    if let Some(path) = args.pdf {
        let renderer = ReportRenderer::new(config.company);
        let document = renderer.render(&submission, &projection, score)?;
        std::fs::write(&path, document)?;
        println!("\nPDF report written to {}", path.display());
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK", "timestamp": Utc::now().to_rfc3339() }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn healthcheck_reports_ok_with_timestamp() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "OK");
        let timestamp = body["timestamp"].as_str().expect("timestamp present");
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn cors_layer_drops_malformed_origins() {
        let _layer = cors_layer(&[
            "http://localhost:5500".to_string(),
            "not a header value\u{0}".to_string(),
        ]);
    }
}
