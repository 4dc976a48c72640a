use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Raw submission as it arrives on the wire. Every field is optional so
/// validation can enumerate everything that is missing in one response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoiIntakeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "rev")]
    pub revenue: Option<f64>,
    #[serde(default, rename = "inv")]
    pub inventory: Option<f64>,
    #[serde(default, rename = "sku")]
    pub sku_count: Option<f64>,
    #[serde(default, rename = "oos")]
    pub oos_pct: Option<f64>,
    #[serde(default, rename = "over")]
    pub overstock_pct: Option<f64>,
    #[serde(default, rename = "cogs")]
    pub cogs_pct: Option<f64>,
    #[serde(default, rename = "mkt")]
    pub marketing_pct: Option<f64>,
    #[serde(default, rename = "logi")]
    pub logistics_pct: Option<f64>,
    #[serde(default, rename = "ops")]
    pub operations_pct: Option<f64>,
    #[serde(default)]
    pub warehouses: Option<u32>,
    #[serde(default)]
    pub channels: Option<u32>,
    /// Accepted from the form but not used by any computation.
    #[serde(default)]
    pub accuracy: Option<f64>,
}

/// Validated submission the rest of the pipeline operates on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiSubmission {
    pub name: String,
    pub company: String,
    pub email: String,
    pub revenue: f64,
    pub inventory: f64,
    pub sku_count: f64,
    pub oos_pct: f64,
    pub overstock_pct: f64,
    pub cogs_pct: f64,
    pub marketing_pct: f64,
    pub logistics_pct: f64,
    pub operations_pct: f64,
    pub warehouses: u32,
    pub channels: u32,
}

/// Validation failures reported to the client as 400s.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Field '{field}' must be a finite, non-negative number")]
    OutOfRange { field: &'static str },
    #[error("Annual revenue must be greater than zero")]
    ZeroRevenue,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

fn present(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|raw| !raw.trim().is_empty())
        .unwrap_or(false)
}

impl RoiIntakeRequest {
    /// Check presence, email shape, and numeric ranges, producing the
    /// validated submission the metric formulas require.
    pub fn validate(self) -> Result<RoiSubmission, IntakeError> {
        let mut missing = Vec::new();

        if !present(&self.name) {
            missing.push("name");
        }
        if !present(&self.company) {
            missing.push("company");
        }
        if !present(&self.email) {
            missing.push("email");
        }
        let numerics = [
            ("rev", self.revenue),
            ("inv", self.inventory),
            ("sku", self.sku_count),
            ("oos", self.oos_pct),
            ("over", self.overstock_pct),
            ("cogs", self.cogs_pct),
            ("mkt", self.marketing_pct),
            ("logi", self.logistics_pct),
            ("ops", self.operations_pct),
        ];
        for (field, value) in numerics {
            if value.is_none() {
                missing.push(field);
            }
        }
        if !missing.is_empty() {
            return Err(IntakeError::MissingFields(missing));
        }

        let email = self.email.unwrap_or_default().trim().to_string();
        if !email_pattern().is_match(&email) {
            return Err(IntakeError::InvalidEmail);
        }

        for (field, value) in numerics {
            let value = value.unwrap_or_default();
            if !value.is_finite() || value < 0.0 {
                return Err(IntakeError::OutOfRange { field });
            }
        }
        let revenue = self.revenue.unwrap_or_default();
        if revenue == 0.0 {
            return Err(IntakeError::ZeroRevenue);
        }

        Ok(RoiSubmission {
            name: self.name.unwrap_or_default().trim().to_string(),
            company: self.company.unwrap_or_default().trim().to_string(),
            email,
            revenue,
            inventory: self.inventory.unwrap_or_default(),
            sku_count: self.sku_count.unwrap_or_default(),
            oos_pct: self.oos_pct.unwrap_or_default(),
            overstock_pct: self.overstock_pct.unwrap_or_default(),
            cogs_pct: self.cogs_pct.unwrap_or_default(),
            marketing_pct: self.marketing_pct.unwrap_or_default(),
            logistics_pct: self.logistics_pct.unwrap_or_default(),
            operations_pct: self.operations_pct.unwrap_or_default(),
            warehouses: self.warehouses.unwrap_or(0),
            channels: self.channels.unwrap_or(0),
        })
    }
}

/// Qualitative band a health score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl HealthBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::NeedsImprovement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#22c55e",
            Self::Good => "#3b82f6",
            Self::Fair => "#f59e0b",
            Self::NeedsImprovement => "#ef4444",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Excellent => "Your inventory health is exceptional",
            Self::Good => "Solid performance with room for optimization",
            Self::Fair => "Significant improvement opportunities exist",
            Self::NeedsImprovement => "Critical optimization required",
        }
    }
}
