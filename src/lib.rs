//! ROI+ report service: accepts a business-metrics submission, computes
//! inventory health and ROI projections, renders a PDF summary, and emails
//! it to the submitter.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
