//! Pure metric formulas. Everything here is deterministic over a validated
//! submission; no I/O, no shared state.

use serde::{Deserialize, Serialize};

use super::domain::RoiSubmission;

/// Projected financial indicators derived from one submission.
///
/// Monetary values are whole-unit EUR; percentage fields keep two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiProjection {
    pub ai_savings: i64,
    #[serde(rename = "roiEUR")]
    pub roi_eur: i64,
    pub roi_pct: f64,
    pub monthly_fee: i64,
    pub annual_fee: i64,
    pub inventory_to_revenue: f64,
    pub dead_stock: i64,
}

/// Composite inventory health indicator in [1, 99], or 0 when revenue is 0.
///
/// Starts at 100 and subtracts capped penalties for the inventory-to-revenue
/// ratio, overstock, out-of-stock, and an overweight cost structure.
pub fn health_score(input: &RoiSubmission) -> u8 {
    if input.revenue == 0.0 {
        return 0;
    }

    let mut score = 100.0;
    score -= (input.inventory / input.revenue * 140.0).min(40.0);
    score -= (input.overstock_pct * 0.9).min(20.0);
    score -= (input.oos_pct * 1.0).min(15.0);

    let total_costs =
        input.cogs_pct + input.marketing_pct + input.logistics_pct + input.operations_pct;
    if total_costs > 85.0 {
        score -= 10.0;
    }
    if total_costs > 95.0 {
        score -= 8.0;
    }

    score.round().clamp(1.0, 99.0) as u8
}

/// Project annual ROI, savings potential, dead stock, and the service fee.
///
/// Percentage fields report 0.0 when revenue is 0, matching the zero-revenue
/// handling of [`health_score`].
pub fn project_roi(input: &RoiSubmission) -> RoiProjection {
    let overstock_loss = input.inventory * (input.overstock_pct / 100.0);
    let oos_loss = input.revenue * (input.oos_pct / 100.0);
    let ai_savings = overstock_loss * 0.30 + oos_loss * 0.40;

    let roi_eur = input.revenue * 0.02 + input.inventory * 0.10 + input.revenue * 0.01;
    let roi_pct = if input.revenue > 0.0 {
        roi_eur / input.revenue * 100.0
    } else {
        0.0
    };

    let mut fee = 1000.0
        + 300.0 * f64::from(input.warehouses)
        + 200.0 * f64::from(input.channels)
        + 150.0 * (input.sku_count / 1000.0);
    if fee < 3000.0 {
        fee = 3000.0;
    }

    let inventory_to_revenue = if input.revenue > 0.0 {
        input.inventory / input.revenue * 100.0
    } else {
        0.0
    };

    RoiProjection {
        ai_savings: ai_savings.round() as i64,
        roi_eur: roi_eur.round() as i64,
        roi_pct: round2(roi_pct),
        monthly_fee: fee.round() as i64,
        annual_fee: (fee * 12.0).round() as i64,
        inventory_to_revenue: round2(inventory_to_revenue),
        dead_stock: overstock_loss.round() as i64,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn reference_submission_scores_fifty_four() {
        // 100 - 28 (ratio) - 13.5 (overstock) - 5 (oos), costs total 83.
        assert_eq!(health_score(&submission()), 54);
    }

    #[test]
    fn zero_revenue_scores_zero() {
        let mut input = submission();
        input.revenue = 0.0;
        assert_eq!(health_score(&input), 0);
    }

    #[test]
    fn score_stays_in_band_for_positive_revenue() {
        let mut input = submission();
        for overstock in [0.0, 10.0, 50.0, 100.0] {
            for oos in [0.0, 5.0, 60.0] {
                input.overstock_pct = overstock;
                input.oos_pct = oos;
                let score = health_score(&input);
                assert!((1..=99).contains(&score), "score {score} out of band");
            }
        }
    }

    #[test]
    fn perfect_inputs_clamp_at_ninety_nine() {
        let mut input = submission();
        input.inventory = 0.0;
        input.overstock_pct = 0.0;
        input.oos_pct = 0.0;
        input.cogs_pct = 20.0;
        input.marketing_pct = 5.0;
        input.logistics_pct = 5.0;
        input.operations_pct = 5.0;
        assert_eq!(health_score(&input), 99);
    }

    #[test]
    fn increasing_overstock_never_raises_the_score() {
        let mut input = submission();
        let mut previous = health_score(&input);
        for overstock in [5.0, 10.0, 20.0, 40.0, 80.0] {
            input.overstock_pct = overstock;
            let next = health_score(&input);
            assert!(next <= previous, "score rose from {previous} to {next}");
            previous = next;
        }
    }

    #[test]
    fn cost_structure_penalties_are_cumulative() {
        let mut input = submission();
        input.inventory = 0.0;
        input.overstock_pct = 0.0;
        input.oos_pct = 0.0;

        input.cogs_pct = 86.0;
        input.marketing_pct = 0.0;
        input.logistics_pct = 0.0;
        input.operations_pct = 0.0;
        assert_eq!(health_score(&input), 90);

        input.cogs_pct = 96.0;
        assert_eq!(health_score(&input), 82);
    }

    #[test]
    fn boundary_without_overstock_or_oos_penalties() {
        let mut input = submission();
        input.overstock_pct = 0.0;
        input.oos_pct = 0.0;
        // 100 - 28 (ratio); costs total 83 adds nothing.
        assert_eq!(health_score(&input), 72);
    }

    #[test]
    fn penalties_are_capped() {
        let mut input = submission();
        input.revenue = 100.0;
        input.inventory = 1_000.0;
        input.overstock_pct = 90.0;
        input.oos_pct = 90.0;
        input.cogs_pct = 60.0;
        input.marketing_pct = 20.0;
        input.logistics_pct = 10.0;
        input.operations_pct = 10.0;
        // 100 - 40 - 20 - 15 - 18 = 7
        assert_eq!(health_score(&input), 7);
    }

    #[test]
    fn reference_submission_projection() {
        let projection = project_roi(&submission());
        assert_eq!(projection.roi_eur, 50_000);
        assert_eq!(projection.roi_pct, 5.0);
        // fee = 1000 + 600 + 600 + 750 = 2950, floored to 3000
        assert_eq!(projection.monthly_fee, 3_000);
        assert_eq!(projection.annual_fee, 36_000);
        // 30000 * 0.30 + 50000 * 0.40
        assert_eq!(projection.ai_savings, 29_000);
        assert_eq!(projection.dead_stock, 30_000);
        assert_eq!(projection.inventory_to_revenue, 20.0);
    }

    #[test]
    fn fee_floor_holds_for_small_operations() {
        let mut input = submission();
        input.warehouses = 0;
        input.channels = 0;
        input.sku_count = 0.0;
        assert_eq!(project_roi(&input).monthly_fee, 3_000);
    }

    #[test]
    fn fee_scales_past_the_floor() {
        let mut input = submission();
        input.warehouses = 10;
        input.channels = 4;
        input.sku_count = 20_000.0;
        let projection = project_roi(&input);
        // 1000 + 3000 + 800 + 3000 = 7800
        assert_eq!(projection.monthly_fee, 7_800);
        assert_eq!(projection.annual_fee, 93_600);
    }

    #[test]
    fn projection_is_idempotent() {
        let input = submission();
        assert_eq!(project_roi(&input), project_roi(&input));
    }

    #[test]
    fn zero_revenue_yields_zero_percentages() {
        let mut input = submission();
        input.revenue = 0.0;
        let projection = project_roi(&input);
        assert_eq!(projection.roi_pct, 0.0);
        assert_eq!(projection.inventory_to_revenue, 0.0);
        // inventory-driven components survive
        assert_eq!(projection.roi_eur, 20_000);
    }

    #[test]
    fn projection_serializes_with_wire_names() {
        let value = serde_json::to_value(project_roi(&submission())).expect("serializes");
        assert_eq!(value["roiEUR"], 50_000);
        assert_eq!(value["roiPct"], 5.0);
        assert_eq!(value["monthlyFee"], 3_000);
        assert_eq!(value["inventoryToRevenue"], 20.0);
        assert_eq!(value["deadStock"], 30_000);
        assert_eq!(value["aiSavings"], 29_000);
        assert_eq!(value["annualFee"], 36_000);
    }
}
