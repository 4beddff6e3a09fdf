//! Renovation cost model: hard and soft cost lines for a quality tier.

use flip_core::{
    ArchitectureRule, CostBreakdown, FurnitureRule, InteriorDesignRule, PricingConfig,
    ProjectParameters,
};

/// Price the renovation of `params` at `quality`.
///
/// Tiers outside 1..=5 are priced with the tier-3 constants. Never fails.
pub fn compute_costs(
    params: &ProjectParameters,
    config: &PricingConfig,
    quality: i32,
) -> CostBreakdown {
    let m2 = params.built_area_m2;

    let construction = m2 * config.construction_m2.get(quality);
    let materials = m2 * config.materials_m2.get(quality);
    let classic = if params.classic_style {
        config.classic_surcharge
    } else {
        0.0
    };
    let interior_design = match &config.interior_design {
        InteriorDesignRule::PerM2 { rate } => m2 * rate.get(quality) + classic,
        InteriorDesignRule::MaterialsShare { share } => materials * share + classic,
    };
    let furniture = match &config.furniture {
        FurnitureRule::PerM2 { rate } => m2 * rate.get(quality),
        FurnitureRule::WithLogistics {
            rate,
            logistics,
            markup,
        } => {
            let base = m2 * rate.get(quality);
            base + logistics.get(quality) + base * markup
        }
    };
    let terrace = if params.terrace_m2 > 0.0 {
        params.terrace_m2 * config.terrace_rate_m2
    } else {
        0.0
    };
    let awning = if params.awning { config.awning_cost } else { 0.0 };
    let hard_costs = construction
        + materials
        + interior_design
        + furniture
        + terrace
        + awning
        + params.extras;

    let architecture = match &config.architecture {
        ArchitectureRule::PerM2 { rate } => m2 * rate.get(quality),
        ArchitectureRule::Flat { fee } => fee.get(quality),
    };
    let building_permit = m2 * config.permit_rate_m2;
    let plusvalia = params.sale_price * config.plusvalia_rate;
    let soft_costs = architecture
        + building_permit
        + config.sale_admin_fee
        + config.holding_cost
        + plusvalia;

    CostBreakdown {
        quality,
        construction,
        materials,
        interior_design,
        furniture,
        terrace,
        awning,
        extras: params.extras,
        hard_costs,
        architecture,
        building_permit,
        sale_admin: config.sale_admin_fee,
        holding_costs: config.holding_cost,
        plusvalia,
        soft_costs,
        total_costs: hard_costs + soft_costs,
    }
}
