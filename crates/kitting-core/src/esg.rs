//! Environmental-impact figures derived from a finished kit plan.
//!
//! Display-layer arithmetic: the plan's savings percentage stays in
//! unit-count terms, and these conversions never feed back into it.

use crate::types::KitPlan;
use serde::Serialize;

pub const KG_CO2_PER_TRUCK_TRIP: f64 = 104.0;
pub const KITS_PER_TRUCK: f64 = 8.0;
pub const STEEL_KG_PER_KIT: f64 = 1200.0;
pub const STEEL_CO2_FACTOR: f64 = 1.85;
pub const COST_PER_KIT_INR: u64 = 85_000;
/// One tree absorbs ~22 kg CO₂ per year, i.e. ~45 trees per tonne.
pub const TREES_PER_TONNE_CO2: f64 = 45.0;

/// ESG benefit summary for one optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EsgImpact {
    pub units_saved: u64,
    pub trucks_saved: u64,
    pub co2_saved_tonnes: u64,
    pub trees_equivalent: u64,
    pub cost_saved_inr: u64,
}

impl EsgImpact {
    pub fn from_plan(plan: &KitPlan) -> Self {
        Self::from_unit_counts(plan.original_boq_items, plan.optimized_kits_required)
    }

    /// Converts saved kit units into transport and manufacturing CO₂ plus a
    /// monetary proxy. All zeros when nothing was saved.
    pub fn from_unit_counts(original_units: u64, optimized_kits: u64) -> Self {
        if optimized_kits >= original_units {
            return Self {
                units_saved: 0,
                trucks_saved: 0,
                co2_saved_tonnes: 0,
                trees_equivalent: 0,
                cost_saved_inr: 0,
            };
        }

        let units_saved = original_units - optimized_kits;
        let trucks_saved = (units_saved as f64 / KITS_PER_TRUCK).round() as u64;
        let transport_co2 = trucks_saved as f64 * KG_CO2_PER_TRUCK_TRIP;
        let manufacturing_co2 = units_saved as f64 * STEEL_KG_PER_KIT * STEEL_CO2_FACTOR;
        let co2_saved_tonnes = ((transport_co2 + manufacturing_co2) / 1000.0).round() as u64;
        let trees_equivalent = (co2_saved_tonnes as f64 * TREES_PER_TONNE_CO2).round() as u64;

        Self {
            units_saved,
            trucks_saved,
            co2_saved_tonnes,
            trees_equivalent,
            cost_saved_inr: units_saved * COST_PER_KIT_INR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eighteen_units_saved() {
        let esg = EsgImpact::from_unit_counts(20, 2);

        assert_eq!(esg.units_saved, 18);
        // round(18 / 8) = 2 trucks
        assert_eq!(esg.trucks_saved, 2);
        // (2 * 104 + 18 * 1200 * 1.85) / 1000 = 40.168 -> 40 t
        assert_eq!(esg.co2_saved_tonnes, 40);
        assert_eq!(esg.trees_equivalent, 1800);
        assert_eq!(esg.cost_saved_inr, 18 * 85_000);
    }

    #[test]
    fn no_savings_yields_zero_impact() {
        let esg = EsgImpact::from_unit_counts(5, 5);
        assert_eq!(esg, EsgImpact::from_unit_counts(3, 7));
        assert_eq!(esg.units_saved, 0);
        assert_eq!(esg.cost_saved_inr, 0);
    }
}
