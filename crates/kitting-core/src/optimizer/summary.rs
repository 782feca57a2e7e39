use super::*;

impl KitOptimizer {
    /// Aggregates plan-level statistics over the emitted kit details.
    pub(super) fn build_plan(&self, kit_details: Vec<KitDetail>) -> KitPlan {
        let original_boq_items: u64 = self
            .elements
            .iter()
            .map(|e| u64::from(e.quantity))
            .sum();
        let optimized_kits_required: u64 = kit_details
            .iter()
            .map(|k| u64::from(k.required_qty))
            .sum();

        let total_repetition_factor = if optimized_kits_required > 0 {
            round2(original_boq_items as f64 / optimized_kits_required as f64)
        } else {
            0.0
        };

        // Savings are defined in unit-count terms; monetary conversions live
        // in the presentation layer.
        let estimated_cost_savings_percent = if original_boq_items > 0 {
            round2(
                original_boq_items.saturating_sub(optimized_kits_required) as f64
                    / original_boq_items as f64
                    * 100.0,
            )
        } else {
            0.0
        };

        KitPlan {
            original_boq_items,
            optimized_kits_required,
            total_repetition_factor,
            estimated_cost_savings_percent,
            kit_details,
            execution_time_ms: None,
            run_id: None,
            processed_at: None,
        }
    }
}
