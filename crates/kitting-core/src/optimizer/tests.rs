use super::*;
use chrono::NaiveDate;

fn element(id: &str, material: Material, length: f64, width: f64, quantity: u32) -> BoqElement {
    BoqElement {
        element_id: id.to_string(),
        material,
        length,
        width,
        quantity,
        start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
    }
}

#[test]
fn single_steel_group() {
    let optimizer =
        KitOptimizer::new(vec![element("ZONE1-PIER-0001", Material::Steel, 2.4, 1.2, 20)])
            .unwrap();
    let plan = optimizer.optimize();

    assert_eq!(plan.kit_details.len(), 1);
    let kit = &plan.kit_details[0];
    assert_eq!(kit.dimensions, "Steel|2.4x1.2");
    assert_eq!(kit.material, Material::Steel);
    // ceil(20 / 10) = 2 kits, each reused 10 times
    assert_eq!(kit.required_qty, 2);
    assert_eq!(kit.repetition_count, 10.0);

    assert_eq!(plan.original_boq_items, 20);
    assert_eq!(plan.optimized_kits_required, 2);
    assert_eq!(plan.total_repetition_factor, 10.0);
    assert_eq!(plan.estimated_cost_savings_percent, 90.0);
}

#[test]
fn same_dimensions_merge_into_one_group() {
    let optimizer = KitOptimizer::new(vec![
        element("SLAB-0005", Material::Plywood, 1.8, 1.8, 10),
        element("SLAB-0006", Material::Plywood, 1.8, 1.8, 15),
    ])
    .unwrap();
    let plan = optimizer.optimize();

    assert_eq!(plan.kit_details.len(), 1);
    let kit = &plan.kit_details[0];
    // 25 units under Plywood's limit of 15: ceil(25 / 15) = 2
    assert_eq!(kit.required_qty, 2);
    assert_eq!(kit.repetition_count, 12.5);
    assert_eq!(kit.used_in_elements, vec!["SLAB-0005", "SLAB-0006"]);
}

#[test]
fn quantity_below_limit_needs_one_kit() {
    let optimizer =
        KitOptimizer::new(vec![element("COLUMN-0003", Material::Aluform, 3.0, 0.6, 5)]).unwrap();
    let plan = optimizer.optimize();

    let kit = &plan.kit_details[0];
    assert_eq!(kit.required_qty, 1);
    // Actual reuse, not capped upward to the limit of 100
    assert_eq!(kit.repetition_count, 5.0);
}

#[test]
fn unknown_material_uses_default_limit() {
    let material: Material = "Concrete".to_string().into();
    let optimizer =
        KitOptimizer::new(vec![element("FOOTING-0009", material, 2.0, 2.0, 25)]).unwrap();
    let plan = optimizer.optimize();

    let kit = &plan.kit_details[0];
    assert_eq!(kit.dimensions, "Concrete|2.0x2.0");
    // default limit 10: ceil(25 / 10) = 3
    assert_eq!(kit.required_qty, 3);
    assert_eq!(kit.repetition_count, 8.33);
}

#[test]
fn empty_input_is_rejected() {
    // Resolved policy: empty submissions fail construction instead of
    // producing a degenerate all-zero plan.
    let result = KitOptimizer::new(Vec::new());
    assert!(matches!(result, Err(KitError::EmptyInput)));
}

#[test]
fn groups_keyed_by_rounded_dimensions() {
    // 2.44 and 2.38 both round to 2.4 and merge; 2.45 rounds to 2.5 and
    // stays separate.
    let optimizer = KitOptimizer::new(vec![
        element("A", Material::Steel, 2.44, 1.2, 4),
        element("B", Material::Steel, 2.38, 1.2, 6),
        element("C", Material::Steel, 2.45, 1.2, 3),
    ])
    .unwrap();
    let plan = optimizer.optimize();

    assert_eq!(plan.kit_details.len(), 2);
    assert_eq!(plan.kit_details[0].used_in_elements, vec!["A", "B"]);
    assert_eq!(plan.kit_details[1].used_in_elements, vec!["C"]);
}

#[test]
fn same_dimensions_different_material_stay_separate() {
    let optimizer = KitOptimizer::new(vec![
        element("A", Material::Steel, 2.4, 1.2, 10),
        element("B", Material::Plywood, 2.4, 1.2, 10),
    ])
    .unwrap();
    let plan = optimizer.optimize();

    assert_eq!(plan.kit_details.len(), 2);
    assert_eq!(plan.kit_details[0].dimensions, "Steel|2.4x1.2");
    assert_eq!(plan.kit_details[1].dimensions, "Plywood|2.4x1.2");
}

#[test]
fn kit_details_follow_first_seen_order() {
    let optimizer = KitOptimizer::new(vec![
        element("W1", Material::Aluform, 3.0, 0.2, 2),
        element("P1", Material::Steel, 2.4, 1.2, 5),
        element("W2", Material::Aluform, 3.0, 0.2, 2),
        element("S1", Material::Plywood, 1.8, 1.8, 8),
    ])
    .unwrap();
    let plan = optimizer.optimize();

    let order: Vec<&str> = plan
        .kit_details
        .iter()
        .map(|k| k.dimensions.as_str())
        .collect();
    assert_eq!(
        order,
        vec!["Aluform|3.0x0.2", "Steel|2.4x1.2", "Plywood|1.8x1.8"]
    );
    assert_eq!(plan.kit_details[0].used_in_elements, vec!["W1", "W2"]);
}

fn sample_project() -> Vec<BoqElement> {
    vec![
        element("ZONE1-METRO-PIER-CAP-0001", Material::Steel, 2.4, 1.2, 20),
        element("ZONE1-METRO-PIER-CAP-0002", Material::Steel, 2.4, 1.2, 20),
        element("ZONE2-TOWER-COLUMN-0003", Material::Aluform, 3.0, 0.6, 15),
        element("ZONE3-PODIUM-SLAB-0005", Material::Plywood, 1.8, 1.8, 30),
        element("ZONE4-RETAINING-WALL-0007", Material::Aluform, 2.4, 2.4, 10),
        element("ZONE1-BRIDGE-GIRDER-0008", Material::Steel, 4.0, 0.4, 8),
    ]
}

#[test]
fn conserves_original_quantity_total() {
    let elements = sample_project();
    let expected: u64 = elements.iter().map(|e| u64::from(e.quantity)).sum();

    let plan = KitOptimizer::new(elements).unwrap().optimize();
    assert_eq!(plan.original_boq_items, expected);
}

#[test]
fn repetition_counts_stay_within_material_limits() {
    let plan = KitOptimizer::new(sample_project()).unwrap().optimize();

    for kit in &plan.kit_details {
        assert!(kit.required_qty >= 1);
        assert!(kit.repetition_count > 0.0);
        assert!(kit.repetition_count <= kit.material.reuse_limit() as f64);
    }
    assert!(plan.estimated_cost_savings_percent >= 0.0);
    assert!(plan.estimated_cost_savings_percent < 100.0);
}

#[test]
fn optimize_is_idempotent() {
    let optimizer = KitOptimizer::new(sample_project()).unwrap();

    let first = serde_json::to_string(&optimizer.optimize()).unwrap();
    let second = serde_json::to_string(&optimizer.optimize()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn permuting_input_changes_order_but_not_quantities() {
    let forward = KitOptimizer::new(sample_project()).unwrap().optimize();

    let mut reversed_input = sample_project();
    reversed_input.reverse();
    let reversed = KitOptimizer::new(reversed_input).unwrap().optimize();

    assert_eq!(forward.original_boq_items, reversed.original_boq_items);
    assert_eq!(
        forward.optimized_kits_required,
        reversed.optimized_kits_required
    );
    assert_eq!(
        forward.total_repetition_factor,
        reversed.total_repetition_factor
    );
    assert_eq!(
        forward.estimated_cost_savings_percent,
        reversed.estimated_cost_savings_percent
    );

    // Same groups with identical per-group numbers, independent of order
    assert_eq!(forward.kit_details.len(), reversed.kit_details.len());
    for kit in &forward.kit_details {
        let twin = reversed
            .kit_details
            .iter()
            .find(|k| k.dimensions == kit.dimensions)
            .unwrap();
        assert_eq!(twin.required_qty, kit.required_qty);
        assert_eq!(twin.repetition_count, kit.repetition_count);
    }
}

#[test]
fn provenance_is_caller_supplied() {
    let plan = KitOptimizer::new(sample_project()).unwrap().optimize();
    assert!(plan.run_id.is_none());
    assert!(plan.processed_at.is_none());
    assert!(plan.execution_time_ms.is_none());

    let stamped = plan.with_provenance(
        "RUN-42".to_string(),
        "2026-03-01T09:30:00Z".to_string(),
        "0.84 ms".to_string(),
    );
    let json = serde_json::to_value(&stamped).unwrap();
    assert_eq!(json["_run_id"], "RUN-42");
    assert_eq!(json["_processed_at"], "2026-03-01T09:30:00Z");
    assert_eq!(json["execution_time_ms"], "0.84 ms");
}
