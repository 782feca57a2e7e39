use crate::types::*;
use std::collections::HashMap;

mod summary;
#[cfg(test)]
mod tests;

/// Groups BoQ elements into reusable kit types and derives plan statistics.
///
/// Pure, single-shot computation: no I/O, no randomness, safe to invoke
/// concurrently for independent inputs.
pub struct KitOptimizer {
    elements: Vec<BoqElement>,
}

/// Grouping key: material plus dimensions rounded to one decimal place.
/// Dimensions are held in tenths of a metre so the key is `Hash + Eq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    material: Material,
    length_dm: i64,
    width_dm: i64,
}

impl GroupKey {
    fn for_element(element: &BoqElement) -> Self {
        Self {
            material: element.material.clone(),
            length_dm: (element.length * 10.0).round() as i64,
            width_dm: (element.width * 10.0).round() as i64,
        }
    }
}

/// All elements sharing one grouping key. Intermediate only, never exposed.
struct KitGroup {
    material: Material,
    /// Representative dimensions, taken from the first element seen.
    length: f64,
    width: f64,
    total_quantity: u64,
    element_ids: Vec<String>,
}

impl KitOptimizer {
    /// Builds a new optimizer instance. Per-row validation has already
    /// happened at the submission boundary; only emptiness is checked here.
    pub fn new(elements: Vec<BoqElement>) -> Result<Self> {
        if elements.is_empty() {
            return Err(KitError::EmptyInput);
        }

        Ok(Self { elements })
    }

    /// Executes the grouping pass and returns the derived kit plan.
    pub fn optimize(&self) -> KitPlan {
        let groups = self.group_elements();
        let kit_details = groups.iter().map(Self::kit_detail).collect();
        self.build_plan(kit_details)
    }

    /// Buckets elements by `(material, rounded length, rounded width)`.
    /// Group emission order and the ids inside each group both follow
    /// first-seen order across the input traversal.
    fn group_elements(&self) -> Vec<KitGroup> {
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<KitGroup> = Vec::new();

        for element in &self.elements {
            let key = GroupKey::for_element(element);
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(KitGroup {
                    material: element.material.clone(),
                    length: element.length,
                    width: element.width,
                    total_quantity: 0,
                    element_ids: Vec::new(),
                });
                groups.len() - 1
            });

            let group = &mut groups[slot];
            group.total_quantity += u64::from(element.quantity);
            group.element_ids.push(element.element_id.clone());
        }

        groups
    }

    /// Derives the per-group kit requirement under the material's reuse limit.
    fn kit_detail(group: &KitGroup) -> KitDetail {
        let limit = group.material.reuse_limit();
        // ceil(qty / limit), floored at one kit for any positive quantity
        let required_qty = group.total_quantity.div_ceil(limit).max(1);

        KitDetail {
            dimensions: format!(
                "{}|{:.1}x{:.1}",
                group.material, group.length, group.width
            ),
            material: group.material.clone(),
            required_qty: required_qty as u32,
            repetition_count: round2(group.total_quantity as f64 / required_qty as f64),
            used_in_elements: group.element_ids.clone(),
        }
    }
}

/// Rounds to two decimal places, the plan's display precision.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
