use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reuse limit applied to materials without a dedicated entry in the table.
pub const DEFAULT_REUSE_LIMIT: u64 = 10;

/// Formwork material. Only the three known materials carry dedicated reuse
/// limits; anything else falls back to [`DEFAULT_REUSE_LIMIT`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Material {
    Steel,
    Plywood,
    Aluform,
    Other(String),
}

impl Material {
    /// Maximum pour cycles one physical kit of this material sustains before
    /// replacement. Domain constant, not derived from data.
    pub fn reuse_limit(&self) -> u64 {
        match self {
            Material::Steel => 10,
            Material::Plywood => 15,
            Material::Aluform => 100,
            Material::Other(_) => DEFAULT_REUSE_LIMIT,
        }
    }
}

impl From<String> for Material {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Steel" => Material::Steel,
            "Plywood" => Material::Plywood,
            "Aluform" => Material::Aluform,
            _ => Material::Other(s),
        }
    }
}

impl From<Material> for String {
    fn from(m: Material) -> Self {
        m.to_string()
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Material::Steel => f.write_str("Steel"),
            Material::Plywood => f.write_str("Plywood"),
            Material::Aluform => f.write_str("Aluform"),
            Material::Other(name) => f.write_str(name),
        }
    }
}

/// One row of the bill of quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoqElement {
    pub element_id: String,
    pub material: Material,
    /// Metres; only used to form the dimension key.
    pub length: f64,
    pub width: f64,
    /// Physical units required for this element.
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// One distinct kit type in the plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitDetail {
    /// Display key, `"{material}|{length:.1}x{width:.1}"`.
    pub dimensions: String,
    pub material: Material,
    /// Physical kit sets needed to service the group's total quantity.
    pub required_qty: u32,
    /// Average reuses per kit set, `group quantity / required_qty`, 2 dp.
    pub repetition_count: f64,
    /// Contributing element ids, first-seen order.
    pub used_in_elements: Vec<String>,
}

/// Output of a kitting optimization run.
///
/// The provenance fields are attached by the transport layer after the run;
/// the optimizer itself never fills them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitPlan {
    pub original_boq_items: u64,
    pub optimized_kits_required: u64,
    pub total_repetition_factor: f64,
    pub estimated_cost_savings_percent: f64,
    pub kit_details: Vec<KitDetail>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub execution_time_ms: Option<String>,
    #[serde(rename = "_run_id", skip_serializing_if = "Option::is_none", default)]
    pub run_id: Option<String>,
    #[serde(rename = "_processed_at", skip_serializing_if = "Option::is_none", default)]
    pub processed_at: Option<String>,
}

impl KitPlan {
    /// Attaches caller-supplied provenance metadata.
    pub fn with_provenance(
        mut self,
        run_id: String,
        processed_at: String,
        execution_time_ms: String,
    ) -> Self {
        self.run_id = Some(run_id);
        self.processed_at = Some(processed_at);
        self.execution_time_ms = Some(execution_time_ms);
        self
    }
}

/// Error type for kitting optimization
#[derive(Debug, thiserror::Error)]
pub enum KitError {
    #[error("At least one BoQ element must be provided")]
    EmptyInput,

    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, KitError>;
