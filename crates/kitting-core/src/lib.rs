//! Core library of the formwork kitting optimizer: BoQ data model, per-row
//! validation, the kit-grouping transformation, and ESG impact derivation.

pub mod esg;
pub mod optimizer;
pub mod types;
pub mod validate;

pub use esg::EsgImpact;
pub use optimizer::KitOptimizer;
pub use types::{BoqElement, KitDetail, KitError, KitPlan, Material, Result};
pub use validate::{has_errors, validate_elements, validation_error, FieldErrors};
