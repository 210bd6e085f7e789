pub mod category;
pub mod constraint;
pub mod entropy;
pub mod generator;
pub mod presets;
pub mod range;

pub use category::{Category, CharClass, ClassCounts, classify, count_classes, simplify};
pub use constraint::Constraint;
pub use entropy::{derive_bytes, random_bytes};
pub use generator::Generator;
pub use presets::Registry;
pub use range::CharRange;
