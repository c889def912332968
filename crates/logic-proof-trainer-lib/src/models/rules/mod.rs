pub mod inference;
pub mod equivalence;
pub mod technique;

pub use inference::InferenceRule;
pub use equivalence::EquivalenceRule;
pub use technique::{ProofTechnique, is_contradiction};
