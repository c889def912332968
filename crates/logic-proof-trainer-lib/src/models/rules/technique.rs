use serde::{Deserialize, Serialize};
use crate::models::formula::Formula;

/// Proof techniques that involve subproofs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofTechnique {
    /// Conditional Proof: Assume P, derive Q, conclude P → Q
    ConditionalProof,

    /// Indirect Proof (Reductio ad Absurdum):
    /// - Assume ~P, derive contradiction, conclude P
    /// - Assume P, derive contradiction, conclude ~P
    IndirectProof,
}

/// Check if a formula represents a contradiction (⊥ or P · ~P)
pub fn is_contradiction(formula: &Formula) -> bool {
    // Check for ⊥
    if matches!(formula, Formula::Contradiction) {
        return true;
    }
    // Check for P · ~P (conjunction where one conjunct is negation of other)
    if let Formula::And(left, right) = formula {
        // left = ~right
        if let Formula::Not(inner) = left.as_ref() {
            if inner.as_ref() == right.as_ref() {
                return true;
            }
        }
        // right = ~left
        if let Formula::Not(inner) = right.as_ref() {
            if inner.as_ref() == left.as_ref() {
                return true;
            }
        }
    }
    false
}

impl ProofTechnique {
    pub fn name(&self) -> &'static str {
        match self {
            ProofTechnique::ConditionalProof => "Conditional Proof",
            ProofTechnique::IndirectProof => "Indirect Proof",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            ProofTechnique::ConditionalProof => "CP",
            ProofTechnique::IndirectProof => "IP",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProofTechnique::ConditionalProof => {
                "Assume the antecedent P, derive the consequent Q within the subproof, \
                 then conclude P → Q outside the subproof."
            }
            ProofTechnique::IndirectProof => {
                "Assume P or ~P, derive a contradiction (⊥ or Q · ~Q), \
                 then conclude the opposite of your assumption."
            }
        }
    }

    /// Get the conclusion formula given the assumption and the derived formula
    pub fn get_conclusion(&self, assumption: &Formula, derived: &Formula) -> Option<Formula> {
        match self {
            ProofTechnique::ConditionalProof => {
                // Assume P, derive Q → conclude P → Q
                Some(Formula::Implies(
                    Box::new(assumption.clone()),
                    Box::new(derived.clone()),
                ))
            }
            ProofTechnique::IndirectProof => {
                // Must derive a contradiction (⊥ or P · ~P)
                if !is_contradiction(derived) {
                    return None;
                }
                // IP handles both directions:
                // - Assume ~P, derive contradiction → conclude P (removes negation)
                // - Assume P, derive contradiction → conclude ~P (adds negation)
                if let Formula::Not(inner) = assumption {
                    Some(inner.as_ref().clone())
                } else {
                    Some(Formula::Not(Box::new(assumption.clone())))
                }
            }
        }
    }

    /// Verify that the conclusion follows correctly from the subproof
    pub fn verify_conclusion(
        &self,
        assumption: &Formula,
        derived: &Formula,
        conclusion: &Formula,
    ) -> bool {
        if let Some(expected) = self.get_conclusion(assumption, derived) {
            expected == *conclusion
        } else {
            false
        }
    }

    /// Get all proof techniques
    pub fn all() -> Vec<ProofTechnique> {
        vec![
            ProofTechnique::ConditionalProof,
            ProofTechnique::IndirectProof,
        ]
    }

    /// Check if this technique requires a contradiction to be derived
    pub fn requires_contradiction(&self) -> bool {
        matches!(self, ProofTechnique::IndirectProof)
    }

    /// Get the type of assumption expected for this technique
    pub fn expected_assumption_type(&self) -> AssumptionType {
        match self {
            ProofTechnique::ConditionalProof => AssumptionType::Any,
            // IP accepts any assumption - it will negate whatever you assumed
            ProofTechnique::IndirectProof => AssumptionType::Any,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssumptionType {
    /// Any formula can be assumed
    Any,
}
