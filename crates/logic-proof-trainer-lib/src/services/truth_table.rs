use crate::models::Formula;
use std::collections::{BTreeSet, HashSet};

// Constants
const MASK_32: u32 = 0xFFFFFFFF;
const TAUTOLOGY: u32 = 0xFFFFFFFF;
const CONTRADICTION: u32 = 0x00000000;

// ─── Dynamic truth table engine (supports >5 variables) ──────────────────────

/// Dynamic truth table backed by a Vec<u64> bitvector.
/// Supports up to 20 variables (2^20 = 1M rows, ~128 KB).
#[derive(Debug, Clone)]
pub struct DynTruthTable {
    bits: Vec<u64>,
    num_vars: u8,
}

impl DynTruthTable {
    /// Number of u64 words needed for `n` variables (2^n bits / 64 bits per word).
    fn words(num_vars: u8) -> usize {
        let total_bits = 1u64 << num_vars as u64;
        ((total_bits + 63) / 64) as usize
    }

    /// Build the truth table for variable at `index` among `num_vars` variables.
    /// Variable 0 alternates in blocks of 2^(n-1), variable n-1 alternates every bit.
    pub fn new_var(index: u8, num_vars: u8) -> Self {
        let n_words = Self::words(num_vars);
        let mut bits = vec![0u64; n_words];
        // The block size for variable `index` is 2^(num_vars - 1 - index).
        let block_size: u64 = 1u64 << (num_vars as u64 - 1 - index as u64);

        let total_rows = 1u64 << num_vars as u64;
        for row in 0..total_rows {
            // Variable is true when (row / block_size) is even
            if (row / block_size) % 2 == 0 {
                let word_idx = (row / 64) as usize;
                let bit_idx = row % 64;
                bits[word_idx] |= 1u64 << bit_idx;
            }
        }
        Self { bits, num_vars }
    }

    /// All-true (tautology) table.
    pub fn tautology(num_vars: u8) -> Self {
        let n_words = Self::words(num_vars);
        let total_bits = 1u64 << num_vars as u64;
        let mut bits = vec![!0u64; n_words];
        // Mask the last word if total_bits is not a multiple of 64
        let remainder = total_bits % 64;
        if remainder != 0 && !bits.is_empty() {
            let last = bits.len() - 1;
            bits[last] = (1u64 << remainder) - 1;
        }
        Self { bits, num_vars }
    }

    /// All-false (contradiction) table.
    pub fn contradiction(num_vars: u8) -> Self {
        let n_words = Self::words(num_vars);
        Self { bits: vec![0u64; n_words], num_vars }
    }

    pub fn not(&self) -> Self {
        let total_bits = 1u64 << self.num_vars as u64;
        let remainder = total_bits % 64;
        let mut bits: Vec<u64> = self.bits.iter().map(|w| !w).collect();
        if remainder != 0 && !bits.is_empty() {
            let last = bits.len() - 1;
            bits[last] &= (1u64 << remainder) - 1;
        }
        Self { bits, num_vars: self.num_vars }
    }

    pub fn and(&self, other: &Self) -> Self {
        debug_assert_eq!(self.num_vars, other.num_vars);
        let bits = self.bits.iter().zip(&other.bits).map(|(a, b)| a & b).collect();
        Self { bits, num_vars: self.num_vars }
    }

    pub fn or(&self, other: &Self) -> Self {
        debug_assert_eq!(self.num_vars, other.num_vars);
        let bits = self.bits.iter().zip(&other.bits).map(|(a, b)| a | b).collect();
        Self { bits, num_vars: self.num_vars }
    }

    pub fn implies(&self, other: &Self) -> Self {
        self.not().or(other)
    }

    pub fn biconditional(&self, other: &Self) -> Self {
        debug_assert_eq!(self.num_vars, other.num_vars);
        let total_bits = 1u64 << self.num_vars as u64;
        let remainder = total_bits % 64;
        let mut bits: Vec<u64> = self.bits.iter().zip(&other.bits).map(|(a, b)| !(a ^ b)).collect();
        if remainder != 0 && !bits.is_empty() {
            let last = bits.len() - 1;
            bits[last] &= (1u64 << remainder) - 1;
        }
        Self { bits, num_vars: self.num_vars }
    }

    pub fn is_tautology(&self) -> bool {
        let taut = Self::tautology(self.num_vars);
        self.bits == taut.bits
    }

    pub fn is_contradiction(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    pub fn eq(&self, other: &Self) -> bool {
        self.num_vars == other.num_vars && self.bits == other.bits
    }
}

/// Collect atoms from a formula into a sorted Vec (alphabetical, deterministic).
fn collect_sorted_atoms(formula: &Formula) -> Vec<String> {
    let atoms: BTreeSet<String> = formula.atoms().into_iter().collect();
    atoms.into_iter().collect()
}

/// Compute a dynamic truth table for any formula (supports >5 variables).
pub fn compute_truth_table_dynamic(formula: &Formula) -> DynTruthTable {
    let atoms = collect_sorted_atoms(formula);
    let num_vars = atoms.len().max(1) as u8;
    let var_map: std::collections::HashMap<&str, u8> = atoms.iter().enumerate()
        .map(|(i, a)| (a.as_str(), i as u8))
        .collect();
    eval_dyn(formula, &var_map, num_vars)
}

fn eval_dyn(formula: &Formula, var_map: &std::collections::HashMap<&str, u8>, num_vars: u8) -> DynTruthTable {
    match formula {
        Formula::Atom(name) => {
            if let Some(&idx) = var_map.get(name.as_str()) {
                DynTruthTable::new_var(idx, num_vars)
            } else {
                DynTruthTable::tautology(num_vars)
            }
        }
        Formula::Not(inner) => eval_dyn(inner, var_map, num_vars).not(),
        Formula::And(l, r) => eval_dyn(l, var_map, num_vars).and(&eval_dyn(r, var_map, num_vars)),
        Formula::Or(l, r) => eval_dyn(l, var_map, num_vars).or(&eval_dyn(r, var_map, num_vars)),
        Formula::Implies(l, r) => eval_dyn(l, var_map, num_vars).implies(&eval_dyn(r, var_map, num_vars)),
        Formula::Biconditional(l, r) => eval_dyn(l, var_map, num_vars).biconditional(&eval_dyn(r, var_map, num_vars)),
        Formula::Contradiction => DynTruthTable::contradiction(num_vars),
    }
}

/// Check if a formula is a tautology, auto-selecting the engine.
/// Uses the fast u32 path for formulas with ≤5 standard atoms (P,Q,R,S,T),
/// dynamic path otherwise.
pub fn is_tautology_dynamic(formula: &Formula) -> bool {
    let atoms = formula.atoms();
    let standard = ["P", "Q", "R", "S", "T"];
    if atoms.len() <= 5 && atoms.iter().all(|a| standard.contains(&a.as_str())) {
        is_tautology(formula)
    } else {
        compute_truth_table_dynamic(formula).is_tautology()
    }
}

/// Variable truth tables (standard row ordering PQRST from 11111 to 00000)
fn var_truth_table(name: &str) -> u32 {
    match name {
        "P" => 0xFFFF0000,
        "Q" => 0xFF00FF00,
        "R" => 0xF0F0F0F0,
        "S" => 0xCCCCCCCC,
        "T" => 0xAAAAAAAA,
        _ => 0xFFFF0000, // Default to P pattern for unknown vars
    }
}

/// Compute 32-bit truth table for any formula
pub fn compute_truth_table(formula: &Formula) -> u32 {
    match formula {
        Formula::Atom(name) => var_truth_table(name),
        Formula::Not(inner) => !compute_truth_table(inner) & MASK_32,
        Formula::And(l, r) => compute_truth_table(l) & compute_truth_table(r),
        Formula::Or(l, r) => compute_truth_table(l) | compute_truth_table(r),
        Formula::Implies(l, r) => (!compute_truth_table(l) | compute_truth_table(r)) & MASK_32,
        Formula::Biconditional(l, r) => !(compute_truth_table(l) ^ compute_truth_table(r)) & MASK_32,
        Formula::Contradiction => CONTRADICTION,
    }
}

// === Semantic Checks ===

/// Check if a formula is a tautology (always true)
pub fn is_tautology(formula: &Formula) -> bool {
    compute_truth_table(formula) == TAUTOLOGY
}

/// Check if a formula is a contradiction (always false)
pub fn is_contradiction(formula: &Formula) -> bool {
    compute_truth_table(formula) == CONTRADICTION
}

/// Check if two formulas are semantically equivalent
pub fn are_equivalent(f1: &Formula, f2: &Formula) -> bool {
    compute_truth_table(f1) == compute_truth_table(f2)
}

/// Check if a set of premises is consistent (not contradictory)
pub fn premises_consistent(premises: &[Formula]) -> bool {
    let combined: u32 = premises.iter()
        .map(|p| compute_truth_table(p))
        .fold(TAUTOLOGY, |acc, tt| acc & tt);
    combined != CONTRADICTION
}

/// Check if premises semantically entail a conclusion
pub fn entails(premises: &[Formula], conclusion: &Formula) -> bool {
    let combined_premises: u32 = premises.iter()
        .map(|p| compute_truth_table(p))
        .fold(TAUTOLOGY, |acc, tt| acc & tt);
    let conclusion_tt = compute_truth_table(conclusion);
    // Counterexample = row where premises true but conclusion false
    (combined_premises & (!conclusion_tt & MASK_32)) == CONTRADICTION
}

/// Check if any single premise alone entails the conclusion
pub fn single_premise_entails(premises: &[Formula], conclusion: &Formula) -> bool {
    let conclusion_tt = compute_truth_table(conclusion);
    for p in premises {
        let premise_tt = compute_truth_table(p);
        // Check if premise alone entails conclusion
        if (premise_tt & (!conclusion_tt & MASK_32)) == CONTRADICTION {
            return true;
        }
    }
    false
}

/// Check if the negation of the conclusion is semantically equivalent to any premise
pub fn conclusion_negation_available(premises: &[Formula], conclusion: &Formula) -> bool {
    let neg_conclusion_tt = !compute_truth_table(conclusion) & MASK_32;
    premises.iter().any(|p| compute_truth_table(p) == neg_conclusion_tt)
}

/// Check if a conditional conclusion is trivially provable via explosion
/// (i.e., one of the antecedents' negations is available as a premise)
pub fn conditional_trivial_via_explosion(premises: &[Formula], conclusion: &Formula) -> bool {
    // Extract antecedent chain from nested conditionals
    let mut antecedents = vec![];
    let mut current = conclusion;
    while let Formula::Implies(ant, cons) = current {
        antecedents.push(ant.as_ref());
        current = cons.as_ref();
    }
    if antecedents.is_empty() { return false; }

    // Check if ~antecedent is equivalent to any premise
    for ant in antecedents {
        let neg_ant_tt = !compute_truth_table(ant) & MASK_32;
        if premises.iter().any(|p| compute_truth_table(p) == neg_ant_tt) {
            return true;
        }
    }
    false
}

/// Check if all premises are necessary for the entailment
pub fn all_premises_necessary(premises: &[Formula], conclusion: &Formula) -> bool {
    if !entails(premises, conclusion) { return false; }
    for i in 0..premises.len() {
        let reduced: Vec<_> = premises.iter().enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, p)| p.clone())
            .collect();
        if entails(&reduced, conclusion) {
            return false; // Premise i was redundant
        }
    }
    true
}

/// Check if there are redundant (semantically equivalent) premises
pub fn has_redundant_premises(premises: &[Formula]) -> bool {
    let truth_tables: Vec<u32> = premises.iter().map(compute_truth_table).collect();
    let unique: HashSet<u32> = truth_tables.iter().copied().collect();
    truth_tables.len() != unique.len()
}

// === Forcing Check Functions ===

/// Check if theorem FORCES conditional proof.
/// True if: conclusion is A⊃B AND premises alone don't entail B
pub fn forces_cp(premises: &[Formula], conclusion: &Formula) -> bool {
    if let Formula::Implies(_, consequent) = conclusion {
        // If premises already entail the consequent, CP is optional
        // (can just derive B, then wrap in trivial CP)
        !entails(premises, consequent)
    } else {
        false // Not a conditional conclusion
    }
}

/// Check if theorem FORCES case split (∨-Elim).
/// True if: premises contain A∨B AND neither ~A nor ~B is available
pub fn forces_case_split(premises: &[Formula]) -> bool {
    for p in premises {
        if let Formula::Or(left, right) = p {
            let neg_left_tt = !compute_truth_table(left) & MASK_32;
            let neg_right_tt = !compute_truth_table(right) & MASK_32;

            let neg_left_available = premises.iter()
                .any(|q| compute_truth_table(q) == neg_left_tt);
            let neg_right_available = premises.iter()
                .any(|q| compute_truth_table(q) == neg_right_tt);

            // If neither negation available, DS is blocked → must case split
            if !neg_left_available && !neg_right_available {
                return true;
            }
        }
    }
    false
}

/// Check if theorem FORCES indirect proof.
/// True if: conclusion is not directly derivable via single basic rule application
/// AND not a conditional (which would use CP instead)
pub fn forces_ip(premises: &[Formula], conclusion: &Formula) -> bool {
    // IP is typically needed for:
    // 1. Atomic conclusions not derivable via MP/Simp/DS
    // 2. Negation conclusions not derivable via MT
    // 3. Classical tautology patterns

    // Skip if it's a conditional (CP territory)
    if matches!(conclusion, Formula::Implies(_, _)) {
        return false;
    }

    // Skip if it's a disjunction (Add territory) or conjunction (Conj territory)
    if matches!(conclusion, Formula::Or(_, _) | Formula::And(_, _)) {
        return false;
    }

    // For atoms and negations: check if directly derivable
    !can_derive_directly(premises, conclusion)
}

/// Helper: Check if conclusion is directly derivable via ONE basic rule application
fn can_derive_directly(premises: &[Formula], conclusion: &Formula) -> bool {
    let conclusion_tt = compute_truth_table(conclusion);

    // 1. Direct availability (0 steps)
    if premises.iter().any(|p| compute_truth_table(p) == conclusion_tt) {
        return true;
    }

    // 2. MP: Find A⊃B where B ≡ conclusion, and A available
    for p in premises {
        if let Formula::Implies(ant, cons) = p {
            if compute_truth_table(cons.as_ref()) == conclusion_tt {
                let ant_tt = compute_truth_table(ant.as_ref());
                if premises.iter().any(|q| compute_truth_table(q) == ant_tt) {
                    return true;
                }
            }
        }
    }

    // 3. MT: If conclusion is ~A, find A⊃B and ~B
    if let Formula::Not(inner) = conclusion {
        let inner_tt = compute_truth_table(inner.as_ref());
        for p in premises {
            if let Formula::Implies(ant, cons) = p {
                if compute_truth_table(ant.as_ref()) == inner_tt {
                    // Found A⊃B where A matches. Need ~B available.
                    let neg_cons_tt = !compute_truth_table(cons.as_ref()) & MASK_32;
                    if premises.iter().any(|q| compute_truth_table(q) == neg_cons_tt) {
                        return true;
                    }
                }
            }
        }
    }

    // 4. Simp: Find A∧B where A ≡ conclusion or B ≡ conclusion
    for p in premises {
        if let Formula::And(left, right) = p {
            if compute_truth_table(left.as_ref()) == conclusion_tt ||
               compute_truth_table(right.as_ref()) == conclusion_tt {
                return true;
            }
        }
    }

    // 5. DS: Find A∨B and ~A where B ≡ conclusion (or vice versa)
    for p in premises {
        if let Formula::Or(left, right) = p {
            // A∨B, ~A ⊢ B
            if compute_truth_table(right.as_ref()) == conclusion_tt {
                let neg_left_tt = !compute_truth_table(left.as_ref()) & MASK_32;
                if premises.iter().any(|q| compute_truth_table(q) == neg_left_tt) {
                    return true;
                }
            }
            // A∨B, ~B ⊢ A
            if compute_truth_table(left.as_ref()) == conclusion_tt {
                let neg_right_tt = !compute_truth_table(right.as_ref()) & MASK_32;
                if premises.iter().any(|q| compute_truth_table(q) == neg_right_tt) {
                    return true;
                }
            }
        }
    }

    // 6. DN: If conclusion is ~~A, check if A is available
    if let Formula::Not(inner) = conclusion {
        if let Formula::Not(inner2) = inner.as_ref() {
            let inner2_tt = compute_truth_table(inner2.as_ref());
            if premises.iter().any(|q| compute_truth_table(q) == inner2_tt) {
                return true;
            }
        }
    }

    false
}

// === Main Validation ===

use super::proof_tree::DegenerateProofError;

/// Validate that a theorem is non-degenerate
pub fn validate_theorem(premises: &[Formula], conclusion: &Formula) -> Result<(), DegenerateProofError> {
    validate_theorem_with_difficulty(premises, conclusion, None, false, false, false)
}

/// Validate theorem with optional difficulty-based requirements
/// - min_steps: minimum number of proof steps required
/// - require_cp: if true, theorem must force conditional proof
/// - require_case_split: if true, theorem must force case split (disjunction elimination)
/// - require_ip: if true, theorem must force indirect proof
pub fn validate_theorem_with_difficulty(
    premises: &[Formula],
    conclusion: &Formula,
    min_steps: Option<usize>,
    require_cp: bool,
    require_case_split: bool,
    require_ip: bool,
) -> Result<(), DegenerateProofError> {
    // 1. Premises consistent
    if !premises_consistent(premises) {
        return Err(DegenerateProofError::ContradictoryPremises);
    }

    // 1.5. No tautological premises (P⊃P, P∨~P, etc. - always true, useless)
    for premise in premises {
        if is_tautology(premise) {
            return Err(DegenerateProofError::TautologicalPremise);
        }
    }

    // 2. Conclusion not a tautology
    if is_tautology(conclusion) {
        return Err(DegenerateProofError::TautologicalConclusion);
    }

    // 3. No single premise entails conclusion
    if single_premise_entails(premises, conclusion) {
        return Err(DegenerateProofError::SinglePremiseEntails);
    }

    // 4. Negation of conclusion not available
    if conclusion_negation_available(premises, conclusion) {
        return Err(DegenerateProofError::NegationOfConclusionAvailable);
    }

    // 5. Conditional not trivially provable via explosion
    if conditional_trivial_via_explosion(premises, conclusion) {
        return Err(DegenerateProofError::ConditionalTrivialViaExplosion);
    }

    // 6. No redundant premises
    if has_redundant_premises(premises) {
        return Err(DegenerateProofError::RedundantPremises);
    }

    // 7. All premises necessary
    if !all_premises_necessary(premises, conclusion) {
        return Err(DegenerateProofError::UnnecessaryPremise);
    }

    // 8. Theorem must be valid
    if !entails(premises, conclusion) {
        return Err(DegenerateProofError::InvalidTheorem);
    }

    // 9. Check minimum proof steps (difficulty enforcement)
    if let Some(min) = min_steps {
        if let Some(actual) = super::proof_search::minimum_proof_steps(premises, conclusion, min) {
            if actual < min {
                return Err(DegenerateProofError::TooEasy {
                    min_steps: min,
                    actual_steps: actual,
                });
            }
        }
    }

    // 10. Forcing requirements (structural difficulty checks)
    if require_cp && !forces_cp(premises, conclusion) {
        return Err(DegenerateProofError::DoesNotForceCP);
    }

    if require_case_split && !forces_case_split(premises) {
        return Err(DegenerateProofError::DoesNotForceCaseSplit);
    }

    if require_ip && !forces_ip(premises, conclusion) {
        return Err(DegenerateProofError::DoesNotForceIP);
    }

    Ok(())
}
