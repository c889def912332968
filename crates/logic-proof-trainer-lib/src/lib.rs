pub mod error;
pub mod models;
pub mod services;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use models::{Difficulty, Formula, Justification, Proof, Theorem};
use services::ProofVerifier;

pub use services::proof_text_parser::{ParsedLine, ProofParseError, ProofParseOutcome};

/// The theorem half of the external JSON contract: premises and conclusion
/// as ASCII formula strings, plus the difficulty metadata callers already
/// have on hand from a `generate` run (or hand-authored for a fixed set).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheoremInput {
    pub id: String,
    pub premises: Vec<String>,
    pub conclusion: String,
    pub difficulty_value: u8,
}

/// One submitted proof line, as it arrives over the wire: a formula string,
/// a justification string (`"MP 1,2"`, `"Assumption (CP)"`, `"CP 3-7"`, ...),
/// and the depth the submitter claims the line sits at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofLineInput {
    pub line_number: usize,
    pub formula: String,
    pub justification: String,
    pub depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub line_count: usize,
    pub errors: Vec<String>,
}

fn difficulty_from_value(value: u8) -> Difficulty {
    match value {
        1..=25 => Difficulty::Easy,
        26..=45 => Difficulty::Medium,
        46..=70 => Difficulty::Hard,
        _ => Difficulty::Expert,
    }
}

fn theorem_from_input(input: &TheoremInput) -> Result<Theorem, String> {
    let premises: Vec<Formula> = input
        .premises
        .iter()
        .map(|p| Formula::parse(p).map_err(|e| format!("Invalid premise '{}': {}", p, e)))
        .collect::<Result<Vec<_>, _>>()?;
    let conclusion = Formula::parse(&input.conclusion)
        .map_err(|e| format!("Invalid conclusion '{}': {}", input.conclusion, e))?;

    Ok(Theorem::with_difficulty_value(
        premises,
        conclusion,
        difficulty_from_value(input.difficulty_value),
        input.difficulty_value,
        None,
    ))
}

/// Replays a submitted proof against a theorem and reports whether it is a
/// valid, complete derivation.
///
/// Builds the proof line by line through [`Proof`]'s own scope bookkeeping
/// so that `CP`/`IP` subproofs open and close exactly as a live proof editor
/// would; a line's claimed `depth` is checked against the depth the scope
/// manager actually reaches after replay, catching proofs whose structure
/// disagrees with its own annotations.
#[instrument(skip(theorem, lines), fields(theorem_id = %theorem.id, line_count = lines.len()))]
pub fn validate(theorem: &TheoremInput, lines: &[ProofLineInput]) -> ValidationResult {
    let theorem = match theorem_from_input(theorem) {
        Ok(t) => t,
        Err(e) => {
            return ValidationResult {
                valid: false,
                line_count: 0,
                errors: vec![e],
            }
        }
    };

    let mut proof = Proof::new_empty(theorem);
    let mut errors: Vec<String> = Vec::new();
    let mut prev_line_number: Option<usize> = None;

    for input_line in lines {
        if let Some(prev) = prev_line_number {
            if input_line.line_number <= prev {
                errors.push(format!(
                    "Line {}: line number does not strictly increase from prior line {}",
                    input_line.line_number, prev
                ));
            }
        }
        prev_line_number = Some(input_line.line_number);

        let formula = match Formula::parse(&input_line.formula) {
            Ok(f) => f,
            Err(e) => {
                errors.push(format!(
                    "Line {}: Invalid formula '{}': {}",
                    input_line.line_number, input_line.formula, e
                ));
                continue;
            }
        };

        let justification = match services::parse_justification(&input_line.justification) {
            Ok(j) => j,
            Err(e) => {
                errors.push(format!(
                    "Line {}: Invalid justification '{}': {}",
                    input_line.line_number, input_line.justification, e
                ));
                continue;
            }
        };

        match &justification {
            Justification::Assumption { technique } => {
                proof.open_subproof(formula, *technique);
            }
            Justification::SubproofConclusion { technique, .. } => {
                let closed = proof.close_subproof(formula.clone(), *technique).is_some();
                if closed {
                    verify_and_record(&mut proof, input_line, &mut errors);
                } else {
                    errors.push(format!(
                        "Line {}: No open subproof to close",
                        input_line.line_number
                    ));
                }
            }
            _ => {
                proof.add_line(formula, justification);
                verify_and_record(&mut proof, input_line, &mut errors);
            }
        }

        let last = proof.lines.last();
        if let Some(last) = last {
            if last.line_number == input_line.line_number && last.depth != input_line.depth {
                errors.push(format!(
                    "Line {}: claimed depth {} does not match actual subproof depth {}",
                    input_line.line_number, input_line.depth, last.depth
                ));
            }
        }
    }

    proof.check_complete();

    if !proof.is_complete {
        if proof.scope_manager.has_open_scopes() {
            errors.push(format!(
                "Proof incomplete: {} subproof scope(s) still open (unclosed)",
                proof.scope_manager.current_depth()
            ));
        }

        let conclusion = &proof.theorem.conclusion;
        let has_conclusion_at_depth_0 = proof
            .lines
            .iter()
            .any(|l| l.depth == 0 && l.formula == *conclusion && l.is_valid);
        if !has_conclusion_at_depth_0 {
            errors.push("Proof incomplete: conclusion not established at depth 0".to_string());
        }

        let invalid_lines: Vec<String> = proof
            .lines
            .iter()
            .filter(|l| !l.is_valid)
            .map(|l| l.line_number.to_string())
            .collect();
        if !invalid_lines.is_empty() {
            errors.push(format!(
                "Proof incomplete: invalid lines: [{}]",
                invalid_lines.join(", ")
            ));
        }
    }

    ValidationResult {
        valid: proof.is_complete && errors.is_empty(),
        line_count: proof.lines.len(),
        errors,
    }
}

fn verify_and_record(proof: &mut Proof, input_line: &ProofLineInput, errors: &mut Vec<String>) {
    let last_idx = proof.lines.len() - 1;
    let result = ProofVerifier::verify_line(&proof.lines[last_idx], proof);
    proof.lines[last_idx].is_valid = result.is_valid;
    proof.lines[last_idx].validation_message = result.message.clone();
    if !result.is_valid {
        errors.push(format!(
            "Line {}: {}",
            input_line.line_number,
            result.message.unwrap_or_else(|| "Invalid".to_string())
        ));
    }
}

/// Recovers a structured proof (lines plus per-line diagnostics) from free
/// text — the submission format used when a model is asked to "write a
/// proof" rather than fill in a fixed JSON form.
///
/// `theorem` is carried in the public signature to match the façade
/// contract callers build against, but the recovery pipeline itself works
/// from the text alone: depth and rule identity come from the proof's own
/// annotations, not from what it is meant to prove.
#[instrument(skip(text, _theorem), fields(text_len = text.len()))]
pub fn parse_proof(text: &str, _theorem: &TheoremInput) -> ProofParseOutcome {
    services::parse_proof_text(text)
}
