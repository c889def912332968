//! Parses the compact justification strings used on the JSON wire format
//! (`"MP 1,2"`, `"Assumption (CP)"`, `"CP 3-7"`, ...) into a typed
//! `Justification`. This is the strict counterpart to
//! [`proof_text_parser`](crate::services::proof_text_parser), which recovers
//! the same strings from free-form prose.

use crate::models::proof::Justification;
use crate::models::rules::{EquivalenceRule, InferenceRule, ProofTechnique};

pub fn parse_justification(s: &str) -> Result<Justification, String> {
    let s = s.trim();

    if s.eq_ignore_ascii_case("premise") || s.eq_ignore_ascii_case("pr") {
        return Ok(Justification::Premise);
    }

    if s.to_lowercase().starts_with("assumption") || s.to_lowercase().starts_with("assume") {
        let technique = if s.to_uppercase().contains("IP") {
            ProofTechnique::IndirectProof
        } else {
            ProofTechnique::ConditionalProof
        };
        return Ok(Justification::Assumption { technique });
    }

    if let Some(rest) = strip_prefix_ci(s, "CP") {
        if let Some((start, end)) = parse_line_range(rest.trim()) {
            return Ok(Justification::SubproofConclusion {
                technique: ProofTechnique::ConditionalProof,
                subproof_start: start,
                subproof_end: end,
            });
        }
    }
    if let Some(rest) = strip_prefix_ci(s, "IP") {
        if let Some((start, end)) = parse_line_range(rest.trim()) {
            return Ok(Justification::SubproofConclusion {
                technique: ProofTechnique::IndirectProof,
                subproof_start: start,
                subproof_end: end,
            });
        }
    }

    let inference_rules: &[(&str, InferenceRule)] = &[
        ("MP", InferenceRule::ModusPonens),
        ("MT", InferenceRule::ModusTollens),
        ("DS", InferenceRule::DisjunctiveSyllogism),
        ("HS", InferenceRule::HypotheticalSyllogism),
        ("Simp", InferenceRule::Simplification),
        ("Conj", InferenceRule::Conjunction),
        ("Add", InferenceRule::Addition),
        ("CD", InferenceRule::ConstructiveDilemma),
        ("NegE", InferenceRule::Contradiction),
    ];

    for (abbrev, rule) in inference_rules {
        if let Some(rest) = strip_prefix_ci(s, abbrev) {
            let rest = rest.trim();
            if rest.is_empty() {
                return Err(format!("Missing line numbers for {}", abbrev));
            }
            let lines = parse_line_numbers(rest)?;
            return Ok(Justification::Inference { rule: *rule, lines });
        }
    }

    let equiv_rules: &[(&str, EquivalenceRule)] = &[
        ("DN", EquivalenceRule::DoubleNegation),
        ("DeM", EquivalenceRule::DeMorgan),
        ("Comm", EquivalenceRule::Commutation),
        ("Assoc", EquivalenceRule::Association),
        ("Dist", EquivalenceRule::Distribution),
        ("Contra", EquivalenceRule::Contraposition),
        ("Impl", EquivalenceRule::Implication),
        ("Exp", EquivalenceRule::Exportation),
        ("Taut", EquivalenceRule::Tautology),
        ("Equiv", EquivalenceRule::Equivalence),
    ];

    for (abbrev, rule) in equiv_rules {
        if let Some(rest) = strip_prefix_ci(s, abbrev) {
            let rest = rest.trim();
            if rest.is_empty() {
                // Bare equivalence reference with no line cited — an error
                // the validator surfaces per-line, not a parse failure.
                return Ok(Justification::Equivalence { rule: *rule, line: 0 });
            }
            let line: usize = rest
                .parse()
                .map_err(|_| format!("Invalid line number for {}: '{}'", abbrev, rest))?;
            return Ok(Justification::Equivalence { rule: *rule, line });
        }
    }

    Err(format!("Unrecognized justification: '{}'", s))
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let s_lower = s.to_lowercase();
    let prefix_lower = prefix.to_lowercase();
    if s_lower.starts_with(&prefix_lower) {
        let rest = &s[prefix.len()..];
        if rest.is_empty() || rest.starts_with(char::is_whitespace) || rest.starts_with(char::is_numeric) {
            Some(rest)
        } else {
            None
        }
    } else {
        None
    }
}

fn parse_line_numbers(s: &str) -> Result<Vec<usize>, String> {
    let s = s.trim();
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(|p| p.trim().parse::<usize>().map_err(|_| format!("Invalid line number: '{}'", p)))
        .collect()
}

fn parse_line_range(s: &str) -> Option<(usize, usize)> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() == 2 {
        let start = parts[0].trim().parse::<usize>().ok()?;
        let end = parts[1].trim().parse::<usize>().ok()?;
        Some((start, end))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_premise() {
        assert!(matches!(parse_justification("Premise").unwrap(), Justification::Premise));
    }

    #[test]
    fn test_parse_mp_two_citations() {
        let j = parse_justification("MP 1,2").unwrap();
        assert!(matches!(j, Justification::Inference { rule: InferenceRule::ModusPonens, ref lines } if lines == &vec![1, 2]));
    }

    #[test]
    fn test_parse_cp_close() {
        let j = parse_justification("CP 2-3").unwrap();
        assert!(matches!(
            j,
            Justification::SubproofConclusion {
                technique: ProofTechnique::ConditionalProof,
                subproof_start: 2,
                subproof_end: 3
            }
        ));
    }

    #[test]
    fn test_parse_unknown_is_error() {
        assert!(parse_justification("bogus").is_err());
    }
}
