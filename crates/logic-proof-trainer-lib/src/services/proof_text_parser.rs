//! Recovery-oriented parser for free-text proofs.
//!
//! Models tend to hand back a proof wrapped in prose, numbered with all
//! manner of conventions, and indented inconsistently. This module turns
//! that text into a sequence of `ParsedLine`s the validator can check,
//! tolerating commentary and reconstructing subproof depth from whichever
//! signal (indentation, `|` markers, or the CP/IP annotations themselves)
//! is actually present.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::formula::normalize_symbols;
use crate::models::rules::ProofTechnique;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    pub line_number: usize,
    pub formula: String,
    pub justification: String,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofParseError {
    pub line_number: Option<usize>,
    pub raw: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProofParseOutcome {
    pub lines: Vec<ParsedLine>,
    pub errors: Vec<ProofParseError>,
    pub unparsed_sections: Vec<String>,
}

/// Lines whose lowercased, trimmed prefix marks them as prose rather than a
/// proof step.
const COMMENTARY_PREFIXES: &[&str] = &[
    "proof:", "here is", "here's", "the proof", "let me", "i will", "i'll",
    "we need", "we can", "note:", "note that", "explanation", "therefore",
    "thus", "qed", "∎", "//", "/*", "```", "--", "wait", "let's",
    "it looks like", "this is", "now ", "next", "first", "then", "so ",
    "since", "because", "using", "applying", "from ", "to ", "by ",
    "finally", "we should", "we must", "to prove",
];

fn is_horizontal_rule(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| matches!(c, '-' | '=' | '_' | '*' | '~'))
}

fn is_commentary(trimmed: &str) -> bool {
    let lower = trimmed.to_lowercase();
    if is_horizontal_rule(trimmed) {
        return true;
    }
    COMMENTARY_PREFIXES.iter().any(|p| lower.starts_with(p))
}

const OPERATOR_CHARS: &[char] = &[
    '>', 'v', '.', '~', '⊃', '∨', '·', '¬', '≡', '⊥', '∧', '→', '↔', '#',
];

fn looks_like_proof(content: &str) -> bool {
    if content.chars().any(|c| OPERATOR_CHARS.contains(&c)) {
        return true;
    }
    if canonicalize_rule_token(content).is_some() {
        return true;
    }
    content.chars().any(|c| c.is_ascii_uppercase())
}

lazy_static! {
    static ref LINE_NUM_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"^\((\d+)\)\s*").unwrap(),
        Regex::new(r"(?i)^#\s*(\d+)[.)]\s*").unwrap(),
        Regex::new(r"(?i)^#\s*(\d+):\s*").unwrap(),
        Regex::new(r"(?i)^step\s+(\d+)[.:]\s*").unwrap(),
        Regex::new(r"(?i)^line\s+(\d+)[.:]\s*").unwrap(),
        Regex::new(r"^(\d+)\)\s*").unwrap(),
        Regex::new(r"^(\d+)\.\s*").unwrap(),
        Regex::new(r"^(\d+):\s*").unwrap(),
    ];
    static ref TRAILING_COMMENT: Regex = Regex::new(r"\s+--\s.*$").unwrap();
}

/// Strip a leading run of `|`/`│` subproof markers, returning how many were
/// found and what remains.
fn strip_scope_markers(s: &str) -> (usize, &str) {
    let mut depth = 0;
    let mut rest = s;
    loop {
        let trimmed = rest.trim_start();
        if let Some(stripped) = trimmed.strip_prefix('|').or_else(|| trimmed.strip_prefix('│')) {
            depth += 1;
            rest = stripped;
        } else {
            rest = trimmed;
            break;
        }
    }
    (depth, rest)
}

/// If `content` begins with one of the recognized line-number prefixes,
/// return the number and the remainder. Otherwise `None`.
fn strip_line_number(content: &str) -> Option<(usize, &str)> {
    for re in LINE_NUM_PATTERNS.iter() {
        if let Some(caps) = re.captures(content) {
            let m = caps.get(0).unwrap();
            let n: usize = caps.get(1).unwrap().as_str().parse().ok()?;
            return Some((n, &content[m.end()..]));
        }
    }
    None
}

fn leading_indent(line: &str) -> usize {
    let mut indent = 0;
    for c in line.chars() {
        match c {
            ' ' => indent += 1,
            '\t' => indent += 2,
            _ => break,
        }
    }
    indent
}

/// Canonical rule names we recognize, each with its lowercase aliases
/// (case/trailing-dot insensitive).
const RULE_ALIASES: &[(&str, &[&str])] = &[
    ("MP", &["mp", "modus ponens", "modusponens"]),
    ("MT", &["mt", "modus tollens", "modustollens"]),
    ("DS", &["ds", "disjunctive syllogism", "disj syllogism"]),
    ("Simp", &["simp", "simplification"]),
    ("Conj", &["conj", "conjunction"]),
    ("HS", &["hs", "hypothetical syllogism"]),
    ("Add", &["add", "addition"]),
    ("CD", &["cd", "constructive dilemma"]),
    ("NegE", &["nege", "neg e", "negation elimination", "contradiction intro", "contra intro"]),
    ("DN", &["dn", "double negation", "doubleneg"]),
    ("DeM", &["dem", "demorgan", "de morgan", "demorgans", "de morgans"]),
    ("Comm", &["comm", "commutation", "commutativity"]),
    ("Assoc", &["assoc", "association", "associativity"]),
    ("Dist", &["dist", "distribution", "distributivity"]),
    ("Contra", &["contra", "contraposition"]),
    ("Impl", &["impl", "implication"]),
    ("Exp", &["exp", "exportation"]),
    ("Taut", &["taut", "tautology"]),
    ("Equiv", &["equiv", "equivalence", "biconditional"]),
    ("CP", &["cp", "conditional proof"]),
    ("IP", &["ip", "indirect proof", "reductio", "rdd"]),
];

fn canonicalize_rule_token(tok: &str) -> Option<&'static str> {
    let cleaned = tok.trim().trim_end_matches('.').to_lowercase();
    if cleaned.is_empty() {
        return None;
    }
    for (canonical, aliases) in RULE_ALIASES {
        if aliases.contains(&cleaned.as_str()) {
            return Some(canonical);
        }
    }
    None
}

fn is_equivalence_rule(name: &str) -> bool {
    matches!(
        name,
        "DN" | "DeM" | "Comm" | "Assoc" | "Dist" | "Contra" | "Impl" | "Exp" | "Taut" | "Equiv"
    )
}

#[derive(Debug, Clone)]
enum JustificationKind {
    Premise,
    Assumption(ProofTechnique),
    SubproofClose(ProofTechnique, usize, usize),
    Other,
}

struct SplitJustification {
    formula_part: String,
    canonical: String,
    kind: JustificationKind,
}

fn parse_int_list(s: &str) -> Option<Vec<usize>> {
    let parts: Vec<&str> = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return None;
    }
    parts.iter().map(|p| p.parse::<usize>().ok()).collect()
}

fn parse_range(s: &str) -> Option<(usize, usize)> {
    let s = s.replace('–', "-");
    let parts: Vec<&str> = if s.contains('-') {
        s.splitn(2, '-').collect()
    } else {
        s.splitn(2, ',').collect()
    };
    if parts.len() != 2 {
        return None;
    }
    let a: usize = parts[0].trim().parse().ok()?;
    let b: usize = parts[1].trim().parse().ok()?;
    Some((a, b))
}

fn technique_from_text(s: &str) -> ProofTechnique {
    if s.to_uppercase().contains("IP") {
        ProofTechnique::IndirectProof
    } else {
        ProofTechnique::ConditionalProof
    }
}

/// Split a stripped proof-line tail into `(formula, canonical justification)`.
/// Tries the documented patterns in priority order.
fn split_justification(tail: &str) -> Option<SplitJustification> {
    let tail = tail.trim();
    if tail.is_empty() {
        return None;
    }

    // 1) "<formula> Premise" / bare "Premise"
    for marker in ["premise", "pr"] {
        if tail.to_lowercase() == marker {
            return Some(SplitJustification {
                formula_part: String::new(),
                canonical: "Premise".to_string(),
                kind: JustificationKind::Premise,
            });
        }
        if let Some(stripped) = strip_suffix_ci(tail, marker) {
            return Some(SplitJustification {
                formula_part: stripped.trim().to_string(),
                canonical: "Premise".to_string(),
                kind: JustificationKind::Premise,
            });
        }
    }

    // 2) keyword-first assumption: "Assume P (CP)" / "Assumption: P (IP)"
    for kw in ["assumption", "assume"] {
        if let Some(rest) = strip_prefix_ci(tail, kw) {
            let technique = technique_from_text(rest);
            let formula_part = rest
                .trim_start_matches(':')
                .replace("(CP)", "")
                .replace("(cp)", "")
                .replace("(IP)", "")
                .replace("(ip)", "")
                .trim()
                .to_string();
            return Some(SplitJustification {
                formula_part,
                canonical: format!("Assumption ({})", technique.abbreviation()),
                kind: JustificationKind::Assumption(technique),
            });
        }
    }

    // 3) formula-first assumption: "P Assumption (CP)"
    let lower = tail.to_lowercase();
    if let Some(idx) = lower.find("assumption").or_else(|| lower.find("assume")) {
        let (formula_part, rest) = tail.split_at(idx);
        let technique = technique_from_text(rest);
        return Some(SplitJustification {
            formula_part: formula_part.trim().to_string(),
            canonical: format!("Assumption ({})", technique.abbreviation()),
            kind: JustificationKind::Assumption(technique),
        });
    }

    // 4) bare subproof close: "CP 3-7" / "IP 3,7"
    for kw in ["CP", "IP"] {
        if let Some(rest) = strip_prefix_ci(tail, kw) {
            if let Some((s, e)) = parse_range(rest.trim()) {
                let technique = technique_from_text(kw);
                return Some(SplitJustification {
                    formula_part: String::new(),
                    canonical: format!("{} {}-{}", kw, s, e),
                    kind: JustificationKind::SubproofClose(technique, s, e),
                });
            }
        }
    }

    // 5) subproof close with formula: "<formula> CP 3-7"
    for kw in ["CP", "IP"] {
        if let Some(idx) = find_word_ci(tail, kw) {
            let (formula_part, rest) = tail.split_at(idx);
            let rest = &rest[kw.len()..];
            if let Some((s, e)) = parse_range(rest.trim()) {
                let technique = technique_from_text(kw);
                return Some(SplitJustification {
                    formula_part: formula_part.trim().to_string(),
                    canonical: format!("{} {}-{}", kw, s, e),
                    kind: JustificationKind::SubproofClose(technique, s, e),
                });
            }
        }
    }

    // 6) parenthesized tail: "<formula> (RULE lines)"
    if tail.ends_with(')') {
        if let Some(open) = tail.rfind('(') {
            let inner = &tail[open + 1..tail.len() - 1];
            let formula_part = tail[..open].trim().to_string();
            if let Some(s) = split_rule_and_lines(inner) {
                return Some(SplitJustification {
                    formula_part,
                    canonical: s.canonical,
                    kind: s.kind,
                });
            }
        }
    }

    // 7/8/9/10: "<formula> RULE lines", "<formula> lines RULE",
    // "<formula> RULE N", bare "<formula> RULE" (equivalence only).
    // Find the rightmost word-window that canonicalizes to a rule name.
    let words: Vec<&str> = tail.split_whitespace().collect();
    let mut found: Option<(usize, usize, &'static str)> = None;
    for size in 1..=3.min(words.len()) {
        for start in (0..=words.len() - size).rev() {
            let candidate = words[start..start + size].join(" ");
            if let Some(name) = canonicalize_rule_token(&candidate) {
                if found.map(|(s, _, _)| start > s).unwrap_or(true) {
                    found = Some((start, start + size, name));
                }
            }
        }
    }

    if let Some((start, end, name)) = found {
        if name == "CP" || name == "IP" {
            return None; // handled by the subproof-close patterns above
        }
        let before = &words[..start];
        let after = &words[end..];

        // Pattern 7 / 9: "<formula> RULE lines" or "<formula> RULE N"
        if !after.is_empty() {
            if let Some(nums) = parse_int_list(&after.join(" ")) {
                if !before.is_empty() {
                    let joined = nums.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(",");
                    return Some(SplitJustification {
                        formula_part: before.join(" "),
                        canonical: format!("{} {}", name, joined),
                        kind: JustificationKind::Other,
                    });
                }
            }
            return None;
        }

        // Pattern 8: "<formula> lines RULE" — trailing digits in `before` are citations.
        let mut line_tokens: Vec<String> = Vec::new();
        let mut i = before.len();
        while i > 0 {
            let tok = before[i - 1].trim_end_matches(',');
            if !tok.is_empty() && tok.chars().all(|c| c.is_ascii_digit()) {
                line_tokens.push(tok.to_string());
                i -= 1;
            } else {
                break;
            }
        }
        if !line_tokens.is_empty() {
            line_tokens.reverse();
            let formula_part = before[..i].join(" ");
            if !formula_part.is_empty() {
                return Some(SplitJustification {
                    formula_part,
                    canonical: format!("{} {}", name, line_tokens.join(",")),
                    kind: JustificationKind::Other,
                });
            }
        }

        // Pattern 10: bare "<formula> RULE" — equivalence rules only, implicit empty citation.
        if is_equivalence_rule(name) && !before.is_empty() {
            return Some(SplitJustification {
                formula_part: before.join(" "),
                canonical: name.to_string(),
                kind: JustificationKind::Other,
            });
        }
    }

    None
}

struct RuleLines {
    canonical: String,
    kind: JustificationKind,
}

/// Parse an already-isolated `"RULE lines"` or `"RULE N-M"` fragment (the
/// inside of a parenthesized justification, or a bare rule reference).
fn split_rule_and_lines(s: &str) -> Option<RuleLines> {
    let s = s.trim();
    let lower = s.to_lowercase();
    if lower == "premise" || lower == "pr" {
        return Some(RuleLines { canonical: "Premise".to_string(), kind: JustificationKind::Premise });
    }
    if lower.starts_with("assumption") || lower.starts_with("assume") {
        let technique = technique_from_text(s);
        return Some(RuleLines {
            canonical: format!("Assumption ({})", technique.abbreviation()),
            kind: JustificationKind::Assumption(technique),
        });
    }
    // A bare "CP"/"IP" marker, as in "Assumption (CP)" — not itself a full
    // justification, but valid content that must not be stripped as
    // trailing commentary.
    if lower == "cp" || lower == "ip" {
        let technique = technique_from_text(s);
        return Some(RuleLines {
            canonical: technique.abbreviation().to_string(),
            kind: JustificationKind::Other,
        });
    }
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    for take in (1..=3.min(words.len())).rev() {
        let candidate = words[..take].join(" ");
        if let Some(name) = canonicalize_rule_token(&candidate) {
            let rest = words[take..].join(" ");
            if name == "CP" || name == "IP" {
                if let Some((a, b)) = parse_range(&rest) {
                    let technique = technique_from_text(name);
                    return Some(RuleLines {
                        canonical: format!("{} {}-{}", name, a, b),
                        kind: JustificationKind::SubproofClose(technique, a, b),
                    });
                }
                return None;
            }
            if rest.trim().is_empty() {
                if is_equivalence_rule(name) {
                    return Some(RuleLines {
                        canonical: name.to_string(),
                        kind: JustificationKind::Other,
                    });
                }
                return None;
            }
            if let Some(nums) = parse_int_list(&rest) {
                let joined = nums.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(",");
                return Some(RuleLines {
                    canonical: format!("{} {}", name, joined),
                    kind: JustificationKind::Other,
                });
            }
        }
    }
    None
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let s_lower = s.to_lowercase();
    let prefix_lower = prefix.to_lowercase();
    if s_lower.starts_with(&prefix_lower) {
        let rest = &s[prefix.len()..];
        if rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c.is_numeric() || c == ':' || c == '(') {
            return Some(rest);
        }
    }
    None
}

fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let s_lower = s.to_lowercase();
    let suffix_lower = suffix.to_lowercase();
    if s_lower.ends_with(&suffix_lower) && s.len() >= suffix.len() {
        let split_at = s.len() - suffix.len();
        let (rest, matched) = s.split_at(split_at);
        if matched.to_lowercase() == suffix_lower {
            return Some(rest);
        }
    }
    None
}

fn find_word_ci(s: &str, word: &str) -> Option<usize> {
    let lower = s.to_lowercase();
    let word_lower = word.to_lowercase();
    lower.find(&word_lower)
}

struct RawLine {
    line_number: usize,
    depth: usize,
    formula: String,
    canonical: String,
    kind: JustificationKind,
}

/// Run the full five-stage recovery pipeline over free-form proof text.
pub fn parse_proof_text(text: &str) -> ProofParseOutcome {
    let text = text.replace('`', "");

    // Stage 1: split and filter commentary.
    let mut unparsed_sections: Vec<String> = Vec::new();
    let mut candidates: Vec<&str> = Vec::new();
    let mut seen_proof_line = false;
    for raw in text.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_commentary(trimmed) {
            if !seen_proof_line {
                unparsed_sections.push(trimmed.to_string());
            }
            continue;
        }
        candidates.push(raw);
        seen_proof_line = true;
    }

    // Stage 2: indent prescan.
    let mut base_indent: Option<usize> = None;
    let mut indents: Vec<usize> = Vec::new();
    for line in &candidates {
        let indent = leading_indent(line);
        let (_, after_markers) = strip_scope_markers(line);
        if strip_line_number(after_markers).is_some() {
            if base_indent.is_none() {
                base_indent = Some(indent);
            }
            indents.push(indent);
        }
    }
    let base_indent = base_indent.unwrap_or(0);
    let mut distinct = indents.clone();
    distinct.sort_unstable();
    distinct.dedup();
    let indent_unit = distinct
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|&d| d > 0)
        .min()
        .unwrap_or(2);

    // Stage 3: per-line parse.
    let mut errors: Vec<ProofParseError> = Vec::new();
    let mut raw_lines: Vec<RawLine> = Vec::new();
    let mut auto_counter: usize = 1;

    for line in &candidates {
        let indent = leading_indent(line);
        let indent_depth = if indent_unit == 0 {
            0
        } else {
            (indent.saturating_sub(base_indent) + indent_unit / 2) / indent_unit
        };
        let (marker_depth, after_markers) = strip_scope_markers(line);

        let (line_number, rest) = match strip_line_number(after_markers) {
            Some((n, rest)) => (n, rest),
            None => {
                if !looks_like_proof(after_markers) {
                    unparsed_sections.push(line.trim().to_string());
                    continue;
                }
                let n = auto_counter;
                (n, after_markers)
            }
        };
        auto_counter = line_number + 1;

        let mut rest = rest.trim();
        if let Some(m) = TRAILING_COMMENT.find(rest) {
            rest = &rest[..m.start()];
        }
        let mut trimmed_rest = rest.to_string();
        loop {
            let t = trimmed_rest.trim_end();
            if t.ends_with(')') {
                if let Some(open) = t.rfind('(') {
                    let inner = &t[open + 1..t.len() - 1];
                    if split_rule_and_lines(inner).is_none() {
                        trimmed_rest = t[..open].trim_end().to_string();
                        continue;
                    }
                }
            }
            trimmed_rest = t.to_string();
            break;
        }

        match split_justification(&trimmed_rest) {
            Some(split) => {
                let depth = if marker_depth > 0 { marker_depth } else { indent_depth };
                raw_lines.push(RawLine {
                    line_number,
                    depth,
                    formula: normalize_symbols(&split.formula_part),
                    canonical: split.canonical,
                    kind: split.kind,
                });
            }
            None => {
                errors.push(ProofParseError {
                    line_number: Some(line_number),
                    raw: line.trim().to_string(),
                    message: format!("could not parse justification in '{}'", line.trim()),
                });
            }
        }
    }

    // Stage 4: back-fill formulas for bare subproof closes.
    let formula_by_line: std::collections::HashMap<usize, String> = raw_lines
        .iter()
        .map(|l| (l.line_number, l.formula.clone()))
        .collect();
    for line in raw_lines.iter_mut() {
        if line.formula.is_empty() {
            if let JustificationKind::SubproofClose(technique, s, e) = line.kind {
                let phi_s = formula_by_line.get(&s).cloned().unwrap_or_default();
                let phi_e = formula_by_line.get(&e).cloned().unwrap_or_default();
                line.formula = match technique {
                    ProofTechnique::ConditionalProof => format!("({}) > ({})", phi_s, phi_e),
                    ProofTechnique::IndirectProof => format!("~({})", phi_s),
                };
            }
        }
    }

    // Stage 5: depth reconstruction from annotations (authoritative over whitespace).
    let mut current_depth: usize = 0;
    for line in raw_lines.iter_mut() {
        match line.kind {
            JustificationKind::Assumption(_) => {
                current_depth += 1;
                line.depth = current_depth;
            }
            JustificationKind::SubproofClose(..) => {
                current_depth = current_depth.saturating_sub(1);
                line.depth = current_depth;
            }
            _ => {
                line.depth = current_depth;
            }
        }
    }

    let lines = raw_lines
        .into_iter()
        .map(|l| ParsedLine {
            line_number: l.line_number,
            formula: l.formula,
            justification: l.canonical,
            depth: l.depth,
        })
        .collect();

    ProofParseOutcome { lines, errors, unparsed_sections }
}
