use serde::{Deserialize, Serialize};
use uuid::Uuid;
use super::formula::Formula;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }
}

/// A theorem to be proved: a set of premises and a conclusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theorem {
    pub id: String,
    pub premises: Vec<Formula>,
    pub conclusion: Formula,
    pub difficulty: Difficulty,
    /// The 1-100 difficulty value this theorem was presented at.
    #[serde(default = "default_difficulty_value")]
    pub difficulty_value: u8,
    pub name: Option<String>,
    pub is_classic: bool,
}

fn default_difficulty_value() -> u8 {
    50
}

impl Theorem {
    pub fn with_difficulty_value(
        premises: Vec<Formula>,
        conclusion: Formula,
        difficulty: Difficulty,
        difficulty_value: u8,
        name: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            premises,
            conclusion,
            difficulty,
            difficulty_value,
            name,
            is_classic: false,
        }
    }

    /// Get the midpoint difficulty value for a preset
    pub fn default_value_for_preset(difficulty: Difficulty) -> u8 {
        match difficulty {
            Difficulty::Easy => 13,     // midpoint of 1-25
            Difficulty::Medium => 35,   // midpoint of 26-45
            Difficulty::Hard => 58,     // midpoint of 46-70
            Difficulty::Expert => 85,   // midpoint of 71-100
        }
    }

    pub fn display_string(&self) -> String {
        if self.premises.is_empty() {
            format!("⊢ {}", self.conclusion.display_string())
        } else {
            let premises_str = self
                .premises
                .iter()
                .map(|p| p.display_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} ⊢ {}", premises_str, self.conclusion.display_string())
        }
    }
}

/// A small fixed set of textbook theorems, useful as smoke-test fixtures
/// and as a default corpus for manual exploration.
pub fn get_classic_theorems() -> Vec<Theorem> {
    let classic = |id: &str, premises: &[&str], conclusion: &str, difficulty: Difficulty, name: &str| Theorem {
        id: id.to_string(),
        premises: premises.iter().map(|p| Formula::parse(p).unwrap()).collect(),
        conclusion: Formula::parse(conclusion).unwrap(),
        difficulty,
        difficulty_value: Theorem::default_value_for_preset(difficulty),
        name: Some(name.to_string()),
        is_classic: true,
    };

    vec![
        classic("classic-1", &["P -> Q", "P"], "Q", Difficulty::Easy, "Modus Ponens"),
        classic("classic-2", &["P -> Q", "~Q"], "~P", Difficulty::Easy, "Modus Tollens"),
        classic("classic-3", &["P -> Q", "Q -> R"], "P -> R", Difficulty::Easy, "Hypothetical Syllogism"),
        classic("classic-4", &["P | Q", "~P"], "Q", Difficulty::Easy, "Disjunctive Syllogism"),
        classic(
            "classic-5",
            &["(P -> Q) & (R -> S)", "P | R"],
            "Q | S",
            Difficulty::Medium,
            "Constructive Dilemma",
        ),
        classic("classic-6", &[], "P | ~P", Difficulty::Medium, "Law of Excluded Middle"),
        classic("classic-7", &["~~P"], "P", Difficulty::Easy, "Double Negation Elimination"),
        classic("classic-8", &["P -> Q"], "~Q -> ~P", Difficulty::Medium, "Contraposition"),
        classic("classic-9", &["~(P & Q)"], "~P | ~Q", Difficulty::Hard, "De Morgan (And to Or)"),
        classic("classic-10", &["~(P | Q)"], "~P & ~Q", Difficulty::Hard, "De Morgan (Or to And)"),
        classic("classic-11", &["P -> Q"], "~P | Q", Difficulty::Medium, "Material Implication"),
        classic("classic-12", &["(P & Q) -> R"], "P -> (Q -> R)", Difficulty::Hard, "Exportation"),
        classic(
            "classic-13",
            &[],
            "((P -> Q) -> P) -> P",
            Difficulty::Expert,
            "Peirce's Law",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_theorems_valid() {
        let classics = get_classic_theorems();
        assert_eq!(classics.len(), 13);
        for theorem in &classics {
            assert!(theorem.is_classic);
        }
    }

    #[test]
    fn test_display_string() {
        let theorem = &get_classic_theorems()[0];
        assert_eq!(theorem.display_string(), "P ⊃ Q, P ⊢ Q");
    }
}
