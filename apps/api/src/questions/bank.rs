//! Static question bank, bundled into the binary as JSON.
//!
//! The bank is read-only once loaded. `AppState` shares it behind an `Arc`.

use rand::seq::SliceRandom;
use serde::Deserialize;
use thiserror::Error;

use crate::questions::models::{JobRole, Question, QuestionKind};

const BUNDLED_BANK: &str = include_str!("../../data/question_bank.json");

#[derive(Debug, Error)]
pub enum QuestionBankError {
    #[error("question bank is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question bank contains no roles")]
    Empty,

    #[error("role '{0}' has no questions")]
    EmptyRole(String),
}

#[derive(Debug, Deserialize)]
struct BankFile {
    roles: Vec<JobRole>,
}

#[derive(Debug, Clone)]
pub struct QuestionBank {
    roles: Vec<JobRole>,
}

impl QuestionBank {
    /// Loads the bank shipped in `data/question_bank.json`.
    pub fn load_bundled() -> Result<Self, QuestionBankError> {
        Self::from_json(BUNDLED_BANK)
    }

    pub fn from_json(raw: &str) -> Result<Self, QuestionBankError> {
        let file: BankFile = serde_json::from_str(raw)?;
        Self::from_roles(file.roles)
    }

    pub fn from_roles(roles: Vec<JobRole>) -> Result<Self, QuestionBankError> {
        if roles.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        if let Some(role) = roles.iter().find(|r| r.questions.is_empty()) {
            return Err(QuestionBankError::EmptyRole(role.id.clone()));
        }
        Ok(Self { roles })
    }

    pub fn roles(&self) -> &[JobRole] {
        &self.roles
    }

    pub fn role(&self, role_id: &str) -> Option<&JobRole> {
        self.roles.iter().find(|r| r.id == role_id)
    }

    pub fn question(&self, role_id: &str, question_id: &str) -> Option<&Question> {
        self.role(role_id)?
            .questions
            .iter()
            .find(|q| q.id == question_id)
    }

    /// Picks a random question for the role, skipping ids in `asked`.
    ///
    /// Once every question of the role has been asked, any question may repeat.
    /// An unknown role gets the generic introduction question.
    pub fn random_question(&self, role_id: &str, asked: &[String]) -> Question {
        let Some(role) = self.role(role_id) else {
            return default_question();
        };

        let fresh: Vec<&Question> = role
            .questions
            .iter()
            .filter(|q| !asked.contains(&q.id))
            .collect();

        let mut rng = rand::thread_rng();
        let picked = if fresh.is_empty() {
            role.questions.choose(&mut rng)
        } else {
            fresh.choose(&mut rng).copied()
        };

        picked.cloned().unwrap_or_else(default_question)
    }
}

/// Generic opener used when a role has no bank entry.
pub fn default_question() -> Question {
    Question {
        id: "default-1".to_string(),
        text: "Tell me about yourself.".to_string(),
        kind: QuestionKind::Behavioral,
        reference_answer: None,
        expected_points: Some(vec![
            "Professional background".to_string(),
            "Key achievements".to_string(),
            "Career goals".to_string(),
            "Relevant skills".to_string(),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_bank() -> QuestionBank {
        QuestionBank::from_json(
            r#"{"roles":[{"id":"r","title":"R","description":"d","questions":[
                {"id":"a","text":"A?","kind":"direct","reference_answer":"A."},
                {"id":"b","text":"B?","kind":"technical","expected_points":["Bravo point"]}
            ]}]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_bundled_bank_loads_all_roles() {
        let bank = QuestionBank::load_bundled().unwrap();
        let ids: Vec<&str> = bank.roles().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "software-engineer",
                "product-manager",
                "data-scientist",
                "marketing-manager"
            ]
        );
        assert!(bank.roles().iter().all(|r| r.questions.len() == 10));
    }

    #[test]
    fn test_bundled_bank_direct_questions_have_reference_answers() {
        let bank = QuestionBank::load_bundled().unwrap();
        for role in bank.roles() {
            for q in &role.questions {
                if q.kind.is_direct() {
                    assert!(q.reference_answer.is_some(), "{} lacks an answer", q.id);
                } else {
                    assert!(!q.points().is_empty(), "{} lacks key points", q.id);
                }
            }
        }
    }

    #[test]
    fn test_lookup_question_by_role_and_id() {
        let bank = QuestionBank::load_bundled().unwrap();
        let q = bank.question("software-engineer", "se-4").unwrap();
        assert_eq!(q.text, "What is the time complexity of binary search?");
        assert!(bank.question("software-engineer", "pm-1").is_none());
        assert!(bank.question("astronaut", "se-4").is_none());
    }

    #[test]
    fn test_random_question_skips_asked() {
        let bank = small_bank();
        for _ in 0..20 {
            let q = bank.random_question("r", &["a".to_string()]);
            assert_eq!(q.id, "b");
        }
    }

    #[test]
    fn test_random_question_repeats_when_exhausted() {
        let bank = small_bank();
        let q = bank.random_question("r", &["a".to_string(), "b".to_string()]);
        assert!(q.id == "a" || q.id == "b");
    }

    #[test]
    fn test_unknown_role_gets_default_question() {
        let bank = small_bank();
        let q = bank.random_question("astronaut", &[]);
        assert_eq!(q.id, "default-1");
        assert_eq!(q.kind, QuestionKind::Behavioral);
        assert_eq!(q.points().len(), 4);
    }

    #[test]
    fn test_empty_bank_rejected() {
        assert!(matches!(
            QuestionBank::from_json(r#"{"roles":[]}"#),
            Err(QuestionBankError::Empty)
        ));
        assert!(matches!(
            QuestionBank::from_json(
                r#"{"roles":[{"id":"x","title":"X","description":"d","questions":[]}]}"#
            ),
            Err(QuestionBankError::EmptyRole(id)) if id == "x"
        ));
        assert!(matches!(
            QuestionBank::from_json("not json"),
            Err(QuestionBankError::Parse(_))
        ));
    }
}
