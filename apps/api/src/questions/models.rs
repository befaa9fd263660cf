use serde::{Deserialize, Serialize};

/// How an answer to a question is judged for relevance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Factual question with a single reference answer.
    Direct,
    Behavioral,
    Technical,
}

impl QuestionKind {
    pub fn is_direct(self) -> bool {
        matches!(self, QuestionKind::Direct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub kind: QuestionKind,
    /// Expected answer for `Direct` questions, shown after scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_answer: Option<String>,
    /// Concepts a strong behavioral/technical answer touches on, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_points: Option<Vec<String>>,
}

impl Question {
    /// Expected points as a slice; absent and empty lists are treated the same.
    pub fn points(&self) -> &[String] {
        self.expected_points.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRole {
    pub id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
}

/// Role listing entry, without the question bodies.
#[derive(Debug, Clone, Serialize)]
pub struct RoleSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub question_count: usize,
}

impl From<&JobRole> for RoleSummary {
    fn from(role: &JobRole) -> Self {
        Self {
            id: role.id.clone(),
            title: role.title.clone(),
            description: role.description.clone(),
            question_count: role.questions.len(),
        }
    }
}
