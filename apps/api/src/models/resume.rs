use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GithubLinks {
    pub profile: Vec<String>,
    pub project: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LinkedinLinks {
    pub profile: Vec<String>,
}

/// Hyperlinks found in a resume, bucketed by destination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResumeLinks {
    pub github: GithubLinks,
    pub linkedin: LinkedinLinks,
    pub portfolio: Vec<String>,
    pub other: Vec<String>,
    pub email: Vec<String>,
}

impl ResumeLinks {
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn total(&self) -> usize {
        self.github.profile.len()
            + self.github.project.len()
            + self.linkedin.profile.len()
            + self.portfolio.len()
            + self.other.len()
            + self.email.len()
    }
}

/// Document persisted to the `resumes` collection after a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub filename: String,
    pub links: ResumeLinks,
    pub metadata: ResumeMetadata,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeMetadata {
    pub text_content: String,
}

/// One row of the generic JSONB document table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRow {
    pub collection: String,
    pub id: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
