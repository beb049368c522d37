use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query string of the student verification endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyStudentQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "student_id", rename = "studentId")]
    pub student_id: String,
    #[serde(default)]
    pub batch: String,
}
