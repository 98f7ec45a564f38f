use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};

pub const CODE_LENGTH: usize = 6;

/// One-time code mailed to the customer before an appointment can be edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationCode(String);

impl VerificationCode {
    pub fn generate() -> Self {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(CODE_LENGTH)
            .map(char::from)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact comparison; surrounding whitespace from the form is ignored.
    pub fn matches(&self, entered: &str) -> bool {
        self.0 == entered.trim()
    }
}

impl From<&str> for VerificationCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}
