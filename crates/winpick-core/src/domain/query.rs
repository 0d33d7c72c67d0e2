#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub text: String,
    pub fuzzy: bool,
}

impl FilterQuery {
    pub fn fuzzy(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fuzzy: true,
        }
    }

    pub fn substring(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fuzzy: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self::fuzzy("")
    }
}
