use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u32);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl std::str::FromStr for WindowId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u32::from_str_radix(hex, 16).map(WindowId),
            None => trimmed.parse::<u32>().map(WindowId),
        }
    }
}

/// One managed window as seen in a single snapshot.
///
/// `last_focus_rank` is 0 for the most recently focused window and grows
/// with age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowEntry {
    pub id: WindowId,
    pub title: String,
    pub class_name: String,
    pub is_current: bool,
    pub last_focus_rank: u32,
}

impl WindowEntry {
    pub fn new(id: u32, title: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            id: WindowId(id),
            title: title.into(),
            class_name: class_name.into(),
            is_current: false,
            last_focus_rank: 0,
        }
    }

    pub fn current(mut self) -> Self {
        self.is_current = true;
        self
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.last_focus_rank = rank;
        self
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.class_name.to_lowercase() == class_name.to_lowercase()
    }
}
