use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Clock {
    name: String,
    size: u32,
}

impl Clock {
    pub fn new(name: &str, size: u32) -> Self {
        Self {
            name: String::from(name),
            size,
        }
    }

    pub fn scalar(name: &str) -> Self {
        Self::new(name, 1)
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    /// Array dimension of the clock declaration.
    pub fn size(&self) -> u32 {
        self.size
    }
}

impl Display for Clock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
