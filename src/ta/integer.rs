use serde::{Deserialize, Serialize};

/// A bounded integer variable shared by all processes of a system.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Integer {
    name: String,
    size: u32,
    min: i64,
    max: i64,
    init: i64,
}

impl Integer {
    pub fn new(name: &str, size: u32, min: i64, max: i64, init: i64) -> Self {
        Self {
            name: String::from(name),
            size,
            min,
            max,
            init,
        }
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn init(&self) -> i64 {
        self.init
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_returns_integer_with_bounds_when_called() {
        // when
        let int = Integer::new("i", 1, -3, 10, 0);

        // then
        assert_eq!(int.name(), "i");
        assert_eq!(int.size(), 1);
        assert_eq!((int.min(), int.max(), int.init()), (-3, 10, 0));
    }
}
