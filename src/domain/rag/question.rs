/// A question as it moves through the answer loop.
///
/// `current` starts as `original` and changes on every successful rewrite.
/// `attempt` only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    original: String,
    current: String,
    attempt: u32,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        let original = text.into();
        Self {
            current: original.clone(),
            original,
            attempt: 0,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Spend one attempt and return the new count
    pub fn spend_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    pub fn reformulate(&mut self, text: impl Into<String>) {
        self.current = text.into();
    }
}
