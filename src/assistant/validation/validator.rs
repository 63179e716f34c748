//! Input validation applied by adapters before a turn reaches the core.

use regex::Regex;

/// Guidance for an empty message.
pub const EMPTY_GUIDANCE: &str =
    "It looks like your message was empty. Please share a sleep-related question so I can help.";

/// Guidance for a message too short or without letters.
pub const NOT_MEANINGFUL_GUIDANCE: &str =
    "I need a bit more detail to help. Could you add a few more words about your sleep question?";

/// Guidance for a message matching the unsafe-intent denylist.
pub const UNSAFE_GUIDANCE: &str =
    "I'm here to talk about healthy sleep habits. Please avoid harmful topics and try again.";

const UNSAFE_PATTERN: &str = r"(?i)\b(?:kill|suicide|self-harm|weapon|bomb|attack)\b";
const MIN_MEANINGFUL_CHARS: usize = 3;

/// Why a message was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing after trimming.
    Empty,
    /// Too short or no alphabetic character.
    NotMeaningful,
    /// Matched the unsafe-intent denylist.
    Unsafe,
}

impl Rejection {
    /// Fixed user-facing guidance.
    #[must_use]
    pub const fn guidance(self) -> &'static str {
        match self {
            Self::Empty => EMPTY_GUIDANCE,
            Self::NotMeaningful => NOT_MEANINGFUL_GUIDANCE,
            Self::Unsafe => UNSAFE_GUIDANCE,
        }
    }
}

/// Validation outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validation {
    /// Trimmed message, safe to hand to the orchestrator.
    Accepted(String),
    /// Message must not reach the orchestrator.
    Rejected(Rejection),
}

/// Rejects empty, non-meaningful, and unsafe messages.
#[derive(Clone, Debug)]
pub struct MessageValidator {
    unsafe_pattern: Regex,
}

impl MessageValidator {
    /// Compile the denylist.
    ///
    /// # Errors
    /// Returns an error if the pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            unsafe_pattern: Regex::new(UNSAFE_PATTERN)?,
        })
    }

    /// Validate a raw message.
    #[must_use]
    pub fn validate(&self, raw: &str) -> Validation {
        let message = raw.trim();
        if message.is_empty() {
            return Validation::Rejected(Rejection::Empty);
        }
        if message.chars().count() < MIN_MEANINGFUL_CHARS
            || !message.chars().any(|c| c.is_ascii_alphabetic())
        {
            return Validation::Rejected(Rejection::NotMeaningful);
        }
        if self.unsafe_pattern.is_match(message) {
            return Validation::Rejected(Rejection::Unsafe);
        }
        Validation::Accepted(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> MessageValidator {
        MessageValidator::new().unwrap()
    }

    #[test]
    fn test_accepts_and_trims() {
        assert_eq!(
            validator().validate("  How long should I nap?  "),
            Validation::Accepted("How long should I nap?".to_string())
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            validator().validate(" \n\t "),
            Validation::Rejected(Rejection::Empty)
        );
    }

    #[test]
    fn test_not_meaningful() {
        let v = validator();
        assert_eq!(v.validate("hi"), Validation::Rejected(Rejection::NotMeaningful));
        assert_eq!(v.validate("12345"), Validation::Rejected(Rejection::NotMeaningful));
        assert_eq!(v.validate("?!?!"), Validation::Rejected(Rejection::NotMeaningful));
    }

    #[test]
    fn test_unsafe_keywords() {
        let v = validator();
        assert_eq!(
            v.validate("How do I build a BOMB"),
            Validation::Rejected(Rejection::Unsafe)
        );
        assert_eq!(
            v.validate("thoughts of self-harm at night"),
            Validation::Rejected(Rejection::Unsafe)
        );
        assert_eq!(
            v.validate("A panic attack keeps me awake"),
            Validation::Rejected(Rejection::Unsafe)
        );
    }

    #[test]
    fn test_word_boundaries() {
        assert!(matches!(
            validator().validate("I watched a skilled bomber plane documentary"),
            Validation::Accepted(_)
        ));
    }

    #[test]
    fn test_guidance_strings() {
        assert_eq!(Rejection::Empty.guidance(), EMPTY_GUIDANCE);
        assert_eq!(Rejection::Unsafe.guidance(), UNSAFE_GUIDANCE);
    }
}
