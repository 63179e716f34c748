//! Route labels selected per turn.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Branch chosen for a conversational turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Greetings and small talk, answered without the knowledge base.
    General,
    /// Everything else, answered from retrieved sleep knowledge.
    Sleep,
}

impl Route {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Sleep => "sleep",
        }
    }

    /// Interpret raw classifier output.
    ///
    /// Any output containing `general` (after lower-casing) selects the general
    /// route; everything else, including empty or garbled output, selects sleep.
    /// The substring match is loose: "in general, ..." echoed back
    /// by the model would also route to general.
    #[must_use]
    pub fn from_classifier_output(raw: &str) -> Self {
        if raw.trim().to_lowercase().contains("general") {
            Self::General
        } else {
            Self::Sleep
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "general" => Ok(Self::General),
            "sleep" => Ok(Self::Sleep),
            _ => Err(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_output_exact_words() {
        assert_eq!(Route::from_classifier_output("general"), Route::General);
        assert_eq!(Route::from_classifier_output("sleep"), Route::Sleep);
    }

    #[test]
    fn test_classifier_output_tolerates_noise() {
        assert_eq!(Route::from_classifier_output("  General.\n"), Route::General);
        assert_eq!(
            Route::from_classifier_output("\"GENERAL\" - greeting"),
            Route::General
        );
    }

    #[test]
    fn test_classifier_output_defaults_to_sleep() {
        assert_eq!(Route::from_classifier_output(""), Route::Sleep);
        assert_eq!(
            Route::from_classifier_output("this is about stress and rest"),
            Route::Sleep
        );
        assert_eq!(Route::from_classifier_output("small talk"), Route::Sleep);
    }

    #[test]
    fn test_embedded_general_still_routes_general() {
        assert_eq!(
            Route::from_classifier_output("in general this is about sleep"),
            Route::General
        );
    }

    #[test]
    fn test_round_trip_str() {
        assert_eq!("sleep".parse::<Route>(), Ok(Route::Sleep));
        assert_eq!(Route::General.to_string(), "general");
        assert!("validation".parse::<Route>().is_err());
    }
}
