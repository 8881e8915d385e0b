//! Syslog severity scale shared by all sinks

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The eight syslog severities, ordered most to least severe.
///
/// The discriminant is the severity rank: a sink configured with
/// threshold `T` accepts a record at level `L` iff `L as u8 <= T as u8`.
/// The order is fixed and never reconfigured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Emerg = 0,
    Alert = 1,
    Crit = 2,
    #[serde(alias = "err")]
    Error = 3,
    #[serde(alias = "warn")]
    Warning = 4,
    Notice = 5,
    #[default]
    Info = 6,
    Debug = 7,
}

impl Severity {
    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Emerg => "emerg",
            Severity::Alert => "alert",
            Severity::Crit => "crit",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }

    /// Rank index within the fixed order (0 = most severe).
    #[inline]
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// True when a record at `self` passes a sink threshold of `threshold`.
    #[inline]
    pub fn passes(&self, threshold: Severity) -> bool {
        self.rank() <= threshold.rank()
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Emerg => BrightRed,
            Severity::Alert => BrightRed,
            Severity::Crit => Red,
            Severity::Error => Red,
            Severity::Warning => Yellow,
            Severity::Notice => Cyan,
            Severity::Info => Green,
            Severity::Debug => Blue,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "emerg" | "emergency" => Ok(Severity::Emerg),
            "alert" => Ok(Severity::Alert),
            "crit" | "critical" => Ok(Severity::Crit),
            "error" | "err" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "notice" => Ok(Severity::Notice),
            "info" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order() {
        assert!(Severity::Emerg.rank() < Severity::Debug.rank());
        assert!(Severity::Error.rank() < Severity::Warning.rank());
        assert_eq!(Severity::Emerg.rank(), 0);
        assert_eq!(Severity::Debug.rank(), 7);
    }

    #[test]
    fn test_threshold_gate() {
        // More severe or equal passes
        assert!(Severity::Error.passes(Severity::Error));
        assert!(Severity::Crit.passes(Severity::Error));
        assert!(Severity::Emerg.passes(Severity::Debug));

        // Less severe is rejected
        assert!(!Severity::Debug.passes(Severity::Error));
        assert!(!Severity::Warning.passes(Severity::Error));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("err".parse::<Severity>().unwrap(), Severity::Error);
        assert_eq!("EMERG".parse::<Severity>().unwrap(), Severity::Emerg);
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Emerg.to_string(), "emerg");
    }

    #[test]
    fn test_serde_lowercase_names() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        let parsed: Severity = serde_json::from_str("\"err\"").unwrap();
        assert_eq!(parsed, Severity::Error);
    }
}
