//! Built-in pipeline stages.
//!
//! Keryx ships two mandatory stages that every registration receives ahead
//! of any custom behaviors:
//!
//! 1. **Logging** - One start and one terminal event per dispatch
//! 2. **Validation** - Runs all registered validators, short-circuits on failure

mod logging;
mod validation;

pub use logging::{DispatchRecord, LoggingStage};
pub use validation::ValidationStage;

/// Fixed order of the built-in stages.
///
/// The built-in behaviors take their chain names from here, so the tags in
/// `Pipeline::stage_names` always agree with [`Stage::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Stage {
    /// Stage 1: start/terminal dispatch events and metrics.
    Logging = 1,
    /// Stage 2: field-level request validation.
    Validation = 2,
}

impl Stage {
    /// Returns the stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Logging => "logging",
            Self::Validation => "validation",
        }
    }

    /// Returns the built-in stages in execution order.
    #[must_use]
    pub const fn all() -> [Stage; 2] {
        [Self::Logging, Self::Validation]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordering() {
        assert!(Stage::Logging < Stage::Validation);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Logging.name(), "logging");
        assert_eq!(Stage::Validation.name(), "validation");
    }
}
