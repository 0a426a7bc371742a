//! The execution message sink: sticky error flag, resettable warning
//! flag, and the accumulated diagnostic records.
//!
//! One sink is scoped to one engine run invocation and passed by mutable
//! reference into every phase call. The error flag is the authoritative
//! short-circuit gate for the run loop: once raised it is never cleared
//! by the engine. The warning flag is reset at unit-call and step
//! boundaries so per-simulator diagnostics stay attributable.

/// One recorded diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Who raised the message (`"Engine"` or a simulator id).
    pub sender: String,
    /// Human-readable description.
    pub text: String,
}

/// Run-scoped error/warning sink.
#[derive(Debug, Default)]
pub struct ExecutionMessages {
    errors: Vec<Message>,
    warnings: Vec<Message>,
    error_flag: bool,
    warning_flag: bool,
}

impl ExecutionMessages {
    /// New sink with both flags down and no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error and raise the sticky error flag.
    pub fn set_error(&mut self, sender: impl Into<String>, text: impl Into<String>) {
        self.errors.push(Message {
            sender: sender.into(),
            text: text.into(),
        });
        self.error_flag = true;
    }

    /// Record a warning and raise the warning flag.
    pub fn add_warning(&mut self, sender: impl Into<String>, text: impl Into<String>) {
        self.warnings.push(Message {
            sender: sender.into(),
            text: text.into(),
        });
        self.warning_flag = true;
    }

    /// Whether any error has been recorded in this run invocation.
    pub fn is_error_flag(&self) -> bool {
        self.error_flag
    }

    /// Whether a warning has been raised since the last reset.
    pub fn is_warning_flag(&self) -> bool {
        self.warning_flag
    }

    /// Lower the warning flag. Recorded warnings are kept.
    pub fn reset_warning_flag(&mut self) {
        self.warning_flag = false;
    }

    /// All recorded errors, in order.
    pub fn errors(&self) -> &[Message] {
        &self.errors
    }

    /// All recorded warnings, in order.
    pub fn warnings(&self) -> &[Message] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_flag_is_sticky() {
        let mut msgs = ExecutionMessages::new();
        assert!(!msgs.is_error_flag());

        msgs.set_error("Engine", "topology rebuild error");
        assert!(msgs.is_error_flag());

        // No API lowers the error flag.
        msgs.reset_warning_flag();
        assert!(msgs.is_error_flag());
        assert_eq!(msgs.errors().len(), 1);
        assert_eq!(msgs.errors()[0].sender, "Engine");
    }

    #[test]
    fn warning_flag_resets_but_records_accumulate() {
        let mut msgs = ExecutionMessages::new();
        msgs.add_warning("sim.a", "suspicious parameter");
        assert!(msgs.is_warning_flag());

        msgs.reset_warning_flag();
        assert!(!msgs.is_warning_flag());

        msgs.add_warning("sim.b", "another one");
        assert!(msgs.is_warning_flag());
        assert_eq!(msgs.warnings().len(), 2);
    }
}
