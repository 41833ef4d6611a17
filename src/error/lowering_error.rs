/// Errors raised while lowering the surface tree into executable nodes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoweringError {
    /// A replacement receiver chain does not end in a variable.
    #[error("Error on line {line}: Invalid assignment target: unsupported receiver shape '{shape}'.")]
    UnsupportedReceiverShape {
        /// Short description of the offending receiver.
        shape: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// The left-hand side of an assignment is not assignable at all.
    #[error("Error on line {line}: Invalid (do_set) left-hand side to assignment.")]
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl LoweringError {
    /// Stable identifier of the error kind.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::UnsupportedReceiverShape { .. } => "UNSUPPORTED_RECEIVER_SHAPE",
            Self::InvalidAssignmentTarget { .. } => "INVALID_LHS",
        }
    }
}
