use std::fmt;

/// Error codes for all astcc diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Declaration errors (symbol registration, type references)
/// - E3xxx: Inheritance resolution
/// - E4xxx: Semantic validation
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Invalid character or unknown `%` directive
    E0001,
    /// Unterminated `%{` code block
    E0002,
    /// Unterminated string literal
    E0003,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected identifier
    E1002,
    /// Expected type name
    E1003,
    /// Unclosed delimiter
    E1004,

    // Declaration Errors (E2xxx)
    /// Name declared more than once
    E2001,
    /// Reference to an undeclared type
    E2002,
    /// More than one factory override in a node
    E2003,
    /// Factory override names a non-node symbol
    E2004,
    /// Duplicate parameter name in a method
    E2005,

    // Inheritance Errors (E3xxx)
    /// Declared parent is not a node (warning)
    E3001,
    /// Inheritance cycle
    E3002,

    // Validation Errors (E4xxx)
    /// Include file specified more than once
    E4001,
    /// Duplicate attribute name in a node
    E4002,
    /// Attribute name duplicated by a method
    E4003,
    /// Conflicting attribute visibility
    E4004,
    /// Duplicate method signature
    E4005,
    /// External method also provides code
    E4006,
    /// Method has neither code nor the external flag
    E4007,
    /// Conflicting method visibility
    E4008,
    /// `no_init` attribute without a default
    E4009,
    /// Abstract method on a concrete node
    E4010,
    /// Abstract method with a body, or abstract and static
    E4011,
    /// Factory override is not the node or one of its ancestors
    E4012,
    /// Attribute shadows an inherited constructor parameter
    E4013,
    /// Default code on an attribute without `no_init` (warning)
    E4014,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E4004 => "E4004",
            ErrorCode::E4005 => "E4005",
            ErrorCode::E4006 => "E4006",
            ErrorCode::E4007 => "E4007",
            ErrorCode::E4008 => "E4008",
            ErrorCode::E4009 => "E4009",
            ErrorCode::E4010 => "E4010",
            ErrorCode::E4011 => "E4011",
            ErrorCode::E4012 => "E4012",
            ErrorCode::E4013 => "E4013",
            ErrorCode::E4014 => "E4014",
        }
    }

    /// Check if this is a front-end error (lexer, parser or declarations).
    pub fn is_front_end_error(&self) -> bool {
        matches!(self.as_str().as_bytes()[1], b'0'..=b'2')
    }

    /// Check if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        self.as_str().starts_with("E4")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E1001.to_string(), "E1001");
        assert_eq!(ErrorCode::E4013.to_string(), "E4013");
    }

    #[test]
    fn test_phase_classification() {
        assert!(ErrorCode::E0002.is_front_end_error());
        assert!(ErrorCode::E1004.is_front_end_error());
        assert!(ErrorCode::E2005.is_front_end_error());
        assert!(!ErrorCode::E3002.is_front_end_error());
        assert!(!ErrorCode::E4001.is_front_end_error());

        assert!(ErrorCode::E4001.is_validation_error());
        assert!(!ErrorCode::E3001.is_validation_error());
    }
}
