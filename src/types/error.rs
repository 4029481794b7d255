//! Error types for the ledger
//!
//! The stores themselves never return errors, only `Outcome` values. This
//! module covers the layers around them: reading command files, parsing
//! rows, and turning rejected commands into something that can be logged.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed CSV, unknown command types, bad amounts
//! - **Command Errors**: Unknown account, insufficient funds

use super::account::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the row is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Unknown command type in the input
    #[error("Invalid command type '{command}'")]
    InvalidCommandType {
        /// The command type string as read
        command: String,
    },

    /// A column required by the command type is empty
    #[error("{command} command requires '{field}'")]
    MissingField {
        /// Command type that needs the field
        command: String,
        /// Name of the missing column
        field: String,
    },

    /// Amount could not be parsed as an exact decimal
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The amount string as read
        amount: String,
    },

    /// Command referenced an account that does not exist
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The unknown handle
        account: AccountId,
    },

    /// Command was rejected by the overdraft rule
    #[error("Insufficient funds on account {account} for amount {amount}")]
    InsufficientFunds {
        /// Account that would have been overdrawn
        account: AccountId,
        /// Requested delta or transfer amount
        amount: Decimal,
    },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
//
// I/O failures underneath the CSV reader stay I/O errors so they stop
// processing; everything else is a bad row.
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io_error) = error.kind() {
            return LedgerError::IoError {
                message: io_error.to_string(),
            };
        }
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for LedgerError {
    fn from(error: csv_async::Error) -> Self {
        if let csv_async::ErrorKind::Io(io_error) = error.kind() {
            return LedgerError::IoError {
                message: io_error.to_string(),
            };
        }
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    pub fn file_not_found(path: &str) -> Self {
        LedgerError::FileNotFound {
            path: path.to_string(),
        }
    }

    pub fn invalid_command_type(command: &str) -> Self {
        LedgerError::InvalidCommandType {
            command: command.to_string(),
        }
    }

    pub fn missing_field(command: &str, field: &str) -> Self {
        LedgerError::MissingField {
            command: command.to_string(),
            field: field.to_string(),
        }
    }

    pub fn invalid_amount(amount: &str) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    pub fn account_not_found(account: AccountId) -> Self {
        LedgerError::AccountNotFound { account }
    }

    pub fn insufficient_funds(account: AccountId, amount: Decimal) -> Self {
        LedgerError::InsufficientFunds { account, amount }
    }

    /// Add a line number to a parse-level error
    ///
    /// Errors that already carry a line, or are not about a single row, are
    /// returned unchanged.
    pub fn at_line(self, line: u64) -> Self {
        match self {
            LedgerError::ParseError {
                line: None,
                message,
            } => LedgerError::ParseError {
                line: Some(line),
                message,
            },
            LedgerError::InvalidCommandType { .. }
            | LedgerError::MissingField { .. }
            | LedgerError::InvalidAmount { .. } => LedgerError::ParseError {
                line: Some(line),
                message: self.to_string(),
            },
            other => other,
        }
    }

    /// Whether this error ends processing of the whole input
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LedgerError::FileNotFound { .. } | LedgerError::IoError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::file_not_found(
        LedgerError::FileNotFound { path: "commands.csv".to_string() },
        "File not found: commands.csv"
    )]
    #[case::io_error(
        LedgerError::IoError { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    #[case::parse_error_with_line(
        LedgerError::ParseError { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        LedgerError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::invalid_command_type(
        LedgerError::InvalidCommandType { command: "withdraw".to_string() },
        "Invalid command type 'withdraw'"
    )]
    #[case::missing_field(
        LedgerError::MissingField { command: "transfer".to_string(), field: "to".to_string() },
        "transfer command requires 'to'"
    )]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { amount: "1.2.3".to_string() },
        "Invalid amount '1.2.3'"
    )]
    #[case::account_not_found(
        LedgerError::AccountNotFound { account: 42 },
        "Account 42 not found"
    )]
    #[case::insufficient_funds(
        LedgerError::InsufficientFunds { account: 1, amount: Decimal::new(-10000, 2) },
        "Insufficient funds on account 1 for amount -100.00"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::account_not_found(
        LedgerError::account_not_found(9),
        LedgerError::AccountNotFound { account: 9 }
    )]
    #[case::missing_field(
        LedgerError::missing_field("adjust", "amount"),
        LedgerError::MissingField { command: "adjust".to_string(), field: "amount".to_string() }
    )]
    #[case::invalid_amount(
        LedgerError::invalid_amount("abc"),
        LedgerError::InvalidAmount { amount: "abc".to_string() }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_at_line_wraps_row_errors() {
        let error = LedgerError::invalid_amount("abc").at_line(3);
        assert_eq!(error.to_string(), "CSV parse error at line 3: Invalid amount 'abc'");
    }

    #[test]
    fn test_at_line_keeps_command_errors() {
        let error = LedgerError::account_not_found(1).at_line(3);
        assert_eq!(error, LedgerError::AccountNotFound { account: 1 });
    }

    #[test]
    fn test_is_fatal() {
        assert!(LedgerError::file_not_found("x.csv").is_fatal());
        assert!(!LedgerError::account_not_found(1).is_fatal());
        assert!(!LedgerError::invalid_amount("x").is_fatal());
    }

    #[test]
    fn test_csv_io_failure_is_fatal() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "device gone");

        let error = LedgerError::from(csv::Error::from(io_error));

        assert_eq!(
            error,
            LedgerError::IoError {
                message: "device gone".to_string()
            }
        );
        assert!(error.is_fatal());
    }

    #[test]
    fn test_csv_async_io_failure_is_fatal() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "device gone");

        let error = LedgerError::from(csv_async::Error::from(io_error));

        assert!(matches!(error, LedgerError::IoError { .. }));
        assert!(error.is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
