//! CSV format handling for ledger commands and balance output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to `LedgerCommand`
//! - Balance output serialization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Input Format
//!
//! ```text
//! type,account,to,amount
//! create,,,
//! adjust,1,,12.34
//! transfer,1,2,10.00
//! balance,1,,
//! ```

use crate::types::{AccountBalance, AccountId, LedgerCommand, LedgerError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Every column but `type` is optional; which ones are required depends on
/// the command type.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub command: String,
    pub account: Option<AccountId>,
    pub to: Option<AccountId>,
    pub amount: Option<String>,
}

fn parse_amount(amount: Option<String>, command: &str) -> Result<Decimal, LedgerError> {
    match amount {
        Some(amount_str) if !amount_str.trim().is_empty() => {
            Decimal::from_str(amount_str.trim())
                .map_err(|_| LedgerError::invalid_amount(&amount_str))
        }
        _ => Err(LedgerError::missing_field(command, "amount")),
    }
}

fn require(value: Option<AccountId>, command: &str, field: &str) -> Result<AccountId, LedgerError> {
    value.ok_or_else(|| LedgerError::missing_field(command, field))
}

/// Convert a CsvRecord to a LedgerCommand
///
/// Command types are case insensitive. Columns a command does not use are
/// ignored.
///
/// # Errors
///
/// - `InvalidCommandType` for an unknown `type`
/// - `MissingField` when a required column is empty
/// - `InvalidAmount` when `amount` is not an exact decimal
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerCommand, LedgerError> {
    let command = csv_record.command.to_lowercase();

    match command.as_str() {
        "create" => Ok(LedgerCommand::Create),
        "balance" => Ok(LedgerCommand::Balance {
            account: require(csv_record.account, &command, "account")?,
        }),
        "adjust" => Ok(LedgerCommand::Adjust {
            account: require(csv_record.account, &command, "account")?,
            delta: parse_amount(csv_record.amount, &command)?,
        }),
        "transfer" => Ok(LedgerCommand::Transfer {
            from: require(csv_record.account, &command, "account")?,
            to: require(csv_record.to, &command, "to")?,
            amount: parse_amount(csv_record.amount, &command)?,
        }),
        _ => Err(LedgerError::invalid_command_type(&csv_record.command)),
    }
}

/// Write account balances to CSV format
///
/// Writes `account,balance` rows sorted by handle. Balances keep their own
/// decimal scale, so `24.68` prints as `24.68` and `0` as `0`.
pub fn write_balances_csv(
    accounts: &[AccountBalance],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(["account", "balance"])?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.account);

    for account in sorted_accounts {
        writer.write_record(&[account.account.to_string(), account.balance.to_string()])?;
    }

    writer.flush()?;

    Ok(())
}
