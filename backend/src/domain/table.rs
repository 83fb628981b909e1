//! Table presentation for the ledger and job board.
//!
//! Turns raw records into display rows: dates in the configured format,
//! amounts with the currency symbol and an explicit sign, and names
//! resolved for referenced clients and technicians.

use chrono::NaiveDateTime;
use shared::{AmountType, Client, FormattedJob, FormattedTransaction, Job, Technician, Transaction};
use std::collections::HashMap;
use std::sync::Arc;

use super::validation::{has_valid_precision, ValidationError};
use crate::config::{DashboardConfig, DateFormat};

/// Shown in the technician column for jobs nobody is assigned to
pub const UNASSIGNED: &str = "Unassigned";

#[derive(Clone)]
pub struct TableService {
    config: Arc<DashboardConfig>,
}

impl TableService {
    pub fn new(config: Arc<DashboardConfig>) -> Self {
        Self { config }
    }

    /// Format a list of transactions for table display
    pub fn format_transactions(&self, transactions: &[Transaction]) -> Vec<FormattedTransaction> {
        transactions
            .iter()
            .map(|tx| self.format_transaction(tx))
            .collect()
    }

    pub fn format_transaction(&self, transaction: &Transaction) -> FormattedTransaction {
        let signed = transaction.signed_amount();
        FormattedTransaction {
            id: transaction.id.clone(),
            formatted_date: self.format_date(transaction.date),
            description: transaction.description.clone(),
            category: transaction.category.clone(),
            payment_method: transaction.payment_method.label().to_string(),
            formatted_amount: self.format_signed_amount(signed),
            amount_type: classify_amount(signed),
            raw_amount: signed,
        }
    }

    /// Format jobs, resolving client and technician names
    ///
    /// A job pointing at a record that no longer exists shows the raw id.
    pub fn format_jobs(&self, jobs: &[Job], clients: &[Client], technicians: &[Technician]) -> Vec<FormattedJob> {
        let client_names: HashMap<&str, &str> = clients
            .iter()
            .map(|client| (client.id.as_str(), client.name.as_str()))
            .collect();
        let technician_names: HashMap<&str, &str> = technicians
            .iter()
            .map(|technician| (technician.id.as_str(), technician.name.as_str()))
            .collect();

        jobs.iter()
            .map(|job| FormattedJob {
                id: job.id.clone(),
                formatted_date: self.format_date(job.date),
                title: job.title.clone(),
                client_name: client_names
                    .get(job.client_id.as_str())
                    .copied()
                    .unwrap_or(job.client_id.as_str())
                    .to_string(),
                technician_name: match job.technician_id.as_deref() {
                    Some(id) => technician_names.get(id).copied().unwrap_or(id).to_string(),
                    None => UNASSIGNED.to_string(),
                },
                status: job.status.label().to_string(),
                formatted_amount: self.format_amount(job.amount),
            })
            .collect()
    }

    /// Format a timestamp based on configuration
    pub fn format_date(&self, date: NaiveDateTime) -> String {
        match self.config.date_format {
            DateFormat::MonthDayYear => date.format("%B %-d, %Y %-I:%M %p").to_string(),
            DateFormat::ShortDate => date.format("%m/%d/%Y").to_string(),
            DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Unsigned amount with the currency symbol, e.g. "$1,250.00"
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{}", self.config.currency_symbol, group_thousands(amount.abs()))
    }

    /// Amount with an explicit sign, e.g. "+$500.00" / "-$72.15"
    pub fn format_signed_amount(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "+" };
        format!("{}{}", sign, self.format_amount(amount))
    }

    /// Parse an amount typed into a form, tolerating a currency symbol,
    /// thousands separators and surrounding whitespace
    pub fn parse_amount_input(&self, input: &str) -> Result<f64, ValidationError> {
        let cleaned: String = input
            .trim()
            .trim_start_matches(self.config.currency_symbol.as_str())
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();
        if cleaned.is_empty() {
            return Err(ValidationError::MissingField("Amount"));
        }

        let amount: f64 = cleaned
            .parse()
            .map_err(|_| ValidationError::InvalidAmount(input.trim().to_string()))?;
        if !amount.is_finite() {
            return Err(ValidationError::InvalidAmount(input.trim().to_string()));
        }
        if amount <= 0.0 {
            return Err(ValidationError::AmountNotPositive);
        }
        if !has_valid_precision(amount) {
            return Err(ValidationError::AmountPrecisionTooHigh);
        }
        Ok(amount)
    }
}

/// Classify amount type for styling purposes
pub fn classify_amount(amount: f64) -> AmountType {
    if amount > 0.0 {
        AmountType::Positive
    } else if amount < 0.0 {
        AmountType::Negative
    } else {
        AmountType::Zero
    }
}

fn group_thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount);
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{}.{}", grouped, cents)
}
