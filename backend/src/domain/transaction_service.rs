//! # Transaction Service
//!
//! Income and expense bookkeeping. Amounts are stored as positive
//! magnitudes; the transaction type says which way the money moved, and
//! [`Transaction::signed_amount`] applies the sign for totals.
//!
//! ## Key Operations
//!
//! - **Creation**: validates description, amount and precision, then stamps
//!   the current time unless a date is supplied
//! - **Listing**: filter, sort and cursor-paginate the ledger
//! - **Summary**: income, expense and net over a filtered set, broken down
//!   by payment method and by category

use anyhow::Result;
use shared::{
    CategoryTotal, CreateTransactionRequest, DeleteRecordsRequest, DeleteRecordsResponse,
    ListQuery, ListResponse, MutationResponse, PaymentMethod, PaymentMethodTotal, Transaction,
    TransactionFilter, TransactionSummary, TransactionType,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::clock::Clock;
use super::filter;
use super::pagination;
use super::records::{self, round_cents};
use super::validation::{has_valid_precision, optional_text, require_text, ValidationError};
use crate::config::DashboardConfig;
use crate::storage::{Connection, Entity, EntityStorage};

#[derive(Clone)]
pub struct TransactionService<C: Connection> {
    transaction_repository: C::TransactionRepository,
    job_repository: C::JobRepository,
    config: Arc<DashboardConfig>,
    clock: Arc<dyn Clock>,
}

impl<C: Connection> TransactionService<C> {
    pub fn new(connection: &C, config: Arc<DashboardConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            transaction_repository: connection.create_transaction_repository(),
            job_repository: connection.create_job_repository(),
            config,
            clock,
        }
    }

    /// Create a new transaction
    pub async fn create_transaction(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<MutationResponse<Transaction>> {
        info!(
            "Creating transaction: {} {} ({})",
            request.transaction_type.label(),
            request.amount,
            request.description
        );

        let max = self.config.max_text_length;
        let description = require_text("Description", &request.description, max)?;
        let category = require_text("Category", &request.category, max)?;

        if !request.amount.is_finite() {
            return Err(ValidationError::InvalidAmount(request.amount.to_string()).into());
        }
        if request.amount <= 0.0 {
            return Err(ValidationError::AmountNotPositive.into());
        }
        if !has_valid_precision(request.amount) {
            return Err(ValidationError::AmountPrecisionTooHigh.into());
        }

        let job_id = optional_text(request.job_id);
        if let Some(id) = &job_id {
            if !self.job_repository.exists(id).await? {
                return Err(ValidationError::UnknownReference {
                    kind: "job",
                    id: id.clone(),
                }
                .into());
            }
        }

        let transaction = Transaction {
            id: shared::generate_id(Transaction::KIND),
            description,
            amount: round_cents(request.amount),
            transaction_type: request.transaction_type,
            category,
            payment_method: request.payment_method,
            date: request.date.unwrap_or_else(|| self.clock.now()),
            job_id,
            technician_id: optional_text(request.technician_id),
            source_id: optional_text(request.source_id),
        };
        self.transaction_repository.store(&transaction).await?;

        info!("Created transaction: {}", transaction.id);
        let success_message = match transaction.transaction_type {
            TransactionType::Income => "Income recorded successfully",
            TransactionType::Expense => "Expense recorded successfully",
        };
        Ok(MutationResponse {
            record: transaction,
            success_message: success_message.to_string(),
        })
    }

    pub async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        let transaction = self.transaction_repository.get(transaction_id).await?;
        if transaction.is_none() {
            warn!("Transaction not found: {}", transaction_id);
        }
        Ok(transaction)
    }

    /// List transactions with filtering, sorting and cursor pagination
    pub async fn list_transactions(
        &self,
        query: ListQuery<TransactionType>,
    ) -> Result<ListResponse<Transaction>> {
        let limit = self.config.page_size(query.limit);
        let transactions = self.transaction_repository.list().await?;
        let response = pagination::list_page(
            transactions,
            &query.filter,
            query.sort,
            query.after.as_deref(),
            limit,
            self.clock.now(),
        )?;
        info!(
            "Returning {} of {} matching transactions",
            response.items.len(),
            response.total_matched
        );
        Ok(response)
    }

    /// Totals over every transaction matching the filter
    pub async fn summarize(&self, transaction_filter: &TransactionFilter) -> Result<TransactionSummary> {
        filter::validate_filter(transaction_filter)?;
        let transactions = self.transaction_repository.list().await?;
        let matched = filter::apply(&transactions, transaction_filter, self.clock.now());
        Ok(summarize_transactions(&matched))
    }

    pub async fn delete_transactions(&self, request: DeleteRecordsRequest) -> Result<DeleteRecordsResponse> {
        records::delete_records(&self.transaction_repository, request, "transaction", "transactions").await
    }

    pub async fn all_transactions(&self) -> Result<Vec<Transaction>> {
        self.transaction_repository.list().await
    }
}

/// Build a summary from already-filtered transactions
///
/// Payment methods appear in their declaration order and only when used;
/// categories are sorted by name.
pub fn summarize_transactions(transactions: &[&Transaction]) -> TransactionSummary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut by_method: BTreeMap<usize, f64> = BTreeMap::new();
    let mut by_category: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        let category = by_category.entry(transaction.category.as_str()).or_default();
        match transaction.transaction_type {
            TransactionType::Income => {
                total_income += transaction.amount;
                category.0 += transaction.amount;
            }
            TransactionType::Expense => {
                total_expense += transaction.amount;
                category.1 += transaction.amount;
            }
        }

        let method_index = PaymentMethod::ALL
            .iter()
            .position(|method| *method == transaction.payment_method)
            .unwrap_or(PaymentMethod::ALL.len() - 1);
        *by_method.entry(method_index).or_default() += transaction.signed_amount();
    }

    TransactionSummary {
        count: transactions.len(),
        total_income: round_cents(total_income),
        total_expense: round_cents(total_expense),
        net: round_cents(total_income - total_expense),
        by_payment_method: by_method
            .into_iter()
            .map(|(index, total)| PaymentMethodTotal {
                payment_method: PaymentMethod::ALL[index],
                total: round_cents(total),
            })
            .collect(),
        by_category: by_category
            .into_iter()
            .map(|(category, (income, expense))| CategoryTotal {
                category: category.to_string(),
                income: round_cents(income),
                expense: round_cents(expense),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::storage::{MemoryConnection, MockDataset};
    use chrono::{NaiveDate, NaiveDateTime};
    use shared::DateWindow;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 18).unwrap()
    }

    fn noon() -> NaiveDateTime {
        anchor().and_hms_opt(12, 0, 0).unwrap()
    }

    fn setup_test() -> TransactionService<MemoryConnection> {
        let connection = MemoryConnection::seeded(MockDataset::anchored_at(anchor()));
        TransactionService::new(&connection, Arc::new(DashboardConfig::default()), Arc::new(FixedClock(noon())))
    }

    fn request(amount: f64) -> CreateTransactionRequest {
        CreateTransactionRequest {
            description: "Filter restock".to_string(),
            amount,
            transaction_type: TransactionType::Expense,
            category: "Parts".to_string(),
            payment_method: PaymentMethod::Cash,
            date: None,
            job_id: None,
            technician_id: Some("tech-1".to_string()),
            source_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_transaction_defaults_to_now() {
        let service = setup_test();

        let response = service.create_transaction(request(42.5)).await.unwrap();
        assert_eq!(response.record.date, noon());
        assert_eq!(response.record.signed_amount(), -42.5);
        assert_eq!(response.success_message, "Expense recorded successfully");
    }

    #[tokio::test]
    async fn test_create_transaction_validation() {
        let service = setup_test();

        let err = service.create_transaction(request(0.0)).await.unwrap_err();
        assert_eq!(err.downcast_ref::<ValidationError>(), Some(&ValidationError::AmountNotPositive));

        let err = service.create_transaction(request(10.005)).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::AmountPrecisionTooHigh)
        );

        let err = service.create_transaction(request(f64::NAN)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::InvalidAmount(_))
        ));

        let mut bad_job = request(10.0);
        bad_job.job_id = Some("job-404".to_string());
        assert!(service.create_transaction(bad_job).await.is_err());
    }

    #[tokio::test]
    async fn test_summarize_this_week() {
        let service = setup_test();

        let mut transaction_filter = TransactionFilter::default();
        transaction_filter.date_window = DateWindow::ThisWeek;
        let summary = service.summarize(&transaction_filter).await.unwrap();

        // tx-4, tx-5, tx-7, tx-8
        assert_eq!(summary.count, 4);
        assert_eq!(summary.total_income, 629.0);
        assert_eq!(summary.total_expense, 852.15);
        assert_eq!(summary.net, -223.15);

        let methods: Vec<(PaymentMethod, f64)> = summary
            .by_payment_method
            .iter()
            .map(|total| (total.payment_method, total.total))
            .collect();
        assert_eq!(
            methods,
            vec![
                (PaymentMethod::CreditCard, -852.15),
                (PaymentMethod::Check, 129.0),
                (PaymentMethod::BankTransfer, 500.0),
            ]
        );

        let categories: Vec<&str> = summary.by_category.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec!["HVAC", "Parts", "Plumbing", "Vehicle"]);
    }

    #[tokio::test]
    async fn test_summarize_empty_selection() {
        let service = setup_test();

        let mut transaction_filter = TransactionFilter::default();
        transaction_filter.search = "no such description".to_string();
        let summary = service.summarize(&transaction_filter).await.unwrap();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.net, 0.0);
        assert!(summary.by_payment_method.is_empty());
    }

    #[tokio::test]
    async fn test_list_and_delete_transactions() {
        let service = setup_test();

        let mut query = ListQuery::default();
        query.filter.statuses = vec![TransactionType::Income];
        query.limit = Some(2);
        let page = service.list_transactions(query).await.unwrap();
        let ids: Vec<&str> = page.items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tx-7", "tx-5"]);
        assert_eq!(page.total_matched, 5);
        assert_eq!(page.pagination.next_cursor.as_deref(), Some("tx-5"));

        let response = service
            .delete_transactions(DeleteRecordsRequest {
                ids: vec!["tx-404".to_string()],
            })
            .await
            .unwrap();
        assert_eq!(response.success_message, "No transactions were deleted");
        assert_eq!(service.all_transactions().await.unwrap().len(), 12);
    }
}
