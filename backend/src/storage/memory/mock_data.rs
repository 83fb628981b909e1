//! Deterministic mock records for the dashboard.
//!
//! Every date is expressed as an offset from an anchor day so that windows
//! like "today" or "this week" always have something to show.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use shared::{
    Client, Job, JobSource, JobStatus, PaymentMethod, Project, ProjectStatus, Task, TaskPriority,
    TaskStatus, Technician, Transaction, TransactionType,
};

/// A complete set of mock records
#[derive(Debug, Clone, Default)]
pub struct MockDataset {
    pub clients: Vec<Client>,
    pub technicians: Vec<Technician>,
    pub job_sources: Vec<JobSource>,
    pub jobs: Vec<Job>,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub transactions: Vec<Transaction>,
}

fn at(anchor: NaiveDate, offset_days: i64, hour: u32, minute: u32) -> NaiveDateTime {
    (anchor + Duration::days(offset_days))
        .and_hms_opt(hour, minute, 0)
        .unwrap_or_else(|| anchor.and_time(chrono::NaiveTime::MIN))
}

fn owned(value: &str) -> Option<String> {
    Some(value.to_string())
}

impl MockDataset {
    /// Build the dataset with every date relative to `anchor`
    pub fn anchored_at(anchor: NaiveDate) -> Self {
        let clients = vec![
            client("client-1", "Harbor View Apartments", "ops@harborview.example", "12 Harbor Rd", at(anchor, -90, 9, 0)),
            client("client-2", "Maria Gonzalez", "maria.g@example.com", "48 Elm Street", at(anchor, -60, 14, 30)),
            client("client-3", "Northside Dental", "frontdesk@northside.example", "301 Main Ave", at(anchor, -45, 11, 0)),
            client("client-4", "Tom Becker", "tbecker@example.com", "7 Birch Lane", at(anchor, -20, 16, 15)),
            client("client-5", "Lakeside Bakery", "hello@lakesidebakery.example", "88 Shore Dr", at(anchor, -5, 8, 45)),
        ];

        let technicians = vec![
            technician("tech-1", "Alex Rivera", "HVAC", true),
            technician("tech-2", "Jordan Lee", "Plumbing", true),
            technician("tech-3", "Sam Patel", "Electrical", true),
            technician("tech-4", "Chris Novak", "Appliance Repair", false),
        ];

        let job_sources = vec![
            source("source-1", "Google Ads"),
            source("source-2", "Referral"),
            source("source-3", "Website"),
            source("source-4", "Yelp"),
        ];

        let jobs = vec![
            job("job-1", "AC unit not cooling", "client-1", Some("tech-1"), Some("source-1"), "HVAC", JobStatus::Completed, at(anchor, -9, 10, 0), 420.0, "Replaced capacitor"),
            job("job-2", "Kitchen sink leak", "client-2", Some("tech-2"), Some("source-2"), "Plumbing", JobStatus::Completed, at(anchor, -6, 13, 30), 185.0, "Replaced P-trap"),
            job("job-3", "Panel upgrade quote", "client-3", Some("tech-3"), Some("source-3"), "Electrical", JobStatus::Cancelled, at(anchor, -3, 9, 0), 0.0, "Client postponed"),
            job("job-4", "Furnace inspection", "client-4", Some("tech-1"), Some("source-4"), "HVAC", JobStatus::Completed, at(anchor, -1, 15, 0), 129.0, "Annual check"),
            job("job-5", "Water heater replacement", "client-1", Some("tech-2"), Some("source-1"), "Plumbing", JobStatus::InProgress, at(anchor, 0, 8, 30), 1250.0, "50 gallon gas unit"),
            job("job-6", "Oven igniter repair", "client-5", Some("tech-4"), Some("source-2"), "Appliance Repair", JobStatus::Scheduled, at(anchor, 0, 14, 0), 210.0, "Commercial oven"),
            job("job-7", "Outlet rewiring", "client-2", Some("tech-3"), None, "Electrical", JobStatus::Scheduled, at(anchor, 1, 11, 0), 340.0, "Three GFCI outlets"),
            job("job-8", "Duct cleaning", "client-3", Some("tech-1"), Some("source-3"), "HVAC", JobStatus::Scheduled, at(anchor, 4, 9, 30), 560.0, "Whole office"),
            job("job-9", "Toilet replacement", "client-4", None, Some("source-4"), "Plumbing", JobStatus::Scheduled, at(anchor, 8, 10, 0), 395.0, "Low-flow model"),
            job("job-10", "Walk-in cooler service", "client-5", Some("tech-1"), Some("source-2"), "HVAC", JobStatus::Scheduled, at(anchor, 15, 7, 0), 780.0, "Quarterly maintenance"),
            job("job-11", "Lighting retrofit", "client-1", Some("tech-3"), Some("source-1"), "Electrical", JobStatus::Scheduled, at(anchor, 24, 13, 0), 2150.0, "LED conversion, parking garage"),
            job("job-12", "Garbage disposal install", "client-2", Some("tech-2"), Some("source-3"), "Plumbing", JobStatus::Completed, at(anchor, -35, 10, 30), 240.0, "1/2 HP unit"),
        ];

        let projects = vec![
            Project {
                id: "project-1".to_string(),
                name: "Harbor View HVAC Overhaul".to_string(),
                client_id: owned("client-1"),
                status: ProjectStatus::Active,
                start_date: anchor - Duration::days(14),
                end_date: Some(anchor + Duration::days(45)),
            },
            Project {
                id: "project-2".to_string(),
                name: "Shop Van Refit".to_string(),
                client_id: None,
                status: ProjectStatus::Planning,
                start_date: anchor + Duration::days(7),
                end_date: None,
            },
        ];

        let tasks = vec![
            task("task-1", "Order replacement compressors", Some("project-1"), Some("tech-1"), TaskPriority::High, TaskStatus::InProgress, at(anchor, 0, 17, 0)),
            task("task-2", "Confirm building access hours", Some("project-1"), None, TaskPriority::Medium, TaskStatus::Done, at(anchor, -2, 12, 0)),
            task("task-3", "Submit mechanical permit", Some("project-1"), Some("tech-1"), TaskPriority::High, TaskStatus::Todo, at(anchor, 2, 9, 0)),
            task("task-4", "Price shelving units", Some("project-2"), Some("tech-4"), TaskPriority::Low, TaskStatus::Todo, at(anchor, 9, 10, 0)),
            task("task-5", "Renew liability insurance", None, None, TaskPriority::High, TaskStatus::Todo, at(anchor, 5, 9, 0)),
            task("task-6", "Restock PEX fittings", None, Some("tech-2"), TaskPriority::Medium, TaskStatus::Todo, at(anchor, 1, 8, 0)),
            task("task-7", "Send quarterly invoices", None, None, TaskPriority::Medium, TaskStatus::Done, at(anchor, -4, 16, 0)),
            task("task-8", "Calibrate refrigerant gauges", None, Some("tech-1"), TaskPriority::Low, TaskStatus::Todo, at(anchor, 20, 14, 0)),
        ];

        let transactions = vec![
            transaction("tx-1", "AC repair payment", 420.0, TransactionType::Income, "HVAC", PaymentMethod::CreditCard, at(anchor, -9, 16, 0), Some("job-1"), Some("tech-1"), Some("source-1")),
            transaction("tx-2", "Sink repair payment", 185.0, TransactionType::Income, "Plumbing", PaymentMethod::Cash, at(anchor, -6, 15, 0), Some("job-2"), Some("tech-2"), Some("source-2")),
            transaction("tx-3", "Capacitors and contactors", 96.4, TransactionType::Expense, "Parts", PaymentMethod::CreditCard, at(anchor, -8, 11, 0), None, Some("tech-1"), None),
            transaction("tx-4", "Van fuel", 72.15, TransactionType::Expense, "Vehicle", PaymentMethod::CreditCard, at(anchor, -2, 7, 30), None, Some("tech-2"), None),
            transaction("tx-5", "Furnace inspection payment", 129.0, TransactionType::Income, "HVAC", PaymentMethod::Check, at(anchor, -1, 17, 0), Some("job-4"), Some("tech-1"), Some("source-4")),
            transaction("tx-6", "Google Ads monthly spend", 350.0, TransactionType::Expense, "Marketing", PaymentMethod::BankTransfer, at(anchor, -12, 9, 0), None, None, Some("source-1")),
            transaction("tx-7", "Water heater deposit", 500.0, TransactionType::Income, "Plumbing", PaymentMethod::BankTransfer, at(anchor, 0, 9, 0), Some("job-5"), Some("tech-2"), Some("source-1")),
            transaction("tx-8", "Water heater unit", 780.0, TransactionType::Expense, "Parts", PaymentMethod::CreditCard, at(anchor, 0, 7, 45), Some("job-5"), Some("tech-2"), None),
            transaction("tx-9", "Garbage disposal payment", 240.0, TransactionType::Income, "Plumbing", PaymentMethod::Cash, at(anchor, -35, 12, 0), Some("job-12"), Some("tech-2"), Some("source-3")),
            transaction("tx-10", "Shop rent", 1800.0, TransactionType::Expense, "Rent", PaymentMethod::BankTransfer, at(anchor, -17, 8, 0), None, None, None),
            transaction("tx-11", "Referral bonus", 50.0, TransactionType::Expense, "Marketing", PaymentMethod::Other, at(anchor, -5, 10, 0), None, None, Some("source-2")),
            transaction("tx-12", "Tool rental", 64.99, TransactionType::Expense, "Equipment", PaymentMethod::Cash, at(anchor, -3, 13, 0), None, Some("tech-3"), None),
        ];

        Self {
            clients,
            technicians,
            job_sources,
            jobs,
            projects,
            tasks,
            transactions,
        }
    }
}

fn client(id: &str, name: &str, email: &str, address: &str, created_at: NaiveDateTime) -> Client {
    Client {
        id: id.to_string(),
        name: name.to_string(),
        email: owned(email),
        phone: None,
        address: owned(address),
        created_at,
    }
}

fn technician(id: &str, name: &str, specialty: &str, is_active: bool) -> Technician {
    Technician {
        id: id.to_string(),
        name: name.to_string(),
        email: None,
        phone: None,
        specialty: owned(specialty),
        is_active,
    }
}

fn source(id: &str, name: &str) -> JobSource {
    JobSource {
        id: id.to_string(),
        name: name.to_string(),
        is_active: true,
    }
}

#[allow(clippy::too_many_arguments)]
fn job(
    id: &str,
    title: &str,
    client_id: &str,
    technician_id: Option<&str>,
    source_id: Option<&str>,
    category: &str,
    status: JobStatus,
    date: NaiveDateTime,
    amount: f64,
    notes: &str,
) -> Job {
    Job {
        id: id.to_string(),
        title: title.to_string(),
        client_id: client_id.to_string(),
        technician_id: technician_id.map(str::to_string),
        source_id: source_id.map(str::to_string),
        category: category.to_string(),
        status,
        date,
        amount,
        address: None,
        notes: owned(notes),
    }
}

fn task(
    id: &str,
    title: &str,
    project_id: Option<&str>,
    assignee_id: Option<&str>,
    priority: TaskPriority,
    status: TaskStatus,
    due_date: NaiveDateTime,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        project_id: project_id.map(str::to_string),
        assignee_id: assignee_id.map(str::to_string),
        category: None,
        priority,
        status,
        due_date,
    }
}

#[allow(clippy::too_many_arguments)]
fn transaction(
    id: &str,
    description: &str,
    amount: f64,
    transaction_type: TransactionType,
    category: &str,
    payment_method: PaymentMethod,
    date: NaiveDateTime,
    job_id: Option<&str>,
    technician_id: Option<&str>,
    source_id: Option<&str>,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        description: description.to_string(),
        amount,
        transaction_type,
        category: category.to_string(),
        payment_method,
        date,
        job_id: job_id.map(str::to_string),
        technician_id: technician_id.map(str::to_string),
        source_id: source_id.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_dataset_references_are_consistent() {
        let dataset = MockDataset::anchored_at(NaiveDate::from_ymd_opt(2025, 6, 18).unwrap());

        let client_ids: HashSet<&str> = dataset.clients.iter().map(|c| c.id.as_str()).collect();
        let tech_ids: HashSet<&str> = dataset.technicians.iter().map(|t| t.id.as_str()).collect();
        let source_ids: HashSet<&str> = dataset.job_sources.iter().map(|s| s.id.as_str()).collect();

        for job in &dataset.jobs {
            assert!(client_ids.contains(job.client_id.as_str()), "{} has unknown client", job.id);
            if let Some(tech) = &job.technician_id {
                assert!(tech_ids.contains(tech.as_str()));
            }
            if let Some(source) = &job.source_id {
                assert!(source_ids.contains(source.as_str()));
            }
        }
    }

    #[test]
    fn test_dataset_is_anchored() {
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
        let dataset = MockDataset::anchored_at(anchor);

        let todays_jobs = dataset.jobs.iter().filter(|j| j.date.date() == anchor).count();
        assert_eq!(todays_jobs, 2);
        assert!(dataset.tasks.iter().any(|t| t.due_date.date() == anchor));
    }
}
