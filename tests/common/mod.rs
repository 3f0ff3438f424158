//! Shared fixtures: a temporary data directory and valid records for every
//! built-in entity.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use lakegate::promotion::{PromotionOrchestrator, RunOptions, RunReport, RunSelection};
use lakegate::quality::RecordValidator;
use lakegate::schema::SchemaRegistry;
use lakegate::snapshot::FsSnapshotStore;

pub struct Lake {
    pub dir: TempDir,
    pub registry: SchemaRegistry,
}

impl Lake {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            registry: SchemaRegistry::builtin().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a staged batch as `qa/<entity>/<entity>_<stamp>.json`. Its
    /// modification time is pushed `age_rank` seconds ahead so higher ranks
    /// are newer.
    pub fn stage(&self, entity: &str, stamp: &str, age_rank: u64, data: Vec<Value>) -> PathBuf {
        let path = self
            .path()
            .join("qa")
            .join(entity)
            .join(format!("{}_{}.json", entity, stamp));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let document = json!({
            "metadata": {
                "source": "generator",
                "extracted_at": format!("2024-06-01T12:00:0{}", age_rank % 10),
                "record_count": data.len(),
                "layer": "QA"
            },
            "data": data
        });
        fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();
        let file = File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(age_rank))
            .unwrap();
        path
    }

    /// Writes `content` verbatim as a staged file, newest by `age_rank`.
    pub fn stage_raw(&self, entity: &str, file_name: &str, age_rank: u64, content: &str) -> PathBuf {
        let path = self.path().join("qa").join(entity).join(file_name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        let file = File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(age_rank))
            .unwrap();
        path
    }

    pub fn store(&self) -> FsSnapshotStore {
        FsSnapshotStore::new(self.path())
    }

    pub fn run(&self, selection: RunSelection, options: &RunOptions) -> RunReport {
        let mut orchestrator =
            PromotionOrchestrator::new(&self.registry, RecordValidator::default(), self.store());
        orchestrator.run(&selection, options).unwrap()
    }

    pub fn promote_all(&self) -> RunReport {
        self.run(RunSelection::All, &RunOptions::default())
    }

    pub fn promoted_json(&self, entity: &str) -> Value {
        let path = self.store().promoted_path(entity);
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    /// Stages a valid, fully linked batch of `n` records for every entity.
    pub fn stage_valid_chain(&self, n: usize) {
        self.stage("customers", "20240601", 0, (0..n).map(customer).collect());
        self.stage("agents", "20240601", 0, (0..n).map(agent).collect());
        self.stage("quotes", "20240601", 0, (0..n).map(quote).collect());
        self.stage("applications", "20240601", 0, (0..n).map(application).collect());
        self.stage("policies", "20240601", 0, (0..n).map(policy).collect());
        self.stage("claims", "20240601", 0, (0..n).map(claim).collect());
    }
}

pub fn customer(i: usize) -> Value {
    json!({
        "Customer_ID__c": format!("CUST-{:04}", i),
        "First_Name__c": "Ada",
        "Last_Name__c": format!("Lovelace{}", i),
        "Email__c": format!("ada{}@example.com", i),
        "Gender__c": "Female",
        "Age__c": 30 + (i % 50),
        "Annual_Income__c": 85000.0,
        "extracted_at": "2024-06-01T12:00:00"
    })
}

pub fn agent(i: usize) -> Value {
    json!({
        "Agent_ID__c": format!("AGT-{:04}", i),
        "Name": format!("Agent {}", i),
        "Email": format!("agent{}@example.com", i),
        "License_Number__c": format!("LIC-{}", 1000 + i),
        "Specialization__c": "Term Life",
        "Years_Experience__c": 5
    })
}

pub fn quote(i: usize) -> Value {
    json!({
        "Quote_ID__c": format!("Q-{:04}", i),
        "Customer_ID__c": format!("CUST-{:04}", i),
        "Agent_ID__c": format!("AGT-{:04}", i),
        "Product_Type__c": "Term Life",
        "Status__c": "Converted",
        "Coverage_Amount__c": 250000,
        "Premium_Monthly__c": 42.5,
        "Created_Date__c": "2024-01-01",
        "Expiry_Date__c": "2024-02-01T00:00:00"
    })
}

pub fn application(i: usize) -> Value {
    json!({
        "Application_ID__c": format!("APP-{:04}", i),
        "Quote_ID__c": format!("Q-{:04}", i),
        "Customer_ID__c": format!("CUST-{:04}", i),
        "Agent_ID__c": format!("AGT-{:04}", i),
        "Application_Date__c": "2024-01-10",
        "Decision_Date__c": "2024-01-20",
        "Underwriting_Status__c": "Approved",
        "Risk_Score__c": 40
    })
}

pub fn policy(i: usize) -> Value {
    json!({
        "Policy_ID__c": format!("POL-{:04}", i),
        "Application_ID__c": format!("APP-{:04}", i),
        "Customer_ID__c": format!("CUST-{:04}", i),
        "Policy_Number__c": format!("LP{:08}", i),
        "Payment_Frequency__c": "Monthly",
        "Status__c": "Active",
        "Effective_Date__c": "2024-02-01",
        "Expiry_Date__c": "2044-02-01"
    })
}

pub fn claim(i: usize) -> Value {
    json!({
        "Claim_ID__c": format!("CLM-{:04}", i),
        "Policy_ID__c": format!("POL-{:04}", i),
        "Customer_ID__c": format!("CUST-{:04}", i),
        "Claim_Type__c": "Death Benefit",
        "Status__c": "Filed",
        "Claim_Amount__c": 250000,
        "Filed_Date__c": "2024-05-01",
        "Processed_Date__c": "2024-05-15"
    })
}
