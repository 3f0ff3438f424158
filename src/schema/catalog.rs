//! Built-in life-insurance catalog
//!
//! Customer -> Quote -> Application -> Policy -> Claim, with Agents attached
//! to quotes and applications. Enum vocabularies match what the staged-data
//! generators emit.

use super::types::EntitySchema;

pub const PRODUCT_TYPES: [&str; 5] = [
    "Term Life",
    "Whole Life",
    "Universal Life",
    "Variable Life",
    "Final Expense",
];

pub const QUOTE_STATUSES: [&str; 5] = ["Pending", "Presented", "Converted", "Expired", "Declined"];

pub const UNDERWRITING_STATUSES: [&str; 5] =
    ["Submitted", "In Review", "Approved", "Declined", "Withdrawn"];

pub const HEALTH_CLASSES: [&str; 5] = [
    "Preferred Plus",
    "Preferred",
    "Standard Plus",
    "Standard",
    "Substandard",
];

pub const PAYMENT_FREQUENCIES: [&str; 4] = ["Monthly", "Quarterly", "Semi-Annual", "Annual"];

pub const POLICY_STATUSES: [&str; 5] = ["Active", "Lapsed", "Surrendered", "Paid Up", "Cancelled"];

pub const CLAIM_TYPES: [&str; 4] = [
    "Death Benefit",
    "Accelerated Death Benefit",
    "Terminal Illness",
    "Accidental Death",
];

pub const CLAIM_STATUSES: [&str; 6] = ["Filed", "Under Review", "Approved", "Paid", "Denied", "Closed"];

/// Schemas in declaration order. Roots come first so ties in the dependency
/// order resolve to customers, then agents.
pub fn life_insurance() -> Vec<EntitySchema> {
    vec![customers(), agents(), quotes(), applications(), policies(), claims()]
}

fn customers() -> EntitySchema {
    EntitySchema::new("customers", "Customer_ID__c")
        .require(["First_Name__c", "Last_Name__c", "Email__c"])
        .email("Email__c")
        .one_of("Gender__c", ["Male", "Female"])
        .one_of(
            "Employment_Status__c",
            ["Employed", "Self-Employed", "Retired", "Unemployed"],
        )
        .range("Age__c", Some(18.0), Some(120.0))
        .non_negative("Annual_Income__c")
        .critical_path()
}

fn agents() -> EntitySchema {
    EntitySchema::new("agents", "Agent_ID__c")
        .require(["Name", "Email", "License_Number__c"])
        .email("Email")
        .one_of("Specialization__c", PRODUCT_TYPES)
        .range("Years_Experience__c", Some(0.0), Some(60.0))
        .critical_path()
}

fn quotes() -> EntitySchema {
    EntitySchema::new("quotes", "Quote_ID__c")
        .require([
            "Customer_ID__c",
            "Agent_ID__c",
            "Product_Type__c",
            "Coverage_Amount__c",
        ])
        .references("Customer_ID__c", "customers", "Customer_ID__c")
        .references("Agent_ID__c", "agents", "Agent_ID__c")
        .one_of("Product_Type__c", PRODUCT_TYPES)
        .one_of("Status__c", QUOTE_STATUSES)
        .one_of("Risk_Category__c", ["Low", "Medium", "High"])
        .one_of("Source__c", ["Web", "Phone", "Agent", "Referral"])
        .non_negative("Coverage_Amount__c")
        .non_negative("Premium_Monthly__c")
        .date_sequence(["Created_Date__c", "Expiry_Date__c"])
        .critical_path()
}

fn applications() -> EntitySchema {
    EntitySchema::new("applications", "Application_ID__c")
        .require(["Quote_ID__c", "Customer_ID__c", "Application_Date__c"])
        .references("Quote_ID__c", "quotes", "Quote_ID__c")
        .references("Customer_ID__c", "customers", "Customer_ID__c")
        .references("Agent_ID__c", "agents", "Agent_ID__c")
        .one_of("Underwriting_Status__c", UNDERWRITING_STATUSES)
        .one_of("Health_Class__c", HEALTH_CLASSES)
        .one_of("Product_Type__c", PRODUCT_TYPES)
        .range("Risk_Score__c", Some(1.0), Some(100.0))
        .non_negative("Coverage_Amount__c")
        .date_sequence(["Application_Date__c", "Decision_Date__c"])
}

fn policies() -> EntitySchema {
    EntitySchema::new("policies", "Policy_ID__c")
        .require(["Application_ID__c", "Customer_ID__c", "Policy_Number__c"])
        .references("Application_ID__c", "applications", "Application_ID__c")
        .references("Customer_ID__c", "customers", "Customer_ID__c")
        .one_of("Payment_Frequency__c", PAYMENT_FREQUENCIES)
        .one_of("Status__c", POLICY_STATUSES)
        .one_of(
            "Beneficiary_Relationship__c",
            ["Spouse", "Child", "Parent", "Sibling", "Other"],
        )
        .one_of("Product_Type__c", PRODUCT_TYPES)
        .non_negative("Coverage_Amount__c")
        .non_negative("Premium_Amount__c")
        .non_negative("Cash_Value__c")
        .date_sequence(["Effective_Date__c", "Expiry_Date__c"])
}

fn claims() -> EntitySchema {
    EntitySchema::new("claims", "Claim_ID__c")
        .require(["Policy_ID__c", "Customer_ID__c", "Claim_Type__c"])
        .references("Policy_ID__c", "policies", "Policy_ID__c")
        .references("Customer_ID__c", "customers", "Customer_ID__c")
        .one_of("Claim_Type__c", CLAIM_TYPES)
        .one_of("Status__c", CLAIM_STATUSES)
        .non_negative("Claim_Amount__c")
        .non_negative("Payout_Amount__c")
        .date_sequence(["Filed_Date__c", "Processed_Date__c"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{foreign_key_check, range_check, CheckSeverity, SchemaRegistry};

    #[test]
    fn test_builtin_catalog_is_valid() {
        let registry = SchemaRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_builtin_dependency_order() {
        let registry = SchemaRegistry::builtin().unwrap();
        assert_eq!(
            registry.dependency_order(),
            &[
                "customers".to_string(),
                "agents".to_string(),
                "quotes".to_string(),
                "applications".to_string(),
                "policies".to_string(),
                "claims".to_string(),
            ]
        );
    }

    #[test]
    fn test_critical_path_entities() {
        let registry = SchemaRegistry::builtin().unwrap();
        let critical: Vec<&str> = registry
            .in_dependency_order()
            .filter(|s| s.is_critical_path())
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(critical, vec!["customers", "agents", "quotes"]);
    }

    #[test]
    fn test_claim_amount_range_is_warning() {
        let registry = SchemaRegistry::builtin().unwrap();
        let claims = registry.get("claims").unwrap();
        assert_eq!(
            claims.severity_of(&range_check("Claim_Amount__c")),
            CheckSeverity::Warning
        );
        assert_eq!(
            claims.severity_of(&foreign_key_check("Policy_ID__c")),
            CheckSeverity::Critical
        );
    }
}
