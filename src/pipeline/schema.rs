//! The fixed churn dataset schema
//!
//! Column names, the leakage columns removed before training and the
//! closed vocabularies of the two ordinal categoricals.

/// Default name of the binary label column
pub const DEFAULT_TARGET: &str = "Churn";

pub const CUSTOMER_ID: &str = "CustomerID";
pub const GENDER: &str = "Gender";
pub const SUBSCRIPTION_TYPE: &str = "Subscription Type";
pub const CONTRACT_LENGTH: &str = "Contract Length";
pub const USAGE_FREQUENCY: &str = "Usage Frequency";
pub const LAST_INTERACTION: &str = "Last Interaction";
pub const TOTAL_SPEND: &str = "Total Spend";

/// Columns removed before training.
///
/// `CustomerID` is a row identifier. The other three track the label almost
/// deterministically: churned customers stop using the service, stop
/// interacting, and accumulate spend in lockstep with tenure.
pub const LEAKAGE_COLUMNS: [&str; 4] = [CUSTOMER_ID, USAGE_FREQUENCY, LAST_INTERACTION, TOTAL_SPEND];

/// Categorical encoded with a vocabulary learned from the training data
pub const LEARNED_COLUMNS: [&str; 1] = [GENDER];

/// Subscription tiers in ascending order of price
pub const SUBSCRIPTION_VOCABULARY: [(&str, u32); 3] = [("Basic", 0), ("Standard", 1), ("Premium", 2)];

/// Contract durations in ascending order of commitment
pub const CONTRACT_VOCABULARY: [(&str, u32); 3] = [("Monthly", 0), ("Quarterly", 1), ("Annual", 2)];

/// Categoricals encoded with a hand-specified vocabulary
pub fn fixed_vocabularies() -> [(&'static str, &'static [(&'static str, u32)]); 2] {
    [
        (SUBSCRIPTION_TYPE, &SUBSCRIPTION_VOCABULARY),
        (CONTRACT_LENGTH, &CONTRACT_VOCABULARY),
    ]
}

/// Every column the training table must provide besides the target
pub fn required_columns() -> Vec<&'static str> {
    let mut cols: Vec<&str> = LEAKAGE_COLUMNS.to_vec();
    cols.extend(LEARNED_COLUMNS);
    cols.extend(fixed_vocabularies().iter().map(|(name, _)| *name));
    cols
}
