/// Database models for the cylinder tracker
///
/// Each model owns the fixed, parameterized SQL statements for its table.
/// Handlers never build SQL themselves; they go through
/// [`crate::store::Store`], whose MySQL implementation delegates here.
///
/// # Models
///
/// - `user`: Accounts and roles (read-only)
/// - `gas_type`: Gas catalogue (oxygen, nitrous oxide, ...)
/// - `cylinder`: Individual cylinders and their lifecycle status
/// - `inventory`: Aggregated stock per gas type
/// - `supply`: Hospital deliveries with signatures
/// - `invoice`: Billing status for deliveries
/// - `report`: Read-only aggregate queries
/// - `schema`: Introspection used by the debug endpoints

pub mod cylinder;
pub mod gas_type;
pub mod inventory;
pub mod invoice;
pub mod report;
pub mod schema;
pub mod supply;
pub mod user;

/// Error returned when a stored or submitted enum string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enum was being parsed (e.g. "cylinder status")
    pub kind: &'static str,

    /// The rejected input
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
