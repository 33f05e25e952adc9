/// Database layer
///
/// # Modules
///
/// - `pool`: MySQL connection pool lifecycle and health checks
/// - `migrations`: Reference schema migrations for development databases
///
/// Statements live with their models in `crate::models`; handlers reach them
/// through `crate::store`.

pub mod migrations;
pub mod pool;
