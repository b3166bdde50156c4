//! Shared constants for catalog-import.
//!
//! Every default applied to an incoming record lives here so the lookup and
//! insert paths can be compared side by side.

/// `degree_type` used for the program lookup key when the record has none.
pub const LOOKUP_DEGREE_TYPE: &str = "masters";

/// `degree_type` stored on a newly created program when the record has none.
///
/// Differs from [`LOOKUP_DEGREE_TYPE`]: a record without `degree_type` is
/// looked up as `masters` and inserted as `unknown`.
pub const DEFAULT_DEGREE_TYPE: &str = "unknown";

/// Default `country` for new programs.
pub const DEFAULT_COUNTRY: &str = "United States";

/// Default `city` for new programs.
pub const DEFAULT_CITY: &str = "";

/// Default `status` for new programs.
pub const DEFAULT_STATUS: &str = "active";

/// Default `visibility` for new programs.
pub const DEFAULT_VISIBILITY: &str = "pending";

/// Environment variable holding the PostgreSQL connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Environment variable overriding the connection acquire timeout.
pub const CONNECT_TIMEOUT_VAR: &str = "CATALOG_IMPORT_CONNECT_TIMEOUT_SECS";

/// PostgreSQL connection pool: the importer runs on a single connection.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 1;

/// PostgreSQL connection pool: default acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Label used in logs for a record without a program name.
pub const UNKNOWN_PROGRAM_LABEL: &str = "Unknown";
