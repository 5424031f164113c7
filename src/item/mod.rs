/// This module builds the line item linking a receipt to a subtype record.
pub mod assembler;

/// This module provides the fake receipt and item generators.
pub mod fake;

/// This module provides a logger writer, useful for dry runs.
pub mod logger;

/// This module provides the ORM writer persisting records to a database.
pub mod orm;
