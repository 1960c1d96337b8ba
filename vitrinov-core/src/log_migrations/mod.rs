//! Event log schema, embedded with include_str!
//!
//! `000_migrations.sql` bootstraps the bookkeeping table and is applied
//! first; the rest run in listed order, each exactly once.

/// (file name, SQL) pairs. New files are appended as `NNN_description.sql`.
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_initial_schema.sql", include_str!("001_initial_schema.sql")),
];
