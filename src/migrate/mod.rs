//! Migration of the legacy JSON exports into the registry tables
//!
//! The two migrations use different consistency models:
//! companies are all-or-nothing inside one transaction, members are committed
//! one by one and a failing member is only counted.

pub mod companies;
pub mod members;
pub mod source;

pub use companies::{migrate_companies, run_company_migration};
pub use members::{migrate_members, run_member_migration};
pub use source::{load_companies, load_members};

use std::fmt;

use crate::parser::{text, Scalar};

/// Final tally of one migration run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    /// Records in the source export
    pub total: usize,
    pub migrated: usize,
    /// Companies whose CNPJ was already registered
    pub skipped: usize,
    /// Members whose insert failed
    pub errors: usize,
}

impl MigrationSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }
}

impl fmt::Display for MigrationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records: {} migrated, {} skipped, {} errors",
            self.total, self.migrated, self.skipped, self.errors
        )
    }
}

/// Name shown next to a record in progress output
pub(crate) fn display_name(name: Option<&Scalar>) -> String {
    text(name).unwrap_or_else(|| "N/A".to_string())
}
