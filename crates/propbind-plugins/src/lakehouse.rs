// crates/propbind-plugins/src/lakehouse.rs
// ============================================================================
// Module: Lakehouse Config
// Description: Table format selection for the lakehouse connector.
// Purpose: Bind the default table type for newly created tables.
// Dependencies: propbind
// ============================================================================

//! ## Overview
//! The lakehouse connector fronts several table formats; `lakehouse.table-type`
//! chooses the one used when a table is created without an explicit format.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use propbind::ConfigEnum;
use propbind::Configuration;
use propbind::DescriptorSetBuilder;
use propbind::fmt_redacted;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Table format for new tables.
pub const TABLE_TYPE_KEY: &str = "lakehouse.table-type";

// ============================================================================
// SECTION: Table Type
// ============================================================================

/// Table formats supported by the lakehouse connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableType {
    /// Hive tables.
    Hive,
    /// Apache Iceberg tables.
    Iceberg,
    /// Delta Lake tables.
    Delta,
    /// Apache Hudi tables.
    Hudi,
}

impl ConfigEnum for TableType {
    const TYPE_NAME: &'static str = "TableType";
    const MEMBERS: &'static [Self] = &[Self::Hive, Self::Iceberg, Self::Delta, Self::Hudi];

    fn name(self) -> &'static str {
        match self {
            Self::Hive => "HIVE",
            Self::Iceberg => "ICEBERG",
            Self::Delta => "DELTA",
            Self::Hudi => "HUDI",
        }
    }
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Lakehouse connector configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct LakehouseConfig {
    /// Table format for new tables.
    table_type: TableType,
}

impl Default for LakehouseConfig {
    fn default() -> Self {
        Self {
            table_type: TableType::Iceberg,
        }
    }
}

impl LakehouseConfig {
    /// Returns the table format for new tables.
    #[must_use]
    pub const fn table_type(&self) -> TableType {
        self.table_type
    }

    /// Sets the table format for new tables.
    pub const fn set_table_type(&mut self, table_type: TableType) -> &mut Self {
        self.table_type = table_type;
        self
    }
}

impl Configuration for LakehouseConfig {
    const NAME: &'static str = "LakehouseConfig";

    fn describe(descriptors: &mut DescriptorSetBuilder<Self>) {
        descriptors.field(TABLE_TYPE_KEY, |config: &Self| config.table_type, Self::set_table_type);
    }
}

impl fmt::Debug for LakehouseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_redacted(self, f)
    }
}
