//! Architecture identification for per-hardware compiler flags.
//!
//! Optimization flags like `-march=native` are not portable across
//! architecture families, so compiler definitions carry flag tables keyed
//! by (architecture family, vendor) pairs.

use serde::{Deserialize, Serialize};

/// CPU architecture family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchFamily {
    X86_64,
    Aarch64,
    Power,
    RiscV64,
}

/// CPU vendor (or byte-order variant, for POWER).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Vendor {
    Amd,
    Intel,
    Arm,
    Power,
    PowerLe,
    RiscV,
}

/// One entry in an architecture flag table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArchFlag {
    /// Architecture family this entry applies to.
    pub family: ArchFamily,
    /// Vendor this entry applies to.
    pub vendor: Vendor,
    /// The flag string to emit (may contain multiple space-separated flags).
    pub flags: String,
}

impl ArchFlag {
    /// Build a table entry.
    pub fn new(family: ArchFamily, vendor: Vendor, flags: impl Into<String>) -> Self {
        Self {
            family,
            vendor,
            flags: flags.into(),
        }
    }
}

/// Look up the flags for a (family, vendor) pair in a table.
pub fn lookup(table: &[ArchFlag], family: ArchFamily, vendor: Vendor) -> Option<&str> {
    table
        .iter()
        .find(|e| e.family == family && e.vendor == vendor)
        .map(|e| e.flags.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_exact_pair() {
        let table = vec![
            ArchFlag::new(ArchFamily::X86_64, Vendor::Amd, "-march=native"),
            ArchFlag::new(ArchFamily::Power, Vendor::PowerLe, "-mcpu=native"),
        ];
        assert_eq!(
            lookup(&table, ArchFamily::X86_64, Vendor::Amd),
            Some("-march=native")
        );
        assert_eq!(
            lookup(&table, ArchFamily::Power, Vendor::PowerLe),
            Some("-mcpu=native")
        );
        assert_eq!(lookup(&table, ArchFamily::X86_64, Vendor::Intel), None);
    }
}
