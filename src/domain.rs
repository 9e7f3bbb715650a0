use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PeptabError;

/// UniProt entry section the record comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Swissprot,
    Trembl,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Swissprot => write!(f, "swissprot"),
            EntryType::Trembl => write!(f, "trembl"),
        }
    }
}

impl FromStr for EntryType {
    type Err = PeptabError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "swissprot" | "reviewed" => Ok(EntryType::Swissprot),
            "trembl" | "unreviewed" => Ok(EntryType::Trembl),
            _ => Err(PeptabError::InvalidEntryType(value.to_string())),
        }
    }
}

/// One of the four functional ontologies a cross-reference can belong to.
///
/// The order of the variants is the fixed family order used when the
/// per-peptide annotation summary is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceFamily {
    Go,
    Ec,
    InterPro,
    Kegg,
}

impl ReferenceFamily {
    pub fn table_name(&self) -> &'static str {
        match self {
            ReferenceFamily::Go => "go_cross_references",
            ReferenceFamily::Ec => "ec_cross_references",
            ReferenceFamily::InterPro => "interpro_cross_references",
            ReferenceFamily::Kegg => "kegg_cross_references",
        }
    }

    /// Prefix prepended to ids of this family inside the annotation summary.
    /// GO and KEGG ids already carry their namespace and go in verbatim.
    pub fn summary_prefix(&self) -> &'static str {
        match self {
            ReferenceFamily::Go | ReferenceFamily::Kegg => "",
            ReferenceFamily::Ec => "EC:",
            ReferenceFamily::InterPro => "IPR:",
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_entry_type() {
        let parsed: EntryType = "swissprot".parse().unwrap();
        assert_eq!(parsed, EntryType::Swissprot);
        let parsed: EntryType = "TrEMBL".parse().unwrap();
        assert_eq!(parsed, EntryType::Trembl);
    }

    #[test]
    fn parse_entry_type_invalid() {
        let err = "genbank".parse::<EntryType>().unwrap_err();
        assert_matches!(err, PeptabError::InvalidEntryType(_));
    }

    #[test]
    fn entry_type_round_trips_through_display() {
        assert_eq!(EntryType::Swissprot.to_string(), "swissprot");
        assert_eq!(EntryType::Trembl.to_string(), "trembl");
        let parsed: EntryType = EntryType::Trembl.to_string().parse().unwrap();
        assert_eq!(parsed, EntryType::Trembl);
    }

    #[test]
    fn summary_prefixes() {
        assert_eq!(ReferenceFamily::Go.summary_prefix(), "");
        assert_eq!(ReferenceFamily::Ec.summary_prefix(), "EC:");
        assert_eq!(ReferenceFamily::InterPro.summary_prefix(), "IPR:");
        assert_eq!(ReferenceFamily::Kegg.summary_prefix(), "");
    }
}
