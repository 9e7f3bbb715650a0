use std::fs;
use std::io::{BufRead, BufReader};

use camino::Utf8Path;

use crate::error::PeptabError;

/// One row of the taxon dump file.
#[derive(Debug, Clone)]
pub struct Taxon {
    pub name: String,
    pub rank: String,
    pub parent: u32,
    pub valid: bool,
}

/// Random-access taxonomy loaded once per run, read-only afterwards.
///
/// Ids index directly into the backing vector; ids that never appeared in the
/// file map to `None`.
#[derive(Debug, Default)]
pub struct Taxonomy {
    entries: Vec<Option<Taxon>>,
}

impl Taxonomy {
    /// Loads a taxon TSV file (`id \t name \t rank \t parent \t valid`).
    pub fn from_file(path: &Utf8Path) -> Result<Self, PeptabError> {
        let file = fs::File::open(path.as_std_path())
            .map_err(|_| PeptabError::TaxonomyRead(path.to_path_buf()))?;
        let reader = BufReader::new(file);

        let mut entries: Vec<Option<Taxon>> = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|_| PeptabError::TaxonomyRead(path.to_path_buf()))?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 5 {
                return Err(PeptabError::TaxonomyParse(format!(
                    "expected 5 tab-separated fields, got {}: {line}",
                    fields.len()
                )));
            }
            let id: usize = fields[0]
                .trim()
                .parse()
                .map_err(|_| PeptabError::TaxonomyParse(format!("bad taxon id: {}", fields[0])))?;
            let parent: u32 = fields[3].trim().parse().map_err(|_| {
                PeptabError::TaxonomyParse(format!("bad parent id: {}", fields[3]))
            })?;

            let taxon = Taxon {
                name: fields[1].to_string(),
                rank: fields[2].trim().to_string(),
                parent,
                valid: fields[4].trim() == "true",
            };

            if entries.len() <= id {
                entries.resize_with(id + 1, || None);
            }
            entries[id] = Some(taxon);
        }

        Ok(Taxonomy { entries })
    }

    pub fn from_entries(entries: Vec<Option<Taxon>>) -> Self {
        Taxonomy { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Taxon> {
        self.entries.get(id).and_then(|entry| entry.as_ref())
    }
}

/// Answers "is this taxon id known?" against a loaded taxonomy.
///
/// Stateless and side-effect-free; invalid-id bookkeeping is the engine's
/// concern.
#[derive(Debug)]
pub struct TaxonValidator {
    taxonomy: Taxonomy,
}

impl TaxonValidator {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// A taxon id is valid iff it is non-negative, strictly below the loaded
    /// range, and the entry at that index is present.
    pub fn is_valid(&self, taxon_id: i32) -> bool {
        taxon_id >= 0
            && (taxon_id as usize) < self.taxonomy.len()
            && self.taxonomy.get(taxon_id as usize).is_some()
    }
}
