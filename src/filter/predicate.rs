//! Predicate and projection over raw records

use super::types::FilterCriteria;
use crate::error::{Error, Result};
use crate::record::{ProjectedRecord, RawRecord};

const SPECIES: &str = "species";
const STATUS: &str = "status";
const ORIGIN_NAME: &str = "origin.name";
const LOCATION_NAME: &str = "location.name";
const NAME: &str = "name";
const IMAGE: &str = "image";

/// Decides which records are in scope and projects them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    criteria: FilterCriteria,
}

impl RecordFilter {
    /// Create a filter from criteria
    pub fn new(criteria: FilterCriteria) -> Self {
        Self { criteria }
    }

    /// Check whether `record` passes the predicate
    ///
    /// Clauses are evaluated left to right and short-circuit, so a record
    /// whose species already fails is dropped without looking at `origin`.
    /// A field that has to be inspected but is absent or not a string is a
    /// projection error.
    pub fn matches(&self, record: &RawRecord) -> Result<bool> {
        Ok(required(record, SPECIES)? == self.criteria.species
            && required(record, STATUS)? == self.criteria.status
            && required(record, ORIGIN_NAME)?.starts_with(self.criteria.origin_prefix.as_str()))
    }

    /// Project a record to `{name, location, image}`
    pub fn project(&self, record: &RawRecord) -> Result<ProjectedRecord> {
        Ok(ProjectedRecord::new(
            required(record, NAME)?,
            required(record, LOCATION_NAME)?,
            required(record, IMAGE)?,
        ))
    }

    /// Filter then project; `Ok(None)` for records that do not match
    pub fn apply(&self, record: &RawRecord) -> Result<Option<ProjectedRecord>> {
        if self.matches(record)? {
            self.project(record).map(Some)
        } else {
            Ok(None)
        }
    }
}

fn required<'a>(record: &'a RawRecord, field: &str) -> Result<&'a str> {
    record
        .get_str(field)
        .ok_or_else(|| Error::projection(record.label(), field))
}
