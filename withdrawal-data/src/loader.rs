use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use withdrawal_core::{BracketTable, BracketTableError, BracketTier};

/// Errors that can occur when loading bracket tables from CSV.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid jurisdiction '{0}' (expected 'source' or 'resident')")]
    InvalidJurisdiction(String),

    #[error("No top-rate row (empty upper_limit) for the {0} table")]
    MissingTopRate(Jurisdiction),

    #[error("More than one top-rate row for the {0} table")]
    DuplicateTopRate(Jurisdiction),

    #[error("Invalid {jurisdiction} table: {source}")]
    InvalidTable {
        jurisdiction: Jurisdiction,
        #[source]
        source: BracketTableError,
    },
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// Which side of the withdrawal a bracket row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jurisdiction {
    Source,
    Resident,
}

impl Jurisdiction {
    fn parse(s: &str) -> Result<Self, BracketLoaderError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Ok(Self::Source),
            "resident" => Ok(Self::Resident),
            _ => Err(BracketLoaderError::InvalidJurisdiction(s.to_string())),
        }
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Resident => write!(f, "resident"),
        }
    }
}

/// A single record from the brackets CSV file.
///
/// - `jurisdiction`: `source` or `resident`
/// - `upper_limit`: the tier's upper limit, or empty for the top rate
/// - `rate`: the marginal rate as a decimal (e.g., 0.10 for 10%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub jurisdiction: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Bracket tables found in a CSV file. A jurisdiction with no rows is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedTables {
    pub source: Option<BracketTable>,
    pub resident: Option<BracketTable>,
}

/// Loader for bracket tables stored as CSV.
///
/// Rows for each jurisdiction are taken in file order; the row with an empty
/// `upper_limit` supplies that table's top rate.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records by jurisdiction and build validated tables.
    pub fn build(records: &[BracketRecord]) -> Result<LoadedTables, BracketLoaderError> {
        let mut source = Vec::new();
        let mut resident = Vec::new();

        for record in records {
            match Jurisdiction::parse(&record.jurisdiction)? {
                Jurisdiction::Source => source.push(record),
                Jurisdiction::Resident => resident.push(record),
            }
        }

        Ok(LoadedTables {
            source: Self::build_table(Jurisdiction::Source, &source)?,
            resident: Self::build_table(Jurisdiction::Resident, &resident)?,
        })
    }

    /// Convenience: parse then build.
    pub fn load<R: Read>(reader: R) -> Result<LoadedTables, BracketLoaderError> {
        let records = Self::parse(reader)?;
        debug!(records = records.len(), "parsed bracket records");
        Self::build(&records)
    }

    fn build_table(
        jurisdiction: Jurisdiction,
        records: &[&BracketRecord],
    ) -> Result<Option<BracketTable>, BracketLoaderError> {
        if records.is_empty() {
            return Ok(None);
        }

        let mut tiers = Vec::new();
        let mut top_rate = None;

        for record in records {
            match record.upper_limit {
                Some(limit) => tiers.push(BracketTier::new(limit, record.rate)),
                None if top_rate.is_some() => {
                    return Err(BracketLoaderError::DuplicateTopRate(jurisdiction));
                }
                None => top_rate = Some(record.rate),
            }
        }

        let top_rate = top_rate.ok_or(BracketLoaderError::MissingTopRate(jurisdiction))?;

        BracketTable::new(tiers, top_rate)
            .map(Some)
            .map_err(|source| BracketLoaderError::InvalidTable {
                jurisdiction,
                source,
            })
    }
}
