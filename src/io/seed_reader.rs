//! Seed account loading
//!
//! Provides a streaming iterator over `name,balance` rows of a CSV file and
//! a helper that creates every row through an [`AccountService`], so seeded
//! accounts go through the same locking and validation as any other create.
//!
//! ```no_run
//! use account_ledger::core::Ledger;
//! use account_ledger::io::seed_ledger;
//! use std::path::Path;
//!
//! let ledger = Ledger::new();
//! let seeded = seed_ledger(&ledger, Path::new("accounts.csv")).unwrap();
//! println!("Seeded {} accounts", seeded.len());
//! ```

use crate::core::AccountService;
use crate::io::csv_format::{convert_seed_record, SeedRecord};
use crate::types::{Account, NewAccount};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Synchronous seed file reader
///
/// Yields one creation request per data row. Error messages carry the
/// 1-based physical line number of the row (the header is line 1), which
/// stays accurate when the file contains blank lines.
#[derive(Debug)]
pub struct SeedReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    record: StringRecord,
    line_num: u64,
}

impl SeedReader {
    /// Open a seed file and read its header row
    ///
    /// # Errors
    ///
    /// Returns a message if the file cannot be opened or its header cannot
    /// be read.
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);
        let headers = reader
            .headers()
            .map_err(|e| format!("Line 1: CSV parse error: {}", e))?
            .clone();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
            line_num: 1,
        })
    }

    /// Line number of the row most recently yielded
    ///
    /// # Returns
    ///
    /// `1` (the header line) before the first row has been read
    pub fn line(&self) -> u64 {
        self.line_num
    }
}

impl Iterator for SeedReader {
    type Item = Result<NewAccount, String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                self.line_num = self
                    .record
                    .position()
                    .map_or(self.line_num + 1, |position| position.line());

                let row = self
                    .record
                    .deserialize::<SeedRecord>(Some(&self.headers))
                    .map_err(|e| format!("CSV parse error: {}", e))
                    .and_then(convert_seed_record);
                Some(row.map_err(|e| format!("Line {}: {}", self.line_num, e)))
            }
            Err(e) => {
                self.line_num = e
                    .position()
                    .map_or(self.line_num + 1, |position| position.line());
                Some(Err(format!("Line {}: CSV parse error: {}", self.line_num, e)))
            }
        }
    }
}

/// Create every account listed in a seed file
///
/// Stops at the first malformed or rejected row; accounts created before
/// that row remain in the ledger.
///
/// # Arguments
///
/// * `service` - Ledger the accounts are created through
/// * `path` - CSV file with a `name,balance` header
///
/// # Returns
///
/// The created accounts, in file order
///
/// # Errors
///
/// Returns a message naming the file and line of the first failure.
pub fn seed_ledger(service: &dyn AccountService, path: &Path) -> Result<Vec<Account>, String> {
    let mut reader = SeedReader::new(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let mut created = Vec::new();

    while let Some(request) = reader.next() {
        let request = request.map_err(|e| format!("{}: {}", path.display(), e))?;
        let account = service.create(request).map_err(|e| {
            format!("{}: Line {}: {}", path.display(), reader.line(), e)
        })?;
        created.push(account);
    }

    info!(count = created.len(), path = %path.display(), "seeded accounts");
    Ok(created)
}
