//! Verification store for one fiscal year
//!
//! Each verification lives in its own JSON file inside the year's
//! verifications directory, named `verification_<date>_<id>.json`. Saving
//! rewrites the whole directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::Verification;

use super::accounts::AccountStore;
use super::commit::{CommitStatus, Committer};
use super::file_io::{read_json, write_json_atomic};

const VERIFICATION_SCHEMA_VERSION: u32 = 1;

/// Placeholder so version control keeps a year with no verifications
const KEEP_FILE: &str = ".gitkeep";

/// On-disk shape of one verification
#[derive(Debug, Serialize, Deserialize)]
struct VerificationDocument {
    #[serde(default)]
    schema_version: u32,
    #[serde(flatten)]
    verification: Verification,
}

/// What to do with a verification file that cannot be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Abort the whole load
    #[default]
    Fail,
    /// Log a warning and leave the file out
    Skip,
}

/// Verifications of one year, ascending by id
pub struct VerificationStore {
    year: i32,
    dir: PathBuf,
    verifications: Vec<Verification>,
    committer: Rc<dyn Committer>,
}

impl VerificationStore {
    /// Create an empty store backed by `dir` (used when bootstrapping a year)
    pub fn empty(year: i32, dir: PathBuf, committer: Rc<dyn Committer>) -> Self {
        Self {
            year,
            dir,
            verifications: Vec::new(),
            committer,
        }
    }

    /// Load every journal-entry file in `dir`
    ///
    /// Posting account numbers must resolve in `accounts`. Files not following
    /// the naming convention are ignored.
    pub fn load(
        year: i32,
        dir: PathBuf,
        accounts: &AccountStore,
        policy: MalformedPolicy,
        committer: Rc<dyn Committer>,
    ) -> LedgerResult<Self> {
        if !dir.is_dir() {
            return Err(LedgerError::NotFound {
                entity_type: "Verifications directory",
                identifier: dir.display().to_string(),
            });
        }

        let mut verifications = Vec::new();
        let mut seen_ids = HashSet::new();

        for path in journal_files(&dir)? {
            match load_file(&path, year, accounts) {
                Ok(verification) => {
                    if !seen_ids.insert(verification.id) {
                        let err = LedgerError::Malformed(format!(
                            "{}: verification id {} appears more than once",
                            path.display(),
                            verification.id
                        ));
                        skip_or_fail(policy, err)?;
                        continue;
                    }
                    verifications.push(verification);
                }
                Err(err @ LedgerError::Malformed(_)) => skip_or_fail(policy, err)?,
                Err(err) => return Err(err),
            }
        }

        verifications.sort_by_key(|v| v.id);
        info!(
            year,
            dir = %dir.display(),
            count = verifications.len(),
            "Loaded verifications"
        );

        Ok(Self {
            year,
            dir,
            verifications,
            committer,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All verifications, ascending by id
    pub fn verifications(&self) -> &[Verification] {
        &self.verifications
    }

    pub fn iter(&self) -> impl Iterator<Item = &Verification> {
        self.verifications.iter()
    }

    pub fn len(&self) -> usize {
        self.verifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verifications.is_empty()
    }

    /// Verification with the highest id
    pub fn last(&self) -> Option<&Verification> {
        self.verifications.last()
    }

    /// Verification at a position in id order
    pub fn get_at(&self, index: usize) -> LedgerResult<&Verification> {
        self.verifications.get(index).ok_or_else(|| {
            LedgerError::OutOfRange(format!(
                "verification index {} (have {})",
                index,
                self.verifications.len()
            ))
        })
    }

    fn position(&self, id: u32) -> Result<usize, usize> {
        self.verifications.binary_search_by_key(&id, |v| v.id)
    }

    pub fn find(&self, id: u32) -> Option<&Verification> {
        self.position(id).ok().map(|idx| &self.verifications[idx])
    }

    /// Get a verification for editing; the id itself must not change
    pub fn find_mut(&mut self, id: u32) -> Option<&mut Verification> {
        match self.position(id) {
            Ok(idx) => Some(&mut self.verifications[idx]),
            Err(_) => None,
        }
    }

    /// Id for the next verification: one past the highest id in use
    ///
    /// Ids are never handed out twice within a store, even after removals
    /// at the end.
    pub fn next_id(&self) -> u32 {
        self.verifications.last().map_or(0, |v| v.id + 1)
    }

    /// Insert a verification, keeping id order
    pub fn add(&mut self, verification: Verification) -> LedgerResult<()> {
        match self.position(verification.id) {
            Ok(_) => Err(LedgerError::Duplicate {
                entity_type: "Verification",
                identifier: verification.id.to_string(),
            }),
            Err(idx) => {
                self.verifications.insert(idx, verification);
                Ok(())
            }
        }
    }

    /// Remove a verification by id
    pub fn remove(&mut self, id: u32) -> LedgerResult<Verification> {
        match self.position(id) {
            Ok(idx) => Ok(self.verifications.remove(idx)),
            Err(_) => Err(LedgerError::verification_not_found(id.to_string())),
        }
    }

    /// Rewrite the directory and commit
    pub fn save(&self) -> LedgerResult<CommitStatus> {
        let message = format!(
            "{}: save {} verifications",
            self.year,
            self.verifications.len()
        );
        self.save_with_message(&message)
    }

    /// Rewrite the directory and commit with the given message
    ///
    /// Every existing journal-entry file is deleted first, then one file per
    /// verification is written. A crash in between leaves the directory
    /// partially written; the last commit still holds the previous state.
    pub fn save_with_message(&self, message: &str) -> LedgerResult<CommitStatus> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            LedgerError::Storage(format!(
                "Failed to create directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        info!(year = self.year, dir = %self.dir.display(), "Storing verifications");
        for path in journal_files(&self.dir)? {
            fs::remove_file(&path).map_err(|e| {
                LedgerError::Storage(format!("Failed to remove {}: {}", path.display(), e))
            })?;
        }

        for verification in &self.verifications {
            let document = VerificationDocument {
                schema_version: VERIFICATION_SCHEMA_VERSION,
                verification: verification.clone(),
            };
            write_json_atomic(self.dir.join(verification.file_name()), &document)?;
        }

        let keep_file = self.dir.join(KEEP_FILE);
        if !keep_file.exists() {
            fs::write(&keep_file, b"").map_err(|e| {
                LedgerError::Storage(format!("Failed to write {}: {}", keep_file.display(), e))
            })?;
        }

        let status = self.committer.commit(message);
        if let Some(warning) = status.warning() {
            warn!(year = self.year, "{}", warning);
        }
        Ok(status)
    }
}

/// Files in `dir` named like journal entries
fn journal_files(dir: &Path) -> LedgerResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| LedgerError::Io(format!("Failed to read {}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| LedgerError::Io(format!("Failed to read directory entry: {}", e)))?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if path.is_file() && Verification::parse_file_name(&name).is_some() {
            files.push(path);
        } else {
            debug!(file = %name, "Ignoring non-verification file");
        }
    }
    files.sort();
    Ok(files)
}

/// Parse and check a single verification file
fn load_file(path: &Path, year: i32, accounts: &AccountStore) -> LedgerResult<Verification> {
    let document: VerificationDocument = read_json(path)?;
    let verification = document.verification;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if let Some((date, id)) = Verification::parse_file_name(&name) {
        if date != verification.date || id != verification.id {
            warn!(
                file = %name,
                id = verification.id,
                date = %verification.date,
                "File name does not match verification contents"
            );
        }
    }

    verification
        .validate(year)
        .map_err(|e| LedgerError::Malformed(format!("{}: {}", path.display(), e)))?;

    if let Some(missing) = verification
        .transactions
        .iter()
        .find(|t| !accounts.contains(t.account))
    {
        return Err(LedgerError::Malformed(format!(
            "{}: account {} does not exist in {}",
            path.display(),
            missing.account,
            year
        )));
    }

    Ok(verification)
}

fn skip_or_fail(policy: MalformedPolicy, err: LedgerError) -> LedgerResult<()> {
    match policy {
        MalformedPolicy::Fail => Err(err),
        MalformedPolicy::Skip => {
            warn!(error = %err, "Skipping malformed verification");
            Ok(())
        }
    }
}
