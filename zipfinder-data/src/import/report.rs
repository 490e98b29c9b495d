//! Per-run counters and outcome of an import.

use std::fmt;

use zipfinder_core::RecordKind;

use super::ImportError;

/// Position of an import run in its state machine.
///
/// Runs move forward through the stages in declaration order and end in
/// either [`ImportStage::Completed`] or [`ImportStage::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImportStage {
    /// Sources and store have not been checked yet.
    #[default]
    NotStarted,
    /// Tables and indexes exist in the store.
    SchemaReady,
    /// Streaming `districts.csv`.
    ImportingDistricts,
    /// Streaming `municipalities.csv`.
    ImportingMunicipalities,
    /// Streaming `zipcodes.csv` in batched transactions.
    ImportingZipcodes,
    /// Every file was read to the end.
    Completed,
    /// A fatal error stopped the run.
    Failed,
}

impl ImportStage {
    /// Stage that streams records of `kind`.
    pub const fn importing(kind: RecordKind) -> Self {
        match kind {
            RecordKind::District => Self::ImportingDistricts,
            RecordKind::Municipality => Self::ImportingMunicipalities,
            RecordKind::Zipcode => Self::ImportingZipcodes,
        }
    }

    /// Whether the run has finished, successfully or not.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotStarted => "not started",
            Self::SchemaReady => "schema ready",
            Self::ImportingDistricts => "importing districts",
            Self::ImportingMunicipalities => "importing municipalities",
            Self::ImportingZipcodes => "importing zipcodes",
            Self::Completed => "completed",
            Self::Failed => "failed",
        })
    }
}

/// Outcome of one call to [`ZipcodeImporter::import`](super::ZipcodeImporter::import).
///
/// Counters hold what was persisted before the run ended. After a failure,
/// `zipcodes` only counts rows from committed batches.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Districts inserted.
    pub districts: usize,
    /// Municipalities inserted.
    pub municipalities: usize,
    /// Zipcodes committed.
    pub zipcodes: usize,
    /// Lines skipped across all three files.
    pub failed_rows: usize,
    stage: ImportStage,
    failed_stage: Option<ImportStage>,
    failure: Option<ImportError>,
}

impl ImportReport {
    /// Whether every stage ran to completion.
    pub fn is_success(&self) -> bool {
        self.stage == ImportStage::Completed
    }

    /// Final stage of the run.
    pub const fn stage(&self) -> ImportStage {
        self.stage
    }

    /// Stage the run was in when it failed.
    pub const fn failed_stage(&self) -> Option<ImportStage> {
        self.failed_stage
    }

    /// Error that aborted the run, if any.
    pub const fn failure(&self) -> Option<&ImportError> {
        self.failure.as_ref()
    }

    /// Take the aborting error out of the report.
    pub fn take_failure(&mut self) -> Option<ImportError> {
        self.failure.take()
    }

    /// Rows persisted for records of `kind`.
    pub const fn imported(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::District => self.districts,
            RecordKind::Municipality => self.municipalities,
            RecordKind::Zipcode => self.zipcodes,
        }
    }

    pub(super) fn advance(&mut self, stage: ImportStage) {
        log::debug!("import stage: {} -> {stage}", self.stage);
        self.stage = stage;
    }

    pub(super) fn add_imported(&mut self, kind: RecordKind, count: usize) {
        match kind {
            RecordKind::District => self.districts += count,
            RecordKind::Municipality => self.municipalities += count,
            RecordKind::Zipcode => self.zipcodes += count,
        }
    }

    pub(super) fn fail(&mut self, error: ImportError) {
        self.failed_stage = Some(self.stage);
        self.stage = ImportStage::Failed;
        self.failure = Some(error);
    }
}
