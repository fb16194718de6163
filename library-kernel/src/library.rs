//! The [`Library`] service tying validation, rendering, and storage together.

use library_config::LibraryConfig;
use library_primitives::{Clock, PromptId, PromptRecord, SystemClock};
use library_render::{DocumentRenderer, derive_path_in};
use library_schema::{PromptCandidate, SchemaValidator};
use library_store::{
    ArtifactStore, ConsistencyReport, FileArtifactStore, IndexRepository, PromptIndex,
    duplicate_files, duplicate_ids, next_id,
};
use tracing::{debug, info, warn};

use crate::error::{AuditError, IngestError, LibraryError, Problem};
use crate::interactive::{self, Field, FieldSupplier};

/// Result of a successful ingestion.
#[derive(Debug, Clone)]
pub struct Ingested {
    /// The validated and stamped record.
    pub record: PromptRecord,
    /// Relative path of the written artifact.
    pub file: String,
    /// The index as persisted.
    pub index: PromptIndex,
}

/// Totals reported by a passing audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditSummary {
    /// Number of index entries.
    pub total_prompts: usize,
    /// Number of categories in the index.
    pub total_categories: usize,
}

/// Everything a full audit looked at, pass or fail.
#[derive(Debug, Clone)]
pub struct AuditReport {
    /// The audited index.
    pub index: PromptIndex,
    /// Problems in detection order: schema, duplicate ids, duplicate files,
    /// then missing artifacts.
    pub problems: Vec<Problem>,
    /// Artifact presence per entry.
    pub consistency: ConsistencyReport,
}

impl AuditReport {
    /// Returns `true` when no problem was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    /// Totals for the audited index.
    #[must_use]
    pub fn summary(&self) -> AuditSummary {
        AuditSummary {
            total_prompts: self.index.len(),
            total_categories: self.index.categories().len(),
        }
    }
}

/// What [`Library::backfill`] did for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackfillOutcome {
    /// A placeholder artifact was written for this id.
    Created(String),
    /// The artifact already existed and was left alone.
    Skipped(String),
    /// The placeholder could not be written; later entries were still
    /// processed.
    Failed {
        /// Entry identifier.
        id: String,
        /// Why the write failed.
        reason: String,
    },
}


/// Record-management operations over one library root.
///
/// Every mutating operation loads the index, applies its change, and saves
/// it before returning. Nothing is cached between calls.
#[derive(Debug)]
pub struct Library<S = FileArtifactStore, C = SystemClock> {
    config: LibraryConfig,
    repository: IndexRepository,
    validator: SchemaValidator,
    renderer: DocumentRenderer,
    store: S,
    clock: C,
}

impl Library {
    /// Opens the library described by `config` on disk, dated by the local
    /// clock.
    #[must_use]
    pub fn open(config: LibraryConfig) -> Self {
        let store = FileArtifactStore::from_config(&config);
        Self::with_parts(config, store, SystemClock)
    }
}

impl<S: ArtifactStore, C: Clock> Library<S, C> {
    /// Assembles a library from an explicit artifact store and clock.
    #[must_use]
    pub fn with_parts(config: LibraryConfig, store: S, clock: C) -> Self {
        Self {
            repository: IndexRepository::new(&config),
            validator: SchemaValidator::new(&config),
            renderer: DocumentRenderer::from_config(&config),
            config,
            store,
            clock,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Artifact store in use.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Index repository in use.
    #[must_use]
    pub fn repository(&self) -> &IndexRepository {
        &self.repository
    }

    /// Creates an empty index if none exists. Returns `true` when created.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Store`] if the index cannot be written.
    pub fn init(&self) -> Result<bool, LibraryError> {
        let created = self.repository.init()?;
        if created {
            info!(path = %self.repository.path().display(), "initialised index");
        }
        Ok(created)
    }

    /// Parses `raw_json` as a prompt and ingests it.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidJson`] for malformed input, otherwise as
    /// [`Library::ingest_candidate`].
    pub fn ingest(&self, raw_json: &str) -> Result<Ingested, IngestError> {
        let candidate = PromptCandidate::from_json(raw_json).map_err(IngestError::InvalidJson)?;
        self.ingest_candidate(candidate)
    }

    /// Validates, renders, and stores one prompt.
    ///
    /// When `id` is absent (not merely mistyped) and `category` names a known
    /// category, the next free identifier in that category is allocated. The artifact path is
    /// always derived, `created` is kept if supplied, and `updated` is set to
    /// today.
    ///
    /// # Errors
    ///
    /// - [`IngestError::Invalid`] with every violation found; nothing is
    ///   written.
    /// - [`IngestError::Store`] with `DuplicateId` or `DuplicateFile` when
    ///   the record clashes with the index; nothing is written.
    /// - [`IngestError::Store`] when the index cannot be read or a write
    ///   fails. A failed index save after the artifact write leaves an
    ///   orphan artifact behind.
    /// - [`IngestError::Allocation`] when no identifier is left.
    pub fn ingest_candidate(&self, mut candidate: PromptCandidate) -> Result<Ingested, IngestError> {
        let mut preloaded = None;
        if candidate.id.is_none() && !candidate.is_mistyped("id") {
            let known = candidate
                .category
                .as_deref()
                .filter(|category| self.validator.categories().contains(category));
            if let Some(category) = known {
                let index = self.repository.load()?;
                let id = next_id(&index, category)?;
                debug!(%id, "allocated identifier for candidate without id");
                candidate = candidate.with_id(id.to_string());
                preloaded = Some(index);
            }
        }
        self.commit(candidate, preloaded)
    }

    /// Collects a prompt field by field from `supplier` and ingests it.
    ///
    /// The category is lowercased and replaced by the configured fallback
    /// when unknown. The identifier defaults to the next free one, tags are
    /// normalised, and complexity defaults to `medium`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Input`] if the supplier fails, otherwise as
    /// [`Library::ingest_candidate`].
    pub fn ingest_interactive(
        &self,
        supplier: &mut impl FieldSupplier,
    ) -> Result<Ingested, IngestError> {
        let fallback = self.config.fallback_category();
        let answer = interactive::ask(supplier, Field::Category, Some(fallback))?;
        let category =
            interactive::resolve_category(answer, self.validator.categories(), fallback);

        let index = self.repository.load()?;
        let suggested = next_id(&index, &category)?;
        let mut candidate = PromptCandidate::default().with_category(category);
        if let Some(id) = interactive::ask(supplier, Field::Id, Some(suggested.as_str()))? {
            candidate = candidate.with_id(id.to_uppercase());
        }
        let candidate = interactive::collect_fields(supplier, candidate)?;
        self.commit(candidate, Some(index))
    }

    fn commit(
        &self,
        candidate: PromptCandidate,
        preloaded: Option<PromptIndex>,
    ) -> Result<Ingested, IngestError> {
        let mut record = self.validator.validate(candidate)?;
        let mut index = match preloaded {
            Some(index) => index,
            None => self.repository.load()?,
        };

        let today = self.clock.today();
        record.stamp(today);
        let file = derive_path_in(
            self.config.prompts_dir(),
            &record.category,
            record.id.as_str(),
            &record.name,
        );
        let document = self.renderer.render(&record, today);

        index.append(record.index_entry(&file))?;
        self.store.write(&file, &document)?;
        self.repository.save(&index)?;

        info!(id = %record.id, %file, "ingested prompt");
        Ok(Ingested {
            record,
            file,
            index,
        })
    }

    /// Suggests the next free identifier for `category`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Store`] if the index cannot be read and
    /// [`LibraryError::Allocation`] if no identifier is left.
    pub fn next_id(&self, category: &str) -> Result<PromptId, LibraryError> {
        let index = self.repository.load()?;
        Ok(next_id(&index, category)?)
    }

    /// Runs every check and returns the full report, pass or fail.
    ///
    /// # Errors
    ///
    /// Returns [`library_store::StoreError`] only when the index itself
    /// cannot be loaded.
    pub fn audit_report(&self) -> Result<AuditReport, library_store::StoreError> {
        let index = self.repository.load()?;

        let mut problems: Vec<Problem> = self
            .validator
            .check_index(index.entries(), index.categories())
            .into_iter()
            .map(Problem::Schema)
            .collect();
        problems.extend(duplicate_ids(&index).into_iter().map(Problem::DuplicateId));
        problems.extend(duplicate_files(&index).into_iter().map(Problem::DuplicateFile));

        let consistency = ConsistencyReport::check(&index, &self.store);
        problems.extend(consistency.missing.iter().cloned().map(Problem::MissingArtifact));

        if problems.is_empty() {
            info!(prompts = index.len(), "audit passed");
        } else {
            warn!(problems = problems.len(), "audit found problems");
        }
        Ok(AuditReport {
            index,
            problems,
            consistency,
        })
    }

    /// Audits the whole library: schema, duplicates, and artifact presence.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Store`] if the index cannot be loaded and
    /// [`AuditError::Problems`] listing every problem otherwise.
    pub fn audit(&self) -> Result<AuditSummary, AuditError> {
        let report = self.audit_report()?;
        if report.is_clean() {
            Ok(report.summary())
        } else {
            Err(AuditError::Problems(report.problems))
        }
    }

    /// Writes a placeholder artifact for every entry whose artifact is
    /// missing. Existing artifacts are never touched, so a second run
    /// creates nothing. An entry whose placeholder cannot be written, for
    /// example because its `file` is empty or leaves the root, is reported as
    /// [`BackfillOutcome::Failed`] and the remaining entries are still
    /// processed.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Store`] if the index cannot be loaded.
    pub fn backfill(&self) -> Result<Vec<BackfillOutcome>, LibraryError> {
        let index = self.repository.load()?;
        let today = self.clock.today();

        let mut outcomes = Vec::with_capacity(index.len());
        for entry in index.entries() {
            if self.store.exists(&entry.file) {
                debug!(id = %entry.id, "artifact present");
                outcomes.push(BackfillOutcome::Skipped(entry.id.clone()));
                continue;
            }
            let document = self.renderer.render_placeholder(entry, today);
            match self.store.write(&entry.file, &document) {
                Ok(()) => {
                    info!(id = %entry.id, file = %entry.file, "wrote placeholder artifact");
                    outcomes.push(BackfillOutcome::Created(entry.id.clone()));
                }
                Err(err) => {
                    warn!(
                        id = %entry.id,
                        file = %entry.file,
                        error = %err,
                        "placeholder not written"
                    );
                    outcomes.push(BackfillOutcome::Failed {
                        id: entry.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(outcomes)
    }
}
