//! Import session controller
//!
//! Owns the session and everything staged for it, gates `continue` on the
//! readiness of the current stage, and dispatches to intake, column
//! resolution, mapping, review and commit according to subject and format.
//!
//! Remote calls are split in two halves: `begin_continue` returns the call
//! to perform, `resolve` applies its reply. `continue_import` chains both.
//! While a call is pending `continue` is disabled; a reply whose ticket no
//! longer matches (because the session was cancelled meanwhile) is ignored.

use std::sync::Arc;
use strata_import_types::{
    AttributeDraft, AttributeId, AttributePatch, CommitResponse, EntityStage, FieldMapping,
    Identity, ImportClient, ImportError, ImportResult, ImportStage, ImportSubject, MappingCatalog,
    ReviewRecord, ReviewResponse, SourceFormat, StagedFile,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::columns::{ColumnResolver, ColumnSet};
use super::commit::CommitEngine;
use super::intake::FileIntake;
use super::mapping::{AttributeSource, MappingContext, ValueConstraint};
use super::remote::{PendingCall, RemoteReply, RemoteRequest, Ticket};
use super::review::{with_detail, ReviewEngine, ReviewRow};
use super::session::{ImportSession, SessionEvent};
use crate::config::ImportConfig;
use crate::notifications::{HostView, Notification, Notifier};

/// Where a `continue` left the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Moved to the given stage
    Advanced(ImportStage),
    /// Remained at the given stage after a reported failure
    Stayed(ImportStage),
    /// Import committed; the session was closed and reset
    Committed,
    /// Reply belonged to a cancelled session and was dropped
    Discarded,
}

/// Next thing to do after a controller step
#[derive(Debug)]
pub enum Step {
    Settled(Progress),
    Pending(PendingCall),
}

/// Drives one import session at a time
pub struct ImportController {
    client: Arc<dyn ImportClient>,
    notifier: Arc<dyn Notifier>,
    host: Arc<dyn HostView>,
    identity: Identity,
    config: ImportConfig,
    intake: FileIntake,
    resolver: ColumnResolver,
    reviewer: ReviewEngine,
    committer: CommitEngine,

    session_id: Uuid,
    session: ImportSession,
    file: Option<StagedFile>,
    document: Option<serde_json::Value>,
    columns: ColumnSet,
    context: MappingContext,
    review: Vec<ReviewRecord>,

    epoch: u64,
    calls: u64,
    pending: Option<Ticket>,
    continue_enabled: bool,
}

impl ImportController {
    pub fn new(
        config: ImportConfig,
        client: Arc<dyn ImportClient>,
        notifier: Arc<dyn Notifier>,
        host: Arc<dyn HostView>,
        identity: Identity,
    ) -> Self {
        info!(
            transport = client.name(),
            owner = %identity.owner,
            "Creating import controller"
        );
        Self {
            intake: FileIntake::new(&config),
            resolver: ColumnResolver::new(&config),
            reviewer: ReviewEngine::new(&config),
            committer: CommitEngine::new(&config),
            context: MappingContext::new(identity.clone()),
            client,
            notifier,
            host,
            identity,
            config,
            session_id: Uuid::new_v4(),
            session: ImportSession::new(),
            file: None,
            document: None,
            columns: ColumnSet::default(),
            review: Vec::new(),
            epoch: 0,
            calls: 0,
            pending: None,
            continue_enabled: false,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn stage(&self) -> ImportStage {
        self.session.stage()
    }

    pub fn subject(&self) -> ImportSubject {
        self.session.subject()
    }

    pub fn format(&self) -> Option<SourceFormat> {
        self.session.format()
    }

    pub fn staged_file(&self) -> Option<&StagedFile> {
        self.file.as_ref()
    }

    /// Decoded object graph of a JSON file, once intake has run
    pub fn document(&self) -> Option<&serde_json::Value> {
        self.document.as_ref()
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn mapping(&self) -> &FieldMapping {
        self.context.mapping()
    }

    pub fn catalog(&self) -> &MappingCatalog {
        self.context.catalog()
    }

    pub fn attribute_drafts(&self) -> &[AttributeDraft] {
        self.context.drafts()
    }

    pub fn review_records(&self) -> &[ReviewRecord] {
        &self.review
    }

    pub fn review_rows(&self) -> Vec<ReviewRow> {
        self.reviewer.rows(&self.review)
    }

    pub fn can_continue(&self) -> bool {
        self.continue_enabled
    }

    /// Whether a remote call is in flight
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_subject_selectable(&self) -> bool {
        !self.session.is_subject_locked() && self.stage().is_upload() && !self.is_busy()
    }

    pub fn continue_label(&self) -> &'static str {
        if self.stage().is_review() {
            "Finish"
        } else {
            "Continue"
        }
    }

    /// Active step index and the step titles for the current subject
    pub fn steps(&self) -> (usize, &'static [&'static str]) {
        let stage = self.stage();
        (stage.step_index(), stage.step_titles())
    }

    /// Values the attribute editor may offer for draft value slots
    pub fn value_constraint(&self) -> ValueConstraint<'_> {
        value_constraint(self.session.format(), &self.columns)
    }

    pub fn select_subject(&mut self, subject: ImportSubject) -> ImportResult<()> {
        self.ensure_idle("select subject")?;
        self.session = self.session.apply(SessionEvent::SelectSubject(subject))?;
        debug!(session = %self.session_id, %subject, "Selected import subject");
        self.refresh();
        Ok(())
    }

    /// Stage a file for the session
    ///
    /// Returns `Ok(false)` and shows a warning when the file type is not
    /// accepted for the active subject; nothing changes in that case.
    pub fn select_file(&mut self, file: StagedFile) -> ImportResult<bool> {
        if !self.stage().is_upload() {
            return Err(ImportError::FileAlreadyStaged);
        }
        self.ensure_idle("select file")?;

        let subject = self.subject();
        let format = match self.intake.validate(subject, &file) {
            Ok(format) => format,
            Err(e) => {
                warn!(session = %self.session_id, error = %e, "Rejected file");
                self.notifier.notify(Notification::warning(
                    FileIntake::rejection_message(subject),
                    self.config.warning_duration(),
                ));
                return Ok(false);
            }
        };

        self.session = self.session.apply(SessionEvent::StageFile(format))?;
        info!(
            session = %self.session_id,
            file = %file.name,
            %format,
            "Staged file"
        );
        self.file = Some(file);
        self.document = None;
        self.columns = ColumnSet::default();
        self.refresh();
        Ok(true)
    }

    pub fn set_name_field(&mut self, column: impl Into<String>) -> ImportResult<()> {
        let column = self.tabular_column(column.into(), "set name field")?;
        self.context.set_name_field(column);
        self.refresh();
        Ok(())
    }

    pub fn set_description_field(&mut self, column: impl Into<String>) -> ImportResult<()> {
        let column = self.tabular_column(column.into(), "set description field")?;
        self.context.set_description_field(column);
        self.refresh();
        Ok(())
    }

    pub fn set_project_field(&mut self, project: impl Into<String>) -> ImportResult<()> {
        self.require_stage(EntityStage::Details, "set project field")?;
        let project = project.into();
        if !project.is_empty() && self.context.catalog().project(&project).is_none() {
            return Err(ImportError::UnknownProject(project));
        }
        self.context.set_project_field(project);
        self.refresh();
        Ok(())
    }

    /// Append an attribute draft; `Ok(None)` if the template is not in the catalog
    pub fn add_attribute(&mut self, source: AttributeSource) -> ImportResult<Option<AttributeId>> {
        self.require_stage(EntityStage::Mapping, "add attribute")?;
        let constraint = value_constraint(self.session.format(), &self.columns);
        let id = self.context.add_attribute(&source, constraint);
        self.refresh();
        Ok(id)
    }

    pub fn update_attribute(&mut self, id: &AttributeId, patch: AttributePatch) -> ImportResult<()> {
        self.require_stage(EntityStage::Mapping, "update attribute")?;
        let constraint = value_constraint(self.session.format(), &self.columns);
        self.context.update_attribute(id, patch, constraint)?;
        self.refresh();
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: &AttributeId) -> ImportResult<Option<AttributeDraft>> {
        self.require_stage(EntityStage::Mapping, "remove attribute")?;
        let removed = self.context.remove_attribute(id);
        self.refresh();
        Ok(removed)
    }

    /// Discard the session and everything staged for it
    ///
    /// Any request still in flight keeps running, but its reply will be ignored.
    pub fn cancel(&mut self) {
        if let Some(ticket) = self.pending {
            debug!(
                session = %self.session_id,
                call = ticket.call,
                "Cancelling with a request in flight"
            );
        }
        info!(session = %self.session_id, stage = %self.stage(), "Import cancelled");
        self.reset();
    }

    /// Run `continue` for the current stage, performing any remote calls
    pub async fn continue_import(&mut self) -> ImportResult<Progress> {
        let client = Arc::clone(&self.client);
        let mut step = self.begin_continue()?;
        loop {
            match step {
                Step::Settled(progress) => return Ok(progress),
                Step::Pending(call) => {
                    let reply = call.request.send(client.as_ref()).await;
                    step = self.resolve(call.ticket, reply)?;
                }
            }
        }
    }

    /// Start `continue` for the current stage
    pub fn begin_continue(&mut self) -> ImportResult<Step> {
        self.ensure_idle("continue")?;
        let stage = self.stage();
        if !self.continue_enabled {
            return Err(ImportError::ValidationIncomplete(stage));
        }
        info!(session = %self.session_id, %stage, "Continue");

        match stage {
            stage if stage.is_upload() => self.begin_upload(),
            ImportStage::Entities(EntityStage::Details) => {
                self.advance()?;
                Ok(Step::Settled(Progress::Advanced(self.stage())))
            }
            ImportStage::Entities(EntityStage::Mapping) => {
                let (file, format) = self.staged()?;
                let request = self.reviewer.request(format, self.context.mapping(), file);
                Ok(self.dispatch(request))
            }
            _ => {
                let (file, format) = self.staged()?;
                let request =
                    self.committer
                        .request(self.subject(), format, self.context.mapping(), file);
                Ok(self.dispatch(request))
            }
        }
    }

    /// Apply the reply of a call started by `begin_continue` or a previous `resolve`
    pub fn resolve(&mut self, ticket: Ticket, reply: RemoteReply) -> ImportResult<Step> {
        if self.pending != Some(ticket) {
            debug!(
                session = %self.session_id,
                epoch = ticket.epoch,
                call = ticket.call,
                "Discarding reply for a stale request"
            );
            return Ok(Step::Settled(Progress::Discarded));
        }
        self.pending = None;

        let step = match reply {
            RemoteReply::Headers(result) => self.on_headers(result),
            RemoteReply::Catalog(result) => self.on_catalog(result)?,
            RemoteReply::Review(result) => self.on_review(result)?,
            RemoteReply::Commit(result) => self.on_commit(result)?,
        };
        self.refresh();
        Ok(step)
    }

    fn begin_upload(&mut self) -> ImportResult<Step> {
        let stage = self.stage();
        let file = self
            .file
            .clone()
            .ok_or(ImportError::ValidationIncomplete(stage))?;
        let format = self.intake.validate(self.subject(), &file)?;

        match format {
            SourceFormat::Json => {
                match self.intake.decode(&file) {
                    Ok(document) => self.document = Some(document),
                    Err(e) => {
                        warn!(session = %self.session_id, error = %e, "Failed to decode JSON file");
                        self.notifier.notify(Notification::error(
                            "Error",
                            "Error while parsing JSON file",
                            self.config.error_duration(),
                        ));
                        self.session = self.session.apply(SessionEvent::ClearFile)?;
                        self.file = None;
                        self.document = None;
                        self.refresh();
                        return Ok(Step::Settled(Progress::Stayed(stage)));
                    }
                }
                match self.subject() {
                    ImportSubject::Template => {
                        self.advance()?;
                        Ok(Step::Settled(Progress::Advanced(self.stage())))
                    }
                    ImportSubject::Entities => Ok(self.dispatch(RemoteRequest::FetchCatalog)),
                }
            }
            // Headers are only fetched once per file
            SourceFormat::Csv if !self.columns.is_empty() => {
                Ok(self.dispatch(RemoteRequest::FetchCatalog))
            }
            SourceFormat::Csv => Ok(self.dispatch(RemoteRequest::ExtractHeaders { file })),
        }
    }

    fn on_headers(&mut self, result: ImportResult<Vec<String>>) -> Step {
        match result.and_then(|headers| self.resolver.resolve(headers)) {
            Ok(columns) => {
                info!(session = %self.session_id, columns = columns.len(), "Loaded columns");
                self.columns = columns;
                self.dispatch(RemoteRequest::FetchCatalog)
            }
            Err(e) => {
                warn!(session = %self.session_id, error = %e, "Failed to prepare CSV file");
                self.notifier.notify(Notification::error(
                    "CSV Import Error",
                    with_detail("Error while preparing CSV file", &e.to_string()),
                    self.config.error_duration(),
                ));
                Step::Settled(Progress::Stayed(self.stage()))
            }
        }
    }

    fn on_catalog(&mut self, result: ImportResult<MappingCatalog>) -> ImportResult<Step> {
        match result {
            Ok(catalog) => {
                self.context.set_catalog(catalog);
                self.advance()?;
                Ok(Step::Settled(Progress::Advanced(self.stage())))
            }
            Err(e) => {
                warn!(session = %self.session_id, error = %e, "Failed to fetch mapping catalog");
                self.notifier.notify(Notification::error(
                    "Error",
                    "Could not retrieve data for mapping",
                    self.config.error_duration(),
                ));
                Ok(Step::Settled(Progress::Stayed(self.stage())))
            }
        }
    }

    fn on_review(&mut self, result: ImportResult<ReviewResponse>) -> ImportResult<Step> {
        let (_, format) = self.staged()?;
        let (records, notice) = self.reviewer.interpret(format, result);
        self.review = records;
        if let Some(notice) = notice {
            self.notifier.notify(notice);
        }
        self.advance()?;
        Ok(Step::Settled(Progress::Advanced(self.stage())))
    }

    fn on_commit(&mut self, result: ImportResult<CommitResponse>) -> ImportResult<Step> {
        let (_, format) = self.staged()?;
        match self.committer.interpret(self.subject(), format, result) {
            Ok(()) => {
                info!(session = %self.session_id, "Import finished, reloading host view");
                self.host.close();
                self.reset();
                self.host.reload();
                Ok(Step::Settled(Progress::Committed))
            }
            Err(notice) => {
                self.notifier.notify(notice);
                Ok(Step::Settled(Progress::Stayed(self.stage())))
            }
        }
    }

    fn dispatch(&mut self, request: RemoteRequest) -> Step {
        self.calls += 1;
        let ticket = Ticket {
            epoch: self.epoch,
            call: self.calls,
        };
        debug!(
            session = %self.session_id,
            operation = request.operation(),
            call = ticket.call,
            "Issuing remote request"
        );
        self.pending = Some(ticket);
        self.refresh();
        Step::Pending(PendingCall { ticket, request })
    }

    fn advance(&mut self) -> ImportResult<()> {
        let from = self.stage();
        self.session = self.session.apply(SessionEvent::Advance)?;
        info!(session = %self.session_id, %from, to = %self.stage(), "Advanced stage");
        self.refresh();
        Ok(())
    }

    fn reset(&mut self) {
        self.session = ImportSession::new();
        self.session_id = Uuid::new_v4();
        self.file = None;
        self.document = None;
        self.columns = ColumnSet::default();
        self.context = MappingContext::new(self.identity.clone());
        self.review.clear();
        self.epoch += 1;
        self.pending = None;
        self.refresh();
    }

    /// Recompute whether `continue` is enabled; run after every mutation
    fn refresh(&mut self) {
        let subject = self.session.subject();
        let file_accepted = self
            .file
            .as_ref()
            .is_some_and(|file| self.intake.accepts(subject, &file.mime_type));
        self.continue_enabled = self.pending.is_none()
            && self
                .session
                .is_ready(file_accepted, &self.context.mapping().name_field);
    }

    fn staged(&self) -> ImportResult<(&StagedFile, SourceFormat)> {
        match (self.file.as_ref(), self.session.format()) {
            (Some(file), Some(format)) => Ok((file, format)),
            _ => Err(ImportError::ValidationIncomplete(self.stage())),
        }
    }

    fn ensure_idle(&self, event: &str) -> ImportResult<()> {
        if self.pending.is_some() {
            return Err(ImportError::IllegalTransition {
                stage: self.stage(),
                event: format!("{} while a request is in flight", event),
            });
        }
        Ok(())
    }

    fn require_stage(&self, expected: EntityStage, event: &str) -> ImportResult<()> {
        if self.stage() != ImportStage::Entities(expected) {
            return Err(ImportError::IllegalTransition {
                stage: self.stage(),
                event: event.to_string(),
            });
        }
        Ok(())
    }

    /// Validate a column selection for a tabular details field
    fn tabular_column(&self, column: String, event: &str) -> ImportResult<String> {
        self.require_stage(EntityStage::Details, event)?;
        if self.session.format() != Some(SourceFormat::Csv) {
            // JSON records carry their own name and description
            return Err(ImportError::IllegalTransition {
                stage: self.stage(),
                event: event.to_string(),
            });
        }
        if !column.is_empty() && !self.columns.contains(&column) {
            return Err(ImportError::UnknownColumn(column));
        }
        Ok(column)
    }
}

/// Tabular drafts draw their values from the column set
fn value_constraint(format: Option<SourceFormat>, columns: &ColumnSet) -> ValueConstraint<'_> {
    match format {
        Some(SourceFormat::Csv) => ValueConstraint::Columns(columns.as_slice()),
        _ => ValueConstraint::Unrestricted,
    }
}
