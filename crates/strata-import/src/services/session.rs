//! Import session state machine
//!
//! `ImportSession::apply` is the only way the session changes. It is pure:
//! it consumes the current session and an event and returns the next
//! session, or an error if the event is not valid at the current stage.

use strata_import_types::{
    EntityStage, ImportError, ImportResult, ImportStage, ImportSubject, SourceFormat,
};

/// Events accepted by the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Switch the import subject (upload stage only, before locking)
    SelectSubject(ImportSubject),
    /// Record the format of a newly staged file
    StageFile(SourceFormat),
    /// Forget the staged file's format after it was rejected
    ClearFile,
    /// Move to the following stage
    Advance,
    /// Return to the initial session
    Reset,
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEvent::SelectSubject(subject) => write!(f, "select subject {}", subject),
            SessionEvent::StageFile(format) => write!(f, "stage {} file", format),
            SessionEvent::ClearFile => write!(f, "clear file"),
            SessionEvent::Advance => write!(f, "advance"),
            SessionEvent::Reset => write!(f, "reset"),
        }
    }
}

/// Position of the user within an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSession {
    stage: ImportStage,
    format: Option<SourceFormat>,
    subject_locked: bool,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> ImportStage {
        self.stage
    }

    pub fn subject(&self) -> ImportSubject {
        self.stage.subject()
    }

    pub fn format(&self) -> Option<SourceFormat> {
        self.format
    }

    pub fn is_subject_locked(&self) -> bool {
        self.subject_locked
    }

    /// Apply an event, returning the next session
    pub fn apply(self, event: SessionEvent) -> ImportResult<Self> {
        let illegal = || ImportError::IllegalTransition {
            stage: self.stage,
            event: event.to_string(),
        };

        match event {
            SessionEvent::SelectSubject(subject) => {
                if self.subject_locked || !self.stage.is_upload() {
                    return Err(illegal());
                }
                Ok(Self {
                    stage: ImportStage::initial(subject),
                    ..self
                })
            }
            SessionEvent::StageFile(format) => {
                if !self.stage.is_upload() {
                    return Err(illegal());
                }
                Ok(Self {
                    format: Some(format),
                    ..self
                })
            }
            SessionEvent::ClearFile => {
                if !self.stage.is_upload() {
                    return Err(illegal());
                }
                Ok(Self {
                    format: None,
                    ..self
                })
            }
            SessionEvent::Advance => {
                if self.format.is_none() {
                    return Err(illegal());
                }
                let next = self.stage.next().ok_or_else(illegal)?;
                Ok(Self {
                    stage: next,
                    subject_locked: true,
                    ..self
                })
            }
            SessionEvent::Reset => Ok(Self::default()),
        }
    }

    /// Readiness predicate of the current stage
    ///
    /// `file_accepted` is true when a file is staged and its MIME type is
    /// accepted for the active subject; `name_field` is the chosen name column.
    pub fn is_ready(&self, file_accepted: bool, name_field: &str) -> bool {
        match self.stage {
            stage if stage.is_upload() => file_accepted,
            ImportStage::Entities(EntityStage::Details) => match self.format {
                Some(SourceFormat::Csv) => !name_field.is_empty(),
                Some(SourceFormat::Json) => true,
                None => false,
            },
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_import_types::TemplateStage;

    fn at_details(format: SourceFormat) -> ImportSession {
        ImportSession::new()
            .apply(SessionEvent::StageFile(format))
            .and_then(|s| s.apply(SessionEvent::Advance))
            .unwrap()
    }

    #[test]
    fn test_initial_session() {
        let session = ImportSession::new();
        assert_eq!(session.stage(), ImportStage::Entities(EntityStage::Upload));
        assert_eq!(session.format(), None);
        assert!(!session.is_subject_locked());
    }

    #[test]
    fn test_subject_selection_switches_stage_family() {
        let session = ImportSession::new()
            .apply(SessionEvent::SelectSubject(ImportSubject::Template))
            .unwrap();
        assert_eq!(session.stage(), ImportStage::Template(TemplateStage::Upload));
    }

    #[test]
    fn test_advance_locks_subject() {
        let session = at_details(SourceFormat::Csv);
        assert!(session.is_subject_locked());

        let err = session
            .apply(SessionEvent::SelectSubject(ImportSubject::Template))
            .unwrap_err();
        assert!(matches!(err, ImportError::IllegalTransition { .. }));
    }

    #[test]
    fn test_cannot_advance_without_file() {
        let err = ImportSession::new()
            .apply(SessionEvent::Advance)
            .unwrap_err();
        assert!(matches!(err, ImportError::IllegalTransition { .. }));
    }

    #[test]
    fn test_cannot_advance_past_review() {
        let session = ImportSession::new()
            .apply(SessionEvent::SelectSubject(ImportSubject::Template))
            .and_then(|s| s.apply(SessionEvent::StageFile(SourceFormat::Json)))
            .and_then(|s| s.apply(SessionEvent::Advance))
            .unwrap();
        assert!(session.stage().is_review());
        assert!(session.apply(SessionEvent::Advance).is_err());
    }

    #[test]
    fn test_format_is_fixed_after_upload() {
        let session = at_details(SourceFormat::Json);
        assert!(session.apply(SessionEvent::StageFile(SourceFormat::Csv)).is_err());
        assert!(session.apply(SessionEvent::ClearFile).is_err());
        assert_eq!(session.format(), Some(SourceFormat::Json));
    }

    #[test]
    fn test_reset_from_any_stage() {
        let session = at_details(SourceFormat::Csv)
            .apply(SessionEvent::Advance)
            .unwrap();
        assert_eq!(
            session.apply(SessionEvent::Reset).unwrap(),
            ImportSession::default()
        );
    }

    #[test]
    fn test_details_readiness_depends_on_format() {
        let csv = at_details(SourceFormat::Csv);
        assert!(!csv.is_ready(true, ""));
        assert!(csv.is_ready(true, "Name"));

        let json = at_details(SourceFormat::Json);
        assert!(json.is_ready(true, ""));
    }

    #[test]
    fn test_upload_readiness_requires_accepted_file() {
        let session = ImportSession::new();
        assert!(!session.is_ready(false, ""));
        assert!(session.is_ready(true, ""));
    }
}
