//! The record-store boundary. The application only ever talks to the three
//! collections through this trait, so the reconciler (and its tests) are
//! independent of the Postgres backing.

use sqlx::PgPool;

use crate::catalog::types::RawConference;
use crate::errors::AppError;
use crate::models::conference::{self, ConferenceRow, ConferenceUpdate, DeadlineInput};
use crate::models::suggestion::{self, NewSuggestion, SuggestionRow};

#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Every conference joined with its deadlines, normalizer-ready.
    async fn list_conferences(&self) -> Result<Vec<RawConference>, AppError>;
    /// Conference rows only, ordered by name.
    async fn list_conference_rows(&self) -> Result<Vec<ConferenceRow>, AppError>;
    async fn find_conference(&self, id: &str) -> Result<Option<ConferenceRow>, AppError>;
    async fn insert_conference(&self, row: &ConferenceRow) -> Result<(), AppError>;
    async fn update_conference(&self, id: &str, patch: &ConferenceUpdate) -> Result<(), AppError>;
    async fn delete_conference(&self, id: &str) -> Result<(), AppError>;

    async fn deadlines_for(&self, conference_id: &str) -> Result<Vec<DeadlineInput>, AppError>;
    async fn insert_deadlines(
        &self,
        conference_id: &str,
        deadlines: &[DeadlineInput],
    ) -> Result<(), AppError>;
    async fn delete_deadlines(&self, conference_id: &str) -> Result<(), AppError>;

    /// Pending suggestions, oldest first.
    async fn list_suggestions(&self) -> Result<Vec<SuggestionRow>, AppError>;
    async fn find_suggestion(&self, id: i64) -> Result<Option<SuggestionRow>, AppError>;
    async fn insert_suggestion(&self, s: &NewSuggestion) -> Result<i64, AppError>;
    async fn delete_suggestion(&self, id: i64) -> Result<(), AppError>;
}

impl RecordStore for PgPool {
    async fn list_conferences(&self) -> Result<Vec<RawConference>, AppError> {
        conference::queries::find_all_raw(self).await
    }

    async fn list_conference_rows(&self) -> Result<Vec<ConferenceRow>, AppError> {
        conference::queries::find_all(self).await
    }

    async fn find_conference(&self, id: &str) -> Result<Option<ConferenceRow>, AppError> {
        conference::queries::find_by_id(self, id).await
    }

    async fn insert_conference(&self, row: &ConferenceRow) -> Result<(), AppError> {
        conference::queries::insert(self, row).await
    }

    async fn update_conference(&self, id: &str, patch: &ConferenceUpdate) -> Result<(), AppError> {
        conference::queries::update(self, id, patch).await
    }

    async fn delete_conference(&self, id: &str) -> Result<(), AppError> {
        conference::queries::delete(self, id).await
    }

    async fn deadlines_for(&self, conference_id: &str) -> Result<Vec<DeadlineInput>, AppError> {
        conference::queries::deadlines_for(self, conference_id).await
    }

    async fn insert_deadlines(
        &self,
        conference_id: &str,
        deadlines: &[DeadlineInput],
    ) -> Result<(), AppError> {
        conference::queries::insert_deadlines(self, conference_id, deadlines).await
    }

    async fn delete_deadlines(&self, conference_id: &str) -> Result<(), AppError> {
        conference::queries::delete_deadlines(self, conference_id).await
    }

    async fn list_suggestions(&self) -> Result<Vec<SuggestionRow>, AppError> {
        suggestion::queries::find_all(self).await
    }

    async fn find_suggestion(&self, id: i64) -> Result<Option<SuggestionRow>, AppError> {
        suggestion::queries::find_by_id(self, id).await
    }

    async fn insert_suggestion(&self, s: &NewSuggestion) -> Result<i64, AppError> {
        suggestion::queries::insert(self, s).await
    }

    async fn delete_suggestion(&self, id: i64) -> Result<(), AppError> {
        suggestion::queries::delete(self, id).await
    }
}
