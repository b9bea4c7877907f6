//! Creating a title writes two rows: the generic `titles` row and one row in
//! the subtype table picked by the media type. The pair is not atomic, so a
//! failed subtype insert is followed by a compensating delete.

use tracing::{debug, info, warn};

use crate::{
    error::StoreError,
    models::{CreatedTitle, NewTitle, Subtype},
    store::CatalogStore,
};

#[derive(Debug)]
pub enum CreateOutcome {
    Created(CreatedTitle),
    /// The generic insert failed; nothing was written.
    Rejected(StoreError),
    /// The subtype insert failed and the title row was removed again.
    RolledBack { error: StoreError },
    /// The subtype insert failed and so did the cleanup. The title row is
    /// left without a subtype until the orphan sweep removes it.
    Orphaned { title_id: String, error: StoreError, delete_error: StoreError },
}

impl CreateOutcome {
    /// Message to show on the form, if the submission failed.
    pub fn error_message(&self) -> Option<String> {
        match self {
            CreateOutcome::Created(_) => None,
            CreateOutcome::Rejected(error)
            | CreateOutcome::RolledBack { error }
            | CreateOutcome::Orphaned { error, .. } => Some(error.to_string()),
        }
    }
}

pub async fn create_title<S>(store: &S, title: NewTitle) -> CreateOutcome
where
    S: CatalogStore + ?Sized,
{
    let media_type = title.media_type;

    let created = match store.insert_title(&title).await {
        Ok(created) => created,
        Err(error) => {
            debug!(media_type = media_type.as_str(), error = %error, "title insert rejected");
            return CreateOutcome::Rejected(error);
        },
    };

    let subtype = Subtype::defaults(media_type);
    let Err(error) = store.insert_subtype(&created.id, &subtype).await else {
        info!(
            title_id = %created.id,
            short_id = created.short_id,
            media_type = media_type.as_str(),
            "created title"
        );
        return CreateOutcome::Created(created);
    };

    warn!(
        title_id = %created.id,
        media_type = media_type.as_str(),
        error = %error,
        "subtype insert failed, rolling back"
    );

    match store.delete_title(&created.id).await {
        Ok(()) => CreateOutcome::RolledBack { error },
        Err(delete_error) => {
            warn!(
                title_id = %created.id,
                error = %delete_error,
                "rollback failed, title is orphaned"
            );
            CreateOutcome::Orphaned { title_id: created.id, error, delete_error }
        },
    }
}
