//! Editable state of the "add a title" form and the constraints derived
//! from the selected media type. Nothing here touches the store.

use jiff::civil::Date;
use serde::Deserialize;

use crate::models::{MediaType, NewTitle, Profile, TitleStatus};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Native title is required.")]
    MissingNativeTitle,
    #[error("Known as is required.")]
    MissingKnownAs,
    #[error("{field} must be a date in YYYY-MM-DD form.")]
    BadDate { field: &'static str },
    #[error("unknown media type {0:?}")]
    UnknownMediaType(String),
    #[error("unknown status {0:?}")]
    UnknownStatus(String),
}

/// Raw form submission. Every field is text so that blank inputs never fail
/// deserialization.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TitleForm {
    pub media_type: String,
    pub status: String,
    pub native_title: String,
    pub known_as: String,
    pub synopsis: String,
    pub cover_url: String,
    pub release_date: String,
    pub end_date: String,
    pub cover_width: String,
    pub cover_height: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleDraft {
    media_type: MediaType,
    pub status: TitleStatus,
    pub native_title: String,
    pub known_as: String,
    pub synopsis: String,
    pub cover_url: String,
    pub release_date: String,
    end_date: String,
    /// Natural `(width, height)` of the cover as loaded by the browser.
    pub cover_size: Option<(u32, u32)>,
}

impl Default for TitleDraft {
    fn default() -> Self {
        Self {
            media_type: MediaType::Film,
            status: TitleStatus::Unconfirmed,
            native_title: String::new(),
            known_as: String::new(),
            synopsis: String::new(),
            cover_url: String::new(),
            release_date: String::new(),
            end_date: String::new(),
            cover_size: None,
        }
    }
}

impl TitleDraft {
    pub fn from_form(form: TitleForm) -> Result<Self, DraftError> {
        let media_type = MediaType::from_db(&form.media_type)
            .ok_or_else(|| DraftError::UnknownMediaType(form.media_type.clone()))?;
        let status = if form.status.is_empty() {
            TitleStatus::default()
        } else {
            TitleStatus::from_db(&form.status)
                .ok_or_else(|| DraftError::UnknownStatus(form.status.clone()))?
        };

        let cover_size = match (form.cover_width.parse(), form.cover_height.parse()) {
            (Ok(w), Ok(h)) => Some((w, h)),
            _ => None,
        };

        let mut draft = Self {
            media_type,
            status,
            native_title: form.native_title,
            known_as: form.known_as,
            synopsis: form.synopsis,
            cover_url: form.cover_url,
            release_date: form.release_date,
            end_date: form.end_date,
            cover_size,
        };
        draft.set_media_type(media_type);
        Ok(draft)
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Switching to a single-release type wipes whatever end date was typed.
    pub fn set_media_type(&mut self, media_type: MediaType) {
        self.media_type = media_type;
        if !media_type.is_serial() {
            self.end_date.clear();
        }
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }

    /// Ignored while the end date is disabled.
    pub fn set_end_date(&mut self, value: impl Into<String>) {
        if self.end_date_enabled() {
            self.end_date = value.into();
        }
    }

    pub fn end_date_enabled(&self) -> bool {
        self.media_type.is_serial()
    }

    pub fn rotate_cover(&self) -> bool {
        self.cover_size.is_some_and(|(w, h)| cover_rotation(self.media_type, w, h))
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.native_title.trim().is_empty() {
            return Err(DraftError::MissingNativeTitle);
        }
        if self.known_as.trim().is_empty() {
            return Err(DraftError::MissingKnownAs);
        }
        parse_date(&self.release_date, "Release date")?;
        parse_date(&self.end_date, "End date")?;
        Ok(())
    }

    /// Generic title payload stamped with the author and `now`.
    pub fn to_new_title(&self, author: &Profile, now: i64) -> Result<NewTitle, DraftError> {
        let end_date = if self.media_type.is_serial() {
            parse_date(&self.end_date, "End date")?
        } else {
            None
        };

        Ok(NewTitle {
            media_type: self.media_type,
            native_title: self.native_title.clone(),
            known_as: self.known_as.clone(),
            synopsis: non_blank(&self.synopsis),
            status: self.status,
            cover_image_url: non_blank(&self.cover_url),
            release_date: parse_date(&self.release_date, "Release date")?,
            end_date,
            created_by: author.id.clone(),
            updated_by: author.id.clone(),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Landscape covers are shown rotated a quarter turn, except for square
/// music artwork.
pub fn cover_rotation(media_type: MediaType, width: u32, height: u32) -> bool {
    width > height && media_type.allows_cover_rotation()
}

fn parse_date(value: &str, field: &'static str) -> Result<Option<Date>, DraftError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<Date>().map(Some).map_err(|_| DraftError::BadDate { field })
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> Profile {
        Profile { id: "u1".into(), username: "eren".into(), avatar_url: None, joined_at: 0 }
    }

    fn form(media_type: &str, end_date: &str) -> TitleForm {
        TitleForm {
            media_type: media_type.into(),
            status: "Announced".into(),
            native_title: "進撃の巨人".into(),
            known_as: "Shingeki no Kyojin".into(),
            release_date: "2025-01-01".into(),
            end_date: end_date.into(),
            ..Default::default()
        }
    }

    #[test]
    fn selecting_single_release_type_clears_end_date() {
        let mut draft = TitleDraft::from_form(form("TV_Show", "2026-01-01")).unwrap();
        assert!(draft.end_date_enabled());
        assert_eq!(draft.end_date(), "2026-01-01");

        draft.set_media_type(MediaType::Book);
        assert!(!draft.end_date_enabled());
        assert_eq!(draft.end_date(), "");

        draft.set_end_date("2027-01-01");
        assert_eq!(draft.end_date(), "");
    }

    #[test]
    fn non_serial_types_never_persist_end_date() {
        for media_type in MediaType::ALL.into_iter().filter(|t| !t.is_serial()) {
            let draft = TitleDraft::from_form(form(media_type.as_str(), "2026-01-01")).unwrap();
            let title = draft.to_new_title(&author(), 10).unwrap();
            assert_eq!(title.end_date, None, "{media_type:?}");
        }
    }

    #[test]
    fn serial_types_keep_end_date() {
        for media_type in MediaType::ALL.into_iter().filter(|t| t.is_serial()) {
            let draft = TitleDraft::from_form(form(media_type.as_str(), "2026-01-01")).unwrap();
            let title = draft.to_new_title(&author(), 10).unwrap();
            assert_eq!(title.end_date, Some(jiff::civil::date(2026, 1, 1)), "{media_type:?}");
        }
    }

    #[test]
    fn payload_nulls_blanks_and_stamps_author() {
        let mut f = form("Film", "");
        f.release_date = String::new();
        f.synopsis = "   ".into();
        let title = TitleDraft::from_form(f).unwrap().to_new_title(&author(), 42).unwrap();

        assert_eq!(title.release_date, None);
        assert_eq!(title.synopsis, None);
        assert_eq!(title.cover_image_url, None);
        assert_eq!(title.created_by, "u1");
        assert_eq!(title.updated_by, "u1");
        assert_eq!((title.created_at, title.updated_at), (42, 42));
        assert_eq!(title.status, TitleStatus::Announced);
    }

    #[test]
    fn title_strings_are_stored_as_entered() {
        let mut f = form("Film", "");
        f.native_title = " 君の名は。 ".into();
        f.known_as = "Your Name ".into();
        let title = TitleDraft::from_form(f).unwrap().to_new_title(&author(), 1).unwrap();

        assert_eq!(title.native_title, " 君の名は。 ");
        assert_eq!(title.known_as, "Your Name ");
    }

    #[test]
    fn required_fields() {
        let mut f = form("Film", "");
        f.known_as = " ".into();
        let draft = TitleDraft::from_form(f).unwrap();
        assert_eq!(draft.validate(), Err(DraftError::MissingKnownAs));

        let mut f = form("Film", "");
        f.native_title = String::new();
        let draft = TitleDraft::from_form(f).unwrap();
        assert_eq!(draft.validate(), Err(DraftError::MissingNativeTitle));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let mut f = form("Drama", "soon");
        f.release_date = "2025-01-01".into();
        let draft = TitleDraft::from_form(f).unwrap();
        assert_eq!(draft.validate(), Err(DraftError::BadDate { field: "End date" }));
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        assert!(matches!(
            TitleDraft::from_form(form("Podcast", "")),
            Err(DraftError::UnknownMediaType(_))
        ));
        let mut f = form("Film", "");
        f.status = "Rumoured".into();
        assert!(matches!(TitleDraft::from_form(f), Err(DraftError::UnknownStatus(_))));
    }

    #[test]
    fn cover_rotation_rule() {
        for media_type in MediaType::ALL {
            let landscape = cover_rotation(media_type, 1200, 800);
            let expected = !matches!(media_type, MediaType::Album | MediaType::Song);
            assert_eq!(landscape, expected, "{media_type:?}");
            assert!(!cover_rotation(media_type, 800, 1200));
            assert!(!cover_rotation(media_type, 800, 800));
        }
    }

    #[test]
    fn rotation_needs_known_dimensions() {
        let mut f = form("Film", "");
        f.cover_width = "1200".into();
        f.cover_height = "800".into();
        assert!(TitleDraft::from_form(f.clone()).unwrap().rotate_cover());

        f.cover_height = String::new();
        assert!(!TitleDraft::from_form(f).unwrap().rotate_cover());
    }
}
