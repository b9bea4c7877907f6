#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MediaType {
    Film,
    Drama,
    Special,
    Manga,
    Book,
    Album,
    Song,
    TvShow,
    TvSegment,
    Short,
    StagePlay,
}

impl MediaType {
    pub const ALL: [MediaType; 11] = [
        MediaType::Film,
        MediaType::TvShow,
        MediaType::Drama,
        MediaType::Special,
        MediaType::Short,
        MediaType::Manga,
        MediaType::Book,
        MediaType::Album,
        MediaType::Song,
        MediaType::TvSegment,
        MediaType::StagePlay,
    ];

    /// Value stored in `titles.media_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Film => "Film",
            MediaType::Drama => "Drama",
            MediaType::Special => "Special",
            MediaType::Manga => "Manga",
            MediaType::Book => "Book",
            MediaType::Album => "Album",
            MediaType::Song => "Song",
            MediaType::TvShow => "TV_Show",
            MediaType::TvSegment => "TV_Segment",
            MediaType::Short => "Short",
            MediaType::StagePlay => "Stage_Play",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Serial media carry an end date; single releases never do.
    pub fn is_serial(self) -> bool {
        !matches!(
            self,
            MediaType::Film
                | MediaType::Book
                | MediaType::Song
                | MediaType::Album
                | MediaType::TvSegment
        )
    }

    /// Table holding this type's subtype rows, keyed by `title_id`.
    pub fn subtype_table(self) -> &'static str {
        match self {
            MediaType::Film => "films",
            MediaType::Drama => "dramas",
            MediaType::Special => "specials",
            MediaType::Manga => "mangas",
            MediaType::Book => "books",
            MediaType::Album => "albums",
            MediaType::Song => "songs",
            MediaType::TvShow => "tv_shows",
            MediaType::TvSegment => "tv_segments",
            MediaType::Short => "shorts",
            MediaType::StagePlay => "stage_plays",
        }
    }

    /// Album and song covers are square artwork and are never rotated.
    pub fn allows_cover_rotation(self) -> bool {
        !matches!(self, MediaType::Album | MediaType::Song)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TitleStatus {
    #[default]
    Unconfirmed,
    Announced,
    NotYetReleased,
    Releasing,
    Finished,
    Cancelled,
}

impl TitleStatus {
    pub const ALL: [TitleStatus; 6] = [
        TitleStatus::Unconfirmed,
        TitleStatus::Announced,
        TitleStatus::NotYetReleased,
        TitleStatus::Releasing,
        TitleStatus::Finished,
        TitleStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TitleStatus::Unconfirmed => "Unconfirmed",
            TitleStatus::Announced => "Announced",
            TitleStatus::NotYetReleased => "Not Yet Released",
            TitleStatus::Releasing => "Releasing",
            TitleStatus::Finished => "Finished",
            TitleStatus::Cancelled => "Cancelled",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FilmDetails {
    /// Minutes.
    pub total_duration: i32,
    pub content_rating_id: Option<i32>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TvShowDetails {
    pub episode_count: i32,
    /// Minutes per episode.
    pub episode_duration: i32,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AlbumDetails {
    pub track_count: i32,
    pub total_duration: i32,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RuntimeDetails {
    pub duration: i32,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StagePlayDetails {
    pub total_duration: i32,
}

/// The type-specific half of a title. Each variant maps to exactly one
/// subtype table, and its payload is that table's columns.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Subtype {
    Film(FilmDetails),
    TvShow(TvShowDetails),
    Drama,
    Special,
    Short,
    Manga,
    Book,
    Album(AlbumDetails),
    Song(RuntimeDetails),
    TvSegment(RuntimeDetails),
    StagePlay(StagePlayDetails),
}

impl Subtype {
    /// Zero-valued row inserted alongside a freshly created title.
    pub fn defaults(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Film => Subtype::Film(FilmDetails::default()),
            MediaType::TvShow => Subtype::TvShow(TvShowDetails::default()),
            MediaType::Drama => Subtype::Drama,
            MediaType::Special => Subtype::Special,
            MediaType::Short => Subtype::Short,
            MediaType::Manga => Subtype::Manga,
            MediaType::Book => Subtype::Book,
            MediaType::Album => Subtype::Album(AlbumDetails::default()),
            MediaType::Song => Subtype::Song(RuntimeDetails::default()),
            MediaType::TvSegment => Subtype::TvSegment(RuntimeDetails::default()),
            MediaType::StagePlay => Subtype::StagePlay(StagePlayDetails::default()),
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            Subtype::Film(_) => MediaType::Film,
            Subtype::TvShow(_) => MediaType::TvShow,
            Subtype::Drama => MediaType::Drama,
            Subtype::Special => MediaType::Special,
            Subtype::Short => MediaType::Short,
            Subtype::Manga => MediaType::Manga,
            Subtype::Book => MediaType::Book,
            Subtype::Album(_) => MediaType::Album,
            Subtype::Song(_) => MediaType::Song,
            Subtype::TvSegment(_) => MediaType::TvSegment,
            Subtype::StagePlay(_) => MediaType::StagePlay,
        }
    }
}

/// Public view of a user account.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub joined_at: i64,
}

impl From<crate::entities::users::Model> for Profile {
    fn from(user: crate::entities::users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            avatar_url: user.avatar_url,
            joined_at: user.created_at,
        }
    }
}

/// One side of a stalk edge, as shown on the connections page.
#[derive(Clone, Debug)]
pub struct Connection {
    pub profile: Profile,
    pub since: i64,
}

/// Generic title row ready for insertion.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTitle {
    pub media_type: MediaType,
    pub native_title: String,
    pub known_as: String,
    pub synopsis: Option<String>,
    pub status: TitleStatus,
    pub cover_image_url: Option<String>,
    pub release_date: Option<jiff::civil::Date>,
    pub end_date: Option<jiff::civil::Date>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreatedTitle {
    pub id: String,
    pub short_id: i32,
}

#[derive(Clone, Debug)]
pub struct TitleSummary {
    pub short_id: i32,
    pub media_type: MediaType,
    pub native_title: String,
    pub known_as: String,
    pub status: TitleStatus,
}

#[derive(Clone, Debug)]
pub struct TitleDetail {
    pub id: String,
    pub short_id: i32,
    pub media_type: MediaType,
    pub native_title: String,
    pub known_as: String,
    pub synopsis: Option<String>,
    pub status: TitleStatus,
    pub cover_image_url: Option<String>,
    pub release_date: Option<String>,
    pub end_date: Option<String>,
    pub subtype: Option<Subtype>,
    pub content_rating: Option<String>,
    pub extras: TitleExtras,
}

/// Film metadata kept in the `media_*` link tables.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TitleExtras {
    pub alt_titles: Vec<String>,
    pub countries: Vec<String>,
    pub languages: Vec<String>,
    pub external_links: Vec<ExternalLink>,
    pub related: Vec<RelatedTitle>,
    pub companies: Vec<CompanyCredit>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExternalLink {
    pub label: Option<String>,
    pub url: String,
}

impl ExternalLink {
    pub fn text(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.url)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelatedTitle {
    pub short_id: i32,
    pub native_title: String,
    pub known_as: String,
}

impl RelatedTitle {
    pub fn display_name(&self) -> &str {
        if self.known_as.is_empty() { &self.native_title } else { &self.known_as }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompanyCredit {
    pub name: String,
    pub role: Option<String>,
}

impl std::fmt::Display for CompanyCredit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.role {
            Some(role) => write!(f, "{} ({role})", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Renders a unix timestamp as `YYYY/MM/DD`.
pub fn format_day(seconds: i64) -> String {
    match jiff::Timestamp::from_second(seconds) {
        Ok(ts) => ts.strftime("%Y/%m/%d").to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_strings_match_schema() {
        assert_eq!(MediaType::TvShow.as_str(), "TV_Show");
        assert_eq!(MediaType::from_db("Stage_Play"), Some(MediaType::StagePlay));
        assert_eq!(MediaType::from_db("TV Show"), None);
        assert_eq!(MediaType::TvSegment.label(), "TV Segment");
        assert_eq!(TitleStatus::from_db("Not Yet Released"), Some(TitleStatus::NotYetReleased));
    }

    #[test]
    fn non_serial_set() {
        let single: Vec<_> = MediaType::ALL.into_iter().filter(|t| !t.is_serial()).collect();
        assert_eq!(
            single,
            vec![
                MediaType::Film,
                MediaType::Book,
                MediaType::Album,
                MediaType::Song,
                MediaType::TvSegment
            ]
        );
    }

    #[test]
    fn defaults_select_matching_subtype() {
        for media_type in MediaType::ALL {
            assert_eq!(Subtype::defaults(media_type).media_type(), media_type);
        }
        assert_eq!(
            Subtype::defaults(MediaType::TvShow),
            Subtype::TvShow(TvShowDetails { episode_count: 0, episode_duration: 0 })
        );
    }

    #[test]
    fn subtype_tables_are_distinct() {
        let mut tables: Vec<_> = MediaType::ALL.into_iter().map(MediaType::subtype_table).collect();
        tables.sort_unstable();
        tables.dedup();
        assert_eq!(tables.len(), MediaType::ALL.len());
        assert_eq!(MediaType::StagePlay.subtype_table(), "stage_plays");
    }

    #[test]
    fn company_credit_shows_role_when_known() {
        let studio = CompanyCredit { name: "Wit Studio".into(), role: Some("Animation".into()) };
        assert_eq!(studio.to_string(), "Wit Studio (Animation)");
        let plain = CompanyCredit { name: "Kodansha".into(), role: None };
        assert_eq!(plain.to_string(), "Kodansha");
    }

    #[test]
    fn format_day_uses_slashes() {
        assert_eq!(format_day(1_735_689_600), "2025/01/01");
    }
}
