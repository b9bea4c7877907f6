pub mod albums;
pub mod books;
pub mod companies;
pub mod content_ratings;
pub mod countries;
pub mod dramas;
pub mod films;
pub mod languages;
pub mod mangas;
pub mod media_alt_titles;
pub mod media_companies;
pub mod media_countries;
pub mod media_external_links;
pub mod media_languages;
pub mod media_related_titles;
pub mod sessions;
pub mod shorts;
pub mod songs;
pub mod specials;
pub mod stage_plays;
pub mod stalks;
pub mod titles;
pub mod tv_segments;
pub mod tv_shows;
pub mod users;
