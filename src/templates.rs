use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{
    draft::TitleDraft,
    models::{
        Connection, MediaType, Profile, Subtype, TitleDetail, TitleExtras, TitleStatus,
        TitleSummary, format_day,
    },
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const DATASTAR_CDN: &str =
    "https://cdn.jsdelivr.net/npm/@sudodevnull/datastar@0.19.9/dist/datastar.js";
const PHOSPHOR_CDN: &str = "https://unpkg.com/@phosphor-icons/web";

pub const TITLE_FORM_ID: &str = "title-form";

const INPUT: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500 disabled:bg-gray-100";
const BUTTON: &str =
    "rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700 disabled:opacity-50";

/// Who the page is rendered for, plus the avatar used when a user has none.
#[derive(Clone, Copy)]
pub struct Layout<'a> {
    pub viewer: Option<&'a Profile>,
    pub default_avatar: &'a str,
}

impl Layout<'_> {
    fn avatar<'p>(&'p self, profile: &'p Profile) -> &'p str {
        profile.avatar_url.as_deref().unwrap_or(self.default_avatar)
    }
}

pub fn login_page(error: Option<&str>, username: &str) -> String {
    page(
        "Log in",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-md w-full px-6" {
                    form class="bg-white shadow rounded-lg p-8 space-y-4" method="post" action="/login" {
                        h1 class="text-2xl font-bold text-gray-900" { "Log in" }
                        input class=(INPUT) type="text" name="username" placeholder="Username" value=(username) autofocus;
                        input class=(INPUT) type="password" name="password" placeholder="Password";
                        button class={ "w-full " (BUTTON) } type="submit" { "Login" }
                        @if let Some(error) = error {
                            p class="text-sm text-red-600" { (error) }
                        }
                        p class="text-sm text-gray-500" {
                            "No account? " a class="text-blue-600 hover:text-blue-800" href="/register" { "Register" }
                        }
                    }
                }
            }
        },
    )
}

pub fn register_page(error: Option<&str>, username: &str, email: &str) -> String {
    page(
        "Register",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-md w-full px-6" {
                    form class="bg-white shadow rounded-lg p-8 space-y-4" method="post" action="/register" {
                        h1 class="text-2xl font-bold text-gray-900" { "Create an account" }
                        input class=(INPUT) type="text" name="username" placeholder="Username" value=(username) required;
                        input class=(INPUT) type="email" name="email" placeholder="Email" value=(email) required;
                        input class=(INPUT) type="password" name="password" placeholder="Password" required;
                        button class={ "w-full " (BUTTON) } type="submit" { "Register" }
                        @if let Some(error) = error {
                            p class="text-sm text-red-600" { (error) }
                        }
                    }
                }
            }
        },
    )
}

pub fn dashboard_page(layout: Layout<'_>, me: &Profile) -> String {
    shell(
        layout,
        &format!("{}'s Dashboard", me.username),
        html! {
            (breadcrumb(&[(format!("{}'s Dashboard", me.username), "/dashboard".to_string())]))
            div class="bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "@" (me.username) }
                p class="mt-2 text-gray-600" { "Member since " (format_day(me.joined_at)) }
                div class="mt-6 flex gap-4" {
                    a class="text-blue-600 hover:text-blue-800" href="/titles/add" { "Add a title" }
                    a class="text-blue-600 hover:text-blue-800" href="/connections" { "Connections" }
                    a class="text-blue-600 hover:text-blue-800" href="/titles" { "Browse titles" }
                }
            }
        },
    )
}

pub fn profile_page(layout: Layout<'_>, profile: &Profile, is_stalking: bool) -> String {
    let is_own = layout.viewer.is_some_and(|me| me.id == profile.id);

    shell(
        layout,
        &format!("@{}", profile.username),
        html! {
            div class="bg-white shadow rounded-lg p-8 flex items-center gap-6" {
                img class="h-24 w-24 rounded-full object-cover" src=(layout.avatar(profile)) alt=(format!("{}'s avatar", profile.username));
                div {
                    h1 class="text-2xl font-bold text-gray-900" { "@" (profile.username) }
                    p class="mt-1 text-gray-600" { "Member since " (format_day(profile.joined_at)) }
                    @if layout.viewer.is_some() && !is_own {
                        form class="mt-4" method="post" action=(format!("{}/stalk", profile_href(&profile.username))) {
                            @if is_stalking {
                                button class=(BUTTON) type="submit" disabled { "Stalked" }
                            } @else {
                                button class=(BUTTON) type="submit" { "Stalk" }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn connections_page(
    layout: Layout<'_>,
    me: &Profile,
    stalking: &[Connection],
    stalkers: &[Connection],
) -> String {
    shell(
        layout,
        "Connections",
        html! {
            (breadcrumb(&[
                (format!("{}'s Dashboard", me.username), "/dashboard".to_string()),
                ("Connections".to_string(), "/connections".to_string()),
            ]))
            div class="grid gap-6 md:grid-cols-2" {
                (connection_list(layout, "ph-eye", "Stalking", "stalked", stalking, "This user is not stalking anyone."))
                (connection_list(layout, "ph-eye-closed", "Stalkers", "stalker", stalkers, "This user doesn't have any stalkers."))
            }
        },
    )
}

pub fn titles_page(layout: Layout<'_>, titles: &[TitleSummary]) -> String {
    shell(
        layout,
        "Titles",
        html! {
            div class="bg-white shadow rounded-lg p-8" {
                div class="flex items-center justify-between" {
                    h1 class="text-2xl font-bold text-gray-900" { "Titles" }
                    @if layout.viewer.is_some() {
                        a class="text-sm text-blue-600 hover:text-blue-800" href="/titles/add" { "Add a title" }
                    }
                }
                @if titles.is_empty() {
                    p class="mt-6 text-gray-600" { "No titles yet." }
                } @else {
                    ul class="mt-6 divide-y divide-gray-100" {
                        @for title in titles {
                            li class="py-3 flex items-center justify-between gap-4" {
                                a class="font-medium text-gray-900 hover:text-blue-700" href=(format!("/titles/{}", title.short_id)) {
                                    (title.known_as)
                                    span class="ml-2 font-normal text-gray-500" { (title.native_title) }
                                }
                                span class="text-sm text-gray-500" { (title.media_type.label()) " · " (title.status.as_str()) }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn add_title_page(layout: Layout<'_>, me: &Profile, draft: &TitleDraft, error: Option<&str>) -> String {
    shell(
        layout,
        "Add A Title",
        html! {
            (breadcrumb(&[
                (format!("{}'s Dashboard", me.username), "/dashboard".to_string()),
                ("Add A Title".to_string(), "/titles/add".to_string()),
            ]))
            div class="bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { i class="ph ph-hard-drives" {} " Add A Title" }
                (title_form(draft, error))
            }
        },
    )
}

/// The creation form alone, swapped in place when the draft changes.
pub fn title_form_fragment(draft: &TitleDraft, error: Option<&str>) -> String {
    title_form(draft, error).into_string()
}

pub fn title_page(layout: Layout<'_>, title: &TitleDetail) -> String {
    shell(
        layout,
        &title.known_as,
        html! {
            div class="bg-white shadow rounded-lg p-8 flex gap-8" {
                @if let Some(cover) = &title.cover_image_url {
                    img class="w-48 rounded-md object-cover" src=(cover) alt="Cover";
                }
                div class="space-y-2 text-gray-700" {
                    h1 class="text-2xl font-bold text-gray-900" { (title.known_as) }
                    (field("Native Title", &title.native_title))
                    @if title.media_type == MediaType::Film {
                        (field("Alt Titles", &title.extras.alt_titles.join(", ")))
                    }
                    (field("Type", &title.media_type.label()))
                    (field("Status", title.status.as_str()))
                    (field("Synopsis", title.synopsis.as_deref().unwrap_or("")))
                    (field("Release Date", title.release_date.as_deref().unwrap_or("")))
                    @if title.media_type.is_serial() {
                        (field("End Date", title.end_date.as_deref().unwrap_or("")))
                    }
                    @if let Some(subtype) = &title.subtype {
                        (subtype_fields(subtype, title.content_rating.as_deref()))
                    }
                    @if title.media_type == MediaType::Film {
                        (film_extras(&title.extras))
                    }
                }
            }
        },
    )
}

pub fn error_page(message: String) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
                script src=(PHOSPHOR_CDN) {}
                script type="module" src=(DATASTAR_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

/// Sidebar and top bar around a content column.
fn shell(layout: Layout<'_>, title: &str, content: Markup) -> String {
    page(
        title,
        html! {
            div class="min-h-screen bg-gray-50 flex" {
                @if let Some(me) = layout.viewer {
                    (sidebar(layout, me))
                }
                div class="flex-1" {
                    (topbar(layout))
                    main class="max-w-4xl mx-auto px-6 py-10 space-y-6" { (content) }
                }
            }
        },
    )
}

fn sidebar(layout: Layout<'_>, me: &Profile) -> Markup {
    html! {
        aside class="w-64 bg-white border-r border-gray-200 p-6 space-y-6" {
            div class="flex items-center gap-3" {
                a href="/dashboard" {
                    img class="h-12 w-12 rounded-full object-cover" src=(layout.avatar(me)) alt=(format!("{}'s avatar", me.username));
                }
                div class="flex flex-col text-sm" {
                    a class="font-semibold text-gray-900" href="/dashboard" { (me.username) }
                    span class="text-gray-500" { "Member since " (format_day(me.joined_at)) }
                    a class="text-blue-600 hover:text-blue-800" href=(profile_href(&me.username)) { "View Public Profile" }
                }
            }
            nav class="flex flex-col gap-2 text-sm" {
                a class="text-gray-700 hover:text-blue-700" href="/titles/add" { i class="ph ph-file-plus" {} " Add A Title" }
                a class="text-gray-700 hover:text-blue-700" href="/connections" { i class="ph ph-users" {} " Connections" }
            }
        }
    }
}

fn topbar(layout: Layout<'_>) -> Markup {
    html! {
        nav class="bg-white border-b border-gray-200 px-6 py-3 flex items-center gap-6 text-sm" {
            a class="text-gray-700 hover:text-blue-700" href="/" { i class="ph ph-house-line" {} " Home" }
            @if layout.viewer.is_some() {
                a class="text-gray-700 hover:text-blue-700" href="/dashboard" { i class="ph ph-chalkboard-teacher" {} " Dashboard" }
            }
            a class="text-gray-700 hover:text-blue-700" href="/titles" { i class="ph ph-files" {} " Titles" }
            div class="flex-1" {}
            @if layout.viewer.is_some() {
                form method="post" action="/logout" {
                    button class="text-gray-700 hover:text-blue-700" type="submit" { i class="ph ph-sign-out" {} " Log out" }
                }
            } @else {
                a class="text-gray-700 hover:text-blue-700" href="/" { i class="ph ph-sign-in" {} " Log in" }
            }
        }
    }
}

fn breadcrumb(links: &[(String, String)]) -> Markup {
    html! {
        div class="flex items-center gap-2 text-sm text-gray-500" {
            i class="ph ph-files" {}
            @for (i, (label, href)) in links.iter().enumerate() {
                @if i > 0 {
                    i class="ph ph-arrow-right" {}
                }
                a class="hover:text-gray-700" href=(href) { (label) }
            }
        }
    }
}

fn connection_list(
    layout: Layout<'_>,
    icon: &str,
    heading: &str,
    kind: &str,
    entries: &[Connection],
    empty: &str,
) -> Markup {
    html! {
        section class="bg-white shadow rounded-lg p-6" {
            h2 class="text-lg font-semibold text-gray-900" {
                i class={ "ph " (icon) } {} " " (heading) " (" (entries.len()) ")"
            }
            @if entries.is_empty() {
                p class="mt-4 text-gray-600" { (empty) }
            } @else {
                ul class="mt-4 space-y-3" {
                    @for entry in entries {
                        li class="flex items-center gap-3" {
                            a href=(profile_href(&entry.profile.username)) {
                                img class="h-10 w-10 rounded-full object-cover" src=(layout.avatar(&entry.profile)) alt=(entry.profile.username);
                            }
                            div class="flex-1 flex flex-col text-sm" {
                                a class="font-medium text-gray-900" href=(profile_href(&entry.profile.username)) { (entry.profile.username) }
                                span class="text-gray-500" { "Since " (format_day(entry.since)) }
                            }
                            form method="post" action="/connections/remove" {
                                input type="hidden" name="kind" value=(kind);
                                input type="hidden" name="user_id" value=(entry.profile.id);
                                button class="text-sm text-red-600 hover:text-red-800" type="submit" { "Remove" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn title_form(draft: &TitleDraft, error: Option<&str>) -> Markup {
    let media_type = draft.media_type();
    let rerender = format!(
        "@post('/titles/add/draft', {{contentType: 'form', selector: '#{TITLE_FORM_ID}'}})"
    );
    let (cover_width, cover_height) = match draft.cover_size {
        Some((w, h)) => (w.to_string(), h.to_string()),
        None => (String::new(), String::new()),
    };

    html! {
        form id=(TITLE_FORM_ID) class="mt-6 grid gap-8 md:grid-cols-3" method="post" action="/titles/add" {
            div class="flex items-start justify-center" {
                @if !draft.cover_url.is_empty() {
                    img
                        class=(if draft.rotate_cover() { "max-w-full rotate-90" } else { "max-w-full" })
                        src=(draft.cover_url)
                        alt="Cover preview"
                        data-rotatable=(if media_type.allows_cover_rotation() { "true" } else { "false" })
                        onload=(PreEscaped(COVER_ONLOAD));
                }
                input type="hidden" name="cover_width" value=(cover_width);
                input type="hidden" name="cover_height" value=(cover_height);
            }

            div class="md:col-span-2 space-y-5" {
                div class="grid gap-4 md:grid-cols-2" {
                    div {
                        label class="block text-sm font-medium text-gray-700" for="media_type" { "Media Type" }
                        select class=(INPUT) id="media_type" name="media_type" data-on-change=(PreEscaped(&rerender)) {
                            @for t in MediaType::ALL {
                                option value=(t.as_str()) selected[t == media_type] { (t.label()) }
                            }
                        }
                    }
                    div {
                        label class="block text-sm font-medium text-gray-700" for="status" { "Status" }
                        select class=(INPUT) id="status" name="status" {
                            @for s in TitleStatus::ALL {
                                option value=(s.as_str()) selected[s == draft.status] { (s.as_str()) }
                            }
                        }
                    }
                }

                div {
                    label class="block text-sm font-medium text-gray-700" for="native_title" { "Native Title" }
                    input class=(INPUT) type="text" id="native_title" name="native_title" value=(draft.native_title) required;
                    p class="mt-1 text-xs text-gray-500" { "Title in original language (e.g. 進撃の巨人)" }
                }

                div {
                    label class="block text-sm font-medium text-gray-700" for="known_as" { "Known As" }
                    input class=(INPUT) type="text" id="known_as" name="known_as" value=(draft.known_as) required;
                    p class="mt-1 text-xs text-gray-500" {
                        "If the romanji title is as popular as the English title, use romanji (e.g. Shingeki no Kyojin)."
                    }
                }

                div {
                    label class="block text-sm font-medium text-gray-700" for="synopsis" { "Synopsis" }
                    textarea class=(INPUT) id="synopsis" name="synopsis" rows="4" { (draft.synopsis) }
                    p class="mt-1 text-xs text-gray-500" { "May leave blank" }
                }

                div {
                    label class="block text-sm font-medium text-gray-700" for="cover_url" { "Cover Image URL" }
                    input class=(INPUT) type="url" id="cover_url" name="cover_url" value=(draft.cover_url) data-on-change=(PreEscaped(&rerender));
                    p class="mt-1 text-xs text-gray-500" {
                        "Enter a valid URL. If the image is wider than it is tall, it will auto-rotate."
                    }
                }

                div class="grid gap-4 md:grid-cols-2" {
                    div {
                        label class="block text-sm font-medium text-gray-700" for="release_date" { "Release Date" }
                        input class=(INPUT) type="date" id="release_date" name="release_date" value=(draft.release_date);
                    }
                    div {
                        label class="block text-sm font-medium text-gray-700" for="end_date" { "End Date" }
                        input class=(INPUT) type="date" id="end_date" name="end_date" value=(draft.end_date()) disabled[!draft.end_date_enabled()];
                        p class="mt-1 text-xs text-gray-500" { "If unknown, leave blank" }
                    }
                }

                @if let Some(error) = error {
                    p class="text-sm text-red-600" { (error) }
                }

                button class=(BUTTON) type="submit" { "Add Title" }
            }
        }
    }
}

const COVER_ONLOAD: &str = "const f = this.closest('form'); \
     f.cover_width.value = this.naturalWidth; f.cover_height.value = this.naturalHeight; \
     this.classList.toggle('rotate-90', this.dataset.rotatable === 'true' && this.naturalWidth > this.naturalHeight);";

fn field(label: &str, value: &str) -> Markup {
    html! {
        p { strong { (label) ":" } " " (value) }
    }
}

fn film_extras(extras: &TitleExtras) -> Markup {
    let companies: Vec<String> = extras.companies.iter().map(ToString::to_string).collect();

    html! {
        (field("Production Countries", &extras.countries.join(", ")))
        (field("Languages", &extras.languages.join(", ")))
        p {
            strong { "External Links:" }
            @for link in &extras.external_links {
                " "
                a class="text-blue-600 hover:text-blue-800" href=(link.url) target="_blank" rel="noopener noreferrer" {
                    (link.text())
                }
            }
        }
        p {
            strong { "Related Titles:" }
            @for related in &extras.related {
                " "
                a class="text-blue-600 hover:text-blue-800" href=(format!("/titles/{}", related.short_id)) {
                    (related.display_name())
                }
            }
        }
        (field("Production Companies", &companies.join(", ")))
    }
}

fn subtype_fields(subtype: &Subtype, content_rating: Option<&str>) -> Markup {
    match subtype {
        Subtype::Film(film) => html! {
            (field("Total Duration", &format!("{} min", film.total_duration)))
            (field("Content Rating", content_rating.unwrap_or("")))
        },
        Subtype::TvShow(show) => html! {
            (field("Episodes", &show.episode_count.to_string()))
            (field("Episode Duration", &format!("{} min", show.episode_duration)))
        },
        Subtype::Album(album) => html! {
            (field("Tracks", &album.track_count.to_string()))
            (field("Total Duration", &format!("{} min", album.total_duration)))
        },
        Subtype::Song(runtime) | Subtype::TvSegment(runtime) => {
            field("Duration", &format!("{} min", runtime.duration))
        },
        Subtype::StagePlay(play) => {
            field("Total Duration", &format!("{} min", play.total_duration))
        },
        Subtype::Drama | Subtype::Special | Subtype::Short | Subtype::Manga | Subtype::Book => {
            html! {}
        },
    }
}

pub fn profile_href(username: &str) -> String {
    format!("/profile/{}", urlencoding::encode(username))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        draft::TitleForm,
        models::{CompanyCredit, ExternalLink, RelatedTitle},
    };

    fn draft(media_type: &str) -> TitleDraft {
        TitleDraft::from_form(TitleForm {
            media_type: media_type.into(),
            native_title: "進撃の巨人".into(),
            known_as: "Shingeki no Kyojin".into(),
            end_date: "2026-01-01".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn end_date_input_disabled_for_single_releases() {
        let html = title_form_fragment(&draft("Film"), None);
        assert!(html.contains(r#"name="end_date" value="" disabled"#), "{html}");

        let html = title_form_fragment(&draft("TV_Show"), None);
        assert!(html.contains(r#"name="end_date" value="2026-01-01">"#), "{html}");
    }

    #[test]
    fn form_keeps_values_and_shows_error() {
        let html = title_form_fragment(&draft("Drama"), Some("duplicate key"));
        assert!(html.contains("Shingeki no Kyojin"));
        assert!(html.contains("duplicate key"));
        assert!(html.contains(r#"<option value="Drama" selected>Drama</option>"#));
    }

    fn detail(media_type: MediaType, extras: TitleExtras) -> TitleDetail {
        TitleDetail {
            id: "t1".into(),
            short_id: 1,
            media_type,
            native_title: "君の名は。".into(),
            known_as: "Your Name".into(),
            synopsis: None,
            status: TitleStatus::Finished,
            cover_image_url: None,
            release_date: Some("2016-08-26".into()),
            end_date: None,
            subtype: Some(Subtype::defaults(media_type)),
            content_rating: None,
            extras,
        }
    }

    #[test]
    fn film_page_lists_metadata() {
        let extras = TitleExtras {
            alt_titles: vec!["Kimi no Na wa".into()],
            countries: vec!["Japan".into()],
            languages: vec!["Japanese".into()],
            external_links: vec![ExternalLink {
                label: Some("Official".into()),
                url: "https://example.com".into(),
            }],
            related: vec![RelatedTitle {
                short_id: 7,
                native_title: "天気の子".into(),
                known_as: String::new(),
            }],
            companies: vec![CompanyCredit { name: "CoMix Wave Films".into(), role: None }],
        };
        let me =
            Profile { id: "u1".into(), username: "eren".into(), avatar_url: None, joined_at: 0 };
        let layout = Layout { viewer: Some(&me), default_avatar: "/a.jpg" };

        let html = title_page(layout, &detail(MediaType::Film, extras));
        assert!(html.contains("Kimi no Na wa"));
        assert!(html.contains("Japan"));
        assert!(html.contains(r#"href="https://example.com""#));
        assert!(html.contains(">Official<"));
        assert!(html.contains(r#"href="/titles/7""#));
        assert!(html.contains("天気の子"));
        assert!(html.contains("CoMix Wave Films"));

        let html = title_page(layout, &detail(MediaType::Manga, TitleExtras::default()));
        assert!(!html.contains("Production Countries"));
        assert!(!html.contains("Alt Titles"));
    }

    #[test]
    fn profile_links_are_escaped() {
        assert_eq!(profile_href("a b"), "/profile/a%20b");
    }
}
