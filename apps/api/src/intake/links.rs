use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::models::resume::ResumeLinks;

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("valid link regex")
}

static GITHUB_PROFILE: Lazy<Regex> =
    Lazy::new(|| ci(r"https?://(?:www\.)?github\.com/([^/]+)/?$"));
static GITHUB_PROJECT: Lazy<Regex> =
    Lazy::new(|| ci(r"https?://(?:www\.)?github\.com/([^/]+)/([^/]+)"));
static LINKEDIN_PROFILE: Lazy<Regex> =
    Lazy::new(|| ci(r"https?://(?:www\.)?linkedin\.com/in/([^/]+)/?$"));
static MAILTO: Lazy<Regex> = Lazy::new(|| ci(r"mailto:([^?]+)"));
static GITHUB_PAGES: Lazy<Regex> = Lazy::new(|| ci(r"https?://([^/]+)\.github\.io/?"));

/// Anything that looks like a URL or mailto target in running text.
static URL_IN_TEXT: Lazy<Regex> =
    Lazy::new(|| ci(r#"(?:https?://|mailto:)[^\s<>"'()\[\]{}]+"#));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkCategory {
    GithubProfile,
    GithubProject,
    Linkedin,
    Portfolio,
    Email,
    Other,
}

/// Classifies `url`, returning the category and the value to store.
/// For `mailto:` links the stored value is the bare address.
pub fn categorize_link(url: &str) -> (LinkCategory, String) {
    if LINKEDIN_PROFILE.is_match(url) {
        return (LinkCategory::Linkedin, url.to_string());
    }
    if GITHUB_PAGES.is_match(url) {
        return (LinkCategory::Portfolio, url.to_string());
    }
    if GITHUB_PROFILE.is_match(url) {
        return (LinkCategory::GithubProfile, url.to_string());
    }
    if GITHUB_PROJECT.is_match(url) {
        return (LinkCategory::GithubProject, url.to_string());
    }
    if let Some(caps) = MAILTO.captures(url) {
        if let Some(address) = caps.get(1) {
            return (LinkCategory::Email, address.as_str().to_string());
        }
    }
    (LinkCategory::Other, url.to_string())
}

impl ResumeLinks {
    pub fn push(&mut self, url: &str) {
        let (category, value) = categorize_link(url);
        let bucket = match category {
            LinkCategory::GithubProfile => &mut self.github.profile,
            LinkCategory::GithubProject => &mut self.github.project,
            LinkCategory::Linkedin => &mut self.linkedin.profile,
            LinkCategory::Portfolio => &mut self.portfolio,
            LinkCategory::Email => &mut self.email,
            LinkCategory::Other => &mut self.other,
        };
        bucket.push(value);
    }
}

pub fn categorize_links<'a>(urls: impl IntoIterator<Item = &'a str>) -> ResumeLinks {
    let mut links = ResumeLinks::default();
    for url in urls {
        links.push(url);
    }
    links
}

/// Finds URLs written out in `text` and buckets them.
/// Trailing sentence punctuation is not considered part of a URL.
pub fn extract_links_from_text(text: &str) -> ResumeLinks {
    let urls: Vec<&str> = URL_IN_TEXT
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':']))
        .collect();
    categorize_links(urls)
}
