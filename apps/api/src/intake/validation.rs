//! Form validation: required fields, list limits, contact formats, and the
//! keyword filters that keep course and certification names out of the
//! location, position and skill lists.
//!
//! Keyword checks are plain lowercase substring matches. Entries that exactly
//! match a catalog option always pass.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::FieldLimits;
use crate::models::catalog::{
    DOMAIN_PREFERENCES, STANDARD_LOCATIONS, STANDARD_POSITIONS, TECHNOLOGY_PREFERENCES,
    WORK_STYLE_PREFERENCES,
};
use crate::session::IntakeSession;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const ALLOWED_FILE_TYPES: &[&str] = &["pdf", "docx", "txt"];

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});
static CITY_STATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][a-z]+,\s*[A-Z]{2}").expect("valid city/state regex"));
static CITY_COUNTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z][a-z]+,\s*[A-Z][a-z]+").expect("valid city/country regex"));

const LOCATION_REJECT_KEYWORDS: &[&str] = &[
    "course",
    "class",
    "subject",
    "program",
    "degree",
    "major",
    "minor",
    "bachelor",
    "master",
    "phd",
    "doctorate",
    "certificate",
    "diploma",
    "computer science",
    "data science",
    "machine learning",
    "artificial intelligence",
    "engineering",
    "mathematics",
    "statistics",
    "business",
    "economics",
    "psychology",
    "biology",
    "chemistry",
    "physics",
    "literature",
    "history",
    "philosophy",
    "sociology",
    "political science",
    "international relations",
    "accounting",
    "finance",
    "marketing",
    "management",
    "human resources",
    "nursing",
    "medicine",
    "law",
    "education",
    "architecture",
    "design",
    "art",
    "music",
    "theater",
    "dance",
    "film",
    "journalism",
    "communication",
    // certifications, vendors and tools
    "cisco",
    "ccna",
    "ccnp",
    "ccie",
    "microsoft",
    "azure",
    "aws",
    "google",
    "oracle",
    "java",
    "python",
    "javascript",
    "react",
    "angular",
    "vue",
    "node",
    "express",
    "django",
    "flask",
    "spring",
    "hibernate",
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "docker",
    "kubernetes",
    "jenkins",
    "git",
    "github",
    "gitlab",
    "bitbucket",
    "jira",
    "confluence",
    "slack",
    "salesforce",
    "tableau",
    "power bi",
    "excel",
    "word",
    "powerpoint",
    "agile",
    "scrum",
    "kanban",
    "devops",
    "ci/cd",
    "api",
    "rest",
    "graphql",
];

const LOCATION_INDICATORS: &[&str] = &[
    "city", "town", "village", "county", "state", "province", "region", "country", "nation",
    "island", "peninsula", "coast", "valley", "mountain", "hill", "river", "lake", "bay", "gulf",
    "ocean", "remote", "hybrid", "onsite", "offsite", "virtual", "online",
];

const POSITION_REJECT_KEYWORDS: &[&str] = &[
    "course",
    "class",
    "subject",
    "program",
    "degree",
    "major",
    "minor",
    "bachelor",
    "master",
    "phd",
    "doctorate",
    "certificate",
    "diploma",
    "university",
    "college",
    "school",
    "institute",
    "academy",
    "training",
    "location",
    "address",
    "phone",
    "email",
    "contact",
    "resume",
    "cv",
    "experience",
    "skills",
    "education",
    "projects",
    "achievements",
];

const JOB_TITLE_INDICATORS: &[&str] = &[
    "engineer",
    "developer",
    "analyst",
    "manager",
    "director",
    "coordinator",
    "specialist",
    "consultant",
    "advisor",
    "assistant",
    "associate",
    "senior",
    "junior",
    "lead",
    "principal",
    "architect",
    "designer",
    "researcher",
    "scientist",
    "administrator",
    "supervisor",
    "executive",
    "officer",
    "representative",
    "agent",
    "technician",
    "operator",
    "clerk",
];

const PREFERENCE_REJECT_KEYWORDS: &[&str] = &[
    "course",
    "class",
    "subject",
    "program",
    "degree",
    "major",
    "minor",
    "bachelor",
    "master",
    "phd",
    "doctorate",
    "certificate",
    "diploma",
    "university",
    "college",
    "school",
    "institute",
    "academy",
    "training",
    "location",
    "address",
    "phone",
    "email",
    "contact",
    "resume",
    "cv",
    "experience",
    "education",
    "projects",
    "achievements",
    "name",
    "age",
];

/// Aggregated result of [`validate_all`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

fn first_keyword(haystack_lower: &str, keywords: &'static [&'static str]) -> Option<&'static str> {
    keywords.iter().copied().find(|k| haystack_lower.contains(k))
}

/// Returns the names of required fields that are still empty.
pub fn validate_required_fields(session: &IntakeSession) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if session.raw_resume_text.trim().is_empty() {
        missing.push("Resume text");
    }
    if session.preferred_locations.is_empty() {
        missing.push("Preferred locations");
    }
    if session.skills.is_empty() {
        missing.push("Skills");
    }
    missing
}

pub fn validate_max_counts(session: &IntakeSession, limits: &FieldLimits) -> Vec<String> {
    let checks = [
        ("Preferred locations", session.preferred_locations.len(), limits.max_locations),
        ("Target positions", session.target_positions.len(), limits.max_positions),
        ("Skills", session.skills.len(), limits.max_skills),
        ("Job types", session.selected_job_types.len(), limits.max_job_types),
    ];

    checks
        .into_iter()
        .filter(|(_, len, max)| len > max)
        .map(|(label, len, max)| format!("{label} ({len}) exceeds maximum of {max}"))
        .collect()
}

/// Checks an upload's size and extension before any parsing happens.
pub fn validate_file_upload(file_name: &str, size_bytes: usize) -> Result<(), String> {
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(format!(
            "File size ({:.1}MB) exceeds maximum allowed size (10MB)",
            size_bytes as f64 / 1024.0 / 1024.0
        ));
    }

    let extension = file_extension(file_name);
    if !ALLOWED_FILE_TYPES.contains(&extension.as_str()) {
        return Err(format!(
            "File type '{extension}' is not supported. Allowed types: {}",
            ALLOWED_FILE_TYPES.join(", ")
        ));
    }
    Ok(())
}

/// Lowercased text after the last dot, or the whole name when there is no dot.
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Empty input is accepted; the field is optional.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() || EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err("Invalid email format".to_string())
    }
}

/// Empty input is accepted. Otherwise 10 to 15 digits once punctuation is ignored.
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.is_empty() {
        return Ok(());
    }
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if (10..=15).contains(&digits) {
        Ok(())
    } else {
        Err("Phone number must be 10-15 digits".to_string())
    }
}

fn is_catalog_entry(value: &str, tables: &[&[&str]]) -> bool {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .any(|entry| entry.eq_ignore_ascii_case(value))
}

/// Blank input passes so callers can filter it out later.
pub fn validate_location(location: &str) -> Result<(), String> {
    let location = location.trim();
    if location.is_empty() || is_catalog_entry(location, &[STANDARD_LOCATIONS]) {
        return Ok(());
    }
    let lower = location.to_lowercase();

    if first_keyword(&lower, LOCATION_REJECT_KEYWORDS).is_some() {
        return Err(format!(
            "'{location}' appears to be a course/subject name, not a location"
        ));
    }

    let looks_geographic = first_keyword(&lower, LOCATION_INDICATORS).is_some()
        || CITY_STATE_RE.is_match(location)
        || CITY_COUNTRY_RE.is_match(location);

    if !looks_geographic && is_single_word(location) && location.chars().count() > 3 {
        return Err(format!(
            "'{location}' doesn't appear to be a valid location format"
        ));
    }
    Ok(())
}

pub fn validate_position(position: &str) -> Result<(), String> {
    let position = position.trim();
    if position.is_empty() || is_catalog_entry(position, &[STANDARD_POSITIONS]) {
        return Ok(());
    }
    let lower = position.to_lowercase();

    if first_keyword(&lower, POSITION_REJECT_KEYWORDS).is_some() {
        return Err(format!(
            "'{position}' appears to be a course/subject name, not a job position"
        ));
    }
    if first_keyword(&lower, JOB_TITLE_INDICATORS).is_none() && is_single_word(position) {
        return Err(format!("'{position}' doesn't appear to be a valid job position"));
    }
    Ok(())
}

/// Skills and free-form preferences share this check.
pub fn validate_preference(preference: &str) -> Result<(), String> {
    let preference = preference.trim();
    if preference.is_empty()
        || is_catalog_entry(
            preference,
            &[WORK_STYLE_PREFERENCES, TECHNOLOGY_PREFERENCES, DOMAIN_PREFERENCES],
        )
    {
        return Ok(());
    }
    let lower = preference.to_lowercase();

    if first_keyword(&lower, PREFERENCE_REJECT_KEYWORDS).is_some() {
        return Err(format!(
            "'{preference}' appears to be a course/subject name, not a job preference"
        ));
    }
    Ok(())
}

fn is_single_word(s: &str) -> bool {
    s.split_whitespace().count() == 1
}

fn validate_list(entries: &[String], check: fn(&str) -> Result<(), String>) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| check(entry).err().map(|msg| format!("{entry}: {msg}")))
        .collect()
}

pub fn validate_locations_list(locations: &[String]) -> Vec<String> {
    validate_list(locations, validate_location)
}

pub fn validate_positions_list(positions: &[String]) -> Vec<String> {
    validate_list(positions, validate_position)
}

pub fn validate_preferences_list(preferences: &[String]) -> Vec<String> {
    validate_list(preferences, validate_preference)
}

fn retain_valid(entries: &mut Vec<String>, check: fn(&str) -> Result<(), String>) {
    *entries = entries
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty() && check(e).is_ok())
        .map(str::to_string)
        .collect();
}

/// Drops invalid and blank entries from the list fields, trimming the survivors.
pub fn filter_valid_entries(session: &mut IntakeSession) {
    retain_valid(&mut session.preferred_locations, validate_location);
    retain_valid(&mut session.target_positions, validate_position);
    retain_valid(&mut session.skills, validate_preference);
}

/// Truncates every list field to its configured maximum.
pub fn enforce_max_counts(session: &mut IntakeSession, limits: &FieldLimits) {
    session.preferred_locations.truncate(limits.max_locations);
    session.target_positions.truncate(limits.max_positions);
    session.skills.truncate(limits.max_skills);
    session.selected_job_types.truncate(limits.max_job_types);
}

/// Filters the lists, then reports every remaining problem.
///
/// Because filtering runs first, the per-list sections only ever report on
/// entries that survived it, which in practice means none.
pub fn validate_all(session: &mut IntakeSession, limits: &FieldLimits) -> ValidationReport {
    filter_valid_entries(session);

    let mut errors: Vec<String> = validate_required_fields(session)
        .into_iter()
        .map(|field| format!("Missing required field: {field}"))
        .collect();

    errors.extend(validate_max_counts(session, limits));

    if let Err(e) = validate_email(&session.email) {
        errors.push(format!("Email validation error: {e}"));
    }
    if let Err(e) = validate_phone(&session.contact) {
        errors.push(format!("Phone validation error: {e}"));
    }

    errors.extend(
        validate_locations_list(&session.preferred_locations)
            .into_iter()
            .map(|e| format!("Location validation error: {e}")),
    );
    errors.extend(
        validate_positions_list(&session.target_positions)
            .into_iter()
            .map(|e| format!("Position validation error: {e}")),
    );
    errors.extend(
        validate_preferences_list(&session.skills)
            .into_iter()
            .map(|e| format!("Skill validation error: {e}")),
    );

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Silent pre-analysis gate: filter, truncate, then require the mandatory fields.
pub fn validate_form_before_analysis(session: &mut IntakeSession, limits: &FieldLimits) -> bool {
    filter_valid_entries(session);
    enforce_max_counts(session, limits);
    validate_required_fields(session).is_empty()
}
