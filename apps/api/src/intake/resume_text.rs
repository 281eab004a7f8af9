use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_RESUME_CHARS: usize = 50;
pub const MAX_RESUME_CHARS: usize = 50_000;

/// Words of which a resume is expected to contain at least two.
const RESUME_KEYWORDS: &[&str] = &[
    "experience",
    "education",
    "skills",
    "work",
    "job",
    "position",
    "company",
];
const MIN_RESUME_KEYWORDS: usize = 2;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s@.-]").expect("valid regex"));
static UNSAFE_ID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w-]").expect("valid regex"));

/// Collapses whitespace runs to single spaces, then blanks out anything that is
/// not a word character, whitespace, `@`, `.` or `-`.
pub fn clean_resume_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    DISALLOWED_CHARS
        .replace_all(&collapsed, " ")
        .trim()
        .to_string()
}

/// Heuristic check that `text` is a resume and not some other document.
pub fn validate_resume_text(text: &str) -> Result<(), String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("Resume text is empty".to_string());
    }

    let chars = trimmed.chars().count();
    if chars < MIN_RESUME_CHARS {
        return Err(format!(
            "Resume text is too short (minimum {MIN_RESUME_CHARS} characters)"
        ));
    }
    if chars > MAX_RESUME_CHARS {
        return Err("Resume text is too long (maximum 50,000 characters)".to_string());
    }

    let lower = text.to_lowercase();
    let hits = RESUME_KEYWORDS
        .iter()
        .filter(|k| lower.contains(**k))
        .count();
    if hits < MIN_RESUME_KEYWORDS {
        return Err(
            "Text doesn't appear to be a resume (missing common resume keywords)".to_string(),
        );
    }
    Ok(())
}

/// `<sanitized stem>_<YYYYmmdd_HHMMSS>`, where the stem is the file name minus
/// its last extension with every character outside `[\w-]` replaced by `_`.
pub fn derive_document_id(file_name: &str, now: NaiveDateTime) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => file_name,
    };
    let safe = UNSAFE_ID_CHARS.replace_all(stem, "_");
    format!("{safe}_{}", now.format("%Y%m%d_%H%M%S"))
}
