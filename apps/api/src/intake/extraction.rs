//! Local analysis fallback: pulls name, phone, email and a location out of raw
//! resume text with priority-ordered regexes. Each field takes the first
//! pattern that matches; misses fall back to a placeholder.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::profile::{LocalAnalysis, NOT_FOUND, NOT_SPECIFIED};

/// Score assigned to every target position by the local engine.
pub const LOCAL_POSITION_SCORE: u32 = 75;

static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?m)^([A-Z][a-z]+ [A-Z][a-z]+(?: [A-Z][a-z]+)?)",
        r"Name[:\s]+([A-Z][a-z]+ [A-Z][a-z]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid name regex"))
    .collect()
});

static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d-\d{3}-\d{3}-\d{4})",
        r"(\(\d{3}\)\s*\d{3}-\d{4})",
        r"(\d{3}-\d{3}-\d{4})",
        r"(\d{10})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid phone regex"))
    .collect()
});

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})").expect("valid email regex")
});

static LOCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"([A-Z][a-z]+,\s*[A-Z]{2})", r"([A-Z][a-z]+ [A-Z]{2})"]
        .iter()
        .map(|p| Regex::new(p).expect("valid location regex"))
        .collect()
});

/// Phrases the location patterns pick up that are not places.
const LOCATION_FALSE_POSITIVES: &[&str] = &[
    "Security CC",
    "Computer Science",
    "Data Science",
    "Machine Learning",
    "Artificial Intelligence",
];

/// Vocabulary scanned for when exporting the user's profile.
const KNOWN_TECH_SKILLS: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "C++",
    "C#",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "SQL",
    "MongoDB",
    "PostgreSQL",
    "MySQL",
    "AWS",
    "Azure",
    "Docker",
    "Kubernetes",
    "Git",
    "Linux",
    "Machine Learning",
    "AI",
    "Data Science",
    "TensorFlow",
    "PyTorch",
    "Pandas",
    "NumPy",
    "Scikit-learn",
    "R",
    "Tableau",
    "Power BI",
    "Excel",
    "PowerPoint",
    "HTML",
    "CSS",
    "Bootstrap",
    "jQuery",
    "PHP",
    "Ruby",
    "Go",
    "Swift",
    "Kotlin",
    "Spring",
    "Django",
    "Flask",
    "Express",
    "Laravel",
    "Rails",
    "ASP.NET",
    "Redis",
    "Elasticsearch",
    "Apache",
    "Nginx",
    "Jenkins",
    "CI/CD",
    "Agile",
    "Scrum",
];

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    })
}

pub fn extract_name(text: &str) -> String {
    first_capture(&NAME_PATTERNS, text).unwrap_or_else(|| NOT_FOUND.to_string())
}

pub fn extract_phone(text: &str) -> String {
    first_capture(&PHONE_PATTERNS, text).unwrap_or_else(|| NOT_FOUND.to_string())
}

pub fn extract_email(text: &str) -> String {
    first_capture(std::slice::from_ref(&*EMAIL_PATTERN), text)
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

/// Scans each pattern's matches in order, skipping known false positives.
pub fn extract_location(text: &str) -> String {
    LOCATION_PATTERNS
        .iter()
        .find_map(|re| {
            re.captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().trim())
                .find(|candidate| !LOCATION_FALSE_POSITIVES.contains(candidate))
                .map(str::to_string)
        })
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

/// Runs every extractor over `text`. Every target position gets the fixed local score.
pub fn analyze_resume_local(text: &str, positions: &[String]) -> LocalAnalysis {
    let position_matches: BTreeMap<String, u32> = positions
        .iter()
        .map(|p| (p.clone(), LOCAL_POSITION_SCORE))
        .collect();

    LocalAnalysis {
        name: extract_name(text),
        phone: extract_phone(text),
        email: extract_email(text),
        preferred_location: extract_location(text),
        position_matches,
    }
}

/// Known technical skills mentioned anywhere in `text`, case-insensitively, in vocabulary order.
/// Short names such as "R" and "Go" match any occurrence of the letters.
pub fn extract_known_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    KNOWN_TECH_SKILLS
        .iter()
        .filter(|skill| lower.contains(&skill.to_lowercase()))
        .map(|s| s.to_string())
        .collect()
}
