//! Presentation helpers: percentages, preview snippets, and Markdown job cards
//! for clients that render text rather than JSON.

use serde::Serialize;
use serde_json::Value;

use crate::models::profile::JobRecommendation;
use crate::models::resume::ResumeLinks;

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    High,
    Medium,
    Low,
}

impl MatchTier {
    /// `percent` is on the 0-100 scale.
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 90.0 {
            MatchTier::High
        } else if percent >= 80.0 {
            MatchTier::Medium
        } else {
            MatchTier::Low
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            MatchTier::High => "🟢",
            MatchTier::Medium => "🟡",
            MatchTier::Low => "🟠",
        }
    }
}

/// 0.87 -> "87%".
pub fn format_match_score(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

/// First 200 characters followed by "..." when the text is longer.
pub fn resume_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// 12345 -> "12,345".
pub fn format_char_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn render_recommendations_markdown(jobs: &[JobRecommendation]) -> String {
    if jobs.is_empty() {
        return "No job recommendations available.\n".to_string();
    }

    let mut md = String::from("### 🎯 Job Recommendations\n\n---\n\n");
    for (i, job) in jobs.iter().enumerate() {
        let url = if job.application_url.is_empty() {
            "#"
        } else {
            job.application_url.as_str()
        };
        let score = format_match_score(job.match_score);
        let tier = MatchTier::from_percent(score.trim_end_matches('%').parse().unwrap_or(0.0));

        md.push_str(&format!(
            "#### {}. [{}]({url})\n\n\
             **🏢 {}**  \n\
             📍 {}  \n\
             **💰 {}**  \n\
             **📅 Posted: {}**  \n\
             **{} Match: {score}**\n\n\
             _Job ID: {}_\n\n",
            i + 1,
            job.title,
            job.company,
            job.location,
            or_na(&job.salary_range),
            job.date_posted,
            tier.badge(),
            job.job_id,
        ));

        if !job.description.is_empty() {
            md.push_str(&format!("**📝 Description:**\n\n{}\n\n", job.description));
        }
        if !job.requirements.is_empty() {
            md.push_str("**📋 Requirements:**\n\n");
            md.push_str(&bullets(&job.requirements));
            md.push('\n');
        }
        if !job.benefits.is_empty() {
            md.push_str("**🎁 Benefits:**\n\n");
            md.push_str(&bullets(&job.benefits));
            md.push('\n');
        }
        if !job.application_url.is_empty() {
            md.push_str(&format!(
                "[🔗 Apply for this position]({})\n\n",
                job.application_url
            ));
        }
        md.push_str("---\n\n");
    }
    md
}

pub fn render_links_markdown(links: &ResumeLinks) -> String {
    if links.is_empty() {
        return String::new();
    }

    let mut md = String::from("### 🔗 Extracted Links from Resume\n\n");
    if !links.github.profile.is_empty() || !links.github.project.is_empty() {
        md.push_str("**GitHub:**\n");
        for p in &links.github.profile {
            md.push_str(&format!("- Profile: [{p}]({p})\n"));
        }
        for p in &links.github.project {
            md.push_str(&format!("- Project: [{p}]({p})\n"));
        }
    }
    push_link_section(&mut md, "LinkedIn", &links.linkedin.profile, true);
    push_link_section(&mut md, "Portfolio", &links.portfolio, true);
    push_link_section(&mut md, "Email", &links.email, false);
    push_link_section(&mut md, "Other Links", &links.other, true);
    md
}

fn push_link_section(md: &mut String, title: &str, items: &[String], linked: bool) {
    if items.is_empty() {
        return;
    }
    md.push_str(&format!("**{title}:**\n"));
    for item in items {
        if linked {
            md.push_str(&format!("- [{item}]({item})\n"));
        } else {
            md.push_str(&format!("- {item}\n"));
        }
    }
}

fn bullets(items: &[String]) -> String {
    items.iter().map(|item| format!("- {item}\n")).collect()
}

fn or_na(s: &str) -> &str {
    if s.is_empty() {
        "N/A"
    } else {
        s
    }
}

/// Condensed view of whatever JSON the webhook returned.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct WebhookSummary {
    pub success: Option<bool>,
    pub timestamp: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub preferred_location: Option<String>,
    pub job_lines: Vec<String>,
}

pub fn summarize_webhook_response(response: &Value) -> WebhookSummary {
    let text = |v: Option<&Value>| -> Option<String> {
        v.map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    };

    let data = response.get("data");
    let field = |key: &str| text(data.and_then(|d| d.get(key)));

    let job_lines = data
        .and_then(|d| d.get("job_recommendations"))
        .and_then(Value::as_array)
        .map(|jobs| {
            jobs.iter()
                .enumerate()
                .map(|(i, job)| {
                    let get = |k: &str| text(job.get(k)).unwrap_or_else(|| "N/A".to_string());
                    format!(
                        "{}. {} at {} | Location: {} | Salary: {} | Match: {}",
                        i + 1,
                        get("title"),
                        get("company"),
                        get("location"),
                        get("salary_range"),
                        get("match_score"),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    WebhookSummary {
        success: response.get("success").and_then(Value::as_bool),
        timestamp: text(response.get("timestamp")),
        name: field("name"),
        email: field("email"),
        phone: field("phone"),
        preferred_location: field("preferred_location"),
        job_lines,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn job(score: f64) -> JobRecommendation {
        JobRecommendation {
            job_id: "JOB-12345".into(),
            title: "Backend Developer".into(),
            company: "Stripe".into(),
            location: "Remote".into(),
            description: "Build payment rails.".into(),
            date_posted: "2026-06-01".into(),
            salary_range: "$100,000 - $150,000".into(),
            requirements: vec!["Rust".into()],
            benefits: vec!["Health insurance".into()],
            match_score: score,
            application_url: "https://careers.stripe.com/jobs/JOB-12345".into(),
        }
    }

    #[test]
    fn test_format_match_score() {
        assert_eq!(format_match_score(0.87), "87%");
        assert_eq!(format_match_score(0.7), "70%");
        assert_eq!(format_match_score(0.95), "95%");
    }

    #[test]
    fn test_match_tier_thresholds() {
        assert_eq!(MatchTier::from_percent(90.0), MatchTier::High);
        assert_eq!(MatchTier::from_percent(89.9), MatchTier::Medium);
        assert_eq!(MatchTier::from_percent(80.0), MatchTier::Medium);
        assert_eq!(MatchTier::from_percent(79.0), MatchTier::Low);
        assert_eq!(MatchTier::High.badge(), "🟢");
    }

    #[test]
    fn test_resume_preview() {
        assert_eq!(resume_preview("short"), "short");
        let long = "é".repeat(250);
        let preview = resume_preview(&long);
        assert_eq!(preview.chars().count(), 203);
        assert!(preview.ends_with("..."));
        assert_eq!(resume_preview(&"a".repeat(200)), "a".repeat(200));
    }

    #[test]
    fn test_format_char_count() {
        assert_eq!(format_char_count(0), "0");
        assert_eq!(format_char_count(999), "999");
        assert_eq!(format_char_count(1000), "1,000");
        assert_eq!(format_char_count(1234567), "1,234,567");
    }

    #[test]
    fn test_render_recommendations_markdown() {
        let md = render_recommendations_markdown(&[job(0.91), job(0.75)]);
        assert!(md.contains("#### 1. [Backend Developer](https://careers.stripe.com/jobs/JOB-12345)"));
        assert!(md.contains("**🟢 Match: 91%**"));
        assert!(md.contains("**🟠 Match: 75%**"));
        assert!(md.contains("- Health insurance"));
        assert!(md.contains("[🔗 Apply for this position]"));
        assert!(md.contains(
            "**🏢 Stripe**  \n📍 Remote  \n**💰 $100,000 - $150,000**  \n**📅 Posted: 2026-06-01**  \n"
        ));
        assert!(md.contains(
            "**📋 Requirements:**\n\n- Rust\n\n**🎁 Benefits:**\n\n- Health insurance\n\n"
        ));
        assert!(md.ends_with("---\n\n"));
    }

    #[test]
    fn test_render_empty_recommendations() {
        assert_eq!(
            render_recommendations_markdown(&[]),
            "No job recommendations available.\n"
        );
    }

    #[test]
    fn test_render_links_markdown() {
        let mut links = ResumeLinks::default();
        assert_eq!(render_links_markdown(&links), "");
        links.github.profile.push("https://github.com/jane".into());
        links.email.push("jane@example.com".into());
        let md = render_links_markdown(&links);
        assert!(md.contains("- Profile: [https://github.com/jane](https://github.com/jane)"));
        assert!(md.contains("**Email:**\n- jane@example.com"));
    }

    #[test]
    fn test_summarize_webhook_response() {
        let resp = json!({
            "success": true,
            "timestamp": "2026-06-01T10:00:00",
            "data": {
                "name": "Jane Doe",
                "job_recommendations": [
                    {"title": "Data Analyst", "company": "Acme", "match_score": 0.8}
                ]
            }
        });
        let summary = summarize_webhook_response(&resp);
        assert_eq!(summary.success, Some(true));
        assert_eq!(summary.name.as_deref(), Some("Jane Doe"));
        assert!(summary.email.is_none());
        assert_eq!(
            summary.job_lines,
            vec!["1. Data Analyst at Acme | Location: N/A | Salary: N/A | Match: 0.8"]
        );
    }
}
