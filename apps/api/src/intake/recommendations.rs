//! Mock job recommendations sampled from two fixed template families, plus the
//! static resume tips shown next to them.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::profile::JobRecommendation;

pub const MIN_RECOMMENDATIONS: usize = 8;
pub const MAX_RECOMMENDATIONS: usize = 12;

const DATA_CATEGORY_KEYWORDS: &[&str] = &[
    "data",
    "ml",
    "machine learning",
    "ai",
    "analytics",
    "statistics",
];

const DEFAULT_LOCATIONS: &[&str] = &[
    "San Francisco, CA",
    "New York, NY",
    "Seattle, WA",
    "Austin, TX",
    "Boston, MA",
    "Remote",
];

const RESUME_TIPS: &[&str] = &[
    "Add more specific technical skills and certifications",
    "Include quantifiable achievements and metrics",
    "Optimize keywords for ATS (Applicant Tracking Systems)",
    "Highlight relevant project experience",
    "Include industry-specific terminology",
];

struct JobTemplate {
    titles: &'static [&'static str],
    companies: &'static [&'static str],
    descriptions: &'static [&'static str],
    requirements: &'static [&'static [&'static str]],
    benefits: &'static [&'static [&'static str]],
    salary_ranges: &'static [&'static str],
}

static SOFTWARE_TEMPLATE: JobTemplate = JobTemplate {
    titles: &[
        "Software Engineer",
        "Senior Software Engineer",
        "Full Stack Developer",
        "Backend Developer",
        "Frontend Developer",
    ],
    companies: &[
        "Google", "Microsoft", "Amazon", "Meta", "Apple", "Netflix", "Uber", "Airbnb", "Spotify",
        "Slack", "Zoom", "Salesforce", "Adobe", "Oracle", "IBM",
    ],
    descriptions: &[
        "We are looking for a talented software engineer to join our growing team. You will work on cutting-edge projects and collaborate with cross-functional teams to deliver high-quality software solutions.",
        "Join our engineering team to build scalable, high-performance applications. You'll work with modern technologies and have the opportunity to make a real impact on millions of users.",
        "We're seeking a passionate developer to help us build the next generation of our platform. You'll work on challenging problems and have the freedom to innovate and experiment.",
        "Come join our team and help us build amazing products that users love. We offer a collaborative environment where you can grow your skills and advance your career.",
        "We're looking for a skilled engineer to join our team and help us scale our platform. You'll work with cutting-edge technologies and have the opportunity to learn from industry experts.",
    ],
    requirements: &[
        &[
            "Bachelor's degree in Computer Science or related field",
            "3+ years of software development experience",
            "Proficiency in Python/Java/JavaScript",
            "Experience with cloud platforms (AWS/GCP/Azure)",
            "Strong problem-solving skills",
        ],
        &[
            "Master's degree in Computer Science",
            "5+ years of experience",
            "Expertise in microservices architecture",
            "Experience with Docker and Kubernetes",
            "Strong leadership skills",
        ],
        &[
            "Bachelor's degree",
            "2+ years of experience",
            "Proficiency in React/Angular/Vue",
            "Experience with RESTful APIs",
            "Knowledge of version control systems",
        ],
        &[
            "Computer Science degree",
            "4+ years of experience",
            "Experience with databases (SQL/NoSQL)",
            "Knowledge of CI/CD pipelines",
            "Strong communication skills",
        ],
        &[
            "Relevant degree",
            "1+ years of experience",
            "Basic programming skills",
            "Eagerness to learn",
            "Team player attitude",
        ],
    ],
    benefits: &[
        &[
            "Competitive salary",
            "Health insurance",
            "401k matching",
            "Flexible work hours",
            "Remote work options",
        ],
        &[
            "Stock options",
            "Unlimited PTO",
            "Learning budget",
            "Gym membership",
            "Catered meals",
        ],
        &[
            "Health benefits",
            "Dental insurance",
            "Vision insurance",
            "Life insurance",
            "Disability insurance",
        ],
        &[
            "Professional development",
            "Conference attendance",
            "Mentorship programs",
            "Career growth opportunities",
            "Team building events",
        ],
        &[
            "Work-life balance",
            "Mental health support",
            "Employee assistance program",
            "Commuter benefits",
            "Pet-friendly office",
        ],
    ],
    salary_ranges: &[
        "$80,000 - $120,000",
        "$120,000 - $180,000",
        "$100,000 - $150,000",
        "$90,000 - $140,000",
        "$70,000 - $110,000",
    ],
};

static DATA_TEMPLATE: JobTemplate = JobTemplate {
    titles: &[
        "Data Scientist",
        "Senior Data Scientist",
        "Machine Learning Engineer",
        "Data Analyst",
        "Research Scientist",
    ],
    companies: &[
        "Tesla", "OpenAI", "Anthropic", "Palantir", "Databricks", "Snowflake", "MongoDB", "Elastic",
        "Confluent", "HashiCorp", "GitLab", "Atlassian", "Twilio", "Stripe", "Square",
    ],
    descriptions: &[
        "We're looking for a data scientist to help us extract insights from large datasets and build machine learning models that drive business decisions.",
        "Join our data science team to work on cutting-edge ML projects. You'll have the opportunity to work with state-of-the-art algorithms and massive datasets.",
        "We're seeking a talented ML engineer to help us build and deploy machine learning models at scale. You'll work with our engineering team to integrate ML solutions into our products.",
        "Come join our analytics team and help us make data-driven decisions. You'll work with stakeholders across the company to understand business needs and provide actionable insights.",
        "We're looking for a research scientist to push the boundaries of what's possible with AI and machine learning. You'll have the freedom to explore new ideas and publish your work.",
    ],
    requirements: &[
        &[
            "PhD in Data Science/ML/Statistics",
            "5+ years of ML experience",
            "Expertise in Python/R",
            "Experience with deep learning frameworks",
            "Strong mathematical background",
        ],
        &[
            "Master's degree in relevant field",
            "3+ years of experience",
            "Proficiency in SQL",
            "Experience with cloud ML platforms",
            "Strong analytical skills",
        ],
        &[
            "Bachelor's degree",
            "2+ years of experience",
            "Knowledge of statistics",
            "Experience with data visualization",
            "Strong communication skills",
        ],
        &[
            "Relevant degree",
            "1+ years of experience",
            "Basic programming skills",
            "Eagerness to learn",
            "Attention to detail",
        ],
        &[
            "PhD in Computer Science",
            "Research experience",
            "Publications in top venues",
            "Expertise in multiple ML domains",
            "Strong problem-solving skills",
        ],
    ],
    benefits: &[
        &[
            "Competitive salary",
            "Stock options",
            "Health insurance",
            "401k matching",
            "Flexible schedule",
        ],
        &[
            "Research budget",
            "Conference attendance",
            "Publication support",
            "Collaboration opportunities",
            "Cutting-edge projects",
        ],
        &[
            "Learning opportunities",
            "Mentorship",
            "Career development",
            "Team collaboration",
            "Innovation time",
        ],
        &[
            "Health benefits",
            "Dental insurance",
            "Vision insurance",
            "Life insurance",
            "Disability insurance",
        ],
        &[
            "Work-life balance",
            "Mental health support",
            "Employee assistance",
            "Commuter benefits",
            "Pet-friendly office",
        ],
    ],
    salary_ranges: &[
        "$120,000 - $200,000",
        "$100,000 - $160,000",
        "$90,000 - $140,000",
        "$80,000 - $130,000",
        "$150,000 - $300,000",
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobCategory {
    Software,
    Data,
}

impl JobCategory {
    /// Data when any keyword occurs in the space-joined positions and skills, lowercased.
    /// Matching is by substring, so e.g. "html" counts as "ml".
    pub fn infer(target_positions: &[String], skills: &[String]) -> Self {
        let joined = target_positions
            .iter()
            .chain(skills)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if DATA_CATEGORY_KEYWORDS.iter().any(|k| joined.contains(k)) {
            JobCategory::Data
        } else {
            JobCategory::Software
        }
    }

    fn template(self) -> &'static JobTemplate {
        match self {
            JobCategory::Software => &SOFTWARE_TEMPLATE,
            JobCategory::Data => &DATA_TEMPLATE,
        }
    }
}

/// What the generator needs from the user's form.
#[derive(Debug, Clone, Default)]
pub struct RecommendationInput<'a> {
    pub target_positions: &'a [String],
    pub skills: &'a [String],
    pub locations: &'a [String],
}

fn pick<'t, T: ?Sized, R: Rng + ?Sized>(rng: &mut R, items: &'t [&'t T]) -> &'t T {
    // Template tables are non-empty constants.
    items.choose(rng).copied().unwrap_or_else(|| items[0])
}

/// Generates 8 to 12 recommendations sorted by descending match score.
pub fn generate_job_recommendations<R: Rng + ?Sized>(
    input: &RecommendationInput<'_>,
    rng: &mut R,
    today: NaiveDate,
) -> Vec<JobRecommendation> {
    let template = JobCategory::infer(input.target_positions, input.skills).template();
    let count = rng.gen_range(MIN_RECOMMENDATIONS..=MAX_RECOMMENDATIONS);

    let mut jobs: Vec<JobRecommendation> = (0..count)
        .map(|_| {
            let job_id = format!("JOB-{}", rng.gen_range(10_000..=99_999));
            let title = pick(rng, template.titles);
            let company = pick(rng, template.companies);
            let description = pick(rng, template.descriptions);
            let requirements = pick(rng, template.requirements);
            let benefits = pick(rng, template.benefits);
            let salary_range = pick(rng, template.salary_ranges);

            let location = match input.locations.choose(rng) {
                Some(loc) => loc.clone(),
                None => pick(rng, DEFAULT_LOCATIONS).to_string(),
            };

            let days_ago = rng.gen_range(1..=30);
            let date_posted = (today - Duration::days(days_ago))
                .format("%Y-%m-%d")
                .to_string();

            let raw_score: f64 = rng.gen_range(0.70..=0.95);
            let match_score = (raw_score * 100.0).round() / 100.0;

            JobRecommendation {
                application_url: format!(
                    "https://careers.{}.com/jobs/{job_id}",
                    company.to_lowercase()
                ),
                job_id,
                title: title.to_string(),
                company: company.to_string(),
                location,
                description: description.to_string(),
                date_posted,
                salary_range: salary_range.to_string(),
                requirements: requirements.iter().map(|s| s.to_string()).collect(),
                benefits: benefits.iter().map(|s| s.to_string()).collect(),
                match_score,
            }
        })
        .collect();

    jobs.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    jobs
}

pub fn resume_tips() -> Vec<String> {
    RESUME_TIPS.iter().map(|s| s.to_string()).collect()
}
