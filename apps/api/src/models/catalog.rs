//! Standard option lists offered to the user when filling in preferences.

pub const STANDARD_LOCATIONS: &[&str] = &[
    "New York, NY",
    "San Francisco, CA",
    "Los Angeles, CA",
    "Chicago, IL",
    "Boston, MA",
    "Seattle, WA",
    "Austin, TX",
    "Denver, CO",
    "Atlanta, GA",
    "Miami, FL",
    "Dallas, TX",
    "Phoenix, AZ",
    "Philadelphia, PA",
    "Houston, TX",
    "San Diego, CA",
    "Portland, OR",
    "Nashville, TN",
    "Orlando, FL",
    "Las Vegas, NV",
    "Tampa, FL",
    "Remote",
    "Hybrid",
];

pub const STANDARD_POSITIONS: &[&str] = &[
    "Software Engineer",
    "Data Scientist",
    "Product Manager",
    "UX Designer",
    "DevOps Engineer",
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Developer",
    "Machine Learning Engineer",
    "Data Analyst",
    "Business Analyst",
    "Project Manager",
    "Marketing Manager",
    "Sales Representative",
    "HR Specialist",
    "Financial Analyst",
    "Consultant",
    "Research Scientist",
    "Technical Writer",
    "Quality Assurance Engineer",
];

pub const JOB_TYPES: &[&str] = &["Full Time", "Part Time", "Internship", "Contract"];

pub const JOB_LEVELS: &[&str] = &["Entry Level", "Mid Level", "Senior Level"];

pub const WORK_STYLE_PREFERENCES: &[&str] = &[
    "Remote Work",
    "Hybrid Work",
    "Flexible Hours",
    "Startup Environment",
    "Corporate Environment",
    "Fast-paced",
    "Collaborative",
    "Independent Work",
];

pub const TECHNOLOGY_PREFERENCES: &[&str] = &[
    "Python",
    "JavaScript",
    "React",
    "Node.js",
    "Java",
    "C++",
    "Machine Learning",
    "Artificial Intelligence",
    "Cloud Computing",
    "DevOps",
    "Agile",
    "Scrum",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "Google Cloud",
    "SQL",
    "NoSQL",
];

pub const DOMAIN_PREFERENCES: &[&str] = &[
    "Fintech",
    "Healthcare",
    "E-commerce",
    "Education",
    "Gaming",
    "Social Media",
    "Cybersecurity",
    "Blockchain",
    "IoT",
    "Mobile Development",
    "Web Development",
    "Data Science",
    "Analytics",
    "Business Intelligence",
    "Automation",
];

/// Every standard skill/preference, in display order.
pub fn all_standard_preferences() -> Vec<&'static str> {
    WORK_STYLE_PREFERENCES
        .iter()
        .chain(TECHNOLOGY_PREFERENCES)
        .chain(DOMAIN_PREFERENCES)
        .copied()
        .collect()
}
