// Shared test fixtures for the analysis stages.

/// A well-formed model reply matching the analysis schema.
pub const MODEL_ANALYSIS_JSON: &str = r#"{
  "jobs": [
    {"title": "Staff Platform Engineer", "match": 92, "description": "Deep Go and Kubernetes background."},
    {"title": "Engineering Manager", "match": 81, "description": "Has led teams of six."}
  ],
  "skills": [
    {"name": "Go", "importance": 5, "description": "Primary language."},
    {"name": "Terraform", "importance": 3, "description": "Useful for infra roles."}
  ],
  "improvements": ["Quantify the migration outcome.", "Trim the summary to two lines."],
  "industryMatch": {"tech": 90, "finance": 70, "healthcare": 40, "marketing": 35, "education": 50, "manufacturing": 45},
  "resumeScore": {"overall": 82, "ats": 88, "impact": 74, "keyword": 80, "readability": 85},
  "skillComparisons": [
    {"name": "Go", "yourLevel": 88, "requiredLevel": 80},
    {"name": "Terraform", "yourLevel": 55, "requiredLevel": 75}
  ],
  "linkedinBio": "From the model: platform engineer who ships reliable infrastructure.",
  "careerPath": [
    {"title": "Backend Engineer", "company": "Acme", "date": "2016-2019", "description": "APIs.", "skills": ["Go"], "achievements": ["Cut p99 by 40%"]},
    {"title": "Senior Engineer", "company": "Globex", "date": "2019-Present", "description": "Platform.", "skills": ["Go", "Kubernetes"], "achievements": ["Led migration"]},
    {"title": "Staff Engineer", "company": "Target Co", "date": "2026-2028", "description": "Architecture.", "skills": ["Terraform"], "achievements": ["Own infra roadmap"]},
    {"title": "Principal Engineer", "company": "Target Co", "date": "2028-2031", "description": "Org-wide direction.", "skills": ["Strategy"], "achievements": ["Set standards"]},
    {"title": "VP Engineering", "company": "Dream Co", "date": "2031-Future", "description": "Leadership.", "skills": ["Hiring"], "achievements": ["Scale the org"]}
  ]
}"#;
