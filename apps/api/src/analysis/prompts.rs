// Career analysis prompt templates.

pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert resume analyzer and career advisor. Analyze the following resume and provide detailed feedback in JSON format.

RESUME:
{resume_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "jobs": [{ "title": "Job Title", "match": 95, "description": "Why this job is a good match" }],
  "skills": [{ "name": "Skill Name", "importance": 5, "description": "Why this skill is important" }],
  "improvements": ["Improvement suggestion 1", "Improvement suggestion 2"],
  "industryMatch": { "tech": 85, "finance": 65, "healthcare": 45, "marketing": 70, "education": 60, "manufacturing": 50 },
  "resumeScore": { "overall": 78, "ats": 85, "impact": 70, "keyword": 82, "readability": 75 },
  "skillComparisons": [{ "name": "Skill", "yourLevel": 90, "requiredLevel": 80 }],
  "linkedinBio": "Suggested LinkedIn bio",
  "careerPath": [{ "title": "Current/Past Position", "company": "Company Name", "date": "Date Range", "description": "Description", "skills": ["Skill1", "Skill2"], "achievements": ["Achievement1", "Achievement2"] }]
}

RULES:
1. Every score is a whole number. "match", "yourLevel", "requiredLevel" and every industryMatch/resumeScore value are between 0 and 100.
2. "importance" is a whole number between 1 and 5.
3. industryMatch and resumeScore contain exactly the keys shown above.
4. careerPath has exactly 5 entries ordered from earliest to furthest future stage.
5. Make the analysis detailed, personalized, and actionable.
6. Return ONLY the JSON object: no markdown, no code fences, no comments."#;

pub fn analysis_prompt(resume_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}
