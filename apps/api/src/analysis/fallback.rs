//! Fallback Generator: builds a complete `AnalysisResult` straight from résumé text.
//!
//! Used whenever the model path cannot produce a valid result. There is no real
//! language understanding here: a few regexes pick out a name, a skills line,
//! and a career level, and fixed templates do the rest.
//!
//! Structure is a pure function of the text (titles, skill names, career path).
//! Scores and the choice of improvement suggestions come from the caller's RNG,
//! so a seeded RNG reproduces the whole result.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use crate::analysis::models::{
    AnalysisResult, CareerStage, IndustryMatch, JobMatch, ResumeScore, SkillComparison,
    SkillInsight,
};

static RE_NAME_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"Name:\s*([^\n]+)").unwrap());
static RE_LEADING_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][a-z]+\s[A-Z][a-z]+)").unwrap());
static RE_SKILLS_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"SKILLS[\s\S]*?([^\n]+)").unwrap());
static RE_SKILL_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;]").unwrap());

const DEFAULT_NAME: &str = "Candidate";
const DEFAULT_SKILLS_LINE: &str = "JavaScript, React, Node.js";

/// Skills most résumés are assumed to be missing, in priority order.
const COMMON_MISSING_SKILLS: [&str; 5] = [
    "Cloud Computing",
    "CI/CD",
    "Microservices",
    "Docker",
    "Kubernetes",
];

const MAX_SKILL_INSIGHTS: usize = 8;
const IMPROVEMENTS_TAKEN: usize = 5;

/// Fixed so career dates do not drift with the wall clock.
const REFERENCE_YEAR: u32 = 2025;

const IMPROVEMENT_POOL: [&str; 10] = [
    "Add more quantifiable achievements to showcase your impact (e.g., \"Increased sales by 20%\" rather than \"Increased sales\").",
    "Include specific tech-related keywords to improve your resume's visibility in ATS systems.",
    "Tailor your resume for each job application to highlight the most relevant experience.",
    "Add a strong professional summary at the top of your resume to grab the reader's attention.",
    "Consider adding a skills section that clearly lists your technical and soft skills.",
    "Use action verbs at the beginning of your bullet points to make your achievements more impactful.",
    "Keep your resume concise and focused on the most relevant experience for your target roles.",
    "Include relevant certifications and professional development to show your commitment to growth.",
    "Ensure your contact information is current and professional.",
    "Have your resume reviewed by a professional in your target industry for specific feedback.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareerLevel {
    Junior,
    Mid,
    Senior,
}

impl CareerLevel {
    /// "senior"/"lead" wins over "junior"/"intern"; neither means mid.
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("senior") || lower.contains("lead") {
            CareerLevel::Senior
        } else if lower.contains("junior") || lower.contains("intern") {
            CareerLevel::Junior
        } else {
            CareerLevel::Mid
        }
    }

    /// Three recommended roles, best match first.
    fn job_titles(self) -> [&'static str; 3] {
        match self {
            CareerLevel::Senior => ["Senior Software Engineer", "Lead Developer", "Software Architect"],
            CareerLevel::Junior => ["Junior Developer", "Frontend Developer", "QA Engineer"],
            CareerLevel::Mid => ["Software Developer", "Full Stack Developer", "DevOps Engineer"],
        }
    }

    /// Titles for the five career stages, oldest first.
    fn progression(self) -> [&'static str; 5] {
        match self {
            CareerLevel::Junior => [
                "Intern",
                "Junior Developer",
                "Developer",
                "Senior Developer",
                "Lead Developer",
            ],
            CareerLevel::Mid => [
                "Junior Developer",
                "Developer",
                "Senior Developer",
                "Lead Developer",
                "Software Architect",
            ],
            CareerLevel::Senior => [
                "Developer",
                "Senior Developer",
                "Lead Developer",
                "Software Architect",
                "CTO",
            ],
        }
    }
}

/// What the generator reads out of the résumé text.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProfile {
    pub name: String,
    pub skills: Vec<String>,
    pub career_level: CareerLevel,
}

impl CandidateProfile {
    pub fn from_text(text: &str) -> Self {
        let name = RE_NAME_LABEL
            .captures(text)
            .or_else(|| RE_LEADING_NAME.captures(text))
            .map(|c| c[1].trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        let skills_line = RE_SKILLS_LINE
            .captures(text)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| DEFAULT_SKILLS_LINE.to_string());
        let skills = RE_SKILL_SEPARATOR
            .split(&skills_line)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        CandidateProfile {
            name,
            skills,
            career_level: CareerLevel::detect(text),
        }
    }

    fn skill_or<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        self.skills.get(index).map(String::as_str).unwrap_or(default)
    }

    fn first_skills(&self, n: usize) -> Vec<String> {
        self.skills.iter().take(n).cloned().collect()
    }
}

/// Generates a full analysis from résumé text.
pub fn generate<R: Rng>(text: &str, rng: &mut R) -> AnalysisResult {
    let profile = CandidateProfile::from_text(text);
    generate_for_profile(&profile, rng)
}

pub fn generate_for_profile<R: Rng>(profile: &CandidateProfile, rng: &mut R) -> AnalysisResult {
    AnalysisResult {
        jobs: job_matches(profile, rng),
        skills: skill_insights(profile, rng),
        improvements: improvements(rng),
        industry_match: IndustryMatch {
            tech: rng.gen_range(80..=95),
            finance: rng.gen_range(60..=75),
            healthcare: rng.gen_range(50..=65),
            marketing: rng.gen_range(65..=80),
            education: rng.gen_range(55..=70),
            manufacturing: rng.gen_range(45..=60),
        },
        resume_score: ResumeScore {
            overall: rng.gen_range(75..=85),
            ats: rng.gen_range(70..=90),
            impact: rng.gen_range(65..=85),
            keyword: rng.gen_range(70..=85),
            readability: rng.gen_range(75..=90),
        },
        skill_comparisons: skill_comparisons(profile, rng),
        linkedin_bio: linkedin_bio(profile),
        career_path: career_path(profile),
    }
}

fn job_matches<R: Rng>(profile: &CandidateProfile, rng: &mut R) -> Vec<JobMatch> {
    let [first, second, third] = profile.career_level.job_titles();
    vec![
        JobMatch {
            title: first.to_string(),
            match_score: rng.gen_range(85..=95),
            description: format!(
                "This role aligns well with your {} skills and professional experience.",
                profile.skill_or(0, "technical")
            ),
        },
        JobMatch {
            title: second.to_string(),
            match_score: rng.gen_range(80..=90),
            description: format!(
                "Your background in {} makes you well-suited for this position.",
                profile.skill_or(1, "development")
            ),
        },
        JobMatch {
            title: third.to_string(),
            match_score: rng.gen_range(75..=85),
            description: format!(
                "This role leverages your skills in {}.",
                profile.skill_or(2, "problem-solving")
            ),
        },
    ]
}

fn skill_insights<R: Rng>(profile: &CandidateProfile, rng: &mut R) -> Vec<SkillInsight> {
    let mut insights: Vec<SkillInsight> = profile
        .skills
        .iter()
        .take(5)
        .map(|skill| SkillInsight {
            name: skill.clone(),
            importance: rng.gen_range(4..=5),
            description: "This is a core skill for the roles you're targeting.".to_string(),
        })
        .collect();

    for skill in COMMON_MISSING_SKILLS {
        if insights.len() >= MAX_SKILL_INSIGHTS {
            break;
        }
        if profile.skills.iter().any(|s| s == skill) {
            continue;
        }
        insights.push(SkillInsight {
            name: skill.to_string(),
            importance: rng.gen_range(3..=4),
            description: "Adding this skill could make you more competitive in the job market."
                .to_string(),
        });
    }

    insights
}

fn improvements<R: Rng>(rng: &mut R) -> Vec<String> {
    let mut pool = IMPROVEMENT_POOL;
    pool.shuffle(rng);
    pool.iter()
        .take(IMPROVEMENTS_TAKEN)
        .map(|s| s.to_string())
        .collect()
}

fn skill_comparisons<R: Rng>(profile: &CandidateProfile, rng: &mut R) -> Vec<SkillComparison> {
    let mut comparisons: Vec<SkillComparison> = profile
        .skills
        .iter()
        .take(4)
        .map(|skill| SkillComparison {
            name: skill.clone(),
            your_level: rng.gen_range(75..=90),
            required_level: rng.gen_range(70..=85),
        })
        .collect();

    // Always surface one gap.
    comparisons.push(SkillComparison {
        name: COMMON_MISSING_SKILLS[0].to_string(),
        your_level: rng.gen_range(40..=60),
        required_level: rng.gen_range(70..=85),
    });

    comparisons
}

fn linkedin_bio(profile: &CandidateProfile) -> String {
    let seniority = if profile.career_level == CareerLevel::Senior {
        "senior "
    } else {
        ""
    };
    let skilled_in = if profile.skills.is_empty() {
        "technology".to_string()
    } else {
        profile.first_skills(3).join(", ")
    };
    format!(
        "Experienced {seniority}software professional with a passion for {}. Skilled in {skilled_in}. \
         Looking for opportunities to leverage my expertise to drive business success.",
        profile.skill_or(0, "technology")
    )
}

fn career_path(profile: &CandidateProfile) -> Vec<CareerStage> {
    let titles = profile.career_level.progression();
    let skills = &profile.skills;
    let [cloud, cicd, microservices, ..] = COMMON_MISSING_SKILLS;
    let y = REFERENCE_YEAR;

    // Pads short skill lists with one filler skill rather than repeating.
    let at_least = |n: usize, filler: &str| -> Vec<String> {
        if skills.len() >= n {
            profile.first_skills(n)
        } else {
            let mut padded = skills.clone();
            padded.push(filler.to_string());
            padded
        }
    };

    let mut third_skills = profile.first_skills(2);
    third_skills.push(cloud.to_string());

    let mut fourth_skills = if skills.is_empty() {
        vec!["Leadership".to_string()]
    } else {
        profile.first_skills(1)
    };
    fourth_skills.extend([cloud.to_string(), cicd.to_string()]);

    let stage = |title: &str,
                 company: &str,
                 date: String,
                 description: &str,
                 skills: Vec<String>,
                 achievements: [&str; 2]| CareerStage {
        title: title.to_string(),
        company: company.to_string(),
        date,
        description: description.to_string(),
        skills,
        achievements: achievements.iter().map(|a| a.to_string()).collect(),
    };

    vec![
        stage(
            titles[0],
            "Previous Company",
            format!("{}-{}", y - 5, y - 3),
            "Worked on key projects in technology.",
            at_least(2, "Problem Solving"),
            ["Completed major projects", "Improved efficiency by 25%"],
        ),
        stage(
            titles[1],
            "Current Company",
            format!("{}-Present", y - 3),
            "Leading initiatives in technology.",
            at_least(3, "Communication"),
            ["Leading a team of 5 people", "Delivering key results"],
        ),
        stage(
            titles[2],
            "Future Company",
            format!("{}-{}", y + 2, y + 4),
            "Advancing skills in technology.",
            third_skills,
            ["Mastering new skills", "Taking on leadership responsibilities"],
        ),
        stage(
            titles[3],
            "Future Company",
            format!("{}-{}", y + 4, y + 6),
            "Growing expertise and influence.",
            fourth_skills,
            ["Leading teams", "Driving strategic initiatives"],
        ),
        stage(
            titles[4],
            "Dream Company",
            format!("{}-Future", y + 6),
            "Reaching career pinnacle.",
            vec![cloud.to_string(), cicd.to_string(), microservices.to_string()],
            ["Shaping company direction", "Mentoring future leaders"],
        ),
    ]
}
