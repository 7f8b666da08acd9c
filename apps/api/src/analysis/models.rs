//! The career analysis schema returned to clients, whichever stage produced it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const CAREER_STAGES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub jobs: Vec<JobMatch>,
    pub skills: Vec<SkillInsight>,
    pub improvements: Vec<String>,
    pub industry_match: IndustryMatch,
    pub resume_score: ResumeScore,
    pub skill_comparisons: Vec<SkillComparison>,
    pub linkedin_bio: String,
    pub career_path: Vec<CareerStage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub title: String,
    /// 0 – 100
    #[serde(rename = "match")]
    pub match_score: u8,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillInsight {
    pub name: String,
    /// 1 – 5
    pub importance: u8,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndustryMatch {
    pub tech: u8,
    pub finance: u8,
    pub healthcare: u8,
    pub marketing: u8,
    pub education: u8,
    pub manufacturing: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResumeScore {
    pub overall: u8,
    pub ats: u8,
    pub impact: u8,
    pub keyword: u8,
    pub readability: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillComparison {
    pub name: String,
    pub your_level: u8,
    pub required_level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerStage {
    pub title: String,
    pub company: String,
    pub date: String,
    pub description: String,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("object does not match the analysis shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("{field} is {value}, outside {min}..={max}")]
    OutOfRange {
        field: String,
        value: u8,
        min: u8,
        max: u8,
    },

    #[error("careerPath has {0} stages, expected 5")]
    CareerPathLength(usize),
}

impl AnalysisResult {
    /// Deserializes a recovered JSON object and checks every range constraint.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let result: AnalysisResult = serde_json::from_value(value)?;
        result.validate()?;
        Ok(result)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        for (i, job) in self.jobs.iter().enumerate() {
            check_percent(&format!("jobs[{i}].match"), job.match_score)?;
        }
        for (i, skill) in self.skills.iter().enumerate() {
            check_range(&format!("skills[{i}].importance"), skill.importance, 1, 5)?;
        }

        let im = &self.industry_match;
        for (key, value) in [
            ("tech", im.tech),
            ("finance", im.finance),
            ("healthcare", im.healthcare),
            ("marketing", im.marketing),
            ("education", im.education),
            ("manufacturing", im.manufacturing),
        ] {
            check_percent(&format!("industryMatch.{key}"), value)?;
        }

        let rs = &self.resume_score;
        for (key, value) in [
            ("overall", rs.overall),
            ("ats", rs.ats),
            ("impact", rs.impact),
            ("keyword", rs.keyword),
            ("readability", rs.readability),
        ] {
            check_percent(&format!("resumeScore.{key}"), value)?;
        }

        for (i, cmp) in self.skill_comparisons.iter().enumerate() {
            check_percent(&format!("skillComparisons[{i}].yourLevel"), cmp.your_level)?;
            check_percent(
                &format!("skillComparisons[{i}].requiredLevel"),
                cmp.required_level,
            )?;
        }

        if self.career_path.len() != CAREER_STAGES {
            return Err(SchemaError::CareerPathLength(self.career_path.len()));
        }

        Ok(())
    }
}

fn check_percent(field: &str, value: u8) -> Result<(), SchemaError> {
    check_range(field, value, 0, 100)
}

fn check_range(field: &str, value: u8, min: u8, max: u8) -> Result<(), SchemaError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SchemaError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        })
    }
}
