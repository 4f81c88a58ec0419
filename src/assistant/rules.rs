// src/assistant/rules.rs
//! Rule-based career assistant answers built from the seeker's own profile

use serde::Serialize;
use serde_json::{json, Value};

use crate::profile::models::{ResumeAnalysis, SeekerProfile};

const HIGH_DEMAND_SKILLS: [&str; 8] = [
    "python", "javascript", "react", "aws", "docker", "kubernetes", "machine learning", "ai",
];

const SECTION_HEADINGS: [&str; 10] = [
    "experience", "work experience", "employment", "skills", "projects", "summary",
    "certifications", "contact", "references", "languages",
];

const DEGREE_HINTS: [&str; 10] = [
    "bachelor", "master", "phd", "bsc", "msc", "b.sc", "m.sc", "degree", "university", "college",
];

const EXPERIENCE_EXCERPT_CHARS: usize = 300;
const CONTEXT_RESUME_CHARS: usize = 500;

/// What the assistant knows about the person asking
#[derive(Debug, Clone, Default)]
pub struct AssistantProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub resume_text: String,
    pub education: Option<String>,
    pub analysis: Option<ResumeAnalysis>,
}

impl AssistantProfile {
    pub fn new(profile: &SeekerProfile, analysis: Option<ResumeAnalysis>) -> Self {
        let resume_text = profile.resume_text().trim().to_string();
        Self {
            name: profile.full_name(),
            email: profile.email.clone().filter(|e| !e.trim().is_empty()),
            phone: profile.phone.clone().filter(|p| !p.trim().is_empty()),
            skills: profile.skills_list(),
            education: extract_education(&resume_text),
            resume_text,
            analysis,
        }
    }

    /// Profile summary handed to the language model
    pub fn context(&self) -> Value {
        json!({
            "name": self.name,
            "email": self.email,
            "phone": self.phone,
            "skills": self.skills,
            "education": self.education,
            "resume_summary": truncate_chars(&self.resume_text, CONTEXT_RESUME_CHARS),
            "extracted_skills": self.analysis.as_ref().map(|a| a.extracted_skills.clone()),
            "resume_quality_score": self.analysis.as_ref().map(|a| a.quality_score),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Skills,
    Experience,
    Education,
    Salary,
    CareerAdvice,
    General,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Salary => "salary",
            Self::CareerAdvice => "career_advice",
            Self::General => "general",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub confidence: f64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioned_skills: Option<Vec<String>>,
    pub source: &'static str,
}

impl ChatReply {
    fn rules(kind: QuestionKind, confidence: f64, response: String) -> Self {
        Self {
            response,
            confidence,
            kind: kind.as_str(),
            mentioned_skills: None,
            source: "rules",
        }
    }

    pub fn error() -> Self {
        Self {
            response: "I'm having trouble processing your question right now. Please try again later.".to_string(),
            confidence: 0.0,
            kind: "error",
            mentioned_skills: None,
            source: "rules",
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn mentions_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn heading(line: &str) -> String {
    line.trim().trim_end_matches(':').trim().to_lowercase()
}

/// Lines of the resume's education section, or failing that the lines that
/// mention a degree or institution.
pub fn extract_education(resume_text: &str) -> Option<String> {
    let lines: Vec<&str> = resume_text.lines().map(str::trim).collect();

    if let Some(start) = lines.iter().position(|l| heading(l) == "education") {
        let section: Vec<&str> = lines[start + 1..]
            .iter()
            .take_while(|l| !SECTION_HEADINGS.contains(&heading(l).as_str()))
            .filter(|l| !l.is_empty())
            .copied()
            .collect();
        if !section.is_empty() {
            return Some(section.join("; "));
        }
    }

    let hinted: Vec<&str> = lines
        .iter()
        .filter(|l| {
            let lower = l.to_lowercase();
            DEGREE_HINTS.iter().any(|hint| lower.contains(hint))
        })
        .take(3)
        .copied()
        .collect();
    if hinted.is_empty() {
        None
    } else {
        Some(hinted.join("; "))
    }
}

/// Keyword classification; the first matching group wins.
pub fn classify(question: &str) -> QuestionKind {
    let q = question.to_lowercase();

    if mentions_any(&q, &["skill", "skills", "technology", "tech"]) {
        QuestionKind::Skills
    } else if mentions_any(&q, &["experience", "work", "job", "career"]) {
        QuestionKind::Experience
    } else if mentions_any(&q, &["education", "degree", "university", "college"]) {
        QuestionKind::Education
    } else if mentions_any(&q, &["salary", "pay", "compensation", "money"]) {
        QuestionKind::Salary
    } else if mentions_any(&q, &["position", "role", "career advice"]) {
        QuestionKind::CareerAdvice
    } else {
        QuestionKind::General
    }
}

pub fn answer(question: &str, profile: &AssistantProfile) -> ChatReply {
    answer_as(classify(question), question, profile)
}

pub fn answer_as(kind: QuestionKind, question: &str, profile: &AssistantProfile) -> ChatReply {
    match kind {
        QuestionKind::Skills => skills_answer(question, profile),
        QuestionKind::Experience => experience_answer(profile),
        QuestionKind::Education => education_answer(profile),
        QuestionKind::Salary => salary_answer(profile),
        QuestionKind::CareerAdvice => career_answer(profile),
        QuestionKind::General => general_answer(question),
    }
}

fn skills_answer(question: &str, profile: &AssistantProfile) -> ChatReply {
    let skills = &profile.skills;
    if skills.is_empty() {
        return ChatReply::rules(
            QuestionKind::Skills,
            0.8,
            "I don't see any skills listed in your profile yet. You can add your skills in the profile section to get personalized advice.".to_string(),
        );
    }

    let q = question.to_lowercase();
    let mentioned: Vec<String> = skills
        .iter()
        .filter(|s| q.contains(&s.to_lowercase()))
        .cloned()
        .collect();

    let response = if mentioned.is_empty() {
        let mut response = format!(
            "Your current skills include {}. ",
            skills.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
        );
        if skills.len() > 5 {
            response.push_str(&format!(
                "You have {} total skills listed in your profile.",
                skills.len()
            ));
        }
        response
    } else {
        let mut response = format!(
            "Based on your profile, you have experience with {}. ",
            mentioned.join(", ")
        );
        if mentioned.len() == 1 {
            response.push_str(&format!(
                "{} is a valuable skill in today's job market. ",
                mentioned[0]
            ));
        }
        let others: Vec<String> = skills
            .iter()
            .filter(|s| !mentioned.contains(s))
            .take(3)
            .cloned()
            .collect();
        response.push_str(&format!("Your other skills include {}.", others.join(", ")));
        response
    };

    let mut reply = ChatReply::rules(QuestionKind::Skills, 0.9, response);
    reply.mentioned_skills = Some(mentioned);
    reply
}

fn experience_answer(profile: &AssistantProfile) -> ChatReply {
    let response = if profile.resume_text.is_empty() {
        "I don't see any work experience details in your profile. You can add your experience in the profile section to get better career advice.".to_string()
    } else {
        format!(
            "Based on your profile, here's what I can tell you about your experience: {}...",
            truncate_chars(&profile.resume_text, EXPERIENCE_EXCERPT_CHARS)
        )
    };
    ChatReply::rules(QuestionKind::Experience, 0.8, response)
}

fn education_answer(profile: &AssistantProfile) -> ChatReply {
    match &profile.education {
        Some(education) => ChatReply::rules(
            QuestionKind::Education,
            0.9,
            format!("Based on your profile, your educational background includes: {}", education),
        ),
        None => ChatReply::rules(
            QuestionKind::Education,
            0.8,
            "I don't see any education details in your profile. You can add your educational background in the profile section.".to_string(),
        ),
    }
}

fn salary_answer(profile: &AssistantProfile) -> ChatReply {
    let in_demand: Vec<&str> = profile
        .skills
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            HIGH_DEMAND_SKILLS.iter().any(|hd| lower.contains(hd))
        })
        .map(String::as_str)
        .collect();

    let response = if in_demand.is_empty() {
        "Salary expectations depend on many factors including your skills, experience, location, and the specific role. I'd recommend researching current market rates for your field and experience level.".to_string()
    } else {
        format!(
            "Based on your skills in {}, you're likely in a high-demand field. Salary expectations can vary based on location, experience, and company size. I'd recommend researching current market rates for your specific skills and experience level.",
            in_demand.iter().take(3).copied().collect::<Vec<_>>().join(", ")
        )
    };
    ChatReply::rules(QuestionKind::Salary, 0.7, response)
}

fn career_answer(profile: &AssistantProfile) -> ChatReply {
    let skills = &profile.skills;
    if skills.is_empty() {
        return ChatReply::rules(
            QuestionKind::CareerAdvice,
            0.8,
            "To provide better career advice, I'd need to know more about your skills and experience. Please complete your profile with your skills and work experience.".to_string(),
        );
    }

    let lowered: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();
    let has = |needles: &[&str]| lowered.iter().any(|s| mentions_any(s, needles));

    let mut response = format!(
        "Based on your skills in {}, here are some career suggestions: ",
        skills.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
    );
    if has(&["python"][..]) {
        response.push_str("Consider roles in Data Science, Backend Development, or AI/ML. ");
    }
    if has(&["javascript", "react"][..]) {
        response.push_str("Frontend Development or Full-Stack roles would be great fits. ");
    }
    if has(&["aws", "cloud"][..]) {
        response.push_str("Cloud Engineering or DevOps roles are excellent options. ");
    }
    response.push_str("Keep building your skills and consider getting certifications in your areas of interest.");

    ChatReply::rules(QuestionKind::CareerAdvice, 0.8, response)
}

fn general_answer(question: &str) -> ChatReply {
    let q = question.to_lowercase();
    let greeted = q
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == "hello" || word == "hi");

    let response = if greeted {
        "Hello! I'm your AI career assistant. I can help you with questions about your profile, skills, and career advice. What would you like to know?"
    } else if q.contains("help") {
        "I can help you with questions about your skills, experience, education, salary expectations, and career advice. Just ask me anything about your profile!"
    } else {
        "I'm here to help with questions about your profile and career. You can ask me about your skills, experience, or career advice. What would you like to know?"
    };
    ChatReply::rules(QuestionKind::General, 0.6, response.to_string())
}

/// At most six questions, profile-specific ones first.
pub fn suggested_questions(profile: &AssistantProfile) -> Vec<&'static str> {
    let mut suggestions = Vec::new();
    if !profile.skills.is_empty() {
        suggestions.push("What are my strongest skills?");
        suggestions.push("What career paths match my skills?");
    }
    if !profile.resume_text.is_empty() {
        suggestions.push("How can I improve my experience section?");
    }
    if profile.education.is_some() {
        suggestions.push("How does my education help my career?");
    }
    suggestions.extend([
        "What salary can I expect?",
        "What skills should I learn next?",
        "How can I improve my resume?",
        "What are the best job search strategies?",
    ]);
    suggestions.truncate(6);
    suggestions
}
