//! Built-in baseline records. Never written to storage.

use chrono::NaiveDate;

use super::models::{CandidateProfile, EducationEntry, ExperienceEntry, JobPosting, JobRequirements};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The seed job catalog, ids 1..=3.
pub fn seed_jobs() -> Vec<JobPosting> {
    vec![
        JobPosting {
            id: 1,
            title: "Senior Frontend Developer".to_string(),
            description: "We are looking for an experienced frontend developer with strong React skills to join our team.".to_string(),
            location: "San Francisco, CA".to_string(),
            salary: "$120,000 - $150,000".to_string(),
            requirements: JobRequirements {
                age: "18+".to_string(),
                skills: strings(&["React", "TypeScript", "CSS", "HTML"]),
            },
            deadline: date(2025, 12, 31),
            tags: strings(&["Remote", "Full-time", "Senior"]),
        },
        JobPosting {
            id: 2,
            title: "Backend Engineer".to_string(),
            description: "Seeking a skilled backend engineer to develop and maintain our server infrastructure.".to_string(),
            location: "New York, NY".to_string(),
            salary: "$110,000 - $140,000".to_string(),
            requirements: JobRequirements {
                age: "18+".to_string(),
                skills: strings(&["Node.js", "Python", "SQL", "MongoDB"]),
            },
            deadline: date(2025, 12, 15),
            tags: strings(&["On-site", "Full-time"]),
        },
        JobPosting {
            id: 3,
            title: "UI/UX Designer".to_string(),
            description: "Join our creative team as a UI/UX designer to create beautiful and functional user interfaces.".to_string(),
            location: "Remote".to_string(),
            salary: "$90,000 - $120,000".to_string(),
            requirements: JobRequirements {
                age: "18+".to_string(),
                skills: strings(&["Figma", "Adobe XD", "User Research", "Prototyping"]),
            },
            deadline: date(2025, 11, 30),
            tags: strings(&["Remote", "Contract"]),
        },
    ]
}

/// Profile shown before the candidate has saved anything.
pub fn default_profile() -> CandidateProfile {
    CandidateProfile {
        full_name: "Jane Smith".to_string(),
        email: "jane.smith@example.com".to_string(),
        phone: "(123) 456-7890".to_string(),
        location: "New York, NY".to_string(),
        title: "Senior Frontend Developer".to_string(),
        about: "Experienced developer with 5+ years of expertise in building responsive web applications using React, TypeScript, and modern frontend frameworks.".to_string(),
        skills: strings(&["React", "TypeScript", "JavaScript", "HTML/CSS", "Node.js"]),
        experience: vec![
            ExperienceEntry {
                id: 1,
                role: "Frontend Developer".to_string(),
                company: "Tech Solutions Inc.".to_string(),
                duration: "Jan 2021 - Present".to_string(),
                description: "Lead developer for e-commerce platform redesign.".to_string(),
            },
            ExperienceEntry {
                id: 2,
                role: "UI Developer".to_string(),
                company: "Digital Agency".to_string(),
                duration: "Mar 2018 - Dec 2020".to_string(),
                description: "Worked on various client projects using React and Vue.".to_string(),
            },
        ],
        education: vec![EducationEntry {
            id: 1,
            degree: "B.S. Computer Science".to_string(),
            institution: "Tech University".to_string(),
            year: "2018".to_string(),
        }],
        resume_name: "jane_smith_resume.pdf".to_string(),
        linked_in: "linkedin.com/in/janesmith".to_string(),
        portfolio: "janesmith.dev".to_string(),
        github: "github.com/janesmith".to_string(),
    }
}
