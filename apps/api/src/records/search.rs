use super::models::JobPosting;

/// Candidate job search. A job matches when `query` is a case-insensitive substring of
/// its title, description or any skill, and `location` is a case-insensitive substring
/// of its location. Empty inputs match everything. Input order is preserved.
pub fn filter_jobs<'a>(jobs: &'a [JobPosting], query: &str, location: &str) -> Vec<&'a JobPosting> {
    let query = query.to_lowercase();
    let location = location.to_lowercase();

    jobs.iter()
        .filter(|job| {
            let matches_query = job.title.to_lowercase().contains(&query)
                || job.description.to_lowercase().contains(&query)
                || job
                    .requirements
                    .skills
                    .iter()
                    .any(|skill| skill.to_lowercase().contains(&query));
            let matches_location =
                location.is_empty() || job.location.to_lowercase().contains(&location);
            matches_query && matches_location
        })
        .collect()
}
