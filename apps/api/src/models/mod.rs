pub mod job;
pub mod resume;

pub use job::ParsedJobDescription;
pub use resume::{ContactInfo, EducationEntry, ExperienceEntry, NormalizedResume, ResumeSkills};
