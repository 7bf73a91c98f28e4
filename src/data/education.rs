//! Short labels for the survey's education answers.

use serde::Serialize;
use std::fmt;

/// Simplified education level.
///
/// Variants are declared in label order so that `Ord` matches sorting by
/// the printed label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EducationLevel {
    Associate,
    Bachelor,
    Elementary,
    HighSchool,
    Master,
    Other,
    PhdProfessional,
    SomeCollege,
}

impl EducationLevel {
    #[cfg(test)]
    const ALL: [EducationLevel; 8] = [
        EducationLevel::Associate,
        EducationLevel::Bachelor,
        EducationLevel::Elementary,
        EducationLevel::HighSchool,
        EducationLevel::Master,
        EducationLevel::Other,
        EducationLevel::PhdProfessional,
        EducationLevel::SomeCollege,
    ];

    /// Map a raw survey answer; anything unrecognised becomes `Other`.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "Bachelor's degree (B.A., B.S., B.Eng., etc.)" => Self::Bachelor,
            "Master's degree (M.A., M.S., M.Eng., MBA, etc.)" => Self::Master,
            "Some college/university study without earning a degree" => Self::SomeCollege,
            "Professional degree (JD, MD, Ph.D, Ed.D, etc.)" => Self::PhdProfessional,
            "Associate degree (A.A., A.S., etc.)" => Self::Associate,
            "Secondary school (e.g. American high school, German Realschule or Gymnasium, etc.)" => {
                Self::HighSchool
            }
            "Primary/elementary school" => Self::Elementary,
            // "Something else" covers bootcamps, self-taught, etc.
            _ => Self::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Associate => "Associate",
            Self::Bachelor => "Bachelor",
            Self::Elementary => "Elementary",
            Self::HighSchool => "High School",
            Self::Master => "Master",
            Self::Other => "Other",
            Self::PhdProfessional => "PhD/Professional",
            Self::SomeCollege => "Some College",
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
