//! Curriculum aggregate root

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::course::{CourseRef, ModuleRef};

/// Degree the curriculum leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DegreeType {
    #[default]
    Bachelor,
    Master,
    Diploma,
    StateExam,
}

impl DegreeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DegreeType::Bachelor => "bachelor",
            DegreeType::Master => "master",
            DegreeType::Diploma => "diploma",
            DegreeType::StateExam => "state-exam",
        }
    }
}

/// Semester the studies start in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StartSemester {
    #[default]
    Winter,
    Summer,
}

/// Everything the student has planned
#[derive(Debug, Clone, Default)]
pub struct Curriculum {
    /// Credits required for the degree
    pub credits: f64,
    pub modules: Vec<ModuleRef>,
    pub courses: Vec<CourseRef>,
    pub degree_type: DegreeType,
    pub start_semester: StartSemester,
    /// Module code of the major
    pub major_module: String,
    /// Module code of the minor
    pub minor_module: String,
}

impl Curriculum {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.courses.is_empty()
    }

    /// Find a course by any of its aliases
    pub fn find_course(&self, id: &str) -> Option<CourseRef> {
        self.courses
            .iter()
            .find(|c| c.borrow().id.matches(id))
            .map(Rc::clone)
    }

    pub fn find_module(&self, code: &str) -> Option<ModuleRef> {
        self.modules.iter().find(|m| m.code == code).map(Rc::clone)
    }

    /// Sum of credits over all planned courses
    pub fn planned_credits(&self) -> f64 {
        self.courses.iter().map(|c| c.borrow().credits).sum()
    }
}
