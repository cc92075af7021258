//! Courses, modules and course identity

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shared handle to a module
pub type ModuleRef = Rc<Module>;

/// Shared handle to a course
pub type CourseRef = Rc<RefCell<Course>>;

/// A module groups courses (e.g. "Compulsory Computer Science")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Unique module code
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub credits: f64,
    /// Fields we don't interpret but must keep
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Module {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            credits: 0.0,
            extra: Map::new(),
        }
    }

    pub fn into_ref(self) -> ModuleRef {
        Rc::new(self)
    }
}

/// Course identity: a single id or a set of equivalent aliases.
///
/// Serialized untagged, so `"CS1"` and `["CS1", "INF-1"]` are both valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CourseId {
    Single(String),
    Aliases(Vec<String>),
}

impl CourseId {
    /// The course's own id (first alias)
    pub fn primary(&self) -> Option<&str> {
        match self {
            CourseId::Single(id) => Some(id),
            CourseId::Aliases(ids) => ids.first().map(String::as_str),
        }
    }

    /// Every identifier this course answers to, in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let ids: &[String] = match self {
            CourseId::Single(id) => std::slice::from_ref(id),
            CourseId::Aliases(ids) => ids,
        };
        ids.iter().map(String::as_str)
    }

    pub fn matches(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }
}

impl From<&str> for CourseId {
    fn from(id: &str) -> Self {
        CourseId::Single(id.to_string())
    }
}

impl From<String> for CourseId {
    fn from(id: String) -> Self {
        CourseId::Single(id)
    }
}

impl From<Vec<String>> for CourseId {
    fn from(ids: Vec<String>) -> Self {
        CourseId::Aliases(ids)
    }
}

impl From<&[&str]> for CourseId {
    fn from(ids: &[&str]) -> Self {
        CourseId::Aliases(ids.iter().map(|s| s.to_string()).collect())
    }
}

/// A course in the curriculum
#[derive(Debug, Clone)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    /// ECTS credits
    pub credits: f64,
    /// Recommended semester (1-based)
    pub semester: Option<u32>,
    /// Modules this course counts towards
    pub modules: Vec<ModuleRef>,
    /// Courses that must be passed first
    pub prerequisites: Vec<Weak<RefCell<Course>>>,
    /// Fields we don't interpret but must keep
    pub extra: Map<String, Value>,
}

impl Course {
    pub fn new(id: impl Into<CourseId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            credits: 0.0,
            semester: None,
            modules: Vec::new(),
            prerequisites: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn into_ref(self) -> CourseRef {
        Rc::new(RefCell::new(self))
    }

    /// Link a prerequisite (non-owning)
    pub fn add_prerequisite(&mut self, course: &CourseRef) {
        self.prerequisites.push(Rc::downgrade(course));
    }

    /// Prerequisites that are still alive
    pub fn prerequisite_refs(&self) -> Vec<CourseRef> {
        self.prerequisites.iter().filter_map(Weak::upgrade).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_id_primary_and_keys() {
        let single = CourseId::from("CS1");
        assert_eq!(single.primary(), Some("CS1"));
        assert_eq!(single.keys().collect::<Vec<_>>(), vec!["CS1"]);

        let aliases = CourseId::from(&["A", "B"][..]);
        assert_eq!(aliases.primary(), Some("A"));
        assert!(aliases.matches("B"));
        assert!(!aliases.matches("C"));

        let empty = CourseId::Aliases(Vec::new());
        assert_eq!(empty.primary(), None);
    }

    #[test]
    fn test_course_id_untagged_json() {
        let single: CourseId = serde_json::from_str("\"CS1\"").unwrap();
        assert_eq!(single, CourseId::from("CS1"));

        let aliases: CourseId = serde_json::from_str("[\"A\",\"B\"]").unwrap();
        assert_eq!(aliases, CourseId::from(&["A", "B"][..]));
        assert_eq!(serde_json::to_string(&aliases).unwrap(), "[\"A\",\"B\"]");
    }

    #[test]
    fn test_dropped_prerequisite_is_skipped() {
        let kept = Course::new("CS1", "Intro").into_ref();
        let mut course = Course::new("CS2", "Algorithms");
        course.add_prerequisite(&kept);
        {
            let dropped = Course::new("CS0", "Gone").into_ref();
            course.add_prerequisite(&dropped);
        }

        let alive = course.prerequisite_refs();
        assert_eq!(alive.len(), 1);
        assert!(Rc::ptr_eq(&alive[0], &kept));
    }
}
