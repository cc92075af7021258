//! Reference indices: identifier -> live entity

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::model::{CourseRef, ModuleRef};

/// Module code -> module
pub type ModuleIndex = HashMap<String, ModuleRef>;

/// Course id or alias -> course
pub type CourseIndex = HashMap<String, CourseRef>;

/// Build a lookup table from every key of every entity to that entity.
///
/// `keys_of` may yield one key (`[k]`, `Some(k)`) or many. When two entities
/// claim the same key the later one wins.
pub fn build_index<E, K, I, F>(entities: &[E], mut keys_of: F) -> HashMap<K, E>
where
    E: Clone,
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
    F: FnMut(&E) -> I,
{
    let mut index = HashMap::with_capacity(entities.len());
    for entity in entities {
        for key in keys_of(entity) {
            index.insert(key, entity.clone());
        }
    }
    index
}

pub fn module_index(modules: &[ModuleRef]) -> ModuleIndex {
    build_index(modules, |m| [m.code.clone()])
}

pub fn course_index(courses: &[CourseRef]) -> CourseIndex {
    build_index(courses, |c| {
        c.borrow().id.keys().map(str::to_owned).collect::<Vec<_>>()
    })
}

/// Resolve any of `keys` against `index`, first hit wins
pub(crate) fn resolve_first<'a, E>(
    index: &HashMap<String, Rc<E>>,
    mut keys: impl Iterator<Item = &'a str>,
) -> Option<Rc<E>> {
    keys.find_map(|k| index.get(k)).map(Rc::clone)
}
