//! Interned identifiers for metamodel names.
//!
//! Kind names, relation names and attribute names are compared constantly
//! while walking the metamodel, so they are interned once and passed around
//! as the `Copy` handle [`Id`].

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Separator between the segments of a qualified name.
pub const SEPARATOR: &str = "::";

/// Global string interner shared by every metamodel and model.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Interned metamodel name.
///
/// # Examples
///
/// ```
/// use astrolabe_core::identifier::Id;
///
/// let class = Id::new("Class");
/// assert_eq!(class, "Class");
///
/// let qualified = Id::new("C4Model").create_nested(Id::new("Dependency"));
/// assert_eq!(qualified, "C4Model::Dependency");
/// assert_eq!(qualified.last_segment(), "Dependency");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Creates a qualified identifier `self::child`.
    pub fn create_nested(&self, child: Id) -> Self {
        with_interner(|interner| {
            let parent_str = interner
                .resolve(self.0)
                .expect("Parent ID should exist in interner");
            let child_str = interner
                .resolve(child.0)
                .expect("Child ID should exist in interner");
            let nested = format!("{parent_str}{SEPARATOR}{child_str}");
            Self(interner.get_or_intern(&nested))
        })
    }

    /// Returns the interned string.
    pub fn as_string(&self) -> String {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                .to_string()
        })
    }

    /// Returns the unqualified part of the name (after the last `::`).
    pub fn last_segment(&self) -> Id {
        let full = self.as_string();
        match full.rsplit_once(SEPARATOR) {
            Some((_, last)) => Id::new(last),
            None => *self,
        }
    }

    /// Whether the name carries a namespace prefix.
    pub fn is_qualified(&self) -> bool {
        self.as_string().contains(SEPARATOR)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_interner(|interner| {
            let value = interner
                .resolve(self.0)
                .expect("Symbol should exist in interner");
            f.write_str(value)
        })
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                == other
        })
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_interns_once() {
        let a = Id::new("Property");
        let b = Id::new("Property");
        let c = Id::new("Port");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, "Property");
    }

    #[test]
    fn test_create_nested() {
        let profile = Id::new("C4Model");
        let nested = profile.create_nested(Id::new("Container"));

        assert_eq!(nested, "C4Model::Container");
        assert!(nested.is_qualified());
        assert!(!profile.is_qualified());
    }

    #[test]
    fn test_last_segment() {
        let nested = Id::new("C4Model").create_nested(Id::new("Dependency"));
        assert_eq!(nested.last_segment(), Id::new("Dependency"));

        let plain = Id::new("Dependency");
        assert_eq!(plain.last_segment(), plain);
    }

    #[test]
    fn test_display_and_as_string() {
        let id = Id::new("memberEnd");
        assert_eq!(format!("{id}"), "memberEnd");
        assert_eq!(id.as_string(), "memberEnd");
    }

    #[test]
    fn test_hash_lookup() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Id::new("ownedEnd"), 1);
        map.insert(Id::new("navigableOwnedEnd"), 2);

        assert_eq!(map.get(&Id::new("ownedEnd")), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str_ref() {
        let id = Id::new("Component");
        let name = String::from("Component");
        assert!(id == name.as_str());
        assert!(id != "Interface");
    }
}
