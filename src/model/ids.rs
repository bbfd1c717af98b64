use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Record identifier tagged with the record type, so a contact id cannot
/// be handed to a company operation. Stored as a bare UUID string.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    pub value: Uuid,
    #[serde(skip)]
    _record: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn generate() -> Self {
        Self {
            value: Uuid::new_v4(),
            _record: PhantomData,
        }
    }
}

// Manual impls: derives would demand the same traits of `T`.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note;

    #[test]
    fn copies_compare_equal() {
        let id = Id::<Note>::generate();
        let copy = id;
        assert_eq!(id, copy);
        assert_ne!(id, Id::<Note>::generate());
    }

    #[test]
    fn reads_back_from_a_uuid_string() {
        let id = Id::<Note>::generate();
        let back: Id<Note> = serde_json::from_value(serde_json::json!(id.value.to_string())).unwrap();
        assert_eq!(back, id);
    }
}
