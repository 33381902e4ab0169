use fixtura_core::{FieldMember, TypeKey};

/// Types under construction and fields being walked in one top-level call.
///
/// A type may appear at most once; re-entering it is a cycle.
#[derive(Debug, Default)]
pub struct InstantiationPath {
    types: Vec<TypeKey>,
    fields: Vec<FieldMember>,
}

impl InstantiationPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.types.contains(key)
    }

    pub fn enter(&mut self, key: TypeKey) {
        self.types.push(key);
    }

    pub fn exit(&mut self) -> Option<TypeKey> {
        self.types.pop()
    }

    pub fn push_field(&mut self, member: FieldMember) {
        self.fields.push(member);
    }

    pub fn pop_field(&mut self) -> Option<FieldMember> {
        self.fields.pop()
    }

    /// Fields from the outermost instance down to the current one.
    pub fn fields(&self) -> &[FieldMember] {
        &self.fields
    }

    /// Copy of the field path, detached from later pushes and pops.
    pub fn snapshot(&self) -> Vec<FieldMember> {
        self.fields.clone()
    }

    pub fn depth(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_exit_track_in_progress_types() {
        let mut path = InstantiationPath::new();
        let outer = TypeKey::from("Outer");
        path.enter(outer.clone());
        path.enter(TypeKey::from("Foo"));
        assert!(path.contains(&outer));
        assert_eq!(path.depth(), 2);
        assert_eq!(path.exit(), Some(TypeKey::from("Foo")));
        assert_eq!(path.exit(), Some(outer.clone()));
        assert!(!path.contains(&outer));
        assert!(path.is_empty());
    }
}
