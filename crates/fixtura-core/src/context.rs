use crate::descriptor::FieldDescriptor;
use crate::types::TypeKey;
use crate::value::Instance;

/// A field being generated, paired with the instance that owns it.
#[derive(Debug, Clone)]
pub struct FieldMember {
    pub field: FieldDescriptor,
    pub declaring: Instance,
}

impl FieldMember {
    pub fn new(field: FieldDescriptor, declaring: Instance) -> Self {
        Self { field, declaring }
    }
}

/// Field path from the top-level instance down to the field being generated.
///
/// The last member is the field the value is for; earlier members are the
/// enclosing fields walked to reach it.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    path: &'a [FieldMember],
}

impl<'a> FieldContext<'a> {
    /// Returns `None` for an empty path.
    pub fn new(path: &'a [FieldMember]) -> Option<Self> {
        if path.is_empty() {
            None
        } else {
            Some(Self { path })
        }
    }

    fn current(&self) -> &'a FieldMember {
        // `new` rejects empty paths.
        &self.path[self.path.len() - 1]
    }

    pub fn field(&self) -> &'a FieldDescriptor {
        &self.current().field
    }

    pub fn field_name(&self) -> &'a str {
        &self.current().field.name
    }

    /// Type that declares the field, which may be an ancestor of the instance type.
    pub fn declaring_type(&self) -> &'a TypeKey {
        &self.current().field.declaring_type
    }

    pub fn declaring(&self) -> &'a Instance {
        &self.current().declaring
    }

    /// Runtime type of the instance being populated.
    pub fn instance_type(&self) -> &'a TypeKey {
        self.current().declaring.type_key()
    }

    pub fn path(&self) -> &'a [FieldMember] {
        self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeRef;

    #[test]
    fn context_exposes_innermost_member() {
        let outer_field = FieldDescriptor::new("Outer", "inner", TypeRef::named("Inner"));
        let inner_field = FieldDescriptor::new("Base", "label", TypeRef::Text);
        let outer = Instance::new("Outer", [&outer_field]);
        let inner = Instance::new("Inner", [&inner_field]);
        let path = vec![
            FieldMember::new(outer_field, outer),
            FieldMember::new(inner_field, inner),
        ];

        let ctx = FieldContext::new(&path).expect("non-empty path");
        assert_eq!(ctx.field_name(), "label");
        assert_eq!(ctx.declaring_type().as_str(), "Base");
        assert_eq!(ctx.instance_type().as_str(), "Inner");
        assert_eq!(ctx.depth(), 2);
        assert!(FieldContext::new(&[]).is_none());
    }
}
