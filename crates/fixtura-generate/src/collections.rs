use tracing::{debug, error, warn};

use fixtura_core::{Container, ContainerShape, FieldMember, TypeRef, Value};

use crate::engine::Session;

impl Session<'_> {
    /// Generates the configured number of elements into `container`.
    ///
    /// Elements are generated without a field context, so text elements are
    /// empty. Null elements are dropped rather than counted. Nothing happens
    /// when the element type is unknown.
    pub(crate) fn populate_container(
        &mut self,
        container: &Container,
        args: &[TypeRef],
        members: &[FieldMember],
    ) {
        let count = self.config.collection_auto_fill_count();
        let field = members
            .last()
            .map(|member| member.field.name.as_str())
            .unwrap_or_default();

        match container.shape() {
            ContainerShape::Sequence | ContainerShape::Set => {
                let Some(element) = args.first() else {
                    debug!(
                        container = %container.concrete(),
                        field,
                        "element type unknown, container left empty"
                    );
                    return;
                };
                debug!(container = %container.concrete(), element = %element, count, "populating container");
                for _ in 0..count {
                    let Some(value) = self.generate_element(element) else {
                        continue;
                    };
                    if let Err(err) = container.push(value) {
                        error!(container = %container.concrete(), field, error = %err, "failed to add element");
                    }
                }
            }
            ContainerShape::Map => {
                let [key_type, value_type] = args else {
                    debug!(
                        container = %container.concrete(),
                        field,
                        "entry types unknown, map left empty"
                    );
                    return;
                };
                debug!(container = %container.concrete(), key = %key_type, value = %value_type, count, "populating map");
                for _ in 0..count {
                    let Some(key) = self.generate_element(key_type) else {
                        continue;
                    };
                    let Some(value) = self.generate_element(value_type) else {
                        continue;
                    };
                    if let Err(err) = container.insert(key, value) {
                        error!(container = %container.concrete(), field, error = %err, "failed to add entry");
                    }
                }
            }
        }
    }

    fn generate_element(&mut self, element: &TypeRef) -> Option<Value> {
        match self.resolve_value(element, &[]) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(err) => {
                warn!(element = %element, error = %err, "failed to generate element");
                None
            }
        }
    }
}
