#![allow(dead_code)]

use fixtura_core::types::{LIST, MAP, VEC};
use fixtura_core::{
    Container, ContainerShape, Instance, RecordDescriptor, Scalar, TypeRef, Value,
};
use fixtura_generate::{Configuration, Generator};

pub const TEST_BEAN: &str = "TestBean";
pub const ANOTHER_TEST_BEAN: &str = "AnotherTestBean";

/// Registers the bean fixtures shared by the integration tests.
pub fn register_beans(config: &mut Configuration) {
    config
        .register(
            RecordDescriptor::new(TEST_BEAN)
                .immutable_field("finalList", TypeRef::list(TypeRef::named(ANOTHER_TEST_BEAN)))
                .field("list", TypeRef::list(TypeRef::named(ANOTHER_TEST_BEAN)))
                .field("firstName", TypeRef::Text)
                .field("lastName", TypeRef::Text)
                .field("accountID", TypeRef::Text)
                .field("dateOfBirth", TypeRef::Text)
                .field("map", TypeRef::raw(MAP))
                .field("integer", TypeRef::boxed(Scalar::Int))
                .field("anotherTestBean", TypeRef::named(ANOTHER_TEST_BEAN))
                .field("floatData", TypeRef::primitive(Scalar::Float))
                .field("intData", TypeRef::primitive(Scalar::Int))
                .constructor(|instance| {
                    let list = Container::new(VEC, ContainerShape::Sequence);
                    instance.set("finalList", Value::Container(list));
                    Ok(())
                }),
        )
        .expect("register TestBean");

    config
        .register(
            RecordDescriptor::new(ANOTHER_TEST_BEAN)
                .field("someClass", TypeRef::Class)
                .field("something", TypeRef::Text)
                .field("anotherThing", TypeRef::Text)
                .field("someID", TypeRef::Text)
                .field("someNumber", TypeRef::primitive(Scalar::Int))
                .field("someFloat", TypeRef::primitive(Scalar::Float))
                .field("someDouble", TypeRef::primitive(Scalar::Double))
                .field("someShort", TypeRef::primitive(Scalar::Short))
                .field("someNumbers", TypeRef::array(TypeRef::primitive(Scalar::Int)))
                .field("someBytes", TypeRef::array(TypeRef::primitive(Scalar::Byte)))
                .field("testBean", TypeRef::named(TEST_BEAN)),
        )
        .expect("register AnotherTestBean");

    config
        .register(RecordDescriptor::new("GrandparentBean").field("grandparentString", TypeRef::Text))
        .expect("register GrandparentBean");
    config
        .register(
            RecordDescriptor::new("ParentBean")
                .extends("GrandparentBean")
                .field("someParentString", TypeRef::Text)
                .field("anotherParentString", TypeRef::Text),
        )
        .expect("register ParentBean");
    config
        .register(
            RecordDescriptor::new("ChildBean")
                .extends("ParentBean")
                .field("childValue", TypeRef::primitive(Scalar::Int)),
        )
        .expect("register ChildBean");

    config
        .register(RecordDescriptor::new("Foo").field("name", TypeRef::Text))
        .expect("register Foo");
    config
        .register(
            RecordDescriptor::new("Outer")
                .field("items", TypeRef::container(LIST, vec![TypeRef::named("Foo")])),
        )
        .expect("register Outer");

    config.validate().expect("fixtures are consistent");
}

pub fn bean_configuration() -> Configuration {
    let mut config = Configuration::new();
    register_beans(&mut config);
    config
}

pub fn generator_with(configure: impl FnOnce(&mut Configuration)) -> Generator {
    let mut config = bean_configuration();
    configure(&mut config);
    Generator::with_configuration(config)
}

pub fn bean_generator(cache: bool) -> Generator {
    generator_with(|config| config.set_cache_enabled(cache))
}

pub fn text(instance: &Instance, field: &str) -> String {
    instance
        .text(field)
        .unwrap_or_else(|| panic!("field {field} holds no text"))
}

pub fn object(instance: &Instance, field: &str) -> Instance {
    instance
        .object(field)
        .unwrap_or_else(|| panic!("field {field} holds no instance"))
}

pub fn container(instance: &Instance, field: &str) -> Container {
    instance
        .container(field)
        .unwrap_or_else(|| panic!("field {field} holds no container"))
}

pub fn field(instance: &Instance, field: &str) -> Value {
    instance
        .get(field)
        .unwrap_or_else(|| panic!("missing field {field}"))
}
