mod common;

use common::{ANOTHER_TEST_BEAN, TEST_BEAN, bean_generator, container, field, generator_with, object};
use fixtura_core::{RecordDescriptor, TypeRef};
use fixtura_generate::{Configuration, Generator};

#[test]
fn cached_instances_are_shared_across_requests() {
    let generator = bean_generator(true);
    let bean = generator.get_instance(TEST_BEAN).expect("bean");
    let direct = generator.get_instance(ANOTHER_TEST_BEAN).expect("direct");

    assert!(object(&bean, "anotherTestBean").ptr_eq(&direct));
    assert!(generator.get_instance(TEST_BEAN).expect("again").ptr_eq(&bean));
}

#[test]
fn back_references_resolve_to_the_cached_owner() {
    let generator = bean_generator(true);
    let bean = generator.get_instance(TEST_BEAN).expect("bean");
    let nested = object(&bean, "anotherTestBean");
    assert!(object(&nested, "testBean").ptr_eq(&bean));
}

#[test]
fn uncached_requests_build_fresh_graphs() {
    let generator = bean_generator(false);
    let first = generator.get_instance(TEST_BEAN).expect("first");
    let second = generator.get_instance(TEST_BEAN).expect("second");
    assert!(!first.ptr_eq(&second));
    assert!(generator.cache().is_empty());

    let nested = object(&first, "anotherTestBean");
    assert!(field(&nested, "testBean").is_null());

    let items = container(&first, "list").items();
    let a = items[0].as_instance().expect("a");
    let b = items[1].as_instance().expect("b");
    assert!(!a.ptr_eq(b));
}

#[test]
fn per_type_override_beats_global_setting() {
    let generator = generator_with(|config| {
        config.set_cache_enabled(false);
        config.cache_overrides_mut().set(TEST_BEAN, true);
    });

    let first = generator.get_instance(TEST_BEAN).expect("first");
    let second = generator.get_instance(TEST_BEAN).expect("second");
    assert!(first.ptr_eq(&second));

    let direct = generator.get_instance(ANOTHER_TEST_BEAN).expect("direct");
    let nested = object(&first, "anotherTestBean");
    assert!(!direct.ptr_eq(&nested));
    assert!(nested.ptr_eq(&object(&second, "anotherTestBean")));
}

#[test]
fn per_type_override_can_disable_caching() {
    let generator = generator_with(|config| {
        config.set_cache_enabled(true);
        config.cache_overrides_mut().set(TEST_BEAN, false);
    });

    let first = generator.get_instance(TEST_BEAN).expect("first");
    let second = generator.get_instance(TEST_BEAN).expect("second");
    assert!(!first.ptr_eq(&second));

    let direct = generator.get_instance(ANOTHER_TEST_BEAN).expect("direct");
    assert!(object(&first, "anotherTestBean").ptr_eq(&direct));
    assert!(object(&second, "anotherTestBean").ptr_eq(&direct));
}

#[test]
fn self_references_break_cycles() {
    let mut config = Configuration::new();
    config
        .register(
            RecordDescriptor::new("Node")
                .field("label", TypeRef::Text)
                .field("next", TypeRef::named("Node")),
        )
        .expect("node");

    let mut uncached = config.clone();
    uncached.set_cache_enabled(false);
    let node = Generator::with_configuration(uncached)
        .get_instance("Node")
        .expect("node");
    assert!(field(&node, "next").is_null());

    let node = Generator::with_configuration(config)
        .get_instance("Node")
        .expect("node");
    assert!(object(&node, "next").ptr_eq(&node));
}

#[test]
fn mutual_references_break_cycles() {
    let mut config = Configuration::new();
    config
        .register(RecordDescriptor::new("Left").field("right", TypeRef::named("Right")))
        .expect("left");
    config
        .register(RecordDescriptor::new("Right").field("left", TypeRef::named("Left")))
        .expect("right");
    config.set_cache_enabled(false);

    let left = Generator::with_configuration(config)
        .get_instance("Left")
        .expect("left");
    let right = object(&left, "right");
    assert!(field(&right, "left").is_null());
}

#[test]
fn clearing_the_cache_forces_new_instances() {
    let generator = bean_generator(true);
    let first = generator.get_instance(ANOTHER_TEST_BEAN).expect("first");
    assert!(!generator.cache().is_empty());

    generator.cache().clear();
    let second = generator.get_instance(ANOTHER_TEST_BEAN).expect("second");
    assert!(!first.ptr_eq(&second));
}
