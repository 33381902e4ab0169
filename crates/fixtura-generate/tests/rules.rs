mod common;

use common::{ANOTHER_TEST_BEAN, TEST_BEAN, field, generator_with, object, text};
use fixtura_core::{ComputedValue, Scalar, TypeRef, Value};
use fixtura_rules::{
    AndCondition, DeclaringInstanceType, DeclaringType, FieldNameEndsWith, FieldNameMatches,
    FieldNamePattern, FieldNameStartsWith, Rule, RuleError,
};

#[test]
fn suffix_rule_overrides_matching_text_fields() {
    let generator = generator_with(|config| {
        config
            .for_type(TypeRef::Text)
            .when(FieldNameEndsWith::new("ID"))
            .then_return("12345")
            .expect("rule");
    });
    let bean = generator.get_instance(TEST_BEAN).expect("bean");

    assert_eq!(text(&bean, "accountID"), "12345");
    assert_eq!(text(&bean, "firstName"), "firstName");
    assert_eq!(text(&object(&bean, "anotherTestBean"), "someID"), "12345");
}

#[test]
fn later_rules_win_collisions() {
    let generator = generator_with(|config| {
        config
            .for_type(TypeRef::Text)
            .when(FieldNameEndsWith::new("ID"))
            .then_return("first")
            .expect("first");
        config
            .for_type(TypeRef::Text)
            .when(FieldNameMatches::new("accountID"))
            .then_return("second")
            .expect("second");
    });
    let bean = generator.get_instance(TEST_BEAN).expect("bean");

    assert_eq!(text(&bean, "accountID"), "second");
    assert_eq!(text(&object(&bean, "anotherTestBean"), "someID"), "first");
}

#[test]
fn and_rules_scope_by_declaring_type() {
    let generator = generator_with(|config| {
        config
            .for_type(TypeRef::Text)
            .when(DeclaringType::new(TEST_BEAN))
            .and(FieldNameEndsWith::new("ID"))
            .then_return("testBeanID")
            .expect("test bean rule");
        config
            .for_type(TypeRef::Text)
            .when(AndCondition::of(
                DeclaringType::new(ANOTHER_TEST_BEAN),
                FieldNameEndsWith::new("ID"),
            ))
            .then_return("anotherTestBeanID")
            .expect("another test bean rule");
    });
    let bean = generator.get_instance(TEST_BEAN).expect("bean");

    assert_eq!(text(&bean, "accountID"), "testBeanID");
    assert_eq!(
        text(&object(&bean, "anotherTestBean"), "someID"),
        "anotherTestBeanID"
    );
}

#[test]
fn inherited_fields_match_on_the_runtime_type() {
    let generator = generator_with(|config| {
        config
            .for_type(TypeRef::Text)
            .when(DeclaringInstanceType::new("ChildBean"))
            .and(FieldNameMatches::new("grandparentString"))
            .then_return("child")
            .expect("child");
        config
            .for_type(TypeRef::Text)
            .when(DeclaringInstanceType::new("ParentBean"))
            .and(FieldNameMatches::new("grandparentString"))
            .then_return("parent")
            .expect("parent");
    });

    let child = generator.get_instance("ChildBean").expect("child");
    assert_eq!(text(&child, "grandparentString"), "child");
    assert_eq!(text(&child, "someParentString"), "someParentString");

    let parent = generator.get_instance("ParentBean").expect("parent");
    assert_eq!(text(&parent, "grandparentString"), "parent");
}

#[test]
fn primitive_rules_apply_to_primitive_fields() {
    let generator = generator_with(|config| {
        let prefix = || FieldNameStartsWith::new("some");
        config
            .for_type(TypeRef::boxed(Scalar::Int))
            .when(prefix())
            .then_return(5)
            .expect("int");
        config
            .for_type(TypeRef::primitive(Scalar::Float))
            .when(prefix())
            .then_return(3.14f32)
            .expect("float");
        config
            .for_type(TypeRef::boxed(Scalar::Double))
            .when(prefix())
            .then_return(7.4562)
            .expect("double");
        config
            .for_type(TypeRef::primitive(Scalar::Short))
            .when(prefix())
            .then_return(9i16)
            .expect("short");
    });
    let nested = generator.get_instance(ANOTHER_TEST_BEAN).expect("bean");

    assert_eq!(field(&nested, "someNumber"), Value::Int(5));
    assert_eq!(field(&nested, "someFloat"), Value::Float(3.14));
    assert_eq!(field(&nested, "someDouble"), Value::Double(7.4562));
    assert_eq!(field(&nested, "someShort"), Value::Short(9));
    assert_eq!(text(&nested, "someID"), "someID");
    assert_eq!(
        field(&nested, "someNumbers").as_array(),
        Some(&[Value::Int(1)][..])
    );
}

#[test]
fn rules_built_from_values_infer_their_type() {
    let generator = generator_with(|config| {
        let rules = config.rules_mut();
        rules.add(Rule::field_name_starts_with("some", 5).expect("int"));
        rules.add(Rule::field_name_starts_with("some", 3.14f32).expect("float"));
        rules.add(Rule::field_name_matches("integer", 7).expect("integer"));
        rules.add(Rule::field_name_matches("firstName", "John").expect("name"));
    });
    let bean = generator.get_instance(TEST_BEAN).expect("bean");
    let nested = object(&bean, "anotherTestBean");

    assert_eq!(field(&bean, "integer"), Value::Int(7));
    assert_eq!(text(&bean, "firstName"), "John");
    assert_eq!(text(&bean, "lastName"), "lastName");
    assert_eq!(field(&nested, "someNumber"), Value::Int(5));
    assert_eq!(field(&nested, "someFloat"), Value::Float(3.14));
    assert_eq!(field(&nested, "someShort"), Value::Short(1));
}

#[test]
fn computed_rules_see_the_field() {
    let generator = generator_with(|config| {
        let upper = ComputedValue::new(TypeRef::Text, |ctx| {
            ctx.map(|ctx| Value::Text(ctx.field_name().to_uppercase()))
                .unwrap_or(Value::Null)
        });
        config
            .for_type(TypeRef::Text)
            .when(FieldNamePattern::new("^some").expect("pattern"))
            .then_use(upper)
            .expect("rule");
    });
    let nested = generator.get_instance(ANOTHER_TEST_BEAN).expect("bean");
    assert_eq!(text(&nested, "someID"), "SOMEID");
    assert_eq!(text(&nested, "something"), "SOMETHING");
    assert_eq!(text(&nested, "anotherThing"), "anotherThing");
}

#[test]
fn mismatched_rule_values_are_rejected() {
    let mut config = common::bean_configuration();
    let err = config
        .for_type(TypeRef::Text)
        .when(FieldNameEndsWith::new("ID"))
        .then_return(12)
        .expect_err("mismatch");
    assert!(matches!(err, RuleError::TypeMismatch { .. }));
    assert!(config.rules().is_empty());

    let err = Rule::field_name_matches("anything", Value::Null).expect_err("untyped");
    assert!(matches!(err, RuleError::UntypedValue));
}
