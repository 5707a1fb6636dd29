//! Tests for custom type registry operations.

use typebridge::{BoxError, ConversionError, CustomTypes, DynValue, TypeKey};

#[derive(Debug, Clone, PartialEq)]
struct Uuid([u8; 4]);

fn register_as_string(registry: &CustomTypes, app_type: TypeKey) {
    registry.register_fn(
        app_type,
        TypeKey::of::<String>(),
        |_| Ok(DynValue::new(String::new())),
        |_| Ok(DynValue::new(())),
    );
}

#[test]
fn test_register_value_and_pointer_types() {
    let registry = CustomTypes::new();

    for uuid_type in [TypeKey::of::<Uuid>(), TypeKey::of::<Box<Uuid>>()] {
        registry.clear();
        register_as_string(&registry, uuid_type);
        assert!(
            registry.is_registered(uuid_type),
            "expected `{uuid_type}` to be registered"
        );
        assert_eq!(registry.len(), 1);
    }
}

#[test]
fn test_unregistered_type() {
    let registry = CustomTypes::new();
    register_as_string(&registry, TypeKey::of::<Uuid>());

    assert!(registry.is_registered_type::<Uuid>());
    assert!(!registry.is_registered_type::<Box<Uuid>>());
    assert!(!registry.is_registered_type::<String>());
    assert!(registry.get(TypeKey::of::<String>()).is_none());
}

#[test]
fn test_clear_removes_every_registration() {
    let registry = CustomTypes::new();
    register_as_string(&registry, TypeKey::of::<Uuid>());
    register_as_string(&registry, TypeKey::of::<u128>());
    assert_eq!(registry.len(), 2);

    registry.clear();

    assert!(registry.is_empty());
    assert!(!registry.is_registered_type::<Uuid>());
    assert!(!registry.is_registered_type::<u128>());
}

#[test]
fn test_clear_on_empty_registry() {
    let registry = CustomTypes::default();
    registry.clear();
    assert!(registry.is_empty());
}

#[test]
fn test_last_registration_wins() {
    let registry = CustomTypes::new();

    registry.register_typed(
        |id: Uuid| Ok::<_, BoxError>(format!("first-{}", id.0[0])),
        |_: String| Ok::<_, BoxError>(Uuid([0; 4])),
    );
    registry.register_typed(
        |id: Uuid| Ok::<_, BoxError>(u64::from(id.0[0])),
        |n: u64| Ok::<_, BoxError>(Uuid([n as u8, 0, 0, 0])),
    );

    assert_eq!(registry.len(), 1);

    let record = registry.get(TypeKey::of::<Uuid>()).unwrap();
    assert_eq!(record.wire_type(), TypeKey::of::<u64>());

    let wire = registry.marshal(DynValue::new(Uuid([5, 0, 0, 0]))).unwrap();
    assert_eq!(wire.downcast::<u64>().unwrap(), 5);

    // The first record's wire type is no longer accepted
    let err = registry
        .unmarshal(TypeKey::of::<Uuid>(), DynValue::new("first-5".to_string()))
        .unwrap_err();
    assert!(matches!(err, ConversionError::IncorrectOutputType { .. }));
}

#[test]
fn test_registration_is_not_validated() {
    // Registering a pair whose capabilities do not match the declared types
    // succeeds; the mismatch is reported when the record is used.
    let registry = CustomTypes::new();
    registry.register_fn(
        TypeKey::of::<Uuid>(),
        TypeKey::of::<String>(),
        |_| Ok(DynValue::new(0_i32)),
        |_| Ok(DynValue::new(0_i32)),
    );

    assert!(registry.is_registered_type::<Uuid>());

    let err = registry.marshal(DynValue::new(Uuid([1; 4]))).unwrap_err();
    assert_eq!(err.actual(), Some(TypeKey::of::<i32>()));
}

#[test]
fn test_marshal_unregistered_type() {
    let registry = CustomTypes::new();

    let err = registry.marshal(DynValue::new(Uuid([0; 4]))).unwrap_err();
    match err {
        ConversionError::NotRegistered(key) => assert_eq!(key, TypeKey::of::<Uuid>()),
        other => panic!("expected NotRegistered, got {other:?}"),
    }
}

#[test]
fn test_registry_clone_shares_records() {
    let registry = CustomTypes::new();
    let cloned = registry.clone();

    register_as_string(&registry, TypeKey::of::<Uuid>());
    assert!(cloned.is_registered_type::<Uuid>());

    cloned.clear();
    assert!(!registry.is_registered_type::<Uuid>());
}

#[test]
fn test_separate_registries_are_independent() {
    let a = CustomTypes::new();
    let b = CustomTypes::new();

    register_as_string(&a, TypeKey::of::<Uuid>());

    assert!(a.is_registered_type::<Uuid>());
    assert!(!b.is_registered_type::<Uuid>());
}

#[test]
fn test_marshaller_may_use_registry() {
    // Conversions run without the registry lock held.
    let registry = CustomTypes::new();
    let inner = registry.clone();

    registry.register_fn(
        TypeKey::of::<Uuid>(),
        TypeKey::of::<bool>(),
        move |_| Ok(DynValue::new(inner.is_registered_type::<Uuid>())),
        |_| Ok(DynValue::new(Uuid([0; 4]))),
    );

    let wire = registry.marshal(DynValue::new(Uuid([0; 4]))).unwrap();
    assert!(wire.downcast::<bool>().unwrap());
}
