//! Tests for thread-safe concurrent access to the custom type registry.

use std::sync::Arc;
use std::thread;

use typebridge::{BoxError, CustomTypes, DynValue, TypeKey};

#[derive(Debug, PartialEq)]
struct Identifier(u64);

fn register_identifier(registry: &CustomTypes) {
    registry.register_typed(
        |id: Identifier| Ok::<_, BoxError>(id.0.to_string()),
        |s: String| -> Result<Identifier, BoxError> { Ok(Identifier(s.parse()?)) },
    );
}

#[test]
fn test_concurrent_marshalling() {
    let registry = Arc::new(CustomTypes::new());
    register_identifier(&registry);

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let wire = registry.marshal(DynValue::new(Identifier(i))).unwrap();
                assert_eq!(wire.downcast::<String>().unwrap(), i.to_string());

                let app = registry
                    .unmarshal(TypeKey::of::<Identifier>(), DynValue::new(i.to_string()))
                    .unwrap();
                assert_eq!(app.downcast::<Identifier>().unwrap(), Identifier(i));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_registration() {
    let registry = CustomTypes::new();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || register_identifier(&registry))
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // Every thread registered the same key; one record remains
    assert_eq!(registry.len(), 1);
    assert!(registry.is_registered_type::<Identifier>());
}

#[test]
fn test_registration_while_converting() {
    let registry = CustomTypes::new();
    register_identifier(&registry);

    let writer = {
        let registry = registry.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                register_identifier(&registry);
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    let wire = registry.marshal(DynValue::new(Identifier(i))).unwrap();
                    assert_eq!(wire.downcast::<String>().unwrap(), i.to_string());
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_record_shared_across_threads() {
    let registry = CustomTypes::new();
    register_identifier(&registry);
    let record = registry.get(TypeKey::of::<Identifier>()).unwrap();
    registry.clear();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let record = Arc::clone(&record);
            thread::spawn(move || {
                let wire = record.marshal(DynValue::new(Identifier(i))).unwrap();
                assert_eq!(wire.downcast::<String>().unwrap(), i.to_string());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
