//! Scenario tests - simulating how services adopt the library.
//!
//! Each test plays out one situation a persistence or API layer runs into:
//! storing sealed graphs as JSON, rotating through the wrong key, reading a
//! tampered row, or sharing one key between worker threads.

use std::{sync::Arc, thread};

use base64::{engine::general_purpose::STANDARD, Engine};
use piihide::{
    cipher, decrypt_in_place, encrypt_in_place, CryptoError, Error, KeyMaterial, Pii, Protect,
    SealedValue, TraverseOptions, Traverser, TOKEN_PREFIX,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Pii, Serialize, Deserialize)]
struct Address {
    #[pii]
    street: String,
    city: String,
}

#[derive(Clone, PartialEq, Pii, Serialize, Deserialize)]
struct Customer {
    id: u64,
    #[pii]
    email: String,
    #[pii]
    phone: Option<String>,
    #[pii(nested)]
    addresses: Vec<Address>,
    tier: String,
}

fn customer() -> Customer {
    Customer {
        id: 1001,
        email: "wendy@example.com".into(),
        phone: Some("+44 20 7946 0018".into()),
        addresses: vec![
            Address {
                street: "42 Quarry Lane".into(),
                city: "Bobsville".into(),
            },
            Address {
                street: "7 Scrapyard Road".into(),
                city: "Bobsville".into(),
            },
        ],
        tier: "gold".into(),
    }
}

fn key() -> KeyMaterial {
    KeyMaterial::generate().unwrap()
}

/// Flips one bit inside the ciphertext of a sealed token.
fn tamper(token: &str) -> String {
    let encoded = token.strip_prefix(TOKEN_PREFIX).unwrap();
    let mut bytes = STANDARD.decode(encoded).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    format!("{TOKEN_PREFIX}{}", STANDARD.encode(bytes))
}

// =============================================================================
// Persistence boundary
// =============================================================================

#[test]
fn sealed_graph_serializes_as_plain_strings() {
    let key = key();
    let mut row = customer();
    row.encrypt_pii(&key).unwrap();

    let json = serde_json::to_value(&row).unwrap();
    assert!(json["email"].as_str().unwrap().starts_with(TOKEN_PREFIX));
    assert!(json["addresses"][1]["street"]
        .as_str()
        .unwrap()
        .starts_with(TOKEN_PREFIX));
    assert_eq!(json["tier"], "gold");
    assert_eq!(json["addresses"][0]["city"], "Bobsville");

    let rendered = json.to_string();
    assert!(!rendered.contains("wendy@example.com"));
    assert!(!rendered.contains("Quarry"));
}

#[test]
fn stored_rows_open_after_a_json_round_trip() {
    let key = key();
    let mut row = customer();
    row.encrypt_pii(&key).unwrap();

    let stored = serde_json::to_string(&row).unwrap();
    let mut loaded: Customer = serde_json::from_str(&stored).unwrap();
    loaded.decrypt_pii(&key).unwrap();
    assert!(loaded == customer());
}

// =============================================================================
// Key handling
// =============================================================================

#[test]
fn wrong_key_fails_authentication_at_the_first_leaf() {
    let mut row = customer();
    row.encrypt_pii(&key()).unwrap();

    let err = row.decrypt_pii(&key()).unwrap_err();
    assert!(matches!(err, Error::Decryption { .. }));
    assert_eq!(err.path().unwrap().to_string(), "email");
}

#[test]
fn one_key_serves_many_graphs() {
    let key = key();
    let mut first = customer();
    let mut second = customer();
    second.email = "bob@example.com".into();

    first.encrypt_pii(&key).unwrap();
    second.encrypt_pii(&key).unwrap();
    first.decrypt_pii(&key).unwrap();
    second.decrypt_pii(&key).unwrap();

    assert_eq!(first.email, "wendy@example.com");
    assert_eq!(second.email, "bob@example.com");
}

#[test]
fn key_debug_output_hides_bytes() {
    let key = key();
    let rendered = format!("{key:?}");
    assert!(rendered.contains("[PII]"));
    assert!(rendered.contains("ChaCha20-Poly1305") || rendered.contains("ChaCha20Poly1305"));
}

// =============================================================================
// Integrity
// =============================================================================

#[test]
fn identical_values_seal_to_different_tokens() {
    let key = key();
    let mut row = customer();
    row.addresses[1].street = row.addresses[0].street.clone();
    row.encrypt_pii(&key).unwrap();
    assert_ne!(row.addresses[0].street, row.addresses[1].street);

    row.decrypt_pii(&key).unwrap();
    assert_eq!(row.addresses[0].street, "42 Quarry Lane");
    assert_eq!(row.addresses[1].street, "42 Quarry Lane");
}

#[test]
fn tampered_field_fails_with_its_path() {
    let key = key();
    let mut row = customer();
    row.encrypt_pii(&key).unwrap();
    row.addresses[1].street = tamper(&row.addresses[1].street);

    let err = row.decrypt_pii(&key).unwrap_err();
    assert!(matches!(err, Error::Decryption { .. }));
    assert_eq!(err.path().unwrap().to_string(), "addresses[1].street");
}

#[test]
fn edited_token_text_never_opens() {
    let key = key();
    let token = cipher::seal("42 Quarry Lane", &key).unwrap().into_string();
    // The last quad carries padding and the final symbol's spare bits.
    let last_quad = token.len() - 4;

    for (index, current) in token.char_indices() {
        let replacement = if current == 'A' { 'B' } else { 'A' };
        let mut edited = token.clone();
        edited.replace_range(index..index + 1, &replacement.to_string());

        let err = cipher::open_token(&edited, &key).unwrap_err();
        if index < TOKEN_PREFIX.len() {
            assert!(
                matches!(err, CryptoError::MalformedInput(_)),
                "prefix edit at {index}: {err:?}"
            );
        } else if index < last_quad {
            assert_eq!(err, CryptoError::Decryption, "body edit at {index}");
        } else {
            assert!(
                matches!(err, CryptoError::Decryption | CryptoError::MalformedInput(_)),
                "tail edit at {index}: {err:?}"
            );
        }
    }
}

#[test]
fn truncated_token_is_malformed() {
    let key = key();
    let mut row = customer();
    row.encrypt_pii(&key).unwrap();
    row.phone = Some(format!("{TOKEN_PREFIX}AAAA"));

    let err = row.decrypt_pii(&key).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { .. }));
    assert_eq!(err.path().unwrap().to_string(), "phone");
}

#[test]
fn garbage_after_prefix_is_malformed() {
    let key = key();
    let err = cipher::open_token("pii:v1:not base64!", &key).unwrap_err();
    assert!(matches!(err, CryptoError::MalformedInput(_)));
}

// =============================================================================
// Partial failure
// =============================================================================

#[test]
fn failed_decrypt_leaves_earlier_fields_open() {
    let key = key();
    let mut row = customer();
    row.encrypt_pii(&key).unwrap();
    row.addresses[1].street = tamper(&row.addresses[1].street);

    assert!(row.decrypt_pii(&key).is_err());
    assert_eq!(row.email, "wendy@example.com");
    assert_eq!(row.addresses[0].street, "42 Quarry Lane");
    assert!(SealedValue::is_sealed(&row.addresses[1].street));
}

#[test]
fn preflight_keeps_mixed_graphs_untouched() {
    let key = key();
    let mut row = customer();
    encrypt_in_place(&mut row.addresses[1], &key).unwrap();
    let before = row.clone();

    let traverser = Traverser::new(TraverseOptions::default().with_preflight(true));
    let err = traverser.encrypt_in_place(&mut row, &key).unwrap_err();
    assert!(matches!(err, Error::AlreadySealed { .. }));
    assert_eq!(err.path().unwrap().to_string(), "addresses[1].street");
    assert!(row == before);
}

#[test]
fn preflight_does_not_catch_authentication_failures() {
    let key = key();
    let mut row = customer();
    row.encrypt_pii(&key).unwrap();
    row.addresses[0].street = tamper(&row.addresses[0].street);

    let traverser = Traverser::new(TraverseOptions::default().with_preflight(true));
    let err = traverser.decrypt_in_place(&mut row, &key).unwrap_err();
    assert!(matches!(err, Error::Decryption { .. }));
    // Leaves ahead of the tampered one were already opened.
    assert_eq!(row.email, "wendy@example.com");
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn workers_share_one_key() {
    let key = Arc::new(key());
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let key = Arc::clone(&key);
            thread::spawn(move || {
                let mut row = customer();
                row.id = worker;
                encrypt_in_place(&mut row, &key).unwrap();
                row
            })
        })
        .collect();

    for handle in handles {
        let mut row = handle.join().unwrap();
        assert!(SealedValue::is_sealed(&row.email));
        decrypt_in_place(&mut row, &key).unwrap();
        assert_eq!(row.email, "wendy@example.com");
    }
}
