use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use licshim_protocol::{
    grant, release, validate_connection, LeaseRequest, ProtocolError, OFFLINE_LEASE_WINDOW_MS,
    SERVER_GUID, SERVER_RANDOMNESS,
};
use licshim_signing::{KeyStore, SigningService};
use pretty_assertions::assert_eq;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::{Digest, Sha1};

fn embedded_signer() -> SigningService {
    SigningService::new(Arc::new(KeyStore::from_embedded()))
}

fn keyless_signer() -> SigningService {
    SigningService::new(Arc::new(KeyStore::empty()))
}

fn valid_request() -> LeaseRequest {
    LeaseRequest {
        randomness: "abcd1234".to_string(),
        username: "alice".to_string(),
        guid: "11111111-2222-3333-4444-555555555555".to_string(),
        offline: false,
        client_time: None,
    }
}

// ── Validation ───────────────────────────────────────────────────

#[test]
fn rejects_empty_randomness() {
    let req = LeaseRequest {
        randomness: String::new(),
        ..valid_request()
    };
    assert_eq!(
        grant(&embedded_signer(), &req),
        Err(ProtocolError::MissingField("randomness"))
    );
}

#[test]
fn rejects_empty_username() {
    let req = LeaseRequest {
        username: String::new(),
        ..valid_request()
    };
    assert_eq!(
        grant(&embedded_signer(), &req),
        Err(ProtocolError::MissingField("username"))
    );
}

#[test]
fn rejects_empty_guid() {
    let req = LeaseRequest {
        guid: String::new(),
        ..valid_request()
    };
    assert_eq!(
        grant(&embedded_signer(), &req),
        Err(ProtocolError::MissingField("guid"))
    );
}

// ── Online grants ────────────────────────────────────────────────

#[test]
fn online_grant_has_null_validity_window() {
    let g = grant(&embedded_signer(), &valid_request()).unwrap();
    assert!(!g.offline);
    assert_eq!(g.valid_from, None);
    assert_eq!(g.valid_until, None);
    assert_eq!(g.company, "alice");
}

#[test]
fn online_grant_is_deterministic() {
    let signer = embedded_signer();
    let a = grant(&signer, &valid_request()).unwrap();
    let b = grant(&signer, &valid_request()).unwrap();
    assert_eq!(a.signature, b.signature);
}

#[test]
fn online_signature_covers_delimited_payload() {
    let key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
    let signer = SigningService::new(Arc::new(KeyStore::with_keys(Some(key.clone()), None)));
    let req = valid_request();
    let g = grant(&signer, &req).unwrap();

    let expected = format!("{};{};{};false", req.randomness, SERVER_RANDOMNESS, req.guid);
    let raw = BASE64.decode(&g.signature).unwrap();
    key.to_public_key()
        .verify(
            Pkcs1v15Sign::new::<Sha1>(),
            &Sha1::digest(expected.as_bytes()),
            &raw,
        )
        .expect("signature covers the ;-delimited payload");
}

// ── Offline grants ───────────────────────────────────────────────

#[test]
fn offline_window_is_exactly_180_days() {
    let req = LeaseRequest {
        offline: true,
        client_time: Some(1_700_000_000_000),
        ..valid_request()
    };
    let g = grant(&embedded_signer(), &req).unwrap();
    assert_eq!(g.valid_from, Some(1_700_000_000_000));
    assert_eq!(
        g.valid_until.unwrap() - g.valid_from.unwrap(),
        180 * 24 * 60 * 60 * 1000
    );
    assert_eq!(OFFLINE_LEASE_WINDOW_MS, 15_552_000_000);
}

#[test]
fn offline_without_client_time_uses_server_clock() {
    let before = chrono::Utc::now().timestamp_millis();
    let req = LeaseRequest {
        offline: true,
        client_time: None,
        ..valid_request()
    };
    let g = grant(&embedded_signer(), &req).unwrap();
    let after = chrono::Utc::now().timestamp_millis();

    let from = g.valid_from.unwrap();
    assert!(from >= before && from <= after);
}

#[test]
fn offline_signature_covers_window_payload() {
    let key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
    let signer = SigningService::new(Arc::new(KeyStore::with_keys(Some(key.clone()), None)));
    let req = LeaseRequest {
        offline: true,
        client_time: Some(1_600_000_000_000),
        ..valid_request()
    };
    let g = grant(&signer, &req).unwrap();

    let expected = format!(
        "{};{};{};true;{};{}",
        req.randomness,
        SERVER_RANDOMNESS,
        req.guid,
        1_600_000_000_000i64,
        1_600_000_000_000i64 + OFFLINE_LEASE_WINDOW_MS
    );
    let raw = BASE64.decode(&g.signature).unwrap();
    key.to_public_key()
        .verify(
            Pkcs1v15Sign::new::<Sha1>(),
            &Sha1::digest(expected.as_bytes()),
            &raw,
        )
        .expect("offline signature covers the windowed payload");
}

// ── Wire shape ───────────────────────────────────────────────────

#[test]
fn grant_serializes_with_exact_field_names_and_order() {
    // Keyless signer gives an empty signature, making the body fully fixed.
    let g = grant(&keyless_signer(), &valid_request()).unwrap();
    let json = serde_json::to_string(&g).unwrap();
    assert_eq!(
        json,
        format!(
            "{{\"serverVersion\":\"3.2.4\",\"serverProtocolVersion\":\"1.1\",\
             \"serverGuid\":\"{SERVER_GUID}\",\"groupType\":\"managed\",\
             \"id\":1,\"licenseType\":1,\"evaluationLicense\":false,\
             \"signature\":\"\",\"serverRandomness\":\"{SERVER_RANDOMNESS}\",\
             \"seatPoolType\":\"standalone\",\"statusCode\":\"SUCCESS\",\
             \"offline\":false,\"validFrom\":null,\"validUntil\":null,\
             \"company\":\"alice\",\"orderId\":\"\",\"zeroIds\":[],\
             \"licenseValidFrom\":1490544001000,\"licenseValidUntil\":1691839999000}}"
        )
    );
}

// ── Release & probe ──────────────────────────────────────────────

#[test]
fn release_echoes_username() {
    let ack = release(Some("bob"));
    assert_eq!(ack.company, "bob");
    assert_eq!(ack.status_code, "SUCCESS");
    assert_eq!(ack.msg, None);
    assert_eq!(ack.status_message, None);
}

#[test]
fn release_defaults_to_administrator() {
    assert_eq!(release(None).company, "Administrator");
    assert_eq!(release(Some("")).company, "Administrator");
}

#[test]
fn release_serializes_nulls() {
    let json = serde_json::to_string(&release(None)).unwrap();
    assert!(json.contains("\"msg\":null"));
    assert!(json.contains("\"statusMessage\":null"));
}

#[test]
fn validate_connection_reports_lease_available() {
    let status = validate_connection();
    assert!(status.can_get_lease);
    assert_eq!(status.company, "Administrator");
    assert_eq!(status.status_code, "SUCCESS");

    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"canGetLease\":true"));
}
