use assert_cmd::Command;
use crypto::{sign_message, FileStorage, KeyStore};
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;

fn courier(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("courier").unwrap();
    cmd.env("COURIER_STORE", store).env_remove("RUST_LOG");
    cmd
}

fn json_of(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

fn generate(store: &Path, user: &str) -> String {
    let out = courier(store)
        .args(["keys", "generate", user, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = json_of(&out);
    assert_eq!(json["code"], "OK");
    json["result"]["publicKey"].as_str().unwrap().to_owned()
}

#[test]
fn seal_and_open() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path();
    generate(store, "alice");
    let bob = generate(store, "bob");

    let envelope = courier(store)
        .args(["seal", "--from", "alice", "--to", bob.as_str(), "--recipient", "bob", "hello"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = json_of(&envelope);
    assert_eq!(json["recipientId"], "bob");
    assert_eq!(json["metadata"]["senderName"], "alice");

    let out = courier(store)
        .args(["open", "--as", "bob", "--json"])
        .write_stdin(envelope)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = json_of(&out);
    assert_eq!(json["code"], "OK");
    assert_eq!(json["result"]["receipt"]["state"], "verified");
    assert_eq!(json["result"]["receipt"]["content"], "hello");
    assert_eq!(json["result"]["receipt"]["verifiedByCrypto"], true);
}

#[test]
fn generate_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let first = generate(dir.path(), "alice");
    let second = generate(dir.path(), "alice");
    assert_eq!(first, second);

    courier(dir.path())
        .args(["keys", "show", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains(first));
}

#[test]
fn third_party_cannot_open() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path();
    generate(store, "alice");
    let bob = generate(store, "bob");
    generate(store, "eve");

    let envelope = courier(store)
        .args(["seal", "--from", "alice", "--to", bob.as_str(), "--recipient", "bob"])
        .write_stdin("for bob only")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    courier(store)
        .args(["open", "--as", "eve"])
        .write_stdin(envelope)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("for bob only").not())
        .stderr(predicate::str::contains("ERR_DECRYPTION_FAILED"));
}

#[test]
fn missing_keys_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let out = courier(dir.path())
        .args(["keys", "show", "nobody", "--json"])
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let json = json_of(&out);
    assert_eq!(json["code"], "ERR_KEYS_NOT_FOUND");
}

#[test]
fn removed_keys_are_gone() {
    let dir = tempfile::tempdir().unwrap();
    generate(dir.path(), "alice");
    courier(dir.path())
        .args(["keys", "remove", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));
    courier(dir.path())
        .args(["keys", "show", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERR_KEYS_NOT_FOUND"));
}

#[test]
fn bad_public_key_is_rejected_by_the_parser() {
    let dir = tempfile::tempdir().unwrap();
    generate(dir.path(), "alice");
    courier(dir.path())
        .args(["seal", "--from", "alice", "--to", "not-a-key", "--recipient", "bob", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--to"));
}

fn forged_envelope(store: &Path) -> Vec<u8> {
    generate(store, "alice");
    let bob = generate(store, "bob");
    let envelope = courier(store)
        .args(["seal", "--from", "alice", "--to", bob.as_str(), "--recipient", "bob", "hello"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    // a well-formed signature by alice, but over different content
    let alice = KeyStore::new(FileStorage::new(store)).require_keys("alice").unwrap();
    let mut json = json_of(&envelope);
    json["signature"] = sign_message("goodbye", &alice.private_key().to_base64()).unwrap().into();
    json.to_string().into_bytes()
}

#[test]
fn forged_signature_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let envelope = forged_envelope(dir.path());
    let out = courier(dir.path())
        .args(["open", "--as", "bob", "--json"])
        .write_stdin(envelope)
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let json = json_of(&out);
    assert_eq!(json["code"], "ERR_SIGNATURE_INVALID");
    assert!(!String::from_utf8(out).unwrap().contains("hello"));
}

#[test]
fn forged_signature_can_be_shown_unverified() {
    let dir = tempfile::tempdir().unwrap();
    let envelope = forged_envelope(dir.path());
    let out = courier(dir.path())
        .args(["open", "--as", "bob", "--show-unverified", "--json"])
        .write_stdin(envelope.clone())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = json_of(&out);
    assert_eq!(json["code"], "OK");
    assert_eq!(json["result"]["receipt"]["state"], "unverified");
    assert_eq!(json["result"]["receipt"]["content"], "hello");

    courier(dir.path())
        .args(["open", "--as", "bob", "--show-unverified"])
        .write_stdin(envelope)
        .assert()
        .success()
        .stdout(predicate::str::contains("UNVERIFIED"));
}

#[test]
fn stdin_message_loses_its_line_break() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path();
    generate(store, "alice smith");
    let bob = generate(store, "josé");
    let envelope = courier(store)
        .args(["seal", "--from", "alice smith", "--to", bob.as_str(), "--recipient", "josé"])
        .write_stdin("hello\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let out = courier(store)
        .args(["open", "--as", "josé", "--json"])
        .write_stdin(envelope)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = json_of(&out);
    assert_eq!(json["result"]["receipt"]["content"], "hello");
    assert_eq!(json["result"]["senderName"], "alice smith");
}
