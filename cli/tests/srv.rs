//! # Helpdesk CLI Srv Integration Tests
//!
//! File: cli/tests/srv.rs
//!
//! ## Overview
//!
//! Integration tests for `helpdesk srv`. The endpoints themselves are tested
//! against the router in `routes.rs`; these tests only cover argument and
//! startup handling of the binary.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_srv_rejects_invalid_host() {
    let env = TestEnv::new("");
    env.cmd()
        .args(["srv", "--host", "not-an-ip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_srv_strict_port_fails_when_taken() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();

    let env = TestEnv::new("");
    env.cmd()
        .args(["srv", "--host", "127.0.0.1", "--port", &port, "--strict-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not find an available port"));
}
