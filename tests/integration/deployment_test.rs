// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::Path;

fn dockerfile() -> String {
    std::fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("Dockerfile")).unwrap()
}

#[test]
fn runtime_packages_exist_on_the_base_image() {
    let dockerfile = dockerfile();
    assert!(dockerfile.contains("FROM debian:bookworm-slim"));
    // GConf was dropped from Debian before bookworm
    assert!(!dockerfile.contains("libgconf"));
}

#[test]
fn builder_tracks_current_stable_and_uses_the_lockfile() {
    let dockerfile = dockerfile();
    assert!(dockerfile.contains("FROM rust:1-bookworm AS builder"));
    assert!(dockerfile.contains("COPY Cargo.toml Cargo.lock* ./"));
    assert!(dockerfile.contains("EXPOSE 8000"));
}
