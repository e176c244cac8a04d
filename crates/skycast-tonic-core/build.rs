//! Builds the gRPC client and server code for the `skycast.proto` definition
//! using `tonic-prost-build`.
//!
//! The generated bindings land in the crate's `OUT_DIR` together with an
//! encoded file descriptor set (`skycast_descriptor.bin`) that the server
//! feeds to gRPC reflection.

use std::env;
use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let descriptor_path = out_dir.join("skycast_descriptor.bin");

    let mut config = tonic_prost_build::Config::new();
    config.file_descriptor_set_path(&descriptor_path);

    tonic_prost_build::configure()
        .compile_with_config(config, &["proto/skycast.proto"], &["proto"])
        .unwrap();
}
