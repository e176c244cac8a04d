#![doc = include_str!("../README.md")]

mod common;
pub use common::*;

/// Generated protobuf/gRPC bindings for the `skycast` package.
pub mod proto {
    tonic::include_proto!("skycast");

    /// Encoded file descriptor set for gRPC reflection.
    pub const FILE_DESCRIPTOR_SET: &[u8] =
        include_bytes!(concat!(env!("OUT_DIR"), "/skycast_descriptor.bin"));
}
