//! Addressable resources.
//!
//! A resource is anything a deployer can turn into bytes or a local file
//! before launching an app. Access may block on network or disk I/O; the
//! resource itself is a cheap, immutable handle.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use std::fmt;
use std::path::PathBuf;

use crate::Result;

/// Stream of content chunks read from a resource.
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Trait for resources that can be materialized for deployment.
#[async_trait]
pub trait Resource: fmt::Display + Send + Sync {
    /// Human readable description, used in logs and error messages.
    fn description(&self) -> String {
        self.to_string()
    }

    /// Open the resource content as a stream of chunks.
    async fn input_stream(&self) -> Result<ByteStream>;

    /// Locate the resource on the local filesystem, fetching it first if needed.
    async fn file(&self) -> Result<PathBuf>;
}
