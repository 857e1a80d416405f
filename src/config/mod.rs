//! 运行配置
//!
//! 所有字段都有默认值；可以从 JSON 文件覆盖其中任意一部分。

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::packet::{BuildOptions, PayloadPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisruptConfig {
    /// 第一个伪造报文携带的命令串
    pub command: String,
    /// 两次发送之间的间隔（毫秒）
    pub inter_packet_delay_ms: u64,
    /// 在此帧数之前命中算 "early"
    pub early_threshold: u64,
    pub ttl: u8,
    pub window: u16,
    pub ip_ident: u16,
    pub max_packet_len: usize,
    pub payload_policy: PayloadPolicy,
}

impl Default for DisruptConfig {
    fn default() -> Self {
        let build = BuildOptions::default();
        Self {
            command: "\r\n".to_string(),
            inter_packet_delay_ms: 1_000,
            early_threshold: 100,
            ttl: build.ttl,
            window: build.window,
            ip_ident: build.ident,
            max_packet_len: build.max_len,
            payload_policy: PayloadPolicy::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DisruptConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            ttl: self.ttl,
            window: self.window,
            ident: self.ip_ident,
            max_len: self.max_packet_len,
        }
    }

    pub fn inter_packet_delay(&self) -> Duration {
        Duration::from_millis(self.inter_packet_delay_ms)
    }
}
