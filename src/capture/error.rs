//! 抓包建立阶段的错误
//!
//! 这些错误只终止本次抓包，由调用方换算成进程退出码。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid IPv4 address: {0:?}")]
    InvalidAddress(String),
    #[error("no capture hardware found: {0}")]
    NoDevice(String),
    #[error("could not open capture on {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: pcap::Error,
    },
    #[error("unsupported datalink type: {0}")]
    UnsupportedLinkType(i32),
    #[error("no IPv4 network/netmask on {0}")]
    NetLookup(String),
    #[error("could not install filter {expr:?}: {source}")]
    Filter {
        expr: String,
        #[source]
        source: pcap::Error,
    },
    #[error("capture failed: {0}")]
    Capture(#[source] pcap::Error),
}

impl SetupError {
    /// 1 = 建立失败，2 = 链路层类型不支持
    pub fn exit_code(&self) -> u8 {
        match self {
            SetupError::UnsupportedLinkType(_) => 2,
            _ => 1,
        }
    }
}
