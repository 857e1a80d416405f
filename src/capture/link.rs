//! 链路层类型
//!
//! 抓到的帧在网络层之前有多少字节的链路层封装，由抓包句柄的
//! datalink 类型一次性决定。

use super::error::SetupError;

pub const DLT_NULL: i32 = 0;
pub const DLT_EN10MB: i32 = 1;
pub const DLT_SLIP: i32 = 8;
pub const DLT_PPP: i32 = 9;
pub const DLT_IEEE802_11: i32 = 105;
pub const DLT_LOOP: i32 = 108;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkLayer {
    /// BSD 回环封装
    Null,
    Ethernet,
    SlipPpp,
    /// 802.11
    Wireless,
}

impl LinkLayer {
    pub fn from_dlt(dlt: i32) -> Result<LinkLayer, SetupError> {
        match dlt {
            DLT_NULL | DLT_LOOP => Ok(LinkLayer::Null),
            DLT_EN10MB => Ok(LinkLayer::Ethernet),
            DLT_SLIP | DLT_PPP => Ok(LinkLayer::SlipPpp),
            DLT_IEEE802_11 => Ok(LinkLayer::Wireless),
            other => Err(SetupError::UnsupportedLinkType(other)),
        }
    }

    /// 链路层头长度（字节）
    pub fn offset(self) -> usize {
        match self {
            LinkLayer::Null => 4,
            LinkLayer::Ethernet => 14,
            LinkLayer::SlipPpp => 24,
            LinkLayer::Wireless => 22,
        }
    }
}
