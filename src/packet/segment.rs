//! 捕获报文解析
//!
//! 从一个 IPv4 数据报中取出地址、端口与序号状态。任何截断或不符合
//! 预期的输入都返回 `None`，调用方直接跳过该帧。

use std::net::Ipv4Addr;

use serde::Deserialize;

use super::checksum::IPPROTO_TCP;
use super::{IPV4_HEADER_LEN, TCP_HEADER_LEN};

/// 旧工具在 TCP 头之后额外跳过的固定区域（字节）
pub const MARKER_REGION_LEN: usize = 12;

/// 如何定位应用层载荷
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadPolicy {
    /// 以 TCP 数据偏移字段（×4）为准
    #[default]
    HeaderLength,
    /// 固定 20 字节 TCP 头再跳过 12 字节标记区；不适应可变长选项
    FixedMarker,
}

/// 单帧解析结果（序号均为主机字节序）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedSegment {
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub src_port: u16,
    pub dst_port: u16,
    pub seq: u32,
    pub ack: u32,
    pub payload_len: usize,
}

/// 解析 IPv4 + TCP 报文；非 TCP、被截断或载荷长度非正时返回 `None`。
pub fn parse_segment(ip: &[u8], policy: PayloadPolicy) -> Option<ParsedSegment> {
    if ip.len() < IPV4_HEADER_LEN || ip[0] >> 4 != 4 {
        return None;
    }
    let ihl = ((ip[0] & 0x0f) as usize) * 4;
    if ihl < IPV4_HEADER_LEN || ip[9] != IPPROTO_TCP {
        return None;
    }
    // 非首片不以 TCP 头开始
    if u16::from_be_bytes([ip[6], ip[7]]) & 0x1fff != 0 {
        return None;
    }
    let total_len = u16::from_be_bytes([ip[2], ip[3]]) as usize;
    let tcp = ip.get(ihl..)?;
    if tcp.len() < TCP_HEADER_LEN {
        return None;
    }

    let header_len = match policy {
        PayloadPolicy::HeaderLength => {
            let off = ((tcp[12] >> 4) as usize) * 4;
            if off < TCP_HEADER_LEN {
                return None;
            }
            off
        }
        PayloadPolicy::FixedMarker => TCP_HEADER_LEN + MARKER_REGION_LEN,
    };
    let payload_len = total_len.checked_sub(ihl + header_len)?;
    if payload_len == 0 {
        return None;
    }

    Some(ParsedSegment {
        src: Ipv4Addr::new(ip[12], ip[13], ip[14], ip[15]),
        dst: Ipv4Addr::new(ip[16], ip[17], ip[18], ip[19]),
        src_port: u16::from_be_bytes([tcp[0], tcp[1]]),
        dst_port: u16::from_be_bytes([tcp[2], tcp[3]]),
        seq: u32::from_be_bytes([tcp[4], tcp[5], tcp[6], tcp[7]]),
        ack: u32::from_be_bytes([tcp[8], tcp[9], tcp[10], tcp[11]]),
        payload_len,
    })
}
