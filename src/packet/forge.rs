//! 伪造报文构造
//!
//! 把 IPv4 头、TCP 头与载荷拼成一段连续的线上字节。纯数据变换：
//! 相同输入总是得到逐字节相同的输出，且每次调用返回新分配的缓冲区。

use std::net::Ipv4Addr;

use thiserror::Error;

use super::checksum::{checksum, tcp_checksum, IPPROTO_TCP};
use super::{IPV4_HEADER_LEN, TCP_HEADER_LEN};

/// TCP 标志位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TcpFlags {
    pub syn: bool,
    pub ack: bool,
    pub rst: bool,
    pub psh: bool,
}

impl TcpFlags {
    pub const SYN: u8 = 0x02;
    pub const RST: u8 = 0x04;
    pub const PSH: u8 = 0x08;
    pub const ACK: u8 = 0x10;

    /// 投影到 TCP 头第 13 字节
    pub fn bits(self) -> u8 {
        let mut b = 0;
        if self.syn {
            b |= Self::SYN;
        }
        if self.rst {
            b |= Self::RST;
        }
        if self.psh {
            b |= Self::PSH;
        }
        if self.ack {
            b |= Self::ACK;
        }
        b
    }
}

/// 一个待发送的伪造报文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgedPacket {
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub src_port: u16,
    pub dst_port: u16,
    pub flags: TcpFlags,
    pub seq: u32,
    pub ack: u32,
    pub payload: Vec<u8>,
}

impl ForgedPacket {
    /// 线上总长度（IP 头 + TCP 头 + 载荷）
    pub fn wire_len(&self) -> usize {
        IPV4_HEADER_LEN + TCP_HEADER_LEN + self.payload.len()
    }
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub ttl: u8,
    /// 固定通告窗口
    pub window: u16,
    /// IP 标识字段
    pub ident: u16,
    /// 报文最大长度（字节），超出视为调用方违约
    pub max_len: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            ttl: 64,
            window: 65535,
            ident: 0,
            max_len: 1500,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("packet of {needed} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { needed: usize, max: usize },
}

/// 构造完整的 IPv4 + TCP 报文。
pub fn build_packet(pkt: &ForgedPacket, opts: &BuildOptions) -> Result<Vec<u8>, BuildError> {
    let total = pkt.wire_len();
    // total_length 字段只有 16 位
    let max = opts.max_len.min(u16::MAX as usize);
    if total > max {
        return Err(BuildError::PayloadTooLarge { needed: total, max });
    }

    let mut buf = vec![0u8; total];
    let (ip, tcp) = buf.split_at_mut(IPV4_HEADER_LEN);

    ip[0] = 0x45; // version 4, IHL 5
    ip[2..4].copy_from_slice(&(total as u16).to_be_bytes());
    ip[4..6].copy_from_slice(&opts.ident.to_be_bytes());
    ip[6..8].copy_from_slice(&0x4000u16.to_be_bytes()); // DF
    ip[8] = opts.ttl;
    ip[9] = IPPROTO_TCP;
    ip[12..16].copy_from_slice(&pkt.src.octets());
    ip[16..20].copy_from_slice(&pkt.dst.octets());
    let ip_sum = checksum(ip);
    ip[10..12].copy_from_slice(&ip_sum.to_be_bytes());

    tcp[0..2].copy_from_slice(&pkt.src_port.to_be_bytes());
    tcp[2..4].copy_from_slice(&pkt.dst_port.to_be_bytes());
    tcp[4..8].copy_from_slice(&pkt.seq.to_be_bytes());
    tcp[8..12].copy_from_slice(&pkt.ack.to_be_bytes());
    tcp[12] = ((TCP_HEADER_LEN / 4) as u8) << 4;
    tcp[13] = pkt.flags.bits();
    tcp[14..16].copy_from_slice(&opts.window.to_be_bytes());
    // tcp[18..20] 紧急指针 = 0
    tcp[TCP_HEADER_LEN..].copy_from_slice(&pkt.payload);
    let tcp_sum = tcp_checksum(pkt.src, pkt.dst, tcp);
    tcp[16..18].copy_from_slice(&tcp_sum.to_be_bytes());

    Ok(buf)
}
