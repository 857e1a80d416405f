//! 反码校验和
//!
//! IP 头与 TCP 段共用的 16 位反码求和（RFC 1071），以及 TCP 伪首部方案。

use std::net::Ipv4Addr;

/// TCP 的 IP 协议号
pub const IPPROTO_TCP: u8 = 6;

/// 对任意字节序列计算 16 位反码校验和。
///
/// 按大端 16 位字求和；奇数长度时最后一个字节作为高字节，低字节补零。
pub fn checksum(bytes: &[u8]) -> u16 {
    let mut sum = sum_words(bytes, 0);
    while sum >> 16 != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    !(sum as u16)
}

/// 计算 TCP 段的校验和（段内校验和字段需预先置零）。
///
/// 先累加 12 字节伪首部：源地址、目的地址、零字节、协议号、TCP 段长度。
/// 伪首部长度字段只有 16 位，`segment` 不得超过 65535 字节。
pub fn tcp_checksum(src: Ipv4Addr, dst: Ipv4Addr, segment: &[u8]) -> u16 {
    debug_assert!(segment.len() <= u16::MAX as usize, "TCP segment longer than 65535 bytes");
    let mut pseudo = [0u8; 12];
    pseudo[0..4].copy_from_slice(&src.octets());
    pseudo[4..8].copy_from_slice(&dst.octets());
    pseudo[9] = IPPROTO_TCP;
    pseudo[10..12].copy_from_slice(&(segment.len() as u16).to_be_bytes());

    let mut sum = sum_words(&pseudo, 0);
    sum = sum_words(segment, sum);
    while sum >> 16 != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    !(sum as u16)
}

fn sum_words(bytes: &[u8], init: u32) -> u32 {
    let mut chunks = bytes.chunks_exact(2);
    let mut sum = init;
    for w in &mut chunks {
        // 先折叠一次，避免超长输入把 32 位累加器溢出
        sum = fold_once(sum + u16::from_be_bytes([w[0], w[1]]) as u32);
    }
    if let [last] = chunks.remainder() {
        sum = fold_once(sum + ((*last as u32) << 8));
    }
    sum
}

#[inline]
fn fold_once(sum: u32) -> u32 {
    if sum > 0xffff_0000 {
        (sum & 0xffff) + (sum >> 16)
    } else {
        sum
    }
}
