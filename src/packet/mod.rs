//! 原始 IPv4/TCP 报文
//!
//! 此模块负责校验和计算、伪造报文的构造，以及捕获报文的解析。

// 子模块声明
mod checksum;
mod dump;
mod forge;
mod segment;

// 重新导出公共接口
pub use checksum::{checksum, tcp_checksum, IPPROTO_TCP};
pub use dump::hex_dump;
pub use forge::{build_packet, BuildError, BuildOptions, ForgedPacket, TcpFlags};
pub use segment::{parse_segment, ParsedSegment, PayloadPolicy};

/// IPv4 头长度（无选项，字节）
pub const IPV4_HEADER_LEN: usize = 20;
/// TCP 头长度（无选项，字节）
pub const TCP_HEADER_LEN: usize = 20;
