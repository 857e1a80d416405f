//! 原始套接字发送
//!
//! 套接字开启 IP 头包含模式，交给它的缓冲区就是完整的 IP 数据报。

use std::io;
use std::net::SocketAddrV4;

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::packet::hex_dump;

const IPPROTO_RAW: i32 = 255;

/// 原始套接字创建或配置失败；没有权限时进程无法继续。
#[derive(Debug, Error)]
pub enum PrivilegeError {
    #[error("could not create raw socket: {0}")]
    Socket(#[source] io::Error),
    #[error("could not enable header inclusion: {0}")]
    HeaderIncluded(#[source] io::Error),
}

impl PrivilegeError {
    /// 与抓包建立失败同属退出码 1
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// 单次发送失败，不中止本轮
#[derive(Debug, Error)]
#[error("send to {dst} failed: {source}")]
pub struct TransmissionError {
    pub dst: SocketAddrV4,
    #[source]
    pub source: io::Error,
}

/// 把完整 IP 报文发往目的地址
pub trait PacketSink {
    fn send(&mut self, packet: &[u8], dst: SocketAddrV4) -> Result<usize, TransmissionError>;
}

pub struct RawTransmitter {
    socket: Socket,
}

impl RawTransmitter {
    pub fn open() -> Result<RawTransmitter, PrivilegeError> {
        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::from(IPPROTO_RAW)))
            .map_err(PrivilegeError::Socket)?;
        // 失败时 socket 在此处被 drop 关闭
        socket
            .set_header_included(true)
            .map_err(PrivilegeError::HeaderIncluded)?;
        info!("原始套接字已就绪");
        Ok(RawTransmitter { socket })
    }
}

impl PacketSink for RawTransmitter {
    fn send(&mut self, packet: &[u8], dst: SocketAddrV4) -> Result<usize, TransmissionError> {
        trace!(len = packet.len(), dump = %hex_dump(packet), "发送报文");
        let n = self
            .socket
            .send_to(packet, &SockAddr::from(dst))
            .map_err(|source| TransmissionError { dst, source })?;
        debug!(%dst, bytes = n, "已发送");
        Ok(n)
    }
}

/// 只记录、不发送
#[derive(Debug, Default)]
pub struct DryRunSink {
    pub sent: Vec<(SocketAddrV4, Vec<u8>)>,
}

impl PacketSink for DryRunSink {
    fn send(&mut self, packet: &[u8], dst: SocketAddrV4) -> Result<usize, TransmissionError> {
        info!(%dst, len = packet.len(), "dry-run，未发送:\n{}", hex_dump(packet));
        self.sent.push((dst, packet.to_vec()));
        Ok(packet.len())
    }
}
