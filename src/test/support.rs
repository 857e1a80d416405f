use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};

use crate::capture::EndpointTuple;
use crate::disrupt::{PacketSink, TransmissionError};
use crate::packet::{build_packet, BuildOptions, ForgedPacket, TcpFlags};

pub const CLIENT: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 5);
pub const SERVER: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 9);
pub const SERVER_PORT: u16 = 23;
pub const CLIENT_PORT: u16 = 40512;

pub fn endpoints() -> EndpointTuple {
    EndpointTuple::new(CLIENT, SERVER, SERVER_PORT)
}

/// Server -> client segment carrying `payload`.
pub fn server_segment(seq: u32, ack: u32, payload: &[u8]) -> ForgedPacket {
    ForgedPacket {
        src: SERVER,
        dst: CLIENT,
        src_port: SERVER_PORT,
        dst_port: CLIENT_PORT,
        flags: TcpFlags {
            ack: true,
            psh: true,
            ..TcpFlags::default()
        },
        seq,
        ack,
        payload: payload.to_vec(),
    }
}

/// Wrap an IP datagram in `link_len` bytes of zeroed link-layer framing.
pub fn frame(link_len: usize, pkt: &ForgedPacket) -> Vec<u8> {
    let mut out = vec![0u8; link_len];
    out.extend(build_packet(pkt, &BuildOptions::default()).expect("build packet"));
    out
}

pub fn ethernet_frame(pkt: &ForgedPacket) -> Vec<u8> {
    frame(14, pkt)
}

/// Records every packet; fails the sends whose index is in `fail_on`.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub sent: Vec<(SocketAddrV4, Vec<u8>)>,
    pub attempts: usize,
    pub fail_on: Vec<usize>,
}

impl PacketSink for RecordingSink {
    fn send(&mut self, packet: &[u8], dst: SocketAddrV4) -> Result<usize, TransmissionError> {
        let idx = self.attempts;
        self.attempts += 1;
        if self.fail_on.contains(&idx) {
            return Err(TransmissionError {
                dst,
                source: io::Error::new(io::ErrorKind::Other, "injected failure"),
            });
        }
        self.sent.push((dst, packet.to_vec()));
        Ok(packet.len())
    }
}
