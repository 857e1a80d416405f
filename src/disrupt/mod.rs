//! 会话扰乱
//!
//! 用匹配到的序号状态合成伪造报文，并通过原始套接字发往客户端。

// 子模块声明
mod orchestrator;
mod transmitter;

// 重新导出公共接口
pub use orchestrator::{plan_round, DisruptionReport, Orchestrator, Phase, RunState};
pub use transmitter::{DryRunSink, PacketSink, PrivilegeError, RawTransmitter, TransmissionError};
