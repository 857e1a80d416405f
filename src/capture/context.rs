//! 抓包上下文与逐帧分发
//!
//! `CaptureContext` 只在一次抓包运行期间存在，独占链路偏移、帧计数与
//! 端点三元组。帧按抓取顺序逐个处理。

use std::ops::ControlFlow;

use tracing::{debug, trace};

use super::endpoints::EndpointTuple;
use super::error::SetupError;
use super::link::LinkLayer;
use crate::packet::{parse_segment, ParsedSegment, PayloadPolicy};

/// 阻塞式帧来源；`Ok(None)` 表示来源已耗尽。
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Vec<u8>>, SetupError>;
}

impl FrameSource for std::collections::VecDeque<Vec<u8>> {
    fn next_frame(&mut self) -> Result<Option<Vec<u8>>, SetupError> {
        Ok(self.pop_front())
    }
}

#[derive(Debug, Clone)]
pub struct CaptureContext {
    pub link: LinkLayer,
    pub endpoints: EndpointTuple,
    pub payload_policy: PayloadPolicy,
    frames_seen: u64,
}

impl CaptureContext {
    pub fn new(link: LinkLayer, endpoints: EndpointTuple, payload_policy: PayloadPolicy) -> Self {
        Self {
            link,
            endpoints,
            payload_policy,
            frames_seen: 0,
        }
    }

    /// 已处理的帧数（含被跳过的帧）
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// 处理一帧：计数、剥掉链路层头、解析，并要求
    /// 目的地址 = 客户端、源地址 = 服务端、源端口 = 服务端端口。
    #[tracing::instrument(level = "trace", skip(self, frame), fields(frame_no = self.frames_seen + 1, len = frame.len()))]
    pub fn inspect(&mut self, frame: &[u8]) -> Option<ParsedSegment> {
        self.frames_seen += 1;

        let Some(ip) = frame.get(self.link.offset()..) else {
            trace!("帧短于链路层头，跳过");
            return None;
        };
        let Some(seg) = parse_segment(ip, self.payload_policy) else {
            trace!("非 TCP 或无载荷，跳过");
            return None;
        };

        let ep = &self.endpoints;
        if seg.dst != ep.client {
            trace!(dst = %seg.dst, "目的地址不是客户端");
            return None;
        }
        debug!(client = %seg.dst, "匹配到客户端地址");
        if seg.src != ep.server {
            trace!(src = %seg.src, "源地址不是服务端");
            return None;
        }
        debug!(server = %seg.src, "匹配到服务端地址");
        if seg.src_port != ep.server_port {
            trace!(src_port = seg.src_port, "源端口不是服务端端口");
            return None;
        }
        debug!(
            server_port = seg.src_port,
            seq = seg.seq,
            ack = seg.ack,
            "匹配到服务端端口"
        );
        Some(seg)
    }
}

/// 驱动抓包循环。每个匹配帧调用一次 `on_match(段, 已见帧数)`；
/// 回调返回 `Break` 时循环结束并带回其值，来源耗尽时返回 `None`。
pub fn run_capture<S, F, B>(
    ctx: &mut CaptureContext,
    source: &mut S,
    mut on_match: F,
) -> Result<Option<B>, SetupError>
where
    S: FrameSource + ?Sized,
    F: FnMut(&ParsedSegment, u64) -> ControlFlow<B>,
{
    while let Some(frame) = source.next_frame()? {
        if let Some(seg) = ctx.inspect(&frame) {
            if let ControlFlow::Break(b) = on_match(&seg, ctx.frames_seen()) {
                return Ok(Some(b));
            }
        }
    }
    debug!(frames_seen = ctx.frames_seen(), "帧来源已耗尽");
    Ok(None)
}
