//! 一次完整的抓包 + 扰乱运行

use std::ops::ControlFlow;

use tracing::info;

use crate::capture::{run_capture, CaptureContext, FrameSource, SetupError};
use crate::disrupt::{DisruptionReport, Orchestrator, PacketSink};

/// 抓包直到第一轮扰乱完成；来源耗尽而未命中时返回 `None`。
pub fn run_session<F, S>(
    ctx: &mut CaptureContext,
    source: &mut F,
    orchestrator: &mut Orchestrator<S>,
) -> Result<Option<DisruptionReport>, SetupError>
where
    F: FrameSource + ?Sized,
    S: PacketSink,
{
    info!(filter = %ctx.endpoints.filter_expression(), link = ?ctx.link, "开始抓包");
    run_capture(ctx, source, |seg, frames_seen| {
        match orchestrator.on_match(seg, frames_seen) {
            Some(report) => ControlFlow::Break(report),
            None => ControlFlow::Continue(()),
        }
    })
}
