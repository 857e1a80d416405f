//! 会话匹配
//!
//! 在指定接口上实时抓包，只保留一个客户端/服务端/端口三元组的流量，
//! 并从服务端发往客户端的报文中取出当前的序号与确认号。

// 子模块声明
mod context;
mod endpoints;
mod error;
mod link;
mod live;

// 重新导出公共接口
pub use context::{run_capture, CaptureContext, FrameSource};
pub use endpoints::EndpointTuple;
pub use error::SetupError;
pub use link::LinkLayer;
pub use live::{LiveCapture, NetInfo};
