//! 基于 libpcap 的实时抓包
//!
//! 建立过程视为一个整体：解析接口、打开句柄、确定链路层类型、查询
//! 网络/掩码、编译并安装过滤器。任一步失败都不会进入抓包循环，
//! 句柄随 `Capture` 一起释放。

use std::net::{IpAddr, Ipv4Addr};

use pcap::{Active, Capture, Device};
use tracing::{debug, info};

use super::context::FrameSource;
use super::endpoints::EndpointTuple;
use super::error::SetupError;
use super::link::LinkLayer;

const SNAPLEN: i32 = 65535;
const READ_TIMEOUT_MS: i32 = 512;

/// 接口的 IPv4 网络号与掩码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetInfo {
    pub network: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

impl NetInfo {
    fn from_device(device: &Device) -> Option<NetInfo> {
        device.addresses.iter().find_map(|a| match (a.addr, a.netmask) {
            (IpAddr::V4(addr), Some(IpAddr::V4(mask))) => Some(NetInfo {
                network: Ipv4Addr::from(u32::from(addr) & u32::from(mask)),
                netmask: mask,
            }),
            _ => None,
        })
    }
}

pub struct LiveCapture {
    cap: Capture<Active>,
    pub device: String,
    pub link: LinkLayer,
    pub net: NetInfo,
}

impl LiveCapture {
    #[tracing::instrument(skip(endpoints), fields(filter = %endpoints.filter_expression()))]
    pub fn open(interface: Option<&str>, endpoints: &EndpointTuple) -> Result<LiveCapture, SetupError> {
        let device = resolve_device(interface)?;
        let name = device.name.clone();
        info!(device = %name, "找到抓包接口");

        let mut cap = Capture::from_device(device.clone())
            .and_then(|c| c.promisc(true).snaplen(SNAPLEN).timeout(READ_TIMEOUT_MS).open())
            .map_err(|source| SetupError::Open {
                device: name.clone(),
                source,
            })?;
        debug!("已获得抓包句柄");

        let dlt = cap.get_datalink();
        let link = LinkLayer::from_dlt(dlt.0)?;
        info!(dlt = dlt.0, link = ?link, offset = link.offset(), "链路层类型");

        let net = NetInfo::from_device(&device).ok_or_else(|| SetupError::NetLookup(name.clone()))?;
        info!(network = %net.network, netmask = %net.netmask, "网络/掩码");

        let expr = endpoints.filter_expression();
        cap.filter(&expr, true)
            .map_err(|source| SetupError::Filter {
                expr: expr.clone(),
                source,
            })?;
        info!(filter = %expr, "过滤器已安装");

        Ok(LiveCapture {
            cap,
            device: name,
            link,
            net,
        })
    }
}

fn resolve_device(interface: Option<&str>) -> Result<Device, SetupError> {
    match interface {
        Some(name) => {
            let listed = Device::list().map_err(|e| SetupError::NoDevice(e.to_string()))?;
            // 未列出的接口名仍交给 libpcap 去打开
            Ok(listed
                .into_iter()
                .find(|d| d.name == name)
                .unwrap_or_else(|| Device::from(name)))
        }
        None => Device::lookup()
            .map_err(|e| SetupError::NoDevice(e.to_string()))?
            .ok_or_else(|| SetupError::NoDevice("no default capture device".to_string())),
    }
}

impl FrameSource for LiveCapture {
    fn next_frame(&mut self) -> Result<Option<Vec<u8>>, SetupError> {
        loop {
            match self.cap.next_packet() {
                Ok(p) => return Ok(Some(p.data.to_vec())),
                // 读超时只是没有新帧，继续等
                Err(pcap::Error::TimeoutExpired) => continue,
                Err(pcap::Error::NoMorePackets) => return Ok(None),
                Err(e) => return Err(SetupError::Capture(e)),
            }
        }
    }
}
