//! 会话端点三元组

use std::net::Ipv4Addr;

use super::error::SetupError;

/// 客户端地址、服务端地址、服务端端口；一次运行内不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointTuple {
    pub client: Ipv4Addr,
    pub server: Ipv4Addr,
    pub server_port: u16,
}

impl EndpointTuple {
    pub fn new(client: Ipv4Addr, server: Ipv4Addr, server_port: u16) -> Self {
        Self {
            client,
            server,
            server_port,
        }
    }

    /// 从点分十进制文本解析
    pub fn parse(client: &str, server: &str, server_port: u16) -> Result<Self, SetupError> {
        let parse = |s: &str| {
            s.trim()
                .parse::<Ipv4Addr>()
                .map_err(|_| SetupError::InvalidAddress(s.to_string()))
        };
        Ok(Self::new(parse(client)?, parse(server)?, server_port))
    }

    /// 抓包过滤表达式
    pub fn filter_expression(&self) -> String {
        format!(
            "tcp and port {} and host {} and host {}",
            self.server_port, self.server, self.client
        )
    }
}
