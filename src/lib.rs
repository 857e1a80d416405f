pub mod capture;
pub mod config;
pub mod disrupt;
pub mod packet;
pub mod session;

#[cfg(test)]
mod test;
