//! 浏览器会话：连接已有浏览器或启动无头浏览器

pub mod connection;
pub mod headless;

pub use connection::connect_to_browser;
pub use headless::launch_headless_browser;
