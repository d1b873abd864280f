//! 基础设施层：持有稀缺资源（页面、HTTP 客户端），只暴露能力

pub mod chrome_navigator;
pub mod http_publisher;
pub mod js_executor;
pub mod memory_publisher;
pub mod navigator;
pub mod publisher;

pub use chrome_navigator::ChromeNavigator;
pub use http_publisher::HttpPublisher;
pub use js_executor::JsExecutor;
pub use memory_publisher::MemoryPublisher;
pub use navigator::{Element, Locator, Navigator};
pub use publisher::{Channel, Envelope, Message, Publisher};
