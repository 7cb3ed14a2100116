pub mod js_executor;
pub mod page_driver;

pub use js_executor::JsExecutor;
pub use page_driver::{BrowserProfile, PageDriver, PageLauncher, WaitUntil};
