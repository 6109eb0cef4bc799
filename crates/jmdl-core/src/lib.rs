pub mod advice;
pub mod client;
pub mod codec;
pub mod dir_rule;
pub mod downloader;
pub mod entity;
pub mod envelope;
pub mod logging;
pub mod naming;
pub mod option;
pub mod response;

pub use advice::{AdviceRegistry, OptionAdvice, OptionId};
pub use client::{ClientEnv, ClientImpl, JmClient};
pub use codec::ImageCodec;
pub use entity::{Album, Image, Photo};
pub use option::{JmOption, OptionContext, OptionError};
