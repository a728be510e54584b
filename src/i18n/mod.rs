/// 国际化模块 - 消息目录与翻译
mod messages;

pub use messages::{Language, Message, Translator, keys};
