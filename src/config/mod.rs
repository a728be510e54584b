mod loader;
/// 配置模块 - 运行配置与配置文件加载
mod types;

pub use loader::ConfigLoader;
pub use types::RunConfig;
