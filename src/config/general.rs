use serde::{Deserialize, Serialize};

// 全局设置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct GeneralConfig {
    // 下载列表的输出目录
    pub lists_output_dir: String,
    // 是否使用 Keenetic API
    pub use_keenetic_api: bool,
    // 是否使用 Keenetic DNS
    pub use_keenetic_dns: bool,
    // 备用 DNS 服务器地址
    pub fallback_dns: String,
}
