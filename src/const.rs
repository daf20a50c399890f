// 应用常量定义

//
// 配置参数限制常量
//

// 应用关闭等待时间限制
pub mod shutdown_timeout {
    // 默认值
    pub const DEFAULT: u64 = 30;
    // 最小值
    pub const MIN: u64 = 1;
    // 最大值
    pub const MAX: u64 = 120;
}

// 服务器默认值
pub mod server_defaults {
    // 默认HTTP监听地址
    pub const DEFAULT_LISTEN: &str = "0.0.0.0:3000";
    // 默认配置文件路径
    pub const DEFAULT_CONFIG_PATH: &str = "/opt/etc/keen-pbr/keen-pbr.conf";
}

// 配置文档默认值
pub mod config_defaults {
    // 默认IP版本
    pub const DEFAULT_IP_VERSION: u8 = 4;
    // 允许的IP版本
    pub const IP_VERSIONS: [u8; 2] = [4, 6];
}

// 文件写入
pub mod file_modes {
    // 配置文件与列表文件的权限
    pub const DOCUMENT_MODE: u32 = 0o644;
}

// 列表文件格式
pub mod list_file {
    // 注释前缀
    pub const COMMENT_PREFIX: char = '#';
}

// 外部命令
pub mod commands {
    // 默认 keen-pbr 可执行文件
    pub const DEFAULT_KEEN_PBR: &str = "keen-pbr";
    // 默认 init 脚本目录
    pub const DEFAULT_INIT_DIR: &str = "/opt/etc/init.d";
    // keen-pbr 服务脚本
    pub const KEEN_PBR_SERVICE: &str = "S80keen-pbr";
    // dnsmasq 服务脚本
    pub const DNSMASQ_SERVICE: &str = "S56dnsmasq";
    // 单个命令的最长执行时间（秒）
    pub const TIMEOUT_SECS: u64 = 60;

    // keen-pbr 子命令
    pub mod args {
        pub const DOWNLOAD: &str = "download";
        pub const SELF_CHECK: &str = "self-check";
        pub const UNDO_ROUTING: &str = "undo-routing";
        pub const INTERFACES: &str = "interfaces";
        pub const PRINT_DNSMASQ_CONFIG: &str = "print-dnsmasq-config";
        pub const DNS: &str = "dns";
        pub const RESTART: &str = "restart";
    }
}

//
// 指标标签常量
//

// API 操作标签
pub mod operation_labels {
    pub const GET_CONFIG: &str = "get_config";
    pub const PUT_CONFIG: &str = "put_config";
    pub const GET_CONFIG_RAW: &str = "get_config_raw";
    pub const PUT_CONFIG_RAW: &str = "put_config_raw";
    pub const LIST_ALL: &str = "list_all";
    pub const LIST_GET: &str = "list_get";
    pub const LIST_CREATE: &str = "list_create";
    pub const LIST_DELETE: &str = "list_delete";
    pub const LIST_UPDATE: &str = "list_update_entries";
    pub const ACTION: &str = "action";
    pub const STATUS: &str = "status";
}

// 写入模式标签
pub mod write_mode_labels {
    // 结构化写入
    pub const STRUCTURED: &str = "structured";
    // 原始文本写入
    pub const RAW: &str = "raw";
    // 列表文件写入
    pub const LIST_FILE: &str = "list_file";
}

// 命令执行结果标签
pub mod action_result_labels {
    pub const SUCCESS: &str = "success";
    pub const FAILURE: &str = "failure";
}

// 子系统名称
pub mod subsystem_names {
    // API服务器子系统
    pub const API_SERVER: &str = "api_server";
}

// HTTP 路径常量
pub mod api_paths {
    pub const CONFIG: &str = "/api/config";
    pub const CONFIG_RAW: &str = "/api/config/raw";
    pub const LISTS: &str = "/api/lists";
    pub const LIST: &str = "/api/lists/{name}";
    pub const ACTION: &str = "/api/actions/{action}";
    pub const STATUS: &str = "/api/status";
    pub const HEALTH: &str = "/health";
    pub const METRICS: &str = "/metrics";
}

// HTTP头常量
pub mod http_headers {
    // 内容类型常量
    pub mod content_types {
        // 原始配置文本
        pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
    }
}
