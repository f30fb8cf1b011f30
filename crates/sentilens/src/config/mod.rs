use std::path::PathBuf;

use clap::{value_parser, Arg, ArgMatches, Command};
use once_cell::sync::Lazy;

use crate::built_info;

/// 默认配置目录，数据库文件与额外词典默认都放在这里
pub static CONFIG_DIR: Lazy<PathBuf> = Lazy::new(|| {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sentilens")
});

/// 未提供来源时记录使用的平台标签
pub const DEFAULT_PLATFORM: &str = "Web";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub config_dir: PathBuf,
    pub database_url: Option<String>,
    pub log_level: String,
    pub cors_origin: String,
    pub default_platform: String,
    pub lexicon_extras: Option<PathBuf>,
    pub broadcast_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
            config_dir: CONFIG_DIR.clone(),
            database_url: None,
            log_level: "info".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            default_platform: DEFAULT_PLATFORM.to_string(),
            lexicon_extras: None,
            broadcast_capacity: 100,
        }
    }
}

fn command() -> Command {
    Command::new(built_info::PKG_NAME)
        .version(built_info::PKG_VERSION)
        .about("社交媒体情感分析服务")
        .arg(
            Arg::new("bind")
                .long("bind")
                .env("SENTILENS_BIND")
                .default_value("0.0.0.0")
                .help("监听地址"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .env("PORT")
                .default_value("5000")
                .value_parser(value_parser!(u16))
                .help("监听端口"),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .env("SENTILENS_CONFIG_DIR")
                .value_parser(value_parser!(PathBuf))
                .help("配置目录，默认为系统配置目录下的 sentilens"),
        )
        .arg(
            Arg::new("database-url")
                .long("database-url")
                .env("SENTILENS_DATABASE_URL")
                .help("SQLite 连接串，未设置时使用配置目录下的 data.sqlite"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .env("SENTILENS_LOG_LEVEL")
                .default_value("info")
                .help("日志级别"),
        )
        .arg(
            Arg::new("cors-origin")
                .long("cors-origin")
                .env("SENTILENS_CORS_ORIGIN")
                .default_value("http://localhost:5173")
                .help("允许跨域访问的前端地址，* 表示任意来源"),
        )
        .arg(
            Arg::new("default-platform")
                .long("default-platform")
                .env("SENTILENS_DEFAULT_PLATFORM")
                .default_value(DEFAULT_PLATFORM)
                .help("请求未携带平台时写入的平台标签"),
        )
        .arg(
            Arg::new("lexicon-extras")
                .long("lexicon-extras")
                .env("SENTILENS_LEXICON_EXTRAS")
                .value_parser(value_parser!(PathBuf))
                .help("额外词典文件（每行 词<TAB>分值），覆盖内置词典"),
        )
        .arg(
            Arg::new("broadcast-capacity")
                .long("broadcast-capacity")
                .env("SENTILENS_BROADCAST_CAPACITY")
                .default_value("100")
                .value_parser(value_parser!(u64).range(1..=65536))
                .help("实时推送通道容量"),
        )
}

impl Config {
    /// 从命令行参数与环境变量加载配置，参数非法时直接退出
    pub fn load() -> Self {
        Self::try_parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = command().try_get_matches_from(args)?;
        Ok(Self::from_matches(&matches))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let defaults = Self::default();
        let string_of = |id: &str, fallback: String| matches.get_one::<String>(id).cloned().unwrap_or(fallback);

        Self {
            bind: string_of("bind", defaults.bind),
            port: matches.get_one::<u16>("port").copied().unwrap_or(defaults.port),
            config_dir: matches
                .get_one::<PathBuf>("config-dir")
                .cloned()
                .unwrap_or(defaults.config_dir),
            database_url: matches.get_one::<String>("database-url").cloned(),
            log_level: string_of("log-level", defaults.log_level),
            cors_origin: string_of("cors-origin", defaults.cors_origin),
            default_platform: string_of("default-platform", defaults.default_platform),
            lexicon_extras: matches.get_one::<PathBuf>("lexicon-extras").cloned(),
            broadcast_capacity: matches
                .get_one::<u64>("broadcast-capacity")
                .map(|v| *v as usize)
                .unwrap_or(defaults.broadcast_capacity),
        }
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn database_path(&self) -> PathBuf {
        self.config_dir.join("data.sqlite")
    }
}
