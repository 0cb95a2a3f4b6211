//! CLI 플래그/환경변수 기반 설정 모듈.
//!
//! 모든 플래그는 같은 이름의 환경변수로도 지정할 수 있고 `.env` 파일도 읽습니다.
//! 빈 문자열은 설정하지 않은 것으로 취급합니다.

use crate::error::CollectorError;
use crate::Result;
use clap::Parser;
use secrecy::SecretString;
use simplefin_core::{AccessCredential, LogConfig, LogFormat};
use simplefin_credentials::{ResolverConfig, StoreRef};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_INTERVAL: &str = "1h";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/0";

/// 명령줄 인자.
#[derive(Debug, Parser)]
#[command(name = "simplefin-exporter")]
#[command(about = "SimpleFin Bridge Prometheus exporter", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SimpleFin Setup Token (base64 claim URL, 1회용)
    #[arg(long, env = "SIMPLEFIN_SETUP_TOKEN", hide_env_values = true)]
    pub setup_token: Option<String>,

    /// SimpleFin Access URL
    #[arg(long, env = "SIMPLEFIN_ACCESS_URL", hide_env_values = true)]
    pub access_url: Option<String>,

    /// Access URL을 읽을 1회용 파일 (읽은 후 삭제, 실패 시 종료)
    #[arg(long, env = "SIMPLEFIN_ACCESS_URL_FILE")]
    pub access_url_volatile_file: Option<PathBuf>,

    /// Access URL을 보관할 저장소 레코드 namespace
    #[arg(long, env = "SIMPLEFIN_SECRET_NAMESPACE")]
    pub secret_namespace: Option<String>,

    /// Access URL을 보관할 저장소 레코드 이름
    #[arg(long, env = "SIMPLEFIN_SECRET_NAME")]
    pub secret_name: Option<String>,

    /// 자격증명 저장소 Redis URL
    #[arg(long, env = "REDIS_URL", default_value = DEFAULT_REDIS_URL, hide_env_values = true)]
    pub redis_url: String,

    /// 계좌 ID → 표시 이름 매핑 JSON 파일
    #[arg(long, env = "SIMPLEFIN_ACCOUNT_MAPPINGS")]
    pub account_mappings_file: Option<PathBuf>,

    /// 메트릭 서버 바인드 주소
    #[arg(long, env = "SIMPLEFIN_BIND_ADDRESS", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: String,

    /// 메트릭 서버 포트
    #[arg(long, env = "SIMPLEFIN_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// 조회 주기 (예: "1h", "30m", "1h30m")
    #[arg(long, env = "SIMPLEFIN_UPDATE_INTERVAL", default_value = DEFAULT_INTERVAL)]
    pub update_interval: String,

    /// 계좌 조회 요청 타임아웃 (초, 미지정 시 타임아웃 없음)
    #[arg(long, env = "SIMPLEFIN_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// 디버그 로그 활성화
    #[arg(long, env = "SIMPLEFIN_DEBUG")]
    pub debug: bool,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 자격증명 소스
    pub credentials: ResolverConfig,
    /// 자격증명 저장소 Redis URL
    pub redis_url: SecretString,
    /// 계좌 매핑 파일
    pub mappings_file: Option<PathBuf>,
    /// 메트릭 서버 설정
    pub server: ServerConfig,
    /// 폴링 설정
    pub poll: PollConfig,
    /// 로깅 설정
    pub log: LogConfig,
}

/// 메트릭 서버 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: IpAddr,
    pub port: u16,
}

/// 폴링 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// 조회 간 대기 시간 (작업 시간과 무관하게 고정)
    pub interval: Duration,
    /// 계좌 조회 요청 타임아웃
    pub request_timeout: Option<Duration>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            credentials: ResolverConfig::default(),
            redis_url: SecretString::from(DEFAULT_REDIS_URL),
            mappings_file: None,
            server: ServerConfig::default(),
            poll: PollConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60 * 60),
            request_timeout: None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

impl CollectorConfig {
    /// `.env`와 명령줄에서 설정 로드
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_cli(Cli::parse())
    }

    /// 파싱된 명령줄 인자를 검증하여 설정 생성
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let store_ref = match (non_empty(cli.secret_namespace), non_empty(cli.secret_name)) {
            (Some(namespace), Some(name)) => StoreRef::new(namespace, name),
            _ => None,
        };

        let credentials = ResolverConfig {
            setup_token: non_empty(cli.setup_token).map(SecretString::from),
            access_url: non_empty(cli.access_url).map(AccessCredential::new),
            volatile_file: cli
                .access_url_volatile_file
                .filter(|p| !p.as_os_str().is_empty()),
            store_ref,
        };

        let bind_address: IpAddr = cli.bind_address.trim().parse().map_err(|e| {
            CollectorError::Config(format!("invalid bind address '{}': {}", cli.bind_address, e))
        })?;

        let interval = parse_interval(&cli.update_interval)?;

        Ok(Self {
            credentials,
            redis_url: SecretString::from(cli.redis_url),
            mappings_file: cli
                .account_mappings_file
                .filter(|p| !p.as_os_str().is_empty()),
            server: ServerConfig {
                bind_address,
                port: cli.port,
            },
            poll: PollConfig {
                interval,
                request_timeout: cli
                    .request_timeout_secs
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs),
            },
            log: LogConfig::for_debug(cli.debug).with_format(cli.log_format),
        })
    }
}

/// 조회 주기 문자열을 파싱합니다.
///
/// 단위: `ms`, `s`, `m`, `h`, `d`. 여러 단위를 이어 쓸 수 있고 (`1h30m`)
/// 소수도 허용합니다 (`1.5h`). 0 이하의 값은 에러입니다.
pub fn parse_interval(input: &str) -> Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CollectorError::Config("empty duration string".to_string()));
    }

    let is_number = |c: char| c.is_ascii_digit() || c == '.';
    let mut rest = input;
    let mut total_ms = 0f64;

    while !rest.is_empty() {
        let num_end = rest.find(|c: char| !is_number(c)).unwrap_or(rest.len());
        if num_end == 0 {
            return Err(CollectorError::Config(format!(
                "invalid duration '{}': expected a number",
                input
            )));
        }
        let value: f64 = rest[..num_end].parse().map_err(|_| {
            CollectorError::Config(format!("invalid number in duration '{}'", input))
        })?;
        rest = &rest[num_end..];

        let unit_end = rest.find(is_number).unwrap_or(rest.len());
        let multiplier = match &rest[..unit_end] {
            "ms" => 1.0,
            "s" => 1_000.0,
            "m" => 60_000.0,
            "h" => 3_600_000.0,
            "d" => 86_400_000.0,
            "" => {
                return Err(CollectorError::Config(format!(
                    "duration '{}' missing unit suffix (ms/s/m/h/d)",
                    input
                )))
            }
            unit => {
                return Err(CollectorError::Config(format!(
                    "unknown duration unit '{}' in '{}'",
                    unit, input
                )))
            }
        };
        total_ms += value * multiplier;
        rest = &rest[unit_end..];
    }

    let millis = total_ms.round();
    if millis < 1.0 {
        return Err(CollectorError::Config(format!(
            "duration '{}' must be greater than zero",
            input
        )));
    }

    Ok(Duration::from_millis(millis as u64))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
