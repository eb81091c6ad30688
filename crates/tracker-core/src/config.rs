//! 설정 관리.
//!
//! 기본값 → TOML 파일(선택) → `TRACKER__` 접두사 환경 변수 순서로 병합합니다.
//!
//! ```text
//! TRACKER__AUTH__JWT_SECRET=...        # 필수, 32바이트 이상
//! TRACKER__AUTH__TOKEN_TTL_MINUTES=60
//! TRACKER__STORAGE__BACKEND=file
//! TRACKER__STORAGE__DATA_DIR=data
//! ```

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{TrackerError, TrackerResult};
use crate::logging::{LogConfig, LogFormat};

/// 서명 키 최소 길이 (바이트).
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// 토큰 유효 시간 상한 (1년, 분 단위).
pub const MAX_TOKEN_TTL_MINUTES: i64 = 365 * 24 * 60;

/// 애플리케이션 설정.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 저장소 설정
    pub storage: StorageConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// 바인딩 주소.
    pub fn socket_addr(&self) -> TrackerResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| TrackerError::Config(format!("invalid server address: {}", e)))
    }
}

/// 인증 설정.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// 토큰 서명 키. 기본값 없음.
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub jwt_secret: Option<SecretString>,
    /// 토큰 유효 시간 (분)
    pub token_ttl_minutes: i64,
    /// 목록 조회를 토큰 없이 허용할지 여부
    pub public_reads: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_minutes: 60,
            public_reads: true,
        }
    }
}

impl AuthConfig {
    /// 서명 키를 꺼냅니다. 없거나 너무 짧으면 설정 에러.
    pub fn require_secret(&self) -> TrackerResult<&SecretString> {
        let secret = self.jwt_secret.as_ref().ok_or_else(|| {
            TrackerError::Config(
                "auth.jwt_secret is not set (TRACKER__AUTH__JWT_SECRET)".to_string(),
            )
        })?;
        if secret.expose_secret().len() < MIN_JWT_SECRET_LEN {
            return Err(TrackerError::Config(format!(
                "auth.jwt_secret must be at least {} bytes",
                MIN_JWT_SECRET_LEN
            )));
        }
        Ok(secret)
    }

    /// 토큰 유효 시간. 1분 이상 1년 이하만 허용합니다.
    pub fn token_ttl(&self) -> TrackerResult<chrono::Duration> {
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.token_ttl_minutes) {
            return Err(TrackerError::Config(format!(
                "auth.token_ttl_minutes must be between 1 and {}",
                MAX_TOKEN_TTL_MINUTES
            )));
        }
        Ok(chrono::Duration::minutes(self.token_ttl_minutes))
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.is_empty())
        .map(|s| SecretString::new(s.into())))
}

/// 저장소 백엔드 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// 프로세스 메모리 (재시작 시 소실)
    #[default]
    Memory,
    /// 데이터 디렉토리의 JSON 파일
    File,
}

/// 저장소 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 백엔드 종류
    pub backend: StorageBackend,
    /// JSON 파일 디렉토리 (`file` 백엔드)
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("data"),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// 로깅 초기화용 설정으로 변환. 알 수 없는 형식은 pretty.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig::new(&self.level)
            .with_format(self.format.parse().unwrap_or(LogFormat::Pretty))
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일은 없어도 됩니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("auth.token_ttl_minutes", 60)?
            .set_default("auth.public_reads", true)?
            .set_default("storage.backend", "memory")?
            .set_default("storage.data_dir", "data")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("TRACKER")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// `TRACKER_CONFIG` 또는 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        let path = std::env::var("TRACKER_CONFIG")
            .unwrap_or_else(|_| "config/default.toml".to_string());
        Self::load(path)
    }

    /// 시작 전에 필수 설정을 검증합니다.
    pub fn validate(&self) -> TrackerResult<()> {
        self.auth.require_secret()?;
        self.auth.token_ttl()?;
        self.server.socket_addr()?;
        Ok(())
    }
}
