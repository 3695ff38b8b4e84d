use std::path::PathBuf;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;

use super::environment::Environment;

const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub diagnosis: DiagnosisSettings,
    pub speech: SpeechSettings,
    pub scratch: ScratchSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
            max_upload_mb: 25,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: None,
            timeout_secs: 60,
        }
    }
}

impl ServerSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

impl TranscriptionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisProvider {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
}

impl DiagnosisProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        }
    }

    /// Conventional environment variable holding this provider's key.
    pub fn api_key_variable(&self) -> &'static str {
        match self {
            Self::OpenAi => "GROQ_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagnosisSettings {
    pub provider: DiagnosisProvider,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
    pub safety: SafetySettings,
}

impl Default for DiagnosisSettings {
    fn default() -> Self {
        Self {
            provider: DiagnosisProvider::default(),
            api_key: None,
            base_url: None,
            model: None,
            temperature: 0.4,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 1024,
            timeout_secs: 120,
            safety: SafetySettings::default(),
        }
    }
}

impl DiagnosisSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Content-safety threshold per harm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    #[default]
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SafetySettings {
    pub harassment: BlockThreshold,
    pub hate_speech: BlockThreshold,
    pub sexually_explicit: BlockThreshold,
    pub dangerous_content: BlockThreshold,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub enabled: bool,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub voice_id: String,
    pub model_id: String,
    pub fallback_language: String,
    pub fallback_base_url: String,
    pub player_command: String,
    pub player_args: Vec<String>,
    pub synthesis_timeout_secs: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            elevenlabs_api_key: None,
            elevenlabs_base_url: "https://api.elevenlabs.io/v1".to_string(),
            // "Rachel"
            voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(),
            model_id: "eleven_turbo_v2".to_string(),
            fallback_language: "en".to_string(),
            fallback_base_url: "https://translate.google.com".to_string(),
            player_command: "ffplay".to_string(),
            player_args: vec![
                "-nodisp".to_string(),
                "-autoexit".to_string(),
                "-loglevel".to_string(),
                "quiet".to_string(),
            ],
            synthesis_timeout_secs: 30,
        }
    }
}

impl SpeechSettings {
    pub fn synthesis_timeout(&self) -> Duration {
        Duration::from_secs(self.synthesis_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScratchSettings {
    pub directory: Option<PathBuf>,
}

impl ScratchSettings {
    pub fn resolve_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("medivox"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,medivox=debug,tower_http=debug".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

impl Settings {
    /// Loads defaults, `appsettings.{env}.toml`, `APP__SECTION__KEY` variables
    /// and the conventional provider variables, in increasing precedence.
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        let builder = Config::builder()
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(" ")
                    .with_list_parse_key("speech.player_args"),
            )
            .set_override_option("server.host", env_var("SERVER_HOST"))?
            .set_override_option("server.port", env_var("SERVER_PORT"))?;

        let mut settings = Self::build(builder)?;
        settings.fill_provider_keys(env_var);
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from TOML text only, ignoring the process environment.
    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        let builder = Config::builder().add_source(File::from_str(contents, FileFormat::Toml));
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Keys set explicitly in configuration win over the conventional variables.
    pub fn fill_provider_keys(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.transcription.api_key.is_none() {
            self.transcription.api_key = lookup("GROQ_API_KEY");
        }
        if self.diagnosis.api_key.is_none() {
            self.diagnosis.api_key = lookup(self.diagnosis.provider.api_key_variable());
        }
        if self.speech.elevenlabs_api_key.is_none() {
            self.speech.elevenlabs_api_key = lookup("ELEVENLABS_API_KEY");
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.diagnosis.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(SettingsError::Invalid(format!(
                "diagnosis API key missing: set diagnosis.api_key or {}",
                self.diagnosis.provider.api_key_variable()
            )));
        }
        if self.server.max_upload_mb == 0 {
            return Err(SettingsError::Invalid(
                "server.max_upload_mb must be positive".to_string(),
            ));
        }
        for (key, secs) in [
            ("transcription.timeout_secs", self.transcription.timeout_secs),
            ("diagnosis.timeout_secs", self.diagnosis.timeout_secs),
            ("speech.synthesis_timeout_secs", self.speech.synthesis_timeout_secs),
        ] {
            if secs == 0 {
                return Err(SettingsError::Invalid(format!("{key} must be positive")));
            }
        }
        if self.speech.enabled && self.speech.player_command.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "speech.player_command must be set when speech is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
