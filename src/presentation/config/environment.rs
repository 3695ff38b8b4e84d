use std::fmt;
use std::str::FromStr;

/// Deployment profile, read from `APP_ENVIRONMENT`. Selects which
/// `appsettings.{profile}.toml` overlay is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Local,
    Test,
    Prod,
}

impl Environment {
    pub const VARIABLE: &'static str = "APP_ENVIRONMENT";

    /// Falls back to `Local` when the variable is unset.
    pub fn from_env() -> Result<Self, String> {
        std::env::var(Self::VARIABLE)
            .map_or(Ok(Self::default()), |value| value.parse())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Test => "test",
            Self::Prod => "prod",
        }
    }

    pub fn settings_file(&self) -> String {
        format!("appsettings.{}", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "local" | "dev" | "development" => Ok(Self::Local),
            "test" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Prod),
            _ => Err(format!(
                "Invalid {}: {:?}. Expected local, test or prod",
                Self::VARIABLE,
                raw
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
