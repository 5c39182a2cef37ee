use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Knowledge provider stamped on every path edge and used in edge keys.
    pub provider: String,
    pub aggregator: String,
    pub reasoner_source: String,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            provider: "infores:rtx-kg2".into(),
            aggregator: "infores:arax".into(),
            reasoner_source: "infores:arax-reasoner-ara".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CreativeConfig {
    pub path_delimiter: String,
    pub self_loop_sentinel: String,
    pub self_loop_placeholder: String,
    pub treat_predicate: String,
    /// How many fully resolvable path variants are projected per drug/disease pair.
    pub max_variants_per_pair: usize,
}

impl Default for CreativeConfig {
    fn default() -> Self {
        Self {
            path_delimiter: "->".into(),
            self_loop_sentinel: "SELF_LOOP_RELATION".into(),
            self_loop_placeholder: "biolink:self_loop_relation".into(),
            treat_predicate: "biolink:probably_treats".into(),
            max_variants_per_pair: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Maturity {
    Development,
    Staging,
    Testing,
    Production,
}

impl Maturity {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "development" | "dev" => Some(Maturity::Development),
            "staging" => Some(Maturity::Staging),
            "testing" | "test" => Some(Maturity::Testing),
            "production" | "prod" => Some(Maturity::Production),
            _ => None,
        }
    }
}

impl std::fmt::Display for Maturity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Maturity::Development => "development",
            Maturity::Staging => "staging",
            Maturity::Testing => "testing",
            Maturity::Production => "production",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DeploymentConfig {
    pub domain: Option<String>,
    pub instance_name: Option<String>,
    pub branch: Option<String>,
    pub maturity_override: Option<String>,
    pub kg2_url_override: Option<String>,
}

impl DeploymentConfig {
    fn instance(&self) -> Option<&str> {
        match self.instance_name.as_deref() {
            Some("production") => Some("ARAX"),
            other => other,
        }
    }

    pub fn maturity(&self) -> Maturity {
        if let Some(maturity) = self.maturity_override.as_deref().and_then(Maturity::parse) {
            return maturity;
        }

        let domain = self.domain.as_deref().unwrap_or_default();
        let branch = self.branch.as_deref().unwrap_or_default();
        match domain {
            "arax.ci.transltr.io" | "kg2.ci.transltr.io" | "Github actions ARAX test suite" => {
                Maturity::Staging
            }
            "arax.test.transltr.io" | "kg2.test.transltr.io" => Maturity::Testing,
            _ if branch == "itrb-test" => Maturity::Testing,
            "arax.transltr.io" | "kg2.transltr.io" => Maturity::Production,
            _ if branch == "production" => Maturity::Production,
            "arax.ncats.io" if matches!(self.instance(), Some("ARAX" | "kg2")) => {
                Maturity::Production
            }
            _ => Maturity::Development,
        }
    }

    pub fn is_itrb_instance(&self) -> bool {
        self.domain
            .as_deref()
            .is_some_and(|domain| domain.contains("transltr.io"))
    }

    pub fn kg2_url(&self) -> String {
        if let Some(url) = &self.kg2_url_override {
            return url.clone();
        }
        let maturity = self.maturity();
        let url = if self.is_itrb_instance() {
            match maturity {
                Maturity::Production => "https://kg2.transltr.io/api/rtxkg2/v1.2",
                Maturity::Testing => "https://kg2.test.transltr.io/api/rtxkg2/v1.2",
                _ => "https://kg2.ci.transltr.io/api/rtxkg2/v1.2",
            }
        } else if maturity == Maturity::Production {
            "https://arax.ncats.io/api/rtxkg2/v1.2"
        } else {
            "https://arax.ncats.io/beta/api/rtxkg2/v1.2"
        };
        url.to_string()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct AraxConfig {
    pub knowledge: KnowledgeConfig,
    pub creative: CreativeConfig,
    pub deployment: DeploymentConfig,
}

impl AraxConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(".")
    }

    /// Layers `config/default`, `config/{RUN_MODE}` and `ARAX_*` variables.
    pub fn load_from(base_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let config_dir = base_dir.as_ref().join("config");

        let builder = Config::builder()
            .add_source(File::with_name(&config_dir.join("default").to_string_lossy()))
            .add_source(
                File::with_name(&config_dir.join(&run_mode).to_string_lossy()).required(false),
            )
            .add_source(Environment::with_prefix("ARAX").separator("__"));

        let config: AraxConfig = builder.build()?.try_deserialize()?;
        tracing::info!(
            maturity = %config.deployment.maturity(),
            itrb = config.deployment.is_itrb_instance(),
            provider = %config.knowledge.provider,
            "configuration loaded"
        );
        Ok(config)
    }
}
