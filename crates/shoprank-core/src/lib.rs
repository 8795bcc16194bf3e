pub mod app_config;
pub mod category;
pub mod config;
pub mod error;
pub mod platform;
pub mod products;
pub mod query;

pub use app_config::{AppConfig, CoupangCredentials, Environment, NaverCredentials};
pub use category::{infer_category, Category, KeywordTable, DEFAULT_KEYWORDS};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use platform::Platform;
pub use products::{discount_rate, Pricing, ProductRecord};
pub use query::{FallbackMode, SortKey};
