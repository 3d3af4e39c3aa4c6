//! Process-wide configuration, built once at startup from the environment.

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::error::ConfigError;
use crate::models::{IndicatorParams, SeriesKey, Strategy, Timeframe};
use crate::signals::SignalThresholds;

pub const DEFAULT_SYMBOL: &str = "EURUSD=X";
pub const DEFAULT_DATA_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Deployment environment name (`APP_ENV`), `development` when unset.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "development".to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailConfig {
    pub user: String,
    pub password: String,
    pub to: String,
    pub smtp_host: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub symbols: Vec<String>,
    pub timeframes: Vec<Timeframe>,
    pub strategies: Vec<Strategy>,
    pub indicators: IndicatorParams,
    pub thresholds: SignalThresholds,
    pub poll_interval_seconds: u64,
    pub lookback_bars: usize,
    pub fetch_timeout_seconds: u64,
    pub fetch_retries: usize,
    pub data_base_url: String,
    /// `None` when the bot token or chat id is missing
    pub telegram: Option<TelegramConfig>,
    /// `None` when any of the email credentials is missing
    pub email: Option<EmailConfig>,
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: vec![DEFAULT_SYMBOL.to_string()],
            timeframes: vec![Timeframe::H1],
            strategies: vec![Strategy::TrendContinuation],
            indicators: IndicatorParams::default(),
            thresholds: SignalThresholds::default(),
            poll_interval_seconds: 3600,
            lookback_bars: 500,
            fetch_timeout_seconds: 15,
            fetch_retries: 2,
            data_base_url: DEFAULT_DATA_BASE_URL.to_string(),
            telegram: None,
            email: None,
            dry_run: false,
        }
    }
}

impl Config {
    /// Load from the process environment (call `dotenvy::dotenv()` first).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let d = &defaults.indicators;
        let t = &defaults.thresholds;

        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let config = Config {
            symbols: match get("ALERT_SYMBOLS") {
                Some(raw) => split_list(&raw),
                None => defaults.symbols.clone(),
            },
            timeframes: match get("ALERT_TIMEFRAMES") {
                Some(raw) => parse_list(&raw)?,
                None => defaults.timeframes.clone(),
            },
            strategies: match get("ALERT_STRATEGIES") {
                Some(raw) => parse_list(&raw)?,
                None => defaults.strategies.clone(),
            },
            indicators: IndicatorParams {
                ema_fast: parse_or(&get, "EMA_FAST", d.ema_fast)?,
                ema_slow: parse_or(&get, "EMA_SLOW", d.ema_slow)?,
                rsi: parse_or(&get, "RSI_PERIOD", d.rsi)?,
                macd_fast: parse_or(&get, "MACD_FAST", d.macd_fast)?,
                macd_slow: parse_or(&get, "MACD_SLOW", d.macd_slow)?,
                macd_signal: parse_or(&get, "MACD_SIGNAL", d.macd_signal)?,
                stoch_k: parse_or(&get, "STOCH_K", d.stoch_k)?,
                stoch_d: parse_or(&get, "STOCH_D", d.stoch_d)?,
                atr: parse_or(&get, "ATR_PERIOD", d.atr)?,
            },
            thresholds: SignalThresholds {
                rsi_midline: parse_or(&get, "RSI_MIDLINE", t.rsi_midline)?,
                stoch_oversold: parse_or(&get, "STOCH_OVERSOLD", t.stoch_oversold)?,
                stoch_overbought: parse_or(&get, "STOCH_OVERBOUGHT", t.stoch_overbought)?,
            },
            poll_interval_seconds: parse_or(
                &get,
                "POLL_INTERVAL_SECONDS",
                defaults.poll_interval_seconds,
            )?,
            lookback_bars: parse_or(&get, "LOOKBACK_BARS", defaults.lookback_bars)?,
            fetch_timeout_seconds: parse_or(
                &get,
                "FETCH_TIMEOUT_SECONDS",
                defaults.fetch_timeout_seconds,
            )?,
            fetch_retries: parse_or(&get, "FETCH_RETRIES", defaults.fetch_retries)?,
            data_base_url: get("DATA_BASE_URL").unwrap_or(defaults.data_base_url.clone()),
            telegram: match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
                (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                    bot_token,
                    chat_id,
                    api_url: get("TELEGRAM_API_URL")
                        .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
                }),
                _ => None,
            },
            email: match (get("EMAIL_USER"), get("EMAIL_PASS"), get("EMAIL_TO")) {
                (Some(user), Some(password), Some(to)) => Some(EmailConfig {
                    user,
                    password,
                    to,
                    smtp_host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                }),
                _ => None,
            },
            dry_run: get("DRY_RUN").map(|v| parse_flag(&v)).unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.indicators;
        let periods = [
            ("EMA_FAST", p.ema_fast),
            ("EMA_SLOW", p.ema_slow),
            ("RSI_PERIOD", p.rsi),
            ("MACD_FAST", p.macd_fast),
            ("MACD_SLOW", p.macd_slow),
            ("MACD_SIGNAL", p.macd_signal),
            ("STOCH_K", p.stoch_k),
            ("STOCH_D", p.stoch_d),
            ("ATR_PERIOD", p.atr),
        ];
        if let Some((key, _)) = periods.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Validation(format!("{} must be >= 1", key)));
        }
        if p.ema_fast >= p.ema_slow {
            return Err(ConfigError::Validation(
                "EMA_FAST must be shorter than EMA_SLOW".to_string(),
            ));
        }
        if p.macd_fast >= p.macd_slow {
            return Err(ConfigError::Validation(
                "MACD_FAST must be shorter than MACD_SLOW".to_string(),
            ));
        }
        let t = &self.thresholds;
        if !(0.0..=100.0).contains(&t.stoch_oversold)
            || !(0.0..=100.0).contains(&t.stoch_overbought)
            || t.stoch_oversold >= t.stoch_overbought
        {
            return Err(ConfigError::Validation(
                "stochastic levels must satisfy 0 <= oversold < overbought <= 100".to_string(),
            ));
        }
        if self.symbols.is_empty() {
            return Err(ConfigError::Validation("no symbols configured".to_string()));
        }
        if self.timeframes.is_empty() {
            return Err(ConfigError::Validation("no timeframes configured".to_string()));
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::Validation("no strategies configured".to_string()));
        }
        if self.poll_interval_seconds == 0 {
            return Err(ConfigError::Validation(
                "POLL_INTERVAL_SECONDS must be > 0".to_string(),
            ));
        }
        if self.lookback_bars == 0 {
            return Err(ConfigError::Validation("LOOKBACK_BARS must be > 0".to_string()));
        }

        let required = p.longest_lookback() + 1;
        if self.lookback_bars < required {
            warn!(
                lookback = self.lookback_bars,
                required,
                "LOOKBACK_BARS is shorter than the indicator warm-up; no signals will ever fire"
            );
        }
        Ok(())
    }

    /// Every (symbol, timeframe) pair, in evaluation order.
    pub fn pairs(&self) -> Vec<SeriesKey> {
        self.symbols
            .iter()
            .flat_map(|symbol| {
                self.timeframes
                    .iter()
                    .map(move |tf| SeriesKey::new(symbol.clone(), *tf))
            })
            .collect()
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::invalid(key, raw)),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_list<T>(raw: &str) -> Result<Vec<T>, ConfigError>
where
    T: FromStr<Err = ConfigError>,
{
    split_list(raw).iter().map(|s| s.parse()).collect()
}

/// `1`, `true` and `yes` (any case) are truthy.
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
