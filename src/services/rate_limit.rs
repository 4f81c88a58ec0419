// src/services/rate_limit.rs
//! Fixed-window request counters, keyed per caller and per IP.

use crate::services::settings::SettingsService;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub authenticated_limit: u32,
    pub anonymous_limit: u32,
    pub per_ip_limit: u32,
    pub window_seconds: u32,
    pub whitelist_ips: Vec<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            authenticated_limit: 100,
            anonymous_limit: 20,
            per_ip_limit: 50,
            window_seconds: 60,
            whitelist_ips: vec!["127.0.0.1".to_string(), "::1".to_string()],
        }
    }
}

/// One tunable: its environment variable and its `system_settings` key
struct Knob {
    env: &'static str,
    setting: &'static str,
}

const ENABLED: Knob = Knob { env: "RATE_LIMIT_ENABLED", setting: "rate_limit_enabled" };
const AUTHENTICATED: Knob = Knob { env: "RATE_LIMIT_AUTHENTICATED", setting: "rate_limit_authenticated_per_minute" };
const ANONYMOUS: Knob = Knob { env: "RATE_LIMIT_ANONYMOUS", setting: "rate_limit_anonymous_per_minute" };
const PER_IP: Knob = Knob { env: "RATE_LIMIT_PER_IP", setting: "rate_limit_per_ip_per_minute" };
const WINDOW: Knob = Knob { env: "RATE_LIMIT_WINDOW_SECONDS", setting: "rate_limit_window_seconds" };
const WHITELIST: Knob = Knob { env: "RATE_LIMIT_WHITELIST_IPS", setting: "rate_limit_whitelist_ips" };

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl RateLimitConfig {
    /// Applies every value in `lookup` that parses; unparseable values keep the default.
    fn apply(&mut self, lookup: impl Fn(&Knob) -> Option<String>) {
        if let Some(v) = lookup(&ENABLED) {
            self.enabled = v.to_lowercase() != "false";
        }
        let numbers = [
            (&AUTHENTICATED, &mut self.authenticated_limit),
            (&ANONYMOUS, &mut self.anonymous_limit),
            (&PER_IP, &mut self.per_ip_limit),
            (&WINDOW, &mut self.window_seconds),
        ];
        for (knob, slot) in numbers {
            if let Some(parsed) = lookup(knob).and_then(|v| v.trim().parse::<u32>().ok()) {
                *slot = parsed;
            }
        }
        if let Some(v) = lookup(&WHITELIST) {
            self.whitelist_ips = parse_list(&v);
        }
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply(|knob| env::var(knob.env).ok());
        config
    }
}

#[derive(Debug, Clone)]
struct Window {
    count: u32,
    started: Instant,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RateLimitResult {
    Allowed,
    Limited { retry_after: u32 },
}

#[derive(Debug)]
pub struct RateLimitService {
    settings_service: Arc<SettingsService>,
    windows: RwLock<HashMap<String, Window>>,
}

impl RateLimitService {
    pub fn new(settings_service: Arc<SettingsService>) -> Self {
        let env_config = RateLimitConfig::from_env();
        info!(
            enabled = env_config.enabled,
            authenticated_limit = env_config.authenticated_limit,
            anonymous_limit = env_config.anonymous_limit,
            per_ip_limit = env_config.per_ip_limit,
            window_seconds = env_config.window_seconds,
            "Initializing RateLimitService"
        );
        Self {
            settings_service,
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// Environment variables win; database settings fill the gaps.
    pub async fn get_config(&self) -> RateLimitConfig {
        let mut config = RateLimitConfig::default();

        let mut stored = HashMap::new();
        for knob in [&ENABLED, &AUTHENTICATED, &ANONYMOUS, &PER_IP, &WINDOW, &WHITELIST] {
            if env::var(knob.env).is_err() {
                if let Ok(Some(value)) = self.settings_service.get_setting(knob.setting).await {
                    stored.insert(knob.env, value);
                }
            }
        }

        config.apply(|knob| env::var(knob.env).ok().or_else(|| stored.get(knob.env).cloned()));
        config
    }

    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        ip_address: Option<&str>,
        is_authenticated: bool,
    ) -> RateLimitResult {
        let config = self.get_config().await;
        self.check_with_config(&config, identifier, ip_address, is_authenticated)
            .await
    }

    pub async fn check_with_config(
        &self,
        config: &RateLimitConfig,
        identifier: &str,
        ip_address: Option<&str>,
        is_authenticated: bool,
    ) -> RateLimitResult {
        if !config.enabled {
            return RateLimitResult::Allowed;
        }
        if let Some(ip) = ip_address {
            if config.whitelist_ips.iter().any(|w| w == ip) {
                return RateLimitResult::Allowed;
            }
        }

        let window = Duration::from_secs(config.window_seconds as u64);
        let limit = if is_authenticated {
            config.authenticated_limit
        } else {
            config.anonymous_limit
        };

        let result = self.hit(identifier, limit, window).await;
        if result != RateLimitResult::Allowed {
            return result;
        }

        match ip_address {
            Some(ip) => self.hit(&format!("ip:{}", ip), config.per_ip_limit, window).await,
            None => RateLimitResult::Allowed,
        }
    }

    async fn hit(&self, key: &str, limit: u32, window: Duration) -> RateLimitResult {
        let mut windows = self.windows.write().await;
        let now = Instant::now();

        let entry = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(entry.started) > window {
            entry.count = 0;
            entry.started = now;
        }

        if entry.count >= limit {
            let elapsed = now.duration_since(entry.started).as_secs() as u32;
            let retry_after = (window.as_secs() as u32).saturating_sub(elapsed).max(1);
            return RateLimitResult::Limited { retry_after };
        }

        entry.count += 1;
        RateLimitResult::Allowed
    }

    pub fn log_violation(&self, identifier: &str, ip_address: Option<&str>, endpoint: &str) {
        warn!(
            identifier = %identifier,
            ip_address = ?ip_address,
            endpoint = %endpoint,
            "Rate limit violation detected"
        );
    }

    /// Drops windows older than `window`; returns how many went.
    async fn remove_expired(&self, window: Duration) -> usize {
        let mut windows = self.windows.write().await;
        let before = windows.len();
        windows.retain(|_, w| w.started.elapsed() <= window);
        before - windows.len()
    }

    /// Drops windows that have fully elapsed.
    pub async fn cleanup_expired(&self) {
        let window = Duration::from_secs(self.get_config().await.window_seconds as u64);
        let removed = self.remove_expired(window).await;
        debug!(removed, "Cleaned up expired rate limit entries");
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.windows.read().await.len()
    }

    /// Runs `cleanup_expired` every `every` for the life of the process.
    pub fn start_cleanup_task(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        info!(interval_secs = every.as_secs(), "Rate limit cleanup task started");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.cleanup_expired().await;
            }
        })
    }
}
