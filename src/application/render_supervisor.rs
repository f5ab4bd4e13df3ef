//! Render Supervisor - 渲染请求令牌
//!
//! 同一 key（正在编辑的用户）的重叠渲染按令牌排序：
//! 每次开始渲染领取一个单调递增的令牌，背景图加载完成后
//! 若令牌已不是该 key 的最新令牌，则丢弃本次渲染结果。

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::error::ApplicationError;

/// 渲染令牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    pub key: String,
    pub token: u64,
}

/// 渲染令牌表
pub struct RenderSupervisor {
    counter: AtomicU64,
    latest: DashMap<String, u64>,
}

impl RenderSupervisor {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            latest: DashMap::new(),
        }
    }

    /// 为 `key` 开始一次渲染，之前的令牌随即失效
    pub fn begin(&self, key: impl Into<String>) -> RenderTicket {
        let key = key.into();
        let token = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest
            .entry(key.clone())
            .and_modify(|current| *current = (*current).max(token))
            .or_insert(token);

        tracing::debug!(key = %key, token = token, "Render started");
        RenderTicket { key, token }
    }

    /// 令牌是否仍是该 key 的最新令牌
    pub fn is_current(&self, ticket: &RenderTicket) -> bool {
        self.latest
            .get(&ticket.key)
            .map(|latest| *latest == ticket.token)
            .unwrap_or(false)
    }

    /// 令牌已被取代时返回 `ApplicationError::Superseded`
    pub fn ensure_current(&self, ticket: &RenderTicket) -> Result<(), ApplicationError> {
        let latest = self.latest.get(&ticket.key).map(|v| *v).unwrap_or(0);
        if latest == ticket.token {
            return Ok(());
        }

        tracing::info!(
            key = %ticket.key,
            token = ticket.token,
            latest = latest,
            "Render superseded, discarding result"
        );
        Err(ApplicationError::Superseded {
            key: ticket.key.clone(),
            token: ticket.token,
            latest,
        })
    }

    /// 渲染结束后清理条目（仅当仍为最新令牌时）
    pub fn finish(&self, ticket: &RenderTicket) {
        self.latest
            .remove_if(&ticket.key, |_, latest| *latest == ticket.token);
    }

    /// 正在跟踪的 key 数量
    pub fn tracked_keys(&self) -> usize {
        self.latest.len()
    }
}

impl Default for RenderSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_monotonic() {
        let supervisor = RenderSupervisor::new();
        let a = supervisor.begin("profile-a");
        let b = supervisor.begin("profile-b");
        let c = supervisor.begin("profile-a");
        assert!(a.token < b.token);
        assert!(b.token < c.token);
    }

    #[test]
    fn test_newer_render_supersedes_older() {
        let supervisor = RenderSupervisor::new();
        let first = supervisor.begin("profile");
        let second = supervisor.begin("profile");

        assert!(!supervisor.is_current(&first));
        assert!(supervisor.is_current(&second));
        assert!(matches!(
            supervisor.ensure_current(&first),
            Err(ApplicationError::Superseded { token, latest, .. }) if token == first.token && latest == second.token
        ));
        assert!(supervisor.ensure_current(&second).is_ok());
    }

    #[test]
    fn test_keys_are_independent() {
        let supervisor = RenderSupervisor::new();
        let a = supervisor.begin("a");
        let _b = supervisor.begin("b");
        assert!(supervisor.is_current(&a));
    }

    #[test]
    fn test_finish_only_removes_latest() {
        let supervisor = RenderSupervisor::new();
        let first = supervisor.begin("profile");
        let second = supervisor.begin("profile");

        supervisor.finish(&first);
        assert_eq!(supervisor.tracked_keys(), 1);
        assert!(supervisor.is_current(&second));

        supervisor.finish(&second);
        assert_eq!(supervisor.tracked_keys(), 0);
    }
}
