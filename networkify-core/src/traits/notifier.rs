//! 抓取失败通知
//!
//! 抓取失败只记录在账号上，不会向调用方返回错误；
//! 需要提示用户时由 [`DiscoveryNotifier`] 旁路通知。

use networkify_provider::ErrorKind;

/// 抓取失败通知 Trait
pub trait DiscoveryNotifier: Send + Sync {
    /// 某个账号抓取失败
    fn crawl_failed(&self, account_id: &str, kind: ErrorKind, detail: &str);
}

/// 默认实现：写入日志
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl DiscoveryNotifier for LogNotifier {
    fn crawl_failed(&self, account_id: &str, kind: ErrorKind, detail: &str) {
        match kind {
            ErrorKind::Auth => log::warn!(
                "Crawl of {account_id} rejected by provider, acquire another token: {detail}"
            ),
            ErrorKind::Provider | ErrorKind::Network => {
                log::warn!("Crawl of {account_id} failed ({kind:?}): {detail}");
            }
        }
    }
}
