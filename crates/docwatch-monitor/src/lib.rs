//! The monitoring side of docwatch: page retrieval with retries, the check
//! cycle, baseline persistence, translation, notification, vocabulary hot
//! reload, and the long-running monitor loop.

pub mod baseline;
pub mod config_watch;
pub mod cycle;
pub mod error;
pub mod notify;
mod retry;
pub mod sources;
pub mod translate;
pub mod watch;

pub use baseline::{detect_change, BaselineStore, FileBaselineStore};
pub use config_watch::{VocabHandle, VocabWatcher};
pub use cycle::{run_check_cycle, CycleDeps, CycleOutcome, CycleSettings};
pub use error::MonitorError;
pub use notify::{LogNotifier, Notifier, WebhookNotifier};
pub use sources::{FallbackFetcher, HttpFallbackFetcher, HttpPageSource, PageSource};
pub use translate::{HttpTranslator, NoopTranslator, Translator};
pub use watch::{interruptible_sleep, run_monitor, MonitorSettings};
