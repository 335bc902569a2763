//! Outbound webhook delivery over HTTP.

mod http_notifier;

pub use http_notifier::HttpNotifier;
