use super::traits::{ChatMessage, Provider};
use async_trait::async_trait;
use std::time::Duration;

const MAX_BACKOFF_MS: u64 = 10_000;

/// How a failed chat call is treated by [`ReliableProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    /// Worth another attempt: timeouts, rate limits, 5xx, connection errors.
    Transient,
    /// Will fail the same way again: bad request, auth, missing key, quota.
    Permanent,
}

fn classify(err: &anyhow::Error) -> Failure {
    let msg = err.to_string();
    if msg.contains("API key not set") || quota_exhausted(&msg) {
        return Failure::Permanent;
    }

    let status = err
        .downcast_ref::<reqwest::Error>()
        .and_then(reqwest::Error::status)
        .map(|s| s.as_u16())
        .or_else(|| {
            msg.split(|c: char| !c.is_ascii_digit())
                .filter_map(|word| word.parse::<u16>().ok())
                .find(|code| (400..600).contains(code))
        });
    match status {
        Some(408 | 429) | None => Failure::Transient,
        Some(code) if (400..500).contains(&code) => Failure::Permanent,
        Some(_) => Failure::Transient,
    }
}

fn quota_exhausted(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("insufficient_quota")
        || lower.contains("exceeded your current quota")
        || lower.contains("billing")
}

/// Wraps a backend with bounded retries and doubling backoff.
///
/// A seat's turn is one logical model call; the game sees either the final
/// reply or one error listing every attempt.
pub struct ReliableProvider {
    inner: Box<dyn Provider>,
    max_retries: u32,
    base_backoff_ms: u64,
}

impl ReliableProvider {
    pub fn new(inner: Box<dyn Provider>, max_retries: u32, base_backoff_ms: u64) -> Self {
        Self {
            inner,
            max_retries,
            base_backoff_ms: base_backoff_ms.max(1),
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1_u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_backoff_ms.saturating_mul(factor).min(MAX_BACKOFF_MS))
    }
}

#[async_trait]
impl Provider for ReliableProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[ChatMessage],
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String> {
        let attempts = self.max_retries + 1;
        let mut errors = Vec::new();

        for attempt in 0..attempts {
            let err = match self
                .inner
                .chat(system_prompt, messages, model, temperature)
                .await
            {
                Ok(text) => {
                    if attempt > 0 {
                        tracing::info!(
                            provider = self.name(),
                            model,
                            attempt,
                            "model call recovered"
                        );
                    }
                    return Ok(text);
                }
                Err(err) => err,
            };

            let failure = classify(&err);
            errors.push(format!("attempt {}/{attempts}: {err}", attempt + 1));
            if failure == Failure::Permanent {
                tracing::warn!(
                    provider = self.name(),
                    model,
                    error = %err,
                    "model call failed permanently"
                );
                break;
            }
            if attempt + 1 < attempts {
                let wait = self.backoff(attempt);
                tracing::warn!(
                    provider = self.name(),
                    model,
                    attempt = attempt + 1,
                    wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    "model call failed, retrying"
                );
                tokio::time::sleep(wait).await;
            }
        }

        anyhow::bail!(
            "{} failed for model {model}:\n{}",
            self.name(),
            errors.join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails with `error` for the first `failures` calls, then answers "J".
    struct Flaky {
        calls: Arc<AtomicUsize>,
        failures: usize,
        error: &'static str,
    }

    #[async_trait]
    impl Provider for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn chat(
            &self,
            _system_prompt: Option<&str>,
            _messages: &[ChatMessage],
            _model: &str,
            _temperature: f64,
        ) -> anyhow::Result<String> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                anyhow::bail!(self.error);
            }
            Ok("J".into())
        }
    }

    fn flaky(
        failures: usize,
        error: &'static str,
        retries: u32,
    ) -> (ReliableProvider, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = Flaky {
            calls: Arc::clone(&calls),
            failures,
            error,
        };
        (ReliableProvider::new(Box::new(inner), retries, 1), calls)
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let (provider, calls) = flaky(2, "503 Service Unavailable", 2);
        assert_eq!(provider.ask(None, "move?", "m", 0.0).await.unwrap(), "J");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_list_every_attempt() {
        let (provider, calls) = flaky(usize::MAX, "connection reset", 1);
        let msg = provider.ask(None, "move?", "m", 0.0).await.unwrap_err().to_string();
        assert!(msg.contains("attempt 1/2: connection reset"));
        assert!(msg.contains("attempt 2/2: connection reset"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn permanent_failure_stops_at_once() {
        let (provider, calls) = flaky(usize::MAX, "401 Unauthorized", 3);
        assert!(provider.ask(None, "move?", "m", 0.0).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn classification() {
        let kind = |m: &str| classify(&anyhow::anyhow!(m.to_string()));
        assert_eq!(kind("400 Bad Request"), Failure::Permanent);
        assert_eq!(kind("flaky API key not set"), Failure::Permanent);
        assert_eq!(kind("429: {\"type\":\"insufficient_quota\"}"), Failure::Permanent);
        assert_eq!(kind("429 Too Many Requests"), Failure::Transient);
        assert_eq!(kind("408 Request Timeout"), Failure::Transient);
        assert_eq!(kind("502 Bad Gateway"), Failure::Transient);
        assert_eq!(kind("connection reset"), Failure::Transient);
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        let (provider, _) = flaky(0, "", 0);
        let provider = ReliableProvider { base_backoff_ms: 500, ..provider };
        assert_eq!(provider.backoff(0), Duration::from_millis(500));
        assert_eq!(provider.backoff(2), Duration::from_millis(2000));
        assert_eq!(provider.backoff(40), Duration::from_millis(MAX_BACKOFF_MS));
    }
}
