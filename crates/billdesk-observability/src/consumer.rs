//! Invoice consumer that reports totals through tracing.

use billdesk_core::invoice::InvoiceConsumer;
use billdesk_core::Money;

/// Emits every pushed total and description list as a structured log event.
///
/// Wraps an inner consumer so it can sit in front of the one that renders.
pub struct LoggingConsumer<C> {
    inner: C,
    published: u64,
}

impl<C: InvoiceConsumer> LoggingConsumer<C> {
    pub fn new(inner: C) -> Self {
        Self { inner, published: 0 }
    }

    /// Number of total notifications seen so far.
    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: InvoiceConsumer> InvoiceConsumer for LoggingConsumer<C> {
    fn on_total_changed(&mut self, total: Money) {
        self.published += 1;
        tracing::debug!(
            total_cents = total.amount_cents,
            currency = %total.currency,
            seq = self.published,
            "Invoice total changed"
        );
        self.inner.on_total_changed(total);
    }

    fn on_line_descriptions_changed(&mut self, descriptions: &[String]) {
        tracing::trace!(lines = descriptions.len(), "Line descriptions changed");
        self.inner.on_line_descriptions_changed(descriptions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billdesk_core::invoice::RecordingConsumer;
    use billdesk_core::Currency;

    #[test]
    fn test_forwards_to_inner() {
        let recorder = RecordingConsumer::new();
        let mut consumer = LoggingConsumer::new(recorder.clone());

        consumer.on_total_changed(Money::new(750, Currency::USD));
        consumer.on_line_descriptions_changed(&["line".to_string()]);

        assert_eq!(consumer.published(), 1);
        let latest = recorder.latest().unwrap();
        assert_eq!(latest.total.amount_cents, 750);
        assert_eq!(latest.descriptions, vec!["line".to_string()]);
    }
}
