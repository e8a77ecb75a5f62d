//! Payment widget driven from the terminal
//!
//! Shows the order summary and asks for the payment id and signature the
//! gateway issued after the user paid on its hosted page. Leaving the payment
//! id blank cancels the payment.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::oneshot;
use tracing::debug;

use super::widget::{PaymentFailure, PaymentOutcome, PaymentSession, PaymentWidget, WidgetError};
use crate::data::PaymentReceipt;

/// Terminal payment widget reading answers from an async line source
pub struct TerminalWidget<R> {
    input: Option<R>,
}

impl TerminalWidget<BufReader<Stdin>> {
    /// Widget reading from standard input
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> TerminalWidget<R> {
    pub fn new(input: R) -> Self {
        Self { input: Some(input) }
    }
}

impl<R: AsyncBufRead + Unpin + Send + 'static> PaymentWidget for TerminalWidget<R> {
    fn open(
        &mut self,
        session: PaymentSession,
    ) -> Result<oneshot::Receiver<PaymentOutcome>, WidgetError> {
        let input = self
            .input
            .take()
            .ok_or_else(|| WidgetError::Unavailable("terminal input already in use".to_string()))?;

        print_summary(&session);

        let (tx, rx) = oneshot::channel();
        let order_id = session.order.id;
        tokio::spawn(async move {
            let outcome = read_outcome(input.lines(), order_id).await;
            debug!(?outcome, "terminal widget finished");
            let _ = tx.send(outcome);
        });
        Ok(rx)
    }
}

fn print_summary(session: &PaymentSession) {
    println!();
    println!("{}", session.merchant_name);
    println!("{}", session.description);
    println!("  Order:    {}", session.order.id);
    println!("  Amount:   {}", session.order.display_amount());
    if !session.prefill.full_name().is_empty() {
        println!("  Name:     {}", session.prefill.full_name());
    }
    if !session.prefill.email.is_empty() {
        println!("  Email:    {}", session.prefill.email);
    }
    println!();
}

fn prompt(label: &str) {
    print!("{}: ", label);
    let _ = std::io::stdout().flush();
}

/// Reads one trimmed, non-empty line, or reports why none was given
async fn next_answer<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    label: &str,
) -> Result<String, PaymentFailure> {
    prompt(label);
    match lines.next_line().await {
        Ok(Some(line)) if !line.trim().is_empty() => Ok(line.trim().to_string()),
        Ok(_) => Err(PaymentFailure::new("payment cancelled")),
        Err(err) => Err(PaymentFailure::new(format!("could not read input: {}", err))),
    }
}

async fn read_outcome<R: AsyncBufRead + Unpin>(
    mut lines: Lines<R>,
    order_id: String,
) -> PaymentOutcome {
    let payment_id = match next_answer(&mut lines, "Payment id (blank to cancel)").await {
        Ok(id) => id,
        Err(failure) => return PaymentOutcome::Failed(failure),
    };
    let signature = match next_answer(&mut lines, "Payment signature").await {
        Ok(signature) => signature,
        Err(failure) => return PaymentOutcome::Failed(failure),
    };

    PaymentOutcome::Succeeded(PaymentReceipt {
        razorpay_order_id: order_id,
        razorpay_payment_id: payment_id,
        razorpay_signature: signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Customer, Order};
    use std::io::Cursor;

    fn session() -> PaymentSession {
        PaymentSession {
            key: Some("rzp_test".to_string()),
            merchant_name: "SkillPort".to_string(),
            description: "Thank you for Purchasing the Course.".to_string(),
            order: Order {
                id: "order_1".to_string(),
                currency: "INR".to_string(),
                amount: 49900,
            },
            prefill: Customer::default(),
        }
    }

    fn widget(input: &str) -> TerminalWidget<Cursor<Vec<u8>>> {
        TerminalWidget::new(Cursor::new(input.as_bytes().to_vec()))
    }

    #[tokio::test]
    async fn test_answers_produce_receipt_for_the_order() {
        let mut widget = widget("pay_1\n  sig_1  \n");

        let outcome = widget.open(session()).unwrap().await.unwrap();

        assert_eq!(
            outcome,
            PaymentOutcome::Succeeded(PaymentReceipt {
                razorpay_order_id: "order_1".to_string(),
                razorpay_payment_id: "pay_1".to_string(),
                razorpay_signature: "sig_1".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_blank_payment_id_cancels() {
        let mut widget = widget("\n");

        let outcome = widget.open(session()).unwrap().await.unwrap();

        assert_eq!(outcome, PaymentOutcome::Failed(PaymentFailure::new("payment cancelled")));
    }

    #[tokio::test]
    async fn test_end_of_input_before_signature_cancels() {
        let mut widget = widget("pay_1\n");

        let outcome = widget.open(session()).unwrap().await.unwrap();

        assert!(matches!(outcome, PaymentOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_widget_opens_only_once() {
        let mut widget = widget("pay_1\nsig\n");
        let _first = widget.open(session()).unwrap();

        assert!(matches!(widget.open(session()), Err(WidgetError::Unavailable(_))));
    }
}
