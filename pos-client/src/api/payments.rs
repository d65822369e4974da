//! Order service: payments

use crate::{ClientResult, HttpClient};
use shared::models::{PaymentRequest, PaymentResponse};

impl HttpClient {
    /// Settle every open order of a table
    pub async fn make_payment(&self, payment: &PaymentRequest) -> ClientResult<PaymentResponse> {
        self.post("/orders/payments", payment).await
    }
}
