//! Reporting endpoints (manager dashboard)

use crate::{ClientResult, HttpClient};
use shared::models::{ReportBody, RevenueRange, Statistic};

impl HttpClient {
    pub async fn revenue(&self, range: RevenueRange) -> ClientResult<ReportBody> {
        self.get(&format!("/api/reports/revenue/{range}")).await
    }

    pub async fn statistic(&self, statistic: Statistic) -> ClientResult<ReportBody> {
        self.get(&format!(
            "/api/reports/statistics/{}",
            statistic.path_segment()
        ))
        .await
    }

    pub async fn payment_history(&self) -> ClientResult<ReportBody> {
        self.get("/api/reports/payments/history").await
    }

    /// Payments of one customer, keyed by phone number
    pub async fn customer_payments(&self, phone_number: &str) -> ClientResult<ReportBody> {
        self.get(&format!("/api/reports/payments/customer/{phone_number}"))
            .await
    }

    pub async fn receipt(&self, payment_id: i64) -> ClientResult<ReportBody> {
        self.get(&format!("/api/reports/payments/receipt/{payment_id}"))
            .await
    }
}
