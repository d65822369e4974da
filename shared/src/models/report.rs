//! Reporting Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Revenue series granularity (`GET /api/reports/revenue/:range`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevenueRange {
    Week,
    Month,
    Year,
}

impl RevenueRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for RevenueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate statistic exposed under `/api/reports/statistics/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    TotalSales,
    TotalCustomers,
    TotalOrders,
    DashboardSummary,
    EmployeeSummary,
}

impl Statistic {
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::TotalSales => "total-sales",
            Self::TotalCustomers => "total-customers",
            Self::TotalOrders => "total-orders",
            Self::DashboardSummary => "dashboard-summary",
            Self::EmployeeSummary => "employee-summary",
        }
    }
}

/// Report body; the reporting service owns its layout
pub type ReportBody = serde_json::Value;
