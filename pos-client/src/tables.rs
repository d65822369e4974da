//! TableBoard - 桌台状态机
//!
//! ```text
//! available --occupy--> occupied --release / payment--> available
//! reserved: server-set, display only
//! ```
//!
//! Every status write goes through a [`PendingTransition`] (the
//! confirmation dialog). Only the board can create one, and only
//! [`TableBoard::confirm`] can turn it into a request. The board never
//! patches itself optimistically; a confirmed write is followed by a full
//! reload from the order service.

use shared::message::TableNotification;
use shared::models::{DiningTable, PaymentRequest, PaymentResponse, TableStatus};
use thiserror::Error;

use crate::{ClientError, ClientResult, HttpClient};

/// Waiter action on a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    /// Seat guests
    Occupy,
    /// Cancel the table without payment
    Release,
}

impl TableAction {
    /// Actions offered for a table in `status`
    pub fn offered(status: TableStatus) -> &'static [TableAction] {
        match status {
            TableStatus::Available => &[TableAction::Occupy],
            TableStatus::Occupied => &[TableAction::Release],
            TableStatus::Reserved | TableStatus::Unknown => &[],
        }
    }

    pub fn source_status(&self) -> TableStatus {
        match self {
            Self::Occupy => TableStatus::Available,
            Self::Release => TableStatus::Occupied,
        }
    }

    pub fn target(&self) -> TableStatus {
        match self {
            Self::Occupy => TableStatus::Occupied,
            Self::Release => TableStatus::Available,
        }
    }

    /// Confirmation dialog question
    pub fn prompt(&self, table_id: i64) -> String {
        match self {
            Self::Occupy => format!("Occupy table {table_id}?"),
            Self::Release => format!("Cancel table {table_id}?"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Table {0} not found")]
    NotFound(i64),

    #[error("Cannot {action:?} table {table_id} while it is {status}")]
    InvalidTransition {
        table_id: i64,
        status: TableStatus,
        action: TableAction,
    },
}

impl From<TableError> for ClientError {
    fn from(e: TableError) -> Self {
        match e {
            TableError::NotFound(_) => ClientError::NotFound(e.to_string()),
            TableError::InvalidTransition { .. } => ClientError::Validation(e.to_string()),
        }
    }
}

/// Outcome of tapping a table
#[derive(Debug, Clone, PartialEq)]
pub enum TableSelection {
    /// Show the action prompt
    Prompt {
        table: DiningTable,
        actions: Vec<TableAction>,
    },
    /// Show a toast; nothing to do
    Info(String),
}

/// An open confirmation dialog for one status change
#[derive(Debug, PartialEq, Eq)]
pub struct PendingTransition {
    table_id: i64,
    action: TableAction,
}

impl PendingTransition {
    pub fn table_id(&self) -> i64 {
        self.table_id
    }

    pub fn action(&self) -> TableAction {
        self.action
    }

    pub fn prompt(&self) -> String {
        self.action.prompt(self.table_id)
    }
}

/// An open payment dialog for an occupied table
#[derive(Debug, PartialEq, Eq)]
pub struct PendingPayment {
    table_id: i64,
}

impl PendingPayment {
    pub fn table_id(&self) -> i64 {
        self.table_id
    }
}

/// Outcome of an accepted payment
#[derive(Debug)]
pub struct Settlement {
    pub receipt: PaymentResponse,
    /// Set when the table could not be released (or the board reloaded)
    /// after payment; the table is paid but may still show as occupied
    pub release_error: Option<ClientError>,
}

impl Settlement {
    pub fn is_released(&self) -> bool {
        self.release_error.is_none()
    }
}

/// Local view of the dining tables
#[derive(Debug, Default, Clone)]
pub struct TableBoard {
    tables: Vec<DiningTable>,
}

impl TableBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(mut tables: Vec<DiningTable>) -> Self {
        tables.sort_by_key(|t| t.table_id);
        Self { tables }
    }

    /// Load the board from the order service
    pub async fn load(api: &HttpClient) -> ClientResult<Self> {
        let mut board = Self::new();
        board.reload(api).await?;
        Ok(board)
    }

    pub fn tables(&self) -> &[DiningTable] {
        &self.tables
    }

    pub fn get(&self, table_id: i64) -> Option<&DiningTable> {
        self.tables.iter().find(|t| t.table_id == table_id)
    }

    /// Replace the local list from `GET /orders/tables`
    pub async fn reload(&mut self, api: &HttpClient) -> ClientResult<()> {
        let tables = api.list_tables().await?;
        tracing::debug!(count = tables.len(), "Table board reloaded");
        *self = Self::from_tables(tables);
        Ok(())
    }

    pub fn select(&self, table_id: i64) -> Result<TableSelection, TableError> {
        let table = self.get(table_id).ok_or(TableError::NotFound(table_id))?;
        Ok(match table.table_status {
            TableStatus::Reserved => TableSelection::Info(format!("Table {table_id} is reserved")),
            TableStatus::Unknown => {
                TableSelection::Info(format!("Table {table_id} is not available"))
            }
            status => TableSelection::Prompt {
                table: table.clone(),
                actions: TableAction::offered(status).to_vec(),
            },
        })
    }

    /// Open the confirmation dialog for `action`
    pub fn request(
        &self,
        table_id: i64,
        action: TableAction,
    ) -> Result<PendingTransition, TableError> {
        let status = self.status_of(table_id)?;
        if status != action.source_status() {
            return Err(TableError::InvalidTransition {
                table_id,
                status,
                action,
            });
        }
        Ok(PendingTransition { table_id, action })
    }

    /// Open the payment dialog; only occupied tables can be settled
    pub fn request_payment(&self, table_id: i64) -> Result<PendingPayment, TableError> {
        let status = self.status_of(table_id)?;
        if status != TableStatus::Occupied {
            return Err(TableError::InvalidTransition {
                table_id,
                status,
                action: TableAction::Release,
            });
        }
        Ok(PendingPayment { table_id })
    }

    /// Close a dialog without sending anything
    pub fn dismiss(&self, pending: PendingTransition) {
        tracing::debug!(table_id = pending.table_id, action = ?pending.action, "Table action dismissed");
    }

    /// Send the confirmed status change, then reload.
    ///
    /// On failure the board is left exactly as it was.
    pub async fn confirm(&mut self, pending: PendingTransition, api: &HttpClient) -> ClientResult<()> {
        // A pushed table_update may have moved the table since the dialog opened
        let status = self.status_of(pending.table_id)?;
        if status != pending.action.source_status() {
            return Err(TableError::InvalidTransition {
                table_id: pending.table_id,
                status,
                action: pending.action,
            }
            .into());
        }

        let target = pending.action.target();
        tracing::info!(table_id = pending.table_id, status = %target, "Updating table status");
        api.update_table_status(pending.table_id, target).await?;
        self.reload(api).await
    }

    /// Take payment for an occupied table, then release it and reload.
    ///
    /// Once the payment is accepted the result is always `Ok`: a failed
    /// release is reported in [`Settlement::release_error`] and must not be
    /// retried through another payment.
    pub async fn settle(
        &mut self,
        pending: PendingPayment,
        customer_name: &str,
        phone_number: &str,
        api: &HttpClient,
    ) -> ClientResult<Settlement> {
        if customer_name.trim().is_empty() || phone_number.trim().is_empty() {
            return Err(ClientError::Validation(
                "Customer name and phone number are required".to_string(),
            ));
        }

        let payment = PaymentRequest {
            table_id: pending.table_id,
            phone_number: phone_number.trim().to_string(),
            customer_name: customer_name.trim().to_string(),
        };
        let receipt = api.make_payment(&payment).await?;
        tracing::info!(table_id = pending.table_id, "Payment completed");

        let release_error = match self.release_paid(pending.table_id, api).await {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(table_id = pending.table_id, "Paid table not released: {e}");
                Some(e)
            }
        };
        Ok(Settlement {
            receipt,
            release_error,
        })
    }

    async fn release_paid(&mut self, table_id: i64, api: &HttpClient) -> ClientResult<()> {
        api.update_table_status(table_id, TableStatus::Available)
            .await?;
        self.reload(api).await
    }

    /// Apply a server-pushed `table_update`; returns whether anything changed
    pub fn apply(&mut self, notification: &TableNotification) -> bool {
        match self
            .tables
            .iter_mut()
            .find(|t| t.table_id == notification.table_id)
        {
            Some(table) if table.table_status != notification.status => {
                table.table_status = notification.status;
                true
            }
            _ => false,
        }
    }

    fn status_of(&self, table_id: i64) -> Result<TableStatus, TableError> {
        self.get(table_id)
            .map(|t| t.table_status)
            .ok_or(TableError::NotFound(table_id))
    }
}
