//! Kitchen feed demo
//!
//! Logs in, loads the kitchen queue and keeps it in sync with socket
//! notifications until Ctrl-C.
//!
//! ```bash
//! POS_API_URL=http://localhost:8000 POS_MAIL=chef@pos.vn POS_PASSWORD=secret \
//!     cargo run -p pos-client --example kitchen_feed
//! ```

use anyhow::Context;
use parking_lot::Mutex;
use pos_client::reconciler::{Applied, OrderQueue};
use pos_client::{ClientConfig, PosClient};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pos_client::logging::init_logger("info", false)?;

    let mail = std::env::var("POS_MAIL").context("POS_MAIL not set")?;
    let password = std::env::var("POS_PASSWORD").context("POS_PASSWORD not set")?;

    let config = ClientConfig::from_env();
    tracing::info!(api = %config.base_url, socket = %config.socket_endpoint(), "Starting kitchen feed");

    let mut client = PosClient::new(config)?;
    let session = client.login(&mail, &password).await?;
    tracing::info!(user = %session.user_name, role = %session.role, "Logged in");

    let queue = Arc::new(Mutex::new(OrderQueue::from_orders(
        client.http().kitchen_orders().await?,
    )));
    print_queue(&queue.lock());

    let feed = queue.clone();
    client.gateway().subscribe_orders(move |notification| {
        let order_id = notification.order_id();
        let mut queue = feed.lock();
        match queue.apply(notification) {
            Applied::Appended => tracing::info!(order_id, "New order"),
            Applied::Merged => tracing::info!(order_id, "Order updated"),
            Applied::Duplicate | Applied::Dropped => return,
        }
        print_queue(&queue);
    });

    tokio::signal::ctrl_c().await?;
    client.logout().await?;
    client.gateway().shutdown();
    Ok(())
}

fn print_queue(queue: &OrderQueue) {
    let now = chrono::Utc::now();
    for order in queue.sorted(now) {
        let marker = if queue.is_highlighted(order.order_id, now) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} #{:<5} table {:<3} {:<15} {} item(s)",
            order.order_id,
            order.table_id,
            order.order_status,
            order.items.len()
        );
    }
    println!();
}
