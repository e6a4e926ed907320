//! Fills the database with sample orders and statuses for dashboard work.
//!
//! Usage: `seed [COUNT]` (default 20). Uses the same environment as the server.

use anyhow::Context;
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use school_payments::config::AppConfig;
use school_payments::database::connection::{create_pool, run_migrations};
use school_payments::models::order::{CreateOrder, Order};
use school_payments::models::order_status::{CreateOrderStatus, OrderStatus, PaymentState};
use school_payments::models::user::{User, UserRole};

const DEFAULT_COUNT: usize = 20;
const DEFAULT_SCHOOL: &str = "default-school-001";
const STATES: [PaymentState; 4] = [
    PaymentState::Pending,
    PaymentState::Completed,
    PaymentState::Failed,
    PaymentState::Refunded,
];
const PAYMENT_MODES: [&str; 5] = ["CREDIT_CARD", "DEBIT_CARD", "UPI", "NET_BANKING", "WALLET"];

struct Sample {
    order: CreateOrder,
    amount: Decimal,
    settled: Decimal,
    state: PaymentState,
    payment_mode: &'static str,
}

fn samples(count: usize, school_id: &str) -> Vec<Sample> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let created_at = Utc::now() - Duration::days(rng.gen_range(0..30));
            let amount = Decimal::from(rng.gen_range(500..10500_i64));
            let state = *STATES.choose(&mut rng).unwrap_or(&PaymentState::Pending);
            let settled = if state == PaymentState::Failed {
                Decimal::ZERO
            } else {
                amount
            };

            Sample {
                order: CreateOrder {
                    school_id: school_id.to_string(),
                    trustee_id: Uuid::new_v4().to_string(),
                    gateway_name: Some("Test Payment Gateway".to_string()),
                    created_at: Some(created_at),
                    ..CreateOrder::default()
                },
                amount,
                settled,
                state,
                payment_mode: PAYMENT_MODES.choose(&mut rng).copied().unwrap_or("UPI"),
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let count = match std::env::args().nth(1) {
        Some(arg) => arg.parse().context("COUNT must be a number")?,
        None => DEFAULT_COUNT,
    };

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let pool = create_pool(&config).await.context("Failed to connect to database")?;
    run_migrations(&pool).await?;

    let school_id = User::find_by_role(&pool, UserRole::School)
        .await?
        .into_iter()
        .find_map(|user| user.school_id)
        .unwrap_or_else(|| DEFAULT_SCHOOL.to_string());
    info!("Seeding {} transactions for school {}", count, school_id);

    for sample in samples(count, &school_id) {
        let created_at = sample.order.created_at;
        let order = Order::create(&pool, sample.order).await?;
        OrderStatus::create(
            &pool,
            CreateOrderStatus {
                collect_id: order.id,
                order_amount: Some(sample.amount),
                transaction_amount: Some(sample.settled),
                payment_mode: Some(sample.payment_mode.to_string()),
                payment_details: Some("Sample payment details".to_string()),
                bank_reference: Uuid::new_v4().to_string(),
                status: sample.state.to_string(),
                created_at,
            },
        )
        .await?;
    }

    info!("Seeding completed");
    Ok(())
}
