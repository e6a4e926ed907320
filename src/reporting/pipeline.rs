//! Typed stages of a transaction report: join, project, filter, sort,
//! paginate. Every stage is a plain function over owned data so the whole
//! pipeline runs without a database.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::order::Order;
use crate::models::order_status::OrderStatus;
use crate::reporting::query::{ReportQuery, RowFilter};
use crate::reporting::row::{ReportingRow, SortField, SortOrder, DEFAULT_GATEWAY, UNKNOWN_STATUS};
use crate::reporting::TransactionPage;

/// An order paired with one of its status records.
#[derive(Debug)]
pub struct Joined<'a> {
    pub order: &'a Order,
    pub status: OrderStatus,
}

/// Inner join of orders and statuses on `order.id == status.collect_id`.
///
/// Orders without a status are dropped. An order with several statuses
/// yields one pair per status. Output follows order sequence first, then
/// status sequence, so repeated calls over the same inputs agree.
pub fn join(orders: &[Order], statuses: Vec<OrderStatus>) -> Vec<Joined<'_>> {
    let mut by_order: HashMap<Uuid, Vec<OrderStatus>> = HashMap::new();
    for status in statuses {
        by_order.entry(status.collect_id).or_default().push(status);
    }

    orders
        .iter()
        .flat_map(|order| {
            by_order
                .remove(&order.id)
                .unwrap_or_default()
                .into_iter()
                .map(move |status| Joined { order, status })
        })
        .collect()
}

/// Flattens a joined pair into a reporting row. `now` stands in for a
/// missing creation time.
pub fn project(joined: Joined<'_>, now: DateTime<Utc>) -> ReportingRow {
    let Joined { order, status } = joined;
    ReportingRow {
        collect_id: order.id.to_string(),
        school_id: order.school_id.clone(),
        gateway: order
            .gateway_name
            .clone()
            .unwrap_or_else(|| DEFAULT_GATEWAY.to_string()),
        order_amount: status.order_amount.unwrap_or(Decimal::ZERO),
        transaction_amount: status.transaction_amount.unwrap_or(Decimal::ZERO),
        status: status.status.unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
        custom_order_id: status.bank_reference.unwrap_or_default(),
        created_at: order.created_at.unwrap_or(now),
    }
}

pub fn filter(rows: Vec<ReportingRow>, criteria: &RowFilter) -> Vec<ReportingRow> {
    rows.into_iter().filter(|row| criteria.matches(row)).collect()
}

/// Stable sort, so equal keys keep store order. Without an explicit field
/// the newest rows come first.
pub fn sort(mut rows: Vec<ReportingRow>, field: Option<SortField>, order: SortOrder) -> Vec<ReportingRow> {
    let (field, order) = match field {
        Some(field) => (field, order),
        None => (SortField::CreatedAt, SortOrder::Desc),
    };
    match order {
        SortOrder::Asc => rows.sort_by(|a, b| field.compare(a, b)),
        SortOrder::Desc => rows.sort_by(|a, b| field.compare(b, a)),
    }
    rows
}

/// Cuts one page out of the fully filtered rows. `total` counts every row
/// handed in, not just the page.
pub fn paginate(rows: Vec<ReportingRow>, query: &ReportQuery) -> TransactionPage {
    let total = rows.len() as u64;
    let data = rows
        .into_iter()
        .skip(query.offset())
        .take(query.limit as usize)
        .collect();

    TransactionPage {
        data,
        total,
        page: query.page,
        limit: query.limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, day, 12, 0, 0).unwrap()
    }

    fn order(school_id: &str, created_at: Option<DateTime<Utc>>) -> Order {
        Order {
            id: Uuid::new_v4(),
            school_id: school_id.to_string(),
            trustee_id: "trustee".to_string(),
            gateway_name: Some("PhonePe".to_string()),
            student_name: None,
            student_id: None,
            student_email: None,
            created_at,
        }
    }

    fn status(collect_id: Uuid, amount: i64, state: &str, reference: &str) -> OrderStatus {
        OrderStatus {
            id: Uuid::new_v4(),
            collect_id,
            order_amount: Some(Decimal::from(amount)),
            transaction_amount: Some(Decimal::from(amount)),
            payment_mode: None,
            payment_details: None,
            payment_message: None,
            error_message: None,
            payment_time: None,
            bank_reference: Some(reference.to_string()),
            status: Some(state.to_string()),
            created_at: at(1),
            updated_at: at(1),
        }
    }

    fn rows(amounts: &[i64]) -> Vec<ReportingRow> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| ReportingRow {
                collect_id: format!("c{i}"),
                school_id: "s".into(),
                gateway: DEFAULT_GATEWAY.into(),
                order_amount: Decimal::from(*amount),
                transaction_amount: Decimal::ZERO,
                status: "PENDING".into(),
                custom_order_id: format!("ref-{i}"),
                created_at: at(i as u32 + 1),
            })
            .collect()
    }

    #[test]
    fn join_drops_orders_without_status() {
        let orders = vec![order("s1", Some(at(1))), order("s1", Some(at(2)))];
        let statuses = vec![status(orders[1].id, 50, "PENDING", "b")];

        let joined = join(&orders, statuses);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].order.id, orders[1].id);
    }

    #[test]
    fn join_emits_one_row_per_duplicate_status() {
        let orders = vec![order("s1", Some(at(1)))];
        let statuses = vec![
            status(orders[0].id, 10, "FAILED", "first"),
            status(orders[0].id, 10, "SUCCESS", "second"),
        ];

        let joined = join(&orders, statuses);
        let references: Vec<_> = joined
            .iter()
            .map(|j| j.status.bank_reference.clone().unwrap())
            .collect();
        assert_eq!(references, vec!["first", "second"]);
    }

    #[test]
    fn join_ignores_statuses_of_unknown_orders() {
        let orders = vec![order("s1", None)];
        let joined = join(&orders, vec![status(Uuid::new_v4(), 1, "SUCCESS", "x")]);
        assert!(joined.is_empty());
    }

    #[test]
    fn project_applies_fallbacks() {
        let mut bare_order = order("s9", None);
        bare_order.gateway_name = None;
        let bare_status = OrderStatus {
            order_amount: None,
            transaction_amount: None,
            bank_reference: None,
            status: None,
            ..status(bare_order.id, 0, "", "")
        };
        let now = at(20);

        let row = project(
            Joined {
                order: &bare_order,
                status: bare_status,
            },
            now,
        );

        assert_eq!(row.collect_id, bare_order.id.to_string());
        assert_eq!(row.school_id, "s9");
        assert_eq!(row.gateway, "Default Gateway");
        assert_eq!(row.order_amount, Decimal::ZERO);
        assert_eq!(row.transaction_amount, Decimal::ZERO);
        assert_eq!(row.status, "UNKNOWN");
        assert_eq!(row.custom_order_id, "");
        assert_eq!(row.created_at, now);
    }

    #[test]
    fn project_copies_present_fields() {
        let order = order("s1", Some(at(3)));
        let row = project(
            Joined {
                order: &order,
                status: status(order.id, 100, "SUCCESS", "bank-7"),
            },
            at(30),
        );

        assert_eq!(row.gateway, "PhonePe");
        assert_eq!(row.order_amount, Decimal::from(100));
        assert_eq!(row.status, "SUCCESS");
        assert_eq!(row.custom_order_id, "bank-7");
        assert_eq!(row.created_at, at(3));
    }

    #[test]
    fn default_sort_is_newest_first() {
        let sorted = sort(rows(&[5, 6, 7]), None, SortOrder::Asc);
        let ids: Vec<_> = sorted.iter().map(|r| r.collect_id.as_str()).collect();
        assert_eq!(ids, vec!["c2", "c1", "c0"]);
    }

    #[test]
    fn amount_sort_reverses_between_directions() {
        let asc = sort(rows(&[30, 10, 20]), Some(SortField::OrderAmount), SortOrder::Asc);
        let desc = sort(rows(&[30, 10, 20]), Some(SortField::OrderAmount), SortOrder::Desc);

        let asc_ids: Vec<_> = asc.iter().map(|r| r.collect_id.clone()).collect();
        let mut desc_ids: Vec<_> = desc.iter().map(|r| r.collect_id.clone()).collect();
        desc_ids.reverse();

        assert_eq!(asc_ids, vec!["c1", "c2", "c0"]);
        assert_eq!(asc_ids, desc_ids);
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let asc = sort(rows(&[1, 1, 1]), Some(SortField::OrderAmount), SortOrder::Asc);
        let desc = sort(rows(&[1, 1, 1]), Some(SortField::OrderAmount), SortOrder::Desc);

        for sorted in [asc, desc] {
            let ids: Vec<_> = sorted.iter().map(|r| r.collect_id.as_str()).collect();
            assert_eq!(ids, vec!["c0", "c1", "c2"]);
        }
    }

    #[test]
    fn paginate_reports_full_total() {
        for page in 1..=4u32 {
            for limit in 1..=5u32 {
                let query = ReportQuery {
                    page,
                    limit,
                    ..ReportQuery::default()
                };
                let result = paginate(rows(&[1, 2, 3, 4, 5, 6, 7]), &query);

                let skipped = ((page - 1) * limit) as u64;
                let expected = (limit as u64).min(7u64.saturating_sub(skipped));
                assert_eq!(result.total, 7);
                assert_eq!(result.data.len() as u64, expected);
                assert_eq!(result.page, page);
                assert_eq!(result.limit, limit);
            }
        }
    }

    #[test]
    fn filter_keeps_matching_rows_only() {
        let mut input = rows(&[1, 2]);
        input[1].status = "SUCCESS".into();
        let criteria = RowFilter {
            status: Some("SUCCESS".into()),
            ..RowFilter::default()
        };

        let kept = filter(input, &criteria);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].collect_id, "c1");
    }
}
