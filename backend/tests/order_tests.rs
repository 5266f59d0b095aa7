//! Order lifecycle and payment tests
//!
//! Unit and property-based tests for:
//! - Order status transition rules
//! - Order total derivation
//! - Payment event type serialization

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{order_total, OrderItem, OrderStatus, PaymentEventType, PaymentStatus};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const ALL_STATUSES: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::InProduction,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
];

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::InProduction));
        assert!(OrderStatus::InProduction.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn test_terminal_states_are_frozen() {
        for next in ALL_STATUSES {
            assert!(!OrderStatus::Completed.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_cancel_from_any_active_state() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::InProduction.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_order_total_sums_line_totals() {
        let items = vec![
            OrderItem {
                recipe_id: None,
                name: "Sourdough".to_string(),
                quantity: dec("3"),
                unit_price: dec("6.50"),
            },
            OrderItem {
                recipe_id: None,
                name: "Eclair".to_string(),
                quantity: dec("6"),
                unit_price: dec("4.25"),
            },
        ];
        assert_eq!(order_total(&items), dec("45.00"));
    }

    #[test]
    fn test_payment_event_type_wire_names() {
        assert_eq!(PaymentEventType::PaymentSucceeded.as_str(), "payment_succeeded");
        assert_eq!(PaymentEventType::PaymentFailed.as_str(), "payment_failed");
        assert_eq!(PaymentEventType::PaymentRefunded.as_str(), "payment_refunded");
    }

    #[test]
    fn test_payment_status_default_is_unpaid() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Unpaid);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn status_strategy() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(ALL_STATUSES.to_vec())
}

fn item_strategy() -> impl Strategy<Value = OrderItem> {
    (1i64..1_000i64, 0i64..100_000i64).prop_map(|(qty, cents)| OrderItem {
        recipe_id: None,
        name: "Item".to_string(),
        quantity: Decimal::from(qty),
        unit_price: Decimal::new(cents, 2),
    })
}

proptest! {
    /// No transition out of a terminal state is ever legal.
    #[test]
    fn prop_terminal_states_reject_all_transitions(next in status_strategy()) {
        prop_assert!(!OrderStatus::Completed.can_transition_to(next));
        prop_assert!(!OrderStatus::Cancelled.can_transition_to(next));
    }

    /// A legal transition never targets the current state.
    #[test]
    fn prop_no_self_transitions(status in status_strategy()) {
        prop_assert!(!status.can_transition_to(status));
    }

    /// Order totals are non-negative and add up item by item.
    #[test]
    fn prop_order_total_matches_item_sum(items in prop::collection::vec(item_strategy(), 0..10)) {
        let total = order_total(&items);
        let expected: Decimal = items.iter().map(|i| i.quantity * i.unit_price).sum();

        prop_assert_eq!(total, expected);
        prop_assert!(total >= Decimal::ZERO);
    }

    /// Appending an item grows the total by exactly its line total.
    #[test]
    fn prop_total_grows_by_line_total(
        items in prop::collection::vec(item_strategy(), 0..10),
        extra in item_strategy(),
    ) {
        let before = order_total(&items);
        let line = extra.line_total();

        let mut appended = items;
        appended.push(extra);

        prop_assert_eq!(order_total(&appended), before + line);
    }
}
