//! Order Fulfillment Value Objects

mod cancel_reason;
mod fulfillment_decision;
mod order_side;
mod order_status;
mod order_type;

pub use cancel_reason::CancelReason;
pub use fulfillment_decision::FulfillmentDecision;
pub use order_side::OrderSide;
pub use order_status::OrderStatus;
pub use order_type::OrderType;
