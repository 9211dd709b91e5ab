//! Order Fulfillment Domain Services

mod order_evaluator;

pub use order_evaluator::OrderEvaluator;
