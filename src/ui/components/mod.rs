pub mod api_status;
pub mod field;
pub mod health_badge;
pub mod quote_dialog;
pub mod shipment_card;
pub mod shipment_table;
pub mod toast;
