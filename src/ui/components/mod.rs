pub mod entry_card;
pub mod popup;
pub mod summary_view;
