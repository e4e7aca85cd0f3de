pub mod day_view;
pub mod week_view;
