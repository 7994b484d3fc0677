pub mod ui;

pub use ui::draw_ui;
