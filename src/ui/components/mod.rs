pub mod auth_form;
pub mod chat_area;
pub mod input_bar;
pub mod profile_panel;
pub mod sidebar;
