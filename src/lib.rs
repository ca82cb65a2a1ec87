pub mod arch;
pub mod bridge;
pub mod command;
pub mod config;
pub mod engine;
pub mod engine_client;
pub mod log_pane;
pub mod logging;
pub mod menu;
pub mod search_list;
pub mod symbol_view;
pub mod table;
pub mod view_server;
