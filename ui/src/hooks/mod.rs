pub mod use_server_action;

pub use use_server_action::{
    ServerAction, YewScheduler, use_server_action,
    use_server_action_with_options,
};
