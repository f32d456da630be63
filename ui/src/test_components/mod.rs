
pub use server_action_test::ServerActionTest;
