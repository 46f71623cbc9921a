use crate::cli::actions::{Action, login, logout, open, register, status};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Status(args) => status::execute(args).await,
        Action::Login(args) => login::execute(args).await,
        Action::Register(args) => register::execute(args).await,
        Action::Logout(args) => logout::execute(args).await,
        Action::Open(args) => open::execute(args).await,
    }
}
