use credentials_core::Permission;

pub const ADMIN_PERMISSION: &str = "admin";
pub const MODERATOR_PERMISSION: &str = "mod";

/// Administrative operations and the permission each one requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    ListAccounts,
    ViewAccount,
    SuspendAccount,
    CreateAccount,
    UpdateAccount,
    ResetPassword,
    ResendActivation,
    DeleteAccount,
}

impl AdminAction {
    pub fn required_permission(self) -> Permission {
        match self {
            AdminAction::ListAccounts | AdminAction::ViewAccount | AdminAction::SuspendAccount => {
                Permission::from(MODERATOR_PERMISSION)
            }
            AdminAction::CreateAccount
            | AdminAction::UpdateAccount
            | AdminAction::ResetPassword
            | AdminAction::ResendActivation
            | AdminAction::DeleteAccount => Permission::from(ADMIN_PERMISSION),
        }
    }
}
