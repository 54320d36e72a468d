use veery_database::{common::user::LocalUserView, error::BackendResult, impls::VeeryContext};

/// First run setup: create the admin account from config. The JWT secret is
/// seeded by the migrations.
pub fn setup(context: &VeeryContext) -> BackendResult<()> {
    LocalUserView::create(
        context.config.setup.admin_username.clone(),
        &context.config.setup.admin_password,
        true,
        context,
    )?;
    Ok(())
}
