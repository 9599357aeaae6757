use super::{EntityAction, IdArgs};
use clap::{Args, Subcommand};
use connect_core::{EntityId, User};

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    /// Create a user
    Create(UserFields),
    /// List live users; every given field must match
    Find(UserFields),
    /// Show one user
    Get(IdArgs),
    /// Change the given fields of a user
    Update(UpdateUserArgs),
    /// Soft-delete a user
    Delete(IdArgs),
}

#[derive(Debug, Args)]
struct UpdateUserArgs {
    /// User id
    #[arg(long)]
    id: EntityId,

    #[command(flatten)]
    fields: UserFields,
}

/// Omitted flags stay empty, which reads as "not provided".
#[derive(Debug, Args)]
struct UserFields {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    handle: Option<String>,

    /// Ten digits
    #[arg(long)]
    mobile_number: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// active | inactive
    #[arg(long)]
    status: Option<String>,
}

impl From<UserFields> for User {
    fn from(fields: UserFields) -> Self {
        Self {
            name: fields.name.unwrap_or_default(),
            handle: fields.handle.unwrap_or_default(),
            mobile_number: fields.mobile_number.unwrap_or_default(),
            email: fields.email.unwrap_or_default(),
            status: fields.status.unwrap_or_default(),
            ..Self::default()
        }
    }
}

impl UserCommand {
    pub(crate) fn into_action(self) -> EntityAction<User> {
        match self.command {
            UserSubcommand::Create(fields) => EntityAction::Create(fields.into()),
            UserSubcommand::Find(fields) => EntityAction::Find(fields.into()),
            UserSubcommand::Get(args) => EntityAction::Get(args.id),
            UserSubcommand::Update(args) => EntityAction::Update(args.id, args.fields.into()),
            UserSubcommand::Delete(args) => EntityAction::Delete(args.id),
        }
    }
}
