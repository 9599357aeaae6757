use super::{EntityAction, IdArgs};
use clap::{Args, Subcommand};
use connect_core::{EntityId, Organisation};

#[derive(Debug, Args)]
pub(crate) struct OrgCommand {
    #[command(subcommand)]
    command: OrgSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrgSubcommand {
    /// Create an organisation
    Create(OrgFields),
    /// List live organisations; every given field must match
    Find(OrgFields),
    /// Show one organisation
    Get(IdArgs),
    /// Change the given fields of an organisation
    Update(UpdateOrgArgs),
    /// Soft-delete an organisation
    Delete(IdArgs),
}

#[derive(Debug, Args)]
struct UpdateOrgArgs {
    /// Organisation id
    #[arg(long)]
    id: EntityId,

    #[command(flatten)]
    fields: OrgFields,
}

#[derive(Debug, Args)]
struct OrgFields {
    #[arg(long)]
    name: Option<String>,

    /// Ten digits
    #[arg(long)]
    contact_number: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// active | inactive
    #[arg(long)]
    status: Option<String>,
}

impl From<OrgFields> for Organisation {
    fn from(fields: OrgFields) -> Self {
        Self {
            name: fields.name.unwrap_or_default(),
            contact_number: fields.contact_number.unwrap_or_default(),
            email: fields.email.unwrap_or_default(),
            status: fields.status.unwrap_or_default(),
            ..Self::default()
        }
    }
}

impl OrgCommand {
    pub(crate) fn into_action(self) -> EntityAction<Organisation> {
        match self.command {
            OrgSubcommand::Create(fields) => EntityAction::Create(fields.into()),
            OrgSubcommand::Find(fields) => EntityAction::Find(fields.into()),
            OrgSubcommand::Get(args) => EntityAction::Get(args.id),
            OrgSubcommand::Update(args) => EntityAction::Update(args.id, args.fields.into()),
            OrgSubcommand::Delete(args) => EntityAction::Delete(args.id),
        }
    }
}
