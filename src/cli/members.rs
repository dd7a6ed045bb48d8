//! Members command

use crate::cli::{CommandContext, MembersArgs, OutputFormat};
use crate::error::Result;
use crate::models::MemberDisplay;
use crate::output::Formattable;
use crate::sync::fetch_members;

/// Run the members command
pub async fn run(ctx: &CommandContext, args: &MembersArgs) -> Result<()> {
    let members = fetch_members(ctx.client.as_ref(), &args.scope, args.kind, args.cloud).await?;

    if members.is_empty() && ctx.format != OutputFormat::Json {
        eprintln!("No users hold role bindings on {}", args.scope);
        return Ok(());
    }

    let display: Vec<MemberDisplay> = members.into_iter().map(MemberDisplay::from).collect();
    display.print(ctx.format)
}
