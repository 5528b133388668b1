//! Per-command payload shaping and dispatch.

mod files;
mod transfer;
mod user;

use anyhow::Result;
use kracli_core::api::ApiClient;
use kracli_core::auth::Session;

use crate::cli::Command;
use transfer::UploadArgs;

/// Run the selected sub-command and return the process exit code.
pub async fn dispatch(
    client: &ApiClient,
    session: &Session,
    command: Command,
    quiet: bool,
) -> Result<i32> {
    match command {
        Command::List {
            parent,
            filter,
            kind,
        } => files::list(client, parent, filter, kind).await,
        Command::Info { ident } => files::info(client, &ident).await,
        Command::Create {
            name,
            parent,
            kind,
            shared,
            password,
        } => files::create(client, name, parent, kind, shared, password).await,
        Command::Edit {
            ident,
            name,
            parent,
            shared,
            no_shared,
            password,
        } => files::edit(client, ident, name, parent, shared, no_shared, password).await,
        Command::Copy {
            ident,
            name,
            parent,
            shared,
            password,
            new_password,
        } => files::copy(client, ident, name, parent, shared, password, new_password).await,
        Command::Remove { ident, recursive } => files::remove(client, ident, recursive).await,
        Command::Download {
            ident,
            name,
            resume,
        } => transfer::download(client, &ident, name, resume, quiet).await,
        Command::Upload {
            path,
            name,
            parent,
            shared,
            ident,
            resource,
            chunk_mb,
        } => {
            let args = UploadArgs {
                path,
                name,
                parent,
                shared,
                ident,
                resource,
                chunk_mb,
            };
            transfer::upload(client, args, quiet).await
        }
        Command::Userinfo => user::userinfo(client, session).await,
    }
}
