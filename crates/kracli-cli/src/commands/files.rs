//! File and folder object commands: list, info, create, edit, copy,
//! remove.

use anyhow::Result;
use kracli_core::api::ApiClient;
use kracli_core::models::{CopyRequest, CreateRequest, DeleteRequest, ListRequest, UpdateRequest};

use crate::cli::ObjectType;
use crate::output;

pub async fn list(
    client: &ApiClient,
    parent: Option<String>,
    filter: Option<String>,
    kind: Option<ObjectType>,
) -> Result<i32> {
    let request = ListRequest {
        ident: parent,
        filter,
        kind: kind.map(|kind| kind.as_str().to_string()),
    };
    let ret = client.list(&request).await?;
    Ok(output::render(&ret))
}

pub async fn info(client: &ApiClient, ident: &str) -> Result<i32> {
    let ret = client.object_info(ident).await?;
    Ok(output::render(&ret))
}

pub async fn create(
    client: &ApiClient,
    name: String,
    parent: Option<String>,
    kind: Option<ObjectType>,
    shared: bool,
    password: Option<String>,
) -> Result<i32> {
    let request = CreateRequest {
        name,
        parent,
        // Anything but an explicit `file` makes a folder.
        folder: kind != Some(ObjectType::File),
        shared,
        password: password.filter(|password| !password.is_empty()),
    };
    let ret = client.create(&request).await?;
    Ok(output::render(&ret))
}

pub async fn edit(
    client: &ApiClient,
    ident: String,
    name: Option<String>,
    parent: Option<String>,
    shared: bool,
    no_shared: bool,
    password: Option<String>,
) -> Result<i32> {
    let shared = if shared {
        Some(true)
    } else if no_shared {
        Some(false)
    } else {
        None
    };
    // Tri-state password: absent leaves it, empty string unsets, anything
    // else sets.
    let password = password.map(|password| {
        if password.is_empty() {
            None
        } else {
            Some(password)
        }
    });

    if name.is_none() && parent.is_none() && shared.is_none() && password.is_none() {
        eprintln!("Nothing to edit");
        return Ok(1);
    }

    let request = UpdateRequest {
        ident,
        name,
        parent,
        shared,
        password,
    };
    let ret = client.update(&request).await?;
    Ok(output::render(&ret))
}

pub async fn copy(
    client: &ApiClient,
    ident: String,
    name: Option<String>,
    parent: Option<String>,
    shared: bool,
    password: Option<String>,
    new_password: Option<String>,
) -> Result<i32> {
    let request = CopyRequest {
        ident,
        name,
        parent,
        shared,
        password: password.filter(|password| !password.is_empty()),
        newpassword: new_password.filter(|password| !password.is_empty()),
    };
    let ret = client.copy(&request).await?;
    Ok(output::render(&ret))
}

pub async fn remove(client: &ApiClient, ident: String, recursive: bool) -> Result<i32> {
    let request = DeleteRequest { ident, recursive };
    let ret = client.delete(&request).await?;
    Ok(output::render(&ret))
}
