//! Download and upload commands, driving the core transfer engine.

use std::path::{Path, PathBuf};

use anyhow::Result;
use kracli_core::api::ApiClient;
use kracli_core::models::CreateRequest;
use kracli_core::transfer::{download as dl, upload as ul, TransferError};

use crate::output;
use crate::progress;

pub async fn download(
    client: &ApiClient,
    ident: &str,
    name: Option<String>,
    resume: bool,
    quiet: bool,
) -> Result<i32> {
    let ret = client.download_link(ident).await?;
    let Some(link) = ret.data_str("link").map(str::to_owned) else {
        return Ok(output::render(&ret));
    };

    let filename = name.unwrap_or_else(|| dl::filename_from_link(&link));
    if !quiet {
        eprintln!("Downloading {} as: {}", ident, filename);
    }

    let bar = progress::byte_bar(quiet);
    dl::fetch(client.transfer_http(), &link, Path::new(&filename), resume, |event| {
        progress::update(&bar, event)
    })
    .await?;
    bar.finish_and_clear();
    Ok(0)
}

pub struct UploadArgs {
    pub path: PathBuf,
    pub name: Option<String>,
    pub parent: Option<String>,
    pub shared: bool,
    pub ident: Option<String>,
    pub resource: Option<String>,
    pub chunk_mb: u64,
}

pub async fn upload(client: &ApiClient, args: UploadArgs, quiet: bool) -> Result<i32> {
    let size = ul::probe_local(&args.path)?;
    let name = match args.name {
        Some(name) => name,
        None => args
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let resource = match args.resource {
        Some(resource) => resource,
        None => {
            let ident = match args.ident {
                Some(ident) => ident,
                None => {
                    let request = CreateRequest {
                        name,
                        parent: args.parent,
                        folder: false,
                        shared: args.shared,
                        password: None,
                    };
                    let ret = client.create(&request).await?;
                    let ident = if ret.has_success() {
                        ret.data_str("ident").map(str::to_owned)
                    } else {
                        None
                    };
                    let Some(ident) = ident else {
                        return Ok(output::render(&ret));
                    };
                    // Echoed so a failed upload can be retried with -I.
                    if !quiet {
                        eprintln!("Created ident: {}", ident);
                    }
                    ident
                }
            };
            match ul::create_resource(client.transfer_http(), client.upload_base(), &ident, size).await {
                Ok(resource) => resource,
                Err(err) => {
                    eprintln!("{}", err);
                    eprintln!(
                        "You can retry upload with: kracli upload {} --ident {}",
                        args.path.display(),
                        ident
                    );
                    return Ok(1);
                }
            }
        }
    };

    let state = ul::probe_resource(client.transfer_http(), client.upload_base(), &resource).await?;
    if state.length != size {
        return Err(TransferError::SizeMismatch.into());
    }

    if !quiet {
        if args.chunk_mb == 0 {
            eprintln!("Starting whole-file upload");
            eprintln!(
                "You can restart chunked upload with:\nkracli upload {} --resource {}",
                args.path.display(),
                resource
            );
        } else {
            if state.offset == 0 {
                eprintln!("Starting upload with {}MB chunks", args.chunk_mb);
            } else {
                eprintln!(
                    "Resuming upload with {}MB chunks from position {}",
                    args.chunk_mb, state.offset
                );
            }
            eprintln!(
                "You can resume upload with:\nkracli upload {} --resource {}",
                args.path.display(),
                resource
            );
            eprintln!(
                "You can restart upload with:\nkracli upload {} --resource {} --chunk-mb 0",
                args.path.display(),
                resource
            );
        }
    }

    let bar = progress::byte_bar(quiet);
    ul::patch(
        client.transfer_http(),
        client.upload_base(),
        &resource,
        &args.path,
        size,
        state,
        args.chunk_mb,
        |event| progress::update(&bar, event),
    )
    .await?;
    bar.finish_and_clear();

    if !quiet {
        eprintln!("Upload successful");
    }
    Ok(0)
}
