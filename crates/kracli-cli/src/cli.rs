//! Command-line surface of the kra.sk client.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// kra.sk storage client
#[derive(Parser, Debug)]
#[command(name = "kracli", version)]
#[command(about = "kra.sk storage client")]
#[command(
    after_help = "Credentials come from the KRAUSER/KRAPASS environment variables or the\n\
                  [login] section of the configuration file (default: ~/.kracli.cfg),\n\
                  which is used for session storage too.\n\n\
                  Example configuration file:\n\
                  [login]\n\
                  username=YOUR_USERNAME\n\
                  password=YOUR_PASSWORD"
)]
pub struct Cli {
    /// Configuration file (default: ~/.kracli.cfg)
    #[arg(short = 'i', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress informational output and progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List files and folders
    List {
        /// Folder ident to list
        #[arg(short, long, value_name = "IDENT")]
        parent: Option<String>,

        /// Filter by name (allowed globs: * .)
        #[arg(short = 'F', long)]
        filter: Option<String>,

        /// Limit to an object type
        #[arg(short = 't', long = "type", value_enum, value_name = "TYPE")]
        kind: Option<ObjectType>,
    },

    /// Show object info
    Info {
        /// Object ident
        ident: String,
    },

    /// Create a folder or fileslot
    Create {
        /// Name of the new object
        name: String,

        /// Parent folder ident
        #[arg(short, long, value_name = "IDENT")]
        parent: Option<String>,

        /// Object type (default: folder)
        #[arg(short = 't', long = "type", value_enum, value_name = "TYPE")]
        kind: Option<ObjectType>,

        /// Create as shared
        #[arg(short = 'S', long)]
        shared: bool,

        /// Protect with a password
        #[arg(short = 'P', long, value_name = "PASSWORD")]
        password: Option<String>,
    },

    /// Edit an object
    Edit {
        /// Object ident
        ident: String,

        /// New name
        #[arg(short, long, value_name = "NAME")]
        name: Option<String>,

        /// New parent folder ident
        #[arg(short, long, value_name = "IDENT")]
        parent: Option<String>,

        /// Mark as shared
        #[arg(short = 'S', long, overrides_with = "no_shared")]
        shared: bool,

        /// Mark as not shared
        #[arg(long, overrides_with = "shared")]
        no_shared: bool,

        /// New password; an empty string unsets it
        #[arg(short = 'P', long, value_name = "PASSWORD")]
        password: Option<String>,
    },

    /// Copy a file
    Copy {
        /// Ident of the file to copy
        ident: String,

        /// Name of the copy
        #[arg(short, long, value_name = "NAME")]
        name: Option<String>,

        /// Destination folder ident
        #[arg(short, long, value_name = "IDENT")]
        parent: Option<String>,

        /// Mark the copy as shared
        #[arg(short = 'S', long)]
        shared: bool,

        /// Password of the source object
        #[arg(short = 'P', long, value_name = "PASSWORD")]
        password: Option<String>,

        /// Password to set on the copy
        #[arg(short = 'N', long, value_name = "NEWPASSWORD")]
        new_password: Option<String>,
    },

    /// Delete a file or folder
    Remove {
        /// Object ident
        ident: String,

        /// Delete folders recursively
        #[arg(short = 'R', long)]
        recursive: bool,
    },

    /// Download a file
    Download {
        /// Ident of the file to download
        ident: String,

        /// Store under this name instead of the link basename
        #[arg(short, long, value_name = "FILENAME")]
        name: Option<String>,

        /// Resume a partial download
        #[arg(short = 'W', long)]
        resume: bool,
    },

    /// Upload a file
    Upload {
        /// Path of the local file
        path: PathBuf,

        /// Store under this name instead of the local basename
        #[arg(short, long, value_name = "FILENAME")]
        name: Option<String>,

        /// Parent folder ident for the new fileslot
        #[arg(short, long, value_name = "IDENT")]
        parent: Option<String>,

        /// Create the fileslot as shared
        #[arg(short = 'S', long)]
        shared: bool,

        /// Use a pre-existing fileslot ident
        #[arg(short = 'I', long, value_name = "IDENT")]
        ident: Option<String>,

        /// Resume into an existing TUS upload resource
        #[arg(short = 'T', long, value_name = "RESOURCE")]
        resource: Option<String>,

        /// Upload chunk size in MB; 0 sends the whole file in one request
        #[arg(short = 'C', long, value_name = "MB", default_value_t = 10)]
        chunk_mb: u64,
    },

    /// Show user info
    Userinfo,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    File,
    Folder,
}

impl ObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::File => "file",
            ObjectType::Folder => "folder",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn upload_defaults_to_ten_mb_chunks() {
        let cli = Cli::try_parse_from(["kracli", "upload", "film.mkv"]).unwrap();
        match cli.command {
            Command::Upload { chunk_mb, path, .. } => {
                assert_eq!(chunk_mb, 10);
                assert_eq!(path, PathBuf::from("film.mkv"));
            }
            other => panic!("parsed wrong command: {:?}", other),
        }
    }

    #[test]
    fn edit_shared_flags_are_exclusive_but_overridable() {
        let cli =
            Cli::try_parse_from(["kracli", "edit", "x1", "--shared", "--no-shared"]).unwrap();
        match cli.command {
            Command::Edit { shared, no_shared, .. } => {
                assert!(!shared);
                assert!(no_shared);
            }
            other => panic!("parsed wrong command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_apply_after_the_subcommand() {
        let cli = Cli::try_parse_from(["kracli", "list", "-q", "-i", "/tmp/alt.cfg"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/alt.cfg")));
    }
}
