use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nextcloud_client::{ClientConfig, NextCloud};
use nextcloud_types::{CreateShare, MessageQuery, NewMessage, ParticipantSource, PropfindDepth};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ncctl")]
#[command(about = "Talk, sharing, provisioning and WebDAV on a Nextcloud server")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    /// Log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Connection {
    #[arg(long, env = "NEXTCLOUD_URL")]
    url: String,

    #[arg(long, env = "NEXTCLOUD_USER")]
    user: String,

    #[arg(long, env = "NEXTCLOUD_PASSWORD", hide_env_values = true)]
    password: String,

    /// Request timeout in seconds.
    #[arg(long, env = "NEXTCLOUD_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    #[arg(long, env = "NEXTCLOUD_MAX_RETRIES", default_value_t = 3)]
    max_retries: u32,
}

impl Connection {
    fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.url, &self.user, &self.password);
        config.timeout_secs = self.timeout;
        config.max_retries = self.max_retries;
        config
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check URL and credentials; prints server capabilities
    Status,
    /// Talk conversations
    #[command(subcommand)]
    Rooms(RoomsCommand),
    /// Talk chat messages
    #[command(subcommand)]
    Chat(ChatCommand),
    /// File shares
    #[command(subcommand)]
    Shares(SharesCommand),
    /// User accounts
    #[command(subcommand)]
    Users(UsersCommand),
    /// Files in the user's WebDAV home
    #[command(subcommand)]
    Files(FilesCommand),
}

#[derive(Debug, Subcommand)]
enum RoomsCommand {
    List,
    Show {
        token: String,
    },
    Create {
        name: String,
        /// Open to anyone with the link
        #[arg(long)]
        public: bool,
        /// Group to invite into a group conversation
        #[arg(long, conflicts_with = "public")]
        invite_group: Option<String>,
    },
    Rename {
        token: String,
        name: String,
    },
    Delete {
        token: String,
    },
}

#[derive(Debug, Subcommand)]
enum ChatCommand {
    /// Latest messages of a conversation
    Read {
        token: String,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    Send {
        token: String,
        message: String,
        /// Id of the message to reply to
        #[arg(long)]
        reply_to: Option<i64>,
    },
}

#[derive(Debug, Subcommand)]
enum SharesCommand {
    /// Shares owned by the user, or of one path
    List {
        #[arg(long)]
        path: Option<String>,
        /// Shares other users made with the user
        #[arg(long, conflicts_with = "path")]
        with_me: bool,
    },
    /// Create a public link
    Link {
        path: String,
        #[arg(long)]
        password: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum UsersCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    Show {
        uid: String,
    },
}

#[derive(Debug, Subcommand)]
enum FilesCommand {
    Ls {
        #[arg(default_value = "")]
        path: String,
        /// Include the folder's whole subtree
        #[arg(short, long)]
        recursive: bool,
    },
    Get {
        remote: String,
        local: PathBuf,
    },
    Put {
        local: PathBuf,
        remote: String,
    },
    Mkdir {
        path: String,
        /// Create missing parents too
        #[arg(short, long)]
        parents: bool,
    },
    Rm {
        path: String,
    },
    Mv {
        from: String,
        to: String,
        #[arg(long)]
        overwrite: bool,
    },
    Favorites {
        #[arg(default_value = "")]
        path: String,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn,nextcloud_client=info",
        1 => "info,nextcloud_client=debug",
        _ => "debug,nextcloud_client=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn done() -> Result<()> {
    print_json(&serde_json::json!({ "ok": true }))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let nc = NextCloud::new(cli.connection.config()).context("invalid connection settings")?;
    debug!("connecting to {} as {}", nc.client().base_url(), nc.user());
    run(&nc, cli.command).await
}

async fn run(nc: &NextCloud, command: Command) -> Result<()> {
    match command {
        Command::Status => print_json(&nc.check_connection().await?),
        Command::Rooms(cmd) => rooms(nc, cmd).await,
        Command::Chat(cmd) => chat(nc, cmd).await,
        Command::Shares(cmd) => shares(nc, cmd).await,
        Command::Users(cmd) => users(nc, cmd).await,
        Command::Files(cmd) => files(nc, cmd).await,
    }
}

async fn rooms(nc: &NextCloud, cmd: RoomsCommand) -> Result<()> {
    let rooms = nc.conversations();
    match cmd {
        RoomsCommand::List => print_json(&rooms.get_conversations().await?),
        RoomsCommand::Show { token } => print_json(&rooms.get_conversation(&token).await?),
        RoomsCommand::Create {
            name,
            public,
            invite_group,
        } => {
            let room = if public {
                rooms.add_public_conversation(&name).await?
            } else {
                rooms
                    .add_group_conversation(&name, invite_group.as_deref(), ParticipantSource::Groups)
                    .await?
            };
            print_json(&room)
        }
        RoomsCommand::Rename { token, name } => {
            rooms.rename_conversation(&token, &name).await?;
            done()
        }
        RoomsCommand::Delete { token } => {
            rooms.delete_conversation(&token).await?;
            done()
        }
    }
}

async fn chat(nc: &NextCloud, cmd: ChatCommand) -> Result<()> {
    let chat = nc.chat();
    match cmd {
        ChatCommand::Read { token, limit } => {
            let query = MessageQuery {
                set_read_marker: false,
                ..MessageQuery::history(limit, None)
            };
            print_json(&chat.get_messages(&token, &query).await?)
        }
        ChatCommand::Send {
            token,
            message,
            reply_to,
        } => {
            let message = NewMessage {
                reply_to,
                ..NewMessage::text(message)
            };
            print_json(&chat.send_message(&token, &message).await?)
        }
    }
}

async fn shares(nc: &NextCloud, cmd: SharesCommand) -> Result<()> {
    let shares = nc.shares();
    match cmd {
        SharesCommand::List {
            path: Some(path), ..
        } => print_json(&shares.get_shares_from_path(&path, None, None).await?),
        SharesCommand::List { with_me: true, .. } => {
            print_json(&shares.get_shared_with_me().await?)
        }
        SharesCommand::List { .. } => print_json(&shares.get_shares().await?),
        SharesCommand::Link { path, password } => {
            let args = CreateShare {
                password,
                ..CreateShare::public_link(path)
            };
            print_json(&shares.create_share(&args).await?)
        }
        SharesCommand::Delete { id } => {
            shares.delete_share(&id).await?;
            done()
        }
    }
}

async fn users(nc: &NextCloud, cmd: UsersCommand) -> Result<()> {
    let users = nc.users();
    match cmd {
        UsersCommand::List {
            search,
            limit,
            offset,
        } => print_json(&users.get_users(search.as_deref(), limit, offset).await?),
        UsersCommand::Show { uid } => print_json(&users.get_user(&uid).await?),
    }
}

async fn files(nc: &NextCloud, cmd: FilesCommand) -> Result<()> {
    let dav = nc.webdav();
    let uid = nc.user();
    match cmd {
        FilesCommand::Ls { path, recursive } => {
            let depth = if recursive {
                PropfindDepth::Infinity
            } else {
                PropfindDepth::One
            };
            print_json(&dav.list_folders(uid, &path, depth, false).await?)
        }
        FilesCommand::Get { remote, local } => {
            let bytes = dav
                .download_file_to(uid, &remote, &local)
                .await
                .with_context(|| format!("downloading {remote}"))?;
            print_json(&serde_json::json!({ "path": local.display().to_string(), "bytes": bytes }))
        }
        FilesCommand::Put { local, remote } => {
            dav.upload_file(uid, &local, &remote)
                .await
                .with_context(|| format!("uploading {}", local.display()))?;
            done()
        }
        FilesCommand::Mkdir { path, parents } => {
            if parents {
                dav.assure_folder_exists(uid, &path).await?;
            } else {
                dav.create_folder(uid, &path).await?;
            }
            done()
        }
        FilesCommand::Rm { path } => {
            dav.delete_path(uid, &path).await?;
            done()
        }
        FilesCommand::Mv {
            from,
            to,
            overwrite,
        } => {
            dav.move_path(uid, &from, &to, overwrite).await?;
            done()
        }
        FilesCommand::Favorites { path } => print_json(&dav.list_favorites(uid, &path).await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const CONN: [&str; 7] = [
        "ncctl",
        "--url",
        "https://cloud.example.com",
        "--user",
        "alice",
        "--password",
        "pw",
    ];

    fn parse(rest: &[&str]) -> Cli {
        Cli::try_parse_from(CONN.iter().chain(rest)).unwrap()
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn connection_flags_build_config() {
        let cli = parse(&["--timeout", "5", "status"]);
        let config = cli.connection.config();
        assert_eq!(config.url, "https://cloud.example.com");
        assert_eq!(config.user, "alice");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_retries, 3);
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn rooms_create_public() {
        let cli = parse(&["rooms", "create", "Lobby", "--public"]);
        match cli.command {
            Command::Rooms(RoomsCommand::Create { name, public, .. }) => {
                assert_eq!(name, "Lobby");
                assert!(public);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn public_conflicts_with_group_invite() {
        let err = Cli::try_parse_from(
            CONN.iter()
                .chain(&["rooms", "create", "x", "--public", "--invite-group", "devs"]),
        )
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn files_ls_defaults_to_home() {
        let cli = parse(&["-v", "files", "ls"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Files(FilesCommand::Ls { path, recursive }) => {
                assert_eq!(path, "");
                assert!(!recursive);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn chat_send_with_reply() {
        let cli = parse(&["chat", "send", "tok", "hello", "--reply-to", "7"]);
        match cli.command {
            Command::Chat(ChatCommand::Send {
                token,
                message,
                reply_to,
            }) => {
                assert_eq!(token, "tok");
                assert_eq!(message, "hello");
                assert_eq!(reply_to, Some(7));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
