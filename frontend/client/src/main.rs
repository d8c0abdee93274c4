use anyhow::Context;
use clap::{Parser, Subcommand};
use comments_client::api::{ApiClient, CommentsApi};
use comments_client::config::ClientConfig;
use comments_client::view::CommentsView;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "comments-client", version, about = "Browse and edit nested comments")]
struct Cli {
    /// Overrides `API_URL`
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the comment forest
    List,
    /// Post a new top-level comment
    Create {
        text: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// Reply to a comment
    Reply {
        parent: String,
        text: String,
        #[arg(long)]
        image: Option<String>,
    },
    Like { id: String },
    Dislike { id: String },
    /// Replace a comment's text
    Edit { id: String, text: String },
    Delete { id: String },
    /// Check that the API is reachable
    Hi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_url = match cli.api_url {
        Some(url) => url,
        None => ClientConfig::from_env().context("failed to load configuration")?.api_url,
    };

    let client = ApiClient::new(api_url).context("failed to build HTTP client")?;

    if let Command::Hi = cli.command {
        let greeting = client.hi().await.context("API is not reachable")?;
        println!("{greeting}");
        return Ok(());
    }

    let mut view = CommentsView::new(client);
    view.refresh().await;

    match cli.command {
        Command::List | Command::Hi => {}
        Command::Create { text, image } => compose(&mut view, None, text, image).await,
        Command::Reply { parent, text, image } => compose(&mut view, Some(parent), text, image).await,
        Command::Like { id } => view.like(&id, true).await,
        Command::Dislike { id } => view.like(&id, false).await,
        Command::Edit { id, text } => {
            if view.begin_edit(&id) {
                view.set_edit_text(text);
                view.save_edit().await;
            } else {
                eprintln!("Comment not found.");
            }
        }
        Command::Delete { id } => view.delete(&id).await,
    }

    print!("{}", view.render());

    let hidden = view.forest().orphans().count();
    if hidden > 0 {
        tracing::info!(hidden, "replies to deleted comments are not shown");
    }

    let notifications = view.take_notifications();
    for notification in &notifications {
        eprintln!("{notification}");
    }

    if notifications.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} request(s) failed", notifications.len())
    }
}

async fn compose<A: CommentsApi>(
    view: &mut CommentsView<A>,
    parent: Option<String>,
    text: String,
    image: Option<String>,
) {
    view.reply_to(parent);
    view.set_compose_text(text);
    view.set_compose_image(image.unwrap_or_default());

    if !view.submit_compose().await && !view.can_submit() {
        eprintln!("Comment text is required.");
    }
}
